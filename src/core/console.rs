// ─── Console ───
// Line-oriented operator I/O shared by the menu and the supervisor.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::core::error::LauncherResult;

/// Reads `\n`-terminated lines and decodes them lossily, so a stray
/// Latin-1 byte becomes U+FFFD instead of an error.
///
/// Bytes of an unfinished line stay buffered across calls, which keeps
/// `next_line` cancel safe.
pub struct LineReader<R> {
    reader: R,
    pending: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
        }
    }

    /// Next line without its `\n` / `\r\n`; `None` at end of input.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        let read = self.reader.read_until(b'\n', &mut self.pending).await?;
        if read == 0 && self.pending.is_empty() {
            return Ok(None);
        }
        let line = decode_line(&self.pending);
        self.pending.clear();
        Ok(Some(line))
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

pub struct Console<R, W> {
    input: LineReader<R>,
    out: W,
}

pub type StdConsole = Console<BufReader<tokio::io::Stdin>, tokio::io::Stdout>;

/// Console bound to the process stdin/stdout.
pub fn stdio() -> StdConsole {
    Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            input: LineReader::new(reader),
            out,
        }
    }

    /// Next input line without its terminator; `None` at end of input.
    /// Cancel safe, so it can sit in a `select!`.
    pub async fn read_line(&mut self) -> LauncherResult<Option<String>> {
        Ok(self.input.next_line().await?)
    }

    /// Prints `label` without newline and reads the answer, trimmed.
    pub async fn prompt(&mut self, label: &str) -> LauncherResult<Option<String>> {
        self.out.write_all(label.as_bytes()).await?;
        self.out.flush().await?;
        Ok(self.read_line().await?.map(|line| line.trim().to_string()))
    }

    pub async fn say(&mut self, text: &str) -> LauncherResult<()> {
        write_line(&mut self.out, text).await
    }

    /// Separate borrows of input and output for `select!` loops.
    pub fn split(&mut self) -> (&mut LineReader<R>, &mut W) {
        (&mut self.input, &mut self.out)
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

/// Writes one line in a single write and flushes. Other tasks printing to
/// their own stdout handle cannot split it.
pub async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> LauncherResult<()> {
    out.write_all(format!("{text}\n").as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) type MemoryConsole = Console<&'static [u8], Vec<u8>>;

    pub(crate) fn memory_console(input: &'static str) -> MemoryConsole {
        raw_memory_console(input.as_bytes())
    }

    pub(crate) fn raw_memory_console(input: &'static [u8]) -> MemoryConsole {
        Console::new(input, Vec::new())
    }

    pub(crate) fn output_of(console: MemoryConsole) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[tokio::test]
    async fn prompt_writes_label_and_trims_answer() {
        let mut console = memory_console("  2 \nnext\n");

        assert_eq!(console.prompt("RAM: ").await.unwrap().as_deref(), Some("2"));
        assert_eq!(console.read_line().await.unwrap().as_deref(), Some("next"));
        assert_eq!(console.read_line().await.unwrap(), None);
        assert_eq!(output_of(console), "RAM: ");
    }

    #[tokio::test]
    async fn say_appends_newline() {
        let mut console = memory_console("");
        console.say("hola").await.unwrap();
        console.say("mundo").await.unwrap();
        assert_eq!(output_of(console), "hola\nmundo\n");
    }

    /// Records every `poll_write` call separately.
    #[derive(Default)]
    struct ChunkWriter(Vec<Vec<u8>>);

    impl AsyncWrite for ChunkWriter {
        fn poll_write(
            mut self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            buf: &[u8],
        ) -> std::task::Poll<io::Result<usize>> {
            self.0.push(buf.to_vec());
            std::task::Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn each_line_is_one_write() {
        let mut out = ChunkWriter::default();
        write_line(&mut out, "[TUNEL] https://a.joinmc.link").await.unwrap();
        write_line(&mut out, "Done (3.1s)!").await.unwrap();

        assert_eq!(
            out.0,
            vec![
                b"[TUNEL] https://a.joinmc.link\n".to_vec(),
                b"Done (3.1s)!\n".to_vec()
            ]
        );
    }

    #[tokio::test]
    async fn latin1_input_is_decoded_lossily() {
        let mut console = raw_memory_console(b"se\xf1or\r\nok\n");

        assert_eq!(
            console.read_line().await.unwrap().as_deref(),
            Some("se\u{FFFD}or")
        );
        assert_eq!(console.read_line().await.unwrap().as_deref(), Some("ok"));
        assert_eq!(console.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn last_line_without_newline_is_returned() {
        let mut reader = LineReader::new(&b"uno\ndos"[..]);
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("uno"));
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("dos"));
        assert_eq!(reader.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn partial_line_survives_a_cancelled_read() {
        let (mut writer, reader) = tokio::io::duplex(64);
        let mut lines = LineReader::new(BufReader::new(reader));

        writer.write_all(b"/st").await.unwrap();
        let first = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            lines.next_line(),
        )
        .await;
        assert!(first.is_err());

        writer.write_all(b"op\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("/stop"));
    }
}
