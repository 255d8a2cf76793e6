use tokio::io::{AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::core::console::LineReader;

const OUTPUT_BUFFER: usize = 256;

/// Merges two child streams (stdout + stderr) into one line channel.
///
/// Each stream is drained by its own task until end of stream; lines that
/// are not UTF-8 are forwarded lossily. The channel closes once both ended.
pub fn merge_streams<A, B>(first: A, second: B) -> mpsc::Receiver<String>
where
    A: AsyncRead + Unpin + Send + 'static,
    B: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(OUTPUT_BUFFER);
    forward_lines(first, tx.clone());
    forward_lines(second, tx);
    rx
}

fn forward_lines<R>(stream: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = LineReader::new(BufReader::new(stream));
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    debug!("child output stream closed with error: {}", e);
                    break;
                }
            }
        }
    });
}
