pub mod clipboard;
pub mod output;
pub mod signal;
pub mod task;
pub mod tunnel;

pub use clipboard::{ClipboardSink, SystemClipboard};
pub use signal::Interrupt;
pub use task::{operator_command, supervise, ServerLaunch, SupervisorExit};
pub use tunnel::{TunnelHandle, TunnelStart};
