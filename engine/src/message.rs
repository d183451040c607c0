use tokio::sync::mpsc::{Receiver, Sender, channel};

/// Upcalls from a driver to the pipeline that owns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// The stream hit a fatal error; discard and recreate the driver.
    Reload,
    /// The source reported end of stream and the callback stopped.
    Drained,
}

pub fn channel_pair() -> (Sender<Message>, Receiver<Message>) {
    channel(8)
}
