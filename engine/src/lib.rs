pub mod cell;
pub mod error;
pub mod hw;
pub mod message;

pub use error::AoError;
pub use hw::aaudio::chmap::{ChannelMap, Speaker};
pub use hw::aaudio::format::{SampleFormat, SpdifCodec};
pub use hw::aaudio::negotiate::{AudioRequest, InitFlags};
pub use hw::aaudio::{AAudioOptions, HwDriver, StreamState};
pub use hw::traits::{AudioOutput, AudioSource, Pull, StreamFormat};
pub use message::Message;

use tokio::sync::mpsc::{Receiver, Sender};

/// Channel a driver reports `Message::Reload` and `Message::Drained` on.
pub fn reload_channel() -> (Sender<Message>, Receiver<Message>) {
    message::channel_pair()
}
