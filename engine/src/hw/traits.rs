use crate::error::AoError;
use crate::hw::aaudio::chmap::ChannelMap;
use crate::hw::aaudio::format::SampleFormat;

/// What the stream actually plays, after negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFormat {
    pub format: SampleFormat,
    pub channels: ChannelMap,
    pub sample_rate: u32,
}

impl StreamFormat {
    pub fn frame_bytes(&self) -> usize {
        self.format.bytes() * self.channels.len()
    }
}

/// Result of one pull from the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pull {
    pub frames: usize,
    pub eof: bool,
}

/// The pipeline side of the data callback.
///
/// `read` runs on the realtime thread. It must fill `buf` completely,
/// padding with silence past the last available frame, and must not block
/// or allocate.
pub trait AudioSource: Send {
    /// Called on the caller thread once the granted format is known.
    fn prepare(&mut self, format: &StreamFormat);

    /// `deadline_ns` is the monotonic time the last frame of `buf` becomes audible.
    fn read(&mut self, buf: &mut [u8], frames: usize, deadline_ns: i64) -> Pull;
}

/// Lifecycle of an audio output as driven by the owning pipeline.
pub trait AudioOutput {
    fn init(&mut self, request: &crate::hw::aaudio::negotiate::AudioRequest)
    -> Result<(), AoError>;
    fn start(&mut self) -> Result<(), AoError>;
    fn set_pause(&mut self, paused: bool) -> Result<(), AoError>;
    fn reset(&mut self) -> Result<(), AoError>;
    fn uninit(&mut self);
    fn stream_format(&self) -> Option<&StreamFormat>;
}

#[macro_export]
macro_rules! impl_audio_output_for_driver {
    ($driver:ty) => {
        impl $crate::hw::traits::AudioOutput for $driver {
            fn init(
                &mut self,
                request: &$crate::hw::aaudio::negotiate::AudioRequest,
            ) -> Result<(), $crate::error::AoError> {
                <$driver>::init(self, request)
            }

            fn start(&mut self) -> Result<(), $crate::error::AoError> {
                <$driver>::start(self)
            }

            fn set_pause(&mut self, paused: bool) -> Result<(), $crate::error::AoError> {
                <$driver>::set_pause(self, paused)
            }

            fn reset(&mut self) -> Result<(), $crate::error::AoError> {
                <$driver>::reset(self)
            }

            fn uninit(&mut self) {
                <$driver>::uninit(self)
            }

            fn stream_format(&self) -> Option<&$crate::hw::traits::StreamFormat> {
                <$driver>::stream_format(self)
            }
        }
    };
}
