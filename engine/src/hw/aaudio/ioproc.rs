use super::api::{AAudioApi, StreamHandle};
use super::ffi::{
    AAUDIO_CALLBACK_RESULT_CONTINUE, AAUDIO_CALLBACK_RESULT_STOP, AAudioStream, CLOCK_MONOTONIC,
    aaudio_data_callback_result_t, aaudio_result_t,
};
use super::negotiate::CallbackBinding;
use crate::cell::CallbackCell;
use crate::hw::latency;
use crate::hw::traits::AudioSource;
use crate::message::Message;
use std::os::raw::c_void;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::mpsc::Sender;
use tracing::{debug, error, warn};

/// Sends `Message::Reload` at most once per driver, and `Message::Drained`
/// when the callback stops the stream at end of stream.
#[derive(Debug)]
pub struct ReloadNotifier {
    tx: Sender<Message>,
    requested: AtomicBool,
    drained: AtomicBool,
}

impl ReloadNotifier {
    pub fn new(tx: Sender<Message>) -> Self {
        Self {
            tx,
            requested: AtomicBool::new(false),
            drained: AtomicBool::new(false),
        }
    }

    /// Returns `false` if a reload was already requested.
    pub fn request_reload(&self) -> bool {
        if self.requested.swap(true, Ordering::AcqRel) {
            return false;
        }
        if let Err(e) = self.tx.try_send(Message::Reload) {
            warn!("Reload request not delivered: {e}");
        }
        true
    }

    pub fn reload_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// The data callback returned STOP; AAudio stops the stream on its own.
    pub fn drained(&self) -> bool {
        self.drained.load(Ordering::Acquire)
    }

    /// Called before a new start request.
    pub fn clear_drained(&self) {
        self.drained.store(false, Ordering::Release);
    }

    fn notify_drained(&self) {
        self.drained.store(true, Ordering::Release);
        if let Err(e) = self.tx.try_send(Message::Drained) {
            warn!("End of stream not delivered: {e}");
        }
    }
}

/// State the AAudio callbacks see through their `user_data` pointer.
///
/// Boxed by the driver so its address stays fixed while a stream exists.
pub struct CallbackContext {
    api: Arc<dyn AAudioApi>,
    sample_rate: u32,
    frame_bytes: AtomicUsize,
    source: CallbackCell<Option<Box<dyn AudioSource>>>,
    notifier: Arc<ReloadNotifier>,
    timestamp_fallback: AtomicBool,
}

impl CallbackContext {
    pub fn new(
        api: Arc<dyn AAudioApi>,
        sample_rate: u32,
        source: Box<dyn AudioSource>,
        notifier: Arc<ReloadNotifier>,
    ) -> Box<Self> {
        Box::new(Self {
            api,
            sample_rate,
            frame_bytes: AtomicUsize::new(0),
            source: CallbackCell::new(Some(source)),
            notifier,
            timestamp_fallback: AtomicBool::new(false),
        })
    }

    pub fn binding(&self) -> CallbackBinding {
        CallbackBinding {
            data: data_callback,
            error: error_callback,
            user_data: self as *const Self as *mut c_void,
        }
    }

    /// Must be set before the stream is started.
    pub fn set_frame_bytes(&self, bytes: usize) {
        self.frame_bytes.store(bytes, Ordering::Release);
    }

    pub fn frame_bytes(&self) -> usize {
        self.frame_bytes.load(Ordering::Acquire)
    }

    /// Only valid while no stream delivers callbacks into this context.
    pub fn source_mut(&mut self) -> Option<&mut (dyn AudioSource + 'static)> {
        self.source.get_mut().as_deref_mut()
    }

    pub fn into_source(self: Box<Self>) -> Option<Box<dyn AudioSource>> {
        self.source.into_inner()
    }

    fn presented_frames(&self, stream: StreamHandle, written: i64) -> i64 {
        match self.api.stream_timestamp(stream, CLOCK_MONOTONIC) {
            Ok((position, _)) => position,
            Err(result) => {
                if !self.timestamp_fallback.swap(true, Ordering::Relaxed) {
                    debug!(
                        "No presentation timestamp ({}), assuming zero latency",
                        self.api.result_text(result)
                    );
                }
                written
            }
        }
    }

    /// # Safety
    ///
    /// Must only run on the stream's callback thread.
    unsafe fn process(
        &self,
        stream: StreamHandle,
        buf: &mut [u8],
        frames: usize,
    ) -> aaudio_data_callback_result_t {
        let written = self.api.stream_frames_written(stream);
        let presented = self.presented_frames(stream, written);
        let deadline = latency::presentation_deadline(
            latency::now_nanos(),
            frames as i64,
            written,
            presented,
            self.sample_rate,
        );

        let pull = unsafe {
            self.source
                .with(|source| source.as_mut().map(|s| s.read(buf, frames, deadline)))
        };
        match pull {
            Some(pull) if pull.eof => {
                self.notifier.notify_drained();
                AAUDIO_CALLBACK_RESULT_STOP
            }
            Some(_) => AAUDIO_CALLBACK_RESULT_CONTINUE,
            None => {
                buf.fill(0);
                AAUDIO_CALLBACK_RESULT_CONTINUE
            }
        }
    }
}

/// `AAudioStream_dataCallback`.
///
/// # Safety
///
/// `user_data` must be the `CallbackContext` registered with the builder and
/// `audio_data` must hold `num_frames` frames of the stream's format.
pub unsafe extern "C" fn data_callback(
    stream: *mut AAudioStream,
    user_data: *mut c_void,
    audio_data: *mut c_void,
    num_frames: i32,
) -> aaudio_data_callback_result_t {
    let Some(ctx) = (unsafe { (user_data as *const CallbackContext).as_ref() }) else {
        return AAUDIO_CALLBACK_RESULT_STOP;
    };
    let Some(stream) = StreamHandle::from_raw(stream) else {
        return AAUDIO_CALLBACK_RESULT_STOP;
    };
    let frames = usize::try_from(num_frames).unwrap_or(0);
    let len = frames * ctx.frame_bytes();
    let buf: &mut [u8] = if audio_data.is_null() || len == 0 {
        &mut []
    } else {
        unsafe { std::slice::from_raw_parts_mut(audio_data as *mut u8, len) }
    };
    unsafe { ctx.process(stream, buf, frames) }
}

/// `AAudioStream_errorCallback`. Never touches the stream.
///
/// # Safety
///
/// `user_data` must be the `CallbackContext` registered with the builder.
pub unsafe extern "C" fn error_callback(
    _stream: *mut AAudioStream,
    user_data: *mut c_void,
    error: aaudio_result_t,
) {
    let Some(ctx) = (unsafe { (user_data as *const CallbackContext).as_ref() }) else {
        return;
    };
    error!("{}, trying to reload...", ctx.api.result_text(error));
    ctx.notifier.request_reload();
}
