use super::ffi::{
    AAudioStream, AAudioStreamBuilder, DataCallback, ErrorCallback, aaudio_channel_mask_t,
    aaudio_format_t, aaudio_result_t, aaudio_stream_state_t,
};
use std::os::raw::c_void;
use std::ptr::NonNull;

/// Owned `AAudioStreamBuilder*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderHandle(NonNull<AAudioStreamBuilder>);

impl BuilderHandle {
    pub fn from_raw(ptr: *mut AAudioStreamBuilder) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut AAudioStreamBuilder {
        self.0.as_ptr()
    }
}

/// Live `AAudioStream*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHandle(NonNull<AAudioStream>);

impl StreamHandle {
    pub fn from_raw(ptr: *mut AAudioStream) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut AAudioStream {
        self.0.as_ptr()
    }
}

// SAFETY: AAudio handles are opaque and may be used from any thread; the
// driver serializes lifecycle calls on the caller thread.
unsafe impl Send for BuilderHandle {}
unsafe impl Sync for BuilderHandle {}
unsafe impl Send for StreamHandle {}
unsafe impl Sync for StreamHandle {}

/// The bound AAudio surface as seen by the rest of the driver.
///
/// Tier 26 members are always callable. Tier 28 and 32 members return
/// `false` when the tier is not bound on this device.
pub trait AAudioApi: Send + Sync {
    fn api_level(&self) -> i32;

    /// Whether every entry point of the tier starting at `min_api_level` is bound.
    fn has_tier(&self, min_api_level: i32) -> bool;

    fn result_text(&self, result: aaudio_result_t) -> String;
    fn state_text(&self, state: aaudio_stream_state_t) -> String;

    fn create_stream_builder(&self) -> Result<BuilderHandle, aaudio_result_t>;
    fn builder_delete(&self, builder: BuilderHandle) -> aaudio_result_t;
    fn builder_set_device_id(&self, builder: BuilderHandle, device_id: i32);
    fn builder_set_direction(&self, builder: BuilderHandle, direction: i32);
    fn builder_set_sharing_mode(&self, builder: BuilderHandle, mode: i32);
    fn builder_set_format(&self, builder: BuilderHandle, format: aaudio_format_t);
    fn builder_set_sample_rate(&self, builder: BuilderHandle, sample_rate: i32);
    fn builder_set_channel_count(&self, builder: BuilderHandle, channels: i32);
    fn builder_set_buffer_capacity(&self, builder: BuilderHandle, frames: i32);
    fn builder_set_performance_mode(&self, builder: BuilderHandle, mode: i32);
    fn builder_set_data_callback(
        &self,
        builder: BuilderHandle,
        callback: DataCallback,
        user_data: *mut c_void,
    );
    fn builder_set_error_callback(
        &self,
        builder: BuilderHandle,
        callback: ErrorCallback,
        user_data: *mut c_void,
    );
    fn builder_set_content_type(&self, builder: BuilderHandle, content_type: i32) -> bool;
    fn builder_set_usage(&self, builder: BuilderHandle, usage: i32) -> bool;
    fn builder_set_session_id(&self, builder: BuilderHandle, session_id: i32) -> bool;
    fn builder_set_channel_mask(&self, builder: BuilderHandle, mask: aaudio_channel_mask_t)
    -> bool;
    fn open_stream(&self, builder: BuilderHandle) -> Result<StreamHandle, aaudio_result_t>;

    fn stream_close(&self, stream: StreamHandle) -> aaudio_result_t;
    fn stream_request_start(&self, stream: StreamHandle) -> aaudio_result_t;
    fn stream_request_pause(&self, stream: StreamHandle) -> aaudio_result_t;
    fn stream_state(&self, stream: StreamHandle) -> aaudio_stream_state_t;
    /// Block until the state differs from `input_state`; returns the new state.
    fn stream_wait_for_state_change(
        &self,
        stream: StreamHandle,
        input_state: aaudio_stream_state_t,
        timeout_nanos: i64,
    ) -> Result<aaudio_stream_state_t, aaudio_result_t>;
    fn stream_buffer_capacity(&self, stream: StreamHandle) -> i32;
    fn stream_frames_per_burst(&self, stream: StreamHandle) -> i32;
    fn stream_xrun_count(&self, stream: StreamHandle) -> i32;
    fn stream_sample_rate(&self, stream: StreamHandle) -> i32;
    fn stream_channel_count(&self, stream: StreamHandle) -> i32;
    fn stream_format(&self, stream: StreamHandle) -> aaudio_format_t;
    fn stream_frames_written(&self, stream: StreamHandle) -> i64;
    /// `(frame position, time in nanoseconds)` of the last presented frame.
    fn stream_timestamp(
        &self,
        stream: StreamHandle,
        clock_id: i32,
    ) -> Result<(i64, i64), aaudio_result_t>;
}
