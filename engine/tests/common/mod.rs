#![allow(dead_code)]

use aaudio_out_engine::hw::aaudio::api::{AAudioApi, BuilderHandle, StreamHandle};
use aaudio_out_engine::hw::aaudio::driver::ApiLoader;
use aaudio_out_engine::hw::aaudio::ffi::*;
use aaudio_out_engine::hw::error_fmt;
use aaudio_out_engine::{
    AAudioOptions, AudioSource, HwDriver, Message, Pull, StreamFormat, reload_channel,
};
use std::os::raw::c_void;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::Receiver;

/// What the fake AAudio was told and what it will answer.
#[derive(Default)]
pub struct MockState {
    pub calls: Vec<&'static str>,
    pub tiers: Vec<i32>,

    pub channel_mask: Option<aaudio_channel_mask_t>,
    pub channel_count: Option<i32>,
    pub format: Option<aaudio_format_t>,
    pub sample_rate: Option<i32>,
    pub sharing_mode: Option<i32>,
    pub content_type: Option<i32>,
    pub usage: Option<i32>,
    pub session_id: Option<i32>,
    pub data_callback: Option<(DataCallback, usize)>,
    pub error_callback: Option<(ErrorCallback, usize)>,

    /// Channel count reported by an open stream on the count path.
    pub granted_channels: i32,
    pub buffer_capacity: i32,
    pub frames_written: i64,
    /// `None` makes `getTimestamp` fail.
    pub timestamp: Option<(i64, i64)>,
    pub fail_open: Option<aaudio_result_t>,
    pub fail_start: Option<aaudio_result_t>,
    pub fail_pause: Option<aaudio_result_t>,
    /// State reported after a start request instead of STARTED.
    pub start_lands_in: Option<aaudio_stream_state_t>,

    pub next_stream: usize,
    pub open_streams: Vec<usize>,
    pub opened: usize,
    pub closed: usize,
    pub builders_deleted: usize,
    pub state: aaudio_stream_state_t,
}

pub struct MockApi {
    api_level: i32,
    pub state: Mutex<MockState>,
}

impl MockApi {
    /// A device at `api_level` with every tier up to it bound.
    pub fn new(api_level: i32) -> Arc<Self> {
        let tiers = [26, 28, 32]
            .into_iter()
            .filter(|t| *t <= api_level)
            .collect();
        Arc::new(Self {
            api_level,
            state: Mutex::new(MockState {
                tiers,
                granted_channels: 2,
                buffer_capacity: 3840,
                next_stream: 0x1000,
                state: AAUDIO_STREAM_STATE_UNINITIALIZED,
                ..Default::default()
            }),
        })
    }

    pub fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn record(&self, call: &'static str) -> MutexGuard<'_, MockState> {
        let mut state = self.lock();
        state.calls.push(call);
        state
    }

    pub fn loader(self: &Arc<Self>) -> ApiLoader {
        let api = Arc::clone(self);
        Box::new(move |_options: &AAudioOptions| Ok(Arc::clone(&api) as Arc<dyn AAudioApi>))
    }

    fn current_stream(&self) -> *mut AAudioStream {
        self.lock()
            .open_streams
            .last()
            .map(|s| *s as *mut AAudioStream)
            .unwrap_or(std::ptr::null_mut())
    }

    /// Run the registered data callback like the OS would.
    pub fn fire_data(&self, buf: &mut [u8], frames: i32) -> aaudio_data_callback_result_t {
        let (callback, user_data) = self.lock().data_callback.expect("no data callback");
        let stream = self.current_stream();
        unsafe {
            callback(
                stream,
                user_data as *mut c_void,
                buf.as_mut_ptr() as *mut c_void,
                frames,
            )
        }
    }

    /// Run the registered error callback like the OS would.
    pub fn fire_error(&self, error: aaudio_result_t) {
        let (callback, user_data) = self.lock().error_callback.expect("no error callback");
        let stream = self.current_stream();
        unsafe { callback(stream, user_data as *mut c_void, error) }
    }
}

impl AAudioApi for MockApi {
    fn api_level(&self) -> i32 {
        self.api_level
    }

    fn has_tier(&self, min_api_level: i32) -> bool {
        self.lock().tiers.contains(&min_api_level)
    }

    fn result_text(&self, result: aaudio_result_t) -> String {
        error_fmt::result_name(result)
    }

    fn state_text(&self, state: aaudio_stream_state_t) -> String {
        error_fmt::state_name(state)
    }

    fn create_stream_builder(&self) -> Result<BuilderHandle, aaudio_result_t> {
        self.record("create_stream_builder");
        BuilderHandle::from_raw(0x10 as *mut AAudioStreamBuilder).ok_or(AAUDIO_ERROR_NULL)
    }

    fn builder_delete(&self, _builder: BuilderHandle) -> aaudio_result_t {
        self.record("builder_delete").builders_deleted += 1;
        AAUDIO_OK
    }

    fn builder_set_device_id(&self, _builder: BuilderHandle, _device_id: i32) {
        self.record("builder_set_device_id");
    }

    fn builder_set_direction(&self, _builder: BuilderHandle, _direction: i32) {
        self.record("builder_set_direction");
    }

    fn builder_set_sharing_mode(&self, _builder: BuilderHandle, mode: i32) {
        self.record("builder_set_sharing_mode").sharing_mode = Some(mode);
    }

    fn builder_set_format(&self, _builder: BuilderHandle, format: aaudio_format_t) {
        self.record("builder_set_format").format = Some(format);
    }

    fn builder_set_sample_rate(&self, _builder: BuilderHandle, sample_rate: i32) {
        self.record("builder_set_sample_rate").sample_rate = Some(sample_rate);
    }

    fn builder_set_channel_count(&self, _builder: BuilderHandle, channels: i32) {
        self.record("builder_set_channel_count").channel_count = Some(channels);
    }

    fn builder_set_buffer_capacity(&self, _builder: BuilderHandle, _frames: i32) {
        self.record("builder_set_buffer_capacity");
    }

    fn builder_set_performance_mode(&self, _builder: BuilderHandle, _mode: i32) {
        self.record("builder_set_performance_mode");
    }

    fn builder_set_data_callback(
        &self,
        _builder: BuilderHandle,
        callback: DataCallback,
        user_data: *mut c_void,
    ) {
        self.record("builder_set_data_callback").data_callback = Some((callback, user_data as usize));
    }

    fn builder_set_error_callback(
        &self,
        _builder: BuilderHandle,
        callback: ErrorCallback,
        user_data: *mut c_void,
    ) {
        self.record("builder_set_error_callback").error_callback =
            Some((callback, user_data as usize));
    }

    fn builder_set_content_type(&self, _builder: BuilderHandle, content_type: i32) -> bool {
        let mut state = self.record("builder_set_content_type");
        let bound = state.tiers.contains(&28);
        if bound {
            state.content_type = Some(content_type);
        }
        bound
    }

    fn builder_set_usage(&self, _builder: BuilderHandle, usage: i32) -> bool {
        let mut state = self.record("builder_set_usage");
        let bound = state.tiers.contains(&28);
        if bound {
            state.usage = Some(usage);
        }
        bound
    }

    fn builder_set_session_id(&self, _builder: BuilderHandle, session_id: i32) -> bool {
        let mut state = self.record("builder_set_session_id");
        let bound = state.tiers.contains(&28);
        if bound {
            state.session_id = Some(session_id);
        }
        bound
    }

    fn builder_set_channel_mask(
        &self,
        _builder: BuilderHandle,
        mask: aaudio_channel_mask_t,
    ) -> bool {
        let mut state = self.record("builder_set_channel_mask");
        let bound = state.tiers.contains(&32);
        if bound {
            state.channel_mask = Some(mask);
        }
        bound
    }

    fn open_stream(&self, _builder: BuilderHandle) -> Result<StreamHandle, aaudio_result_t> {
        let mut state = self.record("open_stream");
        if let Some(result) = state.fail_open {
            return Err(result);
        }
        state.next_stream += 0x10;
        let addr = state.next_stream;
        state.open_streams.push(addr);
        state.opened += 1;
        state.state = AAUDIO_STREAM_STATE_OPEN;
        StreamHandle::from_raw(addr as *mut AAudioStream).ok_or(AAUDIO_ERROR_NULL)
    }

    fn stream_close(&self, stream: StreamHandle) -> aaudio_result_t {
        let mut state = self.record("stream_close");
        let addr = stream.as_ptr() as usize;
        state.open_streams.retain(|s| *s != addr);
        state.closed += 1;
        state.state = AAUDIO_STREAM_STATE_CLOSED;
        AAUDIO_OK
    }

    fn stream_request_start(&self, _stream: StreamHandle) -> aaudio_result_t {
        let mut state = self.record("stream_request_start");
        if let Some(result) = state.fail_start {
            return result;
        }
        state.state = state.start_lands_in.unwrap_or(AAUDIO_STREAM_STATE_STARTED);
        AAUDIO_OK
    }

    fn stream_request_pause(&self, _stream: StreamHandle) -> aaudio_result_t {
        let mut state = self.record("stream_request_pause");
        if let Some(result) = state.fail_pause {
            return result;
        }
        state.state = AAUDIO_STREAM_STATE_PAUSED;
        AAUDIO_OK
    }

    fn stream_state(&self, _stream: StreamHandle) -> aaudio_stream_state_t {
        self.record("stream_state").state
    }

    fn stream_wait_for_state_change(
        &self,
        _stream: StreamHandle,
        _input_state: aaudio_stream_state_t,
        _timeout_nanos: i64,
    ) -> Result<aaudio_stream_state_t, aaudio_result_t> {
        Ok(self.record("stream_wait_for_state_change").state)
    }

    fn stream_buffer_capacity(&self, _stream: StreamHandle) -> i32 {
        self.lock().buffer_capacity
    }

    fn stream_frames_per_burst(&self, _stream: StreamHandle) -> i32 {
        192
    }

    fn stream_xrun_count(&self, _stream: StreamHandle) -> i32 {
        0
    }

    fn stream_sample_rate(&self, _stream: StreamHandle) -> i32 {
        self.lock().sample_rate.unwrap_or(0)
    }

    fn stream_channel_count(&self, _stream: StreamHandle) -> i32 {
        self.lock().granted_channels
    }

    fn stream_format(&self, _stream: StreamHandle) -> aaudio_format_t {
        self.lock().format.unwrap_or(AAUDIO_FORMAT_UNSPECIFIED)
    }

    fn stream_frames_written(&self, _stream: StreamHandle) -> i64 {
        self.record("stream_frames_written").frames_written
    }

    fn stream_timestamp(
        &self,
        _stream: StreamHandle,
        clock_id: i32,
    ) -> Result<(i64, i64), aaudio_result_t> {
        assert_eq!(clock_id, CLOCK_MONOTONIC);
        self.record("stream_timestamp")
            .timestamp
            .ok_or(AAUDIO_ERROR_INVALID_STATE)
    }
}

#[derive(Debug, Default)]
pub struct SourceLog {
    pub prepared: Option<StreamFormat>,
    pub reads: usize,
    pub deadlines: Vec<i64>,
    pub frames: Vec<usize>,
}

/// Pull source that fills with a marker byte and records every call.
pub struct ScriptedSource {
    pub log: Arc<Mutex<SourceLog>>,
    /// Report end of stream on this read (1-based).
    pub eof_on_read: Option<usize>,
}

impl ScriptedSource {
    pub fn new() -> (Box<Self>, Arc<Mutex<SourceLog>>) {
        let log = Arc::new(Mutex::new(SourceLog::default()));
        (
            Box::new(Self {
                log: Arc::clone(&log),
                eof_on_read: None,
            }),
            log,
        )
    }
}

impl AudioSource for ScriptedSource {
    fn prepare(&mut self, format: &StreamFormat) {
        self.log.lock().unwrap().prepared = Some(format.clone());
    }

    fn read(&mut self, buf: &mut [u8], frames: usize, deadline_ns: i64) -> Pull {
        let mut log = self.log.lock().unwrap();
        log.reads += 1;
        log.deadlines.push(deadline_ns);
        log.frames.push(frames);
        buf.fill(0x11);
        Pull {
            frames,
            eof: self.eof_on_read == Some(log.reads),
        }
    }
}

pub struct Harness {
    pub mock: Arc<MockApi>,
    pub driver: HwDriver,
    pub log: Arc<Mutex<SourceLog>>,
    pub rx: Receiver<Message>,
}

pub fn harness(api_level: i32) -> Harness {
    harness_with(MockApi::new(api_level), None)
}

pub fn harness_with(mock: Arc<MockApi>, eof_on_read: Option<usize>) -> Harness {
    let (mut source, log) = ScriptedSource::new();
    source.eof_on_read = eof_on_read;
    let (tx, rx) = reload_channel();
    let driver = HwDriver::with_loader(AAudioOptions::default(), source, tx, mock.loader());
    Harness {
        mock,
        driver,
        log,
        rx,
    }
}
