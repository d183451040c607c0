use super::api::{AAudioApi, BuilderHandle, StreamHandle};
use super::chmap::ChannelMap;
use super::format::SampleFormat;
use super::ioproc::{CallbackContext, ReloadNotifier};
use super::library::AAudioLibrary;
use super::negotiate::{
    self, AudioRequest, DeviceCaps, StreamConfiguration, create_builder, granted_layout,
    open_stream,
};
use super::sync::{self, Transition};
use crate::error::AoError;
use crate::hw::error_fmt;
use crate::hw::options::AAudioOptions;
use crate::hw::traits::{AudioSource, StreamFormat};
use crate::message::Message;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tracing::{debug, error, warn};

/// Produces the bound AAudio surface on `init`.
pub type ApiLoader = Box<dyn Fn(&AAudioOptions) -> Result<Arc<dyn AAudioApi>, AoError> + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Closed,
    Open,
    Started,
    Paused,
}

pub struct HwDriver {
    options: AAudioOptions,
    loader: ApiLoader,
    notifier: Arc<ReloadNotifier>,
    api: Option<Arc<dyn AAudioApi>>,
    builder: Option<BuilderHandle>,
    stream: Option<StreamHandle>,
    context: Option<Box<CallbackContext>>,
    config: Option<StreamConfiguration>,
    source: Option<Box<dyn AudioSource>>,
    format: Option<StreamFormat>,
    state: StreamState,
    device_buffer: i32,
}

impl HwDriver {
    pub fn new(
        options: AAudioOptions,
        source: Box<dyn AudioSource>,
        reload_tx: Sender<Message>,
    ) -> Self {
        Self::with_loader(
            options,
            source,
            reload_tx,
            Box::new(|options| {
                let library = AAudioLibrary::load(options)?;
                Ok(Arc::new(library) as Arc<dyn AAudioApi>)
            }),
        )
    }

    pub fn with_loader(
        options: AAudioOptions,
        source: Box<dyn AudioSource>,
        reload_tx: Sender<Message>,
        loader: ApiLoader,
    ) -> Self {
        Self {
            options,
            loader,
            notifier: Arc::new(ReloadNotifier::new(reload_tx)),
            api: None,
            builder: None,
            stream: None,
            context: None,
            config: None,
            source: Some(source),
            format: None,
            state: StreamState::Closed,
            device_buffer: 0,
        }
    }

    /// A stream the data callback stopped at end of stream reports `Open`.
    pub fn state(&self) -> StreamState {
        match self.state {
            StreamState::Started if self.notifier.drained() => StreamState::Open,
            state => state,
        }
    }

    fn settle_drain(&mut self) {
        if self.state == StreamState::Started && self.notifier.drained() {
            debug!("Stream stopped at end of stream");
            self.state = StreamState::Open;
        }
        self.notifier.clear_drained();
    }

    pub fn stream_format(&self) -> Option<&StreamFormat> {
        self.format.as_ref()
    }

    pub fn format(&self) -> Option<SampleFormat> {
        self.format.as_ref().map(|f| f.format)
    }

    pub fn channels(&self) -> Option<&ChannelMap> {
        self.format.as_ref().map(|f| &f.channels)
    }

    /// Buffer capacity the OS granted, in frames.
    pub fn device_buffer(&self) -> i32 {
        self.device_buffer
    }

    pub fn api_level(&self) -> Option<i32> {
        self.api.as_ref().map(|api| api.api_level())
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn reload_requested(&self) -> bool {
        self.notifier.reload_requested()
    }

    pub fn xrun_count(&self) -> Option<i32> {
        match (&self.api, self.stream) {
            (Some(api), Some(stream)) => Some(api.stream_xrun_count(stream)),
            _ => None,
        }
    }

    /// Probe, negotiate and open. On success `stream_format()` holds what the
    /// stream plays, which may differ from `request`.
    pub fn init(&mut self, request: &AudioRequest) -> Result<(), AoError> {
        self.uninit();
        let result = self.try_init(request);
        if let Err(e) = &result {
            error!("AAudio init failed: {e}");
            self.uninit();
        }
        result
    }

    fn try_init(&mut self, request: &AudioRequest) -> Result<(), AoError> {
        if self.source.is_none() {
            return Err(AoError::NoSource);
        }
        let api = (self.loader)(&self.options)?;
        self.api = Some(Arc::clone(&api));

        let caps = DeviceCaps::from_api(api.as_ref());
        let config = negotiate::negotiate(request, &self.options, &caps)?;
        let builder = create_builder(api.as_ref())?;
        self.builder = Some(builder);

        let source = self.source.take().ok_or(AoError::NoSource)?;
        let context = CallbackContext::new(
            Arc::clone(&api),
            request.sample_rate,
            source,
            Arc::clone(&self.notifier),
        );
        config.apply(api.as_ref(), builder, context.binding());
        self.context = Some(context);
        self.config = Some(config);

        self.open()?;

        if let (Some(context), Some(format)) = (self.context.as_mut(), self.format.as_ref())
            && let Some(source) = context.source_mut()
        {
            source.prepare(format);
        }
        Ok(())
    }

    fn open(&mut self) -> Result<(), AoError> {
        let api = self.api.clone().ok_or(AoError::NotInitialized)?;
        let builder = self.builder.ok_or(AoError::NotInitialized)?;
        let stream = open_stream(api.as_ref(), builder)?;
        self.stream = Some(stream);

        let granted = match self.config.as_ref() {
            Some(config) => granted_layout(config, api.as_ref(), stream).map(|channels| {
                StreamFormat {
                    format: config.format.granted,
                    channels,
                    sample_rate: config.sample_rate,
                }
            }),
            None => Err(AoError::NotInitialized),
        };
        let format = match granted {
            Ok(format) => format,
            Err(e) => {
                self.close_stream();
                return Err(e);
            }
        };
        if let Some(previous) = &self.format
            && previous.channels != format.channels
        {
            let e = AoError::LayoutChanged {
                before: previous.channels.to_string(),
                after: format.channels.to_string(),
            };
            self.close_stream();
            return Err(e);
        }

        if let Some(context) = &self.context {
            context.set_frame_bytes(format.frame_bytes());
        }
        self.device_buffer = api.stream_buffer_capacity(stream);
        let rate = api.stream_sample_rate(stream);
        if i64::from(rate) != i64::from(format.sample_rate) {
            warn!(
                "AAudio granted {rate} Hz for a {} Hz stream",
                format.sample_rate
            );
        }
        debug!(
            "AAudio stream open: {} {} Hz {} ({}), burst {} frames, capacity {} frames",
            format.format,
            rate,
            format.channels,
            error_fmt::format_name(api.stream_format(stream)),
            api.stream_frames_per_burst(stream),
            self.device_buffer
        );

        self.format = Some(format);
        self.state = StreamState::Open;
        Ok(())
    }

    fn close_stream(&mut self) {
        if let Some(stream) = self.stream.take()
            && let Some(api) = &self.api
        {
            let result = api.stream_close(stream);
            if result < 0 {
                warn!("Failed to close stream: {}", api.result_text(result));
            }
        }
        self.state = StreamState::Closed;
    }

    fn transition(&mut self, transition: Transition) -> Result<(), AoError> {
        let api = self.api.clone().ok_or(AoError::NotInitialized)?;
        let stream = self.stream.ok_or(AoError::NotOpen)?;
        sync::request(
            api.as_ref(),
            stream,
            transition,
            self.options.state_timeout_nanos(),
        )
        .inspect_err(|e| error!("{e}"))
    }

    /// Start playback, reopening the stream after a `reset`.
    pub fn start(&mut self) -> Result<(), AoError> {
        self.settle_drain();
        match self.state {
            StreamState::Started => return Ok(()),
            StreamState::Closed => {
                if self.config.is_none() {
                    return Err(AoError::NotInitialized);
                }
                self.open().inspect_err(|e| error!("Failed to reopen stream: {e}"))?;
            }
            StreamState::Open | StreamState::Paused => {}
        }
        self.transition(Transition::Start)?;
        self.state = StreamState::Started;
        Ok(())
    }

    /// `Ok` only if the stream reached the requested state.
    pub fn set_pause(&mut self, paused: bool) -> Result<(), AoError> {
        self.settle_drain();
        match (paused, self.state) {
            (_, StreamState::Closed) => Err(AoError::NotOpen),
            (true, StreamState::Paused) | (false, StreamState::Started) => Ok(()),
            (true, StreamState::Open) => {
                self.state = StreamState::Paused;
                Ok(())
            }
            (true, StreamState::Started) => {
                self.transition(Transition::Pause)?;
                self.state = StreamState::Paused;
                Ok(())
            }
            (false, StreamState::Open | StreamState::Paused) => self.start(),
        }
    }

    /// Close the stream; the next `start` reopens it.
    pub fn reset(&mut self) -> Result<(), AoError> {
        self.close_stream();
        Ok(())
    }

    /// Close the stream, delete the builder, release the library. Idempotent.
    pub fn uninit(&mut self) {
        self.close_stream();
        if let Some(builder) = self.builder.take()
            && let Some(api) = &self.api
        {
            let result = api.builder_delete(builder);
            if result < 0 {
                warn!("Failed to delete stream builder: {}", api.result_text(result));
            }
        }
        if let Some(context) = self.context.take()
            && let Some(source) = context.into_source()
        {
            self.source = Some(source);
        }
        self.config = None;
        self.format = None;
        self.device_buffer = 0;
        self.api = None;
    }

    /// Tear down and hand back the source for the next driver instance.
    pub fn into_source(mut self) -> Option<Box<dyn AudioSource>> {
        self.uninit();
        self.source.take()
    }
}

impl Drop for HwDriver {
    fn drop(&mut self) {
        self.uninit();
    }
}

crate::impl_audio_output_for_driver!(HwDriver);
