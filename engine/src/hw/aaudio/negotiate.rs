use super::api::{AAudioApi, BuilderHandle, StreamHandle};
use super::chmap::{self, ChannelMap};
use super::ffi::{
    AAUDIO_CONTENT_TYPE_MOVIE, AAUDIO_CONTENT_TYPE_MUSIC, AAUDIO_DIRECTION_OUTPUT,
    AAUDIO_SHARING_MODE_EXCLUSIVE, AAUDIO_SHARING_MODE_SHARED, AAUDIO_USAGE_MEDIA, DataCallback,
    ErrorCallback, aaudio_channel_mask_t,
};
use super::format::{FormatChoice, SampleFormat, select_format};
use crate::error::AoError;
use crate::hw::options::AAudioOptions;
use std::os::raw::c_void;
use tracing::{debug, warn};

/// `AAudioStreamBuilder_setChannelMask`.
pub const CHANNEL_MASK_MIN_API_LEVEL: i32 = 32;
/// Content type, usage and session id.
pub const CONTENT_HINTS_MIN_API_LEVEL: i32 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitFlags {
    /// Ask for an exclusive (MMAP) stream.
    pub exclusive: bool,
    /// Playing music rather than a movie soundtrack.
    pub music_role: bool,
}

/// What the pipeline would like to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRequest {
    pub format: SampleFormat,
    pub channels: ChannelMap,
    pub sample_rate: u32,
    pub flags: InitFlags,
}

/// The parts of the bound API that change how a stream is negotiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCaps {
    pub api_level: i32,
    pub content_hints: bool,
    pub channel_mask: bool,
}

impl DeviceCaps {
    pub fn from_api(api: &dyn AAudioApi) -> Self {
        let api_level = api.api_level();
        Self {
            api_level,
            content_hints: api_level >= CONTENT_HINTS_MIN_API_LEVEL
                && api.has_tier(CONTENT_HINTS_MIN_API_LEVEL),
            channel_mask: api_level >= CHANNEL_MASK_MIN_API_LEVEL
                && api.has_tier(CHANNEL_MASK_MIN_API_LEVEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRequest {
    /// Exact layout; `layout` is in the order AAudio interleaves the mask.
    Mask {
        layout: ChannelMap,
        mask: aaudio_channel_mask_t,
    },
    /// Bare count; the layout is known only after the stream is open.
    Count(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentHints {
    pub content_type: i32,
    pub usage: i32,
    pub session_id: i32,
}

/// Callbacks and their context pointer, handed to the builder.
#[derive(Debug, Clone, Copy)]
pub struct CallbackBinding {
    pub data: DataCallback,
    pub error: ErrorCallback,
    pub user_data: *mut c_void,
}

/// Everything the builder is told before `openStream`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfiguration {
    pub format: FormatChoice,
    pub sample_rate: u32,
    pub channels: ChannelRequest,
    pub sharing_mode: i32,
    pub device_id: i32,
    pub buffer_capacity: i32,
    pub performance_mode: i32,
    pub hints: Option<ContentHints>,
}

impl StreamConfiguration {
    /// Configure `builder`; called once per builder.
    pub fn apply(&self, api: &dyn AAudioApi, builder: BuilderHandle, callbacks: CallbackBinding) {
        match &self.channels {
            ChannelRequest::Mask { mask, .. } => {
                if !api.builder_set_channel_mask(builder, *mask) {
                    warn!("Channel mask not bound, stream falls back to the default layout");
                }
            }
            ChannelRequest::Count(count) => api.builder_set_channel_count(builder, *count),
        }

        api.builder_set_device_id(builder, self.device_id);
        api.builder_set_direction(builder, AAUDIO_DIRECTION_OUTPUT);
        api.builder_set_sharing_mode(builder, self.sharing_mode);
        api.builder_set_format(builder, self.format.aaudio);
        api.builder_set_sample_rate(builder, self.sample_rate as i32);
        api.builder_set_error_callback(builder, callbacks.error, callbacks.user_data);
        api.builder_set_buffer_capacity(builder, self.buffer_capacity);
        api.builder_set_performance_mode(builder, self.performance_mode);
        api.builder_set_data_callback(builder, callbacks.data, callbacks.user_data);

        if let Some(hints) = self.hints {
            api.builder_set_content_type(builder, hints.content_type);
            api.builder_set_usage(builder, hints.usage);
            api.builder_set_session_id(builder, hints.session_id);
        }
    }
}

fn select_channels(request: &AudioRequest, caps: &DeviceCaps) -> Result<ChannelRequest, AoError> {
    if !caps.channel_mask {
        let count = i32::try_from(request.channels.len())
            .map_err(|_| AoError::InvalidRequest(format!("{} channels", request.channels.len())))?;
        return Ok(ChannelRequest::Count(count));
    }

    let candidates = chmap::mask_candidates();
    let no_map = || AoError::NoChannelMap(request.channels.to_string());
    let chosen = chmap::select_layout(&candidates, &request.channels)
        .and_then(|i| candidates.get(i))
        .ok_or_else(no_map)?;
    if !chosen.same_layout(request.channels.speakers()) {
        debug!(
            "Closest mask layout to {} is {}, not an exact match",
            request.channels, chosen
        );
        return Err(no_map());
    }
    let entry = chmap::mask_for_layout(chosen).ok_or_else(no_map)?;
    // AAudio interleaves a mask in ascending bit order, which is the table order.
    let layout = entry.layout();
    if layout != request.channels {
        debug!("Channel order {} becomes {}", request.channels, layout);
    }
    Ok(ChannelRequest::Mask {
        layout,
        mask: entry.mask,
    })
}

/// Pick format, channel layout and stream parameters for `request`.
pub fn negotiate(
    request: &AudioRequest,
    options: &AAudioOptions,
    caps: &DeviceCaps,
) -> Result<StreamConfiguration, AoError> {
    if request.sample_rate == 0 || i32::try_from(request.sample_rate).is_err() {
        return Err(AoError::InvalidRequest(format!(
            "sample rate {}",
            request.sample_rate
        )));
    }

    let format = select_format(request.format, caps.api_level);
    if format.granted != request.format {
        debug!("Format {} coerced to {}", request.format, format.granted);
    }
    let channels = select_channels(request, caps)?;

    let hints = caps.content_hints.then_some(ContentHints {
        content_type: if request.flags.music_role {
            AAUDIO_CONTENT_TYPE_MUSIC
        } else {
            AAUDIO_CONTENT_TYPE_MOVIE
        },
        usage: AAUDIO_USAGE_MEDIA,
        session_id: options.session_id,
    });

    Ok(StreamConfiguration {
        format,
        sample_rate: request.sample_rate,
        channels,
        sharing_mode: if request.flags.exclusive {
            AAUDIO_SHARING_MODE_EXCLUSIVE
        } else {
            AAUDIO_SHARING_MODE_SHARED
        },
        device_id: options.device_id,
        buffer_capacity: options.buffer_capacity,
        performance_mode: options.performance_mode.as_aaudio(),
        hints,
    })
}

pub fn create_builder(api: &dyn AAudioApi) -> Result<BuilderHandle, AoError> {
    api.create_stream_builder()
        .map_err(|result| AoError::Builder(api.result_text(result)))
}

pub fn open_stream(api: &dyn AAudioApi, builder: BuilderHandle) -> Result<StreamHandle, AoError> {
    api.open_stream(builder)
        .map_err(|result| AoError::Open(api.result_text(result)))
}

/// Layout the open stream actually plays.
pub fn granted_layout(
    config: &StreamConfiguration,
    api: &dyn AAudioApi,
    stream: StreamHandle,
) -> Result<ChannelMap, AoError> {
    match &config.channels {
        ChannelRequest::Mask { layout, .. } => Ok(layout.clone()),
        ChannelRequest::Count(_) => {
            let count = api.stream_channel_count(stream);
            chmap::default_layout_for_count(count).ok_or(AoError::UnknownChannelCount(count))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::aaudio::ffi::{
        AAUDIO_CHANNEL_5POINT1_SIDE, AAUDIO_CHANNEL_STEREO, AAUDIO_FORMAT_PCM_FLOAT,
        AAUDIO_FORMAT_PCM_I16, AAUDIO_PERFORMANCE_MODE_NONE, AAUDIO_SESSION_ID_NONE,
        AAUDIO_UNSPECIFIED,
    };

    fn caps(api_level: i32) -> DeviceCaps {
        DeviceCaps {
            api_level,
            content_hints: api_level >= CONTENT_HINTS_MIN_API_LEVEL,
            channel_mask: api_level >= CHANNEL_MASK_MIN_API_LEVEL,
        }
    }

    fn request(format: SampleFormat, channels: &str, sample_rate: u32) -> AudioRequest {
        AudioRequest {
            format,
            channels: channels.parse().unwrap(),
            sample_rate,
            flags: InitFlags::default(),
        }
    }

    #[test]
    fn float_stereo_uses_mask_on_new_devices() {
        let config = negotiate(
            &request(SampleFormat::Float, "stereo", 48_000),
            &AAudioOptions::default(),
            &caps(34),
        )
        .unwrap();
        assert_eq!(config.format.aaudio, AAUDIO_FORMAT_PCM_FLOAT);
        assert_eq!(config.format.granted, SampleFormat::Float);
        assert_eq!(
            config.channels,
            ChannelRequest::Mask {
                layout: ChannelMap::stereo(),
                mask: AAUDIO_CHANNEL_STEREO
            }
        );
        assert_eq!(config.sample_rate, 48_000);
    }

    #[test]
    fn old_devices_request_a_count() {
        let config = negotiate(
            &request(SampleFormat::S32, "mono", 44_100),
            &AAudioOptions::default(),
            &caps(30),
        )
        .unwrap();
        assert_eq!(config.format.aaudio, AAUDIO_FORMAT_PCM_I16);
        assert_eq!(config.format.granted, SampleFormat::S16);
        assert_eq!(config.channels, ChannelRequest::Count(1));
    }

    #[test]
    fn reordered_layout_is_granted_in_mask_order() {
        let config = negotiate(
            &request(SampleFormat::S16, "fl-fr-lfe-fc-sr-sl", 48_000),
            &AAudioOptions::default(),
            &caps(32),
        )
        .unwrap();
        assert_eq!(
            config.channels,
            ChannelRequest::Mask {
                layout: "5.1(side)".parse().unwrap(),
                mask: AAUDIO_CHANNEL_5POINT1_SIDE
            }
        );
    }

    #[test]
    fn approximate_layout_is_rejected() {
        let err = negotiate(
            &request(SampleFormat::Float, "fl-fr-fc-bl-br-bc", 48_000),
            &AAudioOptions::default(),
            &caps(33),
        )
        .unwrap_err();
        assert!(matches!(err, AoError::NoChannelMap(_)));
        assert!(err.is_negotiation());
    }

    #[test]
    fn every_table_layout_negotiates_exactly() {
        for entry in chmap::MASK_LAYOUTS {
            let req = AudioRequest {
                format: SampleFormat::Float,
                channels: entry.layout(),
                sample_rate: 48_000,
                flags: InitFlags::default(),
            };
            let config = negotiate(&req, &AAudioOptions::default(), &caps(32)).unwrap();
            assert_eq!(
                config.channels,
                ChannelRequest::Mask {
                    layout: entry.layout(),
                    mask: entry.mask
                }
            );
        }
    }

    #[test]
    fn hints_follow_flags_and_level() {
        let mut req = request(SampleFormat::S16, "stereo", 48_000);
        let options = AAudioOptions::default();

        assert_eq!(negotiate(&req, &options, &caps(27)).unwrap().hints, None);

        req.flags.music_role = true;
        req.flags.exclusive = true;
        let config = negotiate(&req, &options, &caps(28)).unwrap();
        assert_eq!(
            config.hints,
            Some(ContentHints {
                content_type: AAUDIO_CONTENT_TYPE_MUSIC,
                usage: AAUDIO_USAGE_MEDIA,
                session_id: AAUDIO_SESSION_ID_NONE,
            })
        );
        assert_eq!(config.sharing_mode, AAUDIO_SHARING_MODE_EXCLUSIVE);
    }

    #[test]
    fn options_are_passed_through() {
        let mut options = AAudioOptions::default();
        options
            .apply_pairs(["device-id=3", "buffer-capacity=960"])
            .unwrap();
        let config =
            negotiate(&request(SampleFormat::S16, "stereo", 48_000), &options, &caps(26)).unwrap();
        assert_eq!(config.device_id, 3);
        assert_eq!(config.buffer_capacity, 960);
        assert_eq!(config.performance_mode, AAUDIO_PERFORMANCE_MODE_NONE);
        assert_eq!(config.sharing_mode, AAUDIO_SHARING_MODE_SHARED);

        let config = negotiate(
            &request(SampleFormat::S16, "stereo", 48_000),
            &AAudioOptions::default(),
            &caps(26),
        )
        .unwrap();
        assert_eq!(config.device_id, AAUDIO_UNSPECIFIED);
    }

    #[test]
    fn zero_rate_is_rejected() {
        let err = negotiate(
            &request(SampleFormat::S16, "stereo", 0),
            &AAudioOptions::default(),
            &caps(30),
        )
        .unwrap_err();
        assert!(matches!(err, AoError::InvalidRequest(_)));
    }
}
