//! Raw AAudio types and constants (`<aaudio/AAudio.h>`).
//!
//! Nothing here is linked at build time; entry points are bound at runtime
//! by the capability prober.

#![allow(non_camel_case_types)]

use std::os::raw::c_void;

#[repr(C)]
pub struct AAudioStreamBuilder {
    _private: [u8; 0],
}

#[repr(C)]
pub struct AAudioStream {
    _private: [u8; 0],
}

pub type aaudio_result_t = i32;
pub type aaudio_format_t = i32;
pub type aaudio_stream_state_t = i32;
pub type aaudio_channel_mask_t = u32;
pub type aaudio_data_callback_result_t = i32;

pub type DataCallback = unsafe extern "C" fn(
    stream: *mut AAudioStream,
    user_data: *mut c_void,
    audio_data: *mut c_void,
    num_frames: i32,
) -> aaudio_data_callback_result_t;

pub type ErrorCallback =
    unsafe extern "C" fn(stream: *mut AAudioStream, user_data: *mut c_void, error: aaudio_result_t);

pub const AAUDIO_UNSPECIFIED: i32 = 0;

// Results
pub const AAUDIO_OK: aaudio_result_t = 0;
pub const AAUDIO_ERROR_BASE: aaudio_result_t = -900;
pub const AAUDIO_ERROR_DISCONNECTED: aaudio_result_t = -899;
pub const AAUDIO_ERROR_ILLEGAL_ARGUMENT: aaudio_result_t = -898;
pub const AAUDIO_ERROR_INTERNAL: aaudio_result_t = -896;
pub const AAUDIO_ERROR_INVALID_STATE: aaudio_result_t = -895;
pub const AAUDIO_ERROR_INVALID_HANDLE: aaudio_result_t = -892;
pub const AAUDIO_ERROR_UNIMPLEMENTED: aaudio_result_t = -890;
pub const AAUDIO_ERROR_UNAVAILABLE: aaudio_result_t = -889;
pub const AAUDIO_ERROR_NO_FREE_HANDLES: aaudio_result_t = -888;
pub const AAUDIO_ERROR_NO_MEMORY: aaudio_result_t = -887;
pub const AAUDIO_ERROR_NULL: aaudio_result_t = -886;
pub const AAUDIO_ERROR_TIMEOUT: aaudio_result_t = -885;
pub const AAUDIO_ERROR_WOULD_BLOCK: aaudio_result_t = -884;
pub const AAUDIO_ERROR_INVALID_FORMAT: aaudio_result_t = -883;
pub const AAUDIO_ERROR_OUT_OF_RANGE: aaudio_result_t = -882;
pub const AAUDIO_ERROR_NO_SERVICE: aaudio_result_t = -881;
pub const AAUDIO_ERROR_INVALID_RATE: aaudio_result_t = -880;

// Direction
pub const AAUDIO_DIRECTION_OUTPUT: i32 = 0;
pub const AAUDIO_DIRECTION_INPUT: i32 = 1;

// Format
pub const AAUDIO_FORMAT_INVALID: aaudio_format_t = -1;
pub const AAUDIO_FORMAT_UNSPECIFIED: aaudio_format_t = 0;
pub const AAUDIO_FORMAT_PCM_I16: aaudio_format_t = 1;
pub const AAUDIO_FORMAT_PCM_FLOAT: aaudio_format_t = 2;
pub const AAUDIO_FORMAT_PCM_I24_PACKED: aaudio_format_t = 3;
pub const AAUDIO_FORMAT_PCM_I32: aaudio_format_t = 4;
pub const AAUDIO_FORMAT_IEC61937: aaudio_format_t = 5;

// Sharing mode
pub const AAUDIO_SHARING_MODE_EXCLUSIVE: i32 = 0;
pub const AAUDIO_SHARING_MODE_SHARED: i32 = 1;

// Performance mode
pub const AAUDIO_PERFORMANCE_MODE_NONE: i32 = 10;
pub const AAUDIO_PERFORMANCE_MODE_POWER_SAVING: i32 = 11;
pub const AAUDIO_PERFORMANCE_MODE_LOW_LATENCY: i32 = 12;

// Data callback result
pub const AAUDIO_CALLBACK_RESULT_CONTINUE: aaudio_data_callback_result_t = 0;
pub const AAUDIO_CALLBACK_RESULT_STOP: aaudio_data_callback_result_t = 1;

// Content type / usage
pub const AAUDIO_CONTENT_TYPE_SPEECH: i32 = 1;
pub const AAUDIO_CONTENT_TYPE_MUSIC: i32 = 2;
pub const AAUDIO_CONTENT_TYPE_MOVIE: i32 = 3;
pub const AAUDIO_CONTENT_TYPE_SONIFICATION: i32 = 4;
pub const AAUDIO_USAGE_MEDIA: i32 = 1;

// Session
pub const AAUDIO_SESSION_ID_NONE: i32 = -1;
pub const AAUDIO_SESSION_ID_ALLOCATE: i32 = 0;

// Stream state
pub const AAUDIO_STREAM_STATE_UNINITIALIZED: aaudio_stream_state_t = 0;
pub const AAUDIO_STREAM_STATE_UNKNOWN: aaudio_stream_state_t = 1;
pub const AAUDIO_STREAM_STATE_OPEN: aaudio_stream_state_t = 2;
pub const AAUDIO_STREAM_STATE_STARTING: aaudio_stream_state_t = 3;
pub const AAUDIO_STREAM_STATE_STARTED: aaudio_stream_state_t = 4;
pub const AAUDIO_STREAM_STATE_PAUSING: aaudio_stream_state_t = 5;
pub const AAUDIO_STREAM_STATE_PAUSED: aaudio_stream_state_t = 6;
pub const AAUDIO_STREAM_STATE_FLUSHING: aaudio_stream_state_t = 7;
pub const AAUDIO_STREAM_STATE_FLUSHED: aaudio_stream_state_t = 8;
pub const AAUDIO_STREAM_STATE_STOPPING: aaudio_stream_state_t = 9;
pub const AAUDIO_STREAM_STATE_STOPPED: aaudio_stream_state_t = 10;
pub const AAUDIO_STREAM_STATE_CLOSING: aaudio_stream_state_t = 11;
pub const AAUDIO_STREAM_STATE_CLOSED: aaudio_stream_state_t = 12;
pub const AAUDIO_STREAM_STATE_DISCONNECTED: aaudio_stream_state_t = 13;

// Channel position bits
pub const AAUDIO_CHANNEL_INVALID: aaudio_channel_mask_t = u32::MAX;
pub const AAUDIO_CHANNEL_FRONT_LEFT: aaudio_channel_mask_t = 1 << 0;
pub const AAUDIO_CHANNEL_FRONT_RIGHT: aaudio_channel_mask_t = 1 << 1;
pub const AAUDIO_CHANNEL_FRONT_CENTER: aaudio_channel_mask_t = 1 << 2;
pub const AAUDIO_CHANNEL_LOW_FREQUENCY: aaudio_channel_mask_t = 1 << 3;
pub const AAUDIO_CHANNEL_BACK_LEFT: aaudio_channel_mask_t = 1 << 4;
pub const AAUDIO_CHANNEL_BACK_RIGHT: aaudio_channel_mask_t = 1 << 5;
pub const AAUDIO_CHANNEL_FRONT_LEFT_OF_CENTER: aaudio_channel_mask_t = 1 << 6;
pub const AAUDIO_CHANNEL_FRONT_RIGHT_OF_CENTER: aaudio_channel_mask_t = 1 << 7;
pub const AAUDIO_CHANNEL_BACK_CENTER: aaudio_channel_mask_t = 1 << 8;
pub const AAUDIO_CHANNEL_SIDE_LEFT: aaudio_channel_mask_t = 1 << 9;
pub const AAUDIO_CHANNEL_SIDE_RIGHT: aaudio_channel_mask_t = 1 << 10;
pub const AAUDIO_CHANNEL_TOP_CENTER: aaudio_channel_mask_t = 1 << 11;
pub const AAUDIO_CHANNEL_TOP_FRONT_LEFT: aaudio_channel_mask_t = 1 << 12;
pub const AAUDIO_CHANNEL_TOP_FRONT_CENTER: aaudio_channel_mask_t = 1 << 13;
pub const AAUDIO_CHANNEL_TOP_FRONT_RIGHT: aaudio_channel_mask_t = 1 << 14;
pub const AAUDIO_CHANNEL_TOP_BACK_LEFT: aaudio_channel_mask_t = 1 << 15;
pub const AAUDIO_CHANNEL_TOP_BACK_CENTER: aaudio_channel_mask_t = 1 << 16;
pub const AAUDIO_CHANNEL_TOP_BACK_RIGHT: aaudio_channel_mask_t = 1 << 17;
pub const AAUDIO_CHANNEL_TOP_SIDE_LEFT: aaudio_channel_mask_t = 1 << 18;
pub const AAUDIO_CHANNEL_TOP_SIDE_RIGHT: aaudio_channel_mask_t = 1 << 19;
pub const AAUDIO_CHANNEL_BOTTOM_FRONT_LEFT: aaudio_channel_mask_t = 1 << 20;
pub const AAUDIO_CHANNEL_BOTTOM_FRONT_CENTER: aaudio_channel_mask_t = 1 << 21;
pub const AAUDIO_CHANNEL_BOTTOM_FRONT_RIGHT: aaudio_channel_mask_t = 1 << 22;
pub const AAUDIO_CHANNEL_LOW_FREQUENCY_2: aaudio_channel_mask_t = 1 << 23;
pub const AAUDIO_CHANNEL_FRONT_WIDE_LEFT: aaudio_channel_mask_t = 1 << 24;
pub const AAUDIO_CHANNEL_FRONT_WIDE_RIGHT: aaudio_channel_mask_t = 1 << 25;

// Channel masks
pub const AAUDIO_CHANNEL_MONO: aaudio_channel_mask_t = AAUDIO_CHANNEL_FRONT_LEFT;
pub const AAUDIO_CHANNEL_STEREO: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_FRONT_LEFT | AAUDIO_CHANNEL_FRONT_RIGHT;
pub const AAUDIO_CHANNEL_2POINT1: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_STEREO | AAUDIO_CHANNEL_LOW_FREQUENCY;
pub const AAUDIO_CHANNEL_TRI: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_STEREO | AAUDIO_CHANNEL_FRONT_CENTER;
pub const AAUDIO_CHANNEL_TRI_BACK: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_STEREO | AAUDIO_CHANNEL_BACK_CENTER;
pub const AAUDIO_CHANNEL_3POINT1: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_TRI | AAUDIO_CHANNEL_LOW_FREQUENCY;
pub const AAUDIO_CHANNEL_2POINT0POINT2: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_STEREO | AAUDIO_CHANNEL_TOP_SIDE_LEFT | AAUDIO_CHANNEL_TOP_SIDE_RIGHT;
pub const AAUDIO_CHANNEL_2POINT1POINT2: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_2POINT0POINT2 | AAUDIO_CHANNEL_LOW_FREQUENCY;
pub const AAUDIO_CHANNEL_3POINT0POINT2: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_2POINT0POINT2 | AAUDIO_CHANNEL_FRONT_CENTER;
pub const AAUDIO_CHANNEL_3POINT1POINT2: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_3POINT0POINT2 | AAUDIO_CHANNEL_LOW_FREQUENCY;
pub const AAUDIO_CHANNEL_QUAD: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_STEREO | AAUDIO_CHANNEL_BACK_LEFT | AAUDIO_CHANNEL_BACK_RIGHT;
pub const AAUDIO_CHANNEL_QUAD_SIDE: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_STEREO | AAUDIO_CHANNEL_SIDE_LEFT | AAUDIO_CHANNEL_SIDE_RIGHT;
pub const AAUDIO_CHANNEL_SURROUND: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_TRI | AAUDIO_CHANNEL_BACK_CENTER;
pub const AAUDIO_CHANNEL_PENTA: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_QUAD | AAUDIO_CHANNEL_FRONT_CENTER;
pub const AAUDIO_CHANNEL_5POINT1: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_PENTA | AAUDIO_CHANNEL_LOW_FREQUENCY;
pub const AAUDIO_CHANNEL_5POINT1_SIDE: aaudio_channel_mask_t = AAUDIO_CHANNEL_3POINT1
    | AAUDIO_CHANNEL_SIDE_LEFT
    | AAUDIO_CHANNEL_SIDE_RIGHT;
pub const AAUDIO_CHANNEL_6POINT1: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_5POINT1 | AAUDIO_CHANNEL_BACK_CENTER;
pub const AAUDIO_CHANNEL_7POINT1: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_5POINT1 | AAUDIO_CHANNEL_SIDE_LEFT | AAUDIO_CHANNEL_SIDE_RIGHT;
pub const AAUDIO_CHANNEL_5POINT1POINT2: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_5POINT1 | AAUDIO_CHANNEL_TOP_SIDE_LEFT | AAUDIO_CHANNEL_TOP_SIDE_RIGHT;
pub const AAUDIO_CHANNEL_5POINT1POINT4: aaudio_channel_mask_t = AAUDIO_CHANNEL_5POINT1
    | AAUDIO_CHANNEL_TOP_FRONT_LEFT
    | AAUDIO_CHANNEL_TOP_FRONT_RIGHT
    | AAUDIO_CHANNEL_TOP_BACK_LEFT
    | AAUDIO_CHANNEL_TOP_BACK_RIGHT;
pub const AAUDIO_CHANNEL_7POINT1POINT2: aaudio_channel_mask_t =
    AAUDIO_CHANNEL_7POINT1 | AAUDIO_CHANNEL_TOP_SIDE_LEFT | AAUDIO_CHANNEL_TOP_SIDE_RIGHT;
pub const AAUDIO_CHANNEL_7POINT1POINT4: aaudio_channel_mask_t = AAUDIO_CHANNEL_7POINT1
    | AAUDIO_CHANNEL_TOP_FRONT_LEFT
    | AAUDIO_CHANNEL_TOP_FRONT_RIGHT
    | AAUDIO_CHANNEL_TOP_BACK_LEFT
    | AAUDIO_CHANNEL_TOP_BACK_RIGHT;
pub const AAUDIO_CHANNEL_9POINT1POINT4: aaudio_channel_mask_t = AAUDIO_CHANNEL_7POINT1POINT4
    | AAUDIO_CHANNEL_FRONT_WIDE_LEFT
    | AAUDIO_CHANNEL_FRONT_WIDE_RIGHT;
pub const AAUDIO_CHANNEL_9POINT1POINT6: aaudio_channel_mask_t = AAUDIO_CHANNEL_9POINT1POINT4
    | AAUDIO_CHANNEL_TOP_SIDE_LEFT
    | AAUDIO_CHANNEL_TOP_SIDE_RIGHT;

// clockid_t for AAudioStream_getTimestamp
pub const CLOCK_MONOTONIC: i32 = 1;
