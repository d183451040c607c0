use crate::hw::aaudio::ffi::*;

/// Symbolic name of an AAudio result code.
///
/// Used when `AAudio_convertResultToText` is not available or returns null.
pub fn result_name(code: aaudio_result_t) -> String {
    let name = match code {
        AAUDIO_OK => "AAUDIO_OK",
        AAUDIO_ERROR_BASE => "AAUDIO_ERROR_BASE",
        AAUDIO_ERROR_DISCONNECTED => "AAUDIO_ERROR_DISCONNECTED",
        AAUDIO_ERROR_ILLEGAL_ARGUMENT => "AAUDIO_ERROR_ILLEGAL_ARGUMENT",
        AAUDIO_ERROR_INTERNAL => "AAUDIO_ERROR_INTERNAL",
        AAUDIO_ERROR_INVALID_STATE => "AAUDIO_ERROR_INVALID_STATE",
        AAUDIO_ERROR_INVALID_HANDLE => "AAUDIO_ERROR_INVALID_HANDLE",
        AAUDIO_ERROR_UNIMPLEMENTED => "AAUDIO_ERROR_UNIMPLEMENTED",
        AAUDIO_ERROR_UNAVAILABLE => "AAUDIO_ERROR_UNAVAILABLE",
        AAUDIO_ERROR_NO_FREE_HANDLES => "AAUDIO_ERROR_NO_FREE_HANDLES",
        AAUDIO_ERROR_NO_MEMORY => "AAUDIO_ERROR_NO_MEMORY",
        AAUDIO_ERROR_NULL => "AAUDIO_ERROR_NULL",
        AAUDIO_ERROR_TIMEOUT => "AAUDIO_ERROR_TIMEOUT",
        AAUDIO_ERROR_WOULD_BLOCK => "AAUDIO_ERROR_WOULD_BLOCK",
        AAUDIO_ERROR_INVALID_FORMAT => "AAUDIO_ERROR_INVALID_FORMAT",
        AAUDIO_ERROR_OUT_OF_RANGE => "AAUDIO_ERROR_OUT_OF_RANGE",
        AAUDIO_ERROR_NO_SERVICE => "AAUDIO_ERROR_NO_SERVICE",
        AAUDIO_ERROR_INVALID_RATE => "AAUDIO_ERROR_INVALID_RATE",
        other => return format!("aaudio_result_t {other}"),
    };
    format!("{name} ({code})")
}

/// Symbolic name of an AAudio stream state.
pub fn state_name(state: aaudio_stream_state_t) -> String {
    let name = match state {
        AAUDIO_STREAM_STATE_UNINITIALIZED => "UNINITIALIZED",
        AAUDIO_STREAM_STATE_UNKNOWN => "UNKNOWN",
        AAUDIO_STREAM_STATE_OPEN => "OPEN",
        AAUDIO_STREAM_STATE_STARTING => "STARTING",
        AAUDIO_STREAM_STATE_STARTED => "STARTED",
        AAUDIO_STREAM_STATE_PAUSING => "PAUSING",
        AAUDIO_STREAM_STATE_PAUSED => "PAUSED",
        AAUDIO_STREAM_STATE_FLUSHING => "FLUSHING",
        AAUDIO_STREAM_STATE_FLUSHED => "FLUSHED",
        AAUDIO_STREAM_STATE_STOPPING => "STOPPING",
        AAUDIO_STREAM_STATE_STOPPED => "STOPPED",
        AAUDIO_STREAM_STATE_CLOSING => "CLOSING",
        AAUDIO_STREAM_STATE_CLOSED => "CLOSED",
        AAUDIO_STREAM_STATE_DISCONNECTED => "DISCONNECTED",
        other => return format!("aaudio_stream_state_t {other}"),
    };
    name.to_string()
}

/// Human-readable name of an AAudio sample format.
pub fn format_name(format: aaudio_format_t) -> &'static str {
    match format {
        AAUDIO_FORMAT_INVALID => "invalid",
        AAUDIO_FORMAT_UNSPECIFIED => "unspecified",
        AAUDIO_FORMAT_PCM_I16 => "pcm-i16",
        AAUDIO_FORMAT_PCM_FLOAT => "pcm-float",
        AAUDIO_FORMAT_PCM_I24_PACKED => "pcm-i24-packed",
        AAUDIO_FORMAT_PCM_I32 => "pcm-i32",
        AAUDIO_FORMAT_IEC61937 => "iec61937",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_are_named() {
        assert_eq!(
            result_name(AAUDIO_ERROR_DISCONNECTED),
            "AAUDIO_ERROR_DISCONNECTED (-899)"
        );
        assert_eq!(state_name(AAUDIO_STREAM_STATE_PAUSED), "PAUSED");
        assert_eq!(format_name(AAUDIO_FORMAT_PCM_I32), "pcm-i32");
    }

    #[test]
    fn unknown_codes_keep_their_value() {
        assert_eq!(result_name(-1234), "aaudio_result_t -1234");
        assert_eq!(state_name(99), "aaudio_stream_state_t 99");
    }
}
