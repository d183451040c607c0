//! Caller-thread confirmation of requested stream state changes.

use super::api::{AAudioApi, StreamHandle};
use super::ffi::{
    AAUDIO_STREAM_STATE_PAUSED, AAUDIO_STREAM_STATE_PAUSING, AAUDIO_STREAM_STATE_STARTED,
    AAUDIO_STREAM_STATE_STARTING, aaudio_stream_state_t,
};
use crate::error::AoError;
use tracing::debug;

// Spurious wakeups in a transient state are retried this many times.
const MAX_STATE_WAITS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Pause,
}

impl Transition {
    pub fn op(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
        }
    }

    fn transient(self) -> aaudio_stream_state_t {
        match self {
            Self::Start => AAUDIO_STREAM_STATE_STARTING,
            Self::Pause => AAUDIO_STREAM_STATE_PAUSING,
        }
    }

    fn target(self) -> aaudio_stream_state_t {
        match self {
            Self::Start => AAUDIO_STREAM_STATE_STARTED,
            Self::Pause => AAUDIO_STREAM_STATE_PAUSED,
        }
    }
}

/// Issue the request for `transition` and block until AAudio reports the final state.
pub fn request(
    api: &dyn AAudioApi,
    stream: StreamHandle,
    transition: Transition,
    timeout_nanos: i64,
) -> Result<(), AoError> {
    let transport = |text: String| AoError::Transport {
        op: transition.op(),
        text,
    };

    let result = match transition {
        Transition::Start => api.stream_request_start(stream),
        Transition::Pause => api.stream_request_pause(stream),
    };
    if result < 0 {
        return Err(transport(api.result_text(result)));
    }

    let mut state = transition.transient();
    for _ in 0..MAX_STATE_WAITS {
        let next = api
            .stream_wait_for_state_change(stream, state, timeout_nanos)
            .map_err(|result| transport(api.result_text(result)))?;
        if next == transition.target() {
            debug!("Stream {}", api.state_text(next));
            return Ok(());
        }
        if next != transition.transient() {
            return Err(transport(format!("stream is {}", api.state_text(next))));
        }
        state = next;
    }
    Err(transport(format!(
        "stream still {}",
        api.state_text(transition.transient())
    )))
}
