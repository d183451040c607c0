use thiserror::Error;

/// Errors surfaced by the AAudio output driver.
///
/// Capability and negotiation failures abort `init`; transport failures
/// leave the driver in its last good state.
#[derive(Debug, Error)]
pub enum AoError {
    // ===== Capability failures =====
    /// The shared audio library could not be opened
    #[error("failed to load {library}: {reason}")]
    LibraryLoad {
        /// Library name or path
        library: String,
        /// Loader diagnostic
        reason: String,
    },

    /// A mandatory entry point of a bound tier is missing
    #[error("could not resolve symbol {symbol} (API level {api_level})")]
    MissingSymbol {
        /// Unresolved symbol name
        symbol: &'static str,
        /// Detected API level
        api_level: i32,
    },

    /// Device API level is below the first capability tier
    #[error("AAudio requires API level {required}, device reports {api_level}")]
    UnsupportedApiLevel {
        /// Detected API level
        api_level: i32,
        /// Lowest supported level
        required: i32,
    },

    /// The device API level could not be determined
    #[error("unable to determine device API level")]
    UnknownApiLevel,

    // ===== Negotiation failures =====
    /// The stream builder could not be created
    #[error("failed to create stream builder: {0}")]
    Builder(String),

    /// No channel layout could be matched against the requested one
    #[error("failed to find channel map for {0}")]
    NoChannelMap(String),

    /// The OS granted a channel count without a canonical layout
    #[error("unknown layout for channel count: {0}")]
    UnknownChannelCount(i32),

    /// A reopened stream granted a different layout than the first open
    #[error("channel layout changed on reopen: {before} -> {after}")]
    LayoutChanged {
        /// Layout granted by the first open
        before: String,
        /// Layout granted by the reopen
        after: String,
    },

    /// The stream could not be opened
    #[error("failed to open stream: {0}")]
    Open(String),

    /// The request itself cannot be served
    #[error("invalid audio request: {0}")]
    InvalidRequest(String),

    // ===== Transport failures =====
    /// A state-change request or its confirmation failed
    #[error("failed to {op} stream: {text}")]
    Transport {
        /// Operation name (start, pause)
        op: &'static str,
        /// OS diagnostic text
        text: String,
    },

    /// Operation needs an open stream
    #[error("stream is not open")]
    NotOpen,

    /// Operation needs a successful `init`
    #[error("driver is not initialized")]
    NotInitialized,

    /// The pull source was already handed over
    #[error("no audio source attached to driver")]
    NoSource,

    // ===== Configuration =====
    /// Unknown option key
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// Option value failed to parse
    #[error("invalid value for option {key}: {value}")]
    InvalidOption {
        /// Option key
        key: String,
        /// Offending value
        value: String,
    },

    /// Options profile could not be read or parsed
    #[error("failed to read options profile {path}: {reason}")]
    Profile {
        /// Profile path
        path: String,
        /// Underlying diagnostic
        reason: String,
    },
}

impl AoError {
    /// Whether this failure happened while binding the capability set.
    pub fn is_capability(&self) -> bool {
        matches!(
            self,
            Self::LibraryLoad { .. }
                | Self::MissingSymbol { .. }
                | Self::UnsupportedApiLevel { .. }
                | Self::UnknownApiLevel
        )
    }

    /// Whether this failure happened while negotiating or opening the stream.
    pub fn is_negotiation(&self) -> bool {
        matches!(
            self,
            Self::Builder(_)
                | Self::NoChannelMap(_)
                | Self::UnknownChannelCount(_)
                | Self::LayoutChanged { .. }
                | Self::Open(_)
                | Self::InvalidRequest(_)
        )
    }
}
