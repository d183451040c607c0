pub mod aaudio;
pub mod config;
pub mod error_fmt;
pub mod latency;
pub mod options;
pub mod traits;
