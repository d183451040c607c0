use crate::error::AoError;
use crate::hw::aaudio::ffi::{
    AAUDIO_PERFORMANCE_MODE_LOW_LATENCY, AAUDIO_PERFORMANCE_MODE_NONE,
    AAUDIO_PERFORMANCE_MODE_POWER_SAVING, AAUDIO_SESSION_ID_ALLOCATE, AAUDIO_SESSION_ID_NONE,
    AAUDIO_UNSPECIFIED,
};
use crate::hw::config;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const OPTION_KEYS: &[&str] = &[
    "device-id",
    "session-id",
    "buffer-capacity",
    "performance-mode",
    "api-level",
    "state-timeout-ms",
    "library",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerformanceMode {
    #[default]
    None,
    LowLatency,
    PowerSaving,
}

impl PerformanceMode {
    pub fn as_aaudio(self) -> i32 {
        match self {
            Self::None => AAUDIO_PERFORMANCE_MODE_NONE,
            Self::LowLatency => AAUDIO_PERFORMANCE_MODE_LOW_LATENCY,
            Self::PowerSaving => AAUDIO_PERFORMANCE_MODE_POWER_SAVING,
        }
    }
}

impl FromStr for PerformanceMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "low-latency" => Ok(Self::LowLatency),
            "power-saving" => Ok(Self::PowerSaving),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::LowLatency => "low-latency",
            Self::PowerSaving => "power-saving",
        })
    }
}

/// Driver options (`aaudio-*`).
#[derive(Debug, Clone, PartialEq)]
pub struct AAudioOptions {
    /// `AAUDIO_UNSPECIFIED` lets the OS pick the device.
    pub device_id: i32,
    pub session_id: i32,
    /// Frames; `AAUDIO_UNSPECIFIED` lets the OS pick.
    pub buffer_capacity: i32,
    pub performance_mode: PerformanceMode,
    /// Overrides device API level detection.
    pub api_level: Option<i32>,
    /// `None` waits for state changes without a timeout.
    pub state_timeout: Option<Duration>,
    pub library: String,
}

impl Default for AAudioOptions {
    fn default() -> Self {
        Self {
            device_id: AAUDIO_UNSPECIFIED,
            session_id: AAUDIO_SESSION_ID_NONE,
            buffer_capacity: AAUDIO_UNSPECIFIED,
            performance_mode: PerformanceMode::None,
            api_level: None,
            state_timeout: None,
            library: "libaaudio.so".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Profile {
    #[serde(default)]
    aaudio: BTreeMap<String, toml::Value>,
}

fn invalid(key: &str, value: &str) -> AoError {
    AoError::InvalidOption {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_choice(
    key: &str,
    value: &str,
    choices: &[(&str, i32)],
    min: i32,
) -> Result<i32, AoError> {
    if let Some((_, v)) = choices.iter().find(|(name, _)| *name == value) {
        return Ok(*v);
    }
    match value.parse::<i32>() {
        Ok(v) if v >= min => Ok(v),
        _ => Err(invalid(key, value)),
    }
}

impl AAudioOptions {
    /// Defaults, then the TOML profile named by `AAUDIO_PROFILE`, then `AAUDIO_*` variables.
    pub fn load() -> Result<Self, AoError> {
        let mut options = Self::default();
        if let Ok(path) = std::env::var(config::PROFILE_ENV) {
            options.apply_profile(Path::new(&path))?;
        }
        options.apply_env()?;
        Ok(options)
    }

    /// Set one option; `key` may carry the `aaudio-` prefix.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), AoError> {
        let key = key.strip_prefix(config::OPTIONS_PREFIX).unwrap_or(key);
        let value = value.trim();
        match key {
            "device-id" => {
                self.device_id = parse_choice(key, value, &[("auto", AAUDIO_UNSPECIFIED)], 1)?;
            }
            "session-id" => {
                self.session_id = parse_choice(
                    key,
                    value,
                    &[
                        ("none", AAUDIO_SESSION_ID_NONE),
                        ("allocate", AAUDIO_SESSION_ID_ALLOCATE),
                    ],
                    1,
                )?;
            }
            "buffer-capacity" => {
                self.buffer_capacity =
                    parse_choice(key, value, &[("auto", AAUDIO_UNSPECIFIED)], 1)?;
            }
            "performance-mode" => {
                self.performance_mode = value.parse().map_err(|_| invalid(key, value))?;
            }
            "api-level" => {
                self.api_level = match parse_choice(key, value, &[("auto", 0)], 1)? {
                    0 => None,
                    level => Some(level),
                };
            }
            "state-timeout-ms" => {
                self.state_timeout = match value {
                    "inf" | "infinite" => None,
                    _ => {
                        let ms = value.parse::<u64>().map_err(|_| invalid(key, value))?;
                        Some(Duration::from_millis(ms))
                    }
                };
            }
            "library" => {
                if value.is_empty() {
                    return Err(invalid(key, value));
                }
                self.library = value.to_string();
            }
            _ => return Err(AoError::UnknownOption(key.to_string())),
        }
        Ok(())
    }

    /// Apply `key=value` pairs in order.
    pub fn apply_pairs<'a>(
        &mut self,
        pairs: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), AoError> {
        for pair in pairs {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| invalid(pair, ""))?;
            self.set(key.trim(), value)?;
        }
        Ok(())
    }

    pub fn apply_env(&mut self) -> Result<(), AoError> {
        for key in OPTION_KEYS {
            if let Some(value) = config::env_value(key) {
                self.set(key, &value)?;
            }
        }
        Ok(())
    }

    /// Read the `[aaudio]` table of a TOML profile.
    pub fn apply_profile(&mut self, path: &Path) -> Result<(), AoError> {
        let profile_err = |reason: String| AoError::Profile {
            path: path.display().to_string(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| profile_err(e.to_string()))?;
        let profile: Profile = toml::from_str(&text).map_err(|e| profile_err(e.to_string()))?;
        for (key, value) in profile.aaudio {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                other => return Err(invalid(&key, &other.to_string())),
            };
            self.set(&key, &value)?;
        }
        Ok(())
    }

    /// Timeout handed to `AAudioStream_waitForStateChange`.
    pub fn state_timeout_nanos(&self) -> i64 {
        self.state_timeout
            .map(|t| i64::try_from(t.as_nanos()).unwrap_or(i64::MAX))
            .unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_leave_everything_to_the_os() {
        let options = AAudioOptions::default();
        assert_eq!(options.device_id, AAUDIO_UNSPECIFIED);
        assert_eq!(options.session_id, AAUDIO_SESSION_ID_NONE);
        assert_eq!(options.buffer_capacity, AAUDIO_UNSPECIFIED);
        assert_eq!(options.performance_mode, PerformanceMode::None);
        assert_eq!(options.state_timeout_nanos(), i64::MAX);
    }

    #[test]
    fn parses_choices_and_integers() {
        let mut options = AAudioOptions::default();
        options
            .apply_pairs([
                "aaudio-device-id=7",
                "session-id=allocate",
                "buffer-capacity=4096",
                "performance-mode=low-latency",
                "api-level=31",
                "state-timeout-ms=250",
            ])
            .unwrap();

        assert_eq!(options.device_id, 7);
        assert_eq!(options.session_id, AAUDIO_SESSION_ID_ALLOCATE);
        assert_eq!(options.buffer_capacity, 4096);
        assert_eq!(
            options.performance_mode.as_aaudio(),
            AAUDIO_PERFORMANCE_MODE_LOW_LATENCY
        );
        assert_eq!(options.api_level, Some(31));
        assert_eq!(options.state_timeout_nanos(), 250_000_000);

        options.set("device-id", "auto").unwrap();
        options.set("api-level", "auto").unwrap();
        assert_eq!(options.device_id, AAUDIO_UNSPECIFIED);
        assert_eq!(options.api_level, None);
    }

    #[test]
    fn rejects_out_of_range_and_unknown() {
        let mut options = AAudioOptions::default();
        assert!(matches!(
            options.set("buffer-capacity", "0"),
            Err(AoError::InvalidOption { .. })
        ));
        assert!(options.set("performance-mode", "turbo").is_err());
        assert!(matches!(
            options.set("latency", "1"),
            Err(AoError::UnknownOption(_))
        ));
        assert!(options.apply_pairs(["device-id"]).is_err());
        assert_eq!(options, AAudioOptions::default());
    }

    #[test]
    fn reads_profile_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[aaudio]\nperformance-mode = \"power-saving\"\nbuffer-capacity = 1920\n"
        )
        .unwrap();

        let mut options = AAudioOptions::default();
        options.apply_profile(file.path()).unwrap();
        assert_eq!(options.performance_mode, PerformanceMode::PowerSaving);
        assert_eq!(options.buffer_capacity, 1920);
    }

    #[test]
    fn missing_profile_is_reported() {
        let mut options = AAudioOptions::default();
        let err = options
            .apply_profile(Path::new("/nonexistent/aaudio.toml"))
            .unwrap_err();
        assert!(matches!(err, AoError::Profile { .. }));
    }
}
