pub const OPTIONS_PREFIX: &str = "aaudio-";
pub const PROFILE_ENV: &str = "AAUDIO_PROFILE";
pub const OPTION_ENV_PREFIX: &str = "AAUDIO_";

/// Environment variable carrying the option `key`, e.g. `device-id` -> `AAUDIO_DEVICE_ID`.
pub fn env_key(key: &str) -> String {
    let key = key.strip_prefix(OPTIONS_PREFIX).unwrap_or(key);
    format!(
        "{OPTION_ENV_PREFIX}{}",
        key.replace('-', "_").to_ascii_uppercase()
    )
}

pub fn env_value(key: &str) -> Option<String> {
    std::env::var(env_key(key))
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_key_strips_prefix_and_uppercases() {
        assert_eq!(env_key("device-id"), "AAUDIO_DEVICE_ID");
        assert_eq!(env_key("aaudio-performance-mode"), "AAUDIO_PERFORMANCE_MODE");
    }
}
