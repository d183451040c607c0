//! Version-gated AAudio entry points.
//!
//! AAudio grows by API level: every tier lists the symbols guaranteed from
//! its minimum level onward. Probing binds every tier up to the detected
//! level, or nothing at all.

use super::ffi::{AAudioStream, AAudioStreamBuilder, DataCallback, ErrorCallback};
use crate::error::AoError;
use std::collections::HashMap;
use std::os::raw::{c_char, c_void};
use tracing::{debug, warn};

/// Named entry points available from `min_api_level` onward.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityTier {
    pub min_api_level: i32,
    pub symbols: &'static [&'static str],
}

/// Looks a symbol up by name.
pub trait SymbolResolver {
    fn resolve(&self, symbol: &str) -> Option<*mut c_void>;
}

impl SymbolResolver for HashMap<&'static str, usize> {
    fn resolve(&self, symbol: &str) -> Option<*mut c_void> {
        self.get(symbol).map(|addr| *addr as *mut c_void)
    }
}

/// Every symbol of every tier at or below `api_level`, resolved.
#[derive(Debug, Clone, Default)]
pub struct BoundCapabilities {
    api_level: i32,
    symbols: HashMap<&'static str, usize>,
}

impl BoundCapabilities {
    pub fn api_level(&self) -> i32 {
        self.api_level
    }

    pub fn address(&self, symbol: &str) -> Option<*mut c_void> {
        self.symbols.get(symbol).map(|addr| *addr as *mut c_void)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Bind every tier whose minimum level is at or below `api_level`.
///
/// Fails on the first unresolved symbol; a partial set is never returned.
pub fn probe(
    api_level: i32,
    table: &[CapabilityTier],
    resolver: &dyn SymbolResolver,
) -> Result<BoundCapabilities, AoError> {
    let required = table.first().map(|tier| tier.min_api_level).unwrap_or(0);
    if table.is_empty() || api_level < required {
        return Err(AoError::UnsupportedApiLevel {
            api_level,
            required,
        });
    }

    let mut symbols = HashMap::new();
    for tier in table {
        if api_level < tier.min_api_level {
            break;
        }
        for &symbol in tier.symbols {
            let Some(addr) = resolver.resolve(symbol).filter(|addr| !addr.is_null()) else {
                warn!("Could not resolve symbol {symbol}");
                return Err(AoError::MissingSymbol { symbol, api_level });
            };
            symbols.insert(symbol, addr as usize);
        }
        debug!(
            "Bound AAudio tier {} ({} symbols)",
            tier.min_api_level,
            tier.symbols.len()
        );
    }

    Ok(BoundCapabilities { api_level, symbols })
}

macro_rules! aaudio_tiers {
    ($(
        $(#[$meta:meta])*
        $tier:ident = $level:literal {
            $( $field:ident = $sym:literal : fn($($arg:ty),*) -> $ret:ty; )*
        }
    )*) => {
        /// Capability table, ascending by minimum API level.
        pub const CAPABILITY_TABLE: &[CapabilityTier] = &[
            $( CapabilityTier { min_api_level: $level, symbols: &[$($sym),*] }, )*
        ];

        $(
            $(#[$meta])*
            #[derive(Clone, Copy)]
            pub struct $tier {
                $( pub $field: unsafe extern "C" fn($($arg),*) -> $ret, )*
            }

            impl $tier {
                pub const MIN_API_LEVEL: i32 = $level;

                /// Typed view of this tier, or `None` if any of its symbols is unbound.
                pub fn bind(caps: &BoundCapabilities) -> Option<Self> {
                    Some(Self {
                        $( $field: {
                            let addr = caps.address($sym)?;
                            // SAFETY: the address was resolved for this exact symbol,
                            // whose C prototype is the declared signature.
                            unsafe {
                                std::mem::transmute::<*mut c_void, unsafe extern "C" fn($($arg),*) -> $ret>(addr)
                            }
                        }, )*
                    })
                }
            }
        )*
    };
}

aaudio_tiers! {
    /// Core builder and stream API (Android 8.0).
    Tier26 = 26 {
        convert_result_to_text = "AAudio_convertResultToText": fn(i32) -> *const c_char;
        convert_stream_state_to_text = "AAudio_convertStreamStateToText": fn(i32) -> *const c_char;
        create_stream_builder = "AAudio_createStreamBuilder": fn(*mut *mut AAudioStreamBuilder) -> i32;
        builder_set_device_id = "AAudioStreamBuilder_setDeviceId": fn(*mut AAudioStreamBuilder, i32) -> ();
        builder_set_sample_rate = "AAudioStreamBuilder_setSampleRate": fn(*mut AAudioStreamBuilder, i32) -> ();
        builder_set_channel_count = "AAudioStreamBuilder_setChannelCount": fn(*mut AAudioStreamBuilder, i32) -> ();
        builder_set_format = "AAudioStreamBuilder_setFormat": fn(*mut AAudioStreamBuilder, i32) -> ();
        builder_set_sharing_mode = "AAudioStreamBuilder_setSharingMode": fn(*mut AAudioStreamBuilder, i32) -> ();
        builder_set_direction = "AAudioStreamBuilder_setDirection": fn(*mut AAudioStreamBuilder, i32) -> ();
        builder_set_buffer_capacity_in_frames = "AAudioStreamBuilder_setBufferCapacityInFrames": fn(*mut AAudioStreamBuilder, i32) -> ();
        builder_set_performance_mode = "AAudioStreamBuilder_setPerformanceMode": fn(*mut AAudioStreamBuilder, i32) -> ();
        builder_set_data_callback = "AAudioStreamBuilder_setDataCallback": fn(*mut AAudioStreamBuilder, Option<DataCallback>, *mut c_void) -> ();
        builder_set_error_callback = "AAudioStreamBuilder_setErrorCallback": fn(*mut AAudioStreamBuilder, Option<ErrorCallback>, *mut c_void) -> ();
        builder_open_stream = "AAudioStreamBuilder_openStream": fn(*mut AAudioStreamBuilder, *mut *mut AAudioStream) -> i32;
        builder_delete = "AAudioStreamBuilder_delete": fn(*mut AAudioStreamBuilder) -> i32;
        stream_close = "AAudioStream_close": fn(*mut AAudioStream) -> i32;
        stream_request_start = "AAudioStream_requestStart": fn(*mut AAudioStream) -> i32;
        stream_request_pause = "AAudioStream_requestPause": fn(*mut AAudioStream) -> i32;
        stream_get_state = "AAudioStream_getState": fn(*mut AAudioStream) -> i32;
        stream_wait_for_state_change = "AAudioStream_waitForStateChange": fn(*mut AAudioStream, i32, *mut i32, i64) -> i32;
        stream_get_buffer_capacity_in_frames = "AAudioStream_getBufferCapacityInFrames": fn(*mut AAudioStream) -> i32;
        stream_get_frames_per_burst = "AAudioStream_getFramesPerBurst": fn(*mut AAudioStream) -> i32;
        stream_get_x_run_count = "AAudioStream_getXRunCount": fn(*mut AAudioStream) -> i32;
        stream_get_sample_rate = "AAudioStream_getSampleRate": fn(*mut AAudioStream) -> i32;
        stream_get_channel_count = "AAudioStream_getChannelCount": fn(*mut AAudioStream) -> i32;
        stream_get_format = "AAudioStream_getFormat": fn(*mut AAudioStream) -> i32;
        stream_get_frames_written = "AAudioStream_getFramesWritten": fn(*mut AAudioStream) -> i64;
        stream_get_timestamp = "AAudioStream_getTimestamp": fn(*mut AAudioStream, i32, *mut i64, *mut i64) -> i32;
    }

    /// Usage, content type and session id (Android 9).
    Tier28 = 28 {
        builder_set_usage = "AAudioStreamBuilder_setUsage": fn(*mut AAudioStreamBuilder, i32) -> ();
        builder_set_content_type = "AAudioStreamBuilder_setContentType": fn(*mut AAudioStreamBuilder, i32) -> ();
        builder_set_session_id = "AAudioStreamBuilder_setSessionId": fn(*mut AAudioStreamBuilder, i32) -> ();
        stream_get_session_id = "AAudioStream_getSessionId": fn(*mut AAudioStream) -> i32;
    }

    /// Explicit channel masks (Android 12L).
    Tier32 = 32 {
        builder_set_channel_mask = "AAudioStreamBuilder_setChannelMask": fn(*mut AAudioStreamBuilder, u32) -> ();
        stream_get_channel_mask = "AAudioStream_getChannelMask": fn(*mut AAudioStream) -> u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_with_all(upto: i32) -> HashMap<&'static str, usize> {
        let mut map = HashMap::new();
        let mut addr = 0x1000usize;
        for tier in CAPABILITY_TABLE {
            if tier.min_api_level > upto {
                break;
            }
            for &symbol in tier.symbols {
                map.insert(symbol, addr);
                addr += 0x10;
            }
        }
        map
    }

    #[test]
    fn table_is_ascending() {
        let levels: Vec<i32> = CAPABILITY_TABLE.iter().map(|t| t.min_api_level).collect();
        let mut sorted = levels.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(levels, sorted);
    }

    #[test]
    fn binds_only_tiers_up_to_level() {
        let resolver = resolver_with_all(i32::MAX);
        let caps = probe(30, CAPABILITY_TABLE, &resolver).unwrap();

        assert_eq!(caps.api_level(), 30);
        assert!(caps.contains("AAudioStream_getTimestamp"));
        assert!(caps.contains("AAudioStreamBuilder_setSessionId"));
        assert!(!caps.contains("AAudioStreamBuilder_setChannelMask"));
        assert!(Tier26::bind(&caps).is_some());
        assert!(Tier28::bind(&caps).is_some());
        assert!(Tier32::bind(&caps).is_none());
    }

    #[test]
    fn every_bound_tier_is_complete_at_every_level() {
        let resolver = resolver_with_all(i32::MAX);
        for level in 26..=36 {
            let caps = probe(level, CAPABILITY_TABLE, &resolver).unwrap();
            let expected: usize = CAPABILITY_TABLE
                .iter()
                .filter(|t| t.min_api_level <= level)
                .map(|t| t.symbols.len())
                .sum();
            assert_eq!(caps.len(), expected, "level {level}");
        }
    }

    #[test]
    fn missing_mandatory_symbol_fails_whole_probe() {
        let mut resolver = resolver_with_all(28);
        resolver.remove("AAudioStreamBuilder_setUsage");

        let err = probe(28, CAPABILITY_TABLE, &resolver).unwrap_err();
        assert!(matches!(
            err,
            AoError::MissingSymbol {
                symbol: "AAudioStreamBuilder_setUsage",
                api_level: 28
            }
        ));
    }

    #[test]
    fn missing_symbol_above_level_is_ignored() {
        let resolver = resolver_with_all(28);
        let caps = probe(28, CAPABILITY_TABLE, &resolver).unwrap();
        assert!(Tier28::bind(&caps).is_some());
    }

    #[test]
    fn null_address_counts_as_unresolved() {
        let mut resolver = resolver_with_all(26);
        resolver.insert("AAudioStream_close", 0);
        assert!(probe(26, CAPABILITY_TABLE, &resolver).is_err());
    }

    #[test]
    fn level_below_first_tier_is_unsupported() {
        let resolver = resolver_with_all(i32::MAX);
        let err = probe(25, CAPABILITY_TABLE, &resolver).unwrap_err();
        assert!(err.is_capability());
        assert!(matches!(
            err,
            AoError::UnsupportedApiLevel {
                api_level: 25,
                required: 26
            }
        ));
    }
}
