use super::ffi::{
    AAUDIO_FORMAT_IEC61937, AAUDIO_FORMAT_PCM_FLOAT, AAUDIO_FORMAT_PCM_I16, AAUDIO_FORMAT_PCM_I32,
    aaudio_format_t,
};
use std::fmt;
use std::str::FromStr;

/// IEC61937 passthrough output.
pub const PASSTHROUGH_MIN_API_LEVEL: i32 = 34;
/// `AAUDIO_FORMAT_PCM_I32`.
pub const WIDE_INT_MIN_API_LEVEL: i32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpdifCodec {
    Ac3,
    Eac3,
    Dts,
    DtsHd,
    TrueHd,
    Aac,
    Mpeg,
}

/// Interleaved sample format as used by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    U8,
    S16,
    S24,
    S32,
    S64,
    Float,
    Double,
    Spdif(SpdifCodec),
}

impl SampleFormat {
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    pub fn is_int(self) -> bool {
        matches!(self, Self::U8 | Self::S16 | Self::S24 | Self::S32 | Self::S64)
    }

    pub fn is_spdif(self) -> bool {
        matches!(self, Self::Spdif(_))
    }

    /// Bytes per sample; IEC61937 frames are carried as 16-bit words.
    pub fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::S16 | Self::Spdif(_) => 2,
            Self::S24 => 3,
            Self::S32 | Self::Float => 4,
            Self::S64 | Self::Double => 8,
        }
    }
}

impl FromStr for SampleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "u8" => Self::U8,
            "s16" => Self::S16,
            "s24" => Self::S24,
            "s32" => Self::S32,
            "s64" => Self::S64,
            "float" => Self::Float,
            "double" => Self::Double,
            "spdif-ac3" => Self::Spdif(SpdifCodec::Ac3),
            "spdif-eac3" => Self::Spdif(SpdifCodec::Eac3),
            "spdif-dts" => Self::Spdif(SpdifCodec::Dts),
            "spdif-dtshd" => Self::Spdif(SpdifCodec::DtsHd),
            "spdif-truehd" => Self::Spdif(SpdifCodec::TrueHd),
            "spdif-aac" => Self::Spdif(SpdifCodec::Aac),
            "spdif-mp3" => Self::Spdif(SpdifCodec::Mpeg),
            other => return Err(format!("unknown sample format: {other}")),
        })
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::U8 => "u8",
            Self::S16 => "s16",
            Self::S24 => "s24",
            Self::S32 => "s32",
            Self::S64 => "s64",
            Self::Float => "float",
            Self::Double => "double",
            Self::Spdif(SpdifCodec::Ac3) => "spdif-ac3",
            Self::Spdif(SpdifCodec::Eac3) => "spdif-eac3",
            Self::Spdif(SpdifCodec::Dts) => "spdif-dts",
            Self::Spdif(SpdifCodec::DtsHd) => "spdif-dtshd",
            Self::Spdif(SpdifCodec::TrueHd) => "spdif-truehd",
            Self::Spdif(SpdifCodec::Aac) => "spdif-aac",
            Self::Spdif(SpdifCodec::Mpeg) => "spdif-mp3",
        })
    }
}

/// AAudio format for the stream plus the format the pipeline must deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChoice {
    pub aaudio: aaudio_format_t,
    pub granted: SampleFormat,
}

/// Passthrough, then float, then wide integer, then 16-bit.
pub fn select_format(requested: SampleFormat, api_level: i32) -> FormatChoice {
    if api_level >= PASSTHROUGH_MIN_API_LEVEL && requested.is_spdif() {
        FormatChoice {
            aaudio: AAUDIO_FORMAT_IEC61937,
            granted: requested,
        }
    } else if requested.is_float() {
        FormatChoice {
            aaudio: AAUDIO_FORMAT_PCM_FLOAT,
            granted: SampleFormat::Float,
        }
    } else if requested.is_int() && requested.bytes() > 2 && api_level >= WIDE_INT_MIN_API_LEVEL {
        FormatChoice {
            aaudio: AAUDIO_FORMAT_PCM_I32,
            granted: SampleFormat::S32,
        }
    } else {
        FormatChoice {
            aaudio: AAUDIO_FORMAT_PCM_I16,
            granted: SampleFormat::S16,
        }
    }
}
