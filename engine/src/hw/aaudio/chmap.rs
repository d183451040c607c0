//! Speaker layouts AAudio can report by count or request by mask.
//!
//! AAudio does not document the speaker order of a mask. It is assumed to
//! follow `AudioFormat#channelPositionMask`, i.e. ascending bit order.

use super::ffi::*;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Speaker {
    Fl,
    Fr,
    Fc,
    Lfe,
    Bl,
    Br,
    Flc,
    Frc,
    Bc,
    Sl,
    Sr,
    Tc,
    Tfl,
    Tfc,
    Tfr,
    Tbl,
    Tbc,
    Tbr,
    Tsl,
    Tsr,
    Wl,
    Wr,
}

use Speaker::*;

const SPEAKER_NAMES: &[(Speaker, &str)] = &[
    (Fl, "fl"),
    (Fr, "fr"),
    (Fc, "fc"),
    (Lfe, "lfe"),
    (Bl, "bl"),
    (Br, "br"),
    (Flc, "flc"),
    (Frc, "frc"),
    (Bc, "bc"),
    (Sl, "sl"),
    (Sr, "sr"),
    (Tc, "tc"),
    (Tfl, "tfl"),
    (Tfc, "tfc"),
    (Tfr, "tfr"),
    (Tbl, "tbl"),
    (Tbc, "tbc"),
    (Tbr, "tbr"),
    (Tsl, "tsl"),
    (Tsr, "tsr"),
    (Wl, "wl"),
    (Wr, "wr"),
];

impl Speaker {
    /// AAudio position bit of this speaker.
    pub fn mask_bit(self) -> aaudio_channel_mask_t {
        match self {
            Fl => AAUDIO_CHANNEL_FRONT_LEFT,
            Fr => AAUDIO_CHANNEL_FRONT_RIGHT,
            Fc => AAUDIO_CHANNEL_FRONT_CENTER,
            Lfe => AAUDIO_CHANNEL_LOW_FREQUENCY,
            Bl => AAUDIO_CHANNEL_BACK_LEFT,
            Br => AAUDIO_CHANNEL_BACK_RIGHT,
            Flc => AAUDIO_CHANNEL_FRONT_LEFT_OF_CENTER,
            Frc => AAUDIO_CHANNEL_FRONT_RIGHT_OF_CENTER,
            Bc => AAUDIO_CHANNEL_BACK_CENTER,
            Sl => AAUDIO_CHANNEL_SIDE_LEFT,
            Sr => AAUDIO_CHANNEL_SIDE_RIGHT,
            Tc => AAUDIO_CHANNEL_TOP_CENTER,
            Tfl => AAUDIO_CHANNEL_TOP_FRONT_LEFT,
            Tfc => AAUDIO_CHANNEL_TOP_FRONT_CENTER,
            Tfr => AAUDIO_CHANNEL_TOP_FRONT_RIGHT,
            Tbl => AAUDIO_CHANNEL_TOP_BACK_LEFT,
            Tbc => AAUDIO_CHANNEL_TOP_BACK_CENTER,
            Tbr => AAUDIO_CHANNEL_TOP_BACK_RIGHT,
            Tsl => AAUDIO_CHANNEL_TOP_SIDE_LEFT,
            Tsr => AAUDIO_CHANNEL_TOP_SIDE_RIGHT,
            Wl => AAUDIO_CHANNEL_FRONT_WIDE_LEFT,
            Wr => AAUDIO_CHANNEL_FRONT_WIDE_RIGHT,
        }
    }

    pub fn name(self) -> &'static str {
        SPEAKER_NAMES
            .iter()
            .find(|(s, _)| *s == self)
            .map(|(_, n)| *n)
            .unwrap_or("?")
    }
}

/// Ordered list of speaker positions, one per interleaved channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelMap {
    speakers: Vec<Speaker>,
}

impl ChannelMap {
    /// `None` if a speaker appears twice or the list is empty.
    pub fn new(speakers: &[Speaker]) -> Option<Self> {
        if speakers.is_empty() {
            return None;
        }
        for (i, s) in speakers.iter().enumerate() {
            if speakers[..i].contains(s) {
                return None;
            }
        }
        Some(Self {
            speakers: speakers.to_vec(),
        })
    }

    pub fn mono() -> Self {
        Self { speakers: vec![Fc] }
    }

    pub fn stereo() -> Self {
        Self {
            speakers: vec![Fl, Fr],
        }
    }

    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    pub fn contains(&self, speaker: Speaker) -> bool {
        self.speakers.contains(&speaker)
    }

    /// Same channel count and same position set, order ignored.
    pub fn same_layout(&self, other: &[Speaker]) -> bool {
        self.speakers.len() == other.len() && other.iter().all(|s| self.contains(*s))
    }

    fn overlap(&self, other: &[Speaker]) -> usize {
        other.iter().filter(|s| self.contains(**s)).count()
    }
}

impl fmt::Display for ChannelMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(entry) = MASK_LAYOUTS.iter().find(|e| self.speakers == e.speakers) {
            return f.write_str(entry.name);
        }
        let names: Vec<&str> = self.speakers.iter().map(|s| s.name()).collect();
        f.write_str(&names.join("-"))
    }
}

impl FromStr for ChannelMap {
    type Err = String;

    /// A layout name (`5.1(side)`), a channel count (`6`) or a speaker list (`fl-fr-lfe`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(entry) = MASK_LAYOUTS.iter().find(|e| e.name == s) {
            return Ok(entry.layout());
        }
        if let Ok(count) = s.parse::<i32>() {
            return default_layout_for_count(count)
                .ok_or_else(|| format!("no default layout for {count} channels"));
        }
        let mut speakers = Vec::new();
        for name in s.split('-') {
            let speaker = SPEAKER_NAMES
                .iter()
                .find(|(_, n)| *n == name)
                .map(|(sp, _)| *sp)
                .ok_or_else(|| format!("unknown speaker: {name}"))?;
            speakers.push(speaker);
        }
        ChannelMap::new(&speakers).ok_or_else(|| format!("invalid channel layout: {s}"))
    }
}

/// A layout that can be requested from AAudio by mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub name: &'static str,
    pub speakers: &'static [Speaker],
    pub mask: aaudio_channel_mask_t,
}

impl LayoutEntry {
    pub fn layout(&self) -> ChannelMap {
        ChannelMap {
            speakers: self.speakers.to_vec(),
        }
    }
}

const fn entry(
    name: &'static str,
    speakers: &'static [Speaker],
    mask: aaudio_channel_mask_t,
) -> LayoutEntry {
    LayoutEntry {
        name,
        speakers,
        mask,
    }
}

// Mono is carried on the center speaker internally; AAudio's mono mask is
// front left.
pub const MASK_LAYOUTS: &[LayoutEntry] = &[
    entry("mono", &[Fc], AAUDIO_CHANNEL_MONO),
    entry("stereo", &[Fl, Fr], AAUDIO_CHANNEL_STEREO),
    entry("2.1", &[Fl, Fr, Lfe], AAUDIO_CHANNEL_2POINT1),
    entry("3.0", &[Fl, Fr, Fc], AAUDIO_CHANNEL_TRI),
    entry("3.0(back)", &[Fl, Fr, Bc], AAUDIO_CHANNEL_TRI_BACK),
    entry("3.1", &[Fl, Fr, Fc, Lfe], AAUDIO_CHANNEL_3POINT1),
    entry("2.0.2", &[Fl, Fr, Tsl, Tsr], AAUDIO_CHANNEL_2POINT0POINT2),
    entry("2.1.2", &[Fl, Fr, Lfe, Tsl, Tsr], AAUDIO_CHANNEL_2POINT1POINT2),
    entry("3.0.2", &[Fl, Fr, Fc, Tsl, Tsr], AAUDIO_CHANNEL_3POINT0POINT2),
    entry("3.1.2", &[Fl, Fr, Fc, Lfe, Tsl, Tsr], AAUDIO_CHANNEL_3POINT1POINT2),
    entry("quad", &[Fl, Fr, Bl, Br], AAUDIO_CHANNEL_QUAD),
    entry("quad(side)", &[Fl, Fr, Sl, Sr], AAUDIO_CHANNEL_QUAD_SIDE),
    entry("4.0", &[Fl, Fr, Fc, Bc], AAUDIO_CHANNEL_SURROUND),
    entry("5.0", &[Fl, Fr, Fc, Bl, Br], AAUDIO_CHANNEL_PENTA),
    entry("5.1", &[Fl, Fr, Fc, Lfe, Bl, Br], AAUDIO_CHANNEL_5POINT1),
    entry("5.1(side)", &[Fl, Fr, Fc, Lfe, Sl, Sr], AAUDIO_CHANNEL_5POINT1_SIDE),
    entry("6.1", &[Fl, Fr, Fc, Lfe, Bl, Br, Bc], AAUDIO_CHANNEL_6POINT1),
    entry("7.1", &[Fl, Fr, Fc, Lfe, Bl, Br, Sl, Sr], AAUDIO_CHANNEL_7POINT1),
    entry(
        "5.1.2",
        &[Fl, Fr, Fc, Lfe, Bl, Br, Tsl, Tsr],
        AAUDIO_CHANNEL_5POINT1POINT2,
    ),
    entry(
        "5.1.4",
        &[Fl, Fr, Fc, Lfe, Bl, Br, Tfl, Tfr, Tbl, Tbr],
        AAUDIO_CHANNEL_5POINT1POINT4,
    ),
    entry(
        "7.1.2",
        &[Fl, Fr, Fc, Lfe, Bl, Br, Sl, Sr, Tsl, Tsr],
        AAUDIO_CHANNEL_7POINT1POINT2,
    ),
    entry(
        "7.1.4",
        &[Fl, Fr, Fc, Lfe, Bl, Br, Sl, Sr, Tfl, Tfr, Tbl, Tbr],
        AAUDIO_CHANNEL_7POINT1POINT4,
    ),
    entry(
        "9.1.4",
        &[Fl, Fr, Fc, Lfe, Bl, Br, Sl, Sr, Tfl, Tfr, Tbl, Tbr, Wl, Wr],
        AAUDIO_CHANNEL_9POINT1POINT4,
    ),
    entry(
        "9.1.6",
        &[
            Fl, Fr, Fc, Lfe, Bl, Br, Sl, Sr, Tfl, Tfr, Tbl, Tbr, Tsl, Tsr, Wl, Wr,
        ],
        AAUDIO_CHANNEL_9POINT1POINT6,
    ),
];

/// Layout AAudio implies for a bare channel count, indexed by count.
pub const COUNT_LAYOUTS: [Option<&[Speaker]>; 17] = [
    None,
    Some(&[Fc]),
    Some(&[Fl, Fr]),
    Some(&[Fl, Fr, Fc]),
    Some(&[Fl, Fr, Bl, Br]),
    Some(&[Fl, Fr, Fc, Bl, Br]),
    Some(&[Fl, Fr, Fc, Lfe, Bl, Br]),
    Some(&[Fl, Fr, Fc, Lfe, Bl, Br, Bc]),
    Some(&[Fl, Fr, Fc, Lfe, Bl, Br, Sl, Sr]),
    None,
    Some(&[Fl, Fr, Fc, Lfe, Bl, Br, Sl, Sr, Tsl, Tsr]),
    None,
    Some(&[Fl, Fr, Fc, Lfe, Bl, Br, Sl, Sr, Tfl, Tfr, Tbl, Tbr]),
    None,
    Some(&[Fl, Fr, Fc, Lfe, Bl, Br, Sl, Sr, Tfl, Tfr, Tbl, Tbr, Wl, Wr]),
    None,
    Some(&[
        Fl, Fr, Fc, Lfe, Bl, Br, Sl, Sr, Tfl, Tfr, Tbl, Tbr, Tsl, Tsr, Wl, Wr,
    ]),
];

pub fn default_layout_for_count(count: i32) -> Option<ChannelMap> {
    let index = usize::try_from(count).ok()?;
    COUNT_LAYOUTS.get(index).copied().flatten().map(|speakers| ChannelMap {
        speakers: speakers.to_vec(),
    })
}

pub fn mask_candidates() -> Vec<ChannelMap> {
    MASK_LAYOUTS.iter().map(LayoutEntry::layout).collect()
}

/// Exact structural lookup in the mask table.
pub fn mask_for_layout(layout: &ChannelMap) -> Option<&'static LayoutEntry> {
    MASK_LAYOUTS.iter().find(|e| layout.same_layout(e.speakers))
}

/// Index of the candidate closest to `requested`.
///
/// An exact layout wins. Otherwise the candidate missing the fewest requested
/// speakers, then the one adding the fewest extra speakers. Candidates sharing
/// no speaker with the request are never picked. Ties keep table order.
pub fn select_layout(candidates: &[ChannelMap], requested: &ChannelMap) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .filter_map(|(i, candidate)| {
            let common = candidate.overlap(requested.speakers());
            if common == 0 {
                return None;
            }
            let missing = requested.len() - common;
            let extra = candidate.len() - common;
            Some((i, (missing, extra)))
        })
        .min_by_key(|(_, rank)| *rank)
        .map(|(i, _)| i)
}
