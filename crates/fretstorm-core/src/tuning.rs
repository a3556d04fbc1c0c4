//! Note catalog: the fixed set of guitar tunings and their target pitches.
//!
//! Tunings are static records. Strings are ordered by course, thickest
//! (lowest) string first, so course 0 is the low string in every tuning.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A pitch that some string in some tuning is tuned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    D2,
    #[serde(rename = "D#2")]
    Ds2,
    E2,
    G2,
    #[serde(rename = "G#2")]
    Gs2,
    A2,
    #[serde(rename = "C#3")]
    Cs3,
    D3,
    #[serde(rename = "F#3")]
    Fs3,
    G3,
    A3,
    #[serde(rename = "A#3")]
    As3,
    B3,
    D4,
    #[serde(rename = "D#4")]
    Ds4,
    E4,
}

impl Note {
    /// Equal-tempered frequency (A4 = 440 Hz).
    pub const fn frequency_hz(self) -> f64 {
        match self {
            Note::D2 => 73.42,
            Note::Ds2 => 77.78,
            Note::E2 => 82.41,
            Note::G2 => 98.00,
            Note::Gs2 => 103.83,
            Note::A2 => 110.00,
            Note::Cs3 => 138.59,
            Note::D3 => 146.83,
            Note::Fs3 => 185.00,
            Note::G3 => 196.00,
            Note::A3 => 220.00,
            Note::As3 => 233.08,
            Note::B3 => 246.94,
            Note::D4 => 293.66,
            Note::Ds4 => 311.13,
            Note::E4 => 329.63,
        }
    }

    /// Scientific pitch name, e.g. `"E2"` or `"D#4"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Note::D2 => "D2",
            Note::Ds2 => "D#2",
            Note::E2 => "E2",
            Note::G2 => "G2",
            Note::Gs2 => "G#2",
            Note::A2 => "A2",
            Note::Cs3 => "C#3",
            Note::D3 => "D3",
            Note::Fs3 => "F#3",
            Note::G3 => "G3",
            Note::A3 => "A3",
            Note::As3 => "A#3",
            Note::B3 => "B3",
            Note::D4 => "D4",
            Note::Ds4 => "D#4",
            Note::E4 => "E4",
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One string of a tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TunedString {
    pub note: Note,
    pub frequency_hz: f64,
    /// Short label shown on meteors and prompts.
    pub label: &'static str,
}

impl TunedString {
    const fn new(note: Note, label: &'static str) -> Self {
        Self {
            note,
            frequency_hz: note.frequency_hz(),
            label,
        }
    }
}

/// Number of strings in every tuning.
pub const STRING_COUNT: usize = 6;

/// A complete tuning: six strings ordered thickest first.
#[derive(Debug, PartialEq, Serialize)]
pub struct Tuning {
    pub name: TuningName,
    pub strings: [TunedString; STRING_COUNT],
}

impl Tuning {
    /// Course index (0 = thickest) of a note in this tuning.
    pub fn course_of(&self, note: Note) -> Option<usize> {
        self.strings.iter().position(|s| s.note == note)
    }

    /// Whether a note is one of this tuning's strings.
    pub fn contains(&self, note: Note) -> bool {
        self.course_of(note).is_some()
    }

    /// String at the given course, thickest first.
    pub fn string_at(&self, course: usize) -> Option<&TunedString> {
        self.strings.get(course)
    }

    /// The thickest (lowest) string.
    pub fn thickest(&self) -> &TunedString {
        &self.strings[0]
    }

    /// The thinnest (highest) string.
    pub fn thinnest(&self) -> &TunedString {
        &self.strings[STRING_COUNT - 1]
    }
}

/// Selectable tuning names (the configuration surface).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TuningName {
    #[default]
    Standard,
    DropD,
    HalfStepDown,
    OpenG,
    Dadgad,
}

impl TuningName {
    pub const ALL: [TuningName; 5] = [
        TuningName::Standard,
        TuningName::DropD,
        TuningName::HalfStepDown,
        TuningName::OpenG,
        TuningName::Dadgad,
    ];

    /// Resolve the name to its static tuning record.
    pub fn tuning(self) -> &'static Tuning {
        match self {
            TuningName::Standard => &STANDARD,
            TuningName::DropD => &DROP_D,
            TuningName::HalfStepDown => &HALF_STEP_DOWN,
            TuningName::OpenG => &OPEN_G,
            TuningName::Dadgad => &DADGAD,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TuningName::Standard => "standard",
            TuningName::DropD => "drop-d",
            TuningName::HalfStepDown => "half-step-down",
            TuningName::OpenG => "open-g",
            TuningName::Dadgad => "dadgad",
        }
    }
}

impl fmt::Display for TuningName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TuningName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TuningName::ALL
            .into_iter()
            .find(|name| name.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownTuning(s.to_string()))
    }
}

static STANDARD: Tuning = Tuning {
    name: TuningName::Standard,
    strings: [
        TunedString::new(Note::E2, "E"),
        TunedString::new(Note::A2, "A"),
        TunedString::new(Note::D3, "D"),
        TunedString::new(Note::G3, "G"),
        TunedString::new(Note::B3, "B"),
        TunedString::new(Note::E4, "e"),
    ],
};

static DROP_D: Tuning = Tuning {
    name: TuningName::DropD,
    strings: [
        TunedString::new(Note::D2, "D"),
        TunedString::new(Note::A2, "A"),
        TunedString::new(Note::D3, "d"),
        TunedString::new(Note::G3, "G"),
        TunedString::new(Note::B3, "B"),
        TunedString::new(Note::E4, "e"),
    ],
};

static HALF_STEP_DOWN: Tuning = Tuning {
    name: TuningName::HalfStepDown,
    strings: [
        TunedString::new(Note::Ds2, "Eb"),
        TunedString::new(Note::Gs2, "Ab"),
        TunedString::new(Note::Cs3, "Db"),
        TunedString::new(Note::Fs3, "Gb"),
        TunedString::new(Note::As3, "Bb"),
        TunedString::new(Note::Ds4, "eb"),
    ],
};

static OPEN_G: Tuning = Tuning {
    name: TuningName::OpenG,
    strings: [
        TunedString::new(Note::D2, "D"),
        TunedString::new(Note::G2, "G"),
        TunedString::new(Note::D3, "d"),
        TunedString::new(Note::G3, "g"),
        TunedString::new(Note::B3, "B"),
        TunedString::new(Note::D4, "d'"),
    ],
};

static DADGAD: Tuning = Tuning {
    name: TuningName::Dadgad,
    strings: [
        TunedString::new(Note::D2, "D"),
        TunedString::new(Note::A2, "A"),
        TunedString::new(Note::D3, "d"),
        TunedString::new(Note::G3, "G"),
        TunedString::new(Note::A3, "a"),
        TunedString::new(Note::D4, "d'"),
    ],
};
