use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output script requested from the transliteration engine.
///
/// Uses lowercase serialization to match the wire values:
/// "hiragana" | "katakana" | "romaji"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Hiragana,
    Katakana,
    Romaji,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Hiragana, Target::Katakana, Target::Romaji];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Hiragana => "hiragana",
            Target::Katakana => "katakana",
            Target::Romaji => "romaji",
        }
    }
}

impl FromStr for Target {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("target", s))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering style for a conversion.
///
/// "normal" | "spaced" | "okurigana" | "furigana"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    Spaced,
    Okurigana,
    Furigana,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Normal, Mode::Spaced, Mode::Okurigana, Mode::Furigana];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Spaced => "spaced",
            Mode::Okurigana => "okurigana",
            Mode::Furigana => "furigana",
        }
    }
}

impl FromStr for Mode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("mode", s))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that names none of the known targets or modes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Successful body of `POST /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub converted: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_wire_value() {
        for t in Target::ALL {
            assert_eq!(t.as_str().parse::<Target>(), Ok(t));
        }
        for m in Mode::ALL {
            assert_eq!(m.as_str().parse::<Mode>(), Ok(m));
        }
    }

    #[test]
    fn rejects_case_variants() {
        let err = "Romaji".parse::<Target>().unwrap_err();
        assert_eq!(err.kind, "target");
        assert_eq!(err.to_string(), "unsupported target: \"Romaji\"");
        assert!("SPACED".parse::<Mode>().is_err());
    }
}
