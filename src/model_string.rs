//! Decoding of the `model` / `mode` fields of a chat request into a `(Target, Mode)` pair.
//!
//! The `model` slot may carry both values joined by a hyphen (`"romaji-spaced"`), or
//! only the target with the mode in its own field. Decoding never fails: anything
//! unrecognized falls back to `hiragana` / `normal`.

use crate::models::{Mode, Target};

/// Decode `(target, mode)` from the raw request fields.
///
/// - `"<to>-<mode>"`: each half is taken when valid, otherwise defaulted on its own.
/// - more than one hyphen: the whole string is invalid and both fields default.
/// - no hyphen: `raw_model` is the target candidate and `raw_mode` the mode candidate.
pub fn parse(raw_model: Option<&str>, raw_mode: Option<&str>) -> (Target, Mode) {
    match raw_model {
        Some(model) if model.contains('-') => {
            let parts: Vec<&str> = model.split('-').collect();
            if parts.len() != 2 {
                return (Target::default(), Mode::default());
            }
            (target_or_default(Some(parts[0])), mode_or_default(Some(parts[1])))
        }
        _ => (target_or_default(raw_model), mode_or_default(raw_mode)),
    }
}

fn target_or_default(candidate: Option<&str>) -> Target {
    candidate
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn mode_or_default(candidate: Option<&str>) -> Mode {
    candidate
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}
