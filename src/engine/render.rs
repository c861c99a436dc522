use async_trait::async_trait;

use super::dictionary::ReadingDictionary;
use super::kana::{has_kanji, to_target, CharClass};
use super::{ConvertOptions, EngineError, Transliterator};
use crate::models::Mode;

/// One segment of the input: its written form and, when known, its kana reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub surface: String,
    pub reading: Option<String>,
}

impl Token {
    /// Reading used for script conversion; kana and other text read as written.
    fn kana(&self) -> Option<&str> {
        match &self.reading {
            Some(r) => Some(r.as_str()),
            None if has_kanji(&self.surface) => None,
            None => Some(self.surface.as_str()),
        }
    }
}

/// Dictionary-backed transliterator.
pub struct DictionaryEngine {
    dict: ReadingDictionary,
}

impl DictionaryEngine {
    pub fn new(dict: ReadingDictionary) -> Self {
        Self { dict }
    }

    /// Greedy longest-match segmentation. Text outside the dictionary is split into
    /// runs of one character class; whitespace runs become their own tokens.
    pub(crate) fn segment(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut rest = text;
        while let Some(first) = rest.chars().next() {
            let (len, reading) = if first.is_whitespace() {
                let len = rest
                    .find(|c: char| !c.is_whitespace())
                    .unwrap_or(rest.len());
                (len, None)
            } else if let Some((len, reading)) = self.dict.longest_match(rest) {
                (len, Some(reading.to_string()))
            } else {
                (self.unmatched_run(rest, first), None)
            };
            tokens.push(Token {
                surface: rest[..len].to_string(),
                reading,
            });
            rest = &rest[len..];
        }
        tokens
    }

    /// Byte length of the same-class run at the start of `rest`, stopping where a
    /// dictionary word or whitespace begins.
    fn unmatched_run(&self, rest: &str, first: char) -> usize {
        let class = CharClass::of(first);
        let mut len = first.len_utf8();
        for (offset, c) in rest.char_indices().skip(1) {
            if c.is_whitespace()
                || CharClass::of(c) != class
                || self.dict.longest_match(&rest[offset..]).is_some()
            {
                break;
            }
            len = offset + c.len_utf8();
        }
        len
    }

    pub(crate) fn render(&self, text: &str, options: &ConvertOptions) -> String {
        let tokens = self.segment(text);
        let converted = |t: &Token| match t.kana() {
            Some(k) => to_target(k, options.to),
            None => t.surface.clone(),
        };
        match options.mode {
            Mode::Normal => tokens.iter().map(converted).collect(),
            Mode::Spaced => tokens
                .iter()
                .filter(|t| !t.surface.trim().is_empty())
                .map(converted)
                .collect::<Vec<_>>()
                .join(" "),
            Mode::Okurigana | Mode::Furigana => tokens
                .iter()
                .map(|t| match (&t.reading, has_kanji(&t.surface)) {
                    (Some(r), true) => {
                        annotate(&t.surface, &to_target(r, options.to), options.mode)
                    }
                    _ => t.surface.clone(),
                })
                .collect(),
        }
    }
}

fn annotate(surface: &str, reading: &str, mode: Mode) -> String {
    match mode {
        Mode::Furigana => {
            format!("<ruby>{surface}<rp>(</rp><rt>{reading}</rt><rp>)</rp></ruby>")
        }
        _ => format!("{surface}({reading})"),
    }
}

#[async_trait]
impl Transliterator for DictionaryEngine {
    async fn convert(&self, text: &str, options: &ConvertOptions) -> Result<String, EngineError> {
        Ok(self.render(text, options))
    }
}
