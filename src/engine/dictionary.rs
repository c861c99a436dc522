use async_trait::async_trait;
use lexime_trie::{DoubleArray, TrieSearch};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::kana::{is_hiragana, is_katakana, to_hiragana};
use super::render::DictionaryEngine;
use super::{EngineError, EngineLoader, Transliterator};

/// Readings shipped with the binary. The configured dictionary is layered on top.
pub const BASE_READINGS: &str = include_str!("../../data/base_readings.tsv");

/// Surface form -> kana reading table, searched through a double-array trie.
///
/// Text format: one `surface<TAB>reading` entry per line; blank lines and lines
/// starting with `#` are ignored. Readings may be hiragana or katakana and are
/// stored as hiragana.
pub struct ReadingDictionary {
    trie: Option<DoubleArray<u8>>,
    readings: Vec<String>,
}

impl ReadingDictionary {
    pub fn parse(text: &str) -> Self {
        Self::from_entries(parse_entries(text))
    }

    /// Build from surface -> reading pairs. `BTreeMap` keeps keys in byte order,
    /// which the trie builder requires; value ids follow key order.
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        if entries.is_empty() {
            return Self {
                trie: None,
                readings: Vec::new(),
            };
        }
        let keys: Vec<&[u8]> = entries.keys().map(|s| s.as_bytes()).collect();
        let trie = DoubleArray::<u8>::build(&keys);
        let readings = entries.into_values().collect();
        Self {
            trie: Some(trie),
            readings,
        }
    }

    /// The bundled readings with `text`'s entries taking precedence.
    /// Fails when `text` itself has no usable entry.
    pub fn layered(text: &str, source: &str) -> Result<Self, EngineError> {
        let overrides = parse_entries(text);
        if overrides.is_empty() {
            return Err(EngineError::EmptyDictionary(source.to_string()));
        }
        let mut entries = parse_entries(BASE_READINGS);
        entries.extend(overrides);
        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Longest entry that is a prefix of `text`: `(matched byte length, reading)`.
    pub fn longest_match(&self, text: &str) -> Option<(usize, &str)> {
        self.trie
            .as_ref()?
            .common_prefix_search(text.as_bytes())
            .max_by_key(|m| m.len)
            .map(|m| (m.len, self.readings[m.value_id as usize].as_str()))
    }
}

fn parse_entries(text: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.splitn(2, '\t');
        match (parts.next(), parts.next()) {
            (Some(surface), Some(reading)) => {
                let (surface, reading) = (surface.trim(), reading.trim());
                if surface.is_empty()
                    || reading.is_empty()
                    || !reading.chars().all(|c| is_hiragana(c) || is_katakana(c))
                {
                    tracing::debug!(line = lineno + 1, "skipping malformed dictionary entry");
                    continue;
                }
                entries.insert(surface.to_string(), to_hiragana(reading));
            }
            _ => {
                tracing::debug!(line = lineno + 1, "skipping dictionary line without tab");
            }
        }
    }
    entries
}

/// Builds a [`DictionaryEngine`] from a dictionary fetched over HTTP(S) or read from disk.
pub struct DictionaryLoader {
    http: reqwest::Client,
    url: String,
}

impl DictionaryLoader {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    async fn fetch(&self) -> Result<String, EngineError> {
        if self.url.starts_with("http://") || self.url.starts_with("https://") {
            let resp = self.http.get(&self.url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(EngineError::Fetch(format!("{} returned {status}", self.url)));
            }
            Ok(resp.text().await?)
        } else {
            let path = self.url.strip_prefix("file://").unwrap_or(&self.url);
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| EngineError::Fetch(format!("{path}: {e}")))
        }
    }
}

#[async_trait]
impl EngineLoader for DictionaryLoader {
    async fn load(&self) -> Result<Arc<dyn Transliterator>, EngineError> {
        tracing::info!("Loading reading dictionary from: {}", self.url);
        let text = self.fetch().await?;
        let dict = ReadingDictionary::layered(&text, &self.url)?;
        tracing::info!("Reading dictionary loaded ({} entries)", dict.len());
        Ok(Arc::new(DictionaryEngine::new(dict)))
    }
}
