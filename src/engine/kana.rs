//! Character classification and kana script conversion.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::Target;

const KANA_OFFSET: u32 = 0x60;

pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
        || c == '々'
}

pub fn has_kanji(s: &str) -> bool {
    s.chars().any(is_kanji)
}

/// Coarse script class, used to split text the dictionary does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Kanji,
    Hiragana,
    Katakana,
    Other,
}

impl CharClass {
    pub fn of(c: char) -> Self {
        if is_kanji(c) {
            CharClass::Kanji
        } else if is_hiragana(c) {
            CharClass::Hiragana
        } else if is_katakana(c) {
            CharClass::Katakana
        } else {
            CharClass::Other
        }
    }
}

fn shift(c: char, from: std::ops::RangeInclusive<char>, up: bool) -> char {
    if !from.contains(&c) {
        return c;
    }
    let code = if up {
        c as u32 + KANA_OFFSET
    } else {
        c as u32 - KANA_OFFSET
    };
    char::from_u32(code).unwrap_or(c)
}

pub fn to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ゝ' => 'ヽ',
            'ゞ' => 'ヾ',
            _ => shift(c, '\u{3041}'..='\u{3096}', true),
        })
        .collect()
}

pub fn to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ヽ' => 'ゝ',
            'ヾ' => 'ゞ',
            _ => shift(c, '\u{30A1}'..='\u{30F6}', false),
        })
        .collect()
}

static ROMAJI: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let mono: &[(&str, &str)] = &[
        ("あ", "a"), ("い", "i"), ("う", "u"), ("え", "e"), ("お", "o"),
        ("か", "ka"), ("き", "ki"), ("く", "ku"), ("け", "ke"), ("こ", "ko"),
        ("が", "ga"), ("ぎ", "gi"), ("ぐ", "gu"), ("げ", "ge"), ("ご", "go"),
        ("さ", "sa"), ("し", "shi"), ("す", "su"), ("せ", "se"), ("そ", "so"),
        ("ざ", "za"), ("じ", "ji"), ("ず", "zu"), ("ぜ", "ze"), ("ぞ", "zo"),
        ("た", "ta"), ("ち", "chi"), ("つ", "tsu"), ("て", "te"), ("と", "to"),
        ("だ", "da"), ("ぢ", "ji"), ("づ", "zu"), ("で", "de"), ("ど", "do"),
        ("な", "na"), ("に", "ni"), ("ぬ", "nu"), ("ね", "ne"), ("の", "no"),
        ("は", "ha"), ("ひ", "hi"), ("ふ", "fu"), ("へ", "he"), ("ほ", "ho"),
        ("ば", "ba"), ("び", "bi"), ("ぶ", "bu"), ("べ", "be"), ("ぼ", "bo"),
        ("ぱ", "pa"), ("ぴ", "pi"), ("ぷ", "pu"), ("ぺ", "pe"), ("ぽ", "po"),
        ("ま", "ma"), ("み", "mi"), ("む", "mu"), ("め", "me"), ("も", "mo"),
        ("や", "ya"), ("ゆ", "yu"), ("よ", "yo"),
        ("ら", "ra"), ("り", "ri"), ("る", "ru"), ("れ", "re"), ("ろ", "ro"),
        ("わ", "wa"), ("ゐ", "i"), ("ゑ", "e"), ("を", "o"), ("ん", "n"),
        ("ぁ", "a"), ("ぃ", "i"), ("ぅ", "u"), ("ぇ", "e"), ("ぉ", "o"),
        ("ゃ", "ya"), ("ゅ", "yu"), ("ょ", "yo"), ("ゎ", "wa"), ("ゔ", "vu"),
        ("ふぁ", "fa"), ("ふぃ", "fi"), ("ふぇ", "fe"), ("ふぉ", "fo"),
        ("てぃ", "ti"), ("でぃ", "di"), ("とぅ", "tu"), ("どぅ", "du"),
        ("しぇ", "she"), ("じぇ", "je"), ("ちぇ", "che"),
        ("ゔぁ", "va"), ("ゔぃ", "vi"), ("ゔぇ", "ve"), ("ゔぉ", "vo"),
        ("うぃ", "wi"), ("うぇ", "we"), ("うぉ", "wo"),
    ];
    let yoon_bases: &[(&str, &str)] = &[
        ("き", "ky"), ("ぎ", "gy"), ("に", "ny"), ("ひ", "hy"), ("び", "by"),
        ("ぴ", "py"), ("み", "my"), ("り", "ry"), ("し", "sh"), ("じ", "j"),
        ("ち", "ch"), ("ぢ", "j"),
    ];
    let mut table: HashMap<String, String> = mono
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    for (base, cons) in yoon_bases {
        for (small, vowel) in [("ゃ", "a"), ("ゅ", "u"), ("ょ", "o")] {
            table.insert(format!("{base}{small}"), format!("{cons}{vowel}"));
        }
    }
    table
});

/// Spelling of a small `っ` with no consonant after it to double.
const LONE_SOKUON: &str = "xtsu";

/// Modified Hepburn romanization of kana. Non-kana characters pass through.
pub fn to_romaji(s: &str) -> String {
    let chars: Vec<char> = to_hiragana(s).chars().collect();
    let mut out = String::with_capacity(chars.len() * 2);
    let mut geminate = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == 'っ' {
            if geminate {
                out.push_str(LONE_SOKUON);
            }
            geminate = true;
            i += 1;
            continue;
        }
        if c == 'ー' {
            if std::mem::take(&mut geminate) {
                out.push_str(LONE_SOKUON);
            }
            if let Some(v) = out.chars().last().filter(|v| "aiueo".contains(*v)) {
                out.push(v);
            }
            i += 1;
            continue;
        }

        let pair: Option<(String, usize)> = chars.get(i + 1).and_then(|next| {
            let key: String = [c, *next].iter().collect();
            ROMAJI.get(key.as_str()).map(|r| (r.to_string(), 2))
        });
        let single = || {
            let mut buf = [0u8; 4];
            let key: &str = c.encode_utf8(&mut buf);
            ROMAJI.get(key).map(|r| (r.to_string(), 1))
        };

        match pair.or_else(single) {
            Some((rom, width)) => {
                if std::mem::take(&mut geminate) {
                    if rom.starts_with("ch") {
                        out.push('t');
                    } else if let Some(first) =
                        rom.chars().next().filter(|f| !"aiueo".contains(*f) && rom != "n")
                    {
                        out.push(first);
                    } else {
                        out.push_str(LONE_SOKUON);
                    }
                }
                out.push_str(&rom);
                i += width;
            }
            None => {
                if std::mem::take(&mut geminate) {
                    out.push_str(LONE_SOKUON);
                }
                out.push(c);
                i += 1;
            }
        }
    }
    if geminate {
        out.push_str(LONE_SOKUON);
    }
    out
}

/// Convert a kana reading into the requested script.
pub fn to_target(reading: &str, target: Target) -> String {
    match target {
        Target::Hiragana => to_hiragana(reading),
        Target::Katakana => to_katakana(reading),
        Target::Romaji => to_romaji(reading),
    }
}
