//! Locale-aware ordering of department names

use pinyin::ToPinyin;

/// How department names are ordered in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Collation {
    /// zh-CN order: Han characters by their pinyin reading, after Latin text
    #[default]
    Pinyin,
    /// Case-folded code point order
    CodePoint,
}

/// One character of a sort key
///
/// Non-Han characters rank before Han ones. Han characters compare by plain
/// pinyin, then by the character itself so homophones stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyPart {
    Other(String),
    Han(&'static str, char),
}

impl Collation {
    /// Collation for a BCP 47 locale tag such as "zh-CN"
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if language == "zh" {
            Self::Pinyin
        } else {
            Self::CodePoint
        }
    }

    /// Sort key for `name`; compare keys with `Ord`
    pub fn key(&self, name: &str) -> Vec<KeyPart> {
        match self {
            Self::Pinyin => name
                .chars()
                .map(|c| match c.to_pinyin() {
                    Some(reading) => KeyPart::Han(reading.plain(), c),
                    None => KeyPart::Other(c.to_lowercase().collect()),
                })
                .collect(),
            Self::CodePoint => vec![KeyPart::Other(name.to_lowercase())],
        }
    }
}
