//! Localized strings for the user interface
//!
//! Each language has a nested JSON table. Nested objects are flattened into
//! dotted keys, so `{"units": {"kmh": "km/h"}}` is looked up as `units.kmh`.

use std::{collections::HashMap, fmt::Display, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

/// A language the interface can be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Simplified Chinese, the primary language.
    Zh,

    /// English, the secondary language.
    En,
}

impl Language {
    /// Every supported language, in the order shown to the user.
    pub const ALL: [Language; 2] = [Language::Zh, Language::En];

    /// The language used when a key is missing from the active table.
    pub const DEFAULT: Language = Language::Zh;

    /// The short tag used for storage and the `data-lang` attribute.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// The BCP 47 tag for the document `lang` attribute.
    #[must_use]
    pub const fn html_lang(self) -> &'static str {
        match self {
            Language::Zh => "zh-Hans",
            Language::En => "en",
        }
    }

    /// Look up a key in this language.
    ///
    /// Falls back to [`Language::DEFAULT`], then to the raw key, so the
    /// result is never empty.
    #[must_use]
    pub fn t(self, key: &str) -> &str {
        let tables = tables();
        tables
            .get(self)
            .get(key)
            .or_else(|| tables.get(Language::DEFAULT).get(key))
            .unwrap_or(key)
    }

    /// Wrap `inner` in brackets after `base`, using this language's punctuation.
    #[must_use]
    pub fn bracketed(self, base: &str, inner: &str) -> String {
        match self {
            Language::Zh => format!("{base}（{inner}）"),
            Language::En => format!("{base} ({inner})"),
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// An unrecognised language tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zh" => Ok(Language::Zh),
            "en" => Ok(Language::En),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// The strings for one language.
#[derive(Debug, Default)]
pub struct Table {
    entries: HashMap<String, String>,
}

impl Table {
    /// Build a table from a nested JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON.
    pub fn from_json(json: &str) -> Result<Table, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        let mut entries = HashMap::new();
        flatten("", &value, &mut entries);
        Ok(Table { entries })
    }

    /// Get a string by dotted key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate over every key in the table.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&key, value, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        // Only strings are displayable.
        _ => {}
    }
}

struct Tables {
    zh: Table,
    en: Table,
}

impl Tables {
    const fn get(&self, language: Language) -> &Table {
        match language {
            Language::Zh => &self.zh,
            Language::En => &self.en,
        }
    }
}

fn load(language: Language, json: &str) -> Table {
    Table::from_json(json).unwrap_or_else(|err| {
        error!("Failed to load {language} strings: {err}");
        Table::default()
    })
}

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(|| Tables {
        zh: load(Language::Zh, include_str!("../locales/zh.json")),
        en: load(Language::En, include_str!("../locales/en.json")),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_tables_have_same_keys() {
        let zh = Table::from_json(include_str!("../locales/zh.json")).unwrap();
        let en = Table::from_json(include_str!("../locales/en.json")).unwrap();
        let zh_keys: HashSet<&str> = zh.keys().collect();
        let en_keys: HashSet<&str> = en.keys().collect();
        assert_eq!(zh_keys, en_keys);
        assert!(zh_keys.contains("hemisphere.lonEast"));
    }

    #[test]
    fn test_nested_lookup() {
        assert_eq!(Language::En.t("hemisphere.lonEast"), "East");
        assert_eq!(Language::Zh.t("hemisphere.latSouth"), "南纬");
        assert_eq!(Language::En.t("units.kmh"), "km/h");
        assert_eq!(Language::En.t("retry"), "Retry");
    }

    #[test]
    fn test_missing_key_falls_back_to_raw_key() {
        assert_eq!(Language::En.t("no.such.key"), "no.such.key");
        assert_eq!(Language::Zh.t("units"), "units");
    }

    #[test]
    fn test_flatten_ignores_non_strings() {
        let table = Table::from_json(r#"{"a": {"b": "x", "c": 1}, "d": null}"#).unwrap();
        assert_eq!(table.get("a.b"), Some("x"));
        assert_eq!(table.get("a.c"), None);
        assert_eq!(table.get("d"), None);
    }

    #[test]
    fn test_language_tags() {
        for language in Language::ALL {
            assert_eq!(language.tag().parse::<Language>().unwrap(), language);
        }
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::Zh.html_lang(), "zh-Hans");
    }

    #[test]
    fn test_bracketed() {
        assert_eq!(Language::Zh.bracketed("经度", "东经"), "经度（东经）");
        assert_eq!(Language::En.bracketed("Longitude", "East"), "Longitude (East)");
    }
}
