use crate::error::{ContentError, ContentErrorExt};
use autoani_derive::api_model;
use fxhash::FxHashMap;
use serde::Serialize;
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString, VariantNames};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    En,
    Sq,
}

impl Locale {
    pub const ALL: [Self; 2] = [Self::En, Self::Sq];

    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Sq => "Shqip",
        }
    }

    const fn source(self) -> &'static str {
        match self {
            Self::En => include_str!("../locales/en.json"),
            Self::Sq => include_str!("../locales/sq.json"),
        }
    }
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
}

/// A nested translation dictionary, as served to the storefront.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct Translations(pub Value);

/// Parsed dictionaries of every supported [`Locale`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    dictionaries: FxHashMap<Locale, Value>,
}

impl Catalog {
    /// Parses the embedded dictionaries.
    ///
    /// # Errors
    /// Returns [`ContentError::Parse`] when a bundled file is not valid JSON.
    pub fn load() -> Result<Self, ContentError> {
        let mut dictionaries = FxHashMap::default();
        for locale in Locale::ALL {
            let value: Value = serde_json::from_str(locale.source()).context(format!("Parsing {locale} translations"))?;
            dictionaries.insert(locale, value);
        }
        Ok(Self { dictionaries })
    }

    /// # Errors
    /// Returns [`ContentError::UnknownLanguage`] for anything but `en` and `sq`.
    pub fn translations(&self, code: &str) -> Result<Translations, ContentError> {
        let unknown = || ContentError::UnknownLanguage { message: code.to_owned().into(), context: None };
        let locale: Locale = code.trim().parse().map_err(|_| unknown())?;
        self.dictionaries.get(&locale).cloned().map(Translations).ok_or_else(unknown)
    }

    #[must_use]
    pub fn languages(&self) -> Vec<LanguageInfo> {
        Locale::ALL
            .iter()
            .filter(|locale| self.dictionaries.contains_key(*locale))
            .map(|locale| LanguageInfo { code: locale.to_string(), name: locale.native_name().to_owned() })
            .collect()
    }
}
