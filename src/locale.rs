//! Locale identifiers parsed from resource directory names.
//!
//! Every localized resource lives in a directory named after its locale:
//! `base/` holds the default values, `ru/`, `en-US/` or `zh-Hans/` hold
//! translations. [`Locale`] is the key the loaders and the merge engine
//! partition values by.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// Directory name of the default locale.
pub const BASE_LOCALE_TOKEN: &str = "base";

/// A resource locale: the distinguished default locale or a language tag.
///
/// `Base` orders before every tag, so iterating a `BTreeMap<Locale, _>`
/// always yields the default values first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Locale {
    /// The default/fallback locale.
    Base,
    /// A concrete `language[-Script][-region]` locale.
    Tag(LanguageTag),
}

/// The structured parts of a locale tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LanguageTag {
    /// Lowercase ISO 639 language code (e.g. "en").
    pub language: String,
    /// Title-case ISO 15924 script code (e.g. "Hans").
    pub script: Option<String>,
    /// Uppercase region code (e.g. "US").
    pub region: Option<String>,
}

impl Locale {
    /// Builds a tag locale from a language and an optional region.
    pub fn tag(language: &str, region: Option<&str>) -> Self {
        Locale::Tag(LanguageTag {
            language: language.to_ascii_lowercase(),
            script: None,
            region: region.map(str::to_ascii_uppercase),
        })
    }

    pub fn is_base(&self) -> bool {
        matches!(self, Locale::Base)
    }

    /// Android resource qualifier (`en`, `en-rUS`, `b+zh+Hans+CN`), `None` for base.
    pub fn android_qualifier(&self) -> Option<String> {
        match self {
            Locale::Base => None,
            Locale::Tag(tag) => Some(match (&tag.script, &tag.region) {
                (None, None) => tag.language.clone(),
                (None, Some(region)) => format!("{}-r{}", tag.language, region),
                (Some(script), region) => {
                    let mut parts = vec!["b", tag.language.as_str(), script.as_str()];
                    if let Some(region) = region {
                        parts.push(region.as_str());
                    }
                    parts.join("+")
                }
            }),
        }
    }

    /// Name used for the `<name>.lproj` directory on Apple platforms.
    pub fn apple_name(&self) -> String {
        match self {
            Locale::Base => "Base".to_string(),
            Locale::Tag(_) => self.to_string(),
        }
    }

    /// Java `ResourceBundle` file suffix (`_en_US`, `_zh_Hans_CN`), empty for base.
    ///
    /// Follows `ResourceBundle.Control.toBundleName`: language, script, region.
    pub fn bundle_suffix(&self) -> String {
        match self {
            Locale::Base => String::new(),
            Locale::Tag(tag) => {
                let mut suffix = format!("_{}", tag.language);
                for part in [&tag.script, &tag.region].into_iter().flatten() {
                    suffix.push('_');
                    suffix.push_str(part);
                }
                suffix
            }
        }
    }
}

/// Parses a directory token into a [`Locale`].
///
/// Accepts `base`, `en`, `en-US`, `en_US`, the Android `en-rUS` form and
/// script subtags (`zh-Hans`, `sr-Latn-RS`). Anything else fails with
/// [`Error::InvalidLocaleToken`].
///
/// # Example
/// ```rust
/// use resgen::locale::Locale;
/// use std::str::FromStr;
/// assert_eq!(Locale::from_str("base").unwrap(), Locale::Base);
/// assert_eq!(Locale::from_str("en-rUS").unwrap(), Locale::tag("en", Some("US")));
/// assert!(Locale::from_str("strings").is_err());
/// ```
impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case(BASE_LOCALE_TOKEN) {
            return Ok(Locale::Base);
        }

        let invalid = || Error::InvalidLocaleToken(s.to_string());
        if token.is_empty() {
            return Err(invalid());
        }

        let normalized = token
            .split(['-', '_'])
            .map(|part| match part.strip_prefix('r') {
                Some(region) if region.len() == 2 && region.bytes().all(|b| b.is_ascii_uppercase()) => {
                    region
                }
                _ => part,
            })
            .collect::<Vec<_>>()
            .join("-");

        let langid = normalized
            .parse::<LanguageIdentifier>()
            .map_err(|_| invalid())?;

        let language = langid.language.as_str();
        let is_short_language =
            (2..=3).contains(&language.len()) && language.bytes().all(|b| b.is_ascii_alphabetic());
        if !is_short_language || language == "und" || langid.variants().next().is_some() {
            return Err(invalid());
        }

        Ok(Locale::Tag(LanguageTag {
            language: language.to_string(),
            script: langid.script.map(|s| s.as_str().to_string()),
            region: langid.region.map(|r| r.as_str().to_string()),
        }))
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Base => write!(f, "{}", BASE_LOCALE_TOKEN),
            Locale::Tag(tag) => {
                write!(f, "{}", tag.language)?;
                if let Some(script) = &tag.script {
                    write!(f, "-{}", script)?;
                }
                if let Some(region) = &tag.region {
                    write!(f, "-{}", region)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base() {
        assert_eq!(Locale::from_str("base").unwrap(), Locale::Base);
        assert_eq!(Locale::from_str("Base").unwrap(), Locale::Base);
    }

    #[test]
    fn test_parse_language_and_region() {
        assert_eq!(Locale::from_str("ru").unwrap(), Locale::tag("ru", None));
        assert_eq!(
            Locale::from_str("en-US").unwrap(),
            Locale::tag("en", Some("US"))
        );
        assert_eq!(
            Locale::from_str("en_US").unwrap(),
            Locale::tag("en", Some("US"))
        );
        assert_eq!(
            Locale::from_str("en-rGB").unwrap(),
            Locale::tag("en", Some("GB"))
        );
    }

    #[test]
    fn test_parse_script() {
        let locale = Locale::from_str("zh-Hans-CN").unwrap();
        match &locale {
            Locale::Tag(tag) => {
                assert_eq!(tag.language, "zh");
                assert_eq!(tag.script.as_deref(), Some("Hans"));
                assert_eq!(tag.region.as_deref(), Some("CN"));
            }
            Locale::Base => panic!("expected a tag"),
        }
        assert_eq!(locale.to_string(), "zh-Hans-CN");
    }

    #[test]
    fn test_parse_rejects_non_locale_tokens() {
        for token in ["strings", "images", "", "e", "en-US-POSIX-x", "12"] {
            let result = Locale::from_str(token);
            assert!(
                matches!(result, Err(Error::InvalidLocaleToken(_))),
                "{token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_base_sorts_first() {
        let mut locales = vec![
            Locale::tag("ru", None),
            Locale::Base,
            Locale::tag("de", None),
        ];
        locales.sort();
        assert_eq!(locales[0], Locale::Base);
        assert_eq!(locales[1], Locale::tag("de", None));
    }

    #[test]
    fn test_platform_names() {
        let base = Locale::Base;
        assert_eq!(base.android_qualifier(), None);
        assert_eq!(base.apple_name(), "Base");
        assert_eq!(base.bundle_suffix(), "");

        let en_us = Locale::tag("en", Some("US"));
        assert_eq!(en_us.android_qualifier().as_deref(), Some("en-rUS"));
        assert_eq!(en_us.apple_name(), "en-US");
        assert_eq!(en_us.bundle_suffix(), "_en_US");

        let zh_hans = Locale::from_str("zh-Hans").unwrap();
        assert_eq!(zh_hans.android_qualifier().as_deref(), Some("b+zh+Hans"));
        assert_eq!(zh_hans.apple_name(), "zh-Hans");
        assert_eq!(zh_hans.bundle_suffix(), "_zh_Hans");

        let zh_hans_cn = Locale::from_str("zh-Hans-CN").unwrap();
        assert_eq!(zh_hans_cn.bundle_suffix(), "_zh_Hans_CN");
        assert_eq!(zh_hans_cn.android_qualifier().as_deref(), Some("b+zh+Hans+CN"));
    }
}
