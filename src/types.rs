//! Core, platform-agnostic types for resgen.
//! Loaders decode into these; platform generators consume the metadata types.

use std::{
    collections::BTreeMap,
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Resource identifier, unique per locale per kind.
pub type ResourceKey = String;

/// Per-locale key → raw value mapping produced by a loader for one tier.
pub type RawResourceMap<V> = BTreeMap<Locale, BTreeMap<ResourceKey, V>>;

/// The resource kinds handled by the pipeline, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Strings,
    Plurals,
    Images,
    Fonts,
    Colors,
    Assets,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Strings,
        ResourceKind::Plurals,
        ResourceKind::Images,
        ResourceKind::Fonts,
        ResourceKind::Colors,
        ResourceKind::Assets,
    ];

    /// Glob masks selecting this kind's input files inside a file tree.
    pub fn masks(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Strings => &["**/strings*.xml"],
            ResourceKind::Plurals => &["**/plurals*.xml", "**/plurals*.json"],
            ResourceKind::Images => &["**/images/**/*.{png,jpg,jpeg,svg}"],
            ResourceKind::Fonts => &["**/fonts/*.{ttf,otf}"],
            ResourceKind::Colors => &["**/colors*.xml"],
            ResourceKind::Assets => &["**/assets/**"],
        }
    }

    /// Name of the nested object holding this kind's accessors.
    pub fn object_name(&self) -> &'static str {
        match self {
            ResourceKind::Strings => "strings",
            ResourceKind::Plurals => "plurals",
            ResourceKind::Images => "images",
            ResourceKind::Fonts => "fonts",
            ResourceKind::Colors => "colors",
            ResourceKind::Assets => "assets",
        }
    }

    /// Simple name of the runtime type every accessor of this kind has.
    pub fn resource_type_name(&self) -> &'static str {
        match self {
            ResourceKind::Strings => "StringResource",
            ResourceKind::Plurals => "PluralsResource",
            ResourceKind::Images => "ImageResource",
            ResourceKind::Fonts => "FontResource",
            ResourceKind::Colors => "ColorResource",
            ResourceKind::Assets => "AssetResource",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.object_name())
    }
}

/// The three precedence levels contributing to a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Inherited/shared dependency resources.
    Lower,
    /// The module being built.
    Own,
    /// Consumer overrides.
    Upper,
}

/// One value per tier, listed in ascending precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tiers<T> {
    pub lower: T,
    pub own: T,
    pub upper: T,
}

impl<T> Tiers<T> {
    pub fn new(lower: T, own: T, upper: T) -> Self {
        Self { lower, own, upper }
    }

    pub fn get(&self, tier: Tier) -> &T {
        match tier {
            Tier::Lower => &self.lower,
            Tier::Own => &self.own,
            Tier::Upper => &self.upper,
        }
    }

    /// Applies `f` to every tier, keeping tier identity.
    pub fn try_map<U, E>(&self, mut f: impl FnMut(Tier, &T) -> Result<U, E>) -> Result<Tiers<U>, E> {
        Ok(Tiers {
            lower: f(Tier::Lower, &self.lower)?,
            own: f(Tier::Own, &self.own)?,
            upper: f(Tier::Upper, &self.upper)?,
        })
    }
}

/// Keyed resource metadata consumed by platform generators.
pub trait ResourceMetadata: Send + Sync {
    fn key(&self) -> &str;
}

/// Standard CLDR plural forms.
#[derive(Ord, PartialOrd, Eq, PartialEq, Debug, Clone, Copy, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl FromStr for PluralCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" => Ok(PluralCategory::Zero),
            "one" => Ok(PluralCategory::One),
            "two" => Ok(PluralCategory::Two),
            "few" => Ok(PluralCategory::Few),
            "many" => Ok(PluralCategory::Many),
            "other" => Ok(PluralCategory::Other),
            _ => Err(format!("Unknown plural category: {}", s)),
        }
    }
}

impl Display for PluralCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// All plural forms of one message in one locale.
pub type PluralForms = BTreeMap<PluralCategory, String>;

/// A color packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub u32);

impl Rgba {
    pub fn red(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn green(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn blue(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn alpha(&self) -> u8 {
        self.0 as u8
    }

    /// Android `#AARRGGBB` notation.
    pub fn to_argb_hex(&self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            self.alpha(),
            self.red(),
            self.green(),
            self.blue()
        )
    }

    /// Parses `RRGGBB` or `RRGGBBAA`, optionally prefixed by `#` or `0x`.
    pub fn parse_hex(value: &str) -> Option<Rgba> {
        let trimmed = value.trim();
        let hex = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let parsed = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            6 => Some(Rgba((parsed << 8) | 0xFF)),
            8 => Some(Rgba(parsed)),
            _ => None,
        }
    }
}

/// A color value, optionally split by light/dark appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorValue {
    Single(Rgba),
    Themed { light: Rgba, dark: Rgba },
}

impl ColorValue {
    pub fn light(&self) -> Rgba {
        match self {
            ColorValue::Single(color) => *color,
            ColorValue::Themed { light, .. } => *light,
        }
    }

    pub fn dark(&self) -> Option<Rgba> {
        match self {
            ColorValue::Single(_) => None,
            ColorValue::Themed { dark, .. } => Some(*dark),
        }
    }
}

/// A density/scale-specific rendition of an image.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualityVariant {
    /// Scale label such as `"2"` for `@2x`; `None` for scale-agnostic vectors.
    pub quality: Option<String>,
    pub file_path: PathBuf,
}

impl QualityVariant {
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn extension(&self) -> String {
        self.file_path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default()
    }

    pub fn is_vector(&self) -> bool {
        self.quality.is_none()
    }

    pub fn scale(&self) -> Option<f64> {
        self.quality.as_deref().and_then(|q| q.parse().ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringMetadata {
    pub key: ResourceKey,
    pub values: BTreeMap<Locale, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralMetadata {
    pub key: ResourceKey,
    pub values: BTreeMap<Locale, PluralForms>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub key: ResourceKey,
    pub values: Vec<QualityVariant>,
}

impl ImageMetadata {
    /// The variant single-file platforms ship: the vector if present, else the largest scale.
    pub fn preferred_variant(&self) -> Option<&QualityVariant> {
        self.values.iter().find(|v| v.is_vector()).or_else(|| {
            self.values.iter().max_by(|a, b| {
                a.scale()
                    .unwrap_or(0.0)
                    .total_cmp(&b.scale().unwrap_or(0.0))
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMetadata {
    pub key: ResourceKey,
    pub file_path: PathBuf,
}

impl FontMetadata {
    pub fn file_name(&self) -> String {
        file_name_of(&self.file_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMetadata {
    pub key: ResourceKey,
    pub value: ColorValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMetadata {
    pub key: ResourceKey,
    /// Path relative to the `assets/` directory, `/`-separated.
    pub relative_path: String,
    pub file_path: PathBuf,
}

/// A located asset file, the raw value of the assets kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    pub relative_path: String,
    pub file_path: PathBuf,
}

macro_rules! impl_resource_metadata {
    ($($ty:ty),*) => {
        $(
            impl ResourceMetadata for $ty {
                fn key(&self) -> &str {
                    &self.key
                }
            }
        )*
    };
}

impl_resource_metadata!(
    StringMetadata,
    PluralMetadata,
    ImageMetadata,
    FontMetadata,
    ColorMetadata,
    AssetMetadata
);

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_and_masks() {
        assert_eq!(ResourceKind::Strings.to_string(), "strings");
        assert_eq!(ResourceKind::Strings.masks(), &["**/strings*.xml"]);
        assert_eq!(ResourceKind::Images.resource_type_name(), "ImageResource");
        assert_eq!(ResourceKind::ALL.len(), 6);
    }

    #[test]
    fn test_plural_category_from_str() {
        assert_eq!(PluralCategory::from_str("one"), Ok(PluralCategory::One));
        assert_eq!(PluralCategory::from_str("OTHER"), Ok(PluralCategory::Other));
        assert!(PluralCategory::from_str("several").is_err());
    }

    #[test]
    fn test_rgba_parse_hex() {
        assert_eq!(Rgba::parse_hex("#FF0000"), Some(Rgba(0xFF0000FF)));
        assert_eq!(Rgba::parse_hex("0xB02743FF"), Some(Rgba(0xB02743FF)));
        assert_eq!(Rgba::parse_hex("7CCFEE80"), Some(Rgba(0x7CCFEE80)));
        assert_eq!(Rgba::parse_hex("#FFF"), None);
        assert_eq!(Rgba::parse_hex("#GG0000"), None);
        assert_eq!(Rgba::parse_hex("+FF0000"), None);
    }

    #[test]
    fn test_rgba_to_argb_hex() {
        let color = Rgba(0x11223380);
        assert_eq!(color.red(), 0x11);
        assert_eq!(color.alpha(), 0x80);
        assert_eq!(color.to_argb_hex(), "#80112233");
    }

    #[test]
    fn test_preferred_variant() {
        let raster = ImageMetadata {
            key: "logo".to_string(),
            values: vec![
                QualityVariant {
                    quality: Some("1".to_string()),
                    file_path: PathBuf::from("logo@1x.png"),
                },
                QualityVariant {
                    quality: Some("3".to_string()),
                    file_path: PathBuf::from("logo@3x.png"),
                },
            ],
        };
        assert_eq!(
            raster.preferred_variant().map(|v| v.file_name()),
            Some("logo@3x.png".to_string())
        );

        let mut with_vector = raster.clone();
        with_vector.values.push(QualityVariant {
            quality: None,
            file_path: PathBuf::from("logo.svg"),
        });
        assert_eq!(
            with_vector.preferred_variant().map(|v| v.file_name()),
            Some("logo.svg".to_string())
        );
    }

    #[test]
    fn test_tiers_try_map() {
        let tiers = Tiers::new(1, 2, 3);
        let mapped: Result<Tiers<String>, ()> =
            tiers.try_map(|tier, value| Ok(format!("{:?}={}", tier, value)));
        let mapped = mapped.unwrap();
        assert_eq!(mapped.get(Tier::Lower), "Lower=1");
        assert_eq!(mapped.get(Tier::Upper), "Upper=3");
    }
}
