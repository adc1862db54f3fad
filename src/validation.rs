//! Validation rules run between merging and generation.
//!
//! Every rule collects all offenders before failing, so one report names each
//! broken key instead of stopping at the first.

use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
};

use tracing::debug;

use crate::types::{ImageMetadata, PluralForms, QualityVariant, RawResourceMap, ResourceKind};

/// Scale labels Apple asset catalogs accept.
pub const APPLE_VALID_SCALES: [&str; 3] = ["1", "2", "3"];

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Violation {
    /// The key's text equals the key itself, almost always an unfilled value.
    EqualKeyValue { kind: ResourceKind, key: String },
    /// No variant of the image can be represented on Apple platforms.
    NoValidScaleVariant { key: String },
}

impl Violation {
    pub fn key(&self) -> &str {
        match self {
            Violation::EqualKeyValue { key, .. } => key,
            Violation::NoValidScaleVariant { key } => key,
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::EqualKeyValue { kind, key } => {
                write!(f, "{} key `{}` has a value equal to its key", kind, key)
            }
            Violation::NoValidScaleVariant { key } => write!(
                f,
                "image `{}` has no valid Apple scale; Apple resources only support 1x, 2x and 3x \
                 scale factors or a vector variant. 4x images can still be used on other \
                 platforms, but a valid Apple variant must be added",
                key
            ),
        }
    }
}

/// A non-empty, sorted list of violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Wraps the collected violations, returning `None` when there are none.
    pub fn from_vec(mut violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            return None;
        }
        violations.sort();
        violations.dedup();
        Some(Self(violations))
    }

    /// `Ok(())` for an empty collection, `Err` carrying every violation otherwise.
    pub fn check(violations: Vec<Violation>) -> Result<(), Violations> {
        match Self::from_vec(violations) {
            Some(violations) => Err(violations),
            None => Ok(()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Offending keys, in report order.
    pub fn keys(&self) -> Vec<&str> {
        self.0.iter().map(Violation::key).collect()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let lines = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", lines)
    }
}

/// Text-bearing values checked by the equal-key-value rule.
pub trait KeyedText {
    fn equals_key(&self, key: &str) -> bool;
}

impl KeyedText for String {
    fn equals_key(&self, key: &str) -> bool {
        self == key
    }
}

impl KeyedText for PluralForms {
    fn equals_key(&self, key: &str) -> bool {
        self.values().any(|value| value == key)
    }
}

/// Rejects every key whose value equals the key name, in any locale.
pub fn check_equal_key_values<V: KeyedText>(
    kind: ResourceKind,
    map: &RawResourceMap<V>,
) -> Result<(), Violations> {
    let offenders: BTreeSet<&str> = map
        .values()
        .flat_map(|entries| entries.iter())
        .filter(|(key, value)| value.equals_key(key))
        .map(|(key, _)| key.as_str())
        .collect();

    if !offenders.is_empty() {
        debug!(%kind, count = offenders.len(), "equal key/value entries found");
    }

    Violations::check(
        offenders
            .into_iter()
            .map(|key| Violation::EqualKeyValue {
                kind,
                key: key.to_string(),
            })
            .collect(),
    )
}

/// Whether Apple asset catalogs can represent this variant.
pub fn is_apple_valid_variant(variant: &QualityVariant) -> bool {
    match variant.quality.as_deref() {
        None => true,
        Some(quality) => APPLE_VALID_SCALES.contains(&quality),
    }
}

/// Requires each image to have at least one Apple-representable variant.
pub fn check_apple_image_scales(images: &[ImageMetadata]) -> Result<(), Violations> {
    Violations::check(
        images
            .iter()
            .filter(|image| !image.values.iter().any(is_apple_valid_variant))
            .map(|image| Violation::NoValidScaleVariant {
                key: image.key.clone(),
            })
            .collect(),
    )
}
