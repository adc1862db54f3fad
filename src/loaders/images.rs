//! Loader for image resources.
//!
//! Images live below an `images/` directory. Raster files carry their scale in
//! the file name (`logo@2x.png`); a raster file without a suffix is 1x and an
//! `.svg` file is a scale-agnostic vector. All files sharing a base name are
//! variants of one key. Images are not localized: every file belongs to the
//! base locale.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::Error,
    locale::Locale,
    traits::ResourceLoader,
    types::{QualityVariant, ResourceKey, ResourceKind},
};

lazy_static! {
    static ref IMAGE_NAME_REGEX: Regex =
        Regex::new(r"^(?P<name>[^@]+)(?:@(?P<scale>[^@]*)x)?\.(?P<ext>[A-Za-z0-9]+)$").unwrap();
    static ref SCALE_REGEX: Regex = Regex::new(r"^\d+(?:\.\d+)?$").unwrap();
}

#[derive(Debug, Clone, Default)]
pub struct ImagesLoader;

impl ImagesLoader {
    pub fn new() -> Self {
        Self
    }
}

/// Splits an image file name into its key and variant quality.
pub fn parse_image_name(path: &Path) -> Result<(ResourceKey, Option<String>), Error> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::parse(path, "image file name is not valid UTF-8"))?;
    let captures = IMAGE_NAME_REGEX
        .captures(file_name)
        .ok_or_else(|| Error::parse(path, format!("unrecognized image file name `{}`", file_name)))?;

    let name = captures["name"].to_string();
    let is_vector = captures["ext"].eq_ignore_ascii_case("svg");
    let quality = match captures.name("scale").map(|m| m.as_str()) {
        Some(_) if is_vector => {
            return Err(Error::parse(path, "vector images must not carry a scale suffix"));
        }
        Some(scale) if SCALE_REGEX.is_match(scale) => Some(scale.to_string()),
        Some(scale) => {
            return Err(Error::parse(path, format!("invalid image scale `{}`", scale)));
        }
        None if is_vector => None,
        None => Some("1".to_string()),
    };
    Ok((name, quality))
}

impl ResourceLoader for ImagesLoader {
    type Value = Vec<QualityVariant>;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Images
    }

    fn load_file(&self, path: &Path) -> Result<Vec<(ResourceKey, Self::Value)>, Error> {
        let (key, quality) = parse_image_name(path)?;
        Ok(vec![(
            key,
            vec![QualityVariant {
                quality,
                file_path: path.to_path_buf(),
            }],
        )])
    }

    fn locale_of(&self, _path: &Path) -> Result<Locale, Error> {
        Ok(Locale::Base)
    }

    /// Variants accumulate; a later file replaces a variant of the same quality.
    fn fold_value(&self, existing: &mut Self::Value, incoming: Self::Value) {
        for variant in incoming {
            existing.retain(|v| v.quality != variant.quality);
            existing.push(variant);
        }
        existing.sort();
    }
}
