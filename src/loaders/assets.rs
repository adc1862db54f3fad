//! Loader for raw files below an `assets/` directory.
//!
//! The key is the path relative to `assets/` with every non-alphanumeric
//! character replaced by `_` (`texts/intro.txt` → `texts_intro_txt`).

use std::path::Path;

use crate::{
    error::Error,
    loaders::split_at_ancestor,
    locale::Locale,
    text::sanitize_key,
    traits::ResourceLoader,
    types::{AssetFile, ResourceKey, ResourceKind},
};

const ASSETS_DIR: &str = "assets";

#[derive(Debug, Clone, Default)]
pub struct AssetsLoader;

impl AssetsLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceLoader for AssetsLoader {
    type Value = AssetFile;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Assets
    }

    fn load_file(&self, path: &Path) -> Result<Vec<(ResourceKey, AssetFile)>, Error> {
        let (_, relative) = split_at_ancestor(path, ASSETS_DIR)
            .ok_or_else(|| Error::parse(path, "asset is not inside an `assets` directory"))?;
        let relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Ok(vec![(
            sanitize_key(&relative_path),
            AssetFile {
                relative_path,
                file_path: path.to_path_buf(),
            },
        )])
    }

    fn locale_of(&self, _path: &Path) -> Result<Locale, Error> {
        Ok(Locale::Base)
    }
}
