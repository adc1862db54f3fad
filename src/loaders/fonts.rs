//! Loader for font files below a `fonts/` directory; the key is the file stem.

use std::path::{Path, PathBuf};

use crate::{
    error::Error,
    locale::Locale,
    traits::ResourceLoader,
    types::{ResourceKey, ResourceKind},
};

#[derive(Debug, Clone, Default)]
pub struct FontsLoader;

impl FontsLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceLoader for FontsLoader {
    type Value = PathBuf;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Fonts
    }

    fn load_file(&self, path: &Path) -> Result<Vec<(ResourceKey, PathBuf)>, Error> {
        let key = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| Error::parse(path, "font file name is not valid UTF-8"))?;
        Ok(vec![(key.to_string(), path.to_path_buf())])
    }

    fn locale_of(&self, _path: &Path) -> Result<Locale, Error> {
        Ok(Locale::Base)
    }
}
