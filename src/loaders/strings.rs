//! Loader for `strings*.xml` string tables.
//!
//! ```xml
//! <resources>
//!     <string name="welcome">Welcome!</string>
//! </resources>
//! ```

use std::path::Path;

use crate::{
    document::Document,
    error::Error,
    settings::Settings,
    text::normalize,
    traits::ResourceLoader,
    types::{RawResourceMap, ResourceKey, ResourceKind},
    validation::check_equal_key_values,
};

#[derive(Debug, Clone, Default)]
pub struct StringsLoader {
    strict_line_breaks: bool,
}

impl StringsLoader {
    pub fn new(settings: &Settings) -> Self {
        Self {
            strict_line_breaks: settings.strict_line_breaks,
        }
    }
}

impl ResourceLoader for StringsLoader {
    type Value = String;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Strings
    }

    fn load_file(&self, path: &Path) -> Result<Vec<(ResourceKey, String)>, Error> {
        let doc = Document::read_from(path)?;
        doc.root
            .children_named("string")
            .map(|element| {
                let name = element.attribute("name").ok_or_else(|| {
                    Error::parse(path, "string tag missing 'name'")
                })?;
                let value = normalize(element.text_content(), self.strict_line_breaks);
                Ok((name.to_string(), value))
            })
            .collect()
    }

    fn check(&self, map: &RawResourceMap<String>) -> Result<(), Error> {
        Ok(check_equal_key_values(self.kind(), map)?)
    }
}
