//! Loader for plural rules, in XML or JSON form.
//!
//! ```xml
//! <resources>
//!     <plural name="items">
//!         <item quantity="one">%d item</item>
//!         <item quantity="other">%d items</item>
//!     </plural>
//! </resources>
//! ```
//!
//! ```json
//! { "items": { "one": "%d item", "other": "%d items" } }
//! ```

use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path, str::FromStr};

use crate::{
    document::{Document, Element},
    error::Error,
    settings::Settings,
    text::normalize,
    traits::ResourceLoader,
    types::{PluralCategory, PluralForms, RawResourceMap, ResourceKey, ResourceKind},
    validation::check_equal_key_values,
};

#[derive(Debug, Clone, Default)]
pub struct PluralsLoader {
    strict_line_breaks: bool,
}

impl PluralsLoader {
    pub fn new(settings: &Settings) -> Self {
        Self {
            strict_line_breaks: settings.strict_line_breaks,
        }
    }

    fn load_xml(&self, path: &Path) -> Result<Vec<(ResourceKey, PluralForms)>, Error> {
        let doc = Document::read_from(path)?;
        doc.root
            .elements()
            .filter(|element| element.name == "plural" || element.name == "plurals")
            .map(|element| {
                let name = element
                    .attribute("name")
                    .ok_or_else(|| Error::parse(path, "plural tag missing 'name'"))?;
                let forms = self.parse_items(path, name, element)?;
                Ok((name.to_string(), forms))
            })
            .collect()
    }

    fn parse_items(&self, path: &Path, name: &str, element: &Element) -> Result<PluralForms, Error> {
        let mut forms = PluralForms::new();
        for item in element.children_named("item") {
            let quantity = item.attribute("quantity").ok_or_else(|| {
                Error::parse(path, format!("plural `{}` has an item without 'quantity'", name))
            })?;
            let category = parse_category(path, name, quantity)?;
            forms.insert(
                category,
                normalize(item.text_content(), self.strict_line_breaks),
            );
        }
        if forms.is_empty() {
            return Err(Error::parse(path, format!("plural `{}` has no items", name)));
        }
        Ok(forms)
    }

    fn load_json(&self, path: &Path) -> Result<Vec<(ResourceKey, PluralForms)>, Error> {
        let file = File::open(path)?;
        let raw: BTreeMap<String, BTreeMap<String, String>> =
            serde_json::from_reader(BufReader::new(file))
                .map_err(|e| Error::parse(path, e.to_string()))?;

        raw.into_iter()
            .map(|(name, items)| {
                if items.is_empty() {
                    return Err(Error::parse(path, format!("plural `{}` has no items", name)));
                }
                let forms = items
                    .into_iter()
                    .map(|(quantity, value)| {
                        Ok((
                            parse_category(path, &name, &quantity)?,
                            normalize(value, self.strict_line_breaks),
                        ))
                    })
                    .collect::<Result<PluralForms, Error>>()?;
                Ok((name, forms))
            })
            .collect()
    }
}

fn parse_category(path: &Path, name: &str, quantity: &str) -> Result<PluralCategory, Error> {
    PluralCategory::from_str(quantity)
        .map_err(|e| Error::parse(path, format!("plural `{}`: {}", name, e)))
}

impl ResourceLoader for PluralsLoader {
    type Value = PluralForms;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Plurals
    }

    fn load_file(&self, path: &Path) -> Result<Vec<(ResourceKey, PluralForms)>, Error> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => self.load_json(path),
            _ => self.load_xml(path),
        }
    }

    fn check(&self, map: &RawResourceMap<PluralForms>) -> Result<(), Error> {
        Ok(check_equal_key_values(self.kind(), map)?)
    }
}
