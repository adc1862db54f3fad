//! Loader for `colors*.xml` color tables.
//!
//! ```xml
//! <resources>
//!     <color name="accent">#B02743FF</color>
//!     <color name="surface">
//!         <light>0xFFFFFFFF</light>
//!         <dark>0x121212FF</dark>
//!     </color>
//! </resources>
//! ```
//!
//! Hex values are `RRGGBB` or `RRGGBBAA`.

use std::path::Path;

use crate::{
    document::{Document, Element},
    error::Error,
    traits::ResourceLoader,
    types::{ColorValue, ResourceKey, ResourceKind, Rgba},
};

#[derive(Debug, Clone, Default)]
pub struct ColorsLoader;

impl ColorsLoader {
    pub fn new() -> Self {
        Self
    }
}

fn parse_color(path: &Path, name: &str, element: &Element) -> Result<ColorValue, Error> {
    let hex = |element: &Element| {
        let text = element.text_content();
        Rgba::parse_hex(&text).ok_or_else(|| {
            Error::parse(path, format!("color `{}` has invalid value `{}`", name, text.trim()))
        })
    };

    let light = element.children_named("light").next();
    let dark = element.children_named("dark").next();
    match (light, dark) {
        (None, None) => Ok(ColorValue::Single(hex(element)?)),
        (Some(light), Some(dark)) => Ok(ColorValue::Themed {
            light: hex(light)?,
            dark: hex(dark)?,
        }),
        _ => Err(Error::parse(
            path,
            format!("color `{}` must define both <light> and <dark>", name),
        )),
    }
}

impl ResourceLoader for ColorsLoader {
    type Value = ColorValue;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Colors
    }

    fn load_file(&self, path: &Path) -> Result<Vec<(ResourceKey, ColorValue)>, Error> {
        let doc = Document::read_from(path)?;
        doc.root
            .children_named("color")
            .map(|element| {
                let name = element
                    .attribute("name")
                    .ok_or_else(|| Error::parse(path, "color tag missing 'name'"))?;
                Ok((name.to_string(), parse_color(path, name, element)?))
            })
            .collect()
    }
}
