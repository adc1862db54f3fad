//! Apple backend: `.lproj` string tables, `.stringsdict` plurals and an
//! `Assets.xcassets` catalog for images and colors.
//!
//! The base locale is published both as `Base.lproj` and under the configured
//! localization region, unless that region has its own translations.

use std::{collections::BTreeMap, path::PathBuf};

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;
use tracing::debug;

use crate::{
    code::{Arg, Initializer, Modifier, PropertySpec, TypeName},
    error::Error,
    generators::{GeneratorContext, copy_file, for_each_parallel, group_by_locale, write_file},
    locale::Locale,
    text::escape_apple,
    traits::PlatformResourceGenerator,
    types::{
        AssetMetadata, ColorMetadata, FontMetadata, ImageMetadata, PluralForms, PluralMetadata,
        ResourceKind, Rgba, StringMetadata, file_name_of,
    },
    validation::{APPLE_VALID_SCALES, is_apple_valid_variant},
};

const ASSET_CATALOG: &str = "Assets.xcassets";
const STRINGS_FILE: &str = "Localizable.strings";
const STRINGSDICT_FILE: &str = "Localizable.stringsdict";
const BUNDLE_PROPERTY: &str = "bundle";

#[derive(Debug, Serialize)]
struct CatalogInfo {
    version: u32,
    author: &'static str,
}

const CATALOG_INFO: CatalogInfo = CatalogInfo {
    version: 1,
    author: "xcode",
};

#[derive(Debug, Serialize)]
struct CatalogContents {
    info: CatalogInfo,
}

#[derive(Debug, Serialize)]
struct ImageSetEntry {
    idiom: &'static str,
    filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scale: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageSetProperties {
    #[serde(rename = "preserves-vector-representation")]
    preserves_vector_representation: bool,
}

#[derive(Debug, Serialize)]
struct ImageSetContents {
    images: Vec<ImageSetEntry>,
    info: CatalogInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<ImageSetProperties>,
}

#[derive(Debug, Serialize)]
struct Appearance {
    appearance: &'static str,
    value: &'static str,
}

#[derive(Debug, Serialize)]
struct ColorComponents {
    red: String,
    green: String,
    blue: String,
    alpha: String,
}

impl From<Rgba> for ColorComponents {
    fn from(color: Rgba) -> Self {
        Self {
            red: format!("0x{:02X}", color.red()),
            green: format!("0x{:02X}", color.green()),
            blue: format!("0x{:02X}", color.blue()),
            alpha: format!("{:.3}", f64::from(color.alpha()) / 255.0),
        }
    }
}

#[derive(Debug, Serialize)]
struct ColorDefinition {
    #[serde(rename = "color-space")]
    color_space: &'static str,
    components: ColorComponents,
}

#[derive(Debug, Serialize)]
struct ColorSetEntry {
    idiom: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    appearances: Option<Vec<Appearance>>,
    color: ColorDefinition,
}

impl ColorSetEntry {
    fn new(color: Rgba, dark: bool) -> Self {
        Self {
            idiom: "universal",
            appearances: dark.then(|| {
                vec![Appearance {
                    appearance: "luminosity",
                    value: "dark",
                }]
            }),
            color: ColorDefinition {
                color_space: "srgb",
                components: color.into(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ColorSetContents {
    colors: Vec<ColorSetEntry>,
    info: CatalogInfo,
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    let mut out = serde_json::to_vec_pretty(value)?;
    out.push(b'\n');
    Ok(out)
}

fn lproj(name: &str) -> String {
    format!("{}.lproj", name)
}

/// Output directory name → entries, with the base locale mirrored into the
/// localization region unless that region is translated explicitly.
fn localization_dirs<'m, T>(
    ctx: &GeneratorContext,
    grouped: BTreeMap<&'m Locale, Vec<(&'m str, &'m T)>>,
) -> Vec<(String, Vec<(&'m str, &'m T)>)> {
    let mut dirs: BTreeMap<String, Vec<(&str, &T)>> = BTreeMap::new();
    for (locale, entries) in grouped {
        if locale.is_base() {
            dirs.insert(
                lproj(&ctx.settings.ios_localization_region),
                entries.clone(),
            );
        }
        dirs.insert(lproj(&locale.apple_name()), entries);
    }
    dirs.into_iter().collect()
}

fn bundle_ref() -> Arg {
    Arg::Ref(BUNDLE_PROPERTY.to_string())
}

fn write_catalog_contents(ctx: &GeneratorContext) -> Result<(), Error> {
    write_file(
        &ctx.path(ASSET_CATALOG).join("Contents.json"),
        to_json(&CatalogContents { info: CATALOG_INFO })?,
    )
}

macro_rules! apple_generator {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a> {
            ctx: &'a GeneratorContext,
        }

        impl<'a> $name<'a> {
            pub fn new(ctx: &'a GeneratorContext) -> Self {
                Self { ctx }
            }
        }
    };
}

apple_generator!(
    /// `<locale>.lproj/Localizable.strings`.
    StringsGenerator
);
apple_generator!(
    /// `<locale>.lproj/Localizable.stringsdict`.
    PluralsGenerator
);
apple_generator!(
    /// One `<key>.imageset` per image in the asset catalog.
    ImagesGenerator
);
apple_generator!(FontsGenerator);
apple_generator!(
    /// One `<key>.colorset` per color in the asset catalog.
    ColorsGenerator
);
apple_generator!(AssetsGenerator);

/// The resources bundle property shared by every Apple accessor object.
fn bundle_property(ctx: &GeneratorContext) -> PropertySpec {
    let identifier = if ctx.settings.package_name.is_empty() {
        ctx.settings.class_name.clone()
    } else {
        format!("{}.{}", ctx.settings.package_name, ctx.settings.class_name)
    };
    PropertySpec::new(BUNDLE_PROPERTY, TypeName::new("platform.Foundation", "NSBundle"))
        .with_modifier(Modifier::Private)
        .with_initializer(Some(
            Initializer::new("NSBundle.loadableBundle").positional(Arg::Str(identifier)),
        ))
}

fn bundle_imports(ctx: &GeneratorContext) -> Vec<TypeName> {
    vec![
        TypeName::new("platform.Foundation", "NSBundle"),
        TypeName::new(
            format!("{}.utils", ctx.settings.runtime_package),
            "loadableBundle",
        ),
    ]
}

/// Implements the parts every Apple generator shares.
macro_rules! bundle_backed {
    ($metadata:ty) => {
        fn imports(&self) -> Vec<TypeName> {
            bundle_imports(self.ctx)
        }

        fn generate_before_properties(&self, _metadata: &[$metadata]) -> Vec<PropertySpec> {
            vec![bundle_property(self.ctx)]
        }
    };
}

impl PlatformResourceGenerator<StringMetadata> for StringsGenerator<'_> {
    bundle_backed!(StringMetadata);

    fn generate_initializer(&self, metadata: &StringMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Strings.resource_type_name())
                .arg("resourceId", Arg::Str(metadata.key.clone()))
                .arg("bundle", bundle_ref()),
        )
    }

    fn generate_resource_files(&self, data: &[StringMetadata]) -> Result<(), Error> {
        let grouped = group_by_locale(data.iter().map(|m| (m.key.as_str(), &m.values)));
        let dirs = localization_dirs(self.ctx, grouped);
        debug!(dirs = dirs.len(), "writing apple string tables");

        for_each_parallel(&dirs, |(dir, entries)| {
            let mut content = String::new();
            for (key, value) in entries {
                content.push_str(&format!(
                    "\"{}\" = \"{}\";\n",
                    escape_apple(key),
                    escape_apple(value)
                ));
            }
            write_file(&self.ctx.path(dir).join(STRINGS_FILE), content)
        })
    }
}

fn write_plist_key<W: std::io::Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<(), Error> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Renders a `.stringsdict` property list for one locale.
fn stringsdict(entries: &[(&str, &PluralForms)]) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    {
        let mut writer = Writer::new_with_indent(&mut buffer, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::DocType(BytesText::from_escaped(
            r#"plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd""#,
        )))?;
        let mut plist = BytesStart::new("plist");
        plist.push_attribute(("version", "1.0"));
        writer.write_event(Event::Start(plist))?;
        writer.write_event(Event::Start(BytesStart::new("dict")))?;

        for (key, forms) in entries {
            write_plist_key(&mut writer, "key", key)?;
            writer.write_event(Event::Start(BytesStart::new("dict")))?;
            write_plist_key(&mut writer, "key", "NSStringLocalizedFormatKey")?;
            write_plist_key(&mut writer, "string", "%#@value@")?;
            write_plist_key(&mut writer, "key", "value")?;
            writer.write_event(Event::Start(BytesStart::new("dict")))?;
            write_plist_key(&mut writer, "key", "NSStringFormatSpecTypeKey")?;
            write_plist_key(&mut writer, "string", "NSStringPluralRuleType")?;
            write_plist_key(&mut writer, "key", "NSStringFormatValueTypeKey")?;
            write_plist_key(&mut writer, "string", "d")?;
            for (category, value) in forms.iter() {
                write_plist_key(&mut writer, "key", category.as_str())?;
                write_plist_key(&mut writer, "string", value)?;
            }
            writer.write_event(Event::End(BytesEnd::new("dict")))?;
            writer.write_event(Event::End(BytesEnd::new("dict")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("dict")))?;
        writer.write_event(Event::End(BytesEnd::new("plist")))?;
    }
    buffer.push(b'\n');
    Ok(buffer)
}

impl PlatformResourceGenerator<PluralMetadata> for PluralsGenerator<'_> {
    bundle_backed!(PluralMetadata);

    fn generate_initializer(&self, metadata: &PluralMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Plurals.resource_type_name())
                .arg("resourceId", Arg::Str(metadata.key.clone()))
                .arg("bundle", bundle_ref()),
        )
    }

    fn generate_resource_files(&self, data: &[PluralMetadata]) -> Result<(), Error> {
        let grouped = group_by_locale(data.iter().map(|m| (m.key.as_str(), &m.values)));
        let dirs = localization_dirs(self.ctx, grouped);

        for_each_parallel(&dirs, |(dir, entries)| {
            write_file(
                &self.ctx.path(dir).join(STRINGSDICT_FILE),
                stringsdict(entries)?,
            )
        })
    }
}

impl ImagesGenerator<'_> {
    fn write_image_set(&self, image: &ImageMetadata) -> Result<(), Error> {
        let variants: Vec<_> = image
            .values
            .iter()
            .filter(|variant| is_apple_valid_variant(variant))
            .collect();
        if variants.is_empty() {
            return Err(Error::invalid_data(
                &image.key,
                format!(
                    "no variant with a supported Apple scale; allowed scales are {{{}}} or a vector image",
                    APPLE_VALID_SCALES.join(", ")
                ),
            ));
        }

        let dir = self
            .ctx
            .path(ASSET_CATALOG)
            .join(format!("{}.imageset", image.key));
        let contents = ImageSetContents {
            images: variants
                .iter()
                .map(|variant| ImageSetEntry {
                    idiom: "universal",
                    filename: variant.file_name(),
                    scale: variant.quality.as_ref().map(|q| format!("{}x", q)),
                })
                .collect(),
            info: CATALOG_INFO,
            properties: variants
                .iter()
                .any(|variant| variant.is_vector())
                .then_some(ImageSetProperties {
                    preserves_vector_representation: true,
                }),
        };

        for variant in &variants {
            copy_file(&variant.file_path, &dir.join(variant.file_name()))?;
        }
        write_file(&dir.join("Contents.json"), to_json(&contents)?)
    }
}

impl PlatformResourceGenerator<ImageMetadata> for ImagesGenerator<'_> {
    bundle_backed!(ImageMetadata);

    fn generate_initializer(&self, metadata: &ImageMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Images.resource_type_name())
                .arg("assetImageName", Arg::Str(metadata.key.clone()))
                .arg("bundle", bundle_ref()),
        )
    }

    fn generate_resource_files(&self, data: &[ImageMetadata]) -> Result<(), Error> {
        write_catalog_contents(self.ctx)?;
        for_each_parallel(data, |image| self.write_image_set(image))
    }
}

impl PlatformResourceGenerator<FontMetadata> for FontsGenerator<'_> {
    bundle_backed!(FontMetadata);

    fn generate_initializer(&self, metadata: &FontMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Fonts.resource_type_name())
                .arg("fileName", Arg::Str(metadata.file_name()))
                .arg("bundle", bundle_ref()),
        )
    }

    fn generate_resource_files(&self, data: &[FontMetadata]) -> Result<(), Error> {
        for_each_parallel(data, |font| {
            copy_file(
                &font.file_path,
                &self.ctx.path("fonts").join(font.file_name()),
            )
        })
    }
}

impl PlatformResourceGenerator<ColorMetadata> for ColorsGenerator<'_> {
    bundle_backed!(ColorMetadata);

    fn generate_initializer(&self, metadata: &ColorMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Colors.resource_type_name())
                .arg("name", Arg::Str(metadata.key.clone()))
                .arg("bundle", bundle_ref()),
        )
    }

    fn generate_resource_files(&self, data: &[ColorMetadata]) -> Result<(), Error> {
        write_catalog_contents(self.ctx)?;
        for_each_parallel(data, |color| {
            let mut colors = vec![ColorSetEntry::new(color.value.light(), false)];
            if let Some(dark) = color.value.dark() {
                colors.push(ColorSetEntry::new(dark, true));
            }
            let contents = ColorSetContents {
                colors,
                info: CATALOG_INFO,
            };
            write_file(
                &self
                    .ctx
                    .path(ASSET_CATALOG)
                    .join(format!("{}.colorset", color.key))
                    .join("Contents.json"),
                to_json(&contents)?,
            )
        })
    }
}

impl AssetsGenerator<'_> {
    fn target(&self, asset: &AssetMetadata) -> PathBuf {
        self.ctx.path("files").join(&asset.relative_path)
    }
}

impl PlatformResourceGenerator<AssetMetadata> for AssetsGenerator<'_> {
    bundle_backed!(AssetMetadata);

    fn generate_initializer(&self, metadata: &AssetMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Assets.resource_type_name())
                .arg("originalPath", Arg::Str(metadata.relative_path.clone()))
                .arg("fileName", Arg::Str(file_name_of(&metadata.file_path)))
                .arg("bundle", bundle_ref()),
        )
    }

    fn generate_resource_files(&self, data: &[AssetMetadata]) -> Result<(), Error> {
        for_each_parallel(data, |asset| copy_file(&asset.file_path, &self.target(asset)))
    }
}
