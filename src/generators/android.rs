//! Android backend: `values*/` XML tables, density-bucketed drawables and
//! accessors referencing the generated `R` class.

use std::{io::Write, path::PathBuf};

use quick_xml::{
    Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use tracing::debug;

use crate::{
    code::{Arg, Initializer, TypeName},
    error::Error,
    generators::{GeneratorContext, copy_file, for_each_parallel, group_by_locale, write_file},
    locale::Locale,
    text::{escape_android, sanitize_key},
    traits::PlatformResourceGenerator,
    types::{
        AssetMetadata, ColorMetadata, FontMetadata, ImageMetadata, PluralMetadata, QualityVariant,
        ResourceKind, StringMetadata,
    },
};

const STRINGS_FILE: &str = "multiplatform_strings.xml";
const PLURALS_FILE: &str = "multiplatform_plurals.xml";
const COLORS_FILE: &str = "multiplatform_colors.xml";

/// Android resource name for a file-derived key.
pub fn android_name(key: &str) -> String {
    sanitize_key(key).to_ascii_lowercase()
}

/// Android resource name for a `values` entry (strings, plurals, colors).
///
/// Case is kept; characters outside `[A-Za-z0-9_]` become `_` and a leading
/// digit is prefixed with `_`.
pub fn value_name(key: &str) -> String {
    let name = sanitize_key(key);
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}

/// Drawable density bucket for an image scale label.
pub fn density_of(quality: &str) -> Option<&'static str> {
    match quality {
        "0.75" => Some("ldpi"),
        "1" => Some("mdpi"),
        "1.5" => Some("hdpi"),
        "2" => Some("xhdpi"),
        "3" => Some("xxhdpi"),
        "4" => Some("xxxhdpi"),
        _ => None,
    }
}

fn values_dir(locale: &Locale) -> String {
    match locale.android_qualifier() {
        Some(qualifier) => format!("values-{}", qualifier),
        None => "values".to_string(),
    }
}

fn r_reference(group: &str, name: &str) -> Arg {
    Arg::Ref(format!("R.{}.{}", group, name))
}

fn r_class(ctx: &GeneratorContext) -> TypeName {
    TypeName::new(ctx.settings.r_class_package(), "R")
}

/// Builds a `<resources>` document, letting `body` write the children.
fn resources_document<F>(body: F) -> Result<Vec<u8>, Error>
where
    F: FnOnce(&mut Writer<&mut Vec<u8>>) -> Result<(), Error>,
{
    let mut buffer = Vec::new();
    {
        let mut writer = Writer::new_with_indent(&mut buffer, b' ', 4);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("resources")))?;
        body(&mut writer)?;
        writer.write_event(Event::End(BytesEnd::new("resources")))?;
    }
    buffer.push(b'\n');
    Ok(buffer)
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<(), Error> {
    let mut start = BytesStart::new(tag);
    for attribute in attributes {
        start.push_attribute(*attribute);
    }
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

macro_rules! android_generator {
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

android_generator!(
    /// `values[-q]/multiplatform_strings.xml` per locale.
    StringsGenerator
);
android_generator!(
    /// `values[-q]/multiplatform_plurals.xml` per locale.
    PluralsGenerator
);
android_generator!(
    /// Raster variants copied into `drawable-<density>/`.
    ImagesGenerator
);
android_generator!(FontsGenerator);
android_generator!(
    /// Light colors in `values/`, dark variants in `values-night/`.
    ColorsGenerator
);
android_generator!(AssetsGenerator);

impl PlatformResourceGenerator<StringMetadata> for StringsGenerator<'_> {
    fn imports(&self) -> Vec<TypeName> {
        vec![r_class(self.ctx)]
    }

    fn generate_initializer(&self, metadata: &StringMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Strings.resource_type_name())
                .arg("resourceId", r_reference("string", &value_name(&metadata.key))),
        )
    }

    fn generate_resource_files(&self, data: &[StringMetadata]) -> Result<(), Error> {
        let grouped: Vec<_> = group_by_locale(data.iter().map(|m| (m.key.as_str(), &m.values)))
            .into_iter()
            .collect();
        debug!(locales = grouped.len(), "writing android strings");

        for_each_parallel(&grouped, |(locale, entries)| {
            let document = resources_document(|writer| {
                for (key, value) in entries {
                    write_text_element(
                        writer,
                        "string",
                        &[("name", value_name(key).as_str())],
                        &escape_android(value),
                    )?;
                }
                Ok(())
            })?;
            write_file(
                &self.ctx.path(values_dir(locale)).join(STRINGS_FILE),
                document,
            )
        })
    }
}

impl PlatformResourceGenerator<PluralMetadata> for PluralsGenerator<'_> {
    fn imports(&self) -> Vec<TypeName> {
        vec![r_class(self.ctx)]
    }

    fn generate_initializer(&self, metadata: &PluralMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Plurals.resource_type_name())
                .arg("resourceId", r_reference("plurals", &value_name(&metadata.key))),
        )
    }

    fn generate_resource_files(&self, data: &[PluralMetadata]) -> Result<(), Error> {
        let grouped: Vec<_> = group_by_locale(data.iter().map(|m| (m.key.as_str(), &m.values)))
            .into_iter()
            .collect();

        for_each_parallel(&grouped, |(locale, entries)| {
            let document = resources_document(|writer| {
                for (key, forms) in entries {
                    let mut start = BytesStart::new("plurals");
                    start.push_attribute(("name", value_name(key).as_str()));
                    writer.write_event(Event::Start(start))?;
                    for (category, value) in forms.iter() {
                        write_text_element(
                            writer,
                            "item",
                            &[("quantity", category.as_str())],
                            &escape_android(value),
                        )?;
                    }
                    writer.write_event(Event::End(BytesEnd::new("plurals")))?;
                }
                Ok(())
            })?;
            write_file(
                &self.ctx.path(values_dir(locale)).join(PLURALS_FILE),
                document,
            )
        })
    }
}

impl ImagesGenerator<'_> {
    /// Raster variants with a drawable bucket, paired with their target path.
    fn drawables(&self, image: &ImageMetadata) -> Vec<(PathBuf, PathBuf)> {
        let name = android_name(&image.key);
        image
            .values
            .iter()
            .filter_map(|variant: &QualityVariant| {
                let density = density_of(variant.quality.as_deref()?)?;
                let target = self
                    .ctx
                    .path(format!("drawable-{}", density))
                    .join(format!("{}.{}", name, variant.extension()));
                Some((variant.file_path.clone(), target))
            })
            .collect()
    }

    /// Where a vector-only image is shipped: `raw/<name>.<ext>`.
    fn raw_target(&self, image: &ImageMetadata) -> Option<(PathBuf, PathBuf)> {
        let vector = image.values.iter().find(|variant| variant.is_vector())?;
        let target = self.ctx.path("raw").join(format!(
            "{}.{}",
            android_name(&image.key),
            vector.extension()
        ));
        Some((vector.file_path.clone(), target))
    }

    /// Files to copy for one image. Raster drawables win; an image without
    /// any is shipped as a raw resource when it has a vector variant.
    fn placements(&self, image: &ImageMetadata) -> Result<Vec<(PathBuf, PathBuf)>, Error> {
        let drawables = self.drawables(image);
        if !drawables.is_empty() {
            return Ok(drawables);
        }
        self.raw_target(image).map(|raw| vec![raw]).ok_or_else(|| {
            Error::invalid_data(
                &image.key,
                "no variant Android can ship: raster images need a density scale \
                 (0.75, 1, 1.5, 2, 3 or 4) and there is no vector variant",
            )
        })
    }

    fn has_drawable(image: &ImageMetadata) -> bool {
        image
            .values
            .iter()
            .any(|variant| variant.quality.as_deref().and_then(density_of).is_some())
    }
}

impl PlatformResourceGenerator<ImageMetadata> for ImagesGenerator<'_> {
    fn imports(&self) -> Vec<TypeName> {
        vec![r_class(self.ctx)]
    }

    fn generate_initializer(&self, metadata: &ImageMetadata) -> Option<Initializer> {
        let name = android_name(&metadata.key);
        let init = Initializer::new(ResourceKind::Images.resource_type_name());
        Some(if Self::has_drawable(metadata) {
            init.arg("drawableResId", r_reference("drawable", &name))
        } else {
            init.arg("rawResId", r_reference("raw", &name))
        })
    }

    fn generate_resource_files(&self, data: &[ImageMetadata]) -> Result<(), Error> {
        for_each_parallel(data, |image| {
            for (source, target) in self.placements(image)? {
                copy_file(&source, &target)?;
            }
            Ok(())
        })
    }
}

impl FontsGenerator<'_> {
    fn target(&self, font: &FontMetadata) -> PathBuf {
        let extension = font
            .file_path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        self.ctx
            .path("font")
            .join(format!("{}.{}", android_name(&font.key), extension))
    }
}

impl PlatformResourceGenerator<FontMetadata> for FontsGenerator<'_> {
    fn imports(&self) -> Vec<TypeName> {
        vec![r_class(self.ctx)]
    }

    fn generate_initializer(&self, metadata: &FontMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Fonts.resource_type_name()).arg(
                "fontResourceId",
                r_reference("font", &android_name(&metadata.key)),
            ),
        )
    }

    fn generate_resource_files(&self, data: &[FontMetadata]) -> Result<(), Error> {
        for_each_parallel(data, |font| copy_file(&font.file_path, &self.target(font)))
    }
}

impl PlatformResourceGenerator<ColorMetadata> for ColorsGenerator<'_> {
    fn imports(&self) -> Vec<TypeName> {
        vec![r_class(self.ctx)]
    }

    fn generate_initializer(&self, metadata: &ColorMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Colors.resource_type_name())
                .arg("resourceId", r_reference("color", &value_name(&metadata.key))),
        )
    }

    fn generate_resource_files(&self, data: &[ColorMetadata]) -> Result<(), Error> {
        let light = resources_document(|writer| {
            for color in data {
                write_text_element(
                    writer,
                    "color",
                    &[("name", value_name(&color.key).as_str())],
                    &color.value.light().to_argb_hex(),
                )?;
            }
            Ok(())
        })?;
        write_file(&self.ctx.path("values").join(COLORS_FILE), light)?;

        let themed: Vec<_> = data
            .iter()
            .filter_map(|color| Some((color.key.as_str(), color.value.dark()?)))
            .collect();
        if themed.is_empty() {
            return Ok(());
        }
        let dark = resources_document(|writer| {
            for (key, color) in &themed {
                write_text_element(
                    writer,
                    "color",
                    &[("name", value_name(key).as_str())],
                    &color.to_argb_hex(),
                )?;
            }
            Ok(())
        })?;
        write_file(&self.ctx.path("values-night").join(COLORS_FILE), dark)
    }
}

impl PlatformResourceGenerator<AssetMetadata> for AssetsGenerator<'_> {
    fn generate_initializer(&self, metadata: &AssetMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Assets.resource_type_name())
                .arg("path", Arg::Str(metadata.relative_path.clone())),
        )
    }

    fn generate_resource_files(&self, data: &[AssetMetadata]) -> Result<(), Error> {
        for_each_parallel(data, |asset| {
            copy_file(
                &asset.file_path,
                &self.ctx.path("assets").join(&asset.relative_path),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::types::{ColorValue, PluralCategory, PluralForms, Rgba};
    use std::collections::BTreeMap;
    use std::fs;

    fn context(dir: &std::path::Path) -> GeneratorContext {
        GeneratorContext::new(
            Settings::new().with_package_name("com.example.app"),
            dir,
        )
    }

    #[test]
    fn test_values_dir_per_locale() {
        assert_eq!(values_dir(&Locale::Base), "values");
        assert_eq!(values_dir(&Locale::tag("en", Some("US"))), "values-en-rUS");
    }

    #[test]
    fn test_strings_written_per_locale() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let data = vec![StringMetadata {
            key: "greeting".to_string(),
            values: BTreeMap::from([
                (Locale::Base, "It's <b>".to_string()),
                (Locale::tag("de", None), "Hallo".to_string()),
            ]),
        }];

        StringsGenerator::new(&ctx).generate_resource_files(&data).unwrap();

        let base = fs::read_to_string(dir.path().join("values").join(STRINGS_FILE)).unwrap();
        assert!(base.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(base.contains(r#"<string name="greeting">It\'s &lt;b&gt;</string>"#));
        let de = fs::read_to_string(dir.path().join("values-de").join(STRINGS_FILE)).unwrap();
        assert!(de.contains(r#"<string name="greeting">Hallo</string>"#));
    }

    #[test]
    fn test_strings_escape_backslashes_and_sanitize_names() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let data = vec![StringMetadata {
            key: "sign-in.path".to_string(),
            values: BTreeMap::from([(Locale::Base, r"C:\temp\new".to_string())]),
        }];

        let generator = StringsGenerator::new(&ctx);
        generator.generate_resource_files(&data).unwrap();

        let base = fs::read_to_string(dir.path().join("values").join(STRINGS_FILE)).unwrap();
        assert!(base.contains(r#"<string name="sign_in_path">C:\\temp\\new</string>"#));
        let init = generator.generate_initializer(&data[0]).unwrap();
        assert_eq!(
            init.args[0].1,
            Arg::Ref("R.string.sign_in_path".to_string())
        );
    }

    #[test]
    fn test_strings_initializer_references_r() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let generator = StringsGenerator::new(&ctx);
        let metadata = StringMetadata {
            key: "greeting".to_string(),
            values: BTreeMap::new(),
        };

        let init = generator.generate_initializer(&metadata).unwrap();
        assert_eq!(init.callee, "StringResource");
        assert_eq!(
            init.args,
            vec![(
                Some("resourceId".to_string()),
                Arg::Ref("R.string.greeting".to_string())
            )]
        );
        assert_eq!(
            generator.imports(),
            vec![TypeName::new("com.example.app", "R")]
        );
    }

    #[test]
    fn test_plurals_document() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let mut forms = PluralForms::new();
        forms.insert(PluralCategory::One, "%d item".to_string());
        forms.insert(PluralCategory::Other, "%d items".to_string());
        let data = vec![PluralMetadata {
            key: "items".to_string(),
            values: BTreeMap::from([(Locale::Base, forms)]),
        }];

        PluralsGenerator::new(&ctx).generate_resource_files(&data).unwrap();

        let content = fs::read_to_string(dir.path().join("values").join(PLURALS_FILE)).unwrap();
        assert!(content.contains(r#"<plurals name="items">"#));
        assert!(content.contains(r#"<item quantity="one">%d item</item>"#));
        assert!(content.contains(r#"<item quantity="other">%d items</item>"#));
    }

    #[test]
    fn test_images_copied_into_density_buckets() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let ctx = context(output.path());
        let one = input.path().join("logo.png");
        let four = input.path().join("logo@4x.png");
        fs::write(&one, b"1x").unwrap();
        fs::write(&four, b"4x").unwrap();

        let data = vec![ImageMetadata {
            key: "Logo".to_string(),
            values: vec![
                QualityVariant {
                    quality: Some("1".to_string()),
                    file_path: one,
                },
                QualityVariant {
                    quality: Some("4".to_string()),
                    file_path: four,
                },
            ],
        }];
        ImagesGenerator::new(&ctx).generate_resource_files(&data).unwrap();

        assert_eq!(
            fs::read(output.path().join("drawable-mdpi/logo.png")).unwrap(),
            b"1x"
        );
        assert_eq!(
            fs::read(output.path().join("drawable-xxxhdpi/logo.png")).unwrap(),
            b"4x"
        );
    }

    #[test]
    fn test_vector_only_image_is_shipped_as_raw() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let ctx = context(output.path());
        let svg = input.path().join("Icon.svg");
        fs::write(&svg, b"<svg/>").unwrap();
        let data = vec![ImageMetadata {
            key: "Icon".to_string(),
            values: vec![QualityVariant {
                quality: None,
                file_path: svg,
            }],
        }];

        let generator = ImagesGenerator::new(&ctx);
        generator.generate_resource_files(&data).unwrap();
        assert_eq!(
            fs::read(output.path().join("raw/icon.svg")).unwrap(),
            b"<svg/>"
        );

        let init = generator.generate_initializer(&data[0]).unwrap();
        assert_eq!(
            init.args,
            vec![(
                Some("rawResId".to_string()),
                Arg::Ref("R.raw.icon".to_string())
            )]
        );
    }

    #[test]
    fn test_image_without_shippable_variant_is_rejected() {
        let output = tempfile::tempdir().unwrap();
        let ctx = context(output.path());
        let data = vec![ImageMetadata {
            key: "icon".to_string(),
            values: vec![QualityVariant {
                quality: Some("5".to_string()),
                file_path: PathBuf::from("icon@5x.png"),
            }],
        }];
        let err = ImagesGenerator::new(&ctx)
            .generate_resource_files(&data)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidResourceData { ref key, .. } if key == "icon"));
        assert!(err.to_string().contains("no vector variant"));
    }

    #[test]
    fn test_colors_split_light_and_night() {
        let output = tempfile::tempdir().unwrap();
        let ctx = context(output.path());
        let data = vec![
            ColorMetadata {
                key: "accent".to_string(),
                value: ColorValue::Single(Rgba(0xB02743FF)),
            },
            ColorMetadata {
                key: "surface".to_string(),
                value: ColorValue::Themed {
                    light: Rgba(0xFFFFFFFF),
                    dark: Rgba(0x12121280),
                },
            },
        ];
        ColorsGenerator::new(&ctx).generate_resource_files(&data).unwrap();

        let light = fs::read_to_string(output.path().join("values").join(COLORS_FILE)).unwrap();
        assert!(light.contains(r##"<color name="accent">#FFB02743</color>"##));
        assert!(light.contains(r##"<color name="surface">#FFFFFFFF</color>"##));
        let night =
            fs::read_to_string(output.path().join("values-night").join(COLORS_FILE)).unwrap();
        assert!(night.contains(r##"<color name="surface">#80121212</color>"##));
        assert!(!night.contains("accent"));
    }

    #[test]
    fn test_color_names_are_sanitized() {
        let output = tempfile::tempdir().unwrap();
        let ctx = context(output.path());
        let data = vec![ColorMetadata {
            key: "brand-primary".to_string(),
            value: ColorValue::Single(Rgba(0x000000FF)),
        }];
        let generator = ColorsGenerator::new(&ctx);
        generator.generate_resource_files(&data).unwrap();

        let light = fs::read_to_string(output.path().join("values").join(COLORS_FILE)).unwrap();
        assert!(light.contains(r##"<color name="brand_primary">#FF000000</color>"##));
        assert_eq!(
            generator.generate_initializer(&data[0]).unwrap().args[0].1,
            Arg::Ref("R.color.brand_primary".to_string())
        );
    }

    #[test]
    fn test_density_of() {
        assert_eq!(density_of("1.5"), Some("hdpi"));
        assert_eq!(density_of("5"), None);
        assert_eq!(android_name("Roboto-Bold"), "roboto_bold");
        assert_eq!(value_name("sign-in"), "sign_in");
        assert_eq!(value_name("2fa_title"), "_2fa_title");
        assert_eq!(value_name("helloWorld"), "helloWorld");
    }
}
