//! JVM backend: `ResourceBundle` property files and class-path resources
//! loaded through the accessor class's class loader.

use std::path::PathBuf;

use crate::{
    code::{Arg, Initializer, Modifier, PropertySpec, TypeName},
    error::Error,
    generators::{
        GeneratorContext, copy_file, for_each_parallel, group_by_locale, inline_color_initializer,
        write_file,
    },
    locale::Locale,
    text::{escape_properties, escape_properties_key},
    traits::PlatformResourceGenerator,
    types::{
        AssetMetadata, ColorMetadata, FontMetadata, ImageMetadata, PluralMetadata, QualityVariant,
        ResourceKind, StringMetadata,
    },
};

const LOCALIZATION_DIR: &str = "localization";
const CLASS_LOADER_PROPERTY: &str = "resourcesClassLoader";
const STRINGS_BUNDLE_PROPERTY: &str = "stringsBundle";
const PLURALS_BUNDLE_PROPERTY: &str = "pluralsBundle";

fn class_loader_property(ctx: &GeneratorContext) -> PropertySpec {
    PropertySpec::new(
        CLASS_LOADER_PROPERTY,
        TypeName::new("java.lang", "ClassLoader"),
    )
    .with_modifier(Modifier::Private)
    .with_value(Arg::Raw(format!(
        "{}::class.java.classLoader",
        ctx.settings.class_name
    )))
}

/// `localization/<prefix>_<kind>`, the base name of a bundle.
fn bundle_name(ctx: &GeneratorContext, kind: ResourceKind) -> String {
    format!(
        "{}/{}_{}",
        LOCALIZATION_DIR,
        ctx.settings.file_prefix(),
        kind.object_name()
    )
}

fn bundle_property(ctx: &GeneratorContext, name: &str, kind: ResourceKind) -> PropertySpec {
    PropertySpec::new(name, TypeName::new("", "String"))
        .with_modifier(Modifier::Private)
        .with_modifier(Modifier::Const)
        .with_value(Arg::Str(bundle_name(ctx, kind)))
}

fn class_loader_ref() -> Arg {
    Arg::Ref(CLASS_LOADER_PROPERTY.to_string())
}

/// Writes one `.properties` file per locale of a localized kind.
fn write_bundle<T: Sync>(
    ctx: &GeneratorContext,
    kind: ResourceKind,
    grouped: Vec<(&Locale, Vec<(&str, &T)>)>,
    render: impl Fn(&str, &T, &mut String) + Sync,
) -> Result<(), Error> {
    let base = bundle_name(ctx, kind);
    for_each_parallel(&grouped, |(locale, entries)| {
        let mut content = String::new();
        for (key, value) in entries {
            render(key, value, &mut content);
        }
        write_file(
            &ctx.path(format!("{}{}.properties", base, locale.bundle_suffix())),
            content,
        )
    })
}

macro_rules! jvm_generator {
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

jvm_generator!(
    /// `localization/<prefix>_strings[_locale].properties`.
    StringsGenerator
);
jvm_generator!(
    /// `localization/<prefix>_plurals[_locale].properties`, one `key.category`
    /// entry per form.
    PluralsGenerator
);
jvm_generator!(
    /// Ships the preferred variant of every image under `images/`.
    ImagesGenerator
);
jvm_generator!(FontsGenerator);
jvm_generator!(
    /// Colors are carried by the initializers; no files are written.
    ColorsGenerator
);
jvm_generator!(AssetsGenerator);

impl PlatformResourceGenerator<StringMetadata> for StringsGenerator<'_> {
    fn generate_initializer(&self, metadata: &StringMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Strings.resource_type_name())
                .arg("resourcesClassLoader", class_loader_ref())
                .arg("bundleName", Arg::Ref(STRINGS_BUNDLE_PROPERTY.to_string()))
                .arg("key", Arg::Str(metadata.key.clone())),
        )
    }

    fn generate_resource_files(&self, data: &[StringMetadata]) -> Result<(), Error> {
        let grouped = group_by_locale(data.iter().map(|m| (m.key.as_str(), &m.values)))
            .into_iter()
            .collect();
        write_bundle(self.ctx, ResourceKind::Strings, grouped, |key, value, out| {
            out.push_str(&format!(
                "{}={}\n",
                escape_properties_key(key),
                escape_properties(value)
            ));
        })
    }

    fn generate_before_properties(&self, _metadata: &[StringMetadata]) -> Vec<PropertySpec> {
        vec![
            class_loader_property(self.ctx),
            bundle_property(self.ctx, STRINGS_BUNDLE_PROPERTY, ResourceKind::Strings),
        ]
    }
}

impl PlatformResourceGenerator<PluralMetadata> for PluralsGenerator<'_> {
    fn generate_initializer(&self, metadata: &PluralMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Plurals.resource_type_name())
                .arg("resourcesClassLoader", class_loader_ref())
                .arg("bundleName", Arg::Ref(PLURALS_BUNDLE_PROPERTY.to_string()))
                .arg("key", Arg::Str(metadata.key.clone())),
        )
    }

    fn generate_resource_files(&self, data: &[PluralMetadata]) -> Result<(), Error> {
        let grouped = group_by_locale(data.iter().map(|m| (m.key.as_str(), &m.values)))
            .into_iter()
            .collect();
        write_bundle(self.ctx, ResourceKind::Plurals, grouped, |key, forms, out| {
            for (category, value) in forms {
                out.push_str(&format!(
                    "{}.{}={}\n",
                    escape_properties_key(key),
                    category,
                    escape_properties(value)
                ));
            }
        })
    }

    fn generate_before_properties(&self, _metadata: &[PluralMetadata]) -> Vec<PropertySpec> {
        vec![
            class_loader_property(self.ctx),
            bundle_property(self.ctx, PLURALS_BUNDLE_PROPERTY, ResourceKind::Plurals),
        ]
    }
}

/// The single file a JVM or JS image accessor points at.
pub(crate) fn shipped_variant(image: &ImageMetadata) -> Result<&QualityVariant, Error> {
    image
        .preferred_variant()
        .ok_or_else(|| Error::invalid_data(&image.key, "image has no variants"))
}

impl ImagesGenerator<'_> {
    fn file_path(image: &ImageMetadata) -> Option<String> {
        image
            .preferred_variant()
            .map(|variant| format!("images/{}", variant.file_name()))
    }
}

impl PlatformResourceGenerator<ImageMetadata> for ImagesGenerator<'_> {
    fn generate_initializer(&self, metadata: &ImageMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Images.resource_type_name())
                .arg("resourcesClassLoader", class_loader_ref())
                .arg(
                    "filePath",
                    Arg::Str(Self::file_path(metadata).unwrap_or_default()),
                ),
        )
    }

    fn generate_resource_files(&self, data: &[ImageMetadata]) -> Result<(), Error> {
        for_each_parallel(data, |image| {
            let variant = shipped_variant(image)?;
            copy_file(
                &variant.file_path,
                &self.ctx.path("images").join(variant.file_name()),
            )
        })
    }

    fn generate_before_properties(&self, _metadata: &[ImageMetadata]) -> Vec<PropertySpec> {
        vec![class_loader_property(self.ctx)]
    }
}

impl PlatformResourceGenerator<FontMetadata> for FontsGenerator<'_> {
    fn generate_initializer(&self, metadata: &FontMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Fonts.resource_type_name())
                .arg("resourcesClassLoader", class_loader_ref())
                .arg(
                    "filePath",
                    Arg::Str(format!("fonts/{}", metadata.file_name())),
                ),
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

    fn generate_before_properties(&self, _metadata: &[FontMetadata]) -> Vec<PropertySpec> {
        vec![class_loader_property(self.ctx)]
    }
}

impl PlatformResourceGenerator<ColorMetadata> for ColorsGenerator<'_> {
    fn imports(&self) -> Vec<TypeName> {
        vec![self.ctx.color_type()]
    }

    fn generate_initializer(&self, metadata: &ColorMetadata) -> Option<Initializer> {
        Some(inline_color_initializer(metadata))
    }

    fn generate_resource_files(&self, _data: &[ColorMetadata]) -> Result<(), Error> {
        Ok(())
    }
}

impl AssetsGenerator<'_> {
    fn target(&self, asset: &AssetMetadata) -> PathBuf {
        self.ctx.path("assets").join(&asset.relative_path)
    }
}

impl PlatformResourceGenerator<AssetMetadata> for AssetsGenerator<'_> {
    fn generate_initializer(&self, metadata: &AssetMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Assets.resource_type_name())
                .arg("resourcesClassLoader", class_loader_ref())
                .arg("originalPath", Arg::Str(metadata.relative_path.clone()))
                .arg(
                    "filePath",
                    Arg::Str(format!("assets/{}", metadata.relative_path)),
                ),
        )
    }

    fn generate_resource_files(&self, data: &[AssetMetadata]) -> Result<(), Error> {
        for_each_parallel(data, |asset| copy_file(&asset.file_path, &self.target(asset)))
    }

    fn generate_before_properties(&self, _metadata: &[AssetMetadata]) -> Vec<PropertySpec> {
        vec![class_loader_property(self.ctx)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::types::{PluralCategory, PluralForms};
    use std::collections::BTreeMap;
    use std::fs;
    use std::str::FromStr;

    fn context(dir: &std::path::Path) -> GeneratorContext {
        GeneratorContext::new(Settings::new().with_package_name("com.example"), dir)
    }

    #[test]
    fn test_strings_bundle_per_locale() {
        let output = tempfile::tempdir().unwrap();
        let ctx = context(output.path());
        let data = vec![StringMetadata {
            key: "greeting".to_string(),
            values: BTreeMap::from([
                (Locale::Base, " Hello\nthere".to_string()),
                (Locale::tag("en", Some("GB")), "Hiya".to_string()),
            ]),
        }];

        StringsGenerator::new(&ctx).generate_resource_files(&data).unwrap();

        let base = fs::read_to_string(
            output
                .path()
                .join("localization/com_example_strings.properties"),
        )
        .unwrap();
        assert_eq!(base, "greeting=\\ Hello\\nthere\n");
        let gb = fs::read_to_string(
            output
                .path()
                .join("localization/com_example_strings_en_GB.properties"),
        )
        .unwrap();
        assert_eq!(gb, "greeting=Hiya\n");
    }

    #[test]
    fn test_script_locale_bundle_name_and_key_escaping() {
        let output = tempfile::tempdir().unwrap();
        let ctx = context(output.path());
        let data = vec![StringMetadata {
            key: "ratio:a=b".to_string(),
            values: BTreeMap::from([
                (Locale::Base, "1:2".to_string()),
                (Locale::from_str("zh-Hans-CN").unwrap(), "一比二".to_string()),
            ]),
        }];

        StringsGenerator::new(&ctx).generate_resource_files(&data).unwrap();

        let base = fs::read_to_string(
            output
                .path()
                .join("localization/com_example_strings.properties"),
        )
        .unwrap();
        assert_eq!(base, "ratio\\:a\\=b=1:2\n");
        let zh = fs::read_to_string(
            output
                .path()
                .join("localization/com_example_strings_zh_Hans_CN.properties"),
        )
        .unwrap();
        assert_eq!(zh, "ratio\\:a\\=b=一比二\n");
    }

    #[test]
    fn test_plurals_bundle_entries() {
        let output = tempfile::tempdir().unwrap();
        let ctx = context(output.path());
        let mut forms = PluralForms::new();
        forms.insert(PluralCategory::Other, "%d items".to_string());
        forms.insert(PluralCategory::One, "%d item".to_string());
        let data = vec![PluralMetadata {
            key: "items".to_string(),
            values: BTreeMap::from([(Locale::Base, forms)]),
        }];

        PluralsGenerator::new(&ctx).generate_resource_files(&data).unwrap();

        let base = fs::read_to_string(
            output
                .path()
                .join("localization/com_example_plurals.properties"),
        )
        .unwrap();
        assert_eq!(base, "items.one=%d item\nitems.other=%d items\n");
    }

    #[test]
    fn test_before_properties_for_strings() {
        let output = tempfile::tempdir().unwrap();
        let ctx = context(output.path());
        let properties = StringsGenerator::new(&ctx).generate_before_properties(&[]);
        let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["resourcesClassLoader", "stringsBundle"]);
        assert_eq!(
            properties[1].initializer,
            Some(Arg::Str("localization/com_example_strings".to_string()))
        );
        assert_eq!(
            properties[0].initializer,
            Some(Arg::Raw("MR::class.java.classLoader".to_string()))
        );
    }

    #[test]
    fn test_four_x_image_ships_on_jvm() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let ctx = context(output.path());
        let file_path = input.path().join("banner@4x.png");
        fs::write(&file_path, b"png").unwrap();
        let data = vec![ImageMetadata {
            key: "banner".to_string(),
            values: vec![QualityVariant {
                quality: Some("4".to_string()),
                file_path,
            }],
        }];

        let generator = ImagesGenerator::new(&ctx);
        generator.generate_resource_files(&data).unwrap();
        assert!(output.path().join("images/banner@4x.png").exists());

        let init = generator.generate_initializer(&data[0]).unwrap();
        assert_eq!(
            init.args[1],
            (
                Some("filePath".to_string()),
                Arg::Str("images/banner@4x.png".to_string())
            )
        );
    }
}
