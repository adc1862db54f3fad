//! Browser backend: JSON string tables fetched at runtime through loader
//! properties, plus static files addressed by URL.

use std::{collections::BTreeMap, path::PathBuf};

use serde::Serialize;

use crate::{
    code::{Arg, Initializer, Modifier, PropertySpec, TypeName},
    error::Error,
    generators::{
        GeneratorContext, copy_file, for_each_parallel, group_by_locale, inline_color_initializer,
        jvm::shipped_variant, write_file,
    },
    locale::Locale,
    traits::PlatformResourceGenerator,
    types::{
        AssetMetadata, ColorMetadata, FontMetadata, ImageMetadata, PluralMetadata, ResourceKind,
        StringMetadata,
    },
};

const LOCALIZATION_DIR: &str = "localization";
const LOADER_TYPE: &str = "JsStringLoader";

fn table_prefix(ctx: &GeneratorContext, kind: ResourceKind) -> String {
    format!(
        "{}/{}_{}",
        LOCALIZATION_DIR,
        ctx.settings.file_prefix(),
        kind.object_name()
    )
}

fn table_path(ctx: &GeneratorContext, kind: ResourceKind, locale: &Locale) -> PathBuf {
    let prefix = table_prefix(ctx, kind);
    if locale.is_base() {
        ctx.path(format!("{}.json", prefix))
    } else {
        ctx.path(format!("{}_{}.json", prefix, locale))
    }
}

fn loader_property_name(kind: ResourceKind) -> String {
    format!("{}Loader", kind.object_name())
}

/// Private loader property fetching the JSON tables of `kind`.
fn loader_property<'m>(
    ctx: &GeneratorContext,
    kind: ResourceKind,
    locales: impl IntoIterator<Item = &'m Locale>,
) -> PropertySpec {
    let supported = locales
        .into_iter()
        .filter(|locale| !locale.is_base())
        .map(|locale| Arg::Str(locale.to_string()))
        .collect();
    PropertySpec::new(
        loader_property_name(kind),
        TypeName::new(
            format!("{}.provider", ctx.settings.runtime_package),
            LOADER_TYPE,
        ),
    )
    .with_modifier(Modifier::Private)
    .with_initializer(Some(
        Initializer::new(LOADER_TYPE)
            .arg("fileNamePrefix", Arg::Str(table_prefix(ctx, kind)))
            .arg("supportedLocales", Arg::List(supported)),
    ))
}

/// Writes one JSON table per locale.
fn write_tables<T: Serialize + Sync>(
    ctx: &GeneratorContext,
    kind: ResourceKind,
    grouped: Vec<(&Locale, Vec<(&str, &T)>)>,
) -> Result<(), Error> {
    for_each_parallel(&grouped, |(locale, entries)| {
        let table: BTreeMap<&str, &T> = entries.iter().copied().collect();
        let mut content = serde_json::to_vec_pretty(&table)?;
        content.push(b'\n');
        write_file(&table_path(ctx, kind, locale), content)
    })
}

macro_rules! js_generator {
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

js_generator!(
    /// `localization/<prefix>_strings[_locale].json`.
    StringsGenerator
);
js_generator!(
    /// `localization/<prefix>_plurals[_locale].json`, one form map per key.
    PluralsGenerator
);
js_generator!(ImagesGenerator);
js_generator!(FontsGenerator);
js_generator!(
    /// Colors are carried by the initializers; no files are written.
    ColorsGenerator
);
js_generator!(AssetsGenerator);

fn loader_imports(ctx: &GeneratorContext) -> Vec<TypeName> {
    vec![TypeName::new(
        format!("{}.provider", ctx.settings.runtime_package),
        LOADER_TYPE,
    )]
}

impl PlatformResourceGenerator<StringMetadata> for StringsGenerator<'_> {
    fn imports(&self) -> Vec<TypeName> {
        loader_imports(self.ctx)
    }

    fn generate_initializer(&self, metadata: &StringMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Strings.resource_type_name())
                .arg("key", Arg::Str(metadata.key.clone()))
                .arg("loader", Arg::Ref(loader_property_name(ResourceKind::Strings))),
        )
    }

    fn generate_resource_files(&self, data: &[StringMetadata]) -> Result<(), Error> {
        let grouped = group_by_locale(data.iter().map(|m| (m.key.as_str(), &m.values)))
            .into_iter()
            .collect();
        write_tables(self.ctx, ResourceKind::Strings, grouped)
    }

    fn generate_before_properties(&self, metadata: &[StringMetadata]) -> Vec<PropertySpec> {
        let grouped = group_by_locale(metadata.iter().map(|m| (m.key.as_str(), &m.values)));
        vec![loader_property(
            self.ctx,
            ResourceKind::Strings,
            grouped.into_keys(),
        )]
    }
}

impl PlatformResourceGenerator<PluralMetadata> for PluralsGenerator<'_> {
    fn imports(&self) -> Vec<TypeName> {
        loader_imports(self.ctx)
    }

    fn generate_initializer(&self, metadata: &PluralMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Plurals.resource_type_name())
                .arg("key", Arg::Str(metadata.key.clone()))
                .arg("loader", Arg::Ref(loader_property_name(ResourceKind::Plurals))),
        )
    }

    fn generate_resource_files(&self, data: &[PluralMetadata]) -> Result<(), Error> {
        let grouped = group_by_locale(data.iter().map(|m| (m.key.as_str(), &m.values)))
            .into_iter()
            .collect();
        write_tables(self.ctx, ResourceKind::Plurals, grouped)
    }

    fn generate_before_properties(&self, metadata: &[PluralMetadata]) -> Vec<PropertySpec> {
        let grouped = group_by_locale(metadata.iter().map(|m| (m.key.as_str(), &m.values)));
        vec![loader_property(
            self.ctx,
            ResourceKind::Plurals,
            grouped.into_keys(),
        )]
    }
}

impl PlatformResourceGenerator<ImageMetadata> for ImagesGenerator<'_> {
    fn generate_initializer(&self, metadata: &ImageMetadata) -> Option<Initializer> {
        let file_name = metadata.preferred_variant()?.file_name();
        Some(
            Initializer::new(ResourceKind::Images.resource_type_name())
                .arg("fileUrl", Arg::Str(format!("images/{}", file_name)))
                .arg("fileName", Arg::Str(file_name)),
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
}

impl PlatformResourceGenerator<FontMetadata> for FontsGenerator<'_> {
    fn generate_initializer(&self, metadata: &FontMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Fonts.resource_type_name())
                .arg(
                    "fileUrl",
                    Arg::Str(format!("fonts/{}", metadata.file_name())),
                )
                .arg("fontFamily", Arg::Str(metadata.key.clone())),
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

impl PlatformResourceGenerator<AssetMetadata> for AssetsGenerator<'_> {
    fn generate_initializer(&self, metadata: &AssetMetadata) -> Option<Initializer> {
        Some(
            Initializer::new(ResourceKind::Assets.resource_type_name())
                .arg("originalPath", Arg::Str(metadata.relative_path.clone()))
                .arg(
                    "fileUrl",
                    Arg::Str(format!("assets/{}", metadata.relative_path)),
                ),
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
