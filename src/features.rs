//! Per-kind wiring.
//!
//! A [`ResourceFeature`] ties one [`ResourceKind`] together: the loader that
//! reads it, the metadata built from its merged map, the rules guarding it and
//! the generator rendering it on each platform.

use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    error::Error,
    generators::{GeneratorContext, Platform, android, apple, common::CommonGenerator, js, jvm},
    loaders::{
        AssetsLoader, ColorsLoader, FontsLoader, ImagesLoader, PluralsLoader, StringsLoader,
    },
    locale::Locale,
    merge::MergedResourceMap,
    settings::Settings,
    traits::{PlatformResourceGenerator, ResourceLoader},
    types::{
        AssetFile, AssetMetadata, ColorMetadata, ColorValue, FontMetadata, ImageMetadata,
        PluralForms, PluralMetadata, QualityVariant, ResourceKind, ResourceMetadata,
        StringMetadata,
    },
    validation::{Violations, check_apple_image_scales, check_equal_key_values},
};

/// Generator for one kind on one platform.
pub type BoxedGenerator<'a, M> = Box<dyn PlatformResourceGenerator<M> + 'a>;

pub trait ResourceFeature {
    type Loader: ResourceLoader;
    type Metadata: ResourceMetadata;

    fn kind(&self) -> ResourceKind;

    fn loader(&self, settings: &Settings) -> Self::Loader;

    /// One metadata entry per canonical key, sorted by key.
    fn build_metadata(
        &self,
        merged: &MergedResourceMap<<Self::Loader as ResourceLoader>::Value>,
    ) -> Result<Vec<Self::Metadata>, Error>;

    /// Rules run on the merged map before anything is generated.
    fn validate(
        &self,
        _platform: Platform,
        _merged: &MergedResourceMap<<Self::Loader as ResourceLoader>::Value>,
        _metadata: &[Self::Metadata],
    ) -> Result<(), Violations> {
        Ok(())
    }

    fn generator<'a>(
        &self,
        platform: Platform,
        ctx: &'a GeneratorContext,
    ) -> BoxedGenerator<'a, Self::Metadata>;
}

/// Every locale's value of every canonical key.
fn localized<V: Clone>(merged: &MergedResourceMap<V>) -> Result<Vec<(String, BTreeMap<Locale, V>)>, Error> {
    Ok(merged
        .canonical_keys()?
        .into_iter()
        .map(|key| {
            let values = merged
                .values_for(key)
                .map(|(locale, value)| (locale.clone(), value.clone()))
                .collect();
            (key.to_string(), values)
        })
        .collect())
}

/// Base-locale value of every canonical key.
fn base_values<V>(merged: &MergedResourceMap<V>) -> Result<Vec<(&str, &V)>, Error> {
    Ok(merged
        .canonical_keys()?
        .into_iter()
        .filter_map(|key| Some((key, merged.get(&Locale::Base, key)?)))
        .collect())
}

macro_rules! platform_generators {
    ($platform:expr, $ctx:expr, $generator:ident) => {
        match $platform {
            Platform::Android => Box::new(android::$generator::new($ctx)),
            Platform::Apple => Box::new(apple::$generator::new($ctx)),
            Platform::Common => Box::new(CommonGenerator),
            Platform::Js => Box::new(js::$generator::new($ctx)),
            Platform::Jvm => Box::new(jvm::$generator::new($ctx)),
        }
    };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringsFeature;

impl ResourceFeature for StringsFeature {
    type Loader = StringsLoader;
    type Metadata = StringMetadata;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Strings
    }

    fn loader(&self, settings: &Settings) -> StringsLoader {
        StringsLoader::new(settings)
    }

    fn build_metadata(
        &self,
        merged: &MergedResourceMap<String>,
    ) -> Result<Vec<StringMetadata>, Error> {
        Ok(localized(merged)?
            .into_iter()
            .map(|(key, values)| StringMetadata { key, values })
            .collect())
    }

    fn validate(
        &self,
        _platform: Platform,
        merged: &MergedResourceMap<String>,
        _metadata: &[StringMetadata],
    ) -> Result<(), Violations> {
        check_equal_key_values(self.kind(), merged.as_raw())
    }

    fn generator<'a>(
        &self,
        platform: Platform,
        ctx: &'a GeneratorContext,
    ) -> BoxedGenerator<'a, StringMetadata> {
        platform_generators!(platform, ctx, StringsGenerator)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PluralsFeature;

impl ResourceFeature for PluralsFeature {
    type Loader = PluralsLoader;
    type Metadata = PluralMetadata;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Plurals
    }

    fn loader(&self, settings: &Settings) -> PluralsLoader {
        PluralsLoader::new(settings)
    }

    fn build_metadata(
        &self,
        merged: &MergedResourceMap<PluralForms>,
    ) -> Result<Vec<PluralMetadata>, Error> {
        Ok(localized(merged)?
            .into_iter()
            .map(|(key, values)| PluralMetadata { key, values })
            .collect())
    }

    fn validate(
        &self,
        _platform: Platform,
        merged: &MergedResourceMap<PluralForms>,
        _metadata: &[PluralMetadata],
    ) -> Result<(), Violations> {
        check_equal_key_values(self.kind(), merged.as_raw())
    }

    fn generator<'a>(
        &self,
        platform: Platform,
        ctx: &'a GeneratorContext,
    ) -> BoxedGenerator<'a, PluralMetadata> {
        platform_generators!(platform, ctx, PluralsGenerator)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImagesFeature;

impl ResourceFeature for ImagesFeature {
    type Loader = ImagesLoader;
    type Metadata = ImageMetadata;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Images
    }

    fn loader(&self, _settings: &Settings) -> ImagesLoader {
        ImagesLoader::new()
    }

    fn build_metadata(
        &self,
        merged: &MergedResourceMap<Vec<QualityVariant>>,
    ) -> Result<Vec<ImageMetadata>, Error> {
        Ok(base_values(merged)?
            .into_iter()
            .map(|(key, values)| ImageMetadata {
                key: key.to_string(),
                values: values.clone(),
            })
            .collect())
    }

    fn validate(
        &self,
        platform: Platform,
        _merged: &MergedResourceMap<Vec<QualityVariant>>,
        metadata: &[ImageMetadata],
    ) -> Result<(), Violations> {
        match platform {
            Platform::Apple => check_apple_image_scales(metadata),
            _ => Ok(()),
        }
    }

    fn generator<'a>(
        &self,
        platform: Platform,
        ctx: &'a GeneratorContext,
    ) -> BoxedGenerator<'a, ImageMetadata> {
        platform_generators!(platform, ctx, ImagesGenerator)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FontsFeature;

impl ResourceFeature for FontsFeature {
    type Loader = FontsLoader;
    type Metadata = FontMetadata;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Fonts
    }

    fn loader(&self, _settings: &Settings) -> FontsLoader {
        FontsLoader::new()
    }

    fn build_metadata(
        &self,
        merged: &MergedResourceMap<PathBuf>,
    ) -> Result<Vec<FontMetadata>, Error> {
        Ok(base_values(merged)?
            .into_iter()
            .map(|(key, file_path)| FontMetadata {
                key: key.to_string(),
                file_path: file_path.clone(),
            })
            .collect())
    }

    fn generator<'a>(
        &self,
        platform: Platform,
        ctx: &'a GeneratorContext,
    ) -> BoxedGenerator<'a, FontMetadata> {
        platform_generators!(platform, ctx, FontsGenerator)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorsFeature;

impl ResourceFeature for ColorsFeature {
    type Loader = ColorsLoader;
    type Metadata = ColorMetadata;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Colors
    }

    fn loader(&self, _settings: &Settings) -> ColorsLoader {
        ColorsLoader::new()
    }

    fn build_metadata(
        &self,
        merged: &MergedResourceMap<ColorValue>,
    ) -> Result<Vec<ColorMetadata>, Error> {
        Ok(base_values(merged)?
            .into_iter()
            .map(|(key, value)| ColorMetadata {
                key: key.to_string(),
                value: *value,
            })
            .collect())
    }

    fn generator<'a>(
        &self,
        platform: Platform,
        ctx: &'a GeneratorContext,
    ) -> BoxedGenerator<'a, ColorMetadata> {
        platform_generators!(platform, ctx, ColorsGenerator)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AssetsFeature;

impl ResourceFeature for AssetsFeature {
    type Loader = AssetsLoader;
    type Metadata = AssetMetadata;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Assets
    }

    fn loader(&self, _settings: &Settings) -> AssetsLoader {
        AssetsLoader::new()
    }

    fn build_metadata(
        &self,
        merged: &MergedResourceMap<AssetFile>,
    ) -> Result<Vec<AssetMetadata>, Error> {
        Ok(base_values(merged)?
            .into_iter()
            .map(|(key, file)| AssetMetadata {
                key: key.to_string(),
                relative_path: file.relative_path.clone(),
                file_path: file.file_path.clone(),
            })
            .collect())
    }

    fn generator<'a>(
        &self,
        platform: Platform,
        ctx: &'a GeneratorContext,
    ) -> BoxedGenerator<'a, AssetMetadata> {
        platform_generators!(platform, ctx, AssetsGenerator)
    }
}
