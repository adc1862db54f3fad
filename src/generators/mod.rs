//! Platform backends.
//!
//! Each submodule implements
//! [`PlatformResourceGenerator`](crate::traits::PlatformResourceGenerator) for
//! every resource kind on one platform. Generators write only below their
//! [`GeneratorContext::output_dir`] and hand accessor fragments back by value.

pub mod android;
pub mod apple;
pub mod common;
pub mod js;
pub mod jvm;

use std::{
    collections::BTreeMap,
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    code::{Arg, Initializer, TypeName},
    error::Error,
    locale::Locale,
    settings::Settings,
    types::{ColorMetadata, ResourceKind, Rgba},
};

/// Target platforms of a generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Apple,
    /// Shared declarations only; no native files.
    Common,
    Js,
    Jvm,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Android,
        Platform::Apple,
        Platform::Common,
        Platform::Js,
        Platform::Jvm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Apple => "apple",
            Platform::Common => "common",
            Platform::Js => "js",
            Platform::Jvm => "jvm",
        }
    }

    /// Whether accessors are declarations without values.
    pub fn is_declaration_only(&self) -> bool {
        matches!(self, Platform::Common)
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "apple" | "ios" | "macos" => Ok(Platform::Apple),
            "common" => Ok(Platform::Common),
            "js" => Ok(Platform::Js),
            "jvm" => Ok(Platform::Jvm),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

/// Everything a generator needs besides the metadata itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorContext {
    pub settings: Settings,
    /// Root of the platform's native resource output.
    pub output_dir: PathBuf,
}

impl GeneratorContext {
    pub fn new(settings: Settings, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            output_dir: output_dir.into(),
        }
    }

    /// Path below the output directory.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.output_dir.join(relative)
    }

    /// A type from the runtime package.
    pub fn runtime_type(&self, name: &str) -> TypeName {
        TypeName::new(self.settings.runtime_package.clone(), name)
    }

    /// The runtime color type referenced by inline color initializers.
    pub fn color_type(&self) -> TypeName {
        TypeName::new(
            format!("{}.graphics", self.settings.runtime_package),
            "Color",
        )
    }

    /// Runtime type of every accessor of `kind`.
    pub fn resource_type(&self, kind: ResourceKind) -> TypeName {
        self.runtime_type(kind.resource_type_name())
    }
}

/// `ColorResource(lightColor = Color(..), darkColor = Color(..))` for
/// platforms that carry colors inline instead of in native files.
pub(crate) fn inline_color_initializer(metadata: &ColorMetadata) -> Initializer {
    let color = |value: Rgba| Arg::Call(Initializer::new("Color").positional(Arg::Hex(value.0)));
    let light = metadata.value.light();
    Initializer::new(ResourceKind::Colors.resource_type_name())
        .arg("lightColor", color(light))
        .arg("darkColor", color(metadata.value.dark().unwrap_or(light)))
}

/// Writes `contents` to `path`, creating parent directories.
pub(crate) fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    trace!(path = %path.display(), "writing generated file");
    fs::write(path, contents)?;
    Ok(())
}

/// Copies a source file into the output tree, replacing any previous copy.
pub(crate) fn copy_file(from: &Path, to: &Path) -> Result<(), Error> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    trace!(from = %from.display(), to = %to.display(), "copying resource file");
    fs::copy(from, to)?;
    Ok(())
}

/// Runs `job` for every item in parallel and aggregates all failures.
pub(crate) fn for_each_parallel<T, F>(items: &[T], job: F) -> Result<(), Error>
where
    T: Sync,
    F: Fn(&T) -> Result<(), Error> + Sync,
{
    let errors: Vec<Error> = items.par_iter().filter_map(|item| job(item).err()).collect();
    Error::from_many(errors)
}

/// Regroups per-key localized values into per-locale `(key, value)` lists.
pub(crate) fn group_by_locale<'m, T: 'm>(
    entries: impl IntoIterator<Item = (&'m str, &'m BTreeMap<Locale, T>)>,
) -> BTreeMap<&'m Locale, Vec<(&'m str, &'m T)>> {
    let mut grouped: BTreeMap<&Locale, Vec<(&str, &T)>> = BTreeMap::new();
    for (key, values) in entries {
        for (locale, value) in values {
            grouped.entry(locale).or_default().push((key, value));
        }
    }
    grouped
}
