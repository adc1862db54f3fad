//! The two seams of the pipeline: per-kind loaders and per-platform generators.

use std::{collections::BTreeMap, path::Path, str::FromStr};

use tracing::{debug, trace};

use crate::{
    code::{Initializer, PropertySpec, TypeName},
    error::Error,
    locale::Locale,
    tree::{FileTree, matching_any, parent_dir_name},
    types::{RawResourceMap, ResourceKey, ResourceKind},
};

/// Reads one resource kind out of a file tree.
///
/// Implementors describe how a single file is parsed; enumeration, locale
/// detection and the per-locale fold are shared.
pub trait ResourceLoader {
    type Value: Clone;

    /// The kind this loader reads.
    fn kind(&self) -> ResourceKind;

    /// Parses one input file into key/value pairs.
    fn load_file(&self, path: &Path) -> Result<Vec<(ResourceKey, Self::Value)>, Error>;

    /// Locale of an input file; by default its containing directory name.
    fn locale_of(&self, path: &Path) -> Result<Locale, Error> {
        let dir = parent_dir_name(path)
            .ok_or_else(|| Error::InvalidLocaleToken(path.display().to_string()))?;
        Locale::from_str(dir)
    }

    /// Combines a value already loaded for a key with a later file's value.
    fn fold_value(&self, existing: &mut Self::Value, incoming: Self::Value) {
        *existing = incoming;
    }

    /// Hook run on the complete tier map, e.g. to reject invalid entries.
    fn check(&self, _map: &RawResourceMap<Self::Value>) -> Result<(), Error> {
        Ok(())
    }

    /// Loads every matching file of `tree` into a per-locale map.
    fn load(&self, tree: &dyn FileTree) -> Result<RawResourceMap<Self::Value>, Error> {
        let kind = self.kind();
        let files = matching_any(tree, kind.masks())?;
        debug!(%kind, files = files.len(), "loading resource files");

        let mut map: RawResourceMap<Self::Value> = BTreeMap::new();
        for file in &files {
            let locale = self.locale_of(file)?;
            trace!(%kind, %locale, file = %file.display(), "reading resource file");
            let entries = map.entry(locale).or_default();
            for (key, value) in self.load_file(file)? {
                match entries.get_mut(&key) {
                    Some(existing) => self.fold_value(existing, value),
                    None => {
                        entries.insert(key, value);
                    }
                }
            }
        }

        self.check(&map)?;
        Ok(map)
    }
}

/// Platform half of a resource kind: native files plus accessor fragments.
pub trait PlatformResourceGenerator<M> {
    /// Externally-qualified types the accessor code references.
    fn imports(&self) -> Vec<TypeName> {
        Vec::new()
    }

    /// Initializer building the runtime handle for one resource; `None` on
    /// declaration-only platforms.
    fn generate_initializer(&self, metadata: &M) -> Option<Initializer>;

    /// Writes native resource files for all resources of the kind.
    fn generate_resource_files(&self, data: &[M]) -> Result<(), Error>;

    /// Shared properties the accessor object needs once, regardless of key count.
    fn generate_before_properties(&self, _metadata: &[M]) -> Vec<PropertySpec> {
        Vec::new()
    }
}
