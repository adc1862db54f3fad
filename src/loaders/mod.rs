//! Per-kind resource loaders.
//!
//! Each loader implements [`ResourceLoader`](crate::traits::ResourceLoader)
//! for one [`ResourceKind`](crate::types::ResourceKind) and is run once per
//! tier.

pub mod assets;
pub mod colors;
pub mod fonts;
pub mod images;
pub mod plurals;
pub mod strings;

use std::path::Path;

// Reexporting the loaders for easier access
pub use assets::AssetsLoader;
pub use colors::ColorsLoader;
pub use fonts::FontsLoader;
pub use images::ImagesLoader;
pub use plurals::PluralsLoader;
pub use strings::StringsLoader;

/// Path of `path` below its nearest ancestor directory called `dir_name`,
/// together with that ancestor.
pub(crate) fn split_at_ancestor<'a>(path: &'a Path, dir_name: &str) -> Option<(&'a Path, &'a Path)> {
    path.ancestors()
        .skip(1)
        .find(|ancestor| ancestor.file_name().is_some_and(|name| name == dir_name))
        .and_then(|ancestor| Some((ancestor, path.strip_prefix(ancestor).ok()?)))
}
