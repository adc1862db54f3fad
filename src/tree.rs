//! File enumeration for resource tiers.
//!
//! A tier's input is a [`FileTree`]: anything that can list the files matching
//! a glob mask. [`DirTree`] walks directories on disk, [`FileList`] filters an
//! explicit list handed over by a build tool.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;

use crate::error::Error;

/// A source of candidate input files.
pub trait FileTree {
    /// Returns the files matching `mask`, sorted by path.
    fn matching(&self, mask: &str) -> Result<Vec<PathBuf>, Error>;
}

fn compile_mask(mask: &str) -> Result<GlobMatcher, Error> {
    Ok(GlobBuilder::new(mask)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

/// Directory roots walked recursively; masks match paths relative to each root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirTree {
    roots: Vec<PathBuf>,
}

impl DirTree {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            roots: vec![root.into()],
        }
    }

    /// A tree spanning several roots (e.g. every inherited dependency).
    pub fn from_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// A tree with no files.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl FileTree for DirTree {
    fn matching(&self, mask: &str) -> Result<Vec<PathBuf>, Error> {
        let matcher = compile_mask(mask)?;
        let mut out = Vec::new();

        for root in &self.roots {
            if !root.is_dir() {
                continue;
            }
            let walker = WalkBuilder::new(root)
                .standard_filters(false)
                .follow_links(true)
                .build();

            for dent in walker {
                let dent = dent?;
                if !dent.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                let relative = dent.path().strip_prefix(root).unwrap_or(dent.path());
                if matcher.is_match(relative) {
                    out.push(dent.path().to_path_buf());
                }
            }
        }

        out.sort();
        out.dedup();
        Ok(out)
    }
}

/// An explicit list of files; masks match against each full path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    files: Vec<PathBuf>,
}

impl FileList {
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

impl FileTree for FileList {
    fn matching(&self, mask: &str) -> Result<Vec<PathBuf>, Error> {
        let matcher = compile_mask(mask)?;
        let mut out: Vec<PathBuf> = self
            .files
            .iter()
            .filter(|path| matcher.is_match(path.as_path()))
            .cloned()
            .collect();
        out.sort();
        out.dedup();
        Ok(out)
    }
}

/// Files matching any of the masks, sorted and deduplicated.
pub(crate) fn matching_any(tree: &dyn FileTree, masks: &[&str]) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for mask in masks {
        files.extend(tree.matching(mask)?);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Name of the directory directly containing `path`.
pub(crate) fn parent_dir_name(path: &Path) -> Option<&str> {
    path.parent()?.file_name()?.to_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_dir_tree_matches_relative_masks() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "base/strings.xml");
        touch(dir.path(), "ru/strings_extra.xml");
        touch(dir.path(), "base/plurals.xml");
        touch(dir.path(), "strings.txt");

        let tree = DirTree::new(dir.path());
        let files = tree.matching("**/strings*.xml").unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("base/strings.xml"),
                dir.path().join("ru/strings_extra.xml"),
            ]
        );
    }

    #[test]
    fn test_dir_tree_multiple_roots_and_missing_root() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(first.path(), "base/strings.xml");
        touch(second.path(), "base/strings.xml");

        let tree = DirTree::from_roots([
            first.path().to_path_buf(),
            second.path().to_path_buf(),
            first.path().join("does-not-exist"),
        ]);
        assert_eq!(tree.matching("**/strings*.xml").unwrap().len(), 2);
        assert!(DirTree::empty().matching("**/*").unwrap().is_empty());
    }

    #[test]
    fn test_file_list_filters_by_mask() {
        let list = FileList::new(["res/base/strings.xml", "res/images/logo@2x.png"]);
        assert_eq!(
            list.matching("**/images/**/*.{png,svg}").unwrap(),
            vec![PathBuf::from("res/images/logo@2x.png")]
        );
    }

    #[test]
    fn test_invalid_mask() {
        let list = FileList::new(["a"]);
        assert!(matches!(list.matching("**/[a"), Err(Error::Glob(_))));
    }

    #[test]
    fn test_parent_dir_name() {
        assert_eq!(parent_dir_name(Path::new("res/ru/strings.xml")), Some("ru"));
        assert_eq!(parent_dir_name(Path::new("strings.xml")), None);
    }
}
