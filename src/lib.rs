//! Multiplatform resource generation for Rust.
//!
//! Reads locale-tagged strings, plurals, images, fonts, colors and assets from
//! three inheritance tiers, merges them (upper over own over lower), validates
//! the result and writes per-platform native resources plus an accessor
//! source file. Android, Apple, JVM, JS and the shared common declarations
//! are supported.
//!
//! ```rust,no_run
//! use resgen::{DirTree, OutputDirs, Pipeline, Platform, Settings, Tiers};
//!
//! let settings = Settings::read_from("resgen.toml")?;
//! let (lower, own, upper) = (
//!     DirTree::empty(),
//!     DirTree::new("src/commonMain/resources/MR"),
//!     DirTree::new("src/androidMain/resources/MR"),
//! );
//! let pipeline = Pipeline::new(settings, Tiers::new(&lower, &own, &upper));
//! pipeline.run(Platform::Android, &OutputDirs::new("build/res", "build/src"))?;
//! # Ok::<(), resgen::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod code;
pub mod document;
pub mod emitter;
pub mod error;
pub mod features;
pub mod generators;
pub mod loaders;
pub mod locale;
pub mod merge;
pub mod pipeline;
pub mod settings;
pub mod text;
pub mod traits;
pub mod tree;
pub mod types;
pub mod validation;

// Re-export most used types for easy consumption
pub use crate::{
    emitter::{Binding, BindingEmitter, KotlinEmitter, ResourceObject},
    error::Error,
    generators::{GeneratorContext, Platform},
    locale::Locale,
    merge::{MergedResourceMap, merge},
    pipeline::{OutputDirs, Pipeline},
    settings::Settings,
    traits::{PlatformResourceGenerator, ResourceLoader},
    tree::{DirTree, FileList, FileTree},
    types::{ResourceKind, Tier, Tiers},
    validation::{Violation, Violations},
};
