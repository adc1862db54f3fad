//! Turns the collected accessor fragments into a source file.
//!
//! Generators only describe properties and initializers; a
//! [`BindingEmitter`] owns the target language's syntax. [`KotlinEmitter`]
//! renders one `expect`/`actual` object per platform.

use std::{
    collections::BTreeSet,
    fmt::Write as _,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use crate::{
    code::{Arg, Initializer, Modifier, PropertySpec, TypeName},
    error::Error,
    generators::{Platform, write_file},
    types::ResourceKind,
};

lazy_static! {
    static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Accessors of one resource kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceObject {
    pub kind: ResourceKind,
    /// Shared helper properties, each name at most once.
    pub before: Vec<PropertySpec>,
    /// One property per canonical key, sorted by key.
    pub resources: Vec<PropertySpec>,
}

impl ResourceObject {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            before: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Adds a helper property unless one with the same name exists.
    pub fn add_before(&mut self, property: PropertySpec) -> bool {
        if self.before.iter().any(|p| p.name == property.name) {
            return false;
        }
        self.before.push(property);
        true
    }
}

/// Everything generated for one platform in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub platform: Platform,
    pub package: String,
    pub class_name: String,
    pub imports: BTreeSet<TypeName>,
    pub objects: Vec<ResourceObject>,
}

impl Binding {
    pub fn new(platform: Platform, package: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            platform,
            package: package.into(),
            class_name: class_name.into(),
            imports: BTreeSet::new(),
            objects: Vec::new(),
        }
    }

    pub fn object(&self, kind: ResourceKind) -> Option<&ResourceObject> {
        self.objects.iter().find(|object| object.kind == kind)
    }
}

/// Writes a [`Binding`] as source code.
pub trait BindingEmitter {
    /// Path of the generated file, relative to the source root.
    fn relative_path(&self, binding: &Binding) -> PathBuf;

    fn render(&self, binding: &Binding) -> String;

    /// Renders and writes the binding below `source_dir`, returning the file path.
    fn emit(&self, binding: &Binding, source_dir: &Path) -> Result<PathBuf, Error> {
        let path = source_dir.join(self.relative_path(binding));
        write_file(&path, self.render(binding))?;
        info!(path = %path.display(), platform = %binding.platform, "wrote accessor source");
        Ok(path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinEmitter;

const INDENT: &str = "    ";

fn identifier(name: &str) -> String {
    if IDENTIFIER_REGEX.is_match(name) {
        name.to_string()
    } else {
        format!("`{}`", name)
    }
}

fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn render_arg(arg: &Arg) -> String {
    match arg {
        Arg::Str(value) => string_literal(value),
        Arg::Ref(value) | Arg::Raw(value) => value.clone(),
        Arg::Int(value) => value.to_string(),
        Arg::Hex(value) => format!("0x{:08X}", value),
        Arg::Call(initializer) => render_call(initializer),
        Arg::List(items) => format!(
            "listOf({})",
            items.iter().map(render_arg).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn render_call(initializer: &Initializer) -> String {
    let args = initializer
        .args
        .iter()
        .map(|(name, value)| match name {
            Some(name) => format!("{} = {}", name, render_arg(value)),
            None => render_arg(value),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}({})", initializer.callee, args)
}

impl KotlinEmitter {
    fn object_keyword(platform: Platform) -> &'static str {
        if platform.is_declaration_only() {
            "expect"
        } else {
            "actual"
        }
    }

    /// Types to import: declared imports plus every property type outside
    /// the binding's own package.
    fn imports<'b>(binding: &'b Binding) -> BTreeSet<&'b TypeName> {
        let property_types = binding
            .objects
            .iter()
            .flat_map(|object| object.before.iter().chain(object.resources.iter()))
            .map(|property| &property.type_name);
        binding
            .imports
            .iter()
            .chain(property_types)
            .filter(|type_name| !type_name.package.is_empty() && type_name.package != binding.package)
            .collect()
    }

    fn render_property(out: &mut String, property: &PropertySpec, actual: bool, depth: usize) {
        let visibility = if property.modifiers.contains(&Modifier::Private) {
            "private"
        } else if property.modifiers.contains(&Modifier::Internal) {
            "internal"
        } else {
            "public"
        };
        out.push_str(&INDENT.repeat(depth));
        out.push_str(visibility);
        if actual {
            out.push_str(" actual");
        }
        if property.modifiers.contains(&Modifier::Const) {
            out.push_str(" const");
        }
        let _ = write!(
            out,
            " val {}: {}",
            identifier(&property.name),
            property.type_name.name
        );
        if let Some(value) = &property.initializer {
            let _ = write!(out, " = {}", render_arg(value));
        }
        out.push('\n');
    }
}

impl BindingEmitter for KotlinEmitter {
    fn relative_path(&self, binding: &Binding) -> PathBuf {
        let mut path: PathBuf = binding
            .package
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();
        path.push(format!("{}.kt", binding.class_name));
        path
    }

    fn render(&self, binding: &Binding) -> String {
        let keyword = Self::object_keyword(binding.platform);
        let actual = !binding.platform.is_declaration_only();
        let mut out = String::from("// Generated resource accessors. Do not edit.\n");

        if !binding.package.is_empty() {
            let _ = writeln!(out, "package {}", binding.package);
        }

        let imports = Self::imports(binding);
        if !imports.is_empty() {
            out.push('\n');
            for type_name in imports {
                let _ = writeln!(out, "import {}", type_name);
            }
        }

        let _ = write!(
            out,
            "\npublic {} object {} {{\n",
            keyword,
            identifier(&binding.class_name)
        );
        for (index, object) in binding.objects.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let nested = if actual { "actual object" } else { "object" };
            let _ = writeln!(
                out,
                "{}public {} {} {{",
                INDENT,
                nested,
                object.kind.object_name()
            );
            for property in &object.before {
                Self::render_property(&mut out, property, false, 2);
            }
            if !object.before.is_empty() && !object.resources.is_empty() {
                out.push('\n');
            }
            for property in &object.resources {
                Self::render_property(&mut out, property, actual, 2);
            }
            let _ = writeln!(out, "{}}}", INDENT);
        }
        out.push_str("}\n");
        out
    }
}
