//! Abstract description of generated accessor code.
//!
//! Generators describe what to construct; the emitter decides how it is
//! spelled in the target language.

use std::fmt::{Display, Formatter};

/// A fully-qualified type name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName {
    pub package: String,
    pub name: String,
}

impl TypeName {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.package.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.package, self.name)
        }
    }
}

/// One argument of an initializer call.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A string literal.
    Str(String),
    /// A reference to a property or member (`R.string.hello`, `bundle`).
    Ref(String),
    /// An integer literal.
    Int(i64),
    /// An unsigned hexadecimal literal (`0xRRGGBBAA`).
    Hex(u32),
    /// A nested constructor call.
    Call(Initializer),
    /// A list literal.
    List(Vec<Arg>),
    /// An expression emitted verbatim.
    Raw(String),
}

/// A constructor-style call: `callee(name = arg, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    pub callee: String,
    pub args: Vec<(Option<String>, Arg)>,
}

impl Initializer {
    pub fn new(callee: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
            args: Vec::new(),
        }
    }

    /// Appends a named argument.
    pub fn arg(mut self, name: impl Into<String>, value: Arg) -> Self {
        self.args.push((Some(name.into()), value));
        self
    }

    /// Appends a positional argument.
    pub fn positional(mut self, value: Arg) -> Self {
        self.args.push((None, value));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Private,
    Internal,
    Const,
}

/// A property of a generated object.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    pub name: String,
    pub type_name: TypeName,
    pub modifiers: Vec<Modifier>,
    /// `None` declares the property without a value (expect declarations).
    pub initializer: Option<Arg>,
}

impl PropertySpec {
    pub fn new(name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            name: name.into(),
            type_name,
            modifiers: Vec::new(),
            initializer: None,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_initializer(mut self, initializer: Option<Initializer>) -> Self {
        self.initializer = initializer.map(Arg::Call);
        self
    }

    /// Initializes the property with an arbitrary expression.
    pub fn with_value(mut self, value: Arg) -> Self {
        self.initializer = Some(value);
        self
    }
}
