//! Class model produced by the parser and consumed by the renderer: type
//! references, method arguments, methods, properties, and the per-class model.

use crate::error::{HookerError, HookerResult};
use serde::Serialize;
use std::fmt;

/// Return type used when a declaration does not state one.
pub const VOID: &str = "void";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A parsed type such as `NSString *` or `unsigned int`.
///
/// Trailing pointer markers are stripped from `name` and counted in
/// `pointer_depth`, so `NSError **` is `{ name: "NSError", pointer_depth: 2 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    pub name: String,
    pub pointer_depth: u8,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, pointer_depth: u8) -> Self {
        Self { name: name.into(), pointer_depth }
    }

    pub fn void() -> Self {
        Self::new(VOID, 0)
    }

    /// Parse raw type text. Trailing `*` markers (with or without spaces) become
    /// the pointer depth; inner whitespace is collapsed to single spaces.
    pub fn parse(text: &str) -> Self {
        let mut rest = text.trim();
        let mut depth: u8 = 0;
        while let Some(stripped) = rest.strip_suffix('*') {
            depth = depth.saturating_add(1);
            rest = stripped.trim_end();
        }
        let name = rest.split_whitespace().collect::<Vec<_>>().join(" ");
        Self { name, pointer_depth: depth }
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0
    }

    /// True when nothing is returned: a non-pointer type whose last word is
    /// `void`, so qualified forms like `oneway void` count too. `void *` is a
    /// value like any other.
    pub fn is_void(&self) -> bool {
        self.base_name() == VOID && !self.is_pointer()
    }

    /// Last whitespace-delimited word (`unsigned int` → `int`).
    pub fn base_name(&self) -> &str {
        self.name.rsplit(' ').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.is_pointer() {
            f.write_str(" ")?;
            for _ in 0..self.pointer_depth {
                f.write_str("*")?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Methods and properties
// ---------------------------------------------------------------------------

/// One `keyword:(Type) name` segment of a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    /// Keyword before the colon. Empty for the first segment, whose keyword is
    /// the method's selector.
    pub external_name: String,
    pub ty: TypeRef,
    pub local_name: String,
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:({}) {}", self.external_name, self.ty, self.local_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub selector: String,
    pub is_static: bool,
    pub return_type: TypeRef,
    pub arguments: Vec<Argument>,
    /// Declared with a trailing `, ...`.
    pub is_variadic: bool,
}

impl Method {
    pub fn new(selector: impl Into<String>, is_static: bool) -> Self {
        Self {
            selector: selector.into(),
            is_static,
            return_type: TypeRef::void(),
            arguments: Vec::new(),
            is_variadic: false,
        }
    }

    pub fn with_return_type(mut self, return_type: TypeRef) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_variadic(mut self, is_variadic: bool) -> Self {
        self.is_variadic = is_variadic;
        self
    }

    pub fn sigil(&self) -> char {
        if self.is_static {
            '+'
        } else {
            '-'
        }
    }

    /// Colon-joined selector, e.g. `setObject:forKey:`.
    pub fn full_selector(&self) -> String {
        let mut out = self.selector.clone();
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(&arg.external_name);
            }
            out.push(':');
        }
        out
    }
}

/// Declaration-shaped signature: `-(void) setName:(NSString *) name forKey:(id) key`.
impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) {}", self.sigil(), self.return_type, self.selector)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{arg}")?;
        }
        if self.is_variadic {
            f.write_str(", ...")?;
        }
        Ok(())
    }
}

/// A `@property` declaration. Accessor names are derived when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub property_name: String,
    pub ty: TypeRef,
}

/// Anything a name filter can select on.
pub trait Selectable {
    fn selectable_name(&self) -> &str;
}

impl Selectable for Method {
    fn selectable_name(&self) -> &str {
        &self.selector
    }
}

impl Selectable for Property {
    fn selectable_name(&self) -> &str {
        &self.property_name
    }
}

// ---------------------------------------------------------------------------
// Class model
// ---------------------------------------------------------------------------

/// Everything extracted from one `@interface` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassModel {
    name: String,
    class_methods: Vec<Method>,
    instance_methods: Vec<Method>,
    properties: Vec<Property>,
}

impl ClassModel {
    pub fn new(
        name: impl Into<String>,
        class_methods: Vec<Method>,
        instance_methods: Vec<Method>,
        properties: Vec<Property>,
    ) -> HookerResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(HookerError::malformed_declaration(0, "empty class name"));
        }
        Ok(Self { name, class_methods, instance_methods, properties })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_methods(&self) -> &[Method] {
        &self.class_methods
    }

    pub fn instance_methods(&self) -> &[Method] {
        &self.instance_methods
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn is_empty(&self) -> bool {
        self.class_methods.is_empty() && self.instance_methods.is_empty() && self.properties.is_empty()
    }

    /// Copy of this model keeping only the members accepted by `filter`.
    pub fn filtered(&self, filter: &crate::filter::SelectorFilter) -> Self {
        Self {
            name: self.name.clone(),
            class_methods: filter.filter(&self.class_methods).into_iter().cloned().collect(),
            instance_methods: filter.filter(&self.instance_methods).into_iter().cloned().collect(),
            properties: filter.filter(&self.properties).into_iter().cloned().collect(),
        }
    }
}
