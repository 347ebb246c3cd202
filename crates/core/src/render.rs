//! Logos hook rendering.
//!
//! Turns a [`ClassModel`] into `%hook` text: a framed comment header, one
//! block per method, synthesized getter/setter blocks for properties, and the
//! closing `%end`. Rendering is a pure function of the model and options.

use crate::classify::format_specifier;
use crate::error::{HookerError, HookerResult};
use crate::types::{ClassModel, Method, Property};
use serde::Serialize;
use std::fmt::Write;

// ---------------------------------------------------------------------------
// Options and output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    pub include_properties: bool,
    pub include_getters: bool,
    pub include_setters: bool,
    /// One NSLog line per argument.
    pub log_params: bool,
    /// Entry logging inside property accessors.
    pub debug_logging: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_properties: true,
            include_getters: false,
            include_setters: false,
            log_params: false,
            debug_logging: false,
        }
    }
}

impl RenderOptions {
    pub fn renders_properties(&self) -> bool {
        self.include_properties && (self.include_getters || self.include_setters)
    }

    fn accessors_per_property(&self) -> usize {
        usize::from(self.include_getters) + usize::from(self.include_setters)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub hook_count: usize,
}

impl Rendered {
    pub fn is_empty(&self) -> bool {
        self.hook_count == 0
    }
}

// ---------------------------------------------------------------------------
// Accessor naming
// ---------------------------------------------------------------------------

/// `color` → `Color`. Only the first character changes.
pub fn accessor_stem(property_name: &str) -> String {
    let mut chars = property_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn getter_name(property_name: &str) -> String {
    format!("get{}", accessor_stem(property_name))
}

pub fn setter_name(property_name: &str) -> String {
    format!("set{}", accessor_stem(property_name))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Number of hook blocks `render` would emit for `model`.
pub fn renderable_count(model: &ClassModel, options: &RenderOptions) -> usize {
    let accessors = if options.renders_properties() {
        model.properties().len() * options.accessors_per_property()
    } else {
        0
    };
    accessors + model.class_methods().len() + model.instance_methods().len()
}

/// Render hooks for one class. A model with nothing to hook renders to an
/// empty string, header and `%end` included.
pub fn render(model: &ClassModel, options: &RenderOptions) -> HookerResult<Rendered> {
    let expected = renderable_count(model, options);
    if expected == 0 {
        return Ok(Rendered::default());
    }

    let mut w = HookWriter { out: String::with_capacity(expected * 96), hooks: 0, options };
    w.header(model.name())?;
    writeln!(w.out, "%hook {}\n", model.name())?;
    if options.renders_properties() {
        w.properties(model.properties())?;
    }
    w.methods(model.class_methods(), "Class Methods")?;
    w.methods(model.instance_methods(), "Instance Methods")?;
    w.out.push_str("%end\n\n\n");

    if w.hooks != expected {
        return Err(HookerError::RenderIncomplete);
    }
    Ok(Rendered { text: w.out, hook_count: w.hooks })
}

struct HookWriter<'a> {
    out: String,
    hooks: usize,
    options: &'a RenderOptions,
}

impl HookWriter<'_> {
    fn header(&mut self, name: &str) -> std::fmt::Result {
        let border = "=".repeat(name.chars().count());
        writeln!(self.out, "/*=={border}")?;
        writeln!(self.out, "  {name}  ")?;
        writeln!(self.out, "{border}==*/\n")
    }

    fn methods(&mut self, methods: &[Method], title: &str) -> std::fmt::Result {
        if methods.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "/* {title} */")?;
        for method in methods {
            self.method(method)?;
        }
        self.out.push('\n');
        Ok(())
    }

    fn method(&mut self, method: &Method) -> std::fmt::Result {
        self.hooks += 1;
        writeln!(self.out, "{method} {{")?;
        self.out.push_str("    %log;\n");
        if self.options.log_params {
            for arg in &method.arguments {
                writeln!(
                    self.out,
                    "    NSLog(@\"    [Param]{arg} -> %{}\", {});",
                    format_specifier(&arg.ty),
                    arg.local_name
                )?;
            }
        }
        if method.return_type.is_void() {
            self.out.push_str("    %orig;\n");
        } else {
            self.out.push_str("    return %orig;\n");
        }
        self.out.push_str("}\n\n");
        Ok(())
    }

    fn properties(&mut self, properties: &[Property]) -> std::fmt::Result {
        if properties.is_empty() {
            return Ok(());
        }
        self.out.push_str("/* Properties */\n");
        for property in properties {
            if self.options.include_getters {
                self.getter(property)?;
            }
            if self.options.include_setters {
                self.setter(property)?;
            }
            self.out.push('\n');
        }
        self.out.push('\n');
        Ok(())
    }

    fn getter(&mut self, property: &Property) -> std::fmt::Result {
        self.hooks += 1;
        let name = &property.property_name;
        let ty = &property.ty;
        writeln!(self.out, "-({ty}) {} {{", getter_name(name))?;
        if self.options.debug_logging {
            writeln!(self.out, "    NSLog(@\" >>> Enter {name} Getter >>>\");")?;
        }
        writeln!(self.out, "    {ty} {name} = %orig;")?;
        writeln!(
            self.out,
            "    NSLog(@\"[<- Getter]({ty}) {name}: %{}\", {name});",
            format_specifier(ty)
        )?;
        writeln!(self.out, "    return {name};")?;
        self.out.push_str("}\n");
        Ok(())
    }

    fn setter(&mut self, property: &Property) -> std::fmt::Result {
        self.hooks += 1;
        let name = &property.property_name;
        let ty = &property.ty;
        writeln!(self.out, "-(void) {}: ({ty}){name} {{", setter_name(name))?;
        if self.options.debug_logging {
            writeln!(self.out, "    NSLog(@\" >>> Enter {name} Setter >>>\");")?;
        }
        writeln!(
            self.out,
            "    NSLog(@\"[Setter ->]({ty}) {name}: %{}\", {name});",
            format_specifier(ty)
        )?;
        writeln!(self.out, "    %orig({name});")?;
        self.out.push_str("}\n");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Preamble
// ---------------------------------------------------------------------------

const INCLUDES: &[&str] = &[
    "CoreFoundation/CoreFoundation.h",
    "Foundation/Foundation.h",
    "Security/Security.h",
    "Security/SecCertificate.h",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PreambleOptions {
    /// Framework `#import` lines.
    pub includes: bool,
    /// `%ctor` block logging when the dylib loads.
    pub load_hook: bool,
}

/// Text written once at the top of an output file, before any class hooks.
pub fn render_preamble(options: &PreambleOptions) -> String {
    let mut out = String::new();
    if options.includes {
        for include in INCLUDES {
            out.push_str(&format!("#import <{include}>\n"));
        }
        out.push_str("\n#import \"substrate.h\"\n\n\n");
    }
    if options.load_hook {
        out.push_str("/* Dylib Constructor */\n");
        out.push_str("%ctor {\n");
        out.push_str("    NSLog(@\" --- Hooker Loaded: %s --- \", __FILE__);\n");
        out.push_str("}\n\n");
    }
    out
}
