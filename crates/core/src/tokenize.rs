//! Line-level tokenizer for `@interface` blocks.
//!
//! Each line is classified by its leading marker into a [`LineKind`]. Method
//! and property heads are split into their raw parts here; argument segments
//! are parsed separately by [`parse_arguments`].
//!
//! Errors produced here carry line `0`; the builder rewrites them with the
//! real line number.

use crate::error::{HookerError, HookerResult};
use crate::types::{Argument, TypeRef};

pub const CLASS_MARKER: &str = "@interface";
pub const PROPERTY_MARKER: &str = "@property";
pub const CLASS_METHOD_SIGIL: char = '+';
pub const INSTANCE_METHOD_SIGIL: char = '-';

// ---------------------------------------------------------------------------
// Line kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Class(String),
    Method(MethodHead),
    Property(PropertyHead),
    Other,
}

/// `+ (ReturnType)selector:(Type)arg more:(Type)arg;` split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodHead {
    pub is_static: bool,
    pub return_text: String,
    pub selector: String,
    /// Everything from the first `:` on, or empty for a no-argument method.
    /// A variadic tail (`, ...`) is removed and reported in `is_variadic`.
    pub arguments_text: String,
    pub is_variadic: bool,
}

/// `@property(attrs) Type *name;` split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyHead {
    /// Type text including any pointer markers, e.g. `NSString *`.
    pub type_text: String,
    pub name: String,
}

/// Classify one source line by its leading marker.
pub fn classify_line(line: &str) -> HookerResult<LineKind> {
    if line.starts_with(CLASS_MARKER) {
        parse_class_name(line).map(LineKind::Class)
    } else if line.starts_with(PROPERTY_MARKER) {
        parse_property_head(line).map(LineKind::Property)
    } else if line.starts_with(CLASS_METHOD_SIGIL) || line.starts_with(INSTANCE_METHOD_SIGIL) {
        parse_method_head(line).map(LineKind::Method)
    } else {
        Ok(LineKind::Other)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Drop a trailing `//` comment and the statement terminator.
fn strip_line_noise(line: &str) -> &str {
    let code = match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    };
    let code = code.trim_end();
    code.strip_suffix(';').unwrap_or(code).trim_end()
}

/// Byte index of the `)` matching the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn paren_balance(text: &str) -> i32 {
    text.chars().fold(0, |acc, ch| match ch {
        '(' => acc + 1,
        ')' => acc - 1,
        _ => acc,
    })
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

// ---------------------------------------------------------------------------
// Class name
// ---------------------------------------------------------------------------

/// `@interface Foo : NSObject` → `Foo`. Category and protocol suffixes glued to
/// the name (`Foo(Private)`, `Foo<Bar>`, `Foo:NSObject`) are cut off.
pub fn parse_class_name(line: &str) -> HookerResult<String> {
    let rest = &line[CLASS_MARKER.len()..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return Err(HookerError::malformed_declaration(0, "expected whitespace after @interface"));
    }
    let token = rest.split_whitespace().next().unwrap_or("");
    let name = match token.find(['(', ':', '<']) {
        Some(idx) => &token[..idx],
        None => token,
    };
    if name.is_empty() {
        return Err(HookerError::malformed_declaration(0, "@interface without a class name"));
    }
    Ok(name.to_string())
}

// ---------------------------------------------------------------------------
// Methods
// ---------------------------------------------------------------------------

pub fn parse_method_head(line: &str) -> HookerResult<MethodHead> {
    let body = strip_line_noise(line);
    let is_static = body.starts_with(CLASS_METHOD_SIGIL);
    let rest = body[1..].trim_start();
    if !rest.starts_with('(') {
        return Err(HookerError::malformed_declaration(0, "expected '(' after method sigil"));
    }
    let close = matching_paren(rest, 0).ok_or_else(|| HookerError::unbalanced(0))?;
    let return_text = rest[1..close].trim();
    if return_text.is_empty() {
        return Err(HookerError::malformed_declaration(0, "empty return type"));
    }

    let after = &rest[close + 1..];
    let (selector, arguments_text) = match after.find(':') {
        Some(idx) => (after[..idx].trim(), &after[idx..]),
        None => (after.trim(), ""),
    };
    if selector.is_empty() {
        return Err(HookerError::malformed_declaration(0, "missing selector"));
    }
    if selector.contains(char::is_whitespace) {
        return Err(HookerError::malformed_declaration(
            0,
            format!("unexpected text in selector '{selector}'"),
        ));
    }

    let (arguments_text, is_variadic) = split_variadic(arguments_text.trim());
    Ok(MethodHead {
        is_static,
        return_text: return_text.to_string(),
        selector: selector.to_string(),
        arguments_text: arguments_text.to_string(),
        is_variadic,
    })
}

/// `:(id)format, ...` → (`:(id)format`, true). The comma may sit on either
/// side of the whitespace before the ellipsis.
fn split_variadic(text: &str) -> (&str, bool) {
    match text.strip_suffix("...") {
        Some(head) => match head.trim_end().strip_suffix(',') {
            Some(head) => (head.trim_end(), true),
            None => (text, false),
        },
        None => (text, false),
    }
}

/// Split argument text on whitespace and glue back the pieces that belong
/// together: multi-word types (`(unsigned int)`), a keyword separated from
/// its type (`forKey: (id)key`), and a local name separated from its type
/// (`:(id) key`).
pub fn recombine_segments(text: &str) -> HookerResult<Vec<String>> {
    let mut tokens = text.split_whitespace().peekable();
    let mut segments = Vec::new();

    while let Some(token) = tokens.next() {
        let mut segment = token.to_string();

        if segment.ends_with(':') {
            match tokens.next() {
                Some(next) => {
                    segment.push(' ');
                    segment.push_str(next);
                }
                None => return Err(HookerError::malformed_argument(0, segment)),
            }
        }

        while paren_balance(&segment) > 0 {
            match tokens.next() {
                Some(next) => {
                    segment.push(' ');
                    segment.push_str(next);
                }
                None => return Err(HookerError::unbalanced(0)),
            }
        }

        if segment.ends_with(')') {
            if let Some(next) = tokens.next_if(|t| !t.contains(':')) {
                segment.push(' ');
                segment.push_str(next);
            }
        }

        segments.push(segment);
    }

    Ok(segments)
}

/// Parse one recombined `externalName:(Type) localName` segment.
///
/// Only the first segment may have an empty external name: its keyword is
/// the selector itself.
pub fn parse_segment(segment: &str, first: bool) -> HookerResult<Argument> {
    let malformed = || HookerError::malformed_argument(0, segment);

    let (external, rest) = segment.split_once(':').ok_or_else(malformed)?;
    let external = external.trim();
    if external.is_empty() && !first {
        return Err(malformed());
    }
    if !external.chars().all(is_identifier_char) {
        return Err(malformed());
    }

    let rest = rest.trim_start();
    if !rest.starts_with('(') {
        return Err(malformed());
    }
    let close = matching_paren(rest, 0).ok_or_else(malformed)?;
    let ty = TypeRef::parse(&rest[1..close]);
    if ty.name.is_empty() {
        return Err(malformed());
    }

    let local = rest[close + 1..].trim();
    if local.is_empty() || local.contains(char::is_whitespace) {
        return Err(malformed());
    }

    Ok(Argument { external_name: external.to_string(), ty, local_name: local.to_string() })
}

pub fn parse_arguments(text: &str) -> HookerResult<Vec<Argument>> {
    recombine_segments(text)?
        .iter()
        .enumerate()
        .map(|(i, segment)| parse_segment(segment, i == 0))
        .collect()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

pub fn parse_property_head(line: &str) -> HookerResult<PropertyHead> {
    let body = strip_line_noise(line);
    let mut rest = body[PROPERTY_MARKER.len()..].trim_start();
    if rest.starts_with('(') {
        let close = matching_paren(rest, 0).ok_or_else(|| HookerError::unbalanced(0))?;
        rest = &rest[close + 1..];
    }
    let rest = rest.trim();

    // The name is the trailing identifier; whatever precedes it (pointer
    // markers included) is the type.
    let name_start = rest
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_identifier_char(*ch))
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    let name = &rest[name_start..];
    let type_text = rest[..name_start].trim();

    if name.is_empty() {
        return Err(HookerError::malformed_declaration(0, "property without a name"));
    }
    if type_text.is_empty() {
        return Err(HookerError::malformed_declaration(
            0,
            format!("property '{name}' without a type"),
        ));
    }

    Ok(PropertyHead { type_text: type_text.to_string(), name: name.to_string() })
}
