//! Name filter for methods and properties (`--method-regex`).

use crate::error::{HookerError, HookerResult};
use crate::types::Selectable;
use regex::Regex;

/// A compiled name pattern, anchored at the start of the name.
///
/// `set` matches `setIcon` but not `resetIcon`; the pattern does not need to
/// consume the whole name.
#[derive(Debug, Clone)]
pub struct SelectorFilter {
    pattern: String,
    regex: Regex,
}

impl SelectorFilter {
    pub fn new(pattern: &str) -> HookerResult<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
            HookerError::InvalidPattern { pattern: pattern.to_string(), source }
        })?;
        Ok(Self { pattern: pattern.to_string(), regex })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Items whose name matches, in their original order.
    pub fn filter<'a, T: Selectable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(item.selectable_name())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Method, Property, TypeRef};

    fn methods(names: &[&str]) -> Vec<Method> {
        names.iter().map(|n| Method::new(*n, false)).collect()
    }

    #[test]
    fn test_anchored_at_start() {
        let filter = SelectorFilter::new("set").unwrap();
        assert_eq!(filter.pattern(), "set");
        assert!(filter.matches("setIcon"));
        assert!(!filter.matches("resetIcon"));
    }

    #[test]
    fn test_alternation_stays_anchored() {
        let filter = SelectorFilter::new("foo|bar").unwrap();
        assert!(filter.matches("barBaz"));
        assert!(!filter.matches("xbar"));
    }

    #[test]
    fn test_filter_preserves_order() {
        let items = methods(&["setA", "init", "setB", "dealloc", "setC"]);
        let filter = SelectorFilter::new("set[A-C]").unwrap();
        let kept: Vec<&str> = filter.filter(&items).iter().map(|m| m.selector.as_str()).collect();
        assert_eq!(kept, vec!["setA", "setB", "setC"]);
    }

    #[test]
    fn test_filter_properties_by_name() {
        let props = vec![
            Property { property_name: "title".into(), ty: TypeRef::parse("NSString *") },
            Property { property_name: "age".into(), ty: TypeRef::parse("int") },
        ];
        let filter = SelectorFilter::new("ag").unwrap();
        assert_eq!(filter.filter(&props).len(), 1);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = SelectorFilter::new("(unclosed").unwrap_err();
        assert!(matches!(err, HookerError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_no_match_yields_empty() {
        let items = methods(&["init", "dealloc"]);
        let filter = SelectorFilter::new("zzz").unwrap();
        assert!(filter.filter(&items).is_empty());
    }
}
