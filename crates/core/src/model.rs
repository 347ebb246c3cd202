//! Builds a [`ClassModel`] from the text of one `@interface` block.

use crate::classify::TypeRegistry;
use crate::error::{HookerError, HookerResult};
use crate::tokenize::{classify_line, parse_arguments, LineKind, MethodHead, PropertyHead};
use crate::types::{ClassModel, Method, Property, TypeRef};
use tracing::debug;

/// Compiler-generated C++ ivar lifecycle methods. Hooking them breaks object
/// construction and destruction, so they are never emitted.
pub const EXCLUDED_SELECTORS: &[&str] = &[".cxx_destruct", ".cxx_construct"];

/// Build a model with the built-in type registry.
pub fn build_class_model(source: &str, drop_unknown_types: bool) -> HookerResult<ClassModel> {
    ClassModelBuilder::new().drop_unknown_types(drop_unknown_types).build(source)
}

/// Find the class name: the first `@interface` line in the block.
pub fn find_class_name(source: &str) -> HookerResult<String> {
    for (idx, line) in source_lines(source).enumerate() {
        if let LineKind::Class(name) = class_line(line, idx + 1)? {
            return Ok(name);
        }
    }
    Err(HookerError::NoClassFound)
}

fn source_lines(source: &str) -> impl Iterator<Item = &str> {
    source.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

fn class_line(line: &str, line_no: usize) -> HookerResult<LineKind> {
    if line.starts_with(crate::tokenize::CLASS_MARKER) {
        classify_line(line).map_err(|e| e.at_line(line_no))
    } else {
        Ok(LineKind::Other)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct ClassModelBuilder {
    registry: TypeRegistry,
    drop_unknown_types: bool,
}

impl Default for ClassModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassModelBuilder {
    pub fn new() -> Self {
        Self { registry: TypeRegistry::builtin(), drop_unknown_types: true }
    }

    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn drop_unknown_types(mut self, drop: bool) -> Self {
        self.drop_unknown_types = drop;
        self
    }

    /// Parse every line of `source`. Any malformed line fails the whole block.
    pub fn build(&self, source: &str) -> HookerResult<ClassModel> {
        let name = find_class_name(source)?;
        debug!(class = %name, "Found class");

        let mut class_methods = Vec::new();
        let mut instance_methods = Vec::new();
        let mut properties = Vec::new();

        for (idx, line) in source_lines(source).enumerate() {
            let line_no = idx + 1;
            let kind = classify_line(line).map_err(|e| e.at_line(line_no))?;
            match kind {
                LineKind::Method(head) => {
                    let Some(method) = self.method(&name, head).map_err(|e| e.at_line(line_no))?
                    else {
                        continue;
                    };
                    if method.is_static {
                        class_methods.push(method);
                    } else {
                        instance_methods.push(method);
                    }
                }
                LineKind::Property(head) => {
                    if let Some(property) = self.property(&name, head) {
                        properties.push(property);
                    }
                }
                LineKind::Class(_) | LineKind::Other => {}
            }
        }

        debug!(
            class = %name,
            class_methods = class_methods.len(),
            instance_methods = instance_methods.len(),
            properties = properties.len(),
            "Built class model"
        );
        ClassModel::new(name, class_methods, instance_methods, properties)
    }

    /// Arguments are parsed before any skip decision, so a malformed line
    /// fails the block whether or not its method would be hooked.
    fn method(&self, class: &str, head: MethodHead) -> HookerResult<Option<Method>> {
        let arguments = parse_arguments(&head.arguments_text)?;
        let method = Method::new(head.selector, head.is_static)
            .with_return_type(TypeRef::parse(&head.return_text))
            .with_arguments(arguments)
            .with_variadic(head.is_variadic);
        if EXCLUDED_SELECTORS.contains(&method.selector.as_str()) {
            return Ok(None);
        }
        let kind = if method.is_static { "class method" } else { "instance method" };
        if self.drop_unknown_types && !self.registry.is_known(&method.return_type) {
            debug!(
                class = class,
                selector = %method.full_selector(),
                return_type = %method.return_type,
                "Unknown return type; skipping {kind}"
            );
            return Ok(None);
        }
        debug!(class = class, selector = %method.full_selector(), "Hooking {kind}");
        Ok(Some(method))
    }

    fn property(&self, class: &str, head: PropertyHead) -> Option<Property> {
        let ty = TypeRef::parse(&head.type_text);
        if self.drop_unknown_types && !self.registry.is_known(&ty) {
            debug!(class = class, property = %head.name, ty = %ty, "Unknown type; skipping property");
            return None;
        }
        Some(Property { property_name: head.name, ty })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\
#import <Foundation/Foundation.h>

@interface SBIconController : NSObject <SBIconViewDelegate>
{
    NSMutableArray *_icons;
}

@property(retain, nonatomic) NSString *title; // @synthesize title=_title;
@property(nonatomic) int age;
@property(nonatomic) SBIconView *iconView;
+ (id)sharedInstance;
+ (SBIconModel *)model;
- (void).cxx_destruct;
- (void)setIcon:(id)icon animated:(BOOL)animated;
- (unsigned int)countForKey:(NSString *)key;
- (CGRect)frameForIcon:(id)icon;
- (void)dealloc;
@end
";

    #[test]
    fn test_build_collects_in_source_order() {
        let model = build_class_model(HEADER, true).unwrap();
        assert_eq!(model.name(), "SBIconController");

        let class_methods: Vec<&str> = model.class_methods().iter().map(|m| m.selector.as_str()).collect();
        assert_eq!(class_methods, vec!["sharedInstance"]);

        let instance: Vec<&str> = model.instance_methods().iter().map(|m| m.selector.as_str()).collect();
        assert_eq!(instance, vec!["setIcon", "countForKey", "dealloc"]);

        let props: Vec<&str> = model.properties().iter().map(|p| p.property_name.as_str()).collect();
        assert_eq!(props, vec!["title", "age"]);
    }

    #[test]
    fn test_build_keeps_unknown_types_when_asked() {
        let model = build_class_model(HEADER, false).unwrap();
        assert_eq!(model.class_methods().len(), 2);
        assert_eq!(model.instance_methods().len(), 4);
        assert_eq!(model.properties().len(), 3);
        assert!(model.instance_methods().iter().all(|m| m.selector != ".cxx_destruct"));
    }

    #[test]
    fn test_build_parses_arguments() {
        let model = build_class_model(HEADER, true).unwrap();
        let set_icon = &model.instance_methods()[0];
        assert_eq!(set_icon.full_selector(), "setIcon:animated:");
        assert_eq!(set_icon.arguments[1].ty.name, "BOOL");
        assert!(set_icon.return_type.is_void());
    }

    #[test]
    fn test_no_class_found() {
        let err = build_class_model("- (void)foo;\n+ (id)bar;\n", true).unwrap_err();
        assert!(matches!(err, HookerError::NoClassFound));
        assert!(matches!(build_class_model("", true), Err(HookerError::NoClassFound)));
    }

    #[test]
    fn test_malformed_line_aborts_block_with_line_number() {
        let source = "@interface Foo : NSObject\n- (void)ok;\n- (void)bad:(unsigned int count;\n@end\n";
        let err = build_class_model(source, true).unwrap_err();
        assert!(matches!(err, HookerError::UnbalancedParenthesis { line: 3 }), "got {err:?}");
    }

    #[test]
    fn test_malformed_unknown_method_fails_in_both_modes() {
        let source = "@interface Foo : NSObject\n- (Opaque *)bad:(int a :(int)b;\n- (void)ok;\n@end\n";
        for drop in [true, false] {
            let err = build_class_model(source, drop).unwrap_err();
            assert!(matches!(err, HookerError::UnbalancedParenthesis { line: 2 }), "drop={drop}: got {err:?}");
        }
    }

    #[test]
    fn test_well_formed_unknown_method_is_skipped() {
        let source = "@interface Foo : NSObject\n- (Opaque *)thing:(int)a other:(id)b;\n- (void)ok;\n@end\n";
        let model = build_class_model(source, true).unwrap();
        assert_eq!(model.instance_methods().len(), 1);
        assert_eq!(build_class_model(source, false).unwrap().instance_methods().len(), 2);
    }

    #[test]
    fn test_variadic_method_is_kept() {
        let source = "@interface Foo : NSObject\n+ (id)stringWithFormat:(id)arg1, ...;\n@end\n";
        let model = build_class_model(source, true).unwrap();
        let method = &model.class_methods()[0];
        assert!(method.is_variadic);
        assert_eq!(method.arguments.len(), 1);
        assert_eq!(method.arguments[0].local_name, "arg1");
    }

    #[test]
    fn test_block_property_fails_block() {
        let source = "@interface Foo : NSObject\n@property(copy) id (^handler)(id);\n@end\n";
        let err = build_class_model(source, true).unwrap_err();
        assert!(matches!(err, HookerError::MalformedDeclaration { line: 2, .. }), "got {err:?}");
    }

    #[test]
    fn test_exclusions_apply_to_both_sigils() {
        let source = "@interface Foo : NSObject\n- (id).cxx_construct;\n+ (void).cxx_destruct;\n- (id)init;\n@end\n";
        let model = build_class_model(source, false).unwrap();
        assert!(model.class_methods().is_empty());
        assert_eq!(model.instance_methods().len(), 1);
    }

    #[test]
    fn test_first_interface_wins_and_crlf() {
        let source = "@interface First : NSObject\r\n- (id)init;\r\n@end\r\n@interface Second : NSObject\r\n@end\r\n";
        let model = build_class_model(source, true).unwrap();
        assert_eq!(model.name(), "First");
        assert_eq!(model.instance_methods()[0].selector, "init");
    }

    #[test]
    fn test_custom_registry() {
        let source = "@interface Foo : NSObject\n- (SBIcon *)icon;\n@end\n";
        let model = ClassModelBuilder::new()
            .registry(TypeRegistry::builtin().with_extra(["SBIcon"]))
            .build(source)
            .unwrap();
        assert_eq!(model.instance_methods().len(), 1);
    }
}
