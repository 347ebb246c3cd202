//! End-to-end tests: fixture headers on disk through discovery, parsing and
//! rendering, checked against the hook text a tweak build would consume.

mod helpers;

use hooker_core::{
    build_class_model, discover_headers, generate, process_units, render_preamble, HookRequest,
    HookerError, PreambleOptions, RenderOptions, ScanOptions, SelectorFilter,
};

fn accessors() -> RenderOptions {
    RenderOptions { include_getters: true, include_setters: true, ..RenderOptions::default() }
}

// ---------------------------------------------------------------------------
// Single header
// ---------------------------------------------------------------------------

#[test]
fn test_icon_controller_default_hooks() {
    let rendered = generate(&helpers::header("SBIconController.h"), &HookRequest::default()).unwrap();

    assert_eq!(rendered.hook_count, 5);
    let border = "=".repeat("SBIconController".len());
    assert!(rendered.text.starts_with(&format!("/*=={border}\n  SBIconController  \n{border}==*/\n\n")));
    assert!(rendered.text.contains("%hook SBIconController\n"));
    assert!(rendered.text.contains("+(id) sharedInstance {\n    %log;\n    return %orig;\n}\n"));
    assert!(rendered.text.contains(
        "-(void) setIsEditing:(BOOL) editing withFeedbackBehavior:(id) behavior {\n    %log;\n    %orig;\n}\n"
    ));
    assert!(rendered.text.contains("-(unsigned long long) iconCountForLocation:(long long) location {"));
    assert!(rendered.text.ends_with("%end\n\n\n"));

    // Unknown return types and C++ lifecycle methods are never hooked.
    assert!(!rendered.text.contains("model"));
    assert!(!rendered.text.contains("frameForIcon"));
    assert!(!rendered.text.contains("cxx_destruct"));
    // Properties need --getters or --setters.
    assert!(!rendered.text.contains("/* Properties */"));
}

#[test]
fn test_icon_controller_with_accessors_and_params() {
    let request = HookRequest {
        render: RenderOptions { log_params: true, debug_logging: true, ..accessors() },
        ..HookRequest::default()
    };
    let rendered = generate(&helpers::header("SBIconController.h"), &request).unwrap();

    // 5 methods plus getter and setter for `title` and `badgeCount`.
    assert_eq!(rendered.hook_count, 9);
    assert!(rendered.text.contains("-(int) getBadgeCount {\n    NSLog(@\" >>> Enter badgeCount Getter >>>\");\n"));
    assert!(rendered.text.contains("    int badgeCount = %orig;\n"));
    assert!(rendered.text.contains("    NSLog(@\"[<- Getter](int) badgeCount: %d\", badgeCount);\n"));
    assert!(rendered.text.contains("-(void) setTitle: (NSString *)title {\n"));
    assert!(rendered.text.contains("    %orig(title);\n"));
    assert!(rendered.text.contains("    NSLog(@\"    [Param]:(BOOL) editing -> %d\", editing);\n"));
    assert!(rendered.text.contains(
        "    NSLog(@\"    [Param]withFeedbackBehavior:(id) behavior -> %@\", behavior);\n"
    ));
    assert!(!rendered.text.contains("iconView"));

    let props = rendered.text.find("/* Properties */").unwrap();
    let class_methods = rendered.text.find("/* Class Methods */").unwrap();
    let instance_methods = rendered.text.find("/* Instance Methods */").unwrap();
    assert!(props < class_methods && class_methods < instance_methods);
}

#[test]
fn test_keep_unknown_types() {
    let request = HookRequest { drop_unknown_types: false, ..HookRequest::default() };
    let rendered = generate(&helpers::header("SBIconController.h"), &request).unwrap();
    assert_eq!(rendered.hook_count, 7);
    assert!(rendered.text.contains("+(SBIconModel *) model {\n    %log;\n    return %orig;\n}\n"));
    assert!(rendered.text.contains("-(CGRect) frameForIcon:(id) icon {"));
}

#[test]
fn test_method_filter_on_fixture() {
    let request = HookRequest {
        filter: Some(SelectorFilter::new("set|is").unwrap()),
        render: accessors(),
        ..HookRequest::default()
    };
    let rendered = generate(&helpers::header("SBIconController.h"), &request).unwrap();
    // setIsEditing:withFeedbackBehavior: and isEditing; no property name matches.
    assert_eq!(rendered.hook_count, 2);
    assert!(!rendered.text.contains("/* Class Methods */"));
    assert!(!rendered.text.contains("dealloc"));
}

#[test]
fn test_filter_with_no_match_renders_nothing() {
    let request = HookRequest {
        filter: Some(SelectorFilter::new("zzz").unwrap()),
        ..HookRequest::default()
    };
    let rendered = generate(&helpers::header("SBIconController.h"), &request).unwrap();
    assert!(rendered.is_empty());
    assert_eq!(rendered.text, "");
}

#[test]
fn test_header_without_class() {
    let err = build_class_model(&helpers::header("Notes.h"), true).unwrap_err();
    assert!(matches!(err, HookerError::NoClassFound));
}

#[test]
fn test_malformed_header_reports_line() {
    let err = build_class_model(&helpers::header("Broken.h"), true).unwrap_err();
    assert!(matches!(err, HookerError::UnbalancedParenthesis { line: 3 }), "got {err:?}");
    assert!(err.is_recoverable());
}

#[test]
fn test_generation_is_deterministic() {
    let source = helpers::header("SBIconController.h");
    let request = HookRequest { render: accessors(), ..HookRequest::default() };
    let first = generate(&source, &request).unwrap();
    let second = generate(&source, &request).unwrap();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

#[test]
fn test_batch_over_fixture_set() {
    let units = helpers::units(&["Broken.h", "Notes.h", "SBApplication.h", "SBIconController.h"]);
    let report = process_units(&units, &HookRequest::default());

    assert_eq!(report.units, 4);
    assert_eq!(report.parsed, 2);
    assert_eq!(report.no_class, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.hook_count, 3 + 5);

    let app = report.text.find("%hook SBApplication").unwrap();
    let icons = report.text.find("%hook SBIconController").unwrap();
    assert!(app < icons);
    let failed: Vec<&str> = report.failures.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(failed, vec!["Broken.h", "Notes.h"]);
}

#[test]
fn test_parallel_batch_matches_sequential() {
    let units = helpers::units(&["SBApplication.h", "SBIconController.h", "Broken.h"]);
    let request = HookRequest { render: accessors(), ..HookRequest::default() };
    let sequential = process_units(&units, &request);
    let parallel = process_units(&units, &HookRequest { parallel: true, ..request.clone() });
    assert_eq!(sequential.text, parallel.text);
    assert_eq!(sequential.hook_count, parallel.hook_count);
    assert_eq!(sequential.hook_count, 7 + 9);
}

#[test]
fn test_preamble_then_hooks() {
    let preamble = render_preamble(&PreambleOptions { includes: true, load_hook: true });
    let units = helpers::units(&["SBApplication.h"]);
    let report = process_units(&units, &HookRequest::default());
    let tweak = format!("{preamble}{}", report.text);

    assert!(tweak.starts_with("#import <CoreFoundation/CoreFoundation.h>\n"));
    let ctor = tweak.find("%ctor {").unwrap();
    let hook = tweak.find("%hook SBApplication").unwrap();
    assert!(ctor < hook);
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[test]
fn test_discover_fixture_directory() {
    let dir = helpers::copy_fixtures(None);
    let headers = discover_headers(&[dir.path().to_path_buf()], &ScanOptions::default());
    let names: Vec<String> =
        headers.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
    assert_eq!(names, vec!["Broken.h", "Notes.h", "SBApplication.h", "SBIconController.h"]);
}

#[test]
fn test_discover_with_next_step_and_file_regex() {
    let dir = helpers::copy_fixtures(None);
    let options = ScanOptions {
        next_step: true,
        file_filter: Some(SelectorFilter::new("NS|SBApp").unwrap()),
        ..ScanOptions::default()
    };
    let headers = discover_headers(&[dir.path().to_path_buf()], &options);
    let names: Vec<String> =
        headers.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
    assert_eq!(names, vec!["NSString.h", "SBApplication.h"]);
}

#[test]
fn test_discover_recursive_only_when_asked() {
    let dir = helpers::copy_fixtures(Some("Headers/SpringBoard"));
    let flat = discover_headers(&[dir.path().to_path_buf()], &ScanOptions::default());
    assert!(flat.is_empty());

    let options = ScanOptions { recursive: true, ..ScanOptions::default() };
    let deep = discover_headers(&[dir.path().to_path_buf()], &options);
    assert_eq!(deep.len(), 4);
}
