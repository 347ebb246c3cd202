//! Hooker: Logos hook generator for Objective-C class declarations.
//!
//! This crate parses the `@interface` block of a class-dump style header into a
//! class model and renders a `%hook` block that logs every call before
//! forwarding it with `%orig`.
//!
//! # Modules
//!
//! - [`tokenize`]: Line classification and method/property head parsing
//! - [`model`]: Class model construction from declaration text
//! - [`types`]: Type references, methods, properties, class model
//! - [`classify`]: Known-type registry and NSLog format specifiers
//! - [`filter`]: Anchored name filter for methods and properties
//! - [`render`]: Hook text generation and the optional preamble
//! - [`batch`]: Multi-unit driver with optional rayon parallelism
//! - [`scan`]: Header discovery on disk
//! - [`config`]: `.hooker.toml` loading
//! - [`error`]: Error type shared by every stage

pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod render;
pub mod scan;
pub mod tokenize;
pub mod types;

pub use batch::{generate, process_units, BatchReport, HookRequest, Unit, UnitFailure};
pub use config::{load_config_file, load_hooker_config, HookerConfig, CONFIG_FILE_NAME};
pub use error::{HookerError, HookerResult};
pub use filter::SelectorFilter;
pub use model::{build_class_model, ClassModelBuilder};
pub use render::{render, render_preamble, PreambleOptions, RenderOptions, Rendered};
pub use scan::{discover_headers, load_units, ScanOptions};
pub use types::{Argument, ClassModel, Method, Property, TypeRef};
