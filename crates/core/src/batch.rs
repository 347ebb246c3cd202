//! Batch driver: parse and render many declaration blocks, collecting the
//! output in input order and counting the units that failed.
//!
//! Units are independent, so they can be processed on the rayon pool; the
//! concatenated text is the same either way.

use crate::classify::TypeRegistry;
use crate::error::{HookerError, HookerResult};
use crate::filter::SelectorFilter;
use crate::model::ClassModelBuilder;
use crate::render::{render, RenderOptions, Rendered};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error, info};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Everything shared by all units of one run.
#[derive(Debug, Clone)]
pub struct HookRequest {
    pub registry: TypeRegistry,
    pub drop_unknown_types: bool,
    /// Compiled once per run; see [`SelectorFilter::new`].
    pub filter: Option<SelectorFilter>,
    pub render: RenderOptions,
    pub parallel: bool,
}

impl Default for HookRequest {
    fn default() -> Self {
        Self {
            registry: TypeRegistry::builtin(),
            drop_unknown_types: true,
            filter: None,
            render: RenderOptions::default(),
            parallel: false,
        }
    }
}

/// Parse one declaration block and render its hooks.
pub fn generate(source: &str, request: &HookRequest) -> HookerResult<Rendered> {
    let model = ClassModelBuilder::new()
        .registry(request.registry.clone())
        .drop_unknown_types(request.drop_unknown_types)
        .build(source)?;
    if model.is_empty() {
        debug!(class = %model.name(), "No hookable members");
    }
    match &request.filter {
        Some(filter) => render(&model.filtered(filter), &request.render),
        None => render(&model, &request.render),
    }
}

// ---------------------------------------------------------------------------
// Units and report
// ---------------------------------------------------------------------------

/// One declaration block and a label for diagnostics (usually its file name).
#[derive(Debug, Clone)]
pub struct Unit {
    pub label: String,
    pub source: String,
}

impl Unit {
    pub fn new(label: impl Into<String>, source: impl Into<String>) -> Self {
        Self { label: label.into(), source: source.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitFailure {
    pub label: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    #[serde(skip)]
    pub text: String,
    pub hook_count: usize,
    pub units: usize,
    /// Units that produced a class model (possibly with nothing to hook).
    pub parsed: usize,
    pub no_class: usize,
    pub failed: usize,
    pub failures: Vec<UnitFailure>,
    pub elapsed_ms: u64,
}

impl BatchReport {
    pub fn errors(&self) -> usize {
        self.no_class + self.failed
    }
}

/// Process every unit. Per-unit errors are recorded in the report and never
/// stop the remaining units.
pub fn process_units(units: &[Unit], request: &HookRequest) -> BatchReport {
    let start = Instant::now();
    let outcomes: Vec<HookerResult<Rendered>> = if request.parallel {
        units.par_iter().map(|unit| generate(&unit.source, request)).collect()
    } else {
        units.iter().map(|unit| generate(&unit.source, request)).collect()
    };

    let mut report = BatchReport { units: units.len(), ..BatchReport::default() };
    for (unit, outcome) in units.iter().zip(outcomes) {
        match outcome {
            Ok(rendered) => {
                debug!(unit = %unit.label, hooks = rendered.hook_count, "Generated hooks");
                report.parsed += 1;
                report.hook_count += rendered.hook_count;
                report.text.push_str(&rendered.text);
            }
            Err(e) => {
                match &e {
                    HookerError::NoClassFound => report.no_class += 1,
                    _ => report.failed += 1,
                }
                if e.is_recoverable() {
                    debug!(unit = %unit.label, error = %e, "Skipping unit");
                } else {
                    error!(unit = %unit.label, error = %e, "Internal error while rendering unit");
                }
                report.failures.push(UnitFailure { label: unit.label.clone(), error: e.to_string() });
            }
        }
    }
    report.elapsed_ms = start.elapsed().as_millis() as u64;

    info!(
        units = report.units,
        parsed = report.parsed,
        errors = report.errors(),
        hooks = report.hook_count,
        time_ms = report.elapsed_ms,
        "Batch complete"
    );
    report
}
