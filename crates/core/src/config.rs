//! `.hooker.toml` loading.
//!
//! Every key is optional. Boolean keys switch features on by default; the
//! command line can switch more on but never off. Unknown keys are reported
//! with a typo suggestion and otherwise ignored.

use crate::classify::TypeRegistry;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = ".hooker.toml";

/// Known keys in `.hooker.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] = &[
    "extra_known_types",
    "drop_unknown_types",
    "getters",
    "setters",
    "params",
    "debug",
    "includes",
    "load_hook",
    "method_regex",
    "output",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookerConfig {
    pub extra_known_types: Vec<String>,
    pub drop_unknown_types: bool,
    pub getters: bool,
    pub setters: bool,
    pub params: bool,
    pub debug: bool,
    pub includes: bool,
    pub load_hook: bool,
    pub method_regex: Option<String>,
    pub output: Option<PathBuf>,
}

impl Default for HookerConfig {
    fn default() -> Self {
        Self {
            extra_known_types: Vec::new(),
            drop_unknown_types: true,
            getters: false,
            setters: false,
            params: false,
            debug: false,
            includes: false,
            load_hook: false,
            method_regex: None,
            output: None,
        }
    }
}

impl HookerConfig {
    pub fn type_registry(&self) -> TypeRegistry {
        TypeRegistry::builtin().with_extra(self.extra_known_types.iter().cloned())
    }
}

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn warn_unknown_keys(table: &toml::Table) {
    for key in table.keys() {
        if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            continue;
        }
        let suggestion = KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k));
        match suggestion {
            Some(suggestion) if edit_distance(key, suggestion) <= 3 => {
                warn!(
                    key = key.as_str(),
                    suggestion = *suggestion,
                    "Unknown key in {CONFIG_FILE_NAME}, did you mean '{suggestion}'?"
                );
            }
            _ => {
                warn!(
                    key = key.as_str(),
                    "Unknown key in {CONFIG_FILE_NAME} (known keys: {})",
                    KNOWN_CONFIG_KEYS.join(", ")
                );
            }
        }
    }
}

/// Apply the keys of a parsed table on top of the defaults.
pub fn config_from_table(table: &toml::Table) -> HookerConfig {
    warn_unknown_keys(table);
    let mut config = HookerConfig::default();
    let flag = |key: &str, default: bool| table.get(key).and_then(|v| v.as_bool()).unwrap_or(default);

    if let Some(types) = table.get("extra_known_types").and_then(|v| v.as_array()) {
        config.extra_known_types =
            types.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect();
    }
    config.drop_unknown_types = flag("drop_unknown_types", config.drop_unknown_types);
    config.getters = flag("getters", config.getters);
    config.setters = flag("setters", config.setters);
    config.params = flag("params", config.params);
    config.debug = flag("debug", config.debug);
    config.includes = flag("includes", config.includes);
    config.load_hook = flag("load_hook", config.load_hook);
    config.method_regex = table.get("method_regex").and_then(|v| v.as_str()).map(|s| s.to_string());
    config.output = table.get("output").and_then(|v| v.as_str()).map(PathBuf::from);
    config
}

/// Load configuration from `path`. A missing file gives the defaults; a file
/// that can't be read or parsed gives the defaults plus a warning.
pub fn load_config_file(path: &Path) -> HookerConfig {
    if !path.exists() {
        return HookerConfig::default();
    }
    debug!(path = %path.display(), "Loading config");
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read config file");
            return HookerConfig::default();
        }
    };
    match content.parse::<toml::Table>() {
        Ok(table) => config_from_table(&table),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse config file");
            HookerConfig::default()
        }
    }
}

/// Load `.hooker.toml` from `dir`.
pub fn load_hooker_config(dir: &Path) -> HookerConfig {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}
