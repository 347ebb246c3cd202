//! Hooker CLI: generate Logos hooks from class-dump headers.
//!
//! Calls `hooker-core` directly; this binary only resolves options, reads
//! headers and writes the tweak file.

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use hooker_core::{
    discover_headers, load_config_file, load_hooker_config, load_units, process_units,
    render_preamble, BatchReport, ClassModelBuilder, HookRequest, HookerConfig, PreambleOptions,
    RenderOptions, ScanOptions, SelectorFilter,
};

const DEFAULT_OUTPUT: &str = "Tweak.xm";

/// Hooker: generate hooks for Objective-C class header files.
#[derive(Parser)]
#[command(name = "hooker", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,

    /// Output a JSON run summary instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Display verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ./.hooker.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct GenerateArgs {
    /// File(s) or a single directory with Objective-C header files
    #[arg(short, long, num_args = 1..)]
    target: Vec<PathBuf>,

    /// Output file with hooks (default: Tweak.xm)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append to the output file instead of truncating it
    #[arg(short, long)]
    append: bool,

    /// Also hook headers named after Foundation types
    #[arg(short, long)]
    next_step: bool,

    /// Add basic #import lines to the tweak
    #[arg(short, long)]
    includes: bool,

    /// Generate a hook that logs when the dylib is loaded
    #[arg(short, long)]
    load_hook: bool,

    /// Hook methods with unknown return types (may cause compiler errors)
    #[arg(short, long)]
    unknown_types: bool,

    /// Only hook headers whose file name matches this regex (directory targets)
    #[arg(short, long)]
    file_regex: Option<String>,

    /// Only hook methods and properties whose name matches this regex
    #[arg(short, long)]
    method_regex: Option<String>,

    /// Create hooks for @property getters
    #[arg(short, long)]
    getters: bool,

    /// Create hooks for @property setters
    #[arg(short, long)]
    setters: bool,

    /// Log method parameter values
    #[arg(short, long)]
    params: bool,

    /// Debug logging inside getters and setters
    #[arg(long)]
    debug: bool,

    /// Descend into subdirectories of a directory target
    #[arg(short, long)]
    recursive: bool,

    /// Parse headers in parallel
    #[arg(short, long)]
    jobs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed class model of a header as JSON
    Inspect {
        /// Header file
        file: PathBuf,

        /// Keep methods with unknown return types
        #[arg(short, long)]
        unknown_types: bool,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn load_config(path: Option<&Path>) -> HookerConfig {
    match path {
        Some(p) => {
            if !p.exists() {
                warn!(path = %p.display(), "Config file not found, using defaults");
            }
            load_config_file(p)
        }
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            load_hooker_config(&cwd)
        }
    }
}

fn compile_filter(pattern: Option<&str>) -> Option<SelectorFilter> {
    pattern.map(|p| {
        SelectorFilter::new(p).unwrap_or_else(|e| {
            error!("{e}");
            eprintln!("Invalid regular expression: {p}");
            std::process::exit(1);
        })
    })
}

fn main() {
    let cli = Cli::parse();

    let default_directive = if cli.verbose { "hooker=debug" } else { "hooker=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_directive.parse().unwrap()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Some(Commands::Inspect { file, unknown_types }) => inspect(&file, &config, unknown_types),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "hooker", &mut std::io::stdout());
        }
        None => run_generate(&cli.generate, &config, cli.json, cli.verbose),
    }
}

fn inspect(file: &Path, config: &HookerConfig, unknown_types: bool) {
    let source = std::fs::read(file).unwrap_or_else(|e| {
        error!(path = %file.display(), error = %e, "Could not read header");
        std::process::exit(1);
    });
    let source = String::from_utf8_lossy(&source);
    let model = ClassModelBuilder::new()
        .registry(config.type_registry())
        .drop_unknown_types(config.drop_unknown_types && !unknown_types)
        .build(&source)
        .unwrap_or_else(|e| {
            eprintln!("Invalid Objective-C header file: {e}");
            std::process::exit(1);
        });
    println!("{}", serde_json::to_string_pretty(&model).unwrap());
}

fn run_generate(args: &GenerateArgs, config: &HookerConfig, json: bool, verbose: bool) {
    if args.target.is_empty() {
        eprintln!("No targets given (use --target <PATH>...)");
        std::process::exit(1);
    }

    // Both patterns are compiled before any file is touched.
    let method_filter = compile_filter(args.method_regex.as_deref().or(config.method_regex.as_deref()));
    let file_filter = compile_filter(args.file_regex.as_deref());

    let registry = config.type_registry();
    if registry.extra_count() > 0 {
        info!(extra_known_types = registry.extra_count(), "Extended known-type registry");
    }
    let request = HookRequest {
        registry,
        drop_unknown_types: config.drop_unknown_types && !args.unknown_types,
        filter: method_filter,
        render: RenderOptions {
            include_properties: true,
            include_getters: args.getters || config.getters,
            include_setters: args.setters || config.setters,
            log_params: args.params || config.params,
            debug_logging: args.debug || config.debug,
        },
        parallel: args.jobs,
    };
    let preamble = PreambleOptions {
        includes: args.includes || config.includes,
        load_hook: args.load_hook || config.load_hook,
    };
    let output = args
        .output
        .clone()
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let scan = ScanOptions { next_step: args.next_step, recursive: args.recursive, file_filter };
    let is_dir_scan = args.target.len() == 1 && args.target[0].is_dir();
    let headers = discover_headers(&args.target, &scan);
    if is_dir_scan && !json {
        eprintln!("Found {} target file(s) in target directory", headers.len());
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .append(args.append)
        .truncate(!args.append)
        .open(&output)
        .unwrap_or_else(|e| {
            error!(path = %output.display(), error = %e, "Could not open output file");
            std::process::exit(1);
        });

    let preamble_text = render_preamble(&preamble);
    if !preamble_text.is_empty() {
        info!(includes = preamble.includes, load_hook = preamble.load_hook, "Writing preamble");
        write_or_exit(&mut file, &output, &preamble_text);
    }

    if headers.is_empty() {
        warn!("No valid targets found");
        if !json {
            eprintln!("No valid targets found");
        }
        std::process::exit(1);
    }

    let (units, unreadable) = load_units(&headers);
    let mut report = process_units(&units, &request);
    report.units += unreadable.len();
    report.failed += unreadable.len();
    write_or_exit(&mut file, &output, &report.text);
    drop(file);

    let bytes = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    if json {
        let summary = serde_json::json!({
            "output": output.display().to_string(),
            "bytes": bytes,
            "report": report,
            "render": request.render,
            "preamble": preamble,
            "method_regex": request.filter.as_ref().map(|f| f.pattern()),
            "extra_known_types": request.registry.extra_count(),
        });
        println!("{}", serde_json::to_string_pretty(&summary).unwrap());
    } else {
        print_summary(&report, &output, bytes, verbose);
    }
}

fn write_or_exit(file: &mut std::fs::File, output: &Path, text: &str) {
    if let Err(e) = file.write_all(text.as_bytes()) {
        error!(path = %output.display(), error = %e, "Could not write output file");
        std::process::exit(1);
    }
}

fn print_summary(report: &BatchReport, output: &Path, bytes: u64, verbose: bool) {
    if verbose {
        for failure in &report.failures {
            warn!(file = %failure.label, "Invalid Objective-C header file: {}", failure.error);
        }
    }
    eprintln!("Successfully parsed {} of {} file(s)", report.parsed, report.units);
    eprintln!("Generated {} function hook(s)", report.hook_count);
    eprintln!("Hooks written to: {} ({bytes} bytes)", output.display());
}
