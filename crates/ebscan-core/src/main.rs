//! ebscan - expectation-based negative binomial space-time scan
//!
//! Subcommands:
//! - `run`: scan an input file, simulate null replicates, report clusters
//! - `check`: validate an input file and settings without scanning
//! - `schema`: print JSON Schemas for the report and settings formats
//! - `completions`: generate shell completions

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use ebscan_common::error::format_error_human;
use ebscan_common::{Error, OutputFormat, Result, ScoreKind, StructuredError, SCHEMA_VERSION};
use ebscan_config::validate::validate_settings;
use ebscan_config::{load_input, load_settings, ConfigError, LoadedInput, SettingsOverrides};
use ebscan_core::exit_codes::ExitCode;
use ebscan_core::log_event;
use ebscan_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use ebscan_core::output::render;
use ebscan_core::pipeline::{run_pipeline, Provenance};
use ebscan_core::schema::{
    available_schemas, format_schema, generate_all_schemas, generate_schema, SchemaFormat,
};

/// Space-time cluster detection for count data
#[derive(Parser)]
#[command(name = "ebscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan an input file and report the most likely clusters
    Run(RunArgs),

    /// Validate an input file and settings without scanning
    Check(CheckArgs),

    /// Print JSON Schemas for output and settings types
    Schema(SchemaArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Scan input file (JSON)
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Settings file (overrides EBSCAN_SETTINGS and config directories)
    #[arg(long, short = 's')]
    settings: Option<PathBuf>,

    /// Score function
    #[arg(long)]
    score: Option<ScoreKind>,

    /// Keep every (zone, duration) score instead of only the best
    /// (`--store-all=false` turns a settings-file value off)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    store_all: Option<bool>,

    /// Number of Monte Carlo replicates
    #[arg(long)]
    mcsim: Option<usize>,

    /// Longest window duration
    #[arg(long)]
    max_duration: Option<usize>,

    /// Seed for the replicate generator
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ranked clusters to report
    #[arg(long)]
    top: Option<usize>,

    /// Allow ranked clusters to share locations
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    overlapping: Option<bool>,

    /// Also report Gumbel-approximated p-values
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    gumbel: Option<bool>,
}

impl RunArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            score: self.score,
            store_everything: self.store_all,
            num_mcsim: self.mcsim,
            max_duration: self.max_duration,
            seed: self.seed,
            top_clusters: self.top,
            overlapping: self.overlapping,
            gumbel: self.gumbel,
        }
    }
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Scan input file (JSON)
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Settings file
    #[arg(long, short = 's')]
    settings: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name; all schemas when omitted
    name: Option<String>,

    /// List available schema types
    #[arg(long)]
    list: bool,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version arrive here too
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet || cli.global.verbose > 0 {
        Some(LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet))
    } else {
        None
    };
    init_logging(&LogConfig::from_env(
        cli_level,
        cli.global.log_format,
        cli.global.no_color,
    ));

    let ctx = LogContext::new(generate_run_id());

    let exit_code = match cli.command {
        Commands::Run(ref args) => finish(&cli.global, &ctx, cmd_run(&cli.global, args, &ctx)),
        Commands::Check(ref args) => {
            finish(&cli.global, &ctx, cmd_check(&cli.global, args, &ctx))
        }
        Commands::Schema(ref args) => cmd_schema(&cli.global, args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ebscan", &mut std::io::stdout());
            ExitCode::Clean
        }
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Report a command's error on stderr and pick the exit code.
fn finish(global: &GlobalOpts, ctx: &LogContext, result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let exit_code = ExitCode::for_error(&err);
            let message = err.to_string();
            log_event!(
                ctx,
                ERROR,
                event_names::RUN_FINISHED,
                Stage::Report,
                "command failed",
                error_code = err.code(),
                exit_code = exit_code.as_i32(),
                error = message.as_str()
            );
            match global.format {
                OutputFormat::Json | OutputFormat::Jsonl => {
                    eprintln!("{}", StructuredError::from(&err).to_json_pretty());
                }
                _ => {
                    let color = !global.no_color && std::io::stderr().is_terminal();
                    eprintln!("{}", format_error_human(&err, color));
                }
            }
            exit_code
        }
    }
}

fn write_stdout(rendered: &str) {
    if rendered.ends_with('\n') {
        print!("{}", rendered);
    } else {
        println!("{}", rendered);
    }
}

// ============================================================================
// Commands
// ============================================================================

fn load_run_settings(
    settings_path: Option<&std::path::Path>,
    ctx: &LogContext,
) -> Result<(ebscan_config::ScanSettings, String)> {
    match load_settings(settings_path) {
        Ok(resolved) => {
            let source = resolved.source.to_string();
            let path = resolved
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            log_event!(
                ctx,
                DEBUG,
                event_names::CONFIG_LOADED,
                Stage::Load,
                "settings resolved",
                source = source.as_str(),
                path = path.as_str()
            );
            Ok((resolved.settings, source))
        }
        Err(err) => {
            let message = err.to_string();
            log_event!(
                ctx,
                WARN,
                event_names::CONFIG_ERROR,
                Stage::Load,
                "settings could not be loaded",
                error = message.as_str()
            );
            Err(err.into_settings_error())
        }
    }
}

fn load_scan_input(path: &std::path::Path, ctx: &LogContext) -> Result<LoadedInput> {
    let loaded = load_input(path).map_err(ConfigError::into_input_error)?;
    log_event!(
        ctx,
        INFO,
        event_names::INPUT_LOADED,
        Stage::Load,
        "input loaded",
        num_times = loaded.data.num_times(),
        num_locs = loaded.data.num_locs(),
        num_zones = loaded.data.num_zones()
    );
    Ok(loaded)
}

fn cmd_run(global: &GlobalOpts, args: &RunArgs, ctx: &LogContext) -> Result<()> {
    let input_path = args.input.display().to_string();
    log_event!(
        ctx,
        INFO,
        event_names::RUN_STARTED,
        Stage::Init,
        "starting scan run",
        input = input_path.as_str()
    );

    let (mut settings, settings_source) = load_run_settings(args.settings.as_deref(), ctx)?;
    settings.apply(&args.overrides());

    let LoadedInput { data, path, sha256 } = load_scan_input(&args.input, ctx)?;
    let ctx = ctx.clone().with_input_digest(&sha256);

    let provenance = Provenance {
        input_path: Some(path),
        input_sha256: Some(sha256),
        settings_source,
    };
    let report = run_pipeline(data, &settings, provenance, &ctx)?;
    write_stdout(&render(&report, global.format)?);

    log_event!(
        ctx,
        INFO,
        event_names::RUN_FINISHED,
        Stage::Report,
        "scan run finished",
        clusters = report.clusters.len(),
        replicates = report.replicates()
    );
    Ok(())
}

fn cmd_check(global: &GlobalOpts, args: &CheckArgs, ctx: &LogContext) -> Result<()> {
    let (settings, settings_source) = load_run_settings(args.settings.as_deref(), ctx)?;
    let loaded = load_scan_input(&args.input, ctx)?;
    validate_settings(&settings, loaded.data.num_times())
        .map_err(|e| ConfigError::from(e).into_settings_error())?;

    let max_duration = settings.effective_max_duration(loaded.data.num_times());
    let windows = loaded.data.num_zones() * max_duration;
    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "status": "ok",
                "input": {
                    "path": loaded.path.display().to_string(),
                    "sha256": loaded.sha256,
                    "num_times": loaded.data.num_times(),
                    "num_locs": loaded.data.num_locs(),
                    "num_zones": loaded.data.num_zones(),
                },
                "settings_source": settings_source,
                "max_duration": max_duration,
                "windows_per_pass": windows,
            });
            if matches!(global.format, OutputFormat::Jsonl) {
                println!("{}", serde_json::to_string(&response)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
        }
        _ => {
            println!(
                "ok: {} periods × {} locations, {} zones, {} windows per pass (settings: {})",
                loaded.data.num_times(),
                loaded.data.num_locs(),
                loaded.data.num_zones(),
                windows,
                settings_source
            );
        }
    }
    Ok(())
}

fn cmd_schema(global: &GlobalOpts, args: &SchemaArgs) -> ExitCode {
    if args.list {
        for (name, desc) in available_schemas() {
            println!("{:<14} {}", name, desc);
        }
        return ExitCode::Clean;
    }

    let format = if args.compact {
        SchemaFormat::JsonCompact
    } else {
        SchemaFormat::Json
    };

    let value = match args.name {
        Some(ref name) => match generate_schema(name) {
            Some(schema) => schema,
            None => {
                let names: Vec<&str> = available_schemas().iter().map(|(n, _)| *n).collect();
                eprintln!(
                    "error: unknown schema type '{}'; available: {}",
                    name,
                    names.join(", ")
                );
                return ExitCode::ArgsError;
            }
        },
        None => match serde_json::to_value(generate_all_schemas()) {
            Ok(v) => v,
            Err(e) => return finish_json_error(global, e),
        },
    };

    match format_schema(&value, format) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::Clean
        }
        Err(e) => finish_json_error(global, e),
    }
}

fn finish_json_error(global: &GlobalOpts, err: serde_json::Error) -> ExitCode {
    let err = Error::from(err);
    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            eprintln!("{}", StructuredError::from(&err).to_json_pretty())
        }
        _ => eprintln!("{}", format_error_human(&err, false)),
    }
    ExitCode::for_error(&err)
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let version_info = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "ebscan_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            });
            println!("{}", version_info);
        }
        _ => {
            println!("ebscan {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}
