// Linewright - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Profile loading (built-in + user-defined) and selection
// 4. Running the pipeline over stdin or the given files

use clap::Parser;
use linewright::app::batch::{self, BatchReport, InputResult};
use linewright::app::overrides::{self, Overrides};
use linewright::app::profile_mgr;
use linewright::core::model::{CaseStyle, Replacement, TransformProfile};
use linewright::platform::config::{self, PlatformPaths};
use linewright::util;
use linewright::util::error::LinewrightError;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Linewright - line-oriented text rewriting.
///
/// Reads text from the given files (or stdin), normalises line and field
/// delimiters, and rewrites every line: strip affixes, cut substrings,
/// apply replacements, change case, add affixes.
#[derive(Parser, Debug)]
#[command(name = "linewright", version, about)]
struct Cli {
    /// Input files. Reads stdin when omitted.
    files: Vec<PathBuf>,

    /// Profile id, or path to a profile .toml file.
    #[arg(short = 'p', long = "profile")]
    profile: Option<String>,

    /// Directory containing user-defined profiles.
    #[arg(long = "profile-dir")]
    profile_dir: Option<PathBuf>,

    /// List available profiles and exit.
    #[arg(long = "list-profiles")]
    list_profiles: bool,

    /// Case style, e.g. snake, kebab-camel, snake-all-caps.
    #[arg(short = 'c', long = "case", value_parser = overrides::parse_case_style)]
    case: Option<CaseStyle>,

    /// Fold CRLF and CR line endings into the line separator.
    #[arg(short = 'n', long = "normalize-newlines")]
    normalize_newlines: bool,

    /// Alternate line delimiter (repeatable, applied in order).
    #[arg(long = "line-delim")]
    line_delim: Vec<String>,

    /// Alternate field delimiter (repeatable, applied in order).
    #[arg(long = "field-delim")]
    field_delim: Vec<String>,

    /// Canonical line separator (default "\n").
    #[arg(long = "line-sep")]
    line_sep: Option<String>,

    /// Canonical field separator (default "\t").
    #[arg(long = "field-sep")]
    field_sep: Option<String>,

    #[arg(long = "remove-prefix")]
    remove_prefix: Option<String>,

    #[arg(long = "remove-suffix")]
    remove_suffix: Option<String>,

    #[arg(long = "add-prefix")]
    add_prefix: Option<String>,

    #[arg(long = "add-suffix")]
    add_suffix: Option<String>,

    /// Substring to remove from every line (repeatable, applied in order).
    #[arg(long = "cut")]
    cut: Vec<String>,

    /// Replacement as FROM=TO (repeatable, applied in order).
    #[arg(short = 'r', long = "replace", value_parser = overrides::parse_replacement)]
    replace: Vec<Replacement>,

    /// Drop lines starting with this prefix (repeatable).
    #[arg(long = "skip-prefix")]
    skip_prefix: Vec<String>,

    /// Per-line memo: off, rwlock or cow.
    #[arg(long = "cache")]
    cache: Option<String>,

    /// Write each file's output into this directory instead of stdout.
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Print a JSON run summary on stderr.
    #[arg(long = "summary")]
    summary: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

impl Cli {
    fn overrides(&mut self) -> Overrides {
        Overrides {
            case: self.case,
            normalize_newlines: self.normalize_newlines,
            line_delimiters: std::mem::take(&mut self.line_delim),
            field_delimiters: std::mem::take(&mut self.field_delim),
            line_separator: self.line_sep.take(),
            field_separator: self.field_sep.take(),
            remove_prefix: self.remove_prefix.take(),
            remove_suffix: self.remove_suffix.take(),
            add_prefix: self.add_prefix.take(),
            add_suffix: self.add_suffix.take(),
            cut: std::mem::take(&mut self.cut),
            replace: std::mem::take(&mut self.replace),
            skip_prefixes: std::mem::take(&mut self.skip_prefix),
        }
    }
}

/// Exit code for bad arguments or configuration.
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let mut cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let (app_config, config_warnings) = config::load_config(&platform_paths.config_dir);

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );
    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "Linewright starting"
    );

    // Profile directory: CLI override > platform default
    let user_profile_dir = cli
        .profile_dir
        .clone()
        .unwrap_or_else(|| platform_paths.user_profiles_dir.clone());
    let (profiles, profile_errors) =
        profile_mgr::load_all_profiles(Some(user_profile_dir.as_path()));
    for err in &profile_errors {
        tracing::warn!(error = %err, "Profile loading warning");
    }

    if cli.list_profiles {
        return match print_profiles(&profiles) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report_io_error(e),
        };
    }

    // Profile and cache: CLI > config > default
    let profile_name = cli.profile.clone().or(app_config.default_profile.clone());
    let cache = cli.cache.clone().or(app_config.cache.clone());
    let pipeline = match overrides::build_pipeline(
        profile_name.as_deref(),
        &profiles,
        cli.overrides(),
        cache.as_deref(),
    ) {
        Ok(p) => p,
        Err(e) => return report_error(&e),
    };

    let results = if cli.files.is_empty() {
        vec![batch::run_reader(&pipeline, batch::STDIN_NAME, io::stdin().lock())]
    } else {
        match batch::run_files(&pipeline, &cli.files, cli.output_dir.as_deref()) {
            Ok(results) => results,
            Err(e) => return report_error(&e),
        }
    };

    if let Err(e) = write_outputs(&results, &pipeline.config().line_separator) {
        return report_io_error(e);
    }

    let report = BatchReport::new(&pipeline, profile_name.as_deref(), &results);
    for summary in report.inputs.iter() {
        if let Some(err) = &summary.error {
            eprintln!("Error: {}: {err}", summary.input);
        }
    }

    if cli.summary {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => tracing::error!(error = %e, "Failed to serialise run summary"),
        }
    }

    if report.failed() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Write outputs that were not sent to an output directory, in input order.
///
/// Consecutive outputs are separated by the line separator unless the
/// previous one already ends with it.
fn write_outputs(results: &[InputResult], line_separator: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut previous: Option<&str> = None;

    for text in results.iter().filter_map(|r| r.text.as_deref()) {
        if let Some(prev) = previous {
            if !prev.is_empty() && !prev.ends_with(line_separator) {
                out.write_all(line_separator.as_bytes())?;
            }
        }
        out.write_all(text.as_bytes())?;
        previous = Some(text);
    }
    out.flush()
}

fn print_profiles(profiles: &[TransformProfile]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for p in profiles {
        let origin = if p.is_builtin { "built-in" } else { "user" };
        let case = p.config.case.to_string();
        writeln!(
            out,
            "{:<20} {:<6} {origin:<9} {case:<14} {}",
            p.id, p.version, p.description
        )?;
    }
    Ok(())
}

/// Print `err` and its cause chain; every error raised before any input is
/// processed is a usage or configuration problem.
fn report_error(err: &LinewrightError) -> ExitCode {
    tracing::error!(error = %err, "Run aborted");
    eprintln!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    ExitCode::from(EXIT_USAGE)
}

fn report_io_error(e: io::Error) -> ExitCode {
    // A closed pipe (e.g. `| head`) is not worth reporting.
    if e.kind() == io::ErrorKind::BrokenPipe {
        return ExitCode::SUCCESS;
    }
    eprintln!("Error: failed to write output: {e}");
    ExitCode::FAILURE
}
