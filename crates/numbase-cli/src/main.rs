//! Numbase CLI - numeral conversion between binary, decimal and hexadecimal

mod config;
mod errors;
mod rows;

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use config::{Config, Preset};
use indicatif::{ProgressBar, ProgressStyle};
use rhi_numbase_core::{
    ConfigError, ConversionDirection, Converter, ExecuteError, ExecutionStats, ParamKind,
    Registry, Row, RowProcessor, RowSink, StepParams, make_converter, stream_rows,
};
use rows::{RowFormat, RowWriter};
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Processor driven by `process`.
const PROCESSOR: &str = "NumericBaseConversion";

/// Output verbosity level.
#[derive(Clone, Copy)]
enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    fn info(self, msg: &str) {
        if !matches!(self, Verbosity::Quiet) {
            println!("{msg}");
        }
    }

    fn debug(self, msg: &str) {
        if matches!(self, Verbosity::Verbose) {
            eprintln!("[debug] {msg}");
        }
    }

    /// Summary of a run. Goes to stderr; stdout may be carrying rows.
    fn result(self, msg: &str) {
        if !matches!(self, Verbosity::Quiet) {
            eprintln!("{msg}");
        }
    }

    fn log_level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
        }
    }
}

#[derive(Parser)]
#[command(name = "numbase")]
#[command(about = "Numeral conversion between binary, decimal and hexadecimal", long_about = None)]
struct Cli {
    /// Verbose output (show debug info)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (default: ~/.config/numbase/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List conversion directions and processors
    List,

    /// Convert numerals given as arguments, or one per line on stdin
    Convert {
        /// Conversion mode, e.g. HEXA_TO_DECIMAL (default: from config)
        #[arg(short, long)]
        mode: Option<String>,
        /// Numerals to convert (reads stdin when empty)
        values: Vec<String>,
    },

    /// Convert one column of a CSV or NDJSON row file
    Process(ProcessArgs),

    /// Show processor help and parameters
    Describe {
        /// Processor name
        #[arg(default_value = PROCESSOR)]
        name: String,
        /// Print the parameter form as JSON
        #[arg(long)]
        json: bool,
    },

    /// List presets from the config file
    Presets,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate man page
    Manpage,
}

#[derive(Args)]
struct ProcessArgs {
    /// Input row file (use "-" for stdin)
    input: String,
    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<String>,
    /// Step parameters file (YAML, TOML, or JSON)
    #[arg(long)]
    params: Option<PathBuf>,
    /// Apply a preset from the config file
    #[arg(long)]
    preset: Option<String>,
    /// Column holding the numerals
    #[arg(long)]
    input_column: Option<String>,
    /// Column receiving the results (default: the input column)
    #[arg(long)]
    output_column: Option<String>,
    /// Conversion mode, e.g. BINARY_TO_HEXA
    #[arg(short, long)]
    mode: Option<String>,
    /// Row format (default: from the input extension, csv for stdin)
    #[arg(long, value_enum)]
    format: Option<RowFormat>,
    /// Worker threads (needs the `parallel` feature)
    #[arg(short, long)]
    jobs: Option<usize>,
}

fn init_logging(v: Verbosity) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(v.log_level()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(Verbosity::from_flags(cli.verbose, cli.quiet));

    // Load config file
    let config = if let Some(ref path) = cli.config {
        Config::load_from_path(Some(path.clone()))
    } else {
        Config::load()
    };

    let mut registry = Registry::new();
    rhi_numbase_plugin::load(&mut registry);

    // Apply config defaults, CLI flags override
    let verbose = cli.verbose || config.defaults.verbose;
    let quiet = cli.quiet || config.defaults.quiet;
    let verbosity = Verbosity::from_flags(verbose, quiet);

    match cli.command {
        Commands::List => cmd_list(&registry, verbosity),
        Commands::Convert { mode, values } => cmd_convert(&config, mode, values, verbosity),
        Commands::Process(args) => cmd_process(&registry, &config, args, verbosity),
        Commands::Describe { name, json } => cmd_describe(&registry, &name, json, verbosity),
        Commands::Presets => cmd_presets(&config, verbosity),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "numbase", &mut std::io::stdout());
            Ok(())
        }
        Commands::Manpage => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            man.render(&mut std::io::stdout())?;
            Ok(())
        }
    }
}

/// Turn a setup error into a message the user can act on.
fn config_error(err: ConfigError) -> anyhow::Error {
    match err {
        ConfigError::UnknownDirection(mode) => anyhow!(errors::unknown_mode_error(&mode)),
        ConfigError::MissingDirection => anyhow!(errors::missing_mode_error()),
        ConfigError::MissingInputColumn => anyhow!(errors::missing_input_column_error()),
        other => anyhow!(other),
    }
}

fn cmd_list(registry: &Registry, v: Verbosity) -> Result<()> {
    v.info("Conversion directions:\n");
    for direction in ConversionDirection::ALL {
        v.info(&format!("  {:<18} {}", direction.id(), direction.label()));
    }

    v.info("\nProcessors:\n");
    for meta in registry.metas() {
        let desc = meta.describe();
        let tags: Vec<_> = meta.tags().iter().map(|t| format!("{:?}", t)).collect();
        v.info(&format!("  {}", desc.name));
        v.info(&format!("    {}", desc.label));
        v.info(&format!("    category: {:?}", meta.category()));
        v.info(&format!("    tags:     {}", tags.join(", ")));
    }

    Ok(())
}

fn cmd_convert(
    config: &Config,
    mode: Option<String>,
    values: Vec<String>,
    v: Verbosity,
) -> Result<()> {
    let mode = mode
        .or_else(|| config.defaults.mode.clone())
        .ok_or_else(|| anyhow!(errors::missing_mode_error()))?;
    let converter = make_converter(&mode).map_err(config_error)?;
    v.debug(&format!("Converting {}", converter.direction().summary()));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let mut emit = |value: &str| -> Result<()> {
        let output = converter.convert(Some(value))?;
        writeln!(out, "{}", output).context("Failed to write output")
    };

    if values.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            emit(line.trim_end_matches('\r'))?;
        }
    } else {
        for value in &values {
            emit(value)?;
        }
    }

    Ok(())
}

/// Resolve step parameters: defaults, then the params file, then the preset,
/// then CLI flags.
fn resolve_params(config: &Config, args: &ProcessArgs) -> Result<StepParams> {
    let mut params = match args.params {
        Some(ref path) => {
            let data = std::fs::read(path)
                .map_err(|e| anyhow!(errors::file_read_error(&path.to_string_lossy(), &e)))?;
            StepParams::from_bytes(&data, path.to_str())
                .map_err(config_error)
                .with_context(|| format!("Invalid params file '{}'", path.display()))?
        }
        None => StepParams::default(),
    };

    if params.processing_mode.is_none() {
        if let Some(ref mode) = config.defaults.mode {
            params.processing_mode = Some(ConversionDirection::from_id(mode).map_err(|e| {
                config_error(e.into()).context("Invalid `mode` under [defaults] in config")
            })?);
        }
    }

    let mut preset = match args.preset {
        Some(ref name) => config.get_preset(name).cloned().ok_or_else(|| {
            anyhow!("Unknown preset: '{}'. Use 'numbase presets' to list.", name)
        })?,
        None => Preset::default(),
    };
    preset.merge(&Preset {
        input_column: args.input_column.clone(),
        output_column: args.output_column.clone(),
        mode: args.mode.clone(),
    });
    preset.apply(&mut params).map_err(config_error)?;

    params.validate().map_err(config_error)?;
    Ok(params)
}

fn cmd_process(
    registry: &Registry,
    config: &Config,
    args: ProcessArgs,
    v: Verbosity,
) -> Result<()> {
    let params = resolve_params(config, &args)?;
    if let Some(summary) = registry.get(PROCESSOR).and_then(|m| m.summarize(&params)) {
        v.debug(&summary);
    }

    let format = match args.format {
        Some(format) => format,
        None if args.input == "-" => RowFormat::Csv,
        None => RowFormat::detect(&args.input).ok_or_else(|| {
            anyhow!(
                "Cannot detect row format of '{}'. Use --format csv or --format ndjson.",
                args.input
            )
        })?,
    };

    let input_column = params.input_column.clone();
    let output_column = params.resolved_output_column().to_string();
    let processor = registry.build(PROCESSOR, params).map_err(config_error)?;

    let reader: Box<dyn Read> = if args.input == "-" {
        Box::new(std::io::stdin().lock())
    } else {
        let file = std::fs::File::open(&args.input)
            .map_err(|e| anyhow!(errors::file_read_error(&args.input, &e)))?;
        Box::new(std::io::BufReader::new(file))
    };
    let table = rows::read_rows(reader, format)?;
    v.debug(&format!("Read {} rows from {}", table.rows.len(), args.input));

    if !table.rows.is_empty() && !table.has_column(&input_column) {
        tracing::warn!(
            column = %input_column,
            "input column not found, rows pass through unchanged"
        );
    }

    let out: Box<dyn Write> = match args.output.as_deref() {
        None | Some("-") => Box::new(std::io::stdout().lock()),
        Some(path) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file '{}'", path))?,
        )),
    };
    let mut writer = RowWriter::new(out, format, &table.columns, &output_column)?;

    let jobs = args.jobs.or(config.defaults.jobs).unwrap_or(1);
    let stats = run_rows(processor.as_ref(), table.rows, &mut writer, jobs, v)?;

    v.result(&format!(
        "Processed {} rows: {} converted, {} empty, {} not a numeral ({:.2?})",
        stats.rows, stats.converted, stats.skipped_empty, stats.skipped_no_match, stats.duration
    ));
    Ok(())
}

fn run_rows<S: RowSink>(
    processor: &dyn RowProcessor,
    rows: Vec<Row>,
    sink: &mut S,
    jobs: usize,
    v: Verbosity,
) -> Result<ExecutionStats> {
    if jobs > 1 {
        #[cfg(feature = "parallel")]
        return run_parallel(processor, rows, sink, jobs);
        #[cfg(not(feature = "parallel"))]
        tracing::warn!(jobs, "built without the `parallel` feature, processing sequentially");
    }

    let mut progress = ProgressSink::new(sink, rows.len(), v);
    Ok(stream_rows(processor, rows, &mut progress)?)
}

#[cfg(feature = "parallel")]
fn run_parallel<S: RowSink>(
    processor: &dyn RowProcessor,
    rows: Vec<Row>,
    sink: &mut S,
    jobs: usize,
) -> Result<ExecutionStats> {
    use rhi_numbase_core::{Executor, ParallelExecutor};

    let batch = ParallelExecutor::new()
        .with_parallelism(jobs)
        .execute_batch(processor, rows)?;
    for row in batch.rows {
        sink.emit_row(row)?;
    }
    sink.last_row_emitted()?;
    Ok(batch.stats)
}

/// Sink wrapper ticking a progress bar per emitted row.
struct ProgressSink<'a, S> {
    inner: &'a mut S,
    pb: Option<ProgressBar>,
}

impl<'a, S: RowSink> ProgressSink<'a, S> {
    fn new(inner: &'a mut S, len: usize, v: Verbosity) -> Self {
        let pb = if !matches!(v, Verbosity::Quiet) {
            let pb = ProgressBar::new(len as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} rows")
            {
                pb.set_style(style.progress_chars("=> "));
            }
            Some(pb)
        } else {
            None
        };
        Self { inner, pb }
    }
}

impl<S: RowSink> RowSink for ProgressSink<'_, S> {
    fn emit_row(&mut self, row: Row) -> Result<(), ExecuteError> {
        self.inner.emit_row(row)?;
        if let Some(ref pb) = self.pb {
            pb.inc(1);
        }
        Ok(())
    }

    fn last_row_emitted(&mut self) -> Result<(), ExecuteError> {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
        self.inner.last_row_emitted()
    }
}

fn cmd_describe(registry: &Registry, name: &str, json: bool, v: Verbosity) -> Result<()> {
    let meta = registry.get(name).ok_or_else(|| {
        anyhow!(
            "Unknown processor: '{}'. Use 'numbase list' to see processors.",
            name
        )
    })?;
    let desc = meta.describe();

    if json {
        let text = serde_json::to_string_pretty(&desc).context("Failed to serialize form")?;
        println!("{}", text);
        return Ok(());
    }

    v.info(&format!("{} ({})\n", desc.name, desc.label));
    v.info(meta.help());
    v.info("\nParameters:\n");
    for param in &desc.params {
        let default = param
            .default_value
            .as_deref()
            .map(|d| format!(" [default: {}]", d))
            .unwrap_or_default();
        v.info(&format!("  {:<16} {}{}", param.name, param.label, default));
        if let ParamKind::Select { ref choices } = param.kind {
            for (id, label) in choices {
                v.info(&format!("      {:<18} {}", id, label));
            }
        }
    }
    v.info(&format!("\nDocs: {}", meta.doc_page()));

    Ok(())
}

/// List presets.
fn cmd_presets(config: &Config, v: Verbosity) -> Result<()> {
    if config.presets.is_empty() {
        v.info("No presets defined.");
    } else {
        v.info("User-defined presets:\n");
        for (name, preset) in &config.presets {
            v.info(&format!("  {:<12} {}", name, preset.describe()));
        }
    }

    if let Some(ref mode) = config.defaults.mode {
        v.info(&format!("\nDefault mode: {}", mode));
    }

    if let Some(path) = Config::default_path() {
        v.info(&format!("\nConfig file: {}", path.display()));
    }

    Ok(())
}
