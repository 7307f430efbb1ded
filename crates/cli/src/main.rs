use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use semchunk_indexer::{BatchConfig, BatchOutput, BatchProcessor};
use std::fs;
use std::path::{Path, PathBuf};

mod report;

#[derive(Parser)]
#[command(name = "semchunk")]
#[command(about = "Split source files into semantic chunks for embedding", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML file with batch/chunker settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk the given files
    Chunk {
        /// Source files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Scan a directory (.gitignore aware) and chunk every supported file
    Scan {
        /// Project root
        #[arg(default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Print the batch output as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Files chunked at once (overrides SEMCHUNK_CONCURRENCY)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Skip files larger than this many bytes
    #[arg(long)]
    max_file_bytes: Option<u64>,

    /// Only chunk these languages (repeatable)
    #[arg(long = "language", value_name = "LANG")]
    languages: Vec<String>,

    /// Omit imports and details from chunk metadata
    #[arg(long)]
    minimal: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let base = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Chunk { paths, output } => {
            let processor = build_processor(base, &output)?;
            let result = processor.process_batch(&paths).await;
            emit(&result, output.json)
        }
        Commands::Scan { dir, output } => {
            let processor = build_processor(base, &output)?;
            let result = processor
                .process_directory(&dir)
                .await
                .with_context(|| format!("Failed to scan {}", dir.display()))?;
            emit(&result, output.json)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<BatchConfig> {
    let Some(path) = path else {
        return Ok(BatchConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: BatchConfig = toml::from_str(&raw)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn build_processor(mut config: BatchConfig, args: &OutputArgs) -> Result<BatchProcessor> {
    if args.minimal {
        config.chunker.include_imports = false;
        config.chunker.include_details = false;
    }
    if !args.languages.is_empty() {
        config.chunker.supported_languages = args.languages.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = Some(concurrency);
    }
    if let Some(max) = args.max_file_bytes {
        config.max_file_bytes = max;
    }

    BatchProcessor::new(config).context("Invalid configuration")
}

fn emit(output: &BatchOutput, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        eprint!("{}", report::render_summary(output));
    }
    Ok(())
}
