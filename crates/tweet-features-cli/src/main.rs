use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tweet_features::{
    input, FeatureExtractor, FeatureMatrix, FittedModel, PipelineConfig, ScalarFeatures,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "tweet-features")]
#[command(about = "Extract lexical, syntactic and scalar features from tweets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Show progress bars for long batches
    #[arg(long, global = true)]
    progress: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Fit vocabularies on a corpus, save the model and optionally write its feature matrix
    Fit {
        #[command(flatten)]
        input: InputArgs,

        /// Where to write the fitted model
        #[arg(short, long, value_name = "PATH")]
        model: PathBuf,

        /// Pipeline settings as JSON
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Transform texts with a previously fitted model
    Transform {
        #[command(flatten)]
        input: InputArgs,

        /// Fitted model written by `fit`
        #[arg(short, long, value_name = "PATH")]
        model: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the scalar features of one text as JSON
    Inspect {
        /// Text to analyze
        #[arg(value_name = "TEXT")]
        text: String,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Texts, one per line (reads stdin if omitted)
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Input is a JSON array of strings
    #[arg(long)]
    json: bool,

    /// Fail on a line that is not valid UTF-8 instead of replacing the bad bytes
    #[arg(long, conflicts_with = "json")]
    strict_utf8: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Where to write the feature matrix (stdout if omitted)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Skip writing the feature matrix
    #[arg(long)]
    no_matrix: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum OutputFormat {
    /// Header row of feature names, then one row per text
    Csv,
    /// `{"feature_names": [...], "rows": [[...]]}`
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Fit {
            input,
            model,
            config,
            output,
        } => {
            let mut config = match config {
                Some(path) => PipelineConfig::from_json_file(&path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?,
                None => PipelineConfig::default(),
            };
            config.show_progress |= cli.progress;
            let texts = read_texts(&input)?;

            let start = Instant::now();
            let mut extractor = FeatureExtractor::new(config)?;
            let matrix = extractor.fit_transform(&texts).context("Failed to fit features")?;
            let fitted = extractor.model().context("Extractor has no fitted model")?;
            info!(
                num_texts = texts.len(),
                num_features = matrix.num_features(),
                elapsed = ?start.elapsed(),
                "Fitted feature extractor"
            );

            std::fs::write(&model, fitted.to_bytes()?)
                .with_context(|| format!("Failed to write model: {}", model.display()))?;
            if !output.no_matrix {
                write_matrix(&matrix, &fitted.feature_names(), &output)?;
            }
        }
        Command::Transform {
            input,
            model,
            output,
        } => {
            let bytes = std::fs::read(&model)
                .with_context(|| format!("Failed to read model: {}", model.display()))?;
            let fitted = FittedModel::from_bytes(&bytes)
                .with_context(|| format!("Failed to load model: {}", model.display()))?;
            let names = fitted.feature_names();

            let config = PipelineConfig {
                show_progress: cli.progress,
                ..PipelineConfig::default()
            };
            let mut extractor = FeatureExtractor::new(config)?;
            extractor.load_model(fitted)?;

            let texts = read_texts(&input)?;
            let matrix = extractor.transform(&texts).context("Failed to transform texts")?;
            info!(num_texts = texts.len(), "Transformed texts");
            if !output.no_matrix {
                write_matrix(&matrix, &names, &output)?;
            }
        }
        Command::Inspect { text } => {
            let features = ScalarFeatures::extract(&text, &tweet_features::nlp::VaderAnalyzer::new())?;
            println!("{}", serde_json::to_string_pretty(&features)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_texts(args: &InputArgs) -> Result<Vec<String>> {
    let bytes = match &args.input {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read input: {}", path.display()))?,
        None => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read from stdin")?;
            buffer
        }
    };

    if args.json {
        let json = std::str::from_utf8(&bytes).context("JSON input is not valid UTF-8")?;
        Ok(input::texts_from_json(json).context("Failed to parse JSON array of texts")?)
    } else if args.strict_utf8 {
        Ok(input::texts_from_utf8_lines(&bytes).context("Input is not valid UTF-8")?)
    } else {
        Ok(input::texts_from_lines(&bytes))
    }
}

fn write_matrix(matrix: &FeatureMatrix, names: &[String], args: &OutputArgs) -> Result<()> {
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::io::BufWriter::new(create_file(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    match args.format {
        OutputFormat::Csv => write_csv(matrix, names, writer),
        OutputFormat::Json => write_json(matrix, names, writer),
    }
}

fn create_file(path: &Path) -> Result<std::fs::File> {
    std::fs::File::create(path).with_context(|| format!("Failed to create: {}", path.display()))
}

fn write_csv(matrix: &FeatureMatrix, names: &[String], writer: impl Write) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(names)?;
    for row in matrix.values().rows() {
        csv_writer.write_record(row.iter().map(f64::to_string))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_json(matrix: &FeatureMatrix, names: &[String], mut writer: impl Write) -> Result<()> {
    let rows = matrix
        .values()
        .rows()
        .into_iter()
        .map(|row| row.to_vec())
        .collect::<Vec<_>>();
    let json_output = serde_json::json!({
        "feature_names": names,
        "rows": rows,
    });
    serde_json::to_writer(&mut writer, &json_output)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
