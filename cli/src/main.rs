use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use openapi_mock_core::{MockGenerator, OperationMock};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

mod loader;

#[derive(Parser)]
#[command(name = "openapi-mock")]
#[command(about = "Resolve OpenAPI schemas into faker mock expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single schema by JSON pointer
    Resolve {
        /// Input OpenAPI document (JSON or YAML)
        input: PathBuf,

        /// JSON pointer of the schema, e.g. `#/components/schemas/Pet`
        #[arg(short, long)]
        pointer: String,

        /// Name of the resolved node (defaults to the definition name)
        #[arg(long, default_value = "")]
        name: String,

        /// Resolve within the override scope of this operation
        #[arg(long, default_value = "")]
        operation_id: String,

        /// Resolve within the override scope of these tags
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Mock options file (JSON or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Resolve every successful JSON response body of every operation
    ///
    /// Responses that fail to resolve are logged and left out.
    Operations {
        /// Input OpenAPI document (JSON or YAML)
        input: PathBuf,

        /// Mock options file (JSON or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
    /// Only the rendered faker expression
    Expression,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the output
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            input,
            pointer,
            name,
            operation_id,
            tags,
            config,
            output,
            format,
        } => {
            let generator = build_generator(&input, config)?;
            let mock = generator
                .resolve_pointer_for(&operation_id, &pointer, &name, &tags)
                .map_err(|e| anyhow::Error::from(e).context("Resolution failed"))?;

            match format {
                OutputFormat::Expression => {
                    write_text(&mock.definition.value.render(), output.as_ref())?
                }
                _ => write_json(&mock, output.as_ref(), format)?,
            }
        }
        Commands::Operations {
            input,
            config,
            output,
            format,
        } => {
            let generator = build_generator(&input, config)?;
            let (mocks, failures) = generator.partial_operation_mocks();
            for failure in &failures {
                tracing::warn!(
                    operation_id = %failure.operation_id,
                    method = %failure.method,
                    route = %failure.route,
                    status = %failure.status,
                    error = %failure.error,
                    "skipping response that failed to resolve"
                );
            }

            match format {
                OutputFormat::Expression => write_text(&render_operations(&mocks), output.as_ref())?,
                _ => write_json(&mocks, output.as_ref(), format)?,
            }
        }
    }

    Ok(())
}

fn build_generator(input: &Path, config: Option<PathBuf>) -> Result<MockGenerator> {
    let options = loader::load_options(config.as_deref())?;
    let (specs, root) = loader::load_specs(input)?;
    tracing::debug!(root = %root, documents = specs.keys().count(), "loaded specification");

    MockGenerator::new(specs, root, &options)
        .map_err(|e| anyhow::Error::from(e).context("Invalid mock options"))
}

/// One `operationId status expression` line per response.
fn render_operations(mocks: &[OperationMock]) -> String {
    mocks
        .iter()
        .map(|mock| {
            format!(
                "{} {} {}",
                mock.operation_id,
                mock.status,
                mock.definition.value.render()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    })
}

fn write_text(text: &str, path: Option<&PathBuf>) -> Result<()> {
    let mut writer = open_output(path)?;
    writeln!(writer, "{text}").context("Failed to write output")?;
    writer.flush().context("Failed to flush output")
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer = open_output(path)?;

    match format {
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
        _ => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")
}
