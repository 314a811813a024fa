//! TAT CLI - Command-line interface
//!
//! Usage:
//!   tat analyze [--text <text> | --file <path>] [--entity-type <type>] [--json]
//!   tat report --format csv [--file <path>] [--output <path>]
//!   tat tags [--text <text> | --file <path>]
//!   tat temporal [--text <text> | --file <path>] [--reference-date YYYY-MM-DD]
//!   tat sample
//!
//! Input is read from standard input when neither `--text` nor `--file` is given.

mod output;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tat_core::config::AppConfig;
use tat_core::EntityType;
use tat_extractor::{
    Extractor, HeuristicParser, NoProgress, Pipeline, PosTagger, ProgressSink, ProgressUpdate, TemporalExtractor,
};
use tat_parser::FileLoader;
use tat_report::{Report, ReportFormat};
use tat_sample::SampleTextGenerator;

#[derive(Parser)]
#[command(name = "tat")]
#[command(about = "Heuristic text analysis: entities, relations, events, dates and POS tags")]
#[command(version)]
struct Cli {
    /// TOML config file; environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print every annotation
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Only list entities of this type (person, organization, place, date, value)
        #[arg(long)]
        entity_type: Option<EntityType>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Print stage progress to stderr
        #[arg(long)]
        progress: bool,
    },
    /// Analyze and export a report
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// json, csv or txt
        #[arg(long, default_value = "json")]
        format: ReportFormat,

        /// Write to this path; a directory gets the default report file name
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print part-of-speech tags
    Tags {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print temporal expressions
    Temporal {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print a sample paragraph to analyze
    Sample,
}

#[derive(Args)]
struct InputArgs {
    /// Text to analyze
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// .txt, .docx or .pdf file to analyze
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Resolve relative dates ("next month") against this day
    #[arg(long)]
    reference_date: Option<NaiveDate>,
}

impl InputArgs {
    async fn read(&self, loader: &FileLoader) -> anyhow::Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }

        if let Some(path) = &self.file {
            let doc = loader.load_file(path).await?;
            tracing::info!("Loaded {} words from {}", doc.word_count(), doc.file_name);
            return Ok(doc.content);
        }

        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        Ok(text)
    }

    fn parser(&self) -> HeuristicParser {
        match self.reference_date {
            Some(date) => HeuristicParser::new().with_reference_date(date),
            None => HeuristicParser::new(),
        }
    }
}

/// Prints stage progress to stderr
struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn update(&self, update: ProgressUpdate) {
        eprintln!("[{:>3}%] {}", update.percent, update.message);
    }
}

/// Resolve where a report is written
fn report_path(output: &Path, format: ReportFormat, date: NaiveDate) -> PathBuf {
    if output.is_dir() {
        output.join(format.file_name(date))
    } else {
        output.to_path_buf()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.as_str().into());
    if config.logging.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let loader = FileLoader::from_config(&config.upload);
    let window = config.analysis.context_window;

    match cli.command {
        Commands::Analyze {
            input,
            entity_type,
            json,
            progress,
        } => {
            let text = input.read(&loader).await?;
            let pipeline = Pipeline::from_config(Arc::new(input.parser()), &config.analysis);
            let sink: &dyn ProgressSink = if progress { &StderrProgress } else { &NoProgress };
            let analysis = pipeline.run(&text, sink)?;

            if json {
                let mut result = analysis.result;
                if let Some(entity_type) = entity_type {
                    result.entities.retain(|e| e.entity_type == entity_type);
                }
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", output::analysis(&analysis.result, entity_type));
            }
        }
        Commands::Report {
            input,
            format,
            output,
        } => {
            let text = input.read(&loader).await?;
            let pipeline = Pipeline::from_config(Arc::new(input.parser()), &config.analysis);
            let analysis = pipeline.run(&text, &NoProgress)?;
            let exported = Report::from_analysis(text, &analysis).export(format)?;

            match output {
                Some(path) => {
                    let path = report_path(&path, format, Utc::now().date_naive());
                    tokio::fs::write(&path, exported.body)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", exported.body),
            }
        }
        Commands::Tags { input } => {
            let text = input.read(&loader).await?;
            let tags = PosTagger::new()
                .with_context_window(window)
                .extract_text(&input.parser(), &text)?;
            print!("{}", output::tags(&tags));
        }
        Commands::Temporal { input } => {
            let text = input.read(&loader).await?;
            let expressions = TemporalExtractor::new()
                .with_context_window(window)
                .extract_from(&input.parser(), &text)?;
            print!("{}", output::temporal(&expressions));
        }
        Commands::Sample => {
            let sample = SampleTextGenerator::from_config(&config.llm)?
                .generate_or_builtin()
                .await;
            println!("{}", sample.text);
        }
    }

    Ok(())
}
