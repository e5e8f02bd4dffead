use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use cogtask_analyzer::app::analyze_use_case::AnalyzeUseCase;
use cogtask_analyzer::config::{AnalyzerConfig, OutputFormat};
use cogtask_analyzer::constants;
use cogtask_analyzer::logging;
use cogtask_analyzer::pipeline::processing::filename::parse_filename;
use cogtask_analyzer::pipeline::Report;
use cogtask_analyzer::types::{BatchInput, Severity, SourceFile, TaskKind};

#[derive(Parser)]
#[command(name = "cogtask_analyzer")]
#[command(about = "Batch analyzer for visual-search and Stroop task output files")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to ./analyzer.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a batch of task output files
    Analyze {
        /// Task to analyze. Available: visual_search, stroop
        #[arg(long)]
        task: String,
        /// Zip archive with further files (folders allowed)
        #[arg(long)]
        archive: Option<PathBuf>,
        /// Directory for the exported report
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Output formats (xlsx, json); repeatable
        #[arg(long = "format")]
        formats: Vec<String>,
        /// Loose CSV/XLSX files
        files: Vec<PathBuf>,
    },
    /// List supported task names
    Tasks,
    /// Show the metadata extracted from file names
    ParseName {
        #[arg(long)]
        task: String,
        names: Vec<String>,
    },
}

fn resolve_task(name: &str) -> anyhow::Result<TaskKind> {
    TaskKind::from_name(name).with_context(|| {
        format!(
            "Unknown task '{}'. Available: {}",
            name,
            constants::get_supported_tasks().join(", ")
        )
    })
}

fn print_summary(report: &Report) {
    println!("\n📊 Summary ({} groups):", report.groups.len());
    println!("   {}", report.summary.columns.join(" | "));
    for row in &report.summary.rows {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        println!("   {}", cells.join(" | "));
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AnalyzerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = logging::init_logging(&config.logging);

    match cli.command {
        Commands::Tasks => {
            for task in constants::get_supported_tasks() {
                println!("{task}");
            }
        }
        Commands::ParseName { task, names } => {
            let task = resolve_task(&task)?;
            for name in names {
                match parse_filename(&name, task) {
                    Ok(meta) => println!(
                        "{name}: participant={} condition={} time={}",
                        meta.participant, meta.condition, meta.time
                    ),
                    Err(e) => println!("{name}: {e}"),
                }
            }
        }
        Commands::Analyze {
            task,
            archive,
            output_dir,
            formats,
            files,
        } => {
            let task = resolve_task(&task)?;
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            if !formats.is_empty() {
                config.output.formats = formats
                    .iter()
                    .map(|f| OutputFormat::from_name(f).with_context(|| format!("Unknown format '{f}'")))
                    .collect::<anyhow::Result<Vec<_>>>()?;
            }

            let mut batch = BatchInput::default();
            for path in &files {
                let source = SourceFile::from_path(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                batch.files.push(source);
            }
            if let Some(path) = &archive {
                let source = SourceFile::from_path(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                batch.archive = Some(source);
            }

            info!("🚀 Analyzing {} batch", task);
            let use_case = AnalyzeUseCase::from_config(&config, task);
            let result = use_case.run(task, batch);

            for diagnostic in &result.outcome.diagnostics {
                let icon = match diagnostic.severity {
                    Severity::Info => "ℹ️ ",
                    Severity::Warning => "⚠️ ",
                    Severity::Error => "❌",
                };
                println!("{icon} {diagnostic}");
            }

            match &result.outcome.report {
                Some(report) => {
                    print_summary(report);
                    for path in &result.written {
                        println!("💾 Saved report to {}", path.display());
                    }
                }
                None => {
                    warn!("No report produced");
                    println!("No report produced; upload .csv/.xlsx files or a zip containing them.");
                }
            }
        }
    }
    Ok(())
}
