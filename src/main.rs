//! Onset CLI entry point.

use std::io::Read;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use onset::extraction::{age_in_years, evaluate, Relation};
use onset::{
    normalize_quotes, segment, Category, Config, DocumentAnnotation, Role, TemporalAnnotator,
};

/// Onset: temporal expression extraction for clinical text
#[derive(Parser, Debug)]
#[command(name = "onset")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Annotate a narrative text file (or stdin when no path is given)
    Annotate {
        /// Path to the text file to annotate
        path: Option<PathBuf>,
        /// Reference date for partial-date defaults (YYYY-MM-DD)
        #[arg(short, long)]
        reference_date: Option<NaiveDate>,
        /// Document id recorded in the output
        #[arg(short, long, default_value = "stdin")]
        document_id: String,
        /// Hide IGNORE-role spans (ages, frequencies)
        #[arg(long)]
        no_ignored: bool,
    },
    /// Evaluate a relative expression against a reference date
    Resolve {
        /// The relative expression ("3 days", "a year and a half")
        expression: String,
        /// Relation to the reference date
        #[arg(short = 'l', long, default_value = "after")]
        relation: String,
        /// Reference date (YYYY-MM-DD)
        #[arg(short, long)]
        reference: NaiveDate,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if args.json {
        config.output.json = true;
    }

    match args.command {
        Command::Annotate {
            path,
            reference_date,
            document_id,
            no_ignored,
        } => {
            let raw = match path {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let text = normalize_quotes(&raw);
            let sentences = segment(&text);

            let mut extraction = config.extraction.clone();
            if reference_date.is_some() {
                extraction.reference_date = reference_date;
            }
            let annotator = TemporalAnnotator::new(extraction);
            let mut annotation = annotator.annotate(&text, &sentences, &document_id);

            if no_ignored || !config.output.include_ignored {
                annotation.expressions.retain(|e| e.role != Role::Ignore);
            }

            if config.output.json {
                println!("{}", serde_json::to_string_pretty(&annotation)?);
            } else {
                print_table(&annotation);
            }
        }
        Command::Resolve {
            expression,
            relation,
            reference,
        } => {
            let relation = match relation.to_lowercase().as_str() {
                "before" => Relation::Before,
                "after" => Relation::After,
                _ => Relation::Other,
            };
            let result = evaluate(&expression, relation, reference);
            if config.output.json {
                println!("{}", serde_json::json!({ "date": result }));
            } else {
                println!("{result}");
            }
        }
    }

    Ok(())
}

/// Human-readable span table.
fn print_table(annotation: &DocumentAnnotation) {
    println!(
        "{} expression(s) in {} ({} dropped)",
        annotation.expressions.len(),
        annotation.document_id,
        annotation.metadata.dropped_spans
    );
    for expr in &annotation.expressions {
        let resolved = match (expr.resolution.date(), expr.resolution.partial()) {
            (Some(date), _) => date.to_string(),
            (None, Some(partial)) => format!(
                "partial y={} m={} d={}",
                partial.year.map_or("?".into(), |y| y.to_string()),
                partial.month.map_or("?".into(), |m| m.to_string()),
                partial.day.map_or("?".into(), |d| d.to_string()),
            ),
            (None, None) if expr.category == Category::Age => age_in_years(&expr.text)
                .map_or_else(|| "-".to_string(), |y| format!("age {y:.1}y")),
            (None, None) => "-".to_string(),
        };
        println!(
            "  [{:>4}..{:<4}] {:<5} {:>4.2} {:<24} {}",
            expr.start,
            expr.end,
            format!("{:?}", expr.category).to_uppercase(),
            expr.confidence,
            expr.text,
            resolved
        );
    }
}
