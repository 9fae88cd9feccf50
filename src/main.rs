use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use keygap::analysis::{AnalysisReport, AnalyzeRequest};
use keygap::config::Config;
use keygap::rewrite::{RewriteConstraints, RewriteRequest};

/// keygap: compare a base text with its competitors.
///
/// Ranks the keywords that matter in each text, measures how similar the
/// texts are, and lists the terms the base text leans on harder than the
/// others.
#[derive(Parser)]
#[command(name = "keygap", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze text files (the first file is text 0)
    Analyze {
        /// Text files to compare
        #[arg(required = true)]
        files: Vec<String>,

        #[command(flatten)]
        params: AnalysisArgs,

        /// Print the JSON response instead of tables
        #[arg(long)]
        json: bool,

        /// Also write a markdown report to this path
        #[arg(long)]
        report: Option<String>,
    },

    /// Analyze text files, then rewrite one of them around its keywords
    Rewrite {
        /// Text files to compare
        #[arg(required = true)]
        files: Vec<String>,

        /// Index of the text to rewrite
        #[arg(long, default_value = "0")]
        doc: usize,

        #[command(flatten)]
        params: AnalysisArgs,

        /// Approximate word limit for the rewrite
        #[arg(long)]
        word_limit: Option<u32>,

        /// Desired tone (e.g. "friendly")
        #[arg(long)]
        tone: Option<String>,

        /// Intended audience
        #[arg(long)]
        audience: Option<String>,
    },

    /// Run the JSON API server
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: KEYGAP_PORT or 8080)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (default: KEYGAP_BIND or 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Analysis knobs shared by `analyze` and `rewrite`.
#[derive(Args)]
struct AnalysisArgs {
    /// Top keywords per text (also the gap candidate pool)
    #[arg(long, default_value = "15")]
    top_n: i64,

    /// Index of the base text for gap analysis
    #[arg(long, default_value = "0")]
    gap_base: i64,

    /// Max gap entries per comparison
    #[arg(long, default_value = "10")]
    gap_top: i64,

    /// Smallest TF-IDF difference reported as a gap
    #[arg(long, default_value = "0.05")]
    gap_min_delta: f64,
}

impl AnalysisArgs {
    fn into_request(self, texts: Vec<String>) -> AnalyzeRequest {
        AnalyzeRequest {
            texts,
            top_n: self.top_n,
            gap_base: self.gap_base,
            gap_top: self.gap_top,
            gap_min_delta: self.gap_min_delta,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("keygap=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            files,
            params,
            json,
            report,
        } => {
            let config = Config::load()?;
            let texts = read_texts(&files)?;
            let analysis = run_analysis(&config, params.into_request(texts))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                keygap::output::terminal::display_report(&analysis, &files);
            }

            if let Some(path) = report {
                let written = keygap::output::markdown::generate_report(&analysis, &files, &path)?;
                println!("\n{}", format!("Markdown report saved to: {written}").bold());
            }
        }

        Commands::Rewrite {
            files,
            doc,
            params,
            word_limit,
            tone,
            audience,
        } => {
            let config = Config::load()?;
            config.require_rewrite()?;

            let texts = read_texts(&files)?;
            let text = texts
                .get(doc)
                .cloned()
                .with_context(|| format!("--doc {doc} is out of range for {} files", files.len()))?;

            // The keywords come from this run's report and are passed along
            // explicitly; nothing is cached between runs.
            let analysis = run_analysis(&config, params.into_request(texts))?;
            let constraints = RewriteConstraints {
                word_limit,
                tone,
                audience,
            };
            let request = RewriteRequest::from_report(&analysis, doc, text, constraints)
                .with_context(|| format!("No keywords computed for text {doc}"))?;

            println!(
                "Rewriting {} around: {}",
                files[doc].bold(),
                request.keywords.join(", ").dimmed()
            );

            let rewriter = config.create_rewriter();
            let result = rewriter.rewrite_request(&request).await?;

            println!("\n{}\n", "=== Rewritten text ===".bold());
            println!("{result}");
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            keygap::web::run_server(config, port, &bind).await?;
        }
    }

    Ok(())
}

/// Read every file as UTF-8 text, in argument order.
fn read_texts(files: &[String]) -> Result<Vec<String>> {
    files
        .iter()
        .map(|path| {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
        })
        .collect()
}

fn run_analysis(config: &Config, request: AnalyzeRequest) -> Result<AnalysisReport> {
    let service = config.analysis_service();
    let report = service.analyze(&request)?;
    info!(
        texts = report.document_count(),
        vocab_size = report.vocab_size,
        "Analysis complete"
    );
    Ok(report)
}
