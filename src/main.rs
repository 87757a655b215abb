use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planviz::loader::FileSystemMetadataProvider;
use planviz::{render, Config};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(
    name = "planviz",
    about = "Analyzes infrastructure-as-code execution plans and renders human-oriented change summaries.",
    version = APP_VERSION,
    disable_version_flag(true)
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long, short = 'c', value_name = "PATH", help = "Path to the configuration file")]
    pub config: Option<String>,

    #[arg(long, short = 'V', help = "Print version")]
    pub version: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "summary", about = "Summarize a Terraform JSON plan")]
    Summary {
        #[arg(value_name = "PLAN_JSON", help = "Path to the plan's JSON output")]
        plan_file: String,
    },
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    if cli.version {
        println!("{}", APP_VERSION);
        std::process::exit(0);
    }

    match &cli.command {
        Some(Commands::Summary { plan_file }) => {
            tracing::info!(plan_file = %plan_file, "summarizing plan");
            if let Err(err) = run_summary(plan_file, cli.config.as_deref()) {
                tracing::error!(error = %err, "failed to summarize plan");
                eprintln!("error: {}", err);
                std::process::exit(1);
            }
        }
        None => {
            println!("No command specified. Use --help for usage information.");
        }
    }
}

fn run_summary(plan_file: &str, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let raw = std::fs::read_to_string(plan_file)?;
    let plan: serde_json::Value = serde_json::from_str(&raw)?;

    let summary = planviz::generate_summary(&plan, plan_file, config.clone(), &FileSystemMetadataProvider)?;
    let document = planviz::plan::document::build(&summary, &config);

    print!("{}", render::render(&document));
    Ok(())
}

fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(Config::default()),
    }
}

fn init_logging() {
    let log_level = std::env::var("PLANVIZ_LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("planviz={}", filter).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
