use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use thought_chain_reasoning::{
    config::{self, Config, LogFormat},
    driver::{ChainDriver, TreeRecorder},
    langbase::LangbaseClient,
    prompts::{ANSWER_SYSTEM_PROMPT, STEP_SYSTEM_PROMPT},
    verdict::{VerdictAnswer, VERDICT_OUTPUT_FORMAT},
    PipeGenerator,
};

/// Solve a problem by iterated chain-of-thought over Langbase Pipes.
#[derive(Debug, Parser)]
#[command(name = "thought-chain", version, about)]
struct Cli {
    /// Problem statement
    #[arg(long, conflicts_with = "problem_file", required_unless_present = "problem_file")]
    problem: Option<String>,

    /// Read the problem statement from a file
    #[arg(long)]
    problem_file: Option<PathBuf>,

    /// Output-format instruction for the final answer
    #[arg(long, default_value = VERDICT_OUTPUT_FORMAT)]
    output_format: String,

    /// Override MAX_DEPTH
    #[arg(long)]
    max_depth: Option<usize>,

    /// Write the recorded thought tree as JSON to this path
    #[arg(long)]
    tree_json: Option<PathBuf>,

    /// Print the recorded thought tree outline to stderr
    #[arg(long)]
    print_tree: bool,

    /// Do not create/update the Langbase pipes at startup
    #[arg(long)]
    skip_pipe_setup: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(max_depth) = cli.max_depth {
        config.driver.max_depth = max_depth;
    }
    let config = config::init_global(config)?;

    init_logging(config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        max_depth = config.driver.max_depth,
        "Thought chain starting"
    );

    let problem = match (&cli.problem, &cli.problem_file) {
        (Some(problem), _) => problem.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading problem file {}", path.display()))?,
        (None, None) => anyhow::bail!("either --problem or --problem-file is required"),
    };

    let langbase = match LangbaseClient::new(&config.langbase, config.request.clone()) {
        Ok(c) => {
            info!(base_url = %config.langbase.base_url, "Langbase client initialized");
            c
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize Langbase client");
            return Err(e.into());
        }
    };

    if !cli.skip_pipe_setup {
        info!("Ensuring required Langbase pipes exist...");
        langbase
            .ensure_pipe(
                &config.pipes.step,
                "Next chain-of-thought step",
                STEP_SYSTEM_PROMPT,
                &config.model,
            )
            .await?;
        langbase
            .ensure_pipe(
                &config.pipes.answer,
                "Final structured answer",
                ANSWER_SYSTEM_PROMPT,
                &config.model,
            )
            .await?;
    }

    let generator = PipeGenerator::new(langbase, config.pipes.clone());
    let driver = ChainDriver::new(generator.clone(), generator, config.driver);
    let mut recorder = TreeRecorder::new(&problem);

    let outcome = match driver
        .solve_with_observer::<VerdictAnswer, _>(&problem, &cli.output_format, &mut recorder)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Reasoning failed");
            return Err(e.into());
        }
    };

    let tree = recorder.into_tree();
    if cli.print_tree {
        eprintln!("{}", tree.render_outline());
    }
    if let Some(path) = &cli.tree_json {
        std::fs::write(path, tree.to_json()?)
            .with_context(|| format!("writing tree to {}", path.display()))?;
        info!(path = %path.display(), nodes = tree.len(), "Thought tree written");
    }

    info!(
        steps = outcome.step_calls,
        finished_naturally = outcome.finished_naturally,
        "Reasoning complete"
    );
    println!("{}", outcome.answer.solution);
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
