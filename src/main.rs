use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use copydesk::{
    write_run_json, ContentFetcher, FirecrawlClient, FirecrawlConfig, HumanReport, OpenAiClient,
    OpenAiConfig, PipelinePlan, PipelineRunner, RunRequest, SourceSpec, Sources,
};

#[derive(Parser)]
#[command(name = "copydesk")]
#[command(author, version, about = "Editorial and campaign drafting pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draft an editorial from one or two news article URLs
    Editorial {
        #[command(flatten)]
        args: RunArgs,

        /// Second article URL for cross-source synthesis
        #[arg(long)]
        secondary_url: Option<String>,
    },

    /// Draft a campaign idea from a company or product page URL
    Campaign {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Fetch one page and print its extracted markdown
    Scrape {
        /// Page URL
        #[arg(short, long)]
        url: String,

        /// Write the markdown to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the stage wiring of a pipeline without calling any service
    Plan {
        /// Which pipeline to describe
        #[arg(value_enum)]
        pipeline: PipelineKind,
    },
}

/// Arguments shared by the pipeline subcommands
#[derive(Debug, Args, Clone)]
struct RunArgs {
    /// Page URL to fetch and transform
    #[arg(short, long)]
    url: String,

    /// What the run should accomplish
    #[arg(long)]
    objective: String,

    /// Writing style to aim for
    #[arg(long)]
    style: Option<String>,

    /// Target audience
    #[arg(long)]
    audience: Option<String>,

    /// Goals to optimize for
    #[arg(long)]
    goals: Option<String>,

    /// Free-form extra instructions
    #[arg(long)]
    instructions: Option<String>,

    /// Completion model override
    #[arg(long)]
    model: Option<String>,

    /// Output file for the JSON run report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file for the human-readable report
    #[arg(long)]
    human_readable: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PipelineKind {
    Editorial,
    Campaign,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Editorial {
            args,
            secondary_url,
        } => {
            setup_logging(args.verbose);
            run_pipeline(PipelinePlan::editorial(), args, secondary_url).await
        }
        Commands::Campaign { args } => {
            setup_logging(args.verbose);
            run_pipeline(PipelinePlan::campaign(), args, None).await
        }
        Commands::Scrape {
            url,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            scrape_page(url, output).await
        }
        Commands::Plan { pipeline } => {
            show_plan(pipeline);
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run_pipeline(
    plan: PipelinePlan,
    args: RunArgs,
    secondary_url: Option<String>,
) -> Result<()> {
    let sources = match secondary_url {
        Some(second) => Sources::pair(
            SourceSpec::new("source-1", args.url),
            SourceSpec::new("source-2", second),
        ),
        None => Sources::single(SourceSpec::new("source-1", args.url)),
    };

    let mut request = RunRequest::new(args.objective, sources);
    if let Some(style) = args.style {
        request.aux.push("Style", style);
    }
    if let Some(audience) = args.audience {
        request.aux.push("Target Audience", audience);
    }
    if let Some(goals) = args.goals {
        request.aux.push("Goals", goals);
    }
    if let Some(instructions) = args.instructions {
        request.aux.push("Instructions", instructions);
    }

    let fetch_config = FirecrawlConfig::from_env()?;
    let mut llm_config = OpenAiConfig::from_env()?;
    if let Some(model) = args.model {
        llm_config.model = model;
    }

    let runner = PipelineRunner::new(
        FirecrawlClient::new(fetch_config),
        OpenAiClient::new(llm_config),
    );
    let run = runner.run(&plan, &request).await;

    info!(
        "Run {} {}: {} stage result(s)",
        run.run_id,
        run.status,
        run.stages.len()
    );

    if let Some(path) = &args.output {
        write_run_json(&run, path)?;
        info!("Run report written to {:?}", path);
    }
    if let Some(path) = &args.human_readable {
        HumanReport::new(&run).write_file(path)?;
        info!("Human-readable report written to {:?}", path);
    }

    if let Some(artifact) = &run.final_artifact {
        println!("{}", artifact);
    }
    if let Some(failure) = &run.failure {
        anyhow::bail!("run failed at {}: {}", failure.stage, failure.cause);
    }

    Ok(())
}

async fn scrape_page(url: String, output: Option<PathBuf>) -> Result<()> {
    let config = FirecrawlConfig::from_env()?;
    let client = FirecrawlClient::new(config);

    let source = SourceSpec::new("source-1", url);
    let document = client.fetch(&source).await?;

    if let Some(title) = &document.title {
        info!("Fetched \"{}\" ({} chars)", title, document.body.len());
    }

    match output {
        Some(path) => {
            std::fs::write(&path, &document.body)
                .with_context(|| format!("Failed to write file: {:?}", path))?;
            info!("Markdown written to {:?}", path);
        }
        None => println!("{}", document.body),
    }

    Ok(())
}

fn show_plan(kind: PipelineKind) {
    let plan = match kind {
        PipelineKind::Editorial => PipelinePlan::editorial(),
        PipelineKind::Campaign => PipelinePlan::campaign(),
    };

    println!("Pipeline: {}", plan.name());
    println!();

    for (i, stage) in plan.branch().iter().enumerate() {
        println!("{}. {} (per source)", i + 1, stage.name);
        println!("   role: {}", stage.role);
        if stage.reads_source {
            println!("   reads: source document");
        }
        if !stage.requires.is_empty() {
            println!("   requires: {}", stage.requires.join(", "));
        }
    }

    let synthesis = plan.synthesis();
    println!(
        "{}. {} (synthesis)",
        plan.branch().len() + 1,
        synthesis.name
    );
    println!("   role: {}", synthesis.role);
    println!("   requires: {}", synthesis.requires.join(", "));
}
