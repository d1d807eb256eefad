//! CLI command definitions for prism.
//!
//! The `debate` command runs a two-sided streaming debate from the
//! terminal; `lenses` commands inspect presets and generate custom lenses
//! with an LLM.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use crate::chat::HttpChatBackend;
use crate::config::PrismConfig;
use crate::debate::{
    event_channel, ContinuationPolicy, DebateCoordinator, DebateEvent, Side, SideConfigUpdate,
};
use crate::lenses::{InMemoryLensStore, LensAssistant, LensCatalog};
use crate::llm::OpenRouterClient;

/// Lens-augmented chat client with a two-sided AI debate engine.
#[derive(Parser)]
#[command(name = "prism")]
#[command(about = "Run two-sided AI debates with composable persona lenses")]
#[command(version)]
#[command(
    long_about = "prism sends one topic to two independently configured AI conversations in \
parallel and optionally cross-feeds each reply as the other side's next input.\n\nExample usage:\n  \
prism debate \"Is remote work good?\" --left-lenses devils-advocate --right-lenses valley-founder --auto-continue --max-rounds 3"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run a two-sided debate on a topic.
    Debate(DebateArgs),

    /// Inspect and generate lenses.
    Lenses(LensesArgs),
}

/// Arguments for the `debate` command.
#[derive(clap::Args)]
pub struct DebateArgs {
    /// The topic both sides debate.
    pub topic: String,

    /// Chat backend base URL.
    #[arg(long, env = "PRISM_API_BASE")]
    pub api_base: Option<String>,

    /// Comma-separated lens ids for the left side.
    #[arg(long, value_delimiter = ',')]
    pub left_lenses: Vec<String>,

    /// Comma-separated lens ids for the right side.
    #[arg(long, value_delimiter = ',')]
    pub right_lenses: Vec<String>,

    /// Display label for the left side.
    #[arg(long)]
    pub left_label: Option<String>,

    /// Display label for the right side.
    #[arg(long)]
    pub right_label: Option<String>,

    /// Cross-feed replies between the sides for additional rounds.
    #[arg(long)]
    pub auto_continue: bool,

    /// Round budget for auto-continue (1-10).
    #[arg(long, default_value_t = 3)]
    pub max_rounds: u32,

    /// Drive auto-continue to the full round budget in one run instead of
    /// one cross-fed round at a time.
    #[arg(long, requires = "auto_continue")]
    pub to_budget: bool,
}

/// Arguments for the `lenses` command group.
#[derive(clap::Args)]
pub struct LensesArgs {
    #[command(subcommand)]
    pub command: LensesSubcommand,
}

/// Lens management subcommands.
#[derive(clap::Subcommand)]
pub enum LensesSubcommand {
    /// List available lenses.
    List,

    /// Generate a custom lens from a natural-language description.
    ///
    /// Requires OPENROUTER_API_KEY.
    Generate(GenerateLensArgs),
}

/// Arguments for `lenses generate`.
#[derive(clap::Args)]
pub struct GenerateLensArgs {
    /// What the lens should embody, e.g. "a skeptical security auditor".
    pub description: String,

    /// Model to generate with. Overrides OPENROUTER_MODEL.
    #[arg(long)]
    pub model: Option<String>,

    /// Output the generated lens as JSON instead of formatted text.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parse CLI arguments and return the Cli struct.
///
/// This allows main.rs to access CLI arguments (like log_level) before
/// running commands.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Debate(args) => {
            run_debate_command(args).await?;
        }
        Commands::Lenses(args) => match args.command {
            LensesSubcommand::List => {
                run_lenses_list_command().await?;
            }
            LensesSubcommand::Generate(args) => {
                run_lenses_generate_command(args).await?;
            }
        },
    }
    Ok(())
}

// ============================================================================
// Debate Command Implementation
// ============================================================================

async fn run_debate_command(args: DebateArgs) -> anyhow::Result<()> {
    let mut config = PrismConfig::from_env()?;
    if let Some(api_base) = args.api_base {
        config = config.with_api_base(api_base);
    }
    config.validate()?;

    let continuation = if args.to_budget {
        ContinuationPolicy::ToBudget
    } else {
        ContinuationPolicy::SingleStep
    };

    let backend = Arc::new(HttpChatBackend::new(&config.api_base));
    let (events, mut rx) = event_channel();
    let coordinator = DebateCoordinator::builder(backend)
        .with_events(events)
        .with_continuation(continuation)
        .build();

    coordinator.update_side_config(
        Side::Left,
        SideConfigUpdate {
            label: args.left_label,
            lens_ids: Some(args.left_lenses),
        },
    );
    coordinator.update_side_config(
        Side::Right,
        SideConfigUpdate {
            label: args.right_label,
            lens_ids: Some(args.right_lenses),
        },
    );
    if args.auto_continue {
        coordinator.toggle_auto_continue();
    }
    coordinator.set_max_rounds(args.max_rounds);

    let left_label = coordinator.side_config(Side::Left).label;
    let right_label = coordinator.side_config(Side::Right).label;

    info!(api_base = %config.api_base, topic = %args.topic, "Starting debate");

    // Render lifecycle events while the debate runs.
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                DebateEvent::ExchangeStarted { round, .. } => {
                    println!("\n=== Round {} ===", round);
                }
                DebateEvent::SideCompleted { side, .. } => {
                    info!(side = %side, "Reply completed");
                }
                DebateEvent::StreamNotice { side, message, .. } => {
                    warn!(side = %side, message = %message, "Stream notice");
                }
                DebateEvent::SideFailed { side, message, .. } => {
                    warn!(side = %side, message = %message, "Side failed");
                }
                _ => {}
            }
        }
    });

    coordinator.send_debate_message(&args.topic).await;
    let state = coordinator.state();
    coordinator.close();
    drop(coordinator);
    printer.await?;

    for (label, side) in [(&left_label, &state.left), (&right_label, &state.right)] {
        println!("\n--- {} ---", label);
        for message in &side.messages {
            println!("[{:?}] {}\n", message.role, message.content);
        }
    }

    Ok(())
}

// ============================================================================
// Lenses Command Implementation
// ============================================================================

async fn run_lenses_list_command() -> anyhow::Result<()> {
    let store = InMemoryLensStore::new();
    let lenses = store.list_all().await?;

    println!("Available lenses:\n");
    for lens in lenses {
        println!("  {:<22} {}", lens.id(), lens.name());
        println!("  {:<22} {}\n", "", lens.description());
    }
    Ok(())
}

async fn run_lenses_generate_command(args: GenerateLensArgs) -> anyhow::Result<()> {
    let client = match args.model {
        Some(model) => {
            let api_key = std::env::var("OPENROUTER_API_KEY")
                .map_err(|_| crate::LlmError::MissingApiKey)?;
            OpenRouterClient::with_model(api_key, model)
        }
        None => OpenRouterClient::from_env()?,
    };
    info!(api_key = %client.api_key_masked(), model = %client.default_model(), "Generating lens");

    let assistant = LensAssistant::new(Arc::new(client));
    let generated = assistant.generate_from_description(&args.description).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&generated)?);
    } else {
        println!("Name:        {}", generated.name);
        println!("Description: {}", generated.description);
        println!("Prompt:\n{}", generated.prompt);
    }
    Ok(())
}
