//! StorePilot CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Write default config and seed the knowledge base
//! - `chat`: Grounded customer-service reply
//! - `copy`: Platform marketing copy
//! - `forecast`: Short-horizon sales forecast
//! - `image`: Product photograph synthesis
//! - `kb`: Knowledge base management
//! - `facts`: Fact row import
//! - `doctor`: Diagnose setup and endpoint health

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use storepilot_core::intent::{AspectRatio, Lighting, Platform, SceneStyle, Strategy};

mod commands;

use commands::ProductArgs;
use commands::forecast::ForecastArgs;

#[derive(Parser)]
#[command(
    name = "storepilot",
    about = "StorePilot — grounded AI assistance for e-commerce operators",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and seed the knowledge base
    Onboard,

    /// Answer a customer question grounded in the knowledge base
    Chat {
        /// The customer's question, as asked
        question: String,

        #[command(flatten)]
        product: ProductArgs,
    },

    /// Generate marketing copy for a platform
    Copy {
        /// xiaohongshu, douyin, taobao, or jd
        #[arg(short, long)]
        platform: Platform,

        /// pain_point, scenario, promotion, or premium
        #[arg(short, long)]
        strategy: Strategy,

        #[command(flatten)]
        product: ProductArgs,

        /// Additional parameter, repeatable: --param audience=students
        #[arg(long = "param", value_parser = commands::parse_key_value)]
        params: Vec<(String, String)>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forecast sales for a product from imported facts
    Forecast {
        /// Product identifier as it appears in the fact rows
        identifier: String,

        /// Model / spec string
        #[arg(long)]
        spec: Option<String>,

        /// Free-text external factors (promotions, holidays, weather)
        #[arg(long)]
        factors: Option<String>,

        /// Days to forecast (defaults to forecast.horizon_days)
        #[arg(long)]
        horizon: Option<u32>,

        /// First day of history, YYYY-MM-DD
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of history, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        end: Option<NaiveDate>,

        #[command(flatten)]
        product: ProductArgs,

        /// Additional parameter, repeatable: --param channel=livestream
        #[arg(long = "param", value_parser = commands::parse_key_value)]
        params: Vec<(String, String)>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Synthesize a product photograph
    Image {
        /// studio, lifestyle, outdoor, or minimalist
        #[arg(long, default_value = "studio")]
        scene: SceneStyle,

        /// soft, natural, dramatic, or golden_hour
        #[arg(long, default_value = "soft")]
        lighting: Lighting,

        /// 1:1, 3:4, 4:3, 9:16, or 16:9
        #[arg(long, default_value = "1:1")]
        aspect_ratio: AspectRatio,

        /// Free-text detail overrides
        #[arg(long)]
        details: Option<String>,

        #[command(flatten)]
        product: ProductArgs,
    },

    /// Manage the knowledge base
    Kb {
        #[command(subcommand)]
        command: KbCommands,
    },

    /// Manage historical fact rows
    Facts {
        #[command(subcommand)]
        command: FactsCommands,
    },

    /// Diagnose setup and endpoint health
    Doctor,
}

#[derive(Subcommand)]
enum KbCommands {
    /// List all entries
    List,

    /// Add an entry
    Add {
        /// Trigger text matched against customer questions
        #[arg(short, long)]
        question: String,

        #[arg(short, long)]
        answer: String,

        #[arg(short, long)]
        category: Option<String>,
    },

    /// Replace fields of an existing entry
    Edit {
        id: String,

        #[arg(short, long)]
        question: Option<String>,

        #[arg(short, long)]
        answer: Option<String>,

        #[arg(short, long)]
        category: Option<String>,
    },

    /// Remove an entry
    Remove { id: String },
}

#[derive(Subcommand)]
enum FactsCommands {
    /// Append rows from a JSON array or JSON-lines file
    Import { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat { question, product } => commands::chat::run(question, product).await?,
        Commands::Copy {
            platform,
            strategy,
            product,
            params,
            json,
        } => commands::copy::run(platform, strategy, product, params, json).await?,
        Commands::Forecast {
            identifier,
            spec,
            factors,
            horizon,
            start,
            end,
            product,
            params,
            json,
        } => {
            commands::forecast::run(ForecastArgs {
                identifier,
                spec,
                factors,
                horizon,
                start,
                end,
                product,
                params,
                json,
            })
            .await?
        }
        Commands::Image {
            scene,
            lighting,
            aspect_ratio,
            details,
            product,
        } => commands::image::run(scene, lighting, aspect_ratio, details, product).await?,
        Commands::Kb { command } => match command {
            KbCommands::List => commands::kb::list().await?,
            KbCommands::Add {
                question,
                answer,
                category,
            } => commands::kb::add(question, answer, category).await?,
            KbCommands::Edit {
                id,
                question,
                answer,
                category,
            } => commands::kb::edit(id, question, answer, category).await?,
            KbCommands::Remove { id } => commands::kb::remove(id).await?,
        },
        Commands::Facts { command } => match command {
            FactsCommands::Import { path } => commands::facts::import(path).await?,
        },
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
