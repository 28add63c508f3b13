//! # seocrew-cli
//!
//! Operator command line for the content pipelines: list clients, preview the
//! rendered stage instructions for a request, or run one generation end to end
//! without the HTTP server.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use seocrew::{
    compose_stages,
    providers::{
        factory::create_ai_provider,
        search::serpapi::{SerpApiProvider, SERPAPI_DEFAULT_URL},
    },
    AiProviderConfig, ExecutablePipeline, GenerationRequest, PipelineExecutor, PipelineFactory,
    ProfileRegistry, SearchSettings, StageDefinition,
};
use std::{fs, path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory of extra client profiles layered over the built-in ones
    #[arg(long, global = true, env = "SEOCREW_PROFILES_DIR")]
    profiles_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every client and the routes it answers on
    Clients,
    /// Print the rendered stage instructions for a request without calling the model
    Render(RenderArgs),
    /// Run a client's full pipeline and print the final result as JSON
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Client slug or route (e.g. `villa_puppy` or `villa_puppy_backlink`)
    #[arg(long)]
    client: String,
    /// Article topic
    #[arg(long)]
    tema: String,
    /// Target SEO keyword
    #[arg(long)]
    palavra_chave: String,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long, env = "SERPAPI_API_KEY", hide_env_values = true)]
    serpapi_key: Option<String>,
    #[arg(long, env = "SERPAPI_API_URL", default_value = SERPAPI_DEFAULT_URL)]
    serpapi_url: String,
    #[arg(long, default_value = "pt-br")]
    language: String,
    #[arg(long, default_value = "br")]
    region: String,
    #[arg(long, default_value_t = 10)]
    result_count: u32,
}

impl SearchArgs {
    fn factory(&self) -> Result<PipelineFactory> {
        let provider = SerpApiProvider::new(self.serpapi_url.clone(), self.serpapi_key.clone())?;
        let settings = SearchSettings {
            language: self.language.clone(),
            region: self.region.clone(),
            result_count: self.result_count,
        };
        Ok(PipelineFactory::new(Arc::new(provider), settings))
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    request: RequestArgs,
    /// Print only this stage (e.g. `outline`, `link_insertion`)
    #[arg(long)]
    stage: Option<String>,
    /// Skip the competitor search and render with an empty digest
    #[arg(long)]
    offline: bool,
    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Args, Debug)]
struct AiArgs {
    #[arg(long = "ai-provider", env = "AI_PROVIDER", default_value = "local")]
    provider: String,
    #[arg(long = "ai-api-url", env = "AI_API_URL")]
    api_url: Option<String>,
    #[arg(long = "ai-api-key", env = "AI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long = "ai-model", env = "AI_MODEL")]
    model: Option<String>,
    #[arg(long, default_value_t = 0.4)]
    temperature: f32,
}

impl AiArgs {
    fn config(&self) -> AiProviderConfig {
        AiProviderConfig {
            provider: self.provider.clone(),
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            model_name: self.model.clone(),
            temperature: self.temperature,
            max_tokens: 8192,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    request: RequestArgs,
    #[command(flatten)]
    ai: AiArgs,
    #[command(flatten)]
    search: SearchArgs,
    /// Also write the result JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,
    /// Include the rendered stages and the stage transcript in the output
    #[arg(long)]
    debug: bool,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable.
    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let registry = load_registry(cli.profiles_dir.as_ref())?;

    match &cli.command {
        Commands::Clients => handle_clients(&registry),
        Commands::Render(args) => handle_render(&registry, args).await,
        Commands::Generate(args) => handle_generate(&registry, args).await,
    }
}

fn load_registry(profiles_dir: Option<&PathBuf>) -> Result<ProfileRegistry> {
    let registry = ProfileRegistry::builtin()?;
    match profiles_dir {
        Some(dir) => registry
            .with_directory(dir)
            .with_context(|| format!("loading profiles from {}", dir.display())),
        None => Ok(registry),
    }
}

// --- Command Handlers ---

fn handle_clients(registry: &ProfileRegistry) -> Result<()> {
    for profile in registry.profiles() {
        println!(
            "{:<14} {:<8} {}",
            profile.slug,
            format!("{:?}", profile.output).to_lowercase(),
            profile.routes().join(", ")
        );
    }
    Ok(())
}

async fn handle_render(registry: &ProfileRegistry, args: &RenderArgs) -> Result<()> {
    let profile = registry.resolve_route(&args.request.client)?;
    let request = GenerationRequest::new(&args.request.tema, &args.request.palavra_chave);

    let stages = if args.offline {
        compose_stages(&profile, &request, "", &[])
    } else {
        args.search.factory()?.build_pipeline(&profile, &request).await.stages
    };

    let selected: Vec<(usize, &StageDefinition)> = stages
        .iter()
        .enumerate()
        .filter(|(_, s)| args.stage.as_deref().map_or(true, |name| s.kind.as_str() == name))
        .collect();
    if selected.is_empty() {
        let names: Vec<&str> = stages.iter().map(|s| s.kind.as_str()).collect();
        return Err(anyhow!(
            "client '{}' has no stage named '{}' (stages: {})",
            profile.slug,
            args.stage.as_deref().unwrap_or_default(),
            names.join(", ")
        ));
    }

    for (i, stage) in selected {
        println!("=== {}. {} ({}) ===", i + 1, stage.kind, stage.role.role);
        println!("{}", stage.instruction);
        println!("\nResultado esperado: {}\n", stage.expected_output);
    }
    Ok(())
}

async fn handle_generate(registry: &ProfileRegistry, args: &GenerateArgs) -> Result<()> {
    let profile = registry.resolve_route(&args.request.client)?;
    let request = GenerationRequest::new(&args.request.tema, &args.request.palavra_chave);

    let ai_provider = create_ai_provider(&args.ai.config())?;
    let executor = PipelineExecutor::new(Arc::from(ai_provider));
    let pipeline: ExecutablePipeline = args.search.factory()?.build_pipeline(&profile, &request).await;

    info!(client = %profile.slug, stages = pipeline.stages.len(), "Running pipeline");
    let run = executor.run(&pipeline).await?;

    let output = if args.debug {
        serde_json::json!({
            "result": run.result,
            "debug": {
                "client": pipeline.client,
                "stages": pipeline.stages,
                "transcript": run.transcript,
                "external_links": pipeline.external_links,
            }
        })
    } else {
        serde_json::json!({ "result": run.result })
    };
    let rendered = serde_json::to_string_pretty(&output)?;

    if let Some(path) = &args.output {
        fs::write(path, &rendered).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Result written");
    }
    println!("{rendered}");
    Ok(())
}
