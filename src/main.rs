use anyhow::Context;
use base64::Engine;
use clap::Parser;
use visual_matcher::application::match_products::MatchQuery;
use visual_matcher::cli::commands::{Cli, Commands, MatchSource};
use visual_matcher::settings::Settings;
use visual_matcher::telemetry::init_tracing;
use visual_matcher::VisualMatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&settings.log_level, settings.log_json);

    if let Commands::Serve { port: Some(port) } = &cli.command {
        settings.port = *port;
    }

    let matcher = VisualMatcher::new(&settings).context("initializing visual-matcher")?;
    run_command(&settings, matcher, cli.command).await
}

async fn run_command(
    settings: &Settings,
    matcher: VisualMatcher,
    cmd: Commands,
) -> anyhow::Result<()> {
    match cmd {
        Commands::Serve { .. } => {
            visual_matcher::server::serve(settings, matcher).await?;
        }
        Commands::Match {
            source,
            min_similarity,
        } => {
            let mut query = match_query(source)?;
            query.min_similarity = min_similarity;
            let results = matcher.match_query(query).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Products { limit } => {
            let products = matcher.products(limit);
            println!("{}", serde_json::to_string_pretty(&products)?);
        }
        Commands::Stats => {
            let stats = matcher.stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}

fn match_query(source: MatchSource) -> anyhow::Result<MatchQuery> {
    if let Some(path) = source.image_file {
        let bytes =
            std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        return Ok(MatchQuery::inline(encoded));
    }
    if let Some(url) = source.image_url {
        return Ok(MatchQuery::url(url));
    }
    if let Some(text) = source.text {
        return Ok(MatchQuery::text(text));
    }
    anyhow::bail!("one of --image-file, --image-url or --text is required")
}
