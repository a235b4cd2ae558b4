use std::path::PathBuf;
use clap::Parser;
use volley_standings::*;

#[derive(Parser)]
#[command(version, about = "Pool standings of a volleyball competition")]
struct Args {
    /// Match feed (JSON array, or object keyed by match id)
    matches: PathBuf,
    /// Local copy of the feed: refreshed after every successful read, used when the feed can't be read
    #[arg(long)]
    cache: Option<PathBuf>,
    /// Registered teams with their pool, logo and display name
    #[arg(long)]
    teams: Option<PathBuf>,
    /// Compute standings for this category only (repeatable, kept in the given order)
    #[arg(long = "category")]
    categories: Vec<String>,
    /// One set of standings per category found in the feed
    #[arg(long, conflicts_with = "categories")]
    by_category: bool,
    /// Pool for teams that aren't assigned to one
    #[arg(long)]
    fallback_pool: Option<String>,
    #[arg(long)]
    csv: Option<PathBuf>,
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let matches = match &args.cache {
        Some(cache) => load_with_fallback(&args.matches, cache)?,
        None => load_matches(&args.matches)?,
    };
    let directory = match &args.teams {
        Some(path) => load_team_directory(path)?,
        None => TeamDirectory::default(),
    };

    let mut ranking_context = RankingContext::default();
    if let Some(pool) = args.fallback_pool {
        ranking_context.fallback_pool = pool;
    }
    if args.by_category {
        ranking_context.categories = Some(discover_categories(&matches, &ranking_context));
    } else if !args.categories.is_empty() {
        ranking_context.categories = Some(args.categories);
    }

    let standings = compute(&matches, &directory, &ranking_context);

    output_report(&standings)?;
    if let Some(path) = &args.csv {
        write_csv(path, &standings)?;
    }
    if let Some(path) = &args.json {
        write_json(path, &standings)?;
    }

    Ok(())
}
