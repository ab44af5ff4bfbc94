mod episode;
mod error;
mod feed;
mod http;
mod scrape;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use respcache::ResponseCache;
use tracing::{error, info, warn};

use error::Error;
use feed::{DEFAULT_BASE_URL, DEFAULT_PAGE_URL, FeedConfig, FeedDocument};
use http::PageFetcher;
use scrape::{ExtractionRules, Listing};

/// Turn a podcast episode listing page into an RSS feed
#[derive(Parser)]
struct Args {
    /// Listing page to scrape
    #[arg(long, default_value = DEFAULT_PAGE_URL)]
    url: String,
    /// Prefix joined with each episode link to form item ids
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Where to write the feed
    #[arg(short, long, default_value = "feed/pg.rss")]
    output: PathBuf,
    /// Always hit the network
    #[arg(long)]
    no_cache: bool,
    /// Ignore cached pages older than this many seconds
    #[arg(long, value_parser = parse_max_age)]
    cache_max_age: Option<chrono::Duration>,
}

fn parse_max_age(raw: &str) -> Result<chrono::Duration, String> {
    let seconds: i64 = raw.parse().map_err(|e| format!("{e}"))?;
    if seconds < 0 {
        return Err("must not be negative".to_string());
    }
    chrono::Duration::try_seconds(seconds).ok_or_else(|| format!("{seconds} seconds is out of range"))
}

struct Config {
    page_url: String,
    output: PathBuf,
    cache_dir: Option<PathBuf>,
    cache_max_age: Option<chrono::Duration>,
    feed: FeedConfig,
}

impl Config {
    fn from_args(args: Args) -> Self {
        Self {
            page_url: args.url,
            output: args.output,
            cache_dir: (!args.no_cache).then(cache_dir),
            cache_max_age: args.cache_max_age,
            feed: FeedConfig {
                base_url: args.base_url,
                ..FeedConfig::default()
            },
        }
    }
}

fn cache_dir() -> PathBuf {
    std::env::var("PODSCRAPE_CACHE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("pg_cache"))
}

fn open_cache(config: &Config) -> Option<ResponseCache> {
    let dir = config.cache_dir.as_ref()?;
    match ResponseCache::open(dir) {
        Ok(cache) => Some(match config.cache_max_age {
            Some(max_age) => cache.with_max_age(max_age),
            None => cache,
        }),
        Err(e) => {
            warn!("response cache disabled: {e:#}");
            None
        }
    }
}

fn run(config: &Config, fetcher: &PageFetcher) -> Result<usize, Error> {
    let page = fetcher.fetch_ok(&config.page_url)?;
    info!("Listing page retrieved.");

    let rules = ExtractionRules::compile()?;
    let listing = Listing::parse(&page.body);
    let mut feed = FeedDocument::new(config.feed.clone());
    info!("Base feed created.");

    for record in listing.episodes(&rules) {
        feed.append_item(record?);
    }
    let count = feed.entries().len();
    info!(count, "Episodes added to feed.");

    feed::rss::write(&feed, &config.output)?;
    info!(path = %config.output.display(), "Feed written to disk.");
    Ok(count)
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let config = Config::from_args(Args::parse());

    let client = match http::http_client() {
        Ok(client) => client,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    let fetcher = PageFetcher::new(client, open_cache(&config));

    match run(&config, &fetcher) {
        Ok(_) => ExitCode::SUCCESS,
        Err(Error::Fetch(e)) => {
            error!("Listing page download failed: {}", e.report());
            ExitCode::from(1)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(2)
        }
    }
}
