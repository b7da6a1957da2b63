use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use log::{LevelFilter, debug, error, info, warn};

use crate::config::{Config, EnsureOutcome};
use crate::db::Db;
use crate::fetcher::HttpFetcher;
use crate::logger::init_logger;
use crate::models::{RunOutput, Website};
use crate::pipeline::Crawler;

/// Placeholder id used when the website is not registered in a database.
const UNRESOLVED_WEBSITE_ID: i64 = 0;

pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub no_db: bool,
    pub print: bool,
    pub verbose: bool,
}

pub async fn run_crawler(opts: RunOptions) -> Result<()> {
    // 0) Initialize logger
    let console_level = if opts.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    init_logger(console_level)?;

    // 1) Load config
    let cfg = match &opts.config_path {
        Some(path) => Config::load(path)?,
        None => {
            let outcome: EnsureOutcome = Config::ensure_user_config()?;
            if outcome.created {
                warn!(
                    "Config file created at {}. Please edit it and restart the app.",
                    outcome.path.display()
                );
                return Ok(());
            }
            Config::get_user_config()?
        }
    };
    let settings = cfg.crawl_settings()?;
    debug!("Config loaded: {:?}", cfg);

    // 2) Crawl
    info!("Starting crawler...");
    let fetcher = HttpFetcher::new(cfg.user_agent.as_deref())?;
    let report = Crawler::new(fetcher, settings).run().await;
    if !report.warnings.is_empty() {
        warn!(
            "Run finished with {} warnings over {} discovered links",
            report.warnings.len(),
            report.links.len()
        );
    }

    let website = Website::new(cfg.listing_url(), report.site.as_ref(), Utc::now());
    debug!("Website data: {:?}", website);

    // 3) Resolve website identity and persist
    let mut db = match (&cfg.db_path, opts.no_db) {
        (_, true) => {
            info!("--no-db flag set, skipping persistence");
            None
        }
        (None, false) => {
            warn!("No db_path configured, skipping persistence");
            None
        }
        (Some(path), false) => Some(Db::open(path)?),
    };

    let website_id = match &db {
        Some(db) => db.get_or_create_website(&website)?,
        None => UNRESOLVED_WEBSITE_ID,
    };

    let results = report.into_envelopes(website_id);

    if let Some(db) = db.as_mut() {
        if results.is_empty() {
            debug!("Nothing to insert");
        } else {
            let run_id = db.create_run()?;
            match db.insert_articles(run_id, &results) {
                Ok(count) => info!("Data inserted into DB: {} articles for run {}", count, run_id),
                Err(e) => {
                    error!("DB insert failed: {:?}", e);
                    return Err(e);
                }
            }
        }
    }

    if opts.print {
        let output = RunOutput {
            website: &website,
            results: &results,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    info!("Crawler finished with {} articles.", results.len());
    Ok(())
}
