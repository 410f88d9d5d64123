use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub mod error;
pub mod feed;
pub mod locate;
pub mod normalize;
pub mod output;
pub mod xml;

pub use error::{Error, Result};
pub use locate::Lookup;
pub use output::Record;

pub const SNB_RSS_URL: &str = "https://www.snb.ch/public/en/rss/interestRates";
pub const TARGET_RATE_NAME: &str = "SARH";
pub const DEFAULT_OUT_PATH: &str = "public/result.json";
const USER_AGENT: &str = "github-actions-xml-parser/1.0";
const ACCEPT: &str = "application/xml,text/xml,application/rss+xml,*/*";

/// Fetch the latest SARH rate from the Swiss National Bank interest rate feed and write it as JSON.
///
/// Intended to run unattended from a scheduled job. Any failure exits non-zero and leaves an
/// existing output file untouched.
#[derive(Parser)]
#[command(version)]
pub struct Cli {
    /// Output file (parent directories are created as needed)
    #[arg(long = "out", env = "OUT_PATH", default_value = DEFAULT_OUT_PATH, value_name = "PATH")]
    pub out_path: PathBuf,
    /// RSS feed to read
    #[arg(long, env = "FEED_URL", default_value = SNB_RSS_URL)]
    pub url: String,
    /// Rate series to extract
    #[arg(long, env = "RATE_NAME", default_value = TARGET_RATE_NAME)]
    pub rate_name: String,
    /// Where the value is read from in the matched entry
    #[arg(long, value_enum, default_value_t = Lookup::Observation)]
    pub lookup: Lookup,
    /// HTTP timeout, in seconds
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    pub timeout: u64,

    /// Print the record to stdout instead of writing the output file
    #[clap(long)]
    pub stdout: bool,
}

/// Settings for one run, fixed at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: String,
    pub rate_name: String,
    pub out_path: PathBuf,
    pub timeout: Duration,
    pub user_agent: String,
    pub accept: String,
    pub lookup: Lookup,
    pub stdout: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: SNB_RSS_URL.to_string(),
            rate_name: TARGET_RATE_NAME.to_string(),
            out_path: PathBuf::from(DEFAULT_OUT_PATH),
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_string(),
            accept: ACCEPT.to_string(),
            lookup: Lookup::default(),
            stdout: false,
        }
    }
}

impl From<Cli> for Config {
    fn from(args: Cli) -> Self {
        Self {
            feed_url: args.url,
            rate_name: args.rate_name,
            out_path: args.out_path,
            timeout: Duration::from_secs(args.timeout),
            lookup: args.lookup,
            stdout: args.stdout,
            ..Self::default()
        }
    }
}

/// Fetch the feed and emit the record for the configured rate.
pub fn run(config: &Config) -> Result<Record> {
    let xml = feed::fetch(config)?;
    run_with_feed(config, &xml)
}

/// Everything after the download. Nothing is written unless every step succeeds.
pub fn run_with_feed(config: &Config, xml: &[u8]) -> Result<Record> {
    let record = process(config, xml)?;
    if config.stdout {
        println!("{}", record.to_json()?);
    } else {
        record.write(&config.out_path)?;
    }
    Ok(record)
}

/// Turn a raw feed document into a record, without touching the filesystem.
pub fn process(config: &Config, xml: &[u8]) -> Result<Record> {
    let root = xml::Element::parse(xml)?;
    let matched = locate::locate(&root, &config.rate_name, config.lookup)?;
    let fields = matched.fields()?;
    tracing::debug!(date = fields.date, value = fields.value, "matched {}", config.rate_name);

    let date = normalize::normalize_date(fields.date)?;
    let value = normalize::normalize_value(fields.value)?;
    Ok(Record::new(&config.feed_url, &config.rate_name, date, value))
}
