//! # Live Selection Test
//!
//! Downloads the current server list from the provider API via lib_select
//! and prints the top picks for a location.

use anyhow::Result;
use clap::Parser;
use lib_select::loggers::setup_logging;
use lib_select::sources::{load_candidates, NordVpnSource, NORDVPN_API_URL};
use lib_select::{select, GeoPoint, SelectionConfig, DEFAULT_LOCATION};

#[derive(Parser, Debug)]
#[command(about = "Live server selection smoke test")]
struct Args {
    /// Reference location as "lat,lon".
    #[arg(short = 'g', long, allow_hyphen_values = true)]
    location: Option<GeoPoint>,

    /// Number of servers to show.
    #[arg(short = 'n', long, default_value_t = 5)]
    count: usize,

    /// Max load, percent.
    #[arg(short = 'l', long)]
    max_load: Option<u8>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging("test_live_select", log::LevelFilter::Info, None)?;

    // // Statement: Fetch the live catalog
    println!("[*] Requesting live server list from {}...", NORDVPN_API_URL);
    let source = NordVpnSource::new(NORDVPN_API_URL)?;
    let candidates = load_candidates(&source).await?;

    let mut config = SelectionConfig::new(args.location.unwrap_or(DEFAULT_LOCATION));
    config.max_load = args.max_load;
    config.result_count = args.count;
    config.validate()?;

    let result = select(&candidates, &config);
    if result.is_empty() {
        eprintln!("\n[ERROR] No server meets the selection criteria");
        std::process::exit(1);
    }

    println!("\n[SUCCESS] {} of {} candidates:", result.len(), candidates.len());
    println!("-----------------------------------------------");
    for r in &result {
        println!(
            "{:<28} load {:>3}%  {:>8.1} mi  {}",
            r.server.id,
            r.server.load.unwrap_or_default(),
            r.distance,
            r.server.name
        );
    }
    println!("-----------------------------------------------");

    Ok(())
}
