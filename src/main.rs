use std::env;

use log::debug;

use tablefeed::{load_explore, load_feed, ClientConfig, Services};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ClientConfig::load().unwrap_or_default();
    let services = Services::from_config(&config);

    let args: Vec<String> = env::args().collect();
    let records = match args.get(1).map(String::as_str) {
        Some("feed") => load_feed(&services).await?,
        _ => load_explore(&services).await?,
    };
    debug!("{} records after hydration", records.len());

    for record in records {
        println!(
            "{:>6}  {:<40} by {:<20} ♥ {}",
            record.id.to_string(),
            record.name.as_deref().unwrap_or("(untitled)"),
            record.author_name,
            record.like_count
        );
    }

    Ok(())
}
