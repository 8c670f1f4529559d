//! Bulk data download example.
//!
//! Lists the available bulk exports and downloads one of them.
//!
//! Run with: cargo run --example bulk_download -- oracle_cards ./data

use std::path::PathBuf;

use scryfall_rs::{ScryfallClient, Settings, SharedSettings};

#[tokio::main]
async fn main() -> scryfall_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let kind = args.next().unwrap_or_else(|| "oracle_cards".to_string());
    let dir = args.next().map(PathBuf::from);

    // Larger chunks for multi-hundred-megabyte files
    let settings = Settings::from_env()?.with_chunk_size(1 << 20);
    let client = ScryfallClient::with_settings(SharedSettings::new(settings))?;

    let mut available = client.bulk_data().list().await?;
    available.load().await?;
    println!("Available bulk exports:");
    for item in available.buffered() {
        println!(
            "  - {} ({} bytes)",
            item["type"].as_str().unwrap_or("?"),
            item["size"]
        );
    }

    let item = client.bulk_data().by_type(&kind).await?;
    println!("\nDownloading {}...", item.get("download_uri")?);

    let path = client
        .bulk_data()
        .download_to_dir(&item, dir.as_deref())
        .await?;
    println!("Saved to {}", path.display());

    Ok(())
}
