//! Card search example.
//!
//! Searches for cards, walks the lazily paginated result and looks up one
//! printing through the endpoint tree.
//!
//! Run with: cargo run --example search_cards -- "t:goblin c:r"

use scryfall_rs::{Args, Keyed, ScryfallClient};

#[tokio::main]
async fn main() -> scryfall_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "t:goblin c:r".to_string());

    let client = ScryfallClient::new()?;

    println!("Searching for '{}'...", query);
    let mut results = client.cards().search(&query).await?;
    println!("{} matching cards", results.lookup("total_cards")?);

    // Only the pages needed for the first 200 cards are fetched.
    let mut records = results.records();
    while let Some(card) = records.next().await {
        let card = card?;
        println!(
            "  - {} {}",
            card["name"].as_str().unwrap_or("?"),
            card["mana_cost"].as_str().unwrap_or("")
        );
        if records.position() >= 200 {
            break;
        }
    }
    println!("Fetched {} page(s)", results.pages_fetched());

    // The same request shapes through the endpoint tree
    let card = client
        .endpoint("cards.code")?
        .call(Args::new().arg("xln").arg(96).param("lang", "ja"))
        .await?;
    println!("\nxln #96 in Japanese: {}", card.lookup("printed_name")?);

    let rulings = client
        .endpoint("cards.code.rulings")?
        .call(Args::new().arg("xln").arg(96))
        .await?;
    println!("{} ruling(s)", rulings.lookup("len")?);

    Ok(())
}
