//! Fetch and print the dashboard statistics.

use dotenv::dotenv;
use house_keeper_rust::HouseKeeper;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let url = env::var("HOUSE_KEEPER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let username = env::var("HOUSE_KEEPER_USER").unwrap_or_else(|_| "demo".to_string());
    let password = env::var("HOUSE_KEEPER_PASSWORD").unwrap_or_else(|_| "demo-password".to_string());

    let client = HouseKeeper::new(&url)?;

    let health = client.health_check().await?;
    println!("backend health: {}", health.status);

    client.auth().login(&username, &password).await?;

    let stats = client.stats().dashboard().await?;
    println!("items:              {}", stats.counts.items);
    println!("locations:          {}", stats.counts.locations);
    println!("due reminders:      {}", stats.counts.due_reminders);
    println!("upcoming reminders: {}", stats.counts.upcoming_reminders);

    println!("\nitems by category:");
    for category in &stats.category_distribution {
        println!("  {:<16} {}", category.name, category.value);
    }

    println!("\nbusiest locations:");
    for location in client.stats().popular_locations(Some(5)).await? {
        println!("  {:<16} {} item(s)", location.name, location.count);
    }

    Ok(())
}
