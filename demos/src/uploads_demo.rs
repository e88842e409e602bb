//! Upload an image and print its resolved URL.
//!
//! Usage: uploads_demo <path-to-image>

use dotenv::dotenv;
use house_keeper_rust::HouseKeeper;
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let image_path = match env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => {
            eprintln!("usage: uploads_demo <path-to-image>");
            std::process::exit(2);
        }
    };

    let url = env::var("HOUSE_KEEPER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let username = env::var("HOUSE_KEEPER_USER").unwrap_or_else(|_| "demo".to_string());
    let password = env::var("HOUSE_KEEPER_PASSWORD").unwrap_or_else(|_| "demo-password".to_string());

    let client = HouseKeeper::new(&url)?;
    client.auth().login(&username, &password).await?;

    let uploaded = client.storage().upload_image(&image_path).await?;
    println!("stored as {}", uploaded.filename);
    println!("served at {}", uploaded.url);

    Ok(())
}
