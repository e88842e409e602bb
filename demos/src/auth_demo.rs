//! Register, sign in, inspect the profile, sign out.
//!
//! Expects a running House Keeper backend; set HOUSE_KEEPER_URL (and optionally
//! HOUSE_KEEPER_USER / HOUSE_KEEPER_PASSWORD) in the environment or a .env file.

use dotenv::dotenv;
use house_keeper_auth::{NewUser, UserUpdate};
use house_keeper_rust::HouseKeeper;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let url = env::var("HOUSE_KEEPER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let username = env::var("HOUSE_KEEPER_USER").unwrap_or_else(|_| "demo".to_string());
    let password = env::var("HOUSE_KEEPER_PASSWORD").unwrap_or_else(|_| "demo-password".to_string());

    let client = HouseKeeper::new(&url)?;

    let _subscription = client.session.on_auth_state_change(|change| {
        println!("auth state: {:?}", change);
    });

    println!("== Register ==");
    let new_user = NewUser::new(
        &format!("{}@example.com", username),
        &username,
        &password,
        "Demo",
        "User",
    );
    match client.auth().register(&new_user).await {
        Ok(user) => println!("registered account {} ({})", user.username, user.email),
        Err(err) => println!("registration skipped: {}", err),
    }

    println!("== Login ==");
    let session = client.auth().login(&username, &password).await?;
    println!(
        "signed in as {:?}, token expires at {:?}",
        session.subject, session.expires_at
    );

    println!("== Profile ==");
    let user = client.auth().current_user().await?;
    println!("current user: {} {} <{}>",
        user.first_name.as_deref().unwrap_or(""),
        user.last_name.as_deref().unwrap_or(""),
        user.email,
    );

    let update = UserUpdate::new().with_first_name("Demonstration");
    let user = client.auth().update_user(&update).await?;
    println!("updated first name to {:?}", user.first_name);

    println!("== Sign out ==");
    client.auth().sign_out();
    println!("signed in: {}", client.auth().is_authenticated());

    Ok(())
}
