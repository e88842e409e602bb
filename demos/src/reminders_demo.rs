//! Create a reminder, list due and upcoming ones, complete it.

use chrono::{Duration, Utc};
use dotenv::dotenv;
use house_keeper_reminders::{NewReminder, RepeatType};
use house_keeper_rust::HouseKeeper;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let url = env::var("HOUSE_KEEPER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let username = env::var("HOUSE_KEEPER_USER").unwrap_or_else(|_| "demo".to_string());
    let password = env::var("HOUSE_KEEPER_PASSWORD").unwrap_or_else(|_| "demo-password".to_string());

    let client = HouseKeeper::new(&url)?;
    client.auth().login(&username, &password).await?;

    let reminders = client.reminders();

    println!("== Create ==");
    let due_date = Utc::now() + Duration::days(3);
    let reminder = reminders
        .create(
            &NewReminder::new("Replace water filter", due_date)
                .with_description("Under the sink")
                .with_repeat(RepeatType::Monthly),
        )
        .await?;
    println!("created reminder {} due {}", reminder.id, reminder.due_date);

    println!("== Due now ==");
    for due in reminders.due().await? {
        println!("  overdue: {} (was due {})", due.title, due.due_date);
    }

    println!("== Due within a week ==");
    for upcoming in reminders.upcoming(7).await? {
        println!("  upcoming: {} (due {})", upcoming.title, upcoming.due_date);
    }

    println!("== Complete ==");
    let completed = reminders.complete(reminder.id).await?;
    println!("completed: {}", completed.is_completed);

    reminders.delete(reminder.id).await?;
    println!("cleaned up");

    Ok(())
}
