//! Locations and items end to end: create a small hierarchy, store an item,
//! then rebuild and print the location tree from the flat list.

use dotenv::dotenv;
use house_keeper_items::NewItem;
use house_keeper_locations::{
    build_tree, find_ancestor_chain, find_node_name, LocationQuery, LocationTreeNode, NewLocation,
};
use house_keeper_rust::HouseKeeper;
use std::env;

fn print_forest(forest: &[LocationTreeNode], depth: usize) {
    for node in forest {
        println!("{}- {}", "  ".repeat(depth), node.location.name);
        print_forest(&node.children, depth + 1);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let url = env::var("HOUSE_KEEPER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let username = env::var("HOUSE_KEEPER_USER").unwrap_or_else(|_| "demo".to_string());
    let password = env::var("HOUSE_KEEPER_PASSWORD").unwrap_or_else(|_| "demo-password".to_string());

    let client = HouseKeeper::new(&url)?;
    client.auth().login(&username, &password).await?;

    let locations = client.locations();
    let items = client.items();

    println!("== Create a hierarchy ==");
    let home = locations.create(&NewLocation::new("Home")).await?;
    let home_id = home.id.expect("backend assigns ids");
    let kitchen = locations
        .create(&NewLocation::new("Kitchen").with_parent(home_id))
        .await?;
    let kitchen_id = kitchen.id.expect("backend assigns ids");
    let fridge = locations
        .create(&NewLocation::new("Fridge").with_parent(kitchen_id))
        .await?;
    let fridge_id = fridge.id.expect("backend assigns ids");
    println!("created Home / Kitchen / Fridge");

    println!("== Store an item ==");
    let item = items
        .create(
            &NewItem::new("Butter")
                .with_category("Food")
                .with_quantity(2)
                .with_location(fridge_id),
        )
        .await?;
    println!("stored {} (id {})", item.name, item.id);

    println!("== Rebuild the tree from the flat list ==");
    let flat = locations.list(&LocationQuery::new()).await?;
    let forest = build_tree(&flat, None);
    print_forest(&forest, 0);

    let chain = find_ancestor_chain(&flat, fridge_id);
    let names: Vec<&str> = chain
        .iter()
        .map(|id| find_node_name(&flat, *id).unwrap_or("<unknown>"))
        .collect();
    println!("to reveal Fridge, expand: {}", names.join(" > "));

    println!("== Server-side tree for comparison ==");
    let server_tree = locations.tree().await?;
    println!("server returned {} root(s)", server_tree.len());

    println!("== Clean up ==");
    items.delete(item.id).await?;
    locations.delete(fridge_id).await?;
    locations.delete(kitchen_id).await?;
    locations.delete(home_id).await?;
    println!("done");

    Ok(())
}
