//! Account management command handlers

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::models::user::Role;
use crate::services::{SeaOrmUserService, UserService};

async fn open_user_service(config: &Config) -> anyhow::Result<SeaOrmUserService> {
    let store = Store::new(&config.general.database_path).await?;
    let config_arc = Arc::new(RwLock::new(config.clone()));
    Ok(SeaOrmUserService::new(store, config_arc))
}

pub async fn cmd_user_add(
    config: &Config,
    username: &str,
    name: Option<&str>,
    password: &str,
    role: &str,
) -> anyhow::Result<()> {
    let role: Role = match role.parse() {
        Ok(role) => role,
        Err(e) => {
            println!("{e}. Use \"user\" or \"admin\".");
            return Ok(());
        }
    };

    let service = open_user_service(config).await?;
    let display_name = name.unwrap_or(username);

    match service
        .create_user(username, display_name, password, role)
        .await
    {
        Ok(user) => {
            println!("Added {} ({}) with role {}", user.username, user.display_name, user.role);
        }
        Err(e) => println!("Could not add user: {e}"),
    }

    Ok(())
}

pub async fn cmd_user_list(config: &Config) -> anyhow::Result<()> {
    let service = open_user_service(config).await?;
    let users = service.list_users().await?;

    println!("Accounts ({} total)", users.len());
    println!("{:-<60}", "");

    for user in users {
        println!(
            "{:<20} {:<25} [{}]",
            user.username, user.display_name, user.role
        );
    }

    Ok(())
}

pub async fn cmd_user_remove(config: &Config, username: &str) -> anyhow::Result<()> {
    let service = open_user_service(config).await?;

    match service.delete_user(username).await {
        Ok(()) => println!("Deleted {username}"),
        Err(e) => println!("Could not delete user: {e}"),
    }

    Ok(())
}

pub async fn cmd_user_passwd(
    config: &Config,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_user_by_username(username).await?.is_none() {
        println!("User '{username}' not found");
        return Ok(());
    }

    if password.len() < config.security.min_password_length {
        println!(
            "Password must be at least {} characters",
            config.security.min_password_length
        );
        return Ok(());
    }

    store
        .update_user_password(username, password, &config.security)
        .await?;
    println!("Password updated for {username}");

    Ok(())
}
