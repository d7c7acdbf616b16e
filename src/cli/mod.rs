//! CLI module - Command-line interface for critiq
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand};

/// critiq - Self-hosted AI code review assistant
#[derive(Parser)]
#[command(name = "critiq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server (default when no command is given)
    #[command(alias = "-s", alias = "--serve")]
    Serve,

    /// Manage accounts without going through the web UI
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a new account
    Add {
        username: String,

        /// Display name (defaults to the username)
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        password: String,

        /// Role: "user" or "admin"
        #[arg(long, default_value = "user")]
        role: String,
    },

    /// List all accounts
    #[command(alias = "ls")]
    List,

    /// Remove an account (the admin account is protected)
    #[command(alias = "rm")]
    Remove {
        username: String,
    },

    /// Reset an account's password
    Passwd {
        username: String,

        #[arg(long)]
        password: String,
    },
}
