//! Command-line interface for Wikilens.

mod commands;

use clap::{Parser, Subcommand};

/// Wikilens - keyword search over Wikipedia with generated summaries
#[derive(Parser)]
#[command(name = "wikilens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Run a keyword search and print the result
    #[command(alias = "s")]
    Search {
        /// Keyword to search for
        #[arg(required = true)]
        keyword: Vec<String>,
    },

    /// Show the most viewed searches
    Top {
        /// Number of entries to show
        #[arg(default_value = "10")]
        limit: u64,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage posts
    Post {
        #[command(subcommand)]
        command: PostCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user account
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum PostCommands {
    /// Create a post
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
    },
}

pub use commands::*;
