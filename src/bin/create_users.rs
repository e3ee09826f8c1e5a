// ABOUTME: Provisioning utility that writes the users file with bcrypt hashes
// ABOUTME: Seeds the default accounts or adds a single account from the command line
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage:
//! ```bash
//! # Write admin/adminpass, super1/superpass and usuario1/userpass
//! cargo run --bin create-users -- seed
//!
//! # Overwrite an existing file
//! cargo run --bin create-users -- seed --force
//!
//! # Add one account
//! cargo run --bin create-users -- add --username ana --password s3cret --role supervisor
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use panel_server::constants::{defaults, service_names};
use panel_server::permissions::UserRole;
use panel_server::provisioning::{add_user, seed_users_file, NewUser};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "create-users",
    about = "Panel server user provisioning",
    long_about = "Create or extend the users file read by panel-server. Passwords are stored as bcrypt hashes."
)]
struct CreateUsersArgs {
    #[command(subcommand)]
    command: UsersCommand,

    /// Users file path
    #[arg(long, env = "USERS_FILE", default_value = defaults::USERS_FILE)]
    users_file: PathBuf,

    /// bcrypt cost factor
    #[arg(long, env = "BCRYPT_COST", default_value_t = defaults::BCRYPT_COST)]
    cost: u32,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Subcommand)]
enum UsersCommand {
    /// Write the default admin, supervisor and standard accounts
    Seed {
        /// Overwrite the file if it exists
        #[arg(long)]
        force: bool,
    },

    /// Add one account to the file, creating it if needed
    Add {
        /// Login name
        #[arg(long)]
        username: String,

        /// Plaintext password, hashed before writing
        #[arg(long)]
        password: String,

        /// Role: admin, supervisor or standard (usuario and user are accepted)
        #[arg(long, default_value = "standard")]
        role: UserRole,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Contact email
        #[arg(long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CreateUsersArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("{} writing {}", service_names::CREATE_USERS, args.users_file.display());

    match args.command {
        UsersCommand::Seed { force } => {
            let users = seed_users_file(&args.users_file, args.cost, force).await?;
            for user in &users {
                info!("Created {} ({})", user.username, user.role);
            }
            println!(
                "{} written with {} users",
                args.users_file.display(),
                users.len()
            );
        }
        UsersCommand::Add {
            username,
            password,
            role,
            name,
            email,
        } => {
            let user = add_user(
                &args.users_file,
                NewUser {
                    username,
                    password,
                    role,
                    display_name: name,
                    email,
                },
                args.cost,
            )
            .await?;
            println!("Added {} ({}) to {}", user.username, user.role, args.users_file.display());
        }
    }

    Ok(())
}
