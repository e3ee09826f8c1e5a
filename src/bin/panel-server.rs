// ABOUTME: Server binary for the login and admin panel application
// ABOUTME: Loads configuration, initializes logging and serves until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Panel Server Binary
//!
//! Configuration comes from the environment (and `.env`); flags override it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use panel_server::{
    config::ServerConfig, logging, resources::ServerResources, server::PanelServer,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "panel-server")]
#[command(about = "Login and role-gated admin panel server")]
pub struct Args {
    /// Override bind host
    #[arg(long)]
    host: Option<String>,

    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override users file path
    #[arg(long)]
    users_file: Option<PathBuf>,

    /// Override static directory
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(users_file) = args.users_file {
        config.credentials.users_file = users_file;
    }
    if let Some(static_dir) = args.static_dir {
        config.static_files.directory = static_dir;
    }

    info!("{}", config.summary());

    let resources = match ServerResources::from_config(config).await {
        Ok(resources) => Arc::new(resources),
        Err(e) => {
            error!("Failed to initialize server resources: {e}");
            error!("Run `create-users seed` to create the users file");
            return Err(e.into());
        }
    };

    PanelServer::new(resources).run().await
}
