//! Subcommand handlers

pub mod folders;
pub mod move_items;
pub mod settings;

use anyhow::Result;
use log::warn;
use mail::{GraphClient, GraphCredentials, GraphSession};

/// Load credentials and open a Graph session for `mailbox`
pub(crate) fn connect(mailbox: &str) -> Result<GraphClient> {
    let credentials = GraphCredentials::load().inspect_err(|_| {
        if let Some(path) = GraphCredentials::default_credentials_path() {
            warn!(
                "To configure Graph access, either:\n\
                 1. Place {{\"access_token\": \"...\"}} at: {}\n\
                 2. Or set the FERRY_ACCESS_TOKEN environment variable",
                path.display()
            );
        }
    })?;

    let session = GraphSession::connect(&credentials, mailbox)?;
    Ok(GraphClient::new(session))
}
