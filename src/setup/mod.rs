//! Interactive first-run setup: collects deployment secrets and tool credentials and
//! writes them to the `.env` file read by the server.

pub mod catalog;
pub mod env_file;
pub mod prompter;
pub mod wizard;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("failed to update {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
