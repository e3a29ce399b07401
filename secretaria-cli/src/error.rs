//! CLI error type.

use std::path::PathBuf;

use secretaria_client::{ClientError, ConfigLoadError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}\n\n{usage}", usage = crate::cli::USAGE)]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// A form or list operation failed; holds the message shown to the user.
    #[error("{0}")]
    Rejected(String),

    #[error("Falha ao ler formulário {}: {reason}", .path.display())]
    Form { path: PathBuf, reason: String },

    #[error("Falha ao inicializar logs: {0}")]
    Telemetry(String),

    #[error("Falha ao gerar saída: {0}")]
    Output(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
