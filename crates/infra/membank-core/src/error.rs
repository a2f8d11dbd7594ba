use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("No central memory bank for {identity} (expected at {path})")]
    SourceMissing { identity: String, path: PathBuf },

    #[error("No central memory bank to merge into for {identity} (expected at {path})")]
    TargetMissing { identity: String, path: PathBuf },

    #[error("Memory bank at {path} has no documents")]
    EmptySource { path: PathBuf },

    #[error("Unknown command: {command}")]
    UnknownCommand { command: String },

    #[error("Could not classify checkout from {prev_ref} to {new_ref}: {reason}")]
    AmbiguousClassification {
        prev_ref: String,
        new_ref: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Git2 error: {0}")]
    Git2(#[from] git2::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BankError>;
