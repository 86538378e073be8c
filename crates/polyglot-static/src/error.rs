//! Error types for site generation.

use polyglot_content::{ContentError, StoreError, UiError};

/// A variant that would break a site-wide invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("Empty slug")]
    EmptySlug,

    #[error("Invalid slug {0:?}")]
    InvalidSlug(String),

    #[error("Output {path} is already claimed by {owner}")]
    Collision { path: String, owner: String },
}

/// Failure of a single variant. The build carries on with the next one.
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Ui(#[from] UiError),

    #[error("Failed to render template: {0}")]
    Template(String),

    #[error("Failed to serialize schema: {0}")]
    Schema(String),

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Errors that stop the whole build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to load translations: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to load UI strings: {0}")]
    Ui(#[from] UiError),

    #[error("Invalid site configuration: {0}")]
    Config(String),

    #[error("Failed to initialize templates: {0}")]
    Template(String),

    #[error("Failed to create output directory {path}: {message}")]
    OutputDir { path: String, message: String },
}
