//! services/portal/src/error.rs
//!
//! Defines the primary error type for the portal client.

use crate::app::guard::View;
use crate::config::ConfigError;
use portal_core::ports::PortError;

/// The primary error type for the `portal` service.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core ports.
    #[error("{0}")]
    Port(#[from] PortError),

    /// The access guard refused the requested view.
    #[error("Access denied, redirecting to {0}")]
    Redirected(View),
}
