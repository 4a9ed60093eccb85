//! Shared library for the DIAN electronic-invoicing bridge
//!
//! Common functionality used by the bridge crate:
//! - Error taxonomy
//! - Environment configuration
//! - HTTP client for the remote invoicing API

pub mod config;
pub mod error;
pub mod service_client;

// Re-export commonly used types
pub use config::{CompanyConfig, Config};
pub use error::{AppError, RejectionDetails, Result};
pub use service_client::ServiceClient;
