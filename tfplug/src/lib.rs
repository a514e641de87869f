//! tfplug - Terraform plugin abstractions for Rust providers
//!
//! The provider-facing half of a Terraform plugin: the value model handed
//! over by the host, diagnostics, attribute validators and the provider
//! trait. Wire encoding and the plugin RPC server live outside this crate.

pub mod error;
pub mod provider;
pub mod types;
pub mod validator;

pub use error::{Result, TfplugError};
pub use provider::Provider;
pub use types::{Config, Diagnostic, DiagnosticSeverity, Diagnostics, Dynamic};
pub use validator::{validate_all, Validator};
