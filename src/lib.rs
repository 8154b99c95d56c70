//! tfe-runtask
//!
//! Manages Terraform Cloud / Enterprise workspace run task associations as
//! declarative resources: schema, plan, create, read, update, delete and
//! import, on top of a small client for the TFE JSON:API.

pub mod config;
pub mod provider;
pub mod resource;
pub mod tfe;

/// Version injected at compile time via TFE_RUNTASK_VERSION env var (set by CI/CD),
/// or the package version for local builds.
pub const VERSION: &str = match option_env!("TFE_RUNTASK_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
