//! Route modules, one per resource family.

pub mod admin;
pub mod credentials;
pub mod verifications;

use serde::Deserialize;

/// Common pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}
