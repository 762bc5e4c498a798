//! Runner configuration loaded from the environment.

use std::env;

use referential_core::BasePath;

pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Where the backend lives and which base path the console is served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub origin: String,
    pub base_path: BasePath,
}

impl RunnerConfig {
    /// Read `API_ORIGIN` and `BASE_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let origin = lookup("API_ORIGIN")
            .filter(|origin| !origin.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            base_path: BasePath::resolve(lookup("BASE_PATH").as_deref()),
        }
    }
}
