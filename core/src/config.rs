//! Deployment base path.
//!
//! The console may be served under a sub-path (`/openbas`, `/app`, ...). The
//! raw value comes from the deployment environment and is normalized once:
//! the result is either empty or starts with `/`, and never ends with `/`.

use std::fmt;

/// Normalized prefix applied to every referential URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasePath(String);

impl BasePath {
    /// Normalize a raw base path. `None`, `""` and `"/"` all resolve to the
    /// empty prefix.
    pub fn resolve(raw: Option<&str>) -> Self {
        let trimmed = raw.map(str::trim).unwrap_or("").trim_end_matches('/');
        if trimmed.is_empty() {
            return Self::default();
        }
        if trimmed.starts_with('/') {
            Self(trimmed.to_string())
        } else {
            Self(format!("/{trimmed}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Prefix `uri` with the base path.
    pub fn join(&self, uri: &str) -> String {
        if uri.is_empty() || uri.starts_with('/') {
            format!("{}{uri}", self.0)
        } else {
            format!("{}/{uri}", self.0)
        }
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
