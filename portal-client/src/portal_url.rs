use std::env;

#[derive(Debug, Clone)]
pub struct PortalURL(String);

impl AsRef<str> for PortalURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PortalURL {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self(base_url.into())
    }

    /// Creates a new PortalURL from the environment variable `PORTAL_URL`.
    pub fn from_env() -> Option<Self> {
        env::var("PORTAL_URL").ok().map(Self)
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// Append a query parameter, percent-encoding neither key nor value.
    ///
    /// Callers only pass numeric ids and fixed role names.
    pub fn with_query(&self, key: &str, value: impl std::fmt::Display) -> Self {
        if self.0.contains('?') {
            Self(format!("{}&{}={}", self.0, key, value))
        } else {
            Self(format!("{}?{}={}", self.0, key, value))
        }
    }
}
