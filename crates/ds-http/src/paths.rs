use ds_auth::config::{AuthPaths, ClientConfig};
use url::Url;

/// How the auth layer treats a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// No credentials needed; never triggers a refresh
    Public,
    /// The renewal endpoint itself; never carries a token or triggers a refresh
    Renewal,
    Protected,
}

/// Classifies request URLs against the public allow-list and the renewal path
#[derive(Debug, Clone)]
pub struct PathClassifier {
    base_url: Url,
    public: Vec<String>,
    renewal: String,
}

impl PathClassifier {
    pub fn new(base_url: Url, paths: &AuthPaths) -> Self {
        Self {
            base_url,
            public: paths.public.iter().map(|p| normalize(p).to_string()).collect(),
            renewal: normalize(&paths.renewal).to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone(), &config.paths)
    }

    pub fn classify(&self, url: &str) -> PathClass {
        let path = self.path_of(url);

        // The renewal path sits under the token issuance path, so it goes first.
        if is_within(&path, &self.renewal) {
            PathClass::Renewal
        } else if self.public.iter().any(|p| is_within(&path, p)) {
            PathClass::Public
        } else {
            PathClass::Protected
        }
    }

    /// Resolve `url` to a normalized path, falling back to the raw string
    fn path_of(&self, url: &str) -> String {
        match Url::parse(url).or_else(|_| self.base_url.join(url)) {
            Ok(resolved) => normalize(resolved.path()).to_string(),
            Err(_) => {
                let raw = url.split(['?', '#']).next().unwrap_or_default();
                normalize(raw).to_string()
            }
        }
    }
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// `path` equals `prefix` or is one of its sub-paths
fn is_within(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
