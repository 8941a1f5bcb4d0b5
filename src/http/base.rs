//! API root resolution.

use url::Url;

use crate::config::ConfigError;

/// Normalized API root and the server origin it lives under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    root: Url,
    origin: Url,
}

impl ApiBase {
    /// Build from a configured address and prefix.
    ///
    /// Empty path segments are dropped, the prefix is appended unless the
    /// address already ends with it, and the root always ends in exactly
    /// one `/`. `http://h:5000`, `http://h:5000/` and `http://h:5000/api/`
    /// all become `http://h:5000/api/`.
    pub fn new(base_url: &str, prefix: &str) -> Result<Self, ConfigError> {
        let mut url = Url::parse(base_url.trim()).map_err(|e| ConfigError::ValidationError {
            message: format!("Invalid API base URL '{}': {}", base_url, e),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::ValidationError {
                message: format!("API base URL '{}' cannot carry a path", base_url),
            });
        }

        let prefix: Vec<&str> = prefix.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments: Vec<String> = url
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let has_prefix = segments.len() >= prefix.len()
            && segments[segments.len() - prefix.len()..]
                .iter()
                .zip(&prefix)
                .all(|(a, b)| a == b);
        let origin_len = if has_prefix {
            segments.len() - prefix.len()
        } else {
            segments.len()
        };
        if !has_prefix {
            segments.extend(prefix.iter().map(|s| s.to_string()));
        }

        url.set_query(None);
        url.set_fragment(None);

        let mut origin = url.clone();
        origin.set_path(&dir_path(&segments[..origin_len]));
        url.set_path(&dir_path(&segments));

        Ok(Self { root: url, origin })
    }

    /// API root, always ending in `/`.
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Absolute URL for an endpoint path relative to the API root.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.root.join(path.trim_start_matches('/'))
    }

    /// Resolve an asset reference (e.g., an uploaded image path).
    ///
    /// Absolute http(s) URLs pass through; anything else is resolved
    /// against the server origin, not the API root.
    pub fn resolve_asset(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return reference.to_string();
        }
        self.origin
            .join(reference.trim_start_matches('/'))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| reference.to_string())
    }
}

/// Percent-encode `raw` as exactly one path segment.
///
/// `/`, `?`, `#` and `%` are escaped. Returns `None` for the empty, `.` and
/// `..` segments, which would address the collection or its parent rather
/// than an item in it.
pub fn path_segment(raw: &str) -> Option<String> {
    if matches!(raw, "" | "." | "..") {
        return None;
    }
    let mut scratch = Url::parse("http://segment.invalid/").ok()?;
    scratch.path_segments_mut().ok()?.clear().push(raw);
    Some(scratch.path().trim_start_matches('/').to_string())
}

fn dir_path(segments: &[String]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}
