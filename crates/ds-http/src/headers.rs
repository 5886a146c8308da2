use indexmap::IndexMap;
use reqwest::header::HeaderMap;

pub const AUTHORIZATION: &str = "authorization";

/// Ordered header bag
///
/// Names are case-insensitive and kept lowercase; insertion order is the
/// order headers are written to the wire.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers(IndexMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a header, keeping its original position on replace
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.0.insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set `Authorization: Bearer <token>`
    pub fn set_bearer(&mut self, token: &str) {
        self.set(AUTHORIZATION, format!("Bearer {}", token));
    }

    /// Extract the token of a bearer `Authorization` header
    pub fn bearer(&self) -> Option<&str> {
        self.get(AUTHORIZATION)?.strip_prefix("Bearer ")
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

impl From<&HeaderMap> for Headers {
    /// Values that are not visible ASCII are skipped
    fn from(map: &HeaderMap) -> Self {
        map.iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?)))
            .collect()
    }
}

impl std::fmt::Debug for Headers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(k, v)| {
                let v = if k == AUTHORIZATION { "<redacted>" } else { v.as_str() };
                (k, v)
            }))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_case_insensitive_and_keeps_order() {
        let mut headers = Headers::new();
        headers.set("Accept", "application/json");
        headers.set("X-Request-Id", "abc");
        headers.set("accept", "text/plain");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("ACCEPT"), Some("text/plain"));
        let names: Vec<_> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["accept", "x-request-id"]);
    }

    #[test]
    fn test_bearer_roundtrip_and_redaction() {
        let mut headers = Headers::new();
        assert_eq!(headers.bearer(), None);

        headers.set_bearer("A1");
        assert_eq!(headers.get("Authorization"), Some("Bearer A1"));
        assert_eq!(headers.bearer(), Some("A1"));
        assert!(!format!("{:?}", headers).contains("A1"));

        headers.set_bearer("A2");
        assert_eq!(headers.bearer(), Some("A2"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_remove_shifts_remaining() {
        let mut headers: Headers = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(headers.remove("B").as_deref(), Some("2"));
        let names: Vec<_> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(!headers.contains("b"));
    }

    #[test]
    fn test_from_header_map() {
        let mut map = HeaderMap::new();
        map.insert("content-type", "application/json".parse().unwrap());
        let headers = Headers::from(&map);
        assert_eq!(headers.get("Content-Type"), Some("application/json"));
    }
}
