//! Raw exchange input handed to the pipeline by the embedding server.
//!
//! Transport and routing live outside this crate: the server parses the HTTP
//! request, matches a route, and hands the pieces over here. Query string and
//! cookie helpers are provided for servers that carry them unparsed.

use http::Method;
use serde_json::Value;
use std::collections::HashMap;

/// Raw per-exchange request data.
///
/// Header keys are expected lowercase, matching what HTTP parsers emit.
#[derive(Debug, Default)]
pub struct RequestParts {
    pub method: Method,
    pub path: String,
    /// Path parameters extracted by the server's router.
    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub cookies: HashMap<String, String>,
    /// Parsed JSON body, when the content type carries one.
    pub body: Option<Value>,
}

impl RequestParts {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        RequestParts {
            method,
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Parse query string parameters from a URL path.
pub fn parse_query_params(path: &str) -> HashMap<String, String> {
    if let Some(pos) = path.find('?') {
        let query_str = &path[pos + 1..];
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        HashMap::new()
    }
}

/// Parse cookies out of a `cookie` header.
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim().to_string();
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_params() {
        let params = parse_query_params("/users?limit=10&tag=a%20b");
        assert_eq!(params.get("limit").map(String::as_str), Some("10"));
        assert_eq!(params.get("tag").map(String::as_str), Some("a b"));
        assert!(parse_query_params("/users").is_empty());
    }

    #[test]
    fn test_parse_cookies() {
        let mut headers = HashMap::new();
        headers.insert("cookie".to_string(), "session=abc; theme=dark".to_string());
        let cookies = parse_cookies(&headers);
        assert_eq!(cookies.get("session").map(String::as_str), Some("abc"));
        assert_eq!(cookies.get("theme").map(String::as_str), Some("dark"));
    }
}
