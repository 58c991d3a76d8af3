//! Hosting entry schema
//!
//! One `hosting` element of firebase.json describing a redirect-only site.

use crate::url::normalize_redirect_url;
use serde::{Deserialize, Serialize};

/// Files the hosting CLI should never upload
pub const IGNORE_PATTERNS: [&str; 2] = ["firebase-debug.log", "firebase-debug.*.log"];

/// Glob matching every request path
pub const MATCH_ALL: &str = "**";

/// HTTP status used for the redirect rule
pub const REDIRECT_STATUS: u16 = 301;

/// Redirect rule (`{"source", "destination", "type"}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    pub source: String,
    pub destination: String,
    #[serde(rename = "type")]
    pub status: u16,
}

/// Rewrite rule (`{"source", "destination"}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub source: String,
    pub destination: String,
}

/// A hosting target binding
///
/// Field order matches the serialized key order in firebase.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingEntry {
    /// Identity of the entry within a document
    pub target: String,
    /// Content folder, relative to the project root
    pub public: String,
    pub ignore: Vec<String>,
    pub redirects: Vec<RedirectRule>,
    pub rewrites: Vec<RewriteRule>,
    pub clean_urls: bool,
    pub trailing_slash: bool,
}

impl HostingEntry {
    /// Build the entry that redirects every path of `target` to `raw_url`
    ///
    /// The path is carried over through the `:splat` capture, so
    /// `/a/b` on the hosted site lands on `<base>/a/b`.
    pub fn redirect(target: impl Into<String>, public: impl Into<String>, raw_url: &str) -> Self {
        let base_url = normalize_redirect_url(raw_url);

        Self {
            target: target.into(),
            public: public.into(),
            ignore: IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            redirects: vec![RedirectRule {
                source: MATCH_ALL.to_string(),
                destination: format!("{}/:splat", base_url),
                status: REDIRECT_STATUS,
            }],
            rewrites: vec![RewriteRule {
                source: MATCH_ALL.to_string(),
                destination: "/index.html".to_string(),
            }],
            clean_urls: false,
            trailing_slash: false,
        }
    }

    /// Redirect destination of the first rule, if any
    pub fn destination(&self) -> Option<&str> {
        self.redirects.first().map(|r| r.destination.as_str())
    }
}
