//! Redirect page generation
//!
//! Writes the same client-side redirect page as `index.html` and `404.html`
//! so both the root and unknown paths forward to the destination, keeping
//! the visitor's path and query string.

use crate::url::normalize_redirect_url;
use crate::{DeployerError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Files written into the content folder
pub const ARTIFACT_FILES: [&str; 2] = ["index.html", "404.html"];

/// Render the redirect page for an already normalized base URL
pub fn render_redirect_page(base_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Redirecting...</title>
    <script>
        window.location.href = {target} + window.location.pathname + window.location.search;
    </script>
</head>
<body>Redirecting to {label}...</body>
</html>"#,
        target = js_string_literal(base_url),
        label = escape_html(base_url),
    )
}

/// Write the redirect page into `folder`, creating it when needed
///
/// Returns the paths written. A folder created before a failed write is left
/// in place.
pub fn write_redirect_artifacts(
    folder: impl AsRef<Path>,
    raw_redirect_url: &str,
) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    let base_url = normalize_redirect_url(raw_redirect_url);
    let page = render_redirect_page(&base_url);

    fs::create_dir_all(folder).map_err(|source| DeployerError::Artifact {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(ARTIFACT_FILES.len());
    for name in ARTIFACT_FILES {
        let path = folder.join(name);
        fs::write(&path, &page).map_err(|source| DeployerError::Artifact {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }

    tracing::info!(
        folder = %folder.display(),
        destination = %base_url,
        "Wrote redirect pages"
    );

    Ok(written)
}

/// Quote a string for a JavaScript expression inside a `<script>` element
fn js_string_literal(value: &str) -> String {
    // JSON strings are valid JS string literals; `</` would close the element.
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}

pub(crate) fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
