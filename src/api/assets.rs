//! Embedded widget page and static assets

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use regex::{Captures, Regex};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "ui/"]
struct Assets;

/// Serve an embedded file from `ui/assets`
pub async fn serve_static(Path(path): Path<String>) -> Response {
    let path = format!("assets/{}", path.trim_start_matches('/'));
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.to_string())],
                Body::from(content.data.into_owned()),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Render `index.html` for the given base path, `None` when it is not embedded
///
/// Asset references get a `?v=<stamp>` suffix so browsers pick up new
/// builds of the widget.
pub fn render_index(base_path: &str, stamp: i64) -> Result<Option<String>, regex::Error> {
    let Some(content) = Assets::get("index.html") else {
        return Ok(None);
    };
    let Ok(html) = String::from_utf8(content.data.into_owned()) else {
        return Ok(None);
    };
    let html = rebase(&html, base_path)?;
    Ok(Some(bust_asset_cache(&html, base_path, stamp)?))
}

/// Point the document base at the mount path so relative API calls resolve
fn rebase(html: &str, base_path: &str) -> Result<String, regex::Error> {
    let base_tag = Regex::new(r#"<base href="[^"]*"\s*/?>"#)?;
    Ok(base_tag
        .replace(html, |_: &Captures| format!(r#"<base href="{base_path}">"#))
        .into_owned())
}

/// Append a cache-busting query to CSS and JS references under `assets/`
fn bust_asset_cache(html: &str, base_path: &str, stamp: i64) -> Result<String, regex::Error> {
    let pattern = format!(
        r#"(href|src)="(?:\./|{})?assets/([^"'?]+\.(?:css|js))""#,
        regex::escape(base_path)
    );
    let asset_ref = Regex::new(&pattern)?;
    Ok(asset_ref
        .replace_all(html, |caps: &Captures| {
            format!(r#"{}="{base_path}assets/{}?v={stamp}""#, &caps[1], &caps[2])
        })
        .into_owned())
}
