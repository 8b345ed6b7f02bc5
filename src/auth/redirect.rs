//! Where to send the client after logging in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Keep `raw_url` only if it is a local path other than the log-in page.
///
/// Absolute URLs and protocol-relative URLs such as "//evil.example" are
/// rejected so that the log-in page cannot be used as an open redirect.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    local_path_and_query(&uri)
}

fn local_path_and_query(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?.as_str();

    if !path_and_query.starts_with('/')
        || path_and_query.starts_with("//")
        || uri.path() == endpoints::LOG_IN_VIEW
    {
        return None;
    }

    Some(path_and_query.to_owned())
}

/// The page the client was on when the request was made.
///
/// Page requests use their own URI. htmx API requests come from a page, which
/// htmx reports in the `HX-Current-URL` header as an absolute URL.
fn redirect_target(request: &Request) -> Option<String> {
    if !request.uri().path().starts_with("/api") {
        return local_path_and_query(request.uri());
    }

    let current_url = request
        .headers()
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok());

    match current_url {
        Some(current_url) => current_url
            .parse::<Uri>()
            .ok()
            .and_then(|uri| local_path_and_query(&uri)),
        None => {
            tracing::warn!("Missing HX-Current-URL header for {}", request.uri());
            None
        }
    }
}

/// The log-in page URL that sends the client back to where `request` came
/// from, or to the dashboard.
pub fn log_in_redirect_url(request: &Request) -> String {
    let target = redirect_target(request).unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());

    match serde_urlencoded::to_string([("redirect_url", &target)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}
