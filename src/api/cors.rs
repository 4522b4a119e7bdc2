//! CORS Policy
//!
//! By default every origin is allowed. The intended allow-list is
//! `claude.ai` (and its subdomains) plus localhost, enforced only in
//! strict mode (`CORS_STRICT=true`).

use axum::http::{request::Parts, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Builds the CORS layer for the router.
///
/// - `strict = false`: any origin, matching current behavior
/// - `strict = true`: only origins accepted by [`is_allowed_origin`]
pub fn cors_layer(strict: bool) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if strict {
        layer.allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _: &Parts| {
            is_allowed_origin(origin)
        }))
    } else {
        layer.allow_origin(Any)
    }
}

/// Checks an `Origin` header against the allow-list.
///
/// Accepts `https://claude.ai`, `https://*.claude.ai`, and `localhost` /
/// `127.0.0.1` over http or https on any port.
pub fn is_allowed_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };

    let (scheme, rest) = match origin.split_once("://") {
        Some(parts) => parts,
        None => return false,
    };

    // Origins carry no path; strip an optional port
    let host = match rest.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => rest,
    };
    let host = host.to_ascii_lowercase();

    match scheme {
        "https" => {
            host == "claude.ai"
                || host.ends_with(".claude.ai")
                || host == "localhost"
                || host == "127.0.0.1"
        }
        "http" => host == "localhost" || host == "127.0.0.1",
        _ => false,
    }
}
