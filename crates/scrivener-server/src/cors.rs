use http::{Method, header::HeaderName};
use scrivener_config::{AnyOrList, CorsConfig};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer from configuration
///
/// Wildcards cannot be combined with credentials, so with credentials
/// enabled a wildcard mirrors the request instead.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mirror = config.credentials;

    let origins = match &config.origins {
        AnyOrList::Any if mirror => AllowOrigin::mirror_request(),
        AnyOrList::Any => AllowOrigin::any(),
        AnyOrList::List(origins) => AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok())),
    };

    let methods = match &config.methods {
        AnyOrList::Any if mirror => AllowMethods::mirror_request(),
        AnyOrList::Any => AllowMethods::any(),
        AnyOrList::List(methods) => AllowMethods::list(methods.iter().filter_map(|m| m.parse::<Method>().ok())),
    };

    let headers = match &config.headers {
        AnyOrList::Any if mirror => AllowHeaders::mirror_request(),
        AnyOrList::Any => AllowHeaders::any(),
        AnyOrList::List(headers) => AllowHeaders::list(headers.iter().filter_map(|h| h.parse::<HeaderName>().ok())),
    };

    let mut layer = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(config.credentials);

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}
