pub mod auth;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// The public landing page and the admin panel are both browser apps served
/// from their own origins, so the API answers cross-origin requests from
/// anywhere. Pin the origin list once the panel has a fixed domain.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Per-request spans feeding the JSON log output, covering the broadcast
/// and upload endpoints along with everything else.
pub fn trace_layer(
) -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
}
