use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Middleware that logs every HTTP request: method, path, status code and
/// handling time.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status().as_u16();

    if status < 400 {
        tracing::info!("{} {} {} {}ms", status, method, uri.path(), duration.as_millis());
    } else {
        tracing::warn!("{} {} {} {}ms", status, method, uri.path(), duration.as_millis());
    }

    response
}
