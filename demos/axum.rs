//! Run with
//!
//! ```not_rust
//! SIGFIX_SECRET=3d94b435641d85bd3ec5da171cdabaf0 cargo run --example axum
//! ```
//!
//! Then post a signed request:
//!
//! ```not_rust
//! curl -d 'signed_request=QCd8WudFOVM8xp05tKs9AwNYCkbF2io8Hn7PoiTdK7k.eyJhbGdvcml0aG0iOiJITUFDLVNIQTI1NiIsImlzc3VlZF9hdCI6MTMxNzQwMzc0OCwidXNlciI6eyJjb3VudHJ5IjoidXMiLCJsb2NhbGUiOiJlbl9VUyIsImFnZSI6eyJtaW4iOjAsIm1heCI6MTJ9fX0' http://127.0.0.1:4000/
//! ```

use axum::{
    Router,
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    routing::get,
};
use clap::Parser;
use sigfix::MethodFix;
use sigfix::Request as _;
use sigfix::http::{FormParams, SignedRequestPayload};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Largest form body buffered for parameter parsing
const MAX_FORM_SIZE: usize = 64 * 1024;

#[derive(Parser, Debug)]
#[command(about = "Serve a canvas page behind the signed request method fix")]
struct Args {
    /// Shared secret; without it signed requests are trusted unverified
    #[arg(long, env = "SIGFIX_SECRET")]
    secret: Option<String>,

    /// Address to listen on
    #[arg(long, env = "SIGFIX_LISTEN", default_value = "127.0.0.1:4000")]
    listen: String,

    /// Requests below this path prefix bypass the method fix
    #[arg(long, env = "SIGFIX_EXCLUDE_PREFIX")]
    exclude_prefix: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,sigfix=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut builder = MethodFix::new();
    if let Some(secret) = args.secret {
        builder.secret(secret);
    } else {
        tracing::warn!("No secret configured, signed requests are not verified");
    }
    if let Some(prefix) = args.exclude_prefix {
        builder.exclude(move |request| request.path().starts_with(prefix.as_str()));
    }
    let fix = builder.build();

    let app = Router::new()
        .route("/", get(canvas).post(untrusted))
        .route("/admin", get(canvas).post(untrusted))
        .layer(axum::middleware::from_fn_with_state(
            fix,
            method_fix_middleware,
        ));

    let listener = tokio::net::TcpListener::bind(&args.listen).await.unwrap();
    tracing::debug!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

async fn method_fix_middleware(
    State(fix): State<MethodFix>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_FORM_SIZE)
        .await
        .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;
    let mut request = Request::from_parts(parts, Body::from(bytes.clone()));
    let params = FormParams::from_request(&request, &bytes);
    request.extensions_mut().insert(params);

    fix.process(&mut request).map_err(|e| {
        tracing::warn!("Malformed signed request: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(next.run(request).await)
}

async fn canvas(request: Request) -> String {
    match request.extensions().get::<SignedRequestPayload>() {
        Some(SignedRequestPayload(Some(payload))) => format!("Hello from the canvas: {payload}"),
        Some(SignedRequestPayload(None)) => "Hello from the canvas, no payload".to_string(),
        None => "Hello, World!".to_string(),
    }
}

async fn untrusted() -> (StatusCode, &'static str) {
    (StatusCode::FORBIDDEN, "Signed request could not be verified")
}
