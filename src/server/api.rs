use crate::cli::Args;
use crate::error::RelayError;
use crate::llm::chat::ChatClient;
use crate::models::wire::{ HealthResponse, RootResponse, SendMessageRequest, SendMessageResponse };
use crate::relay;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ Path, State, rejection::JsonRejection },
    http::{ request::Parts, HeaderValue },
};
use tower_http::cors::{ AllowHeaders, AllowMethods, AllowOrigin, CorsLayer };
use log::{ info, warn };

pub const ROOT_BANNER: &str = "Hello from the coach relay";

#[derive(Clone)]
pub struct AppState {
    pub chat_client: Arc<dyn ChatClient>,
    pub model: String,
}

impl AppState {
    pub fn new(chat_client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self { chat_client, model: model.into() }
    }
}

/// Credentialed CORS for exactly one origin. Any other origin gets no
/// `Access-Control-Allow-Origin` header. Methods and headers mirror the preflight.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, Box<dyn Error + Send + Sync>> {
    let allowed = HeaderValue::from_str(origin).map_err(|e|
        format!("Invalid CORS origin '{}': {}", origin, e)
    )?;
    Ok(
        CorsLayer::new()
            .allow_origin(
                AllowOrigin::predicate(move |request_origin: &HeaderValue, _parts: &Parts| {
                    request_origin == allowed
                })
            )
            .allow_credentials(true)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
    )
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/chat/{id}/send", post(send_message_handler))
        .with_state(state)
}

pub fn app(state: AppState, cors_origin: &str) -> Result<Router, Box<dyn Error + Send + Sync>> {
    Ok(router(state).layer(cors_layer(cors_origin)?))
}

pub async fn start_http_server(
    args: &Args,
    state: AppState
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = args.server_addr().parse::<SocketAddr>().map_err(|e|
        format!("Invalid listen address '{}': {}", args.server_addr(), e)
    )?;
    let service = app(state, &args.cors_origin)?;

    if args.enable_tls {
        let (cert_path, key_path) = match (&args.tls_cert_path, &args.tls_key_path) {
            (Some(cert), Some(key)) => (cert, key),
            _ => {
                return Err("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.".into());
            }
        };
        info!("TLS enabled. Loading certificate from '{}' and key from '{}'", cert_path, key_path);
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("Server is running on https://{}", addr);
        axum_server::bind_rustls(addr, tls_config).serve(service.into_make_service()).await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e|
            format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
        )?;
        info!("Server is running on http://{}", addr);
        axum::serve(listener, service.into_make_service()).await?;
    }

    Ok(())
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse { message: ROOT_BANNER.to_string() })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy".to_string() })
}

async fn send_message_handler(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>
) -> Result<Json<SendMessageResponse>, RelayError> {
    let Json(request) = payload.map_err(|e| {
        warn!("Rejected malformed body for chat {}: {}", chat_id, e.body_text());
        RelayError::InvalidRequest(e.body_text())
    })?;

    relay
        ::send_message(state.chat_client.as_ref(), &state.model, &chat_id, request).await
        .map(Json)
}
