//! HTTP front end: `GET /` and `POST /api/chat`.

use crate::config::ServerConfig;
use crate::core::error::LennyError;
use crate::history::parse_history;
use crate::lenny::{ChatReply, Lenny};
use axum::{
    Form, Json, Router,
    extract::{FromRequest, Multipart, Request, State},
    http::{HeaderValue, header::CONTENT_TYPE},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Fields of `POST /api/chat`, sent either url-encoded or as
/// `multipart/form-data`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatForm {
    pub text: Option<String>,
    pub history_str: Option<String>,
}

pub fn app(lenny: Arc<Lenny>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/chat", post(chat))
        .layer(cors_layer(allowed_origins))
        .with_state(lenny)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            // A wildcard cannot be combined with credentials.
            if origin == "*" {
                warn!("skipping wildcard CORS origin");
                return None;
            }
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "skipping invalid CORS origin");
                    None
                }
            }
        })
        .collect();
    info!("Final CORS origins loaded: {:?}", allowed_origins);

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Camp Pool backend Endpoints",
        "description": "camp pool is a tool designed to connect the Jewish community with mentors and resources to help them grow",
    }))
}

async fn chat(State(lenny): State<Arc<Lenny>>, request: Request) -> Json<ChatReply> {
    let form = match read_chat_form(request).await {
        Ok(form) => form,
        Err(detail) => {
            warn!(error = %detail, "rejecting unreadable chat form");
            return Json(ChatReply::Error(format!("Invalid form data: {}", detail)));
        }
    };

    let history = parse_history(form.history_str.as_deref());
    info!(history_len = history.len(), "chat request");
    Json(lenny.send_msg(form.text.as_deref(), &history).await)
}

async fn read_chat_form(request: Request) -> Result<ChatForm, String> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    if !is_multipart {
        let Form(form) = Form::<ChatForm>::from_request(request, &())
            .await
            .map_err(|e| e.body_text())?;
        return Ok(form);
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| e.body_text())?;
    let mut form = ChatForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        // Unknown fields are drained and ignored.
        let name = field.name().map(str::to_owned);
        let value = field.text().await.map_err(|e| e.body_text())?;
        match name.as_deref() {
            Some("text") => form.text = Some(value),
            Some("history_str") => form.history_str = Some(value),
            _ => {}
        }
    }
    Ok(form)
}

pub async fn serve(lenny: Lenny, config: &ServerConfig) -> Result<(), LennyError> {
    let router = app(Arc::new(lenny), &config.allowed_origins);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| LennyError::Server(format!("Failed to bind {}: {}", config.bind_addr, e)))?;
    info!("Lenny listening on http://{}", config.bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LennyError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
