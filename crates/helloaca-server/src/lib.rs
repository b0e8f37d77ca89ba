//! HTTP service: request validation, the analysis endpoint, and error mapping.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use helloaca_ai::{ContractAnalyzer, ProviderError};
use helloaca_config::HelloAcaConfig;
use helloaca_core::{ErrorEnvelope, check_contract_text};
use serde::Deserialize;
use serde_json::Value;
use tracing::{Instrument, info, warn};

/// Shared, read-only state for every request.
#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<ContractAnalyzer>,
    max_contract_chars: usize,
}

impl AppState {
    pub fn new(analyzer: ContractAnalyzer, max_contract_chars: usize) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            max_contract_chars,
        }
    }

    pub fn from_config(config: &HelloAcaConfig) -> anyhow::Result<Self> {
        if !config.provider.is_configured() {
            warn!("no provider API key configured; analysis requests will return 401");
        }
        let analyzer = ContractAnalyzer::from_config(config)?;
        Ok(Self::new(analyzer, config.analysis.max_contract_chars))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/analyze-contract", post(analyze_contract))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &HelloAcaConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = config.bind_addr()?;
    let app = router(AppState::from_config(config)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, model = %config.provider.model, "helloaca listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    #[serde(default)]
    contract_text: Option<String>,
    #[serde(default)]
    contract_id: Option<Value>,
}

async fn analyze_contract(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(AnalyzeRequest {
        contract_text,
        contract_id,
    }) = match payload {
        Ok(req) => req,
        Err(rejection) => {
            warn!(error = %rejection, "malformed analysis request");
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let text = match check_contract_text(
        contract_text.as_deref().unwrap_or_default(),
        state.max_contract_chars,
    ) {
        Ok(text) => text,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    let chars = text.chars().count();

    let id_label = contract_id.as_ref().map(display_id).unwrap_or_default();
    let span = tracing::info_span!("analyze_contract", contract_id = %id_label, chars);

    async move {
        match state.analyzer.analyze(text).await {
            Ok(analysis) => {
                let fallback = analysis.is_fallback();
                let envelope = analysis.into_envelope(contract_id, chrono::Utc::now());
                info!(fallback, "analysis complete");
                (StatusCode::OK, Json(envelope)).into_response()
            }
            Err(err) => {
                warn!(error = %err, "provider call failed");
                let (status, message) = provider_error_status(&err);
                error_response(status, message)
            }
        }
    }
    .instrument(span)
    .await
}

/// Contract ids are opaque; strings are logged without their JSON quotes.
fn display_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// HTTP status and public message for a provider failure. Details stay in the logs.
fn provider_error_status(err: &ProviderError) -> (StatusCode, &'static str) {
    match err {
        ProviderError::MissingCredential | ProviderError::Unauthorized { .. } => (
            StatusCode::UNAUTHORIZED,
            "AI service authentication failed",
        ),
        ProviderError::RateLimited { .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Please try again later.",
        ),
        ProviderError::Timeout => (
            StatusCode::REQUEST_TIMEOUT,
            "Analysis timed out. Please try again.",
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to analyze contract",
        ),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorEnvelope::new(message))).into_response()
}
