// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /analyze, POST /send-to-chatbot, GET /health, GET /api/info.
//! Error status reflects where the failure happened: 400 for a bad upload,
//! 502 for an identification-service failure, 504 for a timed-out one.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cropsight_core::{CropSuggestion, CropsightError, DiseaseSuggestion};
use cropsight_pipeline::consultation_summary;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::server::GatewayState;

/// Response body for POST /analyze.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub crops: Vec<CropSuggestion>,
    pub diseases: Vec<DiseaseSuggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_treatment: Option<String>,
    /// Verbatim identification-service response.
    pub raw_data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,
}

/// Request body for POST /send-to-chatbot: an earlier analyze response,
/// echoed back by the client. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct ChatbotRequest {
    #[serde(default)]
    pub crops: Vec<CropSuggestion>,
    #[serde(default)]
    pub diseases: Vec<DiseaseSuggestion>,
    #[serde(default)]
    pub ai_treatment: Option<String>,
    #[serde(default)]
    pub raw_data: serde_json::Value,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
        .into_response()
}

/// POST /analyze
///
/// Accepts a multipart image upload, runs the full analysis pipeline, and
/// returns the identification plus treatment narrative.
pub async fn post_analyze(State(state): State<GatewayState>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(Vec<u8>, Option<String>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("malformed multipart body: {e}"),
                );
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        if !cropsight_image::is_image_content_type(&content_type) {
            return error_response(StatusCode::BAD_REQUEST, "File must be an image");
        }

        let filename = field.file_name().map(str::to_string);
        match field.bytes().await {
            Ok(bytes) => upload = Some((bytes.to_vec(), filename)),
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("failed to read upload: {e}"),
                );
            }
        }
        break;
    }

    let Some((bytes, filename)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "missing 'file' field");
    };

    match state.pipeline.analyze(&bytes, filename).await {
        Ok(result) => {
            let response = AnalyzeResponse {
                success: true,
                crops: result.crops,
                diseases: result.diseases,
                ai_treatment: result.treatment,
                raw_data: result.raw,
                image_filename: result.image_filename,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => analysis_error(e),
    }
}

fn analysis_error(error: CropsightError) -> Response {
    match error {
        CropsightError::InvalidImage(detail) => {
            warn!(%detail, "rejected upload");
            error_response(StatusCode::BAD_REQUEST, format!("Invalid image file: {detail}"))
        }
        CropsightError::Timeout { duration } => {
            warn!(?duration, "identification timed out");
            error_response(
                StatusCode::GATEWAY_TIMEOUT,
                "Identification service timed out",
            )
        }
        CropsightError::RemoteService { status, detail } => {
            warn!(status, %detail, "identification service rejected request");
            error_response(StatusCode::BAD_GATEWAY, format!("API Error: {detail}"))
        }
        CropsightError::Network { message, .. } => {
            warn!(%message, "identification service unreachable");
            error_response(
                StatusCode::BAD_GATEWAY,
                format!("Identification service unreachable: {message}"),
            )
        }
        other => {
            error!(error = %other, "analysis failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

/// POST /send-to-chatbot
///
/// Formats the consultation summary from a prior analysis and persists it to
/// the handoff slot for the downstream chat process.
pub async fn post_send_to_chatbot(
    State(state): State<GatewayState>,
    Json(body): Json<ChatbotRequest>,
) -> Response {
    let result = cropsight_core::AnalysisResult {
        crops: body.crops,
        diseases: body.diseases,
        treatment: body.ai_treatment,
        image_filename: None,
        raw: body.raw_data.clone(),
    };
    let summary = consultation_summary(&result);

    match state
        .pipeline
        .store()
        .persist_consultation(&summary, &body.raw_data)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"success": true, "message": "Consultation data saved"})),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to persist consultation record");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /health
pub async fn get_health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "Crop Disease Identification API",
    }))
}

/// GET /api/info
pub async fn get_api_info() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Crop Disease Identification API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "REST API for crop disease identification with automatic AI treatment recommendations",
        "workflow": "1. Upload image -> 2. Identification -> 3. AI treatment -> 4. Combined results -> 5. Optional chatbot consultation",
        "endpoints": {
            "/analyze": "POST - Analyze crop image",
            "/send-to-chatbot": "POST - Hand analysis off for chatbot consultation",
            "/health": "GET - Health check",
            "/api/info": "GET - API information",
        },
    }))
}
