use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::{
    fetch,
    render::{self, GenError},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub image_url: Option<String>,
    #[serde(default)]
    pub headline: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok".into() })
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn error_response(err: &GenError) -> ApiError {
    let status = match err {
        GenError::BadRequest(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

pub async fn generate(
    State(st): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    match run_pipeline(&st, &req).await {
        Ok(jpeg) => Ok(([(header::CONTENT_TYPE, "image/jpeg")], jpeg)),
        Err(e) => {
            warn!(error = %e, "generate failed");
            Err(error_response(&e))
        }
    }
}

async fn run_pipeline(st: &AppState, req: &GenerateRequest) -> Result<Vec<u8>, GenError> {
    let url = req
        .image_url
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GenError::BadRequest("no image_url provided".into()))?;

    let bytes = fetch::download_image(&st.http, url).await?;
    let source = image::load_from_memory(&bytes)
        .map_err(|e| GenError::Decode(format!("invalid image: {e}")))?
        .to_rgb8();

    render::generate_card(&source, &req.headline, &st.font, st.render)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_variant_maps_to_one_status() {
        let cases = [
            (
                GenError::BadRequest("no image_url provided".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                GenError::Fetch("refused".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GenError::Decode("not an image".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GenError::Encode("jpeg".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GenError::Internal("font".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, want) in cases {
            let (status, Json(body)) = error_response(&err);
            assert_eq!(status, want, "{err}");
            assert_eq!(body["error"], err.to_string());
        }
    }
}
