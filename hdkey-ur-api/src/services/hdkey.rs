//! `POST /api/gen`: export a mnemonic's account key as `ur:crypto-hdkey` + QR

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use hdkey_ur::export::DEFAULT_PATH;
use hdkey_ur::{export_hdkey, ExportRequest, HdKeyExport};

use crate::error::ApiError;
use crate::qr;
use crate::state::AppState;

/// Request body. Every field but `mnemonic` is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub mnemonic: String,
    #[serde(default)]
    pub passphrase: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Number or numeric string; anything unusable falls back to the default
    #[serde(default)]
    pub qr_scale: Option<serde_json::Value>,
    /// Forces the master fingerprint, e.g. `281d1d2b`
    #[serde(default)]
    pub force_master_fp_hex: String,
    /// Forces the parent fingerprint, e.g. `63323166`
    #[serde(default)]
    pub force_parent_fp_hex: String,
    /// `auto`, `m44h60h` or a derivation path
    #[serde(default = "default_parent_from")]
    pub parent_from: String,
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

fn default_parent_from() -> String {
    "auto".to_string()
}

impl GenerateRequest {
    fn into_export_request(self, max_fragment_len: usize) -> Result<ExportRequest, ApiError> {
        Ok(ExportRequest {
            mnemonic: self.mnemonic,
            passphrase: self.passphrase,
            path: self.path,
            parent_source: self.parent_from.parse()?,
            master_fingerprint_override: Some(self.force_master_fp_hex),
            parent_fingerprint_override: Some(self.force_parent_fp_hex),
            max_fragment_len,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub export: HdKeyExport,
    pub qr_data_url: String,
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let scale = qr::clamp_scale(qr::scale_from_value(request.qr_scale.as_ref()));
    let export_request = request.into_export_request(state.config.max_fragment_len)?;

    // Seed stretching and QR rendering are CPU bound
    let response = tokio::task::spawn_blocking(move || -> Result<GenerateResponse, ApiError> {
        let export = export_hdkey(&export_request)?;
        let qr_data_url = qr::render_data_url(&export.ur, scale)?;
        Ok(GenerateResponse { export, qr_data_url })
    })
    .await
    .map_err(|e| ApiError::Internal(format!("export task failed: {}", e)))??;

    tracing::info!(
        path = %response.export.path,
        parent_path = %response.export.parent_path,
        master_fp = %response.export.master_fingerprint,
        parent_fp = %response.export.parent_fingerprint,
        "exported crypto-hdkey"
    );

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::ServerConfig;
    use crate::services::router;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    async fn post(body: String) -> (StatusCode, Value) {
        let app = router(Arc::new(AppState::new(ServerConfig::default())));
        let request = Request::builder()
            .method("POST")
            .uri("/api/gen")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_generate_defaults() {
        let (status, body) = post(json!({ "mnemonic": ABANDON }).to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["ur"].as_str().unwrap().starts_with("UR:CRYPTO-HDKEY/"));
        assert_eq!(body["path"], "m/44'/60'/0'");
        assert_eq!(body["parentPath"], "m/44'/60'");
        assert_eq!(body["masterFpHex"], "73c5da0a");
        assert_eq!(body["parentFpHex"].as_str().unwrap().len(), 8);
        assert!(body["qrDataUrl"].as_str().unwrap().starts_with("data:image/svg+xml;base64,"));
    }

    #[tokio::test]
    async fn test_generate_with_overrides_and_forced_parent() {
        let (status, body) = post(
            json!({
                "mnemonic": ABANDON,
                "path": "m/44'/60'/0'/0/0",
                "forceMasterFpHex": "281d1d2b",
                "forceParentFpHex": "63323166",
                "parentFrom": "m44h60h",
                "qrScale": 40
            })
            .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["parentPath"], "m/44'/60'");
        assert_eq!(body["masterFpHex"], "281d1d2b");
        assert_eq!(body["parentFpHex"], "63323166");
    }

    #[tokio::test]
    async fn test_loose_qr_scale_never_fails_export() {
        for scale in [json!("5"), json!("huge"), json!(null), json!({ "px": 4 })] {
            let (status, body) = post(json!({ "mnemonic": ABANDON, "qrScale": scale }).to_string()).await;

            assert_eq!(status, StatusCode::OK, "{}", scale);
            assert_eq!(body["masterFpHex"], "73c5da0a");
            assert!(body["qrDataUrl"].as_str().unwrap().starts_with("data:image/svg+xml;base64,"));
        }
    }

    #[tokio::test]
    async fn test_client_errors() {
        let cases = [
            json!({ "mnemonic": "not a real mnemonic" }),
            json!({ "mnemonic": ABANDON, "path": "m/abc" }),
            json!({ "mnemonic": ABANDON, "forceParentFpHex": "zz" }),
            json!({ "mnemonic": ABANDON, "parentFrom": "sideways" }),
            json!({ "mnemonic": ABANDON, "path": "m" }),
        ];

        for case in cases {
            let (status, body) = post(case.to_string()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", case);
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (status, body) = post("{ not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(Arc::new(AppState::new(ServerConfig::default())));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
