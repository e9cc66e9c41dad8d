use axum::{http::StatusCode, Json};
use chrono::Utc;
use contracts::system::maintenance::{
    AccessDecision, AccessRequest, MaintenanceConfig, MaintenanceStatus, PreviewRequest,
    SaveMaintenanceResponse,
};

use crate::system::maintenance::service::{self, ServiceError};
use crate::system::maintenance::evaluator;

/// GET /api/system/maintenance
pub async fn get_config() -> Result<Json<MaintenanceConfig>, StatusCode> {
    match service::get().await {
        Ok(config) => Ok(Json(config)),
        Err(e) => {
            tracing::error!("Failed to load maintenance settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/system/maintenance
pub async fn save_config(
    Json(config): Json<MaintenanceConfig>,
) -> Result<Json<SaveMaintenanceResponse>, (StatusCode, Json<SaveMaintenanceResponse>)> {
    match service::save(config).await {
        Ok(()) => Ok(Json(SaveMaintenanceResponse {
            success: true,
            message: "Settings saved successfully".to_string(),
        })),
        Err(ServiceError::Invalid(e)) => Err((
            StatusCode::BAD_REQUEST,
            Json(SaveMaintenanceResponse {
                success: false,
                message: e.to_string(),
            }),
        )),
        Err(ServiceError::Storage(e)) => {
            tracing::error!("Failed to save maintenance settings: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveMaintenanceResponse {
                    success: false,
                    message: "Failed to save settings".to_string(),
                }),
            ))
        }
    }
}

/// GET /api/system/maintenance/status
pub async fn status() -> Result<Json<MaintenanceStatus>, StatusCode> {
    match service::status(Utc::now()).await {
        Ok(status) => Ok(Json(status)),
        Err(e) => {
            tracing::error!("Failed to compute maintenance status: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/system/maintenance/preview
///
/// Runs the evaluator against a hypothetical request so the settings form
/// can show what a visitor would see before the operator commits a change.
pub async fn preview(
    Json(probe): Json<PreviewRequest>,
) -> Result<Json<AccessDecision>, StatusCode> {
    let config = match service::get().await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load maintenance settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let request = AccessRequest {
        client_ip: probe.client_ip,
        path: probe.path,
        is_admin: probe.is_admin,
        now: probe.now.unwrap_or_else(Utc::now),
    };

    Ok(Json(evaluator::evaluate(&config, &request)))
}
