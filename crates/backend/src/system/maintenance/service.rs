use chrono::{DateTime, Utc};
use contracts::system::maintenance::{MaintenanceConfig, MaintenanceStatus};
use thiserror::Error;

use super::evaluator;
use super::repository;
use super::validation::{self, ValidationError};

/// Save failures split so the handler can answer 400 for operator mistakes
/// and 500 for storage trouble.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Current configuration, falling back to the disabled default when the
/// settings row has never been saved.
pub async fn get() -> anyhow::Result<MaintenanceConfig> {
    Ok(repository::load().await?.unwrap_or_default())
}

/// Validate and persist settings coming from the admin form.
pub async fn save(config: MaintenanceConfig) -> Result<(), ServiceError> {
    validation::validate(&config)?;
    repository::save(&config).await?;
    tracing::info!(
        enabled = config.enabled,
        "Maintenance configuration saved"
    );
    Ok(())
}

/// Activation-only view for the console banner: is maintenance blocking
/// traffic at `now`, and why.
pub async fn status(now: DateTime<Utc>) -> anyhow::Result<MaintenanceStatus> {
    let config = get().await?;
    let (active, reason) = evaluator::effective_activation(&config, now);
    Ok(MaintenanceStatus {
        active,
        reason: reason.to_string(),
    })
}
