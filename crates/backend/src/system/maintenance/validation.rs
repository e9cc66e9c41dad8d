use contracts::system::maintenance::{MaintenanceConfig, WindowMode};
use thiserror::Error;

/// Rejections raised when an administrator saves the maintenance settings.
/// The evaluator itself never validates; a malformed window that slips past
/// this check simply produces whatever comparison result it implies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Schedule window end must be after its start")]
    InvalidWindow,
    #[error("{field} must not be empty")]
    MissingRequiredText { field: &'static str },
}

pub fn validate(config: &MaintenanceConfig) -> Result<(), ValidationError> {
    if config.window_mode == WindowMode::Scheduled {
        match (config.window_start, config.window_end) {
            (Some(start), Some(end)) if end > start => {}
            _ => return Err(ValidationError::InvalidWindow),
        }
    }
    if config.page_title.trim().is_empty() {
        return Err(ValidationError::MissingRequiredText {
            field: "Page title",
        });
    }
    if config.page_body.trim().is_empty() {
        return Err(ValidationError::MissingRequiredText { field: "Page body" });
    }
    Ok(())
}
