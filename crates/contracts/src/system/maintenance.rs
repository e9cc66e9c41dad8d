use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration
// ============================================================================

/// How the schedule window affects maintenance activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// No window required: maintenance is active whenever the switch is on.
    Off,
    /// Active only between `window_start` and `window_end` (inclusive).
    Scheduled,
    /// Active regardless of the window.
    Forced,
}

/// Status code reported on a blocked request. Only these two values are
/// accepted by the settings form; serialized as the bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum BlockStatusCode {
    ServiceUnavailable,
    Ok,
}

impl BlockStatusCode {
    pub fn as_u16(self) -> u16 {
        match self {
            BlockStatusCode::ServiceUnavailable => 503,
            BlockStatusCode::Ok => 200,
        }
    }
}

impl From<BlockStatusCode> for u16 {
    fn from(code: BlockStatusCode) -> u16 {
        code.as_u16()
    }
}

impl TryFrom<u16> for BlockStatusCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            503 => Ok(BlockStatusCode::ServiceUnavailable),
            200 => Ok(BlockStatusCode::Ok),
            other => Err(format!("Unsupported block status code: {}", other)),
        }
    }
}

/// Maintenance mode settings edited through the admin console and read by
/// the access gate on every inbound request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceConfig {
    /// Master switch.
    pub enabled: bool,
    #[serde(rename = "windowMode")]
    pub window_mode: WindowMode,
    /// Inclusive bounds, only meaningful when `window_mode = Scheduled`.
    /// `window_end > window_start` is enforced at save time, not here.
    #[serde(rename = "windowStart")]
    pub window_start: Option<DateTime<Utc>>,
    #[serde(rename = "windowEnd")]
    pub window_end: Option<DateTime<Utc>>,
    /// Exact-match client IPs permitted through; the literal `"*"` allows all.
    #[serde(rename = "allowlistIps")]
    pub allowlist_ips: Vec<String>,
    /// Path rules: exact match, trailing-`*` prefix match, or the literal `"*"`.
    #[serde(rename = "allowlistPaths")]
    pub allowlist_paths: Vec<String>,
    /// An authenticated administrator always passes.
    #[serde(rename = "adminBypass")]
    pub admin_bypass: bool,
    /// Block only checkout-related paths, leave browsing available.
    #[serde(rename = "blockCheckoutOnly")]
    pub block_checkout_only: bool,
    #[serde(rename = "returnStatusCode")]
    pub return_status_code: BlockStatusCode,
    /// Operator-authored maintenance page content, rendered on block.
    #[serde(rename = "pageTitle")]
    pub page_title: String,
    #[serde(rename = "pageBody")]
    pub page_body: String,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            window_mode: WindowMode::Off,
            window_start: None,
            window_end: None,
            allowlist_ips: Vec::new(),
            allowlist_paths: Vec::new(),
            admin_bypass: true,
            block_checkout_only: false,
            return_status_code: BlockStatusCode::ServiceUnavailable,
            page_title: "Site under maintenance".to_string(),
            page_body: "We are performing scheduled maintenance. Please check back soon."
                .to_string(),
        }
    }
}

// ============================================================================
// Evaluation request / decision
// ============================================================================

/// Descriptor of one inbound request, built by the gate per evaluation call.
/// `now` is injected explicitly so decisions stay deterministic under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRequest {
    #[serde(rename = "clientIp")]
    pub client_ip: String,
    pub path: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub now: DateTime<Utc>,
}

/// Outcome of evaluating one request against the current configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

// ============================================================================
// Admin API DTOs
// ============================================================================

/// Read-model for the console banner: is maintenance blocking traffic right now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceStatus {
    pub active: bool,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMaintenanceResponse {
    pub success: bool,
    pub message: String,
}

/// "Test access" probe sent from the settings form: a hypothetical request
/// evaluated against the saved configuration. `now` defaults to the server
/// clock when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    #[serde(rename = "clientIp")]
    pub client_ip: String,
    pub path: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}
