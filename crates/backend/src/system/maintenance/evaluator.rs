use chrono::{DateTime, Utc};
use contracts::system::maintenance::{
    AccessDecision, AccessRequest, MaintenanceConfig, WindowMode,
};

/// One allowlist entry, parsed from its raw string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule<'a> {
    /// The literal `"*"`: matches everything.
    Wildcard,
    /// Trailing-`*` entry: matches any value starting with the prefix.
    Prefix(&'a str),
    Exact(&'a str),
}

impl<'a> Rule<'a> {
    /// Path rules support the trailing-`*` prefix convention.
    fn parse_path(raw: &'a str) -> Self {
        let entry = raw.trim();
        if entry == "*" {
            Rule::Wildcard
        } else if let Some(prefix) = entry.strip_suffix('*') {
            Rule::Prefix(prefix)
        } else {
            Rule::Exact(entry)
        }
    }

    /// IP rules are exact strings; only the literal `"*"` is special.
    /// No CIDR ranges, no IPv6 normalization.
    fn parse_ip(raw: &'a str) -> Self {
        let entry = raw.trim();
        if entry == "*" {
            Rule::Wildcard
        } else {
            Rule::Exact(entry)
        }
    }

    fn matches(self, value: &str) -> bool {
        match self {
            Rule::Wildcard => true,
            Rule::Prefix(prefix) => value.starts_with(prefix),
            Rule::Exact(exact) => value == exact,
        }
    }
}

/// Trim whitespace; an empty path is treated as `/`.
fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Combine the master switch, window mode and current time into the single
/// "is maintenance currently blocking traffic" flag, with its justification.
pub fn effective_activation(config: &MaintenanceConfig, now: DateTime<Utc>) -> (bool, &'static str) {
    if !config.enabled {
        return (false, "Maintenance switch is OFF.");
    }
    match config.window_mode {
        WindowMode::Forced => (true, "Forced mode."),
        WindowMode::Off => (true, "No schedule window required."),
        WindowMode::Scheduled => match (config.window_start, config.window_end) {
            // Inclusive on both ends. A missing bound never matches; an
            // inverted window is unsatisfiable. Rejecting either is the
            // settings form's job, not ours.
            (Some(start), Some(end)) if start <= now && now <= end => {
                (true, "Within schedule window.")
            }
            _ => (false, "Outside schedule window."),
        },
    }
}

fn ip_allowlisted(entries: &[String], client_ip: &str) -> bool {
    entries
        .iter()
        .any(|raw| Rule::parse_ip(raw).matches(client_ip))
}

fn path_allowlisted(entries: &[String], path: &str) -> bool {
    entries
        .iter()
        .any(|raw| Rule::parse_path(raw).matches(path))
}

/// Decide whether maintenance mode blocks the given request.
///
/// Pure: no I/O, no mutation, no clock reads (`request.now` is injected by
/// the caller). Bypass rules apply in a fixed precedence order, first match
/// wins. Malformed configuration produces a best-effort comparison result,
/// never an error.
pub fn evaluate(config: &MaintenanceConfig, request: &AccessRequest) -> AccessDecision {
    let (active, activation_reason) = effective_activation(config, request.now);

    // When maintenance is not active every request passes, regardless of
    // IP, path or admin status.
    if !active {
        return AccessDecision {
            allowed: true,
            reason: format!("Allowed: {}", activation_reason),
            status_code: 200,
        };
    }

    let path = normalize_path(&request.path);

    if config.admin_bypass && request.is_admin {
        return allowed("Allowed: admin bypass.");
    }
    if ip_allowlisted(&config.allowlist_ips, &request.client_ip) {
        return allowed("Allowed: IP allowlisted.");
    }
    if path_allowlisted(&config.allowlist_paths, path) {
        return allowed("Allowed: path allowlisted.");
    }
    if config.block_checkout_only && !path.starts_with("/checkout") && !path.starts_with("/cart") {
        return allowed("Allowed: only checkout is blocked.");
    }

    AccessDecision {
        allowed: false,
        reason: "Blocked: maintenance active.".to_string(),
        status_code: config.return_status_code.as_u16(),
    }
}

fn allowed(reason: &str) -> AccessDecision {
    AccessDecision {
        allowed: true,
        reason: reason.to_string(),
        status_code: 200,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use contracts::system::maintenance::BlockStatusCode;

    fn request(ip: &str, path: &str, is_admin: bool) -> AccessRequest {
        AccessRequest {
            client_ip: ip.to_string(),
            path: path.to_string(),
            is_admin,
            now: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        }
    }

    fn active_config() -> MaintenanceConfig {
        MaintenanceConfig {
            enabled: true,
            window_mode: WindowMode::Off,
            admin_bypass: false,
            ..MaintenanceConfig::default()
        }
    }

    #[test]
    fn test_master_switch_off_allows_everything() {
        let config = MaintenanceConfig {
            enabled: false,
            window_mode: WindowMode::Forced,
            ..MaintenanceConfig::default()
        };
        let decision = evaluate(&config, &request("8.8.8.8", "/checkout/pay", false));
        assert!(decision.allowed);
        assert_eq!(decision.status_code, 200);
        assert!(decision.reason.contains("Maintenance switch is OFF"));
    }

    #[test]
    fn test_forced_mode_blocks_without_exceptions() {
        let config = MaintenanceConfig {
            window_mode: WindowMode::Forced,
            ..active_config()
        };
        let decision = evaluate(&config, &request("8.8.8.8", "/shop", false));
        assert!(!decision.allowed);
        assert_eq!(decision.reason, "Blocked: maintenance active.");
        assert_eq!(decision.status_code, 503);
    }

    #[test]
    fn test_schedule_window_boundaries_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 15, 14, 0, 0).unwrap();
        let config = MaintenanceConfig {
            window_mode: WindowMode::Scheduled,
            window_start: Some(start),
            window_end: Some(end),
            ..active_config()
        };

        let (active, _) = effective_activation(&config, start);
        assert!(active);
        let (active, _) = effective_activation(&config, end);
        assert!(active);
        let (active, reason) = effective_activation(&config, start - Duration::milliseconds(1));
        assert!(!active);
        assert_eq!(reason, "Outside schedule window.");
        let (active, _) = effective_activation(&config, end + Duration::milliseconds(1));
        assert!(!active);
    }

    #[test]
    fn test_outside_schedule_window_allows_everything() {
        let config = MaintenanceConfig {
            window_mode: WindowMode::Scheduled,
            window_start: Some(Utc.with_ymd_and_hms(2024, 6, 16, 0, 0, 0).unwrap()),
            window_end: Some(Utc.with_ymd_and_hms(2024, 6, 17, 0, 0, 0).unwrap()),
            ..active_config()
        };
        let decision = evaluate(&config, &request("8.8.8.8", "/checkout/pay", false));
        assert!(decision.allowed);
        assert!(decision.reason.contains("Outside schedule window"));
    }

    #[test]
    fn test_scheduled_without_bounds_never_activates() {
        let config = MaintenanceConfig {
            window_mode: WindowMode::Scheduled,
            ..active_config()
        };
        let decision = evaluate(&config, &request("8.8.8.8", "/shop", false));
        assert!(decision.allowed);
    }

    #[test]
    fn test_inverted_window_never_activates() {
        let config = MaintenanceConfig {
            window_mode: WindowMode::Scheduled,
            window_start: Some(Utc.with_ymd_and_hms(2024, 6, 16, 0, 0, 0).unwrap()),
            window_end: Some(Utc.with_ymd_and_hms(2024, 6, 14, 0, 0, 0).unwrap()),
            ..active_config()
        };
        let decision = evaluate(&config, &request("8.8.8.8", "/shop", false));
        assert!(decision.allowed);
    }

    #[test]
    fn test_admin_bypass_takes_precedence() {
        let config = MaintenanceConfig {
            admin_bypass: true,
            ..active_config()
        };
        let decision = evaluate(&config, &request("8.8.8.8", "/anything", true));
        assert!(decision.allowed);
        assert_eq!(decision.reason, "Allowed: admin bypass.");
    }

    #[test]
    fn test_admin_without_bypass_is_blocked() {
        let decision = evaluate(&active_config(), &request("8.8.8.8", "/shop", true));
        assert!(!decision.allowed);
    }

    #[test]
    fn test_wildcard_ip_allows_every_ip() {
        let config = MaintenanceConfig {
            allowlist_ips: vec!["*".to_string()],
            ..active_config()
        };
        let decision = evaluate(&config, &request("203.0.113.7", "/shop", false));
        assert!(decision.allowed);
        assert_eq!(decision.reason, "Allowed: IP allowlisted.");
    }

    #[test]
    fn test_wildcard_path_allows_every_path() {
        let config = MaintenanceConfig {
            allowlist_paths: vec!["*".to_string()],
            ..active_config()
        };
        let decision = evaluate(&config, &request("8.8.8.8", "/anything/at/all", false));
        assert!(decision.allowed);
        assert_eq!(decision.reason, "Allowed: path allowlisted.");
    }

    #[test]
    fn test_prefix_path_matching() {
        let config = MaintenanceConfig {
            allowlist_paths: vec!["/api/*".to_string()],
            ..active_config()
        };
        assert!(evaluate(&config, &request("8.8.8.8", "/api/v1/ping", false)).allowed);
        assert!(!evaluate(&config, &request("8.8.8.8", "/apiextra", false)).allowed);
    }

    #[test]
    fn test_ip_matching_is_exact() {
        let config = MaintenanceConfig {
            allowlist_ips: vec!["10.0.0.1".to_string()],
            ..active_config()
        };
        assert!(evaluate(&config, &request("10.0.0.1", "/shop", false)).allowed);
        assert!(!evaluate(&config, &request("10.0.0.10", "/shop", false)).allowed);
    }

    #[test]
    fn test_empty_path_normalizes_to_root() {
        let config = MaintenanceConfig {
            allowlist_paths: vec!["/".to_string()],
            ..active_config()
        };
        assert!(evaluate(&config, &request("8.8.8.8", "", false)).allowed);
        assert!(evaluate(&config, &request("8.8.8.8", "   ", false)).allowed);
    }

    #[test]
    fn test_checkout_only_blocks_checkout_and_cart() {
        let config = MaintenanceConfig {
            block_checkout_only: true,
            ..active_config()
        };
        let browsing = evaluate(&config, &request("8.8.8.8", "/products/shoes", false));
        assert!(browsing.allowed);
        assert_eq!(browsing.reason, "Allowed: only checkout is blocked.");

        assert!(!evaluate(&config, &request("8.8.8.8", "/checkout/pay", false)).allowed);
        assert!(!evaluate(&config, &request("8.8.8.8", "/cart/items", false)).allowed);
    }

    #[test]
    fn test_blocked_status_code_follows_config() {
        let mut config = active_config();
        let decision = evaluate(&config, &request("8.8.8.8", "/shop", false));
        assert_eq!(decision.status_code, 503);

        config.return_status_code = BlockStatusCode::Ok;
        let decision = evaluate(&config, &request("8.8.8.8", "/shop", false));
        assert!(!decision.allowed);
        assert_eq!(decision.status_code, 200);
    }

    // The four end-to-end scenarios share one realistic configuration.
    fn scenario_config() -> MaintenanceConfig {
        MaintenanceConfig {
            enabled: true,
            window_mode: WindowMode::Off,
            admin_bypass: true,
            allowlist_ips: vec!["127.0.0.1".to_string()],
            allowlist_paths: vec!["/health".to_string()],
            block_checkout_only: false,
            return_status_code: BlockStatusCode::ServiceUnavailable,
            ..MaintenanceConfig::default()
        }
    }

    #[test]
    fn test_scenario_unlisted_visitor_is_blocked() {
        let decision = evaluate(&scenario_config(), &request("8.8.8.8", "/shop", false));
        assert!(!decision.allowed);
        assert_eq!(decision.status_code, 503);
    }

    #[test]
    fn test_scenario_allowlisted_ip_passes() {
        let decision = evaluate(&scenario_config(), &request("127.0.0.1", "/shop", false));
        assert!(decision.allowed);
        assert_eq!(decision.status_code, 200);
        assert!(decision.reason.contains("IP allowlisted"));
    }

    #[test]
    fn test_scenario_allowlisted_path_passes() {
        let decision = evaluate(&scenario_config(), &request("8.8.8.8", "/health", false));
        assert!(decision.allowed);
        assert!(decision.reason.contains("path allowlisted"));
    }

    #[test]
    fn test_scenario_admin_passes() {
        let decision = evaluate(&scenario_config(), &request("8.8.8.8", "/admin", true));
        assert!(decision.allowed);
        assert!(decision.reason.contains("admin bypass"));
    }

    #[test]
    fn test_rule_parsing() {
        assert_eq!(Rule::parse_path("*"), Rule::Wildcard);
        assert_eq!(Rule::parse_path(" /api/* "), Rule::Prefix("/api/"));
        assert_eq!(Rule::parse_path("/health"), Rule::Exact("/health"));
        // IP entries never turn into prefix rules.
        assert_eq!(Rule::parse_ip("10.0.*"), Rule::Exact("10.0.*"));
        assert_eq!(Rule::parse_ip("*"), Rule::Wildcard);
    }
}
