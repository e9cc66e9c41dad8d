use chrono::Utc;
use contracts::system::maintenance::MaintenanceConfig;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::data::db::get_connection;

/// Row key in the sys_settings table under which the configuration lives,
/// serialized as one JSON document.
const SETTINGS_KEY: &str = "maintenance_config";

pub async fn load() -> anyhow::Result<Option<MaintenanceConfig>> {
    let conn = get_connection();

    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [SETTINGS_KEY.into()],
        ))
        .await?;

    match row {
        Some(row) => {
            let value: String = row.try_get("", "value")?;
            let config: MaintenanceConfig = serde_json::from_str(&value)?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

pub async fn save(config: &MaintenanceConfig) -> anyhow::Result<()> {
    let conn = get_connection();

    let value = serde_json::to_string(config)?;
    let now = Utc::now().to_rfc3339();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        r#"
            INSERT INTO sys_settings (key, value, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
        "#,
        [
            SETTINGS_KEY.into(),
            value.into(),
            "Maintenance mode configuration".into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await?;

    Ok(())
}
