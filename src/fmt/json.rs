#[cfg(feature = "json")]
use serde::Serialize;

use crate::error::StratumdError;
use crate::stats::ServeStats;

#[cfg(feature = "json")]
#[derive(Serialize)]
pub struct JsonSummary<'a> {
    pub schema_version: u8,
    pub stopped_at: String,
    pub stats: &'a ServeStats,
}

/// Serialize the shutdown summary into a JSON string.
#[allow(unused_variables)]
pub fn stats_to_json(stats: &ServeStats, pretty: bool) -> Result<String, StratumdError> {
    #[cfg(feature = "json")]
    {
        let summary = JsonSummary {
            schema_version: 1,
            stopped_at: chrono::Utc::now().to_rfc3339(),
            stats,
        };
        let text = if pretty {
            serde_json::to_string_pretty(&summary)
                .map_err(|e| StratumdError::Config(e.to_string()))?
        } else {
            serde_json::to_string(&summary).map_err(|e| StratumdError::Config(e.to_string()))?
        };
        Ok(text)
    }
    #[cfg(not(feature = "json"))]
    {
        Err(StratumdError::Config("json feature disabled".into()))
    }
}
