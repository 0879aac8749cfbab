//! 강타입 설정 객체(기본 스키마와 1:1 대응).

use serde::{Deserialize, Serialize};

use crate::domain::blob::ConfigBlob;
use crate::domain::error::{ConfigError, ConfigResult};
use crate::domain::schema::SchemaRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub version: String,
    pub open_weather_cfg: OpenWeatherCfg,
    pub google_calendar_cfg: GoogleCalendarCfg,
    pub google_ai_cfg: GoogleAiCfg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWeatherCfg {
    pub lat: f64,
    pub long: f64,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleCalendarCfg {
    pub calender_id: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleAiCfg {
    pub google_ai_id: String,
    pub model: String,
}

impl ResolvedConfig {
    /// 현재 버전의 완전한 blob만 강타입 객체로 변환한다.
    pub fn decode(blob: &ConfigBlob, registry: &SchemaRegistry) -> ConfigResult<Self> {
        if blob.version != registry.current_version() {
            return Err(ConfigError::SchemaMismatch(format!(
                "blob version '{}' != schema version '{}'",
                blob.version,
                registry.current_version()
            )));
        }

        for schema in registry.sections() {
            let Some(values) = blob.section(&schema.name) else {
                return Err(ConfigError::SchemaMismatch(format!(
                    "missing section '{}'",
                    schema.name
                )));
            };
            for field in &schema.fields {
                match values.get(&field.name) {
                    Some(value) if field.value_type.matches(value) => {}
                    Some(value) => {
                        return Err(ConfigError::SchemaMismatch(format!(
                            "{}.{} has unexpected value {value}",
                            schema.name, field.name
                        )));
                    }
                    None => {
                        return Err(ConfigError::SchemaMismatch(format!(
                            "missing field {}.{}",
                            schema.name, field.name
                        )));
                    }
                }
            }
        }

        serde_json::from_value(blob.clone().into())
            .map_err(|e| ConfigError::SchemaMismatch(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::registry::{CURRENT_CFG_VERSION, builtin};

    fn complete_blob() -> ConfigBlob {
        serde_json::from_value(json!({
            "version": CURRENT_CFG_VERSION,
            "open_weather_cfg": {"lat": 54.5, "long": -0.1, "api_key": "ow"},
            "google_calendar_cfg": {"calender_id": "cal", "timezone": "Europe/London"},
            "google_ai_cfg": {"google_ai_id": "ai", "model": "gemini-1.5-flash", "stale": true}
        }))
        .unwrap()
    }

    #[test]
    fn decodes_complete_blob() {
        let cfg = ResolvedConfig::decode(&complete_blob(), builtin()).unwrap();
        assert_eq!(cfg.open_weather_cfg.lat, 54.5);
        assert_eq!(cfg.open_weather_cfg.long, -0.1);
        assert_eq!(cfg.google_calendar_cfg.timezone, "Europe/London");
        assert_eq!(cfg.google_ai_cfg.model, "gemini-1.5-flash");
    }

    #[test]
    fn integer_coordinates_decode_as_float() {
        let mut blob = complete_blob();
        blob.sections
            .get_mut("open_weather_cfg")
            .unwrap()
            .insert("lat".to_string(), json!(54));
        let cfg = ResolvedConfig::decode(&blob, builtin()).unwrap();
        assert_eq!(cfg.open_weather_cfg.lat, 54.0);
    }

    #[test]
    fn rejects_stale_version() {
        let mut blob = complete_blob();
        blob.version = "0.0.2".to_string();
        let err = ResolvedConfig::decode(&blob, builtin()).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaMismatch(_)));
    }

    #[test]
    fn rejects_wrongly_typed_field() {
        let mut blob = complete_blob();
        blob.sections
            .get_mut("open_weather_cfg")
            .unwrap()
            .insert("lat".to_string(), json!("54.5"));
        let err = ResolvedConfig::decode(&blob, builtin()).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaMismatch(_)));
    }

    #[test]
    fn rejects_missing_field() {
        let mut blob = complete_blob();
        blob.sections
            .get_mut("google_calendar_cfg")
            .unwrap()
            .remove("timezone");
        let err = ResolvedConfig::decode(&blob, builtin()).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaMismatch(_)));
    }
}
