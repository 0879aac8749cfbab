//! 애플리케이션 기본 설정 스키마(단일 등록 지점).
//!
//! 필드를 추가하면 버전을 올린다. 저장된 blob의 버전이 다르면
//! 누락된 필드만 채워 새 버전으로 저장된다.

use std::sync::LazyLock;

use serde_json::Value;

use crate::domain::error::ConfigResult;
use crate::domain::schema::{FieldSpec, SchemaRegistry, SectionSchema, SectionValues, ValueType};

pub const CURRENT_CFG_VERSION: &str = "0.0.3";
pub const DEFAULT_SECRET_NAME: &str = "cfg";
pub const DEFAULT_AI_MODEL: &str = "gemini-1.5-flash";

pub const OPEN_WEATHER_SECTION: &str = "open_weather_cfg";
pub const GOOGLE_CALENDAR_SECTION: &str = "google_calendar_cfg";
pub const GOOGLE_AI_SECTION: &str = "google_ai_cfg";

/// 로컬 비밀 파일(조회 후 삭제되는 임시 파일).
const SECRETS_SOURCE: &str = "file:secrets.json";

static BUILTIN: LazyLock<SchemaRegistry> = LazyLock::new(|| {
    SchemaRegistry::new(
        CURRENT_CFG_VERSION,
        vec![
            SectionSchema::new(
                OPEN_WEATHER_SECTION,
                vec![
                    FieldSpec::prompt("lat", ValueType::Float, "Enter your latitude: "),
                    FieldSpec::prompt("long", ValueType::Float, "Enter your longitude: "),
                    FieldSpec::lookup(
                        "api_key",
                        ValueType::String,
                        "openweather_api_key",
                        SECRETS_SOURCE,
                    ),
                ],
            ),
            SectionSchema::new(
                GOOGLE_CALENDAR_SECTION,
                vec![
                    FieldSpec::prompt(
                        "calender_id",
                        ValueType::String,
                        "Enter your Google Calendar id: ",
                    ),
                    FieldSpec::prompt(
                        "timezone",
                        ValueType::String,
                        "Enter your timezone (e.g. Europe/London): ",
                    ),
                ],
            ),
            SectionSchema::new(
                GOOGLE_AI_SECTION,
                vec![
                    FieldSpec::lookup(
                        "google_ai_id",
                        ValueType::String,
                        "google_ai_id",
                        SECRETS_SOURCE,
                    ),
                    FieldSpec::computed("model", ValueType::String, default_ai_model),
                ],
            ),
        ],
    )
});

/// 프로세스 전역 기본 스키마.
pub fn builtin() -> &'static SchemaRegistry {
    &BUILTIN
}

fn default_ai_model(_section: &SectionValues) -> ConfigResult<Value> {
    Ok(Value::String(DEFAULT_AI_MODEL.to_string()))
}
