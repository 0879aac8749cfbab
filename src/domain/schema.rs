//! 설정 스키마 정의(섹션/필드/값 소스).
//!
//! 스키마는 프로세스 전역에서 한 번 구성되는 순수 데이터다.
//! 잘못 구성된 스키마는 런타임 오류가 아니라 프로그래밍 오류로 취급한다.

use std::collections::HashSet;

use serde_json::{Map, Number, Value};

use crate::domain::error::{ConfigError, ConfigResult};

/// 섹션 하나의 느슨한 값 맵(JSON object).
pub type SectionValues = Map<String, Value>;

/// 같은 섹션의 해석된 값으로부터 필드 값을 계산하는 함수.
pub type ComputeFn = fn(&SectionValues) -> ConfigResult<Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Float,
}

impl ValueType {
    /// 입력 문자열을 선언 타입의 JSON 값으로 변환한다.
    pub fn coerce(self, field: &str, raw: &str) -> ConfigResult<Value> {
        match self {
            ValueType::String => Ok(Value::String(raw.to_string())),
            ValueType::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| ConfigError::MalformedInput {
                    field: field.to_string(),
                    input: raw.to_string(),
                }),
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Float => value.is_number(),
        }
    }
}

/// 누락된 필드 값을 어디서 가져올지 나타낸다.
#[derive(Debug, Clone)]
pub enum FieldSource {
    /// 사용자에게 프롬프트 문구로 값을 요청한다.
    UserPrompt(String),
    /// 외부 소스(`source_ref`)에서 `key`를 조회한다.
    ExternalLookup { key: String, source_ref: String },
    /// 같은 섹션의 값으로부터 계산한다.
    Computed(ComputeFn),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub value_type: ValueType,
    pub source: FieldSource,
}

impl FieldSpec {
    pub fn prompt(name: &str, value_type: ValueType, text: &str) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            source: FieldSource::UserPrompt(text.to_string()),
        }
    }

    pub fn lookup(name: &str, value_type: ValueType, key: &str, source_ref: &str) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            source: FieldSource::ExternalLookup {
                key: key.to_string(),
                source_ref: source_ref.to_string(),
            },
        }
    }

    pub fn computed(name: &str, value_type: ValueType, compute: ComputeFn) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            source: FieldSource::Computed(compute),
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.source, FieldSource::Computed(_))
    }
}

#[derive(Debug, Clone)]
pub struct SectionSchema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl SectionSchema {
    /// # Panics
    /// 필드 이름이 중복되면 패닉한다.
    pub fn new(name: &str, fields: Vec<FieldSpec>) -> Self {
        let mut seen = HashSet::new();
        for field in &fields {
            assert!(
                seen.insert(field.name.as_str()),
                "duplicate field '{}' in section '{name}'",
                field.name
            );
        }

        Self {
            name: name.to_string(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 모든 필드 이름이 존재하는지 검사한다(추가 필드는 허용).
    pub fn is_satisfied_by(&self, values: &SectionValues) -> bool {
        self.fields.iter().all(|f| values.contains_key(&f.name))
    }
}

/// 현재 스키마 버전과 섹션 목록.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    version: String,
    sections: Vec<SectionSchema>,
}

impl SchemaRegistry {
    /// # Panics
    /// 버전이 비어 있거나 섹션 이름이 중복되면 패닉한다.
    pub fn new(version: &str, sections: Vec<SectionSchema>) -> Self {
        assert!(!version.trim().is_empty(), "schema version must not be empty");

        let mut seen = HashSet::new();
        for section in &sections {
            assert!(
                seen.insert(section.name.as_str()),
                "duplicate section '{}'",
                section.name
            );
        }

        Self {
            version: version.to_string(),
            sections,
        }
    }

    pub fn current_version(&self) -> &str {
        &self.version
    }

    pub fn sections(&self) -> &[SectionSchema] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&SectionSchema> {
        self.sections.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn float_coercion_accepts_surrounding_whitespace() {
        let value = ValueType::Float.coerce("lat", " 54.5\n").unwrap();
        assert_eq!(value, json!(54.5));
    }

    #[test]
    fn float_coercion_rejects_text() {
        let err = ValueType::Float.coerce("lat", "north").unwrap_err();
        assert_eq!(
            err,
            ConfigError::MalformedInput {
                field: "lat".to_string(),
                input: "north".to_string(),
            }
        );
    }

    #[test]
    fn float_coercion_rejects_non_finite() {
        assert!(ValueType::Float.coerce("lat", "NaN").is_err());
        assert!(ValueType::Float.coerce("lat", "inf").is_err());
    }

    #[test]
    fn string_coercion_keeps_text_verbatim() {
        let value = ValueType::String.coerce("id", "  abc ").unwrap();
        assert_eq!(value, json!("  abc "));
    }

    #[test]
    fn section_satisfied_by_superset() {
        let section = SectionSchema::new(
            "s",
            vec![FieldSpec::prompt("a", ValueType::String, "a?")],
        );
        let values = json!({"a": "x", "stale": 1});
        assert!(section.is_satisfied_by(values.as_object().unwrap()));
        assert!(!section.is_satisfied_by(&SectionValues::new()));
    }

    #[test]
    #[should_panic(expected = "duplicate field")]
    fn duplicate_field_names_panic() {
        SectionSchema::new(
            "s",
            vec![
                FieldSpec::prompt("a", ValueType::String, "a?"),
                FieldSpec::prompt("a", ValueType::Float, "a?"),
            ],
        );
    }

    #[test]
    #[should_panic(expected = "duplicate section")]
    fn duplicate_section_names_panic() {
        SchemaRegistry::new(
            "1",
            vec![SectionSchema::new("s", vec![]), SectionSchema::new("s", vec![])],
        );
    }
}
