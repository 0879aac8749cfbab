//! 섹션 단위 필드 해석기.
//!
//! 기존 값은 절대 덮어쓰지 않고, 누락된 필드만 소스별로 채운다.

use serde_json::Value;
use tracing::debug;

use crate::application::ports::{ExternalLookup, InteractivePrompt};
use crate::domain::error::{ConfigError, ConfigResult};
use crate::domain::schema::{FieldSource, FieldSpec, SectionSchema, SectionValues};

/// 해석이 끝난 섹션 값과 조회에 사용된 소스 목록.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSection {
    pub values: SectionValues,
    pub consumed_sources: Vec<String>,
}

pub struct FieldResolver<'a> {
    pub prompt: &'a dyn InteractivePrompt,
    pub lookup: &'a dyn ExternalLookup,
}

impl FieldResolver<'_> {
    /// 부분 값 맵을 스키마의 모든 필드가 채워진 새 맵으로 만든다.
    /// 입력 맵은 변경하지 않는다.
    pub fn resolve_section(
        &self,
        spec: &SectionSchema,
        partial: Option<&SectionValues>,
    ) -> ConfigResult<ResolvedSection> {
        let mut values = partial.cloned().unwrap_or_default();
        let mut consumed_sources = Vec::new();

        // 계산 필드는 같은 섹션의 나머지 필드가 모두 채워진 뒤 평가한다.
        let ordered = spec
            .fields
            .iter()
            .filter(|f| !f.is_computed())
            .chain(spec.fields.iter().filter(|f| f.is_computed()));

        for field in ordered {
            if values.contains_key(&field.name) {
                continue;
            }

            let value = self.source_value(&spec.name, field, &values, &mut consumed_sources)?;
            values.insert(field.name.clone(), value);
        }

        Ok(ResolvedSection {
            values,
            consumed_sources,
        })
    }

    fn source_value(
        &self,
        section: &str,
        field: &FieldSpec,
        resolved: &SectionValues,
        consumed_sources: &mut Vec<String>,
    ) -> ConfigResult<Value> {
        match &field.source {
            FieldSource::UserPrompt(text) => {
                debug!(section, field = %field.name, "prompting for missing field");
                let raw = self.prompt.prompt(text)?;
                field.value_type.coerce(&field.name, &raw)
            }
            FieldSource::ExternalLookup { key, source_ref } => {
                debug!(section, field = %field.name, source_ref = %source_ref, "looking up missing field");
                let raw = self.lookup.lookup(source_ref, key)?;
                if !consumed_sources.contains(source_ref) {
                    consumed_sources.push(source_ref.clone());
                }
                field.value_type.coerce(&field.name, &raw)
            }
            FieldSource::Computed(compute) => {
                let value = compute(resolved)?;
                if !field.value_type.matches(&value) {
                    return Err(ConfigError::SchemaMismatch(format!(
                        "computed {section}.{} produced {value}",
                        field.name
                    )));
                }
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::test_support::{MapLookup, ScriptedPrompt};
    use crate::domain::schema::ValueType;

    fn label(section: &SectionValues) -> ConfigResult<Value> {
        let host = section.get("host").and_then(Value::as_str).unwrap_or("");
        let port = section.get("port").and_then(Value::as_f64).unwrap_or(0.0);
        Ok(json!(format!("{host}:{port}")))
    }

    fn server_section() -> SectionSchema {
        SectionSchema::new(
            "server",
            vec![
                FieldSpec::computed("label", ValueType::String, label),
                FieldSpec::prompt("host", ValueType::String, "host?"),
                FieldSpec::prompt("port", ValueType::Float, "port?"),
                FieldSpec::lookup("token", ValueType::String, "token", "file:secrets.json"),
            ],
        )
    }

    #[test]
    fn fills_every_missing_field() {
        let prompt = ScriptedPrompt::new(&["example.org", "8080"]);
        let lookup = MapLookup::default().with("file:secrets.json", "token", "t0k");
        let resolver = FieldResolver {
            prompt: &prompt,
            lookup: &lookup,
        };

        let out = resolver.resolve_section(&server_section(), None).unwrap();

        assert_eq!(
            Value::Object(out.values),
            json!({"host": "example.org", "port": 8080.0, "token": "t0k", "label": "example.org:8080"})
        );
        assert_eq!(out.consumed_sources, vec!["file:secrets.json".to_string()]);
        assert_eq!(prompt.asked(), vec!["host?", "port?"]);
    }

    #[test]
    fn keeps_existing_values_and_input_untouched() {
        let prompt = ScriptedPrompt::new(&["9090"]);
        let lookup = MapLookup::default().with("file:secrets.json", "token", "new");
        let resolver = FieldResolver {
            prompt: &prompt,
            lookup: &lookup,
        };
        let partial = json!({"host": "old.example", "token": "old", "extra": 1})
            .as_object()
            .cloned()
            .unwrap();
        let before = partial.clone();

        let out = resolver
            .resolve_section(&server_section(), Some(&partial))
            .unwrap();

        assert_eq!(partial, before);
        assert_eq!(out.values["host"], json!("old.example"));
        assert_eq!(out.values["token"], json!("old"));
        assert_eq!(out.values["extra"], json!(1));
        assert_eq!(out.values["label"], json!("old.example:9090"));
        assert!(out.consumed_sources.is_empty());
        assert_eq!(prompt.asked(), vec!["port?"]);
    }

    #[test]
    fn malformed_float_is_reported() {
        let prompt = ScriptedPrompt::new(&["example.org", "eighty"]);
        let lookup = MapLookup::default();
        let resolver = FieldResolver {
            prompt: &prompt,
            lookup: &lookup,
        };

        let err = resolver.resolve_section(&server_section(), None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MalformedInput {
                field: "port".to_string(),
                input: "eighty".to_string(),
            }
        );
    }

    #[test]
    fn lookup_failure_aborts_section() {
        let prompt = ScriptedPrompt::new(&["example.org", "80"]);
        let lookup = MapLookup::default();
        let resolver = FieldResolver {
            prompt: &prompt,
            lookup: &lookup,
        };

        let err = resolver.resolve_section(&server_section(), None).unwrap_err();
        assert!(matches!(err, ConfigError::Lookup { ref key, .. } if key == "token"));
    }

    #[test]
    fn computed_value_of_wrong_type_is_rejected() {
        fn number(_: &SectionValues) -> ConfigResult<Value> {
            Ok(json!(1))
        }
        let section = SectionSchema::new(
            "s",
            vec![FieldSpec::computed("name", ValueType::String, number)],
        );
        let prompt = ScriptedPrompt::default();
        let lookup = MapLookup::default();
        let resolver = FieldResolver {
            prompt: &prompt,
            lookup: &lookup,
        };

        let err = resolver.resolve_section(&section, None).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaMismatch(_)));
    }
}
