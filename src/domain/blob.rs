//! 저장소에 영속되는 느슨한 타입의 설정 문서.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::ConfigError;
use crate::domain::schema::{SchemaRegistry, SectionValues};

const VERSION_KEY: &str = "version";

/// `{"version": "...", "<section>": {...}, ...}` 형태의 설정 blob.
///
/// 동기화 이전에는 섹션/필드가 누락될 수 있다. 섹션 도입 이전의 평면 키는
/// `extra`에 그대로 보존된다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct ConfigBlob {
    pub version: String,
    pub sections: BTreeMap<String, SectionValues>,
    pub extra: Map<String, Value>,
}

impl ConfigBlob {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            sections: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn section(&self, name: &str) -> Option<&SectionValues> {
        self.sections.get(name)
    }

    /// 섹션 밖에 저장된 평면 값.
    pub fn legacy_value(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// 모든 스키마 섹션/필드 이름이 존재하는지 검사한다.
    pub fn is_complete_for(&self, registry: &SchemaRegistry) -> bool {
        registry.sections().iter().all(|schema| {
            self.section(&schema.name)
                .is_some_and(|values| schema.is_satisfied_by(values))
        })
    }

    /// 현재 버전이면서 완전한 blob인지 확인한다.
    pub fn is_current_for(&self, registry: &SchemaRegistry) -> bool {
        self.version == registry.current_version() && self.is_complete_for(registry)
    }

    pub fn to_json_string(&self) -> String {
        Value::from(self.clone()).to_string()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ConfigError::CorruptBlob(e.to_string()))?;
        Self::try_from(value)
    }
}

impl TryFrom<Value> for ConfigBlob {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(ConfigError::CorruptBlob(
                "top-level value is not a JSON object".to_string(),
            ));
        };

        let mut version = String::new();
        let mut sections = BTreeMap::new();
        let mut extra = Map::new();
        for (key, entry) in map {
            if key == VERSION_KEY {
                let Value::String(v) = entry else {
                    return Err(ConfigError::CorruptBlob(format!(
                        "'{VERSION_KEY}' must be a string, got {entry}"
                    )));
                };
                version = v;
                continue;
            }

            match entry {
                Value::Object(values) => {
                    sections.insert(key, values);
                }
                other => {
                    tracing::debug!(key = %key, "keeping legacy flat entry in blob");
                    extra.insert(key, other);
                }
            }
        }

        Ok(Self {
            version,
            sections,
            extra,
        })
    }
}

impl From<ConfigBlob> for Value {
    fn from(blob: ConfigBlob) -> Self {
        let mut map = blob.extra;
        map.insert(VERSION_KEY.to_string(), Value::String(blob.version));
        for (name, values) in blob.sections {
            map.insert(name, Value::Object(values));
        }
        Value::Object(map)
    }
}
