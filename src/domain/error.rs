//! 설정 동기화 코어가 반환하는 오류 타입.

use thiserror::Error;

/// 조회/프롬프트/저장소/디코딩 단계에서 발생하는 오류.
///
/// 코어는 재시도하지 않으며, 모든 오류를 호출자에게 그대로 전파한다.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("secret store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("secret '{0}' already exists")]
    SecretExists(String),

    #[error("invalid secret name '{0}' (letters, digits, '-' and '_' only)")]
    InvalidSecretName(String),

    #[error("stored config blob is corrupt: {0}")]
    CorruptBlob(String),

    #[error("lookup of '{key}' in '{source_ref}' failed: {reason}")]
    Lookup {
        source_ref: String,
        key: String,
        reason: String,
    },

    #[error("malformed input for field '{field}': {input:?}")]
    MalformedInput { field: String, input: String },

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("config does not match schema: {0}")]
    SchemaMismatch(String),
}

impl ConfigError {
    pub fn lookup(source_ref: &str, key: &str, reason: impl Into<String>) -> Self {
        Self::Lookup {
            source_ref: source_ref.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// 코어 연산 결과 타입.
pub type ConfigResult<T> = Result<T, ConfigError>;
