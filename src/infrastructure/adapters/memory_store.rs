//! 프로세스 내 메모리 비밀 저장소 어댑터.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::SecretStore;
use crate::domain::blob::ConfigBlob;
use crate::domain::error::{ConfigError, ConfigResult};

/// 이름별 blob 버전 목록을 메모리에 보관한다(테스트/드라이런용).
#[derive(Default)]
pub struct MemorySecretStore {
    secrets: Mutex<HashMap<String, Vec<ConfigBlob>>>,
}

impl MemorySecretStore {
    /// 저장된 모든 버전(오래된 순).
    pub fn versions(&self, name: &str) -> Vec<ConfigBlob> {
        self.secrets
            .lock()
            .map(|secrets| secrets.get(name).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn with_secrets<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, Vec<ConfigBlob>>) -> ConfigResult<T>,
    ) -> ConfigResult<T> {
        let mut secrets = self
            .secrets
            .lock()
            .map_err(|_| ConfigError::StoreUnavailable("memory store lock poisoned".to_string()))?;
        f(&mut secrets)
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn read_latest(&self, name: &str) -> ConfigResult<Option<ConfigBlob>> {
        self.with_secrets(|secrets| Ok(secrets.get(name).and_then(|v| v.last().cloned())))
    }

    async fn create(&self, name: &str) -> ConfigResult<()> {
        self.with_secrets(|secrets| {
            if secrets.contains_key(name) {
                return Err(ConfigError::SecretExists(name.to_string()));
            }
            secrets.insert(name.to_string(), Vec::new());
            Ok(())
        })
    }

    async fn append_version(&self, name: &str, blob: &ConfigBlob) -> ConfigResult<()> {
        self.with_secrets(|secrets| {
            let Some(versions) = secrets.get_mut(name) else {
                return Err(ConfigError::StoreUnavailable(format!(
                    "secret '{name}' does not exist"
                )));
            };
            versions.push(blob.clone());
            Ok(())
        })
    }
}
