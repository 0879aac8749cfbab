//! 설정에 맞는 비밀 저장소 어댑터를 생성한다.

use anyhow::{Context, Result};
use tracing::debug;

use super::{FileSecretStore, MemorySecretStore};
use crate::application::ports::SecretStore;
use crate::application::settings::{Settings, StoreBackend};
use crate::infrastructure::secret_manager::SecretManagerClient;
use crate::infrastructure::settings::{resolve_store_token, store_dir};

pub fn build_secret_store(settings: &Settings) -> Result<Box<dyn SecretStore>> {
    let backend = settings.store_backend()?;
    debug!(backend = backend.as_str(), "building secret store");

    match backend {
        StoreBackend::File => Ok(Box::new(FileSecretStore::new(store_dir(&settings.store)))),
        StoreBackend::Memory => Ok(Box::new(MemorySecretStore::default())),
        StoreBackend::SecretManager => {
            let project_id = settings
                .store
                .project_id
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .context("store.project_id is required for the gsm backend")?;

            let token = resolve_store_token(&settings.store);
            if token.token.is_none() {
                // 인증 없이 요청하면 저장소가 401을 돌려준다.
                tracing::warn!(source = ?token.source, "no access token resolved for secret manager");
            }

            Ok(Box::new(SecretManagerClient::new(
                project_id.to_string(),
                token.token,
                settings.store.api_base.clone(),
            )))
        }
    }
}
