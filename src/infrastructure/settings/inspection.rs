//! 적용 설정 진단(inspection) 뷰 모델.

use serde::Serialize;

use super::loader::LoadedSettings;
use super::resolve::{lookup_dir, resolve_store_token, store_dir};
use crate::application::settings::StoreBackend;

#[derive(Debug, Clone, Serialize)]
pub struct SettingsInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub store: StoreInspection,
    pub lookup_dir: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreInspection {
    pub backend: String,
    pub secret_name: String,
    pub dir: Option<String>,
    pub project_id: Option<String>,
    pub api_base: Option<String>,
    pub token_source: Option<String>,
    pub token_resolved: bool,
}

impl SettingsInspection {
    pub(crate) fn from_loaded(loaded: LoadedSettings) -> Self {
        let settings = &loaded.settings;
        let backend = StoreBackend::from_config(settings.store.backend.as_deref());

        // 토큰 값 자체는 노출하지 않고 출처만 표시한다.
        let (token_source, token_resolved) = match backend {
            Some(StoreBackend::SecretManager) => {
                let token = resolve_store_token(&settings.store);
                (token.source, token.token.is_some())
            }
            _ => (None, false),
        };

        let backend_label = match backend {
            Some(b) => b.as_str().to_string(),
            None => format!(
                "{} (unknown)",
                settings.store.backend.as_deref().unwrap_or_default()
            ),
        };

        let store = StoreInspection {
            backend: backend_label,
            secret_name: settings.secret_name(),
            dir: (backend == Some(StoreBackend::File))
                .then(|| store_dir(&settings.store).display().to_string()),
            project_id: settings.store.project_id.clone(),
            api_base: settings.store.api_base.clone(),
            token_source,
            token_resolved,
        };

        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            lookup_dir: lookup_dir(&settings.lookup).display().to_string(),
            store,
        }
    }
}
