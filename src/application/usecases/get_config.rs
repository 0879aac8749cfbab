//! 설정 조회 유스케이스(저장소 읽기 → 동기화 → 저장 → 강타입 변환).

use tracing::{debug, info, warn};

use crate::application::ports::{ExternalLookup, InteractivePrompt, SecretStore};
use crate::application::reconciler::reconcile;
use crate::application::resolver::FieldResolver;
use crate::domain::blob::ConfigBlob;
use crate::domain::error::{ConfigError, ConfigResult};
use crate::domain::resolved::ResolvedConfig;
use crate::domain::schema::SchemaRegistry;

/// 저장소 동기화 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    pub blob: ConfigBlob,
    /// 새 버전을 저장했는지 여부
    pub written: bool,
}

/// 비밀 저장소의 설정을 현재 스키마로 맞춘 뒤 반환한다.
///
/// 호출당 저장소 읽기 1회, 쓰기 최대 1회. 재시도하지 않는다.
pub struct GetConfigUseCase<'a> {
    pub store: &'a dyn SecretStore,
    pub prompt: &'a dyn InteractivePrompt,
    pub lookup: &'a dyn ExternalLookup,
    pub registry: &'a SchemaRegistry,
    pub secret_name: &'a str,
}

impl<'a> GetConfigUseCase<'a> {
    /// 완전히 해석된 강타입 설정을 반환한다.
    pub async fn execute(&self) -> ConfigResult<ResolvedConfig> {
        let outcome = self.sync_blob().await?;
        ResolvedConfig::decode(&outcome.blob, self.registry)
    }

    /// 동기화된 blob을 반환한다. 변경이 있을 때만 새 버전을 저장한다.
    pub async fn sync_blob(&self) -> ConfigResult<SyncOutcome> {
        let stored = self.store.read_latest(self.secret_name).await?;

        let resolver = FieldResolver {
            prompt: self.prompt,
            lookup: self.lookup,
        };
        let reconciliation = reconcile(stored.as_ref(), self.registry, &resolver)?;

        if !reconciliation.changed {
            return Ok(SyncOutcome {
                blob: reconciliation.blob,
                written: false,
            });
        }

        if stored.is_none() {
            info!(secret = self.secret_name, "creating config secret");
            // 이전 실행에서 생성만 되고 버전이 없는 항목일 수 있다.
            match self.store.create(self.secret_name).await {
                Ok(()) => {}
                Err(ConfigError::SecretExists(_)) => {
                    debug!(secret = self.secret_name, "config secret exists without versions");
                }
                Err(err) => return Err(err),
            }
        }
        self.store
            .append_version(self.secret_name, &reconciliation.blob)
            .await?;
        info!(
            secret = self.secret_name,
            version = %reconciliation.blob.version,
            "stored new config version"
        );

        // 새 버전이 저장된 뒤에만 임시 소스를 정리한다.
        for source_ref in &reconciliation.consumed_sources {
            if let Err(err) = self.lookup.release(source_ref) {
                warn!(source_ref = %source_ref, error = ?err, "failed to clean up lookup source");
            }
        }

        Ok(SyncOutcome {
            blob: reconciliation.blob,
            written: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::application::test_support::{MapLookup, ScriptedPrompt};
    use crate::domain::registry::{CURRENT_CFG_VERSION, builtin};
    use crate::infrastructure::adapters::MemorySecretStore;

    const SECRETS: &str = "file:secrets.json";

    fn secrets() -> MapLookup {
        MapLookup::default()
            .with(SECRETS, "openweather_api_key", "ow-key")
            .with(SECRETS, "google_ai_id", "ai-key")
    }

    fn current_blob() -> ConfigBlob {
        serde_json::from_value(json!({
            "version": CURRENT_CFG_VERSION,
            "open_weather_cfg": {"lat": 54.5, "long": -0.1, "api_key": "ow"},
            "google_calendar_cfg": {"calender_id": "cal", "timezone": "UTC"},
            "google_ai_cfg": {"google_ai_id": "ai", "model": "gemini-1.5-flash"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn cold_start_creates_secret_and_writes_once() {
        let store = MemorySecretStore::default();
        let prompt = ScriptedPrompt::new(&["54.5", "-0.1", "cal", "UTC"]);
        let lookup = secrets();
        let usecase = GetConfigUseCase {
            store: &store,
            prompt: &prompt,
            lookup: &lookup,
            registry: builtin(),
            secret_name: "cfg",
        };

        let cfg = usecase.execute().await.unwrap();

        assert_eq!(cfg.version, CURRENT_CFG_VERSION);
        assert_eq!(cfg.open_weather_cfg.api_key, "ow-key");
        assert_eq!(cfg.google_ai_cfg.google_ai_id, "ai-key");
        assert_eq!(cfg.google_ai_cfg.model, "gemini-1.5-flash");
        assert_eq!(store.versions("cfg").len(), 1);
        assert_eq!(lookup.released(), vec![SECRETS.to_string()]);
    }

    #[tokio::test]
    async fn up_to_date_config_is_not_rewritten() {
        let store = MemorySecretStore::default();
        store.create("cfg").await.unwrap();
        store.append_version("cfg", &current_blob()).await.unwrap();
        let prompt = ScriptedPrompt::default();
        let lookup = MapLookup::default();
        let usecase = GetConfigUseCase {
            store: &store,
            prompt: &prompt,
            lookup: &lookup,
            registry: builtin(),
            secret_name: "cfg",
        };

        let outcome = usecase.sync_blob().await.unwrap();

        assert!(!outcome.written);
        assert_eq!(outcome.blob, current_blob());
        assert_eq!(store.versions("cfg").len(), 1);
        assert!(prompt.asked().is_empty());
        assert!(lookup.released().is_empty());
    }

    #[tokio::test]
    async fn lookup_failure_leaves_store_untouched() {
        let store = MemorySecretStore::default();
        let prompt = ScriptedPrompt::new(&["54.5", "-0.1"]);
        let lookup = MapLookup::default();
        let usecase = GetConfigUseCase {
            store: &store,
            prompt: &prompt,
            lookup: &lookup,
            registry: builtin(),
            secret_name: "cfg",
        };

        let err = usecase.execute().await.unwrap_err();

        assert!(matches!(err, ConfigError::Lookup { .. }));
        assert!(store.read_latest("cfg").await.unwrap().is_none());
        assert!(lookup.released().is_empty());
    }

    #[tokio::test]
    async fn empty_existing_secret_is_filled() {
        let store = MemorySecretStore::default();
        store.create("cfg").await.unwrap();
        let prompt = ScriptedPrompt::new(&["1", "2", "cal", "UTC"]);
        let lookup = secrets();
        let usecase = GetConfigUseCase {
            store: &store,
            prompt: &prompt,
            lookup: &lookup,
            registry: builtin(),
            secret_name: "cfg",
        };

        let outcome = usecase.sync_blob().await.unwrap();

        assert!(outcome.written);
        assert_eq!(store.versions("cfg"), vec![outcome.blob]);
    }

    struct UndeletableSource;

    impl ExternalLookup for UndeletableSource {
        fn lookup(&self, _source_ref: &str, key: &str) -> ConfigResult<String> {
            Ok(format!("{key}-value"))
        }

        fn release(&self, source_ref: &str) -> anyhow::Result<()> {
            anyhow::bail!("permission denied removing {source_ref}")
        }
    }

    #[tokio::test]
    async fn cleanup_failure_does_not_fail_the_call() {
        let store = MemorySecretStore::default();
        let prompt = ScriptedPrompt::new(&["54.5", "-0.1", "cal", "UTC"]);
        let usecase = GetConfigUseCase {
            store: &store,
            prompt: &prompt,
            lookup: &UndeletableSource,
            registry: builtin(),
            secret_name: "cfg",
        };

        let cfg = usecase.execute().await.unwrap();

        assert_eq!(cfg.open_weather_cfg.api_key, "openweather_api_key-value");
        assert_eq!(store.versions("cfg").len(), 1);
    }

    struct UnreachableStore;

    #[async_trait]
    impl SecretStore for UnreachableStore {
        async fn read_latest(&self, _name: &str) -> ConfigResult<Option<ConfigBlob>> {
            Err(ConfigError::StoreUnavailable("connection refused".to_string()))
        }

        async fn create(&self, _name: &str) -> ConfigResult<()> {
            unreachable!("create must not be called after a failed read")
        }

        async fn append_version(&self, _name: &str, _blob: &ConfigBlob) -> ConfigResult<()> {
            unreachable!("append must not be called after a failed read")
        }
    }

    #[tokio::test]
    async fn store_failure_is_propagated_without_prompting() {
        let prompt = ScriptedPrompt::default();
        let lookup = MapLookup::default();
        let usecase = GetConfigUseCase {
            store: &UnreachableStore,
            prompt: &prompt,
            lookup: &lookup,
            registry: builtin(),
            secret_name: "cfg",
        };

        let err = usecase.execute().await.unwrap_err();

        assert_eq!(
            err,
            ConfigError::StoreUnavailable("connection refused".to_string())
        );
        assert!(prompt.asked().is_empty());
    }
}
