//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::settings::Settings;
use crate::domain::blob::ConfigBlob;
use crate::domain::error::ConfigResult;

/// 버전이 누적되는 비밀 저장소 포트.
///
/// 부분 갱신은 지원하지 않고 blob 전체를 새 버전으로 추가한다.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// 최신 버전 blob. 한 번도 생성되지 않았으면 `None`.
    async fn read_latest(&self, name: &str) -> ConfigResult<Option<ConfigBlob>>;
    /// 빈 항목을 생성한다. 이미 있으면 `SecretExists`.
    async fn create(&self, name: &str) -> ConfigResult<()>;
    async fn append_version(&self, name: &str, blob: &ConfigBlob) -> ConfigResult<()>;
}

/// 사용자에게 값을 요청하는 포트(동기, 응답까지 블로킹).
pub trait InteractivePrompt: Send + Sync {
    fn prompt(&self, text: &str) -> ConfigResult<String>;
}

/// 보조 소스(파일/환경변수 등)에서 값을 조회하는 포트.
pub trait ExternalLookup: Send + Sync {
    fn lookup(&self, source_ref: &str, key: &str) -> ConfigResult<String>;
    /// 조회에 사용한 임시 소스를 정리한다. 실패해도 동기화는 계속된다.
    fn release(&self, source_ref: &str) -> Result<()>;
}

/// 도구 자체 설정 로딩/점검 포트.
pub trait SettingsRepository: Send + Sync {
    fn load(&self) -> Result<Settings>;
    fn inspect_pretty_json(&self) -> Result<String>;
}
