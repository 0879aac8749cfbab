//! cfgsync library root.
//! 비밀 저장소에 보관된 사용자 설정을 현재 스키마 버전으로 동기화한다.

use anyhow::Result;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

use domain::resolved::ResolvedConfig;
use interface::cli::AppComposition;

/// 라이브러리 직접 호출용 설정 조회 함수.
///
/// 코어 오류는 `domain::error::ConfigError`로 downcast할 수 있다.
pub async fn get_config() -> Result<ResolvedConfig> {
    let composition = AppComposition::from_settings()?;
    Ok(composition.get_config_usecase().execute().await?)
}

/// 설정 점검 JSON 출력용 함수.
pub fn inspect_settings_pretty_json() -> Result<String> {
    AppComposition::inspect_settings_usecase().execute()
}
