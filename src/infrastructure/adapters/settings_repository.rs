//! 설정 저장소 포트 구현 어댑터.

use anyhow::Result;

use crate::application::ports::SettingsRepository;
use crate::application::settings::Settings;

/// JSON 파일 기반 도구 설정 어댑터.
pub struct JsonSettingsRepository;

impl SettingsRepository for JsonSettingsRepository {
    fn load(&self) -> Result<Settings> {
        Settings::load()
    }

    fn inspect_pretty_json(&self) -> Result<String> {
        Settings::inspect_pretty_json()
    }
}
