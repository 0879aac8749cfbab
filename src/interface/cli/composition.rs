//! 애플리케이션 조립(composition root) 모듈.

use anyhow::Result;

use crate::application::ports::{InteractivePrompt, SecretStore, SettingsRepository};
use crate::application::settings::Settings;
use crate::application::usecases::get_config::GetConfigUseCase;
use crate::application::usecases::inspect_settings::InspectSettingsUseCase;
use crate::application::usecases::show_config::ShowConfigUseCase;
use crate::domain::registry;
use crate::infrastructure::adapters::{
    JsonSettingsRepository, SourceLookup, StdinPrompt, build_secret_store,
};
use crate::infrastructure::settings::lookup_dir;

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    store: Box<dyn SecretStore>,
    prompt: Box<dyn InteractivePrompt>,
    lookup: SourceLookup,
    secret_name: String,
}

impl AppComposition {
    /// 병합된 도구 설정을 읽어 실행 조합을 생성한다.
    pub fn from_settings() -> Result<Self> {
        let settings = JsonSettingsRepository.load()?;
        Self::new(&settings)
    }

    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_prompt(settings, Box::new(StdinPrompt))
    }

    /// 프롬프트 어댑터를 외부에서 주입한다.
    pub(crate) fn with_prompt(settings: &Settings, prompt: Box<dyn InteractivePrompt>) -> Result<Self> {
        Ok(Self {
            store: build_secret_store(settings)?,
            prompt,
            lookup: SourceLookup::new(lookup_dir(&settings.lookup)),
            secret_name: settings.secret_name(),
        })
    }

    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }

    /// 설정 조회(동기화) 유스케이스를 생성한다.
    pub fn get_config_usecase(&self) -> GetConfigUseCase<'_> {
        GetConfigUseCase {
            store: self.store.as_ref(),
            prompt: self.prompt.as_ref(),
            lookup: &self.lookup,
            registry: registry::builtin(),
            secret_name: &self.secret_name,
        }
    }

    /// 저장된 blob 조회 유스케이스를 생성한다.
    pub fn show_config_usecase(&self) -> ShowConfigUseCase<'_> {
        ShowConfigUseCase {
            store: self.store.as_ref(),
            secret_name: &self.secret_name,
        }
    }

    /// 설정 점검 유스케이스를 생성한다(저장소 조립 없이 사용 가능).
    pub fn inspect_settings_usecase() -> InspectSettingsUseCase<'static> {
        InspectSettingsUseCase {
            settings_repo: &JsonSettingsRepository,
        }
    }
}
