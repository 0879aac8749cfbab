//! 도구 자체 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수/프로세스 접근은 `infrastructure`에서만 수행한다.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::registry::DEFAULT_SECRET_NAME;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    /// 설정 blob을 보관하는 비밀 저장소
    #[serde(default)]
    pub store: StoreSettings,
    /// 외부 조회 소스
    #[serde(default)]
    pub lookup: LookupSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct StoreSettings {
    /// 저장소 종류(file/gsm/memory, 기본 file)
    pub backend: Option<String>,
    /// blob을 저장할 비밀 이름(기본 "cfg")
    pub secret_name: Option<String>,
    /// file 저장소 루트 디렉터리
    pub dir: Option<String>,
    /// Secret Manager 프로젝트 ID
    pub project_id: Option<String>,
    /// Secret Manager API base URL override(선택)
    pub api_base: Option<String>,
    /// 고정 access token(민감정보: 권장하지 않음)
    pub token: Option<String>,
    /// access token을 읽을 환경변수 이름
    pub token_env: Option<String>,
    /// access token을 stdout으로 출력하는 커맨드(예: ["gcloud","auth","print-access-token"])
    pub token_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LookupSettings {
    /// `file:` 소스의 상대 경로 기준 디렉터리
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    SecretManager,
    Memory,
}

impl StoreBackend {
    /// 설정 문자열을 저장소 종류로 해석한다. 미지정이면 file.
    pub fn from_config(raw: Option<&str>) -> Option<Self> {
        match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("file") => Some(Self::File),
            Some("gsm") | Some("secret_manager") => Some(Self::SecretManager),
            Some("memory") => Some(Self::Memory),
            Some(_) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::SecretManager => "gsm",
            Self::Memory => "memory",
        }
    }
}

impl Settings {
    pub fn secret_name(&self) -> String {
        self.store
            .secret_name
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_SECRET_NAME)
            .to_string()
    }

    pub fn store_backend(&self) -> Result<StoreBackend> {
        let raw = self.store.backend.as_deref();
        StoreBackend::from_config(raw).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown store backend '{}' (expected file, gsm or memory)",
                raw.unwrap_or_default()
            )
        })
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub fn merge_from(&mut self, other: Settings) {
        self.store.merge_from(other.store);
        self.lookup.merge_from(other.lookup);
    }
}

impl StoreSettings {
    pub fn merge_from(&mut self, other: StoreSettings) {
        if other.backend.is_some() {
            self.backend = other.backend;
        }
        if other.secret_name.is_some() {
            self.secret_name = other.secret_name;
        }
        if other.dir.is_some() {
            self.dir = other.dir;
        }
        if other.project_id.is_some() {
            self.project_id = other.project_id;
        }
        if other.api_base.is_some() {
            self.api_base = other.api_base;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.token_env.is_some() {
            self.token_env = other.token_env;
        }
        if other.token_command.is_some() {
            self.token_command = other.token_command;
        }
    }
}

impl LookupSettings {
    pub fn merge_from(&mut self, other: LookupSettings) {
        if other.dir.is_some() {
            self.dir = other.dir;
        }
    }
}
