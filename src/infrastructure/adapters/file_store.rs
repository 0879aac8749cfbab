//! 로컬 디렉터리 기반 비밀 저장소 어댑터.
//!
//! `<root>/<name>/<n>.json` 형태로 버전마다 파일 하나를 추가한다.
//! 기존 버전 파일은 수정/삭제하지 않는다.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::SecretStore;
use crate::domain::blob::ConfigBlob;
use crate::domain::error::{ConfigError, ConfigResult};

pub struct FileSecretStore {
    root: PathBuf,
}

impl FileSecretStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// 이름은 루트 아래 한 단계 디렉터리로만 매핑된다.
    fn secret_dir(&self, name: &str) -> ConfigResult<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ConfigError::InvalidSecretName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    /// 가장 큰 버전 번호(버전이 없으면 0).
    fn latest_version(dir: &Path) -> ConfigResult<u64> {
        let entries = fs::read_dir(dir).map_err(|e| unavailable(dir, e))?;

        let mut latest = 0;
        for entry in entries {
            let path = entry.map_err(|e| unavailable(dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(n) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u64>().ok())
            {
                latest = latest.max(n);
            }
        }
        Ok(latest)
    }
}

fn unavailable(path: &Path, err: std::io::Error) -> ConfigError {
    ConfigError::StoreUnavailable(format!("{}: {err}", path.display()))
}

fn version_path(dir: &Path, n: u64) -> PathBuf {
    dir.join(format!("{n}.json"))
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn read_latest(&self, name: &str) -> ConfigResult<Option<ConfigBlob>> {
        let dir = self.secret_dir(name)?;
        if !dir.is_dir() {
            return Ok(None);
        }

        let latest = Self::latest_version(&dir)?;
        if latest == 0 {
            return Ok(None);
        }

        let path = version_path(&dir, latest);
        let raw = fs::read_to_string(&path).map_err(|e| unavailable(&path, e))?;
        debug!(path = %path.display(), "read config version");
        ConfigBlob::from_json_str(&raw).map(Some)
    }

    async fn create(&self, name: &str) -> ConfigResult<()> {
        let dir = self.secret_dir(name)?;
        if dir.exists() {
            return Err(ConfigError::SecretExists(name.to_string()));
        }
        fs::create_dir_all(&dir).map_err(|e| unavailable(&dir, e))
    }

    async fn append_version(&self, name: &str, blob: &ConfigBlob) -> ConfigResult<()> {
        let dir = self.secret_dir(name)?;
        if !dir.is_dir() {
            return Err(ConfigError::StoreUnavailable(format!(
                "secret '{name}' does not exist under {}",
                self.root.display()
            )));
        }

        let path = version_path(&dir, Self::latest_version(&dir)? + 1);
        let rendered = serde_json::to_string_pretty(blob)
            .map_err(|e| ConfigError::StoreUnavailable(e.to_string()))?;

        // create_new: 같은 버전 파일을 덮어쓰지 않는다.
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => ConfigError::StoreUnavailable(format!(
                    "version file {} already exists",
                    path.display()
                )),
                _ => unavailable(&path, e),
            })?;
        file.write_all(format!("{rendered}\n").as_bytes())
            .map_err(|e| unavailable(&path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
                .map_err(|e| unavailable(&path, e))?;
        }

        debug!(path = %path.display(), "appended config version");
        Ok(())
    }
}
