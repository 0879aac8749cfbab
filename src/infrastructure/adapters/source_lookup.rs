//! 외부 소스 조회 포트 구현 어댑터.
//!
//! - `file:<path>`: JSON object 파일에서 key를 읽는다. 상대 경로는 기준 디렉터리 기준.
//! - `env:`: key를 환경변수 이름으로 읽는다.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::application::ports::ExternalLookup;
use crate::domain::error::{ConfigError, ConfigResult};

enum SourceRef<'a> {
    File(&'a str),
    Env,
}

impl<'a> SourceRef<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        if let Some(path) = raw.strip_prefix("file:") {
            let path = path.trim();
            return (!path.is_empty()).then_some(Self::File(path));
        }
        raw.starts_with("env:").then_some(Self::Env)
    }
}

pub struct SourceLookup {
    base_dir: PathBuf,
}

impl SourceLookup {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn lookup_file(&self, source_ref: &str, path: &str, key: &str) -> ConfigResult<String> {
        let path = self.resolve_path(path);
        let raw = fs::read_to_string(&path).map_err(|e| {
            ConfigError::lookup(source_ref, key, format!("cannot read {}: {e}", path.display()))
        })?;
        let json: Value = serde_json::from_str(&raw).map_err(|e| {
            ConfigError::lookup(source_ref, key, format!("invalid JSON in {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), key, "read lookup source");
        match json.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
            Some(other) => Err(ConfigError::lookup(
                source_ref,
                key,
                format!("unsupported value {other}"),
            )),
            None => Err(ConfigError::lookup(source_ref, key, "key not found")),
        }
    }
}

impl ExternalLookup for SourceLookup {
    fn lookup(&self, source_ref: &str, key: &str) -> ConfigResult<String> {
        match SourceRef::parse(source_ref) {
            Some(SourceRef::File(path)) => self.lookup_file(source_ref, path, key),
            Some(SourceRef::Env) => env::var(key)
                .map_err(|e| ConfigError::lookup(source_ref, key, e.to_string())),
            None => Err(ConfigError::lookup(
                source_ref,
                key,
                "unsupported source (expected file:<path> or env:)",
            )),
        }
    }

    fn release(&self, source_ref: &str) -> Result<()> {
        let Some(SourceRef::File(path)) = SourceRef::parse(source_ref) else {
            return Ok(());
        };

        let path = self.resolve_path(path);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed consumed lookup source");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}
