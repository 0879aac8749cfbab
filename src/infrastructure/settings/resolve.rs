//! 설정 값(token/env/cmd, 디렉터리)을 실제 런타임 값으로 해석하는 유틸리티.
//!
//! - 환경변수/프로세스 실행은 인프라 계층에서만 수행한다.

use std::env;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};

use crate::application::settings::{LookupSettings, StoreSettings};

/// 저장소 access token 해석 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenResolution {
    pub token: Option<String>,
    pub source: Option<String>,
}

/// 저장소 토큰을 inline → env → cmd 순으로 해석한다.
pub fn resolve_store_token(cfg: &StoreSettings) -> TokenResolution {
    if let Some(token) = cfg.token.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        return TokenResolution {
            token: Some(token.to_string()),
            source: Some("inline".to_string()),
        };
    }

    let mut env_hint: Option<String> = None;
    let mut cmd_hint: Option<String> = None;

    if let Some(env_name) = cfg.token_env.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        match env::var(env_name).ok().map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => {
                return TokenResolution {
                    token: Some(v),
                    source: Some(format!("env:{env_name}")),
                };
            }
            _ => {
                env_hint = Some(format!("env:{env_name} (missing)"));
            }
        }
    }

    if let Some(cmd) = cfg
        .token_command
        .as_ref()
        .filter(|v| v.iter().any(|s| !s.trim().is_empty()))
    {
        let label = format!("cmd:{}", cmd.join(" "));
        match run_token_command(cmd) {
            Ok(token) if !token.trim().is_empty() => {
                return TokenResolution {
                    token: Some(token.trim().to_string()),
                    source: Some(label),
                };
            }
            Ok(_) => cmd_hint = Some(format!("{label} (empty)")),
            Err(err) => {
                tracing::debug!(command = %label, error = ?err, "token command failed");
                cmd_hint = Some(format!("{label} (failed)"));
            }
        }
    }

    TokenResolution {
        token: None,
        source: cmd_hint.or(env_hint),
    }
}

/// file 저장소 루트. 미지정이면 `<data_dir>/cfgsync/store`.
pub fn store_dir(cfg: &StoreSettings) -> PathBuf {
    configured_dir(cfg.dir.as_deref()).unwrap_or_else(|| app_dir(dirs::data_dir()).join("store"))
}

/// `file:` 조회 소스 기준 디렉터리. 미지정이면 `<config_dir>/cfgsync`.
pub fn lookup_dir(cfg: &LookupSettings) -> PathBuf {
    configured_dir(cfg.dir.as_deref()).unwrap_or_else(|| app_dir(dirs::config_dir()))
}

fn configured_dir(raw: Option<&str>) -> Option<PathBuf> {
    raw.map(str::trim).filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join("cfgsync")
}

fn run_token_command(cmd: &[String]) -> Result<String> {
    let program = cmd
        .first()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .context("token_command is empty")?;

    let output = Command::new(&program)
        .args(&cmd[1..])
        .output()
        .with_context(|| format!("failed to run token command: {program}"))?;

    if !output.status.success() {
        anyhow::bail!("token command failed: {program} ({})", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
