//! 설정 파일 탐색/병합 로더.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::settings::Settings;

const SETTINGS_ENV: &str = "CFGSYNC_CONFIG";

#[derive(Debug, Clone)]
pub(crate) struct LoadedSettings {
    pub settings: Settings,
    pub searched_paths: Vec<PathBuf>,
    pub loaded_paths: Vec<PathBuf>,
}

/// 우선순위 경로를 순회해 JSON 설정을 병합한다.
/// 설정 파일이 하나도 없으면 기본값을 사용한다.
pub(crate) fn load_merged_settings() -> Result<LoadedSettings> {
    load_from_paths(settings_paths())
}

pub(crate) fn load_from_paths(paths: Vec<PathBuf>) -> Result<LoadedSettings> {
    // 낮은 우선순위에서 높은 우선순위 순서로 병합한다.
    let mut merged = Settings::default();
    let mut loaded_paths = Vec::new();

    for path in &paths {
        if !path.exists() {
            continue;
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        let parsed: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?;
        merged.merge_from(parsed);
        loaded_paths.push(path.to_path_buf());
    }

    Ok(LoadedSettings {
        settings: merged,
        searched_paths: paths,
        loaded_paths,
    })
}

/// 시스템 + 사용자 + 프로젝트 + 명시 경로 순으로 병합 경로를 구성한다.
pub fn settings_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/cfgsync/config.json")];

    if let Some(base) = dirs::config_dir() {
        paths.push(base.join("cfgsync").join("config.json"));
    }

    paths.push(PathBuf::from(".cfgsync/config.json"));

    if let Ok(path) = env::var(SETTINGS_ENV) {
        paths.push(Path::new(&path).to_path_buf());
    }

    dedup_paths(paths)
}

fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for p in paths {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}
