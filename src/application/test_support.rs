//! 단위 테스트용 프롬프트/조회 더블.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::application::ports::{ExternalLookup, InteractivePrompt};
use crate::domain::error::{ConfigError, ConfigResult};

/// 미리 정한 답을 순서대로 돌려주는 프롬프트 더블.
#[derive(Default)]
pub(crate) struct ScriptedPrompt {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub(crate) fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl InteractivePrompt for ScriptedPrompt {
    fn prompt(&self, text: &str) -> ConfigResult<String> {
        self.asked.lock().unwrap().push(text.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ConfigError::Prompt("no scripted answer left".to_string()))
    }
}

/// 고정 맵에서 값을 조회하는 lookup 더블.
#[derive(Default)]
pub(crate) struct MapLookup {
    values: HashMap<(String, String), String>,
    released: Mutex<Vec<String>>,
}

impl MapLookup {
    pub(crate) fn with(mut self, source_ref: &str, key: &str, value: &str) -> Self {
        self.values
            .insert((source_ref.to_string(), key.to_string()), value.to_string());
        self
    }

    pub(crate) fn released(&self) -> Vec<String> {
        self.released.lock().unwrap().clone()
    }
}

impl ExternalLookup for MapLookup {
    fn lookup(&self, source_ref: &str, key: &str) -> ConfigResult<String> {
        self.values
            .get(&(source_ref.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| ConfigError::lookup(source_ref, key, "not found"))
    }

    fn release(&self, source_ref: &str) -> anyhow::Result<()> {
        self.released.lock().unwrap().push(source_ref.to_string());
        Ok(())
    }
}
