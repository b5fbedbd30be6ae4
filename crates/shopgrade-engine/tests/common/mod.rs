//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use shopgrade_core::errors::{ExError, Result, UpgradeError};
use shopgrade_engine::commands::runner::{CommandRunner, CommandSpec};
use shopgrade_engine::EngineConfig;
use shopgrade_core_types::Sensitive;
use tempfile::TempDir;

pub const SECRET: &str = "engine-test-secret";

/// Write `text` at `rel` under `root`, creating directories
pub fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

pub fn read_json(root: &Path, rel: &str) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(root.join(rel)).unwrap()).unwrap()
}

/// A repo root plus a config pointing at it
pub fn setup_repo() -> (TempDir, EngineConfig) {
    let dir = TempDir::new().expect("Failed to create temp repo");
    let config = EngineConfig {
        root: dir.path().to_path_buf(),
        preview_secret: Some(Sensitive::new(SECRET.to_string())),
        package_manager: "pnpm".to_string(),
    };
    (dir, config)
}

/// `Bearer <token>` for `shop`, valid for ten minutes
pub fn bearer_for(shop: &str) -> String {
    let claims = json!({
        "aud": "upgrade-preview",
        "iss": "acme",
        "sub": format!("shop:{shop}:upgrade-preview"),
        "exp": (Utc::now() + Duration::minutes(10)).timestamp(),
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}

/// Records every command and fails the ones whose last argument matches
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<CommandSpec>>,
    fail_step: Option<(String, i32)>,
}

impl RecordingRunner {
    pub fn failing_on(step: &str, code: i32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_step: Some((step.to_string(), code)),
        }
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> Result<()> {
        self.calls.lock().unwrap().push(spec.clone());
        match &self.fail_step {
            Some((step, code)) if spec.args.last() == Some(step) => {
                Err(ExError::from(UpgradeError::ProcessExited {
                    command: spec.display(),
                    status: code.to_string(),
                }))
            }
            _ => Ok(()),
        }
    }
}

pub fn shared(runner: RecordingRunner) -> Arc<RecordingRunner> {
    Arc::new(runner)
}
