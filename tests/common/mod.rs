//! Shared fixtures for the integration tests
//!
//! Each [`Workspace`] owns a temp dir with its own config file, session
//! directory and optional catalog data, so tests never touch the user's
//! home directory or each other's sessions.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

const SIMULATOR_ENV: &[&str] = &[
    "SIMULATOR_CONFIG",
    "SIMULATOR_CATALOG_DIR",
    "SIMULATOR_ENABLED_ROLES",
    "SIMULATOR_STORAGE_BACKEND",
    "SIMULATOR_SESSION_DIR",
    "SIMULATOR_LOG_LEVEL",
    "SIMULATOR_LOG_FILE",
    "SIMULATOR_LOG_JSON",
    "RUST_LOG",
];

pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// File-backed sessions, bundled catalog, engineer only.
    pub fn new() -> Self {
        Self::with_config("")
    }

    /// Base config plus extra TOML appended at the end.
    pub fn with_config(extra: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let ws = Self { dir };
        ws.write_config(&format!(
            "[storage]\nbackend = \"file\"\nsession_dir = '{}'\n\n[logging]\nlevel = \"warn\"\n\n{}",
            ws.session_dir().display(),
            extra
        ));
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    pub fn session_dir(&self) -> PathBuf {
        self.path().join("sessions")
    }

    pub fn catalog_dir(&self) -> PathBuf {
        self.path().join("catalog")
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.config_path(), content).unwrap();
    }

    /// Write `<catalog>/<kind>/<role>.json`.
    pub fn write_catalog(&self, kind: &str, role: &str, content: &str) {
        let dir = self.catalog_dir().join(kind);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.json", role)), content).unwrap();
    }

    /// The binary with this workspace's config and a clean environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("startup-simulator").unwrap();
        for var in SIMULATOR_ENV {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.path()).arg("--config").arg(self.config_path());
        cmd
    }

    /// Run a command that must succeed and parse its stdout as JSON.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self.cmd().args(args).assert().success().get_output().stdout.clone();
        serde_json::from_slice(&output).unwrap()
    }

    pub fn create_session(&self, role: &str) -> String {
        let created = self.json(&["session", "create", role]);
        created["session_id"].as_str().unwrap().to_string()
    }
}

/// Two-scenario engineer catalog used by the directory-source tests.
pub const SMALL_SCENARIOS: &str = r#"[
  { "id": "s2", "role": "engineer", "order": 2, "title": "Second", "description": "Later",
    "choices": [ { "id": "s2_a", "text": "Own it", "traits": ["hands_on", "independent"] } ] },
  { "id": "s1", "role": "engineer", "order": 1, "title": "First", "description": "Earlier",
    "choices": [ { "id": "s1_a", "text": "Do it right", "traits": ["long_term", "quality_focused"] } ] }
]"#;

pub const SMALL_ARCHETYPES: &str = r#"[
  { "id": "craftsman", "role": "engineer", "name": "The Craftsman",
    "key_traits": ["long_term", "quality_focused", "hands_on", "independent"], "message": "Solid." },
  { "id": "hero", "role": "engineer", "name": "The Hero",
    "key_traits": ["hands_on", "crisis_driven"], "message": "Fast." }
]"#;
