use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::password::DEFAULT_ITERATIONS;

/// Application settings, read from Rocket's figment (`Rocket.toml` and
/// `ROCKET_*` environment variables) next to Rocket's own keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub admin_username: String,
    /// Seeds `votes.json`; missing names are added with zero votes at startup.
    pub candidates: Vec<String>,
    pub password_iterations: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            admin_username: "admin".into(),
            candidates: vec!["Alice".into(), "Bob".into(), "Charlie".into()],
            password_iterations: DEFAULT_ITERATIONS,
        }
    }
}
