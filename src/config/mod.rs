mod school;
pub mod state;

pub use school::{ApiSettings, Config, CurrencySettings, School};
pub use state::{HistoryEntry, State};

use crate::error::{FeesError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.fees/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "fees") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.fees/
    let home = dirs_home().ok_or_else(|| {
        FeesError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".fees"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load the main config.toml
pub fn load_config(config_dir: &PathBuf) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(FeesError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| FeesError::ConfigParse { path, source: e })
}

/// Load state.toml (creates default if missing)
pub fn load_state(config_dir: &PathBuf) -> Result<State> {
    let path = config_dir.join("state.toml");
    if !path.exists() {
        return Ok(State::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| FeesError::ConfigParse { path, source: e })
}

/// Save state.toml
pub fn save_state(config_dir: &PathBuf, state: &State) -> Result<()> {
    let path = config_dir.join("state.toml");
    let content = toml::to_string_pretty(state).map_err(|e| {
        FeesError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[school]
name = "Your School Name"
academic_year = "2025-2026"
# phone = "+237 6XX XX XX XX"       # optional, printed on receipts
# email = "contact@school.example"  # optional
# address = "123 School Street"     # optional

[api]
base_url = "http://localhost:4000/api"
timeout_secs = 5
notify = true   # send SMS/WhatsApp after each recorded payment

[currency]
code = "XAF"
symbol = "FCFA"
"#;
