use std::path::{Path, PathBuf};

use super::{AppConfig, ConfigError};

/// Files consulted for environment variables, in load order
const ENV_FILES: [&str; 2] = [".env", ".env.secrets"];

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;

    Ok(config)
}

/// Load optional `.env` files from the working directory.
///
/// Variables already present in the process environment are left untouched.
/// Returns the files that were loaded.
pub fn load_env_files() -> Vec<PathBuf> {
    load_env_files_from(Path::new("."))
}

fn load_env_files_from(dir: &Path) -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    for name in ENV_FILES {
        let path = dir.join(name);
        if !path.exists() {
            tracing::trace!("No environment file at {}", path.display());
            continue;
        }

        match dotenv::from_path(&path) {
            Ok(()) => {
                tracing::debug!("Loaded environment variables from {}", path.display());
                loaded.push(path);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load environment file {}", path.display());
            }
        }
    }

    loaded
}
