//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "rezone.db";

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Path of the SQLite database inside the root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE)
}

/// Create the root folder if it does not exist yet
pub fn ensure_root_folder(root_folder: &Path) -> Result<()> {
    std::fs::create_dir_all(root_folder)?;
    Ok(())
}

/// Locate the configuration file for the platform
fn find_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/rezone/config.toml first, then /etc/rezone/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("rezone").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/rezone/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let path = dirs::config_dir()
        .map(|d| d.join("rezone").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("rezone"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/rezone"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("rezone"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/rezone"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("rezone"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\rezone"))
    } else {
        PathBuf::from("./rezone_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let root = resolve_root_folder(Some(Path::new("/tmp/rz-cli")), "REZONE_TEST_UNSET_VAR");
        assert_eq!(root, PathBuf::from("/tmp/rz-cli"));
    }

    #[test]
    fn env_var_used_when_no_cli_arg() {
        std::env::set_var("REZONE_TEST_ROOT_VAR", "/tmp/rz-env");
        let root = resolve_root_folder(None, "REZONE_TEST_ROOT_VAR");
        std::env::remove_var("REZONE_TEST_ROOT_VAR");
        assert_eq!(root, PathBuf::from("/tmp/rz-env"));
    }

    #[test]
    fn fallback_is_nonempty() {
        let root = resolve_root_folder(None, "REZONE_TEST_UNSET_VAR");
        assert!(!root.as_os_str().is_empty());
    }

    #[test]
    fn database_path_appends_file_name() {
        let db = database_path(Path::new("/data/rezone"));
        assert_eq!(db, PathBuf::from("/data/rezone/rezone.db"));
    }
}
