//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "party-consensus";
const PROJECT_FILES: [&str; 2] = ["party-consensus.toml", ".party-consensus.toml"];
const ENV_PREFIX: &str = "PARTY_CONSENSUS_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `PARTY_CONSENSUS_<SECTION>__<KEY>` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./party-consensus.toml` or `./.party-consensus.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/party-consensus/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::load_layers(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
    }

    /// Merge the given files over the defaults.
    ///
    /// Missing global or project files are skipped; a missing explicit
    /// file is an error.
    pub fn load_layers(
        global: Option<&Path>,
        project: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Box::new(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/party-consensus/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] {ENV_PREFIX}<SECTION>__<KEY>");

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{mark:<5}] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./{} or ./{}", PROJECT_FILES[0], PROJECT_FILES[1]);
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.storage.backend, "memory");
        assert!(config.logging.decision_log.is_none());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("party-consensus"));
    }

    #[test]
    fn test_layers_override_in_order() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(
            &global,
            "[defaults]\nvoting_time_limit = 60\nallow_abstention = false\n",
        )
        .unwrap();
        fs::write(&project, "[defaults]\nvoting_time_limit = 90\n").unwrap();

        let config = ConfigLoader::load_layers(Some(&global), Some(&project), None).unwrap();
        assert_eq!(config.defaults.voting_time_limit, 90);
        assert!(!config.defaults.allow_abstention);
        assert_eq!(config.defaults.voting_system, "majority");
    }

    #[test]
    fn test_explicit_file_wins() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&project, "[storage]\nbackend = \"json\"\n").unwrap();
        fs::write(&explicit, "[storage]\nbackend = \"memory\"\n").unwrap();

        let config = ConfigLoader::load_layers(None, Some(&project), Some(&explicit)).unwrap();
        assert_eq!(config.storage.backend, "memory");
    }

    #[test]
    fn test_missing_files() {
        let dir = TempDir::new().unwrap();
        let absent = dir.path().join("absent.toml");

        let config = ConfigLoader::load_layers(Some(&absent), Some(&absent), None).unwrap();
        assert_eq!(config, FileConfig::default());

        assert!(ConfigLoader::load_layers(None, None, Some(&absent)).is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "[defaults\nvoting_time_limit = ").unwrap();

        assert!(ConfigLoader::load_layers(None, None, Some(&broken)).is_err());
    }
}
