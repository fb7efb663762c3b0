use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigSortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) quiet: bool,
    #[serde(default)]
    pub(crate) order: Option<ConfigSortOrder>,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
    /// Export directory used when no paths are given
    #[serde(default)]
    pub(crate) data_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) top_countries: Option<usize>,
    #[serde(default)]
    pub(crate) top_artists: Option<usize>,
    #[serde(default)]
    pub(crate) top_albums: Option<usize>,
    #[serde(default)]
    pub(crate) top_podcasts: Option<usize>,
    /// File the values were read from
    #[serde(skip)]
    pub(crate) source: Option<PathBuf>,
    /// Files that failed to parse, reported once logging is up
    #[serde(skip)]
    pub(crate) warnings: Vec<String>,
}

impl Config {
    pub(crate) fn load() -> Self {
        Self::load_from(&Self::get_config_paths())
    }

    /// First parseable file wins; parse failures are kept as warnings
    fn load_from(paths: &[PathBuf]) -> Self {
        let mut warnings = Vec::new();
        for path in paths {
            if path.exists()
                && let Ok(content) = fs::read_to_string(path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(mut config) => {
                        config.source = Some(path.clone());
                        config.warnings = warnings;
                        return config;
                    }
                    Err(e) => {
                        warnings.push(format!("Failed to parse {}: {}", path.display(), e));
                    }
                }
            }
        }

        Config {
            warnings,
            ..Self::default()
        }
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/wrapstats/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("wrapstats").join("config.toml"));
        }

        // 2. Platform config dir, e.g. ~/Library/Application Support/wrapstats/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("wrapstats").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.wrapstats.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".wrapstats.toml"));
        }

        paths
    }
}
