//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode, ConfigSortOrder};
use crate::core::TopLimits;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum SortOrder {
    /// Oldest first (default)
    #[default]
    Asc,
    /// Newest first
    Desc,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "wrapstats")]
#[command(about = "Listening statistics from exported streaming-history JSON files", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Only count plays from this date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) since: Option<String>,

    /// Only count plays until this date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) until: Option<String>,

    /// Output as JSON
    #[arg(short, long, global = true, conflicts_with = "csv")]
    pub(crate) json: bool,

    /// Output as CSV
    #[arg(long, global = true)]
    pub(crate) csv: bool,

    /// Filter JSON output with jq expression (requires jq installed)
    #[arg(long, global = true, value_name = "FILTER", conflicts_with = "csv")]
    pub(crate) jq: Option<String>,

    /// Sort order for timeline and hourly views
    #[arg(short, long, global = true, value_enum, default_value = "asc")]
    pub(crate) order: SortOrder,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug output (show processing details)
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Only print errors on stderr
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub(crate) quiet: bool,

    /// Timezone for hour-of-day buckets and date filters (e.g. "UTC", "Europe/Stockholm")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Locale for number formatting (e.g., "en", "zh", "de")
    #[arg(long, global = true, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,

    /// Number of countries to show (0 = all)
    #[arg(long, global = true, value_name = "N")]
    pub(crate) top_countries: Option<usize>,

    /// Number of artists to show (0 = all)
    #[arg(long, global = true, value_name = "N")]
    pub(crate) top_artists: Option<usize>,

    /// Number of albums to show (0 = all)
    #[arg(long, global = true, value_name = "N")]
    pub(crate) top_albums: Option<usize>,

    /// Number of podcast shows to show (0 = all)
    #[arg(long, global = true, value_name = "N")]
    pub(crate) top_podcasts: Option<usize>,

    /// Export directory from the config file, used when no paths are given
    #[arg(skip)]
    pub(crate) data_dir: Option<std::path::PathBuf>,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && !self.quiet {
            self.debug = config.debug;
            self.quiet = config.quiet && !config.debug;
        }

        // For enum values, apply config only if the CLI is at its default
        if let Some(ConfigSortOrder::Desc) = config.order
            && self.order == SortOrder::Asc
        {
            self.order = SortOrder::Desc;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
                ConfigColorMode::Auto => ColorMode::Auto,
            };
        }

        // String and numeric options: only apply if CLI didn't set them
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.locale.is_none() {
            self.locale = config.locale.clone();
        }
        self.top_countries = self.top_countries.or(config.top_countries);
        self.top_artists = self.top_artists.or(config.top_artists);
        self.top_albums = self.top_albums.or(config.top_albums);
        self.top_podcasts = self.top_podcasts.or(config.top_podcasts);
        self.data_dir = config.data_dir.clone();

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn output_format(&self) -> OutputFormat {
        if self.json || self.jq.is_some() {
            OutputFormat::Json
        } else if self.csv {
            OutputFormat::Csv
        } else {
            OutputFormat::Table
        }
    }

    pub(crate) fn top_limits(&self) -> TopLimits {
        let defaults = TopLimits::default();
        TopLimits {
            countries: self.top_countries.unwrap_or(defaults.countries),
            artists: self.top_artists.unwrap_or(defaults.artists),
            albums: self.top_albums.unwrap_or(defaults.albums),
            podcasts: self.top_podcasts.unwrap_or(defaults.podcasts),
        }
    }
}
