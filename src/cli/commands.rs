//! CLI subcommand definitions
//!
//! One subcommand per view; every view takes the export files to read.

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Export files or directories to read
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct InputArgs {
    /// Streaming-history JSON files or directories containing them
    #[arg(value_name = "PATH")]
    pub(crate) paths: Vec<PathBuf>,
}

/// Main CLI commands
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Show every view
    Summary(InputArgs),
    /// Show listening hours per month
    Timeline(InputArgs),
    /// Show play counts per device class
    Platforms(InputArgs),
    /// Show top countries by listening hours
    Countries(InputArgs),
    /// Show top artists by listening hours
    Artists(InputArgs),
    /// Show top albums by listening hours
    Albums(InputArgs),
    /// Show skip, shuffle and offline rates
    Behavior(InputArgs),
    /// Show top podcast shows by listening hours
    Podcasts(InputArgs),
    /// Show listening hours per hour of day
    Hourly(InputArgs),
}

/// Normalized view selected by a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Summary,
    Timeline,
    Platforms,
    Countries,
    Artists,
    Albums,
    Behavior,
    Podcasts,
    Hourly,
}

impl View {
    /// Views rendered by `summary`, in tab order
    pub(crate) const TABS: [View; 8] = [
        View::Timeline,
        View::Platforms,
        View::Countries,
        View::Artists,
        View::Albums,
        View::Behavior,
        View::Podcasts,
        View::Hourly,
    ];

    pub(crate) fn title(self) -> &'static str {
        match self {
            View::Summary => "Listening Summary",
            View::Timeline => "Timeline",
            View::Platforms => "Platforms",
            View::Countries => "Countries",
            View::Artists => "Top Artists",
            View::Albums => "Top Albums",
            View::Behavior => "Behavior",
            View::Podcasts => "Podcasts",
            View::Hourly => "Daily Pattern",
        }
    }

    /// Chronological views honour `--order`
    pub(crate) fn is_chronological(self) -> bool {
        matches!(self, View::Timeline | View::Hourly)
    }
}

impl Commands {
    pub(crate) fn view(&self) -> View {
        match self {
            Commands::Summary(_) => View::Summary,
            Commands::Timeline(_) => View::Timeline,
            Commands::Platforms(_) => View::Platforms,
            Commands::Countries(_) => View::Countries,
            Commands::Artists(_) => View::Artists,
            Commands::Albums(_) => View::Albums,
            Commands::Behavior(_) => View::Behavior,
            Commands::Podcasts(_) => View::Podcasts,
            Commands::Hourly(_) => View::Hourly,
        }
    }

    pub(crate) fn input(&self) -> &InputArgs {
        match self {
            Commands::Summary(input)
            | Commands::Timeline(input)
            | Commands::Platforms(input)
            | Commands::Countries(input)
            | Commands::Artists(input)
            | Commands::Albums(input)
            | Commands::Behavior(input)
            | Commands::Podcasts(input)
            | Commands::Hourly(input) => input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_of_each_command() {
        let input = InputArgs::default();
        assert_eq!(Commands::Summary(input.clone()).view(), View::Summary);
        assert_eq!(Commands::Hourly(input.clone()).view(), View::Hourly);
        assert_eq!(Commands::Podcasts(input).view(), View::Podcasts);
    }

    #[test]
    fn tabs_cover_every_view_but_summary() {
        assert_eq!(View::TABS.len(), 8);
        assert!(!View::TABS.contains(&View::Summary));
    }

    #[test]
    fn only_timeline_and_hourly_are_chronological() {
        let chrono: Vec<_> = View::TABS
            .iter()
            .copied()
            .filter(|v| v.is_chronological())
            .collect();
        assert_eq!(chrono, vec![View::Timeline, View::Hourly]);
    }

    #[test]
    fn input_paths_are_exposed() {
        let cmd = Commands::Artists(InputArgs {
            paths: vec![PathBuf::from("a.json")],
        });
        assert_eq!(cmd.input().paths, vec![PathBuf::from("a.json")]);
    }
}
