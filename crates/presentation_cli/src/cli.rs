//! Command-line arguments

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use domain::{TemperatureUnit, WindUnit};

/// Weather bot CLI
#[derive(Debug, Parser)]
#[command(name = "weatherbot-cli")]
#[command(author, version, about = "Weather lookups, cache and user settings", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// User the requests are made and logged for
    #[arg(short, long, env = "WEATHERBOT_USER", default_value = "cli", global = true)]
    pub user: String,

    /// Reply language, overriding the stored preference
    #[arg(short, long, global = true)]
    pub lang: Option<String>,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Current conditions
    Current {
        /// City name, "City, Country" or "lat,lon"
        location: String,
    },

    /// Hourly or daily forecast
    Forecast {
        location: String,

        /// Next 12 hours (default)
        #[arg(long, conflicts_with = "days")]
        hours: bool,

        /// Next 7 days
        #[arg(long)]
        days: bool,
    },

    /// Air quality with composite index
    Air { location: String },

    /// Active weather alerts
    Alerts { location: String },

    /// Current, 12-hour, 7-day and air quality together
    Report { location: String },

    /// Sun and moon times
    Astronomy {
        location: String,

        /// Date as YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Find locations matching a name
    Search { text: String },

    /// Conditions on a past day
    History {
        location: String,

        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
    },

    /// Run a keyboard action from its callback data, e.g. "forecast_12h:Paris"
    Action { callback_data: String },

    /// Show or change the user's settings
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },

    /// Request statistics for the user
    Stats {
        /// Window in days
        #[arg(long, default_value = "30")]
        days: u32,
    },

    /// Bot-wide usage summary
    Analytics,

    /// Evict expired cache entries and old request logs once
    Cleanup,

    /// Run cache maintenance on its cron schedule until Ctrl-C
    ServeMaintenance,
}

#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// Store the reply language
    SetLanguage { language: String },

    /// Store temperature and wind units
    SetUnits(UnitArgs),

    /// Save a favorite location
    AddFavorite {
        name: String,

        /// Make it the default location
        #[arg(long)]
        default: bool,
    },

    /// Print stored settings
    Show,
}

#[derive(Debug, Args)]
pub struct UnitArgs {
    /// celsius or fahrenheit
    #[arg(long)]
    pub temperature: TemperatureUnit,

    /// kmh or mph
    #[arg(long)]
    pub wind: WindUnit,
}

/// Log filter for a `-v` count, `None` keeps the configured filter
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("weatherbot-cli").chain(args.iter().copied()))
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(log_filter_from_verbosity(0), None);
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
        assert_eq!(log_filter_from_verbosity(7), Some("trace"));
    }

    #[test]
    fn parses_current_with_globals() {
        let cli = parse(&["current", "Paris, France", "--user", "42", "--lang", "fr", "-vv"]).unwrap();
        assert_eq!(cli.user, "42");
        assert_eq!(cli.lang.as_deref(), Some("fr"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Current { location } if location == "Paris, France"));
    }

    #[test]
    fn forecast_flags_conflict() {
        assert!(parse(&["forecast", "Rome", "--hours", "--days"]).is_err());
        let cli = parse(&["forecast", "Rome", "--days"]).unwrap();
        assert!(matches!(cli.command, Commands::Forecast { days: true, hours: false, .. }));
    }

    #[test]
    fn history_requires_a_valid_date() {
        assert!(parse(&["history", "Oslo"]).is_err());
        assert!(parse(&["history", "Oslo", "--date", "15/01/2024"]).is_err());
        let cli = parse(&["history", "Oslo", "--date", "2024-01-15"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History { date, .. } if date == NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        ));
    }

    #[test]
    fn astronomy_date_is_optional() {
        let cli = parse(&["astronomy", "Lima"]).unwrap();
        assert!(matches!(cli.command, Commands::Astronomy { date: None, .. }));
    }

    #[test]
    fn parses_unit_preferences() {
        let cli = parse(&["prefs", "set-units", "--temperature", "fahrenheit", "--wind", "mph"]).unwrap();
        let Commands::Prefs {
            command: PrefsCommand::SetUnits(units),
        } = cli.command
        else {
            panic!("expected set-units");
        };
        assert_eq!(units.temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(units.wind, WindUnit::Mph);
    }

    #[test]
    fn rejects_unknown_units() {
        assert!(parse(&["prefs", "set-units", "--temperature", "kelvin", "--wind", "mph"]).is_err());
    }

    #[test]
    fn parses_maintenance_commands() {
        assert!(matches!(parse(&["cleanup"]).unwrap().command, Commands::Cleanup));
        assert!(matches!(
            parse(&["serve-maintenance"]).unwrap().command,
            Commands::ServeMaintenance
        ));
        assert!(matches!(
            parse(&["stats"]).unwrap().command,
            Commands::Stats { days: 30 }
        ));
    }

    #[test]
    fn default_user_is_cli() {
        if std::env::var_os("WEATHERBOT_USER").is_some() {
            return;
        }
        assert_eq!(parse(&["analytics"]).unwrap().user, "cli");
    }
}
