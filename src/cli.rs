//! Command-line interface definition.
use std::path::PathBuf;

use clap::Parser;

/// Version string reported by `--version`.
pub const VERSION: &str = match option_env!("WEECFG_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Command line of `wee_config`.
///
/// Every operation is a flag rather than a subcommand; which combinations
/// are allowed is decided by [`crate::options::Options::from_cli`].
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "wee_config",
    about = "Install, upgrade, or reconfigure a weewx configuration file",
    version = VERSION
)]
pub struct Cli {
    /// Install a new configuration file from the distribution template
    #[arg(long)]
    pub install: bool,

    /// Merge an existing configuration file into a newer distribution template
    #[arg(long)]
    pub upgrade: bool,

    /// Change the station settings of an existing configuration file
    #[arg(long)]
    pub reconfigure: bool,

    /// List the configured skins and whether each is enabled
    #[arg(long)]
    pub list_skins: bool,

    /// Enable the named skin
    #[arg(long, value_name = "SKIN")]
    pub enable_skin: Option<String>,

    /// Disable the named skin
    #[arg(long, value_name = "SKIN")]
    pub disable_skin: Option<String>,

    /// List the available station drivers
    #[arg(long)]
    pub list_drivers: bool,

    /// Distribution configuration file used as the template
    #[arg(long, value_name = "FILE")]
    pub dist_config: Option<PathBuf>,

    /// Existing configuration file
    #[arg(long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Existing configuration file (same as --config)
    #[arg(value_name = "CONFIG_FILE")]
    pub config_arg: Option<PathBuf>,

    /// Where to write the result instead of the configuration file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not back up the file being replaced
    #[arg(long)]
    pub no_backup: bool,

    /// Do not prompt; use command-line values, then existing values, then defaults
    #[arg(long)]
    pub no_prompt: bool,

    /// Log every change made to the configuration
    #[arg(long)]
    pub debug: bool,

    /// Station altitude with unit, e.g. 700,foot
    #[arg(long, value_name = "VALUE,UNIT", allow_hyphen_values = true)]
    pub altitude: Option<String>,

    /// Station latitude in decimal degrees, negative for south
    #[arg(long, value_name = "DEGREES", allow_hyphen_values = true)]
    pub latitude: Option<String>,

    /// Station longitude in decimal degrees, negative for west
    #[arg(long, value_name = "DEGREES", allow_hyphen_values = true)]
    pub longitude: Option<String>,

    /// Brief description of the station, such as its location
    #[arg(long, value_name = "TEXT")]
    pub location: Option<String>,

    /// Unit system used by reports
    #[arg(long, value_parser = ["us", "metricwx", "metric"])]
    pub units: Option<String>,

    /// Driver module, e.g. weewx.drivers.vantage
    #[arg(long, value_name = "MODULE")]
    pub driver: Option<String>,

    /// Whether to register the station with weewx.com
    #[arg(long, value_parser = ["true", "false"])]
    pub register_this_station: Option<String>,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install() {
        let cli = Cli::parse_from([
            "wee_config",
            "--install",
            "--dist-config",
            "dist.conf",
            "--output",
            "weewx.conf",
        ]);
        assert!(cli.install);
        assert_eq!(cli.dist_config, Some(PathBuf::from("dist.conf")));
        assert_eq!(cli.output, Some(PathBuf::from("weewx.conf")));
    }

    #[test]
    fn parse_positional_config() {
        let cli = Cli::parse_from(["wee_config", "--list-skins", "/etc/weewx/weewx.conf"]);
        assert!(cli.list_skins);
        assert_eq!(cli.config_arg, Some(PathBuf::from("/etc/weewx/weewx.conf")));
        assert_eq!(cli.config_path, None);
    }

    #[test]
    fn parse_config_flag() {
        let cli = Cli::parse_from(["wee_config", "--reconfigure", "--config", "w.conf"]);
        assert_eq!(cli.config_path, Some(PathBuf::from("w.conf")));
    }

    #[test]
    fn parse_skin_names() {
        let cli = Cli::parse_from(["wee_config", "--enable-skin", "Seasons"]);
        assert_eq!(cli.enable_skin.as_deref(), Some("Seasons"));
        let cli = Cli::parse_from(["wee_config", "--disable-skin", "Mobile"]);
        assert_eq!(cli.disable_skin.as_deref(), Some("Mobile"));
    }

    #[test]
    fn parse_negative_coordinates() {
        let cli = Cli::parse_from([
            "wee_config",
            "--reconfigure",
            "--latitude",
            "-33.9",
            "--longitude",
            "-71.1",
        ]);
        assert_eq!(cli.latitude.as_deref(), Some("-33.9"));
        assert_eq!(cli.longitude.as_deref(), Some("-71.1"));
    }

    #[test]
    fn parse_station_overrides() {
        let cli = Cli::parse_from([
            "wee_config",
            "--reconfigure",
            "--no-prompt",
            "--altitude=700,foot",
            "--units=metric",
            "--driver=weewx.drivers.vantage",
            "--register-this-station=false",
            "--location",
            "Boston, MA",
        ]);
        assert!(cli.no_prompt);
        assert_eq!(cli.altitude.as_deref(), Some("700,foot"));
        assert_eq!(cli.units.as_deref(), Some("metric"));
        assert_eq!(cli.driver.as_deref(), Some("weewx.drivers.vantage"));
        assert_eq!(cli.register_this_station.as_deref(), Some("false"));
        assert_eq!(cli.location.as_deref(), Some("Boston, MA"));
    }

    #[test]
    fn unknown_unit_system_is_rejected() {
        assert!(Cli::try_parse_from(["wee_config", "--reconfigure", "--units", "imperial"]).is_err());
    }

    #[test]
    fn flags_default_off() {
        let cli = Cli::parse_from(["wee_config"]);
        assert!(!cli.install && !cli.upgrade && !cli.reconfigure);
        assert!(!cli.no_backup && !cli.no_prompt && !cli.debug);
        assert!(!cli.list_skins && !cli.list_drivers);
    }
}
