use clap::Parser;

use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    #[arg(
        short,
        long,
        value_name = "MS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Feed refresh interval in milliseconds (overrides sync_interval_ms)"
    )]
    pub sync_interval: Option<u64>,

    #[arg(
        short,
        long,
        value_name = "FLOAT",
        help = "Frame rate, i.e. number of frames per second",
        default_value_t = 30.0
    )]
    pub frame_rate: f64,

    #[arg(
        short,
        long,
        value_name = "FLOAT",
        help = "Tick rate, i.e. number of ticks per second",
        default_value_t = 4.0
    )]
    pub tick_rate: f64,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["skytui"]);
        assert_eq!(cli.sync_interval, None);
        assert_eq!(cli.frame_rate, 30.0);
    }

    #[test]
    fn test_sync_interval_flag() {
        let cli = Cli::parse_from(["skytui", "--sync-interval", "2500", "-f", "60"]);
        assert_eq!(cli.sync_interval, Some(2500));
        assert_eq!(cli.frame_rate, 60.0);
    }

    #[test]
    fn test_zero_sync_interval_is_rejected() {
        assert!(Cli::try_parse_from(["skytui", "-s", "0"]).is_err());
    }
}
