//! Settings from a RON file, overridden by command-line flags.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    board::Mark,
    computer::Strategy,
    error::ConfigError,
    game::{Mode, PlayerNames},
    session::DEFAULT_COMPUTER_DELAY,
};

pub const DEFAULT_CONFIG_PATH: &str = "noughts-and-crosses.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the match history and mute preference are kept.
    pub data_dir: PathBuf,
    pub computer_delay_ms: u64,
    pub strategy: Strategy,
    pub mode: Mode,
    pub x_name: String,
    pub o_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".noughts-and-crosses"),
            computer_delay_ms: DEFAULT_COMPUTER_DELAY.as_millis() as u64,
            strategy: Strategy::default(),
            mode: Mode::default(),
            x_name: String::new(),
            o_name: String::new(),
        }
    }
}

impl Config {
    /// Reads `path`; a missing file means all defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let mut config = Self::load(&cli.config)?;
        cli.apply(&mut config);
        Ok(config)
    }

    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }

    pub fn names(&self) -> PlayerNames {
        PlayerNames {
            x: self.x_name.clone(),
            o: self.o_name.clone(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "noughts-and-crosses", version, about = "Noughts & crosses in the terminal")]
pub struct Cli {
    /// Config file (RON)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// Directory for match history and preferences
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    /// Let the computer play this mark (x or o)
    #[arg(long, value_name = "MARK")]
    pub computer: Option<Mark>,
    /// Two people share the keyboard, even if the config names a computer
    #[arg(long, conflicts_with = "computer")]
    pub friends: bool,
    /// How long the computer thinks, in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,
    #[arg(long, value_name = "NAME")]
    pub x_name: Option<String>,
    #[arg(long, value_name = "NAME")]
    pub o_name: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(mark) = self.computer {
            config.mode = Mode::Computer(mark);
        }
        if self.friends {
            config.mode = Mode::Friends;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.computer_delay_ms = delay_ms;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(name) = self.x_name {
            config.x_name = name;
        }
        if let Some(name) = self.o_name {
            config.o_name = name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.ron")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.computer_delay(), Duration::from_millis(500));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        fs::write(&path, r#"(mode: Computer(O), x_name: "Annie", strategy: Random)"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.mode, Mode::Computer(Mark::O));
        assert_eq!(config.strategy, Strategy::Random);
        assert_eq!(config.names().x, "Annie");
        assert_eq!(config.computer_delay_ms, 500);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        fs::write(&path, "(mode: Sideways").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn flags_override_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        fs::write(&path, r#"(mode: Computer(O), computer_delay_ms: 100)"#).unwrap();

        let cli = Cli::parse_from([
            "noughts-and-crosses",
            "--config",
            path.to_str().unwrap(),
            "--computer",
            "x",
            "--strategy",
            "random",
            "--o-name",
            "Zach",
        ]);
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.mode, Mode::Computer(Mark::X));
        assert_eq!(config.strategy, Strategy::Random);
        assert_eq!(config.o_name, "Zach");
        assert_eq!(config.computer_delay_ms, 100);
    }

    #[test]
    fn friends_flag_disables_the_computer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        fs::write(&path, r#"(mode: Computer(X))"#).unwrap();

        let cli = Cli::parse_from([
            "noughts-and-crosses",
            "--config",
            path.to_str().unwrap(),
            "--friends",
        ]);
        assert_eq!(Config::from_cli(cli).unwrap().mode, Mode::Friends);
    }
}
