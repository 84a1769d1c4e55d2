//! Handles settings for the application.
//!
//! Settings are read from `config/settings.toml` (or the file passed with
//! `--config`) and from `TAP_GAME__*` environment variables, e.g.
//! `TAP_GAME__SERVER__ADMIN_KEY`.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use engine::{DEFAULT_REFERRAL_BONUS, StartingBalance};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/settings";

#[derive(Debug, Parser)]
#[command(name = "tap_game", about = "Backend of the tap game")]
struct Args {
    /// Settings file path (without extension is fine).
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub admin_key: Option<String>,
    #[serde(default = "default_max_leaderboard")]
    pub max_leaderboard: u64,
}

#[derive(Debug, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub starting_balance: StartingBalance,
    #[serde(default = "default_referral_bonus")]
    pub referral_bonus: i64,
}

impl Default for Game {
    fn default() -> Self {
        Self {
            starting_balance: StartingBalance::default(),
            referral_bonus: default_referral_bonus(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    pub webapp_url: String,
    pub server: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
    #[serde(default)]
    pub game: Game,
    pub telegram: Option<Telegram>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        Self::from_path(&args.config)
    }

    fn from_path(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TAP_GAME").separator("__"))
            .build()?
            .try_deserialize()
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_max_leaderboard() -> u64 {
    100
}

fn default_referral_bonus() -> i64 {
    DEFAULT_REFERRAL_BONUS
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn full_settings() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 3000
            database = { sqlite = "tap_game.db" }
            admin_key = "secret"

            [game]
            starting_balance = { random = { min = 100, max = 1000 } }
            referral_bonus = 3000

            [telegram]
            token = "123:abc"
            webapp_url = "https://example.com/"
            server = "http://127.0.0.1:3000"
            "#,
        );

        assert_eq!(settings.app.level, "debug");
        let server = settings.server.unwrap();
        assert!(matches!(server.database, Database::Sqlite(ref path) if path == "tap_game.db"));
        assert_eq!(server.admin_key.as_deref(), Some("secret"));
        assert_eq!(server.max_leaderboard, 100);
        assert_eq!(
            settings.game.starting_balance,
            StartingBalance::Random { min: 100, max: 1000 }
        );
        assert!(settings.telegram.is_some());
    }

    #[test]
    fn defaults_apply() {
        let settings = parse(
            r#"
            [server]
            port = 3000
            database = "memory"
            "#,
        );

        assert_eq!(settings.app.level, "info");
        assert!(matches!(settings.server.unwrap().database, Database::Memory));
        assert_eq!(settings.game.starting_balance, StartingBalance::Fixed(0));
        assert_eq!(settings.game.referral_bonus, 3000);
        assert!(settings.telegram.is_none());
    }
}
