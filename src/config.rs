//! Command line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::prefs::ColorScheme;
use crate::protocol::DEFAULT_API_URL;

/// Log file name inside the data directory.
pub const LOG_FILE: &str = "learn-web.log";

const APP_DIR: &str = "learn-web";

#[derive(Parser, Debug, Clone)]
#[command(name = "learn-web", version, about = "Learn Next.js, React and TypeScript in the terminal", long_about = None)]
pub struct Config {
    /// Base URL of the account API
    #[arg(long, env = "LEARN_WEB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Where accounts are checked
    #[arg(long, value_enum, default_value_t = BackendKind::Http)]
    pub backend: BackendKind,

    /// Directory for saved state and logs
    #[arg(long, env = "LEARN_WEB_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// JSON file to load the catalog from instead of the built-in content
    #[arg(long)]
    pub content: Option<PathBuf>,

    /// Override the detected terminal color scheme
    #[arg(long, value_enum)]
    pub system_theme: Option<SchemeArg>,

    /// Log filter, e.g. `info` or `learn_web=debug`
    #[arg(long, env = "LEARN_WEB_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load a catalog file, check it and print what it contains
    Validate {
        /// Catalog JSON file
        file: PathBuf,
    },
    /// Check the saved login against the server and print the user
    Whoami,
    /// Sign out and forget the saved login
    Logout,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The external HTTP API
    Http,
    /// An in-process store that forgets accounts on exit
    Memory,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeArg {
    Light,
    Dark,
}

impl From<SchemeArg> for ColorScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Light => ColorScheme::Light,
            SchemeArg::Dark => ColorScheme::Dark,
        }
    }
}

impl Config {
    /// The configured data directory, else the platform data dir, else the working directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
        })
    }

    /// The scheme "system" resolves to at startup.
    pub fn system_scheme(&self) -> ColorScheme {
        self.system_theme
            .map(ColorScheme::from)
            .or_else(ColorScheme::detect)
            .unwrap_or(ColorScheme::Light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["learn-web"]).unwrap();
        assert_eq!(config.backend, BackendKind::Http);
        assert_eq!(config.command, None);
        assert!(config.content.is_none());
        assert!(config.data_dir().ends_with(APP_DIR));
    }

    #[test]
    fn parses_flags_and_subcommands() {
        let config = Config::try_parse_from([
            "learn-web",
            "--api-url",
            "http://example.test",
            "--backend",
            "memory",
            "--data-dir",
            "/tmp/lw",
            "--system-theme",
            "dark",
            "validate",
            "catalog.json",
        ])
        .unwrap();

        assert_eq!(config.api_url, "http://example.test");
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/lw"));
        assert_eq!(config.system_scheme(), ColorScheme::Dark);
        assert_eq!(
            config.command,
            Some(Command::Validate {
                file: PathBuf::from("catalog.json")
            })
        );
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Config::try_parse_from(["learn-web", "--backend", "ldap"]).is_err());
    }
}
