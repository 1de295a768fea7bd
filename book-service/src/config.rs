use crate::utils::file::DEFAULT_BOOKS_FILE;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub books_file: PathBuf,
    /// Run load/mutate/save one writer at a time. Off by default: concurrent
    /// writers race and the last save wins.
    pub serialize_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            books_file: PathBuf::from(DEFAULT_BOOKS_FILE),
            serialize_writes: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `lookup`. Values that fail to parse fall back to
    /// the default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid PORT {:?}, using {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        let books_file = lookup("BOOKS_FILE")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.books_file);

        let serialize_writes = match lookup("BOOKS_SERIALIZE_WRITES") {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                warn!("Ignoring invalid BOOKS_SERIALIZE_WRITES {:?}", raw);
                defaults.serialize_writes
            }),
            None => defaults.serialize_writes,
        };

        Self {
            port,
            books_file,
            serialize_writes,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
