use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STATIC_DIR: &str = "./static";
pub const DEFAULT_ADMIN_USER: &str = "admin";

/// The one account that may log in. Its games feed the statistics.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn matches(&self, user: &str, password: &str) -> bool {
        (self.user == user) & (self.password == password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Server settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Holds `img/` and `pkg/` (the wasm-pack output).
    pub static_dir: PathBuf,
    /// `None` disables `/login`.
    pub admin: Option<Credentials>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            admin: None,
        }
    }
}

impl Config {
    /// `AHORCADO_HOST`, `PORT`, `AHORCADO_STATIC`, `AHORCADO_ADMIN_USER` and
    /// `AHORCADO_ADMIN_PASSWORD`, falling back to defaults.
    pub fn from_env() -> Config {
        Config::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Config {
        let defaults = Config::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("ignoring invalid PORT {raw:?}");
                defaults.port
            }),
            None => defaults.port,
        };
        let admin = match lookup("AHORCADO_ADMIN_PASSWORD") {
            Some(password) if !password.is_empty() => Some(Credentials {
                user: lookup("AHORCADO_ADMIN_USER").unwrap_or_else(|| DEFAULT_ADMIN_USER.to_string()),
                password,
            }),
            _ => {
                log::info!("AHORCADO_ADMIN_PASSWORD not set, admin login disabled");
                None
            }
        };
        Config {
            host: lookup("AHORCADO_HOST").unwrap_or(defaults.host),
            port,
            static_dir: lookup("AHORCADO_STATIC")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            admin,
        }
    }
}
