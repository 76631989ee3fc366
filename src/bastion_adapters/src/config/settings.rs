use std::time::Duration as StdDuration;

use bastion_core::{ConfigurationError, LockoutPolicy, TokenPolicy};
use chrono::Duration;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use secrecy::Secret;
use serde::Deserialize;

use crate::config::constants::{
    CONFIG_FILE, ENV_PREFIX, ENV_SEPARATOR,
    defaults::{
        ACCESS_TTL_SECS, ISSUER, LOCKOUT_MAX_ATTEMPTS, LOCKOUT_WINDOW_SECS, PENDING_2FA_TTL_SECS,
        REFRESH_TTL_SECS, SWEEP_INTERVAL_SECS,
    },
    prod::{APP_HOST, APP_PORT},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub redis: RedisSettings,
    #[serde(default)]
    pub sweep: SweepSettings,
    #[serde(default)]
    pub bootstrap: BootstrapSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: APP_HOST.to_string(),
            port: APP_PORT,
        }
    }
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub jwt: JwtSettings,
    pub lockout: LockoutSettings,
    pub totp: TotpSettings,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JwtSettings {
    pub secret: Secret<String>,
    pub issuer: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
    pub pending_2fa_ttl_secs: i64,
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: Secret::from(String::new()),
            issuer: ISSUER.to_string(),
            access_ttl_secs: ACCESS_TTL_SECS,
            refresh_ttl_secs: REFRESH_TTL_SECS,
            pending_2fa_ttl_secs: PENDING_2FA_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LockoutSettings {
    pub max_attempts: u32,
    pub window_secs: i64,
}

impl Default for LockoutSettings {
    fn default() -> Self {
        Self {
            max_attempts: LOCKOUT_MAX_ATTEMPTS,
            window_secs: LOCKOUT_WINDOW_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TotpSettings {
    pub issuer: String,
}

impl Default for TotpSettings {
    fn default() -> Self {
        Self {
            issuer: ISSUER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    pub url: Option<Secret<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    pub host_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    pub interval_secs: u64,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            interval_secs: SWEEP_INTERVAL_SECS,
        }
    }
}

impl SweepSettings {
    pub fn interval(&self) -> StdDuration {
        StdDuration::from_secs(self.interval_secs.max(1))
    }
}

/// First-run admin account. Seeded only when both fields are set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BootstrapSettings {
    pub admin_username: Option<String>,
    pub admin_password: Option<Secret<String>>,
}

impl Settings {
    /// Defaults, then `config/bastion.*` if present, then `BASTION__*` environment variables.
    /// A `.env` file is read into the environment first.
    pub fn load() -> Result<Self, ConfigurationError> {
        dotenvy::dotenv().ok();

        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("auth.allowed_origins"),
            );

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigurationError> {
        builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| ConfigurationError::InvalidSettings(e.to_string()))
    }

    pub fn token_policy(&self) -> Result<TokenPolicy, ConfigurationError> {
        let jwt = &self.auth.jwt;
        TokenPolicy::new(
            seconds("auth.jwt.access_ttl_secs", jwt.access_ttl_secs)?,
            seconds("auth.jwt.refresh_ttl_secs", jwt.refresh_ttl_secs)?,
            seconds("auth.jwt.pending_2fa_ttl_secs", jwt.pending_2fa_ttl_secs)?,
        )
    }

    pub fn lockout_policy(&self) -> Result<LockoutPolicy, ConfigurationError> {
        let lockout = &self.auth.lockout;
        LockoutPolicy::new(
            lockout.max_attempts,
            seconds("auth.lockout.window_secs", lockout.window_secs)?,
        )
    }
}

fn seconds(key: &str, secs: i64) -> Result<Duration, ConfigurationError> {
    Duration::try_seconds(secs)
        .ok_or_else(|| ConfigurationError::InvalidSettings(format!("{key} is out of range")))
}
