/// Prefix of environment overrides, e.g. `BASTION__AUTH__JWT__SECRET`.
pub const ENV_PREFIX: &str = "BASTION";
pub const ENV_SEPARATOR: &str = "__";

/// Optional settings file, any format the `config` crate recognises by extension.
pub const CONFIG_FILE: &str = "config/bastion";

/// HS256 keys shorter than the hash output are rejected.
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

pub mod defaults {
    pub const ISSUER: &str = "bastion";
    pub const ACCESS_TTL_SECS: i64 = 15 * 60;
    pub const REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;
    pub const PENDING_2FA_TTL_SECS: i64 = 5 * 60;
    pub const LOCKOUT_MAX_ATTEMPTS: u32 = 5;
    pub const LOCKOUT_WINDOW_SECS: i64 = 15 * 60;
    pub const SWEEP_INTERVAL_SECS: u64 = 60 * 60;
}

pub mod prod {
    pub const APP_HOST: &str = "0.0.0.0";
    pub const APP_PORT: u16 = 3000;
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
}
