use std::sync::Arc;

use bastion_adapters::{
    Argon2PasswordHasher, HashMapCredentialStore, HashMapRevocationStore, JwtTokenService,
    PostgresCredentialStore, PostgresRevocationStore, RedisRevocationStore, Settings, SystemClock,
    TotpRsVerifier,
};
use bastion_application::{AuthPolicy, AuthPorts, Authenticator};
use bastion_auth_service::{
    AllowedOrigins, AuthService, get_postgres_pool, get_redis_connection, run_migrations,
    seed_admin, spawn_revocation_sweeper,
};
use bastion_core::{CredentialStore, Password, RevocationStore, Username};
use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    // Load configuration. Anything wrong here is fatal before a socket is opened.
    let settings = Settings::load()?;
    let policy = AuthPolicy {
        tokens: settings.token_policy()?,
        lockout: settings.lockout_policy()?,
    };
    let tokens = JwtTokenService::new(
        settings.auth.jwt.secret.clone(),
        settings.auth.jwt.issuer.clone(),
        SystemClock,
    )?;

    let redis = settings
        .redis
        .host_name
        .as_deref()
        .map(get_redis_connection)
        .transpose()?;

    match settings.postgres.url.clone() {
        Some(url) => {
            let pg_pool = get_postgres_pool(&url).await?;
            run_migrations(&pg_pool).await?;

            let credentials = PostgresCredentialStore::new(pg_pool.clone());
            match redis {
                Some(conn) => {
                    let revocations = RedisRevocationStore::new(conn, SystemClock);
                    serve(settings, policy, tokens, credentials, revocations).await
                }
                None => {
                    let revocations = PostgresRevocationStore::new(pg_pool);
                    serve(settings, policy, tokens, credentials, revocations).await
                }
            }
        }
        None => {
            tracing::warn!("No PostgreSQL configured, accounts live in memory only");

            let credentials = HashMapCredentialStore::new();
            match redis {
                Some(conn) => {
                    let revocations = RedisRevocationStore::new(conn, SystemClock);
                    serve(settings, policy, tokens, credentials, revocations).await
                }
                None => {
                    let revocations = HashMapRevocationStore::new();
                    serve(settings, policy, tokens, credentials, revocations).await
                }
            }
        }
    }
}

async fn serve<S, R>(
    settings: Settings,
    policy: AuthPolicy,
    tokens: JwtTokenService<SystemClock>,
    credentials: S,
    revocations: R,
) -> Result<()>
where
    S: CredentialStore + 'static,
    R: RevocationStore + 'static,
{
    let scheme = Arc::new(Authenticator::new(
        AuthPorts {
            credentials,
            revocations,
            hasher: Argon2PasswordHasher,
            tokens,
            totp: TotpRsVerifier::new(settings.auth.totp.issuer.clone()),
            clock: SystemClock,
        },
        policy,
    ));

    let bootstrap = &settings.bootstrap;
    if let (Some(username), Some(password)) = (&bootstrap.admin_username, &bootstrap.admin_password)
    {
        seed_admin(
            scheme.credentials(),
            scheme.hasher(),
            Username::parse(username.clone())?,
            Password::parse(password.clone())?,
        )
        .await?;
    }

    let _sweeper = spawn_revocation_sweeper(scheme.clone(), settings.sweep.interval());

    // Get allowed origins from config
    let allowed_origins = AllowedOrigins::parse(&settings.auth.allowed_origins)?;
    let allowed_origins = (!allowed_origins.is_empty()).then_some(allowed_origins);

    let listener = tokio::net::TcpListener::bind(settings.server.address()).await?;
    tracing::info!("Starting bastion auth service...");

    AuthService::new(scheme)
        .run_standalone(listener, allowed_origins)
        .await?;

    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
