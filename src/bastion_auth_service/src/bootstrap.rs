use bastion_core::{
    AuthError, CredentialStore, CredentialStoreError, Password, PasswordHasher, Role, Username,
};

/// Creates the first admin account.
///
/// Returns `false` without touching the store when the username is already taken, so it is safe
/// to call on every start.
#[tracing::instrument(name = "Seeding admin account", skip_all, fields(username = %username))]
pub async fn seed_admin<S, H>(
    credentials: &S,
    hasher: &H,
    username: Username,
    password: Password,
) -> Result<bool, AuthError>
where
    S: CredentialStore,
    H: PasswordHasher,
{
    if credentials.lookup(&username).await?.is_some() {
        tracing::debug!("Admin account already present");
        return Ok(false);
    }

    let password_hash = hasher.hash(&password).await?;

    match credentials
        .create_user(username, password_hash, Role::Admin)
        .await
    {
        Ok(principal) => {
            tracing::info!(user_id = %principal.id, "Admin account created");
            Ok(true)
        }
        // Lost a race with another instance seeding the same account.
        Err(CredentialStoreError::UserAlreadyExists) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
