use bastion_core::{AuthContext, AuthError, RevocationStore, TokenPurpose, TokenService};

/// Bearer check for protected routes: the cheap stateless validation runs first, the
/// revocation lookup only for tokens that pass it.
pub struct AuthenticateUseCase<'a, R, T>
where
    R: RevocationStore,
    T: TokenService,
{
    revocations: &'a R,
    tokens: &'a T,
}

impl<'a, R, T> AuthenticateUseCase<'a, R, T>
where
    R: RevocationStore,
    T: TokenService,
{
    pub fn new(revocations: &'a R, tokens: &'a T) -> Self {
        Self {
            revocations,
            tokens,
        }
    }

    #[tracing::instrument(name = "AuthenticateUseCase::execute", skip_all)]
    pub async fn execute(&self, bearer: &str) -> Result<AuthContext, AuthError> {
        let claims = self.tokens.validate(bearer, TokenPurpose::Access)?;

        if self.revocations.is_revoked(&claims.token_id).await? {
            return Err(AuthError::TokenRevoked);
        }

        Ok(AuthContext::from(claims))
    }
}
