pub mod authenticate;
pub mod complete_two_factor;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod sweep_revocations;
pub mod two_factor_enrollment;

use bastion_core::{Principal, TokenError, TokenPair, TokenPolicy, TokenPurpose, TokenService};

/// Access and refresh tokens for one subject, each with its own token id.
pub(crate) fn issue_pair<T: TokenService>(
    tokens: &T,
    principal: &Principal,
    policy: &TokenPolicy,
) -> Result<TokenPair, TokenError> {
    let access = tokens.issue(
        principal,
        TokenPurpose::Access,
        policy.ttl(TokenPurpose::Access),
    )?;
    let refresh = tokens.issue(
        principal,
        TokenPurpose::Refresh,
        policy.ttl(TokenPurpose::Refresh),
    )?;
    Ok(TokenPair { access, refresh })
}
