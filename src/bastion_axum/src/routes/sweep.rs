use std::sync::Arc;

use axum::{Json, extract::State};
use bastion_core::SupportsRevocationSweep;
use serde::{Deserialize, Serialize};

use crate::error::AuthApiError;

/// Admin-only. Drops revocation entries whose tokens have expired.
#[tracing::instrument(name = "Sweep revocations", skip_all)]
pub async fn sweep_revocations<A>(
    State(scheme): State<Arc<A>>,
) -> Result<Json<SweepResponse>, AuthApiError>
where
    A: SupportsRevocationSweep,
{
    let removed = scheme.sweep_revocations().await?;

    Ok(Json(SweepResponse { removed }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SweepResponse {
    pub removed: u64,
}
