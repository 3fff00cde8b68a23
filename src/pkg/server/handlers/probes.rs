use axum::extract::State;

use crate::{
    pkg::{internal::scratch, server::state::AppState},
    prelude::Result,
};

pub async fn livez() -> Result<()> {
    tracing::debug!("service is live");
    Ok(())
}

pub async fn healthz(State(state): State<AppState>) -> Result<()> {
    scratch::ensure_dir(&state.contact.scratch_dir).await?;
    tracing::debug!("service is healthy");
    Ok(())
}
