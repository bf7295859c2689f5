//! Refresh orchestration
//!
//! One refresh issues the watch-list read, then fans out one task per
//! recipient (account info plus the best-effort pool/gauge lookups) and the
//! balance read, all concurrently and unbounded since watch lists are small.
//! Every task carries the [`SelectionId`] it was issued under; the state's
//! merge methods drop anything that arrives after the selection moved on.

use std::sync::Arc;

use injector::{InjectorReader, ReadError};
use tokio::sync::Mutex;
use tracing::warn;

use crate::selection::SelectionId;
use crate::state::SessionState;

/// Session state shared between the presentation surface and in-flight reads.
pub type SharedState = Arc<Mutex<SessionState>>;

/// Runs one full refresh cycle for the selection identified by `id`.
///
/// A watch-list failure is terminal for the cycle and is returned; everything
/// downstream is per-recipient best-effort, logged and absorbed so partial
/// results still render. Resolution only happens once all spawned reads have
/// settled, so callers can render immediately afterwards.
pub async fn refresh(
    reader: &InjectorReader,
    state: &SharedState,
    id: SelectionId,
) -> Result<(), ReadError> {
    let list = reader.watch_list().await?;
    {
        let mut guard = state.lock().await;
        if !guard.merge_watch_list(id, list.clone()) {
            return Ok(());
        }
    }

    // Resolved once so every reward_data lookup shares it; failure just
    // disables the period-finish fallback.
    let inject_token = reader.inject_token().await.ok();

    let mut tasks = Vec::with_capacity(list.len() + 1);

    for recipient in list {
        let reader = reader.clone();
        let state = Arc::clone(state);
        tasks.push(tokio::spawn(async move {
            match reader.account_info(recipient).await {
                Ok(info) => {
                    state.lock().await.merge_account_info(id, info);
                }
                Err(err) => {
                    // row stays Pending for this cycle
                    warn!("account info read failed for {recipient:#x}: {err}");
                }
            }

            let name = reader.pool_name(recipient).await;
            state.lock().await.merge_pool_name(id, recipient, name);

            if let Some(token) = inject_token {
                let finish = reader.period_finish(recipient, token).await;
                state.lock().await.merge_period_finish(id, recipient, finish);
            }
        }));
    }

    {
        let reader = reader.clone();
        let state = Arc::clone(state);
        tasks.push(tokio::spawn(async move {
            match reader.token_balance().await {
                Ok(balance) => {
                    state.lock().await.merge_balance(id, balance);
                }
                Err(err) => warn!("token balance read failed: {err}"),
            }
        }));
    }

    for task in tasks {
        if let Err(err) = task.await {
            warn!("refresh task panicked: {err}");
        }
    }

    Ok(())
}
