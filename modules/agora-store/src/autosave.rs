//! Periodic unconditional persistence.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::catalog::CatalogStore;

/// Spawn a task that persists all four collections every `period`,
/// whether or not anything changed. The first tick fires after one full
/// period, not immediately. Locks are held only for the synchronous
/// persist call; there is no await point inside the critical section.
pub fn spawn_autosave(store: Arc<Mutex<CatalogStore>>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await; // consume the immediate first tick
        loop {
            interval.tick().await;
            match store.lock() {
                Ok(mut store) => match store.persist_all() {
                    Ok(()) => debug!("autosave persisted all collections"),
                    Err(err) => warn!(error = %err, "autosave failed"),
                },
                Err(err) => warn!(error = %err, "autosave skipped: store lock poisoned"),
            }
        }
    })
}
