use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, info_span, Instrument};

use crate::domain::services::reconciliation::reconcile_all;
use crate::state::AppState;

/// Periodically recomputes every event's attendee counter from its bookings.
pub async fn start_reconciliation_worker(state: Arc<AppState>, every: Duration) {
    info!("Starting attendee reconciliation worker (every {:?})", every);

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; skip it so startup is not slowed down.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let span = info_span!("reconciliation_pass");
        async {
            if let Err(e) = reconcile_all(state.event_repo.as_ref()).await {
                error!("Reconciliation pass failed: {:?}", e);
            }
        }
        .instrument(span)
        .await;
    }
}
