use tracing::{info, warn};

use crate::domain::models::now_millis;
use crate::domain::ports::{AttendeeDrift, EventRepository};
use crate::error::AppError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    pub checked: usize,
    pub corrected: usize,
}

/// Recomputes one event's attendee counter from its bookings.
pub async fn reconcile_event(repo: &dyn EventRepository, event_id: &str) -> Result<Option<AttendeeDrift>, AppError> {
    let drift = repo.reconcile_attendees(event_id, now_millis()).await?;
    if let Some(d) = drift {
        warn!(
            event_id = %event_id,
            before = d.before,
            after = d.after,
            "Attendee counter drift corrected"
        );
    }
    Ok(drift)
}

/// Recomputes every event's counter. A failure on one event is logged and
/// does not stop the pass.
pub async fn reconcile_all(repo: &dyn EventRepository) -> Result<ReconcileReport, AppError> {
    let ids = repo.list_ids().await?;
    let mut report = ReconcileReport::default();

    for id in &ids {
        report.checked += 1;
        match reconcile_event(repo, id).await {
            Ok(Some(_)) => report.corrected += 1,
            Ok(None) => {}
            Err(e) => warn!(event_id = %id, "Reconciliation failed: {}", e),
        }
    }

    info!(checked = report.checked, corrected = report.corrected, "Reconciliation pass finished");
    Ok(report)
}
