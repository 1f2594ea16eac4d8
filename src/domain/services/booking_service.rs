use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::models::booking::{Booking, BookingStatus, NewBookingParams, PaymentRefs};
use crate::domain::models::now_millis;
use crate::domain::ports::{BookingRepository, EventRepository};
use crate::error::AppError;

/// What a requested status change amounts to for a given booking.
#[derive(Debug)]
pub enum Transition {
    /// Route through the cancellation path, carrying the references to store.
    Cancel(PaymentRefs),
    /// Already cancelled and asked to cancel again.
    Unchanged,
    /// Write the updated record.
    Update(Booking),
}

/// Decides the effect of moving `booking` to `target`. Lifecycle stamps are
/// written only the first time their status is reached.
pub fn plan_transition(
    booking: &Booking,
    target: BookingStatus,
    refs: PaymentRefs,
    now: i64,
) -> Result<Transition, AppError> {
    if booking.status == BookingStatus::Cancelled {
        return match target {
            BookingStatus::Cancelled => Ok(Transition::Unchanged),
            other => Err(AppError::Conflict(format!(
                "Booking is cancelled and cannot move to '{}'",
                other
            ))),
        };
    }

    if target == BookingStatus::Cancelled {
        return Ok(Transition::Cancel(refs));
    }

    let mut updated = booking.clone();
    updated.status = target;
    updated.updated_at = now;
    if let Some(id) = refs.invoice_id {
        updated.invoice_id = Some(id);
    }
    if let Some(url) = refs.invoice_url {
        updated.invoice_url = Some(url);
    }
    if let Some(intent) = refs.payment_intent_id {
        updated.payment_intent_id = Some(intent);
    }

    match target {
        BookingStatus::Invoiced => {
            updated.invoice_sent_at.get_or_insert(now);
        }
        BookingStatus::Paid => {
            updated.paid_at.get_or_insert(now);
        }
        BookingStatus::Pending
        | BookingStatus::Confirmed
        | BookingStatus::Completed
        | BookingStatus::Cancelled => {}
    }

    Ok(Transition::Update(updated))
}

pub fn validate_new_booking(params: &NewBookingParams) -> Result<(), AppError> {
    if params.number_of_guests < 1 {
        return Err(AppError::Validation("number_of_guests must be at least 1".into()));
    }
    if params.total_amount < 0 {
        return Err(AppError::Validation("total_amount must not be negative".into()));
    }
    if params.contact_name.trim().is_empty() || params.contact_email.trim().is_empty() {
        return Err(AppError::Validation("contact_name and contact_email are required".into()));
    }
    Ok(())
}

/// Booking lifecycle: creation, status transitions and the single
/// cancellation path, each keeping the event attendee counter in step.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    events: Arc<dyn EventRepository>,
}

impl BookingService {
    pub fn new(bookings: Arc<dyn BookingRepository>, events: Arc<dyn EventRepository>) -> Self {
        Self { bookings, events }
    }

    /// Creates a pending booking and reserves its guests on the event.
    /// Capacity is not enforced; overbooking is only logged.
    pub async fn create(&self, params: NewBookingParams) -> Result<Booking, AppError> {
        validate_new_booking(&params)?;

        let booking = Booking::new(params);
        let created = self.bookings.create(&booking).await?;

        match self.events.find_by_id(&created.event_id).await? {
            Some(event) if event.is_overbooked() => {
                warn!(
                    event_id = %event.id,
                    capacity = event.capacity,
                    current_attendees = event.current_attendees,
                    "Event is overbooked"
                );
            }
            Some(event) => {
                info!(
                    event_id = %event.id,
                    remaining = event.remaining_capacity(),
                    "Seats reserved"
                );
            }
            None => {
                warn!(event_id = %created.event_id, "Booking created for unknown event; counter not adjusted");
            }
        }

        info!("Booking created: {} ({} guests)", created.id, created.number_of_guests);
        Ok(created)
    }

    pub async fn transition(
        &self,
        id: &str,
        target: BookingStatus,
        refs: PaymentRefs,
    ) -> Result<Booking, AppError> {
        let booking = self.bookings.find_by_id(id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        match plan_transition(&booking, target, refs, now_millis())? {
            Transition::Cancel(refs) => self.cancel_with_refs(id, None, &refs).await,
            Transition::Unchanged => Ok(booking),
            Transition::Update(updated) => {
                let saved = self.bookings.update_status(&updated).await?;
                info!("Booking {} moved to {}", saved.id, saved.status);
                Ok(saved)
            }
        }
    }

    /// Cancels a booking and releases its seats. Cancelling twice is a no-op.
    pub async fn cancel(&self, id: &str, reason: Option<&str>) -> Result<Booking, AppError> {
        self.cancel_with_refs(id, reason, &PaymentRefs::default()).await
    }

    async fn cancel_with_refs(
        &self,
        id: &str,
        reason: Option<&str>,
        refs: &PaymentRefs,
    ) -> Result<Booking, AppError> {
        let cancelled = self.bookings.cancel(id, reason, refs, now_millis()).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        info!("Booking cancelled: {}", cancelled.id);
        Ok(cancelled)
    }
}
