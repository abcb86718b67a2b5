//! Names of the platform events and of the entities they refer to.
//!
//! Event types are `<entity>.<verb>` and are stored verbatim in
//! `activity_log.event_type`.

// Entity types (activity_log.source_entity_type).
pub const ENTITY_USER: &str = "user";
pub const ENTITY_EVENT: &str = "event";
pub const ENTITY_APPLICATION: &str = "application";
pub const ENTITY_BOOKING: &str = "booking";
pub const ENTITY_DISPUTE: &str = "dispute";
pub const ENTITY_REVIEW: &str = "review";

pub const USER_REGISTERED: &str = "user.registered";

pub const EVENT_CREATED: &str = "event.created";
pub const EVENT_PUBLISHED: &str = "event.published";
pub const EVENT_UNPUBLISHED: &str = "event.unpublished";

pub const APPLICATION_SUBMITTED: &str = "application.submitted";
pub const APPLICATION_APPROVED: &str = "application.approved";
pub const APPLICATION_REJECTED: &str = "application.rejected";

pub const BOOKING_REQUESTED: &str = "booking.requested";
pub const BOOKING_CONFIRMED: &str = "booking.confirmed";
pub const BOOKING_DECLINED: &str = "booking.declined";
pub const BOOKING_CANCELLED: &str = "booking.cancelled";
pub const BOOKING_PAID: &str = "booking.paid";
pub const BOOKING_COMPLETED: &str = "booking.completed";

pub const PAYMENT_RELEASED: &str = "payment.released";
pub const PAYMENT_REFUNDED: &str = "payment.refunded";

pub const DISPUTE_OPENED: &str = "dispute.opened";
pub const DISPUTE_RESPONDED: &str = "dispute.responded";
pub const DISPUTE_RESOLVED: &str = "dispute.resolved";

pub const REVIEW_CREATED: &str = "review.created";
