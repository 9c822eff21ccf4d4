//! Notification domain entities.

pub mod details;
pub mod kind;
pub mod model;
pub mod priority;

pub use details::EventDetails;
pub use kind::NotificationKind;
pub use model::NotificationRecord;
pub use priority::Priority;
