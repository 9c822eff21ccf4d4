//! # payflow-notifier
//!
//! The notification fan-out and addressing engine. Given a domain event
//! (an entity transitioning state), it resolves the recipient set (an
//! explicit user or every active holder of a role), assigns a priority,
//! renders a role-specific message per recipient, persists one record per
//! recipient, and delivers over the push and email channels under the
//! channel policies. Failures are absorbed and logged; nothing here may
//! break the business operation that triggered the event.

pub mod action;
pub mod channel;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod message;
pub mod priority;
pub mod resolver;
pub mod store;

pub use dispatcher::{DispatchSummary, NotificationDispatcher};
pub use error::{ChannelError, DispatchError};
pub use event::{NotificationEvent, Recipient};
