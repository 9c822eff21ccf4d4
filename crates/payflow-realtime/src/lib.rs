//! # payflow-realtime
//!
//! Real-time push delivery for Payflow. The hub keeps a per-user registry
//! of live WebSocket connections and implements the notifier's push
//! channel seam: a notification addressed to an online user is fanned out
//! to every socket that user has open, and an offline user is a
//! successful no-op because the persisted record is the source of truth.

pub mod hub;
pub mod message;

pub use hub::{ConnectionId, PushHub};
pub use message::OutboundMessage;
