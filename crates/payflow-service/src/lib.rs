//! # payflow-service
//!
//! Business logic service layer for Payflow. Services orchestrate
//! repositories to implement application-level use cases, with all
//! dependencies injected at construction time via `Arc` references.

pub mod context;
pub mod notification;

pub use context::RequestContext;
pub use notification::NotificationService;
