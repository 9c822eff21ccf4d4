//! Notification read-model services.

pub mod service;

pub use service::NotificationService;
