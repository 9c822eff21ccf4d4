//! Dispatch and channel error taxonomy.
//!
//! These errors never cross the notifier boundary: the dispatcher absorbs
//! and logs them so the triggering business operation succeeds or fails on
//! its own state mutation alone.

use thiserror::Error;
use uuid::Uuid;

use payflow_core::error::AppError;

/// A failure that aborts a single dispatch call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The emitting user could not be found.
    #[error("emitter user {0} not found")]
    EmitterNotFound(Uuid),

    /// Neither the explicit recipient nor the role resolved to any active
    /// user. Treated as a logged no-op, not a crash.
    #[error("no recipients resolved for dispatch")]
    NoRecipients,

    /// The user directory lookup itself failed at the storage layer.
    #[error("recipient resolution failed: {0}")]
    Resolution(#[from] AppError),
}

/// A failure delivering over a single side channel for a single recipient.
///
/// Isolated per recipient and per channel; logged, never propagated.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The delivery attempt exceeded the configured bound.
    #[error("channel delivery timed out after {0} ms")]
    Timeout(u64),

    /// The provider rejected or failed the delivery.
    #[error("channel delivery failed: {0}")]
    Delivery(String),
}
