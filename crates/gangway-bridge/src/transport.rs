//! Transport boundary
//!
//! The bridge never assumes how messages physically reach the scripting
//! side — only that delivery is best-effort and per-target order is
//! preserved. Outbound posting may happen from any thread, so implementors
//! own the write-side synchronization.

/// Host-provided channel toward the scripting side
pub trait Transport: Send + Sync {
    /// Deliver a message to one scripting instance
    fn post_message(&self, instance_id: u32, message: &str);

    /// Deliver a message to every live scripting instance
    fn broadcast_message(&self, message: &str);
}
