//! Gangway bridge — dispatcher, instance store, and outbound channel
//!
//! The transport-facing half of the bridge. A [`Bridge`] owns one exposed
//! extension: the capability registry built in `gangway-core`, the
//! singleton object behind object id 0, the arena of constructed binding
//! objects, and the outbound [`Remote`] that native code uses for callback
//! resolution, event broadcast, and property-change notices.
//!
//! Inbound traffic enters through [`Bridge::on_message`] (fire-and-forget)
//! and [`Bridge::on_sync_message`] (call/response). The host supplies the
//! physical channel by implementing [`Transport`].

#![warn(missing_docs)]

pub mod bridge;
mod outbound;
pub mod remote;
pub mod store;
pub mod transport;

pub use bridge::Bridge;
pub use outbound::ConsoleLevel;
pub use remote::Remote;
pub use store::{InstanceRecord, InstanceStore};
pub use transport::Transport;
