//! Outbound channel toward the scripting side
//!
//! [`Remote`] is the clonable half of the bridge that native code keeps for
//! callback resolution, event dispatch, property-change notices, and
//! console forwarding. It is safe to hand to background threads; the
//! transport implementor owns write-side synchronization.

use std::sync::Arc;

use gangway_core::{marshal, CallbackHandle, ClassRegistry, JsCallback, Value};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::warn;

use crate::outbound::{
    CallInfo, CallbackEnvelope, ConsoleEnvelope, ConsoleLevel, EventEnvelope, PropertyEnvelope,
};
use crate::transport::Transport;

/// Clonable outbound handle scoped to one class registry
#[derive(Clone)]
pub struct Remote {
    name: Arc<str>,
    registry: Arc<ClassRegistry>,
    transport: Arc<dyn Transport>,
    pending: Arc<Mutex<FxHashSet<u64>>>,
}

impl Remote {
    pub(crate) fn new(
        name: &str,
        registry: Arc<ClassRegistry>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            name: Arc::from(name),
            registry,
            transport,
            pending: Arc::new(Mutex::new(FxHashSet::default())),
        }
    }

    /// A remote scoped to another registry (event/property checks then run
    /// against that class), sharing the transport and pending-promise set
    pub fn scoped(&self, registry: Arc<ClassRegistry>) -> Remote {
        Remote {
            name: self.name.clone(),
            registry,
            transport: self.transport.clone(),
            pending: self.pending.clone(),
        }
    }

    /// The registry this remote validates against
    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// Invoke a scripting-side callback.
    ///
    /// `key` selects within the retained callback value (`"resolve"` /
    /// `"reject"` for promise pairs, `None` for a plain function).
    /// Resolving a promise handle that is no longer pending is a no-op
    /// with a diagnostic, never an error.
    pub fn invoke_callback(&self, cb: JsCallback, key: Option<&str>, args: &[Value]) {
        if cb.is_promise() && !self.pending.lock().remove(&cb.handle().to_bits()) {
            warn!(
                extension = %self.name,
                handle = ?cb.handle(),
                "promise handle no longer pending, resolution dropped"
            );
            return;
        }

        let (instance_id, cid) = cb.handle().unpack();
        let envelope = CallbackEnvelope {
            cmd: "invokeCallback",
            call_info: CallInfo {
                cid,
                vid: cb.arg_index(),
            },
            key,
            args: marshal::encode_args(args),
        };
        self.post(instance_id, &envelope);
    }

    /// Resolve a promise handle
    pub fn resolve(&self, cb: JsCallback, args: &[Value]) {
        self.invoke_callback(cb, Some("resolve"), args);
    }

    /// Reject a promise handle
    pub fn reject(&self, cb: JsCallback, args: &[Value]) {
        self.invoke_callback(cb, Some("reject"), args);
    }

    /// Forward a log line to one scripting instance's console
    pub fn log_console(&self, instance_id: u32, level: ConsoleLevel, msg: &str) {
        let envelope = ConsoleEnvelope {
            cmd: "error",
            level: level.as_str(),
            msg,
        };
        self.post(instance_id, &envelope);
    }

    /// Broadcast an event to every live scripting instance.
    ///
    /// Rejected with a diagnostic (no message sent) when `event_type` is
    /// not in the class's declared event list.
    pub fn dispatch_event<T: Serialize>(&self, event_type: &str, payload: &T) {
        if !self.registry.is_event_supported(event_type) {
            warn!(
                extension = %self.name,
                event = %event_type,
                "event not in the declared event list, dropped"
            );
            return;
        }

        let encoded = marshal::encode(payload);
        let event = serde_json::to_string(&encoded).unwrap_or_else(|_| "null".to_string());
        let envelope = EventEnvelope {
            cmd: "dispatchEvent",
            event_type,
            event,
        };
        self.broadcast(&envelope);
    }

    /// Broadcast a "this property changed, re-read it" notice.
    ///
    /// No value is pushed; listeners issue a fresh property read. Rejected
    /// with a diagnostic when `name` is not a known property.
    pub fn update_property(&self, name: &str) {
        if !self.registry.has_property(name) {
            warn!(
                extension = %self.name,
                property = %name,
                "unknown property, change notice dropped"
            );
            return;
        }

        let envelope = PropertyEnvelope {
            cmd: "updateProperty",
            name,
        };
        self.broadcast(&envelope);
    }

    pub(crate) fn promise_issued(&self, handle: CallbackHandle) {
        self.pending.lock().insert(handle.to_bits());
    }

    fn post<T: Serialize>(&self, instance_id: u32, envelope: &T) {
        match serde_json::to_string(envelope) {
            Ok(text) => self.transport.post_message(instance_id, &text),
            Err(e) => warn!(extension = %self.name, error = %e, "failed to render envelope"),
        }
    }

    fn broadcast<T: Serialize>(&self, envelope: &T) {
        match serde_json::to_string(envelope) {
            Ok(text) => self.transport.broadcast_message(&text),
            Err(e) => warn!(extension = %self.name, error = %e, "failed to render envelope"),
        }
    }
}

impl std::fmt::Debug for Remote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Remote")
            .field("extension", &self.name)
            .field("class", &self.registry.class_name())
            .field("pending", &self.pending.lock().len())
            .finish()
    }
}
