//! Message dispatcher
//!
//! [`Bridge`] owns one exposed extension: its capability registry, the
//! singleton object behind object id 0, the instance store, and the
//! outbound [`Remote`]. Each inbound message is processed to completion
//! before the next is accepted; no failure mode unwinds past a single
//! message or disturbs the store.

use std::sync::Arc;

use gangway_core::{
    marshal, BindingObject, CallError, CallResult, CallbackHandle, CallerContext, ClassRegistry,
    Value,
};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::warn;

use crate::outbound::ConsoleLevel;
use crate::remote::Remote;
use crate::store::{InstanceRecord, InstanceStore};
use crate::transport::Transport;

// ============================================================================
// Inbound message shapes
// ============================================================================

#[derive(Deserialize)]
struct RawMessage {
    cmd: Option<String>,
    #[serde(rename = "objectId")]
    object_id: Option<u32>,
    #[serde(rename = "__constructor")]
    constructor: Option<String>,
    name: Option<String>,
    args: Option<Vec<Value>>,
    value: Option<Value>,
    #[serde(rename = "bindingObjectId")]
    binding_object_id: Option<u32>,
}

/// One validated inbound call record
enum Command {
    Invoke {
        object_id: u32,
        constructor: String,
        name: String,
        args: Vec<Value>,
    },
    New {
        object_id: u32,
        constructor: String,
        name: String,
        args: Vec<Value>,
        new_object_id: u32,
    },
    Get {
        object_id: u32,
        constructor: String,
        name: String,
    },
    Set {
        object_id: u32,
        constructor: String,
        name: String,
        value: Value,
    },
    Released {
        object_id: u32,
    },
}

impl Command {
    /// Validate required fields per command kind; `Err` carries the
    /// diagnostic for the malformed-message path.
    fn from_raw(raw: RawMessage) -> Result<Command, String> {
        let cmd = raw.cmd.ok_or("missing cmd")?;
        let object_id = raw.object_id.ok_or("missing objectId")?;

        if cmd == "instanceReleased" {
            return Ok(Command::Released { object_id });
        }

        let constructor = raw.constructor.ok_or("missing __constructor")?;
        let name = raw.name.ok_or("missing name")?;

        match cmd.as_str() {
            "invokeNative" => Ok(Command::Invoke {
                object_id,
                constructor,
                name,
                args: raw.args.ok_or("missing args")?,
            }),
            "newInstance" => Ok(Command::New {
                object_id,
                constructor,
                name,
                args: raw.args.ok_or("missing args")?,
                new_object_id: raw.binding_object_id.ok_or("missing bindingObjectId")?,
            }),
            "getProperty" => Ok(Command::Get {
                object_id,
                constructor,
                name,
            }),
            "setProperty" => Ok(Command::Set {
                object_id,
                constructor,
                name,
                value: raw.value.ok_or("missing value")?,
            }),
            other => Err(format!("unsupported cmd: {other}")),
        }
    }
}

// ============================================================================
// Caller scope
// ============================================================================

struct CallScope<'a> {
    instance_id: u32,
    remote: &'a Remote,
}

impl CallerContext for CallScope<'_> {
    fn instance_id(&self) -> u32 {
        self.instance_id
    }

    fn promise_issued(&self, handle: CallbackHandle) {
        self.remote.promise_issued(handle);
    }
}

// ============================================================================
// Bridge
// ============================================================================

struct BridgeState {
    singleton: Box<dyn BindingObject>,
    store: InstanceStore,
}

/// One exposed extension: registry, singleton, instance store, and the
/// outbound channel.
pub struct Bridge {
    name: String,
    js_api: String,
    registry: Arc<ClassRegistry>,
    remote: Remote,
    state: Mutex<BridgeState>,
}

impl Bridge {
    /// Assemble a bridge.
    ///
    /// The singleton factory receives the outbound [`Remote`] so the
    /// extension object can keep a clone for callbacks and events. The
    /// scripting-side stub is generated from the registry; use
    /// [`with_js_api`](Bridge::with_js_api) to substitute hand-written
    /// stub text.
    pub fn new<F>(
        name: &str,
        registry: ClassRegistry,
        transport: Arc<dyn Transport>,
        singleton: F,
    ) -> Self
    where
        F: FnOnce(&Remote) -> Box<dyn BindingObject>,
    {
        let registry = Arc::new(registry);
        let remote = Remote::new(name, registry.clone(), transport);
        let singleton = singleton(&remote);
        let js_api = gangway_stubgen::generate(&registry);

        Bridge {
            name: name.to_string(),
            js_api,
            registry,
            remote,
            state: Mutex::new(BridgeState {
                singleton,
                store: InstanceStore::new(),
            }),
        }
    }

    /// Replace the generated stub with hand-written proxy source
    pub fn with_js_api(mut self, js_api: impl Into<String>) -> Self {
        self.js_api = js_api.into();
        self
    }

    /// Extension name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scripting-side proxy source for this extension
    pub fn js_api(&self) -> &str {
        &self.js_api
    }

    /// Wire names of entry-point capabilities (the externally-triggered
    /// initializer surface)
    pub fn entry_points(&self) -> Vec<&str> {
        self.registry
            .entry_point()
            .map(|cap| cap.wire_name())
            .into_iter()
            .collect()
    }

    /// The extension's capability registry
    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// The outbound channel
    pub fn remote(&self) -> &Remote {
        &self.remote
    }

    /// Fire-and-forget entry point for inbound traffic
    pub fn on_message(&self, instance_id: u32, message: &str) {
        let _ = self.on_sync_message(instance_id, message);
    }

    /// Call/response entry point for inbound traffic.
    ///
    /// Returns the encoded reply value, or the empty string when there is
    /// no value (including every recoverable failure).
    pub fn on_sync_message(&self, instance_id: u32, message: &str) -> String {
        let raw: RawMessage = match serde_json::from_str(message) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(extension = %self.name, error = %e, "malformed message");
                return String::new();
            }
        };
        let cmd = match Command::from_raw(raw) {
            Ok(cmd) => cmd,
            Err(reason) => {
                warn!(extension = %self.name, %reason, "malformed message");
                return String::new();
            }
        };

        let scope = CallScope {
            instance_id,
            remote: &self.remote,
        };
        match self.dispatch(&scope, cmd) {
            Ok(value) => marshal::reply_text(&value),
            Err(CallError::InvalidArgument(reason)) => {
                // Bad argument shapes are surfaced to the remote caller's
                // console so the scripting side can diagnose the call.
                warn!(extension = %self.name, %reason, "invalid argument");
                self.remote
                    .log_console(instance_id, ConsoleLevel::Warn, &reason);
                String::new()
            }
            Err(CallError::Unsupported(reason)) => {
                warn!(extension = %self.name, %reason, "unsupported capability");
                String::new()
            }
            Err(CallError::Serialization(reason)) => {
                warn!(extension = %self.name, %reason, "reply serialization failed");
                "null".to_string()
            }
        }
    }

    /// Registry addressed by a message's `__constructor` field; an unknown
    /// name falls back to the extension's own registry.
    fn resolve_registry(&self, constructor: &str) -> &Arc<ClassRegistry> {
        if constructor.is_empty() {
            return &self.registry;
        }
        self.registry
            .constructor_registry(constructor)
            .unwrap_or(&self.registry)
    }

    fn dispatch(&self, scope: &CallScope<'_>, cmd: Command) -> CallResult<Value> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        match cmd {
            Command::Invoke {
                object_id,
                constructor,
                name,
                args,
            } => {
                let registry = self.resolve_registry(&constructor);
                if object_id == 0 {
                    if constructor.is_empty() {
                        registry.invoke(
                            Some(state.singleton.as_any_mut()),
                            scope,
                            &name,
                            &args,
                        )
                    } else {
                        registry.invoke(None, scope, &name, &args)
                    }
                } else {
                    let record = Self::instance(&mut state.store, object_id, &constructor)?;
                    registry.invoke(Some(record.object_mut().as_any_mut()), scope, &name, &args)
                }
            }

            Command::New {
                object_id,
                constructor,
                name,
                args,
                new_object_id,
            } => {
                if object_id != 0 {
                    // Constructors take no receiver, but the addressed
                    // instance must still exist and match its registry.
                    Self::instance(&mut state.store, object_id, &constructor)?;
                }
                let registry = self.resolve_registry(&constructor);
                match registry.construct(scope, &name, &args)? {
                    Some(object) => {
                        let added = state
                            .store
                            .add(InstanceRecord::new(new_object_id, &name, object));
                        if !added {
                            warn!(
                                extension = %self.name,
                                id = new_object_id,
                                "instance id already in use"
                            );
                        }
                        Ok(Value::Bool(added))
                    }
                    None => Ok(Value::Bool(false)),
                }
            }

            Command::Get {
                object_id,
                constructor,
                name,
            } => {
                let registry = self.resolve_registry(&constructor);
                if object_id == 0 {
                    if constructor.is_empty() {
                        registry.get_property(Some(state.singleton.as_any()), &name)
                    } else {
                        registry.get_property(None, &name)
                    }
                } else {
                    let record = Self::instance(&mut state.store, object_id, &constructor)?;
                    registry.get_property(Some(record.object().as_any()), &name)
                }
            }

            Command::Set {
                object_id,
                constructor,
                name,
                value,
            } => {
                let registry = self.resolve_registry(&constructor);
                if object_id == 0 {
                    if constructor.is_empty() {
                        registry.set_property(
                            Some(state.singleton.as_any_mut()),
                            &name,
                            value,
                        )?;
                    } else {
                        registry.set_property(None, &name, value)?;
                    }
                } else {
                    let record = Self::instance(&mut state.store, object_id, &constructor)?;
                    registry.set_property(Some(record.object_mut().as_any_mut()), &name, value)?;
                }
                Ok(Value::Null)
            }

            Command::Released { object_id } => {
                if state.store.remove(object_id).is_none() {
                    warn!(
                        extension = %self.name,
                        id = object_id,
                        "release notice for unknown instance"
                    );
                }
                Ok(Value::Null)
            }
        }
    }

    fn instance<'a>(
        store: &'a mut InstanceStore,
        object_id: u32,
        constructor: &str,
    ) -> CallResult<&'a mut InstanceRecord> {
        let record = store
            .find_mut(object_id)
            .ok_or_else(|| CallError::Unsupported(format!("unknown instance: {object_id}")))?;
        if record.constructor() != constructor {
            return Err(CallError::Unsupported(format!(
                "instance {object_id} was not built by constructor {constructor}"
            )));
        }
        Ok(record)
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.state.lock().store.clear();
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("name", &self.name)
            .field("class", &self.registry.class_name())
            .field("instances", &self.state.lock().store.len())
            .finish()
    }
}
