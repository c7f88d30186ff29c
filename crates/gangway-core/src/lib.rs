//! Gangway core — capability registry, marshalling, and callback handles
//!
//! This crate holds the transport-independent half of the bridge: the
//! per-class capability registry built through a typed registration
//! builder, the marshaller converting between wire values and native
//! arguments, and the packed callback handles that correlate asynchronous
//! replies with the scripting instance that requested them.
//!
//! # Example
//!
//! ```ignore
//! use gangway_core::{ClassRegistry, Param, ParamType, Value};
//!
//! struct Echo { prefix: String }
//! impl gangway_core::BindingObject for Echo {}
//!
//! let registry = ClassRegistry::builder::<Echo>("Echo")
//!     .property("prefix", |e: &Echo| Value::from(e.prefix.clone()))
//!     .method("echo", &[Param::of(ParamType::String)], |e, _ctx, args| {
//!         Ok(Value::from(format!("{}{}", e.prefix, args[0].as_str()?)))
//!     })
//!     .events(["updatePrefix"])
//!     .build();
//! ```

#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod handle;
pub mod marshal;
pub mod object;
pub mod registry;

pub use descriptor::{Capability, MemberKind, Param, ParamRole, ParamSpec, ParamType};
pub use error::{CallError, CallResult};
pub use handle::{CallbackHandle, JsCallback};
pub use marshal::{CallerContext, NativeArg};
pub use object::{BindingObject, TargetMut, TargetRef};
pub use registry::{ClassBuilder, ClassRegistry};

/// Wire value: a JSON value as carried by bridge messages
pub use serde_json::Value;
