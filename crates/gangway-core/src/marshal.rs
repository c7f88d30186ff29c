//! Argument and result marshalling
//!
//! Decoding turns the wire argument array of an inbound call into the
//! native argument list a registered closure receives: data values pass
//! through structurally, callback slots become packed [`JsCallback`]
//! handles. Encoding turns native results back into wire values through
//! their `Serialize` implementation — implementing `Serialize` is the
//! explicit opt-in for exposing a native type's state on the wire.
//!
//! Encoding is side-effect-free and safe to call from any thread.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::descriptor::{ParamRole, ParamSpec};
use crate::error::{CallError, CallResult};
use crate::handle::{CallbackHandle, JsCallback};

// ============================================================================
// Caller context
// ============================================================================

/// Identity of the scripting instance behind an inbound call.
///
/// The dispatcher supplies one per message; the marshaller uses it to pack
/// callback handles and to report issued promise slots so the bridge can
/// enforce single resolution.
pub trait CallerContext {
    /// Id of the scripting instance the call came from
    fn instance_id(&self) -> u32;

    /// Called for every promise-terminal handle produced during decode
    fn promise_issued(&self, _handle: CallbackHandle) {}
}

// ============================================================================
// Native arguments
// ============================================================================

/// One decoded argument as passed to a registered native closure
#[derive(Clone, Debug)]
pub enum NativeArg {
    /// A structural wire value (primitive, string, array, or object)
    Value(Value),
    /// A packed callback or promise handle
    Callback(JsCallback),
}

impl NativeArg {
    /// Borrow the wire value, failing for callback arguments
    pub fn as_value(&self) -> CallResult<&Value> {
        match self {
            NativeArg::Value(v) => Ok(v),
            NativeArg::Callback(_) => Err(CallError::InvalidArgument(
                "expected a value, found a callback".to_string(),
            )),
        }
    }

    /// The callback handle, failing for data arguments
    pub fn as_callback(&self) -> CallResult<JsCallback> {
        match self {
            NativeArg::Callback(cb) => Ok(*cb),
            NativeArg::Value(v) => Err(CallError::InvalidArgument(format!(
                "expected a callback, found {}",
                wire_type_name(v)
            ))),
        }
    }

    /// String view of a data argument
    pub fn as_str(&self) -> CallResult<&str> {
        self.as_value()?.as_str().ok_or_else(|| {
            CallError::InvalidArgument(format!("expected string, found {}", self.type_name()))
        })
    }

    /// Integer view of a data argument
    pub fn as_i64(&self) -> CallResult<i64> {
        self.as_value()?.as_i64().ok_or_else(|| {
            CallError::InvalidArgument(format!("expected integer, found {}", self.type_name()))
        })
    }

    /// Float view of a data argument
    pub fn as_f64(&self) -> CallResult<f64> {
        self.as_value()?.as_f64().ok_or_else(|| {
            CallError::InvalidArgument(format!("expected number, found {}", self.type_name()))
        })
    }

    /// Boolean view of a data argument
    pub fn as_bool(&self) -> CallResult<bool> {
        self.as_value()?.as_bool().ok_or_else(|| {
            CallError::InvalidArgument(format!("expected bool, found {}", self.type_name()))
        })
    }

    fn type_name(&self) -> &'static str {
        match self {
            NativeArg::Value(v) => wire_type_name(v),
            NativeArg::Callback(_) => "callback",
        }
    }
}

/// Wire-level type name for diagnostics
pub fn wire_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Decode
// ============================================================================

/// Decode the wire argument array of one call against its declared
/// parameters.
///
/// Fewer arguments than parameters is an [`CallError::InvalidArgument`];
/// surplus arguments are ignored. Callback and promise parameters expect a
/// `{cid, vid}` object and produce a handle packed with the caller's
/// instance id.
pub fn decode_args(
    params: &[ParamSpec],
    args: &[Value],
    ctx: &dyn CallerContext,
) -> CallResult<Vec<NativeArg>> {
    if args.len() < params.len() {
        return Err(CallError::InvalidArgument(format!(
            "expected {} arguments, got {}",
            params.len(),
            args.len()
        )));
    }

    let mut decoded = Vec::with_capacity(params.len());
    for spec in params {
        let wire = &args[spec.position];
        match spec.role {
            ParamRole::Plain => {
                if !spec.ty.matches(wire) {
                    return Err(CallError::InvalidArgument(format!(
                        "argument {}: expected {}, found {}",
                        spec.position,
                        spec.ty.stub_name(),
                        wire_type_name(wire)
                    )));
                }
                decoded.push(NativeArg::Value(wire.clone()));
            }
            ParamRole::Callback | ParamRole::Promise => {
                let cb = decode_callback(spec, wire, ctx)?;
                if spec.role == ParamRole::Promise {
                    ctx.promise_issued(cb.handle());
                }
                decoded.push(NativeArg::Callback(cb));
            }
        }
    }
    Ok(decoded)
}

fn decode_callback(
    spec: &ParamSpec,
    wire: &Value,
    ctx: &dyn CallerContext,
) -> CallResult<JsCallback> {
    let info = wire.as_object().ok_or_else(|| {
        CallError::InvalidArgument(format!(
            "argument {}: expected a callback record, found {}",
            spec.position,
            wire_type_name(wire)
        ))
    })?;
    let cid = info.get("cid").and_then(Value::as_u64).ok_or_else(|| {
        CallError::InvalidArgument(format!("argument {}: callback record has no cid", spec.position))
    })?;
    let vid = info.get("vid").and_then(Value::as_u64).ok_or_else(|| {
        CallError::InvalidArgument(format!("argument {}: callback record has no vid", spec.position))
    })?;

    let handle = CallbackHandle::pack(ctx.instance_id(), cid as u32);
    Ok(JsCallback::new(
        handle,
        vid as u32,
        spec.role == ParamRole::Promise,
    ))
}

// ============================================================================
// Encode
// ============================================================================

/// Encode a native value into wire form.
///
/// Primitives and already-structured values pass through; sequences encode
/// element-wise; other types go through their `Serialize` implementation.
/// Failure degrades to `Null` with a diagnostic rather than propagating.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Value {
    match serde_json::to_value(value) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "failed to encode native value, substituting null");
            Value::Null
        }
    }
}

/// Render a reply: `Null` means "no value" and becomes the empty string
pub fn reply_text(value: &Value) -> String {
    if value.is_null() {
        return String::new();
    }
    match serde_json::to_string(value) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "failed to render reply");
            String::new()
        }
    }
}

/// Render an argument array as JSON text (callback and event envelopes
/// carry their payload as an embedded JSON string)
pub fn encode_args(args: &[Value]) -> String {
    match serde_json::to_string(args) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "failed to encode argument array");
            "[]".to_string()
        }
    }
}
