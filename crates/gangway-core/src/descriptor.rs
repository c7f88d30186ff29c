//! Capability descriptors
//!
//! A capability is one native member (method, property, or constructor)
//! explicitly opted into cross-environment exposure. Descriptors are plain
//! structs attached at registration time; there is no runtime scanning.
//! The invoker half of a descriptor is a strongly-typed closure installed
//! by [`ClassBuilder`](crate::registry::ClassBuilder).

use std::sync::Arc;

use serde_json::Value;

use crate::error::CallResult;
use crate::marshal::{CallerContext, NativeArg};
use crate::object::{BindingObject, TargetMut, TargetRef};
use crate::registry::ClassRegistry;

// ============================================================================
// Member kinds and parameters
// ============================================================================

/// The kind of an exposed member
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    /// A callable member
    Method,
    /// A readable (and possibly writable) field
    Property,
    /// A factory for binding objects, with its own sub-registry
    Constructor,
}

impl MemberKind {
    /// Lowercase kind name for diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            MemberKind::Method => "method",
            MemberKind::Property => "property",
            MemberKind::Constructor => "constructor",
        }
    }
}

/// Structural type tag for a declared parameter.
///
/// `Any` passes the wire value through untouched; the concrete tags make
/// the marshaller validate the JSON shape before native code sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamType {
    /// No structural constraint
    Any,
    /// JSON boolean
    Bool,
    /// JSON integer
    Int,
    /// Any JSON number
    Float,
    /// JSON string
    String,
    /// JSON object literal
    Object,
    /// JSON array
    Array,
}

impl ParamType {
    /// Name used for generated proxy argument identifiers
    pub const fn stub_name(self) -> &'static str {
        match self {
            ParamType::Any => "any",
            ParamType::Bool => "bool",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::String => "string",
            ParamType::Object => "object",
            ParamType::Array => "array",
        }
    }

    /// Check a wire value against this tag
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ParamType::Any => true,
            ParamType::Bool => value.is_boolean(),
            ParamType::Int => value.is_i64() || value.is_u64(),
            ParamType::Float => value.is_number(),
            ParamType::String => value.is_string(),
            ParamType::Object => value.is_object(),
            ParamType::Array => value.is_array(),
        }
    }
}

/// How a parameter participates in the call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamRole {
    /// Ordinary data argument
    Plain,
    /// Callback handle; may fire any number of times
    Callback,
    /// Promise resolve/reject pair; must be the last parameter
    Promise,
}

/// A declared parameter, as written at registration time
#[derive(Clone, Copy, Debug)]
pub struct Param {
    /// Structural type tag
    pub ty: ParamType,
    /// Data, callback, or promise terminal
    pub role: ParamRole,
}

impl Param {
    /// A data parameter of the given type
    pub const fn of(ty: ParamType) -> Self {
        Param {
            ty,
            role: ParamRole::Plain,
        }
    }

    /// An unconstrained data parameter
    pub const fn any() -> Self {
        Param::of(ParamType::Any)
    }

    /// A callback-handle parameter
    pub const fn callback() -> Self {
        Param {
            ty: ParamType::Object,
            role: ParamRole::Callback,
        }
    }

    /// A promise-terminal parameter
    pub const fn promise() -> Self {
        Param {
            ty: ParamType::Object,
            role: ParamRole::Promise,
        }
    }
}

/// A validated parameter slot inside a built registry
#[derive(Clone, Copy, Debug)]
pub struct ParamSpec {
    /// Zero-based position in the call
    pub position: usize,
    /// Structural type tag
    pub ty: ParamType,
    /// Data, callback, or promise terminal
    pub role: ParamRole,
}

// ============================================================================
// Invoker closures
// ============================================================================

/// Type-erased method invoker
pub type MethodFn =
    Arc<dyn Fn(TargetMut<'_>, &dyn CallerContext, &[NativeArg]) -> CallResult<Value> + Send + Sync>;

/// Type-erased property getter
pub type GetterFn = Arc<dyn Fn(TargetRef<'_>) -> CallResult<Value> + Send + Sync>;

/// Type-erased property setter
pub type SetterFn = Arc<dyn Fn(TargetMut<'_>, Value) -> CallResult<()> + Send + Sync>;

/// Type-erased constructor; `None` means construction declined
pub type ConstructFn = Arc<
    dyn Fn(&dyn CallerContext, &[NativeArg]) -> CallResult<Option<Box<dyn BindingObject>>>
        + Send
        + Sync,
>;

pub(crate) enum Invoker {
    Method(MethodFn),
    Property {
        get: GetterFn,
        set: Option<SetterFn>,
    },
    Constructor {
        class: Arc<ClassRegistry>,
        construct: ConstructFn,
    },
}

// ============================================================================
// Capability
// ============================================================================

/// One exposed member: metadata plus its registered invoker
pub struct Capability {
    pub(crate) native_name: String,
    pub(crate) wire_name: String,
    pub(crate) kind: MemberKind,
    pub(crate) writable: bool,
    pub(crate) entry_point: bool,
    pub(crate) returns: bool,
    pub(crate) params: Vec<ParamSpec>,
    pub(crate) invoker: Invoker,
}

impl Capability {
    /// Native-side name (diagnostics)
    pub fn native_name(&self) -> &str {
        &self.native_name
    }

    /// Name the member is addressed by in messages
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    /// Member kind
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Whether a property accepts writes (always false for other kinds)
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Whether this member is the designated entry point
    pub fn is_entry_point(&self) -> bool {
        self.entry_point
    }

    /// Whether a method produces a value the proxy should wait for
    pub fn returns_value(&self) -> bool {
        self.returns
    }

    /// Declared parameters, in call order
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Sub-registry of the constructed class, for constructor capabilities
    pub fn constructed_class(&self) -> Option<&Arc<ClassRegistry>> {
        match &self.invoker {
            Invoker::Constructor { class, .. } => Some(class),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("wire_name", &self.wire_name)
            .field("kind", &self.kind.name())
            .field("writable", &self.writable)
            .field("entry_point", &self.entry_point)
            .field("params", &self.params.len())
            .finish()
    }
}
