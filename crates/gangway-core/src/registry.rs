//! Capability registry and its typed builder
//!
//! A [`ClassRegistry`] is built once per exposed class through
//! [`ClassBuilder`], which installs a strongly-typed closure per member —
//! the compile-time registration table that replaces runtime member
//! discovery. Building never fails: malformed registrations are skipped
//! with a diagnostic, naming conflicts resolve in favor of the first
//! registration, and the result is always a usable registry.

use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::warn;

use crate::descriptor::{
    Capability, ConstructFn, GetterFn, Invoker, MemberKind, MethodFn, Param, ParamRole, ParamSpec,
    SetterFn,
};
use crate::error::{CallError, CallResult};
use crate::marshal::{decode_args, CallerContext, NativeArg};
use crate::object::{BindingObject, TargetMut, TargetRef};

// ============================================================================
// Registry
// ============================================================================

/// The name→capability table of one exposed class.
///
/// Member iteration order is registration order, which the stub generator
/// relies on for deterministic output.
pub struct ClassRegistry {
    class_name: String,
    members: IndexMap<String, Capability>,
    constructors: FxHashMap<String, Arc<ClassRegistry>>,
    events: Option<Vec<String>>,
    entry_point: Option<Capability>,
}

impl ClassRegistry {
    /// Start building a registry for the native type `T`
    pub fn builder<T: 'static>(class_name: &str) -> ClassBuilder<T> {
        ClassBuilder::new(class_name)
    }

    /// Class name (diagnostics only)
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Look up a member by wire name
    pub fn lookup(&self, name: &str) -> Option<&Capability> {
        self.members.get(name)
    }

    /// Members in registration order
    pub fn members(&self) -> impl Iterator<Item = &Capability> {
        self.members.values()
    }

    /// Whether `name` resolves to something callable (method or constructor)
    pub fn has_method(&self, name: &str) -> bool {
        matches!(
            self.members.get(name).map(Capability::kind),
            Some(MemberKind::Method) | Some(MemberKind::Constructor)
        )
    }

    /// Whether `name` resolves to a property
    pub fn has_property(&self, name: &str) -> bool {
        matches!(
            self.members.get(name).map(Capability::kind),
            Some(MemberKind::Property)
        )
    }

    /// Declared event names, if the class carries an event list
    pub fn event_list(&self) -> Option<&[String]> {
        self.events.as_deref()
    }

    /// Whether `event` is in the declared event list
    pub fn is_event_supported(&self, event: &str) -> bool {
        self.events
            .as_deref()
            .is_some_and(|list| list.iter().any(|e| e == event))
    }

    /// The designated entry point, if one survived construction
    pub fn entry_point(&self) -> Option<&Capability> {
        self.entry_point.as_ref()
    }

    /// Sub-registry of an exposed constructor, by its wire name
    pub fn constructor_registry(&self, wire_name: &str) -> Option<&Arc<ClassRegistry>> {
        self.constructors.get(wire_name)
    }

    // ------------------------------------------------------------------------
    // Invocation surface
    // ------------------------------------------------------------------------

    /// Decode arguments and invoke a method member
    pub fn invoke(
        &self,
        target: TargetMut<'_>,
        ctx: &dyn CallerContext,
        name: &str,
        args: &[Value],
    ) -> CallResult<Value> {
        let cap = self
            .members
            .get(name)
            .ok_or_else(|| CallError::unknown_member(name))?;
        match &cap.invoker {
            Invoker::Method(f) => {
                let decoded = decode_args(&cap.params, args, ctx)?;
                f(target, ctx, &decoded)
            }
            Invoker::Constructor { .. } => Err(CallError::Unsupported(format!(
                "{name} is a constructor and must be invoked through newInstance"
            ))),
            Invoker::Property { .. } => {
                Err(CallError::Unsupported(format!("{name} is not callable")))
            }
        }
    }

    /// Decode arguments and run a constructor member.
    ///
    /// `Ok(None)` means the constructor declined to produce an instance.
    pub fn construct(
        &self,
        ctx: &dyn CallerContext,
        name: &str,
        args: &[Value],
    ) -> CallResult<Option<Box<dyn BindingObject>>> {
        let cap = self
            .members
            .get(name)
            .ok_or_else(|| CallError::unknown_member(name))?;
        match &cap.invoker {
            Invoker::Constructor { construct, .. } => {
                let decoded = decode_args(&cap.params, args, ctx)?;
                construct(ctx, &decoded)
            }
            _ => Err(CallError::Unsupported(format!(
                "{name} is not a constructor"
            ))),
        }
    }

    /// Read a property member
    pub fn get_property(&self, target: TargetRef<'_>, name: &str) -> CallResult<Value> {
        let cap = self
            .members
            .get(name)
            .ok_or_else(|| CallError::unknown_member(name))?;
        match &cap.invoker {
            Invoker::Property { get, .. } => get(target),
            _ => Err(CallError::Unsupported(format!("{name} is not a property"))),
        }
    }

    /// Write a property member
    pub fn set_property(
        &self,
        target: TargetMut<'_>,
        name: &str,
        value: Value,
    ) -> CallResult<()> {
        let cap = self
            .members
            .get(name)
            .ok_or_else(|| CallError::unknown_member(name))?;
        match &cap.invoker {
            Invoker::Property { set: Some(set), .. } => set(target, value),
            Invoker::Property { set: None, .. } => Err(CallError::Unsupported(format!(
                "{name} is a read-only property"
            ))),
            _ => Err(CallError::Unsupported(format!("{name} is not a property"))),
        }
    }
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("class", &self.class_name)
            .field("members", &self.members.len())
            .field("constructors", &self.constructors.len())
            .field("events", &self.events)
            .field("entry_point", &self.entry_point.as_ref().map(|c| &c.wire_name))
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

enum EventDecl {
    Typed(Vec<String>),
    Wire(Value),
}

struct Pending {
    native_name: String,
    wire_name: Option<String>,
    kind: MemberKind,
    writable: bool,
    entry_point: bool,
    returns: bool,
    params: Vec<Param>,
    invoker: Invoker,
}

/// Fluent, typed registration table for one exposed class.
///
/// `wire_name` and `entry_point` modify the most recently registered
/// member, so declarations read top to bottom:
///
/// ```ignore
/// let registry = ClassRegistry::builder::<Echo>("Echo")
///     .property("prefix", |e: &Echo| Value::from(e.prefix.clone()))
///     .method("echo", &[Param::of(ParamType::String)], |e, _ctx, args| {
///         Ok(Value::from(format!("{}{}", e.prefix, args[0].as_str()?)))
///     })
///     .events(["updatePrefix", "click"])
///     .build();
/// ```
pub struct ClassBuilder<T> {
    class_name: String,
    pending: Vec<Pending>,
    events: Option<EventDecl>,
    _marker: PhantomData<fn(T)>,
}

fn receiver_mut<'a, T: 'static>(target: TargetMut<'a>, member: &str) -> CallResult<&'a mut T> {
    target
        .ok_or_else(|| CallError::Unsupported(format!("{member} requires an instance")))?
        .downcast_mut::<T>()
        .ok_or_else(|| CallError::bad_receiver(member))
}

fn receiver_ref<'a, T: 'static>(target: TargetRef<'a>, member: &str) -> CallResult<&'a T> {
    target
        .ok_or_else(|| CallError::Unsupported(format!("{member} requires an instance")))?
        .downcast_ref::<T>()
        .ok_or_else(|| CallError::bad_receiver(member))
}

impl<T: 'static> ClassBuilder<T> {
    /// Start an empty builder for `class_name`
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            pending: Vec::new(),
            events: None,
            _marker: PhantomData,
        }
    }

    fn push(
        mut self,
        name: &str,
        kind: MemberKind,
        writable: bool,
        returns: bool,
        params: &[Param],
        invoker: Invoker,
    ) -> Self {
        self.pending.push(Pending {
            native_name: name.to_string(),
            wire_name: None,
            kind,
            writable,
            entry_point: false,
            returns,
            params: params.to_vec(),
            invoker,
        });
        self
    }

    /// Register a method whose result is returned to the caller
    pub fn method<F>(self, name: &str, params: &[Param], f: F) -> Self
    where
        F: Fn(&mut T, &dyn CallerContext, &[NativeArg]) -> CallResult<Value>
            + Send
            + Sync
            + 'static,
    {
        let member = name.to_string();
        let invoker: MethodFn = Arc::new(move |target, ctx, args| {
            f(receiver_mut::<T>(target, &member)?, ctx, args)
        });
        self.push(name, MemberKind::Method, false, true, params, Invoker::Method(invoker))
    }

    /// Register a fire-and-forget method (no reply value)
    pub fn void_method<F>(self, name: &str, params: &[Param], f: F) -> Self
    where
        F: Fn(&mut T, &dyn CallerContext, &[NativeArg]) -> CallResult<()> + Send + Sync + 'static,
    {
        let member = name.to_string();
        let invoker: MethodFn = Arc::new(move |target, ctx, args| {
            f(receiver_mut::<T>(target, &member)?, ctx, args)?;
            Ok(Value::Null)
        });
        self.push(name, MemberKind::Method, false, false, params, Invoker::Method(invoker))
    }

    /// Register a method on the static surface (no receiver)
    pub fn static_method<F>(self, name: &str, params: &[Param], f: F) -> Self
    where
        F: Fn(&dyn CallerContext, &[NativeArg]) -> CallResult<Value> + Send + Sync + 'static,
    {
        let invoker: MethodFn = Arc::new(move |_target, ctx, args| f(ctx, args));
        self.push(name, MemberKind::Method, false, true, params, Invoker::Method(invoker))
    }

    /// Register a fire-and-forget method on the static surface
    pub fn static_void_method<F>(self, name: &str, params: &[Param], f: F) -> Self
    where
        F: Fn(&dyn CallerContext, &[NativeArg]) -> CallResult<()> + Send + Sync + 'static,
    {
        let invoker: MethodFn = Arc::new(move |_target, ctx, args| {
            f(ctx, args)?;
            Ok(Value::Null)
        });
        self.push(name, MemberKind::Method, false, false, params, Invoker::Method(invoker))
    }

    /// Register a read-only property
    pub fn property<G>(self, name: &str, get: G) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let member = name.to_string();
        let getter: GetterFn =
            Arc::new(move |target| Ok(get(receiver_ref::<T>(target, &member)?)));
        self.push(
            name,
            MemberKind::Property,
            false,
            false,
            &[],
            Invoker::Property { get: getter, set: None },
        )
    }

    /// Register a read/write property
    pub fn property_rw<G, S>(self, name: &str, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
        S: Fn(&mut T, Value) -> CallResult<()> + Send + Sync + 'static,
    {
        let get_member = name.to_string();
        let set_member = name.to_string();
        let getter: GetterFn =
            Arc::new(move |target| Ok(get(receiver_ref::<T>(target, &get_member)?)));
        let setter: SetterFn =
            Arc::new(move |target, value| set(receiver_mut::<T>(target, &set_member)?, value));
        self.push(
            name,
            MemberKind::Property,
            true,
            false,
            &[],
            Invoker::Property { get: getter, set: Some(setter) },
        )
    }

    /// Register a read-only property on the static surface
    pub fn static_property<G>(self, name: &str, get: G) -> Self
    where
        G: Fn() -> Value + Send + Sync + 'static,
    {
        let getter: GetterFn = Arc::new(move |_target| Ok(get()));
        self.push(
            name,
            MemberKind::Property,
            false,
            false,
            &[],
            Invoker::Property { get: getter, set: None },
        )
    }

    /// Register a constructor producing binding objects of type `U`,
    /// dispatched through `class` once stored
    pub fn constructor<U, F>(self, name: &str, params: &[Param], class: ClassRegistry, f: F) -> Self
    where
        U: BindingObject,
        F: Fn(&dyn CallerContext, &[NativeArg]) -> CallResult<Option<U>> + Send + Sync + 'static,
    {
        let construct: ConstructFn = Arc::new(move |ctx, args| {
            Ok(f(ctx, args)?.map(|obj| Box::new(obj) as Box<dyn BindingObject>))
        });
        self.push(
            name,
            MemberKind::Constructor,
            false,
            true,
            params,
            Invoker::Constructor {
                class: Arc::new(class),
                construct,
            },
        )
    }

    /// Override the wire name of the most recently registered member
    pub fn wire_name(mut self, name: &str) -> Self {
        match self.pending.last_mut() {
            Some(member) => member.wire_name = Some(name.to_string()),
            None => warn!(class = %self.class_name, "wire_name() with no member to apply to"),
        }
        self
    }

    /// Flag the most recently registered member as the entry point
    pub fn entry_point(mut self) -> Self {
        match self.pending.last_mut() {
            Some(member) => member.entry_point = true,
            None => warn!(class = %self.class_name, "entry_point() with no member to apply to"),
        }
        self
    }

    /// Declare the supported event names
    pub fn events<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = Some(EventDecl::Typed(names.into_iter().map(Into::into).collect()));
        self
    }

    /// Declare the event list from a wire value.
    ///
    /// Anything other than an array of strings is skipped with a
    /// diagnostic, leaving the class without an event list.
    pub fn event_list_value(mut self, value: Value) -> Self {
        self.events = Some(EventDecl::Wire(value));
        self
    }

    /// Validate flags, resolve conflicts, and produce the registry.
    ///
    /// Never fails: invalid registrations degrade to diagnostics.
    pub fn build(self) -> ClassRegistry {
        let class_name = self.class_name;
        let mut members: IndexMap<String, Capability> = IndexMap::new();
        let mut constructors: FxHashMap<String, Arc<ClassRegistry>> = FxHashMap::default();
        let mut entry_point: Option<Capability> = None;

        for m in self.pending {
            let wire_name = m.wire_name.unwrap_or_else(|| m.native_name.clone());
            let params = validate_params(&class_name, &wire_name, &m.params);

            // Sub-registries stay reachable even when the constructor member
            // itself ends up as the entry point.
            if let Invoker::Constructor { class, .. } = &m.invoker {
                constructors.insert(wire_name.clone(), class.clone());
            }

            let cap = Capability {
                native_name: m.native_name,
                wire_name: wire_name.clone(),
                kind: m.kind,
                writable: m.writable,
                entry_point: m.entry_point,
                returns: m.returns,
                params,
                invoker: m.invoker,
            };

            if cap.entry_point {
                if cap.kind == MemberKind::Property {
                    warn!(
                        class = %class_name,
                        member = %wire_name,
                        "entry point flag on a property, member dropped"
                    );
                    continue;
                }
                if entry_point.is_some() {
                    warn!(
                        class = %class_name,
                        member = %wire_name,
                        "entry point already designated, member dropped"
                    );
                    continue;
                }
                entry_point = Some(cap);
                continue;
            }

            match members.get(&wire_name) {
                Some(existing) if existing.kind == cap.kind => {
                    warn!(
                        class = %class_name,
                        member = %wire_name,
                        kind = existing.kind.name(),
                        "conflicting member name, first registration wins"
                    );
                }
                _ => {
                    members.insert(wire_name, cap);
                }
            }
        }

        let events = resolve_events(&class_name, self.events);

        ClassRegistry {
            class_name,
            members,
            constructors,
            events,
            entry_point,
        }
    }
}

fn validate_params(class: &str, member: &str, params: &[Param]) -> Vec<ParamSpec> {
    let mut specs = Vec::with_capacity(params.len());
    for (position, p) in params.iter().enumerate() {
        specs.push(ParamSpec {
            position,
            ty: p.ty,
            role: p.role,
        });
        if p.role == ParamRole::Promise {
            if position + 1 < params.len() {
                warn!(
                    class = %class,
                    member = %member,
                    "promise terminal must be the last parameter, trailing parameters ignored"
                );
            }
            break;
        }
    }
    specs
}

fn resolve_events(class: &str, decl: Option<EventDecl>) -> Option<Vec<String>> {
    match decl? {
        EventDecl::Typed(names) => Some(names),
        EventDecl::Wire(value) => {
            let names: Option<Vec<String>> = value.as_array().and_then(|items| {
                items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect()
            });
            if names.is_none() {
                warn!(class = %class, "event list must be an array of strings, skipped");
            }
            names
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ParamType;
    use serde_json::json;

    struct NullContext;

    impl CallerContext for NullContext {
        fn instance_id(&self) -> u32 {
            0
        }
    }

    struct Echo {
        prefix: String,
    }

    impl BindingObject for Echo {}

    struct Widget {
        label: String,
    }

    impl BindingObject for Widget {}

    fn widget_registry() -> ClassRegistry {
        ClassRegistry::builder::<Widget>("Widget")
            .property("label", |w: &Widget| Value::from(w.label.clone()))
            .build()
    }

    fn echo_registry() -> ClassRegistry {
        ClassRegistry::builder::<Echo>("Echo")
            .property("prefix", |e: &Echo| Value::from(e.prefix.clone()))
            .method("echo", &[Param::of(ParamType::String)], |e, _ctx, args| {
                Ok(Value::from(format!("{}{}", e.prefix, args[0].as_str()?)))
            })
            .constructor("Widget", &[Param::of(ParamType::String)], widget_registry(), |_ctx, args| {
                Ok(Some(Widget {
                    label: args[0].as_str()?.to_string(),
                }))
            })
            .events(["updatePrefix", "click"])
            .build()
    }

    #[test]
    fn test_lookup_and_kinds() {
        let reg = echo_registry();
        assert!(reg.has_property("prefix"));
        assert!(!reg.has_method("prefix"));
        assert!(reg.has_method("echo"));
        assert!(reg.has_method("Widget"));
        assert!(reg.lookup("missing").is_none());
        assert_eq!(reg.lookup("echo").unwrap().kind(), MemberKind::Method);
    }

    #[test]
    fn test_members_in_registration_order() {
        let reg = echo_registry();
        let names: Vec<_> = reg.members().map(Capability::wire_name).collect();
        assert_eq!(names, ["prefix", "echo", "Widget"]);
    }

    #[test]
    fn test_invoke_method() {
        let reg = echo_registry();
        let mut echo = Echo {
            prefix: "From java:".to_string(),
        };
        let result = reg
            .invoke(Some(&mut echo), &NullContext, "echo", &[json!("X")])
            .unwrap();
        assert_eq!(result, json!("From java:X"));
    }

    #[test]
    fn test_invoke_unknown_member() {
        let reg = echo_registry();
        let mut echo = Echo {
            prefix: String::new(),
        };
        let err = reg
            .invoke(Some(&mut echo), &NullContext, "missing", &[])
            .unwrap_err();
        assert!(matches!(err, CallError::Unsupported(_)));
    }

    #[test]
    fn test_invoke_wrong_kind() {
        let reg = echo_registry();
        let mut echo = Echo {
            prefix: String::new(),
        };
        // Properties are not callable, constructors need newInstance.
        assert!(reg.invoke(Some(&mut echo), &NullContext, "prefix", &[]).is_err());
        assert!(reg
            .invoke(Some(&mut echo), &NullContext, "Widget", &[json!("w")])
            .is_err());
    }

    #[test]
    fn test_invoke_wrong_receiver() {
        let reg = echo_registry();
        let mut not_echo = Widget {
            label: String::new(),
        };
        let err = reg
            .invoke(Some(&mut not_echo), &NullContext, "echo", &[json!("X")])
            .unwrap_err();
        assert!(matches!(err, CallError::Unsupported(_)));
    }

    #[test]
    fn test_construct() {
        let reg = echo_registry();
        let obj = reg
            .construct(&NullContext, "Widget", &[json!("side panel")])
            .unwrap()
            .unwrap();
        assert_eq!(obj.downcast_ref::<Widget>().unwrap().label, "side panel");

        // Non-constructor members refuse construction.
        assert!(reg.construct(&NullContext, "echo", &[json!("x")]).is_err());
    }

    #[test]
    fn test_constructor_registry() {
        let reg = echo_registry();
        let sub = reg.constructor_registry("Widget").unwrap();
        assert!(sub.has_property("label"));
        assert!(reg.constructor_registry("Gadget").is_none());
    }

    #[test]
    fn test_property_access() {
        let reg = echo_registry();
        let echo = Echo {
            prefix: "From java:".to_string(),
        };
        let value = reg.get_property(Some(&echo), "prefix").unwrap();
        assert_eq!(value, json!("From java:"));

        // Read-only property rejects writes.
        let mut echo = echo;
        let err = reg
            .set_property(Some(&mut echo), "prefix", json!("new"))
            .unwrap_err();
        assert!(matches!(err, CallError::Unsupported(_)));
    }

    #[test]
    fn test_writable_property() {
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .property_rw(
                "prefix",
                |e: &Echo| Value::from(e.prefix.clone()),
                |e, v| {
                    e.prefix = v
                        .as_str()
                        .ok_or_else(|| CallError::InvalidArgument("expected string".into()))?
                        .to_string();
                    Ok(())
                },
            )
            .build();

        assert!(reg.lookup("prefix").unwrap().is_writable());

        let mut echo = Echo {
            prefix: String::new(),
        };
        reg.set_property(Some(&mut echo), "prefix", json!("updated"))
            .unwrap();
        assert_eq!(echo.prefix, "updated");
    }

    #[test]
    fn test_same_kind_conflict_first_wins() {
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .method("echo", &[], |_e, _ctx, _args| Ok(json!("first")))
            .method("echo", &[], |_e, _ctx, _args| Ok(json!("second")))
            .build();

        let mut echo = Echo {
            prefix: String::new(),
        };
        let result = reg.invoke(Some(&mut echo), &NullContext, "echo", &[]).unwrap();
        assert_eq!(result, json!("first"));
        assert_eq!(reg.members().count(), 1);
    }

    #[test]
    fn test_entry_point_first_wins() {
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .void_method("init", &[], |_e, _ctx, _args| Ok(()))
            .entry_point()
            .void_method("initLater", &[], |_e, _ctx, _args| Ok(()))
            .entry_point()
            .build();

        let entry = reg.entry_point().unwrap();
        assert_eq!(entry.wire_name(), "init");
        // Entry points live outside the member table; the loser is dropped.
        assert_eq!(reg.members().count(), 0);
    }

    #[test]
    fn test_entry_point_on_property_dropped() {
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .property("prefix", |e: &Echo| Value::from(e.prefix.clone()))
            .entry_point()
            .build();
        assert!(reg.entry_point().is_none());
        assert_eq!(reg.members().count(), 0);
    }

    #[test]
    fn test_wire_name_override() {
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .method("echo_message", &[], |_e, _ctx, _args| Ok(Value::Null))
            .wire_name("echoMessage")
            .build();
        assert!(reg.has_method("echoMessage"));
        assert!(!reg.has_method("echo_message"));
        assert_eq!(reg.lookup("echoMessage").unwrap().native_name(), "echo_message");
    }

    #[test]
    fn test_promise_terminal_truncates_trailing_params() {
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .void_method(
                "fetch",
                &[Param::of(ParamType::String), Param::promise(), Param::any()],
                |_e, _ctx, _args| Ok(()),
            )
            .build();

        let params = reg.lookup("fetch").unwrap().params();
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].role, ParamRole::Promise);
    }

    #[test]
    fn test_event_list() {
        let reg = echo_registry();
        assert!(reg.is_event_supported("click"));
        assert!(!reg.is_event_supported("hover"));
        assert_eq!(reg.event_list().unwrap().len(), 2);
    }

    #[test]
    fn test_event_list_from_wire_value() {
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .event_list_value(json!(["updatePrefix", "click"]))
            .build();
        assert!(reg.is_event_supported("updatePrefix"));
    }

    #[test]
    fn test_event_list_wire_type_mismatch_skipped() {
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .event_list_value(json!([1, 2, 3]))
            .build();
        assert!(reg.event_list().is_none());
        assert!(!reg.is_event_supported("1"));

        let reg = ClassRegistry::builder::<Echo>("Echo")
            .event_list_value(json!("not a list"))
            .build();
        assert!(reg.event_list().is_none());
    }

    #[test]
    fn test_static_members() {
        let reg = ClassRegistry::builder::<Widget>("Widget")
            .static_method("defaults", &[], |_ctx, _args| Ok(json!({"width": 100})))
            .static_property("kindName", || json!("widget"))
            .build();

        let result = reg.invoke(None, &NullContext, "defaults", &[]).unwrap();
        assert_eq!(result, json!({"width": 100}));
        assert_eq!(reg.get_property(None, "kindName").unwrap(), json!("widget"));
    }

    #[test]
    fn test_instance_member_requires_receiver() {
        let reg = echo_registry();
        let err = reg.invoke(None, &NullContext, "echo", &[json!("X")]).unwrap_err();
        assert!(matches!(err, CallError::Unsupported(_)));
    }
}
