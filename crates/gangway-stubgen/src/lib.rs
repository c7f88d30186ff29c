//! JavaScript proxy-source generation
//!
//! Turns a built [`ClassRegistry`] into the scripting-side stub that backs
//! the exposed surface: property accessors, forwarding methods, promise
//! wrappers, and event-target wiring. Generation is pure and
//! deterministic — output follows registry registration order, and name
//! conflicts were already resolved when the registry was built.

use std::fmt::Write;

use gangway_core::{Capability, ClassRegistry, MemberKind, ParamRole, ParamSpec};

const HEADER: &str = "var jsStub = requireNative(\"jsStub\").jsStub;\n\
                      var helper = jsStub.create(exports, extension);\n";

/// Generate the proxy source for one registry
pub fn generate(registry: &ClassRegistry) -> String {
    let mut out = String::from(HEADER);

    if registry.event_list().is_some() {
        generate_event_target(registry, &mut out);
    }

    for cap in registry.members() {
        match cap.kind() {
            MemberKind::Property => generate_property(cap, &mut out),
            MemberKind::Method => generate_method(cap, &mut out),
            // Constructors are driven through the newInstance channel and
            // have no direct proxy surface.
            MemberKind::Constructor => {}
        }
    }

    out.push('\n');
    out
}

fn generate_event_target(registry: &ClassRegistry, out: &mut String) {
    let events = match registry.event_list() {
        Some(list) if !list.is_empty() => list,
        _ => return,
    };

    out.push_str("jsStub.makeEventTarget(exports);\n");
    for event in events {
        writeln!(out, "helper.addEvent(\"{event}\");").unwrap();
    }
}

fn generate_property(cap: &Capability, out: &mut String) {
    if cap.is_writable() {
        writeln!(out, "jsStub.defineProperty(exports, \"{}\", true);", cap.wire_name()).unwrap();
    } else {
        writeln!(out, "jsStub.defineProperty(exports, \"{}\");", cap.wire_name()).unwrap();
    }
}

fn arg_name(spec: &ParamSpec) -> String {
    match spec.role {
        ParamRole::Callback => format!("callback{}_function", spec.position),
        _ => format!("arg{}_{}", spec.position, spec.ty.stub_name()),
    }
}

fn generate_method(cap: &Capability, out: &mut String) {
    let mut js_args = String::new();
    for spec in cap.params() {
        if spec.role == ParamRole::Promise {
            // The promise terminal is the last declared parameter; the
            // proxy supplies the resolve/reject pair itself.
            generate_promise_method(cap.wire_name(), &js_args, out);
            return;
        }
        if !js_args.is_empty() {
            js_args.push_str(", ");
        }
        js_args.push_str(&arg_name(spec));
    }

    let name = cap.wire_name();
    let sync = cap.returns_value();
    writeln!(
        out,
        "exports.{name} = function({js_args}) {{\n  {}helper.invokeNative(\"{name}\", [{js_args}], {sync});\n}};",
        if sync { "return " } else { "" },
    )
    .unwrap();
}

fn generate_promise_method(name: &str, js_args: &str, out: &mut String) {
    let pair = "{\"resolve\": resolve, \"reject\": reject}";
    let arg_str = if js_args.is_empty() {
        pair.to_string()
    } else {
        format!("{js_args}, {pair}")
    };
    writeln!(
        out,
        "exports.{name} = function({js_args}) {{\n  \
         return new Promise(function(resolve, reject) {{\n     \
         helper.invokeNative(\"{name}\", [{arg_str}]);\n  }})\n}};",
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use gangway_core::{BindingObject, CallError, Param, ParamType, Value};
    use serde_json::json;

    struct Echo {
        prefix: String,
    }

    impl BindingObject for Echo {}

    fn echo_registry() -> ClassRegistry {
        ClassRegistry::builder::<Echo>("Echo")
            .property("prefix", |e: &Echo| Value::from(e.prefix.clone()))
            .method("echo", &[Param::of(ParamType::String)], |e, _ctx, args| {
                Ok(Value::from(format!("{}{}", e.prefix, args[0].as_str()?)))
            })
            .void_method("getPrefix", &[Param::callback()], |_e, _ctx, _args| Ok(()))
            .void_method("getPrefixPromise", &[Param::promise()], |_e, _ctx, _args| Ok(()))
            .void_method("testEvent", &[], |_e, _ctx, _args| Ok(()))
            .events(["updatePrefix", "click"])
            .build()
    }

    #[test]
    fn test_full_stub() {
        let stub = generate(&echo_registry());
        let expected = "\
var jsStub = requireNative(\"jsStub\").jsStub;
var helper = jsStub.create(exports, extension);
jsStub.makeEventTarget(exports);
helper.addEvent(\"updatePrefix\");
helper.addEvent(\"click\");
jsStub.defineProperty(exports, \"prefix\");
exports.echo = function(arg0_string) {
  return helper.invokeNative(\"echo\", [arg0_string], true);
};
exports.getPrefix = function(callback0_function) {
  helper.invokeNative(\"getPrefix\", [callback0_function], false);
};
exports.getPrefixPromise = function() {
  return new Promise(function(resolve, reject) {
     helper.invokeNative(\"getPrefixPromise\", [{\"resolve\": resolve, \"reject\": reject}]);
  })
};
exports.testEvent = function() {
  helper.invokeNative(\"testEvent\", [], false);
};

";
        assert_eq!(stub, expected);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate(&echo_registry()), generate(&echo_registry()));
    }

    #[test]
    fn test_writable_property_flag() {
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
        let stub = generate(&reg);
        assert!(stub.contains("jsStub.defineProperty(exports, \"prefix\", true);"));
    }

    #[test]
    fn test_no_event_block_without_event_list() {
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .void_method("ping", &[], |_e, _ctx, _args| Ok(()))
            .build();
        let stub = generate(&reg);
        assert!(!stub.contains("makeEventTarget"));
        assert!(!stub.contains("addEvent"));
    }

    #[test]
    fn test_promise_with_leading_args() {
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .void_method(
                "fetch",
                &[Param::of(ParamType::String), Param::promise()],
                |_e, _ctx, _args| Ok(()),
            )
            .build();
        let stub = generate(&reg);
        assert!(stub.contains("exports.fetch = function(arg0_string) {"));
        assert!(stub.contains(
            "helper.invokeNative(\"fetch\", [arg0_string, {\"resolve\": resolve, \"reject\": reject}]);"
        ));
    }

    #[test]
    fn test_constructor_not_emitted() {
        struct Widget;
        impl BindingObject for Widget {}

        let sub = ClassRegistry::builder::<Widget>("Widget").build();
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .constructor("Widget", &[], sub, |_ctx, _args| Ok(Some(Widget)))
            .build();
        let stub = generate(&reg);
        assert!(!stub.contains("Widget"));
    }

    #[test]
    fn test_event_list_from_wire_value() {
        let reg = ClassRegistry::builder::<Echo>("Echo")
            .event_list_value(json!(["resize"]))
            .build();
        let stub = generate(&reg);
        assert!(stub.contains("helper.addEvent(\"resize\");"));
    }
}
