//! Outbound envelope shapes
//!
//! Serde structs for the four native-originated message kinds. The
//! callback and event payloads are embedded as JSON text (the scripting
//! stub parses them back out of the envelope).

use serde::Serialize;

/// Console level for log lines forwarded to the scripting console
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleLevel {
    /// `console.log`
    Log,
    /// `console.info`
    Info,
    /// `console.warn`
    Warn,
    /// `console.error`
    Error,
}

impl ConsoleLevel {
    /// The wire-level level name
    pub const fn as_str(self) -> &'static str {
        match self {
            ConsoleLevel::Log => "log",
            ConsoleLevel::Info => "info",
            ConsoleLevel::Warn => "warn",
            ConsoleLevel::Error => "error",
        }
    }
}

#[derive(Serialize)]
pub(crate) struct CallInfo {
    pub cid: u32,
    pub vid: u32,
}

#[derive(Serialize)]
pub(crate) struct CallbackEnvelope<'a> {
    pub cmd: &'static str,
    #[serde(rename = "callInfo")]
    pub call_info: CallInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<&'a str>,
    pub args: String,
}

#[derive(Serialize)]
pub(crate) struct ConsoleEnvelope<'a> {
    pub cmd: &'static str,
    pub level: &'static str,
    pub msg: &'a str,
}

#[derive(Serialize)]
pub(crate) struct EventEnvelope<'a> {
    pub cmd: &'static str,
    #[serde(rename = "type")]
    pub event_type: &'a str,
    pub event: String,
}

#[derive(Serialize)]
pub(crate) struct PropertyEnvelope<'a> {
    pub cmd: &'static str,
    pub name: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_envelope_shape() {
        let envelope = CallbackEnvelope {
            cmd: "invokeCallback",
            call_info: CallInfo { cid: 4, vid: 0 },
            key: Some("resolve"),
            args: "[\"ok\"]".to_string(),
        };
        let text = serde_json::to_string(&envelope).unwrap();
        assert_eq!(
            text,
            "{\"cmd\":\"invokeCallback\",\"callInfo\":{\"cid\":4,\"vid\":0},\"key\":\"resolve\",\"args\":\"[\\\"ok\\\"]\"}"
        );
    }

    #[test]
    fn test_callback_envelope_without_key() {
        let envelope = CallbackEnvelope {
            cmd: "invokeCallback",
            call_info: CallInfo { cid: 1, vid: 2 },
            key: None,
            args: "[]".to_string(),
        };
        let text = serde_json::to_string(&envelope).unwrap();
        assert!(!text.contains("\"key\""));
    }

    #[test]
    fn test_event_envelope_shape() {
        let envelope = EventEnvelope {
            cmd: "dispatchEvent",
            event_type: "click",
            event: "{\"x\":1}".to_string(),
        };
        let text = serde_json::to_string(&envelope).unwrap();
        assert_eq!(
            text,
            "{\"cmd\":\"dispatchEvent\",\"type\":\"click\",\"event\":\"{\\\"x\\\":1}\"}"
        );
    }

    #[test]
    fn test_console_levels() {
        assert_eq!(ConsoleLevel::Log.as_str(), "log");
        assert_eq!(ConsoleLevel::Info.as_str(), "info");
        assert_eq!(ConsoleLevel::Warn.as_str(), "warn");
        assert_eq!(ConsoleLevel::Error.as_str(), "error");
    }
}
