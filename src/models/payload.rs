use serde::{Deserialize, Serialize};

/// One technique input. The variant decides how the request builder shapes
/// the outbound probe; categories whose techniques are not expressible as a
/// single request carry `Storage` or `Opaque` payloads, which ride the
/// baseline request as metadata only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    Param { key: String, value: String },
    Header { name: String, value: String },
    Method { verb: String },
    Storage { key: String, value: String },
    Opaque { input: String },
}

impl Payload {
    pub fn param(key: &str, value: &str) -> Self {
        Payload::Param {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn header(name: &str, value: &str) -> Self {
        Payload::Header {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn method(verb: &str) -> Self {
        Payload::Method {
            verb: verb.to_uppercase(),
        }
    }

    pub fn storage(key: &str, value: &str) -> Self {
        Payload::Storage {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn opaque(input: &str) -> Self {
        Payload::Opaque {
            input: input.to_string(),
        }
    }

    /// Verbatim rendering recorded on the ProbeResult.
    pub fn render(&self) -> String {
        match self {
            Payload::Param { key, value } => format!("{}={}", key, value),
            Payload::Header { name, value } => format!("{}: {}", name, value),
            Payload::Method { verb } => verb.clone(),
            Payload::Storage { key, value } => format!("{}={}", key, value),
            Payload::Opaque { input } => input.clone(),
        }
    }
}
