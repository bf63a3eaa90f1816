//! Protocol module - JSON message types for the remote key link
//!
//! Line-delimited JSON. Every server message carries `type`, `seq` and `ts`
//! (timestamp in ms); `seq` echoes the client message it answers, or is the
//! server's own counter for unsolicited messages.

use serde::{Deserialize, Serialize};

use crate::core::BoardSnapshot;
use crate::types::KeyId;

// ============== Client -> Appliance Messages ==============

/// A key reference: boundary name (`"space"`) or transport word (`5`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyRef {
    Code(u32),
    Name(String),
}

impl KeyRef {
    pub fn resolve(&self) -> Option<KeyId> {
        match self {
            KeyRef::Code(code) => KeyId::from_code(*code),
            KeyRef::Name(name) => KeyId::from_name(name),
        }
    }
}

impl std::fmt::Display for KeyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyRef::Code(code) => write!(f, "{}", code),
            KeyRef::Name(name) => write!(f, "{:?}", name),
        }
    }
}

/// Key press forwarded to the appliance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMessage {
    pub seq: u64,
    pub key: KeyRef,
}

/// Parsed incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    Key(KeyMessage),
    /// Well-formed JSON with a `type` we don't handle
    Unknown { seq: u64, msg_type: String },
}

/// Parse one line of client input.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "key")]
        Key(KeyMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Key(m)) => Ok(ParsedMessage::Key(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            match envelope.msg_type {
                Some(msg_type) if msg_type != "key" => Ok(ParsedMessage::Unknown {
                    seq: envelope.seq.unwrap_or(0),
                    msg_type,
                }),
                _ => Err(e),
            }
        }
    }
}

// ============== Appliance -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    UnknownKey,
    UnknownType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        seq: u64,
        ts: u64,
        rows: u16,
        cols: u16,
        ratio: u16,
        mode: String,
    },
    Ack {
        seq: u64,
        ts: u64,
    },
    Error {
        seq: u64,
        ts: u64,
        code: ErrorCode,
        message: String,
    },
    Status {
        seq: u64,
        ts: u64,
        generation: u64,
        mode: String,
        alive: usize,
    },
}

// ============== Utility Functions ==============

pub fn create_welcome(seq: u64, snapshot: &BoardSnapshot, ratio: u16) -> ServerMessage {
    ServerMessage::Welcome {
        seq,
        ts: current_timestamp_ms(),
        rows: snapshot.rows(),
        cols: snapshot.cols(),
        ratio,
        mode: snapshot.mode.as_str().to_string(),
    }
}

pub fn create_ack(seq: u64) -> ServerMessage {
    ServerMessage::Ack {
        seq,
        ts: current_timestamp_ms(),
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ServerMessage {
    ServerMessage::Error {
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

pub fn create_status(seq: u64, snapshot: &BoardSnapshot) -> ServerMessage {
    ServerMessage::Status {
        seq,
        ts: current_timestamp_ms(),
        generation: snapshot.generation,
        mode: snapshot.mode.as_str().to_string(),
        alive: snapshot.board.alive_count(),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_by_name_and_code() {
        let by_name = parse_message(r#"{"type":"key","seq":1,"key":"space"}"#).unwrap();
        let by_code = parse_message(r#"{"type":"key","seq":2,"key":5}"#).unwrap();
        match (by_name, by_code) {
            (ParsedMessage::Key(a), ParsedMessage::Key(b)) => {
                assert_eq!(a.seq, 1);
                assert_eq!(a.key.resolve(), Some(KeyId::ToggleCell));
                assert_eq!(b.key, KeyRef::Code(5));
                assert_eq!(b.key.resolve(), Some(KeyId::ToggleCell));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_unresolvable_keys_still_parse() {
        let ParsedMessage::Key(msg) =
            parse_message(r#"{"type":"key","seq":3,"key":"f12"}"#).unwrap()
        else {
            panic!("expected key message");
        };
        assert_eq!(msg.key.resolve(), None);
        assert_eq!(msg.key.to_string(), "\"f12\"");
    }

    #[test]
    fn test_unknown_type_and_garbage() {
        assert_eq!(
            parse_message(r#"{"type":"hello","seq":9}"#).unwrap(),
            ParsedMessage::Unknown {
                seq: 9,
                msg_type: "hello".to_string()
            }
        );
        assert!(parse_message("not json").is_err());
        assert!(parse_message(r#"{"type":"key","seq":1}"#).is_err());
    }

    #[test]
    fn test_server_messages_are_tagged() {
        let snapshot = BoardSnapshot::initial(18, 32);
        let json = serde_json::to_value(create_welcome(0, &snapshot, 40)).unwrap();
        assert_eq!(json["type"], "welcome");
        assert_eq!(json["rows"], 18);
        assert_eq!(json["cols"], 32);
        assert_eq!(json["mode"], "editing");

        let json =
            serde_json::to_value(create_error(4, ErrorCode::UnknownKey, "nope")).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "unknown_key");
        assert_eq!(json["seq"], 4);

        let json = serde_json::to_value(create_status(7, &snapshot)).unwrap();
        assert_eq!(json["type"], "status");
        assert_eq!(json["alive"], 0);
    }
}
