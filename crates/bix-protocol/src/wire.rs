//! JSON text framing for the oracle channel.

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{ClientMessage, ServerMessage};

/// Encode an outgoing message as one JSON text frame.
pub fn encode_client(msg: &ClientMessage) -> ProtocolResult<String> {
    serde_json::to_string(msg).map_err(ProtocolError::Encode)
}

/// Decode one incoming JSON text frame.
pub fn decode_server(frame: &str) -> ProtocolResult<ServerMessage> {
    serde_json::from_str(frame).map_err(ProtocolError::Decode)
}
