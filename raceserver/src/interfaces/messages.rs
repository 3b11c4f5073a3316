use serde::{Deserialize, Serialize};
use thiserror::Error;
use vehiclesim::core::controls::InputState;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Messages sent from a client to the server. On the wire every message is a single JSON line of
/// the form {"event": "<name>", "data": {...}}.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinRaceRoom,
    LeaveRaceRoom,
    StartRace,
    SetName {
        username: String,
    },
    /// Actions are kept as strings so that unknown action names can be skipped individually.
    Action {
        #[serde(rename = "playerActions")]
        player_actions: Vec<String>,
        id: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: u32,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerActionsEntry {
    pub id: u32,
    #[serde(flatten)]
    pub input: InputState,
}

/// Messages sent from the server to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    PlayerListUpdate {
        list: Vec<PlayerEntry>,
    },
    PlayerId {
        id: u32,
    },
    StartRace {
        #[serde(rename = "playersList")]
        players_list: Vec<PlayerEntry>,
    },
    Action {
        list: Vec<PlayerActionsEntry>,
    },
    ShowError {
        message: String,
    },
    Session {
        #[serde(rename = "sessionID")]
        session_id: String,
        #[serde(rename = "userID")]
        user_id: u32,
    },
}

pub fn decode_client_message(line: &str) -> Result<ClientMessage, ProtocolError> {
    serde_json::from_str(line.trim()).map_err(ProtocolError::Decode)
}

pub fn encode_server_message(message: &ServerMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(ProtocolError::Encode)
}
