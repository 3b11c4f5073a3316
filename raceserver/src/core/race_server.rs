use crate::core::actions::PlayerActions;
use crate::core::room::{validate_username, RaceRoom, RoomError};
use crate::interfaces::messages::{ClientMessage, PlayerActionsEntry, PlayerEntry, ServerMessage};
use std::collections::BTreeMap;
use std::time::Duration;
use vehiclesim::core::controls::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Client(u32),
    AllClients,
    RoomMembers,
}

pub type Outbox = Vec<(Recipient, ServerMessage)>;

/// * `id` - Player id, equal to the id of the client connection
/// * `session_id` - Random session id handed out on connect
/// * `username` - Display name (None until set by the client)
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    pub session_id: String,
    pub username: Option<String>,
    pub actions: PlayerActions,
}

/// RaceServer holds the connected players and the race room. It does not perform any I/O: every
/// method returns the messages to be delivered together with their recipients.
#[derive(Debug)]
pub struct RaceServer {
    players: BTreeMap<u32, Player>,
    room: RaceRoom,
    stale_after: Duration,
}

impl RaceServer {
    pub fn new(stale_after: Duration) -> RaceServer {
        RaceServer {
            players: BTreeMap::new(),
            room: RaceRoom::default(),
            stale_after,
        }
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn no_players(&self) -> usize {
        self.players.len()
    }

    pub fn room(&self) -> &RaceRoom {
        &self.room
    }

    // ---------------------------------------------------------------------------------------------
    // CONNECTIONS ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn connect(&mut self, id: u32, session_id: String) -> Outbox {
        log::info!("Player {} connected", id);

        self.players.insert(
            id,
            Player {
                id,
                session_id: session_id.to_owned(),
                username: None,
                actions: PlayerActions::default(),
            },
        );

        vec![
            (
                Recipient::Client(id),
                ServerMessage::Session {
                    session_id,
                    user_id: id,
                },
            ),
            (Recipient::Client(id), ServerMessage::PlayerId { id }),
        ]
    }

    pub fn disconnect(&mut self, id: u32) -> Outbox {
        if self.players.remove(&id).is_none() {
            return Vec::new();
        }

        log::info!("Player {} disconnected", id);

        if self.room.leave(id) {
            vec![(Recipient::AllClients, self.player_list_update())]
        } else {
            Vec::new()
        }
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// handle processes a message received from a client. Messages of clients that are not
    /// connected (anymore) are ignored.
    pub fn handle(&mut self, client_id: u32, message: ClientMessage, now: Duration) -> Outbox {
        if !self.players.contains_key(&client_id) {
            log::debug!("Ignoring message of unknown client {}", client_id);
            return Vec::new();
        }

        match message {
            ClientMessage::JoinRaceRoom => {
                if self.room.join(client_id) {
                    log::info!("Player {} joined the race room", client_id);
                }
                vec![(Recipient::AllClients, self.player_list_update())]
            }
            ClientMessage::LeaveRaceRoom => {
                if self.room.leave(client_id) {
                    log::info!("Player {} left the race room", client_id);
                }
                vec![(Recipient::AllClients, self.player_list_update())]
            }
            ClientMessage::SetName { username } => match self.set_name(client_id, &username) {
                Ok(()) if self.room.is_member(client_id) => {
                    vec![(Recipient::AllClients, self.player_list_update())]
                }
                Ok(()) => Vec::new(),
                Err(e) => show_error(client_id, &e),
            },
            ClientMessage::StartRace => match self.room.start() {
                Ok(()) => {
                    log::info!(
                        "Race started by player {} with {} players",
                        client_id,
                        self.room.members().len()
                    );
                    vec![(
                        Recipient::RoomMembers,
                        ServerMessage::StartRace {
                            players_list: self.room_players(),
                        },
                    )]
                }
                Err(e) => show_error(client_id, &e),
            },
            ClientMessage::Action { player_actions, id } => {
                // a client may only control its own player
                if id != client_id {
                    log::debug!(
                        "Ignoring actions of client {} addressed to player {}",
                        client_id,
                        id
                    );
                    return Vec::new();
                }
                self.merge_actions(id, &player_actions, now);
                Vec::new()
            }
        }
    }

    /// sweep clears stale actions of all players and returns the action broadcast.
    pub fn sweep(&mut self, now: Duration) -> Outbox {
        if self.players.is_empty() {
            return Vec::new();
        }

        for player in self.players.values_mut() {
            if player.actions.sweep(now, self.stale_after) {
                log::debug!("Cleared stale actions of player {}", player.id);
            }
        }

        let list = self
            .players
            .values()
            .map(|player| PlayerActionsEntry {
                id: player.id,
                input: player.actions.input,
            })
            .collect();

        vec![(Recipient::AllClients, ServerMessage::Action { list })]
    }

    // ---------------------------------------------------------------------------------------------
    // HELPERS -------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    fn set_name(&mut self, client_id: u32, username: &str) -> Result<(), RoomError> {
        validate_username(username)?;

        let is_taken = self.players.values().any(|player| {
            player.id != client_id
                && player
                    .username
                    .as_ref()
                    .map_or(false, |name| name.eq_ignore_ascii_case(username))
        });

        if is_taken {
            return Err(RoomError::UsernameTaken(username.to_owned()));
        }

        if let Some(player) = self.players.get_mut(&client_id) {
            player.username = Some(username.to_owned());
        }
        Ok(())
    }

    fn merge_actions(&mut self, id: u32, player_actions: &[String], now: Duration) {
        let player = match self.players.get_mut(&id) {
            Some(player) => player,
            None => {
                log::debug!("Ignoring actions of unknown player {}", id);
                return;
            }
        };

        let actions: Vec<Action> = player_actions
            .iter()
            .filter_map(|name| match name.parse() {
                Ok(action) => Some(action),
                Err(_) => {
                    log::debug!("Ignoring unknown action {} of player {}", name, id);
                    None
                }
            })
            .collect();

        player.actions.merge(&actions, now);
    }

    fn room_players(&self) -> Vec<PlayerEntry> {
        self.room
            .members()
            .iter()
            .filter_map(|id| self.players.get(id))
            .map(|player| PlayerEntry {
                id: player.id,
                username: player.username.to_owned(),
            })
            .collect()
    }

    fn player_list_update(&self) -> ServerMessage {
        ServerMessage::PlayerListUpdate {
            list: self.room_players(),
        }
    }
}

fn show_error(client_id: u32, e: &RoomError) -> Outbox {
    log::debug!("Rejected request of player {}: {}", client_id, e);
    vec![(
        Recipient::Client(client_id),
        ServerMessage::ShowError {
            message: e.to_string(),
        },
    )]
}
