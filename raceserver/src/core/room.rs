use thiserror::Error;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 16;

/// Errors reported back to the requesting client. The display text is sent as is.
#[derive(Debug, Error, PartialEq)]
pub enum RoomError {
    #[error(
        "Username must consist of {min} to {max} letters, digits, underscores or hyphens",
        min = USERNAME_MIN_LEN,
        max = USERNAME_MAX_LEN
    )]
    InvalidUsername,

    #[error("Username {0} is already taken")]
    UsernameTaken(String),

    #[error("The race has already started")]
    AlreadyStarted,

    #[error("The race room is empty")]
    EmptyRoom,
}

/// validate_username checks length and character set of a username.
pub fn validate_username(username: &str) -> Result<(), RoomError> {
    let len_ok = (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.chars().count());
    let chars_ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if len_ok && chars_ok {
        Ok(())
    } else {
        Err(RoomError::InvalidUsername)
    }
}

/// RaceRoom is the single race room. Members are kept in joining order, the room returns to the
/// not-started state once the last member left.
#[derive(Debug, Clone, Default)]
pub struct RaceRoom {
    members: Vec<u32>,
    started: bool,
}

impl RaceRoom {
    pub fn members(&self) -> &[u32] {
        &self.members
    }

    pub fn is_member(&self, id: u32) -> bool {
        self.members.contains(&id)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// join adds a member and returns false if it was a member already.
    pub fn join(&mut self, id: u32) -> bool {
        if self.is_member(id) {
            return false;
        }
        self.members.push(id);
        true
    }

    /// leave removes a member and returns false if it was not a member.
    pub fn leave(&mut self, id: u32) -> bool {
        let no_members = self.members.len();
        self.members.retain(|&member| member != id);

        if self.members.is_empty() && self.started {
            log::info!("Race room is empty, resetting it");
            self.started = false;
        }

        self.members.len() != no_members
    }

    pub fn start(&mut self) -> Result<(), RoomError> {
        if self.started {
            return Err(RoomError::AlreadyStarted);
        }
        if self.members.is_empty() {
            return Err(RoomError::EmptyRoom);
        }
        self.started = true;
        Ok(())
    }
}
