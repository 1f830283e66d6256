use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::KukanError;
use crate::ui::conversation::reply::ReplyReady;

/// Everything the main loop reacts to, funnelled through one channel
#[derive(Debug)]
pub enum AppEvent {
    /// Key press event
    Key(crossterm::event::KeyEvent),

    /// Terminal resize
    Resize(u16, u16),

    /// Animation / notice expiry tick
    Tick,

    /// A deferred canned reply finished its delay
    Reply(ReplyReady),
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Ai,
}

/// Composer layout: compact single line or the full widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Expanded,
    Minimized,
}

impl TryFrom<String> for Room {
    type Error = KukanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Room::parse_name(&value)
    }
}

impl ViewMode {
    pub fn is_minimized(&self) -> bool {
        matches!(self, ViewMode::Minimized)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ViewMode::Expanded => "Expanded",
            ViewMode::Minimized => "Minimized",
        }
    }
}

/// Rooms offered by the room selector
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(try_from = "String")]
pub enum Room {
    #[default]
    Bedroom,
    Livingroom,
    Kitchen,
    Bathroom,
    Basement,
}

impl Room {
    /// Case-insensitive room name, also accepting a few everyday spellings
    pub fn parse_name(name: &str) -> Result<Room, KukanError> {
        let name = name.trim();
        Room::from_str(name).or_else(|_| match name.to_lowercase().as_str() {
            "living" | "living room" | "lounge" => Ok(Room::Livingroom),
            "bath" => Ok(Room::Bathroom),
            "bed" => Ok(Room::Bedroom),
            _ => Err(KukanError::UnknownRoom(name.to_string())),
        })
    }

    pub fn all() -> Vec<Room> {
        Room::iter().collect()
    }

    pub fn next(self) -> Room {
        let rooms = Room::all();
        let index = rooms.iter().position(|room| *room == self).unwrap_or(0);
        rooms[(index + 1) % rooms.len()]
    }

    pub fn previous(self) -> Room {
        let rooms = Room::all();
        let index = rooms.iter().position(|room| *room == self).unwrap_or(0);
        rooms[(index + rooms.len() - 1) % rooms.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooms_keep_their_fixed_order() {
        let labels: Vec<String> = Room::all().iter().map(|room| room.to_string()).collect();
        assert_eq!(
            labels,
            ["Bedroom", "Livingroom", "Kitchen", "Bathroom", "Basement"]
        );
    }

    #[test]
    fn room_cycling_wraps_around() {
        assert_eq!(Room::Basement.next(), Room::Bedroom);
        assert_eq!(Room::Bedroom.previous(), Room::Basement);
        assert_eq!(Room::Kitchen.next(), Room::Bathroom);
    }

    #[test]
    fn room_names_parse_case_insensitively() {
        assert_eq!(Room::from_str("kitchen").unwrap(), Room::Kitchen);
        assert_eq!(Room::from_str("LIVINGROOM").unwrap(), Room::Livingroom);
        assert!(Room::from_str("garage").is_err());
    }

    #[test]
    fn everyday_room_names_are_accepted() {
        assert_eq!(Room::parse_name(" Living Room "), Ok(Room::Livingroom));
        assert_eq!(Room::parse_name("bath"), Ok(Room::Bathroom));
        assert_eq!(
            Room::parse_name("attic"),
            Err(KukanError::UnknownRoom("attic".to_string()))
        );
    }
}
