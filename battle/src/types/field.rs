//! Global field conditions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::conditions::{Room, Terrain, Timed, Weather};

/// A field condition that ended during a turn-end countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiredCondition {
    Weather(Weather),
    Terrain(Terrain),
    Room(Room),
}

impl std::fmt::Display for ExpiredCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpiredCondition::Weather(w) => write!(f, "{w}"),
            ExpiredCondition::Terrain(t) => write!(f, "{t}"),
            ExpiredCondition::Room(r) => write!(f, "{r}"),
        }
    }
}

/// Global conditions affecting every combatant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldConditions {
    /// Current weather condition
    pub weather: Option<Timed<Weather>>,

    /// Current terrain
    pub terrain: Option<Timed<Terrain>>,

    /// Current room effect
    pub room: Option<Timed<Room>>,
}

impl FieldConditions {
    /// Create a new empty field state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weather(&self) -> Option<Weather> {
        self.weather.map(|w| w.kind)
    }

    pub fn terrain(&self) -> Option<Terrain> {
        self.terrain.map(|t| t.kind)
    }

    pub fn room(&self) -> Option<Room> {
        self.room.map(|r| r.kind)
    }

    /// Whether a specific room is in effect
    pub fn has_room(&self, room: Room) -> bool {
        self.room() == Some(room)
    }

    /// Set weather, returns false if the same weather is already active
    pub fn set_weather(&mut self, weather: Weather, turns: u8) -> bool {
        if self.weather() == Some(weather) {
            return false;
        }
        self.weather = Some(Timed::new(weather, turns));
        true
    }

    /// Set terrain, returns false if the same terrain is already active
    pub fn set_terrain(&mut self, terrain: Terrain, turns: u8) -> bool {
        if self.terrain() == Some(terrain) {
            return false;
        }
        self.terrain = Some(Timed::new(terrain, turns));
        true
    }

    /// Start a room; using the active room again ends it
    pub fn toggle_room(&mut self, room: Room, turns: u8) -> bool {
        if self.has_room(room) {
            self.room = None;
            false
        } else {
            self.room = Some(Timed::new(room, turns));
            true
        }
    }

    /// Clear all conditions
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Count every condition down one turn and drop those that ran out
    pub fn tick(&mut self) -> Vec<ExpiredCondition> {
        let mut expired = Vec::new();

        if let Some(weather) = self.weather.as_mut() {
            if weather.tick() {
                expired.push(ExpiredCondition::Weather(weather.kind));
                self.weather = None;
            }
        }
        if let Some(terrain) = self.terrain.as_mut() {
            if terrain.tick() {
                expired.push(ExpiredCondition::Terrain(terrain.kind));
                self.terrain = None;
            }
        }
        if let Some(room) = self.room.as_mut() {
            if room.tick() {
                expired.push(ExpiredCondition::Room(room.kind));
                self.room = None;
            }
        }

        expired
    }

    /// Check if any field condition is active
    pub fn has_any_condition(&self) -> bool {
        self.weather.is_some() || self.terrain.is_some() || self.room.is_some()
    }
}
