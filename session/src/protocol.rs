//! JSON messages exchanged with the duplex transport, plus the state snapshot
//! served to clients and written by the CLI

use maze_core::{format_time, GameEvent, GameSession, PointerSample};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outbound game notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Notification {
    /// `{"event":"gameWon","time":N}`
    GameWon { time: u32 },
    /// `{"event":"currentTime","time":N}`
    CurrentTime { time: u32 },
}

impl From<GameEvent> for Notification {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::Won { time } => Notification::GameWon { time },
            GameEvent::CurrentTime { time } => Notification::CurrentTime { time },
        }
    }
}

/// First message sent on every new connection: `{"type":"test"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Handshake {
    Test,
}

/// Inbound pointer sample: `{"x":..,"y":..,"button":..}`
///
/// All three fields are required. Extra fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointerMessage {
    pub x: f64,
    pub y: f64,
    pub button: bool,
}

impl From<PointerMessage> for PointerSample {
    fn from(msg: PointerMessage) -> Self {
        PointerSample {
            x: msg.x,
            y: msg.y,
            button: msg.button,
        }
    }
}

#[derive(Debug)]
pub enum ProtocolError {
    /// Not JSON, or JSON without the expected fields
    Malformed(serde_json::Error),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Malformed(e) => write!(f, "malformed pointer message: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Malformed(e) => Some(e),
        }
    }
}

pub fn parse_pointer(text: &str) -> Result<PointerSample, ProtocolError> {
    let msg: PointerMessage = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;
    Ok(msg.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionView {
    pub x: usize,
    pub y: usize,
}

/// Everything a client needs to draw and label the current game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Seed the current maze was generated from
    pub seed: u32,
    pub width: usize,
    pub height: usize,
    pub player: PositionView,
    pub goal: PositionView,
    pub game_won: bool,
    pub is_playing: bool,
    pub time_elapsed: u32,
    /// `mm:ss`
    pub time_display: String,
    /// Binary grid (0=wall, 1=path), (height*2+1) rows of (width*2+1)
    pub grid: Vec<Vec<u8>>,
}

impl SessionSnapshot {
    pub fn new(session: &GameSession, seed: u32) -> Self {
        let maze = session.maze();
        let player = session.player();
        let goal = maze.goal();
        Self {
            seed,
            width: maze.width(),
            height: maze.height(),
            player: PositionView { x: player.x, y: player.y },
            goal: PositionView { x: goal.x, y: goal.y },
            game_won: session.game_won(),
            is_playing: session.is_playing(),
            time_elapsed: session.time_elapsed(),
            time_display: format_time(session.time_elapsed()),
            grid: maze.to_binary_grid(),
        }
    }
}
