//! Movement, timer, and win-condition state machine
//!
//! Every transition consumes a `GameSession` and hands back the next one
//! together with the notification it produced, if any (`apply_*` are the
//! same transitions applied in place, for owners that keep one session
//! around). Nothing here knows
//! about clocks, sockets, or drawing; the caller decides when to tick and
//! where events go.

use crate::maze_gen::{Direction, Maze, Position};

/// Notification emitted by a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// The player entered the goal; carries the elapsed seconds at that moment
    Won { time: u32 },
    /// The timer advanced to `time` seconds
    CurrentTime { time: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// A maze exists but play has not started
    Idle,
    Playing,
    /// Terminal until the next new maze
    Won,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    maze: Maze,
    player: Position,
    game_won: bool,
    time_elapsed: u32,
    is_playing: bool,
}

impl GameSession {
    /// A session that shows the maze but does not accept moves or ticks yet
    pub fn idle(maze: Maze) -> Self {
        Self {
            maze,
            player: Position::new(0, 0),
            game_won: false,
            time_elapsed: 0,
            is_playing: false,
        }
    }

    /// Fresh game on `maze`: player at the start, clock at zero, playing
    pub fn start(maze: Maze) -> Self {
        Self {
            is_playing: true,
            ..Self::idle(maze)
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn game_won(&self) -> bool {
        self.game_won
    }

    pub fn time_elapsed(&self) -> u32 {
        self.time_elapsed
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn phase(&self) -> Phase {
        if self.game_won {
            Phase::Won
        } else if self.is_playing {
            Phase::Playing
        } else {
            Phase::Idle
        }
    }

    fn accepts_input(&self) -> bool {
        self.is_playing && !self.game_won
    }

    /// Try to move the player one cell in `direction`
    ///
    /// Blocked, out-of-bounds, or out-of-play attempts return the session
    /// unchanged with no event. Entering the goal ends the game and emits
    /// `GameEvent::Won`.
    pub fn attempt_move(mut self, direction: Direction) -> (Self, Option<GameEvent>) {
        let event = self.apply_move(direction);
        (self, event)
    }

    /// Advance the clock by one second while the game is in play
    pub fn tick(mut self) -> (Self, Option<GameEvent>) {
        let event = self.apply_tick();
        (self, event)
    }

    /// In-place form of `attempt_move`
    pub fn apply_move(&mut self, direction: Direction) -> Option<GameEvent> {
        if !self.accepts_input() {
            return None;
        }

        let next = self.maze.step(self.player, direction)?;
        self.player = next;

        if next == self.maze.goal() {
            self.game_won = true;
            self.is_playing = false;
            return Some(GameEvent::Won { time: self.time_elapsed });
        }

        None
    }

    /// In-place form of `tick`
    pub fn apply_tick(&mut self) -> Option<GameEvent> {
        if !self.accepts_input() {
            return None;
        }

        self.time_elapsed = self.time_elapsed.saturating_add(1);
        Some(GameEvent::CurrentTime { time: self.time_elapsed })
    }
}
