//! Game session driver
//!
//! `GameController` owns the live `GameSession` and is the single entry
//! point for everything that can change it: arrow keys, pointer messages
//! from the transport, timer ticks, and new-maze requests. It forwards
//! notifications to a `Transport` and tells observers whenever something
//! visible changed so they can redraw.

pub mod protocol;
pub mod render;
pub mod transport;

use maze_core::{direction_from_key, Direction, GameConfig, GameEvent, GameSession, InputNormalizer, Maze, PointerOutcome, PointerSample, SimpleLCG};
use serde::Serialize;

pub use protocol::{Handshake, Notification, ProtocolError, SessionSnapshot};
pub use transport::{Disconnected, MemoryTransport, SendError, Transport};

/// Called with the current session after every visible change
pub type Observer = Box<dyn FnMut(&GameSession) + Send>;

/// Generate the maze for `seed` with the given configuration
pub fn generate_maze(config: &GameConfig, seed: u32) -> Result<Maze, maze_core::MazeError> {
    config.generate_maze(&mut SimpleLCG::new(seed))
}

pub struct GameController<T: Transport> {
    config: GameConfig,
    session: GameSession,
    seed: u32,
    normalizer: InputNormalizer,
    transport: T,
    observers: Vec<Observer>,
}

impl<T: Transport> GameController<T> {
    /// Start a game on a random maze
    pub fn new(config: GameConfig, transport: T) -> Result<Self, maze_core::MazeError> {
        Self::with_seed(config, transport, rand::random())
    }

    /// Start a game on the maze generated from `seed`
    pub fn with_seed(config: GameConfig, transport: T, seed: u32) -> Result<Self, maze_core::MazeError> {
        let maze = generate_maze(&config, seed)?;
        tracing::info!("Starting game on {}x{} maze (seed {})", maze.width(), maze.height(), seed);

        Ok(Self {
            config,
            session: GameSession::start(maze),
            seed,
            normalizer: InputNormalizer::new(config.move_delay_ms),
            transport,
            observers: Vec::new(),
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(&self.session, self.seed)
    }

    /// Register a redraw callback; it is invoked once right away
    pub fn subscribe(&mut self, mut observer: Observer) {
        observer(&self.session);
        self.observers.push(observer);
    }

    /// Replace the game with a fresh one on a random maze
    pub fn new_maze(&mut self) -> u32 {
        let seed = rand::random();
        self.new_maze_with_seed(seed);
        seed
    }

    /// Replace the game with a fresh one on the maze generated from `seed`
    ///
    /// Always legal, including mid-game and after a win.
    pub fn new_maze_with_seed(&mut self, seed: u32) {
        // dimensions were validated when the controller was built
        let maze = match generate_maze(&self.config, seed) {
            Ok(maze) => maze,
            Err(e) => {
                tracing::error!("Failed to generate maze for seed {}: {}", seed, e);
                return;
            }
        };

        tracing::info!("New maze (seed {})", seed);
        self.seed = seed;
        self.session = GameSession::start(maze);
        self.notify_observers();
    }

    /// Handle a key press by name
    ///
    /// Returns true for the four arrow keys, which the front end should not
    /// pass on to its default handling, even when the move itself is a no-op.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match direction_from_key(key) {
            Some(direction) => {
                self.move_player(direction);
                true
            }
            None => false,
        }
    }

    /// Attempt one move; returns whether the player changed cells
    pub fn move_player(&mut self, direction: Direction) -> bool {
        let before = self.session.player();
        let event = self.session.apply_move(direction);
        let moved = self.session.player() != before;

        if let Some(event) = event {
            tracing::info!("Maze solved in {}s", self.session.time_elapsed());
            self.emit(event);
        }
        if moved {
            tracing::debug!("Moved {} to ({}, {})", direction, self.session.player().x, self.session.player().y);
            self.notify_observers();
        }

        moved
    }

    /// Feed one pointer sample received at `now_ms`
    ///
    /// The movement intent (if it survives dead zone and debounce) is applied
    /// first, then the reset request.
    pub fn handle_pointer(&mut self, sample: PointerSample, now_ms: u64) -> PointerOutcome {
        let outcome = self.normalizer.process(sample, now_ms);

        if let Some(direction) = outcome.intent {
            self.move_player(direction);
        }
        if outcome.reset {
            tracing::info!("Reset requested by remote controller");
            self.new_maze();
        }

        outcome
    }

    /// Parse and apply one inbound transport frame
    ///
    /// Malformed frames are logged and rejected without touching the game.
    pub fn handle_message(&mut self, text: &str, now_ms: u64) -> Result<PointerOutcome, ProtocolError> {
        let sample = protocol::parse_pointer(text).map_err(|e| {
            tracing::warn!("Discarding inbound message: {}", e);
            e
        })?;
        Ok(self.handle_pointer(sample, now_ms))
    }

    /// One timer period elapsed
    ///
    /// Returns whether the game is still running; once it returns false the
    /// caller should stop ticking.
    pub fn tick(&mut self) -> bool {
        if let Some(event) = self.session.apply_tick() {
            self.emit(event);
        }
        self.session.is_playing() && !self.session.game_won()
    }

    fn emit(&self, event: GameEvent) {
        self.send(&Notification::from(event));
    }

    /// Serialize and send; failures are logged and dropped
    pub fn send<M: Serialize>(&self, message: &M) {
        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to serialize outbound message: {}", e);
                return;
            }
        };

        if let Err(e) = self.transport.send(payload) {
            tracing::debug!("Outbound message dropped: {}", e);
        }
    }

    fn notify_observers(&mut self) {
        for observer in self.observers.iter_mut() {
            observer(&self.session);
        }
    }
}
