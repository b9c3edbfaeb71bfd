//! The one live game shared by every handler

use crate::timer::GameTimer;
use crate::ws::WsHub;
use maze_core::{GameConfig, GameSession, MazeError, TICK_INTERVAL_MS};
use maze_session::render::{render_svg, Layout};
use maze_session::{GameController, SessionSnapshot};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub type SharedState = Arc<AppState>;

#[derive(Debug, Serialize)]
pub struct KeyResponse {
    /// The key is one of the arrows; the front end should suppress its
    /// default action
    pub handled: bool,
    pub state: SessionSnapshot,
}

pub struct AppState {
    game: Mutex<GameController<WsHub>>,
    pub hub: WsHub,
    timer: GameTimer,
    /// Latest SVG rendering, refreshed by a game observer
    rendered: Arc<Mutex<String>>,
    started: Instant,
    tick_period: Duration,
}

impl AppState {
    /// Build the state around a running game and start its clock
    pub fn start(config: GameConfig, seed: Option<u32>) -> Result<SharedState, MazeError> {
        let hub = WsHub::new();
        let mut game = match seed {
            Some(seed) => GameController::with_seed(config, hub.clone(), seed)?,
            None => GameController::new(config, hub.clone())?,
        };

        let rendered = Arc::new(Mutex::new(String::new()));
        let target = Arc::clone(&rendered);
        let layout = Layout::from(config);
        game.subscribe(Box::new(move |session: &GameSession| {
            let svg = render_svg(session.maze(), session.player(), layout);
            *target.lock().unwrap_or_else(PoisonError::into_inner) = svg;
        }));

        let state = Arc::new(Self {
            game: Mutex::new(game),
            hub,
            timer: GameTimer::new(),
            rendered,
            started: Instant::now(),
            tick_period: Duration::from_millis(TICK_INTERVAL_MS),
        });
        state.restart_timer();
        Ok(state)
    }

    fn game(&self) -> MutexGuard<'_, GameController<WsHub>> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Milliseconds since the server started; the debounce clock
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.game().snapshot()
    }

    pub fn rendered_svg(&self) -> String {
        self.rendered.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Start a fresh game, restarting the clock with it
    pub fn new_maze(self: &Arc<Self>, seed: Option<u32>) -> SessionSnapshot {
        let snapshot = {
            let mut game = self.game();
            match seed {
                Some(seed) => game.new_maze_with_seed(seed),
                None => {
                    game.new_maze();
                }
            }
            game.snapshot()
        };
        self.restart_timer();
        snapshot
    }

    pub fn press_key(&self, key: &str) -> KeyResponse {
        let (handled, state, playing) = {
            let mut game = self.game();
            let handled = game.handle_key(key);
            (handled, game.snapshot(), game.session().is_playing())
        };
        if !playing {
            self.timer.stop();
        }
        KeyResponse { handled, state }
    }

    /// One inbound transport frame; malformed frames are dropped
    pub fn handle_remote_frame(self: &Arc<Self>, text: &str) {
        let now_ms = self.now_ms();
        let (result, playing) = {
            let mut game = self.game();
            let result = game.handle_message(text, now_ms);
            (result, game.session().is_playing())
        };

        match result {
            Ok(outcome) if outcome.reset => self.restart_timer(),
            Ok(_) if !playing => self.timer.stop(),
            Ok(_) => {}
            // already logged by the controller
            Err(_) => {}
        }
    }

    fn restart_timer(self: &Arc<Self>) {
        let state = Arc::downgrade(self);
        self.timer.restart(self.tick_period, move || match state.upgrade() {
            Some(state) => state.game().tick(),
            None => false,
        });
    }

    pub fn shutdown(&self) {
        self.timer.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::Direction;
    use serde_json::json;

    const SEED: u32 = 2918957128;

    fn key_name(direction: Direction) -> &'static str {
        match direction {
            Direction::Up => "ArrowUp",
            Direction::Right => "ArrowRight",
            Direction::Down => "ArrowDown",
            Direction::Left => "ArrowLeft",
        }
    }

    fn solution(state: &AppState) -> Vec<Direction> {
        let game = state.game();
        let maze = game.session().maze();
        maze.shortest_path(game.session().player(), maze.goal()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_runs_while_playing() {
        let state = AppState::start(GameConfig::default(), Some(SEED)).unwrap();
        assert!(state.timer_running());

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(state.snapshot().time_elapsed, 3);
        assert_eq!(state.snapshot().time_display, "00:03");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_stops_on_win() {
        let state = AppState::start(GameConfig::default(), Some(SEED)).unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        for direction in solution(&state) {
            assert!(state.press_key(key_name(direction)).handled);
        }
        let snapshot = state.snapshot();
        assert!(snapshot.game_won);
        assert!(!state.timer_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.snapshot().time_elapsed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_maze_restarts_clock() {
        let state = AppState::start(GameConfig::default(), Some(SEED)).unwrap();
        for direction in solution(&state) {
            state.press_key(key_name(direction));
        }
        assert!(!state.timer_running());

        let snapshot = state.new_maze(Some(7));
        assert_eq!(snapshot.seed, 7);
        assert_eq!(snapshot.time_elapsed, 0);
        assert!(snapshot.is_playing);
        assert!(state.timer_running());

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(state.snapshot().time_elapsed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_frames_move_and_reset() {
        let state = AppState::start(GameConfig::default(), Some(SEED)).unwrap();
        let first = solution(&state)[0];
        let (x, y) = match first {
            Direction::Up => (511, 1000),
            Direction::Down => (511, 20),
            Direction::Right => (1000, 511),
            Direction::Left => (20, 511),
        };

        state.handle_remote_frame(&json!({"x": x, "y": y, "button": false}).to_string());
        assert_ne!(state.snapshot().player.x + state.snapshot().player.y, 0);

        state.handle_remote_frame("not json");
        state.handle_remote_frame(&json!({"x": 511, "y": 511, "button": true}).to_string());
        let snapshot = state.snapshot();
        assert_eq!((snapshot.player.x, snapshot.player.y), (0, 0));
        assert!(state.timer_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_arrow_key_not_handled() {
        let state = AppState::start(GameConfig::default(), Some(SEED)).unwrap();
        let response = state.press_key("Space");
        assert!(!response.handled);
        assert_eq!((response.state.player.x, response.state.player.y), (0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rendering_tracks_moves() {
        let state = AppState::start(GameConfig::default(), Some(SEED)).unwrap();
        let initial = state.rendered_svg();
        assert!(initial.starts_with("<svg"));

        state.press_key(key_name(solution(&state)[0]));
        assert_ne!(state.rendered_svg(), initial);
    }
}
