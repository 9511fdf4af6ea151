use std::{thread::sleep, time::Instant};

use crate::config::GameConfig;
use crate::error::{GameError, StoreError};
use crate::food::Food;
use crate::store::{Progress, ProgressStore, UserId};
use crate::term::{self, Screen, TermManager};
use crate::snake::{Snake, Direction::{*, self}, MoveResult};

use crossterm::event::{KeyEvent, KeyEventKind, KeyModifiers, KeyCode};
use crossterm::style::Color;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

const SNAKE_COLOR: Color = Color::Rgb { r: 0, g: 255, b: 0 };

/// Direction keys pressed since the previous tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyState {
    held: [bool; 4],
}

impl KeyState {
    pub fn press(&mut self, dir: Direction) {
        self.held[Self::slot(dir)] = true;
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        self.held[Self::slot(dir)]
    }

    /// First held key in priority order that would not reverse the snake.
    pub fn steer(&self, current: Direction) -> Option<Direction> {
        Direction::PRIORITY.into_iter().find(|dir| self.is_held(*dir) && *dir != current.opposite())
    }

    fn slot(dir: Direction) -> usize {
        match dir {
            Up => 0,
            Down => 1,
            Left => 2,
            Right => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Running,
    Collided,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Collided,
}

#[derive(Debug)]
pub enum SaveStatus {
    Saved,
    /// No user id was available, so there was nothing to save against.
    Skipped,
    Failed(StoreError),
}

#[derive(Debug)]
pub struct GameOver {
    pub outcome: Outcome,
    pub progress: Progress,
    pub saved: SaveStatus,
}

/// Board state, advanced one tick at a time.
pub struct GameState {
    config: GameConfig,
    snake: Snake,
    food: Food,
    progress: Progress,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig, progress: Progress, mut rng: StdRng) -> Self {
        let snake = Snake::new(config.start_body.iter().copied(), config.start_direction);
        let food = Food::spawn(&config, &mut rng);
        GameState { config, snake, food, progress, rng }
    }

    pub fn tick(&mut self, keys: &KeyState) -> Tick {
        if let Some(dir) = keys.steer(self.snake.get_direction()) {
            self.snake.set_direction(dir);
        }

        if self.snake.move_step(self.config.cell, self.food.position) == MoveResult::Ate {
            self.progress.score += self.food.weight.value();
            debug!("ate {:?} at {:?}, score {}", self.food.weight, self.food.position, self.progress.score);
            self.food = Food::spawn(&self.config, &mut self.rng);
        }

        let head = self.snake.head();
        if self.snake.bites_itself() || !self.config.in_bounds(head) {
            Tick::Collided
        } else {
            Tick::Running
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

/// Appends the session's progress for `user`, if there is one.
pub fn save_progress<S: ProgressStore + ?Sized>(store: &mut S, user: Option<UserId>, progress: Progress) -> SaveStatus {
    let Some(user) = user else {
        return SaveStatus::Skipped;
    };

    match store.append_progress(user, progress) {
        Ok(()) => SaveStatus::Saved,
        Err(e) => SaveStatus::Failed(e),
    }
}

/// What one frame of key events asks for.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub keys: KeyState,
    pub quit: bool,
    pub toggle_pause: bool,
}

/// Folds a frame's key events into direction keys and the quit and pause
/// requests. Key releases are ignored.
pub fn read_frame_input(events: &[KeyEvent]) -> FrameInput {
    let mut input = FrameInput::default();

    for ev in events.iter().filter(|ev| ev.kind != KeyEventKind::Release) {
        match ev {
            ev if is_quit(ev) => input.quit = true,
            KeyEvent { code, .. } => match code {
                KeyCode::Char('w') | KeyCode::Up => input.keys.press(Up),
                KeyCode::Char('a') | KeyCode::Left => input.keys.press(Left),
                KeyCode::Char('s') | KeyCode::Down => input.keys.press(Down),
                KeyCode::Char('d') | KeyCode::Right => input.keys.press(Right),
                KeyCode::Esc => input.toggle_pause = !input.toggle_pause,
                _ => {}
            }
        }
    }

    input
}

/// One play session: the board plus where its progress gets saved.
pub struct Session<'a, S: ProgressStore> {
    state: GameState,
    store: &'a mut S,
    user: Option<UserId>,
    paused: bool,
}

impl<'a, S: ProgressStore> Session<'a, S> {
    pub fn new(state: GameState, store: &'a mut S, user: Option<UserId>) -> Self {
        Session { state, store, user, paused: false }
    }

    /// Applies one frame. Returns the outcome once the session is over.
    pub fn advance(&mut self, input: &FrameInput) -> Option<Outcome> {
        if input.quit {
            return Some(Outcome::Quit);
        }
        if input.toggle_pause {
            self.paused = !self.paused;
        }
        if self.paused {
            return None;
        }

        match self.state.tick(&input.keys) {
            Tick::Collided => Some(Outcome::Collided),
            Tick::Running => None,
        }
    }

    /// Saves the final progress. Called once, for either outcome.
    pub fn finish(&mut self, outcome: Outcome) -> GameOver {
        let progress = self.state.progress();
        let saved = save_progress(&mut *self.store, self.user, progress);
        info!("session end: {:?} with {:?}, snake length {}", outcome, progress, self.state.snake().len());

        GameOver { outcome, progress, saved }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

pub struct SnakeGame<'a, S: ProgressStore> {
    session: Session<'a, S>,
    term: TermManager,
    username: String,
}

impl<'a, S: ProgressStore> SnakeGame<'a, S> {
    pub fn new(
        config: GameConfig,
        store: &'a mut S,
        user: Option<UserId>,
        username: String,
        progress: Progress,
    ) -> Result<Self, GameError> {
        let cols = u16::try_from(config.columns()).unwrap_or(u16::MAX);
        let rows = u16::try_from(config.rows()).unwrap_or(u16::MAX);
        let term = TermManager::new(cols, rows)?;
        let state = GameState::new(config, progress, StdRng::from_entropy());

        Ok(SnakeGame { session: Session::new(state, store, user), term, username })
    }

    /// Plays one session and saves its progress. The terminal is restored on
    /// every path out of here.
    pub fn run(mut self) -> Result<GameOver, GameError> {
        term::enter(&mut self.term)?;
        let res = self.play();
        let restored = self.term.restore();
        let over = res?;
        restored?;
        Ok(over)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn play(&mut self) -> Result<GameOver, GameError> {
        info!("session start for {:?}: {:?}", self.username, self.session.state().progress());

        let outcome = if self.show_intro()? {
            self.game_loop()?
        } else {
            Outcome::Quit
        };

        let over = self.session.finish(outcome);

        if outcome == Outcome::Collided {
            self.game_over(&over)?;
            term::wait_for_fresh_key(&mut self.term)?;
        }

        Ok(over)
    }

    /// Returns false if the player quit from the intro screen.
    fn show_intro(&mut self) -> Result<bool, GameError> {
        self.render()?;

        let progress = self.session.state().progress();
        let greeting = format!("Hello, {}", self.username);
        let carried = format!("Level {}  Score {}", progress.level, progress.score);
        self.term.show_message(&[
            greeting.as_str(),
            carried.as_str(),
            "",
            "Arrow keys or WASD to move",
            "Esc to pause",
            "q or CTRL+C to quit",
            "",
            "Press any key to begin"
        ])?;

        Ok(!is_quit(&self.term.read_key_blocking()?))
    }

    fn game_loop(&mut self) -> Result<Outcome, GameError> {
        let interval = self.session.state().config().tick_interval();

        loop {
            let frame_start = Instant::now();
            let input = read_frame_input(&self.term.read_key_events_queue()?);
            let was_paused = self.session.is_paused();

            if let Some(outcome) = self.session.advance(&input) {
                return Ok(outcome);
            }

            if !self.session.is_paused() {
                self.render()?;
            } else if !was_paused {
                self.term.show_message(&["Paused", "Press Esc to resume", "or q to quit"])?;
            }

            sleep(interval.saturating_sub(frame_start.elapsed()));
        }
    }

    fn render(&mut self) -> Result<(), GameError> {
        let state = self.session.state();
        let config = state.config();

        self.term.clear_board()?;
        for pos in state.snake().body() {
            if let Some((col, row)) = config.cell_of(*pos) {
                self.term.paint_cell(col, row, SNAKE_COLOR)?;
            }
        }

        let food = state.food();
        if let Some((col, row)) = config.cell_of(food.position) {
            self.term.paint_cell(col, row, food.color())?;
        }

        let progress = state.progress();
        self.term.draw_borders()?;
        self.term.print_status(&format!("Score: {} Level: {}", progress.score, progress.level))?;
        self.term.flush()?;
        Ok(())
    }

    fn game_over(&mut self, over: &GameOver) -> Result<(), GameError> {
        let score = format!("Score: {}", over.progress.score);
        let status = match over.saved {
            SaveStatus::Saved => "Progress saved",
            SaveStatus::Skipped => "Progress not saved (no user)",
            SaveStatus::Failed(_) => "Could not save progress",
        };

        self.term.show_message(&[
            "Game over!",
            score.as_str(),
            status,
            "",
            "Press any key to exit"
        ])?;
        Ok(())
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    match ev.code {
        KeyCode::Char('c') => ev.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') => true,
        _ => false,
    }
}
