use std::{fmt, time::{Duration, Instant}};

use crate::input::{InputSource, Poll, poll_window};
use crate::term::Canvas;
use crate::snake::{Snake, Position, Direction};

use crossterm::style::Color;
use rand::Rng;
use rand::seq::SliceRandom;

const BOARD_WIDTH: i16 = 32;
const BOARD_HEIGHT: i16 = 16;
const INITIAL_SCORE: usize = 5;
const FRAME_BUDGET_MS: u64 = 500;

const GLYPH: char = '■';
const BORDER_COLOR: Color = Color::Reset;
const BODY_COLOR: Color = Color::Green;
const HEAD_COLOR: Color = Color::Red;
const FOOD_COLOR: Color = Color::Cyan;

#[derive(Copy, Clone, Debug)]
pub struct GameConfig {
    pub width: i16,
    pub height: i16,
    /// Also the length the body starts growing towards.
    pub initial_score: usize,
    pub frame_budget: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            initial_score: INITIAL_SCORE,
            frame_budget: Duration::from_millis(FRAME_BUDGET_MS),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    GameOver,
    /// No free cell was left to put food on.
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Border,
    Body,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collision::Border => write!(f, "the border"),
            Collision::Body => write!(f, "its own body"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    GameOver { score: usize },
    Won { score: usize },
    Quit { score: usize },
}

impl Outcome {
    pub fn score(&self) -> usize {
        match *self {
            Outcome::GameOver { score } | Outcome::Won { score } | Outcome::Quit { score } => score,
        }
    }
}

pub struct GameState<R> {
    config: GameConfig,
    rng: R,
    snake: Snake,
    food: Option<Position>,
    score: usize,
    direction: Direction,
    status: Status,
}

impl<R: Rng> GameState<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        let center = Position::new(config.width / 2, config.height / 2);

        let mut state = GameState {
            config,
            rng,
            snake: Snake::new(center),
            food: None,
            score: config.initial_score,
            direction: Direction::Right,
            status: Status::Running,
        };

        state.food = state.spawn_food();
        if state.food.is_none() {
            state.status = Status::Won;
        }

        state
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Advances the snake one cell. Does nothing once the game has ended.
    pub fn update(&mut self) {
        if self.status != Status::Running {
            return;
        }

        let new_head = self.snake.head().moved(self.direction);

        if let Some(cause) = self.collision(new_head) {
            log::info!("Crashed into {} at ({}, {})", cause, new_head.x, new_head.y);
            self.status = Status::GameOver;
            return;
        }

        self.snake.move_to(new_head);

        if self.food == Some(new_head) {
            self.score += 1;
            self.food = self.spawn_food();

            match self.food {
                Some(food) => log::debug!("Score {}, new food at ({}, {})", self.score, food.x, food.y),
                None => {
                    log::info!("No free cell left for food");
                    self.status = Status::Won;
                }
            }
        }

        // Converge on the score; the snake never loses its last segment
        while self.snake.len() > self.score.max(1) {
            self.snake.remove_tail();
        }
    }

    /// Border cells themselves are walls.
    pub fn collision(&self, pos: Position) -> Option<Collision> {
        let (w, h) = (self.config.width, self.config.height);

        if pos.x <= 0 || pos.x >= w - 1 || pos.y <= 0 || pos.y >= h - 1 {
            Some(Collision::Border)
        } else if self.snake.contains(&pos) {
            Some(Collision::Body)
        } else {
            None
        }
    }

    /// A uniformly random free cell strictly inside the border, or `None`
    /// if the snake covers all of them.
    fn spawn_food(&mut self) -> Option<Position> {
        let (w, h) = (self.config.width, self.config.height);
        if w < 3 || h < 3 {
            return None;
        }

        for _ in 0..(w as usize * h as usize) {
            let pos = Position::new(self.rng.gen_range(1..=w - 2), self.rng.gen_range(1..=h - 2));
            if !self.snake.contains(&pos) {
                return Some(pos);
            }
        }

        log::warn!("Random food placement kept hitting the snake, scanning for free cells");

        let free: Vec<Position> = (1..h - 1)
            .flat_map(|y| (1..w - 1).map(move |x| Position::new(x, y)))
            .filter(|pos| !self.snake.contains(pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }

    pub fn render<C: Canvas>(&self, canvas: &mut C) -> crossterm::Result<()> {
        let (w, h) = (self.config.width, self.config.height);

        canvas.clear()?;

        for x in 0..w {
            canvas.print_at(Position::new(x, 0), GLYPH, BORDER_COLOR)?;
            canvas.print_at(Position::new(x, h - 1), GLYPH, BORDER_COLOR)?;
        }

        for y in 0..h {
            canvas.print_at(Position::new(0, y), GLYPH, BORDER_COLOR)?;
            canvas.print_at(Position::new(w - 1, y), GLYPH, BORDER_COLOR)?;
        }

        for segment in self.snake.body().skip(1) {
            canvas.print_at(*segment, GLYPH, BODY_COLOR)?;
        }
        canvas.print_at(self.snake.head(), GLYPH, HEAD_COLOR)?;

        if let Some(food) = self.food {
            canvas.print_at(food, GLYPH, FOOD_COLOR)?;
        }

        canvas.flush()
    }

    fn show_summary<C: Canvas>(&self, canvas: &mut C) -> crossterm::Result<()> {
        let at = Position::new(self.config.width / 5, self.config.height / 2);
        let text = match self.status {
            Status::Won => format!("You won, Score: {}", self.score),
            _ => format!("Game over, Score: {}", self.score),
        };

        canvas.print_text(at, &text)?;
        canvas.flush()
    }
}

pub struct SnakeGame<T, R> {
    term: T,
    state: GameState<R>,
}

impl<T: Canvas + InputSource, R: Rng> SnakeGame<T, R> {
    pub fn new(term: T, config: GameConfig, rng: R) -> Self {
        SnakeGame { term, state: GameState::new(config, rng) }
    }

    pub fn term_mut(&mut self) -> &mut T {
        &mut self.term
    }

    /// Plays frames until the snake crashes, the board fills up or the player interrupts.
    pub fn run(&mut self) -> crossterm::Result<Outcome> {
        let budget = self.state.config.frame_budget;
        log::info!("Starting a {}x{} game with score {}",
            self.state.config.width, self.state.config.height, self.state.score);

        while self.state.status() == Status::Running {
            let frame_start = Instant::now();

            self.state.render(&mut self.term)?;

            match poll_window(&mut self.term, self.state.direction(), budget)? {
                Poll::Interrupted => {
                    log::info!("Interrupted with score {}", self.state.score());
                    return Ok(Outcome::Quit { score: self.state.score() });
                },
                Poll::Steer(dir) => self.state.set_direction(dir),
                Poll::Keep => {}
            }

            self.state.update();

            if let Some(rest) = budget.checked_sub(frame_start.elapsed()) {
                self.term.pause(rest);
            }
        }

        log::info!("Final score {}", self.state.score());

        self.state.render(&mut self.term)?;
        self.state.show_summary(&mut self.term)?;
        self.term.wait_any_key()?;

        Ok(match self.state.status() {
            Status::Won => Outcome::Won { score: self.state.score() },
            _ => Outcome::GameOver { score: self.state.score() },
        })
    }
}
