//! The game rules: one tick moves the snake one cell.

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::grid::{Cell, Grid, Rect};
use crate::phase::Phase;
use crate::snake::{Direction, Snake};

/// What a single tick did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickResult {
    pub phase: Phase,
    pub score_delta: u32,
    pub grew: bool,
}

/// Read-only view handed to the renderer.
#[derive(Copy, Clone, Debug)]
pub struct Snapshot<'a> {
    pub segments: &'a VecDeque<Rect>,
    pub food: Rect,
    pub score: u32,
    pub phase: Phase,
    pub heading: Direction,
}

pub struct Simulation<R> {
    config: Config,
    grid: Grid,
    rng: R,
    snake: Snake,
    food: Rect,
    score: u32,
    tick_interval: Duration,
    phase: Phase,
    pending: Direction,
    committed: Direction,
}

impl<R: Rng> Simulation<R> {
    /// Builds the startup state. Fails when `config` does not pass
    /// [`Config::validate`].
    pub fn new(config: Config, rng: R) -> Result<Self> {
        config.validate()?;
        let grid = config.grid();
        let mut sim = Simulation {
            snake: Snake::new(grid.center(), grid.cell_size()),
            food: Rect::default(),
            score: 0,
            tick_interval: config.base_tick(),
            phase: Phase::Playing,
            pending: Direction::Still,
            committed: Direction::Still,
            config,
            grid,
            rng,
        };
        sim.place_food();
        Ok(sim)
    }

    /// Requests a turn for the next tick. Standing still is not a turn, and
    /// turning straight back against the committed direction is ignored.
    /// Returns whether the request was kept.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if dir == Direction::Still {
            return false;
        }
        if dir.is_reversal_of(self.committed) {
            debug!(?dir, committed = ?self.committed, "reversal ignored");
            return false;
        }
        self.pending = dir;
        true
    }

    /// Advances with the pending direction set through [`steer`](Self::steer).
    pub fn tick(&mut self) -> TickResult {
        self.advance(self.pending)
    }

    /// Moves the snake one cell in `dir`, then resolves food, bounds and
    /// self collision. Does nothing once the game is over.
    pub fn advance(&mut self, dir: Direction) -> TickResult {
        if self.phase.is_over() {
            return TickResult { phase: self.phase, score_delta: 0, grew: false };
        }

        self.pending = dir;
        self.committed = dir;

        let cell = self.grid.cell_size();
        let (dx, dy) = dir.delta();
        let head = self.snake.head();
        let pos = self.grid.snap_to_grid(head.x + dx * cell, head.y + dy * cell);
        let new_head = Rect::square(pos, cell);

        let step = self.snake.step(new_head);

        let mut score_delta = 0;
        let mut grew = false;
        if new_head.intersects(&self.food) {
            if self.snake.len() < self.config.max_length {
                self.snake.grow(step.old_tail);
                grew = true;
            }
            self.place_food();
            self.score += 1;
            score_delta = 1;
            debug!(score = self.score, length = self.snake.len(), "ate food");

            if self.snake.len() <= self.config.max_length
                && self.score % self.config.speed_threshold == 0
            {
                self.increase_speed();
            }
        }

        if !self.grid.bounds().contains(&new_head) && self.phase.end() {
            info!(score = self.score, "hit the wall");
        }
        if self.snake.hits_self() && self.phase.end() {
            info!(score = self.score, "hit itself");
        }

        TickResult { phase: self.phase, score_delta, grew }
    }

    /// Puts every field back to its startup value.
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.grid.center(), self.grid.cell_size());
        self.pending = Direction::Still;
        self.committed = Direction::Still;
        self.score = 0;
        self.tick_interval = self.config.base_tick();
        self.phase.restart();
        self.place_food();
        info!("game reset");
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            segments: self.snake.body(),
            food: self.food,
            score: self.score,
            phase: self.phase,
            heading: self.committed,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Rect {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn pending(&self) -> Direction {
        self.pending
    }

    pub fn committed(&self) -> Direction {
        self.committed
    }

    fn increase_speed(&mut self) {
        let faster = self.tick_interval.saturating_sub(self.config.speed_step());
        self.tick_interval = faster.max(self.config.min_tick());
        info!(interval_ms = self.tick_interval.as_millis() as u64, "speed increased");
    }

    /// Draws random cells until one is clear of the snake. When every cell is
    /// covered the food stays where it was.
    fn place_food(&mut self) {
        let free = self
            .grid
            .cells()
            .any(|cell| !self.snake.overlaps(&self.grid.cell_rect(cell)));
        if !free {
            warn!(length = self.snake.len(), "no free cell left for food");
            return;
        }

        loop {
            let col = self.rng.gen_range(0..self.grid.columns());
            let row = self.rng.gen_range(0..self.grid.rows());
            let candidate = self.grid.cell_rect(Cell::new(col, row));
            if !self.snake.overlaps(&candidate) {
                self.food = candidate;
                return;
            }
        }
    }

    #[cfg(test)]
    fn put_food(&mut self, cell: Cell) {
        self.food = self.grid.cell_rect(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::error::Error;
    use crate::grid::Point;
    use crate::snake::Direction::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sim_with(config: Config) -> Simulation<ChaCha8Rng> {
        Simulation::new(config, ChaCha8Rng::seed_from_u64(0x5eed)).unwrap()
    }

    fn sim() -> Simulation<ChaCha8Rng> {
        sim_with(Config::default())
    }

    fn head_cell(sim: &Simulation<ChaCha8Rng>) -> Cell {
        sim.grid.cell_at(sim.snake.head().origin())
    }

    /// Feeds the snake `n` times by dropping food right ahead of it.
    fn feed(sim: &mut Simulation<ChaCha8Rng>, dir: Direction, n: usize) {
        let (dx, dy) = dir.delta();
        for _ in 0..n {
            let head = head_cell(sim);
            sim.put_food(Cell::new(head.col + dx, head.row + dy));
            sim.advance(dir);
        }
    }

    #[test]
    fn starts_centered_and_still() {
        let sim = sim();
        assert_eq!(sim.snake.len(), 1);
        assert_eq!(sim.snake.head().origin(), Point::new(450, 250));
        assert_eq!(sim.committed, Still);
        assert_eq!(sim.score, 0);
        assert_eq!(sim.tick_interval, Duration::from_millis(142));
        assert!(!sim.snake.overlaps(&sim.food));
    }

    #[test]
    fn standing_still_changes_nothing() {
        let mut sim = sim();
        let food = sim.food;
        let result = sim.advance(Still);
        assert_eq!(result, TickResult { phase: Phase::Playing, score_delta: 0, grew: false });
        assert_eq!(sim.snake.head().origin(), Point::new(450, 250));
        assert_eq!(sim.food, food);
    }

    #[test]
    fn eating_grows_and_respawns_food() {
        let mut sim = sim();
        sim.put_food(Cell::new(10, 5));
        let old_food = sim.food;

        let result = sim.advance(Right);

        assert!(result.grew);
        assert_eq!(result.score_delta, 1);
        assert_eq!(sim.snake.len(), 2);
        assert_eq!(sim.score, 1);
        assert_ne!(sim.food, old_food);
        assert!(!sim.snake.overlaps(&sim.food));
        // New segment sits where the tail was before the move
        assert_eq!(sim.snake.tail().origin(), Point::new(450, 250));
    }

    #[test]
    fn growth_stops_at_max_length() {
        let mut sim = sim_with(Config { max_length: 3, ..Config::default() });
        feed(&mut sim, Right, 5);

        assert_eq!(sim.snake.len(), 3);
        assert_eq!(sim.score, 5);
        assert_eq!(sim.phase, Phase::Playing);
    }

    #[test]
    fn speeds_up_every_threshold() {
        let mut sim = sim();
        feed(&mut sim, Right, 4);
        assert_eq!(sim.tick_interval, Duration::from_millis(142));
        feed(&mut sim, Right, 1);
        assert_eq!(sim.tick_interval, Duration::from_millis(132));
    }

    #[test]
    fn speed_is_floored() {
        let config = Config { speed_threshold: 1, ..Config::default() };
        let mut sim = sim_with(config);
        feed(&mut sim, Up, 2);
        feed(&mut sim, Left, 8);
        assert_eq!(sim.score, 10);
        assert_eq!(sim.tick_interval, Duration::from_millis(80));
    }

    #[test]
    fn reversal_is_guarded_by_committed_direction() {
        let mut sim = sim();
        feed(&mut sim, Right, 2);
        assert_eq!(sim.snake.len(), 3);

        assert!(!sim.steer(Left));
        assert!(!sim.steer(Left));
        assert_eq!(sim.pending, Right);
        assert!(sim.steer(Up));
        sim.tick();
        assert_eq!(sim.committed, Up);
        assert_eq!(sim.phase, Phase::Playing);
    }

    #[test]
    fn standing_still_is_not_a_turn() {
        let mut sim = sim();
        feed(&mut sim, Right, 1);
        assert_eq!(sim.snake.len(), 2);

        assert!(!sim.steer(Still));
        assert_eq!(sim.pending, Right);
        assert_eq!(sim.tick().phase, Phase::Playing);
        assert_eq!(head_cell(&sim), Cell::new(11, 5));
    }

    #[test]
    fn rejects_invalid_config() {
        let rng = || ChaCha8Rng::seed_from_u64(1);
        let no_threshold = Config { speed_threshold: 0, ..Config::default() };
        assert!(matches!(
            Simulation::new(no_threshold, rng()),
            Err(Error::Config(ConfigError::SpeedThreshold))
        ));

        let too_small = Config { screen_width: 40, ..Config::default() };
        assert!(matches!(
            Simulation::new(too_small, rng()),
            Err(Error::Config(ConfigError::FieldTooSmall { .. }))
        ));
    }

    #[test]
    fn chained_turns_cannot_sneak_a_reversal() {
        let mut sim = sim();
        sim.advance(Right);
        // Up is accepted as pending, but Left is still checked against Right
        assert!(sim.steer(Up));
        assert!(!sim.steer(Left));
        assert_eq!(sim.pending, Up);
    }

    #[test]
    fn biting_the_body_ends_the_game() {
        let mut sim = sim();
        feed(&mut sim, Right, 4);
        assert_eq!(sim.snake.len(), 5);

        sim.advance(Down);
        sim.advance(Left);
        let result = sim.advance(Up);

        assert_eq!(result.phase, Phase::GameOver);
        assert!(sim.snake.hits_self());
    }

    #[test]
    fn game_over_freezes_state() {
        let mut sim = sim();
        feed(&mut sim, Right, 2);
        // advance() skips the reversal guard, so this lands on the neck
        let result = sim.advance(Left);
        assert_eq!(result.phase, Phase::GameOver);

        let frozen = sim.snake.clone();
        let score = sim.score;
        for _ in 0..3 {
            let result = sim.advance(Up);
            assert_eq!(result, TickResult { phase: Phase::GameOver, score_delta: 0, grew: false });
        }
        assert_eq!(sim.snake, frozen);
        assert_eq!(sim.score, score);
    }

    #[test]
    fn leaving_the_field_ends_the_game() {
        let mut sim = sim();
        for _ in 0..5 {
            assert_eq!(sim.advance(Up).phase, Phase::Playing);
        }
        assert_eq!(sim.snake.head().y, 0);
        assert_eq!(sim.advance(Up).phase, Phase::GameOver);
        assert_eq!(sim.snake.head().y, -50);
    }

    #[test]
    fn reset_restores_startup() {
        let mut sim = sim();
        feed(&mut sim, Right, 5);
        sim.advance(Left);
        assert!(sim.phase.is_over());

        sim.reset();

        assert_eq!(sim.phase, Phase::Playing);
        assert_eq!(sim.snake.len(), 1);
        assert_eq!(sim.snake.head().origin(), sim.grid.center());
        assert_eq!(sim.score, 0);
        assert_eq!(sim.tick_interval, sim.config.base_tick());
        assert_eq!((sim.pending, sim.committed), (Still, Still));
        assert!(!sim.snake.overlaps(&sim.food));
    }

    #[test]
    fn saturated_grid_keeps_food() {
        // A single-cell field is always full
        let config = Config { screen_width: 50, screen_height: 50, ..Config::default() };
        let mut sim = sim_with(config);
        let food = sim.food;
        sim.place_food();
        assert_eq!(sim.food, food);
    }

    #[test]
    fn food_fills_the_last_free_cell() {
        let config = Config { screen_width: 100, screen_height: 50, ..Config::default() };
        let mut sim = sim_with(config);
        assert_eq!(sim.snake.head().origin(), Point::new(0, 0));
        assert_eq!(sim.food.origin(), Point::new(50, 0));
    }

    proptest! {
        #[test]
        fn invariants_hold_under_random_play(
            seed in any::<u64>(),
            moves in proptest::collection::vec(0u8..5, 1..200),
        ) {
            let config = Config { max_length: 6, speed_threshold: 2, ..Config::default() };
            let rng = ChaCha8Rng::seed_from_u64(seed);
            let mut sim = Simulation::new(config.clone(), rng).unwrap();
            let mut last_score = 0;
            let mut last_interval = sim.tick_interval;

            for m in moves {
                let dir = [Still, Up, Down, Left, Right][m as usize];
                let committed = sim.committed;
                let pending = sim.pending;
                if !sim.steer(dir) {
                    prop_assert!(dir == Still || dir.is_reversal_of(committed));
                    prop_assert_eq!(sim.pending, pending);
                }

                let food = sim.food;
                let result = sim.tick();

                prop_assert!(sim.snake.len() >= 1 && sim.snake.len() <= config.max_length);
                prop_assert_eq!(sim.score, last_score + result.score_delta);
                prop_assert!(sim.tick_interval <= last_interval);
                prop_assert!(sim.tick_interval >= config.min_tick());
                if result.score_delta == 1 {
                    prop_assert!(!sim.snake.overlaps(&sim.food));
                } else {
                    prop_assert_eq!(sim.food, food);
                }
                for segment in sim.snake.body() {
                    prop_assert_eq!(segment.x % 50, 0);
                    prop_assert_eq!(segment.y % 50, 0);
                }

                last_score = sim.score;
                last_interval = sim.tick_interval;
                if result.phase.is_over() {
                    break;
                }
            }
        }
    }
}
