use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::{bail, Result};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::Rng;
use tracing::{debug, info};

use snake::clock::FixedStep;
use snake::grid::Rect;
use snake::input::{ControllerHost, InputEvent, InputTranslator, Intent, Key};
use snake::{Config, Phase, Simulation};

use crate::term::{Coords, TermInt, TermManager};

const FRAME_INTERVAL_MS: u64 = 15;

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHAR: char = 'O';
const EMPTY_CHAR: char = ' ';

/// Terminal columns per grid cell, cells would look squashed at one.
const CELL_COLUMNS: TermInt = 2;
/// Score line, then the top border.
const FIELD_TOP: TermInt = 2;
const FIELD_LEFT: TermInt = 1;

pub struct SnakeGame<R> {
    term: TermManager,
    sim: Simulation<R>,
    translator: InputTranslator,
    clock: FixedStep,
    paused: bool,
    running: bool,
    controllers: Vec<u32>,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(config: Config, rng: R) -> Result<Self> {
        let translator = InputTranslator::new(config.swipe_threshold(), config.stick_dead_zone);
        Ok(SnakeGame {
            term: TermManager::new()?,
            sim: Simulation::new(config, rng)?,
            translator,
            clock: FixedStep::new(),
            paused: false,
            running: true,
            controllers: vec![],
        })
    }

    /// Takes over the terminal, plays until the player quits, then hands the
    /// terminal back even if the game loop failed.
    pub fn run(&mut self) -> Result<()> {
        let (needed_w, needed_h) = self.required_size();
        let (w, h) = self.term.get_terminal_size();
        if w < needed_w || h < needed_h {
            bail!(
                "terminal is {}x{}, the play field needs at least {}x{}",
                w, h, needed_w, needed_h
            );
        }

        self.term.setup()?;
        let result = self.play();
        self.term.restore()?;
        result
    }

    fn play(&mut self) -> Result<()> {
        self.show_intro()?;
        self.draw_frame()?;

        let mut last = Instant::now();
        while self.running {
            sleep(Duration::from_millis(FRAME_INTERVAL_MS));

            let now = Instant::now();
            let elapsed = now - last;
            last = now;

            for ev in self.term.read_events_queue()? {
                self.handle_event(ev)?;
            }

            if self.paused || self.sim.phase().is_over() {
                continue;
            }

            self.clock.advance(elapsed);
            while self.clock.consume(self.sim.tick_interval()) {
                let result = self.sim.tick();
                if result.phase.is_over() {
                    self.clock.reset();
                    self.render()?;
                    self.game_over()?;
                    break;
                }
            }

            if !self.sim.phase().is_over() {
                self.render()?;
            }
        }

        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_intro(&mut self) -> Result<()> {
        self.term.show_message(&[
            "Arrow keys, WASD or mouse drag to move",
            "Esc to pause",
            "q or CTRL+C to quit",
        ])?;
        sleep(Duration::from_millis(1500));
        self.term.hide_message()?;
        Ok(())
    }

    fn handle_event(&mut self, ev: Event) -> Result<()> {
        if is_ctrl_c(&ev) {
            self.running = false;
            return Ok(());
        }

        let input = match self.map_event(&ev) {
            Some(input) => input,
            None => return Ok(()),
        };

        if input.route_hotplug(self) {
            return Ok(());
        }

        if self.sim.phase().is_over() {
            if let InputEvent::PointerDown { .. } = input {
                return self.restart();
            }
        }

        match self.translator.translate(&input) {
            Some(Intent::Steer(dir)) if !self.paused => {
                self.sim.steer(dir);
            }
            Some(Intent::Restart) if self.sim.phase().is_over() => self.restart()?,
            Some(Intent::TogglePause) if !self.sim.phase().is_over() => self.toggle_pause()?,
            Some(Intent::Quit) => self.running = false,
            _ => {}
        }

        Ok(())
    }

    /// Turns a terminal event into a game input. Mouse positions become
    /// play-field pixels so the swipe threshold stays in pixel units.
    fn map_event(&self, ev: &Event) -> Option<InputEvent> {
        match ev {
            Event::Key(KeyEvent { code, kind, .. }) => {
                let key = map_key(*code);
                match kind {
                    KeyEventKind::Release => Some(InputEvent::KeyUp(key)),
                    _ => Some(InputEvent::KeyDown(key)),
                }
            }
            Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                let (x, y) = self.to_field_pixels((*column, *row));
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        Some(InputEvent::PointerDown { x, y })
                    }
                    MouseEventKind::Drag(MouseButton::Left) => {
                        Some(InputEvent::PointerMove { x, y })
                    }
                    MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::PointerUp),
                    _ => None,
                }
            }
            Event::Resize(w, h) => {
                debug!(w, h, "terminal resized");
                None
            }
            _ => None,
        }
    }

    fn restart(&mut self) -> Result<()> {
        self.sim.reset();
        self.clock.reset();
        self.term.hide_message()?;
        self.draw_frame()
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or q to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }

    fn game_over(&mut self) -> Result<()> {
        let score = self.sim.score();
        info!(score, "game over");
        self.term.show_message(&[
            "Game over!",
            &*format!("Score: {}", score),
            "",
            "Press Enter or click to play again,",
            "or q to quit.",
        ])?;
        Ok(())
    }

    fn draw_frame(&mut self) -> Result<()> {
        self.term.clear()?;
        let grid = *self.sim.grid();
        let size = (
            grid.columns() as TermInt * CELL_COLUMNS + 2,
            grid.rows() as TermInt + 2,
        );
        self.term.draw_borders((FIELD_LEFT - 1, FIELD_TOP - 1), size)?;
        self.render()
    }

    /// Repaints the field. The terminal buffer skips cells that did not
    /// change, so a full pass per frame stays cheap.
    fn render(&mut self) -> Result<()> {
        let grid = *self.sim.grid();
        let width = self.required_size().0 as usize;
        let snapshot = self.sim.snapshot();

        let status = format!(
            "Score: {:<4} Speed: {:>4}ms{}",
            snapshot.score,
            self.sim.tick_interval().as_millis(),
            if self.controllers.is_empty() { "" } else { "  [pad]" },
        );
        self.term.print_str_at((0, 0), &format!("{:<width$}", status, width = width))?;

        let mut cells = vec![EMPTY_CHAR; grid.cell_count()];
        let mut paint = |rect: Rect, ch: char| {
            let cell = grid.cell_at(rect.origin());
            let on_field = (0..grid.columns()).contains(&cell.col)
                && (0..grid.rows()).contains(&cell.row);
            if on_field {
                cells[(cell.row * grid.columns() + cell.col) as usize] = ch;
            }
        };

        paint(snapshot.food, APPLE_CHAR);
        for segment in snapshot.segments.iter().skip(1) {
            paint(*segment, SNAKE_BODY_CHAR);
        }
        if let Some(head) = snapshot.segments.front() {
            let ch = if snapshot.phase == Phase::GameOver {
                'X'
            } else {
                snapshot.heading.head_char()
            };
            paint(*head, ch);
        }

        for (i, ch) in cells.into_iter().enumerate() {
            let (col, row) = (i as i32 % grid.columns(), i as i32 / grid.columns());
            let pos = to_term((col as TermInt, row as TermInt));
            for dx in 0..CELL_COLUMNS {
                self.term.print_at((pos.0 + dx, pos.1), ch)?;
            }
        }

        self.term.flush()?;
        Ok(())
    }

    fn required_size(&self) -> Coords {
        let grid = self.sim.grid();
        (
            grid.columns() as TermInt * CELL_COLUMNS + 2,
            grid.rows() as TermInt + FIELD_TOP + 1,
        )
    }

    fn to_field_pixels(&self, pos: Coords) -> (i32, i32) {
        let cell_size = self.sim.grid().cell_size();
        let x = (i32::from(pos.0) - i32::from(FIELD_LEFT)) * cell_size / i32::from(CELL_COLUMNS);
        let y = (i32::from(pos.1) - i32::from(FIELD_TOP)) * cell_size;
        (x, y)
    }
}

impl<R> ControllerHost for SnakeGame<R> {
    fn controller_connected(&mut self, id: u32) {
        info!(id, "controller connected");
        if !self.controllers.contains(&id) {
            self.controllers.push(id);
        }
    }

    fn controller_disconnected(&mut self, id: u32) {
        info!(id, "controller disconnected");
        self.controllers.retain(|&c| c != id);
    }
}

fn to_term(cell: Coords) -> Coords {
    (FIELD_LEFT + cell.0 * CELL_COLUMNS, FIELD_TOP + cell.1)
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    }
}

fn is_ctrl_c(ev: &Event) -> bool {
    matches!(
        ev,
        Event::Key(KeyEvent { code: KeyCode::Char('c'), modifiers, .. })
            if modifiers.contains(KeyModifiers::CONTROL)
    )
}
