//! Grid snake: the simulation core, free of any terminal or window code.
//!
//! A host drives [`sim::Simulation`] on a fixed timestep, feeds it turns
//! produced by [`input::InputTranslator`] and draws from
//! [`sim::Simulation::snapshot`].

pub mod clock;
pub mod config;
pub mod error;
pub mod grid;
pub mod input;
pub mod phase;
pub mod sim;
pub mod snake;

pub use config::Config;
pub use error::{Error, Result};
pub use phase::Phase;
pub use sim::{Simulation, Snapshot, TickResult};
pub use snake::Direction;
