pub mod env;
pub mod mapgen;
pub mod rollout;
pub mod seed;
pub mod state;
pub mod types;

pub use env::{CHANNELS, Channel, EnvConfig, GridWorld, Observation, ResetOptions, StepResult};
pub use mapgen::{MapGenerator, MapMetadata, ValidationFailure, validate_map};
pub use state::Grid;
pub use types::*;
