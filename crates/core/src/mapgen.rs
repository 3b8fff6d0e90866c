//! Procedural map generation: random placement, trap seeding, and the
//! solvability acceptance test.

pub mod model;

mod generator;
mod validation;

pub use generator::MapGenerator;
pub use model::MapMetadata;
pub use validation::{ValidationFailure, reachable_targets, validate_map};

use crate::state::Grid;
use crate::types::MapGenError;

pub fn generate_map(
    width: usize,
    height: usize,
    seed: u64,
) -> Result<(Grid, MapMetadata), MapGenError> {
    MapGenerator::new(width, height).generate(seed)
}
