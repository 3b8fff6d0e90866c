//! Retry-driven random placement under the solvability invariant.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::state::Grid;
use crate::types::{MapGenError, Pos, TileKind};

use super::model::MapMetadata;
use super::validation::validate_map;

/// Produces grids that pass [`validate_map`], or fails deterministically
/// after a bounded number of attempts.
///
/// The random source is an owned `ChaCha8Rng` seeded once per [`generate`]
/// call; rejected attempts keep drawing from the same stream, so a seed
/// pins the whole retry sequence, not just the first layout.
///
/// [`generate`]: MapGenerator::generate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapGenerator {
    pub width: usize,
    pub height: usize,
    /// Fraction of the cells left after entity placement converted to traps.
    pub trap_density: f64,
    pub num_keys: usize,
    /// Lower bound on placed traps regardless of density.
    pub min_traps: usize,
    pub max_retries: u32,
}

impl Default for MapGenerator {
    fn default() -> Self {
        Self { width: 8, height: 8, trap_density: 0.1, num_keys: 3, min_traps: 0, max_retries: 100 }
    }
}

impl MapGenerator {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn generate(&self, seed: u64) -> Result<(Grid, MapMetadata), MapGenError> {
        let capacity = self.width * self.height;
        let required = 2 + self.num_keys;
        if capacity < required {
            return Err(MapGenError::GridTooSmall { capacity, required });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for attempt in 1..=self.max_retries {
            let grid = self.place_entities(&mut rng);
            if validate_map(&grid).is_ok() {
                return Ok((grid, MapMetadata { seed, attempts: attempt }));
            }
        }

        Err(MapGenError::RetriesExhausted { attempts: self.max_retries })
    }

    fn place_entities(&self, rng: &mut ChaCha8Rng) -> Grid {
        let mut grid = Grid::new(self.width, self.height);

        let mut pool: Vec<Pos> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 }))
            .collect();
        shuffle(&mut pool, rng);

        // Capacity was checked up front, so these pops cannot drain the pool.
        for kind in [TileKind::Start, TileKind::Goal] {
            if let Some(pos) = pool.pop() {
                grid.set_tile(pos, kind);
            }
        }
        for _ in 0..self.num_keys {
            if let Some(pos) = pool.pop() {
                grid.set_tile(pos, TileKind::Key);
            }
        }

        let density_quota = (pool.len() as f64 * self.trap_density) as usize;
        let trap_quota = self.min_traps.max(density_quota);
        for _ in 0..trap_quota {
            let Some(pos) = pool.pop() else { break };
            grid.set_tile(pos, TileKind::Trap);
        }

        grid
    }
}

/// Fisher-Yates over the coordinate pool. Written against `RngCore` directly
/// so the generator's only randomness dependency stays the ChaCha stream.
fn shuffle(cells: &mut [Pos], rng: &mut ChaCha8Rng) {
    for i in (1..cells.len()).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        cells.swap(i, j);
    }
}
