//! Episodic grid-world engine: action interpretation, collision and pickup
//! resolution, reward shaping, and termination.

mod observation;
mod potential;
mod render;

pub use observation::{CHANNELS, Channel, Observation};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::mapgen::MapGenerator;
use crate::seed::runtime_seed;
use crate::state::Grid;
use crate::types::{Action, EnvError, Event, Pos, StepInfo, TileKind};

/// Constructor-time configuration, immutable per instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    pub width: usize,
    pub height: usize,
    /// Observation padding bounds; `None` means the active size.
    pub max_width: Option<usize>,
    pub max_height: Option<usize>,
    pub trap_density: f64,
    pub num_keys: usize,
    pub min_traps: usize,
    pub max_retries: u32,
    /// Episode budget is this multiplier times the cell count.
    pub max_steps_multiplier: u32,
    pub dense_reward: bool,
    pub success_reward: f64,
    pub key_reward: f64,
    pub trap_cost: f64,
    pub step_cost: f64,
    pub timeout_penalty: f64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            max_width: None,
            max_height: None,
            trap_density: 0.1,
            num_keys: 3,
            min_traps: 0,
            max_retries: 100,
            max_steps_multiplier: 4,
            dense_reward: false,
            success_reward: 20.0,
            key_reward: 2.0,
            trap_cost: 20.0,
            step_cost: 0.01,
            timeout_penalty: 10.0,
        }
    }
}

/// Per-reset overrides. An explicit grid is adopted verbatim — no
/// solvability re-check — for deterministic tests and oracle rollouts.
/// Injected grids must match the configured width and height.
#[derive(Clone, Debug, Default)]
pub struct ResetOptions {
    pub grid: Option<Grid>,
}

#[derive(Clone, Debug)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

/// The episodic state machine over a generated (or injected) map.
///
/// All episode state lives here and is recreated on every [`reset`]; the
/// engine owns its `ChaCha8Rng`, and reseeding through `reset` is the only
/// source of nondeterminism. Call [`reset`] before the first [`step`].
///
/// [`reset`]: GridWorld::reset
/// [`step`]: GridWorld::step
pub struct GridWorld {
    config: EnvConfig,
    generator: MapGenerator,
    rng: ChaCha8Rng,
    max_steps: u32,
    static_grid: Grid,
    dynamic_grid: Grid,
    agent_pos: Pos,
    keys_collected: u32,
    steps: u32,
    last_potential: f64,
}

impl GridWorld {
    pub fn new(config: EnvConfig) -> Self {
        let generator = MapGenerator {
            width: config.width,
            height: config.height,
            trap_density: config.trap_density,
            num_keys: config.num_keys,
            min_traps: config.min_traps,
            max_retries: config.max_retries,
        };
        let max_steps = config.max_steps_multiplier * (config.width * config.height) as u32;
        let static_grid = Grid::new(config.width, config.height);
        let dynamic_grid = static_grid.clone();

        Self {
            generator,
            max_steps,
            rng: ChaCha8Rng::seed_from_u64(runtime_seed()),
            static_grid,
            dynamic_grid,
            agent_pos: Pos { y: 0, x: 0 },
            keys_collected: 0,
            steps: 0,
            last_potential: 0.0,
            config,
        }
    }

    /// Start a fresh episode. `Some(seed)` reseeds the engine RNG first;
    /// an injected grid bypasses generation entirely.
    pub fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<ResetOptions>,
    ) -> Result<(Observation, StepInfo), EnvError> {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }

        self.static_grid = match options.and_then(|options| options.grid) {
            Some(grid) => grid,
            None => {
                let gen_seed = self.rng.next_u64();
                let (grid, _meta) =
                    self.generator.generate(gen_seed).map_err(EnvError::Generation)?;
                grid
            }
        };

        self.dynamic_grid = self.static_grid.clone();
        self.agent_pos =
            self.static_grid.find_unique(TileKind::Start).ok_or(EnvError::MissingStart)?;
        self.keys_collected = 0;
        self.steps = 0;
        self.last_potential =
            if self.config.dense_reward { self.compute_potential() } else { 0.0 };

        Ok((self.observation(), self.info(Event::Reset)))
    }

    pub fn step(&mut self, action: Action) -> StepResult {
        self.steps += 1;
        let mut reward = -self.config.step_cost;
        let mut terminated = false;
        let mut truncated = false;
        let mut event = Event::Moved;

        let candidate = self.agent_pos.step(action);

        let mut valid_move = true;
        if !self.dynamic_grid.in_bounds(candidate) {
            valid_move = false;
            event = Event::NoOp;
        } else {
            let next_tile = self.dynamic_grid.tile_at(candidate);
            if next_tile == TileKind::Wall {
                valid_move = false;
                event = Event::NoOp;
            } else if next_tile == TileKind::Goal && self.keys_collected < self.total_keys() {
                valid_move = false;
                event = Event::GoalLocked;
            }
        }

        if valid_move {
            self.agent_pos = candidate;
            match self.dynamic_grid.tile_at(candidate) {
                TileKind::Trap => {
                    reward = -self.config.trap_cost;
                    terminated = true;
                    event = Event::Trap;
                }
                TileKind::Key => {
                    reward = self.config.key_reward;
                    self.keys_collected += 1;
                    self.dynamic_grid.set_tile(candidate, TileKind::Empty);
                    event = Event::KeyCollected;
                }
                // Only reachable unlocked; the locked case was rejected above.
                TileKind::Goal => {
                    reward = self.config.success_reward;
                    terminated = true;
                    event = Event::Success;
                }
                TileKind::Empty | TileKind::Start | TileKind::Wall => {}
            }
        }

        if self.config.dense_reward && !terminated {
            let current_potential = self.compute_potential();
            reward += current_potential - self.last_potential;
            self.last_potential = current_potential;
        }

        if self.steps >= self.max_steps {
            truncated = true;
            if !terminated {
                reward -= self.config.timeout_penalty;
                event = Event::Timeout;
            }
        }

        StepResult {
            observation: self.observation(),
            reward,
            terminated,
            truncated,
            info: self.info(event),
        }
    }

    /// Fixed-width ASCII dump of the live episode state.
    pub fn render_ascii(&self) -> String {
        render::render_ascii(&self.dynamic_grid, self.agent_pos)
    }

    /// Canonical xxh3 digest of the episode state, for determinism checks.
    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u32(self.steps);
        hasher.write_u32(self.keys_collected);
        hasher.write_i32(self.agent_pos.y);
        hasher.write_i32(self.agent_pos.x);
        hasher.write(&self.dynamic_grid.canonical_bytes());
        hasher.finish()
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn static_grid(&self) -> &Grid {
        &self.static_grid
    }

    pub fn dynamic_grid(&self) -> &Grid {
        &self.dynamic_grid
    }

    pub fn agent_pos(&self) -> Pos {
        self.agent_pos
    }

    pub fn keys_collected(&self) -> u32 {
        self.keys_collected
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    fn total_keys(&self) -> u32 {
        self.config.num_keys as u32
    }

    fn compute_potential(&self) -> f64 {
        potential::compute_potential(
            &self.dynamic_grid,
            self.agent_pos,
            self.keys_collected,
            self.total_keys(),
        )
    }

    fn observation(&self) -> Observation {
        let height = self.config.max_height.unwrap_or(self.config.height);
        let width = self.config.max_width.unwrap_or(self.config.width);
        observation::build(&self.dynamic_grid, self.agent_pos, self.keys_collected, height, width)
    }

    fn info(&self, event: Event) -> StepInfo {
        StepInfo { event, keys_collected: self.keys_collected, steps: self.steps }
    }
}
