//! Multi-plane binary observation tensor, zero-padded to configured maximums.

use crate::state::Grid;
use crate::types::{Pos, TileKind};

pub const CHANNELS: usize = 5;

/// One plane per concept, in fixed channel order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Agent = 0,
    Wall = 1,
    Trap = 2,
    Key = 3,
    Goal = 4,
}

impl Channel {
    pub const ALL: [Self; CHANNELS] = [Self::Agent, Self::Wall, Self::Trap, Self::Key, Self::Goal];

    pub fn index(self) -> usize {
        self as usize
    }

    fn marks(self, tile: TileKind) -> bool {
        match self {
            Self::Agent => false,
            Self::Wall => tile == TileKind::Wall,
            Self::Trap => tile == TileKind::Trap,
            Self::Key => tile == TileKind::Key,
            Self::Goal => tile == TileKind::Goal,
        }
    }
}

/// Channel-major `CHANNELS x height x width` binary tensor plus the key
/// counter. `height`/`width` are the padded bounds; cells past the active
/// grid stay zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    pub planes: Vec<u8>,
    pub keys_collected: u8,
    pub height: usize,
    pub width: usize,
}

impl Observation {
    pub fn plane(&self, channel: Channel) -> &[u8] {
        let size = self.height * self.width;
        let offset = channel.index() * size;
        &self.planes[offset..offset + size]
    }

    pub fn at(&self, channel: Channel, pos: Pos) -> u8 {
        self.plane(channel)[(pos.y as usize) * self.width + (pos.x as usize)]
    }
}

pub(super) fn build(
    grid: &Grid,
    agent: Pos,
    keys_collected: u32,
    height: usize,
    width: usize,
) -> Observation {
    let mut observation = Observation {
        planes: vec![0; CHANNELS * height * width],
        keys_collected: u8::try_from(keys_collected).unwrap_or(u8::MAX),
        height,
        width,
    };

    mark(&mut observation, Channel::Agent, agent);
    for y in 0..grid.height.min(height) {
        for x in 0..grid.width.min(width) {
            let pos = Pos { y: y as i32, x: x as i32 };
            let tile = grid.tile_at(pos);
            for channel in [Channel::Wall, Channel::Trap, Channel::Key, Channel::Goal] {
                if channel.marks(tile) {
                    mark(&mut observation, channel, pos);
                }
            }
        }
    }

    observation
}

fn mark(observation: &mut Observation, channel: Channel, pos: Pos) {
    if pos.y < 0
        || pos.x < 0
        || (pos.y as usize) >= observation.height
        || (pos.x as usize) >= observation.width
    {
        return;
    }
    let size = observation.height * observation.width;
    let index = channel.index() * size + (pos.y as usize) * observation.width + (pos.x as usize);
    observation.planes[index] = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planes_mirror_the_grid_contents() {
        let grid = Grid::from_rows(&["S#K", ".xG"]);
        let observation = build(&grid, Pos { y: 0, x: 0 }, 0, 2, 3);

        assert_eq!(observation.at(Channel::Agent, Pos { y: 0, x: 0 }), 1);
        assert_eq!(observation.at(Channel::Wall, Pos { y: 0, x: 1 }), 1);
        assert_eq!(observation.at(Channel::Key, Pos { y: 0, x: 2 }), 1);
        assert_eq!(observation.at(Channel::Trap, Pos { y: 1, x: 1 }), 1);
        assert_eq!(observation.at(Channel::Goal, Pos { y: 1, x: 2 }), 1);

        // Start cells have no plane of their own.
        assert_eq!(observation.at(Channel::Wall, Pos { y: 0, x: 0 }), 0);
    }

    #[test]
    fn padding_beyond_the_active_grid_stays_zero() {
        let grid = Grid::from_rows(&["SKG"]);
        let observation = build(&grid, Pos { y: 0, x: 0 }, 0, 4, 6);
        assert_eq!(observation.height, 4);
        assert_eq!(observation.width, 6);
        assert_eq!(observation.planes.len(), CHANNELS * 4 * 6);

        for channel in Channel::ALL {
            for y in 1..4 {
                for x in 0..6 {
                    assert_eq!(observation.at(channel, Pos { y, x }), 0);
                }
            }
            for x in 3..6 {
                assert_eq!(observation.at(channel, Pos { y: 0, x }), 0);
            }
        }
        assert_eq!(observation.at(Channel::Key, Pos { y: 0, x: 1 }), 1);
    }

    #[test]
    fn key_counter_is_carried_through() {
        let grid = Grid::from_rows(&["S.G"]);
        let observation = build(&grid, Pos { y: 0, x: 1 }, 2, 1, 3);
        assert_eq!(observation.keys_collected, 2);
    }
}
