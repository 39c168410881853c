use crate::game_state::Position;
use crate::world::World;
use rand::seq::SliceRandom;
use std::collections::{BTreeSet, VecDeque};
use tracing::trace;

const KING_MOVES: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// The check a candidate wall failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallRejection {
    /// A free neighbour would be left with three or more blocked sides.
    CrowdsNeighbor,
    /// The wall's cluster would touch two or more board edges.
    SpansBorders,
    /// Another edge-touching cluster lies within two cells.
    NearBorderCluster,
    /// The wall itself would have three or more orthogonal wall neighbours.
    Overcrowded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallPlacement {
    Placed,
    Rejected(WallRejection),
}

/// Board edges, as bit flags.
const LEFT: u8 = 1;
const RIGHT: u8 = 1 << 1;
const TOP: u8 = 1 << 2;
const BOTTOM: u8 = 1 << 3;

impl World {
    /// Drops one food item on a random empty cell. Does nothing on a full board.
    pub fn spawn_food(&mut self) {
        if let Some(&cell) = self.empty_cells().choose(&mut self.rng) {
            self.food.insert(cell);
        }
    }

    /// A quarter of the board, rounded down.
    pub fn max_walls(&self) -> usize {
        (self.width as usize * self.height as usize) / 4
    }

    /// Empty cells not yet known to be unsuitable for a wall.
    pub fn wall_candidates(&self) -> Vec<Position> {
        self.empty_cells()
            .into_iter()
            .filter(|cell| !self.invalid_wall_cache.contains(cell))
            .collect()
    }

    /// Tries to raise one wall at a random candidate cell. Does nothing once
    /// the wall cap is reached or when no candidate is left.
    pub fn spawn_wall(&mut self) -> Option<(Position, WallPlacement)> {
        if self.walls.len() >= self.max_walls() {
            return None;
        }
        let cell = *self.wall_candidates().choose(&mut self.rng)?;
        Some((cell, self.place_wall(cell)))
    }

    /// Places a wall at `pos` and keeps it only if the board stays open
    /// around it. A rejected cell goes into the invalid-wall cache and is
    /// never offered again until the next reset.
    pub fn place_wall(&mut self, pos: Position) -> WallPlacement {
        self.walls.insert(pos);
        match self.check_wall(pos) {
            Ok(()) => {
                trace!(x = pos.x, y = pos.y, walls = self.walls.len(), "wall placed");
                WallPlacement::Placed
            }
            Err(rejection) => {
                trace!(x = pos.x, y = pos.y, ?rejection, "wall rejected");
                self.walls.remove(&pos);
                self.invalid_wall_cache.insert(pos);
                WallPlacement::Rejected(rejection)
            }
        }
    }

    /// Runs the placement checks in order against the board with `pos`
    /// already walled. May grow the invalid-wall cache even when it fails.
    fn check_wall(&mut self, pos: Position) -> Result<(), WallRejection> {
        // Checks if any free neighbour would be boxed in
        for neighbor in pos.neighbors() {
            if !self.in_bounds(neighbor) || self.walls.contains(&neighbor) {
                continue;
            }
            let blocked_sides = neighbor
                .neighbors()
                .into_iter()
                .filter(|&cell| self.is_blocked(cell))
                .count();
            if blocked_sides >= 3 {
                return Err(WallRejection::CrowdsNeighbor);
            }
        }

        // Find every wall connected to this one, diagonals included
        let cluster = self.wall_cluster(pos);

        // A cluster joining two edges would cut the board in two
        let borders = self.touched_borders(&cluster);
        if borders.count_ones() >= 2 {
            return Err(WallRejection::SpansBorders);
        }

        if borders != 0 {
            // Keep future walls away from this edge cluster
            self.mark_buffer_zone(&cluster);

            // Another edge wall close by could close a gap along the border
            for &wall in &cluster {
                for dx in -2..=2 {
                    for dy in -2..=2 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let cell = wall.offset(dx, dy);
                        if self.walls.contains(&cell)
                            && !cluster.contains(&cell)
                            && self.on_edge(cell)
                        {
                            return Err(WallRejection::NearBorderCluster);
                        }
                    }
                }
            }
        }

        // Once the board has a few walls, avoid filling in pockets
        if self.walls.len() > 4 {
            let wall_sides = pos
                .neighbors()
                .into_iter()
                .filter(|cell| self.walls.contains(cell))
                .count();
            if wall_sides >= 3 {
                return Err(WallRejection::Overcrowded);
            }
        }
        Ok(())
    }

    /// Walls reachable from `start` through the eight surrounding cells.
    fn wall_cluster(&self, start: Position) -> BTreeSet<Position> {
        let mut cluster = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(cell) = queue.pop_front() {
            for (dx, dy) in KING_MOVES {
                let next = cell.offset(dx, dy);
                if self.walls.contains(&next) && cluster.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        cluster
    }

    fn touched_borders(&self, cluster: &BTreeSet<Position>) -> u8 {
        cluster.iter().fold(0, |borders, cell| {
            let mut touched = borders;
            if cell.x == 0 {
                touched |= LEFT;
            }
            if cell.x == self.width - 1 {
                touched |= RIGHT;
            }
            if cell.y == 0 {
                touched |= TOP;
            }
            if cell.y == self.height - 1 {
                touched |= BOTTOM;
            }
            touched
        })
    }

    fn is_blocked(&self, cell: Position) -> bool {
        self.walls.contains(&cell) || !self.in_bounds(cell)
    }

    fn on_edge(&self, cell: Position) -> bool {
        cell.x == 0 || cell.x == self.width - 1 || cell.y == 0 || cell.y == self.height - 1
    }

    /// Rules out every free cell within two steps (Manhattan) of an
    /// edge-touching cluster.
    fn mark_buffer_zone(&mut self, cluster: &BTreeSet<Position>) {
        for &wall in cluster {
            for dx in -2i32..=2 {
                for dy in -2i32..=2 {
                    if dx.abs() + dy.abs() > 2 {
                        continue;
                    }
                    let cell = wall.offset(dx, dy);
                    if self.in_bounds(cell) && !self.walls.contains(&cell) {
                        self.invalid_wall_cache.insert(cell);
                    }
                }
            }
        }
    }
}
