use crate::game_state::{Position, Turn};
use crate::world::{World, PRIMARY};

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    OutOfBounds,
    OwnBody,
    OtherSnake(usize),
}

impl World {
    /// Checks the move for the snake at `index` against the board as it is
    /// right now. Earlier snakes in this tick have already moved, later ones
    /// have not.
    ///
    /// The snake's own tail is never an obstacle, even when the move is onto
    /// food and the tail will therefore stay put. Other snakes' tails always
    /// are.
    pub fn check_move(&self, index: usize, turn: Turn) -> Result<Position, Collision> {
        let snake = &self.snakes[index];
        let next_head = snake.next_head(turn);

        // Walls first, then the board edge
        if self.walls.contains(&next_head) {
            return Err(Collision::Wall);
        }
        if !self.in_bounds(next_head) {
            return Err(Collision::OutOfBounds);
        }

        // Own body, minus the tail that moves out of the way
        let without_tail = snake.body.len() - 1;
        if snake.body.iter().take(without_tail).any(|&cell| cell == next_head) {
            return Err(Collision::OwnBody);
        }

        // The primary's body blocks everyone else whether or not it is still
        // alive; enemies only block while alive.
        for (other_index, other) in self.snakes.iter().enumerate() {
            if other_index == index {
                continue;
            }
            if (other_index == PRIMARY || other.alive) && other.occupies(next_head) {
                return Err(Collision::OtherSnake(other_index));
            }
        }

        Ok(next_head)
    }

    /// Validates and, if legal, applies the move. Eating removes the food,
    /// tops the food back up to its target, scores a point and tries to
    /// raise one wall. Returns whether the snake moved.
    pub(crate) fn try_move(&mut self, index: usize, turn: Turn) -> bool {
        let next_head = match self.check_move(index, turn) {
            Ok(next_head) => next_head,
            Err(collision) => {
                tracing::trace!(snake = index, ?turn, ?collision, "move rejected");
                return false;
            }
        };

        // The tail stays put when eating
        let will_eat = self.food.contains(&next_head);
        self.snakes[index].apply_move(turn, will_eat);

        if will_eat {
            // Eating replenishes food and may raise a wall
            self.food.remove(&next_head);
            if self.food.len() < self.num_food {
                self.spawn_food();
            }
            self.snakes[index].score += 1;
            self.spawn_wall();
        }
        true
    }
}
