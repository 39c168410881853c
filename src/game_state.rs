use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// The four orthogonal neighbours in `Direction::ALL` order.
    pub fn neighbors(self) -> [Position; 4] {
        Direction::ALL.map(|direction| self.step(direction))
    }

    pub fn manhattan_distance(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn in_bounds(self, width: i32, height: i32) -> bool {
        (0..width).contains(&self.x) && (0..height).contains(&self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

impl From<Position> for (i32, i32) {
    fn from(position: Position) -> Self {
        (position.x, position.y)
    }
}

/// Absolute heading. The discriminant is the index into the cyclic order
/// used when applying a [`Turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Direction {
        Direction::ALL[index % 4]
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn turned(self, turn: Turn) -> Direction {
        let index = (self.index() as i32 + turn.value()).rem_euclid(4);
        Direction::from_index(index as usize)
    }
}

/// Heading change relative to the current direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Left = -1,
    Straight = 0,
    Right = 1,
}

impl Turn {
    pub const ALL: [Turn; 3] = [Turn::Left, Turn::Straight, Turn::Right];

    pub fn value(self) -> i32 {
        self as i32
    }

    /// Decoding helper for callers that drive snakes from raw integers, such
    /// as scripts or other processes. The engine itself only ever takes a
    /// `Turn`. Anything outside {-1, 0, 1} is treated as going straight.
    pub fn from_value(value: i64) -> Turn {
        match value {
            -1 => Turn::Left,
            0 => Turn::Straight,
            1 => Turn::Right,
            other => {
                tracing::warn!(value = other, "unrecognised turn value, going straight");
                Turn::Straight
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snake {
    pub(crate) id: usize,
    pub(crate) body: VecDeque<Position>,
    pub(crate) direction: Direction,
    pub(crate) alive: bool,
    pub(crate) score: u32,
}

impl Snake {
    pub fn new(id: usize, start: Position, direction: Direction) -> Self {
        Snake {
            id,
            body: VecDeque::from([start]),
            direction,
            alive: true,
            score: 0,
        }
    }

    pub(crate) fn with_body(
        id: usize,
        body: VecDeque<Position>,
        direction: Direction,
        alive: bool,
        score: u32,
    ) -> Self {
        Snake {
            id,
            body,
            direction,
            alive,
            score,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Panics only if called on a snake built with an empty body, which
    /// neither `World::reset` nor `World::from_layout` allow.
    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn length(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Where the head would land after `turn`. No bounds or collision checks.
    pub fn next_head(&self, turn: Turn) -> Position {
        self.head().step(self.direction.turned(turn))
    }

    /// Turns, then advances one cell. The tail is kept when `grow` is set.
    /// Callers validate the move first.
    pub(crate) fn apply_move(&mut self, turn: Turn, grow: bool) {
        self.direction = self.direction.turned(turn);
        let new_head = self.head().step(self.direction);
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }
}

/// What a controller (and the renderer) gets to see for one snake.
///
/// Everything is borrowed immutably from the `World`, so nothing holding a
/// `GameState` can change the board underneath the resolver.
#[derive(Debug, Clone, Serialize)]
pub struct GameState<'a> {
    pub width: i32,
    pub height: i32,
    pub snake: &'a Snake,
    pub enemies: Vec<&'a Snake>,
    pub food: &'a BTreeSet<Position>,
    pub walls: &'a BTreeSet<Position>,
    pub score: u32,
}

impl<'a> GameState<'a> {
    pub fn in_bounds(&self, position: Position) -> bool {
        position.in_bounds(self.width, self.height)
    }

    pub fn enemy_occupies(&self, position: Position) -> bool {
        self.enemies.iter().any(|enemy| enemy.occupies(position))
    }

    /// True when the cell is on the board and holds no wall or snake segment.
    pub fn is_free(&self, position: Position) -> bool {
        self.in_bounds(position)
            && !self.walls.contains(&position)
            && !self.snake.occupies(position)
            && !self.enemy_occupies(position)
    }

    pub fn nearest_food(&self) -> Option<Position> {
        let head = self.snake.head();
        self.food
            .iter()
            .copied()
            .min_by_key(|food| food.manhattan_distance(head))
    }
}
