use crate::config::{GameConfig, MAX_BOARD_SIDE};
use crate::error::ConfigError;
use crate::game_state::{Direction, GameState, Position, Snake, Turn};
use crate::heuristic::Controller;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

/// Index of the snake whose death ends the game.
pub const PRIMARY: usize = 0;

/// The authoritative board: every snake, the food and wall sets, and the
/// bookkeeping that decides when the game is over.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) num_enemies: usize,
    pub(crate) num_food: usize,
    pub(crate) max_moves: u32,
    pub(crate) snakes: Vec<Snake>,
    pub(crate) food: BTreeSet<Position>,
    pub(crate) walls: BTreeSet<Position>,
    pub(crate) invalid_wall_cache: BTreeSet<Position>,
    pub(crate) moves: u32,
    pub(crate) game_over: bool,
    pub(crate) rng: StdRng,
}

impl World {
    pub fn new(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = World {
            width: config.width as i32,
            height: config.height as i32,
            num_enemies: config.num_enemies as usize,
            num_food: config.num_food as usize,
            max_moves: config.max_moves,
            snakes: Vec::new(),
            food: BTreeSet::new(),
            walls: BTreeSet::new(),
            invalid_wall_cache: BTreeSet::new(),
            moves: 0,
            game_over: false,
            rng: StdRng::seed_from_u64(seed),
        };
        world.reset();
        Ok(world)
    }

    /// Clears the board and respawns food first, then every snake at a
    /// random empty cell facing a random direction.
    pub fn reset(&mut self) {
        self.game_over = false;
        self.moves = 0;
        self.snakes.clear();
        self.food.clear();
        self.walls.clear();

        for _ in 0..self.num_food {
            self.spawn_food();
        }

        for id in 0..=self.num_enemies {
            let Some(start) = self.empty_cells().choose(&mut self.rng).copied() else {
                tracing::warn!(placed = id, "no empty cell left for remaining snakes");
                break;
            };
            let direction = Direction::from_index(self.rng.gen_range(0..4));
            self.snakes.push(Snake::new(id, start, direction));
        }
        if self.snakes.is_empty() {
            self.game_over = true;
        }

        self.invalid_wall_cache.clear();
        debug!(
            width = self.width,
            height = self.height,
            snakes = self.snakes.len(),
            food = self.food.len(),
            "world reset"
        );
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snake(&self, index: usize) -> Option<&Snake> {
        self.snakes.get(index)
    }

    pub fn primary(&self) -> Option<&Snake> {
        self.snakes.get(PRIMARY)
    }

    pub fn food(&self) -> &BTreeSet<Position> {
        &self.food
    }

    pub fn walls(&self) -> &BTreeSet<Position> {
        &self.walls
    }

    pub fn invalid_wall_cells(&self) -> &BTreeSet<Position> {
        &self.invalid_wall_cache
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn target_food(&self) -> usize {
        self.num_food
    }

    pub fn max_moves(&self) -> u32 {
        self.max_moves
    }

    /// Final score of the primary snake.
    pub fn score(&self) -> u32 {
        self.primary().map_or(0, Snake::score)
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.in_bounds(self.width, self.height)
    }

    /// Cells holding no wall, no food and no living snake segment, in
    /// column-major order so that seeded runs pick the same cells.
    pub fn empty_cells(&self) -> Vec<Position> {
        let mut occupied: BTreeSet<Position> = self.walls.union(&self.food).copied().collect();
        for snake in self.snakes.iter().filter(|snake| snake.alive) {
            occupied.extend(snake.body.iter().copied());
        }

        (0..self.width)
            .flat_map(|x| (0..self.height).map(move |y| Position::new(x, y)))
            .filter(|cell| !occupied.contains(cell))
            .collect()
    }

    /// The board as seen by the snake at `index`: its own body, every other
    /// living snake, and borrowed food and wall sets.
    pub fn game_state(&self, index: usize) -> GameState<'_> {
        let snake = &self.snakes[index];
        GameState {
            width: self.width,
            height: self.height,
            snake,
            enemies: self
                .snakes
                .iter()
                .enumerate()
                .filter(|(other, enemy)| *other != index && enemy.alive)
                .map(|(_, enemy)| enemy)
                .collect(),
            food: &self.food,
            walls: &self.walls,
            score: snake.score,
        }
    }

    /// Resolves one move and applies its consequences: a dead enemy's body
    /// becomes food, a dead primary ends the game. Every primary attempt
    /// counts toward the move cap. A dead snake stays put and nothing changes.
    pub fn move_snake(&mut self, index: usize, turn: Turn) -> bool {
        if !self.snakes[index].alive {
            // Dead snakes do not move
            return false;
        }

        let moved = self.try_move(index, turn);
        self.snakes[index].alive = moved;

        if index == PRIMARY {
            if !moved {
                debug!(moves = self.moves, score = self.snakes[index].score, "primary snake died");
                self.game_over = true;
            }
            self.moves += 1;
            if self.moves >= self.max_moves {
                debug!(moves = self.moves, "move cap reached");
                self.game_over = true;
            }
            return moved;
        }

        if !moved {
            let corpse = &self.snakes[index].body;
            debug!(snake = index, length = corpse.len(), "enemy died, body turns to food");
            self.food.extend(corpse.iter().copied());
        }
        moved
    }

    /// Moves every living snake once, in index order. Each decision sees the
    /// board with all earlier moves of this tick already applied.
    pub fn tick_with<F>(&mut self, mut decide: F)
    where
        F: FnMut(usize, &GameState<'_>) -> Turn,
    {
        for index in 0..self.snakes.len() {
            if !self.snakes[index].alive {
                continue;
            }
            let turn = {
                let state = self.game_state(index);
                decide(index, &state)
            };
            self.move_snake(index, turn);
        }
    }

    /// One tick with `primary` steering snake 0 and `enemy` steering the rest.
    pub fn tick(&mut self, primary: &dyn Controller, enemy: &dyn Controller) {
        self.tick_with(|index, state| {
            if index == PRIMARY {
                primary.decide(state)
            } else {
                enemy.decide(state)
            }
        });
    }

    /// Ticks until game over and returns the primary snake's score.
    pub fn run_to_completion(&mut self, primary: &dyn Controller, enemy: &dyn Controller) -> u32 {
        while !self.game_over {
            self.tick(primary, enemy);
        }
        self.score()
    }

    pub fn from_layout(layout: &BoardLayout, seed: u64) -> Result<Self, ConfigError> {
        layout.validate()?;
        let snakes = layout
            .snakes
            .iter()
            .enumerate()
            .map(|(id, snake)| {
                let score = snake
                    .score
                    .unwrap_or_else(|| snake.body.len().saturating_sub(1) as u32);
                Snake::with_body(
                    id,
                    snake.body.iter().copied().collect::<VecDeque<_>>(),
                    snake.direction,
                    snake.alive,
                    score,
                )
            })
            .collect::<Vec<Snake>>();
        let game_over = !snakes[PRIMARY].alive;

        Ok(World {
            width: layout.width as i32,
            height: layout.height as i32,
            num_enemies: layout.snakes.len().saturating_sub(1),
            num_food: layout.target_food.unwrap_or(layout.food.len()),
            max_moves: layout.max_moves,
            snakes,
            food: layout.food.iter().copied().collect(),
            walls: layout.walls.iter().copied().collect(),
            invalid_wall_cache: BTreeSet::new(),
            moves: 0,
            game_over,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn layout(&self) -> BoardLayout {
        BoardLayout {
            width: self.width as u32,
            height: self.height as u32,
            snakes: self
                .snakes
                .iter()
                .map(|snake| SnakeLayout {
                    body: snake.body.iter().copied().collect(),
                    direction: snake.direction,
                    alive: snake.alive,
                    score: Some(snake.score),
                })
                .collect(),
            food: self.food.iter().copied().collect(),
            walls: self.walls.iter().copied().collect(),
            target_food: Some(self.num_food),
            max_moves: self.max_moves,
        }
    }
}

/// A hand-written board, used by tests and tools to set up exact positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub snakes: Vec<SnakeLayout>,
    #[serde(default)]
    pub food: Vec<Position>,
    #[serde(default)]
    pub walls: Vec<Position>,
    /// Replenishment target; defaults to the number of food items given.
    #[serde(default)]
    pub target_food: Option<usize>,
    #[serde(default = "default_layout_max_moves")]
    pub max_moves: u32,
}

fn default_layout_max_moves() -> u32 {
    1000
}

fn default_alive() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeLayout {
    pub body: Vec<Position>,
    pub direction: Direction,
    #[serde(default = "default_alive")]
    pub alive: bool,
    /// Defaults to `body.len() - 1`.
    #[serde(default)]
    pub score: Option<u32>,
}

impl BoardLayout {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::InvalidLayout(message));

        if self.width == 0
            || self.height == 0
            || self.width > MAX_BOARD_SIDE
            || self.height > MAX_BOARD_SIDE
        {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_moves == 0 {
            return Err(ConfigError::NoMoves);
        }
        if self.snakes.is_empty() {
            return invalid("at least one snake is required".to_string());
        }

        let (width, height) = (self.width as i32, self.height as i32);
        let mut seen = BTreeSet::new();
        let cells = self
            .snakes
            .iter()
            .filter(|snake| snake.alive)
            .flat_map(|snake| snake.body.iter())
            .chain(self.food.iter())
            .chain(self.walls.iter());
        for &cell in cells {
            if !cell.in_bounds(width, height) {
                return invalid(format!("cell ({}, {}) is off the board", cell.x, cell.y));
            }
            if !seen.insert(cell) {
                return invalid(format!("cell ({}, {}) is used twice", cell.x, cell.y));
            }
        }

        if let Some(index) = self.snakes.iter().position(|snake| snake.body.is_empty()) {
            return invalid(format!("snake {index} has an empty body"));
        }
        Ok(())
    }
}
