use std::collections::VecDeque;

use crate::game_state::{Direction, GameState, Position, Turn};

/// A decision maker: looks at the board from one snake's point of view and
/// picks a turn. Implementations must not rely on any state beyond `state`.
pub trait Controller: Send + Sync {
    fn decide(&self, state: &GameState<'_>) -> Turn;
}

impl<F> Controller for F
where
    F: Fn(&GameState<'_>) -> Turn + Send + Sync,
{
    fn decide(&self, state: &GameState<'_>) -> Turn {
        self(state)
    }
}

/// Turns that keep the head on the board and off every wall and body
/// segment, including the snake's own tail.
pub fn safe_turns(state: &GameState<'_>) -> Vec<Turn> {
    Turn::ALL
        .into_iter()
        .filter(|&turn| state.is_free(state.snake.next_head(turn)))
        .collect()
}

/// The turn that points the snake at `target`, reversing through a right turn.
pub fn turn_towards(current: Direction, target: Direction) -> Turn {
    match (target.index() + 4 - current.index()) % 4 {
        0 => Turn::Straight,
        1 | 2 => Turn::Right,
        _ => Turn::Left,
    }
}

/// Filters out fatal moves, then takes the first safe move that gets closer
/// to the nearest food on either axis. Goes straight when nothing is safe.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cautious;

impl Controller for Cautious {
    fn decide(&self, state: &GameState<'_>) -> Turn {
        let safe = safe_turns(state);
        let Some(&fallback) = safe.first() else {
            return Turn::Straight;
        };

        if let Some(food) = state.nearest_food() {
            let current = state.snake.head();
            let closer = safe.iter().copied().find(|&turn| {
                let next = state.snake.next_head(turn);
                (food.x - next.x).abs() < (food.x - current.x).abs()
                    || (food.y - next.y).abs() < (food.y - current.y).abs()
            });
            if let Some(turn) = closer {
                return turn;
            }
        }
        fallback
    }
}

/// Heads for the nearest food along whichever axis is further off, without
/// looking at obstacles.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Controller for Greedy {
    fn decide(&self, state: &GameState<'_>) -> Turn {
        let Some(food) = state.nearest_food() else {
            return Turn::Straight;
        };
        let head = state.snake.head();
        let (dx, dy) = (food.x - head.x, food.y - head.y);
        if dx == 0 && dy == 0 {
            return Turn::Straight;
        }

        let target = if dx.abs() >= dy.abs() {
            if dx > 0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0 {
            Direction::Down
        } else {
            Direction::Up
        };
        turn_towards(state.snake.direction(), target)
    }
}

/// Plays each safe move forward and keeps the one after which this snake
/// reaches the most cells before any enemy does. Ties go to the move that
/// closes in on food.
#[derive(Debug, Clone, Copy, Default)]
pub struct Territory;

impl Controller for Territory {
    fn decide(&self, state: &GameState<'_>) -> Turn {
        let safe = safe_turns(state);
        let food = state.nearest_food();

        safe.into_iter()
            .max_by_key(|&turn| {
                let head = state.snake.next_head(turn);
                let owned = count_owned_cells(state, head);
                let food_bonus = food.map_or(0, |food| -head.manhattan_distance(food));
                (owned, food_bonus)
            })
            .unwrap_or(Turn::Straight)
    }
}

/// Marks, for every cell, which snake can get there first. Index 0 is the
/// snake the state belongs to (starting from `head`), enemies follow in
/// `state.enemies` order. Body segments free up as the snake they belong to
/// moves on; walls never do. Ties go to the lower index. `None` marks cells
/// nobody reaches.
///
/// Segment `i` of the own snake can be entered after `length - i` moves, its
/// tail on the very first one. Enemies move after this snake, so their
/// segments stay blocked one move longer and their tails block the first step.
pub fn calculate_snake_control(state: &GameState<'_>, head: Position) -> Vec<Option<usize>> {
    let width = state.width as usize;
    let board_size = width * state.height as usize;
    let cell_index = |position: Position| position.y as usize * width + position.x as usize;

    let mut control = vec![None; board_size];
    let mut min_depth = vec![u32::MAX; board_size];
    let mut unoccupied_at = vec![0u32; board_size];
    let mut queue = VecDeque::new();

    for wall in state.walls.iter() {
        unoccupied_at[cell_index(*wall)] = u32::MAX;
    }

    let bodies = std::iter::once((state.snake, 0u32))
        .chain(state.enemies.iter().map(|enemy| (*enemy, 1)));
    for (snake, delay) in bodies {
        let length = snake.length();
        for (i, segment) in snake.body().iter().enumerate() {
            if !state.in_bounds(*segment) {
                continue;
            }
            // First move on which segment i can be entered.
            let t = (length - i) as u32 + delay;
            let slot = &mut unoccupied_at[cell_index(*segment)];
            *slot = (*slot).max(t);
        }
    }

    let heads = std::iter::once(head).chain(state.enemies.iter().map(|enemy| enemy.head()));
    for (owner, start) in heads.enumerate() {
        if !state.in_bounds(start) {
            continue;
        }
        let index = cell_index(start);
        if min_depth[index] == 0 {
            continue;
        }
        min_depth[index] = 0;
        control[index] = Some(owner);
        queue.push_back((start, owner, 0u32));
    }

    while let Some((position, owner, depth)) = queue.pop_front() {
        let next_depth = depth + 1;
        for next in position.neighbors() {
            if !state.in_bounds(next) {
                continue;
            }
            let index = cell_index(next);
            if unoccupied_at[index] > next_depth {
                continue;
            }

            if next_depth < min_depth[index] {
                min_depth[index] = next_depth;
                control[index] = Some(owner);
                queue.push_back((next, owner, next_depth));
            } else if next_depth == min_depth[index] && control[index].map_or(true, |c| owner < c)
            {
                control[index] = Some(owner);
            }
        }
    }

    control
}

/// Number of cells the state's own snake would control with its head at `head`.
pub fn count_owned_cells(state: &GameState<'_>, head: Position) -> usize {
    calculate_snake_control(state, head)
        .iter()
        .filter(|&&owner| owner == Some(0))
        .count()
}

/// Share of the board each snake controls, own snake first.
pub fn calculate_control_percentages(state: &GameState<'_>) -> Vec<f32> {
    let control = calculate_snake_control(state, state.snake.head());
    let board_size = control.len().max(1) as f32;

    let mut counts = vec![0usize; state.enemies.len() + 1];
    for owner in control.into_iter().flatten() {
        counts[owner] += 1;
    }
    counts
        .into_iter()
        .map(|count| count as f32 / board_size)
        .collect()
}
