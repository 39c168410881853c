use crate::game_state::{GameState, Position, Snake};
use crate::world::World;

/// Renders the board as text: `#` wall, `*` food, `.` empty. Snake `n` is
/// drawn with the n-th letter, upper case for its head.
pub fn visualize_game_state(state: &GameState<'_>) -> String {
    let snakes = std::iter::once(state.snake).chain(state.enemies.iter().copied());
    render(
        state.width,
        state.height,
        snakes.filter(|snake| snake.is_alive()),
        state.food.iter(),
        state.walls.iter(),
    )
}

/// Same as [`visualize_game_state`] but for the whole world, dead snakes left out.
pub fn visualize_world(world: &World) -> String {
    render(
        world.width(),
        world.height(),
        world.snakes().iter().filter(|snake| snake.is_alive()),
        world.food().iter(),
        world.walls().iter(),
    )
}

fn render<'a>(
    width: i32,
    height: i32,
    snakes: impl Iterator<Item = &'a Snake>,
    food: impl Iterator<Item = &'a Position>,
    walls: impl Iterator<Item = &'a Position>,
) -> String {
    let (width, height) = (width as usize, height as usize);
    let mut grid = vec!['.'; width * height];
    let mut place = |position: &Position, glyph: char| {
        if position.in_bounds(width as i32, height as i32) {
            grid[position.y as usize * width + position.x as usize] = glyph;
        }
    };

    for wall in walls {
        place(wall, '#');
    }
    for item in food {
        place(item, '*');
    }
    for snake in snakes {
        let glyph = (b'a' + (snake.id() % 26) as u8) as char;
        // Tail first so the head wins if a body ever folds onto itself.
        for (j, segment) in snake.body().iter().enumerate().rev() {
            place(segment, if j == 0 { glyph.to_ascii_uppercase() } else { glyph });
        }
    }

    grid.chunks(width)
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join("\n")
}
