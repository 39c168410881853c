use serde_json::json;
use snake_arena::game_state::{Direction, GameState, Turn};
use snake_arena::heuristic::{
    calculate_control_percentages, calculate_snake_control, safe_turns, turn_towards, Cautious,
    Controller, Greedy, Territory,
};
use snake_arena::world::{BoardLayout, World};

struct TestCase {
    name: &'static str,
    input: serde_json::Value,
    controller: &'static dyn Controller,
    expected_turn: Turn,
}

fn world_from(value: &serde_json::Value) -> World {
    let layout: BoardLayout =
        serde_json::from_value(value.clone()).expect("Failed to parse layout");
    World::from_layout(&layout, 0).expect("Failed to build world")
}

fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase {
            name: "Cautious avoids the wall ahead",
            input: json!({
                "width": 5,
                "height": 5,
                "snakes": [{ "body": [[2, 2]], "direction": "right" }],
                "walls": [[3, 2]],
                "food": [[0, 0]]
            }),
            controller: &Cautious,
            expected_turn: Turn::Left,
        },
        TestCase {
            name: "Cautious goes straight when boxed in",
            input: json!({
                "width": 3,
                "height": 3,
                "snakes": [
                    { "body": [[0, 1], [1, 1], [1, 2], [0, 2]], "direction": "left" },
                    { "body": [[0, 0], [1, 0]], "direction": "left" }
                ]
            }),
            controller: &Cautious,
            expected_turn: Turn::Straight,
        },
        TestCase {
            name: "Cautious steps toward food",
            input: json!({
                "width": 7,
                "height": 7,
                "snakes": [{ "body": [[3, 3]], "direction": "up" }],
                "food": [[6, 3]]
            }),
            controller: &Cautious,
            expected_turn: Turn::Right,
        },
        TestCase {
            name: "Greedy turns down toward food below",
            input: json!({
                "width": 7,
                "height": 7,
                "snakes": [{ "body": [[3, 0]], "direction": "right" }],
                "food": [[3, 6]]
            }),
            controller: &Greedy,
            expected_turn: Turn::Right,
        },
        TestCase {
            name: "Greedy ignores the wall in its way",
            input: json!({
                "width": 7,
                "height": 7,
                "snakes": [{ "body": [[1, 3]], "direction": "right" }],
                "walls": [[2, 3]],
                "food": [[6, 3]]
            }),
            controller: &Greedy,
            expected_turn: Turn::Straight,
        },
        TestCase {
            name: "Territory keeps out of the dead end and leans toward food",
            input: json!({
                "width": 7,
                "height": 5,
                "snakes": [{ "body": [[3, 2], [3, 3], [3, 4]], "direction": "up" }],
                "walls": [[2, 0], [2, 1], [4, 0], [4, 1]],
                "food": [[0, 4]]
            }),
            controller: &Territory,
            expected_turn: Turn::Left,
        },
    ]
}

#[test]
fn test_controller_decisions() {
    for case in create_test_cases() {
        let world = world_from(&case.input);
        let state = world.game_state(0);
        assert_eq!(
            case.controller.decide(&state),
            case.expected_turn,
            "Test case '{}' failed",
            case.name
        );
    }
}

#[test]
fn safe_turns_exclude_bodies_and_edges() {
    let world = world_from(&json!({
        "width": 5,
        "height": 5,
        "snakes": [
            { "body": [[0, 2]], "direction": "up" },
            { "body": [[0, 1], [1, 1]], "direction": "left" }
        ]
    }));
    let state = world.game_state(0);
    assert_eq!(safe_turns(&state), vec![Turn::Right]);
}

#[test]
fn turn_towards_picks_the_short_way() {
    assert_eq!(turn_towards(Direction::Up, Direction::Up), Turn::Straight);
    assert_eq!(turn_towards(Direction::Up, Direction::Right), Turn::Right);
    assert_eq!(turn_towards(Direction::Up, Direction::Left), Turn::Left);
    assert_eq!(turn_towards(Direction::Up, Direction::Down), Turn::Right);
    assert_eq!(turn_towards(Direction::Left, Direction::Up), Turn::Right);
}

#[test]
fn closures_are_controllers() {
    let world = world_from(&json!({
        "width": 3,
        "height": 3,
        "snakes": [{ "body": [[1, 1]], "direction": "up" }]
    }));
    fn always_left(_: &GameState<'_>) -> Turn {
        Turn::Left
    }
    assert_eq!(Controller::decide(&always_left, &world.game_state(0)), Turn::Left);
}

#[test]
fn control_splits_an_open_board() {
    let world = world_from(&json!({
        "width": 5,
        "height": 1,
        "snakes": [
            { "body": [[0, 0]], "direction": "right" },
            { "body": [[4, 0]], "direction": "left" }
        ]
    }));
    let state = world.game_state(0);

    let control = calculate_snake_control(&state, state.snake.head());
    assert_eq!(control, vec![Some(0), Some(0), Some(0), Some(1), Some(1)]);

    let percentages = calculate_control_percentages(&state);
    assert_eq!(percentages, vec![0.6, 0.4]);
}

#[test]
fn walls_are_never_controlled() {
    let world = world_from(&json!({
        "width": 3,
        "height": 1,
        "snakes": [{ "body": [[0, 0]], "direction": "right" }],
        "walls": [[1, 0]]
    }));
    let state = world.game_state(0);

    let control = calculate_snake_control(&state, state.snake.head());
    assert_eq!(control, vec![Some(0), None, None]);
}

#[test]
fn own_neck_is_not_controlled() {
    let world = world_from(&json!({
        "width": 4,
        "height": 1,
        "snakes": [{ "body": [[1, 0], [2, 0], [3, 0]], "direction": "left" }]
    }));
    let state = world.game_state(0);

    let control = calculate_snake_control(&state, state.snake.head());
    assert_eq!(control, vec![Some(0), Some(0), None, None]);
}

#[test]
fn own_body_frees_up_from_the_tail() {
    let world = world_from(&json!({
        "width": 2,
        "height": 2,
        "snakes": [{ "body": [[0, 0], [0, 1], [1, 1]], "direction": "up" }]
    }));
    let state = world.game_state(0);

    // (1, 0) at depth 1, the old tail (1, 1) at depth 2, the neck (0, 1) at depth 3.
    let control = calculate_snake_control(&state, state.snake.head());
    assert_eq!(control, vec![Some(0), Some(0), Some(0), Some(0)]);
}

#[test]
fn enemy_tail_blocks_the_first_step() {
    let world = world_from(&json!({
        "width": 4,
        "height": 1,
        "snakes": [
            { "body": [[0, 0]], "direction": "right" },
            { "body": [[2, 0], [3, 0]], "direction": "left" }
        ]
    }));
    let state = world.game_state(0);

    let control = calculate_snake_control(&state, state.snake.head());
    assert_eq!(control, vec![Some(0), Some(0), Some(1), None]);
}
