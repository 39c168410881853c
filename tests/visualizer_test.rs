use serde_json::json;
use snake_arena::visualizer::{visualize_game_state, visualize_world};
use snake_arena::world::{BoardLayout, World};

struct TestCase {
    name: &'static str,
    input: serde_json::Value,
    expected_output: &'static str,
}

fn world_from(value: &serde_json::Value) -> World {
    let layout: BoardLayout =
        serde_json::from_value(value.clone()).expect("Failed to parse layout");
    World::from_layout(&layout, 0).expect("Failed to build world")
}

fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase {
            name: "Empty board with a single snake",
            input: json!({
                "width": 3,
                "height": 3,
                "snakes": [{ "body": [[1, 1]], "direction": "up" }]
            }),
            expected_output: "...\n.A.\n...",
        },
        TestCase {
            name: "Food, walls and two snakes",
            input: json!({
                "width": 5,
                "height": 3,
                "snakes": [
                    { "body": [[0, 0], [1, 0], [2, 0]], "direction": "left" },
                    { "body": [[4, 2], [4, 1]], "direction": "down" }
                ],
                "food": [[0, 2]],
                "walls": [[2, 1]]
            }),
            expected_output: "Aaa..\n..#.b\n*...B",
        },
        TestCase {
            name: "Dead snakes are not drawn",
            input: json!({
                "width": 4,
                "height": 2,
                "snakes": [
                    { "body": [[0, 0]], "direction": "right" },
                    { "body": [[3, 1], [2, 1]], "direction": "right", "alive": false }
                ]
            }),
            expected_output: "A...\n....",
        },
    ]
}

#[test]
fn test_visualize_world() {
    for case in create_test_cases() {
        let world = world_from(&case.input);
        let output = visualize_world(&world);
        println!("{}\n", output);
        assert_eq!(
            output, case.expected_output,
            "Test case '{}' failed",
            case.name
        );
    }
}

#[test]
fn game_state_view_matches_world_view() {
    let world = world_from(&json!({
        "width": 4,
        "height": 4,
        "snakes": [
            { "body": [[0, 0], [0, 1]], "direction": "up" },
            { "body": [[3, 3]], "direction": "left" }
        ],
        "food": [[2, 2]],
        "walls": [[1, 2]]
    }));

    let expected = "A...\na...\n.#*.\n...B";
    assert_eq!(visualize_world(&world), expected);
    assert_eq!(visualize_game_state(&world.game_state(0)), expected);
    assert_eq!(visualize_game_state(&world.game_state(1)), expected);
}
