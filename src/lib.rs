pub mod benchmark;
pub mod config;
pub mod error;
pub mod game_state;
pub mod heuristic;
pub mod rules;
pub mod spawner;
pub mod visualizer;
pub mod world;
