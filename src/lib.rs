pub mod angle;
pub mod config;
pub mod creature;
pub mod engine;
pub mod pathfinding;
pub mod rng;
pub mod scenario;
pub mod systems;
pub mod world;

pub use angle::Angle;
pub use creature::{Creature, CreatureId, Intention, IntentionKind};
pub use engine::{Engine, EngineBuilder, EngineSettings, TickSummary};
pub use pathfinding::{Grid, Node, NodeCoord};
pub use world::{Arena, World, WorldError};
