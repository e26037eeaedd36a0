use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::config::{
    rolling_turn_speed, CreatureParams, LoggingConfig, DEFAULT_FOOTPRINT, DEFAULT_MAX_MOVE_SPEED,
    DEFAULT_MOVE_ACCELERATION, DEFAULT_VISUAL_ANGLE, DEFAULT_VISUAL_RANGE,
};
use crate::world::World;

fn default_resolution() -> u32 {
    10
}

fn default_footprint() -> f32 {
    DEFAULT_FOOTPRINT
}

fn default_max_move_speed() -> f32 {
    DEFAULT_MAX_MOVE_SPEED
}

fn default_move_acceleration() -> f32 {
    DEFAULT_MOVE_ACCELERATION
}

fn default_visual_range() -> f32 {
    DEFAULT_VISUAL_RANGE
}

fn default_visual_angle() -> f32 {
    DEFAULT_VISUAL_ANGLE
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    pub world: ScenarioWorld,
    pub creatures: ScenarioCreatures,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioWorld {
    pub size: u32,
    #[serde(default = "default_resolution")]
    pub resolution: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCreatures {
    pub count: usize,
    #[serde(default = "default_footprint")]
    pub size: f32,
    #[serde(default = "default_max_move_speed")]
    pub max_move_speed: f32,
    #[serde(default = "default_move_acceleration")]
    pub move_acceleration: f32,
    /// Derived from the footprint when omitted.
    #[serde(default)]
    pub max_turn_speed: Option<f32>,
    /// Same as `move_acceleration` when omitted.
    #[serde(default)]
    pub turn_acceleration: Option<f32>,
    #[serde(default = "default_visual_range")]
    pub visual_range: f32,
    #[serde(default = "default_visual_angle")]
    pub visual_angle: f32,
}

impl ScenarioCreatures {
    pub fn params(&self) -> CreatureParams {
        CreatureParams {
            size: self.size,
            max_move_speed: self.max_move_speed,
            move_acceleration: self.move_acceleration,
            max_turn_speed: self
                .max_turn_speed
                .unwrap_or_else(|| rolling_turn_speed(self.size, self.max_move_speed)),
            turn_acceleration: self.turn_acceleration.unwrap_or(self.move_acceleration),
            visual_range: self.visual_range,
            visual_angle: self.visual_angle,
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario = Scenario::from_yaml(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn from_yaml(data: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(data)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.name.trim().is_empty(), "scenario must define a name");
        self.creatures
            .params()
            .validate()
            .with_context(|| format!("invalid creature settings in scenario '{}'", self.name))
    }

    /// Builds the world and spawns the configured creatures, each seeded from
    /// the scenario seed.
    pub fn build_world(&self) -> Result<World> {
        self.build_world_with_seed(self.seed)
    }

    pub fn build_world_with_seed(&self, seed: u64) -> Result<World> {
        let mut world = World::new(self.world.size, self.world.resolution)
            .with_context(|| format!("invalid world in scenario '{}'", self.name))?
            .with_seed(seed)
            .with_creature_params(self.creatures.params());
        for _ in 0..self.creatures.count {
            world.spawn_creature();
        }
        Ok(world)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(600)
    }
}
