use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    world::World,
};

/// Runs every creature's per-tick update in spawn order.
pub struct CreatureSystem;

impl CreatureSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CreatureSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CreatureSystem {
    fn name(&self) -> &str {
        "creatures"
    }

    fn run(&mut self, _ctx: &SystemContext, world: &mut World) -> Result<()> {
        world.update_creatures();
        Ok(())
    }
}
