use anyhow::Result;
use tracing::warn;

use crate::{
    engine::{System, SystemContext},
    world::{IntentionCounts, World},
};

/// Tallies intentions and collects anomalous creatures after each tick.
pub struct BookkeepingSystem;

impl BookkeepingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BookkeepingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &str {
        "bookkeeping"
    }

    fn run(&mut self, ctx: &SystemContext, world: &mut World) -> Result<()> {
        let mut counts = IntentionCounts::default();
        let mut anomalous = Vec::new();
        for creature in world.creatures() {
            counts.record(creature.intention().kind());
            if creature.is_anomalous() {
                anomalous.push(creature.id());
            }
        }
        anomalous.sort();

        for id in &anomalous {
            if world.bookkeeping.anomalous.binary_search(id).is_err() {
                warn!(
                    tick = ctx.tick,
                    scenario = ctx.scenario_name,
                    creature = %id,
                    "creature flagged as anomalous"
                );
            }
        }

        world.bookkeeping.intention_counts = counts;
        world.bookkeeping.anomalous = anomalous;
        Ok(())
    }
}
