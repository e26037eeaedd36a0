use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info};

use crate::world::{World, WorldSnapshot};

pub struct EngineSettings {
    pub scenario_name: String,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    pub fn build(self) -> Engine {
        Engine {
            systems: self.systems,
            settings: self.settings,
        }
    }
}

/// Fixed-rate driving loop: every tick runs each system once, in the order
/// they were added.
pub struct Engine {
    systems: Vec<Box<dyn System>>,
    settings: EngineSettings,
}

impl Engine {
    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    pub fn run(&mut self, world: &mut World, ticks: u64) -> Result<()> {
        self.log_start(world, ticks);
        for _ in 0..ticks {
            self.step(world)?;
        }
        self.log_finish(world);
        Ok(())
    }

    /// Like [`Engine::run`], handing a snapshot to `hook` after every tick.
    pub fn run_with_hook<F>(&mut self, world: &mut World, ticks: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(&WorldSnapshot),
    {
        self.log_start(world, ticks);
        for _ in 0..ticks {
            self.step(world)?;
            hook(&world.snapshot());
        }
        self.log_finish(world);
        Ok(())
    }

    pub fn step(&mut self, world: &mut World) -> Result<TickSummary> {
        let ctx = SystemContext {
            tick: world.tick(),
            scenario_name: &self.settings.scenario_name,
        };
        let mut system_reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let start = Instant::now();
            system.run(&ctx, world)?;
            let duration_ms = start.elapsed().as_secs_f64() * 1_000.0;
            debug!(tick = ctx.tick, system = system.name(), duration_ms, "system ran");
            system_reports.push(SystemRunReport {
                name: system.name().to_string(),
                duration_ms,
            });
        }
        world.advance_time();
        Ok(TickSummary {
            tick: world.tick(),
            system_reports,
        })
    }

    fn log_start(&self, world: &World, ticks: u64) {
        info!(
            scenario = %self.settings.scenario_name,
            ticks,
            creatures = world.creature_count(),
            "engine run starting"
        );
    }

    fn log_finish(&self, world: &World) {
        let counts = world.intention_counts();
        info!(
            scenario = %self.settings.scenario_name,
            tick = world.tick(),
            wander = counts.wander,
            wait = counts.wait,
            turn = counts.turn,
            anomalous = world.anomalous_creatures().len(),
            "engine run finished"
        );
    }
}

#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: String,
    pub duration_ms: f64,
}

#[derive(Clone, Debug)]
pub struct TickSummary {
    pub tick: u64,
    pub system_reports: Vec<SystemRunReport>,
}

pub struct SystemContext<'a> {
    pub tick: u64,
    pub scenario_name: &'a str,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &SystemContext, world: &mut World) -> Result<()>;
}
