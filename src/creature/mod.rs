//! Creatures roaming the arena.
//!
//! Each tick a creature checks whether its current [`Intention`] is done,
//! picks the next one if so, then acts on it:
//!
//! | from            | to     | on entry                       |
//! |-----------------|--------|--------------------------------|
//! | None, Turn      | Wander | pick a wander target (or Turn) |
//! | Wander          | Wait   | wait `[0, 120)` ticks          |
//! | Wait            | None   |                                |

mod intention;
mod steering;

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::angle::Angle;
use crate::config::CreatureParams;
use crate::rng::{creature_rng, CreatureRng, RngExt};
use crate::world::Arena;

pub use intention::{Intention, IntentionKind, TurnBias};
pub use steering::{next_speed, stopping_distance};

/// Upper bound (exclusive) of a sampled wait.
pub const MAX_WAIT_TICKS: i32 = 120;
/// Candidate headings tried before giving up and turning.
pub const WANDER_HEADING_ATTEMPTS: usize = 10;
/// Extra distance from a target, beyond the starting distance, that marks a
/// creature as anomalous.
pub const DRIFT_TOLERANCE: f32 = 50.0;
const HEADING_EPSILON: f32 = 0.01;
const STALLED_TURN_EPSILON: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CreatureId(u64);

impl CreatureId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only view of a creature for display layers.
#[derive(Debug, Clone, Serialize)]
pub struct CreatureSnapshot {
    pub id: CreatureId,
    pub position: Vec2,
    /// Top-left corner of the creature's footprint.
    pub sprite_origin: Vec2,
    pub heading_degrees: f32,
    pub intention: IntentionKind,
    pub wander_target: Option<Vec2>,
    pub anomaly: bool,
}

pub struct Creature {
    id: CreatureId,
    seed: u64,
    rng: CreatureRng,
    params: CreatureParams,
    position: Vec2,
    heading: Angle,
    move_speed: f32,
    turn_speed: f32,
    intention: Intention,
    anomaly: bool,
}

impl Creature {
    /// Places a creature uniformly inside the arena, inset by half its
    /// footprint, facing a uniformly random direction. `None` draws the seed
    /// from process entropy.
    pub fn new(id: CreatureId, arena: &Arena, params: CreatureParams, seed: Option<u64>) -> Self {
        let (seed, mut rng) = creature_rng(seed);
        let half = params.size / 2.0;
        let far = arena.size() as f32 - half;
        let position = Vec2::new(rng.random_f32(half, far), rng.random_f32(half, far));
        let heading = Angle::from_degrees(rng.random_f32(0.0, 360.0));

        Self {
            id,
            seed,
            rng,
            params,
            position,
            heading,
            move_speed: 0.0,
            turn_speed: 0.0,
            intention: Intention::None,
            anomaly: false,
        }
    }

    pub fn id(&self) -> CreatureId {
        self.id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &CreatureParams {
        &self.params
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading(&self) -> Angle {
        self.heading
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn turn_speed(&self) -> f32 {
        self.turn_speed
    }

    pub fn intention(&self) -> &Intention {
        &self.intention
    }

    pub fn wander_target(&self) -> Option<Vec2> {
        self.intention.wander_target()
    }

    pub fn is_anomalous(&self) -> bool {
        self.anomaly
    }

    pub fn sprite_origin(&self) -> Vec2 {
        self.position - Vec2::splat(self.params.size / 2.0)
    }

    /// Moves the creature without touching its speeds or intention.
    pub fn place_at(&mut self, position: Vec2, heading: Angle) {
        self.position = position;
        self.heading = heading;
    }

    pub fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            id: self.id,
            position: self.position,
            sprite_origin: self.sprite_origin(),
            heading_degrees: self.heading.degrees(),
            intention: self.intention.kind(),
            wander_target: self.wander_target(),
            anomaly: self.anomaly,
        }
    }

    /// Advances one tick.
    pub fn update(&mut self, arena: &Arena) {
        if self.intention_fulfilled(arena) {
            self.advance_intention(arena);
        }
        self.execute_intention();
    }

    fn intention_fulfilled(&self, arena: &Arena) -> bool {
        match self.intention {
            Intention::None => true,
            Intention::Wander { target, .. } => {
                self.position.distance(target) < self.params.max_move_speed * 2.0
            }
            Intention::Wait { remaining_ticks } => remaining_ticks <= 0,
            Intention::Turn { .. } => self.sees_in_bounds(arena, &[self.heading]),
        }
    }

    fn advance_intention(&mut self, arena: &Arena) {
        let next = match self.intention {
            Intention::None | Intention::Turn { .. } => self.choose_wander_target(arena),
            Intention::Wander { .. } => {
                self.move_speed = 0.0;
                self.turn_speed = 0.0;
                Intention::Wait {
                    remaining_ticks: self.rng.gen_range(0..MAX_WAIT_TICKS),
                }
            }
            Intention::Wait { .. } => Intention::None,
        };
        debug!(
            creature = %self.id,
            from = %self.intention.kind(),
            to = %next.kind(),
            "intention changed"
        );
        self.intention = next;
    }

    fn execute_intention(&mut self) {
        match self.intention {
            Intention::None => {}
            Intention::Wait { remaining_ticks } => {
                self.intention = Intention::Wait {
                    remaining_ticks: remaining_ticks - 1,
                };
            }
            Intention::Wander {
                target,
                initial_distance,
            } => self.move_to_target(target, initial_distance),
            Intention::Turn { bias } => self.turn_away(bias),
        }
    }

    /// Picks a heading inside the visual cone whose far end stays on the
    /// field and sets a target along it. Falls back to turning when no
    /// direction of the cone reaches the field or no candidate fits.
    fn choose_wander_target(&mut self, arena: &Arena) -> Intention {
        let half_cone = self.params.half_visual_angle();
        let cone = [
            self.heading,
            self.heading.rotated(half_cone),
            self.heading.rotated(-half_cone),
        ];

        if self.sees_any_in_bounds(arena, &cone) {
            for _ in 0..WANDER_HEADING_ATTEMPTS {
                let candidate = self.random_heading_in_cone(half_cone);
                if !self.sees_in_bounds(arena, &[candidate]) {
                    continue;
                }
                let range = self.params.visual_range;
                let distance = self.rng.random_f32(range / 2.0, range);
                let target = self.position + candidate.to_vector() * distance;
                return Intention::Wander {
                    target,
                    initial_distance: self.position.distance(target),
                };
            }
        }

        Intention::Turn {
            bias: TurnBias::random(&mut self.rng),
        }
    }

    fn random_heading_in_cone(&mut self, half_cone: f32) -> Angle {
        let heading = self.heading.degrees();
        Angle::from_degrees(self.rng.random_f32(heading - half_cone, heading + half_cone))
    }

    /// Whether looking along every heading at visual range stays on the field.
    fn sees_in_bounds(&self, arena: &Arena, headings: &[Angle]) -> bool {
        let points: Vec<Vec2> = headings
            .iter()
            .map(|heading| self.position + heading.to_vector() * self.params.visual_range)
            .collect();
        arena.is_in_bounds(self.params.size, &points)
    }

    fn sees_any_in_bounds(&self, arena: &Arena, headings: &[Angle]) -> bool {
        headings
            .iter()
            .any(|heading| self.sees_in_bounds(arena, std::slice::from_ref(heading)))
    }

    pub(crate) fn mark_anomalous(&mut self) {
        self.anomaly = true;
    }

    fn turn_away(&mut self, bias: TurnBias) {
        let old_heading = self.heading;
        let offset = bias.offset(self.params.half_visual_angle());
        let target_heading = self.heading.rotated(offset);
        self.turn_to_target(self.position + target_heading.to_vector());

        if (old_heading - self.heading).degrees().abs() <= STALLED_TURN_EPSILON {
            warn!(
                creature = %self.id,
                heading = %self.heading,
                offset,
                target = %target_heading,
                "creature did not turn as expected"
            );
            self.mark_anomalous();
        }
    }

    fn move_to_target(&mut self, target: Vec2, initial_distance: f32) {
        let old_position = self.position;
        let old_heading = self.heading;
        self.turn_to_target(target);

        let distance = old_position.distance(target);
        let speed = next_speed(
            self.move_speed,
            self.params.max_move_speed,
            self.params.move_acceleration,
            distance,
        );
        let candidate = self.position + self.heading.to_vector() * speed;
        let turn_only = distance < candidate.distance(target);
        if !turn_only {
            self.position = candidate;
            self.move_speed = speed;
        }

        let new_distance = self.position.distance(target);
        if new_distance - initial_distance >= DRIFT_TOLERANCE {
            warn!(
                creature = %self.id,
                target = ?target,
                old_position = ?old_position,
                new_position = ?self.position,
                old_heading = %old_heading,
                new_heading = %self.heading,
                initial_distance,
                new_distance,
                turn_only,
                "creature moved away from target"
            );
            self.mark_anomalous();
        }
    }

    fn turn_to_target(&mut self, target: Vec2) {
        let bearing = Angle::from_vector(target - self.position);
        let remaining = (bearing - self.heading).degrees();

        if remaining.abs() < HEADING_EPSILON {
            self.turn_speed = 0.0;
            return;
        }

        let speed = next_speed(
            self.turn_speed,
            self.params.max_turn_speed,
            self.params.turn_acceleration,
            remaining.abs(),
        );
        let step = remaining.max(-speed).min(speed);
        self.turn_speed = speed;
        let old_heading = self.heading;
        self.heading = self.heading.rotated(step);

        if self.anomaly {
            trace!(
                creature = %self.id,
                old_heading = %old_heading,
                bearing = %bearing,
                remaining,
                step,
                new_heading = %self.heading,
                "turn step"
            );
        }
    }
}

impl fmt::Debug for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Creature")
            .field("id", &self.id)
            .field("seed", &self.seed)
            .field("position", &self.position)
            .field("heading", &self.heading)
            .field("move_speed", &self.move_speed)
            .field("turn_speed", &self.turn_speed)
            .field("intention", &self.intention)
            .field("anomaly", &self.anomaly)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::new(1000, 10).unwrap()
    }

    fn creature_at(arena: &Arena, seed: u64, position: Vec2, heading: f32) -> Creature {
        let mut creature =
            Creature::new(CreatureId::new(seed), arena, CreatureParams::default(), Some(seed));
        creature.place_at(position, Angle::from_degrees(heading));
        creature
    }

    #[test]
    fn test_spawn_inside_inset_bounds() {
        let arena = Arena::new(64, 8).unwrap();
        for seed in 0..200 {
            let creature =
                Creature::new(CreatureId::new(seed), &arena, CreatureParams::default(), Some(seed));
            let p = creature.position();
            assert!((8.0..=56.0).contains(&p.x), "x = {}", p.x);
            assert!((8.0..=56.0).contains(&p.y), "y = {}", p.y);
            assert_eq!(creature.intention().kind(), IntentionKind::None);
            assert_eq!(creature.move_speed(), 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let arena = arena();
        let mut a = Creature::new(CreatureId::new(1), &arena, CreatureParams::default(), Some(99));
        let mut b = Creature::new(CreatureId::new(2), &arena, CreatureParams::default(), Some(99));
        for _ in 0..500 {
            a.update(&arena);
            b.update(&arena);
        }
        assert_eq!(a.position(), b.position());
        assert_eq!(a.heading(), b.heading());
        assert_eq!(a.intention(), b.intention());
    }

    #[test]
    fn test_entropy_seed_is_recorded() {
        let arena = arena();
        let creature = Creature::new(CreatureId::new(0), &arena, CreatureParams::default(), None);
        let replay = Creature::new(
            CreatureId::new(0),
            &arena,
            CreatureParams::default(),
            Some(creature.seed()),
        );
        assert_eq!(creature.position(), replay.position());
        assert_eq!(creature.heading(), replay.heading());
    }

    #[test]
    fn test_none_becomes_wander_with_target() {
        let arena = arena();
        let mut creature = creature_at(&arena, 3, Vec2::new(500.0, 500.0), 45.0);
        creature.update(&arena);

        let Intention::Wander {
            target,
            initial_distance,
        } = *creature.intention()
        else {
            panic!("expected wander, got {:?}", creature.intention());
        };
        let range = creature.params().visual_range;
        assert!(initial_distance >= range / 2.0 - 1e-3 && initial_distance <= range + 1e-3);
        assert!((target.distance(Vec2::new(500.0, 500.0)) - initial_distance).abs() < 1e-3);
    }

    #[test]
    fn test_reached_target_becomes_wait() {
        let arena = arena();
        let mut creature = creature_at(&arena, 4, Vec2::new(500.0, 500.0), 0.0);
        creature.intention = Intention::Wander {
            target: Vec2::new(501.0, 500.0),
            initial_distance: 60.0,
        };
        creature.move_speed = 0.4;
        creature.turn_speed = 2.0;

        assert!(creature.intention_fulfilled(&arena));
        creature.advance_intention(&arena);

        match *creature.intention() {
            Intention::Wait { remaining_ticks } => {
                assert!((0..MAX_WAIT_TICKS).contains(&remaining_ticks))
            }
            other => panic!("expected wait, got {other:?}"),
        }
        assert_eq!(creature.move_speed(), 0.0);
        assert_eq!(creature.turn_speed(), 0.0);
    }

    #[test]
    fn test_wait_counts_down_then_none() {
        let arena = arena();
        let mut creature = creature_at(&arena, 5, Vec2::new(500.0, 500.0), 0.0);
        creature.intention = Intention::Wait { remaining_ticks: 3 };

        for expected in [2, 1, 0] {
            creature.update(&arena);
            assert_eq!(
                *creature.intention(),
                Intention::Wait {
                    remaining_ticks: expected
                }
            );
        }
        creature.update(&arena);
        assert_eq!(*creature.intention(), Intention::None);
    }

    #[test]
    fn test_wander_state_walk_reaches_wait() {
        let arena = arena();
        let mut creature = creature_at(&arena, 6, Vec2::new(500.0, 500.0), 90.0);
        creature.update(&arena);
        assert_eq!(creature.intention().kind(), IntentionKind::Wander);

        let mut ticks = 0;
        while creature.intention().kind() == IntentionKind::Wander && ticks < 5_000 {
            creature.update(&arena);
            ticks += 1;
        }
        assert_eq!(creature.intention().kind(), IntentionKind::Wait);
        assert!(!creature.is_anomalous());
    }

    #[test]
    fn test_centered_creature_never_turns() {
        let arena = arena();
        for seed in 0..100 {
            let mut creature = creature_at(&arena, seed, Vec2::new(500.0, 500.0), seed as f32 * 17.0);
            creature.update(&arena);
            assert_eq!(
                creature.intention().kind(),
                IntentionKind::Wander,
                "seed {seed} turned"
            );
        }
    }

    #[test]
    fn test_edge_facing_creature_turns_away() {
        let arena = arena();
        let mut creature = creature_at(&arena, 8, Vec2::new(980.0, 500.0), 0.0);
        creature.update(&arena);
        assert_eq!(creature.intention().kind(), IntentionKind::Turn);

        let start = creature.heading();
        let mut ticks = 0;
        while creature.intention().kind() == IntentionKind::Turn && ticks < 2_000 {
            creature.update(&arena);
            ticks += 1;
        }
        assert_ne!(creature.intention().kind(), IntentionKind::Turn);
        assert_ne!(creature.heading(), start);
        let look = creature.position() + creature.heading().to_vector() * 100.0;
        assert!(arena.is_in_bounds(16.0, &[look]));
    }

    #[test]
    fn test_cornered_creature_escapes() {
        let arena = arena();
        for (seed, position, heading) in [
            (20, Vec2::new(30.0, 30.0), 45.0),
            (21, Vec2::new(985.0, 985.0), -135.0),
        ] {
            let mut creature = creature_at(&arena, seed, position, heading);
            let mut wandered = false;
            for _ in 0..2_000 {
                creature.update(&arena);
                if creature.intention().kind() == IntentionKind::Wander {
                    wandered = true;
                    break;
                }
            }
            assert!(wandered, "creature at {position} never wandered");

            for _ in 0..500 {
                creature.update(&arena);
            }
            assert_ne!(creature.position(), position);
        }
    }

    #[test]
    fn test_creature_facing_into_corner_turns_then_wanders() {
        let arena = arena();
        let mut creature = creature_at(&arena, 22, Vec2::new(30.0, 30.0), -135.0);
        creature.update(&arena);
        assert_eq!(creature.intention().kind(), IntentionKind::Turn);

        let mut ticks = 0;
        while creature.intention().kind() != IntentionKind::Wander && ticks < 5_000 {
            creature.update(&arena);
            ticks += 1;
        }
        assert_eq!(creature.intention().kind(), IntentionKind::Wander);
        let target = creature.wander_target().unwrap();
        assert!(arena.is_in_bounds(0.0, &[target]));
    }

    #[test]
    fn test_stalled_turn_sets_anomaly() {
        let arena = arena();
        let params = CreatureParams {
            turn_acceleration: 1e-7,
            ..CreatureParams::default()
        };
        let mut creature = Creature::new(CreatureId::new(23), &arena, params, Some(23));
        creature.place_at(Vec2::new(500.0, 500.0), Angle::from_degrees(0.0));

        creature.turn_away(TurnBias::Left);

        assert!(creature.is_anomalous());
        assert!(creature.heading().degrees().abs() <= STALLED_TURN_EPSILON);
    }

    #[test]
    fn test_turn_away_rotates_towards_bias() {
        let arena = arena();
        let mut creature = creature_at(&arena, 24, Vec2::new(500.0, 500.0), 0.0);
        creature.turn_away(TurnBias::Right);
        assert!(creature.heading().degrees() > 0.0);
        assert!(!creature.is_anomalous());
    }

    #[test]
    fn test_move_law_ramps_speed_from_rest() {
        let arena = arena();
        let mut creature = creature_at(&arena, 9, Vec2::new(100.0, 100.0), 0.0);
        let target = Vec2::new(400.0, 100.0);
        creature.intention = Intention::Wander {
            target,
            initial_distance: 300.0,
        };

        let mut last_speed = creature.move_speed();
        for _ in 0..120 {
            creature.move_to_target(target, 300.0);
            assert!(creature.move_speed() >= last_speed);
            assert!(creature.move_speed() <= creature.params().max_move_speed);
            last_speed = creature.move_speed();
        }
        assert!(last_speed > 0.0);
        assert!(creature.position().x > 100.0);
        assert!((creature.position().y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_move_skips_step_that_increases_distance() {
        let arena = arena();
        let mut creature = creature_at(&arena, 10, Vec2::new(500.0, 500.0), 180.0);
        creature.turn_speed = 0.0;
        let target = Vec2::new(600.0, 500.0);

        creature.move_to_target(target, 100.0);

        assert_eq!(creature.position(), Vec2::new(500.0, 500.0));
        assert_eq!(creature.move_speed(), 0.0);
        assert!(creature.turn_speed() > 0.0);
    }

    #[test]
    fn test_drift_sets_anomaly() {
        let arena = arena();
        let mut creature = creature_at(&arena, 11, Vec2::new(500.0, 500.0), 0.0);
        creature.move_to_target(Vec2::new(800.0, 500.0), 10.0);
        assert!(creature.is_anomalous());
        assert!(creature.snapshot().anomaly);
    }

    #[test]
    fn test_turn_law_snaps_when_aligned() {
        let arena = arena();
        let mut creature = creature_at(&arena, 12, Vec2::new(500.0, 500.0), 0.0);
        creature.turn_speed = 3.0;
        creature.turn_to_target(Vec2::new(600.0, 500.0));
        assert_eq!(creature.turn_speed(), 0.0);
        assert_eq!(creature.heading().degrees(), 0.0);
    }

    #[test]
    fn test_turn_law_step_is_clamped() {
        let arena = arena();
        let mut creature = creature_at(&arena, 13, Vec2::new(500.0, 500.0), 0.0);
        creature.turn_to_target(Vec2::new(500.0, 600.0));
        let expected = creature.params().max_turn_speed * creature.params().turn_acceleration;
        assert!((creature.turn_speed() - expected).abs() < 1e-6);
        assert!((creature.heading().degrees() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_turn_goes_the_short_way_round() {
        let arena = arena();
        let mut creature = creature_at(&arena, 14, Vec2::new(500.0, 500.0), 170.0);
        // Bearing -170 is 20 degrees clockwise through 180.
        let target = Vec2::new(500.0, 500.0) + Angle::from_degrees(-170.0).to_vector() * 50.0;
        creature.turn_to_target(target);
        let heading = creature.heading().degrees();
        assert!(heading > 170.0 && heading <= 180.0, "heading {heading}");
    }

    #[test]
    fn test_snapshot_sprite_origin() {
        let arena = arena();
        let creature = creature_at(&arena, 15, Vec2::new(40.0, 60.0), 0.0);
        let snapshot = creature.snapshot();
        assert_eq!(snapshot.sprite_origin, Vec2::new(32.0, 52.0));
        assert_eq!(snapshot.intention, IntentionKind::None);
        assert!(snapshot.wander_target.is_none());
    }
}
