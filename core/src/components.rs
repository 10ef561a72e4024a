//! Plain data components attached to simulation entities.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    rc::Rc,
};

use glam::Vec2;

use crate::{
    assets::{Assets, Frames, Sprite},
    geometry::{rotated_extent, Rect},
    status::{StatusEffect, StatusKind},
    store::{Entity, Store, StoreError},
    EnemyKind, ResearchKind, ScoreEventKind, TurretKind, TurretProperty, BASE_UPGRADE_LEVEL_CAP,
    IDLE_ROTATION_SPEED, MAX_UPGRADE_LEVEL,
};

/// Hostile unit with health and a bounty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Enemy {
    bounty: u32,
    max_health: u32,
    health: u32,
}

impl Enemy {
    /// Creates an enemy at full health.
    #[must_use]
    pub const fn new(bounty: u32, max_health: u32) -> Self {
        Self {
            bounty,
            max_health,
            health: max_health,
        }
    }

    /// Money awarded for killing the enemy.
    #[must_use]
    pub const fn bounty(&self) -> u32 {
        self.bounty
    }

    /// Health at spawn.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Subtracts damage, saturating at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Reports whether health reached zero.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Remaining health as a percentage of the maximum.
    #[must_use]
    pub fn health_ratio(&self) -> u8 {
        if self.max_health == 0 {
            return 0;
        }
        (u64::from(self.health) * 100 / u64::from(self.max_health)) as u8
    }
}

/// Authoritative position, size and orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Occupied rectangle.
    pub rect: Rect,
    /// Direction the entity faces; rendering rotation derives from it.
    pub facing: Vec2,
}

impl BoundingBox {
    /// Creates a bounding box facing along the positive x axis.
    #[must_use]
    pub const fn new(rect: Rect) -> Self {
        Self {
            rect,
            facing: Vec2::X,
        }
    }

    /// Creates a bounding box with an explicit facing.
    #[must_use]
    pub const fn facing(rect: Rect, facing: Vec2) -> Self {
        Self { rect, facing }
    }
}

/// Source of a velocity adjustment; one adjustment per source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AdjustmentKey {
    /// Held in place by frost.
    Frozen,
    /// Slowed by tornado winds.
    Buffeted,
}

/// Effect an adjustment has on the base velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AdjustmentKind {
    /// Stops all movement.
    Immobile,
    /// Scales the speed by `factor`.
    Slowdown {
        /// Multiplier applied to the base magnitude.
        factor: f32,
    },
}

/// Temporary modification of an entity's velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityAdjustment {
    /// What the adjustment does.
    pub kind: AdjustmentKind,
    /// Lifetime in milliseconds.
    pub duration: f32,
    /// Milliseconds since the adjustment was applied.
    pub elapsed: f32,
}

impl VelocityAdjustment {
    /// Creates a fresh adjustment.
    #[must_use]
    pub const fn new(kind: AdjustmentKind, duration: f32) -> Self {
        Self {
            kind,
            duration,
            elapsed: 0.0,
        }
    }

    /// Reports whether the adjustment has run its course.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Movement per millisecond plus keyed, expiring adjustments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Velocity {
    /// Unadjusted movement vector in world units per millisecond.
    pub base: Vec2,
    /// Active adjustments keyed by source.
    pub adjustments: BTreeMap<AdjustmentKey, VelocityAdjustment>,
}

impl Velocity {
    /// Creates a velocity without adjustments.
    #[must_use]
    pub fn new(base: Vec2) -> Self {
        Self {
            base,
            adjustments: BTreeMap::new(),
        }
    }

    /// Movement vector after applying every active adjustment.
    ///
    /// Any `Immobile` adjustment zeroes the vector; slowdowns multiply.
    #[must_use]
    pub fn effective(&self) -> Vec2 {
        let mut vector = self.base;
        for adjustment in self.adjustments.values() {
            match adjustment.kind {
                AdjustmentKind::Immobile => return Vec2::ZERO,
                AdjustmentKind::Slowdown { factor } => vector *= factor,
            }
        }
        vector
    }

    /// Inserts or replaces the adjustment for `key`.
    pub fn adjust(&mut self, key: AdjustmentKey, adjustment: VelocityAdjustment) {
        let _ = self.adjustments.insert(key, adjustment);
    }

    /// Advances every adjustment and drops the expired ones.
    pub fn tick_adjustments(&mut self, delta_ms: f32) {
        for adjustment in self.adjustments.values_mut() {
            adjustment.elapsed += delta_ms;
        }
        self.adjustments.retain(|_, adjustment| !adjustment.expired());
    }
}

/// Draw layer of a renderable; lower layers draw first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderOrder {
    /// Map ground.
    Base,
    /// Static scenery such as build zones.
    Environment,
    /// Units, turrets and effects.
    Objects,
}

/// Overlay slots a renderable may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtraKind {
    /// Enemy health bar.
    HealthBar,
    /// Selected turret range ring.
    TurretRange,
    /// Icon for an active status effect.
    Status(StatusKind),
}

/// Whether an overlay draws beneath or above the base image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtraOrder {
    /// Drawn before the base image.
    Under,
    /// Drawn after the base image.
    Over,
}

/// Overlay composited with a renderable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtraRenderable {
    /// Image to draw.
    pub sprite: Sprite,
    /// Destination rectangle in world units.
    pub rect: Rect,
    /// Layer relative to the base image.
    pub order: ExtraOrder,
    /// Horizontal fill fraction in `[0, 1]`, used by bars.
    pub fill: f32,
}

/// Drawable image derived from an unrotated source.
#[derive(Clone, Debug, PartialEq)]
pub struct Renderable {
    /// Unrotated source image.
    pub source: Sprite,
    /// Image as currently displayed; sized to enclose the rotated source.
    pub image: Sprite,
    /// Rotation in degrees applied to the source.
    pub rotation: f32,
    /// Draw layer.
    pub order: RenderOrder,
    /// Overlays keyed by slot.
    pub extras: BTreeMap<ExtraKind, ExtraRenderable>,
}

impl Renderable {
    /// Creates an unrotated renderable without overlays.
    #[must_use]
    pub fn new(source: Sprite, order: RenderOrder) -> Self {
        Self {
            source,
            image: source,
            rotation: 0.0,
            order,
            extras: BTreeMap::new(),
        }
    }

    /// Reports whether overlays must be composited.
    #[must_use]
    pub fn composite(&self) -> bool {
        !self.extras.is_empty()
    }

    /// Re-derives the displayed image from the source at `degrees`.
    pub fn rotate_to(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.image = Sprite::new(self.source.image, rotated_extent(self.source.size, degrees));
    }

    /// Swaps the source image, keeping the current rotation.
    pub fn set_source(&mut self, source: Sprite) {
        self.source = source;
        self.rotate_to(self.rotation);
    }
}

/// Cycles a renderable through animation frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Animated {
    /// Frame sequence.
    pub frames: Frames,
    /// Milliseconds each frame stays on screen.
    pub step: f32,
    /// Milliseconds the current frame has been shown.
    pub elapsed: f32,
    /// Index of the current frame.
    pub current_frame_index: usize,
}

impl Animated {
    /// Starts the animation on its first frame.
    #[must_use]
    pub const fn new(frames: Frames, step: f32) -> Self {
        Self {
            frames,
            step,
            elapsed: 0.0,
            current_frame_index: 0,
        }
    }

    /// Frame currently displayed.
    #[must_use]
    pub fn current_frame(&self) -> Sprite {
        self.frames.frame(self.current_frame_index)
    }

    /// Reports whether the current frame has been shown long enough.
    #[must_use]
    pub fn frame_expired(&self) -> bool {
        self.elapsed > self.step
    }

    /// Moves to the next frame, wrapping at the end.
    pub fn advance_frame(&mut self) {
        self.current_frame_index = (self.current_frame_index + 1) % self.frames.len();
        self.elapsed = 0.0;
    }
}

/// Waypoints an entity walks along.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitPathing {
    /// Ordered waypoints.
    pub vertices: Vec<Vec2>,
    /// Index of the waypoint currently targeted.
    pub index: usize,
}

impl UnitPathing {
    /// Starts at the first waypoint.
    #[must_use]
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices, index: 0 }
    }

    /// Waypoint currently targeted, clamped to the last vertex.
    #[must_use]
    pub fn current_target(&self) -> Option<Vec2> {
        let last = self.vertices.len().checked_sub(1)?;
        self.vertices.get(self.index.min(last)).copied()
    }

    /// Targets the next waypoint; stays on the last one once reached.
    pub fn advance(&mut self) {
        let last = self.vertices.len().saturating_sub(1);
        self.index = (self.index + 1).min(last);
    }

    /// Reports whether the final waypoint is targeted.
    #[must_use]
    pub fn at_last_vertex(&self) -> bool {
        self.index + 1 >= self.vertices.len()
    }
}

/// Path template copied into spawned enemies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathGraph {
    /// Ordered waypoints from spawn to exit.
    pub vertices: Vec<Vec2>,
}

/// Phase of the turret firing cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurretState {
    /// No target in range.
    Idle,
    /// Aiming at a target while the cooldown runs.
    Tracking,
    /// About to release a shot.
    Firing,
    /// Playing the post-shot animation.
    FiringAnimation,
    /// Waiting out the reload.
    Reloading,
}

/// Per-turret state machine and upgradeable statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct TurretMachine {
    /// Current phase.
    pub state: TurretState,
    /// Turret archetype.
    pub kind: TurretKind,
    /// Purchased levels per property; absent entries are level zero.
    pub upgrade_levels: BTreeMap<TurretProperty, u32>,
    /// Level-zero statistics.
    pub base_stats: BTreeMap<TurretProperty, f32>,
    /// Statistic change per purchased level.
    pub stat_changes_per_level: BTreeMap<TurretProperty, f32>,
    /// Milliseconds since the last shot.
    pub elapsed: f32,
    /// Milliseconds spent in [`TurretState::FiringAnimation`].
    pub firing_animation_duration: f32,
    /// Milliseconds spent in [`TurretState::Reloading`].
    pub reloading_duration: f32,
    /// Degrees per millisecond spun while idle.
    pub idle_rotation_speed: f32,
    /// Whether the turret turns at all.
    pub rotates: bool,
}

impl TurretMachine {
    /// Creates an idle turret of `kind` with the given statistic sheets.
    #[must_use]
    pub fn new(
        kind: TurretKind,
        base_stats: BTreeMap<TurretProperty, f32>,
        stat_changes_per_level: BTreeMap<TurretProperty, f32>,
    ) -> Self {
        Self {
            state: TurretState::Idle,
            kind,
            upgrade_levels: BTreeMap::new(),
            base_stats,
            stat_changes_per_level,
            elapsed: 0.0,
            firing_animation_duration: kind.firing_animation_duration(),
            reloading_duration: kind.reloading_duration(),
            idle_rotation_speed: IDLE_ROTATION_SPEED,
            rotates: kind.rotates(),
        }
    }

    /// Purchased level of `property`.
    #[must_use]
    pub fn level(&self, property: TurretProperty) -> u32 {
        self.upgrade_levels.get(&property).copied().unwrap_or(0)
    }

    /// `base + level × per_level` for `property`.
    #[must_use]
    pub fn stat(&self, property: TurretProperty) -> f32 {
        let base = self.base_stats.get(&property).copied().unwrap_or(0.0);
        let per_level = self
            .stat_changes_per_level
            .get(&property)
            .copied()
            .unwrap_or(0.0);
        base + self.level(property) as f32 * per_level
    }

    /// Damage per hit.
    #[must_use]
    pub fn damage(&self) -> u32 {
        self.stat(TurretProperty::Damage).max(0.0).round() as u32
    }

    /// Milliseconds between shots.
    #[must_use]
    pub fn firing_cooldown(&self) -> f32 {
        self.stat(TurretProperty::RateOfFire).max(0.0)
    }

    /// Targeting radius.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.stat(TurretProperty::Range).max(0.0)
    }

    /// Milliseconds between damage-over-time ticks.
    #[must_use]
    pub fn dot_tick_rate(&self) -> f32 {
        self.stat(TurretProperty::DotTickRate).max(0.0)
    }

    /// Lifetime of applied damage-over-time effects.
    #[must_use]
    pub fn dot_duration(&self) -> f32 {
        self.stat(TurretProperty::DotDuration).max(0.0)
    }

    /// Reports whether the cooldown has elapsed.
    #[must_use]
    pub fn can_fire(&self) -> bool {
        self.elapsed >= self.firing_cooldown()
    }

    /// Reports whether the firing animation has finished.
    #[must_use]
    pub fn finished_firing_animation(&self) -> bool {
        self.elapsed >= self.firing_animation_duration
    }

    /// Reports whether the reload following the firing animation has
    /// finished. Both phases count from the last shot.
    #[must_use]
    pub fn finished_reloading(&self) -> bool {
        self.elapsed >= self.firing_animation_duration + self.reloading_duration
    }

    /// Reports whether `property` can gain a level under `cap`.
    #[must_use]
    pub fn can_upgrade(&self, property: TurretProperty, cap: u32) -> bool {
        self.level(property) < cap.min(MAX_UPGRADE_LEVEL)
    }

    /// Raises `property` by one level, clamped to `cap` and
    /// [`MAX_UPGRADE_LEVEL`]; returns whether the level changed.
    pub fn upgrade(&mut self, property: TurretProperty, cap: u32) -> bool {
        if !self.can_upgrade(property, cap) {
            return false;
        }
        *self.upgrade_levels.entry(property).or_insert(0) += 1;
        true
    }
}

/// What happens to a damaging entity after it hits an enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollisionBehavior {
    /// Destroy the damaging entity.
    #[default]
    DeleteEntity,
    /// Strip [`DamagesEnemy`] and leave the entity in place.
    RemoveComponent,
    /// Count the hit and destroy the entity once its pierces run out.
    Pierce,
    /// Keep damaging until removed by something else.
    DoNothing,
}

/// Callback spawning follow-up entities when a hit lands.
///
/// Receives the store, the damaging entity, the enemy that was hit and the
/// asset bundle.
#[derive(Clone)]
pub struct DynamicEffectCreator(
    Rc<dyn Fn(&mut Store, Entity, Entity, &Assets) -> Result<(), StoreError>>,
);

impl DynamicEffectCreator {
    /// Wraps a callback.
    pub fn new(
        callback: impl Fn(&mut Store, Entity, Entity, &Assets) -> Result<(), StoreError> + 'static,
    ) -> Self {
        Self(Rc::new(callback))
    }

    /// Invokes the callback.
    pub fn create(
        &self,
        store: &mut Store,
        source: Entity,
        target: Entity,
        assets: &Assets,
    ) -> Result<(), StoreError> {
        (self.0)(store, source, target, assets)
    }
}

impl fmt::Debug for DynamicEffectCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DynamicEffectCreator(..)")
    }
}

/// On-hit effect declared by a damaging entity.
#[derive(Clone, Debug)]
pub enum DamagesEnemyEffect {
    /// Attach a status component to the enemy.
    AddsComponent {
        /// Status to attach.
        status: StatusEffect,
        /// Replace an existing status instead of extending it.
        overwrite: bool,
    },
    /// Spawn follow-up entities.
    DynamicCreator(DynamicEffectCreator),
}

impl DamagesEnemyEffect {
    /// Attaches `status`, replacing any existing instance.
    #[must_use]
    pub const fn adds(status: StatusEffect) -> Self {
        Self::AddsComponent {
            status,
            overwrite: true,
        }
    }

    /// Attaches `status`, extending an existing instance instead.
    #[must_use]
    pub const fn extends(status: StatusEffect) -> Self {
        Self::AddsComponent {
            status,
            overwrite: false,
        }
    }
}

/// Pierce budget for area damage that hits every overlapping enemy once.
pub const PIERCE_ALL: u32 = u32::MAX;

/// Marks an entity that damages enemies it overlaps.
#[derive(Clone, Debug)]
pub struct DamagesEnemy {
    /// Damage dealt per hit.
    pub damage: u32,
    /// Consumption policy applied after hits.
    pub on_collision: CollisionBehavior,
    /// Number of enemies the entity may hit.
    pub pierces: u32,
    /// Enemies hit so far; never exceeds `pierces`.
    pub pierced_count: u32,
    /// Effects applied to surviving enemies.
    pub effects: Vec<DamagesEnemyEffect>,
}

impl DamagesEnemy {
    /// Single-hit damage that destroys the entity on impact.
    #[must_use]
    pub const fn new(damage: u32) -> Self {
        Self {
            damage,
            on_collision: CollisionBehavior::DeleteEntity,
            pierces: 1,
            pierced_count: 0,
            effects: Vec::new(),
        }
    }

    /// Sets the consumption policy.
    #[must_use]
    pub fn on_collision(mut self, behavior: CollisionBehavior) -> Self {
        self.on_collision = behavior;
        self
    }

    /// Sets how many enemies may be hit.
    #[must_use]
    pub fn pierces(mut self, pierces: u32) -> Self {
        self.pierces = pierces;
        self
    }

    /// Appends an on-hit effect.
    #[must_use]
    pub fn effect(mut self, effect: DamagesEnemyEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Reports whether every pierce has been used.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.pierced_count >= self.pierces
    }

    /// Reports whether any on-hit effects are declared.
    #[must_use]
    pub fn applies_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// Carries the rocket damage for its explosion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RocketMissile {
    /// Explosion damage.
    pub damage: u32,
}

/// Carries the frost damage for its burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrostMissile {
    /// Burst damage.
    pub damage: u32,
}

/// One instruction of a wave script.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WaveStep {
    /// Spawn one enemy immediately.
    SpawnEnemy(EnemyKind),
    /// Pause for the given milliseconds.
    Wait(f32),
}

/// Wave script and its progress.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawningWave {
    steps: Vec<WaveStep>,
    total_enemy_spawns: u32,
    /// Enemies spawned so far.
    pub enemy_spawn_count: u32,
    /// Index of the step being evaluated.
    pub current_index: usize,
    /// Milliseconds spent on the current step.
    pub elapsed: f32,
}

impl SpawningWave {
    /// Creates a wave from its script.
    #[must_use]
    pub fn new(steps: Vec<WaveStep>) -> Self {
        let total_enemy_spawns = steps
            .iter()
            .filter(|step| matches!(step, WaveStep::SpawnEnemy(_)))
            .count() as u32;
        Self {
            steps,
            total_enemy_spawns,
            enemy_spawn_count: 0,
            current_index: 0,
            elapsed: 0.0,
        }
    }

    /// Script steps.
    #[must_use]
    pub fn steps(&self) -> &[WaveStep] {
        &self.steps
    }

    /// Number of spawn steps in the script.
    #[must_use]
    pub const fn total_enemy_spawns(&self) -> u32 {
        self.total_enemy_spawns
    }

    /// Step being evaluated, or `None` once the wave is over.
    #[must_use]
    pub fn current_step(&self) -> Option<WaveStep> {
        self.steps.get(self.current_index).copied()
    }

    /// Moves to the next step and restarts its timer.
    pub fn advance(&mut self) {
        self.current_index = (self.current_index + 1).min(self.steps.len());
        self.elapsed = 0.0;
    }

    /// Rewinds the script to its first step for another run.
    pub fn restart(&mut self) {
        self.enemy_spawn_count = 0;
        self.current_index = 0;
        self.elapsed = 0.0;
    }

    /// Reports whether every step has been evaluated.
    #[must_use]
    pub fn over(&self) -> bool {
        self.current_index >= self.steps.len()
    }

    /// Spawned share of the wave as a percentage.
    #[must_use]
    pub fn progress(&self) -> u8 {
        if self.total_enemy_spawns == 0 {
            return 100;
        }
        let spawned = self.enemy_spawn_count.min(self.total_enemy_spawns);
        (u64::from(spawned) * 100 / u64::from(self.total_enemy_spawns)) as u8
    }
}

/// Spawn point that plays wave scripts in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Spawning {
    /// Wave scripts.
    pub waves: Vec<SpawningWave>,
    /// Index of the active wave.
    pub current_wave_index: usize,
}

impl Spawning {
    /// Starts at the first wave.
    #[must_use]
    pub fn new(waves: Vec<SpawningWave>) -> Self {
        Self {
            waves,
            current_wave_index: 0,
        }
    }

    /// Active wave.
    #[must_use]
    pub fn current_wave(&self) -> Option<&SpawningWave> {
        self.waves.get(self.current_wave_index)
    }

    /// Mutable access to the active wave.
    pub fn current_wave_mut(&mut self) -> Option<&mut SpawningWave> {
        self.waves.get_mut(self.current_wave_index)
    }

    /// One-based number of the active wave.
    #[must_use]
    pub fn current_wave_number(&self) -> usize {
        self.current_wave_index + 1
    }

    /// Reports whether another wave follows the active one.
    #[must_use]
    pub fn has_next_wave(&self) -> bool {
        self.current_wave_index + 1 < self.waves.len()
    }

    /// Activates the next wave; stays on the final wave once reached.
    pub fn advance(&mut self) {
        if self.has_next_wave() {
            self.current_wave_index += 1;
        }
    }
}

/// Player money.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerResources {
    /// Spendable money.
    pub money: u32,
}

/// Interaction mode of the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayerInputState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A turret kind is chosen and awaits a build zone.
    PlacingTurret,
    /// A build zone is chosen and awaits a turret kind.
    BuildZoneSelected,
    /// A built turret is selected.
    TurretSelected,
}

/// Player selection state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInputMachine {
    /// Interaction mode.
    pub state: PlayerInputState,
    /// Kind chosen for placement.
    pub turret_to_build: Option<TurretKind>,
    /// Build zone chosen for the next turret.
    pub selected_build_zone: Option<Entity>,
    /// Turret whose panel is shown.
    pub selected_turret: Option<Entity>,
}

/// Tally of score events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    scores: BTreeMap<ScoreEventKind, u32>,
}

impl ScoreTracker {
    /// Counts one occurrence of `kind`.
    pub fn record(&mut self, kind: ScoreEventKind) {
        *self.scores.entry(kind).or_insert(0) += 1;
    }

    /// Occurrences of `kind` so far.
    #[must_use]
    pub fn count(&self, kind: ScoreEventKind) -> u32 {
        self.scores.get(&kind).copied().unwrap_or(0)
    }

    /// Displayed score: the number of kills.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.count(ScoreEventKind::EnemyKill)
    }
}

/// Research progress and completed unlocks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerResearch {
    /// Project being researched.
    pub in_progress: Option<ResearchKind>,
    /// Milliseconds spent on the current project.
    pub elapsed: f32,
    /// Milliseconds the current project takes.
    pub duration: f32,
    /// Finished projects.
    pub completed: BTreeSet<ResearchKind>,
}

impl PlayerResearch {
    /// Reports whether no project is running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_progress.is_none()
    }

    /// Reports whether `kind` has finished.
    #[must_use]
    pub fn is_completed(&self, kind: ResearchKind) -> bool {
        self.completed.contains(&kind)
    }

    /// Reports whether `kind` is neither finished nor running.
    #[must_use]
    pub fn is_incomplete(&self, kind: ResearchKind) -> bool {
        !self.is_completed(kind) && self.in_progress != Some(kind)
    }

    /// Begins researching `kind`.
    pub fn start(&mut self, kind: ResearchKind, duration: f32) {
        self.in_progress = Some(kind);
        self.elapsed = 0.0;
        self.duration = duration;
    }

    /// Advances the running project; returns it once it completes.
    pub fn advance(&mut self, delta_ms: f32) -> Option<ResearchKind> {
        let kind = self.in_progress?;
        self.elapsed += delta_ms;
        if self.elapsed < self.duration {
            return None;
        }
        self.in_progress = None;
        let _ = self.completed.insert(kind);
        Some(kind)
    }

    /// Share of the running project completed, as a percentage.
    #[must_use]
    pub fn progress(&self) -> Option<u8> {
        if self.in_progress.is_none() {
            return None;
        }
        if self.duration <= 0.0 {
            return Some(100);
        }
        Some((100.0 * (self.elapsed / self.duration).min(1.0)) as u8)
    }

    /// Highest upgrade level currently purchasable.
    #[must_use]
    pub fn upgrade_cap(&self) -> u32 {
        if self.is_completed(ResearchKind::UnlockExtendedUpgrades) {
            MAX_UPGRADE_LEVEL
        } else {
            BASE_UPGRADE_LEVEL_CAP
        }
    }

    /// Reports whether `kind` may be built.
    #[must_use]
    pub fn unlocked(&self, kind: TurretKind) -> bool {
        kind.required_research()
            .map_or(true, |research| self.is_completed(research))
    }
}

/// Destroys the entity once `duration` milliseconds have elapsed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeToLive {
    /// Milliseconds lived.
    pub elapsed: f32,
    /// Milliseconds to live.
    pub duration: f32,
}

impl TimeToLive {
    /// Creates a countdown of `duration` milliseconds.
    #[must_use]
    pub const fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
        }
    }

    /// Reports whether the entity should be destroyed.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Destroys the entity once `remaining` runs out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lifetime {
    /// Milliseconds left.
    pub remaining: f32,
}

impl Lifetime {
    /// Reports whether the entity should be destroyed.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Fades the entity out over `duration` milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeOut {
    /// Milliseconds faded so far.
    pub elapsed: f32,
    /// Milliseconds until fully transparent.
    pub duration: f32,
}

impl FadeOut {
    /// Starts a fade lasting `duration` milliseconds.
    #[must_use]
    pub const fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
        }
    }

    /// Completed share of the fade in `0.0..=1.0`.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Remaining visibility in `0.0..=1.0`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        1.0 - self.alpha()
    }
}

/// Marks a location where a turret may be built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurretBuildZone;

/// Marks the end-of-path zone that removes arriving enemies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Despawning;

/// Marks entities removed on reaching a [`Despawning`] zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Despawnable;

/// Marks entities destroyed once they leave the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemoveOnOutOfBounds;
