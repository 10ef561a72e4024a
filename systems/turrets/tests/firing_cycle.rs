use turret_defence_core::{
    components::{BoundingBox, DamagesEnemy, Enemy, TurretMachine, TurretState},
    Assets, Entity, Rect, StatsTable, TurretKind, Vec2,
};
use turret_defence_system_turrets::TurretProcessor;
use turret_defence_world::{
    turrets::{build_turret, create_build_zone},
    FrameContext, Processor, UiSync, World,
};

const TICK_MS: f32 = 100.0;

struct Range {
    world: World,
    assets: Assets,
    stats: StatsTable,
    processor: TurretProcessor,
    turret: Entity,
}

impl Range {
    fn with_rocket_and_target() -> Self {
        let mut world = World::new(Rect::new(0.0, 0.0, 2_000.0, 2_000.0), 21);
        let assets = Assets::placeholder();
        let stats = StatsTable::standard();
        let zone = create_build_zone(world.store_mut(), Vec2::new(300.0, 300.0), &assets);
        let turret = build_turret(world.store_mut(), zone, TurretKind::Rocket, &assets, &stats)
            .expect("zone exists");
        let _ = world
            .store_mut()
            .create()
            .with(Enemy::new(10, 10_000))
            .with(BoundingBox::new(Rect::from_center(
                Vec2::new(500.0, 300.0),
                Vec2::splat(32.0),
            )))
            .build();
        Self {
            world,
            assets,
            stats,
            processor: TurretProcessor::default(),
            turret,
        }
    }

    fn tick(&mut self) -> TurretState {
        let mut ui = UiSync::default();
        let mut frame = FrameContext::new(TICK_MS, &[], &self.assets, &self.stats, &mut ui);
        self.processor
            .process(&mut self.world, &mut frame)
            .expect("turret step succeeds");
        self.world
            .store()
            .get::<TurretMachine>(self.turret)
            .expect("turret alive")
            .state
    }

    fn shots(&self) -> usize {
        self.world.store().query::<DamagesEnemy>().count()
    }
}

#[test]
fn rocket_cycle_returns_to_tracking_after_reload() {
    let mut range = Range::with_rocket_and_target();

    let mut phases = Vec::new();
    for _ in 0..40 {
        let state = range.tick();
        if phases.last() != Some(&state) {
            phases.push(state);
        }
    }

    assert_eq!(
        phases,
        vec![
            TurretState::Tracking,
            TurretState::Firing,
            TurretState::FiringAnimation,
            TurretState::Reloading,
            TurretState::Tracking,
        ],
        "unexpected phase sequence"
    );
    assert_eq!(range.shots(), 1, "exactly one missile in flight");
}

#[test]
fn shots_are_never_closer_than_the_cooldown() {
    let mut range = Range::with_rocket_and_target();
    let cooldown = range
        .world
        .store()
        .get::<TurretMachine>(range.turret)
        .expect("turret alive")
        .firing_cooldown();

    let mut shot_ticks = Vec::new();
    for tick in 0..200 {
        let before = range.shots();
        let _ = range.tick();
        if range.shots() > before {
            shot_ticks.push(tick);
        }
    }

    assert!(shot_ticks.len() >= 5, "turret kept firing: {shot_ticks:?}");
    for pair in shot_ticks.windows(2) {
        let gap = (pair[1] - pair[0]) as f32 * TICK_MS;
        assert!(gap >= cooldown, "shots {pair:?} only {gap}ms apart");
    }
}
