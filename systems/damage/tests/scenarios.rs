use turret_defence_core::{
    components::{
        BoundingBox, CollisionBehavior, DamagesEnemy, DamagesEnemyEffect, Enemy, PathGraph,
        ScoreTracker,
    },
    status::{Burn, Burning, StatusEffect},
    Assets, EnemyKind, Entity, Rect, ScoreEventKind, StatsTable, Vec2, PLAYER_STARTING_MONEY,
};
use turret_defence_system_damage::{DamageProcessor, DotProcessor};
use turret_defence_world::{enemies::spawn_enemy, FrameContext, Processor, UiSync, World};

struct Arena {
    world: World,
    assets: Assets,
    stats: StatsTable,
    damage: DamageProcessor,
    burning: DotProcessor<Burn>,
}

impl Arena {
    fn new() -> Self {
        Self {
            world: World::new(Rect::new(0.0, 0.0, 960.0, 960.0), 1),
            assets: Assets::placeholder(),
            stats: StatsTable::standard(),
            damage: DamageProcessor::default(),
            burning: DotProcessor::default(),
        }
    }

    fn spawn_grunt(&mut self) -> Entity {
        let spawn_point = self
            .world
            .store_mut()
            .create()
            .with(BoundingBox::new(Rect::new(100.0, 100.0, 0.0, 0.0)))
            .with(PathGraph {
                vertices: vec![Vec2::new(800.0, 100.0)],
            })
            .build();
        spawn_enemy(
            &mut self.world,
            spawn_point,
            EnemyKind::Grunt,
            0,
            &self.assets,
            &self.stats,
        )
        .expect("spawn point is complete")
    }

    fn strike(&mut self, at: Entity, damages: DamagesEnemy) {
        let rect = self
            .world
            .store()
            .get::<BoundingBox>(at)
            .expect("target alive")
            .rect;
        let _ = self
            .world
            .store_mut()
            .create()
            .with(BoundingBox::new(rect))
            .with(damages)
            .build();
    }

    fn tick(&mut self, delta_ms: f32) {
        let mut ui = UiSync::default();
        let mut frame = FrameContext::new(delta_ms, &[], &self.assets, &self.stats, &mut ui);
        self.damage
            .process(&mut self.world, &mut frame)
            .expect("damage pass succeeds");
        self.burning
            .process(&mut self.world, &mut frame)
            .expect("burning pass succeeds");
    }
}

#[test]
fn three_bullets_kill_a_thirty_health_enemy() {
    let mut arena = Arena::new();
    let grunt = arena.spawn_grunt();
    assert_eq!(
        arena.world.store().get::<Enemy>(grunt).map(Enemy::max_health),
        Ok(30)
    );

    for _ in 0..3 {
        arena.strike(grunt, DamagesEnemy::new(10));
        arena.tick(16.0);
    }

    assert!(!arena.world.store().is_alive(grunt), "third hit kills");
    assert_eq!(arena.world.money(), Ok(PLAYER_STARTING_MONEY + 5));
    let score = arena
        .world
        .player_component::<ScoreTracker>()
        .expect("player exists")
        .count(ScoreEventKind::EnemyKill);
    assert_eq!(score, 1);
}

#[test]
fn second_burn_extends_from_the_current_elapsed_time() {
    let mut arena = Arena::new();
    let grunt = arena.spawn_grunt();
    let flame = || {
        DamagesEnemy::new(0)
            .on_collision(CollisionBehavior::Pierce)
            .pierces(1)
            .effect(DamagesEnemyEffect::extends(StatusEffect::Burning(
                Burning::new(1, 250.0, 1_000.0),
            )))
    };

    arena.strike(grunt, flame());
    arena.tick(100.0);
    arena.tick(100.0);
    let before = *arena
        .world
        .store()
        .get::<Burning>(grunt)
        .expect("burning applied");
    assert_eq!(before.elapsed, 200.0);

    arena.strike(grunt, flame());
    arena.tick(100.0);

    let after = *arena
        .world
        .store()
        .get::<Burning>(grunt)
        .expect("still burning");
    assert_eq!(after.duration, 200.0 + 1_000.0);
    assert_eq!(after.elapsed, 300.0, "elapsed is not reset");
    assert_eq!(after.ticks, 1, "tick cadence is preserved");
}
