#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translation of input events into player actions and their execution.

use tracing::{debug, trace};
use turret_defence_core::{
    components::{
        BoundingBox, PlayerInputMachine, PlayerInputState, TurretBuildZone, TurretMachine,
    },
    Assets, Entity, InputEvent, Key, ResearchKind, StatsTable, Store, TurretKind,
    TurretProperty, UiElement, Vec2,
};
use turret_defence_world::{
    economy::{try_build_turret, try_sell_turret, try_start_research, try_upgrade_turret},
    turrets::sync_selected_turret_range,
    FrameContext, Processor, SimError, World,
};

/// Intent derived from a single input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// Pick a turret kind and wait for a build zone.
    ChooseTurret(TurretKind),
    /// Pick a build zone and wait for a turret kind.
    SelectBuildZone(Entity),
    /// Buy a turret on a build zone.
    BuildTurret {
        /// Zone replaced by the turret.
        zone: Entity,
        /// Kind to build.
        kind: TurretKind,
    },
    /// Open the panel of a built turret.
    SelectTurret(Entity),
    /// Clear any placement or selection.
    Deselect,
    /// Buy one level of a turret property.
    UpgradeTurret {
        /// Turret being upgraded.
        turret: Entity,
        /// Property gaining a level.
        property: TurretProperty,
    },
    /// Sell a turret and restore its build zone.
    SellTurret(Entity),
    /// Start a research project.
    StartResearch(ResearchKind),
}

/// Entity under a map click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// An empty build zone.
    BuildZone(Entity),
    /// A built turret.
    Turret(Entity),
    /// Open ground.
    Nothing,
}

/// Finds the build zone or turret whose bounds contain `point`.
#[must_use]
pub fn click_target(store: &Store, point: Vec2) -> ClickTarget {
    let hit = |bbox: &BoundingBox| bbox.rect.contains_point(point);
    if let Some((zone, _, _)) = store
        .query2::<TurretBuildZone, BoundingBox>()
        .find(|(_, _, bbox)| hit(bbox))
    {
        return ClickTarget::BuildZone(zone);
    }
    store
        .query2::<TurretMachine, BoundingBox>()
        .find(|(_, _, bbox)| hit(bbox))
        .map_or(ClickTarget::Nothing, |(turret, _, _)| {
            ClickTarget::Turret(turret)
        })
}

/// Maps an input event to the action it requests in the current selection
/// state.
///
/// `target_at` resolves map clicks; it is only called for click events.
pub fn translate<F>(
    machine: &PlayerInputMachine,
    event: InputEvent,
    target_at: F,
) -> Option<PlayerAction>
where
    F: FnOnce(Vec2) -> ClickTarget,
{
    match event {
        InputEvent::UiButtonPress(element) => match element {
            UiElement::BuildTurret(kind) => Some(match machine.selected_build_zone {
                Some(zone) if machine.state == PlayerInputState::BuildZoneSelected => {
                    PlayerAction::BuildTurret { zone, kind }
                }
                _ => PlayerAction::ChooseTurret(kind),
            }),
            UiElement::UpgradeTurret(property) => machine
                .selected_turret
                .map(|turret| PlayerAction::UpgradeTurret { turret, property }),
            UiElement::SellTurret => machine.selected_turret.map(PlayerAction::SellTurret),
            UiElement::StartResearch(kind) => Some(PlayerAction::StartResearch(kind)),
            UiElement::Deselect => Some(PlayerAction::Deselect),
        },
        InputEvent::KeyDown(Key::Escape) => Some(PlayerAction::Deselect),
        InputEvent::KeyDown(Key::Delete) => machine.selected_turret.map(PlayerAction::SellTurret),
        InputEvent::KeyDown(Key::Other(_)) | InputEvent::KeyUp(_) => None,
        InputEvent::MouseLeftClickUp(point) => Some(match target_at(point) {
            ClickTarget::BuildZone(zone) => match machine.turret_to_build {
                Some(kind) if machine.state == PlayerInputState::PlacingTurret => {
                    PlayerAction::BuildTurret { zone, kind }
                }
                _ => PlayerAction::SelectBuildZone(zone),
            },
            ClickTarget::Turret(turret) => PlayerAction::SelectTurret(turret),
            ClickTarget::Nothing => PlayerAction::Deselect,
        }),
    }
}

/// Executes `action` against the world.
///
/// Actions that break an economic rule leave the world untouched and are
/// not reported as errors.
pub fn perform(
    world: &mut World,
    action: PlayerAction,
    assets: &Assets,
    stats: &StatsTable,
) -> Result<(), SimError> {
    match action {
        PlayerAction::ChooseTurret(kind) => select(
            world,
            PlayerInputMachine {
                state: PlayerInputState::PlacingTurret,
                turret_to_build: Some(kind),
                ..PlayerInputMachine::default()
            },
            assets,
        ),
        PlayerAction::SelectBuildZone(zone) => select(
            world,
            PlayerInputMachine {
                state: PlayerInputState::BuildZoneSelected,
                selected_build_zone: Some(zone),
                ..PlayerInputMachine::default()
            },
            assets,
        ),
        PlayerAction::BuildTurret { zone, kind } => {
            if settle(try_build_turret(world, zone, kind, assets, stats))?.is_some() {
                select(world, PlayerInputMachine::default(), assets)?;
            }
            Ok(())
        }
        PlayerAction::SelectTurret(turret) => select(
            world,
            PlayerInputMachine {
                state: PlayerInputState::TurretSelected,
                selected_turret: Some(turret),
                ..PlayerInputMachine::default()
            },
            assets,
        ),
        PlayerAction::Deselect => select(world, PlayerInputMachine::default(), assets),
        PlayerAction::UpgradeTurret { turret, property } => {
            if settle(try_upgrade_turret(world, turret, property, stats))?.is_some() {
                sync_selected_turret_range(world.store_mut(), Some(turret), assets)?;
            }
            Ok(())
        }
        PlayerAction::SellTurret(turret) => {
            if settle(try_sell_turret(world, turret, assets, stats))?.is_some() {
                select(world, PlayerInputMachine::default(), assets)?;
            }
            Ok(())
        }
        PlayerAction::StartResearch(kind) => {
            let _ = settle(try_start_research(world, kind, stats))?;
            Ok(())
        }
    }
}

fn select(
    world: &mut World,
    machine: PlayerInputMachine,
    assets: &Assets,
) -> Result<(), SimError> {
    *world.player_component_mut::<PlayerInputMachine>()? = machine;
    sync_selected_turret_range(world.store_mut(), machine.selected_turret, assets)?;
    Ok(())
}

fn settle<T>(result: Result<T, SimError>) -> Result<Option<T>, SimError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.is_rejection() => {
            debug!(%error, "player action rejected");
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

/// Applies the frame's input events in arrival order.
#[derive(Debug, Default)]
pub struct PlayerInputProcessor;

impl Processor for PlayerInputProcessor {
    fn name(&self) -> &'static str {
        "player_input"
    }

    fn process(&mut self, world: &mut World, frame: &mut FrameContext<'_>) -> Result<(), SimError> {
        let events = frame.input_events;
        for &event in events {
            let machine = *world.player_component::<PlayerInputMachine>()?;
            let Some(action) = translate(&machine, event, |point| {
                click_target(world.store(), point)
            }) else {
                continue;
            };
            trace!(?event, ?action, "player action");
            perform(world, action, frame.assets, frame.stats)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use turret_defence_core::{
        components::{ExtraKind, PlayerResources, Renderable},
        Rect, PLAYER_STARTING_MONEY,
    };
    use turret_defence_world::{turrets::create_build_zone, UiSync};

    use super::*;

    const ZONE: Vec2 = Vec2::new(200.0, 200.0);

    fn world_with_zone() -> (World, Entity) {
        let mut world = World::new(Rect::new(0.0, 0.0, 960.0, 960.0), 3);
        let zone = create_build_zone(world.store_mut(), ZONE, &Assets::placeholder());
        (world, zone)
    }

    fn run(world: &mut World, events: &[InputEvent]) {
        let assets = Assets::placeholder();
        let stats = StatsTable::standard();
        let mut ui = UiSync::default();
        let mut frame = FrameContext::new(16.0, events, &assets, &stats, &mut ui);
        PlayerInputProcessor
            .process(world, &mut frame)
            .expect("input pass succeeds");
    }

    fn machine(world: &World) -> PlayerInputMachine {
        *world
            .player_component::<PlayerInputMachine>()
            .expect("player exists")
    }

    fn only_turret(world: &World) -> Entity {
        let turrets: Vec<_> = world
            .store()
            .query::<TurretMachine>()
            .map(|(entity, _)| entity)
            .collect();
        assert_eq!(turrets.len(), 1, "exactly one turret");
        turrets[0]
    }

    #[test]
    fn choosing_a_kind_then_clicking_a_zone_builds() {
        let (mut world, zone) = world_with_zone();

        run(
            &mut world,
            &[
                InputEvent::UiButtonPress(UiElement::BuildTurret(TurretKind::Bullet)),
                InputEvent::MouseLeftClickUp(ZONE),
            ],
        );

        assert!(!world.store().is_alive(zone));
        let turret = only_turret(&world);
        assert_eq!(
            world.store().get::<TurretMachine>(turret).map(|m| m.kind),
            Ok(TurretKind::Bullet)
        );
        assert_eq!(world.money(), Ok(PLAYER_STARTING_MONEY - 50));
        assert_eq!(machine(&world), PlayerInputMachine::default());
    }

    #[test]
    fn clicking_a_zone_then_a_kind_builds() {
        let (mut world, zone) = world_with_zone();

        run(&mut world, &[InputEvent::MouseLeftClickUp(ZONE)]);
        assert_eq!(machine(&world).selected_build_zone, Some(zone));

        run(
            &mut world,
            &[InputEvent::UiButtonPress(UiElement::BuildTurret(
                TurretKind::Bullet,
            ))],
        );
        assert!(!world.store().is_alive(zone));
        let _ = only_turret(&world);
    }

    #[test]
    fn unaffordable_build_keeps_the_placement_pending() {
        let (mut world, zone) = world_with_zone();

        run(
            &mut world,
            &[
                InputEvent::UiButtonPress(UiElement::BuildTurret(TurretKind::Frost)),
                InputEvent::MouseLeftClickUp(ZONE),
            ],
        );

        assert!(world.store().is_alive(zone));
        assert_eq!(world.store().query::<TurretMachine>().count(), 0);
        assert_eq!(world.money(), Ok(PLAYER_STARTING_MONEY));
        assert_eq!(machine(&world).state, PlayerInputState::PlacingTurret);
    }

    #[test]
    fn locked_kinds_cannot_be_placed() {
        let (mut world, zone) = world_with_zone();
        world
            .player_component_mut::<PlayerResources>()
            .expect("player exists")
            .money = 10_000;

        run(
            &mut world,
            &[
                InputEvent::UiButtonPress(UiElement::BuildTurret(TurretKind::Flame)),
                InputEvent::MouseLeftClickUp(ZONE),
            ],
        );

        assert!(world.store().is_alive(zone));
        assert_eq!(world.money(), Ok(10_000));
    }

    #[test]
    fn selection_shows_the_range_ring_and_escape_hides_it() {
        let (mut world, _) = world_with_zone();
        run(
            &mut world,
            &[
                InputEvent::UiButtonPress(UiElement::BuildTurret(TurretKind::Bullet)),
                InputEvent::MouseLeftClickUp(ZONE),
                InputEvent::MouseLeftClickUp(ZONE),
            ],
        );
        let turret = only_turret(&world);
        let ring = |world: &World| {
            world
                .store()
                .get::<Renderable>(turret)
                .expect("turret renderable")
                .extras
                .contains_key(&ExtraKind::TurretRange)
        };
        assert_eq!(machine(&world).selected_turret, Some(turret));
        assert!(ring(&world));

        run(&mut world, &[InputEvent::KeyDown(Key::Escape)]);

        assert_eq!(machine(&world).state, PlayerInputState::Idle);
        assert!(!ring(&world));
    }

    #[test]
    fn delete_sells_the_selected_turret() {
        let (mut world, _) = world_with_zone();
        run(
            &mut world,
            &[
                InputEvent::UiButtonPress(UiElement::BuildTurret(TurretKind::Bullet)),
                InputEvent::MouseLeftClickUp(ZONE),
                InputEvent::MouseLeftClickUp(ZONE),
                InputEvent::KeyDown(Key::Delete),
            ],
        );

        assert_eq!(world.store().query::<TurretMachine>().count(), 0);
        assert_eq!(
            click_target(world.store(), ZONE),
            ClickTarget::BuildZone(
                world
                    .store()
                    .first::<TurretBuildZone>()
                    .map(|(zone, _)| zone)
                    .expect("zone restored")
            )
        );
        assert_eq!(world.money(), Ok(PLAYER_STARTING_MONEY - 50 + 25));
        assert_eq!(machine(&world), PlayerInputMachine::default());
    }

    #[test]
    fn turret_buttons_need_a_selection() {
        let idle = PlayerInputMachine::default();
        let unreachable = |_: Vec2| -> ClickTarget { panic!("buttons never hit-test") };

        assert_eq!(
            translate(
                &idle,
                InputEvent::UiButtonPress(UiElement::UpgradeTurret(TurretProperty::Damage)),
                unreachable
            ),
            None
        );
        assert_eq!(
            translate(&idle, InputEvent::KeyDown(Key::Delete), unreachable),
            None
        );
        assert_eq!(
            translate(&idle, InputEvent::KeyUp(Key::Escape), unreachable),
            None
        );
    }

    #[test]
    fn clicking_open_ground_deselects() {
        let selected = PlayerInputMachine {
            state: PlayerInputState::TurretSelected,
            selected_turret: Some(Entity::new(9)),
            ..PlayerInputMachine::default()
        };

        let action = translate(
            &selected,
            InputEvent::MouseLeftClickUp(Vec2::new(5.0, 5.0)),
            |_| ClickTarget::Nothing,
        );

        assert_eq!(action, Some(PlayerAction::Deselect));
    }
}
