//! Normalized input events delivered by the presentation layer.

use glam::Vec2;

use crate::{ResearchKind, TurretKind, TurretProperty};

/// Keys the simulation reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Cancels placement or selection.
    Escape,
    /// Sells the selected turret.
    Delete,
    /// Any other key, identified by its platform code.
    Other(u32),
}

/// Interface buttons that trigger player actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiElement {
    /// Choose a turret kind for placement.
    BuildTurret(TurretKind),
    /// Buy a level of a property on the selected turret.
    UpgradeTurret(TurretProperty),
    /// Sell the selected turret.
    SellTurret,
    /// Start a research project.
    StartResearch(ResearchKind),
    /// Close the turret panel.
    Deselect,
}

/// One input event of the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A key was pressed.
    KeyDown(Key),
    /// A key was released.
    KeyUp(Key),
    /// The left mouse button was released at a map position.
    MouseLeftClickUp(Vec2),
    /// An interface button was pressed.
    UiButtonPress(UiElement),
}
