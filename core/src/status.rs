//! Status effects applied to enemies by damaging entities.
//!
//! Damage-over-time effects share one generic shape, [`DamageOverTime`],
//! and timed flags share [`TimedStatus`]. A zero-sized marker type keeps
//! each effect in its own component storage.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Discriminant of every status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusKind {
    /// Fire damage over time.
    Burning,
    /// Poison damage over time.
    Poisoned,
    /// Wind damage over time that also slows.
    Buffeted,
    /// Immobilised by frost.
    Frozen,
    /// Recently struck by lightning.
    Shocked,
}

impl StatusKind {
    /// Every status kind in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Burning,
        Self::Poisoned,
        Self::Buffeted,
        Self::Frozen,
        Self::Shocked,
    ];
}

/// Ties a marker type to its [`StatusKind`].
pub trait StatusMarker: 'static {
    /// Kind described by the marker.
    const KIND: StatusKind;
}

macro_rules! status_marker {
    ($(#[$doc:meta])* $name:ident => $kind:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum $name {}

        impl StatusMarker for $name {
            const KIND: StatusKind = StatusKind::$kind;
        }
    };
}

status_marker!(
    /// Marker for [`Burning`].
    Burn => Burning
);
status_marker!(
    /// Marker for [`Poisoned`].
    Poison => Poisoned
);
status_marker!(
    /// Marker for [`Buffeted`].
    Buffet => Buffeted
);
status_marker!(
    /// Marker for [`Frozen`].
    Freeze => Frozen
);
status_marker!(
    /// Marker for [`Shocked`].
    Shock => Shocked
);

/// Extends an active effect from another application of the same effect.
pub trait Reapply {
    /// Stretches the duration so the effect lasts `other.duration` from now
    /// without resetting tick progress.
    fn reapply(&mut self, other: &Self);
}

/// Periodic damage applied until the effect expires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOverTime<K> {
    /// Damage dealt per tick.
    pub damage: u32,
    /// Milliseconds between ticks.
    pub damage_tick_rate: f32,
    /// Total lifetime of the effect in milliseconds.
    pub duration: f32,
    /// Ticks applied so far.
    pub ticks: u32,
    /// Milliseconds since the effect was applied.
    pub elapsed: f32,
    kind: PhantomData<K>,
}

impl<K> DamageOverTime<K> {
    /// Creates a fresh effect.
    #[must_use]
    pub const fn new(damage: u32, damage_tick_rate: f32, duration: f32) -> Self {
        Self {
            damage,
            damage_tick_rate,
            duration,
            ticks: 0,
            elapsed: 0.0,
            kind: PhantomData,
        }
    }

    /// Reports whether the next damage tick should be applied.
    #[must_use]
    pub fn tick_due(&self) -> bool {
        self.elapsed >= (self.ticks + 1) as f32 * self.damage_tick_rate
    }

    /// Reports whether the effect has run its course.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Milliseconds left before the effect expires.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }
}

impl<K> Reapply for DamageOverTime<K> {
    fn reapply(&mut self, other: &Self) {
        self.duration = self.elapsed + other.duration;
    }
}

/// Status flag that lasts for a fixed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedStatus<K> {
    /// Total lifetime in milliseconds.
    pub duration: f32,
    /// Milliseconds since the flag was applied.
    pub elapsed: f32,
    kind: PhantomData<K>,
}

impl<K> TimedStatus<K> {
    /// Creates a fresh flag.
    #[must_use]
    pub const fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            kind: PhantomData,
        }
    }

    /// Reports whether the flag has run its course.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Milliseconds left before the flag expires.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }
}

impl<K> Reapply for TimedStatus<K> {
    fn reapply(&mut self, other: &Self) {
        self.duration = self.elapsed + other.duration;
    }
}

/// Burning damage over time.
pub type Burning = DamageOverTime<Burn>;
/// Poison damage over time.
pub type Poisoned = DamageOverTime<Poison>;
/// Wind damage over time; also slows the target.
pub type Buffeted = DamageOverTime<Buffet>;
/// Freeze flag; immobilises the target.
pub type Frozen = TimedStatus<Freeze>;
/// Shock flag; blocks further chain lightning jumps.
pub type Shocked = TimedStatus<Shock>;

/// A status component carried by an on-hit effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatusEffect {
    /// Attach or extend [`Burning`].
    Burning(Burning),
    /// Attach or extend [`Poisoned`].
    Poisoned(Poisoned),
    /// Attach or extend [`Buffeted`].
    Buffeted(Buffeted),
    /// Attach or extend [`Frozen`].
    Frozen(Frozen),
    /// Attach or extend [`Shocked`].
    Shocked(Shocked),
}

impl StatusEffect {
    /// Kind of the carried status.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        match self {
            Self::Burning(_) => StatusKind::Burning,
            Self::Poisoned(_) => StatusKind::Poisoned,
            Self::Buffeted(_) => StatusKind::Buffeted,
            Self::Frozen(_) => StatusKind::Frozen,
            Self::Shocked(_) => StatusKind::Shocked,
        }
    }
}
