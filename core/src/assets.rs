//! Typed handles to images supplied by the asset loader.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{status::StatusKind, EnemyKind, TurretKind};

/// Opaque identifier of a decoded image owned by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(u32);

impl ImageId {
    /// Creates a new image identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Image handle paired with its pixel extents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// Image to draw.
    pub image: ImageId,
    /// Width and height of the unrotated image.
    pub size: Vec2,
}

impl Sprite {
    /// Creates a sprite from an image handle and its size.
    #[must_use]
    pub const fn new(image: ImageId, size: Vec2) -> Self {
        Self { image, size }
    }
}

/// Animation frames; never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Frames(Vec<Sprite>);

impl Frames {
    /// Wraps the frames, returning `None` when the list is empty.
    #[must_use]
    pub fn new(frames: Vec<Sprite>) -> Option<Self> {
        if frames.is_empty() {
            None
        } else {
            Some(Self(frames))
        }
    }

    /// Frame at `index`, wrapping around the sequence.
    #[must_use]
    pub fn frame(&self, index: usize) -> Sprite {
        self.0[index % self.0.len()]
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Images used by entity factories and overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Assets {
    /// Enemy sprites indexed by [`EnemyKind::ALL`] order.
    pub enemies: [Sprite; 4],
    /// Turret sprites indexed by [`TurretKind::ALL`] order.
    pub turrets: [Sprite; 7],
    /// Bullet turret sprite shown during its firing animation.
    pub bullet_turret_firing: Sprite,
    /// Placeholder drawn where turrets may be built.
    pub turret_build_zone: Sprite,
    /// Flame turret particle.
    pub flame_particle: Sprite,
    /// Rocket turret missile.
    pub rocket_missile: Sprite,
    /// Rocket explosion burst.
    pub rocket_missile_explosion: Sprite,
    /// Frost projectile animation.
    pub frost_missile_frames: Frames,
    /// Frost explosion animation.
    pub frost_missile_explosion_frames: Frames,
    /// Lightning strike animation.
    pub lightning_strike_frames: Frames,
    /// Chain lightning jump animation.
    pub chain_lightning_frames: Frames,
    /// Poison zone animation.
    pub poison_strike_frames: Frames,
    /// Tornado animation.
    pub tornado_strike_frames: Frames,
    /// Health bar overlay.
    pub health_bar: Sprite,
    /// Turret range ring overlay; resized to the turret range when shown.
    pub range_ring: Sprite,
    /// Status icons for burning, poisoned, buffeted, frozen and shocked.
    pub status_icons: [Sprite; 5],
}

impl Assets {
    /// Sprite for the given enemy kind.
    #[must_use]
    pub fn enemy(&self, kind: EnemyKind) -> Sprite {
        self.enemies[kind as usize]
    }

    /// Idle sprite for the given turret kind.
    #[must_use]
    pub fn turret(&self, kind: TurretKind) -> Sprite {
        self.turrets[kind as usize]
    }

    /// Overlay icon for an active status effect.
    #[must_use]
    pub fn status_icon(&self, kind: StatusKind) -> Sprite {
        self.status_icons[kind as usize]
    }

    /// Builds a bundle of uniquely numbered placeholder images with
    /// plausible sizes, for headless runs and tests.
    #[must_use]
    pub fn placeholder() -> Self {
        let mut next = 0;
        let mut sprite = |w: f32, h: f32| {
            next += 1;
            Sprite::new(ImageId::new(next), Vec2::new(w, h))
        };
        let enemies = [
            sprite(32.0, 32.0),
            sprite(48.0, 48.0),
            sprite(32.0, 32.0),
            sprite(28.0, 28.0),
        ];
        let turrets = [(); 7].map(|_| sprite(64.0, 64.0));
        let bullet_turret_firing = sprite(64.0, 64.0);
        let turret_build_zone = sprite(64.0, 64.0);
        let flame_particle = sprite(16.0, 16.0);
        let rocket_missile = sprite(24.0, 8.0);
        let rocket_missile_explosion = sprite(96.0, 96.0);
        let health_bar = sprite(32.0, 4.0);
        let range_ring = sprite(2.0, 2.0);
        let status_icons = [(); 5].map(|_| sprite(8.0, 8.0));
        let mut frames = |count: usize, w: f32, h: f32| {
            let list = (0..count).map(|_| sprite(w, h)).collect();
            Frames(list)
        };

        Self {
            enemies,
            turrets,
            bullet_turret_firing,
            turret_build_zone,
            flame_particle,
            rocket_missile,
            rocket_missile_explosion,
            health_bar,
            range_ring,
            status_icons,
            frost_missile_frames: frames(4, 24.0, 24.0),
            frost_missile_explosion_frames: frames(16, 128.0, 128.0),
            lightning_strike_frames: frames(16, 64.0, 128.0),
            chain_lightning_frames: frames(16, 48.0, 96.0),
            poison_strike_frames: frames(16, 160.0, 160.0),
            tornado_strike_frames: frames(10, 96.0, 96.0),
        }
    }
}
