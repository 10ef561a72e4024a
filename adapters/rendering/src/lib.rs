#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Turret Defence adapters.
//!
//! The simulation never draws. Adapters turn the store into a [`DrawList`]
//! once per frame and hand it, together with the interface snapshot, to a
//! [`RenderingBackend`].

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use turret_defence_core::{
    components::{BoundingBox, ExtraOrder, ExtraRenderable, FadeOut, RenderOrder, Renderable},
    Entity, ImageId, InputEvent, Rect, Store,
};
use turret_defence_world::UiSync;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// One textured quad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    /// Entity the quad belongs to.
    pub entity: Entity,
    /// Image to sample.
    pub image: ImageId,
    /// Unrotated extents of the image.
    pub source_size: Vec2,
    /// Destination rectangle in world units.
    pub dest: Rect,
    /// Rotation in degrees about the destination centre.
    pub rotation: f32,
    /// Horizontal share of the image to draw, used by bars.
    pub fill: f32,
    /// Visibility in `0.0..=1.0`, lowered by fading entities.
    pub opacity: f32,
}

/// Quads in back-to-front order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Collects every drawable entity of `store`.
    ///
    /// Entities are ordered by [`RenderOrder`], then by creation. Each one
    /// expands into its under overlays, its rotated base image and its over
    /// overlays.
    #[must_use]
    pub fn from_store(store: &Store) -> Self {
        let mut drawables: Vec<(Entity, &Renderable, &BoundingBox)> =
            store.query2::<Renderable, BoundingBox>().collect();
        drawables.sort_by_key(|(_, renderable, _)| renderable.order);

        let mut commands = Vec::with_capacity(drawables.len());
        for (entity, renderable, bbox) in drawables {
            let opacity = store
                .try_get::<FadeOut>(entity)
                .map_or(1.0, FadeOut::opacity);
            let extras = |layer: ExtraOrder| {
                renderable
                    .extras
                    .values()
                    .filter(move |extra| extra.order == layer)
                    .map(move |extra| overlay(entity, extra, opacity))
            };
            commands.extend(extras(ExtraOrder::Under));
            commands.push(DrawCommand {
                entity,
                image: renderable.source.image,
                source_size: renderable.source.size,
                dest: bbox.rect,
                rotation: renderable.rotation,
                fill: 1.0,
                opacity,
            });
            commands.extend(extras(ExtraOrder::Over));
        }
        Self { commands }
    }

    /// Quads in draw order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of quads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Reports whether nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn overlay(entity: Entity, extra: &ExtraRenderable, opacity: f32) -> DrawCommand {
    DrawCommand {
        entity,
        image: extra.sprite.image,
        source_size: extra.sprite.size,
        dest: extra.rect,
        rotation: 0.0,
        fill: extra.fill.clamp(0.0, 1.0),
        opacity,
    }
}

/// Everything a backend shows for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// World quads.
    pub draw_list: DrawList,
    /// Interface labels and panels.
    pub ui: UiSync,
}

/// Static window configuration and the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used for the window.
    pub window_title: String,
    /// Background color.
    pub clear_color: Color,
    /// Frame shown before the first update.
    pub frame: Frame,
}

impl Presentation {
    /// Creates a presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, frame: Frame) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            frame,
        }
    }
}

/// Presentation layer that owns the frame loop.
pub trait RenderingBackend {
    /// Runs the backend until it is asked to exit.
    ///
    /// `update_frame` receives the frame delta and the input gathered since
    /// the previous call, and refreshes the frame before it is shown. It
    /// returns `false` once the loop should stop.
    fn run<F>(self, presentation: Presentation, update_frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &[InputEvent], &mut Frame) -> AnyResult<bool> + 'static;
}

#[cfg(test)]
mod tests {
    use turret_defence_core::{components::ExtraKind, Sprite};

    use super::*;

    fn sprite(id: u32) -> Sprite {
        Sprite::new(ImageId::new(id), Vec2::new(10.0, 10.0))
    }

    fn drawable(store: &mut Store, id: u32, order: RenderOrder) -> Entity {
        store
            .create()
            .with(Renderable::new(sprite(id), order))
            .with(BoundingBox::new(Rect::new(0.0, 0.0, 10.0, 10.0)))
            .build()
    }

    fn images(list: &DrawList) -> Vec<u32> {
        list.commands()
            .iter()
            .map(|command| command.image.get())
            .collect()
    }

    #[test]
    fn layers_draw_back_to_front_in_creation_order() {
        let mut store = Store::new();
        let _ = drawable(&mut store, 1, RenderOrder::Objects);
        let _ = drawable(&mut store, 2, RenderOrder::Base);
        let _ = drawable(&mut store, 3, RenderOrder::Objects);
        let _ = drawable(&mut store, 4, RenderOrder::Environment);
        let _ = store
            .create()
            .with(Renderable::new(sprite(5), RenderOrder::Base))
            .build();

        let list = DrawList::from_store(&store);

        assert_eq!(images(&list), vec![2, 4, 1, 3]);
    }

    #[test]
    fn overlays_wrap_the_base_image() {
        let mut store = Store::new();
        let entity = drawable(&mut store, 1, RenderOrder::Objects);
        let renderable = store.get_mut::<Renderable>(entity).expect("renderable");
        renderable.rotate_to(90.0);
        let mut extra = |kind, id, order, fill| {
            let _ = renderable.extras.insert(
                kind,
                ExtraRenderable {
                    sprite: sprite(id),
                    rect: Rect::new(0.0, -8.0, 10.0, 4.0),
                    order,
                    fill,
                },
            );
        };
        extra(ExtraKind::TurretRange, 7, ExtraOrder::Under, 1.0);
        extra(ExtraKind::HealthBar, 8, ExtraOrder::Over, 1.5);

        let list = DrawList::from_store(&store);

        assert_eq!(images(&list), vec![7, 1, 8]);
        assert_eq!(list.commands()[1].rotation, 90.0);
        assert_eq!(list.commands()[2].fill, 1.0, "fill is clamped");
        assert!(list.commands().iter().all(|c| c.entity == entity));
    }

    #[test]
    fn fading_entities_dim_with_their_overlays() {
        let mut store = Store::new();
        let solid = drawable(&mut store, 1, RenderOrder::Objects);
        let fading = drawable(&mut store, 2, RenderOrder::Objects);
        let mut fade = FadeOut::new(200.0);
        fade.elapsed = 150.0;
        store.add(fading, fade).expect("entity is alive");
        let _ = store
            .get_mut::<Renderable>(fading)
            .expect("renderable")
            .extras
            .insert(
                ExtraKind::HealthBar,
                ExtraRenderable {
                    sprite: sprite(3),
                    rect: Rect::new(0.0, -8.0, 10.0, 4.0),
                    order: ExtraOrder::Over,
                    fill: 1.0,
                },
            );

        let list = DrawList::from_store(&store);

        let opacity: Vec<_> = list
            .commands()
            .iter()
            .map(|command| (command.entity, command.opacity))
            .collect();
        assert_eq!(opacity, vec![(solid, 1.0), (fading, 0.25), (fading, 0.25)]);
    }

    #[test]
    fn empty_store_draws_nothing() {
        assert!(DrawList::from_store(&Store::new()).is_empty());
    }
}
