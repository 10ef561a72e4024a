//! Archetype-free component storage.
//!
//! Every component type lives in its own densely packed storage keyed by
//! [`Entity`]. Entities carry no data of their own; they are handles that
//! are never reused within one store. Iteration follows the dense order of
//! the primary component's storage, which removals may reshuffle.
//!
//! Processors that mutate structure while walking a query collect the
//! matching entities first (see [`Store::collect`]) and re-check
//! [`Store::is_alive`] before touching each one.

use std::{
    any::{type_name, Any, TypeId},
    collections::{BTreeSet, HashMap},
    fmt,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque handle identifying a bundle of components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(u64);

impl Entity {
    /// Creates a handle from its raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Lookup failures raised by [`Store`] accessors that must succeed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The entity was destroyed or never created.
    #[error("entity {0:?} does not exist")]
    MissingEntity(Entity),
    /// The entity exists but lacks the requested component.
    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        /// Entity that was looked up.
        entity: Entity,
        /// Name of the missing component type.
        component: &'static str,
    },
    /// No entity carries the requested singleton component.
    #[error("no entity carries a {component} component")]
    MissingSingleton {
        /// Name of the missing component type.
        component: &'static str,
    },
}

trait ErasedStorage {
    fn remove_entity(&mut self, entity: Entity);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Storage<T> {
    entities: Vec<Entity>,
    components: Vec<T>,
    slots: HashMap<Entity, usize>,
}

impl<T> Storage<T> {
    fn new() -> Self {
        Self {
            entities: Vec::new(),
            components: Vec::new(),
            slots: HashMap::new(),
        }
    }

    fn insert(&mut self, entity: Entity, component: T) {
        if let Some(&slot) = self.slots.get(&entity) {
            self.components[slot] = component;
            return;
        }

        let _ = self.slots.insert(entity, self.components.len());
        self.entities.push(entity);
        self.components.push(component);
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slots.remove(&entity)?;
        let _ = self.entities.swap_remove(slot);
        let component = self.components.swap_remove(slot);
        if let Some(&moved) = self.entities.get(slot) {
            let _ = self.slots.insert(moved, slot);
        }
        Some(component)
    }

    fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(&entity).map(|&slot| &self.components[slot])
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots
            .get(&entity)
            .map(|&slot| &mut self.components[slot])
    }

    fn contains(&self, entity: Entity) -> bool {
        self.slots.contains_key(&entity)
    }
}

impl<T: 'static> ErasedStorage for Storage<T> {
    fn remove_entity(&mut self, entity: Entity) {
        let _ = self.remove(entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Heterogeneous mapping from entities to their components.
#[derive(Default)]
pub struct Store {
    next_entity: u64,
    alive: BTreeSet<Entity>,
    storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("entities", &self.alive.len())
            .field("component_types", &self.storages.len())
            .finish()
    }
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a new entity; components are attached with
    /// [`EntityBuilder::with`].
    #[must_use]
    pub fn create(&mut self) -> EntityBuilder<'_> {
        let entity = self.spawn();
        EntityBuilder {
            store: self,
            entity,
        }
    }

    /// Allocates a new entity without components.
    pub fn spawn(&mut self) -> Entity {
        let entity = Entity(self.next_entity);
        self.next_entity += 1;
        let _ = self.alive.insert(entity);
        entity
    }

    /// Destroys the entity together with all of its components.
    ///
    /// Returns `false` when the entity was already gone.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.alive.remove(&entity) {
            return false;
        }
        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }
        true
    }

    /// Reports whether the entity exists.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    /// Reports whether the store holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Attaches a component, replacing any existing instance of that type.
    pub fn add<T: 'static>(&mut self, entity: Entity, component: T) -> Result<(), StoreError> {
        if !self.is_alive(entity) {
            return Err(StoreError::MissingEntity(entity));
        }
        self.storage_mut_or_insert::<T>().insert(entity, component);
        Ok(())
    }

    /// Detaches and returns a component; missing components yield `None`.
    pub fn remove<T: 'static>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Reports whether the entity carries a component of type `T`.
    #[must_use]
    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        self.storage::<T>()
            .map_or(false, |storage| storage.contains(entity))
    }

    /// Borrows a component that is required to exist.
    pub fn get<T: 'static>(&self, entity: Entity) -> Result<&T, StoreError> {
        match self.try_get::<T>(entity) {
            Some(component) => Ok(component),
            None => Err(self.missing::<T>(entity)),
        }
    }

    /// Mutably borrows a component that is required to exist.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Result<&mut T, StoreError> {
        let error = self.missing::<T>(entity);
        self.try_get_mut::<T>(entity).ok_or(error)
    }

    /// Borrows a component when present.
    #[must_use]
    pub fn try_get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Mutably borrows a component when present.
    pub fn try_get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// Iterates every `(entity, component)` pair of type `T`.
    pub fn query<T: 'static>(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.storage::<T>().into_iter().flat_map(|storage| {
            storage
                .entities
                .iter()
                .copied()
                .zip(storage.components.iter())
        })
    }

    /// Mutably iterates every `(entity, component)` pair of type `T`.
    pub fn query_mut<T: 'static>(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.storage_mut::<T>().into_iter().flat_map(|storage| {
            storage
                .entities
                .iter()
                .copied()
                .zip(storage.components.iter_mut())
        })
    }

    /// Iterates entities carrying both `A` and `B`, in `A`'s storage order.
    pub fn query2<A: 'static, B: 'static>(&self) -> impl Iterator<Item = (Entity, &A, &B)> + '_ {
        self.query::<A>()
            .filter_map(move |(entity, a)| self.try_get::<B>(entity).map(|b| (entity, a, b)))
    }

    /// Snapshots the entities matching signature `S` into `out`.
    ///
    /// `out` is cleared first so processors can reuse one scratch buffer
    /// across ticks.
    pub fn collect<S: Signature>(&self, out: &mut Vec<Entity>) {
        out.clear();
        S::collect_into(self, out);
    }

    /// Returns the first entity carrying `T`, for singleton components.
    pub fn first<T: 'static>(&self) -> Result<(Entity, &T), StoreError> {
        self.query::<T>().next().ok_or(StoreError::MissingSingleton {
            component: type_name::<T>(),
        })
    }

    /// Mutable counterpart of [`Store::first`].
    pub fn first_mut<T: 'static>(&mut self) -> Result<(Entity, &mut T), StoreError> {
        self.query_mut::<T>()
            .next()
            .ok_or(StoreError::MissingSingleton {
                component: type_name::<T>(),
            })
    }

    /// Iterates the live entities in creation order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.iter().copied()
    }

    fn missing<T: 'static>(&self, entity: Entity) -> StoreError {
        if self.is_alive(entity) {
            StoreError::MissingComponent {
                entity,
                component: type_name::<T>(),
            }
        } else {
            StoreError::MissingEntity(entity)
        }
    }

    fn storage<T: 'static>(&self) -> Option<&Storage<T>> {
        self.storages
            .get(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any().downcast_ref::<Storage<T>>())
    }

    fn storage_mut<T: 'static>(&mut self) -> Option<&mut Storage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any_mut().downcast_mut::<Storage<T>>())
    }

    fn storage_mut_or_insert<T: 'static>(&mut self) -> &mut Storage<T> {
        let storage = self
            .storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Storage::<T>::new()));
        match storage.as_any_mut().downcast_mut::<Storage<T>>() {
            Some(storage) => storage,
            None => unreachable!("storage registered under a foreign type id"),
        }
    }
}

/// Fluent builder returned by [`Store::create`].
#[derive(Debug)]
#[must_use]
pub struct EntityBuilder<'s> {
    store: &'s mut Store,
    entity: Entity,
}

impl EntityBuilder<'_> {
    /// Attaches a component to the entity under construction.
    pub fn with<T: 'static>(self, component: T) -> Self {
        self.store.storage_mut_or_insert::<T>().insert(self.entity, component);
        self
    }

    /// Attaches a component when one is supplied.
    pub fn with_opt<T: 'static>(self, component: Option<T>) -> Self {
        match component {
            Some(component) => self.with(component),
            None => self,
        }
    }

    /// Finishes construction and returns the entity handle.
    pub fn build(self) -> Entity {
        self.entity
    }
}

/// Component signatures usable with [`Store::collect`].
///
/// Implemented for tuples of up to four component types; the first type is
/// the primary storage that drives iteration order.
pub trait Signature {
    /// Appends every entity carrying all components of the signature.
    fn collect_into(store: &Store, out: &mut Vec<Entity>);
}

macro_rules! impl_signature {
    ($primary:ident $(, $rest:ident)*) => {
        impl<$primary: 'static $(, $rest: 'static)*> Signature for ($primary, $($rest,)*) {
            #[allow(unused_variables)]
            fn collect_into(store: &Store, out: &mut Vec<Entity>) {
                let Some(primary) = store.storage::<$primary>() else {
                    return;
                };
                out.extend(
                    primary
                        .entities
                        .iter()
                        .copied()
                        .filter(|&entity| true $(&& store.has::<$rest>(entity))*),
                );
            }
        }
    };
}

impl_signature!(A);
impl_signature!(A, B);
impl_signature!(A, B, C);
impl_signature!(A, B, C, D);
