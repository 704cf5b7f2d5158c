//! The core scene: component storage for the built-in components.

use std::collections::{BTreeSet, HashMap};

use engine_component::{Entity, EntityAllocator};
use engine_math::{Color, DVec3, Quat, Vec3};
use engine_reflection::DelegateList;
use tracing::debug;

use crate::components::{Curve, FogSettings, Health, Light, MeshRef, Name, Spline, Velocity};

pub const HEALTH: &str = "health";
pub const VELOCITY: &str = "velocity";
pub const NAME: &str = "name";
pub const MESH: &str = "mesh";
pub const LIGHT: &str = "light";
pub const SPLINE: &str = "spline";
pub const CURVE: &str = "curve";

/// Owns every built-in component of one world.
///
/// Components are stored per type, keyed by entity. Component creation and
/// removal go through the reflected lifecycle callbacks, so tooling can add
/// and remove components by name.
#[derive(Debug)]
pub struct CoreScene {
    allocator: EntityAllocator,
    alive: BTreeSet<Entity>,
    origin: DVec3,
    layers: Vec<String>,
    pub(crate) fog: FogSettings,
    pub(crate) health: HashMap<Entity, Health>,
    pub(crate) velocity: HashMap<Entity, Velocity>,
    pub(crate) names: HashMap<Entity, Name>,
    pub(crate) meshes: HashMap<Entity, MeshRef>,
    pub(crate) lights: HashMap<Entity, Light>,
    pub(crate) splines: HashMap<Entity, Spline>,
    pub(crate) curves: HashMap<Entity, Curve>,
    /// Raised with the entity and the damage actually taken.
    pub on_damaged: DelegateList<(Entity, f32)>,
    pub on_spawned: DelegateList<(Entity,)>,
}

impl CoreScene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            alive: BTreeSet::new(),
            origin: DVec3::ZERO,
            layers: vec!["default".into(), "ui".into(), "effects".into()],
            fog: FogSettings::default(),
            health: HashMap::new(),
            velocity: HashMap::new(),
            names: HashMap::new(),
            meshes: HashMap::new(),
            lights: HashMap::new(),
            splines: HashMap::new(),
            curves: HashMap::new(),
            on_damaged: DelegateList::new(),
            on_spawned: DelegateList::new(),
        }
    }

    /// Allocate a new entity with no components.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.alive.insert(entity);
        debug!(%entity, "entity spawned");
        self.on_spawned.invoke((entity,));
        entity
    }

    /// Remove an entity and all of its components.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.alive.remove(&entity) {
            return false;
        }
        self.health.remove(&entity);
        self.velocity.remove(&entity);
        self.names.remove(&entity);
        self.meshes.remove(&entity);
        self.lights.remove(&entity);
        self.splines.remove(&entity);
        self.curves.remove(&entity);
        true
    }

    /// Live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.iter().copied()
    }

    #[must_use]
    pub fn entity_count(&self) -> u32 {
        self.alive.len() as u32
    }

    /// Returns `true` if `entity` has the component with string id `name`.
    #[must_use]
    pub fn has_component(&self, name: &str, entity: Entity) -> bool {
        match name {
            HEALTH => self.health.contains_key(&entity),
            VELOCITY => self.velocity.contains_key(&entity),
            NAME => self.names.contains_key(&entity),
            MESH => self.meshes.contains_key(&entity),
            LIGHT => self.lights.contains_key(&entity),
            SPLINE => self.splines.contains_key(&entity),
            CURVE => self.curves.contains_key(&entity),
            _ => false,
        }
    }

    /// Layer names offered for [`Name::layer`].
    #[must_use]
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn add_layer(&mut self, name: impl Into<String>) {
        self.layers.push(name.into());
    }

    #[must_use]
    pub fn world_origin(&self) -> DVec3 {
        self.origin
    }

    pub fn set_world_origin(&mut self, origin: DVec3) {
        self.origin = origin;
    }

    #[must_use]
    pub fn fog(&self) -> &FogSettings {
        &self.fog
    }

    pub fn fog_mut(&mut self) -> &mut FogSettings {
        &mut self.fog
    }

    #[must_use]
    pub fn health(&self, entity: Entity) -> Option<&Health> {
        self.health.get(&entity)
    }

    #[must_use]
    pub fn velocity(&self, entity: Entity) -> Option<&Velocity> {
        self.velocity.get(&entity)
    }

    #[must_use]
    pub fn name(&self, entity: Entity) -> Option<&Name> {
        self.names.get(&entity)
    }

    #[must_use]
    pub fn mesh(&self, entity: Entity) -> Option<&MeshRef> {
        self.meshes.get(&entity)
    }

    #[must_use]
    pub fn light(&self, entity: Entity) -> Option<&Light> {
        self.lights.get(&entity)
    }

    #[must_use]
    pub fn spline(&self, entity: Entity) -> Option<&Spline> {
        self.splines.get(&entity)
    }

    #[must_use]
    pub fn curve(&self, entity: Entity) -> Option<&Curve> {
        self.curves.get(&entity)
    }

    /// Apply damage and raise [`on_damaged`](Self::on_damaged) if any was
    /// taken. Returns the damage taken.
    pub fn damage(&mut self, entity: Entity, amount: f32) -> f32 {
        let Some(health) = self.health.get_mut(&entity) else {
            return 0.0;
        };
        let taken = health.damage(amount);
        if taken > 0.0 {
            self.on_damaged.invoke((entity, taken));
        }
        taken
    }

    pub fn heal(&mut self, entity: Entity, amount: f32) {
        if let Some(health) = self.health.get_mut(&entity) {
            health.heal(amount);
        }
    }

    /// Rotate the linear velocity of `entity` by `rotation`; returns the new
    /// velocity.
    pub fn rotate_velocity(&mut self, entity: Entity, rotation: Quat) -> Vec3 {
        match self.velocity.get_mut(&entity) {
            Some(v) => {
                v.linear = rotation * v.linear;
                v.linear
            }
            None => Vec3::ZERO,
        }
    }

    pub fn tint_light(&mut self, entity: Entity, color: Color) {
        if let Some(light) = self.lights.get_mut(&entity) {
            light.tint(color);
        }
    }

    #[must_use]
    pub fn spline_length(&self, entity: Entity) -> f32 {
        self.splines.get(&entity).map_or(0.0, Spline::length)
    }

    #[must_use]
    pub fn sample_curve(&self, entity: Entity, t: f32) -> f32 {
        self.curves.get(&entity).map_or(0.0, |c| c.sample(t))
    }
}

impl Default for CoreScene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_spawn_and_despawn() {
        let mut scene = CoreScene::new();
        let a = scene.spawn();
        let b = scene.spawn();
        assert_eq!(scene.entities().collect::<Vec<_>>(), vec![a, b]);
        scene.health.insert(a, Health::default());
        assert!(scene.has_component(HEALTH, a));
        assert!(scene.despawn(a));
        assert!(!scene.despawn(a));
        assert!(!scene.has_component(HEALTH, a));
        assert_eq!(scene.entity_count(), 1);
    }

    #[test]
    fn test_damage_raises_event() {
        let mut scene = CoreScene::new();
        let e = scene.spawn();
        scene.health.insert(e, Health::full(10.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        scene.on_damaged.bind(move |args| sink.borrow_mut().push(args));

        assert_eq!(scene.damage(e, 4.0), 4.0);
        assert_eq!(scene.damage(e, 20.0), 6.0);
        assert_eq!(scene.damage(e, 1.0), 0.0);
        assert_eq!(*seen.borrow(), vec![(e, 4.0), (e, 6.0)]);
    }

    #[test]
    fn test_rotate_velocity() {
        let mut scene = CoreScene::new();
        let e = scene.spawn();
        scene.velocity.insert(e, Velocity::new(1.0, 0.0, 0.0));
        let v = scene.rotate_velocity(e, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        assert!((v - Vec3::Y).length() < 1e-6);
        assert_eq!(scene.rotate_velocity(Entity(99), Quat::IDENTITY), Vec3::ZERO);
    }
}
