//! Reflection registration of [`CoreScene`].

use engine_component::Entity;
use engine_math::{Color, DVec3, Quat, Vec3};
use engine_reflection::{
    ComponentRef, EnumSource, ModuleBuilder, ModuleDesc, ReflectionError, Registry, ResourcePath,
    ResourceType, StaticEnum, StructDesc,
};

use crate::components::{
    Curve, FogSettings, Health, Light, LightKind, MeshRef, Name, Spline, SplinePoint, Velocity,
};
use crate::scene::{CURVE, CoreScene, HEALTH, LIGHT, MESH, NAME, SPLINE, VELOCITY};

pub const MODULE_NAME: &str = "core";

pub const MODEL: ResourceType = ResourceType::new("model");

/// Offers the layer names of the scene being edited.
#[derive(Debug, Clone, Copy)]
struct SceneLayers;

impl SceneLayers {
    fn layers<'a>(cmp: &ComponentRef<'a>) -> &'a [String] {
        cmp.module
            .downcast_ref::<CoreScene>()
            .map(CoreScene::layers)
            .unwrap_or_default()
    }
}

impl EnumSource for SceneLayers {
    fn count(&self, cmp: &ComponentRef<'_>) -> u32 {
        Self::layers(cmp).len() as u32
    }

    fn name(&self, cmp: &ComponentRef<'_>, index: u32) -> Option<String> {
        Self::layers(cmp).get(index as usize).cloned()
    }
}

fn point(scene: &CoreScene, e: Entity, i: u32) -> SplinePoint {
    scene
        .splines
        .get(&e)
        .and_then(|s| s.points.get(i as usize))
        .copied()
        .unwrap_or_default()
}

fn point_mut(scene: &mut CoreScene, e: Entity, i: u32) -> Option<&mut SplinePoint> {
    scene
        .splines
        .get_mut(&e)
        .and_then(|s| s.points.get_mut(i as usize))
}

/// Describe the core scene module.
///
/// # Errors
///
/// Returns a [`ReflectionError`] if the registration is malformed.
pub fn core_module() -> Result<ModuleDesc, ReflectionError> {
    ModuleBuilder::new(MODULE_NAME)
        .function("spawn", |s: &mut CoreScene| s.spawn())
        .function("entity_count", |s: &mut CoreScene| s.entity_count())
        .function("world_origin", |s: &mut CoreScene| s.world_origin())
        .function("set_world_origin", |s: &mut CoreScene, origin: DVec3| {
            s.set_world_origin(origin);
        })
        .event("on_damaged", |s: &mut CoreScene| &mut s.on_damaged)
        .event("on_spawned", |s: &mut CoreScene| &mut s.on_spawned)
        .structure(
            StructDesc::<FogSettings>::new("fog")
                .field("enabled", |f| &f.enabled, |f| &mut f.enabled)
                .field("density", |f| &f.density, |f| &mut f.density)
                .field("color", |f| &f.color, |f| &mut f.color),
        )
        // Health
        .cmp(
            HEALTH,
            "Health",
            |s: &mut CoreScene, e| {
                s.health.insert(e, Health::default());
            },
            |s: &mut CoreScene, e| {
                s.health.remove(&e);
            },
        )
        .icon("heart")
        .prop(
            "current",
            |s: &CoreScene, e| s.health.get(&e).map_or(0.0, |h| h.current),
            |s: &mut CoreScene, e, v| {
                if let Some(h) = s.health.get_mut(&e) {
                    h.current = v.min(h.max);
                }
            },
        )
        .min_attribute(0.0)
        .prop(
            "max",
            |s: &CoreScene, e| s.health.get(&e).map_or(0.0, |h| h.max),
            |s: &mut CoreScene, e, v| {
                if let Some(h) = s.health.get_mut(&e) {
                    h.max = v;
                }
            },
        )
        .min_attribute(1.0)
        .prop(
            "invulnerable",
            |s: &CoreScene, e| s.health.get(&e).is_some_and(|h| h.invulnerable),
            |s: &mut CoreScene, e, v| {
                if let Some(h) = s.health.get_mut(&e) {
                    h.invulnerable = v;
                }
            },
        )
        .readonly_prop("alive", |s: &CoreScene, e| {
            s.health.get(&e).is_some_and(Health::is_alive)
        })
        .function("damage", |s: &mut CoreScene, e: Entity, amount: f32| {
            s.damage(e, amount)
        })
        .function("heal", |s: &mut CoreScene, e: Entity, amount: f32| s.heal(e, amount))
        // Velocity
        .cmp(
            VELOCITY,
            "Velocity",
            |s: &mut CoreScene, e| {
                s.velocity.insert(e, Velocity::default());
            },
            |s: &mut CoreScene, e| {
                s.velocity.remove(&e);
            },
        )
        .icon("arrow")
        .prop(
            "linear",
            |s: &CoreScene, e| s.velocity.get(&e).map_or(Vec3::ZERO, |v| v.linear),
            |s: &mut CoreScene, e, v| {
                if let Some(vel) = s.velocity.get_mut(&e) {
                    vel.linear = v;
                }
            },
        )
        .prop(
            "spin",
            |s: &CoreScene, e| s.velocity.get(&e).map_or(0.0, |v| v.spin),
            |s: &mut CoreScene, e, v| {
                if let Some(vel) = s.velocity.get_mut(&e) {
                    vel.spin = v;
                }
            },
        )
        .radians_attribute()
        .function("rotate", |s: &mut CoreScene, e: Entity, q: Quat| {
            s.rotate_velocity(e, q)
        })
        // Name
        .cmp(
            NAME,
            "Name",
            |s: &mut CoreScene, e| {
                s.names.insert(e, Name::new(format!("entity {}", e.id())));
            },
            |s: &mut CoreScene, e| {
                s.names.remove(&e);
            },
        )
        .prop(
            "value",
            |s: &CoreScene, e| s.names.get(&e).map(|n| n.value.clone()).unwrap_or_default(),
            |s: &mut CoreScene, e, v| {
                if let Some(n) = s.names.get_mut(&e) {
                    n.value = v;
                }
            },
        )
        .prop(
            "layer",
            |s: &CoreScene, e| s.names.get(&e).map(|n| n.layer.clone()).unwrap_or_default(),
            |s: &mut CoreScene, e, v| {
                if let Some(n) = s.names.get_mut(&e) {
                    n.layer = v;
                }
            },
        )
        .string_enum_attribute(SceneLayers)
        .prop(
            "notes",
            |s: &CoreScene, e| s.names.get(&e).map(|n| n.notes.clone()).unwrap_or_default(),
            |s: &mut CoreScene, e, v| {
                if let Some(n) = s.names.get_mut(&e) {
                    n.notes = v;
                }
            },
        )
        .multiline_attribute()
        // Mesh
        .cmp(
            MESH,
            "Mesh",
            |s: &mut CoreScene, e| {
                s.meshes.insert(e, MeshRef::default());
            },
            |s: &mut CoreScene, e| {
                s.meshes.remove(&e);
            },
        )
        .icon("cube")
        .prop(
            "source",
            |s: &CoreScene, e| {
                ResourcePath::new(s.meshes.get(&e).map(|m| m.asset_path.clone()).unwrap_or_default())
            },
            |s: &mut CoreScene, e, v: ResourcePath| {
                if let Some(m) = s.meshes.get_mut(&e) {
                    m.asset_path = v.0;
                }
            },
        )
        .resource_attribute(MODEL)
        .prop(
            "cast_shadows",
            |s: &CoreScene, e| s.meshes.get(&e).is_some_and(|m| m.cast_shadows),
            |s: &mut CoreScene, e, v| {
                if let Some(m) = s.meshes.get_mut(&e) {
                    m.cast_shadows = v;
                }
            },
        )
        .prop(
            "layer_mask",
            |s: &CoreScene, e| s.meshes.get(&e).map_or(0, |m| m.layer_mask),
            |s: &mut CoreScene, e, v| {
                if let Some(m) = s.meshes.get_mut(&e) {
                    m.layer_mask = v;
                }
            },
        )
        .no_ui_attribute()
        // Light
        .cmp(
            LIGHT,
            "Light",
            |s: &mut CoreScene, e| {
                s.lights.insert(e, Light::default());
            },
            |s: &mut CoreScene, e| {
                s.lights.remove(&e);
            },
        )
        .icon("lightbulb")
        .enum_prop(
            "kind",
            |s: &CoreScene, e| s.lights.get(&e).map_or(LightKind::Point, |l| l.kind),
            |s: &mut CoreScene, e, v| {
                if let Some(l) = s.lights.get_mut(&e) {
                    l.kind = v;
                }
            },
            StaticEnum(LightKind::NAMES),
        )
        .prop(
            "color",
            |s: &CoreScene, e| s.lights.get(&e).map_or(Vec3::ONE, |l| l.color),
            |s: &mut CoreScene, e, v| {
                if let Some(l) = s.lights.get_mut(&e) {
                    l.color = v;
                }
            },
        )
        .color_attribute()
        .prop(
            "intensity",
            |s: &CoreScene, e| s.lights.get(&e).map_or(0.0, |l| l.intensity),
            |s: &mut CoreScene, e, v| {
                if let Some(l) = s.lights.get_mut(&e) {
                    l.intensity = v;
                }
            },
        )
        .min_attribute(0.0)
        .prop(
            "range",
            |s: &CoreScene, e| s.lights.get(&e).map_or(0.0, |l| l.range),
            |s: &mut CoreScene, e, v| {
                if let Some(l) = s.lights.get_mut(&e) {
                    l.range = v;
                }
            },
        )
        .clamp_attribute(0.0, 1000.0)
        .prop(
            "cone",
            |s: &CoreScene, e| s.lights.get(&e).map_or(0.0, |l| l.cone),
            |s: &mut CoreScene, e, v| {
                if let Some(l) = s.lights.get_mut(&e) {
                    l.cone = v;
                }
            },
        )
        .radians_attribute()
        .function("tint", |s: &mut CoreScene, e: Entity, color: Color| {
            s.tint_light(e, color);
        })
        // Spline
        .cmp(
            SPLINE,
            "Spline",
            |s: &mut CoreScene, e| {
                s.splines.insert(e, Spline::default());
            },
            |s: &mut CoreScene, e| {
                s.splines.remove(&e);
            },
        )
        .prop(
            "closed",
            |s: &CoreScene, e| s.splines.get(&e).is_some_and(|sp| sp.closed),
            |s: &mut CoreScene, e, v| {
                if let Some(sp) = s.splines.get_mut(&e) {
                    sp.closed = v;
                }
            },
        )
        .begin_array(
            "points",
            |s: &CoreScene, e| s.splines.get(&e).map_or(0, |sp| sp.points.len() as u32),
            |s: &mut CoreScene, e, i| {
                if let Some(sp) = s.splines.get_mut(&e) {
                    sp.points.insert(i as usize, SplinePoint::default());
                }
            },
            |s: &mut CoreScene, e, i| {
                if let Some(sp) = s.splines.get_mut(&e) {
                    sp.points.remove(i as usize);
                }
            },
        )
        .item_prop(
            "position",
            |s: &CoreScene, e, i| point(s, e, i).position,
            |s: &mut CoreScene, e, i, v| {
                if let Some(p) = point_mut(s, e, i) {
                    p.position = v;
                }
            },
        )
        .item_prop(
            "weight",
            |s: &CoreScene, e, i| point(s, e, i).weight,
            |s: &mut CoreScene, e, i, v| {
                if let Some(p) = point_mut(s, e, i) {
                    p.weight = v;
                }
            },
        )
        .clamp_attribute(0.0, 1.0)
        .end_array()
        .readonly_prop("length", |s: &CoreScene, e| s.spline_length(e))
        // Curve
        .cmp(
            CURVE,
            "Curve",
            |s: &mut CoreScene, e| {
                s.curves.insert(e, Curve::default());
            },
            |s: &mut CoreScene, e| {
                s.curves.remove(&e);
            },
        )
        .blob_prop(
            "keys",
            |s: &CoreScene, e| s.curves.get(&e).cloned().unwrap_or_default(),
            |s: &mut CoreScene, e, v: Curve| {
                if let Some(c) = s.curves.get_mut(&e) {
                    *c = v;
                }
            },
        )
        .function("sample", |s: &mut CoreScene, e: Entity, t: f32| s.sample_curve(e, t))
        .finish()
}

/// Register the core module into `registry`.
///
/// # Errors
///
/// Returns a [`ReflectionError`] if the module is malformed or already
/// registered.
pub fn register(registry: &mut Registry) -> Result<(), ReflectionError> {
    registry.register_module(core_module()?)
}
