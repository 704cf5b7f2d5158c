mod grid;

use std::fmt::Write as _;

use anyhow::{Context, bail};
use clap::Parser;
use engine_component::{ComponentTypeId, Entity};
use engine_defaults::{CoreScene, Curve};
use engine_math::Vec3;
use engine_reflection::{
    BlobProperty, ComponentMut, ComponentRef, InputStream, OutputStream, PropertyBase, Registry,
    RegistryConfig, ResourcePath, ReturnCopy, Variant,
};
use grid::{GridPlugin, PropertyGrid};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "engine-inspect", about = "Inspect reflected engine components")]
struct Args {
    /// Only show these components (string ids, repeatable)
    #[arg(short, long)]
    component: Vec<String>,

    /// Print the reflection schema as JSON instead of a property grid
    #[arg(long)]
    json: bool,

    /// Number of demo entities to spawn
    #[arg(short, long, default_value_t = 2)]
    entities: u32,

    /// Apply this much damage to the first entity through the reflected
    /// `damage` function before printing
    #[arg(long)]
    damage: Option<f32>,

    /// Fail on return-size mismatches
    #[arg(long)]
    strict: bool,
}

/// Shows curve keys instead of the raw blob size.
struct CurveKeys;

impl GridPlugin for CurveKeys {
    fn blob(
        &self,
        prop: &BlobProperty,
        target: &ComponentRef<'_>,
        index: Option<u32>,
        out: &mut String,
    ) -> bool {
        let mut stream = OutputStream::new();
        if prop.get_value(target, index, &mut stream).is_err() {
            return false;
        }
        let Ok(curve) = InputStream::new(stream.as_bytes()).read::<Curve>() else {
            return false;
        };
        let keys: Vec<String> = curve
            .keys
            .iter()
            .map(|(t, v)| format!("{t:.2}->{v:.2}"))
            .collect();
        let _ = writeln!(out, "  {}: [{}]", prop.name(), keys.join(", "));
        true
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "engine_inspect=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut registry = Registry::with_config(registry_config(&args));
    engine_defaults::register(&mut registry).context("registering core module")?;
    info!(components = registry.components().count(), "registry ready");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&registry.schema())?);
        return Ok(());
    }

    let shown = selected_components(&registry, &args.component)?;
    let mut scene = CoreScene::new();
    let entities = populate(&registry, &mut scene, args.entities)?;

    if let (Some(amount), Some(&first)) = (args.damage, entities.first()) {
        let taken = apply_damage(&registry, &mut scene, first, amount)?;
        info!(entity = %first, amount, taken, "damage applied");
    }

    let mut grid = PropertyGrid::new(&registry);
    grid.add_plugin(CurveKeys);
    for entity in scene.entities() {
        let present: Vec<ComponentTypeId> = shown
            .iter()
            .copied()
            .filter(|ty| {
                registry
                    .component(*ty)
                    .is_some_and(|cmp| scene.has_component(cmp.name(), entity))
            })
            .collect();
        println!("== {entity} ==");
        print!("{}", grid.render(&scene, entity, &present));
    }
    Ok(())
}

/// Environment settings, with `--strict` forcing strict returns on.
fn registry_config(args: &Args) -> RegistryConfig {
    let env = RegistryConfig::from_env();
    let strict = env.strict_returns || args.strict;
    env.with_strict_returns(strict)
}

fn selected_components(
    registry: &Registry,
    names: &[String],
) -> anyhow::Result<Vec<ComponentTypeId>> {
    if names.is_empty() {
        return Ok(registry.components().map(|c| c.component_type()).collect());
    }
    names
        .iter()
        .map(|name| match registry.component_type(name) {
            Some(ty) => Ok(ty),
            None => bail!("unknown component type: {name}"),
        })
        .collect()
}

/// Spawn `count` entities and fill them with components through the
/// reflection layer only.
fn populate(
    registry: &Registry,
    scene: &mut CoreScene,
    count: u32,
) -> anyhow::Result<Vec<Entity>> {
    let mut spawned = Vec::new();
    for i in 0..count {
        let entity = scene.spawn();
        for cmp in registry.components() {
            cmp.create(scene, entity)
                .with_context(|| format!("creating {} on {entity}", cmp.name()))?;
        }

        let ty = |name: &str| ComponentTypeId::from_name(name);
        let name = ty("name");
        registry.set_property_value(scene, entity, name, "value", None, format!("entity-{i}"))?;
        registry.set_property_value(scene, entity, name, "layer", None, "default".to_owned())?;
        let linear = Vec3::new(i as f32, 0.0, 1.0);
        registry.set_property_value(scene, entity, ty("velocity"), "linear", None, linear)?;
        registry.set_property_value(
            scene,
            entity,
            ty("mesh"),
            "source",
            None,
            ResourcePath::new(format!("models/prop_{i}.glb")),
        )?;

        let spline = ty("spline");
        if let Some(points) = registry.property(spline, "points").and_then(|p| p.as_array()) {
            for k in 0..3u32 {
                let index = points.add_item(&mut ComponentMut::new(scene, entity), None)?;
                registry.set_property_value(
                    scene,
                    entity,
                    spline,
                    "position",
                    Some(index),
                    Vec3::new(k as f32 * 2.0, 0.0, 0.0),
                )?;
            }
        } else {
            warn!("spline component has no points array");
        }

        let curve = ty("curve");
        if let Some(keys) = registry.property(curve, "keys").and_then(|p| p.as_blob()) {
            let mut stream = OutputStream::new();
            stream.write(&Curve {
                keys: vec![(0.0, 0.0), (1.0, 1.0 + i as f32)],
            })?;
            keys.set_value(
                &mut ComponentMut::new(scene, entity),
                None,
                &mut InputStream::new(stream.as_bytes()),
            )?;
        }
        spawned.push(entity);
    }
    Ok(spawned)
}

fn apply_damage(
    registry: &Registry,
    scene: &mut CoreScene,
    entity: Entity,
    amount: f32,
) -> anyhow::Result<f32> {
    let Some(damage) = registry.function("health", "damage") else {
        bail!("health component has no damage function");
    };
    let mut ret = [0u8; 4];
    let args = [Variant::Entity(entity), Variant::F32(amount)];
    match registry.invoke(damage, scene, &mut ret, &args)? {
        ReturnCopy::Copied => Ok(f32::from_le_bytes(ret)),
        other => bail!("unexpected return from damage: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_flag_enables_strict_returns() {
        let args = Args::parse_from(["engine-inspect", "--strict"]);
        assert!(registry_config(&args).strict_returns);
    }

    #[test]
    fn test_strict_registry_rejects_short_return_buffer() {
        let args = Args::parse_from(["engine-inspect", "--strict", "--entities", "1"]);
        let mut registry = Registry::with_config(registry_config(&args));
        engine_defaults::register(&mut registry).unwrap();
        let mut scene = CoreScene::new();
        let e = populate(&registry, &mut scene, args.entities).unwrap()[0];

        assert_eq!(apply_damage(&registry, &mut scene, e, 10.0).unwrap(), 10.0);
        let damage = registry.function("health", "damage").unwrap();
        let err = registry
            .invoke(damage, &mut scene, &mut [0u8; 2], &[Variant::Entity(e), Variant::F32(1.0)])
            .unwrap_err();
        assert!(err.to_string().contains("return buffer"));
    }
}
