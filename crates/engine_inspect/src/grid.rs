//! Text property grid.
//!
//! Renders the components of one entity as indented `name: value` rows by
//! walking each component with a [`PropertyVisitor`]. Attributes shape the
//! output: `NoUi` rows are hidden, `Radians` values are shown in degrees,
//! enum values by name, colours as hex. [`GridPlugin`]s can take over a whole
//! component or a single blob property.

use std::any::Any;
use std::fmt::Write;

use engine_component::{ComponentTypeId, Entity};
use engine_math::{Color, IVec3, Vec2, Vec3, Vec4};
use engine_reflection::{
    ArrayProperty, Attribute, AttributeKind, BlobProperty, ComponentDesc, ComponentRef, OutputStream,
    Property, PropertyBase, PropertyValue, PropertyVisitor, ReflectionError, Registry,
    ResourcePath,
};

/// Extension point for custom rendering.
///
/// Each hook returns `true` if it wrote the output itself, which replaces the
/// default rendering.
pub trait GridPlugin {
    fn component(&self, _cmp: &ComponentDesc, _target: &ComponentRef<'_>, _out: &mut String) -> bool {
        false
    }

    fn blob(
        &self,
        _prop: &BlobProperty,
        _target: &ComponentRef<'_>,
        _index: Option<u32>,
        _out: &mut String,
    ) -> bool {
        false
    }
}

/// Renders entities against a [`Registry`].
pub struct PropertyGrid<'r> {
    registry: &'r Registry,
    plugins: Vec<Box<dyn GridPlugin>>,
}

impl<'r> PropertyGrid<'r> {
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            plugins: Vec::new(),
        }
    }

    pub fn add_plugin(&mut self, plugin: impl GridPlugin + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    /// Render `components` of `entity` held by `module`. Unknown component
    /// types are skipped.
    #[must_use]
    pub fn render(&self, module: &dyn Any, entity: Entity, components: &[ComponentTypeId]) -> String {
        let mut out = String::new();
        let target = ComponentRef::new(module, entity);
        for &ty in components {
            let Some(cmp) = self.registry.component(ty) else {
                continue;
            };
            let _ = writeln!(out, "[{}]", cmp.label());
            if self.plugins.iter().any(|p| p.component(cmp, &target, &mut out)) {
                continue;
            }
            let mut rows = RowWriter {
                out: &mut out,
                target,
                index: None,
                depth: 1,
                plugins: &self.plugins,
            };
            cmp.visit(&mut rows);
        }
        out
    }
}

/// Formats a value for display, applying the property's attributes.
trait Cell {
    fn cell(&self, prop: &dyn PropertyBase, target: &ComponentRef<'_>) -> String;
}

impl Cell for f32 {
    fn cell(&self, prop: &dyn PropertyBase, _target: &ComponentRef<'_>) -> String {
        if prop.attribute(AttributeKind::Radians).is_some() {
            format!("{:.2} deg", self.to_degrees())
        } else {
            format!("{self:.3}")
        }
    }
}

impl Cell for i32 {
    fn cell(&self, prop: &dyn PropertyBase, target: &ComponentRef<'_>) -> String {
        let Some(Attribute::Enum(source)) = prop.attribute(AttributeKind::Enum) else {
            return self.to_string();
        };
        u32::try_from(*self)
            .ok()
            .and_then(|i| source.name(target, i))
            .unwrap_or_else(|| format!("<{self}>"))
    }
}

impl Cell for u32 {
    fn cell(&self, _prop: &dyn PropertyBase, _target: &ComponentRef<'_>) -> String {
        self.to_string()
    }
}

impl Cell for bool {
    fn cell(&self, _prop: &dyn PropertyBase, _target: &ComponentRef<'_>) -> String {
        self.to_string()
    }
}

impl Cell for Entity {
    fn cell(&self, _prop: &dyn PropertyBase, _target: &ComponentRef<'_>) -> String {
        match self.valid() {
            Some(e) => e.to_string(),
            None => "none".to_owned(),
        }
    }
}

impl Cell for Vec2 {
    fn cell(&self, _prop: &dyn PropertyBase, _target: &ComponentRef<'_>) -> String {
        format!("({:.3}, {:.3})", self.x, self.y)
    }
}

impl Cell for Vec3 {
    fn cell(&self, prop: &dyn PropertyBase, _target: &ComponentRef<'_>) -> String {
        if prop.attribute(AttributeKind::Color).is_some() {
            return hex(Color::from_vec3(*self));
        }
        format!("({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl Cell for Vec4 {
    fn cell(&self, prop: &dyn PropertyBase, _target: &ComponentRef<'_>) -> String {
        if prop.attribute(AttributeKind::Color).is_some() {
            return hex(Color::from_vec4(*self));
        }
        format!("({:.3}, {:.3}, {:.3}, {:.3})", self.x, self.y, self.z, self.w)
    }
}

impl Cell for IVec3 {
    fn cell(&self, _prop: &dyn PropertyBase, _target: &ComponentRef<'_>) -> String {
        format!("({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Cell for ResourcePath {
    fn cell(&self, prop: &dyn PropertyBase, _target: &ComponentRef<'_>) -> String {
        let shown = if self.is_empty() { "<none>" } else { self.as_str() };
        match prop.attribute(AttributeKind::Resource) {
            Some(Attribute::Resource(ty)) => format!("{shown} ({})", ty.name),
            _ => shown.to_owned(),
        }
    }
}

impl Cell for String {
    fn cell(&self, prop: &dyn PropertyBase, target: &ComponentRef<'_>) -> String {
        if prop.attribute(AttributeKind::Multiline).is_some() {
            return self.replace('\n', " / ");
        }
        if let Some(Attribute::StringEnum(source)) = prop.attribute(AttributeKind::StringEnum) {
            let known = (0..source.count(target)).any(|i| source.name(target, i).as_ref() == Some(self));
            if !known {
                return format!("{self:?} (unknown)");
            }
        }
        format!("{self:?}")
    }
}

fn hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

struct RowWriter<'a, 'm> {
    out: &'a mut String,
    target: ComponentRef<'m>,
    index: Option<u32>,
    depth: usize,
    plugins: &'a [Box<dyn GridPlugin>],
}

impl RowWriter<'_, '_> {
    fn row(&mut self, name: &str, value: &str) {
        let indent = "  ".repeat(self.depth);
        let _ = writeln!(self.out, "{indent}{name}: {value}");
    }

    fn value<T: PropertyValue + Cell>(&mut self, prop: &Property<T>) {
        if prop.attribute(AttributeKind::NoUi).is_some() {
            return;
        }
        let cell = match prop.get(&self.target, self.index) {
            Ok(value) => value.cell(prop, &self.target),
            Err(err) => error_cell(&err),
        };
        let cell = if prop.is_readonly() {
            format!("{cell} (read-only)")
        } else {
            cell
        };
        self.row(prop.name(), &cell);
    }
}

fn error_cell(err: &ReflectionError) -> String {
    format!("<error: {err}>")
}

impl PropertyVisitor for RowWriter<'_, '_> {
    fn visit_f32(&mut self, prop: &Property<f32>) {
        self.value(prop);
    }
    fn visit_i32(&mut self, prop: &Property<i32>) {
        self.value(prop);
    }
    fn visit_u32(&mut self, prop: &Property<u32>) {
        self.value(prop);
    }
    fn visit_entity(&mut self, prop: &Property<Entity>) {
        self.value(prop);
    }
    fn visit_vec2(&mut self, prop: &Property<Vec2>) {
        self.value(prop);
    }
    fn visit_vec3(&mut self, prop: &Property<Vec3>) {
        self.value(prop);
    }
    fn visit_vec4(&mut self, prop: &Property<Vec4>) {
        self.value(prop);
    }
    fn visit_ivec3(&mut self, prop: &Property<IVec3>) {
        self.value(prop);
    }
    fn visit_path(&mut self, prop: &Property<ResourcePath>) {
        self.value(prop);
    }
    fn visit_bool(&mut self, prop: &Property<bool>) {
        self.value(prop);
    }
    fn visit_string(&mut self, prop: &Property<String>) {
        self.value(prop);
    }

    fn visit_array(&mut self, prop: &ArrayProperty) {
        let count = match prop.count(&self.target) {
            Ok(count) => count,
            Err(err) => {
                self.row(prop.name(), &error_cell(&err));
                return;
            }
        };
        self.row(prop.name(), &format!("[{count}]"));
        if prop.attribute(AttributeKind::NoUi).is_some() {
            return;
        }
        for index in 0..count {
            let indent = "  ".repeat(self.depth + 1);
            let _ = writeln!(self.out, "{indent}#{index}");
            let mut item = RowWriter {
                out: &mut *self.out,
                target: self.target,
                index: Some(index),
                depth: self.depth + 2,
                plugins: self.plugins,
            };
            prop.visit_children(&mut item);
        }
    }

    fn visit_blob(&mut self, prop: &BlobProperty) {
        if self
            .plugins
            .iter()
            .any(|p| p.blob(prop, &self.target, self.index, &mut *self.out))
        {
            return;
        }
        let mut stream = OutputStream::new();
        let cell = match prop.get_value(&self.target, self.index, &mut stream) {
            Ok(()) => format!("<blob {} bytes>", stream.len()),
            Err(err) => error_cell(&err),
        };
        self.row(prop.name(), &cell);
    }
}

#[cfg(test)]
mod tests {
    use engine_defaults::{CoreScene, Curve};
    use engine_reflection::InputStream;

    use super::*;

    fn setup() -> (Registry, CoreScene, Entity) {
        let mut registry = Registry::new();
        engine_defaults::register(&mut registry).unwrap();
        let mut scene = CoreScene::new();
        let e = scene.spawn();
        for name in ["health", "light", "spline", "mesh", "curve"] {
            registry
                .component_by_name(name)
                .unwrap()
                .create(&mut scene, e)
                .unwrap();
        }
        (registry, scene, e)
    }

    fn types(names: &[&str]) -> Vec<ComponentTypeId> {
        names.iter().map(|n| ComponentTypeId::from_name(n)).collect()
    }

    #[test]
    fn test_render_scalars_and_attributes() {
        let (registry, scene, e) = setup();
        let grid = PropertyGrid::new(&registry);
        let text = grid.render(&scene, e, &types(&["health", "light"]));
        assert!(text.contains("[Health]"));
        assert!(text.contains("  current: 100.000"));
        assert!(text.contains("  alive: true (read-only)"));
        assert!(text.contains("  kind: point"));
        assert!(text.contains("  color: #ffffff"));
        assert!(text.contains("  cone: 45.00 deg"));
    }

    #[test]
    fn test_render_hides_no_ui_and_shows_resources() {
        let (registry, scene, e) = setup();
        let text = PropertyGrid::new(&registry).render(&scene, e, &types(&["mesh"]));
        assert!(!text.contains("layer_mask"));
        assert!(text.contains("source: <none> (model)"));
    }

    #[test]
    fn test_render_array_items() {
        let (registry, mut scene, e) = setup();
        let ty = ComponentTypeId::from_name("spline");
        let points = registry.property(ty, "points").unwrap().as_array().unwrap();
        for _ in 0..2 {
            points
                .add_item(&mut engine_reflection::ComponentMut::new(&mut scene, e), None)
                .unwrap();
        }
        let text = PropertyGrid::new(&registry).render(&scene, e, &[ty]);
        assert!(text.contains("points: [2]"));
        assert!(text.contains("#1"));
        assert_eq!(text.matches("position: ").count(), 2);
    }

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
            let _ = writeln!(out, "  keys: {} keys", curve.keys.len());
            true
        }
    }

    #[test]
    fn test_blob_default_and_plugin() {
        let (registry, scene, e) = setup();
        let ty = types(&["curve"]);
        let plain = PropertyGrid::new(&registry).render(&scene, e, &ty);
        assert!(plain.contains("keys: <blob"));

        let mut grid = PropertyGrid::new(&registry);
        grid.add_plugin(CurveKeys);
        assert!(grid.render(&scene, e, &ty).contains("keys: 0 keys"));
    }

    struct HideHealth;

    impl GridPlugin for HideHealth {
        fn component(&self, cmp: &ComponentDesc, _target: &ComponentRef<'_>, out: &mut String) -> bool {
            if cmp.name() != "health" {
                return false;
            }
            out.push_str("  (hidden)\n");
            true
        }
    }

    #[test]
    fn test_component_plugin_replaces_rows() {
        let (registry, scene, e) = setup();
        let mut grid = PropertyGrid::new(&registry);
        grid.add_plugin(HideHealth);
        let text = grid.render(&scene, e, &types(&["health"]));
        assert!(text.contains("(hidden)"));
        assert!(!text.contains("current"));
    }

    #[test]
    fn test_render_integer_vector() {
        use std::collections::HashMap;

        use engine_reflection::ModuleBuilder;

        #[derive(Default)]
        struct Tiles {
            cells: HashMap<Entity, IVec3>,
        }

        let module = ModuleBuilder::new("tiles")
            .cmp(
                "tile",
                "Tile",
                |t: &mut Tiles, e| {
                    t.cells.insert(e, IVec3::new(2, -1, 7));
                },
                |t: &mut Tiles, e| {
                    t.cells.remove(&e);
                },
            )
            .prop(
                "cell",
                |t: &Tiles, e| t.cells.get(&e).copied().unwrap_or_default(),
                |t: &mut Tiles, e, v: IVec3| {
                    t.cells.insert(e, v);
                },
            )
            .finish()
            .unwrap();
        let mut registry = Registry::new();
        registry.register_module(module).unwrap();

        let mut tiles = Tiles::default();
        let e = Entity(1);
        registry.component_by_name("tile").unwrap().create(&mut tiles, e).unwrap();
        let text = PropertyGrid::new(&registry).render(&tiles, e, &types(&["tile"]));
        assert!(text.contains("  cell: (2, -1, 7)"));
    }
}
