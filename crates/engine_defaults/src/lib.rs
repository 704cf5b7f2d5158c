//! # engine_defaults
//!
//! The built-in `core` module: a [`CoreScene`] holding health, velocity,
//! name, mesh, light, spline and curve components, and its reflection
//! registration.
//!
//! ```ignore
//! let mut registry = Registry::new();
//! engine_defaults::register(&mut registry)?;
//! let mut scene = CoreScene::new();
//! let e = scene.spawn();
//! registry.component_by_name("health").unwrap().create(&mut scene, e)?;
//! ```

pub mod components;
pub mod module;
pub mod scene;

pub use components::{
    Curve, FogSettings, Health, Light, LightKind, MeshRef, Name, Spline, SplinePoint, Velocity,
};
pub use module::{MODEL, MODULE_NAME, core_module, register};
pub use scene::CoreScene;
