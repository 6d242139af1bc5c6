use crate::error::{Error, Result};
use crate::io::config::{CameraConfig, Config, LightConfig, ObjectConfig};
use crate::io::obj_loader::load_obj;
use crate::pipeline::renderer::{DepthSort, RenderSettings};
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::light::Light;
use crate::scene::mesh::{Mesh, Shading};
use crate::scene::thing::Thing;
use crate::scene::utils::{normalize_and_center, scale_mesh};
use log::{info, warn};
use nalgebra::{Point3, Vector3};

/// Converts one `[[lights]]` entry.
pub fn build_light(config: &LightConfig) -> Result<Light> {
    let color = Vector3::from(config.color);
    let light = match config.r#type.to_ascii_lowercase().as_str() {
        "point" => {
            let position = config.position.map(Point3::from).unwrap_or_else(Point3::origin);
            Light::new_point(position, config.strength, config.radius)
        }
        "sun" | "directional" => match (config.direction, config.angles) {
            (Some(dir), _) => Light::new_sun(Vector3::from(dir), config.strength),
            (None, Some(angles)) => Light::sun_from_angles(Vector3::from(angles), config.strength),
            (None, None) => Light::sun_from_angles(Vector3::zeros(), config.strength),
        },
        _ => return Err(Error::UnknownLight(config.r#type.clone())),
    };
    Ok(light.with_color(color))
}

/// Helper to build the light list; entries of unknown type are skipped.
pub fn build_lights_from_config(config: &Config) -> Vec<Light> {
    config
        .lights
        .iter()
        .filter_map(|l| match build_light(l) {
            Ok(light) => Some(light),
            Err(e) => {
                warn!("Skipping light: {}", e);
                None
            }
        })
        .collect()
}

pub fn build_camera(config: &CameraConfig, width: u32, height: u32) -> Result<Camera> {
    if !(config.fov > 0.0 && config.fov < 180.0) {
        return Err(Error::InvalidCamera(format!(
            "fov must be between 0 and 180 degrees, got {}",
            config.fov
        )));
    }
    if !(config.near > 0.0 && config.far > config.near) {
        return Err(Error::InvalidCamera(format!(
            "need 0 < near < far, got near = {} and far = {}",
            config.near, config.far
        )));
    }

    let mut camera = Camera::new(Point3::from(config.position), width, height).with_clip(
        config.fov,
        config.near,
        config.far,
    );
    camera.set_first_person(config.first_person);
    if let Some(up) = config.up {
        camera.set_up_vector(Vector3::from(up));
    }
    match (config.target, config.direction) {
        (Some(target), _) => camera.set_target_location(Point3::from(target)),
        (None, Some(dir)) => camera.set_target_direction(Vector3::from(dir)),
        (None, None) => camera.set_yaw_pitch_roll(config.yaw, config.pitch, config.roll),
    }
    Ok(camera)
}

pub fn build_settings(config: &Config) -> Result<RenderSettings> {
    let depth_sort: DepthSort = config.render.depth_sort.parse()?;
    Ok(RenderSettings {
        backface_threshold: config.render.backface_threshold,
        ambient: Vector3::from(config.render.ambient),
        clamp_lighting: config.render.clamp_lighting,
        depth_sort,
    })
}

/// Builds one object. A missing or unreadable OBJ falls back to a cube so the
/// rest of the scene still renders.
pub fn build_thing(index: usize, config: &ObjectConfig) -> Result<Thing> {
    let shading: Shading = config.shading.parse()?;

    let mut mesh = match (&config.path, config.primitive.as_deref()) {
        (Some(path), _) => match load_obj(path) {
            Ok(mut m) => {
                if config.normalize {
                    normalize_and_center(&mut m, 2.0);
                }
                m
            }
            Err(e) => {
                warn!("Error loading model '{}': {}. Using fallback cube.", path, e);
                Mesh::cube(1.0)
            }
        },
        (None, Some("cube")) | (None, None) => Mesh::cube(1.0),
        (None, Some(other)) => {
            warn!("Unknown primitive '{}'. Using fallback cube.", other);
            Mesh::cube(1.0)
        }
    };
    scale_mesh(&mut mesh, config.scale);

    let mesh = mesh
        .with_color(Vector3::from(config.color))
        .with_id(config.id)
        .with_shading(shading);
    let name = config.name.clone().unwrap_or_else(|| format!("object{}", index));

    let mut thing = Thing::new(name, vec![mesh])
        .with_position(Vector3::from(config.position))
        .with_rotation(Vector3::from(config.rotation));
    if let Some(target) = config.target {
        thing = thing.with_target(Point3::from(target));
    }
    for dupe in &config.dupes {
        thing.add_dupe(Vector3::from(dupe.position), Vector3::from(dupe.rotation));
    }
    Ok(thing)
}

/// Initial resource loading (I/O). Returns a RenderContext.
pub fn init_scene(config: &Config) -> Result<RenderContext> {
    let camera = build_camera(&config.camera, config.render.width, config.render.height)?;
    let lights = build_lights_from_config(config);
    let settings = build_settings(config)?;
    let things = config
        .objects
        .iter()
        .enumerate()
        .map(|(i, obj)| build_thing(i, obj))
        .collect::<Result<Vec<_>>>()?;

    let context = RenderContext {
        camera,
        lights,
        things,
        settings,
        background: Vector3::from(config.render.background),
    };
    info!(
        "Scene initialized: {} objects, {} triangles, {} lights.",
        context.things.len(),
        context.triangle_count(),
        context.lights.len()
    );
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_scene_builds() {
        let ctx = init_scene(&Config::default()).unwrap();
        assert_eq!(ctx.things.len(), 1);
        assert_eq!(ctx.lights.len(), 2);
        assert_eq!(ctx.triangle_count(), 12);
    }

    #[test]
    fn unknown_light_is_skipped() {
        let mut cfg = Config::default();
        cfg.lights.push(LightConfig {
            r#type: "laser".to_string(),
            ..LightConfig::default()
        });
        assert!(matches!(build_light(&cfg.lights[2]), Err(Error::UnknownLight(_))));
        assert_eq!(build_lights_from_config(&cfg).len(), 2);
    }

    #[test]
    fn camera_target_wins() {
        let cfg = CameraConfig {
            position: [0.0, 0.0, -5.0],
            target: Some([0.0, 0.0, 0.0]),
            direction: Some([1.0, 0.0, 0.0]),
            ..CameraConfig::default()
        };
        let cam = build_camera(&cfg, 100, 100).unwrap();
        assert_relative_eq!(cam.forward(), Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn bad_clip_range_is_rejected() {
        let cfg = CameraConfig {
            near: 10.0,
            far: 1.0,
            ..CameraConfig::default()
        };
        assert!(matches!(build_camera(&cfg, 10, 10), Err(Error::InvalidCamera(_))));
    }

    #[test]
    fn missing_obj_falls_back_to_cube() {
        let obj = ObjectConfig {
            path: Some("/definitely/not/here.obj".to_string()),
            scale: 2.0,
            shading: "baked".to_string(),
            id: 5,
            ..ObjectConfig::default()
        };
        let thing = build_thing(0, &obj).unwrap();
        let mesh = &thing.meshes[0];
        assert_eq!(mesh.triangles.len(), 12);
        assert_eq!(mesh.shading, Shading::Baked);
        assert!(mesh.triangles.iter().all(|t| t.id == 5));
        assert_eq!(thing.name, "object0");
    }

    #[test]
    fn objects_carry_target_and_dupes() {
        let cfg = Config::parse(
            r#"
            [[objects]]
            primitive = "cube"
            position = [0.0, 0.0, 5.0]
            target = [0.0, 0.0, 0.0]

            [[objects.dupes]]
            position = [6.0, 0.0, 10.0]
            rotation = [0.0, 45.0, 0.0]

            [[objects.dupes]]
            position = [-6.0, 0.0, 12.0]
            "#,
        )
        .unwrap();
        let thing = build_thing(0, &cfg.objects[0]).unwrap();
        assert_eq!(thing.target, Some(Point3::origin()));
        assert_eq!(thing.dupes.len(), 2);
        assert_eq!(thing.dupes[0].rotation, Vector3::new(0.0, 45.0, 0.0));
        assert_eq!(thing.placements().count(), 3);
    }

    #[test]
    fn unknown_shading_is_an_error() {
        let obj = ObjectConfig {
            shading: "glossy".to_string(),
            ..ObjectConfig::default()
        };
        assert!(matches!(build_thing(0, &obj), Err(Error::UnknownShading(_))));
    }
}
