use crate::pipeline::renderer::RenderSettings;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::thing::Thing;
use nalgebra::Vector3;

/// Holds all scene resources required for rendering a frame.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub things: Vec<Thing>,
    pub settings: RenderSettings,
    pub background: Vector3<f32>,
}

impl RenderContext {
    pub fn triangle_count(&self) -> usize {
        self.things.iter().map(Thing::triangle_count).sum()
    }

    /// Advances every thing by one animation step. Baked light no longer
    /// matches the new pose, so it is dropped.
    pub fn spin(&mut self, degrees: Vector3<f32>) {
        if degrees == Vector3::zeros() {
            return;
        }
        for thing in &mut self.things {
            thing.add_rotation(degrees);
            for mesh in &mut thing.meshes {
                mesh.clear_baked();
            }
        }
    }
}
