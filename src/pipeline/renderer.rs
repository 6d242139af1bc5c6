use crate::core::clipper::{Plane, clip_against_planes, clip_triangle, screen_planes};
use crate::core::color::to_rgb8;
use crate::core::geometry::{DEBUG_ID, Triangle};
use crate::core::pipeline::{Canvas, LightEnvironment, Shader};
use crate::error::{Error, Result};
use crate::core::math::transform::TransformFactory;
use crate::pipeline::passes::{is_backface, is_behind_near, projection_pass, view_pass, world_pass};
use crate::pipeline::shaders::baked::BakedShader;
use crate::pipeline::shaders::flat::FlatShader;
use crate::pipeline::shaders::unlit::UnlitShader;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::mesh::{Mesh, Shading};
use crate::scene::thing::Thing;
use log::{debug, warn};
use nalgebra::{Matrix4, Point2, Vector3};
use std::str::FromStr;

/// Edge length of the marker cube drawn at point lights in debug renders.
const LIGHT_MARKER_SIZE: f32 = 0.25;

/// Key used to order triangles back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthSort {
    /// Average depth of the three vertices.
    #[default]
    Average,
    /// Depth of the farthest vertex.
    Furthest,
}

impl DepthSort {
    fn key(self, tri: &Triangle) -> f32 {
        match self {
            DepthSort::Average => tri.depth(),
            DepthSort::Furthest => tri.furthest_depth(),
        }
    }
}

impl FromStr for DepthSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "average" | "avg" => Ok(DepthSort::Average),
            "furthest" | "farthest" | "max" => Ok(DepthSort::Furthest),
            _ => Err(Error::UnknownDepthSort(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Faces with `dot(world_normal, forward) >= backface_threshold` are culled.
    pub backface_threshold: f32,
    /// World color floor added to every triangle's light.
    pub ambient: Vector3<f32>,
    pub clamp_lighting: bool,
    pub depth_sort: DepthSort,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            backface_threshold: 0.1,
            ambient: Vector3::zeros(),
            clamp_lighting: true,
            depth_sort: DepthSort::Average,
        }
    }
}

/// Per-frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub meshes: usize,
    /// Triangles that entered the world stage.
    pub submitted: usize,
    pub backfaces_culled: usize,
    /// Triangles entirely between the camera and the near plane, or behind it.
    pub frustum_culled: usize,
    /// Fragments produced by the near-plane clip.
    pub near_fragments: usize,
    /// Triangles in the final draw list.
    pub emitted: usize,
    /// Vertices that reached projection at z = 0. Always 0 unless clipping is broken.
    pub degenerate_projections: usize,
}

/// One rendered frame: screen-space triangles, farthest first.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub triangles: Vec<Triangle>,
    pub stats: FrameStats,
}

impl Frame {
    /// Hands every triangle, in draw order, to `canvas`.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for tri in &self.triangles {
            let points = tri.points().map(|p| Point2::new(p.x, p.y));
            canvas.fill_triangle(points, to_rgb8(tri.shaded_color()));
        }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// The high-level renderer that orchestrates the pipeline stages.
///
/// Per mesh: world -> back-face cull -> view -> coarse near cull -> near clip
/// -> project -> screen clip -> light. All meshes are collected before one
/// stable back-to-front sort, so equal depths keep submission order.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    pub settings: RenderSettings,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    /// Renders every mesh of every thing, each posed relative to its thing.
    /// A thing with dupes is drawn once per placement.
    pub fn render(&self, things: &[Thing], camera: &Camera, lights: &[Light]) -> Frame {
        self.render_posed(posed_things(things), camera, lights)
    }

    /// Renders loose meshes at their own pose.
    pub fn render_meshes(&self, meshes: &[Mesh], camera: &Camera, lights: &[Light]) -> Frame {
        let posed = meshes.iter().map(|mesh| (mesh, own_pose(mesh)));
        self.render_posed(posed, camera, lights)
    }

    /// Like [`Renderer::render`], plus an unlit marker cube tagged
    /// [`DEBUG_ID`] at every point light.
    pub fn render_debug(&self, things: &[Thing], camera: &Camera, lights: &[Light]) -> Frame {
        let markers: Vec<Mesh> = lights
            .iter()
            .filter_map(|light| match light {
                Light::Point { position, color, .. } => Some(
                    Mesh::cube(LIGHT_MARKER_SIZE)
                        .with_position(position.coords)
                        .with_color(*color)
                        .with_id(DEBUG_ID)
                        .with_shading(Shading::Unlit),
                ),
                Light::Sun { .. } => None,
            })
            .collect();

        let posed = posed_things(things).chain(markers.iter().map(|mesh| (mesh, own_pose(mesh))));
        self.render_posed(posed, camera, lights)
    }

    fn render_posed<'m, I>(&self, meshes: I, camera: &Camera, lights: &[Light]) -> Frame
    where
        I: Iterator<Item = (&'m Mesh, Matrix4<f32>)>,
    {
        let env = LightEnvironment {
            lights,
            ambient: self.settings.ambient,
            clamp: self.settings.clamp_lighting,
        };
        let mut frame = Frame::default();
        let mut reported_unbaked = false;

        for (mesh, model) in meshes {
            if mesh.shading == Shading::Baked && !mesh.is_baked() && !reported_unbaked {
                debug!("Mesh {} uses baked lighting but was never baked", mesh.id);
                reported_unbaked = true;
            }
            self.draw_mesh(mesh, &model, camera, &env, &mut frame);
        }

        let sort = self.settings.depth_sort;
        // Projected depth is monotonic in view depth, so the screen-space key
        // orders like the view-space one. `sort_by` is stable.
        frame
            .triangles
            .sort_by(|a, b| sort.key(b).total_cmp(&sort.key(a)));
        frame.stats.emitted = frame.triangles.len();

        if frame.stats.degenerate_projections > 0 {
            warn!(
                "{} vertices reached projection at z = 0",
                frame.stats.degenerate_projections
            );
        }
        debug!("{:?}", frame.stats);
        frame
    }

    /// Runs one mesh through the pipeline and appends its triangles to `frame`.
    fn draw_mesh(
        &self,
        mesh: &Mesh,
        model: &Matrix4<f32>,
        camera: &Camera,
        env: &LightEnvironment,
        frame: &mut Frame,
    ) {
        let shader: &dyn Shader = match mesh.shading {
            Shading::Unlit => &UnlitShader,
            Shading::Dynamic => &FlatShader,
            Shading::Baked => &BakedShader,
        };
        let forward = camera.forward();
        let near_plane = Plane::near(camera.near());
        let projection = camera.projection();
        let screen = screen_planes(projection.width, projection.height);

        let stats = &mut frame.stats;
        stats.meshes += 1;

        let mut near_clipped = Vec::with_capacity(2);
        let mut on_screen = Vec::with_capacity(8);

        for tri in world_pass(mesh, model) {
            stats.submitted += 1;
            if is_backface(&tri, &forward, self.settings.backface_threshold) {
                stats.backfaces_culled += 1;
                continue;
            }

            let view = view_pass(&tri, camera);
            if is_behind_near(&view, camera.near()) {
                stats.frustum_culled += 1;
                continue;
            }

            near_clipped.clear();
            stats.near_fragments += clip_triangle(&near_plane, &view, &mut near_clipped);

            for fragment in &near_clipped {
                let (projected, degenerate) = projection_pass(fragment, &projection);
                stats.degenerate_projections += degenerate;

                on_screen.clear();
                clip_against_planes(&screen, &projected, &mut on_screen);
                for mut out in on_screen.drain(..) {
                    out.lighting = shader.shade(&out, env);
                    frame.triangles.push(out);
                }
            }
        }
    }
}

/// Every mesh of every thing, once per placement, with its model matrix.
fn posed_things(things: &[Thing]) -> impl Iterator<Item = (&Mesh, Matrix4<f32>)> {
    things.iter().flat_map(|thing| {
        thing.placements().flat_map(move |placement| {
            thing
                .meshes
                .iter()
                .map(move |mesh| (mesh, thing.model_matrix(mesh, &placement)))
        })
    })
}

fn own_pose(mesh: &Mesh) -> Matrix4<f32> {
    TransformFactory::pose(&mesh.position, &mesh.rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn camera() -> Camera {
        Camera::new(Point3::origin(), 200, 200)
    }

    /// Two triangles facing the camera, spanning `[-half, half]` in x and y.
    fn quad(z: f32, half: f32) -> Mesh {
        let verts = [
            Point3::new(-half, -half, z),
            Point3::new(-half, half, z),
            Point3::new(half, half, z),
            Point3::new(half, -half, z),
        ];
        Mesh::from_faces(&verts, &[[1, 2, 3], [1, 3, 4]]).unwrap()
    }

    fn facing_quad_at(z: f32) -> Mesh {
        quad(z, 1.0)
    }

    #[test]
    fn cube_in_view_shows_only_front_faces() {
        let cube = Mesh::cube(1.0).with_position(Vector3::new(0.0, 0.0, 5.0));
        let frame = Renderer::default().render_meshes(&[cube], &camera(), &[]);
        assert_eq!(frame.stats.submitted, 12);
        // Straight on, only the two +Z triangles face away. Side faces are
        // edge-on (dot 0) and stay.
        assert_eq!(frame.stats.backfaces_culled, 2);
        assert_eq!(frame.stats.degenerate_projections, 0);
        assert!(!frame.is_empty());
    }

    #[test]
    fn everything_behind_the_camera_is_culled() {
        let mesh = Mesh::cube(1.0).with_position(Vector3::new(0.0, 0.0, -5.0));
        let frame = Renderer::default().render_meshes(&[mesh], &camera(), &[]);
        assert!(frame.is_empty());
        assert_eq!(
            frame.stats.backfaces_culled + frame.stats.frustum_culled,
            frame.stats.submitted
        );
    }

    #[test]
    fn screen_clip_keeps_vertices_in_viewport() {
        let big = quad(1.0, 10.0).with_rotation(Vector3::new(0.0, 0.0, 10.0));
        let frame = Renderer::default().render_meshes(&[big], &camera(), &[]);
        assert!(!frame.is_empty());
        for tri in &frame.triangles {
            for p in tri.points() {
                assert!((-1e-3..=199.001).contains(&p.x), "x = {}", p.x);
                assert!((-1e-3..=199.001).contains(&p.y), "y = {}", p.y);
            }
        }
    }

    #[test]
    fn furthest_key_can_reorder() {
        // A is centered nearer but reaches further back than B.
        let a = Mesh::new(vec![Triangle::new(
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(0.0, 0.5, 2.0),
            Point3::new(0.5, 0.0, 11.0),
        )])
        .with_id(1);
        let b = facing_quad_at(6.0).with_id(2);
        let mut settings = RenderSettings {
            backface_threshold: 2.0,
            ..RenderSettings::default()
        };
        let avg = Renderer::new(settings).render_meshes(&[a.clone(), b.clone()], &camera(), &[]);
        settings.depth_sort = DepthSort::Furthest;
        let far = Renderer::new(settings).render_meshes(&[a, b], &camera(), &[]);

        assert_eq!(avg.triangles.first().map(|t| t.id), Some(2));
        assert_eq!(far.triangles.first().map(|t| t.id), Some(1));
    }

    #[test]
    fn debug_render_adds_light_markers() {
        let lights = [
            Light::new_point(Point3::new(0.0, 0.0, 4.0), 1.0, 10.0),
            Light::new_sun(Vector3::z(), 1.0),
        ];
        let frame = Renderer::default().render_debug(&[], &camera(), &lights);
        assert!(!frame.is_empty());
        assert!(frame.triangles.iter().all(|t| t.id == DEBUG_ID));
        assert_eq!(frame.stats.meshes, 1);
    }

    #[test]
    fn draw_hands_triangles_over_in_order() {
        let near = facing_quad_at(2.0).with_id(1).with_shading(Shading::Unlit);
        let far = facing_quad_at(8.0).with_id(2).with_shading(Shading::Unlit);
        let frame = Renderer::default().render_meshes(&[near, far], &camera(), &[]);

        let mut seen = Vec::new();
        frame.draw(&mut |_: [Point2<f32>; 3], rgb: [u8; 3]| seen.push(rgb));
        assert_eq!(seen.len(), frame.len());
        assert_eq!(frame.triangles.last().map(|t| t.id), Some(1));
        assert!(seen.iter().all(|&rgb| rgb == [255, 255, 255]));
    }

    #[test]
    fn dupes_render_once_per_placement() {
        let mut thing = Thing::new("tile", vec![quad(0.0, 0.5).with_id(4)]).with_position(Vector3::new(0.0, 0.0, 5.0));
        thing.add_dupe(Vector3::new(0.0, 0.0, 9.0), Vector3::zeros());
        thing.add_dupe(Vector3::new(0.0, 0.0, 2.0), Vector3::zeros());

        let frame = Renderer::default().render(&[thing], &camera(), &[]);
        assert_eq!(frame.stats.meshes, 3);
        assert_eq!(frame.stats.submitted, 6);
        assert_eq!(frame.len(), 6);
        assert!(frame.triangles.iter().all(|t| t.id == 4));
        // Farthest copy first, nearest last.
        assert_relative_eq!(frame.triangles[0].world[0].z, 9.0, epsilon = 1e-5);
        assert_relative_eq!(frame.triangles[5].world[0].z, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn aimed_thing_ignores_its_rotation() {
        // Turned half way round, the quad faces away from the camera.
        let turned = Thing::new("sign", vec![facing_quad_at(0.0)])
            .with_position(Vector3::new(0.0, 0.0, 5.0))
            .with_rotation(Vector3::new(0.0, 180.0, 0.0));
        let frame = Renderer::default().render(&[turned.clone()], &camera(), &[]);
        assert_eq!(frame.stats.backfaces_culled, 2);

        // Aimed away from the camera, local -Z (the quad's front) faces it again.
        let aimed_away = turned.clone().with_target(Point3::new(0.0, 0.0, 50.0));
        let frame = Renderer::default().render(&[aimed_away], &camera(), &[]);
        assert_eq!(frame.stats.backfaces_culled, 0);
        assert_eq!(frame.len(), 2);

        // Aimed at the camera, the front turns away.
        let aimed_at_camera = turned.with_target(Point3::origin());
        let frame = Renderer::default().render(&[aimed_at_camera], &camera(), &[]);
        assert_eq!(frame.stats.backfaces_culled, 2);
        assert!(frame.is_empty());
    }

    #[test]
    fn depth_sort_parses() {
        assert_eq!("furthest".parse::<DepthSort>().unwrap(), DepthSort::Furthest);
        assert_eq!("Average".parse::<DepthSort>().unwrap(), DepthSort::Average);
        assert!(matches!(
            "zbuffer".parse::<DepthSort>(),
            Err(Error::UnknownDepthSort(_))
        ));
    }
}
