use clap::Parser;
use log::{error, info};
use painter3d::core::pipeline::LightEnvironment;
use painter3d::io::config::Config;
use painter3d::io::image::ImageCanvas;
use painter3d::pipeline::renderer::Renderer;
use painter3d::pipeline::shaders::baked::bake_lighting;
use painter3d::scene::context::RenderContext;
use painter3d::scene::loader::init_scene;
use painter3d::scene::mesh::Shading;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Headless painter's-algorithm renderer: renders a TOML scene to PNG.
#[derive(Parser, Debug)]
#[command(name = "painter3d")]
#[command(about = "Render a TOML scene to PNG with a CPU painter's-algorithm pipeline")]
struct Cli {
    /// Scene file (TOML). Without one a built-in demo scene is rendered.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output image; overrides `render.output`.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of frames; overrides `animation.frames`.
    #[arg(short, long)]
    frames: Option<u32>,

    /// Draw a marker cube at every point light.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_level(true)
        .init();

    run(Cli::parse()).map_err(|e| {
        error!("{e}");
        e
    })
}

fn run(cli: Cli) -> Result<(), String> {
    let start_time = Instant::now();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading scene file: {}", path.display());
            Config::load(path).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => {
            info!("No scene file given, rendering the default scene");
            Config::default()
        }
    };

    let mut context = init_scene(&config).map_err(|e| e.to_string())?;
    let frames = cli.frames.unwrap_or(config.animation.frames).max(1);
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&config.render.output));
    let spin = config.animation.spin.into();
    let renderer = Renderer::new(context.settings);

    info!(
        "Rendering {} frame(s) at {}x{}",
        frames, config.render.width, config.render.height
    );

    let mut canvas = ImageCanvas::new(config.render.width, config.render.height, context.background);
    for frame_index in 0..frames {
        if frame_index > 0 {
            context.spin(spin);
        }
        bake_if_needed(&mut context, frame_index);

        let frame = if cli.debug {
            renderer.render_debug(&context.things, &context.camera, &context.lights)
        } else {
            renderer.render(&context.things, &context.camera, &context.lights)
        };
        info!(
            "Frame {}: {} of {} triangles drawn ({} back faces, {} behind camera)",
            frame_index,
            frame.stats.emitted,
            frame.stats.submitted,
            frame.stats.backfaces_culled,
            frame.stats.frustum_culled
        );

        canvas.clear(context.background);
        frame.draw(&mut canvas);
        canvas
            .save(frame_path(&output, frame_index, frames))
            .map_err(|e| e.to_string())?;
    }

    info!("Total time: {:?}", start_time.elapsed());
    Ok(())
}

/// Baked meshes are baked once up front, and again whenever the animation
/// has moved them.
fn bake_if_needed(context: &mut RenderContext, frame_index: u32) {
    let any_baked = context
        .things
        .iter()
        .flat_map(|t| &t.meshes)
        .any(|m| m.shading == Shading::Baked);
    if !any_baked {
        return;
    }
    let stale = context
        .things
        .iter()
        .flat_map(|t| &t.meshes)
        .any(|m| m.shading == Shading::Baked && !m.is_baked());
    if frame_index == 0 || stale {
        let env = LightEnvironment {
            lights: &context.lights,
            ambient: context.settings.ambient,
            clamp: context.settings.clamp_lighting,
        };
        bake_lighting(&mut context.things, &env);
    }
}

/// `frame.png` for a single frame, `frame_0000.png`, `frame_0001.png`, ... otherwise.
fn frame_path(output: &Path, index: u32, frames: u32) -> PathBuf {
    if frames <= 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let ext = output
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    output.with_file_name(format!("{stem}_{index:04}.{ext}"))
}
