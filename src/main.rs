//! `mesh-viewer`: draws a ground plane and an imported ASE mesh.
//!
//! Usage: `mesh-viewer [model.ase] [--config viewer.json]`

use std::path::PathBuf;
use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use glow::HasContext;
use meshkit::abs::App;
use meshkit::{AttributeSlots, DrawMode, Mesh, ShaderProgram, ViewerConfig};

const VERTEX_SOURCE: &str = include_str!("shaders/mesh/vert.glsl");
const FRAGMENT_SOURCE: &str = include_str!("shaders/mesh/frag.glsl");

struct Args {
    model: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut model = None;
    let mut config = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            _ if model.is_none() => model = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument '{arg}'")),
        }
    }
    Ok(Args {
        model: model.unwrap_or_else(|| PathBuf::from("assets/quad.ase")),
        config,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig, String> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
            ViewerConfig::from_json(&text).map_err(|e| e.to_string())
        }
        None => Ok(ViewerConfig::default()),
    }
}

/// Prepends the GLSL header that pins attribute locations to the configured slots.
fn with_slots(source: &str, slots: &AttributeSlots) -> String {
    format!(
        "#version 330 core\n\
         #define POSITION_SLOT {}\n\
         #define NORMAL_SLOT {}\n\
         #define UV_SLOT {}\n\
         #define COLOR_SLOT {}\n\
         {source}",
        slots.position, slots.normal, slots.uv, slots.color
    )
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let config = load_config(args.config.as_ref())?;
    meshkit::logging::setup_logger(config.log_level().map_err(|e| e.to_string())?)
        .map_err(|e| e.to_string())?;

    let mut app = App::new("Mesh Viewer", 1280, 720)?;
    let gl: &Arc<glow::Context> = &app.gl;

    unsafe {
        gl.enable(glow::DEPTH_TEST);
        gl.enable(glow::CULL_FACE);
        gl.cull_face(glow::BACK);
        gl.front_face(glow::CCW);
        gl.clear_color(0.08, 0.09, 0.11, 1.0);
    }

    let slots = config.mesh.slots;
    let program = ShaderProgram::from_sources(
        gl,
        &with_slots(VERTEX_SOURCE, &slots),
        &with_slots(FRAGMENT_SOURCE, &slots),
    )
    .map_err(|e| e.to_string())?;

    let mut plane = Mesh::with_config(gl, config.mesh);
    plane
        .create_plane(config.plane_size)
        .map_err(|e| e.to_string())?;

    let mut model = Mesh::with_config(gl, config.mesh);
    if let Err(e) = model.read_ase(&args.model, &config.import) {
        log::error!("Could not import {}: {e}", args.model.display());
    }

    let (mut width, mut height) = app.window.size();
    let start = std::time::Instant::now();

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. } => break 'running,
                sdl2::event::Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => {
                    width = w as u32;
                    height = h as u32;
                    unsafe {
                        app.gl.viewport(0, 0, w, h);
                    }
                }
                _ => {}
            }
        }

        let aspect = width as f32 / height.max(1) as f32;
        let extent = config.plane_size * 2.0;
        let projection = Mat4::perspective_rh_gl(45f32.to_radians(), aspect, 0.1, extent * 10.0);
        let eye = Vec3::new(0.0, extent * 0.6, extent * 1.4);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);

        unsafe {
            app.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        program.use_program();
        program.set_uniform("u_model", Mat4::IDENTITY);
        program.set_uniform("u_mvp", projection * view);
        program.set_uniform("u_color", Vec4::new(0.35, 0.4, 0.35, 1.0));
        plane.render(DrawMode::Triangles, &program);

        if model.is_uploaded() {
            let spin = Mat4::from_rotation_y(start.elapsed().as_secs_f32() * 0.5);
            program.set_uniform("u_model", spin);
            program.set_uniform("u_mvp", projection * view * spin);
            program.set_uniform("u_color", Vec4::new(0.85, 0.6, 0.3, 1.0));
            model.render(config.draw_mode, &program);
        }

        app.window.gl_swap_window();
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("mesh-viewer: {e}");
        std::process::exit(1);
    }
}
