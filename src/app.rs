use std::error::Error;

use horizon_chunk::{build_indices, build_texcoords};
use horizon_render_raylib::conv::vec3_to_rl;
use horizon_render_raylib::{ChunkMesh, MeshTopology, RaylibSink, draw_chunk, draw_chunk_bounds};
use horizon_runtime::ChunkStreamer;
use raylib::prelude::*;

use crate::camera::FlyThrough;
use crate::config::AppConfig;

/// Open a window and fly over the streamed terrain until it is closed.
pub fn run(cfg: &AppConfig) -> Result<(), Box<dyn Error>> {
    let grid = cfg.stream.grid();
    let topology = MeshTopology::new(&build_indices(&grid), &build_texcoords(&grid), grid.vertex_count())?;
    if let Err(e) = cfg.stream.check_viewer_speed(cfg.camera.speed) {
        log::warn!("{}; chunks may be skipped", e);
    }

    let (mut rl, thread) = raylib::init()
        .size(cfg.window.width, cfg.window.height)
        .title("horizon")
        .build();
    rl.set_target_fps(cfg.window.target_fps);

    // Declared after the window so chunk models are unloaded before it closes.
    let mut streamer: ChunkStreamer<ChunkMesh> = ChunkStreamer::new(&cfg.stream, &cfg.terrain);
    {
        let mut sink = RaylibSink::new(&mut rl, &thread, &topology);
        streamer.initialize(&mut sink);
    }

    let mut cam = FlyThrough::new(cfg.camera.clone());
    let scale = cfg.window.view_scale;
    let mut wireframe = cfg.window.wireframe;
    let mut show_bounds = cfg.window.show_bounds;
    let mut paused = false;

    while !rl.window_should_close() {
        if rl.is_key_pressed(KeyboardKey::KEY_F) {
            wireframe = !wireframe;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_B) {
            show_bounds = !show_bounds;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            paused = !paused;
            log::info!("fly-through {}", if paused { "paused" } else { "resumed" });
        }

        let camera3d = Camera3D::perspective(
            vec3_to_rl(cam.position() * scale),
            vec3_to_rl(cam.target() * scale),
            Vector3::new(0.0, 1.0, 0.0),
            cfg.camera.fovy,
        );

        {
            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::BLACK);
            {
                let mut d3 = d.begin_mode3D(camera3d);
                for chunk in streamer.iter() {
                    draw_chunk(&mut d3, chunk, scale, wireframe, Color::WHITE);
                    if show_bounds {
                        draw_chunk_bounds(&mut d3, chunk, scale, Color::ORANGE);
                    }
                }
            }
            let stats = streamer.stats();
            let window = match (streamer.front(), streamer.back()) {
                (Some(f), Some(b)) => format!("{}..={}", f.generation(), b.generation()),
                _ => "-".to_string(),
            };
            d.draw_text(
                &format!(
                    "z {:.0}  chunks {}  retired {}  pooled {}",
                    cam.depth(),
                    window,
                    stats.retired,
                    stats.pooled
                ),
                12,
                12,
                20,
                Color::LIGHTGRAY,
            );
            d.draw_fps(12, 40);
        }

        // Streaming runs after the draw, against the depth the frame was rendered from.
        let report = {
            let mut sink = RaylibSink::new(&mut rl, &thread, &topology);
            streamer.step(cam.depth(), &mut sink)
        };
        if report.retired > 0 {
            log::debug!(target: "stream", "[tick {}] retired {}", cam.tick(), report.retired);
        }
        if !paused {
            cam.advance();
        }
    }
    Ok(())
}
