//! Skyline Dash -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. Each
//! `RedrawRequested` runs one cooperative frame:
//!
//!   1. `begin_frame()` -- measure the wall-clock delta (capped against hitches)
//!   2. poll hotkeys and the tuning-file watcher at the frame boundary
//!   3. scroll the parallax layers and step the simulation with this frame's
//!      delta -- both are skipped once the round is terminal, so the end
//!      banner renders over a frozen world until the window closes
//!   4. rebuild the CPU quad mesh (backgrounds, obstacles, player, debug
//!      boxes), stream it into GPU buffers, issue batched draw calls, and
//!      composite the egui overlay/banner on top
//!
//! All mutable state is owned by `EngineState` and touched only from the
//! event loop thread; there is no shared mutable state and no locking.

mod parallax;
#[cfg(test)]
mod replay;
mod watcher;

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use dash_core::animation::{SourceRect, SpriteSheet};
use dash_core::collision::sprite_aabb;
use dash_core::config::{load_tuning_file, GameConfig};
use dash_core::input::{InputState, Key};
use dash_core::time::FrameClock;
use dash_core::world::{FrameInput, World};
use dash_devtools::{DebugOverlay, OverlayStats};
use dash_platform::window::PlatformConfig;
use dash_render::{GpuContext, ScreenCamera, SpritePipeline, SpriteVertex, Texture};
use parallax::ScrollLayer;
use watcher::FileWatcher;

const TUNING_PATH: &str = "assets/tuning/default_tuning.json";
const BACKGROUND_SCALE: f32 = 2.0;
const FULL_UV: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const DEBUG_WHITE_ASSET: &str = "__debug_white";

/// An image asset plus the dimensions its placeholder must have when the
/// file is missing. Sheet layouts are derived from texture dimensions, so the
/// stand-ins keep the same frame grids as the real art.
struct AssetSpec {
    path: &'static str,
    placeholder_size: (u32, u32),
    tint: [u8; 3],
}

const PLAYER_ASSET: AssetSpec = AssetSpec {
    path: "assets/textures/runner_sheet.png",
    placeholder_size: (360, 60),
    tint: [240, 180, 60],
};

const OBSTACLE_ASSET: AssetSpec = AssetSpec {
    path: "assets/textures/hazard_sheet.png",
    placeholder_size: (1024, 1024),
    tint: [150, 80, 220],
};

// Far to near; placeholder tiles are sized so one tile at draw scale fills
// the 512x380 playfield exactly.
const BACKGROUND_ASSETS: [AssetSpec; 3] = [
    AssetSpec {
        path: "assets/textures/skyline_far.png",
        placeholder_size: (256, 190),
        tint: [70, 80, 120],
    },
    AssetSpec {
        path: "assets/textures/skyline_mid.png",
        placeholder_size: (256, 190),
        tint: [100, 110, 150],
    },
    AssetSpec {
        path: "assets/textures/rooftops_near.png",
        placeholder_size: (256, 190),
        tint: [140, 150, 180],
    },
];

/// A contiguous run of indices that share the same texture binding.
/// Draw calls are merged when consecutive quads use the same texture,
/// minimizing GPU bind-group switches during the render pass.
#[derive(Debug, Clone)]
struct DrawCall {
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
}

struct QuadSpec<'a> {
    texture_key: &'a str,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    uv: [f32; 4],
    color: [f32; 4],
}

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable engine state lives here. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
///
/// Ownership is split into three conceptual groups:
///  - **Core systems** (clock, input, camera) -- updated every frame
///  - **Content** (tuning, textures, the world) -- loaded at startup; the
///    tuning file is hot-reloadable and restarts the round
///  - **GPU resources** (vertex/index/camera buffers, draw calls) -- rebuilt
///    from the world each frame
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    clock: FrameClock,
    input: InputState,
    camera: ScreenCamera,
    sprite_pipeline: SpritePipeline,
    debug_overlay: DebugOverlay,

    // --- Content ------------------------------------------------------------
    tuning_path: std::path::PathBuf,
    tuning_watcher: FileWatcher,
    config: GameConfig,
    world: World,
    backgrounds: [ScrollLayer; 3],
    show_collision_debug: bool,
    paused: bool,
    single_step_requested: bool,
    textures: HashMap<Arc<str>, GpuSpriteTexture>,

    // --- Per-frame GPU mesh state -------------------------------------------
    // The sprite mesh is rebuilt on the CPU each frame, then streamed into
    // these GPU buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
    sprite_count: usize,
}

impl EngineState {
    fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window.clone());
        let clock = FrameClock::new();
        let input = InputState::new();
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let tuning_path = std::path::PathBuf::from(TUNING_PATH);
        let tuning_watcher = FileWatcher::new(tuning_path.clone());
        let config = if tuning_path.exists() {
            load_tuning_file(&tuning_path).unwrap_or_else(|err| {
                panic!(
                    "Failed to load initial tuning '{}': {}",
                    tuning_path.display(),
                    err
                );
            })
        } else {
            log::info!(
                "No tuning file at '{}'; using default tuning",
                tuning_path.display()
            );
            GameConfig::default()
        };

        let mut textures = HashMap::new();
        for spec in [&PLAYER_ASSET, &OBSTACLE_ASSET]
            .into_iter()
            .chain(BACKGROUND_ASSETS.iter())
        {
            let texture = load_texture_asset(&gpu.device, &gpu.queue, &sprite_pipeline, spec);
            textures.insert(Arc::from(spec.path), texture);
        }
        {
            let texture = Texture::from_rgba8(
                &gpu.device,
                &gpu.queue,
                &[255, 255, 255, 255],
                1,
                1,
                "debug_white",
            );
            let bind_group = sprite_pipeline.create_texture_bind_group(&gpu.device, &texture);
            textures.insert(
                Arc::from(DEBUG_WHITE_ASSET),
                GpuSpriteTexture {
                    texture,
                    bind_group,
                },
            );
        }

        let camera = ScreenCamera::new(config.window_width as u32, config.window_height as u32);
        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let world = build_world(&config, &textures);
        let backgrounds = build_background_layers(&config, &textures);

        let mut state = Self {
            window,
            gpu,
            clock,
            input,
            camera,
            sprite_pipeline,
            debug_overlay,
            tuning_path,
            tuning_watcher,
            config,
            world,
            backgrounds,
            show_collision_debug: false,
            paused: false,
            single_step_requested: false,
            textures,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
            sprite_count: 0,
        };

        state.ensure_mesh_capacity(4, 6);
        state.rebuild_scene_mesh();
        state
    }

    fn reload_tuning(&mut self, reason: &str) {
        match load_tuning_file(&self.tuning_path) {
            Ok(config) => {
                self.config = config;
                self.world = build_world(&self.config, &self.textures);
                self.backgrounds = build_background_layers(&self.config, &self.textures);
                log::info!("Tuning reloaded ({reason}); round restarted");
            }
            Err(err) => {
                log::error!("Tuning reload failed ({reason}): {err}");
            }
        }
    }

    fn rebuild_scene_mesh(&mut self) {
        // Build a single CPU-side mesh each frame from the world state,
        // then stream it into GPU buffers.
        let (vertices, indices, draw_calls) = self.build_mesh();
        self.ensure_mesh_capacity(vertices.len(), indices.len());
        self.sprite_count = vertices.len() / 4;
        self.draw_calls = draw_calls;

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
    }

    fn build_mesh(&self) -> (Vec<SpriteVertex>, Vec<u32>, Vec<DrawCall>) {
        let mut vertices = Vec::with_capacity(64);
        let mut indices = Vec::with_capacity(96);
        let mut draw_calls = Vec::with_capacity(8);

        // Terminal rounds render the banner only -- no sprites at all.
        if self.world.round().is_terminal() {
            return (vertices, indices, draw_calls);
        }

        // Background layers, far to near, two tiles each for seamless wrap.
        for (layer, spec) in self.backgrounds.iter().zip(BACKGROUND_ASSETS.iter()) {
            let Some(texture) = self.textures.get(spec.path) else {
                continue;
            };
            let (tile_w, tile_h) = texture.texture.size;
            for x in layer.tile_positions() {
                add_quad(
                    &mut vertices,
                    &mut indices,
                    &mut draw_calls,
                    QuadSpec {
                        texture_key: spec.path,
                        x,
                        y: 0.0,
                        width: tile_w as f32 * BACKGROUND_SCALE,
                        height: tile_h as f32 * BACKGROUND_SCALE,
                        uv: FULL_UV,
                        color: WHITE,
                    },
                );
            }
        }

        // Obstacles, then the player on top, each drawing the current frame's
        // sub-rectangle of its sheet.
        if let Some(texture) = self.textures.get(OBSTACLE_ASSET.path) {
            for obstacle in self.world.obstacles().obstacles() {
                add_quad(
                    &mut vertices,
                    &mut indices,
                    &mut draw_calls,
                    QuadSpec {
                        texture_key: OBSTACLE_ASSET.path,
                        x: obstacle.position.x,
                        y: obstacle.position.y,
                        width: obstacle.source_rect.width,
                        height: obstacle.source_rect.height,
                        uv: sub_rect_uv(&obstacle.source_rect, texture.texture.size),
                        color: WHITE,
                    },
                );
            }
        }

        if let Some(texture) = self.textures.get(PLAYER_ASSET.path) {
            let player = &self.world.player().anim;
            add_quad(
                &mut vertices,
                &mut indices,
                &mut draw_calls,
                QuadSpec {
                    texture_key: PLAYER_ASSET.path,
                    x: player.position.x,
                    y: player.position.y,
                    width: player.source_rect.width,
                    height: player.source_rect.height,
                    uv: sub_rect_uv(&player.source_rect, texture.texture.size),
                    color: WHITE,
                },
            );
        }

        // Debug hitboxes as translucent quads: padded obstacle boxes in red,
        // the player's full box in green.
        if self.show_collision_debug {
            for obstacle in self.world.obstacles().obstacles() {
                let hitbox = sprite_aabb(obstacle).inset(self.config.collision_pad);
                add_quad(
                    &mut vertices,
                    &mut indices,
                    &mut draw_calls,
                    QuadSpec {
                        texture_key: DEBUG_WHITE_ASSET,
                        x: hitbox.x,
                        y: hitbox.y,
                        width: hitbox.width,
                        height: hitbox.height,
                        uv: FULL_UV,
                        color: [0.9, 0.15, 0.15, 0.35],
                    },
                );
            }
            let player_box = sprite_aabb(&self.world.player().anim);
            add_quad(
                &mut vertices,
                &mut indices,
                &mut draw_calls,
                QuadSpec {
                    texture_key: DEBUG_WHITE_ASSET,
                    x: player_box.x,
                    y: player_box.y,
                    width: player_box.width,
                    height: player_box.height,
                    uv: FULL_UV,
                    color: [0.15, 0.9, 0.15, 0.35],
                },
            );
        }

        (vertices, indices, draw_calls)
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }
}

struct App {
    config: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = dash_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(EngineState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(engine_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(engine_key),
                            ElementState::Released => state.input.key_up(engine_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                state.clock.begin_frame();
                let dt = state.clock.delta_seconds();

                if state.input.is_just_pressed(Key::Escape) {
                    event_loop.exit();
                    return;
                }
                if state.input.is_just_pressed(Key::F3) {
                    state.debug_overlay.toggle();
                }
                if state.input.is_just_pressed(Key::F4) {
                    state.show_collision_debug = !state.show_collision_debug;
                    log::info!(
                        "Collision debug: {}",
                        if state.show_collision_debug {
                            "ON"
                        } else {
                            "OFF"
                        }
                    );
                }

                // Tuning reload happens at the frame boundary, never mid-step.
                if state.input.is_just_pressed(Key::R) {
                    state.reload_tuning("manual trigger (R)");
                } else if state.tuning_watcher.should_reload() {
                    state.reload_tuning("file watcher");
                }

                let run_simulation = !state.paused || state.single_step_requested;
                state.single_step_requested = false;

                // Once the round is terminal nothing moves anymore; the loop
                // keeps presenting the frozen frame plus the banner.
                if run_simulation && !state.world.round().is_terminal() {
                    for layer in &mut state.backgrounds {
                        layer.advance(dt);
                    }

                    let jump_pressed = state.input.is_just_pressed(Key::Space)
                        || state.input.is_just_pressed(Key::W)
                        || state.input.is_just_pressed(Key::Up);
                    state.world.step(FrameInput { jump_pressed }, dt);
                }

                state.rebuild_scene_mesh();

                // Render phase reads finalized simulation state from this frame.
                let camera_uniform = state.camera.build_uniform();
                state.gpu.queue.write_buffer(
                    &state.camera_buffer,
                    0,
                    bytemuck::cast_slice(&[camera_uniform]),
                );

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let banner = if state.world.round().is_terminal() {
                    Some(state.world.round().label())
                } else {
                    None
                };
                let (egui_primitives, egui_textures_delta, overlay_actions) =
                    state.debug_overlay.prepare(
                        &state.window,
                        &state.clock,
                        Some(OverlayStats {
                            draw_calls: state.draw_calls.len() as u32,
                            texture_binds: count_texture_binds(&state.draw_calls) as u32,
                            sprite_count: state.sprite_count as u32,
                            obstacle_count: state.world.obstacles().obstacles().len() as u32,
                            round: state.world.round(),
                            paused: state.paused,
                        }),
                        banner,
                    );

                if overlay_actions.toggle_pause {
                    state.paused = !state.paused;
                    log::info!(
                        "Simulation {}",
                        if state.paused { "PAUSED" } else { "RESUMED" }
                    );
                }
                if overlay_actions.single_step {
                    state.single_step_requested = true;
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut last_bound_texture_key: Option<&Arc<str>> = None;
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Scene Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.sprite_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                    for draw in &state.draw_calls {
                        if let Some(texture) = state.textures.get(&draw.texture_key) {
                            let need_rebind = match last_bound_texture_key {
                                Some(last) => **last != *draw.texture_key,
                                None => true,
                            };
                            if need_rebind {
                                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                                last_bound_texture_key = Some(&draw.texture_key);
                            }
                            render_pass.draw_indexed(
                                draw.index_start..(draw.index_start + draw.index_count),
                                0,
                                0..1,
                            );
                        }
                    }
                }

                state.debug_overlay.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .debug_overlay
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.debug_overlay.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                state.input.end_frame();
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// The UV rectangle selecting `rect` out of a texture of `size` texels.
fn sub_rect_uv(rect: &SourceRect, size: (u32, u32)) -> [f32; 4] {
    let (tex_w, tex_h) = (size.0 as f32, size.1 as f32);
    [
        rect.x / tex_w,
        rect.y / tex_h,
        (rect.x + rect.width) / tex_w,
        (rect.y + rect.height) / tex_h,
    ]
}

fn add_quad(
    vertices: &mut Vec<SpriteVertex>,
    indices: &mut Vec<u32>,
    draw_calls: &mut Vec<DrawCall>,
    spec: QuadSpec<'_>,
) {
    let [u0, v0, u1, v1] = spec.uv;
    let base_index = vertices.len() as u32;

    vertices.push(SpriteVertex {
        position: [spec.x, spec.y],
        tex_coords: [u0, v0],
        color: spec.color,
    });
    vertices.push(SpriteVertex {
        position: [spec.x + spec.width, spec.y],
        tex_coords: [u1, v0],
        color: spec.color,
    });
    vertices.push(SpriteVertex {
        position: [spec.x + spec.width, spec.y + spec.height],
        tex_coords: [u1, v1],
        color: spec.color,
    });
    vertices.push(SpriteVertex {
        position: [spec.x, spec.y + spec.height],
        tex_coords: [u0, v1],
        color: spec.color,
    });

    let draw_start = indices.len() as u32;
    indices.extend_from_slice(&[
        base_index,
        base_index + 1,
        base_index + 2,
        base_index,
        base_index + 2,
        base_index + 3,
    ]);

    push_draw_call(draw_calls, Arc::from(spec.texture_key), draw_start, 6);
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous. Sprites are emitted background-to-foreground,
/// so runs sharing a texture collapse into a single `draw_indexed` call.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        index_start,
        index_count,
    });
}

fn count_texture_binds(draw_calls: &[DrawCall]) -> usize {
    let mut binds = 0usize;
    let mut current: Option<&str> = None;
    for draw in draw_calls {
        let key: &str = &draw.texture_key;
        if current != Some(key) {
            current = Some(key);
            binds += 1;
        }
    }
    binds
}

fn load_texture_asset(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &SpritePipeline,
    spec: &AssetSpec,
) -> GpuSpriteTexture {
    let texture = match std::fs::read(spec.path) {
        Ok(bytes) => Texture::from_bytes(device, queue, &bytes, spec.path),
        Err(err) => {
            log::warn!(
                "Failed to read texture '{}': {}. Using placeholder.",
                spec.path,
                err
            );
            Texture::placeholder(
                device,
                queue,
                spec.placeholder_size.0,
                spec.placeholder_size.1,
                spec.tint,
                spec.path,
            )
        }
    };
    let bind_group = pipeline.create_texture_bind_group(device, &texture);
    GpuSpriteTexture {
        texture,
        bind_group,
    }
}

fn build_world(config: &GameConfig, textures: &HashMap<Arc<str>, GpuSpriteTexture>) -> World {
    let player_texture = &textures[PLAYER_ASSET.path].texture;
    let obstacle_texture = &textures[OBSTACLE_ASSET.path].texture;

    let player_sheet = SpriteSheet::from_grid(
        player_texture.size.0,
        player_texture.size.1,
        config.player_columns,
        config.player_rows,
        config.player_frame_duration,
    );
    let obstacle_sheet = SpriteSheet::from_grid(
        obstacle_texture.size.0,
        obstacle_texture.size.1,
        config.obstacle_columns,
        config.obstacle_rows,
        config.obstacle_frame_duration,
    );

    World::new(*config, player_sheet, obstacle_sheet)
}

fn build_background_layers(
    config: &GameConfig,
    textures: &HashMap<Arc<str>, GpuSpriteTexture>,
) -> [ScrollLayer; 3] {
    std::array::from_fn(|i| {
        let tile_w = textures[BACKGROUND_ASSETS[i].path].texture.size.0 as f32;
        ScrollLayer::new(tile_w * BACKGROUND_SCALE, config.scroll_speeds[i])
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::F4 => Some(Key::F4),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyR => Some(Key::R),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Skyline Dash starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
