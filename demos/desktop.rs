use std::sync::Arc;
use std::time::Instant;

use folio::gui::book_control_panel;
use folio::{
    page_tint, Book, BookConfig, BookHost, ClipPose, Direction, PageLayout, PageRenderer,
    PageUniforms, StyleConfig, Vec2,
};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// Maps pointer pixels to book-local units and records the poses the
/// core pushes each frame. The shader composites from these, so the
/// scene-graph style calls reduce to bookkeeping here.
struct PoseHost {
    view_size: (f32, f32),
    pixels_per_unit: f32,
    turning: bool,
    direction: f32,
    clip: ClipPose,
    back_face: (Vec2, f32),
    layout: PageLayout,
}

impl PoseHost {
    fn new(book: &Book) -> Self {
        Self {
            view_size: (1280.0, 720.0),
            pixels_per_unit: 1.0,
            turning: false,
            direction: 1.0,
            clip: ClipPose {
                rotation_deg: 0.0,
                position: Vec2::new(0.0, 0.0),
            },
            back_face: (Vec2::new(0.0, 0.0), 0.0),
            layout: book.layout(),
        }
    }

    /// Keep the pixel mapping in sync with the shader: the spread fills
    /// 85% of the window height, centered.
    fn resize(&mut self, width: f32, height: f32, book: &Book) {
        self.view_size = (width, height);
        self.pixels_per_unit = 0.85 * height / (2.0 * book.model().top_center.y);
    }
}

impl BookHost for PoseHost {
    fn world_to_local(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            (point.x - self.view_size.0 * 0.5) / self.pixels_per_unit,
            (self.view_size.1 * 0.5 - point.y) / self.pixels_per_unit,
        )
    }

    fn local_to_world(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x * self.pixels_per_unit + self.view_size.0 * 0.5,
            self.view_size.1 * 0.5 - point.y * self.pixels_per_unit,
        )
    }

    fn begin_turn(
        &mut self,
        direction: Direction,
        _leaf_origin: Vec2,
        _leaf_pivot: Vec2,
        _clip_pivot: Vec2,
    ) {
        self.turning = true;
        self.direction = match direction {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        };
    }

    fn set_clip_pose(&mut self, pose: &ClipPose) {
        self.clip = *pose;
    }

    fn set_back_face(&mut self, position_world: Vec2, rotation_deg: f32) {
        self.back_face = (position_world, rotation_deg);
    }

    fn raise_front_face(&mut self) {
        // Draw order is resolved in the shader; nothing to reorder.
    }

    fn follow_shadow(&mut self) {
        // The shader shades along the crease recorded in `clip`.
    }

    fn end_turn(&mut self) {
        self.turning = false;
    }

    fn pages_changed(&mut self, layout: PageLayout) {
        self.layout = layout;
    }
}

struct App {
    state: Option<AppState>,
}

struct AppState {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: PageRenderer,
    book: Book,
    host: PoseHost,
    style: StyleConfig,
    cursor: Option<winit::dpi::PhysicalPosition<f64>>,
    last_frame: Instant,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl AppState {
    fn cursor_world(&self) -> Option<Vec2> {
        self.cursor
            .map(|p| Vec2::new(p.x as f32, p.y as f32))
    }

    fn uniforms(&self) -> PageUniforms {
        let model = self.book.model();
        let mut u = PageUniforms {
            book_half: [model.page_width, model.top_center.y],
            aspect_ratio: self.surface_config.width as f32 / self.surface_config.height as f32,
            turning: if self.host.turning { 1.0 } else { 0.0 },
            fold_corner: [model.fold_corner.x, model.fold_corner.y],
            cross_point: [self.host.clip.position.x, self.host.clip.position.y],
            direction: self.host.direction,
            shadow_strength: self.style.shadow_strength,
            cover_color: self.style.cover_color,
            ..PageUniforms::default()
        };
        let count = self.book.page_count();
        match self.host.layout {
            PageLayout::Resting { left, right } => {
                u.left_tint = page_tint(left, count, &self.style);
                u.right_tint = page_tint(right, count, &self.style);
            }
            PageLayout::Turning {
                left_static,
                left_moving,
                right_moving,
                right_static,
            } => {
                u.left_tint = page_tint(left_static, count, &self.style);
                u.right_tint = page_tint(right_static, count, &self.style);
                // Front face is whichever moving page is visible before
                // the fold; the back face is revealed by it.
                if self.host.direction > 0.0 {
                    u.front_tint = page_tint(left_moving, count, &self.style);
                    u.back_tint = page_tint(right_moving, count, &self.style);
                    u.book_corner = [model.right_corner.x, model.right_corner.y];
                } else {
                    u.front_tint = page_tint(right_moving, count, &self.style);
                    u.back_tint = page_tint(left_moving, count, &self.style);
                    u.book_corner = [model.left_corner.x, model.left_corner.y];
                }
            }
        }
        u
    }

    /// Kick off a programmatic turn from the panel buttons: grab the
    /// outer corner of the chosen side and let go, so the usual settle
    /// path commits the turn.
    fn request_turn(&mut self, direction: Direction) {
        let model = self.book.model();
        let corner = match direction {
            Direction::Right => Vec2::new(model.page_width * 0.95, model.bottom_center.y + 4.0),
            Direction::Left => Vec2::new(-model.page_width * 0.95, model.bottom_center.y + 4.0),
        };
        let world = self.host.local_to_world(corner);
        if let Err(err) = self.book.begin_turn(direction, world, &mut self.host) {
            log::info!("turn request ignored: {err}");
            return;
        }
        self.book.release();
    }

    fn save_config(&self) {
        let model = self.book.model();
        let config = BookConfig {
            page_count: self.book.page_count(),
            leaf: folio::LeafConfig {
                width: model.page_width,
                height: model.top_center.y * 2.0,
            },
            settle_duration: self.book.settle_duration(),
            style: self.style,
            ..BookConfig::default()
        };
        let Ok(json) = config.to_json_pretty() else {
            return;
        };
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("json", &["json"])
            .save_file()
        {
            if let Err(err) = std::fs::write(&path, json) {
                log::error!("failed to save config: {err}");
            }
        }
    }

    fn load_config(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("json", &["json"])
            .pick_file()
        else {
            return;
        };
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) => {
                log::error!("failed to read config: {err}");
                return;
            }
        };
        match BookConfig::from_json(&json) {
            Ok(config) => {
                self.book = Book::from(&config);
                self.style = config.style;
                self.host = PoseHost::new(&self.book);
                self.host.resize(
                    self.surface_config.width as f32,
                    self.surface_config.height as f32,
                    &self.book,
                );
            }
            Err(err) => log::error!("bad config file: {err}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("Folio")
                        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720)),
                )
                .unwrap(),
        );

        let state = pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });

            let surface = instance.create_surface(window.clone()).unwrap();

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .unwrap();

            let (device, queue) = adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: Some("folio_device"),
                        ..Default::default()
                    },
                    None,
                )
                .await
                .unwrap();

            let size = window.inner_size();
            let caps = surface.get_capabilities(&adapter);
            let format = caps.formats[0];

            let surface_config = wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width.max(1),
                height: size.height.max(1),
                present_mode: wgpu::PresentMode::AutoVsync,
                alpha_mode: caps.alpha_modes[0],
                view_formats: vec![],
                desired_maximum_frame_latency: 2,
            };
            surface.configure(&device, &surface_config);

            let renderer = PageRenderer::new(&device, format);
            let book = Book::from(&BookConfig::default());
            let mut host = PoseHost::new(&book);
            host.resize(size.width as f32, size.height as f32, &book);

            // egui setup
            let egui_ctx = egui::Context::default();
            let egui_state = egui_winit::State::new(
                egui_ctx.clone(),
                egui_ctx.viewport_id(),
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            );
            let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

            AppState {
                window,
                device,
                queue,
                surface,
                surface_config,
                renderer,
                book,
                host,
                style: StyleConfig::default(),
                cursor: None,
                last_frame: Instant::now(),
                egui_ctx,
                egui_state,
                egui_renderer,
            }
        });

        self.state = Some(state);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Pass events to egui first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                state.surface_config.width = new_size.width.max(1);
                state.surface_config.height = new_size.height.max(1);
                state
                    .surface
                    .configure(&state.device, &state.surface_config);
                let book = &state.book;
                state.host.resize(
                    state.surface_config.width as f32,
                    state.surface_config.height as f32,
                    book,
                );
                state.window.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.cursor = Some(position);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(world) = state.cursor_world() {
                    let local = state.host.world_to_local(world);
                    let direction = if local.x >= 0.0 {
                        Direction::Right
                    } else {
                        Direction::Left
                    };
                    if let Err(err) = state.book.begin_turn(direction, world, &mut state.host)
                    {
                        log::info!("drag ignored: {err}");
                    }
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                state.book.release();
            }
            WindowEvent::RedrawRequested => {
                let output = match state.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state
                            .surface
                            .configure(&state.device, &state.surface_config);
                        return;
                    }
                    Err(e) => {
                        eprintln!("Surface error: {e:?}");
                        return;
                    }
                };

                // Feed the live pointer while dragging, then advance any
                // settle in flight.
                if let Some(world) = state.cursor_world() {
                    state.book.drag_to(world, &mut state.host);
                }
                let now = Instant::now();
                let dt = (now - state.last_frame).as_secs_f32().min(0.1);
                state.last_frame = now;
                if let Some(outcome) = state.book.tick(dt, &mut state.host) {
                    log::info!("page turn settled, advanced={}", outcome.advanced);
                }

                // --- egui frame ---
                let raw_input = state.egui_state.take_egui_input(&state.window);
                let layout = state.host.layout;
                let page_count = state.book.page_count();
                let mut settle_duration = state.book.settle_duration();
                let style = &mut state.style;
                let mut request = folio::gui::PanelRequest::default();
                let full_output = state.egui_ctx.run(raw_input, |ctx| {
                    request =
                        book_control_panel(ctx, &mut settle_duration, style, layout, page_count);
                });
                state.book.set_settle_duration(settle_duration);

                if let Some(direction) = request.turn {
                    state.request_turn(direction);
                }
                if request.save_config {
                    state.save_config();
                }
                if request.load_config {
                    state.load_config();
                }

                state
                    .egui_state
                    .handle_platform_output(&state.window, full_output.platform_output);

                let paint_jobs = state
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                for (id, delta) in &full_output.textures_delta.set {
                    state
                        .egui_renderer
                        .update_texture(&state.device, &state.queue, *id, delta);
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.surface_config.width, state.surface_config.height],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                let mut encoder =
                    state
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("folio_encoder"),
                        });

                state.egui_renderer.update_buffers(
                    &state.device,
                    &state.queue,
                    &mut encoder,
                    &paint_jobs,
                    &screen_descriptor,
                );

                state.renderer.upload(&state.queue, &state.uniforms());

                // Render book + egui overlay in same pass
                {
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("folio_render_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });

                    state.renderer.draw(&mut pass);

                    state.egui_renderer.render(
                        &mut pass.forget_lifetime(),
                        &paint_jobs,
                        &screen_descriptor,
                    );
                }

                for id in &full_output.textures_delta.free {
                    state.egui_renderer.free_texture(id);
                }

                state.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                state.window.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().unwrap();
    let mut app = App { state: None };
    event_loop.run_app(&mut app).unwrap();
}
