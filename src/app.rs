use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::board::{Board, BoardConfig, ResizeDebounce};
use crate::config::{BACKGROUND_COLOR, RESIZE_DEBOUNCE_MS, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::gpu::{BlitPipeline, GpuContext, LayerTexture, ShapeBuffers, ShapeRenderer};
use crate::render::{paint_pulses, paint_traces, premultiplied, PaintStyle, ShapeBatch, Surface2d};

/// GPU-side objects, created once the window exists
struct Presenter {
    gpu: GpuContext,
    blit: BlitPipeline,
    shapes: ShapeRenderer,
    trace_layer: LayerTexture,
    layer_bind_group: wgpu::BindGroup,
    trace_buffers: ShapeBuffers,
    pulse_buffers: ShapeBuffers,
    background: wgpu::Color,
}

impl Presenter {
    fn new(window: Arc<Window>) -> Result<Self> {
        let gpu = pollster::block_on(GpuContext::new(window))?;
        let blit = BlitPipeline::new(&gpu.device, gpu.format());
        let shapes = ShapeRenderer::new(&gpu.device, gpu.format());
        let trace_layer = LayerTexture::new(&gpu.device, gpu.config.width, gpu.config.height);
        let layer_bind_group = blit.create_bind_group(&gpu.device, &trace_layer.view);
        let layout = shapes.bind_group_layout();
        let trace_buffers = ShapeBuffers::new(&gpu.device, layout, "trace-shapes");
        let pulse_buffers = ShapeBuffers::new(&gpu.device, layout, "pulse-shapes");

        Ok(Self {
            gpu,
            blit,
            shapes,
            trace_layer,
            layer_bind_group,
            trace_buffers,
            pulse_buffers,
            background: to_wgpu_color(BACKGROUND_COLOR),
        })
    }

    /// Draw the trace batch into the layer texture; runs once per regeneration
    fn bake_traces(&mut self, batch: &ShapeBatch) {
        let (width, height) = batch.size();
        if !self.trace_layer.matches(width, height) {
            self.trace_layer = LayerTexture::new(&self.gpu.device, width, height);
            self.layer_bind_group = self
                .blit
                .create_bind_group(&self.gpu.device, &self.trace_layer.view);
        }
        if let Some(color) = batch.clear_color() {
            self.background = to_wgpu_color(color);
        }

        self.trace_buffers
            .upload(&self.gpu.device, &self.gpu.queue, (width, height), batch.shapes());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("trace-layer-encoder"),
            });
        self.shapes
            .render_layer(&mut encoder, &self.trace_layer.view, &self.trace_buffers);
        self.gpu.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Background, trace layer, then this frame's pulses
    fn present(&mut self, pulses: &ShapeBatch) {
        self.pulse_buffers
            .upload(&self.gpu.device, &self.gpu.queue, pulses.size(), pulses.shapes());

        let output = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.blit.draw(&mut pass, &self.layer_bind_group);
            self.shapes.draw_overlay(&mut pass, &self.pulse_buffers);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

fn to_wgpu_color(color: [u8; 4]) -> wgpu::Color {
    let [r, g, b, a] = premultiplied(color);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    board: Board,
    style: PaintStyle,
    /// This frame's pulses, re-recorded every redraw
    pulse_batch: ShapeBatch,
    resize: ResizeDebounce,
    rng: StdRng,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new() -> Self {
        Self {
            window: None,
            presenter: None,
            board: Board::new(BoardConfig::default()),
            style: PaintStyle::default(),
            pulse_batch: ShapeBatch::default(),
            resize: ResizeDebounce::new(Duration::from_millis(RESIZE_DEBOUNCE_MS)),
            rng: StdRng::from_entropy(),
            fps_counter: FpsCounter::new(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Circuit Pulse")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );

        log::info!("Creating GPU context...");
        let presenter = Presenter::new(window.clone())?;

        let size = window.inner_size();
        self.window = Some(window);
        self.presenter = Some(presenter);

        // Traces and pulses exist before the first frame is drawn
        self.regenerate(size.width, size.height);
        Ok(())
    }

    /// New traces, new pulses, new static layer
    fn regenerate(&mut self, width: u32, height: u32) {
        self.board.regenerate(width, height, &mut self.rng);

        let mut layer = ShapeBatch::new(width, height);
        paint_traces(
            &mut layer,
            self.board.traces(),
            self.board.cell_size(),
            &self.style,
        );

        if let Some(presenter) = &mut self.presenter {
            presenter.bake_traces(&layer);
        }
    }

    fn render(&mut self) {
        if let Some((width, height)) = self.resize.poll(Instant::now()) {
            log::info!("Resize settled at {}x{}, regenerating", width, height);
            self.regenerate(width, height);
        }

        let pulses = self.board.step(&mut self.rng);
        let (width, height) = self.board.size_px();
        self.pulse_batch.reset(width, height);
        paint_pulses(&mut self.pulse_batch, &pulses, &self.style);

        let Some(presenter) = &mut self.presenter else {
            return;
        };
        if width == 0 || height == 0 {
            // Zero-sized board (minimised window); nothing to show
            return;
        }
        presenter.present(&self.pulse_batch);

        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "Circuit Pulse - {:.0} FPS - {} traces, {} pulses",
                    fps,
                    self.board.traces().len(),
                    self.board.pulses().len()
                ));
            }
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        if key_code == KeyCode::KeyR {
            let (width, height) = self.board.size_px();
            log::info!("Regenerating board");
            self.regenerate(width, height);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing circuit board background...");
        if let Err(e) = self.init(event_loop) {
            log::error!("Initialization failed: {:#}", e);
            event_loop.exit();
            return;
        }

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  R: Regenerate traces");
        log::info!("  Escape: Quit");

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.board
                    .set_pointer(Some((position.x as f32, position.y as f32)));
            }
            WindowEvent::CursorLeft { .. } => {
                self.board.set_pointer(None);
            }
            WindowEvent::Resized(new_size) => {
                if let Some(presenter) = &mut self.presenter {
                    log::debug!("Window resized to {}x{}", new_size.width, new_size.height);
                    presenter.gpu.resize(new_size);
                }
                if new_size.width > 0 && new_size.height > 0 {
                    self.resize
                        .note((new_size.width, new_size.height), Instant::now());
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                // Request another frame immediately
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
