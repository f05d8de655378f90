use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use egui::{Align2, Color32, FontId, LayerId, Order, Stroke};
use folio_common::{Capabilities, Rect, Viewport};
use folio_page::{PageConfig, PageFrame, PageShell};
use folio_render::{DebugTextRenderer, RenderView, Renderer, project_card};
use glam::Vec2;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// Pixels scrolled per wheel notch.
const LINE_HEIGHT: f32 = 40.0;
/// Longest frame step handed to the shell, so a stalled window doesn't
/// teleport springs.
const MAX_FRAME: Duration = Duration::from_millis(100);

const BACKGROUND: Color32 = Color32::from_rgb(10, 10, 16);
const SECTION_ALT: Color32 = Color32::from_rgb(16, 16, 26);
const ACCENT: Color32 = Color32::from_rgb(124, 92, 255);
const TEXT: Color32 = Color32::from_rgb(230, 230, 240);
const MUTED: Color32 = Color32::from_rgb(150, 150, 170);

#[derive(Parser)]
#[command(name = "folio-desktop", about = "Folio page in a desktop window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Page config (.yaml, .yml or .json); defaults to the stock page
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat the device as touch-only (native cursor, no tilt)
    #[arg(long)]
    touch: bool,
}

// ---------------------------------------------------------------------------
// Page state (no GPU handles)
// ---------------------------------------------------------------------------

struct PageState {
    shell: PageShell,
    view: RenderView,
    last_frame: Instant,
    show_overlay: bool,
}

impl PageState {
    fn new(shell: PageShell) -> Self {
        Self {
            shell,
            view: RenderView::default(),
            last_frame: Instant::now(),
            show_overlay: false,
        }
    }

    fn step(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).min(MAX_FRAME);
        self.last_frame = now;
        self.shell.advance(dt);
    }

    fn draw_ui(&self, ctx: &egui::Context) {
        let frame = self.shell.frame();
        let page = ctx.layer_painter(LayerId::background());
        let scroll = Vec2::new(0.0, -frame.scroll_offset);

        page.rect_filled(to_egui(frame.viewport.rect()), 0.0, BACKGROUND);

        let layout = self.shell.layout();
        for (i, section) in layout.sections().iter().enumerate() {
            let bounds = section.bounds.translate(scroll);
            if i % 2 == 1 {
                page.rect_filled(to_egui(bounds), 0.0, SECTION_ALT);
            }

            let (opacity, dy) = reveal_for(&frame, section.heading);
            page.text(
                pos(section.heading.translate(scroll).min + Vec2::new(0.0, dy)),
                Align2::LEFT_TOP,
                &section.title,
                FontId::proportional(32.0),
                TEXT.gamma_multiply(opacity),
            );

            if let (Some(rect), Some(text)) = (section.typewriter, frame.text()) {
                page.text(
                    pos(rect.translate(scroll).min),
                    Align2::LEFT_TOP,
                    format!("{}|", text.text),
                    FontId::proportional(32.0),
                    ACCENT,
                );
            }

            for action in &section.actions {
                let r = to_egui(action.bounds.translate(scroll));
                page.rect_stroke(r, 8.0, Stroke::new(1.5, ACCENT), egui::StrokeKind::Inside);
                let font = FontId::proportional(16.0);
                page.text(r.center(), Align2::CENTER_CENTER, &action.label, font, TEXT);
            }

            for card in &section.cards {
                self.draw_card(&page, &frame, card.bounds, &card.label, scroll);
            }
        }

        let nav = layout.navbar();
        let (nav_opacity, nav_dy) = reveal_for(&frame, nav);
        let nav_shift = Vec2::new(0.0, nav_dy);
        let chrome = ctx.layer_painter(LayerId::new(Order::Foreground, egui::Id::new("chrome")));
        chrome.rect_filled(
            to_egui(nav.translate(nav_shift)),
            0.0,
            BACKGROUND.gamma_multiply(0.9 * nav_opacity),
        );
        for link in layout.nav_links() {
            chrome.text(
                to_egui(link.bounds.translate(nav_shift)).center(),
                Align2::CENTER_CENTER,
                &link.label,
                FontId::proportional(16.0),
                MUTED.gamma_multiply(nav_opacity),
            );
        }

        if let Some(progress) = frame.progress() {
            chrome.rect_filled(to_egui(Rect::new(0.0, 0.0, progress.bar_width, 4.0)), 0.0, ACCENT);
        }

        if let Some(cursor) = frame.cursor() {
            let top = ctx.layer_painter(LayerId::new(Order::Tooltip, egui::Id::new("cursor")));
            top.circle_filled(pos(cursor.dot.center()), cursor.dot.radius(), ACCENT);
            top.circle_stroke(
                pos(cursor.ring.center()),
                cursor.ring.radius(),
                Stroke::new(1.5, ACCENT.gamma_multiply(0.6)),
            );
        }

        if self.show_overlay {
            let dump = DebugTextRenderer::new().render(&frame, &self.view);
            egui::Window::new("Frame").default_width(420.0).show(ctx, |ui| {
                ui.monospace(dump);
            });
        }
    }

    fn draw_card(
        &self,
        painter: &egui::Painter,
        frame: &PageFrame,
        bounds: Rect,
        title: &str,
        scroll: Vec2,
    ) {
        let (opacity, dy) = reveal_for(frame, bounds);
        let tilt = frame.tilts().find(|t| t.bounds == bounds);
        let rotation = tilt.map(|t| t.rotation).unwrap_or_default();
        let depth = tilt.map(|t| t.content_depth).unwrap_or(0.0);
        let screen = bounds.translate(scroll + Vec2::new(0.0, dy));

        let face = project_card(screen, rotation, 0.0, self.view.perspective);
        let hovered = tilt.is_some_and(|t| t.hovered);
        let border = if hovered { ACCENT } else { MUTED.gamma_multiply(0.4) };
        painter.add(egui::Shape::convex_polygon(
            face.iter().copied().map(pos).collect(),
            SECTION_ALT.gamma_multiply(opacity),
            Stroke::new(1.0, border.gamma_multiply(opacity)),
        ));

        let content = project_card(screen, rotation, depth, self.view.perspective);
        painter.text(
            pos(content[0] + Vec2::splat(24.0)),
            Align2::LEFT_TOP,
            title,
            FontId::proportional(20.0),
            TEXT.gamma_multiply(opacity),
        );
        tracing::trace!(title, x = rotation.x, y = rotation.y, "card");
    }
}

fn reveal_for(frame: &PageFrame, bounds: Rect) -> (f32, f32) {
    frame
        .reveals()
        .find(|r| r.bounds == bounds)
        .map(|r| (r.opacity, r.offset_y))
        .unwrap_or((1.0, 0.0))
}

fn pos(v: Vec2) -> egui::Pos2 {
    egui::pos2(v.x, v.y)
}

fn to_egui(r: Rect) -> egui::Rect {
    egui::Rect::from_min_size(pos(r.min), egui::vec2(r.width(), r.height()))
}

// ---------------------------------------------------------------------------
// wgpu + egui application
// ---------------------------------------------------------------------------

struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        egui_ctx: &egui::Context,
        viewport: Viewport,
    ) -> anyhow::Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Folio")
            .with_inner_size(winit::dpi::LogicalSize::new(viewport.width, viewport.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("folio-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(
            width = config.width,
            height = config.height,
            ?format,
            adapter = %adapter.get_info().name,
            "GPU surface ready"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            egui_winit,
            egui_renderer,
        })
    }

    fn logical_viewport(&self) -> Viewport {
        let size = self.window.inner_size().to_logical::<f32>(self.window.scale_factor());
        Viewport::new(size.width, size.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
    }
}

struct GpuApp {
    state: PageState,
    egui_ctx: egui::Context,
    gpu: Option<Gpu>,
}

impl GpuApp {
    fn new(shell: PageShell) -> Self {
        Self {
            state: PageState::new(shell),
            egui_ctx: egui::Context::default(),
            gpu: None,
        }
    }

    fn redraw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        self.state.step();

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::warn!("surface error: {e}");
                return;
            }
        };
        let target = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let state = &self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("folio-frame") });
        gpu.egui_renderer
            .update_buffers(&gpu.device, &gpu.queue, &mut encoder, &paint_jobs, &screen);

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("page"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 0.04,
                                g: 0.04,
                                b: 0.06,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            gpu.egui_renderer.render(&mut pass, &paint_jobs, &screen);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }
        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        let gpu = match Gpu::new(event_loop, &self.egui_ctx, self.state.shell.viewport()) {
            Ok(gpu) => gpu,
            Err(e) => {
                tracing::error!("failed to start GPU: {e:#}");
                event_loop.exit();
                return;
            }
        };

        let shell = &mut self.state.shell;
        gpu.window.set_cursor_visible(shell.capabilities().touch);
        shell.resize(gpu.logical_viewport());
        shell.mount();
        self.state.last_frame = Instant::now();
        self.gpu = Some(gpu);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        // The page paints under egui, so it sees input even when egui also does.
        let _ = gpu.egui_winit.on_window_event(&gpu.window, &event);
        let scale = gpu.window.scale_factor() as f32;
        let shell = &mut self.state.shell;

        match event {
            WindowEvent::CloseRequested => {
                shell.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
                shell.resize(gpu.logical_viewport());
            }
            WindowEvent::CursorMoved { position, .. } => {
                shell.pointer_moved(Vec2::new(position.x as f32, position.y as f32) / scale);
            }
            WindowEvent::CursorLeft { .. } => shell.pointer_left(),
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(p) => -(p.y as f32) / scale,
                };
                shell.scroll_by(dy);
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.logical_key {
                    Key::Named(NamedKey::F1) => self.state.show_overlay = !self.state.show_overlay,
                    Key::Named(NamedKey::Home) => {
                        shell.scroll_to(0.0);
                    }
                    Key::Named(NamedKey::End) => {
                        let bottom = shell.layout().max_scroll();
                        shell.scroll_to(bottom);
                    }
                    Key::Named(NamedKey::PageDown) => {
                        let page = shell.viewport().height;
                        shell.scroll_by(page);
                    }
                    Key::Named(NamedKey::PageUp) => {
                        let page = shell.viewport().height;
                        shell.scroll_by(-page);
                    }
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => {
            PageConfig::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => PageConfig::default(),
    };
    let mut shell = PageShell::new(config)?;
    if cli.touch {
        shell = shell.with_capabilities(Capabilities::touch());
    }

    tracing::info!(
        sections = shell.layout().sections().len(),
        widgets = shell.widget_count(),
        touch = shell.capabilities().touch,
        "starting folio-desktop"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = GpuApp::new(shell);
    event_loop.run_app(&mut app)?;

    Ok(())
}
