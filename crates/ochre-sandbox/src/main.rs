//! Sandbox: a small scene exercising the gizmo and sprite renderers.

use glam::{Mat4, Vec2, Vec3};

use ochre_engine::color::Color;
use ochre_engine::core::{App, AppControl, FrameCtx};
use ochre_engine::device::GpuInit;
use ochre_engine::gizmo::{GizmoConfig, GizmoRenderer, Gizmos};
use ochre_engine::input::Key;
use ochre_engine::logging::init_logging;
use ochre_engine::render::Viewport;
use ochre_engine::sprite::{Camera2D, SpriteBatch, SpriteBatchConfig, SpriteRenderer};
use ochre_engine::window::{Runtime, RuntimeConfig};

struct Sandbox {
    gizmos: Gizmos,
    gizmo_config: GizmoConfig,
    gizmo_renderer: Option<GizmoRenderer>,

    batch: SpriteBatch,
    sprite_renderer: SpriteRenderer,
    camera: Camera2D,

    elapsed: f32,
}

impl Sandbox {
    fn new() -> Self {
        let gizmo_config = GizmoConfig::default();
        Self {
            gizmos: Gizmos::new(gizmo_config.clone()),
            gizmo_config,
            gizmo_renderer: None,
            batch: SpriteBatch::new(SpriteBatchConfig::default()),
            sprite_renderer: SpriteRenderer::new(),
            camera: Camera2D::default(),
            elapsed: 0.0,
        }
    }

    fn build_scene(&mut self, pointer: Option<(f32, f32)>, height: f32) {
        let t = self.elapsed;
        self.gizmos.clear();

        // Ground grid, center lines highlighted.
        for i in 0..21 {
            let p = -10.0 + i as f32;
            let color = if i == 10 { Color::WHITE } else { Color::BLACK };
            self.gizmos
                .add_line(Vec3::new(p, 0.0, 10.0), Vec3::new(p, 0.0, -10.0), color);
            self.gizmos
                .add_line(Vec3::new(10.0, 0.0, p), Vec3::new(-10.0, 0.0, p), color);
        }

        self.gizmos.add_transform(&Mat4::IDENTITY, 2.0);

        let spin = Mat4::from_rotation_y(t * 0.5);
        self.gizmos.add_sphere(
            Vec3::new(0.0, 2.5, 0.0),
            1.0,
            8,
            16,
            Color::new(1.0, 0.2, 0.2, 0.4),
            Some(&spin),
        );
        self.gizmos.add_aabb_filled(
            Vec3::new(4.0, 1.0, 0.0),
            Vec3::ONE,
            Color::new(0.2, 1.0, 0.2, 0.35),
            Some(&spin),
        );
        self.gizmos.add_capsule(
            Vec3::new(-4.0, 2.0, 0.0),
            4.0,
            1.0,
            8,
            12,
            Color::new(0.2, 0.4, 1.0, 0.5),
            None,
        );
        self.gizmos.add_ring(
            Vec3::new(0.0, 0.05, 0.0),
            2.5,
            3.0,
            32,
            Color::new(1.0, 1.0, 0.2, 0.3),
            None,
        );
        self.gizmos.add_hermite_spline(
            Vec3::new(-8.0, 0.0, -8.0),
            Vec3::new(8.0, 4.0 + (t.sin() * 2.0), 8.0),
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, -10.0, 0.0),
            24,
            Color::new(1.0, 0.5, 0.0, 1.0),
        );

        // Screen-space overlay: outline circle following the pointer.
        if let Some((x, y)) = pointer {
            let center = Vec2::new(x, height - y);
            self.gizmos
                .add_2d_circle(center, 12.0, 24, Color::WHITE.with_alpha(0.0), None);
        }
    }

    fn draw_hud(&mut self, viewport: Viewport) {
        let t = self.elapsed;
        self.batch.begin(&self.camera, viewport);

        // Panel backdrop.
        self.batch.set_modulate(Color::new(0.0, 0.0, 0.0, 0.6));
        self.batch
            .draw_box(140.0, viewport.height - 40.0, 260.0, 60.0, 0.0, 10.0);

        // Bouncing marker.
        self.batch.set_modulate(Color::new(1.0, 0.6, 0.1, 1.0));
        self.batch
            .draw_circle(60.0, 60.0 + (t * 3.0).sin().abs() * 40.0, 14.0, 0.0);

        // Frame of the window.
        self.batch.set_modulate(Color::WHITE);
        let w = viewport.width;
        let h = viewport.height;
        self.batch.draw_line(2.0, 2.0, w - 2.0, 2.0, 2.0, 0.0);
        self.batch.draw_line(w - 2.0, 2.0, w - 2.0, h - 2.0, 2.0, 0.0);
        self.batch.draw_line(w - 2.0, h - 2.0, 2.0, h - 2.0, 2.0, 0.0);
        self.batch.draw_line(2.0, h - 2.0, 2.0, 2.0, 2.0, 0.0);

        self.batch.end();
    }
}

impl App for Sandbox {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.elapsed += ctx.time.dt;

        let (width, height) = ctx.window.logical_size();
        self.build_scene(ctx.input.pointer_pos(), height);
        self.draw_hud(Viewport::new(width, height));

        let aspect = (width / height.max(1.0)).max(0.01);
        let projection = Mat4::perspective_rh(45f32.to_radians(), aspect, 0.1, 1000.0);
        let view = Mat4::look_at_rh(Vec3::new(12.0, 10.0, 12.0), Vec3::ZERO, Vec3::Y);

        let Sandbox {
            gizmos,
            gizmo_config,
            gizmo_renderer,
            batch,
            sprite_renderer,
            ..
        } = self;

        ctx.render(Color::new(0.15, 0.16, 0.18, 1.0), |rctx, target| {
            let renderer = gizmo_renderer.get_or_insert_with(|| {
                GizmoRenderer::new(rctx.device, rctx.surface_format, gizmo_config)
            });

            renderer.draw(rctx, target, projection * view, gizmos);
            sprite_renderer.draw(rctx, target, batch);

            let screen = Camera2D::default().projection(rctx.viewport);
            renderer.draw_2d(rctx, target, screen, gizmos);
        })
    }
}

fn main() {
    init_logging(Some("info,wgpu=warn"));

    let gpu_init = GpuInit {
        required_features: SpriteRenderer::required_features(),
        required_limits: SpriteRenderer::required_limits(),
        ..GpuInit::default()
    };

    let config = RuntimeConfig {
        title: "ochre sandbox".to_string(),
        ..RuntimeConfig::default()
    };

    if let Err(e) = Runtime::run(config, gpu_init, Sandbox::new()) {
        log::error!("runtime error: {e:#}");
        std::process::exit(1);
    }
}
