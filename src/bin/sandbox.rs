//=========================================================================
// Sandbox
//=========================================================================
//
// Minimal playable demo that exercises the engine end to end.
//
// Usage:
//   sandbox [CONFIG] [--debug-fps] [--log-filter <FILTER>]
//
// Controls:
//   Enter   start / resume
//   Left / Right  move the ship
//   Space   fire (beam cue)
//   H       hit cue
//   P       pause (pushes a state)
//   Q       return to title (changes state)
//   Escape  quit
//
//=========================================================================

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use glam::{Mat4, Vec2, Vec4};
use log::{error, info};

use stagehand_engine::prelude::*;

//=== CLI =================================================================

#[derive(Parser)]
#[command(name = "sandbox")]
#[command(about = "Stagehand engine sandbox")]
struct Cli {
    /// Engine config file (missing file means defaults)
    #[arg(default_value = "stagehand.toml")]
    config: PathBuf,

    /// Show the FPS counter in the window title
    #[arg(long)]
    debug_fps: bool,

    /// env_logger filter, overrides RUST_LOG
    #[arg(long)]
    log_filter: Option<String>,
}

//=== Camera ==============================================================

/// Fixed orthographic camera covering the window in pixels, origin at
/// the bottom-left corner.
struct ScreenCamera {
    width: f32,
    height: f32,
}

impl Camera for ScreenCamera {
    fn view(&self) -> Mat4 {
        Mat4::IDENTITY
    }

    fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.width, 0.0, self.height, -1.0, 1.0)
    }
}

//=== States ==============================================================

const SHIP_SPEED: f32 = 320.0;
const SHIP_SIZE: Vec2 = Vec2::new(48.0, 24.0);

struct TitleState;

impl SceneState for TitleState {
    fn init(&mut self, ctx: &mut Context) {
        ctx.log_debug("Title screen, press Enter");
    }

    fn update(&mut self, ctx: &mut Context) {
        if ctx.input().was_pressed(KeyCode::Enter) {
            ctx.change_state(Box::new(PlayState::default()));
        }
    }

    fn draw(&mut self, _ctx: &mut Context) {}

    fn name(&self) -> &str {
        "title"
    }
}

#[derive(Default)]
struct PlayState {
    camera: Option<Rc<ScreenCamera>>,
    ship: QuadSprite,
    shots: u32,
    elapsed: f32,
}

impl SceneState for PlayState {
    fn init(&mut self, ctx: &mut Context) {
        let camera = Rc::new(ScreenCamera {
            width: ctx.screen_width() as f32,
            height: ctx.screen_height() as f32,
        });
        self.ship = QuadSprite::new(
            Vec2::new(camera.width * 0.5, SHIP_SIZE.y * 2.0),
            SHIP_SIZE,
            Vec4::new(0.9, 0.8, 0.2, 1.0),
        );
        ctx.set_main_camera(&camera);
        self.camera = Some(camera);
        ctx.play_bgm();
    }

    fn cleanup(&mut self, ctx: &mut Context) {
        ctx.unset_main_camera();
        self.camera = None;
        ctx.log_debug(&format!("Play ended after {:.1}s, {} shots", self.elapsed, self.shots));
    }

    fn update(&mut self, ctx: &mut Context) {
        let seconds = ctx.delta() / 1000.0;
        self.elapsed += seconds;

        let input = ctx.input();
        let mut dir = 0.0;
        if input.is_down(KeyCode::ArrowLeft) {
            dir -= 1.0;
        }
        if input.is_down(KeyCode::ArrowRight) {
            dir += 1.0;
        }
        let fire = input.was_pressed(KeyCode::Space);
        let hit = input.was_pressed(KeyCode::KeyH);
        let pause = input.was_pressed(KeyCode::KeyP);
        let back = input.was_pressed(KeyCode::KeyQ);

        let half = SHIP_SIZE.x * 0.5;
        let right = ctx.screen_width() as f32 - half;
        let x = self.ship.position.x + dir * SHIP_SPEED * seconds;
        self.ship.position.x = x.clamp(half, right.max(half));

        if fire {
            self.shots += 1;
            ctx.play_beam();
        }
        if hit {
            ctx.play_hit();
        }
        if ctx.left_mouse_down() {
            let pos = ctx.mouse_pos();
            ctx.log_debug(&format!("Click at ({:.0}, {:.0})", pos.x, pos.y));
        }

        if pause {
            ctx.push_state(Box::new(PauseState));
        } else if back {
            ctx.play_explosion();
            ctx.change_state(Box::new(TitleState));
        }
    }

    fn draw(&mut self, ctx: &mut Context) {
        ctx.draw_sprite(&mut self.ship);
    }

    fn name(&self) -> &str {
        "play"
    }
}

struct PauseState;

impl SceneState for PauseState {
    fn update(&mut self, ctx: &mut Context) {
        if ctx.input().was_pressed(KeyCode::Enter) {
            ctx.pop_state();
        }
    }

    fn draw(&mut self, _ctx: &mut Context) {}

    fn name(&self) -> &str {
        "pause"
    }
}

//=== Entry Point =========================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log_filter,
        ..LoggingConfig::default()
    });

    let mut config = match EngineConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!(target: "engine", "{}", e);
            return ExitCode::FAILURE;
        }
    };
    config.debug_fps |= cli.debug_fps;

    let mut engine = match EngineBuilder::new(config).build() {
        Ok(engine) => engine,
        Err(e) => {
            error!(target: "engine", "{}", e);
            return ExitCode::FAILURE;
        }
    };

    engine.push_state(TitleState);
    engine.run();

    info!(target: "engine", "Sandbox finished");
    ExitCode::SUCCESS
}
