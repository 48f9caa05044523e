pub const TICK_DT: f32 = 1. / 60.;
pub const MAX_CATCHUP_TICKS: f32 = 5.;

pub const SCREEN_SIZE: (u32, u32) = (640, 480);
pub const SCREEN_WIDTH: f32 = SCREEN_SIZE.0 as f32;
pub const SCREEN_HEIGHT: f32 = SCREEN_SIZE.1 as f32;

pub const PLAYER_SIZE: f32 = 32.;
pub const ASTEROID_SIZE: f32 = 32.;
pub const SPEED: f32 = 4.;

// game time added per tick, drives both the spawn chance and asteroid speed
pub const ELAPSED_STEP: f32 = 1. / 100.;
pub const BASE_SPAWN_CHANCE: f32 = 0.02;

// x, y, width, height
pub const RESTART_BUTTON: [f32; 4] = [270., 250., 100., 50.];

pub const PLAYER_IMAGE: &str = "assets/player.png";
pub const ASTEROID_IMAGE: &str = "assets/asteroid.png";
pub const BACKGROUND_IMAGE: &str = "assets/background.png";
