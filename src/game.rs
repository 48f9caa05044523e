use euclid::{
    default::{Point2D, Rect},
    point2, size2,
};
use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    assets::{AssetError, AssetPaths, Assets, Sprite},
    constants::{ELAPSED_STEP, RESTART_BUTTON, SCREEN_SIZE, SCREEN_WIDTH},
    font::{text_size, LINE_HEIGHT},
    graphics::{black, button_grey, placement, white, Surface},
    input::InputSnapshot,
    world::{StepOutcome, World},
};

const SCORE_ORIGIN: (f32, f32) = (10., 8.);
const GAME_OVER_GAP: f32 = 50.;

pub struct Game {
    world: World,
    score: u32,
    game_over: bool,
    restart_button: Rect<f32>,

    asset_paths: AssetPaths,
    assets: Option<Assets>,
}

impl Game {
    pub fn new(asset_paths: AssetPaths) -> Self {
        Game::with_world(World::new(SmallRng::from_entropy()), asset_paths, None)
    }

    fn with_world(world: World, asset_paths: AssetPaths, assets: Option<Assets>) -> Self {
        let [x, y, width, height] = RESTART_BUTTON;
        Game {
            world,
            score: 0,
            game_over: false,
            restart_button: Rect::new(point2(x, y), size2(width, height)),
            asset_paths,
            assets,
        }
    }

    pub fn load_assets(&mut self) -> Result<(), AssetError> {
        if self.assets.is_none() {
            self.assets = Some(Assets::load(&self.asset_paths)?);
        }
        Ok(())
    }

    /// Fixed logical resolution regardless of the window size.
    pub fn layout(&self, _outside: (u32, u32)) -> (u32, u32) {
        SCREEN_SIZE
    }

    /// Game time, advanced by `ELAPSED_STEP` on every scored frame. Derived
    /// from the score so it does not accumulate rounding error.
    pub fn elapsed_time(&self) -> f32 {
        self.score as f32 * ELAPSED_STEP
    }

    pub fn update(&mut self, input: &InputSnapshot) -> Result<(), AssetError> {
        self.load_assets()?;

        if !self.game_over {
            self.score += 1;

            self.world.player.steer(input.left, input.right);
            if self.world.step(self.elapsed_time()) == StepOutcome::Collision {
                log::info!("Game over with score {}", self.score);
                self.game_over = true;
            }
        }

        if self.game_over && input.primary_pressed && self.restart_hit(input.cursor) {
            self.reset();
        }
        Ok(())
    }

    /// Compares whole cursor pixels, so edges and fractional positions on
    /// the far edge count as inside.
    fn restart_hit(&self, cursor: Point2D<f32>) -> bool {
        let cursor = cursor.floor();
        let button = &self.restart_button;
        cursor.x >= button.min_x()
            && cursor.x <= button.max_x()
            && cursor.y >= button.min_y()
            && cursor.y <= button.max_y()
    }

    pub fn reset(&mut self) {
        log::info!("Restarting");
        self.world.reset();
        self.score = 0;
        self.game_over = false;
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.clear(black());

        if let Some(assets) = &self.assets {
            draw_sprite(surface, &assets.background, point2(0., 0.));
        }

        surface.text(
            &format!("Score: {}", self.score),
            point2(SCORE_ORIGIN.0, SCORE_ORIGIN.1),
            white(),
        );

        if self.game_over {
            let message = "Game Over";
            let message_width = text_size(message).width;
            surface.text(
                message,
                point2(
                    (SCREEN_WIDTH - message_width) / 2.,
                    self.restart_button.min_y() - GAME_OVER_GAP,
                ),
                white(),
            );

            surface.fill_rect(self.restart_button, button_grey());

            let label = "Restart";
            let label_size = text_size(label);
            let center = self.restart_button.center();
            surface.text(
                label,
                point2(
                    center.x - label_size.width / 2.,
                    center.y - LINE_HEIGHT / 2.,
                ),
                white(),
            );
            return;
        }

        if let Some(assets) = &self.assets {
            draw_sprite(surface, &assets.player, self.world.player.position);
            for asteroid in self.world.asteroids() {
                draw_sprite(surface, &assets.asteroid, asteroid.position);
            }
        }
    }
}

fn draw_sprite(surface: &mut impl Surface, sprite: &Sprite, position: Point2D<f32>) {
    surface.blit(&sprite.image, &placement(sprite.scale, position));
}
