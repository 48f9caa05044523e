mod assets;
mod constants;
mod font;
mod game;
mod gl;
mod graphics;
mod input;
mod platform;
mod renderer;
mod texture_atlas;
mod world;

use assets::AssetPaths;
use constants::{MAX_CATCHUP_TICKS, SCREEN_SIZE, TICK_DT};
use game::Game;
use input::{InputEvent, InputSnapshot};
use renderer::Renderer;

fn main() {
    platform::run("Asteroids", SCREEN_SIZE, |gl_context: &mut gl::Context| {
        let mut renderer = Renderer::new(gl_context)?;

        let mut game = Game::new(AssetPaths::default());
        game.load_assets()?;
        log::info!("Logical resolution {:?}", game.layout(SCREEN_SIZE));

        let mut input = InputSnapshot::default();
        let mut last_update: f32 = 0.;
        Ok(
            move |dt: f32,
                  inputs: &[InputEvent],
                  gl_context: &mut gl::Context|
                  -> Result<(), anyhow::Error> {
                for event in inputs {
                    input.apply(event);
                }

                // fixed update loop, skip at most a handful of ticks
                last_update = (last_update + dt).min(TICK_DT * MAX_CATCHUP_TICKS);
                while last_update > TICK_DT {
                    game.update(&input)?;
                    last_update -= TICK_DT;
                }

                game.draw(&mut renderer);
                renderer.present(gl_context)
            },
        )
    })
}
