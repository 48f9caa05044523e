use euclid::{
    default::{Point2D, Rect},
    point2, size2,
};
use rand::{rngs::SmallRng, Rng};

use crate::constants::{
    ASTEROID_SIZE, BASE_SPAWN_CHANCE, PLAYER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH, SPEED,
};

/// Chance that a single tick spawns an asteroid. Grows without bound, so
/// past roughly 980 time units every tick spawns one.
pub fn spawn_probability(elapsed: f32) -> f32 {
    BASE_SPAWN_CHANCE + elapsed / 1000.
}

/// Distance every asteroid falls during one tick.
pub fn asteroid_speed(elapsed: f32) -> f32 {
    SPEED * (3. + elapsed / 100.)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Player {
    pub position: Point2D<f32>,
}

impl Player {
    pub fn spawn() -> Self {
        Player {
            position: point2(
                SCREEN_WIDTH / 2. - PLAYER_SIZE / 2.,
                SCREEN_HEIGHT - PLAYER_SIZE - 10.,
            ),
        }
    }

    pub fn steer(&mut self, left: bool, right: bool) {
        if left {
            self.position.x = (self.position.x - SPEED).max(0.);
        }
        if right {
            self.position.x = (self.position.x + SPEED).min(SCREEN_WIDTH - PLAYER_SIZE);
        }
    }

    pub fn bounds(&self) -> Rect<f32> {
        Rect::new(self.position, size2(PLAYER_SIZE, PLAYER_SIZE))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Asteroid {
    pub position: Point2D<f32>,
}

impl Asteroid {
    pub fn new(x: f32, y: f32) -> Self {
        Asteroid {
            position: point2(x, y),
        }
    }

    pub fn bounds(&self) -> Rect<f32> {
        Rect::new(self.position, size2(ASTEROID_SIZE, ASTEROID_SIZE))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Clear,
    Collision,
}

pub struct World<R = SmallRng> {
    pub player: Player,
    asteroids: Vec<Asteroid>,
    rng: R,
}

impl<R: Rng> World<R> {
    pub fn new(rng: R) -> Self {
        World {
            player: Player::spawn(),
            asteroids: Vec::new(),
            rng,
        }
    }

    pub fn reset(&mut self) {
        self.player = Player::spawn();
        self.asteroids.clear();
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn push_asteroid(&mut self, asteroid: Asteroid) {
        self.asteroids.push(asteroid);
    }

    /// Runs spawn, move and collision/prune in that order.
    pub fn step(&mut self, elapsed: f32) -> StepOutcome {
        self.spawn(elapsed);
        self.advance(elapsed);
        self.resolve_collisions()
    }

    fn spawn(&mut self, elapsed: f32) {
        if self.rng.gen::<f32>() < spawn_probability(elapsed) {
            let x = self.rng.gen_range(0, (SCREEN_WIDTH - ASTEROID_SIZE) as u32);
            self.push_asteroid(Asteroid::new(x as f32, -ASTEROID_SIZE));
        }
    }

    fn advance(&mut self, elapsed: f32) {
        let speed = asteroid_speed(elapsed);
        for asteroid in self.asteroids.iter_mut() {
            asteroid.position.y += speed;
        }
    }

    fn resolve_collisions(&mut self) -> StepOutcome {
        let player_bounds = self.player.bounds();
        let mut i = 0;
        while i < self.asteroids.len() {
            let asteroid = self.asteroids[i];
            if asteroid.position.y > SCREEN_HEIGHT {
                // the next asteroid slides into index i
                self.asteroids.remove(i);
                continue;
            }
            if player_bounds.intersects(&asteroid.bounds()) {
                return StepOutcome::Collision;
            }
            i += 1;
        }
        StepOutcome::Clear
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::mock::StepRng, SeedableRng};

    fn always_spawn() -> StepRng {
        StepRng::new(0, 0)
    }

    fn never_spawn() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    // rolls about 0.998 for the spawn chance and 607 for the x position
    fn high_roll() -> StepRng {
        StepRng::new(0xff94_35e6, 0)
    }

    #[test]
    fn spawn_probability_ramps_linearly() {
        assert_relative_eq!(spawn_probability(0.), 0.02);
        assert_relative_eq!(spawn_probability(10.), 0.03);
        assert_relative_eq!(spawn_probability(980.), 1.0);

        let mut last = spawn_probability(0.);
        for i in 1..2000 {
            let p = spawn_probability(i as f32 * 0.5);
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn asteroid_speed_ramps_linearly() {
        assert_relative_eq!(asteroid_speed(0.), 12.);
        assert_relative_eq!(asteroid_speed(100.), 16.);
    }

    #[test]
    fn successful_roll_spawns_above_screen() {
        let mut world = World::new(always_spawn());
        assert_eq!(world.step(0.), StepOutcome::Clear);
        assert_eq!(world.asteroids().len(), 1);

        // spawned at -32 and moved once in the same tick
        let asteroid = world.asteroids()[0];
        assert_relative_eq!(asteroid.position.x, 0.);
        assert_relative_eq!(asteroid.position.y, -ASTEROID_SIZE + asteroid_speed(0.));
    }

    #[test]
    fn spawn_x_is_a_whole_number_left_of_the_right_edge() {
        let mut world = World::new(SmallRng::seed_from_u64(3));
        let mut rightmost: f32 = 0.;
        for _ in 0..2000 {
            world.reset();
            // certain to spawn at this elapsed time
            world.step(1000.);
            assert_eq!(world.asteroids().len(), 1);
            let x = world.asteroids()[0].position.x;
            assert!(x >= 0. && x < SCREEN_WIDTH - ASTEROID_SIZE, "x = {}", x);
            assert_eq!(x.fract(), 0.);
            rightmost = rightmost.max(x);
        }
        assert!(rightmost > 600.);
    }

    #[test]
    fn late_game_spawns_every_tick() {
        let mut world = World::new(high_roll());
        world.step(0.);
        assert!(world.asteroids().is_empty());

        for tick in 1..=5 {
            assert_eq!(world.step(1000.), StepOutcome::Clear);
            assert_eq!(world.asteroids().len(), tick);
        }
        assert!(world
            .asteroids()
            .iter()
            .all(|asteroid| asteroid.position.x == 607.));
    }

    #[test]
    fn failed_roll_spawns_nothing() {
        let mut world = World::new(never_spawn());
        for _ in 0..100 {
            world.step(0.);
        }
        assert!(world.asteroids().is_empty());
    }

    #[test]
    fn every_asteroid_moves_by_the_shared_speed() {
        let mut world = World::new(never_spawn());
        world.push_asteroid(Asteroid::new(0., 0.));
        world.push_asteroid(Asteroid::new(500., 100.));

        world.step(50.);
        let speed = asteroid_speed(50.);
        assert_relative_eq!(world.asteroids()[0].position.y, speed);
        assert_relative_eq!(world.asteroids()[1].position.y, 100. + speed);
    }

    #[test]
    fn expired_asteroids_are_pruned_in_order() {
        let mut world = World::new(never_spawn());
        world.push_asteroid(Asteroid::new(0., 470.));
        world.push_asteroid(Asteroid::new(40., 475.));
        world.push_asteroid(Asteroid::new(80., 10.));
        world.push_asteroid(Asteroid::new(120., 479.));
        world.push_asteroid(Asteroid::new(160., 20.));

        assert_eq!(world.step(0.), StepOutcome::Clear);
        let xs: Vec<f32> = world.asteroids().iter().map(|a| a.position.x).collect();
        assert_eq!(xs, vec![80., 160.]);
        assert!(world
            .asteroids()
            .iter()
            .all(|a| a.position.y <= SCREEN_HEIGHT));
    }

    #[test]
    fn asteroid_is_removed_on_first_frame_past_bottom() {
        let mut world = World::new(never_spawn());
        world.push_asteroid(Asteroid::new(0., -ASTEROID_SIZE));

        let mut elapsed = 0.;
        let mut y = -ASTEROID_SIZE;
        loop {
            elapsed += 0.01;
            y += asteroid_speed(elapsed);
            world.step(elapsed);
            if y > SCREEN_HEIGHT {
                assert!(world.asteroids().is_empty());
                break;
            }
            assert_eq!(world.asteroids().len(), 1);
            assert_relative_eq!(world.asteroids()[0].position.y, y);
        }
    }

    #[test]
    fn overlap_ends_the_step() {
        let mut world = World::new(never_spawn());
        let player = world.player.position;
        world.push_asteroid(Asteroid::new(player.x, player.y - 20.));
        // never reached, so left in place even though it is off screen
        world.push_asteroid(Asteroid::new(0., 479.));

        assert_eq!(world.step(0.), StepOutcome::Collision);
        assert_eq!(world.asteroids().len(), 2);
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let mut world = World::new(never_spawn());
        world.player.position = point2(100., 400.);

        // placed so that after one move at elapsed 0 (12 units) the boxes touch
        world.push_asteroid(Asteroid::new(100., 400. - 32. - 12.));
        world.push_asteroid(Asteroid::new(132., 400. - 12.));
        world.push_asteroid(Asteroid::new(68., 400. - 12.));
        assert_eq!(world.step(0.), StepOutcome::Clear);

        world.reset();
        world.player.position = point2(100., 400.);
        world.push_asteroid(Asteroid::new(131., 400. - 12.));
        assert_eq!(world.step(0.), StepOutcome::Collision);
    }

    #[test]
    fn steering_is_clamped_to_the_screen() {
        let mut player = Player::spawn();
        assert_eq!(player.position, point2(304., 438.));

        player.steer(true, false);
        assert_relative_eq!(player.position.x, 300.);
        player.steer(false, true);
        assert_relative_eq!(player.position.x, 304.);

        player.position.x = 0.;
        player.steer(true, false);
        assert_relative_eq!(player.position.x, 0.);

        player.position.x = SCREEN_WIDTH - PLAYER_SIZE;
        player.steer(false, true);
        assert_relative_eq!(player.position.x, 608.);
    }

    #[test]
    fn reset_respawns_player_and_clears_asteroids() {
        let mut world = World::new(always_spawn());
        world.player.position.x = 0.;
        world.step(0.);
        world.reset();
        assert!(world.asteroids().is_empty());
        assert_eq!(world.player, Player::spawn());
    }
}
