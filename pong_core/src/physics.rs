//! Ball simulation: integration, wall and paddle bounces, scoring and serves.

use crate::collision::overlaps;
use crate::config::Config;
use crate::types::{Entity, Side};
use crate::vector::Vec2;
use rand::Rng;

/// Physics calculations for the ball
pub struct Physics;

impl Physics {
    /// Advance the ball by one tick
    pub fn integrate(ball: &mut Entity) {
        ball.pos += ball.vel;
    }

    /// Reflect off the top and bottom walls. Returns true on a bounce.
    pub fn bounce_walls(ball: &mut Entity, config: &Config) -> bool {
        let max_y = config.screen.height() - ball.size.height();

        if ball.top() <= 0.0 && ball.vel.y < 0.0 {
            ball.vel.y = -ball.vel.y;
            ball.pos.y = 0.0;
            true
        } else if ball.bottom() >= config.screen.height() && ball.vel.y > 0.0 {
            ball.vel.y = -ball.vel.y;
            ball.pos.y = max_y;
            true
        } else {
            false
        }
    }

    /// Check the paddles in left-to-right order and bounce off the first one hit.
    /// At most one paddle is resolved per tick.
    pub fn resolve_paddle_hit(
        ball: &mut Entity,
        paddles: &[Entity; 2],
        config: &Config,
    ) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|&side| Self::check_paddle_collision(ball, &paddles[side.index()], side, config))
    }

    /// Check for a paddle-ball collision and handle it
    pub fn check_paddle_collision(
        ball: &mut Entity,
        paddle: &Entity,
        side: Side,
        config: &Config,
    ) -> bool {
        if !overlaps(ball, paddle) {
            return false;
        }

        // Only reflect a ball that is coming at the paddle's face: it was clear
        // of the face before this tick's move, or its centre has not passed the
        // paddle's centre. One already behind the face, or leaving, keeps going.
        let before = ball.pos.x - ball.vel.x;
        let in_front = match side {
            Side::Left => {
                before >= paddle.right() || ball.center().x >= paddle.center().x
            }
            Side::Right => {
                before + ball.size.width() <= paddle.left()
                    || ball.center().x <= paddle.center().x
            }
        };
        if !side.is_approached_by(ball.vel.x) || !in_front {
            return false;
        }

        // Rally acceleration, then reflect
        let speed = (ball.vel.x.abs() + config.rally_speed_up).min(config.max_ball_speed_x);
        ball.vel.x = -side.direction() * speed;

        // Positive when the ball hits below the paddle's centre, negative above
        let hit_offset = ball.center().y - paddle.center().y;
        ball.vel.y = hit_offset / config.deflection_divisor;

        // Push ball out to the paddle face
        ball.pos.x = match side {
            Side::Left => paddle.right(),
            Side::Right => paddle.left() - ball.size.width(),
        };

        log::trace!(
            "ball hit {side:?} paddle at offset {hit_offset:.1}, velocity now ({:.2}, {:.2})",
            ball.vel.x,
            ball.vel.y
        );
        true
    }

    /// Check if ball is out of bounds (scoring condition)
    pub fn check_scoring(ball: &Entity, config: &Config) -> Option<Side> {
        if ball.right() < 0.0 {
            Some(Side::Right) // Exited left: right player scored
        } else if ball.left() > config.screen.width() {
            Some(Side::Left) // Exited right: left player scored
        } else {
            None
        }
    }

    /// Centre the ball and send it toward `toward` with a fresh vertical speed
    pub fn serve_ball<R: Rng + ?Sized>(
        ball: &mut Entity,
        toward: Side,
        config: &Config,
        rng: &mut R,
    ) {
        ball.size = config.ball_size;
        ball.pos = config.ball_home();

        let (min, max) = (config.serve_speed_y_min, config.serve_speed_y_max);
        let magnitude = if max > min {
            rng.random_range(min..=max)
        } else {
            min
        };
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

        ball.vel = Vec2::new(toward.direction() * config.serve_speed_x, sign * magnitude);
        log::debug!(
            "serve toward {toward:?} at ({:.2}, {:.2})",
            ball.vel.x,
            ball.vel.y
        );
    }

    /// Serve in a random horizontal direction
    pub fn serve_random<R: Rng + ?Sized>(ball: &mut Entity, config: &Config, rng: &mut R) {
        let toward = if rng.random_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };
        Self::serve_ball(ball, toward, config, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ball(pos: Vec2, vel: Vec2) -> Entity {
        Entity::new(pos, Config::default().ball_size, vel)
    }

    fn paddles(config: &Config) -> [Entity; 2] {
        [
            Entity::at_rest(config.paddle_home(Side::Left), config.paddle_size),
            Entity::at_rest(config.paddle_home(Side::Right), config.paddle_size),
        ]
    }

    #[test]
    fn test_integrate() {
        let mut ball = ball(Vec2::new(100.0, 100.0), Vec2::new(4.0, -1.5));
        Physics::integrate(&mut ball);

        assert_eq!(ball.pos, Vec2::new(104.0, 98.5));
    }

    #[test]
    fn test_ball_wall_collision() {
        let config = Config::default();

        let mut top = ball(Vec2::new(300.0, -1.0), Vec2::new(4.0, -2.0));
        assert!(Physics::bounce_walls(&mut top, &config));
        assert_eq!(top.vel.y, 2.0);
        assert_eq!(top.pos.y, 0.0);

        let mut bottom = ball(Vec2::new(300.0, 471.0), Vec2::new(4.0, 1.5));
        assert!(Physics::bounce_walls(&mut bottom, &config));
        assert_eq!(bottom.vel.y, -1.5);
        assert_eq!(bottom.pos.y, 470.0);
    }

    #[test]
    fn test_wall_does_not_flip_departing_ball() {
        let config = Config::default();

        // Touching the top but already heading down
        let mut ball = ball(Vec2::new(300.0, 0.0), Vec2::new(4.0, 2.0));
        assert!(!Physics::bounce_walls(&mut ball, &config));
        assert_eq!(ball.vel.y, 2.0);
    }

    #[test]
    fn test_paddle_collision() {
        let config = Config::default();
        let paddles = paddles(&config);

        // Ball overlapping the left paddle's face, 10 units below its centre
        let mut ball = ball(Vec2::new(26.0, 245.0), Vec2::new(-4.0, 1.0));
        let hit = Physics::resolve_paddle_hit(&mut ball, &paddles, &config);

        assert_eq!(hit, Some(Side::Left));
        assert_eq!(ball.vel.x, 5.0);
        assert_eq!(ball.vel.y, 10.0 / 7.0);
        assert_eq!(ball.pos.x, 30.0);
    }

    #[test]
    fn test_right_paddle_deflects_upward_above_centre() {
        let config = Config::default();
        let paddles = paddles(&config);

        // Ball centre 14 units above the right paddle centre (240)
        let mut ball = ball(Vec2::new(605.0, 221.0), Vec2::new(6.0, 0.0));
        let hit = Physics::resolve_paddle_hit(&mut ball, &paddles, &config);

        assert_eq!(hit, Some(Side::Right));
        assert_eq!(ball.vel.x, -7.0);
        assert_eq!(ball.vel.y, -2.0);
        assert_eq!(ball.pos.x, 600.0);
    }

    #[test]
    fn test_paddle_ignores_departing_ball() {
        let config = Config::default();
        let paddles = paddles(&config);

        let mut ball = ball(Vec2::new(26.0, 230.0), Vec2::new(5.0, 1.0));
        assert_eq!(Physics::resolve_paddle_hit(&mut ball, &paddles, &config), None);
        assert_eq!(ball.vel, Vec2::new(5.0, 1.0));
    }

    #[test]
    fn test_ball_behind_paddle_passes() {
        let config = Config::default();
        let paddles = paddles(&config);

        // Already past the left paddle's centre line
        let mut ball = ball(Vec2::new(12.0, 230.0), Vec2::new(-5.0, 0.0));
        assert_eq!(Physics::resolve_paddle_hit(&mut ball, &paddles, &config), None);
    }

    #[test]
    fn test_fast_ball_past_centre_line_still_reflects() {
        let config = Config::default();
        let paddles = paddles(&config);

        // One tick at 11 carried the ball from clear of the left face (30.5)
        // to beyond the paddle centre line
        let mut left = ball(Vec2::new(19.5, 235.0), Vec2::new(-11.0, 0.0));
        let hit = Physics::resolve_paddle_hit(&mut left, &paddles, &config);

        assert_eq!(hit, Some(Side::Left));
        assert_eq!(left.vel.x, 12.0);
        assert_eq!(left.pos.x, 30.0);

        // Mirrored on the right, from 599.5 to 610.5
        let mut right = ball(Vec2::new(610.5, 235.0), Vec2::new(11.0, 0.0));
        let hit = Physics::resolve_paddle_hit(&mut right, &paddles, &config);

        assert_eq!(hit, Some(Side::Right));
        assert_eq!(right.vel.x, -12.0);
        assert_eq!(right.pos.x, 600.0);
    }

    #[test]
    fn test_top_speed_ball_never_skips_paddle() {
        let config = Config::default();
        let paddles = paddles(&config);
        let speed = config.max_ball_speed_x;

        // Every start clear of the left face that reaches it this tick
        let mut x = paddles[0].right();
        while x < paddles[0].right() + speed {
            let mut ball = ball(Vec2::new(x, 235.0), Vec2::new(-speed, 0.0));
            Physics::integrate(&mut ball);

            assert_eq!(
                Physics::resolve_paddle_hit(&mut ball, &paddles, &config),
                Some(Side::Left),
                "missed from x = {x}"
            );
            assert_eq!(ball.vel.x, speed);
            x += 0.25;
        }
    }

    #[test]
    fn test_rally_speed_capped() {
        let config = Config::default();
        let paddles = paddles(&config);

        // Last full speed-up lands exactly on the cap
        let mut below = ball(Vec2::new(26.0, 235.0), Vec2::new(-17.0, 0.0));
        Physics::resolve_paddle_hit(&mut below, &paddles, &config);
        assert_eq!(below.vel.x, 18.0);

        // At the cap the speed holds
        let mut capped = ball(Vec2::new(26.0, 235.0), Vec2::new(-18.0, 0.0));
        Physics::resolve_paddle_hit(&mut capped, &paddles, &config);
        assert_eq!(capped.vel.x, config.max_ball_speed_x);
    }

    #[test]
    fn test_scoring_detection() {
        let config = Config::default();

        let left_out = ball(Vec2::new(-10.5, 200.0), Vec2::zero());
        assert_eq!(Physics::check_scoring(&left_out, &config), Some(Side::Right));

        let right_out = ball(Vec2::new(640.5, 200.0), Vec2::zero());
        assert_eq!(Physics::check_scoring(&right_out, &config), Some(Side::Left));

        // Partly off screen is still in play
        let partly = ball(Vec2::new(-5.0, 200.0), Vec2::zero());
        assert_eq!(Physics::check_scoring(&partly, &config), None);
    }

    #[test]
    fn test_serve_ball() {
        let config = Config::default();
        let mut rng = Pcg32::seed_from_u64(12345);
        let mut ball = ball(Vec2::new(-30.0, 12.0), Vec2::new(-9.0, 3.0));

        Physics::serve_ball(&mut ball, Side::Right, &config, &mut rng);
        assert_eq!(ball.pos, Vec2::new(315.0, 235.0));
        assert_eq!(ball.vel.x, 4.0);
        assert!((1.0..=2.0).contains(&ball.vel.y.abs()));

        Physics::serve_ball(&mut ball, Side::Left, &config, &mut rng);
        assert_eq!(ball.vel.x, -4.0);
    }

    #[test]
    fn test_serve_with_fixed_vertical_speed() {
        let config = Config {
            serve_speed_y_min: 1.5,
            serve_speed_y_max: 1.5,
            ..Config::default()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ball = Entity::default();

        for _ in 0..20 {
            Physics::serve_random(&mut ball, &config, &mut rng);
            assert_eq!(ball.vel.y.abs(), 1.5);
            assert_eq!(ball.vel.x.abs(), 4.0);
            assert_eq!(ball.size, config.ball_size);
        }
    }

    #[test]
    fn test_deterministic_rng() {
        let config = Config::default();
        let mut ball1 = Entity::default();
        let mut ball2 = Entity::default();
        let mut rng1 = Pcg32::seed_from_u64(12345);
        let mut rng2 = Pcg32::seed_from_u64(12345);

        Physics::serve_random(&mut ball1, &config, &mut rng1);
        Physics::serve_random(&mut ball2, &config, &mut rng2);

        // Same seed should produce identical results
        assert_eq!(ball1.vel, ball2.vel);
    }
}
