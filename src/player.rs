use crate::{config::PlayerConfig, tiles::TileMap};
use nalgebra_glm::{Vec2, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct MovementParams {
    pub acceleration: f32,
    pub max_speed: f32,
    pub friction: f32,
}

impl From<&PlayerConfig> for MovementParams {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            acceleration: config.acceleration,
            max_speed: config.max_speed,
            friction: config.friction,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub params: MovementParams,
}

impl Player {
    pub fn new(position: Vec3, params: MovementParams) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
            params,
        }
    }

    /// Semi-implicit Euler step: velocity first, then position with the new
    /// velocity. Without input the speed decays linearly and stops at zero.
    pub fn update(&mut self, direction: Vec2, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integrate_velocity(direction, dt);
        self.position += self.velocity * dt;
    }

    /// Same step, but movement into a tile that is not walkable is dropped
    /// per axis so the player slides along walls.
    pub fn update_in(&mut self, map: &TileMap, direction: Vec2, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integrate_velocity(direction, dt);

        let step = self.velocity * dt;
        let moved_x = self.position + Vec3::new(step.x, 0.0, 0.0);
        if map.is_walkable_at(&moved_x) {
            self.position = moved_x;
        } else {
            self.velocity.x = 0.0;
        }
        let moved_y = self.position + Vec3::new(0.0, step.y, 0.0);
        if map.is_walkable_at(&moved_y) {
            self.position = moved_y;
        } else {
            self.velocity.y = 0.0;
        }
    }

    fn integrate_velocity(&mut self, direction: Vec2, dt: f32) {
        let MovementParams {
            acceleration,
            max_speed,
            friction,
        } = self.params;

        if direction.norm_squared() > 0.0 {
            let dir = direction.normalize();
            self.acceleration = Vec3::new(dir.x, dir.y, 0.0) * acceleration;
            self.velocity += self.acceleration * dt;
            let speed = self.velocity.norm();
            if speed > max_speed {
                self.velocity *= max_speed / speed;
            }
        } else {
            self.acceleration = Vec3::zeros();
            let speed = self.velocity.norm();
            let slowed = speed - friction * dt;
            if slowed <= 0.0 {
                self.velocity = Vec3::zeros();
            } else {
                self.velocity *= slowed / speed;
            }
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}
