use crate::{
    config::LampConfig,
    gl_wrappers::{self, ShaderProgram},
};
use nalgebra_glm::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    /// Constant, linear and quadratic terms.
    pub attenuation: Vec3,
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec3, attenuation: Vec3) -> Self {
        Self {
            position,
            color,
            attenuation,
        }
    }

    /// Fraction of the light reaching `distance` units away. Matches the
    /// falloff computed in the level fragment shader.
    pub fn attenuation_at(&self, distance: f32) -> f32 {
        let a = &self.attenuation;
        1.0 / (a.x + a.y * distance + a.z * distance * distance)
    }

    /// Uploads the light as the struct uniform `name` of the bound program.
    pub fn upload(&self, program: &ShaderProgram, name: &str) {
        gl_wrappers::set_uniform(program, &format!("{name}.position"), &self.position);
        gl_wrappers::set_uniform(program, &format!("{name}.color"), &self.color);
        gl_wrappers::set_uniform(program, &format!("{name}.attenuation"), &self.attenuation);
    }
}

/// Circular path of the lamp around `center`, bobbing up and down.
#[derive(Debug, Clone, Copy)]
pub struct LampOrbit {
    pub center: Vec3,
    pub radius: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
}

impl LampOrbit {
    pub fn from_config(config: &LampConfig, center: Vec3) -> Self {
        Self {
            center: center + Vec3::new(0.0, 0.0, config.height),
            radius: config.orbit_radius,
            bob_amplitude: config.bob_amplitude,
            bob_frequency: config.bob_frequency,
        }
    }

    pub fn position_at(&self, t: f32) -> Vec3 {
        self.center
            + Vec3::new(
                self.radius * t.cos(),
                self.radius * t.sin(),
                self.bob_amplitude * (self.bob_frequency * t).cos(),
            )
    }
}
