use crate::{
    camera::{Camera, Projection},
    config::DemoConfig,
    error::{DemoError, Result},
    geometry::{self, CUBE_VERTICES, VERTEX_ATTRIBUTES},
    gl_wrappers::{self, ShaderProgram, Texture, VertexArray},
    input::MoveInput,
    lighting::{LampOrbit, PointLight},
    player::{MovementParams, Player},
    tiles::{TileMap, Tileset},
};
use nalgebra_glm::{Mat4, Vec3};

const LAMP_UNIFORM: &str = "uLamp";

/// The playable scene: tiled floor and walls lit by an orbiting lamp, seen
/// by a camera that follows the player.
pub struct Level {
    map: TileMap,
    tileset_texture: Texture,
    lamp_texture: Texture,
    level_shader: ShaderProgram,
    lamp_shader: ShaderProgram,
    level_mesh: VertexArray,
    cube: VertexArray,
    camera: Camera,
    camera_offset: Vec3,
    player: Player,
    collide: bool,
    light: PointLight,
    orbit: LampOrbit,
    lamp_scale: f32,
}

impl Level {
    pub fn load(config: &DemoConfig) -> Result<Self> {
        let assets = &config.assets;
        let map = TileMap::load(&assets.level)?;
        let tileset = Tileset::new(assets.tileset_columns.max(1), assets.tileset_rows.max(1));

        let tileset_texture = Texture::from_file(&assets.tileset)?;
        let lamp_texture = Texture::from_file(&assets.lamp_texture)?;
        let level_shader = ShaderProgram::from_files(&assets.level_vert, &assets.level_frag)?;
        let lamp_shader = ShaderProgram::from_files(&assets.level_vert, &assets.lamp_frag)?;

        let level_vertices = geometry::level_vertices(&map, &tileset);
        let level_mesh = VertexArray::new(&level_vertices, &VERTEX_ATTRIBUTES)?;
        let cube = VertexArray::new(&CUBE_VERTICES, &VERTEX_ATTRIBUTES)?;

        let start = map.player_start().ok_or_else(|| DemoError::TileMap {
            row: 0,
            reason: "level has no walkable tile".to_string(),
        })?;
        let player = Player::new(start, MovementParams::from(&config.player));
        let camera_offset: Vec3 = config.camera.offset.into();
        let mut camera = Camera::new(start + camera_offset, start);
        camera.follow(&start, &camera_offset);

        let orbit = LampOrbit::from_config(&config.lamp, map.center());
        let light = PointLight::new(
            orbit.position_at(0.0),
            config.lamp.color.into(),
            config.lamp.attenuation.into(),
        );

        let projection = Projection {
            fov: config.camera.fov,
            aspect: config.window.aspect(),
            near: config.camera.near,
            far: config.camera.far,
        }
        .matrix();

        // uniforms that never change; each program must be bound first
        gl_wrappers::bind(&level_shader);
        gl_wrappers::set_uniform(&level_shader, "uTexture", &0);
        gl_wrappers::set_uniform(&level_shader, "uProjection", &projection);
        gl_wrappers::set_uniform(&level_shader, "uModel", &Mat4::identity());
        light.upload(&level_shader, LAMP_UNIFORM);

        gl_wrappers::bind(&lamp_shader);
        gl_wrappers::set_uniform(&lamp_shader, "uTexture", &0);
        gl_wrappers::set_uniform(&lamp_shader, "uProjection", &projection);
        ShaderProgram::unuse();

        log::info!(
            "Level ready: {} vertices, player at ({:.1}, {:.1})",
            geometry::vertex_count(&level_vertices),
            start.x,
            start.y
        );

        Ok(Self {
            map,
            tileset_texture,
            lamp_texture,
            level_shader,
            lamp_shader,
            level_mesh,
            cube,
            camera,
            camera_offset,
            player,
            collide: config.player.collide_with_walls,
            light,
            orbit,
            lamp_scale: config.lamp.scale,
        })
    }

    /// Advances the player, the camera and the lamp. `time` is the absolute
    /// clock driving the lamp orbit.
    pub fn update(&mut self, input: MoveInput, time: f32, dt: f32) {
        let direction = input.direction();
        if self.collide {
            self.player.update_in(&self.map, direction, dt);
        } else {
            self.player.update(direction, dt);
        }
        self.camera.follow(&self.player.position, &self.camera_offset);
        self.light.position = self.orbit.position_at(time);
        log::trace!(
            "player pos={:?} vel={:?} light={:.3}",
            self.player.position,
            self.player.velocity,
            self.light
                .attenuation_at(glm::distance(&self.light.position, &self.player.position))
        );
    }

    // Data flow per object: bind texture, bind program, bind vertex array,
    // set uniforms, draw.
    pub fn render(&self) {
        let view = self.camera.view_matrix();

        gl_wrappers::bind(&self.tileset_texture);
        gl_wrappers::bind(&self.level_shader);
        gl_wrappers::bind(&self.level_mesh);
        gl_wrappers::set_uniform(&self.level_shader, "uView", &view);
        gl_wrappers::set_uniform(&self.level_shader, "uViewPos", &self.camera.position);
        gl_wrappers::set_uniform(
            &self.level_shader,
            &format!("{LAMP_UNIFORM}.position"),
            &self.light.position,
        );
        gl_wrappers::draw(&self.level_mesh);

        gl_wrappers::bind(&self.lamp_texture);
        gl_wrappers::bind(&self.lamp_shader);
        gl_wrappers::bind(&self.cube);
        gl_wrappers::set_uniform(&self.lamp_shader, "uView", &view);
        gl_wrappers::set_uniform(
            &self.lamp_shader,
            "uModel",
            &lamp_model(&self.light.position, self.lamp_scale),
        );
        gl_wrappers::draw(&self.cube);
    }

    pub fn player(&self) -> &Player {
        &self.player
    }
}

/// Translation to the lamp position, then uniform scaling of the cube.
pub fn lamp_model(position: &Vec3, scale: f32) -> Mat4 {
    let translated = glm::translate(&Mat4::identity(), position);
    glm::scale(&translated, &Vec3::new(scale, scale, scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lamp_model_scales_around_lamp_position() {
        let position = Vec3::new(2.0, -1.0, 3.0);
        let model = lamp_model(&position, 0.5);
        let center = model * glm::vec4(0.0, 0.0, 0.0, 1.0);
        assert!((center.xyz() - position).norm() < 1e-6);
        let corner = model * glm::vec4(0.5, 0.5, 0.5, 1.0);
        assert!((corner.xyz() - Vec3::new(2.25, -0.75, 3.25)).norm() < 1e-6);
    }
}
