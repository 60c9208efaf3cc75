use nalgebra_glm::{Mat4, Vec3};

pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Camera {
        Camera {
            position,
            target,
            up: Vec3::y(),
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        glm::look_at(&self.position, &self.target, &self.up)
    }

    /// Keeps the eye at a fixed offset from `subject` while looking at it.
    pub fn follow(&mut self, subject: &Vec3, offset: &Vec3) {
        self.position = subject + offset;
        self.target = *subject;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        glm::perspective(self.aspect, self.fov.to_radians(), self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < 1e-5
    }

    fn transform_point(m: &Mat4, p: &Vec3) -> Vec3 {
        let v = m * glm::vec4(p.x, p.y, p.z, 1.0);
        glm::vec3(v.x, v.y, v.z) / v.w
    }

    #[test]
    fn eye_maps_to_view_origin() {
        let camera = Camera::new(glm::vec3(0.0, 0.0, 8.0), Vec3::zeros());
        let view = camera.view_matrix();
        assert!(approx(&transform_point(&view, &camera.position), &Vec3::zeros()));
    }

    #[test]
    fn target_lies_on_negative_z_axis() {
        let camera = Camera::new(glm::vec3(1.0, -4.0, 8.0), glm::vec3(1.0, 0.0, 0.0));
        let view = camera.view_matrix();
        let target = transform_point(&view, &camera.target);
        let distance = (camera.position - camera.target).norm();
        assert!(approx(&target, &glm::vec3(0.0, 0.0, -distance)));
    }

    #[test]
    fn follow_keeps_offset_and_targets_subject() {
        let mut camera = Camera::new(Vec3::zeros(), Vec3::zeros());
        let subject = glm::vec3(3.0, 2.0, 0.0);
        camera.follow(&subject, &glm::vec3(0.0, -4.0, 8.0));
        assert!(approx(&camera.position, &glm::vec3(3.0, -2.0, 8.0)));
        assert!(approx(&camera.target, &subject));
    }

    #[test]
    fn projection_maps_near_plane_to_minus_one() {
        let projection = Projection {
            fov: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        };
        let p = transform_point(&projection.matrix(), &glm::vec3(0.0, 0.0, -0.1));
        assert!((p.z + 1.0).abs() < 1e-4);
    }
}
