use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Pixel-space camera: world coordinates map 1:1 onto window pixels, origin
/// at the top-left corner with y growing downward, matching the simulation's
/// coordinate convention.
pub struct ScreenCamera {
    pub viewport: (u32, u32),
}

impl ScreenCamera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let width = self.viewport.0 as f32;
        let height = self.viewport.1 as f32;

        // Top-left origin: y=0 maps to the top of the clip volume.
        let proj = Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0);

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn origin_maps_to_top_left_of_clip_space() {
        let camera = ScreenCamera::new(512, 380);
        let m = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);

        let top_left = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((top_left.x - -1.0).abs() < 1e-6);
        assert!((top_left.y - 1.0).abs() < 1e-6);

        let bottom_right = m * Vec4::new(512.0, 380.0, 0.0, 1.0);
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y - -1.0).abs() < 1e-6);
    }

    #[test]
    fn y_grows_downward_on_screen() {
        let camera = ScreenCamera::new(512, 380);
        let m = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);

        let high = m * Vec4::new(0.0, 10.0, 0.0, 1.0);
        let low = m * Vec4::new(0.0, 300.0, 0.0, 1.0);
        assert!(high.y > low.y);
    }
}
