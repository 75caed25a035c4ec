use bytemuck::{Pod, Zeroable};

pub const POINTS_SOURCE: &str = include_str!("points.wgsl");

/// Matches `Uniforms` in `points.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub point_size: f32,
    pub _padding: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        // Three mat4x4 + vec4 + f32, rounded up to 16-byte struct alignment.
        assert_eq!(std::mem::size_of::<Uniforms>(), 224);
    }

    #[test]
    fn test_points_shader_validates() {
        let module = naga::front::wgsl::parse_str(POINTS_SOURCE)
            .unwrap_or_else(|e| panic!("WGSL parse error: {:?}", e));

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .unwrap_or_else(|e| panic!("WGSL validation error: {:?}", e));

        assert_eq!(module.entry_points.len(), 2);
    }
}
