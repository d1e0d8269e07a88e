//! WGSL sources for the render pipelines.

/// Lit and unlit mesh instances.
pub const MESH_SHADER: &str = include_str!("shaders/mesh.wgsl");

/// Camera-facing sprites for the light particles.
pub const POINTS_SHADER: &str = include_str!("shaders/points.wgsl");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::instances::MeshInstance;
    use crate::gpu::uniforms::FrameUniforms;

    fn parse(code: &str) -> naga::Module {
        naga::front::wgsl::parse_str(code).unwrap_or_else(|e| panic!("WGSL parse error: {:?}", e))
    }

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code).map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    fn uniforms_span(module: &naga::Module) -> u32 {
        module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(name), naga::TypeInner::Struct { span, .. }) if name == "Uniforms" => Some(*span),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no Uniforms struct"))
    }

    #[test]
    fn test_mesh_shader_valid() {
        validate_wgsl(MESH_SHADER).unwrap();
    }

    #[test]
    fn test_points_shader_valid() {
        validate_wgsl(POINTS_SHADER).unwrap();
    }

    #[test]
    fn test_uniform_layouts_match_rust() {
        let size = std::mem::size_of::<FrameUniforms>() as u32;
        assert_eq!(uniforms_span(&parse(MESH_SHADER)), size);
        assert_eq!(uniforms_span(&parse(POINTS_SHADER)), size);
    }

    #[test]
    fn test_mesh_entry_points() {
        let module = parse(MESH_SHADER);
        let names: Vec<&str> = module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
        assert_eq!(names, ["vs_main", "fs_main"]);

        // position, normal, then one slot per instance attribute
        let vs = &module.entry_points[0].function;
        let locations: usize = vs
            .arguments
            .iter()
            .map(|arg| match &module.types[arg.ty].inner {
                naga::TypeInner::Struct { members, .. } => members.len(),
                _ => 1,
            })
            .sum();
        assert_eq!(locations, 2 + MeshInstance::ATTRIBUTES.len());
    }
}
