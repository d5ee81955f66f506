//! SPIR-V compiled from `shaders/*.wgsl` by the build script.

/// Mesh vertex stage and both material fragment stages.
pub const MESH_SPV: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/mesh.spv"));

/// Fullscreen background pass.
pub const BACKGROUND_SPV: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/background.spv"));

pub const MESH_VERTEX_ENTRY: &str = "vs_main";
/// Colours by the view-space normal.
pub const NORMAL_FRAGMENT_ENTRY: &str = "fs_normal";
/// Flat material colour.
pub const BASIC_FRAGMENT_ENTRY: &str = "fs_basic";

pub const BACKGROUND_VERTEX_ENTRY: &str = "vs_fullscreen";
pub const BACKGROUND_FRAGMENT_ENTRY: &str = "fs_background";

#[cfg(test)]
mod tests {
    use super::*;
    use mannequin_rhi::shader::spirv_words;

    #[test]
    fn test_embedded_modules_are_spirv() {
        assert!(spirv_words(MESH_SPV).is_ok());
        assert!(spirv_words(BACKGROUND_SPV).is_ok());
    }

    #[test]
    fn test_entry_points_are_in_modules() {
        let contains = |module: &[u8], name: &str| {
            module.windows(name.len()).any(|w| w == name.as_bytes())
        };
        for entry in [MESH_VERTEX_ENTRY, NORMAL_FRAGMENT_ENTRY, BASIC_FRAGMENT_ENTRY] {
            assert!(contains(MESH_SPV, entry), "{entry} missing from mesh module");
        }
        for entry in [BACKGROUND_VERTEX_ENTRY, BACKGROUND_FRAGMENT_ENTRY] {
            assert!(contains(BACKGROUND_SPV, entry), "{entry} missing from background module");
        }
    }
}
