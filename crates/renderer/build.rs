//! Compiles the WGSL shaders under `shaders/` to SPIR-V in `OUT_DIR`.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use naga::back::spv;
use naga::valid::{Capabilities, ValidationFlags, Validator};

const SHADERS: [&str; 2] = ["mesh", "background"];

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    for name in SHADERS {
        let path = manifest_dir.join("shaders").join(format!("{name}.wgsl"));
        println!("cargo:rerun-if-changed={}", path.display());

        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let words = compile(name, &source)?;
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();

        let spv_path = out_dir.join(format!("{name}.spv"));
        std::fs::write(&spv_path, bytes)
            .with_context(|| format!("Failed to write {}", spv_path.display()))?;
    }
    Ok(())
}

fn compile(name: &str, source: &str) -> Result<Vec<u32>> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow!("{name}.wgsl: {}", e.emit_to_string(source)))?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::PUSH_CONSTANT)
        .validate(&module)
        .map_err(|e| anyhow!("{name}.wgsl failed validation: {e:?}"))?;

    // Clip-space y is flipped on the CPU side, so keep naga from flipping it again.
    let options = spv::Options {
        flags: spv::WriterFlags::empty(),
        ..Default::default()
    };
    spv::write_vec(&module, &info, &options, None)
        .map_err(|e| anyhow!("{name}.wgsl: SPIR-V output failed: {e}"))
}
