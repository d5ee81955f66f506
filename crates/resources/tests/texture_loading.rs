//! Integration tests for texture loading.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use mannequin_resources::{ResourceError, load_background, load_texture};
use mannequin_scene::WrapMode;

fn scratch_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mannequin-resources-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir.join(name)
}

#[test]
fn test_load_png_texture() {
    let path = scratch_file("checker.png");
    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 0, 255, 128]));
    img.save(&path).expect("Failed to write test image");

    let texture = load_texture(&path).expect("Failed to load texture");

    assert_eq!(texture.width(), 2);
    assert_eq!(texture.height(), 1);
    assert_eq!(texture.texel(0, 0), Some(0xffff0000));
    assert_eq!(texture.texel(1, 0), Some(0x800000ff));
    assert_eq!(texture.wrap_s, WrapMode::Repeat);
    assert_eq!(texture.wrap_t, WrapMode::Repeat);
}

#[test]
fn test_missing_file() {
    let path = Path::new("definitely/not/here.jpg");
    match load_texture(path) {
        Err(ResourceError::FileNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected FileNotFound, got {:?}", other.map(|t| t.width())),
    }
}

#[test]
fn test_undecodable_file() {
    let path = scratch_file("garbage.png");
    std::fs::write(&path, b"not an image").expect("Failed to write garbage");
    assert!(matches!(load_texture(&path), Err(ResourceError::Image { .. })));
}

#[test]
fn test_background_falls_back_to_none() {
    assert!(load_background(None).is_none());
    assert!(load_background(Some(Path::new("missing/wild-style.jpg"))).is_none());
}
