//! CPU-side textures and wrap-mode sampling.

use glam::Vec2;

use mannequin_core::{Error, Result};

/// How texture coordinates outside `0.0..1.0` are folded back in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// Tile the image
    #[default]
    Repeat,
    /// Stick to the border texel
    ClampToEdge,
    /// Tile, flipping every other copy
    MirroredRepeat,
}

impl WrapMode {
    /// Fold a texture coordinate into `0.0..=1.0`.
    pub fn apply(self, c: f32) -> f32 {
        match self {
            WrapMode::Repeat => c - c.floor(),
            WrapMode::ClampToEdge => c.clamp(0.0, 1.0),
            WrapMode::MirroredRepeat => {
                let tile = c.floor();
                let frac = c - tile;
                if (tile as i64) & 1 != 0 { 1.0 - frac } else { frac }
            }
        }
    }
}

/// An RGBA image in packed `0xAARRGGBB` texels, row-major from the top row.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<u32>,
    /// Horizontal wrap mode
    pub wrap_s: WrapMode,
    /// Vertical wrap mode
    pub wrap_t: WrapMode,
    /// How many times the image repeats across the 0..1 range
    pub repeat: Vec2,
}

impl Texture {
    /// Create a texture from packed texels.
    pub fn new(width: u32, height: u32, texels: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Resource(format!(
                "texture must not be empty ({}x{})",
                width, height
            )));
        }
        if texels.len() != (width as usize) * (height as usize) {
            return Err(Error::Resource(format!(
                "texture {}x{} needs {} texels, got {}",
                width,
                height,
                width as usize * height as usize,
                texels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            texels,
            wrap_s: WrapMode::default(),
            wrap_t: WrapMode::default(),
            repeat: Vec2::ONE,
        })
    }

    /// A 1x1 texture of a single colour.
    pub fn solid(argb: u32) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![argb],
            wrap_s: WrapMode::default(),
            wrap_t: WrapMode::default(),
            repeat: Vec2::ONE,
        }
    }

    /// Set both wrap modes.
    pub fn with_wrap(mut self, wrap_s: WrapMode, wrap_t: WrapMode) -> Self {
        self.wrap_s = wrap_s;
        self.wrap_t = wrap_t;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texels(&self) -> &[u32] {
        &self.texels
    }

    /// Texel at integer coordinates, `None` when out of range.
    pub fn texel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.texels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Nearest-neighbour sample. `v = 0` is the top row.
    pub fn sample_nearest(&self, u: f32, v: f32) -> u32 {
        let u = self.wrap_s.apply(u * self.repeat.x);
        let v = self.wrap_t.apply(v * self.repeat.y);
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        self.texels[(y * self.width + x) as usize]
    }
}
