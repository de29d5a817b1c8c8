//! Sprite images: loaded from PNG files when present, generated otherwise,
//! and rasterized into terminal half-block cells for drawing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageError, Rgba, RgbaImage};

use crate::entities::ShipId;

/// Pixels with less alpha than this are treated as transparent
const ALPHA_CUTOFF: u8 = 128;

/// Logical image names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Ship(ShipId),
    HealthFull,
    HealthEmpty,
    HealthPickup,
    BombPickup,
    Projectile,
}

impl AssetKey {
    /// Every key for a game with `ship_count` ships
    pub fn all(ship_count: u8) -> Vec<AssetKey> {
        let mut keys: Vec<AssetKey> = (0..ship_count).map(|i| AssetKey::Ship(ShipId(i))).collect();
        keys.extend([
            AssetKey::HealthFull,
            AssetKey::HealthEmpty,
            AssetKey::HealthPickup,
            AssetKey::BombPickup,
            AssetKey::Projectile,
        ]);
        keys
    }

    /// File location relative to the asset directory
    pub fn relative_path(self) -> PathBuf {
        match self {
            AssetKey::Ship(ship) => PathBuf::from(format!("ships/ship{}.png", ship.number())),
            AssetKey::HealthFull => PathBuf::from("health/healthbar-full.png"),
            AssetKey::HealthEmpty => PathBuf::from("health/healthbar-empty.png"),
            AssetKey::HealthPickup => PathBuf::from("health/health.png"),
            AssetKey::BombPickup => PathBuf::from("powerups/bomb.png"),
            AssetKey::Projectile => PathBuf::from("projectiles/projectile.png"),
        }
    }
}

/// Where an image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSource {
    File,
    Placeholder,
}

/// One terminal cell of a rasterized sprite. `bg` is None when the lower half is transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtCell {
    pub symbol: char,
    pub fg: (u8, u8, u8),
    pub bg: Option<(u8, u8, u8)>,
}

/// A sprite rasterized to a grid of cells; `None` cells are transparent
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteArt {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Option<ArtCell>>,
}

impl SpriteArt {
    pub fn cell(&self, x: u16, y: u16) -> Option<ArtCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ArtKey {
    asset: AssetKey,
    width: u16,
    height: u16,
    rotated: bool,
}

/// Loaded images plus a cache of their rasterized forms
pub struct Assets {
    images: HashMap<AssetKey, (RgbaImage, AssetSource)>,
    art: HashMap<ArtKey, SpriteArt>,
}

impl Assets {
    /// Load every image under `root`, substituting placeholders for missing files
    pub fn load(root: &Path, ship_count: u8) -> Self {
        let mut images = HashMap::new();
        let mut fallbacks = 0;
        for key in AssetKey::all(ship_count) {
            let path = root.join(key.relative_path());
            let entry = match load_image(&path) {
                Ok(image) => (image, AssetSource::File),
                Err(err) => {
                    if path.exists() {
                        log::warn!("could not read {}: {err}", path.display());
                    } else {
                        log::debug!("{} not found", path.display());
                    }
                    fallbacks += 1;
                    (placeholder(key), AssetSource::Placeholder)
                }
            };
            images.insert(key, entry);
        }
        log::info!(
            "loaded {} images from {} ({} placeholders)",
            images.len() - fallbacks,
            root.display(),
            fallbacks
        );
        Self {
            images,
            art: HashMap::new(),
        }
    }

    /// Placeholders only
    pub fn generated(ship_count: u8) -> Self {
        let images = AssetKey::all(ship_count)
            .into_iter()
            .map(|key| (key, (placeholder(key), AssetSource::Placeholder)))
            .collect();
        Self {
            images,
            art: HashMap::new(),
        }
    }

    pub fn source(&self, key: AssetKey) -> AssetSource {
        self.images
            .get(&key)
            .map_or(AssetSource::Placeholder, |(_, source)| *source)
    }

    pub fn image(&mut self, key: AssetKey) -> &RgbaImage {
        &self
            .images
            .entry(key)
            .or_insert_with(|| (placeholder(key), AssetSource::Placeholder))
            .0
    }

    /// `key` scaled to `width`×`height` cells, optionally turned upside down
    pub fn art(&mut self, key: AssetKey, width: u16, height: u16, rotated: bool) -> &SpriteArt {
        let art_key = ArtKey {
            asset: key,
            width,
            height,
            rotated,
        };
        if !self.art.contains_key(&art_key) {
            let image = self.image(key);
            let art = if rotated {
                rasterize(&imageops::rotate180(image), width, height)
            } else {
                rasterize(image, width, height)
            };
            self.art.insert(art_key, art);
        }
        &self.art[&art_key]
    }
}

fn load_image(path: &Path) -> Result<RgbaImage, ImageError> {
    Ok(image::open(path)?.to_rgba8())
}

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);
const GRAY: Rgba<u8> = Rgba([100, 100, 100, 255]);

/// Simple generated stand-in for a missing image
pub fn placeholder(key: AssetKey) -> RgbaImage {
    match key {
        AssetKey::Ship(_) => {
            // red triangle pointing up on a white square
            RgbaImage::from_fn(40, 40, |x, y| {
                let half_width = (y as f32 + 0.5) / 2.0;
                if (x as f32 + 0.5 - 20.0).abs() <= half_width {
                    RED
                } else {
                    WHITE
                }
            })
        }
        AssetKey::HealthPickup => {
            let mut image = RgbaImage::from_pixel(20, 20, GREEN);
            fill_circle(&mut image, 10.0, 10.0, 8.0, WHITE);
            image
        }
        AssetKey::HealthFull => RgbaImage::from_pixel(20, 20, RED),
        AssetKey::HealthEmpty => RgbaImage::from_pixel(20, 20, GRAY),
        AssetKey::BombPickup => {
            let mut image = RgbaImage::from_pixel(20, 20, YELLOW);
            fill_circle(&mut image, 10.0, 10.0, 8.0, RED);
            fill_circle(&mut image, 10.0, 10.0, 4.0, WHITE);
            image
        }
        AssetKey::Projectile => RgbaImage::from_pixel(12, 12, WHITE),
    }
}

fn fill_circle(image: &mut RgbaImage, cx: f32, cy: f32, radius: f32, color: Rgba<u8>) {
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        if dx * dx + dy * dy <= radius * radius {
            *pixel = color;
        }
    }
}

/// Scale `image` to `width`×`height` cells, two pixel rows per cell
pub fn rasterize(image: &RgbaImage, width: u16, height: u16) -> SpriteArt {
    let mut art = SpriteArt {
        width,
        height,
        cells: Vec::with_capacity(usize::from(width) * usize::from(height)),
    };
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        art.cells.resize(usize::from(width) * usize::from(height), None);
        return art;
    }

    let scaled = imageops::resize(
        image,
        u32::from(width),
        u32::from(height) * 2,
        FilterType::Triangle,
    );
    let opaque = |x: u32, y: u32| {
        let Rgba([r, g, b, a]) = *scaled.get_pixel(x, y);
        (a >= ALPHA_CUTOFF).then_some((r, g, b))
    };

    for row in 0..u32::from(height) {
        for col in 0..u32::from(width) {
            let cell = match (opaque(col, row * 2), opaque(col, row * 2 + 1)) {
                (Some(top), bottom) => Some(ArtCell {
                    symbol: '▀',
                    fg: top,
                    bg: bottom,
                }),
                (None, Some(bottom)) => Some(ArtCell {
                    symbol: '▄',
                    fg: bottom,
                    bg: None,
                }),
                (None, None) => None,
            };
            art.cells.push(cell);
        }
    }
    art
}
