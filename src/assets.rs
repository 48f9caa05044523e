use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use euclid::{
    default::{Size2D, Vector2D},
    size2, vec2,
};
use image::{
    imageops::{self, FilterType},
    ImageError, RgbaImage,
};
use thiserror::Error;

use crate::constants::{
    ASTEROID_IMAGE, ASTEROID_SIZE, BACKGROUND_IMAGE, PLAYER_IMAGE, PLAYER_SIZE, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};

static NEXT_IMAGE_ID: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Error)]
#[error("failed to load {kind} image from {}", .path.display())]
pub struct AssetError {
    kind: &'static str,
    path: PathBuf,
    #[source]
    source: ImageError,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ImageId(usize);

/// A decoded RGBA image. Immutable once loaded, so renderers may cache
/// uploads by `id`.
pub struct Image {
    id: ImageId,
    pixels: RgbaImage,
}

impl Image {
    pub fn open(kind: &'static str, path: &Path) -> Result<Image, AssetError> {
        let pixels = image::open(path)
            .map_err(|source| AssetError {
                kind,
                path: path.to_owned(),
                source,
            })?
            .to_rgba();
        log::info!(
            "Loaded {} image {} ({}x{})",
            kind,
            path.display(),
            pixels.width(),
            pixels.height()
        );
        Ok(Image::from_pixels(pixels))
    }

    pub fn from_pixels(pixels: RgbaImage) -> Image {
        Image {
            id: ImageId(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed)),
            pixels,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn size(&self) -> Size2D<u32> {
        size2(self.pixels.width(), self.pixels.height())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// An image together with the scale that maps its pixel size onto a fixed
/// logical size.
pub struct Sprite {
    pub image: Image,
    pub scale: Vector2D<f32>,
}

impl Sprite {
    /// Images larger than `logical_size` are downscaled first, so no sprite
    /// needs more texture space than it covers on screen.
    pub fn fit(image: Image, logical_size: Size2D<f32>) -> Sprite {
        let image = shrink_to(image, logical_size.ceil().to_u32());
        let natural = image.size().to_f32();
        let scale = vec2(
            logical_size.width / natural.width,
            logical_size.height / natural.height,
        );
        Sprite { image, scale }
    }
}

fn shrink_to(image: Image, max: Size2D<u32>) -> Image {
    let size = image.size();
    if size.width <= max.width && size.height <= max.height {
        return image;
    }
    let target = size.min(max);
    log::debug!(
        "Downscaling {}x{} image to {}x{}",
        size.width,
        size.height,
        target.width,
        target.height
    );
    Image::from_pixels(imageops::resize(
        image.pixels(),
        target.width,
        target.height,
        FilterType::Triangle,
    ))
}

#[derive(Clone, Debug)]
pub struct AssetPaths {
    pub player: PathBuf,
    pub asteroid: PathBuf,
    pub background: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        AssetPaths {
            player: PLAYER_IMAGE.into(),
            asteroid: ASTEROID_IMAGE.into(),
            background: BACKGROUND_IMAGE.into(),
        }
    }
}

pub struct Assets {
    pub player: Sprite,
    pub asteroid: Sprite,
    pub background: Sprite,
}

impl Assets {
    pub fn load(paths: &AssetPaths) -> Result<Assets, AssetError> {
        Ok(Assets::from_images(
            Image::open("player", &paths.player)?,
            Image::open("asteroid", &paths.asteroid)?,
            Image::open("background", &paths.background)?,
        ))
    }

    pub fn from_images(player: Image, asteroid: Image, background: Image) -> Assets {
        Assets {
            player: Sprite::fit(player, size2(PLAYER_SIZE, PLAYER_SIZE)),
            asteroid: Sprite::fit(asteroid, size2(ASTEROID_SIZE, ASTEROID_SIZE)),
            background: Sprite::fit(background, size2(SCREEN_WIDTH, SCREEN_HEIGHT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn blank(width: u32, height: u32) -> Image {
        Image::from_pixels(RgbaImage::new(width, height))
    }

    #[test]
    fn sprites_scale_to_logical_size() {
        let assets = Assets::from_images(blank(16, 8), blank(32, 32), blank(320, 240));
        assert_relative_eq!(assets.player.scale.x, 2.);
        assert_relative_eq!(assets.player.scale.y, 4.);
        assert_relative_eq!(assets.asteroid.scale.x, 1.);
        assert_relative_eq!(assets.background.scale.x, 2.);
        assert_relative_eq!(assets.background.scale.y, 2.);
    }

    #[test]
    fn oversized_images_are_downscaled_to_their_footprint() {
        let assets = Assets::from_images(blank(64, 16), blank(32, 32), blank(2560, 1440));
        assert_eq!(assets.background.image.size(), size2(640, 480));
        assert_relative_eq!(assets.background.scale.x, 1.);
        assert_relative_eq!(assets.background.scale.y, 1.);

        // only the oversized axis shrinks
        assert_eq!(assets.player.image.size(), size2(32, 16));
        assert_relative_eq!(assets.player.scale.x, 1.);
        assert_relative_eq!(assets.player.scale.y, 2.);
    }

    #[test]
    fn images_get_distinct_ids() {
        assert_ne!(blank(1, 1).id(), blank(1, 1).id());
    }

    #[test]
    fn missing_file_names_the_failing_image() {
        let dir = std::env::temp_dir().join("asteroids-assets-missing");
        std::fs::create_dir_all(&dir).unwrap();
        let player = dir.join("player.png");
        blank(8, 8).pixels().save(&player).unwrap();

        let paths = AssetPaths {
            player,
            asteroid: dir.join("does-not-exist.png"),
            background: dir.join("also-missing.png"),
        };
        let err = Assets::load(&paths).err().unwrap();
        assert!(err.to_string().contains("asteroid"));
        assert!(err.to_string().contains("does-not-exist.png"));
    }

    #[test]
    fn loads_images_from_disk() {
        let dir = std::env::temp_dir().join("asteroids-assets-ok");
        std::fs::create_dir_all(&dir).unwrap();
        let paths = AssetPaths {
            player: dir.join("player.png"),
            asteroid: dir.join("asteroid.png"),
            background: dir.join("background.png"),
        };
        blank(16, 16).pixels().save(&paths.player).unwrap();
        blank(32, 32).pixels().save(&paths.asteroid).unwrap();
        blank(320, 240).pixels().save(&paths.background).unwrap();

        let assets = Assets::load(&paths).unwrap();
        assert_eq!(assets.player.image.size(), size2(16, 16));
        assert_relative_eq!(assets.background.scale.x, 2.);
    }
}
