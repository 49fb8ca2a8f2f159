use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageReader, Rgba, RgbaImage};

use crate::pet::animation::AnimState;

/// Placeholder fill: translucent red.
const PLACEHOLDER_COLOR: [u8; 4] = [255, 0, 0, 180];
/// Gap between the placeholder ellipse and the sprite edge.
const PLACEHOLDER_INSET: u32 = 10;

const IDLE_FRAMES: &[&str] = &["idle1.png", "idle2.png", "idle3.png", "idle4.png"];
const CHASE_RIGHT_FRAMES: &[&str] = &[
    "walkingright1.png",
    "walkingright2.png",
    "walkingright3.png",
    "walkingright4.png",
];
const CHASE_LEFT_FRAMES: &[&str] = &[
    "walkingleft1.png",
    "walkingleft2.png",
    "walkingleft3.png",
    "walkingleft4.png",
];

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("No frame {index} for state '{state}'")]
    MissingFrame { state: &'static str, index: usize },

    #[error("Image not found at: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// File names making up each state's animation, in playback order.
pub fn frame_files(state: AnimState) -> &'static [&'static str] {
    match state {
        AnimState::Idle => IDLE_FRAMES,
        AnimState::ChaseRight => CHASE_RIGHT_FRAMES,
        AnimState::ChaseLeft => CHASE_LEFT_FRAMES,
    }
}

/// Full path of frame `index` of `state` under `dir`.
pub fn frame_path(dir: &Path, state: AnimState, index: usize) -> Result<PathBuf, AssetError> {
    frame_files(state)
        .get(index)
        .map(|name| dir.join(name))
        .ok_or(AssetError::MissingFrame {
            state: state.label(),
            index,
        })
}

/// A square, premultiplied-alpha RGBA8 bitmap ready for texture upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub size: u32,
    pub rgba: Vec<u8>,
}

impl Sprite {
    fn from_image(mut img: RgbaImage) -> Self {
        for px in img.pixels_mut() {
            premultiply(px);
        }
        Self {
            size: img.width(),
            rgba: img.into_raw(),
        }
    }

    /// Premultiplied RGBA of the pixel at (x, y).
    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.size + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }
}

fn premultiply(px: &mut Rgba<u8>) {
    let a = px[3] as u16;
    for c in &mut px.0[..3] {
        *c = ((*c as u16 * a + 127) / 255) as u8;
    }
}

/// Decode a PNG and fit it into a `size` x `size` square, keeping the aspect
/// ratio and centering it on a transparent canvas.
pub fn load_frame(path: &Path, size: u32) -> Result<Sprite, AssetError> {
    if !path.is_file() {
        return Err(AssetError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let img = ImageReader::open(path)
        .map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .with_guessed_format()
        .map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let scaled = img.resize(size, size, FilterType::Triangle).to_rgba8();

    let mut canvas = RgbaImage::new(size, size);
    let x = (size - scaled.width()) / 2;
    let y = (size - scaled.height()) / 2;
    imageops::replace(&mut canvas, &scaled, x as i64, y as i64);

    Ok(Sprite::from_image(canvas))
}

/// Stand-in for a frame that could not be loaded: a translucent red ellipse
/// inset from the edges of a transparent square.
pub fn placeholder(size: u32) -> Sprite {
    let inset = PLACEHOLDER_INSET.min(size / 2) as f32;
    let rx = (size as f32 - 2.0 * inset) / 2.0;
    let ry = rx;
    let cx = size as f32 / 2.0;
    let cy = cx;

    let img = RgbaImage::from_fn(size, size, |x, y| {
        if rx <= 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        let nx = (x as f32 + 0.5 - cx) / rx;
        let ny = (y as f32 + 0.5 - cy) / ry;
        if nx * nx + ny * ny <= 1.0 {
            Rgba(PLACEHOLDER_COLOR)
        } else {
            Rgba([0, 0, 0, 0])
        }
    });

    Sprite::from_image(img)
}

/// Every frame of every state, loaded once up front. Frames that fail to
/// load are replaced by the placeholder so playback never has gaps.
pub struct SpriteSheet {
    frames: [Vec<Sprite>; 3],
    placeholder: Sprite,
    /// How many frames fell back to the placeholder.
    pub fallbacks: usize,
}

impl SpriteSheet {
    pub fn load(dir: &Path, size: u32) -> Self {
        if !dir.is_dir() {
            log::warn!(
                "Asset directory {} not found. Create it and put transparent PNG frames inside.",
                dir.display()
            );
        }

        let placeholder = placeholder(size);
        let mut fallbacks = 0;

        let frames = AnimState::ALL.map(|state| {
            (0..frame_files(state).len())
                .map(|index| {
                    match frame_path(dir, state, index).and_then(|p| load_frame(&p, size)) {
                        Ok(sprite) => sprite,
                        Err(e) => {
                            log::warn!("Failed to load image. {e}");
                            fallbacks += 1;
                            placeholder.clone()
                        }
                    }
                })
                .collect::<Vec<_>>()
        });

        log::info!(
            "Loaded sprite sheet from {} ({} placeholder frames)",
            dir.display(),
            fallbacks
        );

        Self {
            frames,
            placeholder,
            fallbacks,
        }
    }

    pub fn frame_count(&self, state: AnimState) -> usize {
        self.frames[state as usize].len()
    }

    /// Sprite for `frame` of `state`, or the placeholder when out of range.
    pub fn get(&self, state: AnimState, frame: usize) -> &Sprite {
        self.frames[state as usize]
            .get(frame)
            .unwrap_or(&self.placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, w: u32, h: u32, color: [u8; 4]) {
        RgbaImage::from_pixel(w, h, Rgba(color)).save(path).unwrap();
    }

    #[test]
    fn placeholder_layout() {
        let sprite = placeholder(80);
        assert_eq!(sprite.size, 80);
        assert_eq!(sprite.rgba.len(), 80 * 80 * 4);
        assert_eq!(sprite.pixel(40, 40), [180, 0, 0, 180]);
        assert_eq!(sprite.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(sprite.pixel(5, 40), [0, 0, 0, 0]);
        assert_eq!(sprite.pixel(79, 79), [0, 0, 0, 0]);
    }

    #[test]
    fn frame_table() {
        for state in AnimState::ALL {
            assert_eq!(frame_files(state).len(), 4);
        }
        let dir = Path::new("assets");
        assert_eq!(
            frame_path(dir, AnimState::ChaseLeft, 2).unwrap(),
            dir.join("walkingleft3.png")
        );
        assert!(matches!(
            frame_path(dir, AnimState::Idle, 4),
            Err(AssetError::MissingFrame { index: 4, .. })
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_frame(&tmp.path().join("idle1.png"), 80).unwrap_err();
        assert!(matches!(err, AssetError::NotFound { .. }));
    }

    #[test]
    fn garbage_file_fails_to_decode() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("idle1.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(load_frame(&path, 80).is_err());
    }

    #[test]
    fn wide_frame_is_letterboxed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("wide.png");
        write_png(&path, 160, 80, [0, 0, 255, 255]);

        let sprite = load_frame(&path, 80).unwrap();
        assert_eq!(sprite.size, 80);
        // 160x80 scales to 80x40, centered vertically.
        assert_eq!(sprite.pixel(40, 5), [0, 0, 0, 0]);
        assert_eq!(sprite.pixel(40, 40), [0, 0, 255, 255]);
        assert_eq!(sprite.pixel(40, 75), [0, 0, 0, 0]);
    }

    #[test]
    fn sheet_mixes_loaded_and_placeholder_frames() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(&tmp.path().join("idle1.png"), 80, 80, [0, 255, 0, 255]);

        let sheet = SpriteSheet::load(tmp.path(), 80);
        assert_eq!(sheet.fallbacks, 11);
        assert_eq!(sheet.frame_count(AnimState::Idle), 4);
        assert_eq!(sheet.get(AnimState::Idle, 0).pixel(40, 40), [0, 255, 0, 255]);
        assert_eq!(sheet.get(AnimState::Idle, 1), &placeholder(80));
        assert_eq!(sheet.get(AnimState::ChaseRight, 99), &placeholder(80));
    }

    #[test]
    fn missing_directory_is_all_placeholders() {
        let tmp = tempfile::tempdir().unwrap();
        let sheet = SpriteSheet::load(&tmp.path().join("nope"), 80);
        assert_eq!(sheet.fallbacks, 12);
    }

    #[test]
    fn premultiplies_alpha() {
        let mut px = Rgba([255, 128, 0, 128]);
        premultiply(&mut px);
        assert_eq!(px.0, [128, 64, 0, 128]);
    }
}
