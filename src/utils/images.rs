use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{DecodeError, TransformError};

/// Final dimensions of every processed image.
pub const DEFAULT_OUTPUT_SIZE: (u32, u32) = (32, 32);

/// Tile dimensions used when slicing a sprite sheet.
pub const DEFAULT_SPRITE_SIZE: (u32, u32) = (16, 16);

/// Decode raw bytes into an image, naming the asset in the error.
pub fn decode_image(bytes: &[u8], name: &str) -> Result<DynamicImage, DecodeError> {
    image::load_from_memory(bytes).map_err(|e| DecodeError {
        name: name.to_string(),
        source: e,
    })
}

/// True when the source is too large to map onto a single output image and
/// must be sliced into sprite tiles instead.
pub fn needs_slicing(width: u32, height: u32, output_size: (u32, u32)) -> bool {
    width > output_size.0 || height > output_size.1
}

/// Number of tile columns and rows covering the full image. A partial
/// remainder at the right or bottom edge still gets its own tile.
///
/// Both `sprite_size` axes must be nonzero; the CLI rejects zero sizes
/// before any config reaches this point.
pub fn grid_dimensions(width: u32, height: u32, sprite_size: (u32, u32)) -> (u32, u32) {
    (
        width.div_ceil(sprite_size.0),
        height.div_ceil(sprite_size.1),
    )
}

/// Resize with nearest-neighbor (hard pixel edges, no blending) and write the
/// result as a PNG at `output_path`.
pub fn write_resized(
    img: &RgbaImage,
    output_path: &Path,
    output_size: (u32, u32),
) -> Result<(), TransformError> {
    let resized = imageops::resize(img, output_size.0, output_size.1, FilterType::Nearest);
    resized
        .save_with_format(output_path, ImageFormat::Png)
        .map_err(|e| TransformError::Write {
            path: output_path.to_path_buf(),
            source: e,
        })
}

/// Slice a sprite sheet into a row-major grid of `sprite_size` tiles starting
/// at the top-left corner, resizing each tile to `output_size` and writing it
/// as `sprite_<col>_<row>.png` under `output_dir`.
///
/// Tiles that overrun the image edge are cropped to the available pixels,
/// never padded, so a 48x40 sheet with 16x16 tiles yields a 3x3 grid whose
/// bottom row is 8 pixels tall before resizing.
///
/// Tile names carry only grid coordinates, so slicing two sheets into the
/// same directory overwrites the first sheet's tiles. Callers that process
/// multiple sheets per category must give each sheet its own output
/// directory.
pub fn slice_sprite_sheet(
    img: &RgbaImage,
    output_dir: &Path,
    sprite_size: (u32, u32),
    output_size: (u32, u32),
) -> Result<Vec<PathBuf>, TransformError> {
    let (cols, rows) = grid_dimensions(img.width(), img.height(), sprite_size);
    let mut written = Vec::with_capacity((cols * rows) as usize);

    for row in 0..rows {
        for col in 0..cols {
            let x = col * sprite_size.0;
            let y = row * sprite_size.1;
            let tile_w = sprite_size.0.min(img.width() - x);
            let tile_h = sprite_size.1.min(img.height() - y);

            let tile = imageops::crop_imm(img, x, y, tile_w, tile_h).to_image();
            let output_path = output_dir.join(format!("sprite_{}_{}.png", col, row));
            write_resized(&tile, &output_path, output_size)?;
            written.push(output_path);
        }
    }

    Ok(written)
}

/// Process one decoded asset into `dest_dir`.
///
/// The image is normalized to RGBA first (formats without transparency gain a
/// fully opaque alpha channel). Sources fitting inside `output_size` become a
/// single `<name>.png`; larger sources are treated as sprite sheets and
/// sliced. Returns the paths written.
pub fn transform_image(
    img: DynamicImage,
    dest_dir: &Path,
    name: &str,
    output_size: (u32, u32),
    sprite_size: (u32, u32),
) -> Result<Vec<PathBuf>, TransformError> {
    if !dest_dir.exists() {
        fs::create_dir_all(dest_dir).map_err(|e| TransformError::CreateDir {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;
    }

    let rgba = img.into_rgba8();

    if needs_slicing(rgba.width(), rgba.height(), output_size) {
        slice_sprite_sheet(&rgba, dest_dir, sprite_size, output_size)
    } else {
        let output_path = dest_dir.join(format!("{}.png", name));
        write_resized(&rgba, &output_path, output_size)?;
        Ok(vec![output_path])
    }
}
