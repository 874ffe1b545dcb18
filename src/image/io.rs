//! File I/O for images, likelihood fields and JSON records.
//!
//! - `load_grayscale_image` / `load_rgb_image`: decode any format the `image`
//!   crate was built with.
//! - `save_field_png`: write a `[0, 1]` field as an 8-bit grayscale PNG.
//! - `read_record` / `write_record`: calibration records in the marking tool's
//!   JSON layout.
//! - `write_json_file`: pretty JSON written to a temporary sibling, then
//!   renamed over the target so a failed write never truncates existing data.
use super::{GrayImageU8, ImageF32, ImageView};
use crate::error::{CalibError, Result};
use crate::record::CalibrationRecord;
use image::{GrayImage, Luma, RgbImage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

fn image_error(path: &Path, source: image::ImageError) -> CalibError {
    CalibError::Image {
        path: path.to_path_buf(),
        source,
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CalibError {
    CalibError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load an image from disk and convert it to 8-bit luma.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8> {
    let img = image::open(path)
        .map_err(|e| image_error(path, e))?
        .into_luma8();
    Ok(GrayImageU8::from_luma(img))
}

pub fn load_rgb_image(path: &Path) -> Result<RgbImage> {
    Ok(image::open(path).map_err(|e| image_error(path, e))?.into_rgb8())
}

/// Save a float field to a grayscale PNG, mapping `[0, 1]` to `[0, 255]`.
pub fn save_field_png(field: &ImageF32, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(field.w as u32, field.h as u32);
    for (y, row) in field.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = (px * 255.0).round().clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path).map_err(|e| image_error(path, e))
}

pub fn save_rgb_image(image: &RgbImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    image.save(path).map_err(|e| image_error(path, e))
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&data).map_err(|e| CalibError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| CalibError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    let tmp = temp_sibling(path);
    fs::write(&tmp, json).map_err(|e| io_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        io_error(path, e)
    })
}

pub fn read_record(path: &Path) -> Result<CalibrationRecord> {
    read_json_file(path)
}

/// Persist a record produced by a completed stage.
pub fn write_record(path: &Path, record: &CalibrationRecord) -> Result<()> {
    write_json_file(path, record)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_write_replaces_atomically() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("scene_left.json");
        let mut record = CalibrationRecord::new("scene_left", "png", [vec![], vec![], vec![]]);
        write_record(&path, &record).expect("first write");

        record.guide_points[0] = vec![[1, 2], [3, 4]];
        write_record(&path, &record).expect("second write");
        assert_eq!(read_record(&path).expect("read"), record);
        assert!(!temp_sibling(&path).exists());
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");
        let err = read_record(&path).expect_err("missing");
        assert!(matches!(err, CalibError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn field_png_round_trips_through_luma() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("field.png");
        let field = ImageF32::from_fn(4, 3, |x, _| x as f32 / 3.0);
        save_field_png(&field, &path).expect("save");
        let gray = load_grayscale_image(&path).expect("load");
        assert_eq!((gray.width(), gray.height()), (4, 3));
        assert_eq!(gray.as_view().get(3, 2), 255);
        assert_eq!(gray.as_view().get(0, 0), 0);
    }
}
