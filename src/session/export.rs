//! Gallery export - lossless PNG encoding and ZIP packaging

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use image::DynamicImage;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::gallery::Gallery;

/// Deterministic archive entry name for the 1-based gallery position.
pub fn entry_file_name(position: usize) -> String {
    format!("mindpalette_{}.png", position)
}

/// Encode a bitmap as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .context("failed to encode PNG")?;
    Ok(bytes)
}

/// Pack every gallery entry into an in-memory ZIP, one PNG per entry,
/// in gallery order.
pub fn zip_gallery(gallery: &Gallery) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (i, entry) in gallery.iter().enumerate() {
        writer
            .start_file(entry_file_name(i + 1), options)
            .context("failed to start archive entry")?;
        writer
            .write_all(&encode_png(&entry.image)?)
            .context("failed to write archive entry")?;
    }

    let cursor = writer.finish().context("failed to finalize archive")?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::GenericImageView;
    use zip::ZipArchive;

    use crate::session::gallery::GalleryEntry;

    use super::*;

    fn test_gallery(count: usize) -> Gallery {
        let mut gallery = Gallery::new();
        for i in 0..count {
            // Distinct solid colors so round-trips are distinguishable
            let mut img = image::RgbImage::new(2, 2);
            for pixel in img.pixels_mut() {
                *pixel = image::Rgb([i as u8 * 40, 10, 200]);
            }
            gallery.push(GalleryEntry::new(
                format!("prompt {}", i),
                Arc::new(DynamicImage::ImageRgb8(img)),
            ));
        }
        gallery
    }

    #[test]
    fn test_entry_file_name() {
        assert_eq!(entry_file_name(1), "mindpalette_1.png");
        assert_eq!(entry_file_name(12), "mindpalette_12.png");
    }

    #[test]
    fn test_png_round_trip_is_lossless() {
        let gallery = test_gallery(1);
        let entry = gallery.get(0).unwrap();

        let bytes = encode_png(&entry.image).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();

        assert_eq!(decoded.dimensions(), entry.image.dimensions());
        assert_eq!(decoded.to_rgb8(), entry.image.to_rgb8());
    }

    #[test]
    fn test_zip_gallery_names_and_order() {
        let gallery = test_gallery(3);
        let archive_bytes = zip_gallery(&gallery).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(archive_bytes)).unwrap();
        assert_eq!(archive.len(), 3);

        for i in 0..3 {
            let file = archive.by_index(i).unwrap();
            assert_eq!(file.name(), entry_file_name(i + 1));
        }
    }

    #[test]
    fn test_zip_gallery_entries_decode_pixel_identical() {
        let gallery = test_gallery(2);
        let archive_bytes = zip_gallery(&gallery).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(archive_bytes)).unwrap();
        for i in 0..2 {
            let mut file = archive.by_index(i).unwrap();
            let mut bytes = Vec::new();
            std::io::Read::read_to_end(&mut file, &mut bytes).unwrap();

            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!(
                decoded.to_rgb8(),
                gallery.get(i).unwrap().image.to_rgb8()
            );
        }
    }

    #[test]
    fn test_zip_empty_gallery() {
        let archive_bytes = zip_gallery(&Gallery::new()).unwrap();
        let archive = ZipArchive::new(Cursor::new(archive_bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
