use crate::error::SheetError;
use crate::geometry::Scale;
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};
use std::process::Command;

/// An RGB raster of one page.
pub type Bitmap = RgbImage;

/// Trait for page rasterizers used to preview a page while drawing boxes.
pub trait PageRenderer: Send + Sync {
    /// Render the 1-based page at `zoom` (1.0 = one pixel per PDF point).
    fn render(&self, page_index: usize, zoom: Scale) -> Result<Bitmap, SheetError>;
}

/// Write a rendered page as PNG, whatever the file extension.
pub fn save_png(bitmap: &Bitmap, path: &Path) -> Result<(), SheetError> {
    bitmap.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Renderer backed by pdftoppm (from poppler-utils).
pub struct PdftoppmRenderer {
    pdf_path: PathBuf,
}

impl PdftoppmRenderer {
    pub fn new(pdf_path: impl Into<PathBuf>) -> Self {
        PdftoppmRenderer {
            pdf_path: pdf_path.into(),
        }
    }
}

impl PageRenderer for PdftoppmRenderer {
    fn render(&self, page_index: usize, zoom: Scale) -> Result<Bitmap, SheetError> {
        let page = page_index.to_string();
        let dpi = format!("{}", 72.0 * zoom.factor());

        // Without an output root pdftoppm writes the image to stdout.
        let output = Command::new("pdftoppm")
            .args(["-png", "-f", &page, "-l", &page, "-r", &dpi])
            .arg(&self.pdf_path)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SheetError::PdftoppmNotFound
                } else {
                    SheetError::Io(e)
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(SheetError::ToolFailed {
                tool: "pdftoppm",
                code,
                stderr,
            });
        }

        let bitmap = decode_png(&output.stdout)?;
        log::debug!(
            "rendered page {} at {}x: {}x{}",
            page_index,
            zoom.factor(),
            bitmap.width(),
            bitmap.height()
        );
        Ok(bitmap)
    }
}

fn decode_png(data: &[u8]) -> Result<Bitmap, SheetError> {
    Ok(image::load_from_memory_with_format(data, ImageFormat::Png)?.into_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};
    use std::io::Cursor;

    fn png_bytes(image: &image::DynamicImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let mut page = RgbImage::new(2, 1);
        page.put_pixel(0, 0, Rgb([255, 0, 0]));
        page.put_pixel(1, 0, Rgb([0, 0, 255]));
        let bitmap = decode_png(&png_bytes(&page.clone().into())).unwrap();
        assert_eq!(bitmap.dimensions(), (2, 1));
        assert_eq!(bitmap.into_raw(), vec![255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_decode_png_expands_gray() {
        let gray = GrayImage::from_pixel(1, 2, Luma([200]));
        let bitmap = decode_png(&png_bytes(&gray.into())).unwrap();
        assert_eq!(bitmap.get_pixel(0, 1), &Rgb([200, 200, 200]));
    }

    #[test]
    fn test_decode_rejects_non_png() {
        assert!(matches!(
            decode_png(b"P6 1 1 255\n\x00\x00\x00"),
            Err(SheetError::Image(_))
        ));
        assert!(decode_png(b"").is_err());
    }

    #[test]
    fn test_save_png_ignores_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.ppm");
        let page = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        save_png(&page, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(decode_png(&bytes).unwrap(), page);
    }
}
