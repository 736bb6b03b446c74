use crate::error::SheetError;
use crate::extraction::TextExtractor;
use crate::geometry::PageRect;
use std::path::PathBuf;
use std::process::Command;

/// Text extraction backend using pdftotext (from poppler-utils).
///
/// Crops with `-x -y -W -H` at 72 dpi so one crop pixel is one PDF point,
/// measured from the top-left corner of the page.
pub struct PdftotextExtractor {
    pdf_path: PathBuf,
}

impl PdftotextExtractor {
    pub fn new(pdf_path: impl Into<PathBuf>) -> Self {
        PdftotextExtractor {
            pdf_path: pdf_path.into(),
        }
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl TextExtractor for PdftotextExtractor {
    fn extract_text(&self, page_index: usize, clip: &PageRect) -> Result<String, SheetError> {
        let crop = CropBox::from_rect(clip);
        let page = page_index.to_string();

        let output = Command::new("pdftotext")
            .args(["-f", &page, "-l", &page, "-r", "72"])
            .args(crop.args())
            .arg("-nopgbrk")
            .arg(&self.pdf_path)
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SheetError::PdftotextNotFound
                } else {
                    SheetError::Io(e)
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(SheetError::ToolFailed {
                tool: "pdftotext",
                code,
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Integer crop area in the form pdftotext expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CropBox {
    x: i64,
    y: i64,
    width: i64,
    height: i64,
}

impl CropBox {
    /// Smallest whole-point box covering `rect`, whatever its drag direction.
    fn from_rect(rect: &PageRect) -> Self {
        let r = rect.normalized().0;
        let x = r.left.floor() as i64;
        let y = r.top.floor() as i64;
        let right = r.right.ceil() as i64;
        let bottom = r.bottom.ceil() as i64;
        CropBox {
            x,
            y,
            width: right.saturating_sub(x).max(1),
            height: bottom.saturating_sub(y).max(1),
        }
    }

    fn args(&self) -> [String; 8] {
        [
            "-x".into(),
            self.x.to_string(),
            "-y".into(),
            self.y.to_string(),
            "-W".into(),
            self.width.to_string(),
            "-H".into(),
            self.height.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{to_page_space, DisplayRect, Rect, Scale};

    #[test]
    fn test_crop_box_covers_fractional_rect() {
        let crop = CropBox::from_rect(&PageRect(Rect::new(10.4, 20.6, 50.2, 30.1)));
        assert_eq!(
            crop,
            CropBox {
                x: 10,
                y: 20,
                width: 41,
                height: 11
            }
        );
    }

    #[test]
    fn test_crop_box_accepts_reversed_drag() {
        let forward = CropBox::from_rect(&PageRect(Rect::new(10.0, 20.0, 50.0, 30.0)));
        let reversed = CropBox::from_rect(&PageRect(Rect::new(50.0, 30.0, 10.0, 20.0)));
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_crop_box_never_zero_sized() {
        let crop = CropBox::from_rect(&PageRect(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(crop.width, 1);
        assert_eq!(crop.height, 1);
    }

    #[test]
    fn test_crop_box_saturates_on_huge_rect() {
        let rect: Rect = "-1e30,0,1e30,10".parse().unwrap();
        let crop = CropBox::from_rect(&to_page_space(DisplayRect(rect), Scale::IDENTITY));
        assert_eq!(crop.x, i64::MIN);
        assert_eq!(crop.width, i64::MAX);
        assert_eq!(crop.height, 10);
    }

    #[test]
    fn test_crop_args_order() {
        let crop = CropBox {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        };
        assert_eq!(crop.args(), ["-x", "1", "-y", "2", "-W", "3", "-H", "4"]);
    }
}
