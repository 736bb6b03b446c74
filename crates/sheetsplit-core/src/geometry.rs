use crate::error::SheetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Four edges of an axis-aligned box, top-left origin.
///
/// Bounds are kept exactly as drawn: a reverse drag produces `right < left`
/// or `bottom < top`. Use [`Rect::normalized`] where ordered bounds matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same box with `left <= right` and `top <= bottom`.
    pub fn normalized(&self) -> Rect {
        Rect {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    fn map(&self, f: impl Fn(f32) -> f32) -> Rect {
        Rect {
            left: f(self.left),
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Parses `left,top,right,bottom`.
impl FromStr for Rect {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords: Vec<f32> = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| SheetError::InvalidRect(format!("'{part}' is not a number")))
            })
            .collect::<Result<_, _>>()?;

        match coords.as_slice() {
            [left, top, right, bottom] => Ok(Rect::new(*left, *top, *right, *bottom)),
            _ => Err(SheetError::InvalidRect(format!(
                "expected left,top,right,bottom but got {} value(s)",
                coords.len()
            ))),
        }
    }
}

/// A rectangle in the coordinates of the rendered, zoomed page bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect(pub Rect);

/// A rectangle in native PDF units (points), top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRect(pub Rect);

impl PageRect {
    pub fn normalized(&self) -> PageRect {
        PageRect(self.0.normalized())
    }
}

impl fmt::Display for PageRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Display zoom factor; always strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(f32);

impl Scale {
    pub const IDENTITY: Scale = Scale(1.0);

    pub fn new(factor: f32) -> Result<Self, SheetError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Scale(factor))
        } else {
            Err(SheetError::InvalidScale(factor))
        }
    }

    pub fn factor(&self) -> f32 {
        self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::IDENTITY
    }
}

/// Converts a drawn rectangle into page space by dividing out the zoom.
///
/// Degenerate and reversed rectangles pass through unchanged.
pub fn to_page_space(display: DisplayRect, scale: Scale) -> PageRect {
    PageRect(display.0.map(|c| c / scale.0))
}

/// Inverse of [`to_page_space`], used to draw stored boxes on a rendered page.
pub fn to_display_space(page: PageRect, scale: Scale) -> DisplayRect {
    DisplayRect(page.0.map(|c| c * scale.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_to_page_space_divides_by_scale() {
        let scale = Scale::new(2.0).unwrap();
        let page = to_page_space(DisplayRect(Rect::new(100.0, 50.0, 300.0, 90.0)), scale);
        assert_eq!(page.0, Rect::new(50.0, 25.0, 150.0, 45.0));
    }

    #[test]
    fn test_reversed_rect_passes_through() {
        let page = to_page_space(
            DisplayRect(Rect::new(300.0, 90.0, 100.0, 50.0)),
            Scale::IDENTITY,
        );
        assert_eq!(page.0, Rect::new(300.0, 90.0, 100.0, 50.0));
        assert_eq!(page.normalized().0, Rect::new(100.0, 50.0, 300.0, 90.0));
    }

    #[test]
    fn test_scale_rejects_non_positive() {
        assert!(Scale::new(0.0).is_err());
        assert!(Scale::new(-1.5).is_err());
        assert!(Scale::new(f32::NAN).is_err());
        assert!(Scale::new(0.25).is_ok());
    }

    #[test]
    fn test_parse_rect() {
        let rect: Rect = " 10, 20.5,30 ,40".parse().unwrap();
        assert_eq!(rect, Rect::new(10.0, 20.5, 30.0, 40.0));
        assert!("10,20,30".parse::<Rect>().is_err());
        assert!("a,b,c,d".parse::<Rect>().is_err());
    }

    proptest! {
        /// Descaling then rescaling reproduces the drawn rectangle.
        #[test]
        fn page_space_round_trip(
            l in -5000.0f32..5000.0,
            t in -5000.0f32..5000.0,
            r in -5000.0f32..5000.0,
            b in -5000.0f32..5000.0,
            factor in 0.05f32..20.0,
        ) {
            let scale = Scale::new(factor).unwrap();
            let original = Rect::new(l, t, r, b);
            let back = to_display_space(to_page_space(DisplayRect(original), scale), scale).0;
            let tol = |v: f32| 1e-3 * v.abs().max(1.0);
            prop_assert!((back.left - l).abs() <= tol(l));
            prop_assert!((back.top - t).abs() <= tol(t));
            prop_assert!((back.right - r).abs() <= tol(r));
            prop_assert!((back.bottom - b).abs() <= tol(b));
        }
    }
}
