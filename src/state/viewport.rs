//! Geometry of the frame the main image is drawn into.
//!
//! The frame starts out filling the image area. Zoom steps grow or shrink
//! the frame, and the image is always drawn as large as possible inside it
//! while keeping its aspect ratio.

use crate::config::{
    DEFAULT_AREA_HEIGHT, DEFAULT_AREA_WIDTH, MAX_IMAGE_HEIGHT, MAX_IMAGE_WIDTH, MIN_IMAGE_HEIGHT,
    MIN_IMAGE_WIDTH, ZOOM_FACTOR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Largest size within `bounds` that has the aspect ratio of `image`.
///
/// Scales up as well as down. An empty image or empty bounds yield an
/// empty size.
pub fn fit_keep_aspect(image: Size, bounds: Size) -> Size {
    if image.is_empty() || bounds.is_empty() {
        return Size::new(0, 0);
    }

    let (iw, ih) = (u64::from(image.width), u64::from(image.height));
    let (bw, bh) = (u64::from(bounds.width), u64::from(bounds.height));

    let width_at_full_height = bh * iw / ih;
    if width_at_full_height <= bw {
        Size::new(width_at_full_height.max(1) as u32, bounds.height)
    } else {
        Size::new(bounds.width, (bw * ih / iw).max(1) as u32)
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    frame: Size,
    area: Size,
    image: Option<Size>,
}

impl Default for Viewport {
    fn default() -> Self {
        let area = Size::new(DEFAULT_AREA_WIDTH, DEFAULT_AREA_HEIGHT);
        Self {
            frame: area,
            area,
            image: None,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the size of the visible image area. Empty sizes are ignored.
    pub fn set_area(&mut self, area: Size) {
        if !area.is_empty() {
            self.area = area;
        }
    }

    /// Records a new area size after a window resize.
    ///
    /// A frame that was filling the old area follows the new one; a zoomed
    /// frame is left alone. Returns whether the frame changed.
    pub fn resize_area(&mut self, area: Size) -> bool {
        if area.is_empty() || area == self.area {
            return false;
        }
        let follow = self.frame == self.area;
        self.area = area;
        if follow {
            self.frame = area;
        }
        follow
    }

    pub fn set_image(&mut self, image: Option<Size>) {
        self.image = image;
    }

    pub fn frame(&self) -> Size {
        self.frame
    }

    pub fn image(&self) -> Option<Size> {
        self.image
    }

    pub fn fit_to_area(&mut self) -> Size {
        self.frame = self.area;
        self.frame
    }

    pub fn zoom_in(&mut self) -> Size {
        let scale = |v: u32| (f64::from(v) * ZOOM_FACTOR) as u32;
        self.frame = Size::new(
            scale(self.frame.width).min(MAX_IMAGE_WIDTH),
            scale(self.frame.height).min(MAX_IMAGE_HEIGHT),
        );
        self.frame
    }

    pub fn zoom_out(&mut self) -> Size {
        let scale = |v: u32| (f64::from(v) / ZOOM_FACTOR) as u32;
        self.frame = Size::new(
            scale(self.frame.width).max(MIN_IMAGE_WIDTH),
            scale(self.frame.height).max(MIN_IMAGE_HEIGHT),
        );
        self.frame
    }

    /// Sizes the frame to the image's own pixel dimensions.
    pub fn actual_size(&mut self) -> Size {
        if let Some(image) = self.image {
            self.frame = image;
        }
        self.frame
    }

    /// Size the image is drawn at inside the frame.
    pub fn display_size(&self) -> Option<Size> {
        self.image
            .map(|image| fit_keep_aspect(image, self.frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_keep_aspect_downscales() {
        assert_eq!(
            fit_keep_aspect(Size::new(1000, 500), Size::new(125, 115)),
            Size::new(125, 62)
        );
        assert_eq!(
            fit_keep_aspect(Size::new(500, 1000), Size::new(125, 115)),
            Size::new(57, 115)
        );
    }

    #[test]
    fn test_fit_keep_aspect_upscales() {
        assert_eq!(
            fit_keep_aspect(Size::new(10, 10), Size::new(800, 600)),
            Size::new(600, 600)
        );
    }

    #[test]
    fn test_fit_keep_aspect_empty() {
        assert_eq!(
            fit_keep_aspect(Size::new(0, 10), Size::new(800, 600)),
            Size::new(0, 0)
        );
        assert_eq!(
            fit_keep_aspect(Size::new(10, 10), Size::new(0, 600)),
            Size::new(0, 0)
        );
    }

    #[test]
    fn test_extreme_aspect_never_collapses_to_zero() {
        assert_eq!(
            fit_keep_aspect(Size::new(10_000, 1), Size::new(100, 100)),
            Size::new(100, 1)
        );
    }

    #[test]
    fn test_zoom_in_truncates_and_clamps() {
        let mut viewport = Viewport::new();
        viewport.set_area(Size::new(101, 201));
        viewport.fit_to_area();

        assert_eq!(viewport.zoom_in(), Size::new(116, 231));

        viewport.set_area(Size::new(2900, 101));
        viewport.fit_to_area();
        assert_eq!(viewport.zoom_in(), Size::new(3000, 116));
        assert_eq!(viewport.zoom_in(), Size::new(3000, 133));
    }

    #[test]
    fn test_zoom_out_truncates_and_clamps() {
        let mut viewport = Viewport::new();
        viewport.set_area(Size::new(117, 34));
        viewport.fit_to_area();

        assert_eq!(viewport.zoom_out(), Size::new(101, 30));
        for _ in 0..50 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.frame(), Size::new(30, 30));
    }

    #[test]
    fn test_actual_size_and_fit() {
        let mut viewport = Viewport::new();
        assert_eq!(viewport.actual_size(), Size::new(800, 600));

        viewport.set_image(Some(Size::new(4000, 3000)));
        assert_eq!(viewport.actual_size(), Size::new(4000, 3000));
        assert_eq!(viewport.display_size(), Some(Size::new(4000, 3000)));

        assert_eq!(viewport.fit_to_area(), Size::new(800, 600));
        assert_eq!(viewport.display_size(), Some(Size::new(800, 600)));
    }

    #[test]
    fn test_empty_area_is_ignored() {
        let mut viewport = Viewport::new();
        viewport.set_area(Size::new(0, 0));
        assert_eq!(viewport.fit_to_area(), Size::new(800, 600));
    }

    #[test]
    fn test_display_size_without_image() {
        assert_eq!(Viewport::new().display_size(), None);
    }

    #[test]
    fn test_resize_area_moves_fitted_frame_only() {
        let mut viewport = Viewport::new();
        assert!(viewport.resize_area(Size::new(1000, 700)));
        assert_eq!(viewport.frame(), Size::new(1000, 700));

        assert!(!viewport.resize_area(Size::new(1000, 700)));
        assert!(!viewport.resize_area(Size::new(0, 700)));

        viewport.zoom_out();
        let zoomed = viewport.frame();
        assert!(!viewport.resize_area(Size::new(900, 600)));
        assert_eq!(viewport.frame(), zoomed);

        assert_eq!(viewport.fit_to_area(), Size::new(900, 600));
    }
}
