//! Page size and image placement calculations
//!
//! All geometry ends up in PDF points (1/72 inch) with the origin at the
//! bottom-left corner of the page.

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * 25.4)
    }

    /// Create a length from points (1/72 inch)
    pub fn from_pt(pt: f64) -> Self {
        Length(pt * 25.4 / 72.0)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self {
            width: Length::from_mm(215.9),
            height: Length::from_mm(279.4),
        }
    }

    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self {
            width: Length::from_mm(210.0),
            height: Length::from_mm(297.0),
        }
    }
}

/// Pixel dimensions and resolution of a decoded image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageGeometry {
    pub width_px: u32,
    pub height_px: u32,
    /// Horizontal and vertical pixels per inch
    pub dpi: (f64, f64),
}

impl ImageGeometry {
    /// Resolution assumed when the file carries none: one pixel per point
    pub const DEFAULT_DPI: f64 = 72.0;

    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
            dpi: (Self::DEFAULT_DPI, Self::DEFAULT_DPI),
        }
    }

    pub fn with_dpi(mut self, dpi_x: f64, dpi_y: f64) -> Self {
        self.dpi = (dpi_x, dpi_y);
        self
    }

    /// Printed width at the image's own resolution
    pub fn width(&self) -> Length {
        Length::from_inches(self.width_px as f64 / self.dpi.0)
    }

    /// Printed height at the image's own resolution
    pub fn height(&self) -> Length {
        Length::from_inches(self.height_px as f64 / self.dpi.1)
    }
}

/// How pages are sized and where the image sits on them
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LayoutPolicy {
    /// Page exactly the size of the image; image fills it with no margin
    #[default]
    NativeSize,
    /// Fixed page; image scaled to the page width and centred
    Fixed(PageDimensions),
}

/// Axis-aligned rectangle in points, origin bottom-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Page size and image rectangle for one page, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page_width: f64,
    pub page_height: f64,
    pub image: Rect,
}

impl LayoutPolicy {
    /// Compute where an image of the given geometry lands on its page
    pub fn place(&self, image: &ImageGeometry) -> Placement {
        let image_w = image.width().pt();
        let image_h = image.height().pt();

        match self {
            LayoutPolicy::NativeSize => Placement {
                page_width: image_w,
                page_height: image_h,
                image: Rect { x: 0.0, y: 0.0, width: image_w, height: image_h },
            },
            LayoutPolicy::Fixed(page) => {
                let page_w = page.width.pt();
                let page_h = page.height.pt();

                // Fill the width; shrink to the height when that would overflow
                let mut scale = page_w / image_w;
                if image_h * scale > page_h {
                    scale = page_h / image_h;
                }

                let width = image_w * scale;
                let height = image_h * scale;
                Placement {
                    page_width: page_w,
                    page_height: page_h,
                    image: Rect {
                        x: (page_w - width) / 2.0,
                        y: (page_h - height) / 2.0,
                        width,
                        height,
                    },
                }
            }
        }
    }
}
