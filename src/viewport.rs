use crate::config::ScreenSize;
use crate::error::{Error, Result};
use crate::geo::{MapRect, MapSize, Region};

/// The visible part of the map and the screen area it is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    rect: MapRect,
    size: ScreenSize,
}

impl Viewport {
    /// A viewport showing `rect` on a `size`-point screen.
    ///
    /// Both the rect and the screen must have positive, finite extent.
    pub fn new(rect: MapRect, size: ScreenSize) -> Result<Self> {
        let rect_ok = rect.size.width > 0.0
            && rect.size.height > 0.0
            && rect.size.width.is_finite()
            && rect.size.height.is_finite()
            && rect.origin.x.is_finite()
            && rect.origin.y.is_finite();
        if !rect_ok {
            return Err(Error::InvalidParameter {
                name: "viewport",
                message: "map rect must have positive, finite extent",
            });
        }
        if !size.is_positive() {
            return Err(Error::InvalidParameter {
                name: "viewport",
                message: "screen size must be positive and finite",
            });
        }
        Ok(Self { rect, size })
    }

    /// A viewport showing `region` on a `size`-point screen.
    pub fn from_region(region: &Region, size: ScreenSize) -> Result<Self> {
        Self::new(region.to_map_rect(), size)
    }

    /// Visible map rect.
    pub fn rect(&self) -> &MapRect {
        &self.rect
    }

    /// Screen size in points.
    pub fn size(&self) -> ScreenSize {
        self.size
    }

    /// Map units covered by one screen point, per axis.
    pub fn map_units_per_point(&self) -> MapSize {
        MapSize::new(
            self.rect.size.width / self.size.width,
            self.rect.size.height / self.size.height,
        )
    }

    /// Convert a screen-point size to map units at this viewport's scale.
    pub fn to_map_size(&self, size: ScreenSize) -> MapSize {
        let scale = self.map_units_per_point();
        MapSize::new(size.width * scale.width, size.height * scale.height)
    }
}
