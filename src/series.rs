//! Spectral series model.
//!
//! A [`Series`] is one captured spectrum: intensities, optional calibrated
//! wavelengths and enough provenance to explain where it came from.

use serde::{Deserialize, Serialize};

/// Where a series was sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// A single pixel.
    #[default]
    Point,
    /// The averaged spectrum of a rectangular region.
    RegionOfInterest,
    /// A spectrum derived from a mask layer.
    MaskLayer,
}

/// Integer pixel rectangle in the cube's spatial coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoiRect {
    /// Left edge (inclusive).
    pub min_x: usize,
    /// Top edge (inclusive).
    pub min_y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl RoiRect {
    /// Create a new rectangle.
    #[must_use]
    pub fn new(min_x: usize, min_y: usize, width: usize, height: usize) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Number of pixels covered, saturating at `usize::MAX`.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Whether two rectangles have the same width and height.
    ///
    /// Position is ignored.
    #[must_use]
    pub fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Exclusive right edge, or `None` if it does not fit in `usize`.
    #[must_use]
    pub fn max_x(&self) -> Option<usize> {
        self.min_x.checked_add(self.width)
    }

    /// Exclusive bottom edge, or `None` if it does not fit in `usize`.
    #[must_use]
    pub fn max_y(&self) -> Option<usize> {
        self.min_y.checked_add(self.height)
    }

    /// Iterate pixel coordinates `(x, y)` in row-major order.
    ///
    /// A rectangle reaching past `usize::MAX` is cut off at that edge.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let max_x = self.min_x.saturating_add(self.width);
        let max_y = self.min_y.saturating_add(self.height);
        (self.min_y..max_y).flat_map(move |y| (self.min_x..max_x).map(move |x| (x, y)))
    }
}

impl std::fmt::Display for RoiRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.min_x, self.min_y, self.width, self.height
        )
    }
}

impl std::str::FromStr for RoiRect {
    type Err = crate::error::Error;

    /// Parse `x,y,width,height`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(crate::error::Error::InvalidArgument(format!(
                "expected x,y,width,height but got '{s}'"
            )));
        }
        let mut fields = [0usize; 4];
        for (field, part) in fields.iter_mut().zip(&parts) {
            *field = part.parse().map_err(|_| {
                crate::error::Error::InvalidArgument(format!("'{part}' is not a pixel coordinate"))
            })?;
        }
        Ok(Self::new(fields[0], fields[1], fields[2], fields[3]))
    }
}

/// One spectrum plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Intensities, one per channel.
    pub values: Vec<f64>,

    /// Calibrated wavelengths, if the sample has them.
    ///
    /// Usually the same length as `values`, but consumers always pair up to
    /// the shorter of the two.
    #[serde(default)]
    pub wavelengths: Option<Vec<f64>>,

    /// Display title.
    #[serde(default)]
    pub title: String,

    /// Where the sample came from (file, cube name, library entry).
    #[serde(default)]
    pub source_label: String,

    /// Kind of sample.
    #[serde(default)]
    pub kind: SeriesKind,

    /// Sampled rectangle, for region-of-interest series.
    #[serde(default)]
    pub roi_rect: Option<RoiRect>,

    /// Whether this series was extracted from the currently loaded cube.
    #[serde(default)]
    pub is_from_live_cube: bool,
}

impl Series {
    /// Create a point series from intensities alone.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            wavelengths: None,
            title: String::new(),
            source_label: String::new(),
            kind: SeriesKind::Point,
            roi_rect: None,
            is_from_live_cube: false,
        }
    }

    /// Attach calibrated wavelengths.
    #[must_use]
    pub fn with_wavelengths(mut self, wavelengths: Vec<f64>) -> Self {
        self.wavelengths = Some(wavelengths);
        self
    }

    /// Set the display title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the provenance label.
    #[must_use]
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    /// Mark as a single-pixel sample.
    #[must_use]
    pub fn point(mut self) -> Self {
        self.kind = SeriesKind::Point;
        self.roi_rect = None;
        self
    }

    /// Mark as a region-of-interest sample covering `rect`.
    #[must_use]
    pub fn roi(mut self, rect: RoiRect) -> Self {
        self.kind = SeriesKind::RegionOfInterest;
        self.roi_rect = Some(rect);
        self
    }

    /// Mark as a mask-layer sample.
    #[must_use]
    pub fn mask_layer(mut self) -> Self {
        self.kind = SeriesKind::MaskLayer;
        self.roi_rect = None;
        self
    }

    /// Set whether the series comes from the currently loaded cube.
    #[must_use]
    pub fn from_live_cube(mut self, live: bool) -> Self {
        self.is_from_live_cube = live;
        self
    }

    /// Number of intensity values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no intensity values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether a non-empty wavelength axis is attached.
    #[must_use]
    pub fn has_wavelengths(&self) -> bool {
        self.wavelengths.as_ref().is_some_and(|w| !w.is_empty())
    }

    /// Title for messages, falling back to the source label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.title.is_empty() {
            &self.title
        } else if !self.source_label.is_empty() {
            &self.source_label
        } else {
            "<untitled>"
        }
    }
}
