//! Read-only access to hyperspectral cubes.
//!
//! The engine never owns cube storage. It reads through [`CubeAccessor`],
//! which exposes the three raw axis extents, a mapping from logical roles
//! (width, height, channel) to physical axes, and indexed reads.
//!
//! [`ArrayCube`] is an in-memory implementation backed by `ndarray`, used by
//! the CLI and tests.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, MetricError, Result};
use crate::series::RoiRect;

/// Physical memory order of a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CubeLayout {
    /// Pick the channel axis from the shape: the smallest extent wins,
    /// earlier axes win ties.
    #[default]
    Auto,
    /// Channels first: `(channel, height, width)`.
    Chw,
    /// Channels last: `(height, width, channel)`.
    Hwc,
}

impl fmt::Display for CubeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Chw => write!(f, "chw"),
            Self::Hwc => write!(f, "hwc"),
        }
    }
}

impl FromStr for CubeLayout {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "chw" => Ok(Self::Chw),
            "hwc" => Ok(Self::Hwc),
            other => Err(Error::InvalidArgument(format!(
                "unknown cube layout '{other}' (expected auto, chw or hwc)"
            ))),
        }
    }
}

/// Physical axis index (0..3) for each logical role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisRoles {
    /// Axis holding the spatial x coordinate.
    pub width: usize,
    /// Axis holding the spatial y coordinate.
    pub height: usize,
    /// Axis holding the spectral channel.
    pub channel: usize,
}

impl AxisRoles {
    /// `(width, height, channels)` extents for raw `dims`.
    #[must_use]
    pub fn extents(&self, dims: (usize, usize, usize)) -> (usize, usize, usize) {
        let dims = [dims.0, dims.1, dims.2];
        (dims[self.width], dims[self.height], dims[self.channel])
    }
}

/// Read-only view of a hyperspectral cube.
///
/// Callers must not mutate the cube while an evaluation is running; the
/// engine does no locking.
pub trait CubeAccessor {
    /// Raw extents of the three physical axes.
    fn dims(&self) -> (usize, usize, usize);

    /// Direct indexed read.
    fn get_value(&self, i0: usize, i1: usize, i2: usize) -> f64;

    /// Map logical roles to physical axes for `layout`.
    ///
    /// Returns `None` when the layout cannot be applied to this cube, which
    /// the default implementation does for cubes with an empty axis.
    fn axes_for_layout(&self, layout: CubeLayout) -> Option<AxisRoles> {
        let (d0, d1, d2) = self.dims();
        if d0 == 0 || d1 == 0 || d2 == 0 {
            return None;
        }
        let channel = match layout {
            CubeLayout::Chw => 0,
            CubeLayout::Hwc => 2,
            CubeLayout::Auto => {
                let dims = [d0, d1, d2];
                (0..3).min_by_key(|&i| dims[i])?
            }
        };
        Some(match channel {
            0 => AxisRoles {
                channel: 0,
                height: 1,
                width: 2,
            },
            1 => AxisRoles {
                height: 0,
                channel: 1,
                width: 2,
            },
            _ => AxisRoles {
                height: 0,
                width: 1,
                channel: 2,
            },
        })
    }
}

/// Reads per-pixel spectra from a cube under one layout.
pub struct SpectrumReader<'a, C: CubeAccessor + ?Sized> {
    cube: &'a C,
    axes: AxisRoles,
    width: usize,
    height: usize,
    channels: usize,
}

impl<'a, C: CubeAccessor + ?Sized> SpectrumReader<'a, C> {
    /// Resolve the layout of `cube`.
    ///
    /// Fails with `RoiDataUnavailable` for an unsupported layout or a cube
    /// without channels.
    pub fn new(cube: &'a C, layout: CubeLayout) -> std::result::Result<Self, MetricError> {
        let axes = cube
            .axes_for_layout(layout)
            .ok_or(MetricError::RoiDataUnavailable)?;
        let (width, height, channels) = axes.extents(cube.dims());
        if channels == 0 {
            return Err(MetricError::RoiDataUnavailable);
        }
        Ok(Self {
            cube,
            axes,
            width,
            height,
            channels,
        })
    }

    /// Number of spectral channels.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Spatial `(width, height)`.
    #[must_use]
    pub fn spatial_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Fail with `RoiDataUnavailable` unless `rect` lies inside the cube.
    pub fn check_rect(&self, rect: &RoiRect) -> std::result::Result<(), MetricError> {
        let inside = rect.max_x().is_some_and(|max_x| max_x <= self.width)
            && rect.max_y().is_some_and(|max_y| max_y <= self.height);
        if !inside {
            log::debug!(
                "ROI {} exceeds cube extent {}x{}",
                rect,
                self.width,
                self.height
            );
            return Err(MetricError::RoiDataUnavailable);
        }
        Ok(())
    }

    /// Full spectrum of pixel `(x, y)`.
    ///
    /// Coordinates must be inside the cube.
    #[must_use]
    pub fn spectrum(&self, x: usize, y: usize) -> Vec<f64> {
        let mut index = [0usize; 3];
        index[self.axes.width] = x;
        index[self.axes.height] = y;
        (0..self.channels)
            .map(|c| {
                index[self.axes.channel] = c;
                self.cube.get_value(index[0], index[1], index[2])
            })
            .collect()
    }
}

/// Spectrum of a single pixel.
pub fn pixel_spectrum<C: CubeAccessor + ?Sized>(
    cube: &C,
    layout: CubeLayout,
    x: usize,
    y: usize,
) -> std::result::Result<Vec<f64>, MetricError> {
    let reader = SpectrumReader::new(cube, layout)?;
    reader.check_rect(&RoiRect::new(x, y, 1, 1))?;
    Ok(reader.spectrum(x, y))
}

/// Mean spectrum of every pixel inside `rect`.
///
/// Non-finite samples are skipped per channel. A channel with no finite
/// sample at all comes out as NaN and is later dropped by alignment.
pub fn roi_mean_spectrum<C: CubeAccessor + ?Sized>(
    cube: &C,
    layout: CubeLayout,
    rect: &RoiRect,
) -> std::result::Result<Vec<f64>, MetricError> {
    let reader = SpectrumReader::new(cube, layout)?;
    reader.check_rect(rect)?;
    if rect.pixel_count() == 0 {
        return Err(MetricError::RoiDataUnavailable);
    }

    let mut sums = vec![0.0; reader.channels()];
    let mut counts = vec![0usize; reader.channels()];
    for (x, y) in rect.pixels() {
        for (c, v) in reader.spectrum(x, y).into_iter().enumerate() {
            if v.is_finite() {
                sums[c] += v;
                counts[c] += 1;
            }
        }
    }

    Ok(sums
        .iter()
        .zip(&counts)
        .map(|(&sum, &n)| if n == 0 { f64::NAN } else { sum / n as f64 })
        .collect())
}

/// In-memory cube backed by a 3-D array.
#[derive(Debug, Clone)]
pub struct ArrayCube {
    data: Array3<f64>,
}

impl ArrayCube {
    /// Wrap an existing array.
    #[must_use]
    pub fn new(data: Array3<f64>) -> Self {
        Self { data }
    }

    /// Build a cube from a flat row-major buffer of shape `(d0, d1, d2)`.
    pub fn from_shape_vec(shape: (usize, usize, usize), values: Vec<f64>) -> Result<Self> {
        let data = Array3::from_shape_vec(shape, values)
            .map_err(|e| Error::Cube(format!("invalid cube shape {shape:?}: {e}")))?;
        Ok(Self { data })
    }

    /// Load a 3-D `.npy` file holding `f64`, `f32` or `u16` samples.
    pub fn from_npy(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let data = match ndarray_npy::read_npy::<_, Array3<f64>>(path) {
            Ok(array) => array,
            Err(f64_err) => {
                if let Ok(array) = ndarray_npy::read_npy::<_, Array3<f32>>(path) {
                    array.mapv(f64::from)
                } else if let Ok(array) = ndarray_npy::read_npy::<_, Array3<u16>>(path) {
                    array.mapv(f64::from)
                } else {
                    return Err(Error::Cube(format!(
                        "failed to read {} as a 3-D f64/f32/u16 array: {f64_err}",
                        path.display()
                    )));
                }
            }
        };

        log::info!(
            "loaded cube {} with shape {:?}",
            path.display(),
            data.shape()
        );
        Ok(Self { data })
    }

    /// The underlying array.
    #[must_use]
    pub fn array(&self) -> &Array3<f64> {
        &self.data
    }
}

impl CubeAccessor for ArrayCube {
    fn dims(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    fn get_value(&self, i0: usize, i1: usize, i2: usize) -> f64 {
        self.data[[i0, i1, i2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3 channels, 2 rows, 4 columns; value = 100*c + 10*y + x.
    fn chw_cube() -> ArrayCube {
        ArrayCube::new(Array3::from_shape_fn((3, 2, 4), |(c, y, x)| {
            (100 * c + 10 * y + x) as f64
        }))
    }

    #[test]
    fn test_axes_for_layout() {
        let cube = chw_cube();
        assert_eq!(
            cube.axes_for_layout(CubeLayout::Chw),
            Some(AxisRoles {
                channel: 0,
                height: 1,
                width: 2
            })
        );
        assert_eq!(
            cube.axes_for_layout(CubeLayout::Hwc),
            Some(AxisRoles {
                height: 0,
                width: 1,
                channel: 2
            })
        );
        // Smallest extent (3) is axis 0.
        assert_eq!(
            cube.axes_for_layout(CubeLayout::Auto),
            cube.axes_for_layout(CubeLayout::Chw)
        );
    }

    #[test]
    fn test_auto_layout_middle_axis() {
        let cube = ArrayCube::new(Array3::zeros((10, 2, 12)));
        let axes = cube.axes_for_layout(CubeLayout::Auto).unwrap();
        assert_eq!(axes.channel, 1);
        assert_eq!(axes.extents(cube.dims()), (12, 10, 2));
    }

    #[test]
    fn test_empty_axis_unsupported() {
        let cube = ArrayCube::new(Array3::zeros((0, 2, 2)));
        assert!(cube.axes_for_layout(CubeLayout::Chw).is_none());
        assert_eq!(
            pixel_spectrum(&cube, CubeLayout::Chw, 0, 0),
            Err(MetricError::RoiDataUnavailable)
        );
    }

    #[test]
    fn test_pixel_spectrum() {
        let cube = chw_cube();
        let spectrum = pixel_spectrum(&cube, CubeLayout::Chw, 3, 1).unwrap();
        assert_eq!(spectrum, vec![13.0, 113.0, 213.0]);
        assert_eq!(
            pixel_spectrum(&cube, CubeLayout::Chw, 4, 0),
            Err(MetricError::RoiDataUnavailable)
        );
    }

    #[test]
    fn test_hwc_matches_chw() {
        let chw = chw_cube();
        let hwc = ArrayCube::new(chw.array().clone().permuted_axes([1, 2, 0]).to_owned());
        assert_eq!(
            pixel_spectrum(&hwc, CubeLayout::Hwc, 2, 1).unwrap(),
            pixel_spectrum(&chw, CubeLayout::Chw, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_roi_mean_spectrum() {
        let cube = chw_cube();
        let mean = roi_mean_spectrum(&cube, CubeLayout::Chw, &RoiRect::new(0, 0, 2, 2)).unwrap();
        // x in {0,1}, y in {0,1}: mean offset is 10*0.5 + 0.5
        assert_eq!(mean, vec![5.5, 105.5, 205.5]);
    }

    #[test]
    fn test_roi_mean_skips_non_finite() {
        let mut data = Array3::from_elem((1, 1, 2), 4.0);
        data[[0, 0, 1]] = f64::NAN;
        let cube = ArrayCube::new(data);
        let mean = roi_mean_spectrum(&cube, CubeLayout::Chw, &RoiRect::new(0, 0, 2, 1)).unwrap();
        assert_eq!(mean, vec![4.0]);

        let nan_cube = ArrayCube::new(Array3::from_elem((1, 1, 1), f64::NAN));
        let mean =
            roi_mean_spectrum(&nan_cube, CubeLayout::Chw, &RoiRect::new(0, 0, 1, 1)).unwrap();
        assert!(mean[0].is_nan());
    }

    #[test]
    fn test_roi_out_of_bounds() {
        let cube = chw_cube();
        assert_eq!(
            roi_mean_spectrum(&cube, CubeLayout::Chw, &RoiRect::new(3, 0, 2, 1)),
            Err(MetricError::RoiDataUnavailable)
        );
        assert_eq!(
            roi_mean_spectrum(&cube, CubeLayout::Chw, &RoiRect::new(0, 0, 0, 1)),
            Err(MetricError::RoiDataUnavailable)
        );        assert_eq!(
            roi_mean_spectrum(&cube, CubeLayout::Chw, &RoiRect::new(usize::MAX, 0, 2, 1)),
            Err(MetricError::RoiDataUnavailable)
        );
        assert_eq!(
            pixel_spectrum(&cube, CubeLayout::Chw, 0, usize::MAX),
            Err(MetricError::RoiDataUnavailable)
        );
    }

    #[test]
    fn test_from_shape_vec() {
        let cube = ArrayCube::from_shape_vec((1, 1, 2), vec![1.0, 2.0]).unwrap();
        assert_eq!(cube.dims(), (1, 1, 2));
        assert!(ArrayCube::from_shape_vec((2, 2, 2), vec![1.0]).is_err());
    }

    #[test]
    fn test_npy_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.npy");
        let array = Array3::from_shape_fn((2, 3, 4), |(a, b, c)| (a * 12 + b * 4 + c) as f32);
        ndarray_npy::write_npy(&path, &array).unwrap();

        let cube = ArrayCube::from_npy(&path).unwrap();
        assert_eq!(cube.dims(), (2, 3, 4));
        assert_eq!(cube.get_value(1, 2, 3), 23.0);
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("HWC".parse::<CubeLayout>().unwrap(), CubeLayout::Hwc);
        assert!("xyz".parse::<CubeLayout>().is_err());
    }
}
