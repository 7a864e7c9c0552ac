//! Structural descriptions of observation and action shapes.
//!
//! These are descriptors, not containers: reading one never touches the
//! underlying simulation state.

/// Element type of a space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dtype {
    /// Unsigned bytes, e.g. image channels.
    U8,
    /// 32-bit floats, e.g. state and action vectors.
    F32,
}

/// A fixed-shape numeric grid with uniform scalar bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace {
    pub low: f32,
    pub high: f32,
    pub shape: Vec<usize>,
    pub dtype: Dtype,
}

impl BoxSpace {
    #[must_use]
    pub fn new(low: f32, high: f32, shape: Vec<usize>, dtype: Dtype) -> Self {
        Self {
            low,
            high,
            shape,
            dtype,
        }
    }

    /// Total number of elements the shape describes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a flat value fits this space: right element count and
    /// every component within bounds. Infinite bounds admit any finite
    /// value; NaN never fits.
    #[must_use]
    pub fn contains(&self, value: &[f32]) -> bool {
        value.len() == self.len() && value.iter().all(|v| *v >= self.low && *v <= self.high)
    }
}

/// The adapter's two-part observation description: a byte image at the
/// configured size next to the engine-reported state vector.
#[derive(Clone, Debug, PartialEq)]
pub struct ObsSpace {
    pub image: BoxSpace,
    pub vector: BoxSpace,
}
