use std::fmt;

use crate::error::MlcError;
use crate::Result;

/// Per-axis extents of a `NumericArray`.
///
/// A shape built through `Shape::new` always has rank ≥ 1 and strictly
/// positive extents. The default shape has no axes and describes the
/// empty/released array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: &[usize]) -> Result<Self> {
        Self::validate(dims)?;
        Ok(Self {
            dims: dims.to_vec(),
        })
    }

    /// Check `dims` and return the element count it describes.
    pub fn validate(dims: &[usize]) -> Result<usize> {
        if dims.is_empty() {
            return Err(MlcError::InvalidArgument(
                "rank must be at least 1".to_string(),
            ));
        }
        let mut size: usize = 1;
        for (axis, &extent) in dims.iter().enumerate() {
            if extent == 0 {
                return Err(MlcError::InvalidArgument(format!(
                    "zero extent on axis {} of shape {:?}",
                    axis, dims
                )));
            }
            size = size.checked_mul(extent).ok_or_else(|| {
                MlcError::InvalidArgument(format!("shape {:?} overflows usize", dims))
            })?;
        }
        Ok(size)
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Product of all extents; 0 for the axis-less default shape.
    pub fn numel(&self) -> usize {
        if self.dims.is_empty() {
            0
        } else {
            self.dims.iter().product()
        }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.dims.get(axis).copied()
    }

    /// Extent of the final axis, the softmax group length.
    pub fn last(&self) -> Option<usize> {
        self.dims.last().copied()
    }

    /// Row-major flat offset of a multi-index.
    pub fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.dims.len() || self.dims.is_empty() {
            return None;
        }
        let mut offset = 0usize;
        for (&i, &extent) in index.iter().zip(self.dims.iter()) {
            if i >= extent {
                return None;
            }
            offset = offset * extent + i;
        }
        Some(offset)
    }

    pub(crate) fn clear(&mut self) {
        self.dims = Vec::new();
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, extent) in self.dims.iter().enumerate() {
            write!(f, "{}", extent)?;
            if idx + 1 != self.dims.len() {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}
