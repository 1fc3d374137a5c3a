use std::ops::{Index, IndexMut};
use std::slice::{Iter, IterMut};

use crate::error::MlcError;
use crate::math::shape::Shape;
use crate::Result;

/// Owned, row-major `f32` array tagged with its shape.
///
/// Every constructor validates the shape and the buffer length, so a value
/// built here always satisfies `data.len() == shape.numel() > 0`. The
/// `Default` value (and any array after `release`) is the empty sentinel:
/// no axes, no data, and `is_usable() == false`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NumericArray {
    data: Vec<f32>,
    shape: Shape,
}

impl NumericArray {
    pub fn from_shape_vec(dims: &[usize], data: Vec<f32>) -> Result<Self> {
        let shape = Shape::new(dims)?;
        if data.len() != shape.numel() {
            return Err(MlcError::ShapeMismatch {
                expected: shape.numel(),
                found: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Zero-filled array, typically the destination of a vector operation.
    pub fn zeros(dims: &[usize]) -> Result<Self> {
        let size = Shape::validate(dims)?;
        let mut data = alloc_exact(size)?;
        data.resize(size, 0.0);
        Self::from_shape_vec(dims, data)
    }

    /// Usable iff data is present and the element count is nonzero.
    pub fn is_usable(&self) -> bool {
        !self.data.is_empty() && self.data.len() == self.shape.numel()
    }

    pub fn check_usable(&self) -> Result<()> {
        if self.is_usable() {
            Ok(())
        } else {
            Err(MlcError::InvalidArgument(
                "array is empty or has been released".to_string(),
            ))
        }
    }

    /// Free data and shape and reset to the empty sentinel.
    ///
    /// Safe to call any number of times.
    pub fn release(&mut self) {
        self.data = Vec::new();
        self.shape.clear();
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable view of the values; the length cannot change through it.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn iter(&self) -> Iter<'_, f32> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, f32> {
        self.data.iter_mut()
    }

    pub fn get(&self, index: &[usize]) -> Option<f32> {
        self.shape.offset(index).map(|offset| self.data[offset])
    }

    /// Row `row` of a 2-D array.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        match self.shape.dims() {
            &[rows, cols] if row < rows => {
                let start = row * cols;
                Some(&self.data[start..start + cols])
            }
            _ => None,
        }
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.clone()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Reserve exactly `len` floats, reporting allocation failure as an error.
pub(crate) fn alloc_exact(len: usize) -> Result<Vec<f32>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        MlcError::ResourceExhausted(format!("cannot allocate {} elements: {}", len, e))
    })?;
    Ok(data)
}

impl Index<usize> for NumericArray {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<usize> for NumericArray {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}
