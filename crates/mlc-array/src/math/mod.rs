//! The array core: `NumericArray` and its `Shape`.
//!
//! Storage is a flat row-major `Vec<f32>`; the shape is fixed at
//! construction and only cleared by `NumericArray::release`.
pub mod array;
pub mod shape;

pub use array::NumericArray;
pub use shape::Shape;

pub(crate) use array::alloc_exact;
