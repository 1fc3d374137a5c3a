use std::fmt;
use std::str::FromStr;

use bytemuck::Pod;
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::MlcError;
use crate::math::{alloc_exact, NumericArray, Shape};
use crate::Result;

/// Element type of a source buffer.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// 32-bit signed integer
    Int,
    /// 32-bit IEEE 754 float
    Float,
    /// 64-bit IEEE 754 float
    Double,
}

impl DataType {
    /// Size in bytes of one element.
    pub fn element_size(&self) -> usize {
        match self {
            DataType::Int => std::mem::size_of::<i32>(),
            DataType::Float => std::mem::size_of::<f32>(),
            DataType::Double => std::mem::size_of::<f64>(),
        }
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int" | "i32" | "integer" => Ok(DataType::Int),
            "float" | "f32" => Ok(DataType::Float),
            "double" | "f64" => Ok(DataType::Double),
            _ => Err(format!(
                "Unknown data type: {}. Expected one of int, float, double",
                s
            )),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "int"),
            DataType::Float => write!(f, "float"),
            DataType::Double => write!(f, "double"),
        }
    }
}

/// A borrowed source buffer tagged with its element type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedBuffer<'a> {
    Int(&'a [i32]),
    Float(&'a [f32]),
    Double(&'a [f64]),
}

impl<'a> TypedBuffer<'a> {
    pub fn data_type(&self) -> DataType {
        match self {
            TypedBuffer::Int(_) => DataType::Int,
            TypedBuffer::Float(_) => DataType::Float,
            TypedBuffer::Double(_) => DataType::Double,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TypedBuffer::Int(values) => values.len(),
            TypedBuffer::Float(values) => values.len(),
            TypedBuffer::Double(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> From<&'a [i32]> for TypedBuffer<'a> {
    fn from(values: &'a [i32]) -> Self {
        TypedBuffer::Int(values)
    }
}

impl<'a> From<&'a [f32]> for TypedBuffer<'a> {
    fn from(values: &'a [f32]) -> Self {
        TypedBuffer::Float(values)
    }
}

impl<'a> From<&'a [f64]> for TypedBuffer<'a> {
    fn from(values: &'a [f64]) -> Self {
        TypedBuffer::Double(values)
    }
}

/// Convert a typed buffer into a `NumericArray` of the given shape.
///
/// The rank is `shape.len()`. The first `product(shape)` source elements are
/// cast to `f32` with `as` semantics: no range checking, so large integers
/// and doubles lose precision silently.
///
/// # Errors
///
/// * `InvalidArgument` if the buffer is empty, the shape is empty, any extent
///   is zero, or the buffer holds fewer elements than the shape requires.
/// * `ResourceExhausted` if the data storage cannot be allocated.
pub fn prepare_data(input: TypedBuffer<'_>, shape: &[usize]) -> Result<NumericArray> {
    let size = check_source(input.len(), input.data_type(), shape)?;
    let data = match input {
        TypedBuffer::Int(values) => convert(&values[..size])?,
        TypedBuffer::Float(values) => convert(&values[..size])?,
        TypedBuffer::Double(values) => convert(&values[..size])?,
    };
    NumericArray::from_shape_vec(shape, data)
}

/// Convert an untyped native-endian byte buffer, interpreted as `data_type`.
///
/// Trailing bytes that do not form a whole element are ignored. Aligned
/// input is viewed in place; unaligned input is read element by element.
/// Either way the only allocation is the array's own storage.
pub fn prepare_bytes(bytes: &[u8], data_type: DataType, shape: &[usize]) -> Result<NumericArray> {
    match data_type {
        DataType::Int => decode::<i32>(bytes, data_type, shape, TypedBuffer::Int),
        DataType::Float => decode::<f32>(bytes, data_type, shape, TypedBuffer::Float),
        DataType::Double => decode::<f64>(bytes, data_type, shape, TypedBuffer::Double),
    }
}

fn decode<'a, T>(
    bytes: &'a [u8],
    data_type: DataType,
    shape: &[usize],
    wrap: fn(&'a [T]) -> TypedBuffer<'a>,
) -> Result<NumericArray>
where
    T: Pod + AsPrimitive<f32>,
{
    let width = std::mem::size_of::<T>();
    let whole = &bytes[..bytes.len() - bytes.len() % width];
    if let Ok(values) = bytemuck::try_cast_slice::<u8, T>(whole) {
        return prepare_data(wrap(values), shape);
    }

    let size = check_source(whole.len() / width, data_type, shape)?;
    let mut data = alloc_exact(size)?;
    data.extend(
        whole
            .chunks_exact(width)
            .take(size)
            .map(|c| bytemuck::pod_read_unaligned::<T>(c).as_()),
    );
    NumericArray::from_shape_vec(shape, data)
}

/// Validate a source of `len` elements against `shape`; returns the element count.
fn check_source(len: usize, data_type: DataType, shape: &[usize]) -> Result<usize> {
    if len == 0 {
        return Err(MlcError::InvalidArgument("input buffer is empty".to_string()));
    }
    let size = Shape::validate(shape)?;
    if len < size {
        return Err(MlcError::InvalidArgument(format!(
            "shape {:?} needs {} elements but the {} buffer holds {}",
            shape, size, data_type, len
        )));
    }
    Ok(size)
}

fn convert<T: AsPrimitive<f32>>(values: &[T]) -> Result<Vec<f32>> {
    let mut data = alloc_exact(values.len())?;
    data.extend(values.iter().map(|v| v.as_()));
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn converts_each_type() {
        let ints = [1, -2, 3, -4, 5];
        let a = prepare_data(TypedBuffer::Int(&ints), &[5]).unwrap();
        assert_eq!(a.data(), &[1.0, -2.0, 3.0, -4.0, 5.0]);

        let floats = [1.0f32, -2.0, 3.0, 4.0, -5.0, 6.0];
        let m = prepare_data(TypedBuffer::Float(&floats), &[2, 3]).unwrap();
        assert_eq!(m.dims(), &[2, 3]);
        assert_eq!(m.data(), &floats);

        let doubles = [0.1f64, 1e10, -3.5];
        let d = prepare_data(TypedBuffer::Double(&doubles), &[3]).unwrap();
        assert_eq!(d.data(), &[0.1f32, 1e10f32, -3.5f32]);
    }

    #[test]
    fn data_is_sized_to_shape() {
        let values = [1.0f64; 10];
        let a = prepare_data(TypedBuffer::Double(&values), &[2, 2]).unwrap();
        assert_eq!(a.size(), 4);
        assert_eq!(a.data().len(), 4);
    }

    #[test]
    fn rejects_bad_arguments() {
        let empty: [i32; 0] = [];
        let err = prepare_data(TypedBuffer::Int(&empty), &[1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let values = [1, 2, 3];
        assert!(prepare_data(TypedBuffer::Int(&values), &[]).is_err());
        assert!(prepare_data(TypedBuffer::Int(&values), &[3, 0]).is_err());
        assert!(prepare_data(TypedBuffer::Int(&values), &[2, 2]).is_err());
    }

    #[test]
    fn bytes_are_read_native_endian() {
        let mut bytes = Vec::new();
        for v in [1.5f64, -2.0] {
            bytes.extend_from_slice(&v.to_ne_bytes());
        }
        let a = prepare_bytes(&bytes, DataType::Double, &[2]).unwrap();
        assert_eq!(a.data(), &[1.5, -2.0]);

        let mut bytes = Vec::new();
        for v in [7i32, -8, 9] {
            bytes.extend_from_slice(&v.to_ne_bytes());
        }
        bytes.push(0xff);
        let a = prepare_bytes(&bytes, DataType::Int, &[3]).unwrap();
        assert_eq!(a.data(), &[7.0, -8.0, 9.0]);
    }

    #[test]
    fn unaligned_bytes_decode_the_same() {
        let values = [1.25f32, -3.0, 8.5, 0.0];
        let mut bytes = vec![0u8];
        for v in values {
            bytes.extend_from_slice(&v.to_ne_bytes());
        }
        // Offset by one byte to take the unaligned read path.
        let a = prepare_bytes(&bytes[1..], DataType::Float, &[2, 2]).unwrap();
        assert_eq!(a.data(), &values);

        let mut bytes = vec![0u8; 3];
        for v in [2.5f64, -1.0, 4.0] {
            bytes.extend_from_slice(&v.to_ne_bytes());
        }
        let a = prepare_bytes(&bytes[3..], DataType::Double, &[3]).unwrap();
        assert_eq!(a.data(), &[2.5, -1.0, 4.0]);
    }

    #[test]
    fn short_or_empty_bytes_are_invalid() {
        let bytes = 7i32.to_ne_bytes();
        let err = prepare_bytes(&bytes, DataType::Int, &[2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = prepare_bytes(&bytes[1..], DataType::Int, &[1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = prepare_bytes(&bytes[..3], DataType::Float, &[1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn data_type_parsing() {
        assert_eq!("int".parse::<DataType>().unwrap(), DataType::Int);
        assert_eq!("F32".parse::<DataType>().unwrap(), DataType::Float);
        assert_eq!("double".parse::<DataType>().unwrap(), DataType::Double);
        assert!("u8".parse::<DataType>().is_err());
        assert_eq!(DataType::Double.element_size(), 8);
        assert_eq!(TypedBuffer::from(&[1.0f32][..]).data_type(), DataType::Float);
    }
}
