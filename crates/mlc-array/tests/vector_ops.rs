//! Integration tests for the vector algebra engine.

use mlc_array::vector::{add, dot, scale, subtract};
use mlc_array::{prepare_data, ErrorKind, NumericArray, TypedBuffer};

fn floats(values: &[f32]) -> NumericArray {
    prepare_data(TypedBuffer::Float(values), &[values.len()]).unwrap()
}

// ---------------------------------------------------------------------------
// Worked example
// ---------------------------------------------------------------------------

#[test]
fn add_sub_dot_scale() {
    let a = floats(&[1.0, 2.0, 3.0]);
    let b = floats(&[4.0, 5.0, 6.0]);
    let mut result = floats(&[1.0, 2.0, 3.0]);

    add(&a, &b, &mut result).unwrap();
    assert_eq!(result.data(), &[5.0, 7.0, 9.0]);

    subtract(&a, &b, &mut result).unwrap();
    assert_eq!(result.data(), &[-3.0, -3.0, -3.0]);

    assert_eq!(dot(&a, &b).unwrap(), 32.0);

    scale(&a, 2.0, &mut result).unwrap();
    assert_eq!(result.data(), &[2.0, 4.0, 6.0]);
}

#[test]
fn operands_are_not_modified() {
    let a = floats(&[1.0, 2.0]);
    let b = floats(&[3.0, 4.0]);
    let mut result = NumericArray::zeros(&[2]).unwrap();
    add(&a, &b, &mut result).unwrap();
    assert_eq!(a.data(), &[1.0, 2.0]);
    assert_eq!(b.data(), &[3.0, 4.0]);
}

// ---------------------------------------------------------------------------
// Failure paths
// ---------------------------------------------------------------------------

#[test]
fn size_mismatch_never_touches_result() {
    let a = floats(&[1.0, 2.0, 3.0]);
    let b = floats(&[1.0, 2.0, 3.0, 4.0]);
    let mut result = floats(&[-7.0, -7.0, -7.0]);

    for err in [
        add(&a, &b, &mut result).unwrap_err(),
        subtract(&a, &b, &mut result).unwrap_err(),
        dot(&a, &b).unwrap_err(),
    ] {
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }
    assert_eq!(result.data(), &[-7.0, -7.0, -7.0]);

    let mut wrong = floats(&[-7.0, -7.0]);
    assert_eq!(
        scale(&a, 2.0, &mut wrong).unwrap_err().kind(),
        ErrorKind::ShapeMismatch
    );
    assert_eq!(wrong.data(), &[-7.0, -7.0]);
}

#[test]
fn invalid_operands_are_rejected() {
    let empty = NumericArray::default();
    let b = floats(&[4.0, 5.0, 6.0]);
    let mut result = floats(&[0.0, 0.0, 0.0]);

    assert_eq!(
        add(&empty, &b, &mut result).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(dot(&b, &empty).unwrap_err().kind(), ErrorKind::InvalidArgument);

    let mut released = NumericArray::zeros(&[3]).unwrap();
    released.release();
    assert_eq!(
        scale(&b, 1.0, &mut released).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(result.data(), &[0.0, 0.0, 0.0]);
}

#[test]
fn dot_result_of_negative_one_is_a_value() {
    let a = floats(&[2.0, 1.0]);
    let b = floats(&[-1.0, 1.0]);
    assert_eq!(dot(&a, &b).unwrap(), -1.0);
}
