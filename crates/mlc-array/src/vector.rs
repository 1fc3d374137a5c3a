//! Vector algebra over the flat element stream.
//!
//! Operands only need equal element counts; their shapes may differ.
//! Results are written into a caller-supplied array of the same size and
//! nothing is allocated. On any validation failure the destination is left
//! untouched.
use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::error::MlcError;
use crate::math::NumericArray;
use crate::Result;

/// `result[i] = a[i] + b[i]`
pub fn add(a: &NumericArray, b: &NumericArray, result: &mut NumericArray) -> Result<()> {
    add_with(a, b, result, &EngineConfig::default())
}

/// `result[i] = a[i] - b[i]`
pub fn subtract(a: &NumericArray, b: &NumericArray, result: &mut NumericArray) -> Result<()> {
    subtract_with(a, b, result, &EngineConfig::default())
}

/// `Σ a[i] * b[i]`, accumulated in `f64`.
pub fn dot(a: &NumericArray, b: &NumericArray) -> Result<f64> {
    dot_with(a, b, &EngineConfig::default())
}

/// `result[i] = k * a[i]`
pub fn scale(a: &NumericArray, k: f32, result: &mut NumericArray) -> Result<()> {
    scale_with(a, k, result, &EngineConfig::default())
}

pub fn add_with(
    a: &NumericArray,
    b: &NumericArray,
    result: &mut NumericArray,
    config: &EngineConfig,
) -> Result<()> {
    check_operands(&[a, b, &*result])?;
    zip_into(a.data(), b.data(), result.data_mut(), config, |x, y| x + y);
    Ok(())
}

pub fn subtract_with(
    a: &NumericArray,
    b: &NumericArray,
    result: &mut NumericArray,
    config: &EngineConfig,
) -> Result<()> {
    check_operands(&[a, b, &*result])?;
    zip_into(a.data(), b.data(), result.data_mut(), config, |x, y| x - y);
    Ok(())
}

pub fn dot_with(a: &NumericArray, b: &NumericArray, config: &EngineConfig) -> Result<f64> {
    check_operands(&[a, b])?;
    if config.use_parallel(a.size()) {
        Ok(a.data()
            .par_chunks(EngineConfig::PARALLEL_CHUNK)
            .zip(b.data().par_chunks(EngineConfig::PARALLEL_CHUNK))
            .map(|(x, y)| dot_scalar(x, y))
            .sum::<f64>())
    } else {
        Ok(dot_scalar(a.data(), b.data()))
    }
}

pub fn scale_with(
    a: &NumericArray,
    k: f32,
    result: &mut NumericArray,
    config: &EngineConfig,
) -> Result<()> {
    check_operands(&[a, &*result])?;
    let src = a.data();
    let dst = result.data_mut();
    if config.use_parallel(src.len()) {
        dst.par_chunks_mut(EngineConfig::PARALLEL_CHUNK)
            .zip(src.par_chunks(EngineConfig::PARALLEL_CHUNK))
            .for_each(|(out, x)| {
                out.iter_mut().zip(x).for_each(|(o, &x)| *o = k * x);
            });
    } else {
        dst.iter_mut().zip(src).for_each(|(o, &x)| *o = k * x);
    }
    Ok(())
}

/// Every operand must be usable and all must share the first one's size.
fn check_operands(operands: &[&NumericArray]) -> Result<()> {
    for operand in operands {
        operand.check_usable()?;
    }
    let expected = operands[0].size();
    for operand in &operands[1..] {
        if operand.size() != expected {
            return Err(MlcError::ShapeMismatch {
                expected,
                found: operand.size(),
            });
        }
    }
    Ok(())
}

fn zip_into<F>(lhs: &[f32], rhs: &[f32], out: &mut [f32], config: &EngineConfig, f: F)
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    if config.use_parallel(out.len()) {
        out.par_chunks_mut(EngineConfig::PARALLEL_CHUNK)
            .zip(lhs.par_chunks(EngineConfig::PARALLEL_CHUNK))
            .zip(rhs.par_chunks(EngineConfig::PARALLEL_CHUNK))
            .for_each(|((o, a), b)| {
                for ((o, &a), &b) in o.iter_mut().zip(a).zip(b) {
                    *o = f(a, b);
                }
            });
    } else {
        for ((o, &a), &b) in out.iter_mut().zip(lhs).zip(rhs) {
            *o = f(a, b);
        }
    }
}

fn dot_scalar(lhs: &[f32], rhs: &[f32]) -> f64 {
    lhs.iter()
        .zip(rhs.iter())
        .map(|(&a, &b)| a as f64 * b as f64)
        .sum()
}
