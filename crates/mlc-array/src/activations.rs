//! Activation functions applied in place to a `NumericArray`.
//!
//! All of them are shape preserving and allocation free. Everything except
//! softmax is a flat elementwise map. Softmax normalizes each contiguous run
//! of `last extent` elements independently, so a `[batch, classes]` array
//! gets one distribution per row and a rank-1 array is a single group.
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::MlcError;
use crate::math::NumericArray;
use crate::Result;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Sigmoid,
    Tanh,
    LeakyRelu { alpha: f32 },
    Swish,
    Softmax,
}

impl Activation {
    pub const DEFAULT_LEAKY_ALPHA: f32 = 0.01;

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
            Activation::LeakyRelu { .. } => "leaky_relu",
            Activation::Swish => "swish",
            Activation::Softmax => "softmax",
        }
    }

    /// Apply in place. Fails without touching the data if `array` is not
    /// usable.
    pub fn apply(&self, array: &mut NumericArray, config: &EngineConfig) -> Result<()> {
        array.check_usable()?;
        let parallel = config.use_parallel(array.size());
        match *self {
            Activation::Relu => map_in_place(array.data_mut(), parallel, relu_scalar),
            Activation::Sigmoid => map_in_place(array.data_mut(), parallel, sigmoid_scalar),
            Activation::Tanh => map_in_place(array.data_mut(), parallel, f32::tanh),
            Activation::LeakyRelu { alpha } => {
                map_in_place(array.data_mut(), parallel, move |x| leaky_relu_scalar(x, alpha))
            }
            Activation::Swish => map_in_place(array.data_mut(), parallel, |x| x * sigmoid_scalar(x)),
            Activation::Softmax => {
                let group = array.shape().last().ok_or_else(|| {
                    MlcError::InvalidArgument("softmax needs at least one axis".to_string())
                })?;
                softmax_groups(array.data_mut(), group, parallel);
            }
        }
        Ok(())
    }
}

impl FromStr for Activation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relu" => Ok(Activation::Relu),
            "sigmoid" => Ok(Activation::Sigmoid),
            "tanh" => Ok(Activation::Tanh),
            "leaky_relu" | "leakyrelu" => Ok(Activation::LeakyRelu {
                alpha: Activation::DEFAULT_LEAKY_ALPHA,
            }),
            "swish" | "silu" => Ok(Activation::Swish),
            "softmax" => Ok(Activation::Softmax),
            _ => Err(format!("Unknown activation: {}", s)),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::LeakyRelu { alpha } => write!(f, "leaky_relu(alpha={})", alpha),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// `x > 0 ? x : 0`
pub fn relu(array: &mut NumericArray) -> Result<()> {
    Activation::Relu.apply(array, &EngineConfig::default())
}

/// `1 / (1 + e^-x)`
pub fn sigmoid(array: &mut NumericArray) -> Result<()> {
    Activation::Sigmoid.apply(array, &EngineConfig::default())
}

/// Hyperbolic tangent, `(e^x - e^-x) / (e^x + e^-x)`.
pub fn tanh(array: &mut NumericArray) -> Result<()> {
    Activation::Tanh.apply(array, &EngineConfig::default())
}

/// `x > 0 ? x : alpha * x`
pub fn leaky_relu(array: &mut NumericArray, alpha: f32) -> Result<()> {
    Activation::LeakyRelu { alpha }.apply(array, &EngineConfig::default())
}

/// `x * sigmoid(x)`
pub fn swish(array: &mut NumericArray) -> Result<()> {
    Activation::Swish.apply(array, &EngineConfig::default())
}

/// Numerically stable softmax along the last axis.
///
/// A group containing `+inf` splits its mass evenly over those entries and
/// zeroes the rest. Otherwise a group containing `NaN`, or made only of
/// `-inf`, comes out as all `NaN`.
pub fn softmax(array: &mut NumericArray) -> Result<()> {
    Activation::Softmax.apply(array, &EngineConfig::default())
}

#[inline]
fn relu_scalar(x: f32) -> f32 {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}

#[inline]
fn sigmoid_scalar(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[inline]
fn leaky_relu_scalar(x: f32, alpha: f32) -> f32 {
    if x > 0.0 {
        x
    } else {
        alpha * x
    }
}

fn map_in_place<F>(data: &mut [f32], parallel: bool, f: F)
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    if parallel {
        data.par_chunks_mut(EngineConfig::PARALLEL_CHUNK)
            .for_each(|chunk| chunk.iter_mut().for_each(|v| *v = f(*v)));
    } else {
        data.iter_mut().for_each(|v| *v = f(*v));
    }
}

/// Softmax over consecutive groups of `group` elements.
///
/// Groups are independent and may run in parallel; each group's
/// max / exp-sum / normalize passes run in order on one thread.
fn softmax_groups(data: &mut [f32], group: usize, parallel: bool) {
    if parallel {
        data.par_chunks_mut(group).for_each(softmax_group);
    } else {
        data.chunks_mut(group).for_each(softmax_group);
    }
}

fn softmax_group(group: &mut [f32]) {
    let max = group.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if max == f32::INFINITY {
        // Limit of exp(x - max): mass is shared by the +inf entries.
        let hits = group.iter().filter(|v| **v == f32::INFINITY).count() as f32;
        for v in group.iter_mut() {
            *v = if *v == f32::INFINITY { 1.0 / hits } else { 0.0 };
        }
        return;
    }

    let mut sum = 0.0f32;
    for v in group.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }

    for v in group.iter_mut() {
        *v /= sum;
    }
}
