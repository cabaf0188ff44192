//! Linear maps between the 16-bit raw values carried on the wire and
//! physical units (rad, rad/s, N.m, gains).
//!
//! The firmware spreads each physical range evenly over `0..=65535`:
//!
//! ```text
//! physical = raw * range / 65535 + min
//! raw      = round((physical - min) * 65535 / range), clamped to 0..=65535
//! ```
use crate::error::ScalingError;
use core::f32::consts::PI;
use core::marker::PhantomData;

const RAW_SPAN: f32 = u16::MAX as f32;

/// Map a raw wire value onto `[min, min + range]`.
pub fn decode_linear(raw: u16, min: f32, range: f32) -> Result<f32, ScalingError> {
    check_range(min, range)?;
    let value = raw as f32 * range / RAW_SPAN + min;
    if !value.is_finite() {
        return Err(ScalingError::InvalidNumericValue);
    }
    Ok(value)
}

/// Inverse of [`decode_linear`]. Out-of-range values saturate at the range ends.
pub fn encode_linear(value: f32, min: f32, range: f32) -> Result<u16, ScalingError> {
    check_range(min, range)?;
    if !value.is_finite() {
        return Err(ScalingError::InvalidNumericValue);
    }

    let scaled = (value - min) * RAW_SPAN / range;
    if scaled <= 0.0 {
        return Ok(0);
    }
    if scaled >= RAW_SPAN {
        return Ok(u16::MAX);
    }
    // Round half up; `scaled` is positive here.
    Ok((scaled + 0.5) as u16)
}

fn check_range(min: f32, range: f32) -> Result<(), ScalingError> {
    if !min.is_finite() || !range.is_finite() || range == 0.0 {
        return Err(ScalingError::InvalidNumericValue);
    }
    Ok(())
}

/// Temperature fields carry tenths of a degree Celsius.
#[inline]
pub fn decode_temperature(raw: u16) -> f32 {
    raw as f32 / 10.0
}

//==================================================================================RANGES

/// Physical range of a quantity transmitted as a 16-bit raw value.
pub trait FloatRange {
    const MIN: f32;
    const MAX: f32;

    #[inline]
    fn range() -> f32 {
        Self::MAX - Self::MIN
    }
}

/// Mechanical angle, rad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Angle;
impl FloatRange for Angle {
    const MIN: f32 = -4.0 * PI;
    const MAX: f32 = 4.0 * PI;
}

/// Angular velocity, rad/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed;
impl FloatRange for Speed {
    const MIN: f32 = -30.0;
    const MAX: f32 = 30.0;
}

/// Torque, N.m.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Torque;
impl FloatRange for Torque {
    const MIN: f32 = -12.0;
    const MAX: f32 = 12.0;
}

/// Position gain of the operation-control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kp;
impl FloatRange for Kp {
    const MIN: f32 = 0.0;
    const MAX: f32 = 500.0;
}

/// Damping gain of the operation-control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kd;
impl FloatRange for Kd {
    const MIN: f32 = 0.0;
    const MAX: f32 = 5.0;
}

/// A physical value checked against its range `R`, together with its raw encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangedValue<R: FloatRange> {
    value: f32,
    raw: u16,
    _range: PhantomData<R>,
}

impl<R: FloatRange> RangedValue<R> {
    /// Accepts values inside `[R::MIN, R::MAX]` only.
    pub fn new(value: f32) -> Option<Self> {
        if !value.is_finite() || value < R::MIN || value > R::MAX {
            return None;
        }
        let raw = encode_linear(value, R::MIN, R::range()).ok()?;
        Some(Self {
            value,
            raw,
            _range: PhantomData,
        })
    }

    /// Rebuild from a raw wire value, through [`decode_linear`].
    pub fn from_raw(raw: u16) -> Result<Self, ScalingError> {
        let value = decode_linear(raw, R::MIN, R::range())?;
        Ok(Self {
            value,
            raw,
            _range: PhantomData,
        })
    }

    /// Physical value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Raw 16-bit encoding.
    pub fn raw(&self) -> u16 {
        self.raw
    }
}
