//! Positional Encoding - Frequency Features for Coordinate Inputs
//!
//! Maps a low-dimensional input vector onto a bank of sine waves at
//! doubling frequencies, with the second half of each band phase-shifted
//! by pi/2 so it carries the cosine. Coordinate-fitting networks learn
//! high-frequency detail far faster from these features than from the raw
//! coordinates.
//!
//! @version 0.1.0
//! @author Gradix Development Team

use std::f32::consts::FRAC_PI_2;

use gradix_autograd::Value;
use gradix_tensor::{Error, Result, Vector};

// =============================================================================
// Positional Encoding
// =============================================================================

/// Encodes `input` into `FREQS` sine/cosine bands.
///
/// The output lays down `2 * FREQS` copies of the input; copy `2i` is
/// scaled by `2^i` and passed through sine, copy `2i + 1` additionally
/// carries a pi/2 phase offset, making it the matching cosine. The output
/// width is therefore `OUT = 2 * FREQS * IN`, supplied as a const argument
/// because the type system cannot derive it.
///
/// Gradients flow back through the encoding onto `input`.
///
/// # Errors
/// [`Error::ShapeMismatch`] when `OUT != 2 * FREQS * IN`.
pub fn positional_encoding<const FREQS: usize, const IN: usize, const OUT: usize>(
    input: &Value<Vector<IN>>,
) -> Result<Value<Vector<OUT>>> {
    if OUT != 2 * FREQS * IN {
        return Err(Error::shape_mismatch(&[2 * FREQS * IN], &[OUT]));
    }

    let mut scales = Vector::<OUT>::zeros();
    let mut offsets = Vector::<OUT>::zeros();
    for i in 0..FREQS {
        let scale = 2.0f32.powi(i as i32);
        for j in 2 * i * IN..2 * i * IN + IN {
            scales[j] = scale;
            scales[j + IN] = scale;
            offsets[j] = 0.0;
            offsets[j + IN] = FRAC_PI_2;
        }
    }

    let tiled = input.expand::<OUT>()?;
    Ok((tiled * scales + offsets).sin())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_must_match() {
        let v = Value::new(Vector::new([0.25, 0.75]));
        assert!(positional_encoding::<2, 2, 8>(&v).is_ok());
        assert!(positional_encoding::<2, 2, 6>(&v).is_err());
    }

    #[test]
    fn test_first_band_is_sin_and_cos() {
        let v = Value::new(Vector::new([0.5]));
        let encoded = positional_encoding::<1, 1, 2>(&v).unwrap().value();
        assert!((encoded[0] - 0.5f32.sin()).abs() < 1e-6);
        assert!((encoded[1] - 0.5f32.cos()).abs() < 1e-6);
    }

    #[test]
    fn test_frequencies_double() {
        let v = Value::new(Vector::new([0.3]));
        let encoded = positional_encoding::<3, 1, 6>(&v).unwrap().value();
        assert!((encoded[2] - 0.6f32.sin()).abs() < 1e-6);
        assert!((encoded[4] - 1.2f32.sin()).abs() < 1e-6);
    }

    #[test]
    fn test_gradients_reach_the_input() {
        let v = Value::new(Vector::new([0.25, 0.75]));
        let encoded = positional_encoding::<2, 2, 8>(&v).unwrap();
        encoded.sum().backward().unwrap();

        // d/dx sum over bands of sin(s*x + o) = sum of s*cos(s*x + o).
        let grad = v.grad().unwrap();
        for j in 0..2 {
            let x = v.value()[j];
            let expected = x.cos() + (x + FRAC_PI_2).cos()
                + 2.0 * (2.0 * x).cos()
                + 2.0 * (2.0 * x + FRAC_PI_2).cos();
            assert!((grad[j] - expected).abs() < 1e-4);
        }
    }
}
