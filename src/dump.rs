//! Plain-text dumps of coefficients and responses.
//!
//! Each line holds comma-separated values so the output can be fed straight
//! into a plotting tool:
//!
//! - coefficients: `n, coeff`
//! - responses: `freq, value` or `freq, value, theoretical`, where `freq` is
//!   a fraction of the folding frequency

use crate::response::MagnitudeResponse;
use crate::synthesis::Coefficients;
use crate::{DesignError, DesignResult};
use std::io::Write;

/// Write one `n, coeff` line per tap.
pub fn write_coefficients<W: Write>(out: &mut W, coeffs: &Coefficients) -> DesignResult<()> {
    for (n, tap) in coeffs.taps().iter().enumerate() {
        writeln!(out, "{n}, {tap}")?;
    }
    Ok(())
}

/// Write one `freq, value[, theoretical]` line per response point.
///
/// # Errors
/// * `InvalidParameter` if `theoretical` differs in length from the response
/// * `Io` if writing fails
pub fn write_magnitude_response<W: Write>(
    out: &mut W,
    response: &MagnitudeResponse,
    theoretical: Option<&[f64]>,
) -> DesignResult<()> {
    if let Some(reference) = theoretical {
        if reference.len() != response.len() {
            return Err(DesignError::invalid_parameter(format!(
                "theoretical response has {} points, response has {}",
                reference.len(),
                response.len()
            )));
        }
    }

    for (index, value) in response.values().iter().enumerate() {
        let freq = response.frequency(index);
        match theoretical {
            Some(reference) => writeln!(out, "{freq}, {value}, {}", reference[index])?,
            None => writeln!(out, "{freq}, {value}")?,
        }
    }
    Ok(())
}
