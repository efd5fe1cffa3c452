//! Frequency-sampling filter specification.
//!
//! A [`FilterSpec`] holds the desired magnitude response at the `N/2 + 1`
//! uniformly spaced frequency samples `2*pi*k/N` of the lower half spectrum,
//! together with the band geometry and symmetry type that decide how those
//! samples are turned into coefficients. Passband samples are 1.0, stopband
//! samples 0.0, and the transition samples in between are the free
//! parameters an optimizer adjusts in place.

use crate::types::{BandConfiguration, BandEdges, CutoffKind, CutoffSpec, SymmetryType};
use crate::{DesignError, DesignResult};
use serde::Serialize;

/// Desired half-spectrum magnitude samples plus band geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    num_taps: usize,
    band_config: BandConfiguration,
    symmetry: SymmetryType,
    edges: BandEdges,
    desired_magnitude: Vec<f64>,
}

impl FilterSpec {
    /// Create a new specification with passbands at 1.0 and stopbands at 0.0.
    ///
    /// Transition samples start at 0.0 until set through one of the
    /// `set_trans_*` methods.
    ///
    /// # Errors
    /// * `ParityMismatch` if `num_taps` contradicts `symmetry`
    /// * `InvalidConfig` if `num_taps < 3` or the band edges are out of order,
    ///   out of range, or (for band-pass/band-stop) the two transition bands
    ///   differ in width
    pub fn new(
        num_taps: usize,
        band_config: BandConfiguration,
        symmetry: SymmetryType,
        edges: BandEdges,
    ) -> DesignResult<Self> {
        symmetry.check_num_taps(num_taps)?;
        if num_taps < 3 {
            return Err(DesignError::invalid_config(format!(
                "at least 3 taps are required, got {num_taps}"
            )));
        }

        let fold_index = fold_index(num_taps);
        validate_edges(band_config, edges, fold_index)?;

        let low = band_config.lowest_band_level();
        let high = 1.0 - low;
        let mut desired_magnitude = vec![0.0; num_taps / 2 + 1];
        desired_magnitude[..=edges.n1].fill(low);
        if band_config.uses_four_edges() {
            desired_magnitude[edges.n2..=edges.n3].fill(high);
            desired_magnitude[edges.n4..].fill(low);
        } else {
            desired_magnitude[edges.n2..].fill(high);
        }

        Ok(Self {
            num_taps,
            band_config,
            symmetry,
            edges,
            desired_magnitude,
        })
    }

    /// Create a low-pass specification whose passband edge is placed from a cutoff frequency.
    ///
    /// The last passband sample `n1` is chosen so that, without transition
    /// samples, the response crosses the requested level near the cutoff;
    /// `n2 = n1 + 1 + num_trans_samps`.
    ///
    /// # Errors
    /// * `InvalidParameter` if more than two transition samples are requested
    ///   or the cutoff lies below the first sample
    /// * any error of [`FilterSpec::new`]
    pub fn lowpass_from_cutoff(
        num_taps: usize,
        symmetry: SymmetryType,
        cutoff: CutoffSpec,
        num_trans_samps: usize,
    ) -> DesignResult<(Self, CutoffPlacement)> {
        if num_trans_samps > 2 {
            return Err(DesignError::invalid_parameter(format!(
                "0, 1 or 2 transition samples are supported, got {num_trans_samps}"
            )));
        }
        let placement = CutoffPlacement::for_lowpass(num_taps, cutoff)?;
        let edges = BandEdges::two_band(placement.n1, placement.n1 + 1 + num_trans_samps);
        let spec = Self::new(num_taps, BandConfiguration::Lowpass, symmetry, edges)?;
        Ok((spec, placement))
    }

    /// Number of filter taps.
    pub const fn num_taps(&self) -> usize {
        self.num_taps
    }

    /// Band configuration.
    pub const fn band_config(&self) -> BandConfiguration {
        self.band_config
    }

    /// Symmetry type.
    pub const fn symmetry(&self) -> SymmetryType {
        self.symmetry
    }

    /// Band-edge sample indices.
    pub const fn edges(&self) -> BandEdges {
        self.edges
    }

    /// Index of the last sample below the folding frequency.
    pub const fn fold_index(&self) -> usize {
        fold_index(self.num_taps)
    }

    /// Number of transition samples between `n1` and `n2`.
    pub const fn num_trans_samps(&self) -> usize {
        self.edges.n2 - self.edges.n1 - 1
    }

    /// Desired magnitude samples `0..=num_taps/2`.
    ///
    /// For even tap counts the last entry is the Nyquist sample, which only
    /// the odd-symmetric even-length synthesis formula reads.
    pub fn desired_magnitude(&self) -> &[f64] {
        &self.desired_magnitude
    }

    /// Desired magnitude at sample `index`, if it exists.
    pub fn mag_resp_samp(&self, index: usize) -> Option<f64> {
        self.desired_magnitude.get(index).copied()
    }

    /// Overwrite a single desired magnitude sample.
    pub fn set_mag_resp_samp(&mut self, index: usize, value: f64) -> DesignResult<()> {
        let len = self.desired_magnitude.len();
        let slot = self.desired_magnitude.get_mut(index).ok_or_else(|| {
            DesignError::invalid_parameter(format!(
                "sample index {index} out of range for {len} desired magnitude samples"
            ))
        })?;
        *slot = value;
        Ok(())
    }

    /// Write a single transition value into the canonical slot(s) of the band type.
    ///
    /// * Lowpass: `[n2-1]`
    /// * Highpass: `[n1+1]`
    /// * Bandpass: `[n1+1]` and `[n4-1]`
    /// * Bandstop: `[n2-1]` and `[n3+1]`
    ///
    /// # Errors
    /// `InvalidParameter` if the spec has no transition samples; those slots
    /// belong to a passband or stopband.
    pub fn set_trans_scalar(&mut self, value: f64) -> DesignResult<()> {
        if self.num_trans_samps() == 0 {
            return Err(DesignError::invalid_parameter(format!(
                "{} filter has no transition sample to set",
                self.band_config
            )));
        }
        let BandEdges { n1, n2, n3, n4 } = self.edges;
        let samples = &mut self.desired_magnitude;
        match self.band_config {
            BandConfiguration::Lowpass => samples[n2 - 1] = value,
            BandConfiguration::Highpass => samples[n1 + 1] = value,
            BandConfiguration::Bandpass => {
                samples[n1 + 1] = value;
                samples[n4 - 1] = value;
            }
            BandConfiguration::Bandstop => {
                samples[n2 - 1] = value;
                samples[n3 + 1] = value;
            }
        }
        Ok(())
    }

    /// Write the point `origins + rho * slopes` of a transition line.
    ///
    /// Slot `k` of the line is written to the `k`-th transition sample counted
    /// from the stopband side for low-pass/band-stop and from `n1` upward for
    /// high-pass/band-pass; the upper transition band of band-pass/band-stop
    /// filters mirrors the lower one.
    ///
    /// # Errors
    /// `InvalidParameter` if the line does not have one slot per transition sample.
    pub fn set_trans_line(&mut self, line: &TransitionLine, rho: f64) -> DesignResult<()> {
        self.check_slot_count(line.num_slots())?;
        for slot in 0..line.num_slots() {
            self.write_slot(slot, line.value(slot, rho));
        }
        Ok(())
    }

    /// Write explicit values for every transition slot.
    ///
    /// # Errors
    /// `InvalidParameter` if `values` does not hold one value per transition sample.
    pub fn set_transition_values(&mut self, values: &[f64]) -> DesignResult<()> {
        self.check_slot_count(values.len())?;
        for (slot, &value) in values.iter().enumerate() {
            self.write_slot(slot, value);
        }
        Ok(())
    }

    /// Sample index written by transition slot `slot` (the primary index, not the mirror).
    pub fn transition_index(&self, slot: usize) -> usize {
        let BandEdges { n1, n2, .. } = self.edges;
        match self.band_config {
            BandConfiguration::Lowpass | BandConfiguration::Bandstop => n2 - 1 - slot,
            BandConfiguration::Highpass | BandConfiguration::Bandpass => n1 + 1 + slot,
        }
    }

    /// Current values of the transition slots, in slot order.
    pub fn transition_values(&self) -> Vec<f64> {
        (0..self.num_trans_samps())
            .map(|slot| self.desired_magnitude[self.transition_index(slot)])
            .collect()
    }

    fn write_slot(&mut self, slot: usize, value: f64) {
        let BandEdges { n1, n2, n3, n4 } = self.edges;
        let samples = &mut self.desired_magnitude;
        match self.band_config {
            BandConfiguration::Lowpass => samples[n2 - 1 - slot] = value,
            BandConfiguration::Highpass => samples[n1 + 1 + slot] = value,
            BandConfiguration::Bandpass => {
                samples[n1 + 1 + slot] = value;
                samples[n4 - 1 - slot] = value;
            }
            BandConfiguration::Bandstop => {
                samples[n2 - 1 - slot] = value;
                samples[n3 + 1 + slot] = value;
            }
        }
    }

    fn check_slot_count(&self, provided: usize) -> DesignResult<()> {
        let expected = self.num_trans_samps();
        if provided == expected {
            Ok(())
        } else {
            Err(DesignError::invalid_parameter(format!(
                "{} filter has {expected} transition samples, got {provided} values",
                self.band_config
            )))
        }
    }
}

const fn fold_index(num_taps: usize) -> usize {
    if num_taps % 2 == 0 {
        num_taps / 2 - 1
    } else {
        (num_taps - 1) / 2
    }
}

fn validate_edges(band: BandConfiguration, edges: BandEdges, fold: usize) -> DesignResult<()> {
    let BandEdges { n1, n2, n3, n4 } = edges;
    if n1 >= n2 {
        return Err(DesignError::invalid_config(format!(
            "n1 ({n1}) must be below n2 ({n2})"
        )));
    }
    if !band.uses_four_edges() {
        if n2 > fold {
            return Err(DesignError::invalid_config(format!(
                "n2 ({n2}) exceeds the fold index ({fold})"
            )));
        }
        return Ok(());
    }

    if n2 > n3 || n3 >= n4 || n4 > fold {
        return Err(DesignError::invalid_config(format!(
            "{band} edges must satisfy n2 <= n3 < n4 <= {fold}, got n2={n2}, n3={n3}, n4={n4}"
        )));
    }
    if n4 - n3 != n2 - n1 {
        return Err(DesignError::invalid_config(format!(
            "{band} transition bands differ in width: n2-n1 = {}, n4-n3 = {}",
            n2 - n1,
            n4 - n3
        )));
    }
    Ok(())
}

/// Passband-edge placement derived from a cutoff frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CutoffPlacement {
    /// Last passband sample
    pub n1: usize,
    /// Cutoff (fraction of the folding frequency) predicted for a design
    /// without transition samples
    pub predicted_cutoff: f64,
}

impl CutoffPlacement {
    /// Place the last passband sample of a low-pass filter.
    ///
    /// Odd lengths put the half-amplitude point half a sample past `n1` and
    /// the half-power point 0.293 samples past it; even lengths put them at
    /// `n1` and 0.207 samples before it.
    pub fn for_lowpass(num_taps: usize, cutoff: CutoffSpec) -> DesignResult<Self> {
        let taps = num_taps as f64;
        let scaled = taps * cutoff.fraction / 2.0;
        let (raw_n1, offset) = match (num_taps % 2 == 1, cutoff.kind) {
            (true, CutoffKind::HalfAmplitude) => ((scaled - 0.5).floor(), 0.5),
            (true, CutoffKind::HalfPower) => ((scaled - 0.293).floor(), 0.293),
            (false, CutoffKind::HalfAmplitude) => (scaled.floor(), 0.0),
            (false, CutoffKind::HalfPower) => ((scaled + 0.207).floor(), -0.207),
        };
        if !raw_n1.is_finite() || raw_n1 < 0.0 {
            return Err(DesignError::invalid_parameter(format!(
                "cutoff {} * pi is below the first frequency sample of a {num_taps}-tap filter",
                cutoff.fraction
            )));
        }
        Ok(Self {
            n1: raw_n1 as usize,
            predicted_cutoff: 2.0 * (raw_n1 + offset) / taps,
        })
    }
}

/// A line through transition-sample space.
///
/// Slot `k` takes the value `origins[k] + rho * slopes[k]`, which turns a
/// search over several transition samples into a family of one-parameter
/// searches over `rho`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionLine {
    origins: Vec<f64>,
    slopes: Vec<f64>,
}

impl TransitionLine {
    /// Create a line from per-slot origins and slopes.
    ///
    /// # Errors
    /// `InvalidParameter` if the two vectors are empty or differ in length.
    pub fn new(origins: Vec<f64>, slopes: Vec<f64>) -> DesignResult<Self> {
        if origins.is_empty() || origins.len() != slopes.len() {
            return Err(DesignError::invalid_parameter(format!(
                "transition line needs matching non-empty origins and slopes, got {} and {}",
                origins.len(),
                slopes.len()
            )));
        }
        Ok(Self { origins, slopes })
    }

    /// Number of slots on the line.
    pub fn num_slots(&self) -> usize {
        self.origins.len()
    }

    /// Value of slot `slot` at parameter `rho`.
    ///
    /// # Panics
    /// If `slot >= self.num_slots()`.
    pub fn value(&self, slot: usize, rho: f64) -> f64 {
        self.origins[slot] + rho * self.slopes[slot]
    }

    /// Per-slot origins.
    pub fn origins(&self) -> &[f64] {
        &self.origins
    }

    /// Per-slot slopes.
    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }

    /// Replace the origin and slope of one slot.
    ///
    /// # Panics
    /// If `slot >= self.num_slots()`.
    pub fn set_slot(&mut self, slot: usize, origin: f64, slope: f64) {
        self.origins[slot] = origin;
        self.slopes[slot] = slope;
    }

    /// Range of `rho` for which every slot value stays within `[0, 1]`.
    ///
    /// Returns `None` when no such `rho` exists.
    pub fn unit_interval_domain(&self) -> Option<(f64, f64)> {
        let mut lo = f64::NEG_INFINITY;
        let mut hi = f64::INFINITY;
        for (&origin, &slope) in self.origins.iter().zip(&self.slopes) {
            if slope == 0.0 {
                if !(0.0..=1.0).contains(&origin) {
                    return None;
                }
                continue;
            }
            let at_zero = -origin / slope;
            let at_one = (1.0 - origin) / slope;
            lo = lo.max(at_zero.min(at_one));
            hi = hi.min(at_zero.max(at_one));
        }
        (lo.is_finite() && hi.is_finite() && lo <= hi).then_some((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lowpass_21() -> FilterSpec {
        FilterSpec::new(
            21,
            BandConfiguration::Lowpass,
            SymmetryType::EvenSymOddLen,
            BandEdges::two_band(6, 8),
        )
        .unwrap()
    }

    #[test]
    fn test_lowpass_layout() {
        let spec = lowpass_21();
        assert_eq!(spec.fold_index(), 10);
        assert_eq!(spec.num_trans_samps(), 1);
        assert_eq!(spec.desired_magnitude().len(), 11);
        assert!(spec.desired_magnitude()[..=6].iter().all(|&v| v == 1.0));
        assert_eq!(spec.mag_resp_samp(7), Some(0.0));
        assert!(spec.desired_magnitude()[8..].iter().all(|&v| v == 0.0));
        assert_eq!(spec.mag_resp_samp(11), None);
    }

    #[test]
    fn test_bandstop_layout() {
        let spec = FilterSpec::new(
            31,
            BandConfiguration::Bandstop,
            SymmetryType::EvenSymOddLen,
            BandEdges::four_band(3, 5, 8, 10),
        )
        .unwrap();
        let h = spec.desired_magnitude();
        assert_eq!(h.len(), 16);
        assert!(h[..=3].iter().all(|&v| v == 1.0));
        assert!(h[5..=8].iter().all(|&v| v == 0.0));
        assert!(h[10..].iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_even_length_has_nyquist_slot() {
        let spec = FilterSpec::new(
            20,
            BandConfiguration::Highpass,
            SymmetryType::OddSymEvenLen,
            BandEdges::two_band(4, 6),
        )
        .unwrap();
        assert_eq!(spec.fold_index(), 9);
        assert_eq!(spec.desired_magnitude().len(), 11);
        assert_eq!(spec.mag_resp_samp(10), Some(1.0));
    }

    #[test]
    fn test_construction_errors() {
        let parity = FilterSpec::new(
            20,
            BandConfiguration::Lowpass,
            SymmetryType::EvenSymOddLen,
            BandEdges::two_band(6, 8),
        );
        assert!(matches!(parity, Err(DesignError::ParityMismatch { .. })));

        let order = FilterSpec::new(
            21,
            BandConfiguration::Lowpass,
            SymmetryType::EvenSymOddLen,
            BandEdges::two_band(8, 8),
        );
        assert!(matches!(order, Err(DesignError::InvalidConfig(_))));

        let range = FilterSpec::new(
            21,
            BandConfiguration::Lowpass,
            SymmetryType::EvenSymOddLen,
            BandEdges::two_band(6, 11),
        );
        assert!(matches!(range, Err(DesignError::InvalidConfig(_))));

        let uneven = FilterSpec::new(
            31,
            BandConfiguration::Bandpass,
            SymmetryType::EvenSymOddLen,
            BandEdges::four_band(3, 5, 8, 11),
        );
        assert!(matches!(uneven, Err(DesignError::InvalidConfig(_))));
    }

    #[test]
    #[should_panic]
    fn test_transition_line_value_out_of_range_slot() {
        let line = TransitionLine::new(vec![0.0, 0.5], vec![1.0, 0.0]).unwrap();
        let _ = line.value(2, 0.5);
    }

    #[test]
    fn test_set_trans_scalar_without_transition_band() {
        // n2 = n1 + 1 leaves no transition sample; [n2-1] is the passband edge
        let mut spec = FilterSpec::new(
            21,
            BandConfiguration::Lowpass,
            SymmetryType::EvenSymOddLen,
            BandEdges::two_band(7, 8),
        )
        .unwrap();
        let before = spec.desired_magnitude().to_vec();
        assert!(matches!(
            spec.set_trans_scalar(0.3),
            Err(DesignError::InvalidParameter(_))
        ));
        assert_eq!(spec.desired_magnitude(), before.as_slice());
        assert_eq!(spec.mag_resp_samp(7), Some(1.0));
    }

    #[test]
    fn test_set_trans_scalar_touches_only_own_slots() {
        let cases = [
            (BandConfiguration::Lowpass, BandEdges::two_band(4, 6), vec![5]),
            (BandConfiguration::Highpass, BandEdges::two_band(4, 6), vec![5]),
            (BandConfiguration::Bandpass, BandEdges::four_band(3, 5, 9, 11), vec![4, 10]),
            (BandConfiguration::Bandstop, BandEdges::four_band(3, 5, 9, 11), vec![4, 10]),
        ];
        for (band, edges, slots) in cases {
            let mut spec =
                FilterSpec::new(31, band, SymmetryType::EvenSymOddLen, edges).unwrap();
            let before = spec.desired_magnitude().to_vec();
            spec.set_trans_scalar(0.42).unwrap();
            for (index, (&old, &new)) in before.iter().zip(spec.desired_magnitude()).enumerate() {
                if slots.contains(&index) {
                    assert_eq!(new, 0.42, "{band}: slot {index} not written");
                } else {
                    assert_eq!(new, old, "{band}: unexpected write at {index}");
                }
            }
        }
    }

    #[test]
    fn test_set_trans_line_lowpass_slots() {
        let mut spec = FilterSpec::new(
            21,
            BandConfiguration::Lowpass,
            SymmetryType::EvenSymOddLen,
            BandEdges::two_band(5, 8),
        )
        .unwrap();
        let line = TransitionLine::new(vec![0.0, 0.6], vec![1.0, 0.0]).unwrap();
        spec.set_trans_line(&line, 0.25).unwrap();
        assert_eq!(spec.mag_resp_samp(7), Some(0.25));
        assert_eq!(spec.mag_resp_samp(6), Some(0.6));
        assert_eq!(spec.transition_values(), vec![0.25, 0.6]);
    }

    #[test]
    fn test_set_trans_line_mirrors_bandpass() {
        let mut spec = FilterSpec::new(
            31,
            BandConfiguration::Bandpass,
            SymmetryType::EvenSymOddLen,
            BandEdges::four_band(3, 6, 9, 12),
        )
        .unwrap();
        let line = TransitionLine::new(vec![0.1, 0.2], vec![0.5, 0.5]).unwrap();
        spec.set_trans_line(&line, 1.0).unwrap();
        let h = spec.desired_magnitude();
        assert_approx_eq!(h[4], 0.6, 1e-12);
        assert_approx_eq!(h[5], 0.7, 1e-12);
        assert_approx_eq!(h[11], 0.6, 1e-12);
        assert_approx_eq!(h[10], 0.7, 1e-12);
    }

    #[test]
    fn test_set_trans_line_rejects_wrong_slot_count() {
        let mut spec = lowpass_21();
        let line = TransitionLine::new(vec![0.0, 1.0], vec![1.0, 0.0]).unwrap();
        assert!(matches!(
            spec.set_trans_line(&line, 0.5),
            Err(DesignError::InvalidParameter(_))
        ));
        assert!(spec.set_transition_values(&[0.3]).is_ok());
        assert_eq!(spec.mag_resp_samp(7), Some(0.3));
    }

    #[test]
    fn test_set_mag_resp_samp_bounds() {
        let mut spec = lowpass_21();
        assert!(spec.set_mag_resp_samp(10, 0.1).is_ok());
        assert!(spec.set_mag_resp_samp(11, 0.1).is_err());
    }

    #[test]
    fn test_unit_interval_domain() {
        let line = TransitionLine::new(vec![0.0, -0.2], vec![1.0, 2.0]).unwrap();
        let (lo, hi) = line.unit_interval_domain().unwrap();
        assert_approx_eq!(lo, 0.1, 1e-12);
        assert_approx_eq!(hi, 0.6, 1e-12);

        let falling = TransitionLine::new(vec![0.0, 1.5], vec![1.0, -2.0]).unwrap();
        let (lo, hi) = falling.unit_interval_domain().unwrap();
        assert_approx_eq!(lo, 0.25, 1e-12);
        assert_approx_eq!(hi, 0.75, 1e-12);

        let outside = TransitionLine::new(vec![0.0, 2.0], vec![1.0, 0.0]).unwrap();
        assert!(outside.unit_interval_domain().is_none());
    }

    #[test]
    fn test_lowpass_from_cutoff() {
        let cutoff = CutoffSpec::normalized(0.5, CutoffKind::HalfAmplitude);
        let (spec, placement) =
            FilterSpec::lowpass_from_cutoff(21, SymmetryType::EvenSymOddLen, cutoff, 1).unwrap();
        // floor(21 * 0.5 / 2 - 0.5) = floor(4.75) = 4
        assert_eq!(placement.n1, 4);
        assert_approx_eq!(placement.predicted_cutoff, 2.0 * 4.5 / 21.0, 1e-12);
        assert_eq!(spec.edges(), BandEdges::two_band(4, 6));

        let half_power = CutoffSpec::normalized(0.5, CutoffKind::HalfPower);
        let placement = CutoffPlacement::for_lowpass(20, half_power).unwrap();
        // floor(20 * 0.5 / 2 + 0.207) = floor(5.207) = 5
        assert_eq!(placement.n1, 5);
        assert_approx_eq!(placement.predicted_cutoff, 2.0 * (5.0 - 0.207) / 20.0, 1e-12);

        assert!(
            FilterSpec::lowpass_from_cutoff(21, SymmetryType::EvenSymOddLen, cutoff, 3).is_err()
        );
        let tiny = CutoffSpec::normalized(0.01, CutoffKind::HalfAmplitude);
        assert!(CutoffPlacement::for_lowpass(21, tiny).is_err());
    }
}
