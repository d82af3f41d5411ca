//! Magnetic field consisting of a single polarized Fourier mode.

use super::{FieldError, MagneticField};
use crate::{
    constants::PI,
    error::{ConfigError, ConfigResult},
    geometry::{Point3, Vec3},
    propagation::fpr,
    units::{KPC, NANO_GAUSS},
};

/// Shape of the polarization ellipse traced by the field vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PolarizationMode {
    /// Any polarization parameter in [-1, 1].
    Elliptical,
    /// Polarization parameter of exactly -1 or 1.
    Circular,
    /// Polarization parameter of exactly 0.
    Linear,
}

/// How the polarization parameter is interpreted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PolarizationConvention {
    Polarization,
    /// Only maximal helicity (parameter -1 or 1) is supported.
    Helicity,
}

/// Whether the given field strength is the amplitude or the RMS value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrengthNormalization {
    Amplitude,
    Rms,
}

/// A single-mode field `B_max (e1 cos(k.(r - r0)) + sigma e2 sin(k.(r - r0)))`,
/// with the wave vector `k` along `e2 x e1`.
#[derive(Clone, Debug)]
pub struct PolarizedSingleModeMagneticField {
    amplitude: fpr,
    polarization: fpr,
    wavelength: fpr,
    reference_position: Point3<fpr>,
    unit_vector_1: Vec3<fpr>,
    unit_vector_2: Vec3<fpr>,
    wave_vector: Vec3<fpr>,
}

impl PolarizedSingleModeMagneticField {
    /// Creates a new single-mode field.
    ///
    /// # Parameters
    ///
    /// - `strength`: Field amplitude or RMS strength [T].
    /// - `wavelength`: Wavelength of the mode [m].
    /// - `polarization`: Polarization parameter sigma.
    /// - `reference_position`: Position where the phase is zero.
    /// - `e_1`, `e_2`: Orthogonal vectors spanning the polarization plane.
    ///
    /// # Returns
    ///
    /// A `ConfigResult` which is an error if the parameters are inconsistent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        strength: fpr,
        wavelength: fpr,
        polarization: fpr,
        reference_position: Point3<fpr>,
        e_1: &Vec3<fpr>,
        e_2: &Vec3<fpr>,
        normalization: StrengthNormalization,
        convention: PolarizationConvention,
        mode: PolarizationMode,
    ) -> ConfigResult<Self> {
        let invalid = |message: &str| Err(ConfigError::InvalidField(message.to_string()));

        match mode {
            PolarizationMode::Elliptical if fpr::abs(polarization) > 1.0 => {
                return invalid("polarization parameter must lie in [-1, 1]")
            }
            PolarizationMode::Circular if fpr::abs(polarization) != 1.0 => {
                return invalid("circular polarization requires a polarization parameter of -1 or 1")
            }
            PolarizationMode::Linear if polarization != 0.0 => {
                return invalid("linear polarization requires a polarization parameter of 0")
            }
            _ => {}
        }

        let unit_vector_1 = match e_1.normalized() {
            Some(unit_vector) => unit_vector,
            None => return invalid("e_1 cannot be zero"),
        };
        let unit_vector_2 = match e_2.normalized() {
            Some(unit_vector) => unit_vector,
            None => return invalid("e_2 cannot be zero"),
        };
        if fpr::abs(unit_vector_1.dot(&unit_vector_2)) > 1e-12 {
            return invalid("e_1 and e_2 must be orthogonal");
        }

        if wavelength == 0.0 || !wavelength.is_finite() {
            return invalid("wavelength must be non-zero and finite");
        }
        let wave_vector = match unit_vector_2.cross(&unit_vector_1).normalized() {
            Some(direction) => direction * (2.0 * PI / wavelength),
            None => return invalid("e_1 cannot be parallel to e_2"),
        };

        if convention == PolarizationConvention::Helicity && fpr::abs(polarization) != 1.0 {
            return invalid("helicity convention requires a polarization parameter of -1 or 1");
        }

        let amplitude = match normalization {
            StrengthNormalization::Amplitude => strength,
            StrengthNormalization::Rms => {
                fpr::sqrt(2.0 / (1.0 + polarization * polarization)) * strength
            }
        };

        Ok(Self {
            amplitude,
            polarization,
            wavelength,
            reference_position,
            unit_vector_1,
            unit_vector_2,
            wave_vector,
        })
    }

    /// Field amplitude [T].
    pub fn amplitude(&self) -> fpr {
        self.amplitude
    }

    pub fn wave_vector(&self) -> &Vec3<fpr> {
        &self.wave_vector
    }
}

impl MagneticField for PolarizedSingleModeMagneticField {
    fn field(&self, position: &Point3<fpr>, _redshift: fpr) -> Result<Vec3<fpr>, FieldError> {
        let phase = self.wave_vector.dot(&(position - &self.reference_position));
        Ok((&self.unit_vector_1 * fpr::cos(phase)
            + &self.unit_vector_2 * (self.polarization * fpr::sin(phase)))
            * self.amplitude)
    }

    fn description(&self) -> String {
        format!(
            "Polarized single-mode magnetic field with amplitude {} nG, wavelength {} kpc and polarization {}",
            self.amplitude / NANO_GAUSS,
            self.wavelength / KPC,
            self.polarization
        )
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    fn circular_field() -> PolarizedSingleModeMagneticField {
        PolarizedSingleModeMagneticField::new(
            2.0,
            4.0,
            1.0,
            Point3::origin(),
            &Vec3::new(1.0, 0.0, 0.0),
            &Vec3::new(0.0, 1.0, 0.0),
            StrengthNormalization::Amplitude,
            PolarizationConvention::Polarization,
            PolarizationMode::Circular,
        )
        .unwrap()
    }

    #[test]
    fn circular_field_has_constant_magnitude() {
        let field = circular_field();
        for i in 0..16 {
            let position = Point3::new(0.3, -1.2, 0.25 * i as fpr);
            let b = field.field(&position, 0.0).unwrap();
            assert_abs_diff_eq!(b.length(), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn wave_vector_is_perpendicular_to_polarization_plane() {
        let field = circular_field();
        assert_abs_diff_eq!(field.wave_vector()[crate::geometry::Dim3::X], 0.0);
        assert_abs_diff_eq!(field.wave_vector()[crate::geometry::Dim3::Y], 0.0);
        assert_abs_diff_eq!(
            fpr::abs(field.wave_vector()[crate::geometry::Dim3::Z]),
            2.0 * PI / 4.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn rms_normalization_scales_amplitude() {
        let field = PolarizedSingleModeMagneticField::new(
            1.0,
            1.0,
            0.0,
            Point3::origin(),
            &Vec3::new(1.0, 0.0, 0.0),
            &Vec3::new(0.0, 0.0, 1.0),
            StrengthNormalization::Rms,
            PolarizationConvention::Polarization,
            PolarizationMode::Linear,
        )
        .unwrap();
        assert_abs_diff_eq!(field.amplitude(), fpr::sqrt(2.0), epsilon = 1e-15);
    }

    #[test]
    fn inconsistent_parameters_are_rejected() {
        let e_1 = Vec3::new(1.0, 0.0, 0.0);
        let build = |polarization, e_2: &Vec3<fpr>, mode, convention| {
            PolarizedSingleModeMagneticField::new(
                1.0,
                1.0,
                polarization,
                Point3::origin(),
                &e_1,
                e_2,
                StrengthNormalization::Amplitude,
                convention,
                mode,
            )
        };
        let e_2 = Vec3::new(0.0, 1.0, 0.0);
        assert!(build(
            0.5,
            &e_2,
            PolarizationMode::Circular,
            PolarizationConvention::Polarization
        )
        .is_err());
        assert!(build(
            0.5,
            &e_2,
            PolarizationMode::Linear,
            PolarizationConvention::Polarization
        )
        .is_err());
        assert!(build(
            1.5,
            &e_2,
            PolarizationMode::Elliptical,
            PolarizationConvention::Polarization
        )
        .is_err());
        assert!(build(
            0.5,
            &e_2,
            PolarizationMode::Elliptical,
            PolarizationConvention::Helicity
        )
        .is_err());
        assert!(build(
            0.5,
            &Vec3::new(1.0, 1.0, 0.0),
            PolarizationMode::Elliptical,
            PolarizationConvention::Polarization
        )
        .is_err());
        assert!(build(
            0.5,
            &e_2,
            PolarizationMode::Elliptical,
            PolarizationConvention::Polarization
        )
        .is_ok());
    }
}
