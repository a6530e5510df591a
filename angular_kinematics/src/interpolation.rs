use crate::hermite::HermiteInterpolator;
use crate::rodrigues::RodriguesSign;
use crate::state::KinematicState;
use crate::time_point::TimePoint;
use crate::time_stamped::TimeStampedKinematicState;
use crate::KinematicsErrors;
use nalgebra::Vector3;
use rotations::prelude::*;
use serde::{Deserialize, Serialize};
use sim_value::SimValue;
use std::f64::consts::PI;
use tracing::{debug, trace};

/// Which channels of the samples an interpolation uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngularDerivativesFilter {
    /// rotation only
    UseR,
    /// rotation and rate
    UseRR,
    /// rotation, rate and acceleration
    #[default]
    UseRRA,
}

impl AngularDerivativesFilter {
    /// Highest derivative order used.
    pub fn max_order(&self) -> usize {
        match self {
            AngularDerivativesFilter::UseR => 0,
            AngularDerivativesFilter::UseRR => 1,
            AngularDerivativesFilter::UseRRA => 2,
        }
    }

    pub fn from_order(order: usize) -> Result<Self, KinematicsErrors> {
        match order {
            0 => Ok(AngularDerivativesFilter::UseR),
            1 => Ok(AngularDerivativesFilter::UseRR),
            2 => Ok(AngularDerivativesFilter::UseRRA),
            _ => Err(KinematicsErrors::UnsupportedOrder(order)),
        }
    }
}

enum Attempt<T> {
    Done(KinematicState<T>),
    NearSingularity,
}

impl<T: SimValue, D: TimePoint> TimeStampedKinematicState<T, D> {
    /// Interpolates `samples` at `date`, `use_rates` selecting between all
    /// channels and the rotations only.
    pub fn interpolate_with_rates(
        date: D,
        use_rates: bool,
        samples: &[Self],
    ) -> Result<Self, KinematicsErrors> {
        let filter = if use_rates {
            AngularDerivativesFilter::UseRRA
        } else {
            AngularDerivativesFilter::UseR
        };
        Self::interpolate(date, filter, samples)
    }

    /// Hermite interpolation of `samples` at `date`.
    ///
    /// Samples are expressed as offsets from a constant rate motion model built
    /// on the sample nearest to `date`, then interpolated component-wise as modified
    /// Rodrigues vectors. Samples are reproduced at their own dates, with every
    /// channel the filter declares.
    ///
    /// When an offset gets too close to the Rodrigues singularity the model is
    /// tilted and the interpolation restarted.
    pub fn interpolate(
        date: D,
        filter: AngularDerivativesFilter,
        samples: &[Self],
    ) -> Result<Self, KinematicsErrors> {
        let n = samples.len();
        if n < 2 {
            return Err(KinematicsErrors::InsufficientSamples { required: 2, got: n });
        }
        for (i, a) in samples
            .iter()
            .enumerate()
        {
            if samples[i + 1..]
                .iter()
                .any(|b| b.date.duration_from(&a.date) == 0.0)
            {
                return Err(KinematicsErrors::DuplicateSampleTime);
            }
        }

        let mut reference = &samples[0];
        for sample in &samples[1..] {
            if sample
                .date
                .duration_from(&date)
                .abs()
                < reference
                    .date
                    .duration_from(&date)
                    .abs()
            {
                reference = sample;
            }
        }
        debug!(
            "interpolating {} samples at {:?} around reference {:?}",
            n, date, reference.date
        );

        // constant rate only, shifted_by is exact for it so the offsets keep
        // consistent derivative rows
        let mut model = match filter {
            AngularDerivativesFilter::UseRRA | AngularDerivativesFilter::UseRR => KinematicState::new(
                reference.state.rotation,
                reference.state.rate,
                Vector3::zeros(),
            ),
            AngularDerivativesFilter::UseR => {
                let mut sum = Vector3::zeros();
                for pair in samples.windows(2) {
                    sum += KinematicState::estimate_rate(
                        &pair[0].state.rotation,
                        &pair[1].state.rotation,
                        pair[1]
                            .date
                            .duration_from(&pair[0].date),
                    )?;
                }
                let mean = sum / T::from_f64((n - 1) as f64);
                KinematicState::new(reference.state.rotation, mean, Vector3::zeros())
            }
        };

        let epsilon = 2.0 * PI / n as f64;
        let threshold = (-(1.0 - 1e-4_f64)).min(-(epsilon / 4.0).cos());
        let tilt = KinematicState::from_rotation(UnitQuaternion::from_rotation_vector(
            &Vector3::new(T::from_f64(epsilon), T::zero(), T::zero()),
        ));

        for attempt in 0..n + 2 {
            match Self::interpolate_offsets(&date, &reference.date, &model, filter, samples, threshold)? {
                Attempt::Done(offset) => {
                    let state = offset.add_offset(&model.shifted_by(date.duration_from(&reference.date)));
                    return Ok(Self::from_parts(date, state));
                }
                Attempt::NearSingularity => {
                    debug!(
                        "interpolation offsets near the rodrigues singularity, tilting the model (attempt {})",
                        attempt + 1
                    );
                    model = model.add_offset(&tilt);
                }
            }
        }
        Err(KinematicsErrors::SingularityAvoidanceFailed)
    }

    fn interpolate_offsets(
        date: &D,
        reference_date: &D,
        model: &KinematicState<T>,
        filter: AngularDerivativesFilter,
        samples: &[Self],
        threshold: f64,
    ) -> Result<Attempt<T>, KinematicsErrors> {
        let mut interpolator = HermiteInterpolator::new();
        let mut sign = RodriguesSign::Positive;
        let mut previous = Quaternion::identity();

        for sample in samples {
            let dt = sample
                .date
                .duration_from(date);
            let fixed = sample.state.subtract_offset(
                &model.shifted_by(
                    sample
                        .date
                        .duration_from(reference_date),
                ),
            );

            // keep every offset on the same hemisphere
            let q = fixed.rotation.0;
            if q.dot(&previous).to_f64() < 0.0 {
                sign = sign.opposite();
            }
            previous = q;

            if q.w.to_f64() * sign.value::<f64>() < threshold {
                return Ok(Attempt::NearSingularity);
            }

            let rows = fixed.get_modified_rodrigues(sign)?;
            let channels: Vec<Vec<T>> = rows[..=filter.max_order()]
                .iter()
                .map(|row| row.to_vec())
                .collect();
            trace!("offset at {:?}: {:?}", sample.date, rows[0]);
            interpolator.add_sample_point(dt, &channels)?;
        }

        let p = interpolator.derivatives(0.0, 2)?;
        let rows: Vec<[T; 3]> = p
            .iter()
            .map(|row| [row[0], row[1], row[2]])
            .collect();
        Ok(Attempt::Done(KinematicState::create_from_modified_rodrigues(&rows)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::Tolerances;
    use approx::assert_abs_diff_eq;

    // two single axis motions chained, so that rates and accelerations are
    // exactly the derivatives of the rotations
    fn motion(t: f64) -> KinematicState {
        let ab = KinematicState::new(
            UnitQuaternion::from_rotation_vector(&Vector3::new(0.0, 0.0, 0.3)),
            Vector3::new(0.0, 0.0, 0.1),
            Vector3::new(0.0, 0.0, 0.01),
        );
        let bc = KinematicState::new(
            UnitQuaternion::from_rotation_vector(&Vector3::new(-0.6, 0.0, 0.0)),
            Vector3::new(-0.05, 0.0, 0.0),
            Vector3::new(0.005, 0.0, 0.0),
        );
        ab.shifted_by(t)
            .add_offset(&bc.shifted_by(t))
    }

    fn samples(dates: &[f64]) -> Vec<TimeStampedKinematicState> {
        dates
            .iter()
            .map(|t| TimeStampedKinematicState::from_parts(*t, motion(*t)))
            .collect()
    }

    #[test]
    fn test_filter_orders() {
        for order in 0..3 {
            let filter = AngularDerivativesFilter::from_order(order).unwrap();
            assert_eq!(filter.max_order(), order);
        }
        assert_eq!(
            AngularDerivativesFilter::from_order(3).unwrap_err(),
            KinematicsErrors::UnsupportedOrder(3)
        );
    }

    #[test]
    fn test_reproduces_samples() {
        let samples = samples(&[0.0, 2.0, 4.0, 6.0]);
        for filter in [
            AngularDerivativesFilter::UseR,
            AngularDerivativesFilter::UseRR,
            AngularDerivativesFilter::UseRRA,
        ] {
            for sample in &samples {
                let interpolated =
                    TimeStampedKinematicState::interpolate(sample.date(), filter, &samples).unwrap();
                let (angle, rate, acceleration) = interpolated
                    .state()
                    .distances(sample.state());
                assert!(angle < 1e-10, "{filter:?} angle {angle}");
                if filter != AngularDerivativesFilter::UseR {
                    assert!(rate < 1e-10, "{filter:?} rate {rate}");
                }
                if filter == AngularDerivativesFilter::UseRRA {
                    assert!(acceleration < 1e-10, "{filter:?} acceleration {acceleration}");
                }
            }
        }
    }

    #[test]
    fn test_between_samples_follows_motion() {
        let samples = samples(&[0.0, 1.0, 2.0, 3.0]);
        for t in [0.25, 1.5, 2.9] {
            let expected = motion(t);
            let rra = TimeStampedKinematicState::interpolate_with_rates(t, true, &samples).unwrap();
            let (angle, rate, _) = rra
                .state()
                .distances(&expected);
            assert!(angle < 1e-10, "angle {angle} at {t}");
            assert!(rate < 1e-9, "rate {rate} at {t}");

            // a cubic through the rotations only
            let r = TimeStampedKinematicState::interpolate_with_rates(t, false, &samples).unwrap();
            let (angle, rate, _) = r
                .state()
                .distances(&expected);
            assert!(angle < 1e-4, "angle {angle} at {t}");
            assert!(rate < 1e-3, "rate {rate} at {t}");
        }
    }

    #[test]
    fn test_rate_and_acceleration_not_aligned() {
        // turning about y in a frame turning about z, the composed acceleration
        // leaves the rate axis
        let ab = KinematicState::new(
            UnitQuaternion::from_rotation_vector(&Vector3::new(0.0, 0.2, 0.0)),
            Vector3::new(0.0, 0.15, 0.0),
            Vector3::new(0.0, 0.04, 0.0),
        );
        let bc = KinematicState::new(
            UnitQuaternion::from_rotation_vector(&Vector3::new(0.0, 0.0, 0.5)),
            Vector3::new(0.0, 0.0, -0.1),
            Vector3::new(0.0, 0.0, 0.02),
        );
        let motion = |t: f64| {
            ab.shifted_by(t)
                .add_offset(&bc.shifted_by(t))
        };
        let samples: Vec<_> = [0.0, 1.0, 2.0]
            .iter()
            .map(|t| TimeStampedKinematicState::from_parts(*t, motion(*t)))
            .collect();
        for sample in &samples {
            let state = sample.state();
            assert!(state.rate().cross(&state.acceleration()).norm() > 1e-3);
        }

        for t in [0.5, 1.5] {
            let interpolated =
                TimeStampedKinematicState::interpolate(t, AngularDerivativesFilter::UseRRA, &samples)
                    .unwrap();
            let (angle, rate, _) = interpolated
                .state()
                .distances(&motion(t));
            assert!(angle < 1e-9, "angle {angle} at {t}");
            assert!(rate < 1e-8, "rate {rate} at {t}");
        }
    }

    #[test]
    fn test_large_rotations_between_samples() {
        // 2.4 rad between consecutive samples
        let motion = KinematicState::new(
            UnitQuaternion::<f64>::identity(),
            Vector3::new(0.0, 0.0, 1.2),
            Vector3::zeros(),
        );
        let samples: Vec<_> = [0.0, 2.0, 4.0, 6.0]
            .iter()
            .map(|t| TimeStampedKinematicState::from_parts(*t, motion.shifted_by(*t)))
            .collect();
        for filter in [AngularDerivativesFilter::UseR, AngularDerivativesFilter::UseRR] {
            let interpolated = TimeStampedKinematicState::interpolate(3.0, filter, &samples).unwrap();
            assert!(interpolated
                .state()
                .is_close(&motion.shifted_by(3.0), &Tolerances::uniform(1e-10)));
        }
    }

    #[test]
    fn test_restarts_away_from_singularity() {
        // the rates disagree with the fixed rotations, the model reaches a full
        // turn at the last sample and the offset there hits the singular branch
        let rate = Vector3::new(0.0, 0.0, PI / 2.0);
        let samples: Vec<_> = [0.0, 2.0, 4.0]
            .iter()
            .map(|t| {
                TimeStampedKinematicState::new(*t, UnitQuaternion::identity(), rate, Vector3::zeros())
            })
            .collect();
        let interpolated =
            TimeStampedKinematicState::interpolate(0.0, AngularDerivativesFilter::UseRR, &samples)
                .unwrap();
        let (angle, d_rate, _) = interpolated
            .state()
            .distances(samples[0].state());
        assert!(angle < 1e-10, "angle {angle}");
        assert!(d_rate < 1e-10, "rate {d_rate}");
    }

    #[test]
    fn test_sample_errors() {
        let samples = samples(&[0.0, 1.0]);
        assert_eq!(
            TimeStampedKinematicState::interpolate(0.5, AngularDerivativesFilter::UseRRA, &samples[..1])
                .unwrap_err(),
            KinematicsErrors::InsufficientSamples { required: 2, got: 1 }
        );
        let duplicated = vec![samples[0], samples[1], samples[0]];
        assert_eq!(
            TimeStampedKinematicState::interpolate(0.5, AngularDerivativesFilter::UseR, &duplicated)
                .unwrap_err(),
            KinematicsErrors::DuplicateSampleTime
        );
    }

    #[test]
    fn test_result_is_stamped_at_requested_date() {
        let samples = samples(&[0.0, 1.0, 2.0]);
        let interpolated =
            TimeStampedKinematicState::interpolate(1.25, AngularDerivativesFilter::UseRRA, &samples)
                .unwrap();
        assert_abs_diff_eq!(interpolated.date(), 1.25);
    }
}
