use crate::state::KinematicState;
use crate::vector_triple::VectorTriple;
use crate::KinematicsErrors;
use nalgebra::{Matrix3, Vector3};
use rotations::prelude::*;
use sim_value::{Dual2, SimValue};
use tracing::debug;

fn norm<T: SimValue>(v: &Vector3<T>) -> f64 {
    v.dot(v)
        .to_f64()
        .sqrt()
}

/// Solves ω × v1 = c1, ω × v2 = c2 for ω.
///
/// `tolerance` is relative to the longest of `v1` and `v2`. When the vectors
/// are parallel only the component of ω orthogonal to them is determined and
/// that minimum norm solution is returned. Any solution not satisfying both
/// equations within the tolerance is rejected.
pub fn inverse_cross_products<T: SimValue>(
    v1: &Vector3<T>,
    c1: &Vector3<T>,
    v2: &Vector3<T>,
    c2: &Vector3<T>,
    tolerance: f64,
) -> Result<Vector3<T>, KinematicsErrors> {
    let v1_norm = norm(v1);
    let v2_norm = norm(v2);
    let scale = v1_norm.max(v2_norm);
    let threshold = tolerance * scale;

    let n = v1.cross(v2);
    let omega = if norm(&n) > threshold * scale {
        // every solution of the first equation is ω⊥ + λ v1
        let perpendicular = v1.cross(c1) / v1.dot(v1);
        let lambda = n.dot(&(*c2 - perpendicular.cross(v2))) / n.dot(&n);
        perpendicular + *v1 * lambda
    } else {
        let c1_norm = norm(c1);
        let c2_norm = norm(c2);
        if c1_norm <= threshold && c2_norm <= threshold {
            return Ok(Vector3::zeros());
        }
        if v1_norm <= threshold && c1_norm > threshold {
            return Err(KinematicsErrors::DegenerateConfiguration(
                "zero first vector with a non zero cross product".to_string(),
            ));
        }
        if v2_norm <= threshold && c2_norm > threshold {
            return Err(KinematicsErrors::DegenerateConfiguration(
                "zero second vector with a non zero cross product".to_string(),
            ));
        }
        let (v, c) = if v1_norm >= v2_norm { (v1, c1) } else { (v2, c2) };
        v.cross(c) / v.dot(v)
    };

    for (v, c) in [(v1, c1), (v2, c2)] {
        let residual = norm(&(omega.cross(v) - *c));
        if residual > threshold {
            debug!("inverse cross products residual {residual:e} above {threshold:e}");
            return Err(KinematicsErrors::DegenerateConfiguration(format!(
                "cross products are inconsistent, residual {residual:e}"
            )));
        }
    }
    Ok(omega)
}

fn unit<T: SimValue>(v: &Vector3<T>) -> Vector3<T> {
    *v / v.dot(v).sqrt()
}

impl<T: SimValue> KinematicState<T> {
    /// Recovers the state from two vectors observed in both frames, `u1` and
    /// `u2` in A, `v1` and `v2` in B, each with its derivatives in its own
    /// frame.
    ///
    /// The rotation maps the triad built on (`u1`, `u1 × u2`) onto the one on
    /// (`v1`, `v1 × v2`). The observations must agree with a rigid rotation
    /// within `tolerance`, norms relative and separation angle cosine absolute.
    pub fn from_observations(
        u1: &VectorTriple<T>,
        u2: &VectorTriple<T>,
        v1: &VectorTriple<T>,
        v2: &VectorTriple<T>,
        tolerance: f64,
    ) -> Result<Self, KinematicsErrors> {
        let (pu1, pu2) = (u1.position, u2.position);
        let (pv1, pv2) = (v1.position, v2.position);

        for (name, p) in [("u1", &pu1), ("u2", &pu2), ("v1", &pv1), ("v2", &pv2)] {
            if norm(p) == 0.0 {
                return Err(KinematicsErrors::DegenerateConfiguration(format!(
                    "{name} is a zero vector"
                )));
            }
        }
        let nu = pu1.cross(&pu2);
        let nv = pv1.cross(&pv2);
        if norm(&nu) <= tolerance * norm(&pu1) * norm(&pu2) {
            return Err(KinematicsErrors::DegenerateConfiguration(
                "u1 and u2 are collinear".to_string(),
            ));
        }
        if norm(&nv) <= tolerance * norm(&pv1) * norm(&pv2) {
            return Err(KinematicsErrors::DegenerateConfiguration(
                "v1 and v2 are collinear".to_string(),
            ));
        }

        for (name, u, v) in [("1", &pu1, &pv1), ("2", &pu2, &pv2)] {
            let (nu, nv) = (norm(u), norm(v));
            if (nu - nv).abs() > tolerance * nu.max(nv) {
                return Err(KinematicsErrors::InconsistentObservations(format!(
                    "norms of u{name} and v{name} differ: {nu} and {nv}"
                )));
            }
        }
        let (a1, b1) = (unit(&pu1), unit(&pv1));
        let cos_u = a1
            .dot(&unit(&pu2))
            .to_f64();
        let cos_v = b1
            .dot(&unit(&pv2))
            .to_f64();
        if (cos_u - cos_v).abs() > tolerance {
            return Err(KinematicsErrors::InconsistentObservations(format!(
                "separation angle cosines differ: {cos_u} and {cos_v}"
            )));
        }

        let a2 = unit(&nu);
        let b2 = unit(&nv);
        let a = Matrix3::from_columns(&[a1, a2, a1.cross(&a2)]);
        let b = Matrix3::from_columns(&[b1, b2, b1.cross(&b2)]);
        let matrix = RotationMatrix::from(b * a.transpose());
        let rotation = UnitQuaternion::from(&matrix);

        // v1 and v2 are not collinear here, an unsolvable pair means the
        // derivatives do not come from a rigid motion
        let inconsistent = |error: KinematicsErrors| match error {
            KinematicsErrors::DegenerateConfiguration(message) => {
                KinematicsErrors::InconsistentObservations(message)
            }
            other => other,
        };

        let c1 = rotation.transform(&u1.velocity) - v1.velocity;
        let c2 = rotation.transform(&u2.velocity) - v2.velocity;
        let rate = inverse_cross_products(&pv1, &c1, &pv2, &c2, tolerance).map_err(inconsistent)?;

        let two = T::one() + T::one();
        let residual = |u: &VectorTriple<T>, v: &VectorTriple<T>| {
            rotation.transform(&u.acceleration)
                - rate.cross(&v.velocity) * two
                - rate.cross(&rate.cross(&v.position))
                - v.acceleration
        };
        let acceleration = inverse_cross_products(
            &pv1,
            &residual(u1, v1),
            &pv2,
            &residual(u2, v2),
            tolerance,
        )
        .map_err(inconsistent)?;

        Ok(Self::new(rotation, rate, acceleration))
    }

    /// Smallest rotation turning the direction of `u` (in A) onto the
    /// direction of `v` (in B), differentiated along with both directions.
    pub fn aligning(u: &VectorTriple<T>, v: &VectorTriple<T>) -> Result<Self, KinematicsErrors> {
        if norm(&u.position) == 0.0 || norm(&v.position) == 0.0 {
            return Err(KinematicsErrors::DegenerateConfiguration(
                "cannot align a zero vector".to_string(),
            ));
        }
        let u = unit(&u.to_dual2_vector());
        let v = unit(&v.to_dual2_vector());

        // q ∝ (-(u × v), 1 + u·v)
        let axis = u.cross(&v);
        let w = Dual2::constant(T::one()) + u.dot(&v);
        if w.value.to_f64() < 1e-12 {
            return Err(KinematicsErrors::DegenerateConfiguration(
                "anti parallel directions have no unique aligning rotation".to_string(),
            ));
        }
        let q = Quaternion::new(-axis[0], -axis[1], -axis[2], w).normalize()?;
        Ok(Self::from_dual2_rotation(&UnitQuaternion::new_unchecked(q)))
    }
}
