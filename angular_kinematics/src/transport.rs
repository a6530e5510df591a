use crate::state::KinematicState;
use crate::vector_triple::VectorTriple;
use nalgebra::Vector3;
use rotations::prelude::*;
use sim_value::SimValue;

impl<T: SimValue> KinematicState<T> {
    /// Expresses a vector known in A, with its derivatives taken in A, in frame
    /// B with its derivatives taken in B.
    ///
    /// p = R p_A
    /// v = R v_A - ω × p
    /// a = R a_A - 2ω × v - α × p - ω × (ω × p)
    pub fn apply_to(&self, triple: &VectorTriple<T>) -> VectorTriple<T> {
        let two = T::one() + T::one();
        let omega = self.rate;
        let p = self
            .rotation
            .transform(&triple.position);
        let v = self
            .rotation
            .transform(&triple.velocity)
            - omega.cross(&p);
        let a = self
            .rotation
            .transform(&triple.acceleration)
            - omega.cross(&v) * two
            - self
                .acceleration
                .cross(&p)
            - omega.cross(&omega.cross(&p));
        VectorTriple::new(p, v, a)
    }

    /// A vector fixed in A, as seen moving from B.
    pub fn apply_to_vector(&self, vector: &Vector3<T>) -> VectorTriple<T> {
        self.apply_to(&VectorTriple::from_position(*vector))
    }
}
