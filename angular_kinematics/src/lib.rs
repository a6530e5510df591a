pub mod composition;
pub mod derivatives;
pub mod hermite;
pub mod interpolation;
pub mod inverse;
pub mod rodrigues;
pub mod state;
pub mod time_point;
pub mod time_stamped;
pub mod tolerance;
pub mod transport;
pub mod vector_triple;

use rodrigues::RodriguesSign;
use rotations::quaternion::QuaternionErrors;
use thiserror::Error;

pub mod prelude {
    pub use crate::derivatives::DerivativeRotation;
    pub use crate::hermite::HermiteInterpolator;
    pub use crate::interpolation::AngularDerivativesFilter;
    pub use crate::inverse::inverse_cross_products;
    pub use crate::rodrigues::{ModifiedRodrigues, RodriguesSign};
    pub use crate::state::KinematicState;
    pub use crate::time_point::TimePoint;
    pub use crate::time_stamped::TimeStampedKinematicState;
    pub use crate::tolerance::Tolerances;
    pub use crate::vector_triple::VectorTriple;
    pub use crate::KinematicsErrors;
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum KinematicsErrors {
    #[error("degenerate configuration: {0}")]
    DegenerateConfiguration(String),
    #[error("dimension mismatch, expected {expected} components but got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("two samples share the same time point")]
    DuplicateSampleTime,
    #[error("inconsistent observations: {0}")]
    InconsistentObservations(String),
    #[error("at least {required} samples are needed, got {got}")]
    InsufficientSamples { required: usize, got: usize },
    #[error("{0}")]
    QuaternionErrors(#[from] QuaternionErrors),
    #[error("could not move the interpolation offsets away from the rodrigues singularity")]
    SingularityAvoidanceFailed,
    #[error("rotation is not representable by a modified rodrigues vector with {0:?} sign, retry with the opposite sign")]
    UnrepresentableRotation(RodriguesSign),
    #[error("derivation order {0} is not supported, it must be 0, 1 or 2")]
    UnsupportedOrder(usize),
}
