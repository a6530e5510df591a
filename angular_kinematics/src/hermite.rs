use crate::KinematicsErrors;
use sim_value::SimValue;

/// Polynomial interpolation of vector valued samples, each sample giving the
/// value and any number of successive derivatives at its abscissa.
///
/// Uses Newton divided differences where a sample with `k` derivatives counts
/// as `k + 1` repeated nodes.
#[derive(Clone, Debug)]
pub struct HermiteInterpolator<T = f64> {
    abscissae: Vec<f64>,
    top_diagonal: Vec<Vec<T>>,
    bottom_diagonal: Vec<Vec<T>>,
}

impl<T: SimValue> Default for HermiteInterpolator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SimValue> HermiteInterpolator<T> {
    pub fn new() -> Self {
        Self {
            abscissae: Vec::new(),
            top_diagonal: Vec::new(),
            bottom_diagonal: Vec::new(),
        }
    }

    /// Number of interpolation conditions, i.e. polynomial degree + 1.
    pub fn len(&self) -> usize {
        self.abscissae.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abscissae.is_empty()
    }

    /// Adds a sample at `x`, `value[k]` being the k-th derivative.
    pub fn add_sample_point(&mut self, x: f64, value: &[Vec<T>]) -> Result<(), KinematicsErrors> {
        let dimension = match self.top_diagonal.first() {
            Some(first) => first.len(),
            None => value
                .first()
                .map_or(0, |v| v.len()),
        };
        for derivative in value {
            if derivative.len() != dimension {
                return Err(KinematicsErrors::DimensionMismatch {
                    expected: dimension,
                    got: derivative.len(),
                });
            }
        }
        if self
            .abscissae
            .iter()
            .any(|a| *a == x)
        {
            return Err(KinematicsErrors::DuplicateSampleTime);
        }

        let mut factorial = 1.0;
        for (i, derivative) in value
            .iter()
            .enumerate()
        {
            if i > 1 {
                factorial *= i as f64;
            }
            let scale = T::from_f64(1.0 / factorial);
            let y: Vec<T> = derivative
                .iter()
                .map(|c| *c * scale)
                .collect();

            // f[x..x] with i + 1 copies of x is y, the older rows of the
            // table are then updated from the bottom up
            let n = self.abscissae.len();
            self.bottom_diagonal
                .insert(n - i, y);
            for j in i..n {
                let k = n - (j + 1);
                let inv = T::from_f64(1.0 / (x - self.abscissae[k]));
                let (lower, upper) = self
                    .bottom_diagonal
                    .split_at_mut(k + 1);
                let bottom1 = &mut lower[k];
                let bottom0 = &upper[0];
                for (b1, b0) in bottom1
                    .iter_mut()
                    .zip(bottom0.iter())
                {
                    *b1 = inv * (*b0 - *b1);
                }
            }

            self.top_diagonal
                .push(self.bottom_diagonal[0].clone());
            self.abscissae
                .push(x);
        }
        Ok(())
    }

    /// Interpolated value at `x`.
    pub fn value(&self, x: f64) -> Result<Vec<T>, KinematicsErrors> {
        let mut derivatives = self.derivatives(x, 0)?;
        Ok(derivatives.swap_remove(0))
    }

    /// Interpolated value and derivatives up to `order` at `x`, row k holding
    /// the k-th derivative.
    pub fn derivatives(&self, x: f64, order: usize) -> Result<Vec<Vec<T>>, KinematicsErrors> {
        let Some(first) = self.top_diagonal.first() else {
            return Err(KinematicsErrors::InsufficientSamples { required: 1, got: 0 });
        };
        let dimension = first.len();

        // p[j] is the j-th Taylor coefficient at x of the Newton basis
        // polynomial (x - x_0)...(x - x_{i-1})
        let mut p = vec![0.0; order + 1];
        p[0] = 1.0;
        let mut coefficients = vec![vec![T::zero(); dimension]; order + 1];
        for (difference, abscissa) in self
            .top_diagonal
            .iter()
            .zip(self.abscissae.iter())
        {
            for (row, pj) in coefficients
                .iter_mut()
                .zip(p.iter())
            {
                let pj = T::from_f64(*pj);
                for (c, d) in row
                    .iter_mut()
                    .zip(difference.iter())
                {
                    *c += *d * pj;
                }
            }
            let delta = x - abscissa;
            for j in (1..=order).rev() {
                p[j] = p[j] * delta + p[j - 1];
            }
            p[0] *= delta;
        }

        // Taylor coefficients to derivatives
        let mut factorial = 1.0;
        for (j, row) in coefficients
            .iter_mut()
            .enumerate()
        {
            if j > 1 {
                factorial *= j as f64;
            }
            let f = T::from_f64(factorial);
            for c in row.iter_mut() {
                *c *= f;
            }
        }
        Ok(coefficients)
    }
}
