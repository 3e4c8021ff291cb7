use std::fmt::{self, Write as _};

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::{Result, SaxpyError};

/// Allocates a zeroed vector of `len` doubles, reporting allocation failure
/// instead of aborting.
pub(crate) fn try_zeroed(len: usize, what: &str) -> Result<Vec<f64>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        SaxpyError::ResourceExhaustion(format!("failed to allocate {what} of {len} values: {e}"))
    })?;
    buf.resize(len, 0.);
    Ok(buf)
}

/// The operands of the iterative SAXPY: `X`, `Y` and the scalar `a`.
///
/// `X` and `a` are only read during a run, `Y` is updated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorStore {
    x: Vec<f64>,
    y: Vec<f64>,
    a: f64,
}

impl VectorStore {
    /// Creates a new `VectorStore` from explicit data.
    ///
    /// # Arguments
    /// * `x` - The read-only input vector.
    /// * `y` - The vector updated in place.
    /// * `a` - The scalar multiplier.
    ///
    /// # Returns
    /// `InvalidArgument` if the vectors are empty or their lengths differ.
    pub fn new(x: Vec<f64>, y: Vec<f64>, a: f64) -> Result<Self> {
        if x.len() != y.len() {
            return Err(SaxpyError::InvalidArgument(format!(
                "X has {} elements but Y has {}",
                x.len(),
                y.len()
            )));
        }

        if x.is_empty() {
            return Err(SaxpyError::InvalidArgument(
                "vector size must be positive".into(),
            ));
        }

        Ok(Self { x, y, a })
    }

    /// Creates a new `VectorStore` filled with draws in `[0, 1)`.
    ///
    /// `X[i]` and `Y[i]` are drawn alternately for ascending `i`, then `a` is
    /// drawn last. The same `seed` always yields the same store.
    ///
    /// # Arguments
    /// * `size` - The length of both vectors.
    /// * `seed` - The generator's seed.
    ///
    /// # Returns
    /// `InvalidArgument` if `size` is zero, `ResourceExhaustion` if the vectors
    /// can't be allocated.
    pub fn random(size: usize, seed: u64) -> Result<Self> {
        if size == 0 {
            return Err(SaxpyError::InvalidArgument(
                "vector size must be positive".into(),
            ));
        }

        let mut x = try_zeroed(size, "vector X")?;
        let mut y = try_zeroed(size, "vector Y")?;
        let mut rng = StdRng::seed_from_u64(seed);

        for (xi, yi) in x.iter_mut().zip(y.iter_mut()) {
            *xi = rng.random::<f64>();
            *yi = rng.random::<f64>();
        }
        let a = rng.random::<f64>();

        debug!("initialized vectors of size {size} with seed {seed}");
        Ok(Self { x, y, a })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    /// Returns `X` and `a` for reading alongside `Y` for writing.
    pub(crate) fn split_mut(&mut self) -> (&[f64], &mut [f64], f64) {
        (&self.x, &mut self.y, self.a)
    }

    /// Consumes the store and returns the final `Y`.
    pub fn into_y(self) -> Vec<f64> {
        self.y
    }

    /// Returns a printable view of the whole store.
    pub fn dump(&self) -> Dump<'_> {
        Dump(self)
    }
}

/// Renders a vector as `[ v0, v1, ..., vn ]` with six decimals.
pub fn format_vector(values: &[f64]) -> String {
    let mut out = String::from("[ ");
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{v:.6}");
    }
    out.push_str(" ]");
    out
}

/// Debug listing of a `VectorStore`, see `VectorStore::dump`.
pub struct Dump<'a>(&'a VectorStore);

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "vector X= {}", format_vector(&self.0.x))?;
        writeln!(f, "vector Y= {}", format_vector(&self.0.y))?;
        write!(f, "a= {:.6}", self.0.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_is_deterministic_per_seed() {
        let first = VectorStore::random(32, 7).unwrap();
        let second = VectorStore::random(32, 7).unwrap();
        let other = VectorStore::random(32, 8).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn random_values_are_in_unit_interval() {
        let store = VectorStore::random(256, 1).unwrap();
        let in_unit = |v: &f64| (0.0..1.0).contains(v);

        assert!(store.x().iter().all(in_unit));
        assert!(store.y().iter().all(in_unit));
        assert!(in_unit(&store.a()));
    }

    #[test]
    fn new_rejects_bad_shapes() {
        assert!(matches!(
            VectorStore::new(vec![1.], vec![1., 2.], 1.),
            Err(SaxpyError::InvalidArgument(_))
        ));
        assert!(matches!(
            VectorStore::new(vec![], vec![], 1.),
            Err(SaxpyError::InvalidArgument(_))
        ));
        assert!(matches!(
            VectorStore::random(0, 1),
            Err(SaxpyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn into_y_hands_back_the_updated_vector() {
        let store = VectorStore::new(vec![1., 2.], vec![3., 4.], 0.5).unwrap();
        assert_eq!(store.into_y(), [3., 4.]);
    }

    #[test]
    fn dump_lists_every_value() {
        let store = VectorStore::new(vec![1., 0.5], vec![0.25, 0.], 2.).unwrap();
        let dump = store.dump().to_string();

        assert_eq!(
            dump,
            "vector X= [ 1.000000, 0.500000 ]\nvector Y= [ 0.250000, 0.000000 ]\na= 2.000000"
        );
    }
}
