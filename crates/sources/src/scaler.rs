//! Per-column standardisation.
//!
//! Fitted on the user's rated movies and then applied unchanged to the
//! catalog, so distances are measured in units of the user's own spread.

use anyhow::{Result, anyhow, bail};
use ndarray::{Array1, Array2, Axis};

/// Standard deviations below this are treated as zero
const ZERO_SCALE_EPSILON: f64 = 10.0 * f64::EPSILON;

/// Removes the column mean and divides by the column's population standard
/// deviation. A zero-variance column keeps a scale of 1.0, so it is only
/// centred.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.scale.as_ref()
    }

    /// Compute column means and scales from the rows of `data`
    pub fn fit(&mut self, data: &Array2<f64>) -> Result<()> {
        if data.nrows() == 0 {
            bail!("Cannot fit scaler with zero samples");
        }

        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| anyhow!("Cannot fit scaler with zero samples"))?;
        let scale = data
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < ZERO_SCALE_EPSILON { 1.0 } else { s });

        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(())
    }

    /// Standardise the rows of `data` with the fitted statistics
    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        let mean = self.mean.as_ref().ok_or_else(|| anyhow!("Scaler not fitted"))?;
        let scale = self.scale.as_ref().ok_or_else(|| anyhow!("Scaler not fitted"))?;

        if data.ncols() != mean.len() {
            bail!(
                "Feature dimension mismatch: expected {}, got {}",
                mean.len(),
                data.ncols()
            );
        }
        Ok((data - mean) / scale)
    }

    pub fn fit_transform(&mut self, data: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(data)?;
        self.transform(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_transform_standardises_columns() {
        let data = array![[1.0, 100.0], [2.0, 200.0], [3.0, 300.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&data).unwrap();

        for column in scaled.columns() {
            assert!(column.mean().unwrap().abs() < 1e-12);
            assert!((column.var(0.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_uses_population_std() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&array![[0.0], [2.0]]).unwrap();
        assert_eq!(scaler.mean().unwrap(), &array![1.0]);
        assert_eq!(scaler.scale().unwrap(), &array![1.0]);

        let scaled = scaler.transform(&array![[4.0]]).unwrap();
        assert_eq!(scaled, array![[3.0]]);
    }

    #[test]
    fn test_zero_variance_column_is_only_centred() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&array![[5.0, 1.0], [5.0, 3.0]]).unwrap();

        let scaled = scaler.transform(&array![[7.0, 2.0]]).unwrap();
        assert_eq!(scaled[[0, 0]], 2.0);
        assert_eq!(scaled[[0, 1]], 0.0);
    }

    #[test]
    fn test_errors() {
        let mut scaler = StandardScaler::new();
        assert!(scaler.transform(&array![[1.0]]).is_err());
        assert!(scaler.fit(&Array2::zeros((0, 2))).is_err());

        scaler.fit(&array![[1.0, 2.0]]).unwrap();
        assert!(scaler.transform(&array![[1.0]]).is_err());
    }
}
