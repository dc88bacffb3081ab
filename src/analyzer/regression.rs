/// A least-squares line over a single feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fits y = intercept + slope * x by ordinary least squares.
/// Returns None for fewer than two points or zero variance in x.
pub fn fit_line(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let covariance: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let variance: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if variance == 0.0 {
        return None;
    }
    let slope = covariance / variance;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_perfect_line() {
        let fit = fit_line(&[(0.0, 10.0), (1.0, 20.0), (2.0, 30.0)]).unwrap();
        assert!((fit.slope - 10.0).abs() < 1e-9);
        assert!((fit.intercept - 10.0).abs() < 1e-9);
        assert!((fit.predict(3.0) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn fits_descending_trend() {
        let fit = fit_line(&[(0.0, 30.0), (1.0, 20.0), (2.0, 10.0)]).unwrap();
        assert!((fit.slope + 10.0).abs() < 1e-9);
        assert!(fit.predict(4.0) < 0.0);
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        assert!(fit_line(&[]).is_none());
        assert!(fit_line(&[(0.0, 5.0)]).is_none());
        // zero variance in x
        assert!(fit_line(&[(1.0, 5.0), (1.0, 9.0)]).is_none());
    }
}
