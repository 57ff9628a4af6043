#[cfg(test)]
mod tests {
    use super::super::*;
    use nalgebra::{dvector, DVector};

    fn quadratic(x: &DVector<f64>) -> Result<f64> {
        Ok((x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2))
    }

    fn quadratic_grad(x: &DVector<f64>) -> Result<DVector<f64>> {
        Ok(dvector![2.0 * (x[0] - 2.0), 2.0 * (x[1] - 3.0)])
    }

    fn rosenbrock(x: &DVector<f64>) -> Result<f64> {
        Ok((1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2))
    }

    fn rosenbrock_grad(x: &DVector<f64>) -> Result<DVector<f64>> {
        Ok(dvector![
            -2.0 * (1.0 - x[0]) - 400.0 * x[0] * (x[1] - x[0].powi(2)),
            200.0 * (x[1] - x[0].powi(2))
        ])
    }

    #[test]
    fn test_lbfgs_quadratic() {
        let result = LBFGS::new(100, 1e-8)
            .minimize(&quadratic, &quadratic_grad, dvector![0.0, 0.0])
            .unwrap();
        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-6);
        assert!((result.x[1] - 3.0).abs() < 1e-6);
        assert!(result.fun < 1e-12);
    }

    #[test]
    fn test_lbfgs_rosenbrock() {
        let result = LBFGS::new(500, 1e-8)
            .minimize(&rosenbrock, &rosenbrock_grad, dvector![-1.2, 1.0])
            .unwrap();
        assert!((result.x[0] - 1.0).abs() < 1e-4);
        assert!((result.x[1] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_lbfgs_with_finite_difference_gradient() {
        let grad = |x: &DVector<f64>| finite_difference_gradient(&rosenbrock, x, 1e-6);
        let result = LBFGS::new(500, 1e-6)
            .minimize(&rosenbrock, &grad, dvector![0.0, 0.0])
            .unwrap();
        assert!((result.x[0] - 1.0).abs() < 1e-3);
        assert!((result.x[1] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_lbfgs_wrong_gradient_does_not_diverge() {
        // gradient pointing uphill: the line search cannot make progress
        let f = |x: &DVector<f64>| -> Result<f64> { Ok(x[0].powi(2) + x[1].powi(2)) };
        let grad =
            |x: &DVector<f64>| -> Result<DVector<f64>> { Ok(dvector![-2.0 * x[0], -2.0 * x[1]]) };
        let result = LBFGS::new(100, 1e-6)
            .minimize(&f, &grad, dvector![1.0, 1.0])
            .unwrap();
        assert!(!result.converged);
        assert!(result.fun <= 2.0);
    }

    #[test]
    fn test_objective_errors_propagate() {
        let f = |_: &DVector<f64>| -> Result<f64> { Err(color_eyre::eyre::eyre!("boom")) };
        assert!(LBFGS::default()
            .minimize(&f, &quadratic_grad, dvector![0.0])
            .is_err());
    }

    #[test]
    fn test_steepest_descent_quadratic() {
        let result = SteepestDescent::default()
            .minimize(&quadratic, &quadratic_grad, dvector![0.0, 0.0])
            .unwrap();
        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-5);
        assert!((result.x[1] - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_finite_difference_gradient() {
        let x = dvector![0.3, -0.7];
        let numeric = finite_difference_gradient(&rosenbrock, &x, 1e-5).unwrap();
        let exact = rosenbrock_grad(&x).unwrap();
        assert!((numeric - exact).amax() < 1e-6);
    }

    #[test]
    fn test_create_minimizer() {
        assert_eq!(create_minimizer("L-BFGS", 10, 1e-5).unwrap().name(), "L-BFGS");
        assert_eq!(create_minimizer("sd", 10, 1e-5).unwrap().name(), "steepest descent");
        assert!(create_minimizer("nelder-mead", 10, 1e-5).is_err());
    }
}
