//! Implementation of the bounded Levenberg-Marquardt algorithm.
//!
//! Only free parameters (neither fixed nor tied) are varied. Each trial step
//! solves the Marquardt-scaled damped normal equations
//! `(JᵀJ + λ diag(JᵀJ)) δ = -Jᵀr`, projects the result onto the enabled
//! limits and re-applies the tie expressions before the model is evaluated.

use ndarray::{Array1, Array2};
use tracing::{debug, info};

use crate::error::{Result, SpecFitError};
use crate::parameters::ParInfoTable;
use crate::problem::Problem;

use super::config::SolverConfig;
use super::finite_difference;
use super::linalg::{cholesky_inverse, cholesky_solve};
use super::ties::TieSet;
use super::{FitStatus, Solver, SolverOutcome};

/// Residual problem with tie expressions applied before every evaluation.
struct TiedProblem<'a> {
    inner: &'a dyn Problem,
    ties: &'a TieSet,
}

impl Problem for TiedProblem<'_> {
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        let params = self.ties.applied(params)?;
        self.inner.eval(&params)
    }

    fn residual_count(&self) -> usize {
        self.inner.residual_count()
    }
}

fn sum_of_squares(residuals: &Array1<f64>) -> f64 {
    residuals.iter().map(|r| r.powi(2)).sum()
}

fn norm_over(values: &Array1<f64>, free: &[usize]) -> f64 {
    free.iter().map(|&i| values[i].powi(2)).sum::<f64>().sqrt()
}

/// Largest cosine between the residual vector and a Jacobian column.
fn orthogonality(jac: &Array2<f64>, gradient: &Array1<f64>, fnorm: f64) -> f64 {
    if fnorm == 0.0 {
        return 0.0;
    }
    jac.columns()
        .into_iter()
        .zip(gradient.iter())
        .filter_map(|(col, g)| {
            let colnorm = col.dot(&col).sqrt();
            (colnorm > 0.0).then(|| (g / (fnorm * colnorm)).abs())
        })
        .fold(0.0, f64::max)
}

/// The default [`Solver`].
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt;

impl LevenbergMarquardt {
    pub fn new() -> Self {
        Self
    }

    /// Reject descriptor tables the iteration cannot honor.
    fn validate(
        parinfo: &ParInfoTable,
        residual_count: usize,
    ) -> std::result::Result<Vec<usize>, String> {
        for p in parinfo.iter().filter(|p| !p.fixed) {
            if p.limited.0 && p.limited.1 && p.limits.0 >= p.limits.1 {
                return Err(format!(
                    "ERROR: parameter limits are not consistent for {}",
                    p.parname
                ));
            }
        }
        for p in parinfo.iter().filter(|p| p.is_free()) {
            if !p.value.is_finite() || !p.within_limits(p.value) {
                return Err(format!(
                    "ERROR: parameter {} = {} is not within its limits",
                    p.parname, p.value
                ));
            }
        }

        let free: Vec<usize> = parinfo
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_free())
            .map(|(i, _)| i)
            .collect();
        if free.is_empty() {
            return Err("ERROR: no free parameters".to_string());
        }
        if residual_count < free.len() {
            return Err(format!(
                "ERROR: number of free parameters ({}) must not exceed the number of data points ({})",
                free.len(),
                residual_count
            ));
        }
        Ok(free)
    }

    /// One-sigma uncertainties from `(JᵀJ)⁻¹` on the free parameters; fixed
    /// and tied parameters get 0.
    fn uncertainties(jac: &Array2<f64>, free: &[usize], n: usize) -> Option<Array1<f64>> {
        let covariance = cholesky_inverse(&jac.t().dot(jac))?;
        let mut perror = Array1::zeros(n);
        for (k, &i) in free.iter().enumerate() {
            perror[i] = covariance[[k, k]].max(0.0).sqrt();
        }
        Some(perror)
    }
}

impl Solver for LevenbergMarquardt {
    fn minimize(
        &self,
        problem: &dyn Problem,
        parinfo: &ParInfoTable,
        config: &SolverConfig,
    ) -> Result<SolverOutcome> {
        let initial = Array1::from(parinfo.values());

        let free = match Self::validate(parinfo, problem.residual_count()) {
            Ok(free) => free,
            Err(message) => return Ok(SolverOutcome::improper(initial, message)),
        };
        let ties = match TieSet::from_parinfo(parinfo) {
            Ok(ties) => ties,
            Err(e) => return Ok(SolverOutcome::improper(initial, format!("ERROR: {}", e))),
        };
        let params = match ties.applied(&initial) {
            Ok(params) => params,
            Err(e) => return Ok(SolverOutcome::improper(initial, format!("ERROR: {}", e))),
        };
        let problem = TiedProblem {
            inner: problem,
            ties: &ties,
        };

        // Ties may still fail mid-iteration, e.g. on a zero divisor.
        match Self::iterate(&problem, &ties, &free, params, parinfo, config) {
            Err(SpecFitError::Expression(e)) => Ok(SolverOutcome::improper(
                initial,
                format!("ERROR: tie expression failed: {}", e),
            )),
            outcome => outcome,
        }
    }
}

impl LevenbergMarquardt {
    fn iterate(
        problem: &TiedProblem<'_>,
        ties: &TieSet,
        free: &[usize],
        mut params: Array1<f64>,
        parinfo: &ParInfoTable,
        config: &SolverConfig,
    ) -> Result<SolverOutcome> {
        let n = params.len();
        let mut residuals = problem.eval(&params)?;
        let mut nfev = 1;
        if residuals.len() != problem.residual_count() || residuals.iter().any(|r| !r.is_finite()) {
            return Ok(SolverOutcome::improper(
                params,
                "ERROR: the model returned non-finite residuals at the starting point",
            ));
        }
        let mut cost = sum_of_squares(&residuals);

        debug!(
            "Starting Levenberg-Marquardt: {} free of {} parameters, {} ties, {} residuals",
            free.len(),
            n,
            ties.len(),
            residuals.len()
        );

        let mut lambda = config.initial_lambda;
        let mut niter = 0;
        let mut jac = finite_difference::jacobian(
            problem,
            &params,
            &residuals,
            free,
            parinfo,
            config.epsfcn,
        )?;
        nfev += free.len();

        let status = 'outer: loop {
            let gradient = jac.t().dot(&residuals);
            let gnorm = orthogonality(&jac, &gradient, cost.sqrt());
            if gnorm <= config.gtol {
                break FitStatus::Orthogonality;
            }
            if gnorm <= f64::EPSILON {
                break FitStatus::GtolTooSmall;
            }
            if niter >= config.max_iterations {
                break FitStatus::MaxIterations;
            }

            let jtj = jac.t().dot(&jac);
            let rhs = -&gradient;
            let xnorm = norm_over(&params, free);

            // Raise the damping until a step does not increase chi-square.
            loop {
                let mut damped = jtj.clone();
                for k in 0..free.len() {
                    damped[[k, k]] += lambda * jtj[[k, k]].max(f64::MIN_POSITIVE);
                }

                let accepted = match cholesky_solve(&damped, &rhs) {
                    Some(delta) => {
                        let mut trial = params.clone();
                        for (k, &i) in free.iter().enumerate() {
                            trial[i] = parinfo[i].clamp(params[i] + delta[k]);
                        }
                        let trial = ties.applied(&trial)?;
                        let trial_residuals = problem.eval(&trial)?;
                        nfev += 1;
                        let trial_cost = sum_of_squares(&trial_residuals);
                        (trial_cost.is_finite() && trial_cost <= cost)
                            .then_some((trial, trial_residuals, trial_cost))
                    }
                    None => None,
                };

                let Some((trial, trial_residuals, trial_cost)) = accepted else {
                    lambda *= config.lambda_up_factor;
                    if lambda > config.max_lambda {
                        break 'outer FitStatus::FtolTooSmall;
                    }
                    continue;
                };

                let step_norm = free
                    .iter()
                    .map(|&i| (trial[i] - params[i]).powi(2))
                    .sum::<f64>()
                    .sqrt();
                let reduction = if cost > 0.0 {
                    (cost - trial_cost) / cost
                } else {
                    0.0
                };

                params = trial;
                residuals = trial_residuals;
                cost = trial_cost;
                lambda = (lambda * config.lambda_down_factor).max(config.min_lambda);
                niter += 1;

                if !config.quiet {
                    info!(
                        "Iter {:>5}  CHI-SQUARE = {:.8e}  lambda = {:.2e}  params = {:?}",
                        niter,
                        cost,
                        lambda,
                        params.to_vec()
                    );
                }

                let f_converged = reduction <= config.ftol;
                let x_converged = step_norm <= config.xtol * xnorm;
                match (f_converged, x_converged) {
                    (true, true) => break 'outer FitStatus::BothConvergence,
                    (true, false) => break 'outer FitStatus::ChiSquareConvergence,
                    (false, true) => break 'outer FitStatus::ParameterConvergence,
                    (false, false) => {}
                }
                if reduction <= f64::EPSILON {
                    break 'outer FitStatus::FtolTooSmall;
                }
                if step_norm <= f64::EPSILON * xnorm {
                    break 'outer FitStatus::XtolTooSmall;
                }
                break;
            }

            jac = finite_difference::jacobian(
                problem,
                &params,
                &residuals,
                free,
                parinfo,
                config.epsfcn,
            )?;
            nfev += free.len();
        };

        // The Jacobian is stale after an accepted final step.
        if matches!(
            status,
            FitStatus::ChiSquareConvergence
                | FitStatus::ParameterConvergence
                | FitStatus::BothConvergence
                | FitStatus::FtolTooSmall
                | FitStatus::XtolTooSmall
        ) {
            jac = finite_difference::jacobian(
                problem,
                &params,
                &residuals,
                free,
                parinfo,
                config.epsfcn,
            )?;
            nfev += free.len();
        }
        let perror = Self::uncertainties(&jac, free, n);

        debug!(
            "Levenberg-Marquardt finished with status {} after {} iterations ({} evaluations)",
            status, niter, nfev
        );

        Ok(SolverOutcome {
            params,
            perror,
            status,
            errmsg: String::new(),
            fnorm: cost,
            niter,
            nfev,
        })
    }
}
