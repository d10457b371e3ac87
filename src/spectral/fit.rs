//! The fit driver.

use ndarray::Array1;
use tracing::{debug, info, warn};

use super::{FitMode, FitOptions, FitOutput, FitResult, FitWarning, SpectralModel};
use crate::axis::SpectralAxis;
use crate::error::{Result, SpecFitError};
use crate::kwargs::Kwargs;
use crate::lm::SolverConfig;
use crate::models::NPeakModel;
use crate::parameters::{make_parinfo, ParInfoTable, ParameterSpec};
use crate::problem::{sanitize, SpectrumProblem};

/// Shape of the parameter vector for one fit call.
struct FitPlan {
    npars: usize,
    previous: ParameterSpec,
    composer: NPeakModel,
}

impl SpectralModel {
    /// Fit the model to `data` sampled on `xax`.
    ///
    /// In [`FitMode::Multi`] this is [`fitter`](Self::fitter). In
    /// [`FitMode::Single`] the model is fitted as `height + f(x, p...)` with a
    /// single peak; parameter keywords then describe all `npars + 1`
    /// parameters, height first.
    pub fn fit(
        &mut self,
        xax: &SpectralAxis,
        data: &Array1<f64>,
        err: Option<&Array1<f64>>,
        options: &FitOptions,
        kwargs: Kwargs,
    ) -> Result<FitOutput> {
        match self.mode {
            FitMode::Multi => self.fitter(xax, data, err, options, kwargs),
            FitMode::Single => self.single_fitter(xax, data, err, options, kwargs),
        }
    }

    /// Multi-peak fit.
    ///
    /// Builds the descriptor table from `kwargs` (names, shape and unit fall
    /// back to the previous call), converts a copy of the axis to the fit unit
    /// when one is set, neutralizes non-finite data, and runs the solver on
    /// the residuals `(data - model) / err`. Keywords left after parameter
    /// construction configure the solver.
    ///
    /// # Errors
    ///
    /// * Any error from [`make_parinfo`]
    /// * `InvalidInput` when data contain NaN/Inf and `err` is `None`
    /// * `SolverFailure` when the solver reports status 0
    /// * `InvalidFit` when chi-square is NaN and `options.debug` is set
    /// * `InvalidKeyword` for a leftover keyword the solver does not accept
    pub fn fitter(
        &mut self,
        xax: &SpectralAxis,
        data: &Array1<f64>,
        err: Option<&Array1<f64>>,
        options: &FitOptions,
        kwargs: Kwargs,
    ) -> Result<FitOutput> {
        let plan = FitPlan {
            npars: self.npars,
            previous: self.spec.clone(),
            composer: self.n_modelfunc(),
        };
        let (output, spec) = self.run(plan, xax, data, err, options, kwargs)?;
        self.spec = spec;
        Ok(output)
    }

    fn single_fitter(
        &mut self,
        xax: &SpectralAxis,
        data: &Array1<f64>,
        err: Option<&Array1<f64>>,
        options: &FitOptions,
        mut kwargs: Kwargs,
    ) -> Result<FitOutput> {
        if let Some(value) = kwargs.take("npeaks") {
            let npeaks = value.as_count("npeaks")?;
            if npeaks != 1 {
                warn!(
                    "Single-peak fit requested with npeaks = {}; fitting one peak",
                    npeaks
                );
            }
        }
        let plan = FitPlan {
            npars: self.npars + 1,
            previous: self.vheight_spec(),
            composer: self.vheight_modelfunc(),
        };
        let (output, spec) = self.run(plan, xax, data, err, options, kwargs)?;
        self.spec.fitunits = spec.fitunits;
        Ok(output)
    }

    fn run(
        &mut self,
        plan: FitPlan,
        xax: &SpectralAxis,
        data: &Array1<f64>,
        err: Option<&Array1<f64>>,
        options: &FitOptions,
        kwargs: Kwargs,
    ) -> Result<(FitOutput, ParameterSpec)> {
        let build = make_parinfo(plan.npars, Some(&plan.previous), kwargs)?;
        let parinfo = match &options.parinfo {
            Some(table) => {
                debug!("Using user-specified parinfo table");
                table.clone()
            }
            None => build.parinfo,
        };

        let mut config = SolverConfig::default().with_quiet(options.quiet);
        config.apply_kwargs(build.remaining)?;

        // Some models depend on the axis unit; give those a converted copy.
        let fit_axis = match &build.spec.fitunits {
            Some(unit) => xax.converted(unit, options.quiet)?,
            None => xax.clone(),
        };

        let mut data = data.clone();
        let mut err = err.cloned();
        let replaced = sanitize(&mut data, err.as_mut())?;
        if replaced > 0 {
            debug!(
                "Replaced {} non-finite data values with 0 (error set to inf)",
                replaced
            );
        }

        if options.debug {
            log_parinfo(&parinfo);
        }

        let problem = SpectrumProblem::new(&plan.composer, fit_axis.values(), &data, err.as_ref())?;
        let outcome = self.solver.minimize(&problem, &parinfo, &config)?;
        if outcome.status.is_failure() {
            return Err(SpecFitError::SolverFailure {
                status: outcome.status.code(),
                message: outcome.errmsg,
            });
        }

        let params = outcome.params;
        let errors = outcome
            .perror
            .unwrap_or_else(|| Array1::zeros(params.len()));
        let chi2 = outcome.fnorm;

        if options.very_verbose {
            info!("Fit status: {}", outcome.status.code());
            info!("Fit error message: {}", outcome.errmsg);
            info!("Fit message: {}", outcome.status.message());
            for (i, (p, e)) in params.iter().zip(errors.iter()).enumerate() {
                let name = parinfo.get(i).map_or("", |info| info.parname.as_str());
                info!("{} {} +/- {}", name, p, e);
            }
            info!(
                "Chi2: {} Reduced Chi2: {} DOF: {}",
                chi2,
                chi2 / data.len() as f64,
                data.len() as i64 - params.len() as i64
            );
        }

        let values = params.to_vec();
        let model = plan.composer.evaluate(fit_axis.values(), &values)?;

        let mut table = parinfo;
        table.update_from_fit(&values, &errors.to_vec());
        let parnames = table.iter().map(|p| p.parname.clone()).collect();
        self.parinfo = table;

        // Kept even when the chi-square check below rejects the fit.
        self.result = Some(FitResult {
            params: params.clone(),
            errors: errors.clone(),
            status: outcome.status,
            chi2,
            model: model.clone(),
            xax: xax.clone(),
            npars: plan.npars,
            npeaks: plan.composer.peak_count(&values)?,
            parnames,
            shortvarnames: build.spec.shortvarnames.clone(),
            niter: outcome.niter,
            nfev: outcome.nfev,
            message: outcome.errmsg,
        });

        let mut warnings = Vec::new();
        if chi2.is_nan() {
            if options.debug {
                return Err(SpecFitError::InvalidFit("chi^2 is nan".to_string()));
            }
            warn!("chi^2 is nan");
            warnings.push(FitWarning::NanChiSquare);
        }

        Ok((
            FitOutput {
                params,
                model,
                errors,
                chi2,
                warnings,
            },
            build.spec,
        ))
    }
}

fn log_parinfo(parinfo: &ParInfoTable) {
    for p in parinfo.iter() {
        debug!("{:?}", p);
    }
    for p in parinfo.iter() {
        debug!("{} {}: {}", p.parname, p.n, p.tied);
    }
}
