//! Multi-peak fits

use approx::assert_relative_eq;
use ndarray::{array, Array1};
use specfit_rs::error::Result;
use specfit_rs::{
    FitOptions, FitStatus, Kwargs, Lorentzian, NPeakModel, SpecFitError, SpectralAxis,
    SpectralModel,
};
use std::sync::Arc;

use crate::test_helpers::{array_approx_eq, evaluate, gaussian, gaussian_peaks, with_noise};

#[test]
fn test_composer_is_a_superposition() {
    let x = Array1::linspace(-10.0, 10.0, 81);
    let composer = NPeakModel::new(Arc::new(Lorentzian), 3, Kwargs::new());

    let pars = [1.0, -3.0, 0.5, 2.0, 0.0, 1.0, 0.5, 4.0, 2.0];
    let total = composer.evaluate(&x, &pars).unwrap();
    let expected = evaluate(&Lorentzian, &x, &pars[0..3])
        + evaluate(&Lorentzian, &x, &pars[3..6])
        + evaluate(&Lorentzian, &x, &pars[6..9]);

    assert!(array_approx_eq(&total, &expected, 1e-14));
}

#[test]
fn test_single_gaussian_recovers_parameters() -> Result<()> {
    let x = Array1::linspace(-10.0, 10.0, 201);
    let data = gaussian(&x, 2.5, 1.2, 0.9);

    let mut model = SpectralModel::gaussian(Kwargs::new())?;
    let output = model.fit(
        &SpectralAxis::from(x),
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new().with("params", vec![1.0, 0.0, 1.5]),
    )?;

    assert_relative_eq!(output.params[0], 2.5, epsilon = 1e-6);
    assert_relative_eq!(output.params[1], 1.2, epsilon = 1e-6);
    assert_relative_eq!(output.params[2], 0.9, epsilon = 1e-6);
    assert!(output.chi2 < 1e-12);
    assert!(array_approx_eq(&output.model, &data, 1e-6));

    let result = model.result().unwrap();
    assert!(!result.status.is_failure());
    assert_ne!(result.status, FitStatus::ImproperInput);
    assert_eq!(result.dof(), 201 - 3);
    Ok(())
}

#[test]
fn test_three_peaks_with_noise() -> Result<()> {
    let x = Array1::linspace(0.0, 30.0, 301);
    let truth = [(1.0, 6.0, 1.0), (2.0, 15.0, 1.5), (0.7, 23.0, 0.8)];
    let data = with_noise(&gaussian_peaks(&x, &truth), 0.02, 42);
    let err = Array1::from_elem(x.len(), 0.02);

    let mut model = SpectralModel::gaussian(Kwargs::new())?;
    let output = model.fit(
        &SpectralAxis::from(x),
        &data,
        Some(&err),
        &FitOptions::default(),
        Kwargs::new().with("npeaks", 3).with(
            "params",
            vec![0.8, 5.5, 1.2, 1.5, 15.5, 1.2, 0.5, 22.5, 1.0],
        ),
    )?;

    assert_eq!(output.params.len(), 9);
    for (peak, &(a, c, w)) in truth.iter().enumerate() {
        assert_relative_eq!(output.params[3 * peak], a, epsilon = 0.05);
        assert_relative_eq!(output.params[3 * peak + 1], c, epsilon = 0.05);
        assert_relative_eq!(output.params[3 * peak + 2], w, epsilon = 0.05);
    }
    assert!(output.errors.iter().all(|&e| e > 0.0 && e < 0.1));

    // chi-square per point close to one for correctly weighted residuals
    let reduced = output.chi2 / 301.0;
    assert!(reduced > 0.1 && reduced < 1.0);

    let names: Vec<&str> = model.parinfo().iter().map(|p| p.parname.as_str()).collect();
    assert_eq!(names[3..6], ["AMPLITUDE1", "SHIFT1", "WIDTH1"]);
    assert_eq!(model.spec().npeaks, 3);
    Ok(())
}

#[test]
fn test_peak_count_is_remembered() -> Result<()> {
    let x = Array1::linspace(-10.0, 10.0, 201);
    let data = gaussian_peaks(&x, &[(1.0, -3.0, 1.0), (1.0, 3.0, 1.0)]);
    let axis = SpectralAxis::from(x);

    let mut model = SpectralModel::gaussian(Kwargs::new().with("npeaks", 2))?;
    let first = model.fit(
        &axis,
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new().with("params", vec![0.5, -2.0, 1.5, 0.5, 2.0, 1.5]),
    )?;

    // Shape and names come from the previous call
    let second = model.fit(
        &axis,
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new().with("params", first.params.to_vec()),
    )?;
    assert_eq!(second.params.len(), 6);
    assert_relative_eq!(second.params[4], 3.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_non_finite_data_is_ignored() -> Result<()> {
    let x = Array1::linspace(-5.0, 5.0, 101);
    let mut data = gaussian(&x, 1.5, 0.3, 0.7);
    data[10] = f64::NAN;
    data[50] = f64::INFINITY;
    let err = Array1::from_elem(x.len(), 0.1);

    let mut model = SpectralModel::gaussian(Kwargs::new())?;
    let output = model.fit(
        &SpectralAxis::from(x.clone()),
        &data,
        Some(&err),
        &FitOptions::default(),
        Kwargs::new().with("params", vec![1.0, 0.0, 1.0]),
    )?;

    assert_relative_eq!(output.params[0], 1.5, epsilon = 1e-6);
    assert_relative_eq!(output.params[1], 0.3, epsilon = 1e-6);
    assert!(output.chi2.is_finite());
    // The caller's arrays are left alone
    assert!(data[10].is_nan());
    assert_eq!(err[10], 0.1);

    let unweighted = model.fit(
        &SpectralAxis::from(x),
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new(),
    );
    assert!(matches!(unweighted, Err(SpecFitError::InvalidInput(_))));
    Ok(())
}

#[test]
fn test_conflicting_values() {
    let mut model = SpectralModel::gaussian(Kwargs::new()).unwrap();
    let result = model.fit(
        &SpectralAxis::from(array![0.0, 1.0, 2.0, 3.0]),
        &array![0.0, 1.0, 0.0, 0.0],
        None,
        &FitOptions::default(),
        Kwargs::new()
            .with("params", vec![1.0, 1.0, 1.0])
            .with("parvalues", vec![1.0, 1.0, 1.0]),
    );
    assert!(matches!(result, Err(SpecFitError::ConflictingArguments(_))));
    assert!(model.result().is_none());
}

#[test]
fn test_too_few_samples_is_improper() {
    let mut model = SpectralModel::gaussian(Kwargs::new()).unwrap();
    let result = model.fit(
        &SpectralAxis::from(array![0.0, 1.0]),
        &array![1.0, 0.5],
        None,
        &FitOptions::default(),
        Kwargs::new().with("params", vec![1.0, 0.0, 1.0]),
    );
    match result {
        Err(SpecFitError::SolverFailure { status, message }) => {
            assert_eq!(status, 0);
            assert!(message.starts_with("ERROR"));
        }
        other => panic!("expected a solver failure, got {:?}", other),
    }
}

#[test]
fn test_custom_model_with_options() -> Result<()> {
    use specfit_rs::FnModel;

    // A Gaussian whose width is scaled by a model keyword
    let model_fn = FnModel::new(|x, p, options| {
        let scale = match options.get("width_scale") {
            Some(specfit_rs::KwValue::Float(s)) => *s,
            _ => 1.0,
        };
        Ok(x.mapv(|x| p[0] * (-0.5 * ((x - p[1]) / (p[2] * scale)).powi(2)).exp()))
    });

    let x = Array1::linspace(-10.0, 10.0, 201);
    let data = gaussian(&x, 1.0, 0.0, 2.0);

    let mut model = SpectralModel::new(
        model_fn,
        3,
        specfit_rs::FitMode::Multi,
        Kwargs::new()
            .with("parnames", vec!["amplitude", "center", "width"])
            .with("width_scale", 2.0),
    )?;
    let output = model.fit(
        &SpectralAxis::from(x),
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new().with("params", vec![0.5, 0.5, 0.5]),
    )?;

    assert_relative_eq!(output.params[2], 1.0, epsilon = 1e-6);
    Ok(())
}
