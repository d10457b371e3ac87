//! Post-fit queries on fitted models

use approx::assert_relative_eq;
use ndarray::{array, Array1};
use specfit_rs::error::Result;
use specfit_rs::{FitMode, FitOptions, FnModel, Kwargs, SpecFitError, SpectralAxis, SpectralModel};

use crate::test_helpers::{gaussian, gaussian_peaks};

fn line_model() -> Result<SpectralModel> {
    SpectralModel::new(
        FnModel::new(|x, p, _| Ok(x.mapv(|x| p[0] * x + p[1]))),
        2,
        FitMode::Multi,
        Kwargs::new().with("parnames", vec!["slope", "offset"]),
    )
}

#[test]
fn test_accessors_before_a_fit() {
    let model = SpectralModel::gaussian(Kwargs::new()).unwrap();
    assert!(matches!(model.slope(1.0), Err(SpecFitError::NoFitResult)));
    assert!(matches!(model.integral(), Err(SpecFitError::NoFitResult)));
    assert!(matches!(model.annotations(None), Err(SpecFitError::NoFitResult)));

    // Component curves need no fit
    let parts = model
        .components(&array![0.0, 1.0], &[1.0, 0.0, 1.0])
        .unwrap();
    assert_eq!(parts.len(), 1);
}

#[test]
fn test_slope_of_a_fitted_line() -> Result<()> {
    let x = Array1::linspace(0.0, 20.0, 41);
    let data = x.mapv(|x| -1.5 * x + 4.0);

    let mut model = line_model()?;
    model.fit(
        &SpectralAxis::from(x),
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new().with("params", vec![1.0, 0.0]),
    )?;

    // Per-sample differences: slope times the 0.5 spacing
    for x in [3.0, 10.2, 19.9] {
        assert_relative_eq!(model.slope(x)?, -0.75, epsilon = 1e-6);
    }
    assert_eq!(model.slope(-100.0)?, 0.0);
    Ok(())
}

#[test]
fn test_integral_is_the_sample_sum() -> Result<()> {
    let x = Array1::linspace(-10.0, 10.0, 401);
    let data = gaussian(&x, 1.0, 0.0, 1.0);

    let mut model = SpectralModel::gaussian(Kwargs::new())?;
    let output = model.fit(
        &SpectralAxis::from(x),
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new().with("params", vec![0.5, 0.5, 2.0]),
    )?;

    assert_eq!(model.integral()?, output.model.sum());
    // Twenty samples per unit: the sum is twenty times the area
    let area = (2.0 * std::f64::consts::PI).sqrt();
    assert_relative_eq!(model.integral()?, 20.0 * area, epsilon = 1e-3);
    Ok(())
}

#[test]
fn test_annotations_per_peak() -> Result<()> {
    let x = Array1::linspace(-10.0, 10.0, 201);
    let data = gaussian_peaks(&x, &[(1.0, -3.0, 1.0), (2.0, 4.0, 0.5)]);

    let mut model = SpectralModel::gaussian(Kwargs::new())?;
    let err = Array1::from_elem(x.len(), 0.01);
    model.fit(
        &SpectralAxis::from(x),
        &data,
        Some(&err),
        &FitOptions::default(),
        Kwargs::new()
            .with("npeaks", 2)
            .with("params", vec![0.8, -2.5, 1.2, 1.5, 3.5, 0.8]),
    )?;

    let labels = model.annotations(None)?;
    assert_eq!(labels.len(), 6);
    assert!(labels[0].starts_with("$A(0)$="));
    assert!(labels[1].starts_with("$\\Delta x(0)$="));
    assert!(labels[3].starts_with("$A(1)$="));
    assert!(labels[5].starts_with("$\\sigma(1)$="));
    assert!(labels.iter().all(|l| l.contains(" $\\pm$ ")));

    let custom = model.annotations(Some(&["h", "c"][..]))?;
    assert!(custom[2].starts_with("$h(0)$="));
    assert!(custom[3].starts_with("$c(1)$="));
    Ok(())
}

#[test]
fn test_components_of_fitted_peaks() -> Result<()> {
    let x = Array1::linspace(-10.0, 10.0, 201);
    let truth = [(1.0, -3.0, 1.0), (2.0, 4.0, 0.5)];
    let data = gaussian_peaks(&x, &truth);

    let mut model = SpectralModel::gaussian(Kwargs::new())?;
    let output = model.fit(
        &SpectralAxis::from(x.clone()),
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new()
            .with("npeaks", 2)
            .with("params", vec![0.8, -2.5, 1.2, 1.5, 3.5, 0.8]),
    )?;

    let parts = model.components(&x, &output.params.to_vec())?;
    assert_eq!(parts.len(), 2);
    let total = &parts[0].row(0) + &parts[1].row(0);
    for (a, b) in total.iter().zip(output.model.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-12);
    }

    assert!(matches!(
        model.components(&x, &[1.0, 0.0]),
        Err(SpecFitError::DimensionMismatch(_))
    ));
    Ok(())
}
