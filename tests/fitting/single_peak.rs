//! Single-peak fits with a fitted constant background

use approx::assert_relative_eq;
use ndarray::Array1;
use specfit_rs::error::Result;
use specfit_rs::{FitMode, FitOptions, Kwargs, Lorentzian, SpectralAxis, SpectralModel};

use crate::test_helpers::evaluate;

fn lorentzian_model(mode: FitMode) -> Result<SpectralModel> {
    SpectralModel::new(
        Lorentzian,
        3,
        mode,
        Kwargs::new()
            .with("parnames", vec!["amplitude", "shift", "width"])
            .with("shortvarnames", vec!["A", "v", "\\gamma"]),
    )
}

#[test]
fn test_background_is_the_first_parameter() -> Result<()> {
    let x = Array1::linspace(-20.0, 20.0, 401);
    let data = evaluate(&Lorentzian, &x, &[3.0, 2.0, 1.5]) + 0.75;

    let mut model = lorentzian_model(FitMode::Single)?;
    let output = model.fit(
        &SpectralAxis::from(x),
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new().with("params", vec![0.0, 2.0, 1.0, 1.0]),
    )?;

    assert_eq!(output.params.len(), 4);
    assert_relative_eq!(output.params[0], 0.75, epsilon = 1e-6);
    assert_relative_eq!(output.params[1], 3.0, epsilon = 1e-6);
    assert_relative_eq!(output.params[2], 2.0, epsilon = 1e-6);
    assert_relative_eq!(output.params[3], 1.5, epsilon = 1e-6);

    let names: Vec<&str> = model.parinfo().iter().map(|p| p.parname.as_str()).collect();
    assert_eq!(names, vec!["HEIGHT0", "AMPLITUDE0", "SHIFT0", "WIDTH0"]);

    let labels = model.annotations(None)?;
    assert_eq!(labels.len(), 4);
    assert!(labels[0].starts_with("$B(0)$"));
    assert!(labels[3].starts_with("$\\gamma(0)$"));
    Ok(())
}

#[test]
fn test_single_mode_matches_multi_mode_without_background() -> Result<()> {
    let x = Array1::linspace(-20.0, 20.0, 401);
    let data = evaluate(&Lorentzian, &x, &[1.0, -1.0, 2.0]);
    let axis = SpectralAxis::from(x);

    let mut single = lorentzian_model(FitMode::Single)?;
    let with_height = single.fit(
        &axis,
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new()
            .with("params", vec![0.0, 0.5, 0.0, 1.0])
            .with("fixed", vec![true, false, false, false]),
    )?;

    let mut multi = lorentzian_model(FitMode::Multi)?;
    let without = multi.fit(
        &axis,
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new().with("params", vec![0.5, 0.0, 1.0]),
    )?;

    assert_eq!(with_height.params[0], 0.0);
    for i in 0..3 {
        assert_relative_eq!(with_height.params[i + 1], without.params[i], epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_extra_peaks_are_ignored() -> Result<()> {
    let x = Array1::linspace(-20.0, 20.0, 401);
    let data = evaluate(&Lorentzian, &x, &[2.0, 0.0, 1.0]) + 1.0;

    let mut model = lorentzian_model(FitMode::Single)?;
    let output = model.fit(
        &SpectralAxis::from(x),
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new()
            .with("npeaks", 3)
            .with("params", vec![0.5, 1.0, 0.5, 2.0]),
    )?;

    assert_eq!(output.params.len(), 4);
    assert_eq!(model.result().unwrap().npeaks, 1);
    // The multi-peak shape is untouched by a single-peak fit
    assert_eq!(model.spec().npeaks, 1);
    assert_eq!(model.spec().parnames.len(), 3);
    Ok(())
}
