//! Saving and reloading descriptor tables

use approx::assert_relative_eq;
use ndarray::Array1;
use specfit_rs::error::Result;
use specfit_rs::{FitOptions, Kwargs, ParInfoTable, SpectralAxis, SpectralModel};
use tempfile::tempdir;

use crate::test_helpers::gaussian;

#[test]
fn test_fitted_table_round_trips_through_a_file() -> Result<()> {
    let x = Array1::linspace(-5.0, 5.0, 101);
    let data = gaussian(&x, 1.2, -0.4, 0.6);
    let axis = SpectralAxis::from(x);

    let mut model = SpectralModel::gaussian(Kwargs::new())?;
    model.fit(
        &axis,
        &data,
        None,
        &FitOptions::default(),
        Kwargs::new()
            .with("params", vec![1.0, 0.0, 1.0])
            .with("tied", vec!["", "", ""])
            .with("negamp", false),
    )?;

    let dir = tempdir()?;
    let path = dir.path().join("parinfo.json");
    model.parinfo().save(&path)?;

    let loaded = ParInfoTable::load(&path)?;
    assert_eq!(&loaded, model.parinfo());
    assert_relative_eq!(loaded[0].value, 1.2, epsilon = 1e-6);
    assert_eq!(loaded[0].limited, (true, false));

    // The reloaded table seeds a second fit verbatim
    let output = model.fit(
        &axis,
        &data,
        None,
        &FitOptions::default().with_parinfo(loaded),
        Kwargs::new(),
    )?;
    assert_relative_eq!(output.params[1], -0.4, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_json_layout() -> Result<()> {
    let model = SpectralModel::gaussian(Kwargs::new().with("params", vec![1.0, 2.0, 3.0]))?;
    let json = model.parinfo().to_json()?;

    let value: serde_json::Value = serde_json::from_str(&json)?;
    let entries = value.as_array().expect("table serializes as a list");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1]["parname"], "SHIFT0");
    assert_eq!(entries[1]["value"], 2.0);
    assert_eq!(entries[2]["tied"], "");

    assert!(ParInfoTable::from_json("{\"not\": \"a table\"}").is_err());
    Ok(())
}
