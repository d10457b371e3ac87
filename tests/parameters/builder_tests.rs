//! Tests for descriptor construction through the public API

use specfit_rs::parameters::{make_parinfo, ParameterSpec, DEFAULT_SHORT_NAMES};
use specfit_rs::{FitMode, Gaussian, Kwargs, SpecFitError, SpectralModel};

fn names() -> Kwargs {
    Kwargs::new().with("parnames", vec!["amp", "center", "width"])
}

#[test]
fn test_every_keyword_form() {
    let build = make_parinfo(
        3,
        None,
        names()
            .with("npeaks", 2)
            .with("params", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .with("parsteps", vec![0.0, 0.1, 0.0, 0.0, 0.1, 0.0])
            .with("parfixed", vec![false, false, true, false, false, true])
            .with("parerror", vec![0.5; 6])
            .with("partied", vec!["", "", "", "AMP0 * 2", "", ""])
            .with("limitedmin", vec![true, false, false, true, false, false])
            .with("limitedmax", vec![false; 6])
            .with("minpars", vec![0.0; 6])
            .with("maxpars", vec![10.0; 6])
            .with("parlimited", vec![(true, true); 6])
            .with("shortvarnames", vec!["a", "c", "w"]),
    )
    .unwrap();

    let table = &build.parinfo;
    assert_eq!(table.len(), 6);
    assert_eq!(table[4].value, 5.0);
    assert_eq!(table[4].step, 0.1);
    assert!(table[5].fixed);
    assert_eq!(table[0].error, 0.5);
    assert_eq!(table[3].tied, "AMP0 * 2");
    assert!(table[3].is_tied());
    // minpars/maxpars replace the limits synthesized from limitedmin/limitedmax
    assert_eq!(table[1].limits, (0.0, 10.0));
    assert_eq!(table[1].limited, (true, true));

    assert_eq!(build.spec.shortvarnames, vec!["a", "c", "w"]);
    assert!(build.remaining.is_empty());
}

#[test]
fn test_unknown_keywords_are_passed_through() {
    let build = make_parinfo(
        3,
        None,
        names()
            .with("params", vec![1.0, 0.0, 1.0])
            .with("maxiter", 50)
            .with("linewidth", 2.0),
    )
    .unwrap();
    let mut remaining: Vec<&str> = build.remaining.keys().collect();
    remaining.sort_unstable();
    assert_eq!(remaining, vec!["linewidth", "maxiter"]);
}

#[test]
fn test_default_spec() {
    let spec = ParameterSpec::default();
    assert!(spec.parnames.is_empty());
    assert_eq!(spec.shortvarnames, DEFAULT_SHORT_NAMES.to_vec());
    assert_eq!(spec.fitunits, None);
    assert_eq!(spec.npeaks, 1);
}

#[test]
fn test_wrapper_construction_errors() {
    assert!(matches!(
        SpectralModel::new(Gaussian, 3, FitMode::Multi, Kwargs::new()),
        Err(SpecFitError::InvalidInput(_))
    ));
    assert!(matches!(
        SpectralModel::new(
            Gaussian,
            3,
            FitMode::Multi,
            Kwargs::new().with("parnames", vec!["amp", "center"])
        ),
        Err(SpecFitError::DimensionMismatch(_))
    ));
    assert!(matches!(
        SpectralModel::new(
            Gaussian,
            3,
            FitMode::Multi,
            names().with("npeaks", 2).with("params", vec![1.0, 0.0, 1.0])
        ),
        Err(SpecFitError::DimensionMismatch(_))
    ));
    assert!(matches!(
        SpectralModel::new(Gaussian, 3, FitMode::Multi, names().with("negamp", "yes")),
        Err(SpecFitError::InvalidKeyword { .. })
    ));
}

#[test]
fn test_amplitude_marker_drives_negamp() {
    let build = make_parinfo(
        3,
        None,
        Kwargs::new()
            .with("parnames", vec!["amp", "center", "width"])
            .with("npeaks", 2)
            .with("negamp", true),
    )
    .unwrap();
    let constrained: Vec<usize> = build
        .parinfo
        .iter()
        .filter(|p| p.limited.1)
        .map(|p| p.n)
        .collect();
    assert_eq!(constrained, vec![0, 3]);
    assert!(build.parinfo.iter().all(|p| !p.limited.0));
}
