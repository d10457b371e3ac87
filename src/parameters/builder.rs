//! Parameter descriptor builder.
//!
//! Normalizes keyword input into a [`ParInfoTable`]. Each per-parameter
//! argument may be given under its canonical `par`-prefixed key or its legacy
//! short alias; convenience pair forms (`limitedmin`/`limitedmax`,
//! `minpars`/`maxpars`) synthesize the limits sequence. Keys consumed here are
//! removed from the keyword map, and whatever is left is returned for the
//! caller to forward.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpecFitError};
use crate::kwargs::{KwValue, Kwargs};
use crate::parameters::descriptor::{ParInfo, ParInfoTable};

/// Short display names used when none have been supplied.
pub const DEFAULT_SHORT_NAMES: [&str; 3] = ["A", "\\Delta x", "\\sigma"];

/// Per-parameter sequence accepted by the builder.
#[derive(Debug, Clone, Copy)]
enum Field {
    Names,
    Values,
    Steps,
    Limits,
    Limited,
    Fixed,
    Errors,
    Tied,
}

/// Canonical key and its legacy aliases. Aliases are consulted first and the
/// first non-empty value wins; every listed key is consumed.
const PRECEDENCE: [(Field, &str, &[&str]); 8] = [
    (Field::Names, "parnames", &["names"]),
    (Field::Values, "parvalues", &["values"]),
    (Field::Steps, "parsteps", &["steps"]),
    (Field::Limits, "parlimits", &["limits"]),
    (Field::Limited, "parlimited", &["limited"]),
    (Field::Fixed, "parfixed", &["fixed"]),
    (Field::Errors, "parerror", &["error"]),
    (Field::Tied, "partied", &["tied"]),
];

/// Naming and shape of a model's parameters, carried from one build to the
/// next so that later calls can omit what earlier ones supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Base name per within-peak parameter
    pub parnames: Vec<String>,

    /// Annotation labels, recycled when shorter than the parameter count
    pub shortvarnames: Vec<String>,

    /// Axis unit the model expects, if any
    pub fitunits: Option<String>,

    /// Peak count used when a call does not give one
    pub npeaks: usize,
}

impl Default for ParameterSpec {
    fn default() -> Self {
        Self {
            parnames: Vec::new(),
            shortvarnames: DEFAULT_SHORT_NAMES.iter().map(|s| s.to_string()).collect(),
            fitunits: None,
            npeaks: 1,
        }
    }
}

/// Output of [`make_parinfo`].
#[derive(Debug, Clone)]
pub struct ParInfoBuild {
    pub parinfo: ParInfoTable,
    pub spec: ParameterSpec,
    /// Keywords not consumed by parameter construction
    pub remaining: Kwargs,
}

/// Per-parameter sequences after alias resolution.
#[derive(Debug, Default)]
struct ParameterInput {
    names: Option<Vec<String>>,
    values: Option<Vec<f64>>,
    steps: Option<Vec<f64>>,
    limits: Option<Vec<(f64, f64)>>,
    limited: Option<Vec<(bool, bool)>>,
    fixed: Option<Vec<bool>>,
    errors: Option<Vec<f64>>,
    tied: Option<Vec<String>>,
}

impl ParameterInput {
    fn resolve(kwargs: &mut Kwargs) -> Result<Self> {
        let mut input = Self::default();
        for (field, canonical, aliases) in PRECEDENCE {
            let mut found: Option<KwValue> = None;
            for key in aliases.iter().copied().chain(std::iter::once(canonical)) {
                if let Some(value) = kwargs.take(key) {
                    found.get_or_insert(value);
                }
            }
            let Some(value) = found else {
                continue;
            };
            match field {
                Field::Names => input.names = Some(value.into_strings(canonical)?),
                Field::Values => input.values = Some(value.into_floats(canonical)?),
                Field::Steps => input.steps = Some(value.into_floats(canonical)?),
                Field::Limits => input.limits = Some(value.into_float_pairs(canonical)?),
                Field::Limited => input.limited = Some(value.into_bool_pairs(canonical)?),
                Field::Fixed => input.fixed = Some(value.into_bools(canonical)?),
                Field::Errors => input.errors = Some(value.into_floats(canonical)?),
                Field::Tied => input.tied = Some(value.into_strings(canonical)?),
            }
        }
        Ok(input)
    }
}

/// Pair up a lower and an upper sequence; a missing side reads as false (0).
fn synthesize_limits(
    lower: Option<KwValue>,
    upper: Option<KwValue>,
    lower_key: &str,
    upper_key: &str,
) -> Result<Option<Vec<(f64, f64)>>> {
    let lower = lower.map(|v| v.into_floats(lower_key)).transpose()?;
    let upper = upper.map(|v| v.into_floats(upper_key)).transpose()?;
    Ok(match (lower, upper) {
        (Some(lo), Some(hi)) => Some(lo.into_iter().zip(hi).collect()),
        (Some(lo), None) => Some(lo.into_iter().map(|l| (l, 0.0)).collect()),
        (None, Some(hi)) => Some(hi.into_iter().map(|h| (0.0, h)).collect()),
        (None, None) => None,
    })
}

fn require_len<T>(key: &str, seq: &Option<Vec<T>>, total: usize) -> Result<()> {
    match seq {
        Some(v) if v.len() < total => Err(SpecFitError::DimensionMismatch(format!(
            "'{}' has {} entries but {} parameters are required",
            key,
            v.len(),
            total
        ))),
        _ => Ok(()),
    }
}

/// Build the descriptor table for `npars` parameters per peak.
///
/// `previous` supplies names, unit and peak count that this call does not
/// override. The function is pure: the same inputs always give the same table.
///
/// # Errors
///
/// * `ConflictingArguments` when `params` and `parvalues` (or `values`) are
///   both non-empty
/// * `InvalidInput` when no parameter names are available
/// * `DimensionMismatch` when a supplied sequence is too short
/// * `InvalidKeyword` when a key holds the wrong kind of value
pub fn make_parinfo(
    npars: usize,
    previous: Option<&ParameterSpec>,
    mut kwargs: Kwargs,
) -> Result<ParInfoBuild> {
    let mut input = ParameterInput::resolve(&mut kwargs)?;

    if let Some(params) = kwargs.take("params") {
        if input.values.is_some() {
            return Err(SpecFitError::ConflictingArguments(
                "parvalues and params both specified; they're redundant so that's not allowed"
                    .to_string(),
            ));
        }
        input.values = Some(params.into_floats("params")?);
    }

    let defaults = ParameterSpec::default();
    let previous = previous.unwrap_or(&defaults);

    let parnames = match input.names.take() {
        Some(names) => names,
        None if !previous.parnames.is_empty() => previous.parnames.clone(),
        None => {
            return Err(SpecFitError::InvalidInput(
                "no parameter names supplied".to_string(),
            ))
        }
    };
    if parnames.len() < npars {
        return Err(SpecFitError::DimensionMismatch(format!(
            "{} parameter names given for a model with {} parameters",
            parnames.len(),
            npars
        )));
    }

    let shortvarnames = match kwargs.take("shortvarnames") {
        Some(v) => v.into_strings("shortvarnames")?,
        None => previous.shortvarnames.clone(),
    };

    let limitedmin = kwargs.take("limitedmin");
    let limitedmax = kwargs.take("limitedmax");
    let minpars = kwargs.take("minpars");
    let maxpars = kwargs.take("maxpars");
    if let Some(limits) = synthesize_limits(limitedmin, limitedmax, "limitedmin", "limitedmax")? {
        input.limits = Some(limits);
    }
    if let Some(limits) = synthesize_limits(minpars, maxpars, "minpars", "maxpars")? {
        input.limits = Some(limits);
    }

    let fitunits = match kwargs.take("fitunits") {
        Some(v) => Some(v.into_string("fitunits")?),
        None => previous.fitunits.clone(),
    };
    let npeaks = match kwargs.take("npeaks") {
        Some(v) => v.as_count("npeaks")?,
        None => previous.npeaks,
    };
    let negamp = kwargs
        .take("negamp")
        .map(|v| v.as_bool("negamp"))
        .transpose()?;

    let total = npars * npeaks;
    require_len("parvalues", &input.values, total)?;
    require_len("parsteps", &input.steps, total)?;
    require_len("parlimits", &input.limits, total)?;
    require_len("parlimited", &input.limited, total)?;
    require_len("parfixed", &input.fixed, total)?;
    require_len("parerror", &input.errors, total)?;
    require_len("partied", &input.tied, total)?;

    let pick = |seq: &Option<Vec<f64>>, n: usize| seq.as_ref().map_or(0.0, |v| v[n]);

    // Peak-major: the flat vector is [peak0 params..., peak1 params..., ...]
    let mut parinfo: ParInfoTable = (0..npeaks)
        .flat_map(|jj| (0..npars).map(move |ii| (jj, ii)))
        .map(|(jj, ii)| {
            let n = ii + npars * jj;
            ParInfo {
                n,
                value: pick(&input.values, n),
                step: pick(&input.steps, n),
                limits: input.limits.as_ref().map_or((0.0, 0.0), |v| v[n]),
                limited: input.limited.as_ref().map_or((false, false), |v| v[n]),
                fixed: input.fixed.as_ref().map_or(false, |v| v[n]),
                parname: format!("{}{}", parnames[ii].to_uppercase(), jj),
                error: pick(&input.errors, n),
                tied: input.tied.as_ref().map_or_else(String::new, |v| v[n].clone()),
            }
        })
        .collect();

    parinfo.apply_negamp(negamp);

    Ok(ParInfoBuild {
        parinfo,
        spec: ParameterSpec {
            parnames,
            shortvarnames,
            fitunits,
            npeaks,
        },
        remaining: kwargs,
    })
}
