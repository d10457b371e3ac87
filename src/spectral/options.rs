//! Per-call fit options.

use crate::parameters::ParInfoTable;

/// Verbosity switches and an optional descriptor-table override for one fit.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Suppress per-iteration solver progress. Default: true
    pub quiet: bool,

    /// Log status, parameters with errors and chi-square after the fit.
    /// Default: false
    pub very_verbose: bool,

    /// Log the descriptor table and ties, and fail on a NaN chi-square
    /// instead of warning. Default: false
    pub debug: bool,

    /// Table handed to the solver verbatim instead of the one built from
    /// keywords. It is not validated. Default: None
    pub parinfo: Option<ParInfoTable>,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            quiet: true,
            very_verbose: false,
            debug: false,
            parinfo: None,
        }
    }
}

impl FitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_very_verbose(mut self, very_verbose: bool) -> Self {
        self.very_verbose = very_verbose;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_parinfo(mut self, parinfo: ParInfoTable) -> Self {
        self.parinfo = Some(parinfo);
        self
    }
}
