use anyhow::{Context, Result};
use std::path::Path;

use jv_core::{IndustryRecord, VacancyRecord};

use crate::InputArgs;

/// Both input tables of a run.
pub(crate) struct Inputs {
    pub totals: Vec<VacancyRecord>,
    pub industries: Vec<IndustryRecord>,
}

impl Inputs {
    pub(crate) fn load(args: &InputArgs) -> Result<Self> {
        let inputs = Self {
            totals: load_totals(&args.totals)?,
            industries: load_industries(&args.industries)?,
        };
        tracing::info!(
            totals = inputs.totals.len(),
            industries = inputs.industries.len(),
            "inputs loaded"
        );
        Ok(inputs)
    }
}

pub(crate) fn load_totals(path: &Path) -> Result<Vec<VacancyRecord>> {
    tracing::info!(path = %path.display(), "loading aggregate table");
    jv_data::load_totals(path).with_context(|| format!("failed to load {}", path.display()))
}

pub(crate) fn load_industries(path: &Path) -> Result<Vec<IndustryRecord>> {
    tracing::info!(path = %path.display(), "loading industry table");
    jv_data::load_industries(path).with_context(|| format!("failed to load {}", path.display()))
}
