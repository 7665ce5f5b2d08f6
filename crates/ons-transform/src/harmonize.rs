//! Label harmonization tables.
//!
//! Releases word the same variable or vaccination status differently. Each
//! table lists the accepted canonical labels and the aliases rewritten onto
//! them. Anything else is rejected in [`LabelMode::Strict`] and passed through
//! with a warning in [`LabelMode::Lenient`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError};

pub const ASMR: &str = "ASMR";
pub const NUMBER_OF_DEATHS: &str = "Number of deaths";
pub const UNVACCINATED: &str = "Unvaccinated";

/// How unknown labels are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelMode {
    /// Fail on labels missing from the tables.
    #[default]
    Strict,
    /// Keep unknown labels as they are and log a warning.
    Lenient,
}

/// Alias and canonical label lists for one dimension.
#[derive(Debug)]
pub struct LabelTable {
    dim: &'static str,
    aliases: &'static [(&'static str, &'static str)],
    canonical: &'static [&'static str],
}

impl LabelTable {
    pub const fn new(
        dim: &'static str,
        aliases: &'static [(&'static str, &'static str)],
        canonical: &'static [&'static str],
    ) -> Self {
        Self {
            dim,
            aliases,
            canonical,
        }
    }

    pub fn dim(&self) -> &'static str {
        self.dim
    }

    /// Canonical form of `label`, if the table knows it.
    pub fn lookup(&self, label: &str) -> Option<&'static str> {
        let label = label.trim();
        self.aliases
            .iter()
            .find(|(alias, _)| *alias == label)
            .map(|(_, canonical)| *canonical)
            .or_else(|| self.canonical.iter().copied().find(|c| *c == label))
    }

    /// Resolves `label` according to `mode`.
    pub fn resolve(&self, label: &str, mode: LabelMode) -> Result<String> {
        if let Some(canonical) = self.lookup(label) {
            return Ok(canonical.to_string());
        }
        let label = label.trim();
        match mode {
            LabelMode::Strict => Err(TransformError::UnrecognizedLabel {
                dim: self.dim.to_string(),
                label: label.to_string(),
            }),
            LabelMode::Lenient => {
                tracing::warn!(dim = self.dim, label, "keeping unrecognized label");
                Ok(label.to_string())
            }
        }
    }

    pub fn aliases(&self) -> &'static [(&'static str, &'static str)] {
        self.aliases
    }

    pub fn canonical(&self) -> &'static [&'static str] {
        self.canonical
    }
}

const RATE_ALIASES: [(&str, &str); 4] = [
    ("Rate per 100,000 population", ASMR),
    ("Age-standardised mortality rate / 100,000 person-years", ASMR),
    ("Age-standardised mortality rate per 100,000", ASMR),
    ("Age-standardised mortality rate per 100,000 person-years", ASMR),
];

const CONFIDENCE_ALIASES: [(&str, &str); 2] = [
    ("Lower 95% confidence limit", "Lower confidence limit"),
    ("Upper 95% confidence limit", "Upper confidence limit"),
];

const VARIABLES: [&str; 7] = [
    NUMBER_OF_DEATHS,
    "Population",
    "Person-years",
    "Percentage of all deaths",
    ASMR,
    "Lower confidence limit",
    "Upper confidence limit",
];

static LEGACY_VARIABLE_ALIASES: [(&str, &str); 6] = [
    RATE_ALIASES[0],
    RATE_ALIASES[1],
    RATE_ALIASES[2],
    RATE_ALIASES[3],
    CONFIDENCE_ALIASES[0],
    CONFIDENCE_ALIASES[1],
];

static CURRENT_VARIABLE_ALIASES: [(&str, &str); 7] = [
    RATE_ALIASES[0],
    RATE_ALIASES[1],
    RATE_ALIASES[2],
    RATE_ALIASES[3],
    CONFIDENCE_ALIASES[0],
    CONFIDENCE_ALIASES[1],
    ("Count of deaths", NUMBER_OF_DEATHS),
];

/// Variable labels of releases 0 to 3.
pub static LEGACY_VARIABLES: LabelTable =
    LabelTable::new("variable", &LEGACY_VARIABLE_ALIASES, &VARIABLES);

/// Variable labels of releases from version 4 on.
pub static CURRENT_VARIABLES: LabelTable =
    LabelTable::new("variable", &CURRENT_VARIABLE_ALIASES, &VARIABLES);

/// Vaccination status labels of every release.
pub static VAX_STATUSES: LabelTable = LabelTable::new(
    "vax_status",
    &[
        (
            "Deaths 21 days or more after first dose",
            "First dose, at least 21 days ago",
        ),
        (
            "Deaths within 21 days of first dose",
            "First dose, less than 21 days ago",
        ),
        (
            "21 days or more after first dose",
            "First dose, at least 21 days ago",
        ),
        (
            "21 days or more after second dose",
            "Second dose, at least 21 days ago",
        ),
        (
            "21 days or more after third dose or booster",
            "Third dose or booster, at least 21 days ago",
        ),
    ],
    &[
        UNVACCINATED,
        "Vaccinated",
        "Ever vaccinated",
        "First dose, less than 21 days ago",
        "First dose, at least 21 days ago",
        "Second dose, less than 21 days ago",
        "Second dose, at least 21 days ago",
        "Second dose, between 21 days and 6 months ago",
        "Second dose, at least 6 months ago",
        "Third dose or booster, less than 21 days ago",
        "Third dose or booster, at least 21 days ago",
        "Third dose or booster, between 21 days and 6 months ago",
        "Third dose or booster, at least 6 months ago",
        "Fourth dose or second booster, less than 21 days ago",
        "Fourth dose or second booster, at least 21 days ago",
        "Fourth dose or second booster, between 21 days and 6 months ago",
        "Fourth dose or second booster, at least 6 months ago",
    ],
);
