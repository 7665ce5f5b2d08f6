//! Vaccination-status grouping.

use ons_model::{Coord, LabeledArray, SUB_VAX_STATUS, VAX_STATUS};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::harmonize::UNVACCINATED;

/// Partition applied to `vax_status` labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupingMode {
    /// Unvaccinated against everything else.
    Binary,
    /// Unvaccinated and one group per number of doses.
    #[default]
    Doses,
}

pub const VACCINATED_ANY: &str = "Vaccinated 1+";

/// Dose groups with the keyword that selects their labels.
const DOSE_GROUPS: [(&str, &str); 4] = [
    ("Vaccinated 1 dose", "first"),
    ("Vaccinated 2 doses", "second"),
    ("Vaccinated 3 doses", "third"),
    ("Vaccinated 4 doses", "fourth"),
];

/// Splits `labels` into named groups, in group definition order.
///
/// In [`GroupingMode::Doses`] a label whose text names several doses
/// ("Fourth dose or second booster") joins the highest one, so no label
/// lands in two groups. Labels naming no dose are left out.
pub fn group_labels(labels: &[Coord], mode: GroupingMode) -> Vec<(String, Vec<Coord>)> {
    let is_unvaccinated = |label: &Coord| label.as_text() == Some(UNVACCINATED);
    let unvaccinated: Vec<Coord> = labels
        .iter()
        .filter(|label| is_unvaccinated(*label))
        .cloned()
        .collect();
    let mut groups = vec![(UNVACCINATED.to_string(), unvaccinated)];

    match mode {
        GroupingMode::Binary => {
            let others = labels
                .iter()
                .filter(|label| !is_unvaccinated(*label))
                .cloned()
                .collect();
            groups.push((VACCINATED_ANY.to_string(), others));
        }
        GroupingMode::Doses => {
            let mut doses: Vec<Vec<Coord>> = vec![Vec::new(); DOSE_GROUPS.len()];
            for label in labels.iter().filter(|label| !is_unvaccinated(*label)) {
                let text = label.to_string().to_lowercase();
                let slot = DOSE_GROUPS
                    .iter()
                    .rposition(|(_, keyword)| text.contains(keyword));
                match slot {
                    Some(slot) => doses[slot].push(label.clone()),
                    None => tracing::debug!(label = %label, "label matches no dose group"),
                }
            }
            groups.extend(
                DOSE_GROUPS
                    .iter()
                    .zip(doses)
                    .map(|((name, _), members)| ((*name).to_string(), members)),
            );
        }
    }
    groups
}

/// Replaces `vax_status` labels with their group and sums each group.
///
/// Groups without members are zero. The grouped dimension keeps the axis
/// position of the original one and the input is left untouched.
pub fn group_vax_status(array: &LabeledArray, mode: GroupingMode) -> Result<LabeledArray> {
    let order: Vec<String> = array.dim_names().into_iter().map(str::to_string).collect();
    let groups = group_labels(array.labels(VAX_STATUS)?, mode);

    let renamed = array.clone().rename_dim(VAX_STATUS, SUB_VAX_STATUS)?;
    let parts = groups
        .iter()
        .map(|(_, members)| renamed.select(SUB_VAX_STATUS, members))
        .collect::<ons_model::Result<Vec<_>>>()?;
    let names = groups
        .iter()
        .map(|(name, _)| Coord::from(name.as_str()))
        .collect();

    let stacked = LabeledArray::concat(&parts, VAX_STATUS, names)?;
    let summed = stacked.sum_over(SUB_VAX_STATUS)?;
    let order: Vec<&str> = order.iter().map(String::as_str).collect();
    Ok(summed.transpose(&order)?)
}
