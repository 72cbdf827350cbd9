use std::collections::BTreeSet;

use crate::types::Party;

/// Verdict of a local contract-key visibility check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VisibleByKey {
    Visible,
    /// The submitter's party sets are carried for diagnostics.
    NotVisible {
        act_as: BTreeSet<Party>,
        read_as: BTreeSet<Party>,
    },
}

impl VisibleByKey {
    /// Derive a visibility predicate from the submitter's `act_as` and
    /// `read_as` party sets.
    ///
    /// A stakeholder set is visible iff it intersects
    /// `act_as ∪ read_as`. The union is computed once; the returned
    /// predicate is pure and safe to share across checks.
    pub fn from_submitters(
        act_as: BTreeSet<Party>,
        read_as: BTreeSet<Party>,
    ) -> impl Fn(&BTreeSet<Party>) -> VisibleByKey {
        let readers: BTreeSet<Party> = act_as.union(&read_as).cloned().collect();
        move |stakeholders| {
            if readers.intersection(stakeholders).next().is_some() {
                VisibleByKey::Visible
            } else {
                VisibleByKey::NotVisible {
                    act_as: act_as.clone(),
                    read_as: read_as.clone(),
                }
            }
        }
    }
}
