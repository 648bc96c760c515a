//! Pure decision core: what to run, given what we found and what the
//! operator said. I/O stays at the boundary.

use crate::confirm::Confirmation;
use crate::descriptor::{IndexSpec, SECONDARY_INDEXES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableExistence {
    Present,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairAction {
    CreateTable,
    CreateIndex(&'static IndexSpec),
}

/// Mutating statements to issue. Empty when the table is present (the
/// diagnostic path is read-only) or when the operator declined.
pub fn plan_repair(existence: TableExistence, confirmation: Confirmation) -> Vec<RepairAction> {
    match (existence, confirmation) {
        (TableExistence::Absent, Confirmation::Accepted) => {
            let mut actions = vec![RepairAction::CreateTable];
            actions.extend(SECONDARY_INDEXES.iter().map(RepairAction::CreateIndex));
            actions
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_table_plans_nothing() {
        assert!(plan_repair(TableExistence::Present, Confirmation::Accepted).is_empty());
        assert!(plan_repair(TableExistence::Present, Confirmation::Declined).is_empty());
    }

    #[test]
    fn declined_repair_plans_nothing() {
        assert!(plan_repair(TableExistence::Absent, Confirmation::Declined).is_empty());
    }

    #[test]
    fn accepted_repair_plans_create_then_indexes() {
        let actions = plan_repair(TableExistence::Absent, Confirmation::Accepted);
        assert_eq!(actions.len(), 4);
        assert_eq!(actions[0], RepairAction::CreateTable);
        for (action, spec) in actions[1..].iter().zip(SECONDARY_INDEXES.iter()) {
            assert_eq!(*action, RepairAction::CreateIndex(spec));
        }
    }
}
