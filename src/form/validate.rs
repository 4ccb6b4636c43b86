//! Whole-tree validation and submit readiness.
//!
//! Any edit anywhere can change overall readiness, so every pass scans the
//! full tree instead of updating incrementally. Every instance of every item
//! in every section is in scope; there is no skip mechanism. A repeatable
//! item reduced to zero instances contributes no rows and therefore nothing
//! to validate.

use super::types::{FormTree, InstanceId, Status};
use serde::Serialize;

/// Why an instance blocks submission.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingStatus,
    MissingDescription,
}

impl ViolationKind {
    /// Inline message rendered next to the violated row.
    pub fn message(self) -> &'static str {
        match self {
            ViolationKind::MissingStatus => "status not assessed",
            ViolationKind::MissingDescription => "Not OK needs a note",
        }
    }
}

/// One violated instance, addressed precisely enough to mark its row.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Violation {
    pub section: usize,
    pub item: usize,
    pub instance: usize,
    pub instance_id: InstanceId,
    pub item_id: String,
    pub kind: ViolationKind,
}

/// Result of one validation pass.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub ready: bool,
}

impl ValidationReport {
    pub fn is_violated(&self, id: InstanceId) -> bool {
        self.violations
            .iter()
            .any(|violation| violation.instance_id == id)
    }

    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }
}

/// Scan the whole tree and report every incomplete instance.
///
/// An instance is incomplete when its status is unset, or when it is Not OK
/// without a non-blank description. Photos are always optional.
pub fn evaluate(tree: &FormTree) -> ValidationReport {
    let mut violations = Vec::new();
    for (section_idx, section) in tree.sections.iter().enumerate() {
        for (item_idx, item) in section.items.iter().enumerate() {
            for (instance_idx, instance) in item.instances.iter().enumerate() {
                let kind = match instance.status {
                    None => Some(ViolationKind::MissingStatus),
                    Some(Status::NotOk) if instance.description.trim().is_empty() => {
                        Some(ViolationKind::MissingDescription)
                    }
                    Some(_) => None,
                };
                if let Some(kind) = kind {
                    violations.push(Violation {
                        section: section_idx,
                        item: item_idx,
                        instance: instance_idx,
                        instance_id: instance.id,
                        item_id: item.id.clone(),
                        kind,
                    });
                }
            }
        }
    }
    let ready = violations.is_empty();
    ValidationReport { violations, ready }
}
