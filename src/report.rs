//! Readiness-gated hand-off of a completed inspection.
//!
//! Downstream export (PDF rendering, transmission) belongs to host
//! applications; this module only writes the plain JSON snapshot they
//! consume and enforces the one contract that matters at the boundary: no
//! artifact exists unless the tree validated clean.

use crate::form::validate::ValidationReport;
use crate::form::FormTree;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Write the report artifact for a submit-ready tree.
///
/// Refuses while readiness is false; the caller surfaces the error inline
/// instead of handing off a partial inspection.
pub fn write_report(tree: &FormTree, validation: &ValidationReport, out: &Path) -> Result<()> {
    if !validation.ready {
        bail!(
            "submission blocked: {} unresolved finding(s)",
            validation.violations.len()
        );
    }
    let json = serde_json::to_string_pretty(tree).context("serialize report")?;
    std::fs::write(out, json).with_context(|| format!("write report {}", out.display()))?;
    tracing::info!(path = %out.display(), "inspection report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogItem, CatalogSection};
    use crate::form::validate::evaluate;
    use crate::form::{InstancePath, Status};

    fn ready_tree() -> FormTree {
        let tree = Catalog {
            sections: vec![CatalogSection {
                title: "1. Housekeeping".to_string(),
                items: vec![CatalogItem {
                    id: "1.1".to_string(),
                    label: "Pintu".to_string(),
                    repeatable: true,
                }],
            }],
        }
        .seed();
        let path = InstancePath {
            section: 0,
            item: 0,
            instance: tree.sections[0].items[0].instances[0].id,
        };
        tree.set_status(path, Some(Status::Ok)).expect("set status")
    }

    #[test]
    fn refuses_while_not_ready() {
        let tree = Catalog {
            sections: vec![CatalogSection {
                title: "1. Housekeeping".to_string(),
                items: vec![CatalogItem {
                    id: "1.1".to_string(),
                    label: "Pintu".to_string(),
                    repeatable: true,
                }],
            }],
        }
        .seed();
        let validation = evaluate(&tree);
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("report.json");

        let err = write_report(&tree, &validation, &out).expect_err("must refuse");
        assert!(err.to_string().contains("submission blocked"), "{err}");
        assert!(!out.exists());
    }

    #[test]
    fn writes_snapshot_when_ready() {
        let tree = ready_tree();
        let validation = evaluate(&tree);
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("report.json");

        write_report(&tree, &validation, &out).expect("write report");

        let content = std::fs::read_to_string(&out).expect("read report");
        let raw: serde_json::Value = serde_json::from_str(&content).expect("parse report");
        assert_eq!(raw["sections"][0]["items"][0]["id"], "1.1");
        assert_eq!(
            raw["sections"][0]["items"][0]["instances"][0]["status"],
            "ok"
        );
    }
}
