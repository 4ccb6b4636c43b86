//! Path-addressed update operations over the form tree.
//!
//! Every operation takes the current tree by reference plus a path and a
//! payload, and returns a new tree; input trees are never mutated. The tree
//! is small and bounded, so reconstruct-along-path is a full clone rather
//! than a persistent-structure scheme.
//!
//! Paths that do not resolve indicate the caller's view of the tree is
//! stale. That is a contract violation and fails loudly; operations never
//! silently no-op and never partially apply.

use super::types::{
    FollowUpField, FormTree, HeaderField, Instance, InstanceId, Item, PhotoFile, Status,
};
use anyhow::{anyhow, bail, Result};
use std::fmt;

/// Address of an item: section and item positions, fixed at catalog time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPath {
    pub section: usize,
    pub item: usize,
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section {} item {}", self.section, self.item)
    }
}

/// Address of one instance: positional item plus the stable instance id.
///
/// Instances are addressed by id rather than position so that references
/// held across a sibling removal stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstancePath {
    pub section: usize,
    pub item: usize,
    pub instance: InstanceId,
}

impl InstancePath {
    pub fn item_path(self) -> ItemPath {
        ItemPath {
            section: self.section,
            item: self.item,
        }
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance {}", self.item_path(), self.instance)
    }
}

impl FormTree {
    /// Resolve an item path, failing loudly on a stale address.
    pub fn item(&self, path: ItemPath) -> Result<&Item> {
        self.sections
            .get(path.section)
            .and_then(|section| section.items.get(path.item))
            .ok_or_else(|| anyhow!("no item at {path}"))
    }

    /// Resolve an instance path, failing loudly on a stale address.
    pub fn instance(&self, path: InstancePath) -> Result<&Instance> {
        self.item(path.item_path())?
            .instances
            .iter()
            .find(|instance| instance.id == path.instance)
            .ok_or_else(|| anyhow!("no instance at {path}"))
    }

    /// Replace the status of the addressed instance.
    pub fn set_status(&self, path: InstancePath, status: Option<Status>) -> Result<FormTree> {
        self.with_instance(path, |instance| instance.status = status)
    }

    /// Replace the free-text description of the addressed instance.
    pub fn set_description(&self, path: InstancePath, text: &str) -> Result<FormTree> {
        self.with_instance(path, |instance| instance.description = text.to_string())
    }

    /// Replace the owning photo reference of the addressed instance.
    ///
    /// The caller is responsible for releasing any preview derived from the
    /// previous value; the tree holds only the raw file reference.
    pub fn set_photo(&self, path: InstancePath, photo: Option<PhotoFile>) -> Result<FormTree> {
        self.with_instance(path, |instance| instance.photo = photo)
    }

    /// Append a fresh unset instance to a repeatable item.
    ///
    /// Returns the new instance's id; prior instances keep their relative
    /// order and values.
    pub fn add_instance(&self, path: ItemPath) -> Result<(FormTree, InstanceId)> {
        let mut next = self.clone();
        let id = InstanceId(next.next_instance);
        let item = next.item_mut(path)?;
        if !item.repeatable {
            bail!("cannot add an instance to non-repeatable item {} at {path}", item.id);
        }
        item.instances.push(Instance::new(id));
        next.next_instance += 1;
        Ok((next, id))
    }

    /// Remove one instance of a repeatable item.
    ///
    /// Later instances shift down one position; their ids are unaffected.
    /// Callers holding per-instance state across the removal must key it by
    /// id captured before this call, never by position.
    pub fn remove_instance(&self, path: InstancePath) -> Result<FormTree> {
        let mut next = self.clone();
        let item = next.item_mut(path.item_path())?;
        if !item.repeatable {
            bail!(
                "cannot remove the instance of non-repeatable item {} at {}",
                item.id,
                path.item_path()
            );
        }
        let position = item
            .instances
            .iter()
            .position(|instance| instance.id == path.instance)
            .ok_or_else(|| anyhow!("no instance at {path}"))?;
        item.instances.remove(position);
        Ok(next)
    }

    /// Replace one header field. Total; no cross-field validation.
    pub fn set_header_field(&self, field: HeaderField, value: &str) -> FormTree {
        let mut next = self.clone();
        let slot = match field {
            HeaderField::AssessmentDate => &mut next.header.assessment_date,
            HeaderField::AreaLocation => &mut next.header.area_location,
            HeaderField::AssessorName => &mut next.header.assessor_name,
        };
        *slot = value.to_string();
        next
    }

    /// Replace one follow-up field. Total; no cross-field validation.
    pub fn set_follow_up_field(&self, field: FollowUpField, value: &str) -> FormTree {
        let mut next = self.clone();
        let slot = match field {
            FollowUpField::Summary => &mut next.follow_up.summary,
            FollowUpField::Recommendations => &mut next.follow_up.recommendations,
            FollowUpField::PersonInCharge => &mut next.follow_up.person_in_charge,
            FollowUpField::TargetDate => &mut next.follow_up.target_date,
        };
        *slot = value.to_string();
        next
    }

    fn item_mut(&mut self, path: ItemPath) -> Result<&mut Item> {
        self.sections
            .get_mut(path.section)
            .and_then(|section| section.items.get_mut(path.item))
            .ok_or_else(|| anyhow!("no item at {path}"))
    }

    fn with_instance(
        &self,
        path: InstancePath,
        apply: impl FnOnce(&mut Instance),
    ) -> Result<FormTree> {
        let mut next = self.clone();
        let instance = next
            .item_mut(path.item_path())?
            .instances
            .iter_mut()
            .find(|instance| instance.id == path.instance)
            .ok_or_else(|| anyhow!("no instance at {path}"))?;
        apply(instance);
        Ok(next)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
