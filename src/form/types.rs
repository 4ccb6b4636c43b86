//! Form tree types for one inspection session.
//!
//! The tree mirrors the catalog shape (sections holding items) and adds the
//! per-item instance rows that carry the actual assessment values. The tree
//! is owned by exactly one editing session and replaced wholesale on every
//! mutation; see `engine` for the update operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Assessment outcome recorded for a single item instance.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    NotOk,
    Na,
}

impl Status {
    /// Return the stable string identifier used in report artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::NotOk => "not_ok",
            Status::Na => "na",
        }
    }

    /// Label shown on the paper form and in the editor.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::NotOk => "Not OK",
            Status::Na => "N/A",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of an instance, independent of its position.
///
/// Positions shift when a sibling instance is removed; ids never change and
/// are never reused within a session. Anything holding a reference across
/// mutations (preview slots, violation markers) keys on the id.
#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct InstanceId(pub(crate) u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// File extensions accepted as photo attachments.
const IMAGE_EXTENSIONS: &[&str] = &["bmp", "gif", "jpeg", "jpg", "png", "webp"];

/// Photo attached to an instance: the selected file itself, not a preview.
///
/// Preview resources derived from the file live in `crate::preview` and are
/// released whenever this reference is replaced or dropped from the tree.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub path: PathBuf,
}

impl PhotoFile {
    /// Accept an image-typed file, or `None` for anything else.
    ///
    /// Non-image selections are dropped without an error so callers retain
    /// their previous state, matching the selection boundary contract.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        IMAGE_EXTENSIONS
            .contains(&ext.as_str())
            .then_some(Self { path })
    }

    /// File name shown next to the instance row.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("photo")
    }
}

/// One concrete evaluation of an item.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Instance {
    pub id: InstanceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoFile>,
}

impl Instance {
    pub(crate) fn new(id: InstanceId) -> Self {
        Self {
            id,
            status: None,
            description: String::new(),
            photo: None,
        }
    }
}

/// A checklist question with its evaluated instances.
///
/// Non-repeatable items keep exactly one instance for their entire lifetime.
/// Repeatable items start with one and may gain or lose instances at runtime.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub label: String,
    pub repeatable: bool,
    pub instances: Vec<Instance>,
}

/// Fixed group of items, set at catalog-load time and never altered after.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub items: Vec<Item>,
}

/// Header metadata for the visit. Free text, no cross-field invariant.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HeaderData {
    #[serde(default)]
    pub assessment_date: String,
    #[serde(default)]
    pub area_location: String,
    #[serde(default)]
    pub assessor_name: String,
}

/// Follow-up actions recorded at the end of the walk. Free text only.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct FollowUpData {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendations: String,
    #[serde(default)]
    pub person_in_charge: String,
    #[serde(default)]
    pub target_date: String,
}

/// Header field selector for flat record updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    AssessmentDate,
    AreaLocation,
    AssessorName,
}

impl HeaderField {
    pub const ALL: [HeaderField; 3] = [
        HeaderField::AssessmentDate,
        HeaderField::AreaLocation,
        HeaderField::AssessorName,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HeaderField::AssessmentDate => "Assessment date",
            HeaderField::AreaLocation => "Area / location",
            HeaderField::AssessorName => "Assessor name",
        }
    }
}

/// Follow-up field selector for flat record updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpField {
    Summary,
    Recommendations,
    PersonInCharge,
    TargetDate,
}

impl FollowUpField {
    pub const ALL: [FollowUpField; 4] = [
        FollowUpField::Summary,
        FollowUpField::Recommendations,
        FollowUpField::PersonInCharge,
        FollowUpField::TargetDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FollowUpField::Summary => "Summary of findings",
            FollowUpField::Recommendations => "Recommendations",
            FollowUpField::PersonInCharge => "Person in charge",
            FollowUpField::TargetDate => "Target date",
        }
    }
}

/// Root aggregate owned by one editing session.
///
/// Created once from the catalog, discarded at session end; there is no
/// durable storage beyond the report hand-off.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FormTree {
    pub header: HeaderData,
    pub sections: Vec<Section>,
    pub follow_up: FollowUpData,
    /// Next unassigned instance id; ids are never reused within a session.
    pub(crate) next_instance: u64,
}

impl FormTree {
    /// Field access for header record updates.
    pub fn header_field(&self, field: HeaderField) -> &str {
        match field {
            HeaderField::AssessmentDate => &self.header.assessment_date,
            HeaderField::AreaLocation => &self.header.area_location,
            HeaderField::AssessorName => &self.header.assessor_name,
        }
    }

    /// Field access for follow-up record updates.
    pub fn follow_up_field(&self, field: FollowUpField) -> &str {
        match field {
            FollowUpField::Summary => &self.follow_up.summary,
            FollowUpField::Recommendations => &self.follow_up.recommendations,
            FollowUpField::PersonInCharge => &self.follow_up.person_in_charge,
            FollowUpField::TargetDate => &self.follow_up.target_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PhotoFile;

    #[test]
    fn accepts_common_image_extensions() {
        for name in ["a.jpg", "b.JPEG", "c.png", "d.webp"] {
            assert!(PhotoFile::from_path(name).is_some(), "rejected {name}");
        }
    }

    #[test]
    fn silently_rejects_non_image_files() {
        for name in ["notes.txt", "report.pdf", "archive.tar.gz", "noext"] {
            assert!(PhotoFile::from_path(name).is_none(), "accepted {name}");
        }
    }

    #[test]
    fn file_name_falls_back_for_odd_paths() {
        let photo = PhotoFile::from_path("/tmp/site/door.png").expect("image path");
        assert_eq!(photo.file_name(), "door.png");
    }
}
