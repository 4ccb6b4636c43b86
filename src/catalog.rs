//! Catalog definitions that seed an inspection session.
//!
//! The catalog is an immutable configuration value: ordered sections, each
//! holding an ordered list of items. It is resolved once at startup (either
//! the built-in site-inspection catalog or a JSON file) and never mutated
//! afterwards; only the per-item instances vary at runtime.

use crate::form::{
    FollowUpData, FormTree, HeaderData, Instance, InstanceId, Item, Section,
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Item definition: stable id and label, plus whether instances can be
/// added and removed at runtime.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CatalogItem {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub repeatable: bool,
}

/// Section definition with a fixed, ordered item list.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CatalogSection {
    pub title: String,
    pub items: Vec<CatalogItem>,
}

/// Full catalog supplied once at session start.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    pub sections: Vec<CatalogSection>,
}

impl Catalog {
    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read catalog {}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&content)
            .with_context(|| format!("parse catalog {}", path.display()))?;
        catalog.check()?;
        Ok(catalog)
    }

    /// Seed the zero-progress form tree: one unset instance per item.
    pub fn seed(&self) -> FormTree {
        let mut next_instance = 1u64;
        let sections = self
            .sections
            .iter()
            .map(|section| Section {
                title: section.title.clone(),
                items: section
                    .items
                    .iter()
                    .map(|item| {
                        let id = InstanceId(next_instance);
                        next_instance += 1;
                        Item {
                            id: item.id.clone(),
                            label: item.label.clone(),
                            repeatable: item.repeatable,
                            instances: vec![Instance::new(id)],
                        }
                    })
                    .collect(),
            })
            .collect();
        FormTree {
            header: HeaderData::default(),
            sections,
            follow_up: FollowUpData::default(),
            next_instance,
        }
    }

    /// Reject catalogs that would break item addressing.
    fn check(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for section in &self.sections {
            if section.title.trim().is_empty() {
                bail!("catalog section with a blank title");
            }
            for item in &section.items {
                if item.id.trim().is_empty() || item.label.trim().is_empty() {
                    bail!("catalog item with a blank id or label in {}", section.title);
                }
                if !seen.insert(item.id.as_str()) {
                    bail!("duplicate catalog item id {}", item.id);
                }
            }
        }
        Ok(())
    }
}

/// Built-in site-inspection catalog used when no file is supplied.
pub fn default_catalog() -> Catalog {
    let section = |title: &str, items: &[(&str, &str)]| CatalogSection {
        title: title.to_string(),
        items: items
            .iter()
            .map(|(id, label)| CatalogItem {
                id: id.to_string(),
                label: label.to_string(),
                repeatable: true,
            })
            .collect(),
    };

    Catalog {
        sections: vec![
            section(
                "1. Housekeeping & Cleanliness",
                &[
                    ("1.1", "Dinding & Ventilasi"),
                    ("1.2", "Jendela"),
                    ("1.3", "Pintu"),
                    ("1.4", "Lantai & Tangga"),
                    ("1.5", "Jalur Pejalan Kaki"),
                    ("1.6", "Area Umum & Fasilitas"),
                    ("1.7", "Kebersihan Alat Berat"),
                    ("1.8", "Pengendalian Debu"),
                ],
            ),
            section(
                "2. Occupational Health & Safety",
                &[
                    ("2.1", "Penggunaan APD"),
                    ("2.2", "Rambu & Marka Keselamatan"),
                    ("2.3", "Titik Kumpul"),
                    ("2.4", "P3K & Fasilitas Medis"),
                    ("2.5", "Manajemen Kebisingan"),
                    ("2.6", "Manajemen Lalu Lintas Kendaraan Berat"),
                ],
            ),
            section(
                "3. Material & Product Management",
                &[
                    ("3.1", "Area Sampah Masuk/MSW"),
                    ("3.2", "Fasilitas Pengumpanan"),
                    ("3.3", "Proses RDF"),
                    ("3.4", "Produk RDF"),
                    ("3.5", "Penyimpanan RDF"),
                    ("3.6", "Kualitas Visual Produk RDF"),
                    ("3.7", "Ukuran"),
                    ("3.8", "Kelembaban"),
                    ("3.9", "Manajemen Lindi"),
                    ("3.10", "Kontrol Kualitas & Laboratorium (Sampel)"),
                ],
            ),
            section(
                "4. Equipment & Operational Condition",
                &[
                    ("4.1", "Kondisi Mesin (Shredder, Conveyor)"),
                    ("4.2", "Sistem Proteksi Mesin (Guard, Interlock)"),
                    ("4.3", "Pemantauan Kondisi Mesin"),
                    ("4.4", "Sistem Proteksi Kebakaran"),
                    ("4.5", "Sistem Deteksi & Pemadaman Api Otomatis"),
                ],
            ),
            section(
                "5. Environmental Management & Compliance",
                &[
                    ("5.1", "Sistem Manajemen Lindi"),
                    ("5.2", "Pengendalian Emisi Debu & Bau"),
                    ("5.3", "Manajemen Limbah B3 & Residu"),
                    ("5.4", "Kepatuhan terhadap Izin Lingkungan"),
                ],
            ),
            section(
                "6. Emergency Preparedness",
                &[
                    ("6.1", "Prosedur Tanggap Darurat (ERP)"),
                    ("6.2", "Sistem Alarm & Komunikasi Darurat"),
                    ("6.3", "Pelatihan & Simulasi Tanggap Darurat"),
                    ("6.4", "Ketersediaan APAR & Hidran"),
                ],
            ),
        ],
    }
}
