//! Editor state: the current tree, its validation snapshot, and navigation.
//!
//! Every mutation goes through one of the dispatch methods below: the engine
//! produces a new tree, the old one is swapped out wholesale, and validation
//! recomputes before the next draw. Preview slots are keyed by instance id,
//! captured before any operation that shifts positions.

use super::Tab;
use crate::catalog::Catalog;
use crate::form::validate::{self, ValidationReport};
use crate::form::{
    FollowUpField, FormTree, HeaderField, InstanceId, InstancePath, ItemPath, PhotoFile, Status,
};
use crate::preview::{PreviewBinder, PreviewHandle, TempDirAllocator};
use crate::report;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// One visible row of the assessment tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Row {
    Section(usize),
    Instance {
        section: usize,
        item: usize,
        instance: usize,
    },
    /// Repeatable item with no instances left; keeps the add affordance.
    EmptyItem { section: usize, item: usize },
}

/// Which value the footer input line is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum InputTarget {
    Description(InstancePath),
    PhotoPath(InstancePath),
    Header(HeaderField),
    FollowUp(FollowUpField),
}

/// Line-editor state for the footer input.
#[derive(Debug)]
pub(super) struct Input {
    pub(super) target: InputTarget,
    pub(super) buffer: String,
}

pub(super) struct App {
    pub(super) tree: FormTree,
    pub(super) validation: ValidationReport,
    binder: PreviewBinder<TempDirAllocator>,
    out: PathBuf,
    pub(super) tab: Tab,
    pub(super) selection: [usize; 3],
    pub(super) input: Option<Input>,
    pub(super) message: Option<String>,
    pub(super) show_help: bool,
}

impl App {
    pub(super) fn new(catalog: &Catalog, out: &Path) -> Result<Self> {
        let tree = catalog.seed();
        let validation = validate::evaluate(&tree);
        Ok(Self {
            tree,
            validation,
            binder: PreviewBinder::new(TempDirAllocator::new()?),
            out: out.to_path_buf(),
            tab: Tab::Header,
            selection: [0; 3],
            input: None,
            message: None,
            show_help: false,
        })
    }

    /// Flat row model of the assessment tab, rebuilt from the current tree.
    pub(super) fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for (section_idx, section) in self.tree.sections.iter().enumerate() {
            rows.push(Row::Section(section_idx));
            for (item_idx, item) in section.items.iter().enumerate() {
                if item.instances.is_empty() {
                    rows.push(Row::EmptyItem {
                        section: section_idx,
                        item: item_idx,
                    });
                }
                for instance_idx in 0..item.instances.len() {
                    rows.push(Row::Instance {
                        section: section_idx,
                        item: item_idx,
                        instance: instance_idx,
                    });
                }
            }
        }
        rows
    }

    pub(super) fn visible_len(&self, tab: Tab) -> usize {
        match tab {
            Tab::Header => HeaderField::ALL.len(),
            Tab::Sections => self.rows().len(),
            Tab::FollowUp => FollowUpField::ALL.len(),
        }
    }

    pub(super) fn selected_row(&self) -> Option<Row> {
        self.rows()
            .get(self.selection[Tab::Sections.index()])
            .copied()
    }

    fn selected_instance_path(&self) -> Option<InstancePath> {
        match self.selected_row()? {
            Row::Instance {
                section,
                item,
                instance,
            } => {
                let id = self
                    .tree
                    .sections
                    .get(section)?
                    .items
                    .get(item)?
                    .instances
                    .get(instance)?
                    .id;
                Some(InstancePath {
                    section,
                    item,
                    instance: id,
                })
            }
            _ => None,
        }
    }

    fn selected_item_path(&self) -> Option<ItemPath> {
        match self.selected_row()? {
            Row::Section(_) => None,
            Row::Instance { section, item, .. } | Row::EmptyItem { section, item } => {
                Some(ItemPath { section, item })
            }
        }
    }

    pub(super) fn next_tab(&mut self) {
        let idx = (self.tab.index() + 1) % Tab::ALL.len();
        self.tab = Tab::ALL[idx];
        self.clamp_selection();
    }

    pub(super) fn prev_tab(&mut self) {
        let idx = if self.tab.index() == 0 {
            Tab::ALL.len() - 1
        } else {
            self.tab.index() - 1
        };
        self.tab = Tab::ALL[idx];
        self.clamp_selection();
    }

    pub(super) fn move_selection(&mut self, delta: isize) {
        let idx = self.tab.index();
        let max = self.visible_len(self.tab);
        if max == 0 {
            self.selection[idx] = 0;
            return;
        }
        let next = self.selection[idx] as isize + delta;
        self.selection[idx] = next.clamp(0, max as isize - 1) as usize;
    }

    pub(super) fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub(super) fn set_message(&mut self, message: String) {
        self.message = Some(message);
    }

    fn clamp_selection(&mut self) {
        for tab in Tab::ALL {
            let idx = tab.index();
            let max = self.visible_len(tab);
            if max == 0 {
                self.selection[idx] = 0;
            } else if self.selection[idx] >= max {
                self.selection[idx] = max - 1;
            }
        }
    }

    fn revalidate(&mut self) {
        self.validation = validate::evaluate(&self.tree);
    }

    fn commit(&mut self, result: Result<FormTree>, action: &str) {
        match result {
            Ok(tree) => {
                self.tree = tree;
                self.revalidate();
            }
            Err(err) => self.set_message(format!("{action} failed: {err}")),
        }
    }

    pub(super) fn set_status_selected(&mut self, status: Option<Status>) {
        let Some(path) = self.selected_instance_path() else {
            self.set_message("select an item instance first".to_string());
            return;
        };
        let result = self.tree.set_status(path, status);
        self.commit(result, "set status");
    }

    pub(super) fn add_instance_selected(&mut self) {
        let Some(path) = self.selected_item_path() else {
            self.set_message("select an item first".to_string());
            return;
        };
        match self.tree.add_instance(path) {
            Ok((tree, id)) => {
                self.tree = tree;
                self.revalidate();
                self.select_instance(id);
            }
            Err(err) => self.set_message(format!("add instance failed: {err}")),
        }
    }

    pub(super) fn remove_instance_selected(&mut self) {
        let Some(path) = self.selected_instance_path() else {
            self.set_message("select an item instance first".to_string());
            return;
        };
        // The id is captured before positions shift; the preview slot is
        // keyed by it, never by the row index.
        match self.tree.remove_instance(path) {
            Ok(tree) => {
                self.binder.clear(path.instance);
                self.tree = tree;
                self.revalidate();
                self.clamp_selection();
            }
            Err(err) => self.set_message(format!("remove instance failed: {err}")),
        }
    }

    /// Enter on a row: edit the instance note or the field value.
    pub(super) fn begin_edit(&mut self) {
        match self.tab {
            Tab::Header => {
                let field = HeaderField::ALL[self.selection[Tab::Header.index()]];
                self.input = Some(Input {
                    target: InputTarget::Header(field),
                    buffer: self.tree.header_field(field).to_string(),
                });
            }
            Tab::FollowUp => {
                let field = FollowUpField::ALL[self.selection[Tab::FollowUp.index()]];
                self.input = Some(Input {
                    target: InputTarget::FollowUp(field),
                    buffer: self.tree.follow_up_field(field).to_string(),
                });
            }
            Tab::Sections => {
                let Some(path) = self.selected_instance_path() else {
                    return;
                };
                let buffer = self
                    .tree
                    .instance(path)
                    .map(|instance| instance.description.clone())
                    .unwrap_or_default();
                self.input = Some(Input {
                    target: InputTarget::Description(path),
                    buffer,
                });
            }
        }
    }

    pub(super) fn begin_photo_edit(&mut self) {
        let Some(path) = self.selected_instance_path() else {
            self.set_message("select an item instance first".to_string());
            return;
        };
        let buffer = self
            .tree
            .instance(path)
            .ok()
            .and_then(|instance| instance.photo.as_ref())
            .map(|photo| photo.path.display().to_string())
            .unwrap_or_default();
        self.input = Some(Input {
            target: InputTarget::PhotoPath(path),
            buffer,
        });
    }

    pub(super) fn input_push(&mut self, c: char) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.push(c);
        }
    }

    pub(super) fn input_backspace(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.pop();
        }
    }

    pub(super) fn cancel_input(&mut self) {
        self.input = None;
    }

    pub(super) fn commit_input(&mut self) {
        let Some(input) = self.input.take() else {
            return;
        };
        match input.target {
            InputTarget::Description(path) => {
                let result = self.tree.set_description(path, &input.buffer);
                self.commit(result, "set note");
            }
            InputTarget::PhotoPath(path) => self.attach_photo(path, input.buffer.trim()),
            InputTarget::Header(field) => {
                self.tree = self.tree.set_header_field(field, &input.buffer);
                self.revalidate();
            }
            InputTarget::FollowUp(field) => {
                self.tree = self.tree.set_follow_up_field(field, &input.buffer);
                self.revalidate();
            }
        }
    }

    fn attach_photo(&mut self, path: InstancePath, raw: &str) {
        if raw.is_empty() {
            self.clear_photo_at(path);
            return;
        }
        // Non-image selections are dropped without a message and previous
        // state retained, same as ignoring a non-image drop.
        let Some(photo) = PhotoFile::from_path(raw) else {
            return;
        };
        if !photo.path.is_file() {
            self.set_message(format!("no such file: {}", photo.path.display()));
            return;
        }
        match self.tree.set_photo(path, Some(photo.clone())) {
            Ok(tree) => {
                self.tree = tree;
                self.revalidate();
                if let Err(err) = self.binder.bind(path.instance, &photo) {
                    self.set_message(format!("preview failed: {err}"));
                }
            }
            Err(err) => self.set_message(format!("attach photo failed: {err}")),
        }
    }

    pub(super) fn clear_photo_selected(&mut self) {
        let Some(path) = self.selected_instance_path() else {
            self.set_message("select an item instance first".to_string());
            return;
        };
        self.clear_photo_at(path);
    }

    fn clear_photo_at(&mut self, path: InstancePath) {
        match self.tree.set_photo(path, None) {
            Ok(tree) => {
                self.binder.clear(path.instance);
                self.tree = tree;
                self.revalidate();
            }
            Err(err) => self.set_message(format!("clear photo failed: {err}")),
        }
    }

    pub(super) fn selected_preview(&self) -> Option<&PreviewHandle> {
        let path = self.selected_instance_path()?;
        self.binder.get(path.instance)
    }

    pub(super) fn out_path(&self) -> &Path {
        &self.out
    }

    pub(super) fn submit(&mut self) {
        if !self.validation.ready {
            let count = self.validation.violations.len();
            self.jump_to_first_violation();
            self.set_message(format!("submission blocked: {count} unresolved finding(s)"));
            return;
        }
        match report::write_report(&self.tree, &self.validation, &self.out) {
            Ok(()) => self.set_message(format!("report written to {}", self.out.display())),
            Err(err) => self.set_message(format!("submit failed: {err}")),
        }
    }

    fn jump_to_first_violation(&mut self) {
        let Some(first) = self.validation.first() else {
            return;
        };
        let target = first.instance_id;
        self.tab = Tab::Sections;
        self.select_instance(target);
    }

    fn select_instance(&mut self, id: InstanceId) {
        let found = self.rows().iter().position(|row| match row {
            Row::Instance {
                section,
                item,
                instance,
            } => self.tree.sections[*section].items[*item].instances[*instance].id == id,
            _ => false,
        });
        if let Some(index) = found {
            self.selection[Tab::Sections.index()] = index;
        }
    }
}
