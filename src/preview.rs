//! Preview lifecycle for attached photos.
//!
//! A preview handle is a short-lived, display-only resource derived from the
//! selected file, distinct from the file itself. The binder owns at most one
//! live handle per instance photo slot and pairs every allocation with
//! exactly one release: released before replacement, released on clear, and
//! released on teardown when the editor stops observing the slots. Handles
//! are not clonable, so a release consumes the only copy.

use crate::form::{InstanceId, PhotoFile};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Display-only reference derived from a selected photo.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    seq: u64,
    path: PathBuf,
}

impl PreviewHandle {
    /// Location an image viewer can open.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Allocation seam between the binder and the resource it manages.
///
/// Production code materializes files; tests count calls to prove the
/// pairing invariant.
pub trait PreviewAllocator {
    fn allocate(&mut self, photo: &PhotoFile) -> Result<PreviewHandle>;
    fn release(&mut self, handle: PreviewHandle);
}

/// Production allocator: copies each photo into a session temp directory so
/// an external viewer can open it without touching the original file. The
/// directory itself disappears with the session.
pub struct TempDirAllocator {
    dir: TempDir,
    next_seq: u64,
}

impl TempDirAllocator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir().context("create preview directory")?,
            next_seq: 0,
        })
    }
}

impl PreviewAllocator for TempDirAllocator {
    fn allocate(&mut self, photo: &PhotoFile) -> Result<PreviewHandle> {
        let seq = self.next_seq;
        self.next_seq += 1;
        let target = self.dir.path().join(format!("{seq:04}-{}", photo.file_name()));
        std::fs::copy(&photo.path, &target)
            .with_context(|| format!("copy {} into preview directory", photo.path.display()))?;
        tracing::debug!(seq, path = %target.display(), "preview allocated");
        Ok(PreviewHandle { seq, path: target })
    }

    fn release(&mut self, handle: PreviewHandle) {
        std::fs::remove_file(&handle.path).ok();
        tracing::debug!(seq = handle.seq, "preview released");
    }
}

/// Owns the preview handle of every photo slot in one editing session.
///
/// Slots are keyed by `InstanceId`, so index shifts after an instance
/// removal can never strand or double-release a handle.
pub struct PreviewBinder<A: PreviewAllocator> {
    allocator: A,
    slots: HashMap<InstanceId, PreviewHandle>,
}

impl<A: PreviewAllocator> PreviewBinder<A> {
    pub fn new(allocator: A) -> Self {
        Self {
            allocator,
            slots: HashMap::new(),
        }
    }

    /// Bind a newly selected photo to a slot.
    ///
    /// The slot's previous handle, if any, is released before the new one is
    /// allocated. On allocation failure the slot is left empty.
    pub fn bind(&mut self, slot: InstanceId, photo: &PhotoFile) -> Result<()> {
        if let Some(old) = self.slots.remove(&slot) {
            self.allocator.release(old);
        }
        let handle = self.allocator.allocate(photo)?;
        self.slots.insert(slot, handle);
        Ok(())
    }

    /// Clear a slot, releasing its handle if one is live.
    pub fn clear(&mut self, slot: InstanceId) {
        if let Some(handle) = self.slots.remove(&slot) {
            self.allocator.release(handle);
        }
    }

    pub fn get(&self, slot: InstanceId) -> Option<&PreviewHandle> {
        self.slots.get(&slot)
    }

    /// Release every outstanding handle. Also runs on drop, so a binder
    /// going out of scope cannot leak.
    pub fn release_all(&mut self) {
        for (_, handle) in self.slots.drain() {
            self.allocator.release(handle);
        }
    }
}

impl<A: PreviewAllocator> Drop for PreviewBinder<A> {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Ledger {
        allocated: u64,
        released: u64,
        live: BTreeSet<u64>,
    }

    /// Allocator that records every call and panics on a double release.
    struct CountingAllocator {
        ledger: Rc<RefCell<Ledger>>,
        next_seq: u64,
        fail_next: bool,
    }

    impl CountingAllocator {
        fn new() -> (Self, Rc<RefCell<Ledger>>) {
            let ledger = Rc::new(RefCell::new(Ledger::default()));
            (
                Self {
                    ledger: Rc::clone(&ledger),
                    next_seq: 0,
                    fail_next: false,
                },
                ledger,
            )
        }
    }

    impl PreviewAllocator for CountingAllocator {
        fn allocate(&mut self, _photo: &PhotoFile) -> Result<PreviewHandle> {
            if self.fail_next {
                self.fail_next = false;
                anyhow::bail!("simulated allocation failure");
            }
            let seq = self.next_seq;
            self.next_seq += 1;
            let mut ledger = self.ledger.borrow_mut();
            ledger.allocated += 1;
            ledger.live.insert(seq);
            Ok(PreviewHandle {
                seq,
                path: PathBuf::from(format!("preview-{seq}")),
            })
        }

        fn release(&mut self, handle: PreviewHandle) {
            let mut ledger = self.ledger.borrow_mut();
            assert!(
                ledger.live.remove(&handle.seq),
                "double release of handle {}",
                handle.seq
            );
            ledger.released += 1;
        }
    }

    fn photo() -> PhotoFile {
        PhotoFile::from_path("/tmp/door.png").expect("image path")
    }

    const SLOT_A: InstanceId = InstanceId(1);
    const SLOT_B: InstanceId = InstanceId(2);

    #[test]
    fn replace_releases_before_allocating() {
        let (allocator, ledger) = CountingAllocator::new();
        let mut binder = PreviewBinder::new(allocator);

        binder.bind(SLOT_A, &photo()).expect("first bind");
        binder.bind(SLOT_A, &photo()).expect("second bind");

        let snapshot = ledger.borrow();
        assert_eq!(snapshot.allocated, 2);
        assert_eq!(snapshot.released, 1);
        assert_eq!(snapshot.live.len(), 1);
    }

    #[test]
    fn clear_releases_and_is_idempotent() {
        let (allocator, ledger) = CountingAllocator::new();
        let mut binder = PreviewBinder::new(allocator);

        binder.bind(SLOT_A, &photo()).expect("bind");
        binder.clear(SLOT_A);
        binder.clear(SLOT_A);
        binder.clear(SLOT_B);

        let snapshot = ledger.borrow();
        assert_eq!(snapshot.allocated, 1);
        assert_eq!(snapshot.released, 1);
        assert!(snapshot.live.is_empty());
    }

    #[test]
    fn drop_releases_every_outstanding_handle() {
        let (allocator, ledger) = CountingAllocator::new();
        {
            let mut binder = PreviewBinder::new(allocator);
            binder.bind(SLOT_A, &photo()).expect("bind a");
            binder.bind(SLOT_B, &photo()).expect("bind b");
        }
        let snapshot = ledger.borrow();
        assert_eq!(snapshot.allocated, snapshot.released);
        assert!(snapshot.live.is_empty());
    }

    #[test]
    fn alloc_and_release_pair_over_a_long_session() {
        let (allocator, ledger) = CountingAllocator::new();
        let mut binder = PreviewBinder::new(allocator);

        for round in 0..10 {
            binder.bind(SLOT_A, &photo()).expect("bind");
            if round % 3 == 0 {
                binder.clear(SLOT_A);
            }
        }
        binder.release_all();

        let snapshot = ledger.borrow();
        assert_eq!(snapshot.allocated, 10);
        assert_eq!(snapshot.released, 10);
        assert!(snapshot.live.is_empty());
    }

    #[test]
    fn failed_allocation_leaves_the_slot_empty() {
        let (allocator, ledger) = CountingAllocator::new();
        let mut binder = PreviewBinder::new(allocator);
        binder.bind(SLOT_A, &photo()).expect("bind");

        // A replacement whose allocation fails must still release the old
        // handle and leave nothing live in the slot.
        binder.allocator.fail_next = true;
        binder.bind(SLOT_A, &photo()).expect_err("allocation fails");
        assert!(binder.get(SLOT_A).is_none());

        let snapshot = ledger.borrow();
        assert_eq!(snapshot.allocated, 1);
        assert_eq!(snapshot.released, 1);
        assert!(snapshot.live.is_empty());
    }

    #[test]
    fn tempdir_allocator_materializes_and_removes_files() {
        let source_dir = tempfile::tempdir().expect("source dir");
        let source = source_dir.path().join("door.png");
        std::fs::write(&source, b"not really a png").expect("write source");
        let photo = PhotoFile::from_path(&source).expect("image path");

        let mut allocator = TempDirAllocator::new().expect("allocator");
        let handle = allocator.allocate(&photo).expect("allocate");
        assert!(handle.path().is_file());
        assert_ne!(handle.path(), photo.path.as_path());

        let preview_path = handle.path().to_path_buf();
        allocator.release(handle);
        assert!(!preview_path.exists());
        assert!(source.is_file(), "original photo must be untouched");
    }
}
