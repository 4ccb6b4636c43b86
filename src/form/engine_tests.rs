use super::*;
use crate::catalog::{Catalog, CatalogItem, CatalogSection};

fn catalog(repeatable: bool) -> Catalog {
    Catalog {
        sections: vec![CatalogSection {
            title: "1. Housekeeping & Cleanliness".to_string(),
            items: vec![CatalogItem {
                id: "1.1".to_string(),
                label: "Pintu".to_string(),
                repeatable,
            }],
        }],
    }
}

fn seed(repeatable: bool) -> FormTree {
    catalog(repeatable).seed()
}

const ITEM: ItemPath = ItemPath {
    section: 0,
    item: 0,
};

fn instance_path(tree: &FormTree, index: usize) -> InstancePath {
    InstancePath {
        section: 0,
        item: 0,
        instance: tree.sections[0].items[0].instances[index].id,
    }
}

fn instances(tree: &FormTree) -> &[Instance] {
    &tree.sections[0].items[0].instances
}

#[test]
fn set_status_overwrites_without_residue() {
    let tree = seed(true);
    let path = instance_path(&tree, 0);

    let twice = tree
        .set_status(path, Some(Status::NotOk))
        .and_then(|tree| tree.set_status(path, Some(Status::Ok)))
        .expect("set status twice");
    let once = tree.set_status(path, Some(Status::Ok)).expect("set status");

    assert_eq!(twice, once);
}

#[test]
fn operations_do_not_mutate_their_input() {
    let tree = seed(true);
    let before = tree.clone();
    let path = instance_path(&tree, 0);

    tree.set_status(path, Some(Status::Ok)).expect("set status");
    tree.set_description(path, "rust on hinge").expect("set description");
    tree.add_instance(ITEM).expect("add instance");
    tree.set_header_field(HeaderField::AssessorName, "Sari");

    assert_eq!(tree, before);
}

#[test]
fn add_then_remove_roundtrips() {
    let tree = seed(true);
    let (grown, added) = tree.add_instance(ITEM).expect("add instance");
    let removed = grown
        .remove_instance(InstancePath {
            section: 0,
            item: 0,
            instance: added,
        })
        .expect("remove instance");

    // Ids are never reused, so the counter advances even after the
    // round trip; the visible tree is unchanged.
    assert_eq!(removed.sections, tree.sections);
    assert_eq!(removed.header, tree.header);
    assert_eq!(removed.follow_up, tree.follow_up);
}

#[test]
fn add_appends_fresh_unset_instances() {
    let tree = seed(true);
    let (tree, _) = tree.add_instance(ITEM).expect("first add");
    let (tree, _) = tree.add_instance(ITEM).expect("second add");

    let rows = instances(&tree);
    assert_eq!(rows.len(), 3);
    for instance in rows {
        assert_eq!(instance.status, None);
        assert_eq!(instance.description, "");
        assert_eq!(instance.photo, None);
    }

    let mut ids: Vec<_> = rows.iter().map(|instance| instance.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3, "instance ids must be unique");
}

#[test]
fn remove_shifts_later_instances_without_touching_values() {
    let tree = seed(true);
    let (tree, _) = tree.add_instance(ITEM).expect("first add");
    let (tree, _) = tree.add_instance(ITEM).expect("second add");

    let tree = tree
        .set_description(instance_path(&tree, 0), "front door")
        .and_then(|tree| tree.set_description(instance_path(&tree, 1), "side door"))
        .and_then(|tree| tree.set_description(instance_path(&tree, 2), "back door"))
        .expect("label instances");

    let tree = tree
        .remove_instance(instance_path(&tree, 1))
        .expect("remove middle instance");

    let rows = instances(&tree);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].description, "front door");
    assert_eq!(rows[1].description, "back door");
}

#[test]
fn status_change_leaves_photo_untouched() {
    let tree = seed(true);
    let path = instance_path(&tree, 0);
    let photo = PhotoFile::from_path("/tmp/door.png").expect("image path");

    let tree = tree
        .set_photo(path, Some(photo.clone()))
        .and_then(|tree| tree.set_status(path, Some(Status::NotOk)))
        .expect("photo then status");

    assert_eq!(instances(&tree)[0].photo.as_ref(), Some(&photo));
    assert_eq!(instances(&tree)[0].status, Some(Status::NotOk));
}

#[test]
fn non_repeatable_items_reject_add_and_remove() {
    let tree = seed(false);
    let err = tree.add_instance(ITEM).expect_err("add must be rejected");
    assert!(err.to_string().contains("non-repeatable"), "{err}");

    let err = tree
        .remove_instance(instance_path(&tree, 0))
        .expect_err("remove must be rejected");
    assert!(err.to_string().contains("non-repeatable"), "{err}");

    assert_eq!(instances(&tree).len(), 1);
}

#[test]
fn stale_instance_id_fails_loudly() {
    let tree = seed(true);
    let stale = InstancePath {
        section: 0,
        item: 0,
        instance: InstanceId(9999),
    };
    for result in [
        tree.set_status(stale, Some(Status::Ok)),
        tree.set_description(stale, "x"),
        tree.remove_instance(stale),
    ] {
        let err = result.expect_err("stale id must be rejected");
        assert!(err.to_string().contains("no instance"), "{err}");
    }
}

#[test]
fn out_of_range_paths_fail_loudly() {
    let tree = seed(true);
    let err = tree
        .add_instance(ItemPath {
            section: 3,
            item: 0,
        })
        .expect_err("bad section must be rejected");
    assert!(err.to_string().contains("no item"), "{err}");

    let err = tree
        .instance(InstancePath {
            section: 0,
            item: 7,
            instance: InstanceId(0),
        })
        .expect_err("bad item must be rejected");
    assert!(err.to_string().contains("no item"), "{err}");
}

#[test]
fn header_and_follow_up_updates_are_isolated() {
    let tree = seed(true);
    let tree = tree.set_header_field(HeaderField::AreaLocation, "RDF plant, line 2");
    let tree = tree.set_follow_up_field(FollowUpField::PersonInCharge, "Budi");

    assert_eq!(tree.header.area_location, "RDF plant, line 2");
    assert_eq!(tree.header.assessment_date, "");
    assert_eq!(tree.follow_up.person_in_charge, "Budi");
    assert_eq!(tree.follow_up.summary, "");
    assert_eq!(instances(&tree), seed(true).sections[0].items[0].instances);
}
