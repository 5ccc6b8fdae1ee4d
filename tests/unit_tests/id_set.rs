use node_field::id_set::ObjectIdSet;

#[test]
fn free_ids_fill_holes_first() {
    let mut set = ObjectIdSet::new();
    assert_eq!(set.free_id(), 1);
    set.insert(1, "a").unwrap();
    set.insert(3, "c").unwrap();
    assert_eq!(set.free_id(), 2);
    assert_eq!(set.free_ids(3), vec![2, 4, 5]);
    assert!(set.free_ids(0).is_empty());
}

#[test]
fn insert_rejects_reserved_and_used_ids() {
    let mut set = ObjectIdSet::new();
    assert_eq!(set.insert(0, "zero"), Err("zero"));
    set.insert(2, "b").unwrap();
    assert_eq!(set.insert(2, "again"), Err("again"));
    assert_eq!(set.get(2), Some(&"b"));
    assert_eq!(set.len(), 1);
}

#[test]
fn iteration_follows_insertion_order() {
    let mut set = ObjectIdSet::new();
    for (id, name) in [(5, "e"), (2, "b"), (9, "i")] {
        set.insert(id, name).unwrap();
    }
    assert_eq!(set.ids().collect::<Vec<_>>(), vec![5, 2, 9]);
    assert_eq!(set.iter().map(|(_, name)| *name).collect::<String>(), "ebi");

    *set.get_mut(2).unwrap() = "B";
    assert_eq!(set.get(2), Some(&"B"));
    assert!(set.is_id(9));
    assert!(!set.is_id(1));

    set.clear();
    assert!(set.is_empty());
    assert!(!set.is_id(5));
    assert_eq!(set.free_id(), 1);
}

#[test]
fn collect_drops_invalid_ids() {
    let set: ObjectIdSet<_> = vec![(1, 'a'), (0, 'z'), (1, 'b'), (4, 'd')].into_iter().collect();
    assert_eq!(set.ids().collect::<Vec<_>>(), vec![1, 4]);
    assert_eq!(set.get(1), Some(&'a'));
}
