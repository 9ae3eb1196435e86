use avl_tree::{AvlError, AvlMap};

fn shape(map: &AvlMap<i32, i32>, idx: Option<u32>) -> Option<(i32, i8)> {
    idx.map(|i| (*map.key(i), map.balance(i)))
}

fn children(map: &AvlMap<i32, i32>, idx: u32) -> (Option<(i32, i8)>, Option<(i32, i8)>) {
    (shape(map, map.left(idx)), shape(map, map.right(idx)))
}

fn inorder_shape(map: &AvlMap<i32, i32>) -> Vec<(i32, i8)> {
    let mut out = Vec::new();
    let mut curr = map.first();
    while let Some(i) = curr {
        out.push((*map.key(i), map.balance(i)));
        curr = map.next(i);
    }
    out
}

fn build(keys: &[i32]) -> AvlMap<i32, i32> {
    let mut map = AvlMap::new();
    for &k in keys {
        map.insert(k, k * 10);
        map.assert_valid().unwrap();
    }
    map
}

#[test]
fn insert_into_empty_tree_makes_balanced_root() {
    let map = build(&[7]);
    let root = map.root_index().unwrap();
    assert_eq!(shape(&map, Some(root)), Some((7, 0)));
    assert_eq!(map.parent(root), None);
    assert_eq!(children(&map, root), (None, None));
    assert_eq!(map.len(), 1);
}

#[test]
fn ascending_triple_rotates_left_at_root() {
    let map = build(&[1, 2, 3]);
    let root = map.root_index().unwrap();
    assert_eq!(shape(&map, Some(root)), Some((2, 0)));
    assert_eq!(children(&map, root), (Some((1, 0)), Some((3, 0))));
}

#[test]
fn descending_triple_rotates_right_at_root() {
    let map = build(&[3, 2, 1]);
    let root = map.root_index().unwrap();
    assert_eq!(shape(&map, Some(root)), Some((2, 0)));
    assert_eq!(children(&map, root), (Some((1, 0)), Some((3, 0))));
}

#[test]
fn zig_zag_triples_use_double_rotations() {
    for keys in [[3, 1, 2], [1, 3, 2]] {
        let map = build(&keys);
        let root = map.root_index().unwrap();
        assert_eq!(shape(&map, Some(root)), Some((2, 0)));
        assert_eq!(children(&map, root), (Some((1, 0)), Some((3, 0))));
    }
}

#[test]
fn removing_left_leaf_leaves_right_leaning_root() {
    let mut map = build(&[1, 2, 3]);
    assert_eq!(map.remove(&1), Some(10));
    map.assert_valid().unwrap();

    let root = map.root_index().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(shape(&map, Some(root)), Some((2, -1)));
    assert_eq!(children(&map, root), (None, Some((3, 0))));
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn textbook_right_left_case_lifts_thirty_to_root() {
    let map = build(&[10, 20, 30, 40, 50, 25]);
    let root = map.root_index().unwrap();
    assert_eq!(shape(&map, Some(root)), Some((30, 0)));
    assert_eq!(children(&map, root), (Some((20, 0)), Some((40, -1))));

    let l = map.left(root).unwrap();
    let r = map.right(root).unwrap();
    assert_eq!(children(&map, l), (Some((10, 0)), Some((25, 0))));
    assert_eq!(children(&map, r), (None, Some((50, 0))));
    assert_eq!(map.height(), 3);
}

#[test]
fn removing_sole_node_empties_tree() {
    let mut map = build(&[42]);
    assert_eq!(map.remove(&42), Some(420));
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.root_index(), None);
    assert_eq!(map.first_key_value(), None);
    map.assert_valid().unwrap();
}

#[test]
fn removing_two_child_root_promotes_predecessor() {
    let mut map = build(&[20, 10, 30, 5, 15, 25, 35]);
    assert_eq!(map.remove(&20), Some(200));
    map.assert_valid().unwrap();

    let root = map.root_index().unwrap();
    assert_eq!(*map.key(root), 15);
    assert_eq!(
        map.keys().copied().collect::<Vec<_>>(),
        vec![5, 10, 15, 25, 30, 35]
    );
}

#[test]
fn removal_with_multiple_rotations_keeps_avl_shape() {
    // Minimal AVL tree of height 5; removing the shallowest leaf forces
    // rebalancing at more than one ancestor.
    let mut map = build(&[8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1]);
    assert_eq!(map.height(), 5);
    assert_eq!(map.remove(&12), Some(120));
    map.assert_valid().unwrap();
    assert_eq!(map.height(), 4);
    assert_eq!(*map.key(map.root_index().unwrap()), 5);
}

#[test]
fn duplicate_insert_overwrites_without_restructuring() {
    let mut map = build(&[2, 1, 3]);
    let before = inorder_shape(&map);

    assert_eq!(map.insert(3, 99), Some(30));
    assert_eq!(map.insert(3, 99), Some(99));
    map.assert_valid().unwrap();

    assert_eq!(inorder_shape(&map), before);
    assert_eq!(map.root_index(), Some(0));
    assert_eq!(map.len(), 3);
    assert_eq!(map.find(&3), Some(&99));
}

#[test]
fn removing_absent_key_is_noop() {
    let mut map = build(&[1, 2, 3, 4]);
    let before: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(map.remove(&9), None);
    assert_eq!(map.remove(&9), None);
    let after: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(before, after);
    map.assert_valid().unwrap();

    let mut empty = AvlMap::<i32, i32>::new();
    assert_eq!(empty.remove(&1), None);
    assert!(empty.is_empty());
}

#[test]
fn indexed_access_reports_missing_key() {
    let mut map = build(&[1, 2]);
    assert_eq!(map.at(&2), Ok(&20));
    assert_eq!(map.at(&5), Err(AvlError::KeyNotFound));
    assert_eq!(AvlError::KeyNotFound.to_string(), "key not found");
    assert_eq!(
        AvlError::InvariantViolated("root 3 has parent 1".to_string()).to_string(),
        "AVL invariant violated: root 3 has parent 1"
    );

    *map.at_mut(&1).unwrap() = 11;
    assert_eq!(map.find(&1), Some(&11));
    assert!(matches!(map.at_mut(&3), Err(AvlError::KeyNotFound)));
}

#[test]
fn ladder_insert_delete_matrix() {
    let mut map = AvlMap::<i32, i32>::new();

    for i in 0..300 {
        map.insert(i, i);
        map.assert_valid().unwrap();
    }
    assert_eq!(map.len(), 300);

    for i in (0..300).step_by(3) {
        assert_eq!(map.remove(&i), Some(i));
        map.assert_valid().unwrap();
    }

    for i in 0..300 {
        if i % 3 == 0 {
            assert_eq!(map.find(&i), None);
        } else {
            assert_eq!(map.find(&i), Some(&i));
        }
    }
    assert_eq!(map.len(), 200);
}

#[test]
fn navigation_matrix() {
    let mut map = AvlMap::<i32, &str>::new();
    assert_eq!(map.get_or_next_lower(&10), None);
    assert_eq!(map.first(), None);

    map.insert(10, "ten");
    map.insert(5, "five");
    map.insert(20, "twenty");
    map.insert(15, "fifteen");

    assert_eq!(map.first_key_value(), Some((&5, &"five")));
    assert_eq!(map.last_key_value(), Some((&20, &"twenty")));
    assert_eq!(map.predecessor(&15), Some((&10, &"ten")));
    assert_eq!(map.predecessor(&5), None);
    assert_eq!(map.successor(&15), Some((&20, &"twenty")));
    assert_eq!(map.successor(&20), None);
    assert_eq!(map.successor(&11), None);
    assert_eq!(map.get_or_next_lower(&4), None);
    assert_eq!(map.get_or_next_lower(&19), Some((&15, &"fifteen")));
    assert_eq!(map.get_or_next_lower(&21), Some((&20, &"twenty")));

    let mut list = Vec::new();
    let mut entry = map.last();
    while let Some(i) = entry {
        list.push(*map.key(i));
        entry = map.prev(i);
    }
    assert_eq!(list, vec![20, 15, 10, 5]);

    let idx = map.find_index(&20).unwrap();
    *map.value_mut_by_index(idx) = "TWENTY";
    *map.get_mut(&5).unwrap() = "FIVE";
    assert_eq!(
        map.values().copied().collect::<Vec<_>>(),
        vec!["FIVE", "ten", "fifteen", "TWENTY"]
    );
    assert!(map.contains_key(&15));
    assert!(!map.contains_key(&16));
}

#[test]
fn balance_checks_agree_on_avl_trees() {
    let map = build(&[4, 2, 6, 1, 3, 5, 7]);
    assert!(map.is_balanced());
    assert!(map.equal_paths());

    let map = build(&[4, 2, 6, 1]);
    assert!(map.is_balanced());
    assert!(!map.equal_paths());
}

#[test]
fn clear_and_collect_matrix() {
    let mut map: AvlMap<i32, char> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
    assert_eq!(map.len(), 3);
    assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b', 3: 'c'}");

    map.extend([(0, 'z'), (3, 'C')]);
    assert_eq!(map.iter().len(), 4);
    assert_eq!(map.find(&3), Some(&'C'));

    let pairs: Vec<_> = (&map).into_iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(pairs, vec![(0, 'z'), (1, 'a'), (2, 'b'), (3, 'C')]);

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.height(), 0);
    map.insert(1, 'x');
    map.assert_valid().unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Pair(i32, i32);

#[test]
fn custom_comparator_matrix() {
    let cmp = |a: &Pair, b: &Pair| {
        let dx = a.0 - b.0;
        if dx == 0 {
            a.1 - b.1
        } else {
            dx
        }
    };
    let mut map = AvlMap::<Pair, u8, _>::with_comparator(cmp);
    map.insert(Pair(0, 0), 1);
    map.insert(Pair(0, 1), 2);
    map.insert(Pair(2, 3), 3);
    map.insert(Pair(3, 3), 4);
    assert_eq!(map.len(), 4);
    assert_eq!(map.remove(&Pair(0, 0)), Some(1));
    assert!(!map.contains_key(&Pair(0, 0)));
    assert!(map.contains_key(&Pair(0, 1)));
    map.assert_valid().unwrap();
}

#[test]
fn reverse_comparator_orders_descending() {
    let mut map = AvlMap::<i32, (), _>::with_comparator(|a: &i32, b: &i32| b - a);
    for k in 0..20 {
        map.insert(k, ());
    }
    map.assert_valid().unwrap();
    assert_eq!(
        map.keys().copied().collect::<Vec<_>>(),
        (0..20).rev().collect::<Vec<_>>()
    );
}

#[test]
fn print_renders_balance_factors() {
    let map = build(&[1, 2]);
    assert_eq!(
        map.print(),
        "#0 1 => 10 (bf -1, p -)\n  R #1 2 => 20 (bf +0, p 0)\n"
    );
    assert_eq!(AvlMap::<i32, i32>::new().print(), "(empty)");
}

#[test]
fn slot_indices_survive_unrelated_removals() {
    let mut map: AvlMap<i32, i32> = (1..=5).map(|k| (k, k * 10)).collect();
    let idx5 = map.find_index(&5).unwrap();
    let idx4 = map.find_index(&4).unwrap();

    assert_eq!(map.remove(&1), Some(10));
    map.assert_valid().unwrap();
    assert_eq!(*map.key(idx5), 5);
    assert_eq!(*map.value(idx5), 50);
    assert_eq!(map.find_index(&4), Some(idx4));
    assert_eq!(map.find_index(&5), Some(idx5));
}

#[test]
fn vacated_slots_are_reused() {
    let mut map: AvlMap<i32, i32> = (1..=5).map(|k| (k, k)).collect();
    let idx1 = map.find_index(&1).unwrap();
    map.remove(&1);
    assert!(!map.is_occupied(idx1));

    map.insert(9, 9);
    assert_eq!(map.find_index(&9), Some(idx1));
    assert!(map.is_occupied(idx1));
    assert_eq!(map.len(), 5);
    map.assert_valid().unwrap();
}

#[test]
fn two_child_removal_hands_slot_to_predecessor() {
    let mut map = build(&[20, 10, 30, 5, 15, 25, 35]);
    let idx20 = map.find_index(&20).unwrap();
    let others: Vec<(i32, u32)> = [5, 10, 25, 30, 35]
        .iter()
        .map(|&k| (k, map.find_index(&k).unwrap()))
        .collect();

    map.remove(&20);
    assert_eq!(map.find_index(&15), Some(idx20));
    for (k, idx) in others {
        assert_eq!(map.find_index(&k), Some(idx));
    }
    map.assert_valid().unwrap();
}

#[test]
#[should_panic(expected = "slot index refers to a removed node")]
fn removed_slot_index_is_rejected() {
    let mut map = build(&[1, 2, 3]);
    let idx1 = map.find_index(&1).unwrap();
    map.remove(&1);
    map.key(idx1);
}
