use perturb_hash::HashSet;
use perturb_hash::OrderedSet;
use perturb_hash::SetError;

#[test_log::test]
fn end_to_end_scenario() {
    let mut set: HashSet<u64> = HashSet::new();
    assert_eq!(set.capacity(), 8);

    assert!(set.add(42));
    assert_eq!(set.len(), 1);
    assert!(!set.add(42));
    assert_eq!(set.len(), 1);

    for key in [1, 2, 3] {
        assert!(set.add(key));
    }
    assert_eq!(set.len(), 4);

    assert!(set.discard(&3));
    assert_eq!(set.len(), 3);
    assert!(!set.contains(&3));

    assert_eq!(set.remove(&99), Err(SetError::NotFound));
    assert!(!set.discard(&99));

    for key in 1..20 {
        set.add(key);
    }
    assert_eq!(set.len(), 20);
    assert!(set.capacity() > 8);
    for key in 1..20 {
        assert!(set.contains(&key), "{key} missing from {set}");
    }
    assert!(set.contains(&42));
}

#[test]
fn inclusive_range_scenario() {
    let mut set: HashSet<u64> = HashSet::new();
    for key in 1..=20 {
        assert!(set.add(key));
    }
    assert_eq!(set.len(), 20);
    assert!(set.capacity() > 8);
    for key in 1..=20 {
        assert!(set.contains(&key), "{key} missing from {set}");
    }
    assert!(!set.contains(&0));
    assert!(!set.contains(&21));
}

#[test]
fn growth_keeps_load_below_two_thirds() {
    let mut set: HashSet<u64> = HashSet::with_capacity(8);
    for key in 0..5_000u64 {
        assert!(set.add(key));
        let table = set.table();
        assert!(table.fill() * 3 < table.capacity() * 2);
        assert!(table.len() <= table.fill());
    }
    assert_eq!(set.len(), 5_000);
    assert!((0..5_000u64).all(|key| set.contains(&key)));
}

#[test]
fn replay_is_deterministic() {
    let keys: Vec<String> = (0..300).map(|i| format!("key-{i:04}")).collect();

    let build = || {
        let mut set: HashSet<String> = HashSet::with_capacity(8);
        for key in &keys {
            set.add(key.clone());
        }
        for key in keys.iter().step_by(7) {
            set.discard(key);
        }
        set
    };

    let a = build();
    let b = build();
    let first: Vec<&String> = a.iter().collect();
    assert_eq!(first, b.iter().collect::<Vec<_>>());
    assert_eq!(first, a.iter().collect::<Vec<_>>());
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn tombstone_reuse_does_not_resurrect() {
    let mut set: HashSet<u64> = HashSet::new();
    set.extend([10, 20, 30]);
    let fill_before = set.table().fill();

    assert!(set.discard(&20));
    assert_eq!(set.table().fill(), fill_before);
    assert!(!set.contains(&20));

    assert!(set.add(40));
    assert!(set.table().fill() <= fill_before + 1);
    assert!(!set.contains(&20));
    assert_eq!(set.len(), 3);
}

#[test]
fn facades_agree_on_contents() {
    let keys = [17u32, 4, 99, 4, 23, 8, 17, 61];
    let hashed: HashSet<u32> = keys.into_iter().collect();
    let ordered: OrderedSet<u32> = keys.into_iter().collect();

    assert_eq!(hashed.len(), ordered.len());
    assert!(ordered.iter().all(|k| hashed.contains(k)));
    assert_eq!(
        ordered.iter().copied().collect::<Vec<_>>(),
        vec![17, 4, 99, 23, 8, 61]
    );
}

#[test]
fn pop_on_empty_sets() {
    let mut hashed: HashSet<u8> = HashSet::new();
    let mut ordered: OrderedSet<u8> = OrderedSet::new();
    assert_eq!(hashed.pop(), Err(SetError::EmptyCollection));
    assert_eq!(ordered.pop(), Err(SetError::EmptyCollection));
}
