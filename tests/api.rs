use rstest::{fixture, rstest};
use threaded_avl::{ThreadedAvlMap, ThreadedAvlSet};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

#[fixture]
fn seven() -> ThreadedAvlMap<i32, i32> {
    init_tracing();
    [50, 30, 70, 20, 40, 60, 80]
        .into_iter()
        .map(|k| (k, k * 10))
        .collect()
}

fn cursor_keys<K: Clone, V>(map: &mut ThreadedAvlMap<K, V>) -> Vec<K> {
    let mut keys = Vec::new();
    map.begin();
    while let Some(key) = map.next() {
        keys.push(key.clone());
    }
    keys
}

#[rstest]
#[case::ascending(&[1, 2, 3])]
#[case::descending(&[3, 2, 1])]
#[case::left_right(&[3, 1, 2])]
#[case::right_left(&[1, 3, 2])]
fn three_keys_rotate_to_balanced_root(#[case] keys: &[i32]) {
    init_tracing();
    let mut map = ThreadedAvlMap::new();
    for key in keys {
        map.insert(*key, *key * 10);
    }
    assert_eq!(map.height(), Some(1));
    assert_eq!(map.height_of(&2), Some(1));
    assert_eq!(map.height_of(&1), Some(0));
    assert_eq!(map.height_of(&3), Some(0));
    // 2 is the root: its right link is a real child
    assert_eq!(map.successor_key(&2), Some(&3));
    assert_eq!(map.dump().to_string(), "(1,10,0,2)\n(2,20,1)\n(3,30,0)\n");
    assert_eq!(map.validate(), Ok(()));
}

#[rstest]
#[case(25, 65, vec![30, 40, 50, 60])]
#[case(20, 80, vec![20, 30, 40, 50, 60, 70, 80])]
#[case(50, 50, vec![50])]
#[case(51, 59, vec![])]
#[case(0, 19, vec![])]
#[case(81, 100, vec![])]
#[case(65, 25, vec![])]
fn range_search_returns_sorted_keys(
    seven: ThreadedAvlMap<i32, i32>,
    #[case] lower: i32,
    #[case] upper: i32,
    #[case] expected: Vec<i32>,
) {
    assert_eq!(seven.range_search(&lower, &upper), expected);
}

#[rstest]
fn duplicate_insert_is_ignored(mut seven: ThreadedAvlMap<i32, i32>) {
    let before = seven.dump().to_string();
    assert!(!seven.insert(40, -1));
    assert_eq!(seven.len(), 7);
    assert_eq!(seven.get(&40), Some(&400));
    assert_eq!(seven.dump().to_string(), before);
}

#[rstest]
fn absent_keys_yield_defaults(seven: ThreadedAvlMap<i32, i32>) {
    assert_eq!(seven.get(&45), None);
    assert_eq!(seven.get_or_default(&45), 0);
    assert_eq!(seven.height_of(&45), None);
    assert_eq!(seven.successor_key(&45), None);
}

#[rstest]
fn copy_matches_source(seven: ThreadedAvlMap<i32, i32>) {
    let copy = seven.clone();
    assert_eq!(copy.len(), 7);
    assert_eq!(copy.height(), Some(2));
    assert_eq!(copy.dump().to_string(), seven.dump().to_string());
    for key in [20, 30, 40, 50, 60, 70, 80] {
        assert_eq!(copy.get(&key), seven.get(&key));
        assert_eq!(copy.height_of(&key), seven.height_of(&key));
    }

    let mut assigned = ThreadedAvlMap::new();
    assigned.insert(1, 1);
    assigned.clone_from(&seven);
    assert_eq!(assigned, seven);
    assert!(assigned.get(&1).is_none());
}

#[rstest]
fn clear_resets_everything(mut seven: ThreadedAvlMap<i32, i32>) {
    seven.begin();
    assert_eq!(seven.next(), Some(&20));
    seven.clear();
    assert_eq!(seven.len(), 0);
    assert_eq!(seven.height(), None);
    assert_eq!(seven.next(), None);
    assert!(cursor_keys(&mut seven).is_empty());
    assert_eq!(seven.validate(), Ok(()));
}

#[rstest]
fn cursor_and_iterator_agree(mut seven: ThreadedAvlMap<i32, i32>) {
    let from_iter: Vec<i32> = seven.keys().copied().collect();
    assert_eq!(cursor_keys(&mut seven), from_iter);
}

#[test]
fn string_keys_by_borrowed_form() {
    init_tracing();
    let mut map = ThreadedAvlMap::new();
    for word in ["pear", "apple", "fig", "kiwi", "banana", "cherry"] {
        map.insert(word.to_string(), word.len());
    }
    assert_eq!(map.get("kiwi"), Some(&4));
    assert_eq!(map.get_or_default("plum"), 0);
    assert_eq!(
        map.range_search("b", "g"),
        vec!["banana".to_string(), "cherry".to_string(), "fig".to_string()]
    );
    assert_eq!(
        cursor_keys(&mut map),
        vec!["apple", "banana", "cherry", "fig", "kiwi", "pear"]
    );
}

#[test]
fn set_behaves_like_sorted_unique_values() {
    init_tracing();
    let mut set: ThreadedAvlSet<u8> = [9, 3, 7, 3, 1].into_iter().collect();
    assert_eq!(set.len(), 4);
    assert!(!set.insert(7));
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3, 7, 9]);
    assert_eq!(set.range_search(&2, &8), vec![3, 7]);
    assert_eq!(set.validate(), Ok(()));
}
