use threaded_avl::{ThreadedAvlMap, ThreadedAvlSet};

fn main() {
    let mut map = ThreadedAvlMap::new();
    map.insert(0, "zero");
    map.insert(1, "one");
    map.insert(2, "two");
    map.insert(2, "deux");
    map.insert(3, "three");
    map.insert(4, "four");
    map.insert(5, "five");
    assert_eq!(map.get(&2), Some(&"two"));
    assert_eq!(map.get_or_default(&9), "");

    println!("Nodes (key,value,height[,thread]):");
    print!("{}", map.dump());

    println!("Keys from the cursor:");
    map.begin();
    while let Some(key) = map.next() {
        println!("{key}");
    }

    println!("Keys in [1, 3]: {:?}", map.range_search(&1, &3));

    let mut set = ThreadedAvlSet::new();
    for x in (0..10).rev() {
        set.insert(x);
    }
    assert!(set.contains(&1));

    print!("{{ ");
    for x in &set {
        print!("{x}, ");
    }
    println!("}}");
}
