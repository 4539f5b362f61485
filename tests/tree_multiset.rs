use treekit::{Error, TreeMultiset};

fn contents(bag: &TreeMultiset<i32>) -> Vec<i32> {
    bag.iter().copied().collect()
}

#[test]
fn test_tree_multiset_insert_always_adds() {
    let mut bag = TreeMultiset::new();
    let first = bag.insert(7);
    let second = bag.insert(7);
    assert_ne!(first, second);
    assert_eq!(bag.len(), 2);
    assert_eq!(bag.count(&7), 2);
    // The newer duplicate sorts in front of the older one.
    assert_eq!(bag.begin(), second);
}

#[test]
fn test_tree_multiset_bounds() {
    let bag = TreeMultiset::from([5, 1, 3, 3, 9, 3, 7]);
    assert_eq!(bag.get(bag.lower_bound(&3)), Ok(&3));
    assert_eq!(bag.get(bag.upper_bound(&3)), Ok(&5));
    assert_eq!(bag.get(bag.lower_bound(&4)), Ok(&5));
    assert_eq!(bag.lower_bound(&4), bag.upper_bound(&4));
    assert_eq!(bag.get(bag.lower_bound(&0)), Ok(&1));
    assert_eq!(bag.lower_bound(&10), bag.end());
    assert_eq!(bag.upper_bound(&9), bag.end());
}

#[test]
fn test_tree_multiset_equal_range_walk() {
    let bag = TreeMultiset::from([2, 4, 4, 1, 4, 8]);
    let (mut cursor, upper) = bag.equal_range(&4);
    let mut run = Vec::new();
    while cursor != upper {
        run.push(*bag.get(cursor).unwrap());
        cursor = bag.advance(cursor);
    }
    assert_eq!(run, [4, 4, 4]);
    assert_eq!(bag.range_of(&4).len(), 3);
    assert_eq!(bag.range_of(&3).next(), None);
}

#[test]
fn test_tree_multiset_find() {
    let bag = TreeMultiset::from([6, 2, 6]);
    assert_eq!(bag.get(bag.find(&6)), Ok(&6));
    assert_eq!(bag.find(&3), bag.end());
    assert!(bag.contains(&2));
    assert!(!bag.contains(&3));
}

#[test]
fn test_tree_multiset_erase_single_occurrence() {
    let mut bag = TreeMultiset::from([3, 1, 3, 2, 3]);
    let next = bag.erase(bag.lower_bound(&3));
    assert_eq!(bag.get(next), Ok(&3));
    assert_eq!(bag.count(&3), 2);
    assert_eq!(contents(&bag), [1, 2, 3, 3]);
    bag.check_invariants().unwrap();
}

#[test]
fn test_tree_multiset_erase_whole_run() {
    let mut bag = TreeMultiset::from([4, 2, 6, 4, 4, 5, 4]);
    let (mut cursor, _) = bag.equal_range(&4);
    while bag.get(cursor) == Ok(&4) {
        cursor = bag.erase(cursor);
        bag.check_invariants().unwrap();
    }
    assert_eq!(bag.count(&4), 0);
    assert_eq!(contents(&bag), [2, 5, 6]);
    assert_eq!(bag.get(cursor), Ok(&5));
}

#[test]
fn test_tree_multiset_erase_end_of_empty() {
    let mut bag: TreeMultiset<i32> = TreeMultiset::new();
    assert_eq!(bag.erase(bag.begin()), bag.end());
    assert_eq!(bag.get(bag.begin()), Err(Error::InvalidCursor));
}

#[test]
fn test_tree_multiset_merge() {
    let mut a = TreeMultiset::from([1, 2, 2]);
    let mut b = TreeMultiset::from([2, 3]);
    a.merge(&mut b);
    assert!(b.is_empty());
    assert_eq!(contents(&a), [1, 2, 2, 2, 3]);
    assert_eq!(a.count(&2), 3);
}

#[test]
fn test_tree_multiset_insert_many_reports_every_insert() {
    let mut bag = TreeMultiset::new();
    let results = bag.insert_many([1, 1, 1]);
    assert!(results.iter().all(|&(_, inserted)| inserted));
    assert_eq!(bag.len(), 3);
}

#[test]
fn test_tree_multiset_owned_iteration() {
    let bag = TreeMultiset::from([3, 1, 3, 2]);
    assert_eq!(format!("{bag:?}"), "[1, 2, 3, 3]");
    let mut iter = bag.into_iter();
    assert_eq!(iter.next_back(), Some(3));
    assert_eq!(iter.next_back(), Some(3));
    assert_eq!(iter.collect::<Vec<_>>(), [1, 2]);
}

#[test]
fn test_tree_multiset_pop_and_ends() {
    let mut bag = TreeMultiset::from([5, 5, 1, 9, 9]);
    assert_eq!(bag.first(), Some(&1));
    assert_eq!(bag.last(), Some(&9));
    assert_eq!(bag.pop_last(), Some(9));
    assert_eq!(bag.pop_last(), Some(9));
    assert_eq!(bag.pop_first(), Some(1));
    assert_eq!(contents(&bag), [5, 5]);
    bag.check_invariants().unwrap();
}
