use super::*;
use crate::utils::DefaultRandom;

fn create_collection(units: &[usize]) -> PlanUnitCollection {
    let mut collection = PlanUnitCollection::default();
    units.iter().for_each(|&unit| collection.add(unit));

    collection
}

#[test]
fn can_add_and_remove_idempotently() {
    let mut collection = create_collection(&[1, 2, 3, 2]);

    assert_eq!(collection.size(), 3);

    collection.remove(2);
    collection.remove(2);
    collection.remove(42);

    assert_eq!(collection.size(), 2);
    assert!(collection.contains(1) && collection.contains(3));
    assert!(!collection.contains(2));
}

#[test]
fn can_keep_indices_valid_after_swap_remove() {
    let mut collection = create_collection(&[10, 20, 30, 40]);

    collection.remove(10);
    collection.remove(40);
    collection.add(50);
    collection.remove(30);

    let mut units = collection.iter().collect::<Vec<_>>();
    units.sort();

    assert_eq!(units, vec![20, 50]);
    assert!(!collection.is_empty());
}

#[test]
fn can_return_random_element() {
    let random = DefaultRandom::new_repeatable(0);
    let collection = create_collection(&[5, 6, 7]);

    assert_eq!(PlanUnitCollection::default().random_element(&random), None);
    assert!((0..100).all(|_| collection.random_element(&random).is_some_and(|unit| collection.contains(unit))));
}

parameterized_test! {can_draw_distinct_units, (amount, expected), {
    let random = DefaultRandom::new_repeatable(1);
    let collection = create_collection(&[1, 2, 3, 4, 5]);

    let mut drawn = collection.random_draw(&random, amount);
    drawn.sort();
    drawn.dedup();

    assert_eq!(drawn.len(), expected);
    assert!(drawn.iter().all(|&unit| collection.contains(unit)));
}}

can_draw_distinct_units! {
    case01: (0, 0),
    case02: (3, 3),
    case03: (5, 5),
    case04: (10, 5),
}

#[test]
fn can_compare_collections_ignoring_order() {
    assert_eq!(create_collection(&[1, 2, 3]), create_collection(&[3, 1, 2]));
    assert_ne!(create_collection(&[1, 2]), create_collection(&[1, 2, 3]));
    assert_ne!(create_collection(&[1, 2]), create_collection(&[1, 3]));
}
