use super::*;

#[test]
fn can_produce_repeatable_values() {
    let first = DefaultRandom::new_repeatable(42);
    let second = DefaultRandom::new_repeatable(42);

    let first = (0..10).map(|_| first.uniform_int(0, 100)).collect::<Vec<_>>();
    let second = (0..10).map(|_| second.uniform_int(0, 100)).collect::<Vec<_>>();

    assert_eq!(first, second);
}

parameterized_test! {can_return_min_on_degenerate_range, (min, max), {
    let random = DefaultRandom::new_repeatable(0);

    assert_eq!(random.uniform_int(min, max), min);
}}

can_return_min_on_degenerate_range! {
    case01: (5, 5),
    case02: (5, 3),
    case03: (-1, -1),
}

#[test]
fn can_keep_uniform_int_within_bounds() {
    let random = DefaultRandom::new_repeatable(1);

    assert!((0..1000).map(|_| random.uniform_int(1, 3)).all(|value| (1..=3).contains(&value)));
}

#[test]
fn can_shuffle_keeping_all_items() {
    let random = DefaultRandom::new_repeatable(3);
    let mut items = (0..20).collect::<Vec<_>>();

    shuffle(&random, &mut items);
    let mut sorted = items.clone();
    sorted.sort();

    assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    assert_ne!(items, sorted);
}

#[test]
fn can_derive_independent_seed() {
    let random = DefaultRandom::new_repeatable(7);

    let seeds = (0..5).map(|_| random.next_seed()).collect::<Vec<_>>();

    assert!(seeds.windows(2).all(|pair| pair[0] != pair[1]));
}
