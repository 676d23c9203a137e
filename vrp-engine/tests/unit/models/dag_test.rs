use super::*;

fn create_dag(arcs: &[(usize, usize, bool)]) -> DirectedAcyclicGraph {
    let mut dag = DirectedAcyclicGraph::default();
    arcs.iter().for_each(|&(origin, destination, is_direct)| {
        let result =
            if is_direct { dag.add_direct_arc(origin, destination) } else { dag.add_arc(origin, destination) };
        result.expect("cannot add arc");
    });

    dag
}

#[test]
fn can_reject_cycle_and_keep_graph_unchanged() {
    let mut dag = create_dag(&[(0, 1, false), (1, 2, false)]);

    assert!(dag.add_arc(2, 0).is_err());
    assert_eq!(dag.arcs().len(), 2);
    assert!(dag.add_arc(0, 2).is_ok());
    assert_eq!(dag.is_allowed(&[0, 1, 2]).ok(), Some(true));
}

#[test]
fn can_reject_self_loop() {
    let mut dag = DirectedAcyclicGraph::default();

    assert!(dag.add_arc(1, 1).is_err());
    assert!(dag.is_empty());
}

#[test]
fn can_reject_conflicting_direct_arcs() {
    let mut dag = create_dag(&[(0, 1, true)]);

    assert!(dag.add_direct_arc(0, 1).is_ok());
    assert!(dag.add_direct_arc(0, 2).is_err());
    assert!(dag.add_direct_arc(2, 1).is_err());
    assert!(dag.has_direct_arc(0, 1));
    assert!(!dag.has_direct_arc(1, 0));
    assert!(dag.has_direct_arcs());
}

parameterized_test! {can_check_is_allowed, (arcs, stops, expected), {
    let dag = create_dag(arcs);

    assert_eq!(dag.is_allowed(stops).ok(), Some(expected));
}}

can_check_is_allowed! {
    case01_unrelated_arc: (&[(5, 6, false)], &[0, 1, 2], true),
    case02_single_stop: (&[(0, 1, false)], &[1], true),
    case03_order_kept: (&[(0, 1, false), (1, 2, false)], &[0, 1, 2], true),
    case04_order_broken: (&[(0, 1, false), (1, 2, false)], &[0, 2, 1], false),
    case05_transitive: (&[(0, 1, false), (1, 2, false)], &[2, 0], false),
    case06_unrelated: (&[(0, 1, false)], &[2, 0, 3, 1], true),
    case07_direct_kept: (&[(0, 1, true)], &[2, 0, 1], true),
    case08_direct_broken: (&[(0, 1, true)], &[0, 2, 1], false),
    case09_direct_reversed: (&[(0, 1, true)], &[1, 0], false),
}

#[test]
fn can_reject_non_unique_stops() {
    let dag = create_dag(&[(0, 1, false)]);

    assert!(dag.is_allowed(&[0, 1, 0]).is_err());
}

#[test]
fn can_get_stops_in_appearance_order() {
    let dag = create_dag(&[(2, 0, false), (0, 3, false), (2, 3, false)]);

    assert_eq!(dag.stops(), vec![2, 0, 3]);
    assert_eq!(dag.outbound_arcs(2).len(), 2);
    assert!(dag.outbound_arcs(3).is_empty());
}

#[test]
fn can_split_into_independent_dags() {
    let dag = create_dag(&[(0, 1, false), (2, 3, true), (4, 5, false), (1, 5, false)]);

    let mut components = dag
        .independent_dags()
        .expect("cannot split dag")
        .into_iter()
        .map(|dag| {
            let mut stops = dag.stops();
            stops.sort();
            stops
        })
        .collect::<Vec<_>>();
    components.sort();

    assert_eq!(components, vec![vec![0, 1, 4, 5], vec![2, 3]]);
}

#[test]
fn can_merge_components_joined_by_later_arc() {
    let dag = create_dag(&[(0, 1, false), (2, 3, false), (1, 2, false)]);

    let components = dag.independent_dags().expect("cannot split dag");

    assert_eq!(components.len(), 1);
    assert_eq!(components[0].arcs().len(), 3);
    assert_eq!(components[0].is_allowed(&[0, 1, 2, 3]).ok(), Some(true));
}
