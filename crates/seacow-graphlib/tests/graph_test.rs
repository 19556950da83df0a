use seacow_graphlib::{Error, Graph};

#[test]
fn add_node_returns_the_existing_index_for_duplicate_ids() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    assert_eq!(g.add_node("a"), a);
    assert_ne!(a, b);
    assert_eq!(g.node_count(), 2);
}

#[test]
fn degree_counts_both_endpoints() {
    let mut g = Graph::new();
    g.add_node("a");
    g.add_node("b");
    g.add_node("c");
    g.add_edge("a", "b", 1.0).unwrap();
    g.add_edge("a", "c", 1.0).unwrap();
    assert_eq!(g.degree(g.index_of("a").unwrap()), 2);
    assert_eq!(g.degree(g.index_of("b").unwrap()), 1);
    assert_eq!(g.degree(g.index_of("c").unwrap()), 1);
}

#[test]
fn self_loop_counts_twice_towards_degree() {
    let mut g = Graph::new();
    g.add_node("a");
    g.add_edge("a", "a", 1.0).unwrap();
    assert_eq!(g.degree(0), 2);
}

#[test]
fn add_edge_with_missing_endpoint_is_an_error() {
    let mut g = Graph::new();
    g.add_node("a");
    let err = g.add_edge("a", "nope", 1.0).unwrap_err();
    match err {
        Error::MissingEndpoint { id } => assert_eq!(id, "nope"),
    }
}

#[test]
fn node_id_maps_indices_back_to_ids() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    assert_eq!(g.node_id(a), Some("a"));
    assert_eq!(g.node_id(b), Some("b"));
    assert_eq!(g.node_id(2), None);
}

#[test]
#[should_panic(expected = "edge endpoint out of range")]
fn add_edge_between_rejects_out_of_range_indices() {
    let mut g = Graph::new();
    g.add_node("a");
    g.add_edge_between(0, 7, 1.0);
}

#[test]
fn negative_edge_weights_are_clamped_to_zero() {
    let mut g = Graph::new();
    g.add_node("a");
    g.add_node("b");
    let e = g.add_edge("a", "b", -3.0).unwrap();
    assert_eq!(g.edges()[e].weight, 0.0);
}
