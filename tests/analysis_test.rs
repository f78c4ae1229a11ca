use gfx::{
    Analyzer, CentralityKind, ComponentKind, DefaultEdgeType, EngineConfig, Graph, GfxError, Node,
};

fn topology() -> Graph {
    Graph::from_gexf_str(include_str!("fixtures/sample.gexf")).unwrap()
}

#[test]
fn test_topology_stats() {
    let graph = topology();
    let stats = Analyzer::new(&graph).stats();

    assert_eq!(stats.node_count, 5);
    assert_eq!(stats.edge_count, 6);
    assert!(stats.is_directed);
    assert!((stats.density - 0.3).abs() < 1e-12);
    assert!((stats.avg_degree - 2.4).abs() < 1e-12);
    assert!(stats.is_connected);
    assert_eq!(stats.num_components, 1);
    assert!(!stats.has_cycles);
    assert_eq!(stats.avg_clustering, 0.0);
    // not every node reaches every other one along edge direction
    assert_eq!(stats.diameter, None);
    assert_eq!(stats.radius, None);
    assert_eq!(stats.avg_path_length, None);
}

#[test]
fn test_components_partition_nodes() {
    let graph = topology();
    let analyzer = Analyzer::new(&graph);

    for kind in [ComponentKind::Connected, ComponentKind::Weak, ComponentKind::Strong] {
        let info = analyzer.components(kind);
        assert_eq!(info.component_sizes.iter().sum::<usize>(), graph.node_count());

        let mut members: Vec<&String> = info.components.iter().flatten().collect();
        members.sort();
        members.dedup();
        assert_eq!(members.len(), graph.node_count(), "{}", kind);
    }

    let strong = analyzer.components(ComponentKind::Strong);
    assert_eq!(strong.num_components, 5);
    assert_eq!(strong.largest_component_size, 1);
}

#[test]
fn test_three_cycle_scenario() {
    let mut builder = Graph::builder(DefaultEdgeType::Directed);
    builder.add_edge("a", "b");
    builder.add_edge("b", "c");
    builder.add_edge("c", "a");
    let graph = builder.build();
    let analyzer = Analyzer::new(&graph);

    assert!(analyzer.stats().has_cycles);
    let strong = analyzer.components(ComponentKind::Strong);
    assert_eq!(strong.num_components, 1);
    assert_eq!(strong.component_sizes, vec![3]);
}

#[test]
fn test_isolated_node_scenario() {
    let mut builder = Graph::builder(DefaultEdgeType::Undirected);
    builder.add_node(Node::new("alone"));
    let graph = builder.build();
    let analyzer = Analyzer::new(&graph);

    let components = analyzer.components(ComponentKind::Connected);
    assert_eq!(components.num_components, 1);
    assert_eq!(components.component_sizes, vec![1]);

    let stats = analyzer.stats();
    assert_eq!(stats.density, 0.0);
    assert_eq!(stats.diameter, Some(0));
}

#[test]
fn test_centrality_on_topology() {
    let graph = topology();
    let analyzer = Analyzer::new(&graph);

    let pagerank = analyzer.centrality(CentralityKind::Pagerank, false).unwrap();
    let total: f64 = pagerank.scores.values().sum();
    assert!((total - 1.0).abs() < 1e-4);

    let weighted = analyzer.centrality(CentralityKind::Pagerank, true).unwrap();
    assert!((weighted.scores.values().sum::<f64>() - 1.0).abs() < 1e-4);

    let degree = analyzer.centrality(CentralityKind::Degree, false).unwrap();
    assert_eq!(degree.score("server1"), Some(0.75));

    let betweenness = analyzer.centrality(CentralityKind::Betweenness, false).unwrap();
    assert_eq!(betweenness.score("lb1"), Some(0.0));
    assert!((betweenness.score("server1").unwrap() - 1.0 / 12.0).abs() < 1e-12);
    let top: Vec<&str> = betweenness.top_n(2).into_iter().map(|(id, _)| id).collect();
    assert_eq!(top, vec!["server1", "server2"]);

    for kind in CentralityKind::ALL {
        let result = analyzer.centrality(kind, false).unwrap();
        assert_eq!(result.scores.len(), 5);
        assert!(result.scores.values().all(|s| s.is_finite() && *s >= 0.0), "{}", kind);
    }
}

#[test]
fn test_negative_weight_names_the_edge() {
    let mut builder = Graph::builder(DefaultEdgeType::Directed);
    builder.add_edge("a", "b").weight = Some(1.0);
    builder.add_edge("b", "c").weight = Some(-2.0);
    let graph = builder.build();
    let analyzer = Analyzer::new(&graph);

    let err = analyzer.shortest_path("a", "c", true).unwrap_err();
    match err {
        GfxError::NegativeWeight { from, to, weight } => {
            assert_eq!((from.as_str(), to.as_str()), ("b", "c"));
            assert_eq!(weight, -2.0);
        }
        other => panic!("unexpected error {:?}", other),
    }

    // the unweighted query on the same graph still works
    assert!(analyzer.shortest_path("a", "c", false).unwrap().is_some());
    assert!(analyzer.centrality(CentralityKind::Betweenness, true).is_err());
}

#[test]
fn test_config_from_yaml() {
    let config = EngineConfig::from_yaml_str(
        "pagerank:\n  damping_factor: 0.5\ntie_break: lexicographic\n",
    )
    .unwrap();
    let graph = topology();
    let analyzer = Analyzer::with_config(&graph, config);

    let degrees = analyzer.degrees();
    let order: Vec<&str> = degrees.iter().map(|d| d.node.as_str()).collect();
    // server1 and server2 have degree 3; db1, cache1 and lb1 have 2
    assert_eq!(order, vec!["server1", "server2", "cache1", "db1", "lb1"]);
    assert_eq!(analyzer.config().pagerank.damping_factor, 0.5);
}
