// Integration tests for stepping through instantiation graphs

use metastep::metaprogram::graph::{EdgeId, VertexId};
use metastep::metaprogram::kind::InstantiationKind;
use metastep::metaprogram::location::FileLocation;
use metastep::metaprogram::Metaprogram;

struct Chain {
    mp: Metaprogram,
    root: VertexId,
    a: VertexId,
    b: VertexId,
    root_to_a: EdgeId,
    a_to_b: EdgeId,
}

/// `root -> A` (TemplateInstantiation), `A -> B` (Memoization)
fn linear_chain() -> Chain {
    let mut mp = Metaprogram::new("<root>", "int");
    let root = mp.root_vertex();
    let a = mp.add_vertex("A");
    let b = mp.add_vertex("B");
    let root_to_a = mp.add_edge(
        root,
        a,
        InstantiationKind::TemplateInstantiation,
        Some(FileLocation::new("main.cpp", 1, 1)),
    );
    let a_to_b = mp.add_edge(a, b, InstantiationKind::Memoization, None);
    Chain {
        mp,
        root,
        a,
        b,
        root_to_a,
        a_to_b,
    }
}

#[test]
fn test_linear_chain_forward_and_back() {
    let Chain {
        mut mp,
        root,
        a,
        b,
        root_to_a,
        a_to_b,
    } = linear_chain();
    let initial = mp.state().clone();

    mp.step();
    assert_eq!(mp.current_vertex(), a);
    assert_eq!(mp.current_edge(), Some(root_to_a));

    mp.step();
    assert_eq!(mp.current_vertex(), b);
    assert_eq!(mp.backtrace(), vec![root_to_a, a_to_b]);
    assert!(!mp.is_finished());

    mp.step();
    assert!(mp.is_finished());
    assert!(mp.backtrace().is_empty());

    mp.step_back();
    mp.step_back();
    mp.step_back();
    assert!(mp.is_at_start());
    assert_eq!(mp.state(), &initial);
    assert_eq!(mp.current_vertex(), root);
    assert_eq!(mp.state().discovered(), &[true, false, false]);
}

#[test]
fn test_memoization_filter_hides_target() {
    let Chain { mut mp, a, b, .. } = linear_chain();

    let disabled = mp.disable_edges_if(|graph, edge| graph.edge(edge).kind == InstantiationKind::Memoization);
    assert_eq!(disabled, 1);

    mp.step();
    assert_eq!(mp.current_vertex(), a);

    mp.step();
    assert!(mp.is_finished());
    assert!(!mp.state().is_discovered(b));
}

#[test]
fn test_branching_visits_in_insertion_order() {
    let mut mp = Metaprogram::new("<root>", "int");
    let root = mp.root_vertex();
    let a = mp.add_vertex("A");
    let b = mp.add_vertex("B");
    mp.add_edge(root, a, InstantiationKind::TemplateInstantiation, None);
    let root_to_b = mp.add_edge(root, b, InstantiationKind::TemplateInstantiation, None);

    mp.step();
    assert_eq!(mp.current_vertex(), a);

    // Leaves A and enters B in the same step
    mp.step();
    assert_eq!(mp.current_vertex(), b);
    assert_eq!(mp.backtrace(), vec![root_to_b]);

    mp.step();
    assert!(mp.is_finished());
}

#[test]
fn test_disabling_traversed_edge_keeps_position() {
    let Chain {
        mut mp, a, root_to_a, ..
    } = linear_chain();

    mp.step();
    let before = mp.state().clone();

    mp.disable_edges_if(|_, edge| edge == root_to_a);
    assert_eq!(mp.state(), &before);
    assert_eq!(mp.current_vertex(), a);
    assert_eq!(mp.backtrace(), vec![root_to_a]);

    // Stepping back over the disabled edge still works
    mp.step_back();
    assert!(mp.is_at_start());

    // But the walk no longer goes there
    mp.step();
    assert!(mp.is_finished());
}

#[test]
fn test_first_discovery_wins() {
    let mut mp = Metaprogram::new("<root>", "int");
    let root = mp.root_vertex();
    let a = mp.add_vertex("A");
    let b = mp.add_vertex("B");
    let shared = mp.add_vertex("Shared");
    mp.add_edge(root, a, InstantiationKind::TemplateInstantiation, None);
    mp.add_edge(root, b, InstantiationKind::TemplateInstantiation, None);
    let via_a = mp.add_edge(a, shared, InstantiationKind::TemplateInstantiation, None);
    let via_b = mp.add_edge(b, shared, InstantiationKind::Memoization, None);
    let below_shared = mp.add_vertex("Below");
    mp.add_edge(shared, below_shared, InstantiationKind::TemplateInstantiation, None);

    let mut visited = Vec::new();
    while !mp.is_finished() {
        mp.step();
        if let Some(edge) = mp.current_edge() {
            visited.push((edge, mp.current_vertex()));
        }
    }

    // Shared is entered again through B, but its events are not walked twice
    let vertices: Vec<VertexId> = visited.iter().map(|&(_, v)| v).collect();
    assert_eq!(vertices, vec![a, shared, below_shared, b, shared]);
    assert_eq!(visited[4].0, via_b);
    assert_eq!(mp.state().parent_edge()[shared.index()], Some(via_a));
}

#[test]
fn test_memoization_events_are_stepped_onto() {
    let mut mp = Metaprogram::new("<root>", "int");
    let root = mp.root_vertex();
    let a = mp.add_vertex("A");
    let b = mp.add_vertex("B");
    mp.add_edge(root, a, InstantiationKind::TemplateInstantiation, None);
    mp.add_edge(root, b, InstantiationKind::TemplateInstantiation, None);
    let memo = mp.add_edge(b, a, InstantiationKind::Memoization, None);

    mp.step_n(2);
    assert_eq!(mp.current_vertex(), b);
    let before = mp.state().clone();

    mp.step();
    assert_eq!(mp.current_edge(), Some(memo));
    assert_eq!(mp.current_vertex(), a);
    assert_eq!(mp.get_backtrace_length(), 2);
    assert_eq!(mp.discovered_count(), 3);

    mp.step_back();
    assert_eq!(mp.state(), &before);

    assert_eq!(mp.continue_to_end(), 2);
    let with_memoization = mp.history_len();

    mp.reset_state();
    mp.disable_edges_of_kind(InstantiationKind::Memoization);
    mp.continue_to_end();
    assert_eq!(mp.history_len(), with_memoization - 1);
}

#[test]
fn test_backtrace_length_tracks_stack() {
    let Chain { mut mp, .. } = linear_chain();

    loop {
        assert_eq!(mp.get_backtrace_length(), mp.backtrace().len());
        assert_eq!(
            mp.get_backtrace_length(),
            mp.state().edge_stack().iter().flatten().count()
        );
        if mp.is_finished() {
            break;
        }
        mp.step();
    }
}

#[test]
fn test_reset_state_after_steps() {
    let Chain { mut mp, .. } = linear_chain();
    let initial = mp.state().clone();

    mp.step_n(2);
    mp.reset_state();

    assert!(mp.is_at_start());
    assert_eq!(mp.state(), &initial);
    assert_eq!(mp.graph().num_edges(), 2);
    assert!(mp.graph().edges().all(|e| mp.graph().edge(e).enabled));
}

#[test]
fn test_self_loop_is_entered_as_leaf() {
    let mut mp = Metaprogram::new("<root>", "int");
    let root = mp.root_vertex();
    let a = mp.add_vertex("A");
    mp.add_edge(root, a, InstantiationKind::TemplateInstantiation, None);
    mp.add_edge(a, a, InstantiationKind::Memoization, None);

    // A, then A again through the self-loop, then the end
    assert_eq!(mp.continue_to_end(), 3);
    assert!(mp.is_finished());
    assert_eq!(mp.rewind(), 3);
    assert!(mp.is_at_start());
}

#[test]
fn test_root_only_graph_finishes_in_one_step() {
    let mut mp = Metaprogram::new("<root>", "int");
    assert!(!mp.is_finished());

    mp.step();
    assert!(mp.is_finished());
    assert!(!mp.is_at_start());
    assert_eq!(mp.current_vertex(), mp.root_vertex());

    mp.step_back();
    assert!(mp.is_at_start());
    assert!(!mp.is_finished());
}
