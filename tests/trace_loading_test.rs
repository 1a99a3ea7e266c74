// Integration tests for loading traces from disk and memory

use metastep::metaprogram::kind::InstantiationKind;
use metastep::metaprogram::location::FileLocation;
use metastep::metaprogram::Metaprogram;
use metastep::trace::{TraceFormatError, TraceLoader};
use std::fs::File;
use std::path::Path;

fn load(path: &str) -> Metaprogram {
    TraceLoader::new("<root>")
        .from_file(Path::new(path))
        .expect("Failed to load trace")
}

/// Names of the entities entered by a full walk, in order
fn walk(mp: &mut Metaprogram) -> Vec<String> {
    let mut names = Vec::new();
    while !mp.is_finished() {
        mp.step();
        if let Some(edge) = mp.current_edge() {
            let graph = mp.graph();
            names.push(graph.vertex(graph.target(edge)).name.clone());
        }
    }
    names
}

#[test]
fn test_fib_text_trace() {
    let mut mp = load("demos/fib.trace");

    assert_eq!(mp.evaluation_result(), "int_<2>");
    assert_eq!(mp.graph().num_vertices(), 6);
    assert_eq!(mp.graph().num_edges(), 6);
    assert_eq!(mp.graph().vertex(mp.root_vertex()).name, "<root>");

    // fib<1> is entered a second time through the memoization event
    assert_eq!(
        walk(&mut mp),
        vec!["fib<3>", "fib<1>", "fib<2>", "fib<0>", "fib<1>", "int_<2>"]
    );
    assert_eq!(mp.history_len(), 7);
    assert_eq!(mp.discovered_count(), 6);
}

#[test]
fn test_fib_templight_trace_matches_text_trace() {
    let text = load("demos/fib.trace");
    let xml = TraceLoader::new("<root>")
        .with_evaluation_result("int_<2>")
        .from_file("demos/fib.xml")
        .expect("Failed to load templight trace");

    let (a, b) = (text.graph(), xml.graph());
    assert_eq!(a.num_vertices(), b.num_vertices());
    assert_eq!(a.num_edges(), b.num_edges());
    for (ea, eb) in a.edges().zip(b.edges()) {
        assert_eq!(a.vertex(a.source(ea)).name, b.vertex(b.source(eb)).name);
        assert_eq!(a.vertex(a.target(ea)).name, b.vertex(b.target(eb)).name);
        assert_eq!(a.edge(ea), b.edge(eb));
    }
    assert_eq!(xml.evaluation_result(), "int_<2>");
}

#[test]
fn test_points_of_instantiation_survive_loading() {
    let mp = load("demos/fib.trace");
    let graph = mp.graph();
    let first = graph.out_edges(mp.root_vertex())[0];

    assert_eq!(graph.edge(first).kind, InstantiationKind::TemplateInstantiation);
    assert_eq!(
        graph.edge(first).point_of_instantiation,
        Some(FileLocation::new("main.cpp", 10, 6))
    );
}

#[test]
fn test_hiding_memoization_in_fib() {
    let mut mp = load("demos/fib.trace");
    let mut memoized_steps = 0;
    while !mp.is_finished() {
        mp.step();
        if let Some(edge) = mp.current_edge() {
            if mp.graph().edge(edge).kind == InstantiationKind::Memoization {
                memoized_steps += 1;
            }
        }
    }
    assert_eq!(memoized_steps, 1);
    assert_eq!(mp.history_len(), 7);

    mp.reset_state();
    assert_eq!(mp.disable_edges_of_kind(InstantiationKind::Memoization), 1);

    // fib<1> is still reached through its real instantiation
    assert_eq!(walk(&mut mp), vec!["fib<3>", "fib<1>", "fib<2>", "fib<0>", "int_<2>"]);
    assert_eq!(mp.history_len(), 6);
}

#[test]
fn test_from_reader_on_file() {
    let file = File::open("demos/fib.trace").expect("Failed to open trace");
    let mp = TraceLoader::new("int_<fib<3>::value>")
        .from_reader(file)
        .expect("Failed to load trace");
    assert_eq!(mp.graph().vertex(mp.root_vertex()).name, "int_<fib<3>::value>");
}

#[test]
fn test_reference_to_undeclared_source_fails_whole_load() {
    let trace = "entity 1 \"a\"\ninstantiation 9 1 TemplateInstantiation -\nresult \"int\"\n";
    let err = TraceLoader::new("<root>").from_str(trace).unwrap_err();

    assert!(matches!(err, TraceFormatError::UndeclaredEntity { id: 9, .. }));
    let message = err.to_string();
    assert!(message.contains("line 2"), "unexpected message: {}", message);
}

#[test]
fn test_unknown_kind_fails() {
    let trace = "entity 1 \"a\"\ninstantiation 0 1 Inlining -\nresult \"int\"\n";
    let err = TraceLoader::new("<root>").from_str(trace).unwrap_err();
    assert!(matches!(err, TraceFormatError::UnknownKind { .. }));
}

#[test]
fn test_every_kind_name_is_accepted() {
    let mut trace = String::from("entity 1 \"t\"\n");
    for kind in InstantiationKind::ALL {
        trace.push_str(&format!("instantiation 0 1 {} -\n", kind));
    }
    trace.push_str("result \"t\"\n");

    let mp = TraceLoader::new("<root>").from_str(&trace).unwrap();
    let kinds: Vec<InstantiationKind> = mp.graph().edges().map(|e| mp.graph().edge(e).kind).collect();
    assert_eq!(kinds, InstantiationKind::ALL.to_vec());
}
