//! Builds a [`Metaprogram`] from a stream of [`TraceRecord`]s
//!
//! Both input formats lower to records and go through this builder, so the
//! consistency rules live in one place: ids are declared once, references must
//! point at declared entities, and nothing may follow the result.

use super::errors::TraceFormatError;
use super::record::{LocalId, TracePosition, TraceRecord, ROOT_ID};
use crate::metaprogram::graph::VertexId;
use crate::metaprogram::Metaprogram;
use rustc_hash::FxHashMap;

pub struct TraceBuilder {
    metaprogram: Metaprogram,
    entities: FxHashMap<LocalId, VertexId>,
    result: Option<String>,
}

impl TraceBuilder {
    pub fn new(root_name: &str) -> Self {
        let metaprogram = Metaprogram::new(root_name, "");
        let mut entities = FxHashMap::default();
        entities.insert(ROOT_ID, metaprogram.root_vertex());
        TraceBuilder {
            metaprogram,
            entities,
            result: None,
        }
    }

    /// Apply one record
    pub fn record(
        &mut self,
        record: TraceRecord,
        position: TracePosition,
    ) -> Result<(), TraceFormatError> {
        if self.result.is_some() {
            return Err(TraceFormatError::TrailingRecord { position });
        }

        match record {
            TraceRecord::Entity { id, name } => {
                if id == ROOT_ID {
                    return Err(TraceFormatError::ReservedEntity { position });
                }
                if self.entities.contains_key(&id) {
                    return Err(TraceFormatError::DuplicateEntity { id, position });
                }
                let vertex = self.metaprogram.add_vertex(name);
                self.entities.insert(id, vertex);
            }
            TraceRecord::Instantiation {
                source,
                target,
                kind,
                point_of_instantiation,
            } => {
                let from = self.lookup(source, position)?;
                let to = self.lookup(target, position)?;
                self.metaprogram
                    .add_edge(from, to, kind, point_of_instantiation);
            }
            TraceRecord::Result(result) => {
                self.result = Some(result);
            }
        }
        Ok(())
    }

    /// Finish building.
    ///
    /// `evaluation_result`, when given, takes precedence over a `result` record.
    /// Without either the trace is rejected.
    pub fn finish(self, evaluation_result: Option<String>) -> Result<Metaprogram, TraceFormatError> {
        let result = evaluation_result
            .or(self.result)
            .ok_or(TraceFormatError::MissingResult)?;

        let mut metaprogram = self.metaprogram;
        metaprogram.set_evaluation_result(result);
        metaprogram.log_loaded();
        Ok(metaprogram)
    }

    fn lookup(&self, id: LocalId, position: TracePosition) -> Result<VertexId, TraceFormatError> {
        self.entities
            .get(&id)
            .copied()
            .ok_or(TraceFormatError::UndeclaredEntity { id, position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metaprogram::kind::InstantiationKind;

    fn entity(id: LocalId, name: &str) -> TraceRecord {
        TraceRecord::Entity {
            id,
            name: name.to_string(),
        }
    }

    fn instantiation(source: LocalId, target: LocalId) -> TraceRecord {
        TraceRecord::Instantiation {
            source,
            target,
            kind: InstantiationKind::TemplateInstantiation,
            point_of_instantiation: None,
        }
    }

    fn build(records: Vec<TraceRecord>) -> Result<Metaprogram, TraceFormatError> {
        let mut builder = TraceBuilder::new("<root>");
        for (line, record) in records.into_iter().enumerate() {
            builder.record(record, TracePosition::new(line + 1, 1))?;
        }
        builder.finish(None)
    }

    #[test]
    fn test_builds_graph_in_arrival_order() {
        let mp = build(vec![
            entity(1, "a"),
            entity(2, "b"),
            instantiation(0, 2),
            instantiation(0, 1),
            TraceRecord::Result("int".to_string()),
        ])
        .unwrap();

        let graph = mp.graph();
        assert_eq!(graph.num_vertices(), 3);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(mp.evaluation_result(), "int");

        let names: Vec<&str> = graph
            .out_edges(mp.root_vertex())
            .iter()
            .map(|&e| graph.vertex(graph.target(e)).name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_undeclared_source_is_rejected() {
        let err = build(vec![entity(1, "a"), instantiation(7, 1)]).unwrap_err();
        assert!(matches!(
            err,
            TraceFormatError::UndeclaredEntity { id: 7, position } if position.line == 2
        ));
    }

    #[test]
    fn test_undeclared_target_is_rejected() {
        let err = build(vec![instantiation(0, 1)]).unwrap_err();
        assert!(matches!(err, TraceFormatError::UndeclaredEntity { id: 1, .. }));
    }

    #[test]
    fn test_duplicate_and_reserved_ids() {
        let err = build(vec![entity(1, "a"), entity(1, "b")]).unwrap_err();
        assert!(matches!(err, TraceFormatError::DuplicateEntity { id: 1, .. }));

        let err = build(vec![entity(0, "root again")]).unwrap_err();
        assert!(matches!(err, TraceFormatError::ReservedEntity { .. }));
    }

    #[test]
    fn test_result_must_be_last() {
        let err = build(vec![
            TraceRecord::Result("int".to_string()),
            entity(1, "a"),
        ])
        .unwrap_err();
        assert!(matches!(err, TraceFormatError::TrailingRecord { .. }));
    }

    #[test]
    fn test_missing_result() {
        let err = build(vec![entity(1, "a")]).unwrap_err();
        assert!(matches!(err, TraceFormatError::MissingResult));
    }

    #[test]
    fn test_explicit_result_overrides_record() {
        let mut builder = TraceBuilder::new("<root>");
        builder
            .record(TraceRecord::Result("int".to_string()), TracePosition::default())
            .unwrap();
        let mp = builder.finish(Some("long".to_string())).unwrap();
        assert_eq!(mp.evaluation_result(), "long");
    }
}
