//! Templight XML adapter
//!
//! Templight writes a flat list of begin/end events:
//!
//! ```xml
//! <Trace>
//!   <TemplateBegin>
//!     <Kind>TemplateInstantiation</Kind>
//!     <Context context="fib&lt;10&gt;"/>
//!     <PointOfInstantiation>main.cpp|3|12</PointOfInstantiation>
//!   </TemplateBegin>
//!   <TemplateEnd>
//!     <Kind>TemplateInstantiation</Kind>
//!   </TemplateEnd>
//! </Trace>
//! ```
//!
//! Nesting of begin/end pairs says which entity was being processed when an
//! instantiation started. The adapter lowers the events into [`TraceRecord`]s:
//! an entity record the first time a context name appears, and one
//! instantiation record per begin, sourced from the innermost open begin (or
//! the root). Begins left open at the end of the trace are accepted, since a
//! failed compilation stops mid-instantiation. An end must name the same kind
//! as the begin it closes.

use super::errors::TraceFormatError;
use super::record::{LocalId, TracePosition, TraceRecord, ROOT_ID};
use crate::metaprogram::kind::InstantiationKind;
use crate::metaprogram::location::FileLocation;
use roxmltree::{Document, Node};
use rustc_hash::FxHashMap;

/// Lower a templight XML document into trace records
pub fn lower(text: &str) -> Result<Vec<(TraceRecord, TracePosition)>, TraceFormatError> {
    let doc = Document::parse(text)?;
    let position_of = |node: Node<'_, '_>| {
        let pos = doc.text_pos_at(node.range().start);
        TracePosition::new(pos.row as usize, pos.col as usize)
    };

    let trace = doc.root_element();
    if trace.tag_name().name() != "Trace" {
        return Err(TraceFormatError::Templight {
            message: format!("expected <Trace>, found <{}>", trace.tag_name().name()),
            position: position_of(trace),
        });
    }

    let mut records = Vec::new();
    let mut ids: FxHashMap<String, LocalId> = FxHashMap::default();
    // Begins not yet closed, innermost last
    let mut open: Vec<(LocalId, InstantiationKind)> = Vec::new();

    for event in trace.children().filter(|n| n.is_element()) {
        let position = position_of(event);
        match event.tag_name().name() {
            "TemplateBegin" => {
                let kind = event_kind(event, position)?;
                let name = child(event, "Context")
                    .and_then(|c| c.attribute("context"))
                    .ok_or_else(|| TraceFormatError::Templight {
                        message: "TemplateBegin without a context".to_string(),
                        position,
                    })?;
                let point_of_instantiation = match child(event, "PointOfInstantiation") {
                    Some(poi) => Some(parse_point_of_instantiation(
                        poi.text().unwrap_or_default(),
                        position_of(poi),
                    )?),
                    None => None,
                };

                let target = match ids.get(name) {
                    Some(&id) => id,
                    None => {
                        // Local ids start at 1; 0 is the root
                        let id = ids.len() as LocalId + 1;
                        ids.insert(name.to_string(), id);
                        records.push((
                            TraceRecord::Entity {
                                id,
                                name: name.to_string(),
                            },
                            position,
                        ));
                        id
                    }
                };

                let source = open.last().map_or(ROOT_ID, |&(id, _)| id);
                records.push((
                    TraceRecord::Instantiation {
                        source,
                        target,
                        kind,
                        point_of_instantiation,
                    },
                    position,
                ));
                open.push((target, kind));
            }
            "TemplateEnd" => {
                let Some((_, begin)) = open.pop() else {
                    return Err(TraceFormatError::UnbalancedEnd { position });
                };
                let end = event_kind(event, position)?;
                if end != begin {
                    return Err(TraceFormatError::Templight {
                        message: format!("TemplateEnd of kind {} closes a {} begin", end, begin),
                        position,
                    });
                }
            }
            other => {
                return Err(TraceFormatError::Templight {
                    message: format!("unexpected element <{}>", other),
                    position,
                });
            }
        }
    }

    Ok(records)
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

fn event_kind(event: Node<'_, '_>, position: TracePosition) -> Result<InstantiationKind, TraceFormatError> {
    let name = child(event, "Kind")
        .and_then(|k| k.text())
        .map(str::trim)
        .ok_or_else(|| TraceFormatError::Templight {
            message: format!("{} without a kind", event.tag_name().name()),
            position,
        })?;
    name.parse::<InstantiationKind>()
        .map_err(|_| TraceFormatError::UnknownKind {
            name: name.to_string(),
            position,
        })
}

/// `file|line|column`. The file part may itself contain `|`.
fn parse_point_of_instantiation(
    text: &str,
    position: TracePosition,
) -> Result<FileLocation, TraceFormatError> {
    let malformed = || TraceFormatError::Templight {
        message: format!("malformed point of instantiation '{}'", text),
        position,
    };

    let mut parts = text.trim().rsplitn(3, '|');
    let column = parts.next().and_then(|c| c.parse().ok()).ok_or_else(malformed)?;
    let line = parts.next().and_then(|l| l.parse().ok()).ok_or_else(malformed)?;
    let file = parts.next().ok_or_else(malformed)?;
    Ok(FileLocation::new(file, line, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIB_2: &str = r#"<?xml version="1.0" standalone="yes"?>
<Trace>
<TemplateBegin>
    <Kind>TemplateInstantiation</Kind>
    <Context context = "fib&lt;2&gt;"/>
    <PointOfInstantiation>./main.cpp|2|25</PointOfInstantiation>
</TemplateBegin>
<TemplateBegin>
    <Kind>TemplateInstantiation</Kind>
    <Context context = "fib&lt;0&gt;"/>
    <PointOfInstantiation>./main.cpp|1|50</PointOfInstantiation>
</TemplateBegin>
<TemplateEnd>
    <Kind>TemplateInstantiation</Kind>
</TemplateEnd>
<TemplateBegin>
    <Kind>Memoization</Kind>
    <Context context = "fib&lt;0&gt;"/>
    <PointOfInstantiation>./main.cpp|1|70</PointOfInstantiation>
</TemplateBegin>
<TemplateEnd>
    <Kind>Memoization</Kind>
</TemplateEnd>
<TemplateEnd>
    <Kind>TemplateInstantiation</Kind>
</TemplateEnd>
</Trace>
"#;

    #[test]
    fn test_lowering_follows_nesting() {
        let records: Vec<TraceRecord> = lower(FIB_2).unwrap().into_iter().map(|(r, _)| r).collect();

        assert_eq!(
            records,
            vec![
                TraceRecord::Entity {
                    id: 1,
                    name: "fib<2>".to_string()
                },
                TraceRecord::Instantiation {
                    source: 0,
                    target: 1,
                    kind: InstantiationKind::TemplateInstantiation,
                    point_of_instantiation: Some(FileLocation::new("./main.cpp", 2, 25)),
                },
                TraceRecord::Entity {
                    id: 2,
                    name: "fib<0>".to_string()
                },
                TraceRecord::Instantiation {
                    source: 1,
                    target: 2,
                    kind: InstantiationKind::TemplateInstantiation,
                    point_of_instantiation: Some(FileLocation::new("./main.cpp", 1, 50)),
                },
                TraceRecord::Instantiation {
                    source: 1,
                    target: 2,
                    kind: InstantiationKind::Memoization,
                    point_of_instantiation: Some(FileLocation::new("./main.cpp", 1, 70)),
                },
            ]
        );
    }

    #[test]
    fn test_unbalanced_end() {
        let xml = "<Trace><TemplateEnd><Kind>Memoization</Kind></TemplateEnd></Trace>";
        let err = lower(xml).unwrap_err();
        assert!(matches!(err, TraceFormatError::UnbalancedEnd { .. }));
    }

    #[test]
    fn test_end_must_match_begin_kind() {
        let xml = r#"<Trace>
<TemplateBegin><Kind>TemplateInstantiation</Kind><Context context="f"/></TemplateBegin>
<TemplateEnd><Kind>Memoization</Kind></TemplateEnd>
</Trace>"#;
        let err = lower(xml).unwrap_err();
        match err {
            TraceFormatError::Templight { message, position } => {
                assert!(message.contains("Memoization"), "unexpected message: {}", message);
                assert_eq!(position.line, 3);
            }
            other => panic!("expected a templight error, got {:?}", other),
        }

        let no_kind = r#"<Trace><TemplateBegin><Kind>Memoization</Kind><Context context="f"/></TemplateBegin><TemplateEnd/></Trace>"#;
        assert!(matches!(lower(no_kind).unwrap_err(), TraceFormatError::Templight { .. }));
    }

    #[test]
    fn test_unknown_kind() {
        let xml = r#"<Trace><TemplateBegin><Kind>Inlining</Kind><Context context="f"/></TemplateBegin></Trace>"#;
        let err = lower(xml).unwrap_err();
        assert!(matches!(err, TraceFormatError::UnknownKind { ref name, .. } if name == "Inlining"));
    }

    #[test]
    fn test_missing_context() {
        let xml = "<Trace><TemplateBegin><Kind>Memoization</Kind></TemplateBegin></Trace>";
        assert!(matches!(lower(xml).unwrap_err(), TraceFormatError::Templight { .. }));
    }

    #[test]
    fn test_open_begins_are_accepted() {
        let xml = r#"<Trace><TemplateBegin><Kind>TemplateInstantiation</Kind><Context context="f"/></TemplateBegin></Trace>"#;
        let records = lower(xml).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(lower("<Trace><TemplateBegin>").unwrap_err(), TraceFormatError::Xml(_)));
    }

    #[test]
    fn test_point_of_instantiation_with_pipe_in_path() {
        let location = parse_point_of_instantiation("a|b.cpp|3|4", TracePosition::default()).unwrap();
        assert_eq!(location, FileLocation::new("a|b.cpp", 3, 4));
        assert!(parse_point_of_instantiation("main.cpp|x|4", TracePosition::default()).is_err());
        assert!(parse_point_of_instantiation("main.cpp", TracePosition::default()).is_err());
    }
}
