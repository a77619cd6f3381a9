use std::collections::HashSet;

use thiserror::Error;

use crate::ir::SceneDocument;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid scene document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),
    #[error("{context} references unknown node '{id}'")]
    UnknownNode { context: String, id: String },
    #[error("edge group {index} has no {side}")]
    EmptyEndpoints { index: usize, side: &'static str },
    #[error("node '{id}' has a negative {dimension}")]
    NegativeSize { id: String, dimension: &'static str },
}

pub fn parse_document(input: &str) -> Result<SceneDocument, ParseError> {
    let document: SceneDocument = serde_json::from_str(input)?;
    validate_document(&document)?;
    Ok(document)
}

/// Checks that ids are unique, every reference resolves and no size is negative.
pub fn validate_document(document: &SceneDocument) -> Result<(), ParseError> {
    let mut ids = HashSet::new();
    for node in &document.nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(ParseError::DuplicateNode(node.id.clone()));
        }
        for (dimension, value) in [("width", node.width), ("height", node.height)] {
            if value.is_some_and(|v| v < 0.0) {
                return Err(ParseError::NegativeSize {
                    id: node.id.clone(),
                    dimension,
                });
            }
        }
    }

    let check = |context: String, id: &String| -> Result<(), ParseError> {
        if ids.contains(id.as_str()) {
            Ok(())
        } else {
            Err(ParseError::UnknownNode {
                context,
                id: id.clone(),
            })
        }
    };

    for (index, pass) in document.layouts.iter().enumerate() {
        for id in &pass.nodes {
            check(format!("layout pass {index}"), id)?;
        }
    }

    for (index, edge) in document.edges.iter().enumerate() {
        if edge.sources.is_empty() {
            return Err(ParseError::EmptyEndpoints {
                index,
                side: "sources",
            });
        }
        if edge.targets.is_empty() {
            return Err(ParseError::EmptyEndpoints {
                index,
                side: "targets",
            });
        }
        for id in edge.sources.iter().chain(&edge.targets) {
            check(format!("edge group {index}"), id)?;
        }
    }

    Ok(())
}
