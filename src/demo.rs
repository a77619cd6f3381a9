use crate::auto_layout::{LayoutDirection, LayoutOverrides};
use crate::ir::{EdgeSpec, LayoutPass, NodeSpec, SceneDocument};

const DESCRIPTION: &str = "Lorem ipsum and so on ...";

pub fn demo_document() -> SceneDocument {
    let self_node = NodeSpec::new("self", "Self 1", DESCRIPTION);
    let parents: Vec<NodeSpec> = (2..4)
        .map(|i| NodeSpec::new(&format!("parent-{i}"), &format!("Parent {i}"), DESCRIPTION))
        .collect();
    let children: Vec<NodeSpec> = (4..16)
        .map(|i| NodeSpec::new(&format!("child-{i}"), &format!("Child {i}"), DESCRIPTION))
        .collect();

    let ids = |nodes: &[NodeSpec]| -> Vec<String> { nodes.iter().map(|n| n.id.clone()).collect() };
    let parent_ids = ids(&parents);
    let child_ids = ids(&children);

    let layouts = vec![
        LayoutPass {
            nodes: parent_ids.clone(),
            options: LayoutOverrides {
                start_row: Some(-1),
                direction: Some(LayoutDirection::Up),
                ..LayoutOverrides::default()
            },
        },
        LayoutPass {
            nodes: vec![self_node.id.clone()],
            options: LayoutOverrides::default(),
        },
        LayoutPass {
            nodes: child_ids.clone(),
            options: LayoutOverrides {
                start_row: Some(1),
                direction: Some(LayoutDirection::Down),
                ..LayoutOverrides::default()
            },
        },
    ];

    let edges = vec![
        EdgeSpec {
            sources: parent_ids,
            targets: vec![self_node.id.clone()],
            color: None,
        },
        EdgeSpec {
            sources: vec![self_node.id.clone()],
            targets: child_ids,
            color: None,
        },
    ];

    let mut nodes = vec![self_node];
    nodes.extend(parents);
    nodes.extend(children);

    SceneDocument {
        width: None,
        height: None,
        nodes,
        layouts,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::validate_document;

    #[test]
    fn demo_is_a_valid_document() {
        let document = demo_document();
        validate_document(&document).unwrap();
        assert_eq!(document.nodes.len(), 15);
        assert_eq!(document.nodes[0].title(), "Self 1");
        assert_eq!(document.edges[1].targets.len(), 12);
    }
}
