//! Revision Serializer - Render a revision as indented text
//!
//! This module handles:
//! - Diagnostic dumps of a whole revision (tags, identities, frames, text)
//! - Path strings for a located node, built from sibling positions

use crate::locator;
use crate::node::Node;
use crate::revision::Revision;
use crate::types::NodeId;
use crate::utils;
use std::fmt::Write;

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    pub include_layout: bool,
    pub max_text_length: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            include_layout: true,
            max_text_length: 80,
        }
    }
}

/// Revision dump serializer
pub struct RevisionSerializer {
    config: SerializerConfig,
}

impl RevisionSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize the whole tree of `revision`
    pub fn serialize(&self, revision: &Revision) -> String {
        let mut output = String::with_capacity(1024);
        let _ = writeln!(
            output,
            "# surface {} revision {}",
            revision.surface_id(),
            revision.sequence()
        );
        self.serialize_node(revision.root(), 0, &mut output);
        output
    }

    fn serialize_node(&self, node: &Node, depth: usize, output: &mut String) {
        let indent = "  ".repeat(depth);

        if node.is_raw_text() {
            let text = node.text.as_deref().unwrap_or("").trim();
            if !text.is_empty() {
                let _ = writeln!(
                    output,
                    "{}\"{}\"",
                    indent,
                    utils::cap_text_length(text, self.config.max_text_length)
                );
            }
            return;
        }

        // Format: <View #12 frame=(x,y,w,h)>
        let _ = write!(output, "{}<{} #{}", indent, node.tag_name, node.id);
        if self.config.include_layout {
            if let Some(layout) = &node.layout {
                let frame = layout.frame;
                let _ = write!(
                    output,
                    " frame=({},{},{},{})",
                    frame.x, frame.y, frame.width, frame.height
                );
            }
            if let Some(scroll) = &node.scroll {
                let _ = write!(
                    output,
                    " scroll=({},{})",
                    scroll.content_offset.x, scroll.content_offset.y
                );
            }
        }
        output.push_str(">\n");

        for child in &node.children {
            self.serialize_node(child, depth + 1, output);
        }
    }
}

impl Default for RevisionSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Path string for a node, e.g. `/RootView[1]/View[2]`
///
/// Positions are 1-indexed among siblings with the same tag name. `None` if
/// the node is not part of `revision`.
pub fn node_path_string(revision: &Revision, id: NodeId) -> Option<String> {
    let path = locator::locate(revision, id)?;
    let steps = path.steps();
    let mut parts = Vec::with_capacity(steps.len());

    for (depth, step) in steps.iter().enumerate() {
        let position = if depth == 0 {
            1
        } else {
            let parent = steps[depth - 1].node;
            parent.children[..step.index]
                .iter()
                .filter(|sibling| sibling.tag_name == step.node.tag_name)
                .count()
                + 1
        };
        parts.push(format!("{}[{}]", step.node.tag_name, position));
    }

    Some(format!("/{}", parts.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::parse_tree;

    fn sample() -> Revision {
        let json = serde_json::json!({
            "id": 1, "name": "RootView", "traits": ["root", "layoutable"],
            "layout": { "frame": [0, 0, 100, 100] },
            "children": [
                { "id": 2, "name": "View" },
                { "id": 3, "name": "Text", "children": [{ "id": 4, "text": "  Hello  " }] },
                { "id": 5, "name": "View", "layout": { "frame": [1, 2, 3, 4] } }
            ]
        });
        Revision::new(9, 4, parse_tree(9, &json).unwrap()).unwrap()
    }

    #[test]
    fn test_serialize_revision() {
        let output = RevisionSerializer::new().serialize(&sample());

        assert!(output.starts_with("# surface 9 revision 4\n"));
        assert!(output.contains("<RootView #1 frame=(0,0,100,100)>"));
        assert!(output.contains("    \"Hello\"\n"), "Got: {}", output);
        assert!(output.contains("  <View #5 frame=(1,2,3,4)>"));
    }

    #[test]
    fn test_node_path_string() {
        let revision = sample();
        assert_eq!(node_path_string(&revision, 5).unwrap(), "/RootView[1]/View[2]");
        assert_eq!(node_path_string(&revision, 4).unwrap(), "/RootView[1]/Text[1]/RawText[1]");
        assert!(node_path_string(&revision, 99).is_none());
    }
}
