//! Arena of text lines shared by the rich and plain sinks.

use crate::tree::NodeId;
use std::io::{self, Write};

#[derive(Debug, Default)]
struct TextNode {
    text: String,
    children: Vec<usize>,
}

#[derive(Debug, Default)]
pub(crate) struct TextTree {
    nodes: Vec<TextNode>,
}

impl TextTree {
    /// Drop any previous tree and start a new one
    pub fn reset(&mut self, root_text: String) -> NodeId {
        self.nodes.clear();
        self.push(root_text)
    }

    pub fn add_child(&mut self, parent: NodeId, text: String) -> NodeId {
        let child = self.push(text);
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child.0);
        }
        child
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    fn push(&mut self, text: String) -> NodeId {
        self.nodes.push(TextNode {
            text,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Box-drawing layout:
    ///
    /// ```text
    /// root
    /// ├── child
    /// │   └── grandchild
    /// └── child
    /// ```
    pub fn write_branches<W: Write>(&self, root: NodeId, out: &mut W) -> io::Result<()> {
        let Some(node) = self.nodes.get(root.0) else {
            return Ok(());
        };
        writeln!(out, "{}", node.text)?;
        self.write_children(node, "", out)
    }

    fn write_children<W: Write>(&self, node: &TextNode, prefix: &str, out: &mut W) -> io::Result<()> {
        let count = node.children.len();
        for (position, &index) in node.children.iter().enumerate() {
            let last = position + 1 == count;
            let (branch, guide) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };

            let child = &self.nodes[index];
            writeln!(out, "{}{}{}", prefix, branch, child.text)?;
            self.write_children(child, &format!("{}{}", prefix, guide), out)?;
        }
        Ok(())
    }

    /// One line per node, `indent` repeated once per depth level
    pub fn write_indented<W: Write>(&self, root: NodeId, indent: &str, out: &mut W) -> io::Result<()> {
        self.write_level(root.0, 0, indent, out)
    }

    fn write_level<W: Write>(&self, index: usize, depth: usize, indent: &str, out: &mut W) -> io::Result<()> {
        let Some(node) = self.nodes.get(index) else {
            return Ok(());
        };
        writeln!(out, "{}{}", indent.repeat(depth), node.text)?;
        for &child in &node.children {
            self.write_level(child, depth + 1, indent, out)?;
        }
        Ok(())
    }
}
