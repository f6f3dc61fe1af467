use super::activity::Activity;
use super::text_tree::TextTree;
use crate::tree::{NodeContent, NodeId, Placeholder, Title, TreeSink};
use std::io::{self, Stdout, Write};

const INDENT: &str = "    ";

/// Uncoloured indented tree
///
/// Titles are underlined with dashes. Status lines go to stderr prefixed
/// with `[STATUS]`.
pub struct PlainSink<W: Write> {
    out: W,
    tree: TextTree,
}

impl PlainSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> PlainSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            tree: TextTree::default(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TreeSink for PlainSink<W> {
    fn format_status(&self, status: &str) -> String {
        status.to_string()
    }

    fn new_root(&mut self, content: NodeContent) -> NodeId {
        self.tree.reset(content.label.plain_text())
    }

    fn attach_child(&mut self, parent: NodeId, content: NodeContent) -> NodeId {
        self.tree.add_child(parent, content.label.plain_text())
    }

    fn attach_placeholder(&mut self, parent: NodeId, placeholder: &Placeholder) {
        self.tree
            .add_child(parent, format!("{}: None", placeholder.name()));
    }

    fn attach_details(&mut self, node: NodeId, details: &[String]) {
        for line in details {
            self.tree.add_child(node, line.clone());
        }
    }

    fn status(&self, message: &str) -> Activity {
        Activity::announced(message)
    }

    fn progress(&self, message: &str, _total: u64) -> Activity {
        eprintln!("[STATUS] {}...", message);
        Activity::none()
    }

    fn finalize_and_print(&mut self, root: NodeId, title: &Title) -> io::Result<()> {
        let title = title.text();
        writeln!(self.out, "{}", title)?;
        writeln!(self.out, "{}", "-".repeat(title.chars().count()))?;
        self.tree.write_indented(root, INDENT, &mut self.out)?;
        writeln!(self.out)?;
        self.out.flush()?;
        self.tree.clear();
        Ok(())
    }
}
