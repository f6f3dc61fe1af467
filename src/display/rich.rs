use super::activity::Activity;
use super::text_tree::TextTree;
use super::utils::{centered_rule, terminal_width};
use super::StatusStyle;
use crate::tree::{Label, NodeContent, NodeId, NodeKind, Placeholder, Title, Tone, TreeSink};
use colored::Colorize;
use std::io::{self, Stdout, Write};

/// Coloured box-drawing tree
///
/// Each tree is preceded by a centred rule naming the load balancer and
/// followed by a blank line. Spinners and progress bars go to stderr.
pub struct RichSink<W: Write> {
    out: W,
    tree: TextTree,
    width: usize,
}

impl RichSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout()).with_width(terminal_width())
    }
}

impl<W: Write> RichSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            tree: TextTree::default(),
            width: super::utils::DEFAULT_WIDTH,
        }
    }

    /// Width of the title rule
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn paint_label(kind: NodeKind, label: &Label) -> String {
    let heading = format!("{}:", label.heading);
    let heading = if kind == NodeKind::LoadBalancer {
        heading.normal()
    } else {
        heading.bold().green()
    };

    let mut parts = vec![heading.to_string()];
    for field in &label.fields {
        let value = match (kind, field.tone) {
            (NodeKind::LoadBalancer, Tone::Id) => field.value.bright_yellow(),
            (NodeKind::LoadBalancer, Tone::Address) => field.value.bright_cyan(),
            (_, Tone::Id) => field.value.bold().white(),
            (_, Tone::Name) => field.value.bold().blue(),
            (_, Tone::Address) => field.value.cyan(),
            (_, Tone::Value) => field.value.magenta(),
            (_, Tone::Plain | Tone::Status) => field.value.normal(),
        };
        match field.key {
            Some(key) => parts.push(format!("{}:{}", key, value)),
            None => parts.push(value.to_string()),
        }
    }
    parts.join(" ")
}

fn paint_placeholder(placeholder: &Placeholder) -> String {
    let name = format!("{}:", placeholder.name());
    let name = if placeholder.is_error() {
        name.bold().red()
    } else {
        name.bold().green()
    };
    format!("{} None", name)
}

fn paint_detail(line: &str) -> String {
    match line.split_once(": ") {
        Some((key, value)) => format!("{}: {}", key.cyan(), value),
        None => line.to_string(),
    }
}

impl<W: Write> TreeSink for RichSink<W> {
    fn format_status(&self, status: &str) -> String {
        match StatusStyle::of(status) {
            StatusStyle::Positive => status.green().to_string(),
            StatusStyle::Neutral => status.yellow().to_string(),
            StatusStyle::Negative => status.red().to_string(),
        }
    }

    fn new_root(&mut self, content: NodeContent) -> NodeId {
        self.tree.reset(paint_label(content.kind, &content.label))
    }

    fn attach_child(&mut self, parent: NodeId, content: NodeContent) -> NodeId {
        self.tree
            .add_child(parent, paint_label(content.kind, &content.label))
    }

    fn attach_placeholder(&mut self, parent: NodeId, placeholder: &Placeholder) {
        self.tree.add_child(parent, paint_placeholder(placeholder));
    }

    fn attach_details(&mut self, node: NodeId, details: &[String]) {
        for line in details {
            self.tree.add_child(node, paint_detail(line));
        }
    }

    fn status(&self, message: &str) -> Activity {
        Activity::spinner(message)
    }

    fn progress(&self, message: &str, total: u64) -> Activity {
        Activity::bar(message, total)
    }

    fn finalize_and_print(&mut self, root: NodeId, title: &Title) -> io::Result<()> {
        let heading = format!(
            "{} {}",
            format!("Loadbalancer ID: {}", title.id).bold(),
            format!("({})", title.name).bold().bright_blue()
        );
        writeln!(self.out, "{}", centered_rule(&heading, self.width))?;
        self.tree.write_branches(root, &mut self.out)?;
        writeln!(self.out)?;
        self.out.flush()?;
        self.tree.clear();
        Ok(())
    }
}
