use crate::annotate::AnnotatedNode;
use crate::builder::Forest;
use crate::trace::TraceStatus;
use itertools::Itertools;

/// Formats reconstructed forests into an indented, human-readable outline.
pub struct TraceFormatter;

impl TraceFormatter {
    /// One line per node, children indented by two spaces, followed by one
    /// `!` line per anomaly.
    pub fn format_forest(forest: &Forest) -> String {
        let mut lines = Vec::with_capacity(forest.len() + forest.anomalies.len());
        for root in &forest.roots {
            Self::format_subtree(root, &mut lines);
        }
        lines.extend(forest.anomalies.iter().map(|a| format!("! {}", a)));
        lines.into_iter().join("\n")
    }

    /// Formats a single subtree.
    pub fn format_node(node: &AnnotatedNode) -> String {
        let mut lines = Vec::new();
        Self::format_subtree(node, &mut lines);
        lines.into_iter().join("\n")
    }

    fn format_subtree(root: &AnnotatedNode, lines: &mut Vec<String>) {
        let mut pending = vec![(root, 0)];
        while let Some((node, depth)) = pending.pop() {
            lines.push(Self::format_line(node, depth));
            pending.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
    }

    fn format_line(node: &AnnotatedNode, depth: usize) -> String {
        let label = if node.name.is_empty() {
            node.node_id.as_str()
        } else {
            node.name.as_str()
        };

        let mut line = format!(
            "{}{} {} <{}>",
            "  ".repeat(depth),
            Self::status_marker(node.status),
            label,
            node.kind
        );
        if let Some(cost) = node.time_cost {
            line.push_str(&format!(" {}s", Self::format_number(cost)));
        }
        if node.orphan {
            line.push_str(" (orphan)");
        }
        if let Some(error) = &node.error_message {
            line.push_str(&format!(": {}", error));
        }
        line
    }

    fn status_marker(status: Option<TraceStatus>) -> &'static str {
        match status {
            Some(TraceStatus::Success) => "[ok]",
            Some(TraceStatus::Error) => "[err]",
            None => "[--]",
        }
    }

    fn format_number(n: f64) -> String {
        if n.fract() == 0.0 {
            format!("{}", n as i64)
        } else {
            format!("{}", n)
        }
    }
}
