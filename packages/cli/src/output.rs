use colored::Colorize;
use pagetree_store::{selectors, ClipboardMode, Node, TreeState};

/// Top-level nodes to render: the site root when it resolves, else every
/// node without a resolvable parent
pub fn roots(state: &TreeState) -> Vec<&Node> {
    if let Some(site) = selectors::site_node(state) {
        return vec![site];
    }

    state
        .by_context_path
        .nodes()
        .into_iter()
        .filter(|node| selectors::parent_of(state, &node.context_path).is_none())
        .collect()
}

pub fn print_tree(state: &TreeState) {
    let roots = roots(state);
    if roots.is_empty() {
        println!("   {}", "(empty)".dimmed());
        return;
    }

    for root in roots {
        for (depth, node) in selectors::outline(state, &root.context_path) {
            println!("   {}{}", "  ".repeat(depth), render_line(state, node));
        }
    }
}

fn render_line(state: &TreeState, node: &Node) -> String {
    let mut line = format!("{} {}", node.context_path.bold(), node.node_type.dimmed());

    if let Some(uri) = &node.uri {
        line.push_str(&format!(" {}", uri.cyan()));
    }
    if node.is_hidden() {
        line.push_str(&format!(" {}", "hidden".yellow()));
    }
    if state.focused.context_path == node.context_path {
        line.push_str(&format!(" {}", "◆ focused".green()));
    }
    if state.clipboard.as_deref() == Some(node.context_path.as_str()) {
        let label = match state.clipboard_mode {
            Some(ClipboardMode::Move) => "✂ cut",
            _ => "⎘ copied",
        };
        line.push_str(&format!(" {}", label.blue()));
    }
    if state.to_be_removed.as_deref() == Some(node.context_path.as_str()) {
        line.push_str(&format!(" {}", "✗ pending removal".red()));
    }

    line
}

pub fn print_summary(state: &TreeState) {
    println!("   Nodes: {}", state.by_context_path.len());

    let focused = selectors::focused_context_paths(state);
    if !focused.is_empty() {
        let marker = if selectors::focused_node(state).is_some() {
            "".normal()
        } else {
            " (missing)".red()
        };
        println!("   Focused: {}{}", focused.join(", "), marker);
    }

    if let Some(clipboard) = &state.clipboard {
        let mode = match state.clipboard_mode {
            Some(ClipboardMode::Copy) => "copy",
            Some(ClipboardMode::Move) => "move",
            None => "-",
        };
        println!("   Clipboard: {} ({})", clipboard, mode);
    }

    let orphans = state
        .by_context_path
        .nodes()
        .into_iter()
        .filter(|node| {
            node.parent_context_path
                .as_deref()
                .is_some_and(|parent| !state.by_context_path.contains_key(parent))
        })
        .count();
    if orphans > 0 {
        println!("   {} {}", "Orphaned fragments:".yellow(), orphans);
    }
}
