//! Box-drawing tree dumps.

use crate::arena::Arena;
use crate::types::Node;

/// Depth past which [`print_binary`] elides subtrees when rendering a map.
pub const MAX_PRINT_DEPTH: usize = 64;

struct Frame {
    node: Option<u32>,
    depth: usize,
    lead: String,
    tab: String,
}

/// Renders the binary tree under `root` as `←` / `→` branches, one `label`
/// per node, each line starting with a newline.
///
/// A missing side is drawn as `∅` when its sibling exists. A node more than
/// `max_depth` levels down is drawn as `…` and its subtree skipped. Frames
/// live on an explicit stack, so tree depth never reaches the call stack.
pub fn print_binary<N, F>(arena: &Arena<N>, root: u32, max_depth: usize, label: F) -> String
where
    N: Node,
    F: Fn(&N) -> String,
{
    let mut out = String::new();
    let mut stack = vec![Frame {
        node: Some(root),
        depth: 1,
        lead: "\n└─ ".to_string(),
        tab: "   ".to_string(),
    }];

    while let Some(Frame {
        node,
        depth,
        lead,
        tab,
    }) = stack.pop()
    {
        out.push_str(&lead);
        let Some(i) = node else {
            out.push('∅');
            continue;
        };
        if depth > max_depth {
            out.push('…');
            continue;
        }
        let n = &arena[i];
        out.push_str(&label(n));
        if n.l().is_none() && n.r().is_none() {
            continue;
        }
        // Right first so the left branch is popped and printed above it.
        stack.push(Frame {
            node: n.r(),
            depth: depth + 1,
            lead: format!("\n{tab}└─ → "),
            tab: format!("{tab}   "),
        });
        stack.push(Frame {
            node: n.l(),
            depth: depth + 1,
            lead: format!("\n{tab}├─ ← "),
            tab: format!("{tab}│  "),
        });
    }

    out
}
