//! Document outlines.
//!
//! Bookmarks arrive as a flat list of entries in the order they appear in the
//! document, each tagged with a nesting level. [`Outline::build`] turns this
//! list into a forest.

/// An outline entry as it appears in the document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineEntry {
    pub title: String,
    /// Name of the destination the entry links to.
    pub target: String,
    /// Nesting level; top level entries have level 1.
    pub level: u32,
}

impl OutlineEntry {
    pub fn new<S: Into<String>, T: Into<String>>(title: S, target: T, level: u32) -> Self {
        OutlineEntry {
            title: title.into(),
            target: target.into(),
            level,
        }
    }
}

/// A node in an [`Outline`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineNode {
    pub title: String,
    pub target: String,
    pub level: u32,
    /// Index of the parent node, or [`None`] for a root.
    pub parent: Option<usize>,
    /// Indices of the child nodes in document order.
    pub children: Vec<usize>,
}

/// A forest of outline nodes.
///
/// The nodes are stored in an arena in document order and refer to each other by index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outline {
    nodes: Vec<OutlineNode>,
    roots: Vec<usize>,
}

impl Outline {
    /// Builds an outline from entries in document order.
    ///
    /// An entry at a deeper level than its predecessor becomes the predecessor's child.
    /// An entry at the same level becomes its sibling.
    /// An entry at a shallower level is attached relative to the nearest ancestor
    ///     of the predecessor whose level is not deeper than the entry's.
    ///
    /// ```
    /// use ditroff::outline::{Outline, OutlineEntry};
    /// let outline = Outline::build(vec![
    ///     OutlineEntry::new("A", "a", 1),
    ///     OutlineEntry::new("B", "b", 2),
    ///     OutlineEntry::new("C", "c", 2),
    ///     OutlineEntry::new("D", "d", 1),
    /// ]);
    /// assert_eq!(format!["{outline}"], "A\n  B\n  C\nD\n");
    /// ```
    pub fn build<I: IntoIterator<Item = OutlineEntry>>(entries: I) -> Outline {
        let mut outline = Outline::default();
        let mut previous: Option<usize> = None;
        let mut current_level = 0;
        for entry in entries {
            let level = entry.level;
            let node = outline.nodes.len();
            outline.nodes.push(OutlineNode {
                title: entry.title,
                target: entry.target,
                level,
                parent: None,
                children: vec![],
            });
            let parent = match previous {
                None => None,
                Some(prev) if level > current_level => Some(prev),
                Some(prev) if level == current_level => outline.nodes[prev].parent,
                Some(prev) => outline.shallower_parent(prev, level),
            };
            outline.attach(node, parent);
            previous = Some(node);
            current_level = level;
        }
        outline
    }

    /// Finds the parent for a node that is shallower than `prev`.
    fn shallower_parent(&self, prev: usize, level: u32) -> Option<usize> {
        let mut ancestor = self.nodes[prev].parent;
        while let Some(a) = ancestor {
            let a_level = self.nodes[a].level;
            if a_level == level {
                return self.nodes[a].parent;
            }
            if a_level < level {
                return Some(a);
            }
            ancestor = self.nodes[a].parent;
        }
        None
    }

    fn attach(&mut self, node: usize, parent: Option<usize>) {
        self.nodes[node].parent = parent;
        match parent {
            None => self.roots.push(node),
            Some(p) => self.nodes[p].children.push(node),
        }
    }

    pub fn nodes(&self) -> &[OutlineNode] {
        &self.nodes
    }

    /// Indices of the root nodes in document order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn node(&self, index: usize) -> Option<&OutlineNode> {
        self.nodes.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the nodes depth first, yielding each node with its depth.
    pub fn walk(&self) -> impl Iterator<Item = (usize, &OutlineNode)> + '_ {
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&r| (0, r)).collect();
        std::iter::from_fn(move || {
            let (depth, i) = stack.pop()?;
            let node = &self.nodes[i];
            stack.extend(node.children.iter().rev().map(|&c| (depth + 1, c)));
            Some((depth, node))
        })
    }
}

impl std::fmt::Display for Outline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (depth, node) in self.walk() {
            writeln!(f, "{:indent$}{}", "", node.title, indent = 2 * depth)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! outline_tests {
        ( $( ($name: ident, [ $( ($title: expr, $level: expr) ),* ], $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let entries = vec![ $( OutlineEntry::new($title, "", $level) ),* ];
                    let outline = Outline::build(entries);
                    assert_eq!(format!["{outline}"], $want);
                }
            )+
        };
    }

    outline_tests!(
        (empty, [], ""),
        (flat, [("A", 1), ("B", 1)], "A\nB\n"),
        (
            nested,
            [("A", 1), ("B", 2), ("C", 2), ("D", 1)],
            "A\n  B\n  C\nD\n"
        ),
        (
            deep_then_shallow,
            [("A", 1), ("B", 2), ("C", 3), ("D", 2), ("E", 1)],
            "A\n  B\n    C\n  D\nE\n"
        ),
        (
            skipped_level_attaches_to_shallower_ancestor,
            [("A", 1), ("B", 3), ("C", 2)],
            "A\n  B\n  C\n"
        ),
        (
            first_entry_not_at_top_level,
            [("A", 2), ("B", 2), ("C", 1)],
            "A\nB\nC\n"
        ),
        (
            jump_two_levels_up,
            [("A", 1), ("B", 2), ("C", 3), ("D", 1)],
            "A\n  B\n    C\nD\n"
        ),
    );

    #[test]
    fn parent_links() {
        let outline = Outline::build(vec![
            OutlineEntry::new("A", "a", 1),
            OutlineEntry::new("B", "b", 2),
            OutlineEntry::new("C", "c", 1),
        ]);
        assert_eq!(outline.roots(), &[0, 2]);
        assert_eq!(outline.node(1).unwrap().parent, Some(0));
        assert_eq!(outline.node(0).unwrap().children, vec![1]);
        assert_eq!(outline.node(2).unwrap().target, "c");
    }
}
