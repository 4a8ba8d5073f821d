//! Rebuilds dependency trees from the indentation glyphs of `mvn dependency:tree`.
//!
//! Every nesting level is drawn with a 3-character group. Ancestors contribute a
//! continuation marker (`|  ` or three spaces), the node itself a branch marker
//! (`+- ` or `\- `):
//!
//! ```text
//! +- org.apache.maven:maven-core:jar:3.8.1:compile        level 1
//! |  +- org.apache.maven:maven-model:jar:3.8.1:compile    level 2
//! |  |  \- org.codehaus.plexus:plexus-utils:jar:3.2.1     level 3
//! |  \- org.apache.maven:maven-settings:jar:3.8.1:compile level 2
//! \- junit:junit:jar:4.13.2:test                          level 1
//! ```

use tracing::{debug, trace, warn};

use crate::domain::coordinate::Coordinate;
use crate::domain::error::DomainError;
use crate::domain::tree::DependencyNode;

/// Width of every indentation group, branch markers included.
pub const MARKER_WIDTH: usize = 3;

/// Level of top-level dependencies.
pub const ROOT_LEVEL: usize = 1;

const BRANCH_MARKERS: [&str; 2] = ["+-", "\\-"];
const CONTINUATION_MARKERS: [&str; 2] = ["|  ", "   "];

/// Result of scanning the indentation of one tree line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    /// Continuation groups consumed, plus one for the branch marker
    pub level: usize,
    /// Whether the scan ended on a branch marker
    pub terminated: bool,
}

impl Indent {
    /// Byte offset where the coordinate text starts.
    pub fn offset(&self) -> usize {
        self.level * MARKER_WIDTH
    }

    /// The line with all indentation glyphs skipped.
    pub fn remainder<'a>(&self, line: &'a str) -> &'a str {
        line.get(self.offset()..).unwrap_or("")
    }
}

/// Compute the nesting level of a tree line.
///
/// A branch marker ends the scan, a continuation marker adds a level and moves
/// on by one group. Anything else stops the scan with whatever was counted so
/// far and `terminated == false`.
pub fn compute_level(line: &str) -> Indent {
    let mut level = 0;
    let mut rest = line;
    loop {
        if BRANCH_MARKERS.iter().any(|m| rest.starts_with(m)) {
            return Indent {
                level: level + 1,
                terminated: true,
            };
        }
        match CONTINUATION_MARKERS.iter().find(|m| rest.starts_with(*m)) {
            Some(marker) => {
                level += 1;
                rest = &rest[marker.len()..];
            }
            None => {
                return Indent {
                    level,
                    terminated: false,
                }
            }
        }
    }
}

struct StackEntry {
    node: DependencyNode,
    /// The entry below this one on the stack is its parent
    attached: bool,
}

/// Stack-based reconstruction of a dependency forest.
///
/// Stack levels are strictly increasing from bottom to top, so the stack
/// always holds the chain of still-open ancestors. A node moves into its
/// parent when it is popped; parentless level-1 nodes become forest roots.
#[derive(Default)]
pub struct TreeBuilder {
    stack: Vec<StackEntry>,
    roots: Vec<DependencyNode>,
    strict: bool,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject lines whose indentation does not end in a branch marker.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Parse one tree line (report prefix already removed) and add it.
    pub fn push_line(&mut self, line: &str) -> Result<(), DomainError> {
        let indent = compute_level(line);
        if !indent.terminated {
            if self.strict {
                return Err(DomainError::MalformedIndentation {
                    line: line.to_string(),
                    level: indent.level,
                });
            }
            warn!("no branch marker, using partial level {}: {}", indent.level, line);
        }
        if self.strict {
            let parent_level = self.stack.last().map_or(0, |top| top.node.level);
            if indent.level > parent_level + 1 {
                return Err(DomainError::SkippedLevel {
                    line: line.to_string(),
                    level: indent.level,
                    parent_level,
                });
            }
        }
        let coordinate = Coordinate::parse(indent.remainder(line))?;
        self.push(DependencyNode::new(coordinate, indent.level));
        Ok(())
    }

    /// Add a node at its level, closing every open node that cannot be its ancestor.
    pub fn push(&mut self, node: DependencyNode) {
        debug!(
            "before pop, stack size: {}, level: {}, node: {}",
            self.stack.len(),
            node.level,
            node.coordinate
        );
        while self
            .stack
            .last()
            .is_some_and(|top| top.node.level >= node.level)
        {
            self.close_top();
        }
        trace!("after pop, stack size: {}", self.stack.len());

        let attached = node.level != ROOT_LEVEL && !self.stack.is_empty();
        self.stack.push(StackEntry { node, attached });
    }

    /// Close the remaining ancestor chain and return the roots in report order.
    pub fn finish(mut self) -> Vec<DependencyNode> {
        while !self.stack.is_empty() {
            self.close_top();
        }
        self.roots
    }

    /// Build a forest from tree lines in one go.
    pub fn build<'a, I>(lines: I, strict: bool) -> Result<Vec<DependencyNode>, DomainError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = Self::new().strict(strict);
        for line in lines {
            builder.push_line(line)?;
        }
        Ok(builder.finish())
    }

    fn close_top(&mut self) {
        let Some(entry) = self.stack.pop() else {
            return;
        };
        if entry.attached {
            if let Some(parent) = self.stack.last_mut() {
                parent.node.add_child(entry.node);
                return;
            }
        }
        if entry.node.level == ROOT_LEVEL {
            self.roots.push(entry.node);
        } else {
            warn!(
                "dropping {} subtree rooted at level {}: no parent",
                entry.node.coordinate, entry.node.level
            );
        }
    }
}
