// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Threaded expression trees
//!
//! An [ExpressionTree] is the binary tree of a normalized regular expression
//! (i.e., with explicit concatenation operators). It's built one symbol at a time:
//! - a terminal fills the current node if it's empty, or becomes the right
//!   operand of a binary operator that lacks one;
//! - an operator either fills an empty node, becomes the right operand of an
//!   incomplete binary operator, wraps the current node when it binds less tightly,
//!   or is pushed into the right subtree otherwise;
//! - a parenthesized group is parsed as an independent tree whose operator priorities
//!   are raised by [GROUP_PRIORITY_BOOST], then spliced in as a single operand.
//!
//! Nodes live in an arena and refer to each other by [NodeId]. Every node has a
//! parent link, up to two children, and a *threading link*: the node at which an
//! in-order walk resumes once the subtree is exhausted. A missing threading link
//! means the end of the expression.
//!
//! Once built, terminals are numbered from 1, left to right.
//!

use std::fmt::Display;

use crate::{
    errors::Error,
    symbols::{self, Operator, CLOSE_GROUP, EPSILON, GROUP_PRIORITY_BOOST, OPEN_GROUP},
};

/// Index of a node in the tree's arena
pub type NodeId = usize;

///
/// Content of a tree node
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeData {
    /// Operator node
    Operator(Operator),
    /// Leaf for a terminal symbol
    Terminal(char),
    /// Leaf for the empty word
    Epsilon,
}

impl NodeData {
    /// Node data for a symbol of a normalized expression
    pub fn from_symbol(c: char) -> Option<NodeData> {
        if let Some(op) = Operator::from_symbol(c) {
            Some(NodeData::Operator(op))
        } else if c == EPSILON {
            Some(NodeData::Epsilon)
        } else if symbols::is_terminal(c) {
            Some(NodeData::Terminal(c))
        } else {
            None
        }
    }

    /// Character for this node
    pub fn symbol(self) -> char {
        match self {
            NodeData::Operator(op) => op.symbol(),
            NodeData::Terminal(c) => c,
            NodeData::Epsilon => EPSILON,
        }
    }

    /// Check whether this is an operator
    pub fn is_operator(self) -> bool {
        matches!(self, NodeData::Operator(_))
    }
}

impl Display for NodeData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

///
/// Tree node
///
#[derive(Debug, Clone, Default)]
pub struct Node {
    data: Option<NodeData>,
    priority: u32,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    threading_link: Option<NodeId>,
    index: Option<usize>,
}

impl Node {
    /// Content of the node (None for a node that's not filled yet)
    pub fn data(&self) -> Option<NodeData> {
        self.data
    }

    /// Operator priority, including group boosts
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Left child
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Right child
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Parent
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Node visited after this subtree (None means end of expression)
    pub fn threading_link(&self) -> Option<NodeId> {
        self.threading_link
    }

    /// Position of a leaf (starting from 1)
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Check whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

///
/// Threaded binary tree of a regular expression
///
#[derive(Debug, Clone)]
pub struct ExpressionTree {
    expression: String,
    nodes: Vec<Node>,
    root: NodeId,
}

impl ExpressionTree {
    ///
    /// Build the tree of a normalized expression
    ///
    /// # Errors
    ///
    /// Produce [Error::InvalidRegex] if the expression contains an unexpected
    /// character, unbalanced parentheses, or if an insertion leaves the tree
    /// in an invalid state.
    ///
    pub fn parse(normalized: &str) -> Result<Self, Error> {
        let mut tree = ExpressionTree {
            expression: normalized.to_string(),
            nodes: Vec::new(),
            root: 0,
        };
        // working root of each open group; groups[0] is the whole expression
        let mut groups = vec![tree.new_node()];
        for c in normalized.chars() {
            if c == OPEN_GROUP {
                groups.push(tree.new_node());
                continue;
            }
            if c == CLOSE_GROUP {
                let group = match groups.pop() {
                    Some(g) if !groups.is_empty() => g,
                    _ => return Err(tree.error("unbalanced parentheses")),
                };
                if !tree.is_valid_subtree(group) {
                    return Err(tree.error("incomplete group"));
                }
                tree.change_priority(group, GROUP_PRIORITY_BOOST);
                let top = groups[groups.len() - 1];
                tree.push_subtree(top, group)?;
                continue;
            }
            let data =
                NodeData::from_symbol(c).ok_or_else(|| tree.error("unexpected character"))?;
            let top = groups.len() - 1;
            tree.push(groups[top], data)?;
            groups[top] = tree.root_of(groups[top]);
        }

        if groups.len() != 1 {
            return Err(tree.error("unbalanced parentheses"));
        }
        let root = groups[0];
        if !tree.is_valid_subtree(root) {
            return Err(tree.error("incomplete expression"));
        }
        tree.root = root;
        tree.set_threading_links(root);
        tree.set_terminal_indexes();
        Ok(tree)
    }

    fn error(&self, reason: &'static str) -> Error {
        Error::invalid_regex(&self.expression, reason)
    }

    fn new_node(&mut self) -> NodeId {
        self.nodes.push(Node::default());
        self.nodes.len() - 1
    }

    // add an empty right child to node id
    fn new_right_child(&mut self, id: NodeId) -> NodeId {
        let child = self.new_node();
        self.nodes[child].parent = Some(id);
        self.nodes[id].right = Some(child);
        child
    }

    fn set_operator(&mut self, id: NodeId, op: Operator) {
        let node = &mut self.nodes[id];
        node.data = Some(NodeData::Operator(op));
        node.priority = op.precedence();
    }

    //
    // Push a symbol into the subtree rooted at id
    //
    fn push(&mut self, id: NodeId, data: NodeData) -> Result<(), Error> {
        match data {
            NodeData::Operator(op) => self.push_operator(id, op),
            _ => self.push_leaf(id, data),
        }
    }

    fn push_leaf(&mut self, id: NodeId, data: NodeData) -> Result<(), Error> {
        let mut id = id;
        loop {
            let node = &self.nodes[id];
            let (current, right) = (node.data, node.right);
            match current {
                None => {
                    self.nodes[id].data = Some(data);
                    return Ok(());
                }
                Some(NodeData::Operator(op)) => match right {
                    Some(r) => id = r,
                    None if op.arity() == 2 => id = self.new_right_child(id),
                    None => return Err(self.error("operand after a modifier")),
                },
                Some(_) => return Err(self.error("missing operator")),
            }
        }
    }

    fn push_operator(&mut self, id: NodeId, op: Operator) -> Result<(), Error> {
        let mut id = id;
        loop {
            let node = &self.nodes[id];
            let (data, priority, right) = (node.data, node.priority, node.right);
            match data {
                None => {
                    self.set_operator(id, op);
                    return Ok(());
                }
                Some(NodeData::Operator(current)) if right.is_none() && current.arity() == 2 => {
                    let child = self.new_right_child(id);
                    self.set_operator(child, op);
                    return Ok(());
                }
                Some(d) => {
                    if !d.is_operator() || priority > op.precedence() {
                        self.wrap(id, op);
                        return Ok(());
                    }
                    match right {
                        Some(r) => id = r,
                        None => return Err(self.error("misplaced modifier")),
                    }
                }
            }
        }
    }

    //
    // Insert a new operator node above id: id becomes its left child
    // and the new node takes the place of id in id's parent.
    //
    fn wrap(&mut self, id: NodeId, op: Operator) {
        let parent = self.nodes[id].parent;
        let w = self.new_node();
        self.set_operator(w, op);
        self.nodes[w].left = Some(id);
        self.nodes[w].parent = parent;
        if let Some(p) = parent {
            if self.nodes[p].left == Some(id) {
                self.nodes[p].left = Some(w);
            } else {
                self.nodes[p].right = Some(w);
            }
        }
        self.nodes[id].parent = Some(w);
    }

    //
    // Splice a complete group (rooted at sub) into the subtree rooted at id
    //
    fn push_subtree(&mut self, id: NodeId, sub: NodeId) -> Result<(), Error> {
        let mut id = id;
        loop {
            let node = &self.nodes[id];
            match (node.data, node.right) {
                (None, _) => {
                    self.adopt(id, sub);
                    return Ok(());
                }
                (Some(NodeData::Operator(op)), None) => {
                    if op.arity() != 2 {
                        return Err(self.error("operand after a modifier"));
                    }
                    self.nodes[id].right = Some(sub);
                    self.nodes[sub].parent = Some(id);
                    return Ok(());
                }
                (Some(NodeData::Operator(_)), Some(r)) => id = r,
                (Some(_), _) => return Err(self.error("missing operator")),
            }
        }
    }

    //
    // Move the content of node sub into the empty node id
    // - the children of sub become children of id
    // - sub is left detached
    //
    fn adopt(&mut self, id: NodeId, sub: NodeId) {
        let taken = std::mem::take(&mut self.nodes[sub]);
        let node = &mut self.nodes[id];
        node.data = taken.data;
        node.priority = taken.priority;
        node.left = taken.left;
        node.right = taken.right;
        node.index = taken.index;
        for child in [taken.left, taken.right].iter().flatten() {
            self.nodes[*child].parent = Some(id);
        }
    }

    //
    // Add delta to the priority of all operators in a subtree
    //
    fn change_priority(&mut self, id: NodeId, delta: u32) {
        let mut stack = vec![id];
        while let Some(i) = stack.pop() {
            let node = &mut self.nodes[i];
            if node.data.map_or(false, NodeData::is_operator) {
                node.priority += delta;
            }
            stack.extend(node.left);
            stack.extend(node.right);
        }
    }

    //
    // A subtree is valid if all its nodes are filled, binary operators have
    // two operands, unary operators have one, and leaves have none.
    //
    fn is_valid_subtree(&self, id: NodeId) -> bool {
        let mut stack = vec![id];
        while let Some(i) = stack.pop() {
            let node = &self.nodes[i];
            let shape_ok = match node.data {
                None => false,
                Some(NodeData::Operator(op)) => {
                    node.left.is_some() && (node.right.is_some() == (op.arity() == 2))
                }
                Some(_) => node.is_leaf(),
            };
            if !shape_ok {
                return false;
            }
            stack.extend(node.left);
            stack.extend(node.right);
        }
        true
    }

    //
    // Set the threading links in the subtree rooted at id
    // - the last node in in-order of a left subtree links to the parent of that subtree
    //
    fn set_threading_links(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(i) = stack.pop() {
            let (left, right) = (self.nodes[i].left, self.nodes[i].right);
            if let Some(l) = left {
                let last = self.rightmost(l);
                self.nodes[last].threading_link = Some(i);
            }
            stack.extend(left);
            stack.extend(right);
        }
    }

    fn set_terminal_indexes(&mut self) {
        for (i, leaf) in self.leaves().into_iter().enumerate() {
            self.nodes[leaf].index = Some(i + 1);
        }
    }

    /// Root of the tree
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Access a node
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Content of a node
    ///
    /// # Panics
    ///
    /// If the node is not filled, which can't happen in a tree returned by [parse](Self::parse).
    pub fn data(&self, id: NodeId) -> NodeData {
        match self.nodes[id].data {
            Some(d) => d,
            None => panic!("empty node in expression tree"),
        }
    }

    /// Normalized expression this tree was built from
    pub fn expression(&self) -> &str {
        &self.expression
    }

    ///
    /// Topmost ancestor of a node
    ///
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut id = id;
        while let Some(p) = self.nodes[id].parent {
            id = p;
        }
        id
    }

    ///
    /// Last node of the subtree rooted at id in in-order
    ///
    /// The threading link of this node is where a walk continues
    /// after the whole subtree.
    ///
    pub fn rightmost(&self, id: NodeId) -> NodeId {
        let mut id = id;
        while let Some(r) = self.nodes[id].right {
            id = r;
        }
        id
    }

    ///
    /// Leaves of the tree, from left to right
    ///
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_leaf() {
                result.push(id);
            }
            // right pushed first so that the left subtree is visited first
            stack.extend(node.right);
            stack.extend(node.left);
        }
        result
    }

    ///
    /// Leaf at a given position (starting from 1)
    ///
    pub fn node_at_position(&self, position: usize) -> Option<NodeId> {
        self.leaves()
            .into_iter()
            .find(|&id| self.nodes[id].index == Some(position))
    }

    fn fmt_subtree(&self, f: &mut std::fmt::Formatter<'_>, id: NodeId) -> std::fmt::Result {
        let mut stack = vec![(id, 0)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            let data = node.data.map_or('?', NodeData::symbol);
            let link = match node.threading_link {
                Some(l) => self.nodes[l].data.map_or('?', NodeData::symbol).to_string(),
                None => "λ".to_string(),
            };
            writeln!(f, "{:width$}{} ({})", "", data, link, width = 2 * depth)?;
            stack.extend(node.right.map(|r| (r, depth + 1)));
            stack.extend(node.left.map(|l| (l, depth + 1)));
        }
        Ok(())
    }
}

impl Display for ExpressionTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_subtree(f, self.root)
    }
}
