//! Arena-backed markup tree using the text/tail model.
//!
//! Every node carries two text slots:
//! - **text**: content inside the node, before its first child
//! - **tail**: content after the node's end tag, inside the parent, before the
//!   next sibling
//!
//! ```html
//! <p>TEXT<b>bold</b>TAIL OF B</p>
//! ```
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`], so
//! parent back-references never form ownership cycles.

/// Stable index of a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic document container. Serialized without tags.
    Root,
    /// Markup element.
    Element {
        /// Tag name as written (may carry a namespace prefix).
        tag: String,
        /// Attributes in source order.
        attrs: Vec<(String, String)>,
    },
    /// Comment; its content is stored in the node's `text`.
    Comment,
}

impl NodeKind {
    /// Element kind without attributes.
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    /// Tag name for elements, `None` for roots and comments.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            Self::Root | Self::Comment => None,
        }
    }
}

/// Node stored in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node kind.
    pub kind: NodeKind,
    /// Direct text content (empty when absent).
    pub text: String,
    /// Text after the node (empty when absent).
    pub tail: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            text: String::new(),
            tail: String::new(),
            parent,
            children: Vec::new(),
        }
    }

    /// Parent node, `None` for the root and detached nodes.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Owned, recursive node used before a subtree is grafted into a [`Tree`].
///
/// Parsed fragments come out of the parser in this form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Node kind.
    pub kind: NodeKind,
    /// Direct text content.
    pub text: String,
    /// Text after the node.
    pub tail: String,
    /// Child nodes.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create an element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::element(tag))
    }

    /// Create a node of any kind.
    #[must_use]
    pub fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            text: String::new(),
            tail: String::new(),
            children: Vec::new(),
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Set attributes. Ignored for non-element kinds.
    #[must_use]
    pub fn with_attrs(mut self, attrs: Vec<(String, String)>) -> Self {
        if let NodeKind::Element { attrs: slot, .. } = &mut self.kind {
            *slot = attrs;
        }
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Tag name for elements.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.kind.tag()
    }
}

/// Mutable, ordered, rooted markup tree.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree holding only an empty [`NodeKind::Root`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root, None)],
        }
    }

    /// Build a tree from an owned root node.
    #[must_use]
    pub fn from_tree_node(root: TreeNode) -> Self {
        let mut tree = Self {
            nodes: vec![Node::new(root.kind, None)],
        };
        let root_id = tree.root();
        tree.nodes[0].text = root.text;
        tree.nodes[0].tail = root.tail;
        for (index, child) in root.children.into_iter().enumerate() {
            tree.insert_subtree(root_id, index, child);
        }
        tree
    }

    /// Root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrow a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children of `id` in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Tag name of `id` if it is an element.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).kind.tag()
    }

    /// Text slot of `id`.
    #[must_use]
    pub fn text(&self, id: NodeId) -> &str {
        &self.node(id).text
    }

    /// Tail slot of `id`.
    #[must_use]
    pub fn tail(&self, id: NodeId) -> &str {
        &self.node(id).tail
    }

    /// Replace the text slot of `id`.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.node_mut(id).text = text.into();
    }

    /// Replace the tail slot of `id`.
    pub fn set_tail(&mut self, id: NodeId, tail: impl Into<String>) {
        self.node_mut(id).tail = tail.into();
    }

    /// Move an owned subtree into the arena as the `index`-th child of `parent`.
    ///
    /// Returns the id of the subtree's top node. `index` is clamped to the
    /// current child count.
    pub fn insert_subtree(&mut self, parent: NodeId, index: usize, subtree: TreeNode) -> NodeId {
        let id = self.alloc_subtree(subtree, parent);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, id);
        id
    }

    fn alloc_subtree(&mut self, subtree: TreeNode, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(subtree.kind, Some(parent));
        node.text = subtree.text;
        node.tail = subtree.tail;
        self.nodes.push(node);

        for child in subtree.children {
            let child_id = self.alloc_subtree(child, id);
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    /// Position of `id` within its parent's children.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl From<TreeNode> for Tree {
    fn from(root: TreeNode) -> Self {
        Self::from_tree_node(root)
    }
}
