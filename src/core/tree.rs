//! The state tree.
//!
//! States live in an arena owned by [`StateTree`] and are addressed by
//! [`StateId`]. Index 0 is the synthetic, unnamed top of the tree; every
//! registered state hangs below it. After a machine is built the topology is
//! frozen and all methods here are pure queries.

use super::path::StatePath;

/// Handle to a node of one particular [`StateTree`].
///
/// Ids are only meaningful for the tree that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    /// The synthetic top of every tree.
    pub const ROOT: StateId = StateId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Free-text documentation attached to a state at registration time.
///
/// Annotations never influence dispatch; they are read by the diagram
/// renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Transitions leaving this state, with the condition that triggers them.
    pub transitions: Vec<TransitionNote>,
    /// Condition under which the chart is left from this state.
    pub exit_when: Option<String>,
    /// Description of the entry action.
    pub entry_doc: Option<String>,
    /// Description of the exit action.
    pub exit_doc: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionNote {
    pub target: StateId,
    pub when: String,
}

/// One node of the state tree.
#[derive(Clone, Debug)]
pub struct StateNode {
    name: Option<String>,
    parent: Option<StateId>,
    children: Vec<StateId>,
    init_child: Option<StateId>,
    init_marked: bool,
    depth: usize,
    has_handler: bool,
    has_entry: bool,
    has_exit: bool,
    annotations: Annotations,
}

impl StateNode {
    fn new(name: Option<String>, parent: Option<StateId>, depth: usize) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            init_child: None,
            init_marked: false,
            depth,
            has_handler: false,
            has_entry: false,
            has_exit: false,
            annotations: Annotations::default(),
        }
    }

    /// Path segment of this node, `None` for the top of the tree.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// Children in registration order.
    pub fn children(&self) -> &[StateId] {
        &self.children
    }

    pub fn init_child(&self) -> Option<StateId> {
        self.init_child
    }

    /// Whether the state was registered with the init marker.
    pub fn is_init_marked(&self) -> bool {
        self.init_marked
    }

    /// Number of edges between this node and the top of the tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_handler(&self) -> bool {
        self.has_handler
    }

    pub fn has_entry(&self) -> bool {
        self.has_entry
    }

    pub fn has_exit(&self) -> bool {
        self.has_exit
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// Arena of state nodes rooted at [`StateId::ROOT`].
#[derive(Clone, Debug)]
pub struct StateTree {
    nodes: Vec<StateNode>,
}

impl Default for StateTree {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTree {
    /// A tree holding only the synthetic top node.
    pub fn new() -> Self {
        Self {
            nodes: vec![StateNode::new(None, None, 0)],
        }
    }

    pub fn root(&self) -> StateId {
        StateId::ROOT
    }

    /// Number of nodes, the top node included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: StateId) -> &StateNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: StateId) -> Option<&StateNode> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: StateId) -> Option<StateId> {
        self.node(id).parent
    }

    pub fn children(&self, id: StateId) -> &[StateId] {
        &self.node(id).children
    }

    pub fn depth(&self, id: StateId) -> usize {
        self.node(id).depth
    }

    pub fn is_leaf(&self, id: StateId) -> bool {
        self.node(id).is_leaf()
    }

    pub fn child_named(&self, id: StateId, name: &str) -> Option<StateId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|child| self.node(*child).name() == Some(name))
    }

    /// Look a state up by path. The empty path yields the top node.
    pub fn find(&self, path: &StatePath) -> Option<StateId> {
        path.segments()
            .iter()
            .try_fold(StateId::ROOT, |id, segment| self.child_named(id, segment))
    }

    /// Path from the top of the tree (exclusive) to `id`.
    pub fn path(&self, id: StateId) -> StatePath {
        let mut segments: Vec<&str> = self
            .ancestors(id)
            .filter_map(|ancestor| self.node(ancestor).name())
            .collect();
        segments.reverse();
        StatePath::from_segments(segments)
    }

    /// Full name of `id`, e.g. `0_2_1`.
    pub fn full_name(&self, id: StateId) -> String {
        self.path(id).full_name()
    }

    /// `id` itself followed by every ancestor up to and including the top.
    pub fn ancestors(&self, id: StateId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Node ids from the top of the tree down to `id`, both included.
    pub fn root_chain(&self, id: StateId) -> Vec<StateId> {
        let mut chain: Vec<StateId> = self.ancestors(id).collect();
        chain.reverse();
        chain
    }

    /// Follow init children from `id` down to a leaf.
    ///
    /// Init children are always direct children, so the walk terminates.
    /// Leaves resolve to themselves.
    pub fn resolve_init(&self, id: StateId) -> StateId {
        let mut current = id;
        while let Some(init) = self.node(current).init_child {
            current = init;
        }
        current
    }

    /// Deepest node lying on the root paths of both `a` and `b`.
    ///
    /// The root chains are compared element by element; the top of the tree
    /// is shared by every pair, so a result always exists.
    pub fn common_ancestor(&self, a: StateId, b: StateId) -> StateId {
        self.root_chain(a)
            .into_iter()
            .zip(self.root_chain(b))
            .take_while(|(x, y)| x == y)
            .map(|(x, _)| x)
            .last()
            .unwrap_or(StateId::ROOT)
    }

    /// True if `ancestor` lies strictly above `id`.
    pub fn is_ancestor_of(&self, ancestor: StateId, id: StateId) -> bool {
        ancestor != id && self.ancestors(id).any(|candidate| candidate == ancestor)
    }

    /// Depth-first, pre-order walk over every node, the top node first.
    /// Siblings are visited in registration order.
    pub fn iter(&self) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: vec![StateId::ROOT],
        }
    }

    /// Create every missing node along `path` and return the last one.
    pub(crate) fn insert_path(&mut self, path: &StatePath) -> StateId {
        let mut current = StateId::ROOT;
        for segment in path.segments() {
            current = match self.child_named(current, segment) {
                Some(child) => child,
                None => {
                    let id = StateId(self.nodes.len());
                    let depth = self.node(current).depth + 1;
                    self.nodes
                        .push(StateNode::new(Some(segment.clone()), Some(current), depth));
                    self.nodes[current.0].children.push(id);
                    id
                }
            };
        }
        current
    }

    pub(crate) fn set_handler(&mut self, id: StateId, init_marked: bool) {
        let node = &mut self.nodes[id.0];
        node.has_handler = true;
        node.init_marked = init_marked;
    }

    pub(crate) fn set_entry(&mut self, id: StateId) {
        self.nodes[id.0].has_entry = true;
    }

    pub(crate) fn set_exit(&mut self, id: StateId) {
        self.nodes[id.0].has_exit = true;
    }

    pub(crate) fn set_init_child(&mut self, id: StateId, child: StateId) {
        self.nodes[id.0].init_child = Some(child);
    }

    pub(crate) fn annotations_mut(&mut self, id: StateId) -> &mut Annotations {
        &mut self.nodes[id.0].annotations
    }
}

/// Iterator returned by [`StateTree::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a StateTree,
    next: Option<StateId>,
}

impl Iterator for Ancestors<'_> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Iterator returned by [`StateTree::iter`].
#[derive(Debug)]
pub struct DepthFirst<'a> {
    tree: &'a StateTree,
    stack: Vec<StateId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(current).iter().rev().copied());
        Some(current)
    }
}
