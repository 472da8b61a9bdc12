//! Mermaid rendering of a finalized state tree.
//!
//! The renderer only reads the tree: structure, init children, entry/exit
//! presence and the annotations registered on the builder.

use crate::core::{StateId, StateTree};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const INDENT: &str = "    ";

/// Rendering options.
///
/// Deserializes from partial input; missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Label states as `State <name> (<full name>)` instead of `<name>`.
    pub detailed: bool,
    /// Add notes describing entry and exit actions.
    pub entry_exit: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            detailed: true,
            entry_exit: true,
        }
    }
}

/// Render `tree` as a mermaid `stateDiagram-v2` body.
pub fn render(tree: &StateTree, config: &DiagramConfig) -> String {
    let renderer = Renderer::new(tree, config);
    let mut out = String::from("stateDiagram-v2\n");
    renderer.state(&mut out, tree.root());
    renderer.transitions(&mut out);
    out
}

/// [`render`] wrapped in a fenced markdown code block.
pub fn render_markdown(tree: &StateTree, config: &DiagramConfig) -> String {
    format!("```mermaid\n{}```\n", render(tree, config))
}

struct Renderer<'a> {
    tree: &'a StateTree,
    config: &'a DiagramConfig,
    linked: HashSet<StateId>,
}

impl<'a> Renderer<'a> {
    fn new(tree: &'a StateTree, config: &'a DiagramConfig) -> Self {
        let mut linked = HashSet::new();
        for id in tree.iter() {
            for note in &tree.node(id).annotations().transitions {
                linked.insert(id);
                linked.insert(note.target);
            }
        }
        Self {
            tree,
            config,
            linked,
        }
    }

    fn tag(&self, id: StateId) -> String {
        self.tree.full_name(id)
    }

    fn label(&self, id: StateId) -> String {
        let name = self.tree.node(id).name().unwrap_or_default();
        if self.config.detailed {
            format!("State {name} ({})", self.tag(id))
        } else {
            name.to_string()
        }
    }

    fn state(&self, out: &mut String, id: StateId) {
        let node = self.tree.node(id);
        let indent = INDENT.repeat(node.depth());
        let tag = self.tag(id);

        if !node.is_leaf() {
            if !node.is_root() {
                out.push_str(&format!("{indent}{tag}: {}\n", self.label(id)));
                out.push_str(&format!("{indent}state {tag} {{\n"));
            }
            for (i, child) in node.children().iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                self.state(out, *child);
            }
            if let Some(init) = node.init_child() {
                out.push_str(&format!("{INDENT}{indent}[*] --> {}\n", self.tag(init)));
            }
            if !node.is_root() {
                out.push_str(&format!("{indent}}}\n"));
            }
            self.entry_exit(out, id, &indent);
            return;
        }

        out.push_str(&format!("{indent}{tag}: {}\n", self.label(id)));
        out.push_str(&format!("{indent}state {tag}\n"));
        // Mermaid drops states without any edge.
        let is_init = node
            .parent()
            .is_some_and(|parent| self.tree.node(parent).init_child() == Some(id));
        if !is_init && !self.linked.contains(&id) {
            out.push_str(&format!("{indent}{tag} --> {tag}: Dummy\n"));
        }
        self.entry_exit(out, id, &indent);
    }

    fn entry_exit(&self, out: &mut String, id: StateId, indent: &str) {
        let node = self.tree.node(id);
        let tag = self.tag(id);
        let annotations = node.annotations();

        if let Some(when) = &annotations.exit_when {
            out.push_str(&format!("{indent}{tag} --> [*]: {when}\n"));
        }
        if !self.config.entry_exit {
            return;
        }
        if node.has_entry() {
            let doc = annotations.entry_doc.as_deref().unwrap_or("...");
            self.note(out, &tag, indent, &format!("on entry:\n{doc}"));
        }
        if node.has_exit() {
            let doc = annotations.exit_doc.as_deref().unwrap_or("...");
            self.note(out, &tag, indent, &format!("on exit:\n{doc}"));
        }
    }

    fn note(&self, out: &mut String, tag: &str, indent: &str, text: &str) {
        out.push_str(&format!("{indent}note right of {tag}\n"));
        for line in text.lines() {
            out.push_str(&format!("{indent}   {line}\n"));
        }
        out.push_str(&format!("{indent}end note\n"));
    }

    fn transitions(&self, out: &mut String) {
        out.push_str(&format!("\n{INDENT}%% Transitions\n"));
        for id in self.tree.iter() {
            for note in &self.tree.node(id).annotations().transitions {
                out.push_str(&format!(
                    "{INDENT}{} --> {}: {}\n",
                    self.tag(id),
                    self.tag(note.target),
                    note.when
                ));
            }
        }
    }
}
