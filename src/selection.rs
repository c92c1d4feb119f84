//! Selection controller — owns the single selected node and notifies
//! listeners (the detail panel) whenever it changes.
//!
//! Lookups go against the whole graph, not the visible subset, so a node can
//! be selected programmatically even while filtered out.

use log::debug;

use crate::model::{Graph, Node};

/// Callback invoked with the new selection, or `None` when cleared.
pub type SelectionListener = Box<dyn FnMut(Option<&Node>)>;

#[derive(Default)]
pub struct SelectionController {
    current: Option<Node>,
    listeners: Vec<SelectionListener>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(Option<&Node>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn current(&self) -> Option<&Node> {
        self.current.as_ref()
    }

    /// Select `node_id` from `graph`. Unknown ids leave the selection as is.
    pub fn pick(&mut self, graph: &Graph, node_id: &str) -> Option<&Node> {
        let Some(node) = graph.node(node_id) else {
            debug!("pick ignored: no node '{}'", node_id);
            return None;
        };
        self.current = Some(node.clone());
        self.publish();
        self.current.as_ref()
    }

    /// Clear the selection; listeners only hear about it if something was selected.
    pub fn dismiss(&mut self) {
        if self.current.take().is_some() {
            self.publish();
        }
    }

    fn publish(&mut self) {
        let current = self.current.as_ref();
        for listener in &mut self.listeners {
            listener(current);
        }
    }
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("current", &self.current.as_ref().map(|n| n.id.as_str()))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_selection.rs"]
mod tests;
