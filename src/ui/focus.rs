use smallvec::SmallVec;

use super::{EntryId, EntryTree};

/// One link of the focus chain: what a container currently delegates to.
///
/// The list root and every group are containers. A container's focus
/// order is its own parts (the row header, an editor) followed by its
/// visible children while expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusItem {
    /// A focusable part inside the container's own row.
    Part(u16),
    /// A nested entry.
    Child(EntryId),
}

impl EntryTree {
    /// Focus order of `container` (`None` is the list root).
    fn focus_items(&self, container: Option<EntryId>) -> SmallVec<[FocusItem; 8]> {
        let mut items = SmallVec::new();
        match container {
            None => {
                for &root in self.roots() {
                    if self.is_visible(root) {
                        items.push(FocusItem::Child(root));
                    }
                }
            }
            Some(id) => {
                let Some(node) = self.node(id) else {
                    return items;
                };
                for part in 0..node.entry.focus_parts() {
                    items.push(FocusItem::Part(part));
                }
                if node.expanded {
                    for &child in &node.children {
                        if self.is_visible(child) {
                            items.push(FocusItem::Child(child));
                        }
                    }
                }
            }
        }
        items
    }

    /// Current focus link of `container`.
    pub fn focus_link(&self, container: Option<EntryId>) -> Option<FocusItem> {
        match container {
            None => self.root_focus,
            Some(id) => self.node(id)?.focused,
        }
    }

    /// Replace a container's link, unfocusing whatever it pointed at before.
    fn set_link(&mut self, container: Option<EntryId>, item: Option<FocusItem>) {
        let previous = self.focus_link(container);
        if previous == item {
            return;
        }
        match previous {
            Some(FocusItem::Part(_)) => {
                if let Some(id) = container
                    && let Some(node) = self.node_mut(id)
                {
                    node.entry.set_focused_part(None);
                    self.refresh_height(id);
                }
            }
            Some(FocusItem::Child(child)) => self.clear_subtree_focus(child),
            None => {}
        }
        match container {
            None => self.root_focus = item,
            Some(id) => {
                if let Some(node) = self.node_mut(id) {
                    node.focused = item;
                    if let Some(FocusItem::Part(p)) = item {
                        node.entry.set_focused_part(Some(p));
                        self.refresh_height(id);
                    }
                }
            }
        }
    }

    /// Drop every focus link from `id` downward.
    pub(crate) fn clear_subtree_focus(&mut self, id: EntryId) {
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(node) = self.node_mut(cid) else {
                break;
            };
            current = match node.focused.take() {
                Some(FocusItem::Part(_)) => {
                    node.entry.set_focused_part(None);
                    self.refresh_height(cid);
                    None
                }
                Some(FocusItem::Child(child)) => Some(child),
                None => None,
            };
        }
    }

    /// Move focus to the next (or previous) focusable descendant of
    /// `container`.
    ///
    /// The currently focused child gets the first chance to move focus
    /// within itself; if it refuses, siblings are scanned in order. Entering
    /// a group forward lands on its header, entering it backward lands on its
    /// last focusable child. Returns false, with the container's link
    /// cleared, when nothing accepted focus.
    pub fn change_focus(&mut self, container: Option<EntryId>, forward: bool) -> bool {
        let items = self.focus_items(container);
        let mut current_index = None;
        if let Some(current) = self.focus_link(container) {
            match items.iter().position(|i| *i == current) {
                Some(idx) => {
                    if let FocusItem::Child(child) = current
                        && self.change_focus(Some(child), forward)
                    {
                        return true;
                    }
                    current_index = Some(idx);
                }
                None => {
                    log::debug!(
                        "pruning focus link {:?} of {:?}: no longer a member",
                        current,
                        container
                    );
                    self.set_link(container, None);
                }
            }
        }

        let candidates: SmallVec<[usize; 8]> = match (current_index, forward) {
            (Some(i), true) => (i + 1..items.len()).collect(),
            (Some(i), false) => (0..i).rev().collect(),
            (None, true) => (0..items.len()).collect(),
            (None, false) => (0..items.len()).rev().collect(),
        };

        for idx in candidates {
            match items[idx] {
                FocusItem::Part(part) => {
                    let accepts = container
                        .and_then(|id| self.node(id))
                        .is_some_and(|n| n.entry.accepts_focus(part));
                    if accepts {
                        self.set_link(container, Some(FocusItem::Part(part)));
                        return true;
                    }
                }
                FocusItem::Child(child) => {
                    // Unlink first so the child starts from its edge.
                    self.set_link(container, None);
                    if self.change_focus(Some(child), forward) {
                        self.set_link(container, Some(FocusItem::Child(child)));
                        return true;
                    }
                }
            }
        }

        self.set_link(container, None);
        false
    }

    /// Point `container`'s link at `item`.
    ///
    /// Fails, leaving the link cleared, if `item` is not currently one of the
    /// container's focusable members (removed, hidden, or collapsed away)
    /// or the part refuses focus.
    pub fn request_focus(&mut self, container: Option<EntryId>, item: FocusItem) -> bool {
        let member = self.focus_items(container).contains(&item);
        let accepts = match item {
            FocusItem::Part(part) => container
                .and_then(|id| self.node(id))
                .is_some_and(|n| n.entry.accepts_focus(part)),
            FocusItem::Child(_) => true,
        };
        if !member || !accepts {
            log::warn!(
                "rejected focus request: {:?} is not focusable in {:?}",
                item,
                container
            );
            self.set_link(container, None);
            return false;
        }
        self.set_link(container, Some(item));
        true
    }

    /// Focus `id`, linking every ancestor down to it, and optionally one of
    /// its parts.
    ///
    /// The whole chain is checked before any link moves: if `id` is hidden,
    /// collapsed away, or refuses the part, nothing changes and the
    /// previous focus holder keeps focus.
    pub fn focus_entry(&mut self, id: EntryId, part: Option<u16>) -> bool {
        if !self.contains(id) {
            return false;
        }
        let mut chain: SmallVec<[EntryId; 8]> = self.ancestors(id);
        chain.reverse();
        chain.push(id);

        let mut container = None;
        for &link in &chain {
            if !self.focus_items(container).contains(&FocusItem::Child(link)) {
                log::warn!(
                    "rejected focus request: {:?} is not focusable in {:?}",
                    link,
                    container
                );
                return false;
            }
            container = Some(link);
        }
        if let Some(p) = part {
            let accepts = self.focus_items(Some(id)).contains(&FocusItem::Part(p))
                && self.node(id).is_some_and(|n| n.entry.accepts_focus(p));
            if !accepts {
                log::warn!("rejected focus request: {:?} refuses part {}", id, p);
                return false;
            }
        }

        let mut container = None;
        for &link in &chain {
            self.set_link(container, Some(FocusItem::Child(link)));
            container = Some(link);
        }
        self.set_link(Some(id), part.map(FocusItem::Part));
        true
    }

    /// The focus chain from the list root down to the innermost link.
    pub fn focus_path(&self) -> SmallVec<[FocusItem; 8]> {
        let mut path = SmallVec::new();
        let mut link = self.root_focus;
        while let Some(item) = link {
            path.push(item);
            link = match item {
                FocusItem::Child(child) => self.node(child).and_then(|n| n.focused),
                FocusItem::Part(_) => None,
            };
        }
        path
    }

    /// Innermost focused entry and the part it focuses, if any.
    pub fn focused_entry(&self) -> Option<(EntryId, Option<u16>)> {
        let mut result = None;
        let mut container = None;
        for item in self.focus_path() {
            match item {
                FocusItem::Child(child) => {
                    result = Some((child, None));
                    container = Some(child);
                }
                FocusItem::Part(p) => {
                    if let Some(id) = container {
                        result = Some((id, Some(p)));
                    }
                }
            }
        }
        result
    }
}
