// ABOUTME: Checklist tree model: items, sublists, cascading check state and merging
// Sublists are items that carry children; the checklist itself is the root sublist

use serde::{Deserialize, Serialize};

/// Address of an item inside a tree: child indices from the root down.
pub type ItemPath = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
}

/// One row of the depth-first walk over a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatItem {
    pub path: ItemPath,
    pub level: usize,
    pub checked: bool,
    pub is_list: bool,
}

impl Item {
    pub fn leaf(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            checked: false,
            items: None,
        }
    }

    pub fn list(name: &str, items: Vec<Item>) -> Self {
        Self {
            name: name.trim().to_string(),
            checked: false,
            items: Some(items),
        }
    }

    pub fn is_list(&self) -> bool {
        self.items.is_some()
    }

    pub fn children(&self) -> &[Item] {
        self.items.as_deref().unwrap_or(&[])
    }

    /// Set the check state; a sublist pushes the state down to every descendant.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
        if let Some(items) = self.items.as_mut() {
            for item in items {
                item.set_checked(checked);
            }
        }
    }

    pub fn toggle(&mut self) {
        self.set_checked(!self.checked);
    }

    /// Depth-first walk of the descendants, parents before their children.
    pub fn flatten(&self) -> Vec<FlatItem> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        self.flatten_into(0, &mut prefix, &mut out);
        out
    }

    fn flatten_into(&self, level: usize, prefix: &mut ItemPath, out: &mut Vec<FlatItem>) {
        for (idx, item) in self.children().iter().enumerate() {
            prefix.push(idx);
            out.push(FlatItem {
                path: prefix.clone(),
                level,
                checked: item.checked,
                is_list: item.is_list(),
            });
            item.flatten_into(level + 1, prefix, out);
            prefix.pop();
        }
    }

    pub fn get(&self, path: &[usize]) -> Option<&Item> {
        path.iter()
            .try_fold(self, |node, &idx| node.items.as_ref()?.get(idx))
    }

    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Item> {
        let mut node = self;
        for &idx in path {
            node = node.items.as_mut()?.get_mut(idx)?;
        }
        Some(node)
    }

    /// Check states of every descendant in walk order.
    pub fn descendant_states(&self) -> Vec<bool> {
        self.flatten().into_iter().map(|flat| flat.checked).collect()
    }

    /// Restore descendant states captured by [`Item::descendant_states`].
    pub fn restore_descendant_states(&mut self, states: &[bool]) {
        let paths: Vec<ItemPath> = self.flatten().into_iter().map(|flat| flat.path).collect();
        for (path, &checked) in paths.iter().zip(states) {
            if let Some(item) = self.get_mut(path) {
                item.checked = checked;
            }
        }
    }

    pub fn count_checked(&self) -> (usize, usize) {
        let flat = self.flatten();
        let checked = flat.iter().filter(|f| f.checked).count();
        (checked, flat.len())
    }

    pub fn all_checked(&self) -> bool {
        self.flatten().iter().all(|f| f.checked)
    }

    /// Fold `other`'s children into ours by name. Same-named sublists merge
    /// recursively; new names are appended in `other`'s order.
    pub fn merge(&mut self, other: &Item) -> &mut Self {
        let ours = self.items.get_or_insert_with(Vec::new);
        for theirs in other.children() {
            match ours.iter_mut().find(|i| i.name == theirs.name) {
                Some(existing) => {
                    if theirs.is_list() {
                        existing.merge(theirs);
                    }
                }
                None => ours.push(theirs.clone()),
            }
        }
        self
    }
}
