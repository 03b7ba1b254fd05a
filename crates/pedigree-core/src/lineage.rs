//! Ancestry resolution.
//!
//! Turns the flat horse collection into a bounded-depth ancestry tree and
//! resolves parent references for display. Parent references are followed
//! by id only and are never trusted: a reference may dangle, point at a
//! horse of the "wrong" sex, or loop back on itself.
//!
//! The depth bound is the only guard against cyclic parent graphs. There is
//! deliberately no visited set: in a pedigree the same ancestor legitimately
//! shows up on several branches (line breeding), and each appearance must be
//! drawn.

use serde::Serialize;

use crate::horse::{Horse, HorseId, Sex};

pub use crate::config::DEFAULT_MAX_DEPTH;

/// One horse in a materialized ancestry tree.
///
/// `children` holds the resolved parents, father first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: HorseId,
    pub name: String,
    pub breed: String,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub photo_url: Option<String>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(horse: &Horse) -> Self {
        Self {
            id: horse.id.clone(),
            name: horse.name.clone(),
            breed: horse.breed.clone(),
            age: horse.age,
            sex: horse.sex,
            photo_url: horse.photo_url.clone(),
            children: Vec::new(),
        }
    }

    /// Generations on the longest root-to-leaf path (a lone node is 1).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Total number of nodes, repeated ancestors counted each time.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::len).sum::<usize>()
    }

    /// A tree always contains its root.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Materialize the ancestry of `root` up to `max_depth` generations.
///
/// Returns `None` when there is no root or `max_depth` is 0. Nodes in the
/// last materialized generation never have children, whatever parent ids
/// they carry. Unresolvable parent ids are skipped without a placeholder.
pub fn materialize(root: Option<&Horse>, all: &[Horse], max_depth: usize) -> Option<TreeNode> {
    let root = root?;
    if max_depth == 0 {
        return None;
    }
    Some(build(root, all, 0, max_depth))
}

fn build(horse: &Horse, all: &[Horse], depth: usize, max_depth: usize) -> TreeNode {
    let mut node = TreeNode::leaf(horse);

    if depth + 1 < max_depth {
        for parent_id in [&horse.father_id, &horse.mother_id].into_iter().flatten() {
            if let Some(parent) = find_horse(all, parent_id) {
                node.children.push(build(parent, all, depth + 1, max_depth));
            }
        }
    }

    node
}

/// Linear lookup by id.
pub fn find_horse<'a>(all: &'a [Horse], id: &HorseId) -> Option<&'a Horse> {
    all.iter().find(|horse| &horse.id == id)
}

/// What a parent reference resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParentLink<'a> {
    /// No parent was registered.
    NotRegistered,
    /// A parent id is set but no loaded horse carries it.
    Unknown,
    Known(&'a Horse),
}

impl<'a> ParentLink<'a> {
    pub fn name(&self) -> Option<&'a str> {
        match self {
            Self::Known(horse) => Some(horse.name.as_str()),
            _ => None,
        }
    }

    /// Text shown in place of the parent's name.
    pub fn label(&self) -> &'a str {
        match self {
            Self::NotRegistered => "Not registered",
            Self::Unknown => "Unknown",
            Self::Known(horse) => horse.name.as_str(),
        }
    }
}

/// Resolve an optional parent reference against the collection.
pub fn resolve_parent<'a>(all: &'a [Horse], id: Option<&HorseId>) -> ParentLink<'a> {
    match id {
        None => ParentLink::NotRegistered,
        Some(id) => find_horse(all, id).map_or(ParentLink::Unknown, ParentLink::Known),
    }
}

/// Name of the referenced parent, if it resolves.
pub fn parent_name<'a>(all: &'a [Horse], id: Option<&HorseId>) -> Option<&'a str> {
    resolve_parent(all, id).name()
}
