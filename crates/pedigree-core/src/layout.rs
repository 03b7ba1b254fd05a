//! Geometry for drawing an ancestry tree as a node-link diagram.
//!
//! The layout is horizontal: the root sits in the leftmost column and each
//! generation is one column further right. Leaves are stacked top to bottom
//! in tree order (father above mother), and every inner node is centred on
//! its first and last parent. Units are whatever the renderer chooses
//! (pixels for the web viewer, character cells for the terminal).

use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_LEVEL_GAP, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, DEFAULT_NODE_HEIGHT,
    DEFAULT_NODE_WIDTH, DEFAULT_SIBLING_GAP,
};
use crate::horse::HorseId;
use crate::lineage::TreeNode;

// =============================================================================
// Configuration
// =============================================================================

/// Fixed per-node spacing and the allowed zoom range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Horizontal gap between generations.
    pub level_gap: f64,
    /// Vertical gap between stacked cards.
    pub sibling_gap: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            level_gap: DEFAULT_LEVEL_GAP,
            sibling_gap: DEFAULT_SIBLING_GAP,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
        }
    }
}

impl LayoutConfig {
    fn column_step(&self) -> f64 {
        self.node_width + self.level_gap
    }

    fn row_step(&self) -> f64 {
        self.node_height + self.sibling_gap
    }
}

// =============================================================================
// Layout
// =============================================================================

/// A card placed in layout space. `(x, y)` is its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: HorseId,
    pub name: String,
    pub breed: String,
    pub photo_url: Option<String>,
    /// Generation, 0 for the root.
    pub depth: usize,
    pub x: f64,
    pub y: f64,
}

/// Edge from a node to one of its parents, as indices into `nodes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link {
    pub parent: usize,
    pub child: usize,
}

/// A fully positioned tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLayout {
    /// Nodes in preorder; index 0 is the root.
    pub nodes: Vec<PositionedNode>,
    pub links: Vec<Link>,
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    pub node_height: f64,
}

impl TreeLayout {
    /// Position every node of `root`.
    pub fn compute(root: &TreeNode, config: &LayoutConfig) -> Self {
        let mut layout = Self {
            nodes: Vec::with_capacity(root.len()),
            links: Vec::new(),
            width: 0.0,
            height: 0.0,
            node_width: config.node_width,
            node_height: config.node_height,
        };

        let mut next_row = 0usize;
        layout.place(root, 0, None, config, &mut next_row);

        let columns = root.depth() as f64;
        layout.width = columns * config.column_step() - config.level_gap;
        layout.height = next_row as f64 * config.row_step() - config.sibling_gap;
        layout
    }

    /// Place `node` and its subtree; returns the node's `y`.
    fn place(
        &mut self,
        node: &TreeNode,
        depth: usize,
        parent: Option<usize>,
        config: &LayoutConfig,
        next_row: &mut usize,
    ) -> f64 {
        let index = self.nodes.len();
        self.nodes.push(PositionedNode {
            id: node.id.clone(),
            name: node.name.clone(),
            breed: node.breed.clone(),
            photo_url: node.photo_url.clone(),
            depth,
            x: depth as f64 * config.column_step(),
            y: 0.0,
        });

        if let Some(parent) = parent {
            self.links.push(Link {
                parent,
                child: index,
            });
        }

        let y = if node.children.is_empty() {
            let y = *next_row as f64 * config.row_step();
            *next_row += 1;
            y
        } else {
            let ys: Vec<f64> = node
                .children
                .iter()
                .map(|child| self.place(child, depth + 1, Some(index), config, next_row))
                .collect();
            (ys[0] + ys[ys.len() - 1]) / 2.0
        };

        self.nodes[index].y = y;
        y
    }

    /// Index of the card covering the layout-space point, if any.
    pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
        self.nodes.iter().position(|node| {
            x >= node.x
                && x < node.x + self.node_width
                && y >= node.y
                && y < node.y + self.node_height
        })
    }
}

// =============================================================================
// Viewport
// =============================================================================

/// Pan and zoom state over a layout.
///
/// Screen position = layout position * `scale` + offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    min_scale: f64,
    max_scale: f64,
}

impl Viewport {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0_f64.clamp(config.min_scale, config.max_scale),
            min_scale: config.min_scale,
            max_scale: config.max_scale,
        }
    }

    /// Move the view by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Zoom around the screen origin.
    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom_at(factor, 0.0, 0.0);
    }

    /// Zoom keeping the screen point `(cx, cy)` fixed. The scale never
    /// leaves the configured range.
    pub fn zoom_at(&mut self, factor: f64, cx: f64, cy: f64) {
        let scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        let ratio = scale / self.scale;
        self.offset_x = cx - (cx - self.offset_x) * ratio;
        self.offset_y = cy - (cy - self.offset_y) * ratio;
        self.scale = scale;
    }

    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }

    pub fn to_layout(&self, sx: f64, sy: f64) -> (f64, f64) {
        ((sx - self.offset_x) / self.scale, (sy - self.offset_y) / self.scale)
    }

    pub fn scale_bounds(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    pub fn reset(&mut self) {
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.scale = 1.0_f64.clamp(self.min_scale, self.max_scale);
    }
}
