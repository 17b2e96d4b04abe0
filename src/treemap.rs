//! Greedy rectangle packing for the tag treemap.
//!
//! Items are laid out largest first, left to right, in rows:
//!
//! ```text
//! ┌──────────────┬─────────┐   area(item) = count / Σcount × W × H
//! │  TypeScript  │  React  │   width      = min(W, √(area × W / H))
//! ├──────┬───────┴─┬───────┤   height     = area / width
//! │ CSS  │  Rust   │  Go   │
//! └──────┴─────────┴───────┘   wrap when the row would pass W
//! ```
//!
//! Rows are as tall as their tallest item. This is a heuristic with no
//! aspect-ratio correction, so the last row may run past `H`; the total
//! allocated area still equals `W × H`.
//!
//! Hierarchical data is laid out one level at a time. [`TreemapView`] keeps
//! the zoom path (breadcrumb) and yields the level currently on screen.

use crate::config::{TreemapColorScheme, TreemapConfig};
use crate::slug::slugify;
use crate::tags::tag_color;
use crate::types::TagRecord;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TreemapError {
    #[error("invalid treemap canvas {width}×{height}: dimensions must be finite and positive")]
    InvalidCanvas { width: f64, height: f64 },
}

/// Drawing area and the gap left between rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: 2.0,
        }
    }

    pub fn from_config(config: &TreemapConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            padding: config.padding,
        }
    }

    fn check(&self) -> Result<(), TreemapError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(TreemapError::InvalidCanvas {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// A placed rectangle. `(x1, y1)` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapRect {
    pub name: String,
    pub count: u32,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: String,
    /// True for categories that can be zoomed into.
    pub zoomable: bool,
}

impl TreemapRect {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Label shown inside the rectangle, if it is large enough for one.
    ///
    /// Names longer than 12 characters are cut to 12 plus `...`.
    pub fn label(&self) -> Option<String> {
        if self.width() <= 60.0 || self.height() <= 30.0 {
            return None;
        }
        let mut chars = self.name.chars();
        let head: String = chars.by_ref().take(12).collect();
        Some(if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        })
    }

    /// Label font size in px, 10 to 14 depending on area.
    pub fn font_size(&self) -> f64 {
        ((self.width() * self.height()).sqrt() / 10.0).clamp(10.0, 14.0)
    }

    pub fn title(&self) -> String {
        format!("{}: {} posts", self.name, self.count)
    }
}

/// Pack `items` into `canvas`.
///
/// Empty input, or input whose counts are all zero, yields no rectangles.
pub fn pack(items: &[TagRecord], canvas: &Canvas) -> Result<Vec<TreemapRect>, TreemapError> {
    canvas.check()?;

    let mut sorted: Vec<&TagRecord> = items.iter().filter(|i| i.count > 0).collect();
    let total: f64 = sorted.iter().map(|i| f64::from(i.count)).sum();
    if sorted.is_empty() || total <= 0.0 {
        return Ok(Vec::new());
    }
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    let Canvas {
        width,
        height,
        padding,
    } = *canvas;
    let mut rects = Vec::with_capacity(sorted.len());
    let (mut x, mut y, mut row_height) = (0.0_f64, 0.0_f64, 0.0_f64);

    for item in sorted {
        let area = f64::from(item.count) / total * width * height;
        let w = width.min((area * width / height).sqrt());
        let h = area / w;

        if x > 0.0 && x + w > width {
            y += row_height + padding;
            x = 0.0;
            row_height = 0.0;
        }

        rects.push(TreemapRect {
            name: item.name.clone(),
            count: item.count,
            x1: x,
            y1: y,
            x2: (x + w - padding).max(x),
            y2: (y + h - padding).max(y),
            color: item
                .color
                .clone()
                .unwrap_or_else(|| tag_color(&item.name, item.count)),
            zoomable: item.has_children(),
        });

        x += w;
        row_height = row_height.max(h);
    }

    Ok(rects)
}

/// Recolor packed rectangles for the configured scheme.
///
/// - `category` keeps the stored colors;
/// - `frequency` shades one hue by each item's share of the largest count;
/// - `custom` cycles through `custom_colors` (stored colors if none given).
pub fn apply_color_scheme(
    rects: &mut [TreemapRect],
    scheme: TreemapColorScheme,
    custom_colors: Option<&[String]>,
) {
    match scheme {
        TreemapColorScheme::Category => {}
        TreemapColorScheme::Frequency => {
            let max = rects.iter().map(|r| r.count).max().unwrap_or(0).max(1);
            for rect in rects.iter_mut() {
                let share = f64::from(rect.count) / f64::from(max);
                let lightness = (80.0 - 45.0 * share).round();
                rect.color = format!("hsl(212, 72%, {lightness}%)");
            }
        }
        TreemapColorScheme::Custom => {
            let Some(palette) = custom_colors.filter(|p| !p.is_empty()) else {
                return;
            };
            for (i, rect) in rects.iter_mut().enumerate() {
                rect.color = palette[i % palette.len()].clone();
            }
        }
    }
}

/// Page for a tag, e.g. `/tags/web-development`.
pub fn tag_link(name: &str) -> String {
    format!("/tags/{}", slugify(name))
}

/// What clicking a rectangle does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    ZoomedIn,
    OpenTag(String),
    Nothing,
}

/// Zoom state over hierarchical tag data.
#[derive(Debug, Clone)]
pub struct TreemapView<'a> {
    root: &'a [TagRecord],
    breadcrumb: Vec<String>,
}

impl<'a> TreemapView<'a> {
    pub fn new(root: &'a [TagRecord]) -> Self {
        Self {
            root,
            breadcrumb: Vec::new(),
        }
    }

    /// Category names from the root down to the current level.
    pub fn breadcrumb(&self) -> &[String] {
        &self.breadcrumb
    }

    /// Records on the current level.
    pub fn current(&self) -> &'a [TagRecord] {
        level_at(self.root, &self.breadcrumb)
    }

    /// Descend into the category `name` on the current level.
    ///
    /// Returns `false` (and stays put) if there is no such category with
    /// children.
    pub fn zoom_in(&mut self, name: &str) -> bool {
        let zoomable = self
            .current()
            .iter()
            .any(|r| r.name == name && r.has_children());
        if zoomable {
            self.breadcrumb.push(name.to_string());
        }
        zoomable
    }

    /// `Some(i)` returns to breadcrumb entry `i`; `None` returns to the root.
    pub fn zoom_out(&mut self, index: Option<usize>) {
        match index {
            Some(i) => self.breadcrumb.truncate(i + 1),
            None => self.breadcrumb.clear(),
        }
    }

    pub fn layout(&self, canvas: &Canvas) -> Result<Vec<TreemapRect>, TreemapError> {
        pack(self.current(), canvas)
    }

    /// Zoom into categories, or resolve a tag link for leaves.
    pub fn click(&mut self, name: &str, config: &TreemapConfig) -> ClickAction {
        if config.enable_zoom && self.zoom_in(name) {
            return ClickAction::ZoomedIn;
        }
        let is_leaf = self
            .current()
            .iter()
            .any(|r| r.name == name && !r.has_children());
        if is_leaf && config.link_to_tag_pages {
            ClickAction::OpenTag(tag_link(name))
        } else {
            ClickAction::Nothing
        }
    }
}

fn level_at<'a>(root: &'a [TagRecord], path: &[String]) -> &'a [TagRecord] {
    let mut level = root;
    for name in path {
        match level
            .iter()
            .find(|r| &r.name == name)
            .and_then(|r| r.children.as_deref())
        {
            Some(children) => level = children,
            None => break,
        }
    }
    level
}
