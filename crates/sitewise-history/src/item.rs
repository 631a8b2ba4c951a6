#![forbid(unsafe_code)]

//! Items tracked by the history manager.
//!
//! The manager only ever looks at an item's id. Everything else an item
//! carries (geometry, style, text) is opaque to it. Two representations are
//! provided:
//!
//! - [`Annotation`]: a typed tagged union for the PDF annotation canvas,
//!   serialized with a `type` discriminant.
//! - [`RawItem`]: an id plus an open JSON mapping, for callers that keep
//!   their own schema.
//!
//! Any other type can take part by implementing [`HistoryItem`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Something the history manager can store, snapshot, and serialize.
///
/// `id()` must be stable for the lifetime of the item: the manager rejects
/// updates that change it.
pub trait HistoryItem: Clone + PartialEq + Serialize + DeserializeOwned {
    /// Identifier unique within one document.
    fn id(&self) -> &str;

    /// Why this item could not survive a serialize/load round trip, if it
    /// could not. `add`, `update`, and `load` refuse items that report one.
    fn invalid_reason(&self) -> Option<String> {
        None
    }
}

// ============================================================================
// Typed annotations
// ============================================================================

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Return this point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Stroke and fill shared by every annotation kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// CSS color string for outlines and text.
    pub stroke: String,
    /// CSS color string for the interior, `None` for hollow shapes.
    pub fill: Option<String>,
    pub stroke_width: f64,
    /// 0.0 (transparent) to 1.0 (opaque).
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: "#e11d48".to_string(),
            fill: None,
            stroke_width: 2.0,
            opacity: 1.0,
        }
    }
}

/// Geometry of an annotation, keyed by the `type` discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Rect {
        origin: Point,
        width: f64,
        height: f64,
    },
    Ellipse {
        center: Point,
        rx: f64,
        ry: f64,
    },
    Line {
        start: Point,
        end: Point,
    },
    Arrow {
        start: Point,
        end: Point,
        head_size: f64,
    },
    /// Free-hand stroke.
    Pen {
        points: Vec<Point>,
    },
    Text {
        origin: Point,
        text: String,
        font_size: f64,
    },
    Sticky {
        origin: Point,
        text: String,
        collapsed: bool,
    },
    Highlight {
        origin: Point,
        width: f64,
        height: f64,
    },
}

impl Shape {
    /// Translate every point of the shape by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Rect { origin, .. }
            | Self::Text { origin, .. }
            | Self::Sticky { origin, .. }
            | Self::Highlight { origin, .. } => *origin = origin.offset(dx, dy),
            Self::Ellipse { center, .. } => *center = center.offset(dx, dy),
            Self::Line { start, end } | Self::Arrow { start, end, .. } => {
                *start = start.offset(dx, dy);
                *end = end.offset(dx, dy);
            }
            Self::Pen { points } => {
                for p in points.iter_mut() {
                    *p = p.offset(dx, dy);
                }
            }
        }
    }

    /// Whether every coordinate and length is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Rect { origin, width, height } | Self::Highlight { origin, width, height } => {
                origin.is_finite() && width.is_finite() && height.is_finite()
            }
            Self::Ellipse { center, rx, ry } => {
                center.is_finite() && rx.is_finite() && ry.is_finite()
            }
            Self::Line { start, end } => start.is_finite() && end.is_finite(),
            Self::Arrow { start, end, head_size } => {
                start.is_finite() && end.is_finite() && head_size.is_finite()
            }
            Self::Pen { points } => points.iter().all(|p| p.is_finite()),
            Self::Text { origin, font_size, .. } => origin.is_finite() && font_size.is_finite(),
            Self::Sticky { origin, .. } => origin.is_finite(),
        }
    }

    /// Discriminant as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Ellipse { .. } => "ellipse",
            Self::Line { .. } => "line",
            Self::Arrow { .. } => "arrow",
            Self::Pen { .. } => "pen",
            Self::Text { .. } => "text",
            Self::Sticky { .. } => "sticky",
            Self::Highlight { .. } => "highlight",
        }
    }
}

/// One annotation on a page canvas.
///
/// Serializes flat: `{"id": "...", "type": "rect", "origin": {...}, "style": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(default)]
    pub style: Style,
}

impl Annotation {
    #[must_use]
    pub fn new(id: impl Into<String>, shape: Shape) -> Self {
        Self {
            id: id.into(),
            shape,
            style: Style::default(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl HistoryItem for Annotation {
    fn id(&self) -> &str {
        &self.id
    }

    /// Non-finite numbers encode as JSON `null` and cannot be read back.
    fn invalid_reason(&self) -> Option<String> {
        if !self.shape.is_finite() {
            return Some(format!("{} geometry has a non-finite value", self.shape.kind()));
        }
        if !(self.style.stroke_width.is_finite() && self.style.opacity.is_finite()) {
            return Some("style has a non-finite value".to_string());
        }
        None
    }
}

// ============================================================================
// Opaque items
// ============================================================================

/// An item with an id and arbitrary JSON fields.
///
/// Field order in the serialized form is sorted by key, so output is
/// deterministic regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawItem {
    pub id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl RawItem {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: serde_json::Map::new(),
        }
    }

    /// Set a field, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

impl HistoryItem for RawItem {
    fn id(&self) -> &str {
        &self.id
    }

    /// An `id` key in `fields` would be written next to the real id and
    /// make the encoded document unreadable.
    fn invalid_reason(&self) -> Option<String> {
        self.fields
            .contains_key("id")
            .then(|| "fields must not contain an 'id' key".to_string())
    }
}
