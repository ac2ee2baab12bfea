use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One point of the cumulative XP series.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// Timestamp copied verbatim from the source record
    pub timestamp: String,

    /// Sum of all amounts up to and including this record
    pub running_total: f64,
}

/// Audit counts keyed by `"YYYY-MM"`.
///
/// A `BTreeMap` iterates keys lexicographically, which for zero-padded
/// keys is chronological order.
pub type MonthBucketMap = BTreeMap<String, u32>;

/// A point in viewport coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledPoint {
    pub x: f64,
    pub y: f64,
}

impl ScaledPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which of the two dashboard charts a drawing belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Cumulative XP over time
    XpLine,
    /// Audits per calendar month
    AuditBars,
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::XpLine => write!(f, "XP line chart"),
            ChartKind::AuditBars => write!(f, "audit bar chart"),
        }
    }
}

/// What a shape is for. Painters style shapes by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeRole {
    GridLine,
    Axis,
    Curve,
    Marker,
    Bar,
    TickLabel,
    ValueLabel,
    AxisTitle,
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// A drawable primitive in viewport coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Line {
        role: ShapeRole,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline {
        role: ShapeRole,
        points: Vec<ScaledPoint>,
        stroke_width: f64,
    },
    Circle {
        role: ShapeRole,
        cx: f64,
        cy: f64,
        r: f64,
    },
    Rect {
        role: ShapeRole,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Text {
        role: ShapeRole,
        x: f64,
        y: f64,
        content: String,
        font_size: f64,
        anchor: TextAnchor,
        bold: bool,
    },
}

impl Shape {
    pub fn role(&self) -> ShapeRole {
        match self {
            Shape::Line { role, .. }
            | Shape::Polyline { role, .. }
            | Shape::Circle { role, .. }
            | Shape::Rect { role, .. }
            | Shape::Text { role, .. } => *role,
        }
    }

    /// Text content, if this is a text shape.
    pub fn text(&self) -> Option<&str> {
        match self {
            Shape::Text { content, .. } => Some(content),
            _ => None,
        }
    }
}

/// A complete chart: viewport size plus shapes in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub kind: ChartKind,
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

impl Drawing {
    pub fn new(kind: ChartKind, width: f64, height: f64) -> Self {
        Self {
            kind,
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// All shapes with the given role, in paint order.
    pub fn with_role(&self, role: ShapeRole) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(move |s| s.role() == role)
    }

    pub fn count(&self, role: ShapeRole) -> usize {
        self.with_role(role).count()
    }

    /// Text content of every shape with the given role.
    pub fn texts(&self, role: ShapeRole) -> Vec<&str> {
        self.with_role(role).filter_map(Shape::text).collect()
    }
}

/// Result of rendering a chart.
///
/// `InsufficientData` is a normal outcome, not an error: the painter shows
/// an empty chart of the given size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    Drawn(Drawing),
    InsufficientData {
        kind: ChartKind,
        width: f64,
        height: f64,
    },
}

impl ChartOutcome {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartOutcome::Drawn(d) => d.kind,
            ChartOutcome::InsufficientData { kind, .. } => *kind,
        }
    }

    /// Viewport size as `(width, height)`.
    pub fn size(&self) -> (f64, f64) {
        match self {
            ChartOutcome::Drawn(d) => (d.width, d.height),
            ChartOutcome::InsufficientData { width, height, .. } => (*width, *height),
        }
    }

    #[must_use]
    pub fn is_insufficient(&self) -> bool {
        matches!(self, ChartOutcome::InsufficientData { .. })
    }

    pub fn drawing(&self) -> Option<&Drawing> {
        match self {
            ChartOutcome::Drawn(d) => Some(d),
            ChartOutcome::InsufficientData { .. } => None,
        }
    }

    /// Shapes to paint; empty when there is not enough data.
    pub fn shapes(&self) -> &[Shape] {
        match self {
            ChartOutcome::Drawn(d) => &d.shapes,
            ChartOutcome::InsufficientData { .. } => &[],
        }
    }
}
