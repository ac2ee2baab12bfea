use std::fmt::Write;

use crate::errors::CoreError;
use crate::models::chart::{ChartOutcome, Shape, ShapeRole};
use crate::models::settings::Palette;

const MARKER_OUTLINE_WIDTH: f64 = 1.5;

/// Writes chart outcomes as standalone SVG documents.
pub struct SvgService;

impl SvgService {
    pub fn new() -> Self {
        Self
    }

    /// One `<svg>` element sized to the chart, one child per shape.
    ///
    /// `InsufficientData` renders as an empty `<svg>` of the same size so
    /// page layout does not jump.
    pub fn to_svg(&self, outcome: &ChartOutcome, palette: &Palette) -> Result<String, CoreError> {
        let (width, height) = outcome.size();
        let (w, h) = (num(width), num(height));
        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;
        for shape in outcome.shapes() {
            write_shape(&mut svg, shape, palette)?;
        }
        writeln!(svg, "</svg>")?;
        Ok(svg)
    }
}

impl Default for SvgService {
    fn default() -> Self {
        Self::new()
    }
}

fn write_shape(svg: &mut String, shape: &Shape, palette: &Palette) -> Result<(), CoreError> {
    let color = color_for(shape.role(), palette);
    match shape {
        Shape::Line { x1, y1, x2, y2, .. } => writeln!(
            svg,
            r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" />"#,
            num(*x1),
            num(*y1),
            num(*x2),
            num(*y2),
            escape(color)
        )?,
        Shape::Polyline {
            points,
            stroke_width,
            ..
        } => {
            let coords: Vec<String> = points
                .iter()
                .map(|p| format!("{},{}", num(p.x), num(p.y)))
                .collect();
            writeln!(
                svg,
                r#"  <polyline fill="none" stroke="{}" stroke-width="{}" points="{}" />"#,
                escape(color),
                num(*stroke_width),
                coords.join(" ")
            )?
        }
        Shape::Circle { cx, cy, r, .. } => writeln!(
            svg,
            r#"  <circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}" />"#,
            num(*cx),
            num(*cy),
            num(*r),
            escape(color),
            escape(&palette.marker_outline),
            num(MARKER_OUTLINE_WIDTH)
        )?,
        Shape::Rect {
            x,
            y,
            width,
            height,
            ..
        } => writeln!(
            svg,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
            num(*x),
            num(*y),
            num(*width),
            num(*height),
            escape(color)
        )?,
        Shape::Text {
            x,
            y,
            content,
            font_size,
            anchor,
            bold,
            ..
        } => {
            let weight = if *bold { r#" font-weight="bold""# } else { "" };
            writeln!(
                svg,
                r#"  <text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{}"{}>{}</text>"#,
                num(*x),
                num(*y),
                num(*font_size),
                escape(color),
                anchor.as_str(),
                weight,
                escape(content)
            )?
        }
    }
    Ok(())
}

fn color_for(role: ShapeRole, palette: &Palette) -> &str {
    match role {
        ShapeRole::GridLine => palette.grid.as_str(),
        ShapeRole::Axis => palette.axis.as_str(),
        ShapeRole::Curve | ShapeRole::Marker => palette.curve.as_str(),
        ShapeRole::Bar => palette.bar.as_str(),
        ShapeRole::TickLabel => palette.tick_label.as_str(),
        ShapeRole::ValueLabel => palette.value_label.as_str(),
        ShapeRole::AxisTitle => palette.title.as_str(),
    }
}

/// Coordinates rounded to two decimals, without trailing zeros.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

/// Escape text for XML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
