use chrono::TimeZone;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::chart::{
    ChartKind, ChartOutcome, CumulativePoint, Drawing, MonthBucketMap, ScaledPoint, Shape,
    ShapeRole, TextAnchor,
};
use crate::models::settings::ChartLayout;
use crate::models::timestamp::{month_label, month_label_from_key, parse_timestamp};
use crate::services::scale::{label_indices, round_half_up, DataState, LinearScale};

/// Title of the XP chart's value axis.
pub const XP_AXIS_TITLE: &str = "XP";
/// Title of the XP chart's time axis.
pub const TIME_AXIS_TITLE: &str = "Temps";
/// Title of the audit chart's value axis.
pub const AUDIT_AXIS_TITLE: &str = "Audits";

/// Shift that centres a tick label vertically on its grid line.
const LABEL_BASELINE_NUDGE: f64 = 4.0;
/// Distance from the bottom edge to the time-axis title baseline.
const TIME_TITLE_INSET: f64 = 12.0;

/// Turns chart series into drawable shapes.
///
/// The core computes all the geometry; the frontend only paints.
/// Output is a pure function of the input and the layout: no state is
/// kept between calls.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Render the cumulative XP series as a line chart.
    ///
    /// Draws, in paint order:
    /// 1. Horizontal grid lines with grouped-digit value labels
    /// 2. Vertical grid lines with `MM/YY` labels at thinned indices
    /// 3. The curve through every point, then one marker per point
    /// 4. Both axes and their titles
    ///
    /// Fewer than two points, or a flat series, yields
    /// `ChartOutcome::InsufficientData`. Every timestamp is parsed before
    /// anything is drawn, so one that does not parse fails the render
    /// wherever it sits in the series.
    pub fn render_xp_line<Tz: TimeZone>(
        &self,
        points: &[CumulativePoint],
        layout: &ChartLayout,
        thousands_separator: &str,
        tz: &Tz,
    ) -> Result<ChartOutcome, CoreError> {
        let stamps = points
            .iter()
            .map(|p| parse_timestamp(&p.timestamp, tz))
            .collect::<Result<Vec<_>, _>>()?;
        let values: Vec<f64> = points.iter().map(|p| p.running_total).collect();
        let scale = LinearScale::for_values(layout, &values);

        if scale.state() == DataState::InsufficientData {
            debug!(points = points.len(), "not enough XP data to draw a curve");
            return Ok(insufficient(ChartKind::XpLine, layout));
        }

        let mut drawing = Drawing::new(ChartKind::XpLine, layout.width, layout.height);
        let left = layout.padding;
        let right = layout.width - layout.padding;
        let top = layout.padding;
        let baseline = layout.baseline();

        for tick in scale.ticks(layout.y_ticks) {
            drawing.push(Shape::Line {
                role: ShapeRole::GridLine,
                x1: left - layout.grid_overhang,
                y1: tick.y,
                x2: right,
                y2: tick.y,
            });
            drawing.push(Shape::Text {
                role: ShapeRole::TickLabel,
                x: left - layout.tick_label_gap,
                y: tick.y + LABEL_BASELINE_NUDGE,
                content: format_grouped(tick.value, thousands_separator),
                font_size: layout.tick_font_size,
                anchor: TextAnchor::End,
                bold: false,
            });
        }

        for idx in label_indices(points.len(), layout.max_x_labels) {
            let x = scale.x(idx);
            drawing.push(Shape::Line {
                role: ShapeRole::GridLine,
                x1: x,
                y1: baseline,
                x2: x,
                y2: top,
            });
            drawing.push(Shape::Text {
                role: ShapeRole::TickLabel,
                x,
                y: baseline + layout.x_label_offset,
                content: month_label(&stamps[idx]),
                font_size: layout.x_label_font_size,
                anchor: TextAnchor::Middle,
                bold: false,
            });
        }

        let scaled: Vec<ScaledPoint> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| scale.point(i, v))
            .collect();

        drawing.push(Shape::Polyline {
            role: ShapeRole::Curve,
            points: scaled.clone(),
            stroke_width: layout.curve_width,
        });
        for p in &scaled {
            drawing.push(Shape::Circle {
                role: ShapeRole::Marker,
                cx: p.x,
                cy: p.y,
                r: layout.marker_radius,
            });
        }

        push_axes(&mut drawing, layout);
        drawing.push(title(XP_AXIS_TITLE, left, top - layout.title_offset, TextAnchor::Start, layout));
        drawing.push(title(
            TIME_AXIS_TITLE,
            right,
            layout.height - TIME_TITLE_INSET,
            TextAnchor::End,
            layout,
        ));

        debug!(points = points.len(), shapes = drawing.shapes.len(), "rendered XP line chart");
        Ok(ChartOutcome::Drawn(drawing))
    }

    /// Render audits per month as a bar chart.
    ///
    /// Bars follow key order (chronological). Each bar is scaled against
    /// the largest count, floored at 1 so all-zero maps draw flat bars.
    /// Value labels appear only on bars taller than the legibility
    /// threshold. Fewer than two months yields
    /// `ChartOutcome::InsufficientData`.
    pub fn render_audit_bars(
        &self,
        buckets: &MonthBucketMap,
        layout: &ChartLayout,
    ) -> Result<ChartOutcome, CoreError> {
        if buckets.len() < 2 {
            debug!(months = buckets.len(), "not enough months to draw bars");
            return Ok(insufficient(ChartKind::AuditBars, layout));
        }

        let mut drawing = Drawing::new(ChartKind::AuditBars, layout.width, layout.height);
        let left = layout.padding;
        let right = layout.width - layout.padding;
        let baseline = layout.baseline();
        let inner_height = layout.inner_height();

        let max_count = buckets.values().copied().max().unwrap_or(0).max(1) as f64;
        let bar_height = |count: f64| (count / max_count) * inner_height;

        let k = layout.y_ticks.max(1);
        for i in 0..=k {
            let value = round_half_up(max_count * i as f64 / k as f64);
            let y = baseline - bar_height(value);
            drawing.push(Shape::Line {
                role: ShapeRole::GridLine,
                x1: left - layout.grid_overhang,
                y1: y,
                x2: right,
                y2: y,
            });
            drawing.push(Shape::Text {
                role: ShapeRole::TickLabel,
                x: left - layout.tick_label_gap,
                y: y + LABEL_BASELINE_NUDGE,
                content: format!("{value}"),
                font_size: layout.tick_font_size,
                anchor: TextAnchor::End,
                bold: false,
            });
        }

        let labelled = label_indices(buckets.len(), layout.max_x_labels);
        let slot = layout.inner_width() / buckets.len() as f64;

        for (i, (month, &count)) in buckets.iter().enumerate() {
            let height = bar_height(count as f64);
            let cx = left + i as f64 * slot + layout.bar_offset;

            drawing.push(Shape::Rect {
                role: ShapeRole::Bar,
                x: cx - layout.bar_width / 2.0,
                y: baseline - height,
                width: layout.bar_width,
                height,
            });

            if labelled.binary_search(&i).is_ok() {
                drawing.push(Shape::Text {
                    role: ShapeRole::TickLabel,
                    x: cx,
                    y: baseline + layout.x_label_offset,
                    content: month_label_from_key(month)?,
                    font_size: layout.x_label_font_size,
                    anchor: TextAnchor::Middle,
                    bold: false,
                });
            }

            if height > layout.legibility_threshold {
                drawing.push(Shape::Text {
                    role: ShapeRole::ValueLabel,
                    x: cx,
                    y: baseline - height - layout.value_label_gap,
                    content: count.to_string(),
                    font_size: layout.x_label_font_size,
                    anchor: TextAnchor::Middle,
                    bold: true,
                });
            }
        }

        push_axes(&mut drawing, layout);
        drawing.push(title(
            AUDIT_AXIS_TITLE,
            left,
            layout.padding - layout.title_offset,
            TextAnchor::Start,
            layout,
        ));

        debug!(months = buckets.len(), max_count, "rendered audit bar chart");
        Ok(ChartOutcome::Drawn(drawing))
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Round half up and group digits in threes: `12345.6` → `"12 346"`.
pub fn format_grouped(value: f64, separator: &str) -> String {
    let rounded = round_half_up(value);
    // -0.4 rounds to -0; print it as 0
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + separator.len() * (digits.len() / 3) + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

fn insufficient(kind: ChartKind, layout: &ChartLayout) -> ChartOutcome {
    ChartOutcome::InsufficientData {
        kind,
        width: layout.width,
        height: layout.height,
    }
}

fn push_axes(drawing: &mut Drawing, layout: &ChartLayout) {
    let left = layout.padding;
    let right = layout.width - layout.padding;
    let baseline = layout.baseline();
    drawing.push(Shape::Line {
        role: ShapeRole::Axis,
        x1: left,
        y1: baseline,
        x2: right,
        y2: baseline,
    });
    drawing.push(Shape::Line {
        role: ShapeRole::Axis,
        x1: left,
        y1: layout.padding,
        x2: left,
        y2: baseline,
    });
}

fn title(text: &str, x: f64, y: f64, anchor: TextAnchor, layout: &ChartLayout) -> Shape {
    Shape::Text {
        role: ShapeRole::AxisTitle,
        x,
        y,
        content: text.to_string(),
        font_size: layout.title_font_size,
        anchor,
        bold: false,
    }
}
