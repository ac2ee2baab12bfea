// ═══════════════════════════════════════════════════════════════════
// Service Tests — SeriesService, BucketService, LinearScale,
// ChartService, SvgService
// ═══════════════════════════════════════════════════════════════════

use chrono::{FixedOffset, Utc};

use student_dashboard_core::errors::CoreError;
use student_dashboard_core::models::chart::{
    ChartKind, ChartOutcome, CumulativePoint, MonthBucketMap, Shape, ShapeRole,
};
use student_dashboard_core::models::record::{AuditEvent, TimestampedAmount};
use student_dashboard_core::models::settings::{ChartLayout, Palette};
use student_dashboard_core::services::bucket_service::BucketService;
use student_dashboard_core::services::chart_service::{format_grouped, ChartService};
use student_dashboard_core::services::scale::{
    label_indices, round_half_up, tick_values, DataState, LinearScale,
};
use student_dashboard_core::services::series_service::SeriesService;
use student_dashboard_core::services::svg_service::{escape, SvgService};

fn tx(amount: f64, at: &str) -> TimestampedAmount {
    TimestampedAmount::new(amount, at)
}

fn point(total: f64, at: &str) -> CumulativePoint {
    CumulativePoint {
        timestamp: at.to_string(),
        running_total: total,
    }
}

fn buckets(entries: &[(&str, u32)]) -> MonthBucketMap {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn rects(outcome: &ChartOutcome) -> Vec<(f64, f64, f64, f64)> {
    outcome
        .shapes()
        .iter()
        .filter_map(|s| match s {
            Shape::Rect {
                x,
                y,
                width,
                height,
                ..
            } => Some((*x, *y, *width, *height)),
            _ => None,
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════
//  SeriesService
// ═══════════════════════════════════════════════════════════════════

mod series_service {
    use super::*;

    fn build(records: &[TimestampedAmount]) -> Vec<CumulativePoint> {
        SeriesService::new().cumulative(records, &Utc).unwrap()
    }

    #[test]
    fn running_total_with_negative_amount() {
        let records = vec![
            tx(10.0, "2024-01-01T00:00:00Z"),
            tx(-3.0, "2024-01-02T00:00:00Z"),
            tx(5.0, "2024-01-03T00:00:00Z"),
        ];
        let totals: Vec<f64> = build(&records).iter().map(|p| p.running_total).collect();
        assert_eq!(totals, vec![10.0, 7.0, 12.0]);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(build(&[]).is_empty());
    }

    #[test]
    fn length_preserved_and_last_equals_sum() {
        let amounts = [400.0, 1250.5, -75.0, 0.0, 9000.0, 12.25];
        let records: Vec<TimestampedAmount> = amounts
            .iter()
            .enumerate()
            .map(|(i, a)| tx(*a, &format!("2024-01-{:02}", i + 1)))
            .collect();
        let series = build(&records);
        assert_eq!(series.len(), records.len());
        let sum: f64 = amounts.iter().sum();
        assert!(approx(series.last().unwrap().running_total, sum));
    }

    #[test]
    fn missing_amount_counts_as_zero() {
        let records = vec![
            tx(100.0, "2024-01-01"),
            TimestampedAmount {
                amount: None,
                created_at: "2024-01-02".into(),
            },
            tx(50.0, "2024-01-03"),
        ];
        let totals: Vec<f64> = build(&records).iter().map(|p| p.running_total).collect();
        assert_eq!(totals, vec![100.0, 100.0, 150.0]);
    }

    #[test]
    fn timestamps_copied_verbatim_in_order() {
        // Not sorted and in mixed formats: the builder neither sorts nor rewrites
        let records = vec![
            tx(1.0, "2024-03-01"),
            tx(1.0, "2024-02-10T08:00:00.000000+00:00"),
            tx(1.0, "2024-01-01 09:30:00"),
        ];
        let stamps: Vec<String> = build(&records).into_iter().map(|p| p.timestamp).collect();
        assert_eq!(
            stamps,
            vec!["2024-03-01", "2024-02-10T08:00:00.000000+00:00", "2024-01-01 09:30:00"]
        );
    }

    #[test]
    fn malformed_timestamp_anywhere_fails_series() {
        for bad in 0..5 {
            let mut records: Vec<TimestampedAmount> = (0..5)
                .map(|i| tx(1.0, &format!("2024-01-{:02}", i + 1)))
                .collect();
            records[bad].created_at = "not-a-date".into();
            let result = SeriesService::new().cumulative(&records, &Utc);
            assert!(
                matches!(result, Err(CoreError::InvalidTimestamp { ref value, .. }) if value == "not-a-date"),
                "bad record at index {bad} was accepted"
            );
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let records = vec![
            tx(10.0, "2024-01-01"),
            tx(0.1, "2024-01-02"),
            tx(0.2, "2024-01-03"),
        ];
        assert_eq!(build(&records), build(&records));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  BucketService
// ═══════════════════════════════════════════════════════════════════

mod bucket_service {
    use super::*;

    #[test]
    fn groups_by_month() {
        let audits = vec![
            AuditEvent::new("2024-01-05"),
            AuditEvent::new("2024-01-20"),
            AuditEvent::new("2024-02-01"),
        ];
        let map = BucketService::new().per_month(&audits, &Utc).unwrap();
        assert_eq!(map, buckets(&[("2024-01", 2), ("2024-02", 1)]));
    }

    #[test]
    fn counts_sum_to_audit_count() {
        let audits: Vec<AuditEvent> = (0..40)
            .map(|i| {
                AuditEvent::new(format!(
                    "2023-{:02}-{:02}T12:00:00+00:00",
                    i % 12 + 1,
                    i % 28 + 1
                ))
            })
            .collect();
        let map = BucketService::new().per_month(&audits, &Utc).unwrap();
        assert_eq!(map.values().sum::<u32>() as usize, audits.len());
    }

    #[test]
    fn unordered_input_gives_sorted_keys() {
        let audits = vec![
            AuditEvent::new("2024-03-01T10:00:00Z"),
            AuditEvent::new("2023-11-15T10:00:00Z"),
            AuditEvent::new("2024-01-09T10:00:00Z"),
        ];
        let map = BucketService::new().per_month(&audits, &Utc).unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2023-11", "2024-01", "2024-03"]);
    }

    #[test]
    fn skipped_months_are_not_zero_filled() {
        let audits = vec![
            AuditEvent::new("2024-01-10T10:00:00Z"),
            AuditEvent::new("2024-04-10T10:00:00Z"),
        ];
        let map = BucketService::new().per_month(&audits, &Utc).unwrap();
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("2024-02"));
    }

    #[test]
    fn month_follows_local_zone() {
        let audits = vec![AuditEvent::new("2024-01-31T23:30:00Z")];
        let paris = FixedOffset::east_opt(3600).unwrap();
        let map = BucketService::new().per_month(&audits, &paris).unwrap();
        assert_eq!(map, buckets(&[("2024-02", 1)]));

        let utc_map = BucketService::new().per_month(&audits, &Utc).unwrap();
        assert_eq!(utc_map, buckets(&[("2024-01", 1)]));
    }

    #[test]
    fn timestamp_without_offset_is_wall_clock() {
        let audits = vec![AuditEvent::new("2024-03-01T00:30:00")];
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let map = BucketService::new().per_month(&audits, &west).unwrap();
        assert_eq!(map, buckets(&[("2024-03", 1)]));
    }

    #[test]
    fn fractional_seconds_accepted() {
        let audits = vec![AuditEvent::new("2023-10-12T09:15:32.123456+00:00")];
        let map = BucketService::new().per_month(&audits, &Utc).unwrap();
        assert_eq!(map, buckets(&[("2023-10", 1)]));
    }

    #[test]
    fn malformed_timestamp_fails_whole_operation() {
        let audits = vec![
            AuditEvent::new("2024-01-05"),
            AuditEvent::new("not a date"),
            AuditEvent::new("2024-02-01"),
        ];
        let err = BucketService::new().per_month(&audits, &Utc).unwrap_err();
        match err {
            CoreError::InvalidTimestamp { value, .. } => assert_eq!(value, "not a date"),
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn empty_timestamp_fails() {
        let audits = vec![AuditEvent::new("")];
        assert!(matches!(
            BucketService::new().per_month(&audits, &Utc),
            Err(CoreError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn empty_input_gives_empty_map() {
        let map = BucketService::new().per_month(&[], &Utc).unwrap();
        assert!(map.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  LinearScale
// ═══════════════════════════════════════════════════════════════════

mod scale {
    use super::*;

    #[test]
    fn value_domain_maps_to_padded_viewport() {
        let layout = ChartLayout::line_default();
        let scale = LinearScale::new(&layout, 0.0, 100.0, 10);
        assert!(approx(scale.y(0.0), 250.0));
        assert!(approx(scale.y(100.0), 70.0));
        assert!(approx(scale.y(50.0), 160.0));
    }

    #[test]
    fn index_domain_maps_to_padded_viewport() {
        let layout = ChartLayout::line_default();
        let scale = LinearScale::new(&layout, 0.0, 1.0, 5);
        assert!(approx(scale.x(0), 70.0));
        assert!(approx(scale.x(4), 630.0));
        assert!(approx(scale.x(2), 350.0));
    }

    #[test]
    fn single_index_maps_to_left_edge() {
        let layout = ChartLayout::line_default();
        let scale = LinearScale::new(&layout, 0.0, 1.0, 1);
        assert!(approx(scale.x(0), 70.0));
        assert_eq!(scale.state(), DataState::InsufficientData);
    }

    #[test]
    fn flat_domain_maps_to_baseline_without_nan() {
        let layout = ChartLayout::line_default();
        let scale = LinearScale::new(&layout, 42.0, 42.0, 3);
        let y = scale.y(42.0);
        assert!(y.is_finite());
        assert!(approx(y, 250.0));
        assert_eq!(scale.state(), DataState::InsufficientData);
    }

    #[test]
    fn sub_unit_span_uses_full_height() {
        // The denominator is the span itself unless it is exactly zero
        let layout = ChartLayout::line_default();
        let scale = LinearScale::new(&layout, 0.0, 0.5, 2);
        assert!(approx(scale.y(0.0), 250.0));
        assert!(approx(scale.y(0.5), 70.0));
        assert!(approx(scale.y(0.25), 160.0));
        assert_eq!(scale.state(), DataState::Sufficient);
    }

    #[test]
    fn for_values_takes_min_and_max() {
        let layout = ChartLayout::line_default();
        let scale = LinearScale::for_values(&layout, &[10.0, 7.0, 12.0]);
        assert_eq!((scale.min, scale.max, scale.count), (7.0, 12.0, 3));
        assert_eq!(scale.state(), DataState::Sufficient);
    }

    #[test]
    fn for_values_empty_is_insufficient() {
        let layout = ChartLayout::line_default();
        let scale = LinearScale::for_values(&layout, &[]);
        assert_eq!(scale.count, 0);
        assert_eq!(scale.state(), DataState::InsufficientData);
    }

    #[test]
    fn ticks_span_domain_inclusive() {
        assert_eq!(tick_values(0.0, 100.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        let layout = ChartLayout::line_default();
        let ticks = LinearScale::new(&layout, 0.0, 100.0, 2).ticks(5);
        assert_eq!(ticks.len(), 6);
        assert!(approx(ticks[0].y, 250.0));
        assert!(approx(ticks[5].y, 70.0));
    }

    #[test]
    fn label_indices_thin_large_domains() {
        assert_eq!(label_indices(10, 7), vec![0, 2, 3, 5, 6, 8, 9]);
        assert_eq!(label_indices(100, 7), vec![0, 17, 33, 50, 66, 83, 99]);
    }

    #[test]
    fn label_indices_small_domains() {
        assert!(label_indices(0, 7).is_empty());
        assert_eq!(label_indices(1, 7), vec![0]);
        assert_eq!(label_indices(3, 7), vec![0, 1, 2]);
        assert_eq!(label_indices(5, 1), vec![0]);
    }

    #[test]
    fn label_indices_never_exceed_limit() {
        for n in 0..60 {
            let idx = label_indices(n, 7);
            assert!(idx.len() <= 7);
            assert!(idx.iter().all(|&i| i < n.max(1)));
            assert!(idx.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn rounding_goes_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(0.4), 0.0);
        assert_eq!(round_half_up(-0.6), -1.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ChartService — XP line chart
// ═══════════════════════════════════════════════════════════════════

mod xp_line_chart {
    use super::*;

    fn three_points() -> Vec<CumulativePoint> {
        vec![
            point(10.0, "2024-01-05T10:00:00Z"),
            point(7.0, "2024-02-10T10:00:00Z"),
            point(12.0, "2024-03-15T10:00:00Z"),
        ]
    }

    fn render(points: &[CumulativePoint]) -> Result<ChartOutcome, CoreError> {
        ChartService::new().render_xp_line(points, &ChartLayout::line_default(), " ", &Utc)
    }

    #[test]
    fn draws_all_parts() {
        let outcome = render(&three_points()).unwrap();
        let drawing = outcome.drawing().expect("drawn");
        assert_eq!(drawing.kind, ChartKind::XpLine);
        assert_eq!(drawing.count(ShapeRole::Curve), 1);
        assert_eq!(drawing.count(ShapeRole::Marker), 3);
        assert_eq!(drawing.count(ShapeRole::Axis), 2);
        assert_eq!(drawing.count(ShapeRole::AxisTitle), 2);
        // 6 horizontal + 3 vertical
        assert_eq!(drawing.count(ShapeRole::GridLine), 9);
        assert_eq!(drawing.count(ShapeRole::TickLabel), 9);
    }

    #[test]
    fn curve_points_are_scaled() {
        let outcome = render(&three_points()).unwrap();
        let curve = outcome
            .shapes()
            .iter()
            .find_map(|s| match s {
                Shape::Polyline { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        let xs: Vec<f64> = curve.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = curve.iter().map(|p| p.y).collect();
        assert!(approx(xs[0], 70.0) && approx(xs[1], 350.0) && approx(xs[2], 630.0));
        assert!(approx(ys[0], 142.0) && approx(ys[1], 250.0) && approx(ys[2], 70.0));
    }

    #[test]
    fn labels_tick_values_and_months() {
        let outcome = render(&three_points()).unwrap();
        let labels = outcome.drawing().unwrap().texts(ShapeRole::TickLabel);
        assert_eq!(
            labels,
            vec!["7", "8", "9", "10", "11", "12", "01/24", "02/24", "03/24"]
        );
        assert_eq!(outcome.drawing().unwrap().texts(ShapeRole::AxisTitle), vec!["XP", "Temps"]);
    }

    #[test]
    fn large_values_use_separator() {
        let points = vec![point(0.0, "2024-01-01"), point(125_000.0, "2024-06-01")];
        let outcome = render(&points).unwrap();
        let labels = outcome.drawing().unwrap().texts(ShapeRole::TickLabel);
        assert_eq!(&labels[..6], &["0", "25 000", "50 000", "75 000", "100 000", "125 000"]);
    }

    #[test]
    fn many_points_get_at_most_seven_date_labels() {
        let points: Vec<CumulativePoint> = (0..50)
            .map(|i| point(i as f64 * 100.0, "2024-01-01T00:00:00Z"))
            .collect();
        let outcome = render(&points).unwrap();
        let drawing = outcome.drawing().unwrap();
        assert_eq!(drawing.count(ShapeRole::Marker), 50);
        // 6 Y labels + 7 X labels
        assert_eq!(drawing.count(ShapeRole::TickLabel), 13);
    }

    #[test]
    fn single_point_is_insufficient() {
        let outcome = render(&[point(10.0, "2024-01-05")]).unwrap();
        assert!(outcome.is_insufficient());
        assert!(outcome.shapes().is_empty());
        assert_eq!(outcome.size(), (700.0, 320.0));
    }

    #[test]
    fn empty_series_is_insufficient() {
        let outcome = render(&[]).unwrap();
        assert_eq!(
            outcome,
            ChartOutcome::InsufficientData {
                kind: ChartKind::XpLine,
                width: 700.0,
                height: 320.0
            }
        );
    }

    #[test]
    fn flat_series_is_insufficient() {
        let points = vec![point(5.0, "2024-01-01"), point(5.0, "2024-01-02")];
        assert!(render(&points).unwrap().is_insufficient());
    }

    #[test]
    fn bad_label_timestamp_propagates() {
        let points = vec![point(1.0, "yesterday"), point(2.0, "2024-01-02")];
        assert!(matches!(
            render(&points),
            Err(CoreError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn bad_timestamp_between_labels_propagates() {
        // 20 points: indices 0, 3, 6, 10, 13, 16, 19 are labelled
        let mut points: Vec<CumulativePoint> = (0..20)
            .map(|i| point(i as f64 * 10.0, &format!("2024-01-{:02}T12:00:00Z", i + 1)))
            .collect();
        points[1].timestamp = "not-a-date".into();
        assert!(matches!(
            render(&points),
            Err(CoreError::InvalidTimestamp { ref value, .. }) if value == "not-a-date"
        ));
    }

    #[test]
    fn bad_timestamp_fails_even_when_insufficient() {
        let points = vec![point(5.0, "2024-01-01"), point(5.0, "whenever")];
        assert!(render(&points).is_err());
    }

    #[test]
    fn label_month_uses_zone() {
        let points = vec![
            point(1.0, "2023-12-31T23:30:00Z"),
            point(2.0, "2024-02-01T12:00:00Z"),
        ];
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let outcome = ChartService::new()
            .render_xp_line(&points, &ChartLayout::line_default(), " ", &tokyo)
            .unwrap();
        let labels = outcome.drawing().unwrap().texts(ShapeRole::TickLabel);
        assert_eq!(labels[6], "01/24");
    }

    #[test]
    fn negative_domain_draws() {
        let points = vec![point(-50.0, "2024-01-01"), point(-10.0, "2024-02-01")];
        let outcome = render(&points).unwrap();
        let labels = outcome.drawing().unwrap().texts(ShapeRole::TickLabel);
        assert_eq!(&labels[..6], &["-50", "-42", "-34", "-26", "-18", "-10"]);
    }

    #[test]
    fn rendering_is_repeatable() {
        let points = three_points();
        assert_eq!(render(&points).unwrap(), render(&points).unwrap());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ChartService — audit bar chart
// ═══════════════════════════════════════════════════════════════════

mod audit_bar_chart {
    use super::*;

    fn render(map: &MonthBucketMap) -> ChartOutcome {
        ChartService::new()
            .render_audit_bars(map, &ChartLayout::bar_default())
            .unwrap()
    }

    #[test]
    fn bars_scale_to_largest_count() {
        let outcome = render(&buckets(&[("2024-01", 2), ("2024-02", 1)]));
        let bars = rects(&outcome);
        assert_eq!(bars.len(), 2);
        // plot area is 600 x 220; two slots of 300
        assert_eq!(bars[0], (45.0, 50.0, 30.0, 220.0));
        assert_eq!(bars[1], (345.0, 160.0, 30.0, 110.0));
    }

    #[test]
    fn labels_values_months_and_ticks() {
        let outcome = render(&buckets(&[("2024-01", 2), ("2024-02", 1)]));
        let drawing = outcome.drawing().unwrap();
        assert_eq!(drawing.texts(ShapeRole::ValueLabel), vec!["2", "1"]);
        assert_eq!(
            drawing.texts(ShapeRole::TickLabel),
            vec!["0", "0", "1", "1", "2", "2", "01/24", "02/24"]
        );
        assert_eq!(drawing.texts(ShapeRole::AxisTitle), vec!["Audits"]);
        assert_eq!(drawing.count(ShapeRole::Axis), 2);
    }

    #[test]
    fn short_bars_get_no_value_label() {
        let outcome = render(&buckets(&[("2024-01", 1), ("2024-02", 100)]));
        let drawing = outcome.drawing().unwrap();
        // 1/100 of 220 is 2.2, under the 18 threshold
        assert_eq!(drawing.texts(ShapeRole::ValueLabel), vec!["100"]);
    }

    #[test]
    fn all_zero_counts_draw_flat_bars() {
        let outcome = render(&buckets(&[("2024-01", 0), ("2024-02", 0), ("2024-03", 0)]));
        assert!(!outcome.is_insufficient());
        let bars = rects(&outcome);
        assert_eq!(bars.len(), 3);
        assert!(bars.iter().all(|b| b.3 == 0.0 && b.1 == 270.0));
        assert_eq!(outcome.drawing().unwrap().count(ShapeRole::ValueLabel), 0);
    }

    #[test]
    fn empty_map_is_insufficient() {
        let outcome = render(&MonthBucketMap::new());
        assert!(outcome.is_insufficient());
        assert_eq!(outcome.kind(), ChartKind::AuditBars);
    }

    #[test]
    fn single_month_is_insufficient() {
        let outcome = render(&buckets(&[("2024-05", 4)]));
        assert!(outcome.is_insufficient());
        assert!(rects(&outcome).is_empty());
        assert_eq!(outcome.size(), (700.0, 320.0));
    }

    #[test]
    fn two_months_are_enough_to_draw() {
        let outcome = render(&buckets(&[("2024-05", 4), ("2024-06", 0)]));
        assert!(!outcome.is_insufficient());
        assert_eq!(rects(&outcome).len(), 2);
    }

    #[test]
    fn many_months_thin_x_labels() {
        let map: MonthBucketMap = (0..24)
            .map(|i| (format!("{}-{:02}", 2022 + i / 12, i % 12 + 1), 3))
            .collect();
        let outcome = render(&map);
        let drawing = outcome.drawing().unwrap();
        assert_eq!(drawing.count(ShapeRole::Bar), 24);
        assert_eq!(drawing.count(ShapeRole::TickLabel), 6 + 7);
        let labels = drawing.texts(ShapeRole::TickLabel);
        assert_eq!(labels[6], "01/22");
        assert_eq!(labels[12], "12/23");
    }

    #[test]
    fn malformed_key_fails() {
        let result = ChartService::new()
            .render_audit_bars(
                &buckets(&[("2024-01", 1), ("January", 3)]),
                &ChartLayout::bar_default(),
            );
        assert!(matches!(result, Err(CoreError::InvalidTimestamp { .. })));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  format_grouped
// ═══════════════════════════════════════════════════════════════════

mod grouping {
    use super::*;

    #[test]
    fn groups_in_threes() {
        assert_eq!(format_grouped(0.0, " "), "0");
        assert_eq!(format_grouped(999.0, " "), "999");
        assert_eq!(format_grouped(1000.0, " "), "1 000");
        assert_eq!(format_grouped(12345.6, " "), "12 346");
        assert_eq!(format_grouped(1234567.0, ","), "1,234,567");
    }

    #[test]
    fn negatives_keep_sign() {
        assert_eq!(format_grouped(-1234.0, " "), "-1 234");
        assert_eq!(format_grouped(-0.4, " "), "0");
    }

    #[test]
    fn default_separator_is_narrow_no_break_space() {
        assert_eq!(format_grouped(1500.0, "\u{202f}"), "1\u{202f}500");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  SvgService
// ═══════════════════════════════════════════════════════════════════

mod svg_service {
    use super::*;

    #[test]
    fn bar_chart_has_one_rect_per_bar() {
        let outcome = ChartService::new()
            .render_audit_bars(
                &buckets(&[("2024-01", 2), ("2024-02", 1), ("2024-03", 5)]),
                &ChartLayout::bar_default(),
            )
            .unwrap();
        let svg = SvgService::new().to_svg(&outcome, &Palette::default()).unwrap();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"700\" height=\"320\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("fill=\"#3b82f6\""));
        assert!(svg.contains("font-weight=\"bold\""));
    }

    #[test]
    fn line_chart_has_polyline_and_markers() {
        let points = vec![
            point(10.0, "2024-01-05T10:00:00Z"),
            point(7.0, "2024-02-10T10:00:00Z"),
            point(12.0, "2024-03-15T10:00:00Z"),
        ];
        let outcome = ChartService::new()
            .render_xp_line(&points, &ChartLayout::line_default(), " ", &Utc)
            .unwrap();
        let svg = SvgService::new().to_svg(&outcome, &Palette::default()).unwrap();
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("points=\"70,142 350,250 630,70\""));
        assert!(svg.contains(">Temps</text>"));
    }

    #[test]
    fn insufficient_data_renders_empty_svg() {
        let outcome = ChartOutcome::InsufficientData {
            kind: ChartKind::XpLine,
            width: 700.0,
            height: 320.0,
        };
        let svg = SvgService::new().to_svg(&outcome, &Palette::default()).unwrap();
        assert_eq!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"700\" height=\"320\" viewBox=\"0 0 700 320\">\n</svg>\n"
        );
    }

    #[test]
    fn palette_overrides_colours() {
        let outcome = ChartService::new()
            .render_audit_bars(
                &buckets(&[("2024-01", 2), ("2024-02", 1)]),
                &ChartLayout::bar_default(),
            )
            .unwrap();
        let palette = Palette {
            bar: "crimson".into(),
            ..Palette::default()
        };
        let svg = SvgService::new().to_svg(&outcome, &palette).unwrap();
        assert!(svg.contains("<rect x=\"45\" y=\"50\" width=\"30\" height=\"220\" fill=\"crimson\" />"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("a<b & \"c\" 'd'>"), "a&lt;b &amp; &quot;c&quot; &apos;d&apos;&gt;");
        assert_eq!(escape("01/24"), "01/24");
    }
}
