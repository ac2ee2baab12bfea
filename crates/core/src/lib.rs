pub mod errors;
pub mod models;
pub mod services;

use chrono::{FixedOffset, Local};
use serde::Serialize;
use tracing::{debug, warn};

use errors::CoreError;
use models::{
    chart::{ChartOutcome, CumulativePoint, MonthBucketMap},
    payload::{DashboardPayload, StudentProfile, UserRecord},
    record::{AuditEvent, TimestampedAmount},
    settings::ChartSettings,
};
use services::{
    bucket_service::BucketService, chart_service::ChartService, series_service::SeriesService,
    svg_service::SvgService,
};

/// Main entry point for the student dashboard core library.
///
/// Runs the whole "payload → transform → render" pipeline. Every method is
/// a pure function of its arguments and the settings given at construction.
#[must_use]
pub struct StudentDashboard {
    settings: ChartSettings,
    series_service: SeriesService,
    bucket_service: BucketService,
    chart_service: ChartService,
    svg_service: SvgService,
}

impl std::fmt::Debug for StudentDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudentDashboard")
            .field("line", &(self.settings.line.width, self.settings.line.height))
            .field("bar", &(self.settings.bar.width, self.settings.bar.height))
            .field("utc_offset_minutes", &self.settings.utc_offset_minutes)
            .finish()
    }
}

/// Everything the dashboard page shows, computed from one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub profile: StudentProfile,
    pub xp_series: Vec<CumulativePoint>,
    pub audits_per_month: MonthBucketMap,
    pub xp_chart: ChartOutcome,
    pub audit_chart: ChartOutcome,
}

impl StudentDashboard {
    /// Create a dashboard with validated settings.
    pub fn new(settings: ChartSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self {
            settings,
            series_service: SeriesService::new(),
            bucket_service: BucketService::new(),
            chart_service: ChartService::new(),
            svg_service: SvgService::new(),
        })
    }

    /// Dashboard with the stock layout, bucketing in the host's local zone.
    pub fn with_defaults() -> Self {
        Self {
            settings: ChartSettings::default(),
            series_service: SeriesService::new(),
            bucket_service: BucketService::new(),
            chart_service: ChartService::new(),
            svg_service: SvgService::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    // ── Transforms ──────────────────────────────────────────────────

    /// Cumulative XP, one point per transaction, in input order.
    pub fn xp_series(
        &self,
        transactions: &[TimestampedAmount],
    ) -> Result<Vec<CumulativePoint>, CoreError> {
        match self.fixed_offset()? {
            Some(offset) => self.series_service.cumulative(transactions, &offset),
            None => self.series_service.cumulative(transactions, &Local),
        }
    }

    /// Audit counts per `"YYYY-MM"` in the configured zone.
    pub fn audits_per_month(&self, audits: &[AuditEvent]) -> Result<MonthBucketMap, CoreError> {
        match self.fixed_offset()? {
            Some(offset) => self.bucket_service.per_month(audits, &offset),
            None => self.bucket_service.per_month(audits, &Local),
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    pub fn render_xp_chart(&self, points: &[CumulativePoint]) -> Result<ChartOutcome, CoreError> {
        let layout = &self.settings.line;
        let separator = &self.settings.thousands_separator;
        match self.fixed_offset()? {
            Some(offset) => self
                .chart_service
                .render_xp_line(points, layout, separator, &offset),
            None => self
                .chart_service
                .render_xp_line(points, layout, separator, &Local),
        }
    }

    pub fn render_audit_chart(&self, buckets: &MonthBucketMap) -> Result<ChartOutcome, CoreError> {
        self.chart_service
            .render_audit_bars(buckets, &self.settings.bar)
    }

    /// Serialize a rendered chart as an SVG document using the palette.
    pub fn render_svg(&self, outcome: &ChartOutcome) -> Result<String, CoreError> {
        self.svg_service.to_svg(outcome, &self.settings.palette)
    }

    // ── Pipeline ────────────────────────────────────────────────────

    /// Compute the full view for an already-decoded user record.
    pub fn build_view(&self, user: &UserRecord) -> Result<DashboardView, CoreError> {
        if user.transactions.is_none() {
            warn!("payload has no transactions collection; XP chart will be empty");
        }
        if user.audits.is_none() {
            warn!("payload has no audits collection; audit chart will be empty");
        }

        let xp_series = self.xp_series(user.transactions())?;
        let audits_per_month = self.audits_per_month(user.audits())?;
        let xp_chart = self.render_xp_chart(&xp_series)?;
        let audit_chart = self.render_audit_chart(&audits_per_month)?;

        debug!(
            xp_points = xp_series.len(),
            months = audits_per_month.len(),
            xp_drawn = !xp_chart.is_insufficient(),
            audits_drawn = !audit_chart.is_insufficient(),
            "built dashboard view"
        );

        Ok(DashboardView {
            profile: StudentProfile::from_user(user),
            xp_series,
            audits_per_month,
            xp_chart,
            audit_chart,
        })
    }

    /// Decode a GraphQL response body and compute the full view.
    pub fn load_payload(&self, json: &str) -> Result<DashboardView, CoreError> {
        let user = DashboardPayload::from_json(json)?;
        self.build_view(&user)
    }

    fn fixed_offset(&self) -> Result<Option<FixedOffset>, CoreError> {
        self.settings
            .utc_offset_minutes
            .map(|minutes| {
                FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
                    CoreError::InvalidSettings(format!(
                        "utc_offset_minutes {minutes} is not a valid offset"
                    ))
                })
            })
            .transpose()
    }
}

impl Default for StudentDashboard {
    fn default() -> Self {
        Self::with_defaults()
    }
}
