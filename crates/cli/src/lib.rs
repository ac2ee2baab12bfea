use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueHint};
use tracing::info;

use student_dashboard_core::models::payload::StudentProfile;
use student_dashboard_core::models::settings::ChartSettings;
use student_dashboard_core::{DashboardView, StudentDashboard};

pub const XP_SVG: &str = "xp.svg";
pub const AUDITS_SVG: &str = "audits.svg";
pub const VIEW_JSON: &str = "view.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Student dashboard chart renderer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render both charts from a saved GraphQL response body
    Render(RenderArgs),
    /// Print the default chart settings as JSON
    Defaults,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON response of the dashboard query
    #[arg(value_hint = ValueHint::FilePath)]
    pub payload: PathBuf,

    /// Directory for the generated files
    #[arg(short, long, default_value = ".", value_hint = ValueHint::DirPath)]
    pub out_dir: PathBuf,

    /// Chart settings (JSON); missing keys take their defaults
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub settings: Option<PathBuf>,

    /// Also write the computed view (profile, series, shapes) as JSON
    #[arg(long)]
    pub json: bool,
}

/// What a render run produced.
#[derive(Debug)]
pub struct RenderReport {
    pub profile: StudentProfile,
    pub written: Vec<PathBuf>,
    pub xp_drawn: bool,
    pub audits_drawn: bool,
}

/// Run one CLI command; output meant for the user goes to stdout.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(args) => {
            let report = render(&args)?;
            println!("{}", summary(&report));
            Ok(())
        }
        Command::Defaults => {
            let json = serde_json::to_string_pretty(&ChartSettings::default())
                .context("failed to serialize default settings")?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Payload file → view → SVG files in `out_dir`.
pub fn render(args: &RenderArgs) -> Result<RenderReport> {
    let settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => ChartSettings::default(),
    };
    let dashboard = StudentDashboard::new(settings).context("invalid chart settings")?;

    let body = fs::read_to_string(&args.payload)
        .with_context(|| format!("failed to read payload {}", args.payload.display()))?;
    let view = dashboard
        .load_payload(&body)
        .with_context(|| format!("failed to build dashboard from {}", args.payload.display()))?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let mut written = Vec::new();
    written.push(write_chart(&dashboard, &view, ChartFile::Xp, &args.out_dir)?);
    written.push(write_chart(&dashboard, &view, ChartFile::Audits, &args.out_dir)?);

    if args.json {
        let path = args.out_dir.join(VIEW_JSON);
        let json = serde_json::to_string_pretty(&view).context("failed to serialize view")?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote view");
        written.push(path);
    }

    Ok(RenderReport {
        xp_drawn: !view.xp_chart.is_insufficient(),
        audits_drawn: !view.audit_chart.is_insufficient(),
        profile: view.profile,
        written,
    })
}

#[derive(Clone, Copy)]
enum ChartFile {
    Xp,
    Audits,
}

fn write_chart(
    dashboard: &StudentDashboard,
    view: &DashboardView,
    which: ChartFile,
    out_dir: &Path,
) -> Result<PathBuf> {
    let (outcome, name) = match which {
        ChartFile::Xp => (&view.xp_chart, XP_SVG),
        ChartFile::Audits => (&view.audit_chart, AUDITS_SVG),
    };
    let svg = dashboard
        .render_svg(outcome)
        .with_context(|| format!("failed to render {}", outcome.kind()))?;
    let path = out_dir.join(name);
    fs::write(&path, svg).with_context(|| format!("failed to write {}", path.display()))?;
    info!(
        path = %path.display(),
        insufficient = outcome.is_insufficient(),
        "wrote {}",
        outcome.kind()
    );
    Ok(path)
}

fn load_settings(path: &Path) -> Result<ChartSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings {}", path.display()))?;
    ChartSettings::from_json(&text).with_context(|| format!("invalid settings in {}", path.display()))
}

/// Human-readable profile card plus chart status.
pub fn summary(report: &RenderReport) -> String {
    let p = &report.profile;
    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    let mut lines = vec![
        format!("Name:     {}", p.display_name()),
        format!("Login:    {}", or_dash(p.login.clone())),
        format!("Campus:   {}", or_dash(p.campus.clone())),
        format!("Level:    {}", or_dash(p.level.map(|l| l.to_string()))),
        format!("Total XP: {}", p.total_xp),
        format!(
            "Audits:   {} (ratio {})",
            p.audit_count,
            or_dash(p.audit_ratio.map(|r| format!("{r:.1}")))
        ),
    ];
    for (label, drawn) in [("XP chart", report.xp_drawn), ("Audit chart", report.audits_drawn)] {
        let status = if drawn { "drawn" } else { "insufficient data" };
        lines.push(format!("{label}: {status}"));
    }
    for path in &report.written {
        lines.push(format!("wrote {}", path.display()));
    }
    lines.join("\n")
}
