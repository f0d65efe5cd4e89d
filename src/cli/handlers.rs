//! Command handlers - thin wrappers that call into `core` and format the result.

use crate::{
    cli::{Commands, ItemArg, UnitUpdate},
    config::AppConfig,
    core::{
        aggregate::{self, PeriodReport},
        audit::{self, DeviceKind},
        category, history,
        period::{self, PeriodSelector},
        report::{self, DocumentRenderer, PlainTextRenderer, ReportDocument, ReportLayout},
        session::{self, ItemUpdate, NewItem, NewSession, SessionFilter, SessionSummary, SessionUpdate},
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use std::{
    fmt::Write,
    path::{Path, PathBuf},
};
use uuid::Uuid;

/// Everything a handler needs besides its own arguments.
pub struct CommandContext<'a> {
    /// Open database connection
    pub db: &'a DatabaseConnection,
    /// Loaded configuration
    pub config: &'a AppConfig,
    /// Date used for "today" (current week, default transaction date, file names)
    pub today: NaiveDate,
}

impl CommandContext<'_> {
    fn layout(&self) -> ReportLayout {
        ReportLayout::from(&self.config.report)
    }
}

/// Runs one subcommand and returns the text to print.
pub async fn run(ctx: &CommandContext<'_>, command: Commands) -> Result<String> {
    match command {
        Commands::Categories { add } => categories(ctx, &add).await,
        Commands::Record {
            date,
            pic,
            owner,
            items,
            categories,
            started_at,
            ended_at,
        } => {
            let new_session = NewSession {
                transaction_date: date.unwrap_or(ctx.today),
                pic_name: pic,
                owner_name: owner,
                selected_category_ids: categories
                    .unwrap_or_else(|| items.iter().map(|item| item.category_id).collect()),
                items: items.iter().map(to_new_item).collect(),
                start_time: started_at,
                end_time: ended_at,
            };
            record(ctx, new_session).await
        }
        Commands::Show { id, export } => show(ctx, id, export.as_deref()).await,
        Commands::History { from, to, pic, owner } => {
            let filter = SessionFilter {
                start_date: from,
                end_date: to,
                pic_name: pic,
                owner_name: owner,
            };
            show_history(ctx, &filter).await
        }
        Commands::UpdateSession {
            id,
            date,
            pic,
            owner,
            categories,
        } => {
            let update = SessionUpdate {
                transaction_date: date,
                pic_name: pic,
                owner_name: owner,
                selected_category_ids: categories,
            };
            let updated = session::update_session(ctx.db, id, update).await?;
            Ok(format!("Updated session {}", updated.id))
        }
        Commands::UpdateItem {
            id,
            category,
            weight,
            unit,
        } => {
            let update = ItemUpdate {
                category_id: category,
                weight_kg: weight,
                satuan: unit.map(|UnitUpdate(satuan)| satuan),
            };
            let item = session::update_item(ctx.db, id, update).await?;
            Ok(format!(
                "Updated item #{} ({} kg)",
                item.sequence_number,
                report::format_weight(item.weight_kg)
            ))
        }
        Commands::DeleteItem { id } => {
            session::delete_item(ctx.db, id).await?;
            Ok(format!("Deleted item {id}"))
        }
        Commands::Delete { id, user_agent } => {
            session::delete_session(ctx.db, id, user_agent.as_deref()).await?;
            Ok(format!("Deleted session {id}"))
        }
        Commands::Dashboard => dashboard(ctx).await,
        Commands::Periods { all } => periods(ctx, all).await,
        Commands::AddPeriod { name, start, end } => {
            let created = period::create_closing_period(ctx.db, &name, start, end).await?;
            Ok(format!(
                "Created closing period [{}] {} ({} - {})",
                created.id,
                created.period_name,
                report::format_date(created.start_date),
                report::format_date(created.end_date)
            ))
        }
        Commands::UpdatePeriod { id, name, start, end } => {
            update_period(ctx, id, name, start, end).await
        }
        Commands::ClosePeriod { id } => {
            let closed = period::deactivate_closing_period(ctx.db, id).await?;
            Ok(format!("Closed period [{}] {}", closed.id, closed.period_name))
        }
        Commands::PeriodReport { id, export } => {
            let selector = id.map_or(PeriodSelector::CurrentWeek, PeriodSelector::ClosingPeriod);
            period_report(ctx, selector, export.as_deref()).await
        }
        Commands::Logs => logs(ctx).await,
        Commands::PurgeLogs { days } => {
            let retention_days = days.unwrap_or(ctx.config.audit.retention_days);
            let result = audit::purge_expired_logs(ctx.db, Utc::now(), retention_days).await?;
            let mut out = format!("Purged {} deletion log entries", result.deleted_count);
            if let Some(oldest) = result.oldest_remaining_log {
                write!(&mut out, "; oldest remaining from {}", oldest.format("%Y-%m-%d %H:%M"))?;
            }
            Ok(out)
        }
    }
}

const fn to_new_item(item: &ItemArg) -> NewItem {
    NewItem {
        category_id: item.category_id,
        weight_kg: item.weight_kg,
        satuan: item.satuan,
    }
}

async fn categories(ctx: &CommandContext<'_>, add: &[String]) -> Result<String> {
    let mut out = String::new();
    if !add.is_empty() {
        let inserted = category::add_categories(ctx.db, add).await?;
        writeln!(&mut out, "Added {} categories", inserted.len())?;
    }

    let all = category::get_all_categories(ctx.db).await?;
    if all.is_empty() {
        out.push_str("No plastic categories yet. Add some with `categories --add NAME`.");
        return Ok(out);
    }
    for cat in all {
        writeln!(&mut out, "{:>4}  {}", cat.id, cat.name)?;
    }
    Ok(out)
}

async fn record(ctx: &CommandContext<'_>, new_session: NewSession) -> Result<String> {
    let summary = session::create_session(ctx.db, new_session).await?;
    Ok(format!(
        "Recorded session {} on {}: {} items, {} kg",
        summary.session.id,
        report::format_date(summary.session.transaction_date),
        summary.total_items,
        report::format_weight(summary.total_weight)
    ))
}

fn write_session(out: &mut String, summary: &SessionSummary, selected: &[&str]) -> Result<()> {
    let session = &summary.session;
    writeln!(out, "Session {}", session.id)?;
    writeln!(out, "Tanggal: {}", report::format_date(session.transaction_date))?;
    writeln!(out, "PIC: {}", session.pic_name)?;
    writeln!(out, "Pemilik: {}", session.owner_name)?;
    if !selected.is_empty() {
        writeln!(out, "Kategori: {}", selected.join(", "))?;
    }
    if let Some(duration) = summary.duration() {
        writeln!(out, "Durasi: {} menit", duration.num_minutes())?;
    }
    writeln!(out)?;
    for detail in &summary.items {
        writeln!(
            out,
            "{:>3}. {:<20} {:>10} kg  {}  ({})",
            detail.item.sequence_number,
            detail.category_name(),
            report::format_weight(detail.item.weight_kg),
            detail
                .item
                .satuan
                .map_or(report::UNIT_PLACEHOLDER, |satuan| satuan.as_str()),
            detail.item.id
        )?;
    }
    writeln!(
        out,
        "Total: {} items, {} kg",
        summary.total_items,
        report::format_weight(summary.total_weight)
    )?;
    Ok(())
}

async fn show(ctx: &CommandContext<'_>, id: Uuid, export: Option<&Path>) -> Result<String> {
    let summary = session::get_session_with_items(ctx.db, id)
        .await?
        .ok_or(Error::SessionNotFound { id })?;

    let names = category::get_category_names(ctx.db).await?;
    let selected: Vec<&str> = summary
        .session
        .selected_category_ids
        .0
        .iter()
        .map(|id| names.get(id).map_or(session::UNKNOWN_CATEGORY, String::as_str))
        .collect();

    let mut out = String::new();
    write_session(&mut out, &summary, &selected)?;

    if let Some(dir) = export {
        let document = report::session_report(&summary, &ctx.layout(), ctx.today)?;
        let path = export_document(&document, dir, &PlainTextRenderer)?;
        writeln!(&mut out, "Report written to {}", path.display())?;
    }
    Ok(out)
}

async fn show_history(ctx: &CommandContext<'_>, filter: &SessionFilter) -> Result<String> {
    let sessions = session::get_session_summaries(ctx.db, filter).await?;
    let tree = history::group_session_history(sessions);
    if tree.is_empty() {
        return Ok("No weighing sessions found".to_string());
    }

    let mut out = String::new();
    for year in &tree.years {
        writeln!(&mut out, "{}", year.year)?;
        for month in &year.months {
            writeln!(&mut out, "  {}", month.label)?;
            for week in &month.weeks {
                writeln!(&mut out, "    {}", week.label)?;
                for summary in &week.records {
                    writeln!(
                        &mut out,
                        "      {:<10}  {} / {}  {} items  {} kg  {}",
                        report::format_date(summary.session.transaction_date),
                        summary.session.pic_name,
                        summary.session.owner_name,
                        summary.total_items,
                        report::format_weight(summary.total_weight),
                        summary.session.id
                    )?;
                }
            }
        }
    }
    Ok(out)
}

async fn dashboard(ctx: &CommandContext<'_>) -> Result<String> {
    let dashboard = aggregate::load_weekly_dashboard(ctx.db, ctx.today).await?;
    let mut out = String::new();
    writeln!(
        &mut out,
        "{} ({} - {})",
        period::week_label(dashboard.week_number),
        report::format_date(dashboard.interval.start),
        report::format_date(dashboard.interval.end)
    )?;

    let Some(summary) = dashboard.summary else {
        out.push_str("No weighing recorded this week");
        return Ok(out);
    };
    writeln!(
        &mut out,
        "{} sessions, {} items, {} kg",
        summary.total_sessions,
        summary.total_items,
        report::format_weight(summary.total_weight)
    )?;
    for segment in report::chart_segments(&dashboard.categories) {
        writeln!(
            &mut out,
            "  {:<20} {:>10} kg  {:>6}  {}",
            segment.label,
            report::format_weight(segment.value),
            report::format_percentage(segment.percentage),
            segment.color
        )?;
    }
    Ok(out)
}

async fn periods(ctx: &CommandContext<'_>, include_inactive: bool) -> Result<String> {
    let mut rows = Vec::new();
    if include_inactive {
        for p in period::get_closing_periods(ctx.db, true).await? {
            let count = period::count_sessions_in(ctx.db, period::DateInterval::new(p.start_date, p.end_date)).await?;
            rows.push((p, count));
        }
    } else {
        rows = period::get_available_periods(ctx.db)
            .await?
            .into_iter()
            .map(|available| (available.period, available.session_count))
            .collect();
    }

    if rows.is_empty() {
        return Ok("No closing periods defined".to_string());
    }

    let mut out = String::new();
    for (p, count) in rows {
        writeln!(
            &mut out,
            "[{}] {} ({} - {}) {} sessions{}",
            p.id,
            p.period_name,
            report::format_date(p.start_date),
            report::format_date(p.end_date),
            count,
            if p.is_active { "" } else { " (inactive)" }
        )?;
    }
    Ok(out)
}

async fn update_period(
    ctx: &CommandContext<'_>,
    id: i64,
    name: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<String> {
    let existing = period::get_closing_period_by_id(ctx.db, id)
        .await?
        .ok_or(Error::PeriodNotFound { id })?;

    let updated = period::update_closing_period(
        ctx.db,
        id,
        name.as_deref().unwrap_or(&existing.period_name),
        start.unwrap_or(existing.start_date),
        end.unwrap_or(existing.end_date),
    )
    .await?;
    Ok(format!(
        "Updated closing period [{}] {} ({} - {})",
        updated.id,
        updated.period_name,
        report::format_date(updated.start_date),
        report::format_date(updated.end_date)
    ))
}

fn write_period_report(out: &mut String, loaded: &PeriodReport) -> Result<()> {
    let period = &loaded.period;
    writeln!(
        out,
        "{} ({} - {})",
        period.label,
        report::format_date(period.interval.start),
        report::format_date(period.interval.end)
    )?;

    let Some(summary) = &loaded.aggregate.summary else {
        writeln!(out, "No data for this period")?;
        return Ok(());
    };
    writeln!(
        out,
        "{} sessions, {} items, {} kg",
        summary.total_sessions,
        summary.total_items,
        report::format_weight(summary.total_weight)
    )?;

    writeln!(out, "\nPer category:")?;
    for segment in report::chart_segments(&loaded.aggregate.categories) {
        writeln!(
            out,
            "  {:<20} {:>10} kg  {:>6}",
            segment.label,
            report::format_weight(segment.value),
            report::format_percentage(segment.percentage)
        )?;
    }

    writeln!(out, "\nSessions:")?;
    for detail in &loaded.aggregate.sessions {
        writeln!(
            out,
            "  {:<10}  {} / {}  [{}]  {} kg",
            report::format_date(detail.transaction_date),
            detail.pic_name,
            detail.owner_name,
            detail.categories.join(", "),
            report::format_weight(detail.total_weight)
        )?;
    }
    Ok(())
}

async fn period_report(
    ctx: &CommandContext<'_>,
    selector: PeriodSelector,
    export: Option<&Path>,
) -> Result<String> {
    let Some(loaded) = aggregate::load_period_report(ctx.db, selector, ctx.today).await? else {
        return Ok("No data: the closing period does not exist or is inactive".to_string());
    };

    let mut out = String::new();
    write_period_report(&mut out, &loaded)?;

    if let Some(dir) = export {
        let document = report::period_report(&loaded, &ctx.layout(), ctx.today)?;
        let path = export_document(&document, dir, &PlainTextRenderer)?;
        writeln!(&mut out, "Report written to {}", path.display())?;
    }
    Ok(out)
}

async fn logs(ctx: &CommandContext<'_>) -> Result<String> {
    let entries = audit::get_activity_logs(ctx.db).await?;
    if entries.is_empty() {
        return Ok("Deletion log is empty".to_string());
    }

    let mut out = String::new();
    for entry in entries {
        writeln!(
            &mut out,
            "{}  {} / {}  {} kg  {}  session {}",
            entry.deleted_at.format("%Y-%m-%d %H:%M"),
            entry.nama_penimbang,
            entry.pemilik_barang,
            report::format_weight(entry.total_berat_kg),
            DeviceKind::from_user_agent(entry.user_agent.as_deref()).label(),
            entry.deleted_session_id
        )?;
    }
    Ok(out)
}

/// Renders `document` and writes it into `dir`, returning the written path.
///
/// The document is rendered completely before anything touches the disk. The
/// renderer picks the file name, so [`PlainTextRenderer`] writes `.txt` files.
pub fn export_document(
    document: &ReportDocument,
    dir: &Path,
    renderer: &impl DocumentRenderer,
) -> Result<PathBuf> {
    let bytes = renderer.render(document)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(renderer.output_name(document));
    std::fs::write(&path, bytes)?;
    tracing::info!("Wrote report {}", path.display());
    Ok(path)
}
