//! Report formatting - Chart segments and printable, paginated report documents.
//!
//! Reports are built as a renderer-independent [`ReportDocument`]: a list of pages,
//! each holding headings, text lines, tables and banners, with a `Halaman N` footer.
//! Pagination works on a fixed line budget per page ([`ReportLayout`]); a table that
//! does not fit continues on the next page with its column headers repeated.
//! Turning a document into bytes is the job of a [`DocumentRenderer`].

use crate::{
    config::ReportConfig,
    core::{
        aggregate::{self, AggregateSummary, CategoryBreakdown, PeriodReport},
        session::SessionSummary,
    },
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate};

/// Chart colours, assigned by position in the sorted category breakdown.
pub const PALETTE: [&str; 8] = [
    "#009ce4", "#7eb93e", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#06b6d4", "#84cc16",
];

/// Shown in the unit column when an item has no satuan.
pub const UNIT_PLACEHOLDER: &str = "-";

/// Smallest usable page: footer, table header and one row.
pub const MIN_LINES_PER_PAGE: usize = 3;

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// One slice of the category chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSegment {
    /// Category name
    pub label: String,
    /// Weight in kilograms
    pub value: f64,
    /// Share of the total, 0–100
    pub percentage: f64,
    /// Hex colour from [`PALETTE`]
    pub color: &'static str,
}

/// Maps an already sorted breakdown onto chart segments.
///
/// The category at index `i` gets `PALETTE[i % PALETTE.len()]`.
#[must_use]
pub fn chart_segments(categories: &[CategoryBreakdown]) -> Vec<ChartSegment> {
    categories
        .iter()
        .zip(PALETTE.iter().cycle())
        .map(|(category, color)| ChartSegment {
            label: category.category_name.clone(),
            value: category.total_weight,
            percentage: category.percentage,
            color: *color,
        })
        .collect()
}

/// Weight with two decimals, e.g. `2.50`.
#[must_use]
pub fn format_weight(weight: f64) -> String {
    format!("{weight:.2}")
}

/// Percentage with one decimal, e.g. `62.5%`.
#[must_use]
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.1}%")
}

/// Indonesian short date, `d/m/yyyy`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Indonesian month name for a 1-based month number.
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|index| MONTH_NAMES.get(index))
        .copied()
        .unwrap_or("")
}

/// Month label such as `Desember 2025`.
#[must_use]
pub fn month_label(year: i32, month: u32) -> String {
    format!("{} {year}", month_name(month))
}

/// File name for a single-session report.
#[must_use]
pub fn session_report_file_name(summary: &SessionSummary, generated_on: NaiveDate) -> String {
    format!("laporan_penimbangan_{}_{}.pdf", summary.session.id, generated_on)
}

/// File name for a period report. Whitespace runs in the name become `_`.
#[must_use]
pub fn period_report_file_name(period_name: &str, year: i32, generated_on: NaiveDate) -> String {
    let name = period_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("laporan_bulanan_{name}_{year}_{generated_on}.pdf")
}

/// Page geometry used when paginating a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLayout {
    /// Lines per page, footer included
    pub lines_per_page: usize,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self { lines_per_page: 40 }
    }
}

impl From<&ReportConfig> for ReportLayout {
    fn from(config: &ReportConfig) -> Self {
        Self {
            lines_per_page: config.lines_per_page,
        }
    }
}

/// A table with column headers. Total rows are ordinary trailing rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column headers, repeated on every page the table spans
    pub headers: Vec<String>,
    /// Body rows
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows,
        }
    }
}

/// Content element of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Document or section title
    Heading(String),
    /// Plain text line
    Line(String),
    /// Empty line
    Blank,
    /// Table (or the part of one that fits on this page)
    Table(Table),
    /// Highlighted total line
    Banner(String),
}

impl Block {
    /// Lines this block occupies on a page.
    #[must_use]
    pub fn line_count(&self) -> usize {
        match self {
            Self::Table(table) => 1 + table.rows.len(),
            _ => 1,
        }
    }
}

/// One page of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    /// Content in order
    pub blocks: Vec<Block>,
}

impl Page {
    /// Footer text, e.g. `Halaman 2`.
    #[must_use]
    pub fn footer(&self) -> String {
        format!("Halaman {}", self.number)
    }
}

/// A paginated report ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    /// Download name
    pub file_name: String,
    /// Pages in order
    pub pages: Vec<Page>,
}

struct Paginator {
    capacity: usize,
    pages: Vec<Page>,
    current: Vec<Block>,
    used: usize,
}

impl Paginator {
    fn new(layout: &ReportLayout) -> Result<Self> {
        if layout.lines_per_page < MIN_LINES_PER_PAGE {
            return Err(Error::Report {
                message: format!(
                    "lines_per_page must be at least {MIN_LINES_PER_PAGE}, got {}",
                    layout.lines_per_page
                ),
            });
        }
        Ok(Self {
            // one line is reserved for the footer
            capacity: layout.lines_per_page - 1,
            pages: Vec::new(),
            current: Vec::new(),
            used: 0,
        })
    }

    fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    fn break_page(&mut self) {
        let blocks = std::mem::take(&mut self.current);
        self.pages.push(Page {
            number: self.pages.len() + 1,
            blocks,
        });
        self.used = 0;
    }

    // Starts a new page unless `lines` still fit on the current one. A group
    // larger than a whole page is split anyway.
    fn keep_together(&mut self, lines: usize) {
        if self.used > 0 && self.remaining() < lines && lines <= self.capacity {
            self.break_page();
        }
    }

    fn push(&mut self, block: Block) {
        if let Block::Table(table) = block {
            self.push_table(table);
            return;
        }
        if self.remaining() == 0 {
            self.break_page();
        }
        self.current.push(block);
        self.used += 1;
    }

    fn push_table(&mut self, table: Table) {
        if table.rows.is_empty() {
            if self.remaining() == 0 {
                self.break_page();
            }
            self.current.push(Block::Table(table));
            self.used += 1;
            return;
        }

        let mut rows = table.rows.into_iter().peekable();
        while rows.peek().is_some() {
            // header plus at least one row
            if self.remaining() < 2 {
                self.break_page();
            }
            let room = self.remaining() - 1;
            let chunk: Vec<Vec<String>> = rows.by_ref().take(room).collect();
            self.used += 1 + chunk.len();
            self.current.push(Block::Table(Table {
                headers: table.headers.clone(),
                rows: chunk,
            }));
        }
    }

    fn finish(mut self, file_name: String) -> ReportDocument {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        ReportDocument {
            file_name,
            pages: self.pages,
        }
    }
}

fn paginate(blocks: Vec<Block>, layout: &ReportLayout, file_name: String) -> Result<ReportDocument> {
    let mut paginator = Paginator::new(layout)?;
    let mut blocks = blocks.into_iter().peekable();
    while let Some(block) = blocks.next() {
        // a heading stays with the table header and first row below it
        if let (Block::Heading(_), Some(Block::Table(table))) = (&block, blocks.peek()) {
            paginator.keep_together(2 + usize::from(!table.rows.is_empty()));
        }
        paginator.push(block);
    }
    Ok(paginator.finish(file_name))
}

/// Builds the printable report of one weighing session.
///
/// Layout: title, session info, itemised table with a total row, per-category
/// subtotals (heaviest first, empty price column for manual filling) and a
/// grand-total banner.
pub fn session_report(
    summary: &SessionSummary,
    layout: &ReportLayout,
    generated_on: NaiveDate,
) -> Result<ReportDocument> {
    let session = &summary.session;

    let mut item_rows: Vec<Vec<String>> = summary
        .items
        .iter()
        .map(|detail| {
            vec![
                detail.item.sequence_number.to_string(),
                detail.category_name().to_string(),
                format_weight(detail.item.weight_kg),
                detail
                    .item
                    .satuan
                    .map_or(UNIT_PLACEHOLDER, |satuan| satuan.as_str())
                    .to_string(),
            ]
        })
        .collect();
    item_rows.push(vec![
        "Total".to_string(),
        String::new(),
        format_weight(summary.total_weight),
        String::new(),
    ]);

    let category_rows: Vec<Vec<String>> = aggregate::category_breakdown(std::slice::from_ref(summary))
        .into_iter()
        .map(|category| {
            vec![
                category.category_name,
                format!("{} kg", format_weight(category.total_weight)),
                String::new(),
            ]
        })
        .collect();

    let blocks = vec![
        Block::Heading("BARANG MASUK UPL".to_string()),
        Block::Line("Laporan Hasil Penimbangan Limbah Plastik".to_string()),
        Block::Blank,
        Block::Line(format!("Tanggal: {}", format_date(session.transaction_date))),
        Block::Line(format!("PIC: {}", session.pic_name)),
        Block::Line(format!("Pemilik: {}", session.owner_name)),
        Block::Blank,
        Block::Heading("Detail Penimbangan:".to_string()),
        Block::Table(Table::new(&["No", "Jenis Plastik", "Berat (kg)", "Satuan"], item_rows)),
        Block::Blank,
        Block::Heading("Total Berat per Kategori:".to_string()),
        Block::Table(Table::new(&["Jenis Plastik", "Berat", "Harga"], category_rows)),
        Block::Blank,
        Block::Banner(format!(
            "TOTAL KESELURUHAN: {} kg",
            format_weight(summary.total_weight)
        )),
    ];

    paginate(blocks, layout, session_report_file_name(summary, generated_on))
}

fn summary_lines(summary: Option<&AggregateSummary>) -> Vec<Block> {
    match summary {
        Some(summary) => vec![
            Block::Line(format!("Total Sesi: {}", summary.total_sessions)),
            Block::Line(format!("Total Item: {}", summary.total_items)),
            Block::Line(format!("Total Berat: {} kg", format_weight(summary.total_weight))),
        ],
        None => vec![Block::Line("Tidak ada data untuk periode ini".to_string())],
    }
}

/// Builds the printable report of a closing period (or week).
///
/// An empty period still produces a one-page document stating there is no data.
pub fn period_report(
    report: &PeriodReport,
    layout: &ReportLayout,
    generated_on: NaiveDate,
) -> Result<ReportDocument> {
    let period = &report.period;
    let aggregate = &report.aggregate;

    let mut blocks = vec![
        Block::Heading("LAPORAN PENIMBANGAN LIMBAH PLASTIK".to_string()),
        Block::Line(format!("Periode: {}", period.label)),
        Block::Line(format!(
            "Tanggal: {} - {}",
            format_date(period.interval.start),
            format_date(period.interval.end)
        )),
        Block::Blank,
    ];
    blocks.extend(summary_lines(aggregate.summary.as_ref()));

    if let Some(summary) = &aggregate.summary {
        let category_rows = aggregate
            .categories
            .iter()
            .enumerate()
            .map(|(index, category)| {
                vec![
                    (index + 1).to_string(),
                    category.category_name.clone(),
                    format_weight(category.total_weight),
                    format_percentage(category.percentage),
                    category.item_count.to_string(),
                ]
            })
            .collect();

        let session_rows = aggregate
            .sessions
            .iter()
            .map(|detail| {
                vec![
                    format_date(detail.transaction_date),
                    detail.pic_name.clone(),
                    detail.owner_name.clone(),
                    detail.categories.join(", "),
                    detail.item_count.to_string(),
                    format_weight(detail.total_weight),
                ]
            })
            .collect();

        blocks.extend([
            Block::Blank,
            Block::Heading("Ringkasan per Kategori:".to_string()),
            Block::Table(Table::new(
                &["No", "Jenis Plastik", "Berat (kg)", "Persentase", "Jumlah Item"],
                category_rows,
            )),
            Block::Blank,
            Block::Heading("Detail Sesi:".to_string()),
            Block::Table(Table::new(
                &["Tanggal", "PIC", "Pemilik", "Jenis Plastik", "Item", "Berat (kg)"],
                session_rows,
            )),
            Block::Blank,
            Block::Banner(format!(
                "TOTAL KESELURUHAN: {} kg",
                format_weight(summary.total_weight)
            )),
        ]);
    }

    let file_name = period_report_file_name(&period.label, period.interval.start.year(), generated_on);
    paginate(blocks, layout, file_name)
}

/// Turns a [`ReportDocument`] into bytes for a specific output format.
pub trait DocumentRenderer {
    /// Renders the whole document.
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>>;

    /// Name to save the rendered output under.
    fn output_name(&self, document: &ReportDocument) -> String {
        document.file_name.clone()
    }
}

/// Renders documents as aligned plain text, one form feed between pages.
///
/// Every block is printed with exactly [`Block::line_count`] lines and the footer
/// with one, so a rendered page never exceeds [`ReportLayout::lines_per_page`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    // user-entered names may contain line breaks
    fn single_line(text: &str) -> String {
        text.replace(['\r', '\n', '\u{c}'], " ")
    }

    fn render_table(table: &Table, out: &mut String) {
        let columns = table.headers.len();
        let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
        for row in &table.rows {
            for (index, cell) in row.iter().enumerate().take(columns) {
                widths[index] = widths[index].max(cell.chars().count());
            }
        }

        let format_row = |cells: &[String]| -> String {
            let padded: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(index, &width)| {
                    let cell = cells.get(index).map_or_else(String::new, |cell| Self::single_line(cell));
                    format!("{cell:<width$}")
                })
                .collect();
            format!("| {} |", padded.join(" | "))
        };

        out.push_str(&format_row(&table.headers));
        out.push('\n');
        for row in &table.rows {
            out.push_str(&format_row(row));
            out.push('\n');
        }
    }
}

impl DocumentRenderer for PlainTextRenderer {
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>> {
        let mut out = String::new();
        for (index, page) in document.pages.iter().enumerate() {
            if index > 0 {
                out.push('\u{c}');
            }
            for block in &page.blocks {
                match block {
                    Block::Heading(text) => {
                        out.push_str(&Self::single_line(text).to_uppercase());
                        out.push('\n');
                    }
                    Block::Line(text) => {
                        out.push_str(&Self::single_line(text));
                        out.push('\n');
                    }
                    Block::Blank => out.push('\n'),
                    Block::Table(table) => Self::render_table(table, &mut out),
                    Block::Banner(text) => {
                        out.push_str(&format!("== {} ==\n", Self::single_line(text)));
                    }
                }
            }
            out.push_str(&format!("{:^40}\n", page.footer()));
        }
        Ok(out.into_bytes())
    }

    fn output_name(&self, document: &ReportDocument) -> String {
        document
            .file_name
            .strip_suffix(".pdf")
            .map_or_else(|| document.file_name.clone(), |stem| format!("{stem}.txt"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{
        aggregate::aggregate,
        period::{DateInterval, ResolvedPeriod},
        session::UNKNOWN_CATEGORY,
    };
    use crate::entities::Satuan;
    use crate::test_utils::*;

    fn breakdown(names: &[&str]) -> Vec<CategoryBreakdown> {
        names
            .iter()
            .map(|name| CategoryBreakdown {
                category_name: (*name).to_string(),
                total_weight: 1.0,
                percentage: 0.0,
                item_count: 1,
            })
            .collect()
    }

    // Every table row across all pages, without the repeated headers
    fn table_rows(document: &ReportDocument) -> Vec<&Vec<String>> {
        document
            .pages
            .iter()
            .flat_map(|page| page.blocks.iter())
            .filter_map(|block| match block {
                Block::Table(table) => Some(table.rows.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn texts(document: &ReportDocument) -> Vec<String> {
        document
            .pages
            .iter()
            .flat_map(|page| page.blocks.iter())
            .filter_map(|block| match block {
                Block::Heading(text) | Block::Line(text) | Block::Banner(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_chart_segments_cycle_palette() {
        let names: Vec<String> = (0..10).map(|i| format!("C{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let segments = chart_segments(&breakdown(&refs));

        assert_eq!(segments.len(), 10);
        assert_eq!(segments[0].color, "#009ce4");
        assert_eq!(segments[7].color, "#84cc16");
        assert_eq!(segments[8].color, PALETTE[0]);
        assert_eq!(segments[9].color, PALETTE[1]);
        assert_eq!(segments[3].label, "C3");
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(format_weight(2.5), "2.50");
        assert_eq!(format_weight(1.005_1), "1.01");
        assert_eq!(format_percentage(62.5), "62.5%");
        assert_eq!(format_date(date(2025, 12, 1)), "1/12/2025");
        assert_eq!(month_label(2025, 12), "Desember 2025");
        assert_eq!(month_label(2026, 1), "Januari 2026");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            period_report_file_name("Desember  2025 tutup", 2025, date(2026, 1, 3)),
            "laporan_bulanan_Desember_2025_tutup_2025_2026-01-03.pdf"
        );

        let summary = summary_of(date(2025, 12, 1), &[("PP KOTOR", 1.0)]);
        assert_eq!(
            session_report_file_name(&summary, date(2025, 12, 2)),
            format!("laporan_penimbangan_{}_2025-12-02.pdf", summary.session.id)
        );
    }

    #[test]
    fn test_session_report_layout() {
        let mut summary = summary_of(
            date(2025, 12, 1),
            &[("PP KOTOR", 1.0), ("METALIS", 2.5), ("PP KOTOR", 0.5)],
        );
        summary.items[1].item.satuan = Some(Satuan::Sak);
        push_uncategorised_item(&mut summary, 0.25);

        let document = session_report(&summary, &ReportLayout::default(), date(2025, 12, 2)).unwrap();
        assert_eq!(document.pages.len(), 1);
        assert_eq!(document.pages[0].footer(), "Halaman 1");

        let lines = texts(&document);
        assert_eq!(lines[0], "BARANG MASUK UPL");
        assert!(lines.contains(&"Tanggal: 1/12/2025".to_string()));
        assert!(lines.contains(&"PIC: Budi".to_string()));
        assert_eq!(lines.last().unwrap(), "TOTAL KESELURUHAN: 4.25 kg");

        let rows = table_rows(&document);
        // 4 items + total row + 3 categories
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[1], &vec!["2", "METALIS", "2.50", "SAK"]);
        assert_eq!(rows[0][3], UNIT_PLACEHOLDER);
        assert_eq!(rows[3][1], UNKNOWN_CATEGORY);
        assert_eq!(rows[4], &vec!["Total", "", "4.25", ""]);
        assert_eq!(rows[5], &vec!["METALIS", "2.50 kg", ""]);
        assert_eq!(rows[6], &vec!["PP KOTOR", "1.50 kg", ""]);
    }

    #[test]
    fn test_pagination_keeps_every_row_and_repeats_headers() {
        let weights: Vec<(&str, f64)> = (0..50).map(|_| ("PP KOTOR", 1.0)).collect();
        let summary = summary_of(date(2025, 12, 1), &weights);
        let layout = ReportLayout { lines_per_page: 10 };

        let document = session_report(&summary, &layout, date(2025, 12, 2)).unwrap();
        assert!(document.pages.len() > 5);

        let numbers: Vec<usize> = document.pages.iter().map(|p| p.number).collect();
        let expected: Vec<usize> = (1..=document.pages.len()).collect();
        assert_eq!(numbers, expected);

        for page in &document.pages {
            let lines: usize = page.blocks.iter().map(Block::line_count).sum();
            assert!(lines < layout.lines_per_page);
            for block in &page.blocks {
                if let Block::Table(table) = block {
                    assert!(!table.headers.is_empty());
                }
            }
        }

        let rows = table_rows(&document);
        let item_numbers: Vec<String> = rows.iter().take(50).map(|row| row[0].clone()).collect();
        let expected_numbers: Vec<String> = (1..=50).map(|n| n.to_string()).collect();
        assert_eq!(item_numbers, expected_numbers);
        assert_eq!(rows[50][0], "Total");
        assert_eq!(rows.len(), 52);
    }

    #[test]
    fn test_rendered_pages_stay_within_line_budget() {
        let weights: Vec<(&str, f64)> = (0..30)
            .map(|i| (if i % 3 == 0 { "METALIS" } else { "PP KOTOR" }, 1.0))
            .collect();
        let mut summary = summary_of(date(2025, 12, 1), &weights);
        summary.session.pic_name = "Budi\nSantoso".to_string();

        for lines_per_page in [3, 4, 8, 10, 40] {
            let layout = ReportLayout { lines_per_page };
            let document = session_report(&summary, &layout, date(2025, 12, 2)).unwrap();
            let text = String::from_utf8(PlainTextRenderer.render(&document).unwrap()).unwrap();

            let pages: Vec<usize> = text.split('\u{c}').map(|page| page.lines().count()).collect();
            assert_eq!(pages.len(), document.pages.len());
            assert!(
                pages.iter().all(|&lines| lines <= lines_per_page),
                "pages exceed {lines_per_page} lines: {pages:?}"
            );
        }
    }

    #[test]
    fn test_heading_stays_with_its_table() {
        let weights: Vec<(&str, f64)> = (0..30).map(|_| ("PP KOTOR", 1.0)).collect();
        let summary = summary_of(date(2025, 12, 1), &weights);

        for lines_per_page in 4..=16 {
            let layout = ReportLayout { lines_per_page };
            let document = session_report(&summary, &layout, date(2025, 12, 2)).unwrap();

            for page in &document.pages {
                for (index, block) in page.blocks.iter().enumerate() {
                    if let Block::Heading(text) = block {
                        if text.ends_with(':') {
                            assert!(
                                matches!(page.blocks.get(index + 1), Some(Block::Table(t)) if !t.rows.is_empty()),
                                "'{text}' separated from its table at {lines_per_page} lines per page"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_too_small_layout_is_report_error() {
        let summary = summary_of(date(2025, 12, 1), &[("PP KOTOR", 1.0)]);
        for lines_per_page in [0, 1, 2] {
            let result = session_report(&summary, &ReportLayout { lines_per_page }, date(2025, 12, 2));
            assert!(matches!(result, Err(Error::Report { .. })));
        }
    }

    #[test]
    fn test_period_report_document() {
        let sessions = vec![
            summary_of(date(2025, 12, 1), &[("PP KOTOR", 3.0)]),
            summary_of(date(2025, 12, 15), &[("PP KOTOR", 2.0)]),
        ];
        let report = PeriodReport {
            period: ResolvedPeriod {
                label: "Desember 2025".to_string(),
                interval: DateInterval::new(date(2025, 12, 1), date(2025, 12, 31)),
                closing_period: None,
            },
            aggregate: aggregate(&sessions),
        };

        let document = period_report(&report, &ReportLayout::default(), date(2026, 1, 2)).unwrap();
        assert_eq!(document.file_name, "laporan_bulanan_Desember_2025_2025_2026-01-02.pdf");

        let lines = texts(&document);
        assert!(lines.contains(&"Total Sesi: 2".to_string()));
        assert!(lines.contains(&"Total Berat: 5.00 kg".to_string()));

        let rows = table_rows(&document);
        assert_eq!(rows[0], &vec!["1", "PP KOTOR", "5.00", "100.0%", "2"]);
        assert_eq!(rows[1][0], "15/12/2025");
        assert_eq!(rows[2][0], "1/12/2025");
    }

    #[test]
    fn test_empty_period_report_has_no_tables() {
        let report = PeriodReport {
            period: ResolvedPeriod {
                label: "Week 2".to_string(),
                interval: DateInterval::new(date(2025, 12, 8), date(2025, 12, 14)),
                closing_period: None,
            },
            aggregate: aggregate(&[]),
        };
        let document = period_report(&report, &ReportLayout::default(), date(2025, 12, 10)).unwrap();
        assert_eq!(document.pages.len(), 1);
        assert!(table_rows(&document).is_empty());
        assert!(texts(&document).contains(&"Tidak ada data untuk periode ini".to_string()));
    }

    #[test]
    fn test_plain_text_renderer() {
        let summary = summary_of(date(2025, 12, 1), &[("PP KOTOR", 1.0), ("METALIS", 2.0)]);
        let layout = ReportLayout { lines_per_page: 8 };
        let document = session_report(&summary, &layout, date(2025, 12, 2)).unwrap();

        let renderer = PlainTextRenderer;
        let text = String::from_utf8(renderer.render(&document).unwrap()).unwrap();
        assert!(text.contains("| No    | Jenis Plastik | Berat (kg) | Satuan |"));
        assert!(text.contains("Halaman 1"));
        assert!(text.contains(&format!("Halaman {}", document.pages.len())));
        assert_eq!(text.matches('\u{c}').count(), document.pages.len() - 1);
        assert!(text.contains("== TOTAL KESELURUHAN: 3.00 kg =="));

        assert_eq!(
            renderer.output_name(&document),
            format!("laporan_penimbangan_{}_2025-12-02.txt", summary.session.id)
        );
    }
}
