use analytics::{MixChart, TrendChart};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use core_types::{SalesRecord, WatchlistEntry};
use dashboard::{DashboardView, MetricsPanel};
use events::{Notice, NoticeLevel};
use rust_decimal::Decimal;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn amount(value: Decimal) -> Cell {
    Cell::new(value.round_dp(2).normalize()).set_alignment(CellAlignment::Right)
}

/// 数据概览: the filtered rows with their derived columns.
pub fn overview_table(rows: &[SalesRecord]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["年份", "产品A销售额", "产品B销售额", "成本", "总销售额", "利润"]);
    for record in rows {
        table.add_row(vec![
            Cell::new(record.year()),
            amount(record.product_a_sales()),
            amount(record.product_b_sales()),
            amount(record.cost()),
            amount(record.total_sales()),
            amount(record.profit()),
        ]);
    }
    table
}

/// 关键指标: one column per tile, or the reason the metrics are withheld.
pub fn metrics_table(panel: &MetricsPanel) -> Table {
    let mut table = new_table();
    match panel {
        MetricsPanel::Ready { tiles, .. } => {
            table.set_header(tiles.iter().map(|t| t.label.as_str()));
            table.add_row(tiles.iter().map(|t| t.value.as_str()));
        }
        MetricsPanel::Unavailable { reason } => {
            table.set_header(vec!["关键指标"]);
            table.add_row(vec![reason.as_str()]);
        }
    }
    table
}

/// The trend chart as a table: one row per year, one column per series.
pub fn trend_table(chart: &TrendChart) -> Table {
    let mut table = new_table();
    let mut header = vec![chart.x_label.clone()];
    header.extend(chart.series.iter().map(|s| s.label.clone()));
    table.set_header(header);

    for (i, year) in chart.years.iter().enumerate() {
        let mut row = vec![Cell::new(year)];
        row.extend(
            chart
                .series
                .iter()
                .map(|s| s.values.get(i).map_or_else(|| Cell::new("-"), |v| amount(*v))),
        );
        table.add_row(row);
    }
    table
}

pub fn mix_table(chart: &MixChart) -> Table {
    let mut table = new_table();
    table.set_header(vec!["年份", "产品A", "产品B"]);
    for row in &chart.rows {
        table.add_row(vec![
            Cell::new(row.year),
            amount(row.product_a_sales),
            amount(row.product_b_sales),
        ]);
    }
    table
}

pub fn watchlist_table(entries: &[WatchlistEntry]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "股票代码", "添加时间"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(&entry.code),
            Cell::new(entry.created_at.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    table
}

pub fn notice_line(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "INFO",
        NoticeLevel::Warn => "WARN",
        NoticeLevel::Error => "ERROR",
    };
    format!("[{tag}] {}", notice.message)
}

/// Prints one full frame of the dashboard to stdout.
pub fn print_view(view: &DashboardView) {
    println!("{}", view.title);
    println!(
        "年份范围: {} (可选 {}) | 显示利润: {}",
        view.range,
        view.bounds,
        if view.show_profit { "是" } else { "否" }
    );
    for notice in &view.notices {
        println!("{}", notice_line(notice));
    }

    println!("\n数据概览");
    println!("{}", overview_table(&view.rows));
    println!("\n关键指标");
    println!("{}", metrics_table(&view.metrics));
    if let Some(chart) = &view.trend_chart {
        println!("\n{}", chart.title);
        println!("{}", trend_table(chart));
    }
    if let Some(chart) = &view.mix_chart {
        println!("\n{}", chart.title);
        println!("{}", mix_table(chart));
    }
    println!("\n自选股列表");
    println!("{}", watchlist_table(&view.watchlist));
}
