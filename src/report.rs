use std::collections::BTreeMap;

use eyre::Result;
use itertools::Itertools;
use serde_json::json;
use tracing::info;

use crate::model::SymbolRecord;
use crate::pipeline::PipelineOutput;
use crate::Symbol;

/// Renders the self-contained HTML report over the pipeline output. Rows
/// without stats are left out of the table, matching the chart data which
/// only exists for symbols with history.
pub fn render(output: &PipelineOutput) -> Result<String> {
    let mut all_data = serde_json::Map::new();
    let mut chart_data = serde_json::Map::new();
    for (coin, record) in &output.records {
        all_data.insert(
            coin.clone(),
            json!({ "stats": record.stats, "market": record.snapshot }),
        );
        if !record.history.is_empty() {
            let points: Vec<_> = record
                .history
                .iter()
                .map(|obs| json!({ "time": obs.time, "rate": obs.rate * 100.0 }))
                .collect();
            chart_data.insert(coin.clone(), json!(points));
        }
    }

    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let html = TEMPLATE
        .replace("__PRIMARY_COUNT__", &output.primary_count.to_string())
        .replace("__EXTENDED_COUNT__", &output.extended_count.to_string())
        .replace(
            "__TOTAL_COUNT__",
            &(output.primary_count + output.extended_count).to_string(),
        )
        .replace("__GENERATED_AT__", &generated_at)
        .replace("__ALL_DATA__", &serde_json::to_string(&all_data)?)
        .replace("__CHART_DATA__", &serde_json::to_string(&chart_data)?);
    Ok(html)
}

/// Console companion to the report: the ten symbols with the largest
/// cumulative 7-day funding, by absolute value.
pub fn log_top_movers(records: &BTreeMap<Symbol, SymbolRecord>) {
    let top = records
        .iter()
        .filter_map(|(coin, record)| record.stats.map(|stats| (coin, stats)))
        .sorted_by(|a, b| {
            b.1.sum_7d
                .abs()
                .partial_cmp(&a.1.sum_7d.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .take(10);
    info!("top 10 by |7d cumulative funding|:");
    for (coin, stats) in top {
        info!("  {:<12} 7d: {:>9.2}%", coin, stats.sum_7d * 100.0);
    }
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Hyperliquid Funding Tracker</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/chartjs-adapter-date-fns"></script>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #09090b; color: #fafafa; min-height: 100vh; padding: 24px;
        }
        .container { max-width: 1400px; margin: 0 auto; }
        .header { display: flex; align-items: center; gap: 16px; margin-bottom: 24px; flex-wrap: wrap; }
        .header-text h1 { font-size: 24px; font-weight: 700; }
        .header-text p { color: #71717a; font-size: 14px; }
        .stats-bar { display: flex; gap: 16px; margin-left: auto; flex-wrap: wrap; }
        .stats-item {
            background: #18181b; border: 1px solid #27272a; border-radius: 8px;
            padding: 8px 16px; text-align: center;
        }
        .stats-item .label { font-size: 11px; color: #71717a; text-transform: uppercase; }
        .stats-item .value { font-size: 18px; font-weight: 600; color: #10b981; }
        .controls { display: flex; gap: 12px; margin-bottom: 16px; flex-wrap: wrap; align-items: center; }
        .search-box { flex: 1; min-width: 200px; max-width: 400px; }
        .search-box input {
            width: 100%; padding: 10px 16px; background: #18181b; border: 1px solid #27272a;
            border-radius: 8px; color: #fafafa; font-size: 14px; outline: none;
        }
        .search-box input:focus { border-color: #10b981; }
        .filter-btns { display: flex; gap: 8px; }
        .filter-btn {
            padding: 8px 16px; background: #18181b; border: 1px solid #27272a; border-radius: 6px;
            color: #a1a1aa; font-size: 13px; cursor: pointer;
        }
        .filter-btn:hover { border-color: #3f3f46; color: #fafafa; }
        .filter-btn.active { background: #10b981; border-color: #10b981; color: #000; }
        .table-container {
            background: rgba(24, 24, 27, 0.5); border: 1px solid #27272a;
            border-radius: 12px; overflow: hidden;
        }
        .table-scroll { max-height: 600px; overflow-y: auto; }
        table { width: 100%; border-collapse: collapse; }
        thead { position: sticky; top: 0; z-index: 10; }
        th {
            background: #1f1f23; padding: 12px; text-align: left; font-size: 11px; font-weight: 600;
            color: #a1a1aa; text-transform: uppercase; letter-spacing: 0.5px; cursor: pointer;
            user-select: none; white-space: nowrap; border-bottom: 1px solid #27272a;
        }
        th:hover { background: #27272a; }
        th:not(:first-child) { text-align: right; }
        th .sort-icon { margin-left: 4px; opacity: 0.5; }
        th.sorted .sort-icon { opacity: 1; color: #10b981; }
        td {
            padding: 10px 12px; border-top: 1px solid rgba(39, 39, 42, 0.5); font-size: 13px;
        }
        td:not(:first-child) {
            text-align: right; font-family: 'SF Mono', Monaco, 'Courier New', monospace; font-size: 12px;
        }
        tbody tr { cursor: pointer; }
        tbody tr:hover { background: rgba(39, 39, 42, 0.3); }
        tbody tr.selected { background: rgba(16, 185, 129, 0.15); border-left: 3px solid #10b981; }
        tbody tr.extended .coin-name { color: #fbbf24; }
        .coin-name { font-weight: 600; }
        .positive { color: #10b981; }
        .negative { color: #f43f5e; }
        .neutral { color: #71717a; }
        .annual { color: #71717a; font-size: 10px; }
        .detail-panel {
            position: fixed; top: 0; right: 0; width: 500px; height: 100vh; background: #18181b;
            border-left: 1px solid #27272a; padding: 24px; transform: translateX(100%);
            transition: transform 0.3s ease; overflow-y: auto; z-index: 100;
        }
        .detail-panel.active { transform: translateX(0); }
        .detail-overlay {
            position: fixed; inset: 0; background: rgba(0,0,0,0.5); opacity: 0;
            pointer-events: none; transition: opacity 0.3s; z-index: 99;
        }
        .detail-overlay.active { opacity: 1; pointer-events: auto; }
        .detail-header { display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 24px; }
        .detail-title { font-size: 24px; font-weight: 700; }
        .detail-subtitle { color: #71717a; font-size: 14px; margin-top: 4px; }
        .close-btn {
            width: 36px; height: 36px; background: #27272a; border: none; border-radius: 50%;
            color: #a1a1aa; cursor: pointer; font-size: 20px;
        }
        .close-btn:hover { background: #3f3f46; color: #fff; }
        .stats-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 12px; margin-bottom: 24px; }
        .stat-card { background: #09090b; border: 1px solid #27272a; border-radius: 8px; padding: 12px; }
        .stat-label { font-size: 11px; color: #71717a; text-transform: uppercase; margin-bottom: 4px; }
        .stat-value { font-size: 18px; font-weight: 600; font-family: 'SF Mono', Monaco, monospace; }
        .chart-container { background: #09090b; border: 1px solid #27272a; border-radius: 12px; padding: 16px; height: 250px; }
        .no-results { text-align: center; padding: 48px; color: #52525b; }
        .update-time { text-align: center; margin-top: 16px; color: #52525b; font-size: 12px; }
        @media (max-width: 768px) {
            .detail-panel { width: 100%; }
            .stats-bar { width: 100%; justify-content: center; }
        }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <div class="header-text">
                <h1>Hyperliquid Funding Tracker</h1>
                <p>Funding rates across all perpetual pairs</p>
            </div>
            <div class="stats-bar">
                <div class="stats-item">
                    <div class="label">Primary</div>
                    <div class="value">__PRIMARY_COUNT__</div>
                </div>
                <div class="stats-item">
                    <div class="label">Extended</div>
                    <div class="value" style="color: #fbbf24;">__EXTENDED_COUNT__</div>
                </div>
                <div class="stats-item">
                    <div class="label">Total</div>
                    <div class="value">__TOTAL_COUNT__</div>
                </div>
            </div>
        </div>

        <div class="controls">
            <div class="search-box">
                <input type="text" id="search" placeholder="Search pairs... (press / to focus)" oninput="renderTable()">
            </div>
            <div class="filter-btns">
                <button class="filter-btn active" onclick="setFilter('all', event)">All</button>
                <button class="filter-btn" onclick="setFilter('primary', event)">Primary</button>
                <button class="filter-btn" onclick="setFilter('extended', event)">Extended</button>
                <button class="filter-btn" onclick="setFilter('positive', event)">Positive</button>
                <button class="filter-btn" onclick="setFilter('negative', event)">Negative</button>
            </div>
        </div>

        <div class="table-container">
            <div class="table-scroll">
                <table>
                    <thead>
                        <tr>
                            <th onclick="sortTable('name')" data-col="name">Pair <span class="sort-icon">&#8597;</span></th>
                            <th onclick="sortTable('volume24h')" data-col="volume24h">24H Volume <span class="sort-icon">&#8597;</span></th>
                            <th onclick="sortTable('openInterest')" data-col="openInterest">Open Interest <span class="sort-icon">&#8597;</span></th>
                            <th onclick="sortTable('rate8h')" data-col="rate8h">Current <span class="sort-icon">&#8597;</span></th>
                            <th onclick="sortTable('sum1d')" data-col="sum1d">1D <span class="sort-icon">&#8597;</span></th>
                            <th onclick="sortTable('sum7d')" data-col="sum7d">7D <span class="sort-icon">&#8597;</span></th>
                            <th onclick="sortTable('sum30d')" data-col="sum30d">30D <span class="sort-icon">&#8597;</span></th>
                        </tr>
                    </thead>
                    <tbody id="coin-table"></tbody>
                </table>
            </div>
            <div class="no-results" id="no-results" style="display: none;">No matching pairs</div>
        </div>

        <div class="update-time">
            Generated __GENERATED_AT__ | click a row for details | / to search | ESC to close
        </div>
    </div>

    <div class="detail-overlay" id="detail-overlay" onclick="hideDetail()"></div>
    <div class="detail-panel" id="detail-panel">
        <div class="detail-header">
            <div>
                <div class="detail-title" id="detail-title">-</div>
                <div class="detail-subtitle">Funding rate history</div>
            </div>
            <button class="close-btn" onclick="hideDetail()">&times;</button>
        </div>
        <div class="stats-grid" id="detail-stats"></div>
        <div class="chart-container">
            <canvas id="funding-chart"></canvas>
        </div>
    </div>

    <script>
        const allData = __ALL_DATA__;
        const chartData = __CHART_DATA__;

        let currentSort = { col: 'volume24h', dir: 'desc' };
        let currentFilter = 'all';
        let chart = null;

        const tableData = Object.entries(allData)
            .filter(([coin, data]) => data.stats)
            .map(([coin, data]) => ({
                name: coin,
                isExtended: coin.includes(':'),
                displayName: coin.includes(':') ? coin.split(':')[1] : coin,
                volume24h: data.market?.volume24h || 0,
                openInterest: data.market?.openInterest || 0,
                ...data.stats
            }));

        function formatPercent(value, decimals = 4) {
            if (value === null || value === undefined) return '-';
            return (value * 100).toFixed(decimals) + '%';
        }

        function formatMoney(value) {
            if (!value) return '-';
            if (value >= 1e9) return '$' + (value / 1e9).toFixed(2) + 'B';
            if (value >= 1e6) return '$' + (value / 1e6).toFixed(2) + 'M';
            if (value >= 1e3) return '$' + (value / 1e3).toFixed(1) + 'K';
            return '$' + value.toFixed(0);
        }

        function formatOI(value) {
            if (!value) return '-';
            if (value >= 1e6) return (value / 1e6).toFixed(2) + 'M';
            if (value >= 1e3) return (value / 1e3).toFixed(1) + 'K';
            return value.toFixed(0);
        }

        function formatWithAnnual(value, days, decimals = 2) {
            if (value === null || value === undefined) return '-';
            const pct = (value * 100).toFixed(decimals) + '%';
            const annual = (value * 365 / days * 100).toFixed(1) + '%';
            return pct + ' <span class="annual">(' + annual + ')</span>';
        }

        function getColorClass(val) {
            if (val > 0.00001) return 'positive';
            if (val < -0.00001) return 'negative';
            return 'neutral';
        }

        function renderTable() {
            const tbody = document.getElementById('coin-table');
            const search = document.getElementById('search').value.toLowerCase();

            let filtered = tableData.filter(row => {
                if (search && !row.name.toLowerCase().includes(search)) return false;
                if (currentFilter === 'primary' && row.isExtended) return false;
                if (currentFilter === 'extended' && !row.isExtended) return false;
                if (currentFilter === 'positive' && row.rate8h <= 0) return false;
                if (currentFilter === 'negative' && row.rate8h >= 0) return false;
                return true;
            });

            filtered.sort((a, b) => {
                if (currentSort.col === 'name') {
                    const aVal = a.displayName.toLowerCase();
                    const bVal = b.displayName.toLowerCase();
                    return currentSort.dir === 'asc' ? aVal.localeCompare(bVal) : bVal.localeCompare(aVal);
                }
                const aVal = a[currentSort.col];
                const bVal = b[currentSort.col];
                return currentSort.dir === 'asc' ? aVal - bVal : bVal - aVal;
            });

            document.querySelectorAll('th').forEach(th => {
                th.classList.remove('sorted');
                const icon = th.querySelector('.sort-icon');
                if (icon) icon.innerHTML = '&#8597;';
            });
            const sortedTh = document.querySelector('th[data-col="' + currentSort.col + '"]');
            if (sortedTh) {
                sortedTh.classList.add('sorted');
                sortedTh.querySelector('.sort-icon').innerHTML = currentSort.dir === 'asc' ? '&#8593;' : '&#8595;';
            }

            if (filtered.length === 0) {
                tbody.innerHTML = '';
                document.getElementById('no-results').style.display = 'block';
                return;
            }
            document.getElementById('no-results').style.display = 'none';

            tbody.innerHTML = filtered.map(row =>
                '<tr class="' + (row.isExtended ? 'extended' : '') + '" onclick="showDetail(\'' + row.name + '\', event)">' +
                '<td><span class="coin-name">' + row.displayName + '</span></td>' +
                '<td style="color:#60a5fa">' + formatMoney(row.volume24h) + '</td>' +
                '<td style="color:#a78bfa">' + formatOI(row.openInterest) + '</td>' +
                '<td class="' + getColorClass(row.rate8h) + '">' + formatPercent(row.rate8h) + '</td>' +
                '<td class="' + getColorClass(row.sum1d) + '">' + formatWithAnnual(row.sum1d, 1, 3) + '</td>' +
                '<td class="' + getColorClass(row.sum7d) + '">' + formatWithAnnual(row.sum7d, 7, 2) + '</td>' +
                '<td class="' + getColorClass(row.sum30d) + '">' + formatWithAnnual(row.sum30d, 30, 2) + '</td>' +
                '</tr>'
            ).join('');
        }

        function sortTable(col) {
            if (currentSort.col === col) {
                currentSort.dir = currentSort.dir === 'asc' ? 'desc' : 'asc';
            } else {
                currentSort.col = col;
                currentSort.dir = col === 'name' ? 'asc' : 'desc';
            }
            renderTable();
        }

        function setFilter(filter, event) {
            currentFilter = filter;
            document.querySelectorAll('.filter-btn').forEach(btn => btn.classList.remove('active'));
            event.target.classList.add('active');
            renderTable();
        }

        function showDetail(coin, event) {
            const data = allData[coin];
            if (!data || !data.stats) return;
            const stats = data.stats;
            const displayName = coin.includes(':') ? coin.split(':')[1] : coin;

            document.getElementById('detail-title').textContent = displayName;
            document.getElementById('detail-stats').innerHTML =
                '<div class="stat-card"><div class="stat-label">Current</div>' +
                '<div class="stat-value ' + getColorClass(stats.rate8h) + '">' + formatPercent(stats.rate8h) + '</div></div>' +
                '<div class="stat-card"><div class="stat-label">Average</div>' +
                '<div class="stat-value ' + getColorClass(stats.avg) + '">' + formatPercent(stats.avg) + '</div></div>' +
                '<div class="stat-card"><div class="stat-label">Max</div>' +
                '<div class="stat-value positive">' + formatPercent(stats.max) + '</div></div>' +
                '<div class="stat-card"><div class="stat-label">Min</div>' +
                '<div class="stat-value negative">' + formatPercent(stats.min) + '</div></div>' +
                '<div class="stat-card"><div class="stat-label">7D Sum</div>' +
                '<div class="stat-value ' + getColorClass(stats.sum7d) + '">' + formatPercent(stats.sum7d, 2) + '</div></div>' +
                '<div class="stat-card"><div class="stat-label">30D Sum</div>' +
                '<div class="stat-value ' + getColorClass(stats.sum30d) + '">' + formatPercent(stats.sum30d, 2) + '</div></div>';

            if (chart) chart.destroy();
            const ctx = document.getElementById('funding-chart').getContext('2d');
            const points = chartData[coin] || [];
            chart = new Chart(ctx, {
                type: 'line',
                data: {
                    labels: points.map(d => new Date(d.time)),
                    datasets: [{
                        label: 'Rate %',
                        data: points.map(d => d.rate),
                        borderColor: '#10b981',
                        backgroundColor: 'rgba(16, 185, 129, 0.1)',
                        fill: true,
                        tension: 0.2,
                        pointRadius: 0,
                        pointHoverRadius: 4
                    }]
                },
                options: {
                    responsive: true,
                    maintainAspectRatio: false,
                    plugins: {
                        legend: { display: false },
                        tooltip: {
                            backgroundColor: '#18181b',
                            borderColor: '#3f3f46',
                            borderWidth: 1,
                            callbacks: { label: ctx => 'Rate: ' + ctx.parsed.y.toFixed(4) + '%' }
                        }
                    },
                    scales: {
                        x: {
                            type: 'time',
                            time: { unit: 'day' },
                            grid: { color: '#27272a' },
                            ticks: { color: '#71717a', maxTicksLimit: 6 }
                        },
                        y: {
                            grid: { color: '#27272a' },
                            ticks: { color: '#71717a', callback: v => v.toFixed(3) + '%' }
                        }
                    }
                }
            });

            document.getElementById('detail-panel').classList.add('active');
            document.getElementById('detail-overlay').classList.add('active');
            document.querySelectorAll('tbody tr').forEach(tr => tr.classList.remove('selected'));
            if (event) event.currentTarget.classList.add('selected');
        }

        function hideDetail() {
            document.getElementById('detail-panel').classList.remove('active');
            document.getElementById('detail-overlay').classList.remove('active');
            document.querySelectorAll('tbody tr').forEach(tr => tr.classList.remove('selected'));
        }

        document.addEventListener('keydown', e => {
            if (e.key === 'Escape') hideDetail();
            if (e.key === '/' && e.target.tagName !== 'INPUT') {
                e.preventDefault();
                document.getElementById('search').focus();
            }
        });

        renderTable();
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FundingObservation, FundingStats, MarketSnapshot, SymbolRecord};

    fn sample_output() -> PipelineOutput {
        let stats = FundingStats {
            current_rate: 0.0003,
            sum_1d: 0.0002,
            sum_3d: 0.0002,
            sum_7d: 0.0002,
            sum_30d: 0.0002,
            avg: 0.0001,
            max: 0.0003,
            min: -0.0002,
            count: 3,
        };
        let mut records = BTreeMap::new();
        records.insert(
            "xyz:TSLA".to_string(),
            SymbolRecord {
                snapshot: MarketSnapshot {
                    volume_24h: 1234.5,
                    open_interest: 42.0,
                    mark_px: 250.0,
                    funding: 0.0003,
                },
                history: vec![FundingObservation {
                    time: 1700000000000,
                    rate: 0.0003,
                }],
                stats: Some(stats),
            },
        );
        records.insert("xyz:EMPTY".to_string(), SymbolRecord::default());
        PipelineOutput {
            records,
            primary_count: 0,
            extended_count: 2,
        }
    }

    #[test]
    fn test_render_embeds_data_and_counts() {
        let html = render(&sample_output()).unwrap();
        assert!(html.contains(r#""rate8h":0.0003,"sum1d":0.0002"#));
        assert!(html.contains(r#""volume24h":1234.5"#));
        // symbols without history get a null-stats row but no chart series
        assert!(html.contains(r#""stats":null"#));
        assert!(!html.contains(r#""xyz:EMPTY":[{"#));
        assert!(html.contains(r#"<div class="value" style="color: #fbbf24;">2</div>"#));
        // no unresolved template tokens
        assert!(!html.contains("__"));
    }

    #[test]
    fn test_chart_rates_are_percent() {
        let html = render(&sample_output()).unwrap();
        let expected = json!({ "time": 1700000000000i64, "rate": 0.0003 * 100.0 }).to_string();
        assert!(html.contains(&expected));
    }
}
