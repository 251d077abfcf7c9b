//! Server-rendered HTML pages.
//!
//! Every interpolated value that can come from SmartSuite, the geocoder or
//! the query string goes through [`escape`].

use chrono::{DateTime, Utc};
use v_htmlescape::escape;

use crate::analytics::{sorted_desc, Counts, DashboardMetrics, Summary};
use crate::filter::ALL_STATES;
use crate::geo::GeocodeResult;
use crate::lead::{Lead, ScoredLead};
use crate::states;

const STYLE: &str = r#"
        body { margin: 0; font-family: system-ui, -apple-system, 'Segoe UI', sans-serif; background: #f4f6fb; color: #1f2937; }
        header { background: #1e3a5f; color: #fff; padding: 1.25rem 2rem; display: flex; justify-content: space-between; align-items: center; }
        header h1 { margin: 0; font-size: 1.5rem; }
        header .meta { font-size: 0.85rem; color: #cbd5e1; }
        main { padding: 1.5rem 2rem; }
        .cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 1rem; margin-bottom: 1.5rem; }
        .card { background: #fff; border-radius: 10px; padding: 1rem 1.25rem; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
        .card .value { font-size: 1.8rem; font-weight: 600; }
        .card .label { color: #6b7280; font-size: 0.85rem; }
        .controls { display: flex; flex-wrap: wrap; gap: 1rem; margin-bottom: 1.5rem; }
        .controls form { display: flex; gap: 0.5rem; align-items: center; background: #fff; padding: 0.75rem; border-radius: 10px; }
        input, select, button { font-size: 0.95rem; padding: 0.4rem 0.6rem; border: 1px solid #cbd5e1; border-radius: 6px; }
        button { background: #1e3a5f; color: #fff; cursor: pointer; }
        .notice { padding: 0.75rem 1rem; border-radius: 8px; margin-bottom: 1rem; background: #e0f2fe; }
        .notice.error { background: #fee2e2; color: #991b1b; }
        .distributions { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 1rem; margin-bottom: 1.5rem; }
        table { width: 100%; border-collapse: collapse; background: #fff; border-radius: 10px; overflow: hidden; }
        th, td { text-align: left; padding: 0.5rem 0.75rem; border-bottom: 1px solid #e5e7eb; vertical-align: top; font-size: 0.9rem; }
        th { background: #f1f5f9; }
        .empty { text-align: center; color: #6b7280; padding: 1.5rem; }
"#;

/// Rows of the leads table.
#[derive(Debug, Clone, Copy)]
pub enum LeadRows<'a> {
    /// Unranked leads.
    Plain(&'a [Lead]),
    /// Radius search results with distances.
    Scored(&'a [ScoredLead]),
}

impl LeadRows<'_> {
    fn len(&self) -> usize {
        match self {
            Self::Plain(leads) => leads.len(),
            Self::Scored(leads) => leads.len(),
        }
    }
}

/// Parameters and outcome of a city radius search.
#[derive(Debug, Clone)]
pub struct CitySearch<'a> {
    /// City as typed.
    pub city: &'a str,
    /// Search radius in miles.
    pub radius: f64,
    /// Geocoded search center, when found.
    pub center: Option<&'a GeocodeResult>,
}

/// Everything the dashboard page shows.
#[derive(Debug, Clone)]
pub struct DashboardPage<'a> {
    /// Leads table rows.
    pub rows: LeadRows<'a>,
    /// Summary cards.
    pub summary: Summary,
    /// Distribution tables.
    pub metrics: &'a DashboardMetrics,
    /// Selected state filter.
    pub selected_state: Option<&'a str>,
    /// Company search term.
    pub search_term: Option<&'a str>,
    /// City search, when one was run.
    pub city_search: Option<CitySearch<'a>>,
    /// Error shown above the tables.
    pub error: Option<String>,
    /// Time of the last successful refresh.
    pub last_refresh: Option<DateTime<Utc>>,
    /// Whether to render a logout button.
    pub show_logout: bool,
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

/// The main dashboard.
#[must_use]
pub fn render_dashboard(page: &DashboardPage<'_>) -> String {
    let last_refresh = page.last_refresh.map_or_else(
        || "never".to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    let logout = if page.show_logout {
        r#"<form method="post" action="/logout"><button type="submit">Log out</button></form>"#
    } else {
        ""
    };

    let body = format!(
        r#"<header>
    <div>
        <h1>Location Lead Dashboard</h1>
        <div class="meta">Last refresh: {last_refresh}</div>
    </div>
    <div class="controls-right">
        <button type="button" id="refresh-button" onclick="refreshData()">Refresh data</button>
        {logout}
    </div>
</header>
<main>
    {cards}
    {controls}
    {notices}
    <section class="distributions">
        {activity}
        {timeframe}
        {site_type}
        {state}
        {city}
    </section>
    {table}
</main>
<script>
    async function refreshData() {{
        const button = document.getElementById('refresh-button');
        button.disabled = true;
        button.textContent = 'Refreshing...';
        try {{
            const response = await fetch('/refresh-data', {{ method: 'POST' }});
            const result = await response.json();
            alert(result.message);
            if (result.success) {{ location.reload(); }}
        }} catch (err) {{
            alert('Refresh failed: ' + err);
        }} finally {{
            button.disabled = false;
            button.textContent = 'Refresh data';
        }}
    }}
</script>"#,
        last_refresh = escape(&last_refresh),
        cards = render_cards(&page.summary),
        controls = render_controls(page),
        notices = render_notices(page),
        activity = render_distribution("Activity Type", &page.metrics.activity_counts),
        timeframe = render_distribution("Timeframe", &page.metrics.timeframe_counts),
        site_type = render_distribution("Site Type", &page.metrics.site_type_counts),
        state = render_distribution("State", &page.metrics.state_counts),
        city = render_distribution("City", &page.metrics.city_counts),
        table = render_leads_table(page.rows),
    );

    layout("Location Lead Dashboard", &body)
}

fn render_cards(summary: &Summary) -> String {
    format!(
        r#"<section class="cards">
        <div class="card"><div class="value">{leads}</div><div class="label">Total leads</div></div>
        <div class="card"><div class="value">{jobs}</div><div class="label">Estimated new jobs</div></div>
        <div class="card"><div class="value">{avg}</div><div class="label">Average jobs per lead</div></div>
        <div class="card"><div class="value">{types}</div><div class="label">Activity types</div></div>
    </section>"#,
        leads = summary.total_leads,
        jobs = summary.total_jobs,
        avg = summary.avg_jobs_per_lead,
        types = summary.total_activity_types,
    )
}

fn render_controls(page: &DashboardPage<'_>) -> String {
    let selected = page.selected_state.unwrap_or(ALL_STATES);
    let mut options = format!(
        r#"<option value="{all}"{sel}>{all}</option>"#,
        all = ALL_STATES,
        sel = if selected == ALL_STATES { " selected" } else { "" },
    );
    for name in states::all_names_sorted() {
        options.push_str(&format!(
            r#"<option value="{name}"{sel}>{name}</option>"#,
            name = escape(name),
            sel = if selected == name { " selected" } else { "" },
        ));
    }

    let (city, radius) = page
        .city_search
        .as_ref()
        .map_or((String::new(), 50.0), |c| (c.city.to_string(), c.radius));

    format!(
        r#"<section class="controls">
        <form method="get" action="/filter">
            <label for="state">State</label>
            <select id="state" name="state">{options}</select>
            <button type="submit">Filter</button>
        </form>
        <form method="get" action="/search">
            <input type="text" name="company" placeholder="Company name" value="{term}">
            <button type="submit">Search</button>
        </form>
        <form method="get" action="/city-search">
            <input type="text" name="city" placeholder="City" value="{city}">
            <input type="number" name="radius" min="1" step="any" value="{radius}">
            <span>miles</span>
            <button type="submit">Find nearby</button>
        </form>
        <form method="get" action="/"><button type="submit">Reset</button></form>
    </section>"#,
        term = escape(page.search_term.unwrap_or_default()),
        city = escape(&city),
        radius = radius,
    )
}

fn render_notices(page: &DashboardPage<'_>) -> String {
    let mut out = String::new();
    if let Some(error) = &page.error {
        out.push_str(&format!(
            r#"<div class="notice error">{}</div>"#,
            escape(error)
        ));
    }
    if let Some(search) = &page.city_search {
        if let Some(center) = search.center {
            out.push_str(&format!(
                r#"<div class="notice">{count} leads within {radius} miles of {name} ({coords})</div>"#,
                count = page.rows.len(),
                radius = search.radius,
                name = escape(&center.display_name),
                coords = center.coordinates,
            ));
        }
    }
    if let Some(state) = page.selected_state.filter(|s| *s != ALL_STATES && !s.is_empty()) {
        out.push_str(&format!(
            r#"<div class="notice">{count} leads in {state}</div>"#,
            count = page.rows.len(),
            state = escape(state),
        ));
    }
    if let Some(term) = page.search_term.filter(|t| !t.trim().is_empty()) {
        out.push_str(&format!(
            r#"<div class="notice">{count} leads matching "{term}"</div>"#,
            count = page.rows.len(),
            term = escape(term),
        ));
    }
    out
}

fn render_distribution(title: &str, counts: &Counts) -> String {
    let rows: String = if counts.is_empty() {
        r#"<tr><td colspan="2" class="empty">No data</td></tr>"#.to_string()
    } else {
        sorted_desc(counts)
            .into_iter()
            .map(|(label, count)| {
                format!(
                    "<tr><td>{}</td><td>{count}</td></tr>",
                    escape(label)
                )
            })
            .collect()
    };
    format!(
        r#"<table>
            <thead><tr><th>{title}</th><th>Leads</th></tr></thead>
            <tbody>{rows}</tbody>
        </table>"#,
        title = escape(title),
    )
}

fn render_lead_cells(lead: &Lead) -> String {
    let coordinates = lead
        .coordinates
        .map(|c| c.to_string())
        .unwrap_or_default();
    format!(
        "<td>{company}</td><td>{address}</td><td>{coords}</td><td>{jobs}</td><td>{activity}</td>\
         <td>{timeframe}</td><td>{site_type}</td><td>{specialized}</td><td>{onet}</td>\
         <td>{summary}</td><td>{about}</td>",
        company = escape(&lead.company),
        address = escape(&lead.address),
        coords = escape(&coordinates),
        jobs = lead.estimated_new_jobs,
        activity = escape(&lead.activity_type),
        timeframe = escape(&lead.timeframe),
        site_type = escape(&lead.site_type),
        specialized = escape(&lead.specialized_industry_site),
        onet = escape(&lead.onet_industry_site),
        summary = escape(&lead.general_lead_summary),
        about = escape(&lead.about),
    )
}

fn render_leads_table(rows: LeadRows<'_>) -> String {
    let with_distance = matches!(rows, LeadRows::Scored(_));
    let columns = 11 + usize::from(with_distance);

    let body: String = match rows {
        LeadRows::Plain([]) | LeadRows::Scored([]) => format!(
            r#"<tr><td colspan="{columns}" class="empty">No leads found.</td></tr>"#
        ),
        LeadRows::Plain(leads) => leads
            .iter()
            .map(|lead| format!("<tr>{}</tr>", render_lead_cells(lead)))
            .collect(),
        LeadRows::Scored(scored) => scored
            .iter()
            .map(|s| {
                format!(
                    "<tr>{}<td>{} mi</td></tr>",
                    render_lead_cells(&s.lead),
                    s.distance_label()
                )
            })
            .collect(),
    };

    let distance_header = if with_distance { "<th>Distance</th>" } else { "" };
    format!(
        r#"<table class="leads">
        <thead><tr>
            <th>Company</th><th>Address</th><th>Coordinates</th><th>New jobs</th><th>Activity</th>
            <th>Timeframe</th><th>Site type</th><th>Specialized industry</th><th>O*NET industry</th>
            <th>Summary</th><th>About</th>{distance_header}
        </tr></thead>
        <tbody>{body}</tbody>
    </table>"#
    )
}

/// Shown while the first load is still running; reloads itself.
#[must_use]
pub fn loading_page() -> String {
    layout(
        "Starting up",
        r#"<main class="empty">
    <h1>Application is starting up...</h1>
    <p>Lead data is still loading. This page will refresh automatically.</p>
    <script>setTimeout(() => location.reload(), 3000);</script>
</main>"#,
    )
}

/// Shown when the first load failed.
#[must_use]
pub fn error_page(message: &str) -> String {
    layout(
        "Data unavailable",
        &format!(
            r#"<main class="empty">
    <h1>Failed to load data from SmartSuite</h1>
    <p>Error: {}</p>
    <p>Please check your configuration and try again.</p>
</main>"#,
            escape(message)
        ),
    )
}

/// Password form.
#[must_use]
pub fn login_page(error: Option<&str>) -> String {
    let notice = error
        .map(|e| format!(r#"<div class="notice error">{}</div>"#, escape(e)))
        .unwrap_or_default();
    layout(
        "Sign in",
        &format!(
            r#"<main>
    <h1>Location Lead Dashboard</h1>
    {notice}
    <form method="post" action="/login" class="controls">
        <input type="password" name="password" placeholder="Password" autofocus>
        <button type="submit">Sign in</button>
    </form>
</main>"#
        ),
    )
}
