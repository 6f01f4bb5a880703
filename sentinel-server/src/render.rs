//! HTML rendering for the dashboard page.
//!
//! The markup is assembled by hand: three columns (scheduled updates,
//! statistics, news) over a shared header, with plain GET forms posting
//! back to `/index`. Exact markup is not a contract; the data slots are.

use axum::response::Html;

use sentinel_core::Dashboard;

const PAGE_TITLE: &str = "SARS-CoV-2 (Coronavirus) dashboard";

/// Minimal HTML escaping for text and attribute positions.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn hidden_action_form(field: &str, value: &str, label: &str) -> String {
    format!(
        concat!(
            "<form method=\"get\" action=\"/index\">",
            "<input type=\"hidden\" name=\"{field}\" value=\"{value}\">",
            "<button type=\"submit\">{label}</button>",
            "</form>"
        ),
        field = field,
        value = escape(value),
        label = label,
    )
}

fn render_updates(dashboard: &Dashboard, out: &mut String) {
    out.push_str("<section class=\"updates\"><h2>Scheduled updates</h2>");
    if dashboard.registry.items().is_empty() {
        out.push_str("<p>No updates scheduled.</p>");
    }
    for item in dashboard.registry.items() {
        out.push_str("<article class=\"update\">");
        out.push_str(&format!("<h3>{}</h3>", escape(item.title())));
        out.push_str(&format!("<p>{}</p>", escape(item.content())));
        out.push_str(&hidden_action_form("update_item", item.title(), "Cancel"));
        out.push_str("</article>");
    }
    out.push_str("</section>");
}

fn render_stats(dashboard: &Dashboard, out: &mut String) {
    let local = dashboard.store.local();
    let national = dashboard.store.national();

    out.push_str("<section class=\"stats\"><h2>Infection rates</h2>");
    out.push_str(&format!(
        "<h1>{}</h1><p>Local 7-day infections: {}</p>",
        escape(local.location.as_deref().unwrap_or("Unknown")),
        local
            .seven_day_cases
            .map_or_else(|| "unavailable".to_string(), |n| n.to_string()),
    ));
    out.push_str(&format!(
        "<h1>{}</h1><p>National 7-day infections: {}</p>",
        escape(national.location.as_deref().unwrap_or("Unknown")),
        national
            .seven_day_cases
            .map_or_else(|| "unavailable".to_string(), |n| n.to_string()),
    ));
    if let Some(hospital_cases) = national.hospital_cases {
        out.push_str(&format!(
            "<p>Current hospital cases: {hospital_cases}</p>"
        ));
    }
    if let Some(deaths) = national.deaths {
        out.push_str(&format!(
            "<p>Deaths as of {}: {}</p>",
            deaths.as_of, deaths.total
        ));
    }
    out.push_str(&schedule_form());
    out.push_str("</section>");
}

fn schedule_form() -> String {
    concat!(
        "<form method=\"get\" action=\"/index\">",
        "<label>Update time <input type=\"time\" name=\"update\"></label>",
        "<label>Update label <input type=\"text\" name=\"two\"></label>",
        "<label><input type=\"checkbox\" name=\"covid-data\" value=\"covid-data\"> Update Covid data</label>",
        "<label><input type=\"checkbox\" name=\"news\" value=\"news\"> Update news articles</label>",
        "<label><input type=\"checkbox\" name=\"repeat\" value=\"repeat\"> Repeat update</label>",
        "<button type=\"submit\">Submit</button>",
        "</form>"
    )
    .to_string()
}

fn render_news(dashboard: &Dashboard, out: &mut String) {
    out.push_str("<section class=\"news\"><h2>News headlines</h2>");
    match dashboard.store.latest_news() {
        Some(latest) if !latest.articles.is_empty() => {
            for article in &latest.articles {
                out.push_str("<article class=\"headline\">");
                match article.url.as_deref() {
                    Some(url) => out.push_str(&format!(
                        "<h3><a href=\"{}\">{}</a></h3>",
                        escape(url),
                        escape(&article.title)
                    )),
                    None => out.push_str(&format!(
                        "<h3>{}</h3>",
                        escape(&article.title)
                    )),
                }
                if let Some(description) = article.description.as_deref() {
                    out.push_str(&format!("<p>{}</p>", escape(description)));
                }
                out.push_str(&hidden_action_form(
                    "notif",
                    &article.title,
                    "Dismiss",
                ));
                out.push_str("</article>");
            }
        }
        _ => out.push_str("<p>No headlines available.</p>"),
    }
    out.push_str("</section>");
}

/// Render the full dashboard page from the current state.
pub fn page(dashboard: &Dashboard) -> Html<String> {
    let mut out = String::with_capacity(4096);
    out.push_str("<!DOCTYPE html><html lang=\"en\"><head>");
    out.push_str("<meta charset=\"utf-8\">");
    out.push_str(&format!("<title>{PAGE_TITLE}</title>"));
    out.push_str("</head><body>");
    out.push_str(&format!("<header><h1>{PAGE_TITLE}</h1></header>"));
    out.push_str("<main>");
    render_updates(dashboard, &mut out);
    render_stats(dashboard, &mut out);
    render_news(dashboard, &mut out);
    out.push_str("</main></body></html>");
    Html(out)
}
