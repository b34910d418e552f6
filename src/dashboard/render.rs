//! HTML rendering of a [`DashboardPage`].

use crate::dashboard::page::DashboardPage;
use crate::types::forecast_frame::FORECAST_COLUMNS;
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
table{border-collapse:collapse}th,td{border:1px solid #ccc;padding:.3rem .6rem;text-align:right}\
th{background:#f3f3f3}.error{background:#fde8e8;color:#8a1c1c;padding:.6rem;border-radius:4px}\
.meta{color:#666;font-size:.9em}";

/// Renders the page as a standalone HTML document.
pub fn render_html(page: &DashboardPage) -> String {
    let mut html = String::with_capacity(4096);
    let title = escape(&page.title);

    // Writing into a String cannot fail
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"pt\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n"
    );

    for notice in &page.notices {
        let _ = writeln!(html, "<p class=\"error\">{}</p>", escape(&notice.message));
    }

    if let Some(rows) = &page.preview {
        html.push_str("<h2>Dados Coletados:</h2>\n<table>\n<thead><tr>");
        for column in FORECAST_COLUMNS {
            let _ = write!(html, "<th>{column}</th>");
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in rows {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{}</td><td>{:.2}</td></tr>",
                escape(&row.timestamp),
                row.temp_max,
                row.temp_min,
                row.humidity,
                row.wind_speed
            );
        }
        html.push_str("</tbody>\n</table>\n");
    }

    if let Some(predictions) = &page.predictions {
        html.push_str("<h2>Previsões para os Próximos Dias:</h2>\n");
        for prediction in predictions {
            let _ = writeln!(html, "<p>{}</p>", escape(&prediction.to_string()));
        }
        if let Some(mae) = page.training_mae {
            let _ = writeln!(
                html,
                "<p class=\"meta\">Erro absoluto médio nos dados de treino: {mae:.2}°C</p>"
            );
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
