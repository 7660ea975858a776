//! HTML rendering of a [`ReportDocument`].
//!
//! Output is a single self-contained page with inline CSS. The `@page` rule
//! carries size and orientation so an HTML-to-PDF engine lays it out on the
//! requested paper.

use crate::document::{Block, Cell, PageSetup, ReportDocument, Section, Stat, Table};

pub fn render_html(doc: &ReportDocument) -> String {
    let sections: String = doc.sections.iter().map(render_section).collect();
    let subtitle = doc
        .subtitle
        .as_deref()
        .map(|s| format!(r#"<p class="subtitle">{}</p>"#, html_escape(s)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{page_css}{css}</style>
</head>
<body>
    <header>
        <div class="org">{org}</div>
        <h1>{title}</h1>
        {subtitle}
        <div class="meta">Generated {generated}</div>
    </header>
    {sections}
    <footer>{org} &middot; Confidential performance report &middot; {generated}</footer>
</body>
</html>"#,
        title = html_escape(&doc.title),
        org = html_escape(&doc.organization),
        subtitle = subtitle,
        generated = doc.generated_at.format("%B %d, %Y %H:%M UTC"),
        page_css = page_css(doc.page),
        css = inline_css(),
        sections = sections,
    )
}

fn page_css(page: PageSetup) -> String {
    format!(
        "\n@page {{ size: {} {}; margin: 18mm 15mm; }}\n",
        page.size.css_name(),
        page.orientation.css_name()
    )
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; }
body { font-family: 'DejaVu Sans', Arial, sans-serif; font-size: 11px; color: #1f2937; margin: 0; }
header { border-bottom: 3px solid #b91c1c; padding-bottom: 10px; margin-bottom: 18px; }
header .org { color: #b91c1c; font-weight: 700; text-transform: uppercase; letter-spacing: 1px; font-size: 10px; }
header h1 { font-size: 22px; margin: 4px 0; }
header .subtitle { margin: 0; color: #374151; font-size: 13px; }
header .meta { color: #6b7280; font-size: 10px; margin-top: 4px; }
section { margin-bottom: 18px; page-break-inside: avoid; }
section h2 { font-size: 15px; border-bottom: 1px solid #e5e7eb; padding-bottom: 4px; margin: 0 0 8px 0; }
p { line-height: 1.5; margin: 0 0 8px 0; }
.stats { width: 100%; border-collapse: separate; border-spacing: 6px; margin: 0 -6px 8px -6px; }
.stats td { background: #f9fafb; border-left: 4px solid #9ca3af; padding: 8px; width: 25%; }
.stats .label { color: #6b7280; font-size: 9px; text-transform: uppercase; }
.stats .value { font-size: 17px; font-weight: 700; }
table.data { width: 100%; border-collapse: collapse; margin-bottom: 8px; }
table.data th { background: #1f2937; color: #ffffff; text-align: left; padding: 5px 6px; font-size: 10px; }
table.data td { border-bottom: 1px solid #e5e7eb; padding: 5px 6px; }
table.data tr:nth-child(even) td { background: #f9fafb; }
ul { margin: 0 0 8px 0; padding-left: 18px; }
li { margin-bottom: 4px; line-height: 1.4; }
.notice { border: 1px dashed #9ca3af; background: #f3f4f6; padding: 10px; margin-bottom: 8px; }
.notice strong { display: block; margin-bottom: 4px; }
.tone-excellent { color: #047857; font-weight: 700; }
.tone-good { color: #1d4ed8; font-weight: 700; }
.tone-fair { color: #b45309; font-weight: 700; }
.tone-poor { color: #b91c1c; font-weight: 700; }
.stats td.tone-excellent { border-left-color: #047857; }
.stats td.tone-good { border-left-color: #1d4ed8; }
.stats td.tone-fair { border-left-color: #b45309; }
.stats td.tone-poor { border-left-color: #b91c1c; }
footer { border-top: 1px solid #e5e7eb; color: #9ca3af; font-size: 9px; padding-top: 6px; margin-top: 24px; }
"#
}

fn render_section(section: &Section) -> String {
    let body: String = section.blocks.iter().map(render_block).collect();
    format!(
        "<section>\n<h2>{}</h2>\n{}</section>\n",
        html_escape(&section.heading),
        body
    )
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Paragraph(text) => format!("<p>{}</p>\n", html_escape(text)),
        Block::Stats(stats) => render_stats(stats),
        Block::Table(table) => render_table(table),
        Block::Bullets(items) => {
            let lis: String = items
                .iter()
                .map(|i| format!("<li>{}</li>", html_escape(i)))
                .collect();
            format!("<ul>{lis}</ul>\n")
        }
        Block::Notice { title, body } => format!(
            "<div class=\"notice\"><strong>{}</strong>{}</div>\n",
            html_escape(title),
            html_escape(body)
        ),
    }
}

fn render_stats(stats: &[Stat]) -> String {
    // four per row
    let rows: String = stats
        .chunks(4)
        .map(|chunk| {
            let cells: String = chunk
                .iter()
                .map(|s| {
                    format!(
                        r#"<td class="{tone}"><div class="label">{label}</div><div class="value {tone}">{value}</div></td>"#,
                        tone = s.tone.css_class(),
                        label = html_escape(&s.label),
                        value = html_escape(&s.value),
                    )
                })
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();
    format!("<table class=\"stats\">{rows}</table>\n")
}

fn render_table(table: &Table) -> String {
    let head: String = table
        .headers
        .iter()
        .map(|h| format!("<th>{}</th>", html_escape(h)))
        .collect();
    let body: String = table
        .rows
        .iter()
        .map(|row| {
            let cells: String = row.iter().map(render_cell).collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();
    format!("<table class=\"data\"><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table>\n")
}

fn render_cell(cell: &Cell) -> String {
    format!(
        r#"<td class="{}">{}</td>"#,
        cell.tone.css_class(),
        html_escape(&cell.text)
    )
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
