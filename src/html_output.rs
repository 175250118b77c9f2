//! HTML report rendering with a client-side sortable, paginated table
//!
//! Produces a single static document with embedded CSS and script; no
//! external assets. Rows arrive pre-sorted by total time descending.

use crate::report::ReportRow;

/// HTML report document builder
#[derive(Debug)]
pub struct HtmlReport {
    rows: Vec<ReportRow>,
    wall_micros: Option<u64>,
}

impl HtmlReport {
    pub fn new(rows: Vec<ReportRow>, wall_micros: Option<u64>) -> Self {
        Self { rows, wall_micros }
    }

    /// Escape HTML special characters to prevent injection via source text
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 12px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
            cursor: pointer;
            user-select: none;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        tr:hover {
            background-color: #f0f0f0;
        }
        .line {
            color: #0066cc;
            font-weight: bold;
            font-family: monospace;
        }
        .num {
            font-family: monospace;
            text-align: right;
        }
        .src {
            font-family: monospace;
            font-size: 0.9em;
            color: #555;
        }
        .pager button {
            margin-right: 6px;
            padding: 4px 10px;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    /// Embedded script: header-click sorting and simple pagination
    fn generate_script() -> &'static str {
        r#"
        var PAGE_SIZE = 20;
        var page = 0;
        var tbody = document.getElementById('rows');
        var allRows = Array.prototype.slice.call(tbody.rows);

        function renderPage() {
            var start = page * PAGE_SIZE;
            allRows.forEach(function (row, i) {
                row.style.display = (i >= start && i < start + PAGE_SIZE) ? '' : 'none';
            });
            document.getElementById('page-label').textContent =
                'Page ' + (page + 1) + ' / ' + Math.max(1, Math.ceil(allRows.length / PAGE_SIZE));
        }

        function sortBy(col, numeric) {
            allRows.sort(function (a, b) {
                var x = a.cells[col].textContent, y = b.cells[col].textContent;
                if (numeric) { return parseFloat(y) - parseFloat(x); }
                return x < y ? -1 : x > y ? 1 : 0;
            });
            allRows.forEach(function (row) { tbody.appendChild(row); });
            page = 0;
            renderPage();
        }

        Array.prototype.forEach.call(document.querySelectorAll('th'), function (th, col) {
            th.addEventListener('click', function () {
                sortBy(col, th.dataset.numeric === '1');
            });
        });
        document.getElementById('prev').addEventListener('click', function () {
            if (page > 0) { page -= 1; renderPage(); }
        });
        document.getElementById('next').addEventListener('click', function () {
            if ((page + 1) * PAGE_SIZE < allRows.length) { page += 1; renderPage(); }
        });
        renderPage();
        "#
    }

    /// Format one report row as a table row
    fn format_row(row: &ReportRow) -> String {
        format!(
            r#"<tr><td class="line">{}</td><td class="num">{}</td><td class="num">{:.4}</td><td class="num">{:.4}</td><td class="src">{}</td></tr>"#,
            Self::escape_html(&row.identity),
            row.hit_count,
            row.total_ms,
            row.avg_ms,
            Self::escape_html(&row.source_text)
        )
    }

    /// Generate the complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");
        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("    <title>Lineprof Report</title>\n");
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str("    <h1>Line Profile Report</h1>\n");
        if let Some(wall) = self.wall_micros {
            html.push_str(&format!(
                "    <p>Session wall time: {:.4} ms &middot; {} rows</p>\n",
                wall as f64 / 1000.0,
                self.rows.len()
            ));
        }

        html.push_str("    <table>\n");
        html.push_str("        <thead><tr><th>Line</th><th data-numeric=\"1\">Hits</th><th data-numeric=\"1\">Total (ms)</th><th data-numeric=\"1\">Avg (ms)</th><th>Source</th></tr></thead>\n");
        html.push_str("        <tbody id=\"rows\">\n");
        for row in &self.rows {
            html.push_str("        ");
            html.push_str(&Self::format_row(row));
            html.push('\n');
        }
        html.push_str("        </tbody>\n");
        html.push_str("    </table>\n");

        html.push_str("    <div class=\"pager\">\n");
        html.push_str("        <button id=\"prev\">Prev</button><button id=\"next\">Next</button>\n");
        html.push_str("        <span id=\"page-label\"></span>\n");
        html.push_str("    </div>\n");

        html.push_str("    <script>");
        html.push_str(Self::generate_script());
        html.push_str("</script>\n");

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by Lineprof - Line-Level Execution Profiler\n");
        html.push_str("    </div>\n");
        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}
