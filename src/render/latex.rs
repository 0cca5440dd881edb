//! LaTeX `tabular` output.

use super::types::Tabular;

/// Renders [`Tabular`] sources as a LaTeX `table` environment.
///
/// Labels are bold with underscores escaped; cells are set in math mode.
/// Absent cells are left empty. The output has no trailing newline.
///
/// ```
/// use u_metalab::render::TableRenderer;
/// use u_metalab::table::Table;
///
/// let mut table = Table::new();
/// table.insert("ZDT1", 0, "NSGAII", 0.5);
///
/// let tex = TableRenderer::render(&table.median_by_problem(), "HV", "tab:hv", "c");
/// assert!(tex.contains("\\textbf{ZDT1} & $5.00e-1$ \\\\"));
/// assert!(tex.ends_with("\\end{table}"));
/// ```
pub struct TableRenderer;

impl TableRenderer {
    /// Default label when none is chosen.
    pub const DEFAULT_LABEL: &'static str = "tab:exp";

    /// Default column alignment.
    pub const DEFAULT_ALIGNMENT: &'static str = "c";

    /// Renders `table` with the given caption, label, and alignment
    /// specifier (`c`, `l`, `r`, ...).
    pub fn render<T: Tabular + ?Sized>(
        table: &T,
        caption: &str,
        label: &str,
        alignment: &str,
    ) -> String {
        let columns = table.column_labels();
        let header: Vec<String> = columns
            .iter()
            .map(|c| format!("\\textbf{{{}}}", escape(c)))
            .collect();

        let mut out = String::new();
        out.push_str("\\begin{table}\n");
        out.push_str(&format!("\\caption{{{caption}}}\n"));
        out.push_str(&format!("\\label{{{label}}}\n"));
        out.push_str("\\centering\n");
        out.push_str("\\begin{scriptsize}\n");
        out.push_str(&format!(
            "\\begin{{tabular}}{{{alignment}|{}}}\n",
            alignment.repeat(columns.len())
        ));
        out.push_str("\\hline\n");
        out.push_str(&format!("& {} \\\\\\hline\n", header.join(" & ")));

        for (row, cells) in table.rows() {
            let cells: Vec<String> = cells
                .into_iter()
                .map(|c| c.map(|v| format!("${v}$")).unwrap_or_default())
                .collect();
            out.push_str(&format!(
                "\\textbf{{{}}} & {} \\\\\n",
                escape(&row),
                cells.join(" & ")
            ));
        }

        out.push_str("\\hline\n");
        out.push_str("\\end{tabular}\n");
        out.push_str("\\end{scriptsize}\n");
        out.push_str("\\end{table}");
        out
    }

    /// [`render`](Self::render) with the default label and alignment.
    pub fn render_default<T: Tabular + ?Sized>(table: &T, caption: &str) -> String {
        Self::render(table, caption, Self::DEFAULT_LABEL, Self::DEFAULT_ALIGNMENT)
    }
}

fn escape(text: &str) -> String {
    text.replace('_', "\\_")
}
