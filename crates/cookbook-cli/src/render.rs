//! Text and JSON output for one browser frame.

use std::io::{self, Write};

use cookbook_core::{
    any_category_hint, badge_label, duration_display, health_display, health_sort_label,
    hps_display, ingredient_summary, BrowserState, BrowserView, CatalogStats, GroupRow,
    ImageTable, SortDirection, SortField, SortSpec,
};
use serde::Serialize;

/// Column gap in the results table.
const GAP: &str = "  ";

/// Machine-readable output of one run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport<'a> {
    /// Catalog statistics.
    pub stats: CatalogStats,
    /// State the view was built from.
    pub state: &'a BrowserState,
    /// The view.
    pub view: &'a BrowserView<'a>,
}

/// Writes `report` as pretty JSON.
pub fn write_json<W: Write>(out: &mut W, report: &JsonReport<'_>) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

fn header(label: &str, field: SortField, sort: SortSpec) -> String {
    if sort.field != field {
        return label.to_string();
    }

    let ascending = match field {
        SortField::Health => sort.health_mode.is_ascending(),
        _ => sort.direction == SortDirection::Asc,
    };
    format!("{label} {}", if ascending { "^" } else { "v" })
}

fn row_cells(row: &GroupRow<'_>) -> Vec<String> {
    let recipe = row.group.primary_recipe();
    let name = if row.group.total_variations() > 1 {
        let marker = if row.expanded { "-" } else { "+" };
        format!("{marker} {}", row.group.name())
    } else {
        row.group.name().to_string()
    };

    vec![
        name,
        badge_label(&recipe.category).to_string(),
        health_display(recipe),
        duration_display(recipe.effective_duration()),
        hps_display(recipe),
        row.group.total_variations().to_string(),
        ingredient_summary(&recipe.ingredients),
    ]
}

fn write_line<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let last = cells.len().saturating_sub(1);
    let mut line = String::new();
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            line.push_str(cell);
        } else {
            line.push_str(&format!("{cell:<width$}{GAP}"));
        }
    }
    writeln!(out, "{}", line.trim_end())
}

/// Writes the results table with its pagination footer.
pub fn write_table<W: Write>(out: &mut W, view: &BrowserView<'_>, sort: SortSpec) -> io::Result<()> {
    if view.rows.is_empty() {
        writeln!(out, "No recipes match the current filters.")?;
        return Ok(());
    }

    let headers = vec![
        header("Name", SortField::Name, sort),
        header("Type", SortField::Type, sort),
        header(health_sort_label(sort.health_mode), SortField::Health, sort),
        header("Duration", SortField::Duration, sort),
        header("HP/s", SortField::Hps, sort),
        header("Variations", SortField::Difficulty, sort),
        "Ingredients".to_string(),
    ];
    let rows: Vec<Vec<String>> = view.rows.iter().map(row_cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_line(out, &headers, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(out, &rule, &widths)?;

    for (row, cells) in view.rows.iter().zip(&rows) {
        write_line(out, cells, &widths)?;
        if row.expanded {
            for recipe in row.group.recipes() {
                let amount = if recipe.output_amount > 1 {
                    format!(" (makes {})", recipe.output_amount)
                } else {
                    String::new()
                };
                writeln!(
                    out,
                    "    {}: {}{amount}",
                    recipe.id,
                    ingredient_summary(&recipe.ingredients)
                )?;
            }
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "Page {} of {} ({} items)",
        view.page, view.total_pages, view.total_results
    )
}

/// Writes the ingredient and effect quick filters.
pub fn write_vocabulary<W: Write>(
    out: &mut W,
    view: &BrowserView<'_>,
    images: &ImageTable,
) -> io::Result<()> {
    writeln!(
        out,
        "Ingredients ({} compatible):",
        view.compatible_ingredients
    )?;
    for option in &view.ingredient_options {
        let check = if option.active { "x" } else { " " };
        let mut line = format!(
            "  [{check}] {} ({}) -> {}",
            option.name, option.count, option.projected_count
        );
        if let Some(hint) = any_category_hint(images, &option.name) {
            line.push_str(&format!("  {hint}"));
        }
        writeln!(out, "{line}")?;
    }

    writeln!(out, "Effects:")?;
    for option in &view.effect_options {
        let check = if option.active { "x" } else { " " };
        writeln!(out, "  [{check}] {} ({})", option.name, option.count)?;
    }
    Ok(())
}
