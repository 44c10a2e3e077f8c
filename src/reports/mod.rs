use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use gridforge::api::{OptimizationReport, RankedLayout};
use gridforge::optimizer::GenerationStats;

/// Renders one layout as a grid, one table row per keyboard row.
pub fn layout_table(rows: &[Vec<String>]) -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    for row in rows {
        let cells: Vec<Cell> = row
            .iter()
            .map(|name| {
                let label = if name.is_empty() { " " } else { name.as_str() };
                Cell::new(label).set_alignment(CellAlignment::Center)
            })
            .collect();
        table.add_row(cells);
    }
    table
}

pub fn print_layout_grid(title: &str, layout: &RankedLayout) {
    println!("\n{} (fitness {:.6})", title, layout.fitness);
    println!("{}", layout_table(&layout.rows));
}

pub fn logbook_table(logbook: &[GenerationStats]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Gen").add_attribute(Attribute::Bold),
        Cell::new("Evals"),
        Cell::new("Min").fg(Color::Green),
        Cell::new("Mean"),
        Cell::new("Max").fg(Color::Red),
    ]);

    for i in 0..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for s in logbook {
        table.add_row(vec![
            Cell::new(s.generation),
            Cell::new(s.evaluations),
            Cell::new(format!("{:.5}", s.min)).fg(Color::Green),
            Cell::new(format!("{:.5}", s.mean)),
            Cell::new(format!("{:.5}", s.max)).fg(Color::Red),
        ]);
    }
    table
}

pub fn print_optimization_report(report: &OptimizationReport) {
    println!("\n=== {} ===", report.layout_name);
    println!("{}", logbook_table(&report.logbook));

    if report.hall_of_fame.len() > 1 {
        for (rank, layout) in report.hall_of_fame.iter().enumerate() {
            print_layout_grid(&format!("#{}", rank + 1), layout);
        }
    } else {
        print_layout_grid("Best layout", &report.best);
    }
}
