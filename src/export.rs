//! Tabular rendering of a generated group.
//!
//! One row per NPC and one column per visible output category. Traits sharing
//! a cell are joined with the configured delimiter; hidden traits are left out.

use crate::generation::{Npc, NpcGroup};

/// Cells for one NPC, in visible category order
pub fn row_cells(npc: &Npc, columns: &[&str], delimiter: &str) -> Vec<String> {
    columns
        .iter()
        .map(|column| npc.visible_trait_names_of(column).join(delimiter))
        .collect()
}

/// Render the group as CSV with a header row
pub fn to_csv(group: &NpcGroup, delimiter: &str) -> String {
    let columns = group.visible_category_order();
    let mut out = String::new();
    push_line(&mut out, columns.iter().map(|c| c.to_string()));
    for npc in group {
        push_line(&mut out, row_cells(npc, &columns, delimiter).into_iter());
    }
    out
}

fn push_line(out: &mut String, cells: impl Iterator<Item = String>) {
    let line: Vec<String> = cells.map(|cell| escape(&cell)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
