//! Terminal formatting.
//!
//! Formatting lives in one place so the core stays free of presentation and
//! output changes are localized.

use crate::app::pipeline::{EdgeSummary, RunOutput};
use crate::domain::PointTable;

/// Zero-indexed field listing (geometry excluded), as used by the prompts.
pub fn format_field_table(table: &PointTable) -> String {
    let width = table
        .fields
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(10);

    let mut out = String::new();
    out.push_str(&format!("{:>3}  {:<width$}  {}\n", "No", "Field", "Type"));
    out.push_str(&format!("{:-<w$}\n", "", w = width + 15));
    for (idx, field) in table.fields.iter().enumerate() {
        out.push_str(&format!(
            "{idx:>3}  {:<width$}  {}\n",
            field.name,
            field.kind.display_name()
        ));
    }
    out
}

/// Summary of a completed run.
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== interpoint - surface between two edges ===\n");
    out.push_str(&format!(
        "CRS: {}\n",
        run.grid
            .crs()
            .map(|c| c.identifier())
            .unwrap_or_else(|| "undefined".to_string())
    ));
    out.push_str(&format_edge("Edge 1", &run.edge1));
    out.push_str(&format_edge("Edge 2", &run.edge2));

    out.push_str(&format!(
        "Pitch: {} -> {} longitudinal rows\n",
        run.pitch,
        run.grid.rows()
    ));
    out.push_str(&format!(
        "Transverse divisions: {} -> {} columns\n",
        run.grid.i_div(),
        run.grid.columns()
    ));

    let (z_min, z_max) = run
        .grid
        .records()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r.z), hi.max(r.z)));
    out.push_str(&format!(
        "Grid nodes: {} | z=[{z_min:.3}, {z_max:.3}]\n",
        run.grid.records().len()
    ));

    out.push_str(&format!("Output: {}\n", run.output.display()));
    if let Some(csv) = &run.export_csv {
        out.push_str(&format!("CSV: {}\n", csv.display()));
    }

    out
}

fn format_edge(label: &str, edge: &EdgeSummary) -> String {
    format!(
        "{label}: {} | m=`{}` z=`{}` | {} points | m=[{:.3}, {:.3}]\n",
        edge.path.display(),
        edge.field_m,
        edge.field_z,
        edge.input_points,
        edge.m_min,
        edge.m_max
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::parse_point_table;

    #[test]
    fn field_table_lists_zero_indexed_fields() {
        let table = parse_point_table(
            r#"{ "type": "FeatureCollection", "features": [
                { "type": "Feature", "properties": { "kyori": 0, "z": 1.5, "memo": "a" },
                  "geometry": { "type": "Point", "coordinates": [0, 0] } } ] }"#,
        )
        .unwrap();

        let text = format_field_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Field"));
        assert!(lines[2].trim_start().starts_with("0  kyori"));
        assert!(lines[2].ends_with("int64"));
        assert!(lines[3].ends_with("float64"));
        assert!(lines[4].ends_with("object"));
    }
}
