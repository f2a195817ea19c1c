use std::io::{self, Write};

use crate::utils::format_timestamp;

use super::planner::RestorePlan;

const HEADERS: [&str; 3] = ["object", "version", "timestamp"];

/// Writes the version in effect for every planned key as a fixed-width table.
///
/// Skipped and restorable keys are both listed; keys absent from the plan
/// are not.
pub fn render<W: Write>(out: &mut W, plan: &RestorePlan) -> io::Result<()> {
    let rows: Vec<[String; 3]> = plan
        .entries()
        .iter()
        .map(|entry| {
            [
                entry.in_effect.key.clone(),
                entry.in_effect.version_id.clone(),
                format_timestamp(&entry.in_effect.last_modified),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &widths, &HEADERS)?;
    for row in &rows {
        write_row(out, &widths, row)?;
    }
    Ok(())
}

fn write_row<W: Write, S: AsRef<str>>(out: &mut W, widths: &[usize; 3], cells: &[S; 3]) -> io::Result<()> {
    writeln!(
        out,
        "{:<w0$}  {:<w1$}  {}",
        cells[0].as_ref(),
        cells[1].as_ref(),
        cells[2].as_ref(),
        w0 = widths[0],
        w1 = widths[1],
    )
}
