//! Table detection on positioned page text.
//!
//! Fragments sharing a baseline form a line, read left to right. Fragments
//! closer than a word gap are one cell. A table is a block of at least two
//! consecutive lines that each have at least two cells. The first line of a
//! block is its header, and the header cells' horizontal extents define the
//! columns.

use bankparse_core::{Cell, Row};

use crate::content::Fragment;

const MIN_TABLE_LINES: usize = 2;
const MIN_CELLS_PER_LINE: usize = 2;
/// Baselines closer than this (in points) are the same line.
const LINE_TOLERANCE: f32 = 2.0;
/// Gaps narrower than this fraction of the font size join words into one cell.
const WORD_GAP_EM: f32 = 0.3;

/// Fragments grouped into lines, top of the page first.
fn lines(mut fragments: Vec<Fragment>) -> Vec<Vec<Fragment>> {
    fragments.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<Fragment>> = Vec::new();
    let mut baseline = 0.0f32;
    for fragment in fragments {
        match lines.last_mut() {
            Some(line) if (baseline - fragment.y).abs() <= LINE_TOLERANCE => line.push(fragment),
            _ => {
                baseline = fragment.y;
                lines.push(vec![fragment]);
            }
        }
    }

    lines
        .into_iter()
        .map(|mut line| {
            line.sort_by(|a, b| a.x.total_cmp(&b.x));
            join_words(line)
        })
        .collect()
}

fn join_words(line: Vec<Fragment>) -> Vec<Fragment> {
    let mut cells: Vec<Fragment> = Vec::with_capacity(line.len());
    for fragment in line {
        match cells.last_mut() {
            Some(prev) if fragment.x - prev.end() < prev.size * WORD_GAP_EM => {
                let separator = if prev.text.ends_with(' ') || fragment.text.starts_with(' ') {
                    ""
                } else {
                    " "
                };
                prev.absorb(fragment, separator);
            }
            _ => cells.push(fragment),
        }
    }
    cells
}

/// Every table found on one page, in top-to-bottom order.
///
/// Each table's rows (header included) have exactly the header's width.
/// Whitespace-only cells are absent.
pub fn detect_tables(fragments: Vec<Fragment>) -> Vec<Vec<Row>> {
    let mut tables = Vec::new();
    let mut block: Vec<Vec<Fragment>> = Vec::new();

    for line in lines(fragments) {
        if line.len() >= MIN_CELLS_PER_LINE {
            block.push(line);
        } else {
            flush(&mut block, &mut tables);
        }
    }
    flush(&mut block, &mut tables);

    tables
}

fn flush(block: &mut Vec<Vec<Fragment>>, tables: &mut Vec<Vec<Row>>) {
    if block.len() >= MIN_TABLE_LINES {
        tables.push(align(block));
    }
    block.clear();
}

fn cell(fragment: &Fragment) -> Cell {
    let text = fragment.text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn align(block: &[Vec<Fragment>]) -> Vec<Row> {
    let header = &block[0];
    let mut rows = Vec::with_capacity(block.len());
    rows.push(header.iter().map(cell).collect());

    for line in &block[1..] {
        let mut row: Row = vec![None; header.len()];
        for fragment in line {
            let Some(text) = cell(fragment) else {
                continue;
            };
            match &mut row[column_for(header, fragment)] {
                Some(existing) => {
                    existing.push(' ');
                    existing.push_str(&text);
                }
                slot => *slot = Some(text),
            }
        }
        rows.push(row);
    }

    rows
}

/// Header column with the largest horizontal overlap, else the nearest one.
fn column_for(header: &[Fragment], fragment: &Fragment) -> usize {
    let score = |h: &Fragment| {
        let overlap = h.end().min(fragment.end()) - h.x.max(fragment.x);
        if overlap > 0.0 { (0.0, -overlap) } else { (-overlap, 0.0) }
    };
    header
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let (a, b) = (score(a), score(b));
            a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1))
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f32 = 10.0;

    fn at(x: f32, y: f32, text: &str) -> Fragment {
        Fragment::new(x, y, SIZE, text)
    }

    fn cells(row: &Row) -> Vec<&str> {
        row.iter().map(|c| c.as_deref().unwrap_or("<none>")).collect()
    }

    const COLUMNS: [f32; 5] = [50.0, 130.0, 300.0, 380.0, 460.0];

    fn line(y: f32, texts: [&str; 5]) -> Vec<Fragment> {
        COLUMNS
            .iter()
            .zip(texts)
            .filter(|(_, t)| !t.is_empty())
            .map(|(&x, t)| at(x, y, t))
            .collect()
    }

    #[test]
    fn test_empty_columns_stay_absent() {
        let mut page = vec![at(50.0, 780.0, "Statement of account")];
        page.extend(line(700.0, ["Date", "Description", "Debit Amt", "Credit Amt", "Balance"]));
        page.extend(line(686.0, ["01-08-2024", "Salary Credit", "", "5000.00", "15000.00"]));
        page.extend(line(672.0, ["02-08-2024", "ATM Withdrawal", "200.00", "", "14800.00"]));
        page.push(at(280.0, 40.0, "Page 1 of 1"));

        let tables = detect_tables(page);
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.len(), 3);
        assert_eq!(
            cells(&table[0]),
            vec!["Date", "Description", "Debit Amt", "Credit Amt", "Balance"]
        );
        assert_eq!(
            cells(&table[1]),
            vec!["01-08-2024", "Salary Credit", "<none>", "5000.00", "15000.00"]
        );
        assert_eq!(
            cells(&table[2]),
            vec!["02-08-2024", "ATM Withdrawal", "200.00", "<none>", "14800.00"]
        );
    }

    #[test]
    fn test_content_order_does_not_matter() {
        // Drawn column by column, bottom row first.
        let page = vec![
            at(130.0, 686.0, "ATM"),
            at(130.0, 700.0, "Description"),
            at(50.0, 686.0, "02-08-2024"),
            at(50.0, 700.0, "Date"),
        ];
        let tables = detect_tables(page);
        assert_eq!(cells(&tables[0][0]), vec!["Date", "Description"]);
        assert_eq!(cells(&tables[0][1]), vec!["02-08-2024", "ATM"]);
    }

    #[test]
    fn test_words_and_near_baselines_join() {
        let page = vec![
            at(50.0, 700.0, "Date"),
            at(130.0, 700.0, "Description"),
            at(50.0, 686.0, "01-08-2024"),
            at(130.0, 686.5, "NEFT"),
            at(152.0, 686.0, "ACME"),
            at(174.0, 685.0, "LTD"),
        ];
        let tables = detect_tables(page);
        assert_eq!(cells(&tables[0][1]), vec!["01-08-2024", "NEFT ACME LTD"]);
    }

    #[test]
    fn test_wide_amount_goes_to_overlapping_column() {
        // Right-aligned amount starting left of its header.
        let page = vec![
            at(50.0, 700.0, "Date"),
            at(200.0, 700.0, "Balance"),
            at(50.0, 686.0, "01-08-2024"),
            at(190.0, 686.0, "1,15,000.00"),
        ];
        let tables = detect_tables(page);
        assert_eq!(cells(&tables[0][1]), vec!["01-08-2024", "1,15,000.00"]);
    }

    #[test]
    fn test_whitespace_cells_are_absent() {
        let mut page = line(700.0, ["Date", "Description", "Debit Amt", "Credit Amt", "Balance"]);
        page.extend(line(686.0, [" ", " ", " ", " ", " "]));
        let tables = detect_tables(page);
        assert_eq!(tables[0][1], vec![None; 5]);
    }

    #[test]
    fn test_single_cell_line_separates_tables() {
        let page = vec![
            at(50.0, 700.0, "A"),
            at(130.0, 700.0, "B"),
            at(50.0, 686.0, "1"),
            at(130.0, 686.0, "2"),
            at(50.0, 660.0, "Closing summary"),
            at(50.0, 640.0, "C"),
            at(130.0, 640.0, "D"),
            at(50.0, 626.0, "3"),
            at(130.0, 626.0, "4"),
        ];
        let tables = detect_tables(page);
        assert_eq!(tables.len(), 2);
        assert_eq!(cells(&tables[1][0]), vec!["C", "D"]);
    }

    #[test]
    fn test_lone_line_is_not_a_table() {
        let page = vec![at(50.0, 700.0, "Account No"), at(200.0, 700.0, "1234")];
        assert!(detect_tables(page).is_empty());
        assert!(detect_tables(Vec::new()).is_empty());
    }
}
