//! HTML row-shape selectors
//!
//! `FirstTableBodySelector` reads the first `tbody` of the page and returns
//! every row holding at least one `td`, header-only rows are skipped.

use scraper::{ElementRef, Html, Selector};

use crate::domain::result::{Error, Result};
use crate::ports::RowShapeSelector;

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::structure(format!("Invalid selector '{}': {}", css, e)))
}

/// Text of a cell with every text fragment trimmed and joined
///
/// `<td>HSBC <sup>[1]</sup></td>` yields `HSBC[1]`.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().map(str::trim).filter(|s| !s.is_empty()).collect()
}

#[derive(Debug)]
pub struct FirstTableBodySelector {
    table_body: Selector,
    row: Selector,
    cell: Selector,
}

impl FirstTableBodySelector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            table_body: parse_selector("tbody")?,
            row: parse_selector("tr")?,
            cell: parse_selector("td")?,
        })
    }
}

impl RowShapeSelector for FirstTableBodySelector {
    fn select_rows(&self, document: &Html) -> Result<Vec<Vec<String>>> {
        let body = document
            .select(&self.table_body)
            .next()
            .ok_or_else(|| Error::structure("Document has no table body region"))?;

        let rows = body
            .select(&self.row)
            .filter_map(|row| {
                let cells: Vec<String> = row.select(&self.cell).map(cell_text).collect();
                if cells.is_empty() {
                    None
                } else {
                    Some(cells)
                }
            })
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <table class="wikitable">
            <tbody>
              <tr><th>Rank</th><th>Bank name</th><th>Market cap (US$ billion)</th></tr>
              <tr><td>1</td><td><span class="flag"></span> <a href="/wiki/JPM">JPMorgan Chase</a></td><td>432.92
              </td></tr>
              <tr><td>2</td><td>Bank of America<sup>[1]</sup></td><td> 231.52 </td></tr>
            </tbody>
          </table>
          <table><tbody><tr><td>x</td><td>Other table</td><td>1</td></tr></tbody></table>
        </body></html>
    "#;

    #[test]
    fn test_selects_first_body_data_rows() {
        let document = Html::parse_document(PAGE);
        let rows = FirstTableBodySelector::new().unwrap().select_rows(&document).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["1", "JPMorgan Chase", "432.92"]);
        assert_eq!(rows[1], vec!["2", "Bank of America[1]", "231.52"]);
    }

    #[test]
    fn test_no_table_body_is_structure_error() {
        let document = Html::parse_document("<html><body><p>Page moved</p></body></html>");
        let err = FirstTableBodySelector::new()
            .unwrap()
            .select_rows(&document)
            .unwrap_err();

        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn test_header_only_body_yields_no_rows() {
        let document = Html::parse_document(
            "<table><tbody><tr><th>Rank</th><th>Name</th></tr></tbody></table>",
        );
        let rows = FirstTableBodySelector::new().unwrap().select_rows(&document).unwrap();
        assert!(rows.is_empty());
    }
}
