//! Extract service - fetch the source page and pull out (name, value) rows

use std::sync::Arc;

use scraper::Html;
use serde::Serialize;

use crate::adapters::FirstTableBodySelector;
use crate::domain::result::{Error, Result};
use crate::domain::RawRow;
use crate::ports::{DocumentSource, RowShapeSelector};

/// Which cell of a selected row holds the name and which holds the value
///
/// The default skips the leading logo cell: name at 1, value at 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLayout {
    pub name_index: usize,
    pub value_index: usize,
}

impl Default for CellLayout {
    fn default() -> Self {
        Self {
            name_index: 1,
            value_index: 2,
        }
    }
}

impl CellLayout {
    fn min_cells(&self) -> usize {
        self.name_index.max(self.value_index) + 1
    }
}

/// Rows as extracted, labelled with the caller's expected columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Extract service for the source table
pub struct ExtractService {
    source: Arc<dyn DocumentSource>,
    selector: Box<dyn RowShapeSelector>,
    layout: CellLayout,
}

impl ExtractService {
    /// Extractor reading the first table body with the default cell layout
    pub fn new(source: Arc<dyn DocumentSource>) -> Result<Self> {
        Ok(Self::with_selector(
            source,
            Box::new(FirstTableBodySelector::new()?),
            CellLayout::default(),
        ))
    }

    pub fn with_selector(
        source: Arc<dyn DocumentSource>,
        selector: Box<dyn RowShapeSelector>,
        layout: CellLayout,
    ) -> Self {
        Self {
            source,
            selector,
            layout,
        }
    }

    /// Fetch `location` once and extract its rows in document order
    ///
    /// `expected_columns` only labels the result, it is not checked against
    /// the page.
    pub fn extract(&self, location: &str, expected_columns: &[String]) -> Result<ExtractedTable> {
        let html = self.source.fetch(location)?;
        Ok(ExtractedTable {
            columns: expected_columns.to_vec(),
            rows: self.extract_from_html(&html)?,
        })
    }

    /// Extract rows from an already fetched document
    pub fn extract_from_html(&self, html: &str) -> Result<Vec<RawRow>> {
        let document = Html::parse_document(html);
        let rows = self.selector.select_rows(&document)?;

        let min_cells = self.layout.min_cells();
        rows.into_iter()
            .enumerate()
            .map(|(i, cells)| {
                let rank = i + 1;
                if cells.len() < min_cells {
                    return Err(Error::structure(format!(
                        "Row {} has {} cell(s), expected at least {}",
                        rank,
                        cells.len(),
                        min_cells
                    )));
                }
                Ok(RawRow::new(
                    rank,
                    cells[self.layout.name_index].clone(),
                    cells[self.layout.value_index].clone(),
                ))
            })
            .collect()
    }
}
