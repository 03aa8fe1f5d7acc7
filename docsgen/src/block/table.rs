use crate::block::Node;
use crate::parser::error::DocsGenError;

/// Separator line that starts the next table of a multi-table block.
pub const TABLE_SEPARATOR: &str = "---";

/// One rendered table of a Table block: the header set it uses and its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Node {
    /// Split a Table node's body into tables.
    ///
    /// Each `---` line advances to the next header set. A row is split on `=`
    /// into as many cells as its header set has columns; the last cell keeps
    /// any remaining `=`. Returns `None` for nodes that are not tables.
    pub fn tables(&self) -> Option<Result<Vec<Table>, DocsGenError>> {
        let header_sets = self.header_sets()?;
        Some(split_tables(&self.title, header_sets, &self.body))
    }
}

fn split_tables(
    title: &str,
    header_sets: &[Vec<String>],
    body: &[String],
) -> Result<Vec<Table>, DocsGenError> {
    let mut tables: Vec<Table> = Vec::new();
    let mut set_index = 0;
    let mut rows: Vec<Vec<String>> = Vec::new();

    for line in body {
        if line.trim() == TABLE_SEPARATOR {
            if !rows.is_empty() {
                tables.push(Table {
                    headers: header_sets[set_index].clone(),
                    rows: std::mem::take(&mut rows),
                });
            }
            set_index += 1;
            continue;
        }

        let Some(headers) = header_sets.get(set_index) else {
            return Err(DocsGenError::TooManyTables(title.to_string()));
        };
        let cells: Vec<String> = line
            .splitn(headers.len(), '=')
            .map(|cell| cell.trim().to_string())
            .collect();
        if cells.len() != headers.len() {
            return Err(DocsGenError::TooFewCells(title.to_string()));
        }
        rows.push(cells);
    }

    if !rows.is_empty() {
        tables.push(Table {
            headers: header_sets[set_index].clone(),
            rows,
        });
    }
    Ok(tables)
}
