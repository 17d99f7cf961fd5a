// CSV loading for the pie chart explorer
use crate::domain::pie::{DataTable, PieError};
use std::io::ErrorKind;
use std::path::Path;

pub async fn load_table(path: &Path) -> Result<DataTable, PieError> {
    let display = path.display().to_string();
    let contents = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(PieError::NotFound(display)),
        Err(e) => {
            return Err(PieError::Read {
                path: display,
                reason: e.to_string(),
            });
        }
    };

    parse_table(&contents).map_err(|e| PieError::Read {
        path: display,
        reason: e.to_string(),
    })
}

pub fn parse_table(contents: &[u8]) -> Result<DataTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents);

    let columns = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;

    Ok(DataTable::new(columns, rows))
}
