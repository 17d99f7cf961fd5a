// Pie service - CSV explorer use case
use crate::domain::pie::{PieChart, PieError, PiePage};
use crate::infrastructure::csv_table::load_table;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PieService {
    csv_path: PathBuf,
    default_title: String,
}

impl PieService {
    pub fn new(csv_path: PathBuf, default_title: String) -> Self {
        Self {
            csv_path,
            default_title,
        }
    }

    /// The file is re-read on every call so edits show up without a restart.
    pub async fn render(
        &self,
        title: Option<String>,
        category: Option<&str>,
        value: Option<&str>,
    ) -> Result<PiePage, PieError> {
        let table = load_table(&self.csv_path).await?;
        let (category_idx, value_idx) = table.resolve_columns(category, value)?;
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.default_title.clone());

        let chart = PieChart::from_table(&table, title, category_idx, value_idx)?;
        tracing::debug!(
            "Pie chart over {} rows: {} slices",
            table.rows.len(),
            chart.slices.len()
        );

        Ok(PiePage {
            csv_path: self.csv_path.display().to_string(),
            preview: table,
            chart,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "category,value\nRent,1200\nFood,400\nRent,100\n").unwrap();
        file
    }

    #[tokio::test]
    async fn test_render_with_defaults() {
        let file = csv_file();
        let service = PieService::new(file.path().to_path_buf(), "My Sample Pie Chart".into());

        let page = service.render(None, None, None).await.unwrap();

        assert_eq!(page.chart.title, "My Sample Pie Chart");
        assert_eq!(page.preview.rows.len(), 3);
        assert_eq!(page.chart.slices.len(), 2);
        assert_eq!(page.chart.slices[0].value, 1300.0);
    }

    #[tokio::test]
    async fn test_blank_title_falls_back_to_default() {
        let file = csv_file();
        let service = PieService::new(file.path().to_path_buf(), "Default".into());

        let page = service.render(Some("  ".into()), Some("category"), Some("value")).await.unwrap();
        assert_eq!(page.chart.title, "Default");
    }

    #[tokio::test]
    async fn test_unknown_column() {
        let file = csv_file();
        let service = PieService::new(file.path().to_path_buf(), "t".into());

        let err = service.render(None, Some("nope"), None).await.unwrap_err();
        assert!(matches!(err, PieError::UnknownColumn(_)));
    }
}
