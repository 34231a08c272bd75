//! CSV rendering of report sheets.

use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use locker_core::report::Sheet;

/// Renders a sheet as CSV: header row, then data rows.
pub fn to_csv(sheet: &Sheet) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(&sheet.header)?;
    for row in &sheet.rows {
        writer.write_record(row)?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

/// A downloadable CSV attachment named after the sheet.
pub fn csv_response(sheet: &Sheet) -> Result<Response, ApiError> {
    let body = to_csv(sheet).map_err(|e| {
        tracing::error!("CSV export failed: {}", e);
        ApiError::internal("Export failed")
    })?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", sheet.file_name()),
        ),
    ];

    Ok((headers, body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_csv_quotes_commas() {
        let sheet = Sheet {
            title: "Inventory".to_string(),
            header: vec!["Product Name".to_string(), "Stock".to_string()],
            rows: vec![
                vec!["Jersey, Home".to_string(), "10".to_string()],
                vec!["Kit".to_string(), "0".to_string()],
            ],
        };

        let text = String::from_utf8(to_csv(&sheet).unwrap()).unwrap();
        assert_eq!(text, "Product Name,Stock\n\"Jersey, Home\",10\nKit,0\n");
    }

    #[test]
    fn test_csv_response_headers() {
        let sheet = Sheet {
            title: "Sales History".to_string(),
            header: vec!["Product Name".to_string()],
            rows: vec![],
        };

        let response = csv_response(&sheet).unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sales_history.csv\""
        );
    }
}
