// src/common/date_format.rs

use chrono::NaiveDate;

use crate::common::error::AppError;

/// Formato de data exigido pela API de relatórios (`DD-MM-YYYY`).
pub const REPORT_DATE_FORMAT: &str = "%d-%m-%Y";

pub fn format_report_date(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}

/// Converte `DD-MM-YYYY` em `NaiveDate`.
///
/// O chrono aceita dígitos sem zero à esquerda ("1-1-2023"); aqui só vale a
/// forma exata, então a data é formatada de volta e comparada com a entrada.
pub fn parse_report_date(raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, REPORT_DATE_FORMAT)
        .map_err(|_| AppError::InvalidDate(raw.to_string()))?;

    if format_report_date(date) != raw {
        return Err(AppError::InvalidDate(raw.to_string()));
    }

    Ok(date)
}
