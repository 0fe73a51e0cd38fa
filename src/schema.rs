//! Column-set validation helpers.
//!
//! Required-column checks are separated from the computations that need
//! them, so a caller gets one typed answer (which logical inputs are
//! absent) instead of failing midway through a calculation.

use polars::prelude::DataFrame;

use crate::constants::RESERVED_COLUMNS;

/// True when the table has a column with this exact name
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Return the logical names whose resolved columns are absent from the
/// table. Empty means the requirement set is satisfied.
pub fn missing_columns(df: &DataFrame, required: &[(String, String)]) -> Vec<String> {
    required
        .iter()
        .filter(|(_, actual)| !has_column(df, actual))
        .map(|(logical, _)| logical.clone())
        .collect()
}

/// True for columns that identify a row (sample metadata, time, provenance)
/// rather than carry a measurement
pub fn is_reserved(name: &str) -> bool {
    RESERVED_COLUMNS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn table() -> DataFrame {
        DataFrame::new(vec![
            Column::new("sample".into(), vec!["a", "b"]),
            Column::new("fm".into(), vec![1.0, 2.0]),
        ])
        .unwrap()
    }

    #[test]
    fn reports_missing_logical_names() {
        let required = vec![
            ("fm".to_string(), "fm".to_string()),
            ("fmp".to_string(), "fm_prime".to_string()),
        ];
        let missing = missing_columns(&table(), &required);
        assert_eq!(missing, vec!["fmp".to_string()]);
    }

    #[test]
    fn satisfied_requirements_are_empty() {
        let required = vec![("fm".to_string(), "fm".to_string())];
        assert!(missing_columns(&table(), &required).is_empty());
    }

    #[test]
    fn reserved_columns() {
        assert!(is_reserved("sample"));
        assert!(is_reserved("hours_day"));
        assert!(!is_reserved("npq"));
    }
}
