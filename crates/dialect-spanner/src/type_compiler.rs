//! Maps the abstract type lattice onto Spanner's column-type syntax and back.
//! The reverse direction feeds schema reflection.

use bridgeql_core::{DataType, GenerateError, Result};

use crate::dialect::DIALECT_NAME;

/// Binary float precision at or below this compiles to FLOAT32.
const FLOAT32_MAX_PRECISION: u32 = 24;

/// Spanner NUMERIC is fixed at precision 38, scale 9; user-declared
/// precision and scale are stored as that singleton regardless.
pub const NUMERIC_PRECISION: u32 = 38;
pub const NUMERIC_SCALE: u32 = 9;

pub fn compile_type(data_type: &DataType) -> Result<String> {
    let rendered = match data_type {
        DataType::Boolean => "BOOL".to_string(),
        DataType::SmallInt | DataType::Integer | DataType::BigInt => "INT64".to_string(),
        DataType::Float { precision } => match precision {
            Some(bits) if *bits <= FLOAT32_MAX_PRECISION => "FLOAT32".to_string(),
            _ => "FLOAT64".to_string(),
        },
        DataType::Numeric { .. } => "NUMERIC".to_string(),
        DataType::Text => "STRING(MAX)".to_string(),
        DataType::Varchar { length } | DataType::Char { length } => match length {
            Some(n) => format!("STRING({n})"),
            None => "STRING(MAX)".to_string(),
        },
        DataType::Binary { length } => match length {
            Some(n) => format!("BYTES({n})"),
            None => "BYTES(MAX)".to_string(),
        },
        DataType::LargeBinary | DataType::Opaque => "BYTES(MAX)".to_string(),
        DataType::Date => "DATE".to_string(),
        DataType::DateTime | DataType::Timestamp => "TIMESTAMP".to_string(),
        DataType::Json => "JSON".to_string(),
        DataType::Array(element) => format!("ARRAY<{}>", compile_type(element)?),
        DataType::Time => {
            return Err(unsupported("TIME columns"));
        }
        DataType::Custom(name) => name.clone(),
    };

    Ok(rendered)
}

/// Parses a `spanner_type` string from `information_schema.columns` back
/// into the abstract type it reflects as.
pub fn parse_type(spanner_type: &str) -> DataType {
    let trimmed = spanner_type.trim();

    if let Some(element) = trimmed
        .strip_prefix("ARRAY<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        return DataType::Array(Box::new(parse_type(element)));
    }

    match trimmed {
        "BOOL" => DataType::Boolean,
        "INT64" => DataType::BigInt,
        "FLOAT32" => DataType::Float {
            precision: Some(FLOAT32_MAX_PRECISION),
        },
        "FLOAT64" => DataType::Float { precision: None },
        "NUMERIC" => DataType::Numeric {
            precision: Some(NUMERIC_PRECISION),
            scale: Some(NUMERIC_SCALE),
        },
        "DATE" => DataType::Date,
        "TIMESTAMP" => DataType::Timestamp,
        "JSON" => DataType::Json,
        other => parse_sized_type(other),
    }
}

fn parse_sized_type(spanner_type: &str) -> DataType {
    if let Some(size) = parameter_of(spanner_type, "STRING") {
        return DataType::Varchar {
            length: parse_size(size),
        };
    }
    if let Some(size) = parameter_of(spanner_type, "BYTES") {
        return DataType::Binary {
            length: parse_size(size),
        };
    }

    DataType::Custom(spanner_type.to_string())
}

fn parameter_of<'a>(spanner_type: &'a str, prefix: &str) -> Option<&'a str> {
    spanner_type
        .strip_prefix(prefix)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_size(raw: &str) -> Option<u32> {
    if raw.eq_ignore_ascii_case("MAX") {
        None
    } else {
        raw.parse::<u32>().ok()
    }
}

fn unsupported(feature: &str) -> bridgeql_core::Error {
    GenerateError::UnsupportedFeature {
        feature: feature.to_string(),
        message: "Spanner has no native representation for this type".to_string(),
        dialect: DIALECT_NAME.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use bridgeql_core::{DataType, Error, GenerateError};

    use super::{compile_type, parse_type};

    #[test]
    fn integer_lattice_collapses_to_int64() {
        for data_type in [DataType::SmallInt, DataType::Integer, DataType::BigInt] {
            assert_eq!(compile_type(&data_type).unwrap(), "INT64");
        }
    }

    #[test]
    fn float_precision_selects_width() {
        assert_eq!(
            compile_type(&DataType::Float { precision: Some(24) }).unwrap(),
            "FLOAT32"
        );
        assert_eq!(
            compile_type(&DataType::Float { precision: Some(53) }).unwrap(),
            "FLOAT64"
        );
        assert_eq!(
            compile_type(&DataType::Float { precision: None }).unwrap(),
            "FLOAT64"
        );
    }

    #[test]
    fn strings_and_bytes_carry_length_or_max() {
        assert_eq!(
            compile_type(&DataType::Varchar { length: Some(36) }).unwrap(),
            "STRING(36)"
        );
        assert_eq!(
            compile_type(&DataType::Varchar { length: None }).unwrap(),
            "STRING(MAX)"
        );
        assert_eq!(compile_type(&DataType::Text).unwrap(), "STRING(MAX)");
        assert_eq!(
            compile_type(&DataType::Binary { length: Some(16) }).unwrap(),
            "BYTES(16)"
        );
        assert_eq!(compile_type(&DataType::LargeBinary).unwrap(), "BYTES(MAX)");
        assert_eq!(compile_type(&DataType::Opaque).unwrap(), "BYTES(MAX)");
    }

    #[test]
    fn arrays_nest() {
        let data_type = DataType::Array(Box::new(DataType::Varchar { length: Some(10) }));
        assert_eq!(compile_type(&data_type).unwrap(), "ARRAY<STRING(10)>");
    }

    #[test]
    fn time_columns_are_rejected() {
        match compile_type(&DataType::Time) {
            Err(Error::Generate(GenerateError::UnsupportedFeature { feature, .. })) => {
                assert!(feature.contains("TIME"));
            }
            other => panic!("expected unsupported-feature error, got {other:?}"),
        }
    }

    #[test]
    fn reverse_map_round_trips_reflected_types() {
        assert_eq!(parse_type("INT64"), DataType::BigInt);
        assert_eq!(
            parse_type("STRING(36)"),
            DataType::Varchar { length: Some(36) }
        );
        assert_eq!(parse_type("STRING(MAX)"), DataType::Varchar { length: None });
        assert_eq!(
            parse_type("BYTES(1024)"),
            DataType::Binary { length: Some(1024) }
        );
        assert_eq!(
            parse_type("NUMERIC"),
            DataType::Numeric {
                precision: Some(38),
                scale: Some(9),
            }
        );
        assert_eq!(
            parse_type("ARRAY<INT64>"),
            DataType::Array(Box::new(DataType::BigInt))
        );
    }
}
