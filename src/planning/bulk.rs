//! Bulk part generation - many sequentially numbered parts in one step
//!
//! Generated records are plain data; nothing touches a job until
//! [`Job::add_generated_parts`](crate::entities::job::Job::add_generated_parts)
//! validates the whole batch and commits it.

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

use crate::core::error::RoutingError;
use crate::entities::part::PartRouter;

/// Demonstration batch, standing in for a clipboard paste
pub const DEMO_BASE: &str = "170888";
pub const DEMO_QUANTITY: i64 = 30;
pub const DEMO_DRAWING: &str = "878A234FFGT";
pub const DEMO_MATERIAL: &str = "Acier 1020";

/// Largest batch `generate` accepts
pub const MAX_QUANTITY: i64 = 10_000;

/// One row of a bulk entry sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecord {
    pub part_number: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub drawing: String,
}

fn default_quantity() -> u32 {
    1
}

impl PartRecord {
    pub fn new(part_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            description: String::new(),
            quantity: 1,
            material: String::new(),
            drawing: String::new(),
        }
    }

    /// Build the part router this record describes
    pub fn into_part(self) -> Result<PartRouter, RoutingError> {
        Ok(PartRouter::new(self.part_number)?
            .with_description(self.description)
            .with_quantity(self.quantity)
            .with_material(self.material)
            .with_drawing(self.drawing))
    }
}

/// Records `base-1` through `base-quantity`, all sharing `drawing`.
/// `quantity` must be between 1 and [`MAX_QUANTITY`].
pub fn generate(base: &str, quantity: i64, drawing: &str) -> Result<Vec<PartRecord>, RoutingError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(RoutingError::InvalidQuantity(quantity.to_string()));
    }
    let base = base.trim();
    if base.is_empty() {
        return Err(RoutingError::empty_part_number());
    }

    Ok((1..=quantity)
        .map(|i| PartRecord {
            drawing: drawing.to_string(),
            ..PartRecord::new(format!("{}-{}", base, i))
        })
        .collect())
}

/// Parse a quantity typed by the user
pub fn parse_quantity(text: &str) -> Result<i64, RoutingError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| RoutingError::InvalidQuantity(text.to_string()))
}

/// Fixed sample batch: 30 parts of `170888` in Acier 1020
pub fn demonstration() -> Vec<PartRecord> {
    (1..=DEMO_QUANTITY)
        .map(|i| PartRecord {
            part_number: format!("{}-{}", DEMO_BASE, i),
            description: format!("Part {}", i),
            quantity: 1,
            material: DEMO_MATERIAL.to_string(),
            drawing: DEMO_DRAWING.to_string(),
        })
        .collect()
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase().replace([' ', '-'], "_"), i))
        .collect()
}

fn get_field(record: &StringRecord, header_map: &HashMap<String, usize>, field: &str) -> String {
    header_map
        .get(field)
        .and_then(|&idx| record.get(idx))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Read bulk entry rows from CSV.
///
/// Headers: `Part Number`, `Description`, `Quantity`, `Material`, `Drawing`
/// (case-insensitive; only `Part Number` is required). A blank quantity
/// means 1.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<PartRecord>, RoutingError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| RoutingError::BulkImport {
            row: 1,
            message: e.to_string(),
        })?
        .clone();
    let header_map = build_header_map(&headers);
    if !header_map.contains_key("part_number") {
        return Err(RoutingError::BulkImport {
            row: 1,
            message: "missing 'Part Number' column".to_string(),
        });
    }

    let mut records = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let row = row_idx + 2; // header is row 1
        let record = result.map_err(|e| RoutingError::BulkImport {
            row,
            message: e.to_string(),
        })?;

        let quantity = match get_field(&record, &header_map, "quantity") {
            q if q.is_empty() => 1,
            q => q.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                RoutingError::BulkImport {
                    row,
                    message: format!("invalid quantity '{}'", q),
                }
            })?,
        };

        records.push(PartRecord {
            part_number: get_field(&record, &header_map, "part_number"),
            description: get_field(&record, &header_map, "description"),
            quantity,
            material: get_field(&record, &header_map, "material"),
            drawing: get_field(&record, &header_map, "drawing"),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_numbers_sequentially() {
        let records = generate("1000", 3, "DWG-7").unwrap();
        let numbers: Vec<_> = records.iter().map(|r| r.part_number.as_str()).collect();
        assert_eq!(numbers, ["1000-1", "1000-2", "1000-3"]);
        assert!(records.iter().all(|r| r.drawing == "DWG-7"));
        assert!(records.iter().all(|r| r.quantity == 1 && r.material.is_empty()));
    }

    #[test]
    fn test_generate_returns_unique_numbers() {
        let records = generate("A", 25, "").unwrap();
        let unique: HashSet<_> = records.iter().map(|r| &r.part_number).collect();
        assert_eq!(records.len(), 25);
        assert_eq!(unique.len(), 25);
    }

    #[test]
    fn test_generate_rejects_non_positive_quantity() {
        assert_eq!(
            generate("A", 0, "").unwrap_err(),
            RoutingError::InvalidQuantity("0".to_string())
        );
        assert_eq!(
            generate("A", -1, "").unwrap_err(),
            RoutingError::InvalidQuantity("-1".to_string())
        );
    }

    #[test]
    fn test_generate_caps_batch_size() {
        assert_eq!(generate("A", MAX_QUANTITY, "").unwrap().len(), 10_000);
        assert_eq!(
            generate("A", 10_000_000_000, "").unwrap_err(),
            RoutingError::InvalidQuantity("10000000000".to_string())
        );
    }

    #[test]
    fn test_generate_rejects_empty_base() {
        assert_eq!(
            generate("  ", 2, "").unwrap_err(),
            RoutingError::empty_part_number()
        );
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(" 12 ").unwrap(), 12);
        assert_eq!(parse_quantity("-3").unwrap(), -3);
        assert_eq!(
            parse_quantity("abc").unwrap_err(),
            RoutingError::InvalidQuantity("abc".to_string())
        );
    }

    #[test]
    fn test_demonstration_batch() {
        let records = demonstration();
        assert_eq!(records.len(), 30);
        assert_eq!(records[0].part_number, "170888-1");
        assert_eq!(records[0].description, "Part 1");
        assert_eq!(records[29].part_number, "170888-30");
        assert!(records.iter().all(|r| r.material == "Acier 1020"));
        assert!(records.iter().all(|r| r.drawing == "878A234FFGT"));
        assert_eq!(records, demonstration());
    }

    #[test]
    fn test_read_records() {
        let csv = "Part Number,Description,Quantity,Material,Drawing\n\
                   P-1,Bracket,4,Alu 6061,D-100\n\
                   P-2,Shaft,,Acier 1020,\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].quantity, 4);
        assert_eq!(records[0].drawing, "D-100");
        assert_eq!(records[1].quantity, 1);
        assert_eq!(records[1].material, "Acier 1020");
    }

    #[test]
    fn test_read_records_errors() {
        let no_column = "Description\nBracket\n";
        assert!(matches!(
            read_records(no_column.as_bytes()).unwrap_err(),
            RoutingError::BulkImport { row: 1, .. }
        ));

        let bad_quantity = "part_number,quantity\nP-1,2\nP-2,many\n";
        assert!(matches!(
            read_records(bad_quantity.as_bytes()).unwrap_err(),
            RoutingError::BulkImport { row: 3, .. }
        ));
    }

    #[test]
    fn test_record_into_part() {
        let part = demonstration().remove(4).into_part().unwrap();
        assert_eq!(part.part_number, "170888-5");
        assert_eq!(part.description, "Part 5");
        assert_eq!(part.drawing, "878A234FFGT");
        assert!(part.tasks().is_empty());
    }
}
