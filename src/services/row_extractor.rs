use std::str::FromStr;

use bigdecimal::{num_bigint::BigInt, BigDecimal};
use calamine::{Data, Range};
use chrono::NaiveDate;

use crate::models::{Extraction, PriceRecord};

/// Where prices sit on the weekday worksheet.
///
/// Rows are 1-based as shown in a spreadsheet UI, columns are 0-based
/// (`A` = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionLayout {
    pub first_row: u32,
    pub last_row: u32,
    pub name_column: u32,
    pub price_column: u32,
}

impl Default for ExtractionLayout {
    fn default() -> Self {
        Self {
            first_row: 7,
            last_row: 38,
            name_column: 1,  // B
            price_column: 6, // G
        }
    }
}

/// Scan the layout's row window and keep every row with a name and a
/// positive numeric price. Everything else is counted as skipped.
pub fn extract(range: &Range<Data>, layout: &ExtractionLayout, date: NaiveDate) -> Extraction {
    let mut extraction = Extraction::default();

    for row in layout.first_row..=layout.last_row {
        let r = row - 1;
        let name = cell_text(range.get_value((r, layout.name_column)));
        let price = cell_number(range.get_value((r, layout.price_column)))
            .and_then(round_price);

        match (name, price) {
            (Some(name), Some(price)) => {
                extraction.records.push(PriceRecord::new(name, price, date));
            }
            _ => extraction.skipped += 1,
        }
    }

    extraction
}

fn cell_text(cell: Option<&Data>) -> Option<String> {
    let text = match cell? {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn cell_number(cell: Option<&Data>) -> Option<f64> {
    let value = match cell? {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Round half-up to two decimals.
///
/// Works on the shortest decimal form of the float, so `150.005` becomes
/// `150.01` even though the binary value sits just below the midpoint.
/// Returns `None` when the result is not strictly positive.
pub fn round_price(value: f64) -> Option<BigDecimal> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    let exact = BigDecimal::from_str(&value.to_string()).ok()?;
    let half_cent = BigDecimal::new(BigInt::from(5), 3);
    let rounded = (exact + half_cent).with_scale(2);

    (rounded > BigDecimal::from(0)).then_some(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 22).unwrap()
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn sheet(rows: &[(u32, Data, Data)]) -> Range<Data> {
        let mut range = Range::new((0, 0), (39, 7));
        for (row, name, price) in rows {
            range.set_value((row - 1, 1), name.clone());
            range.set_value((row - 1, 6), price.clone());
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_round_price_half_up() {
        assert_eq!(round_price(123.456), Some(dec("123.46")));
        assert_eq!(round_price(100.0), Some(dec("100.00")));
        assert_eq!(round_price(150.005), Some(dec("150.01")));
        assert_eq!(round_price(0.994), Some(dec("0.99")));
        assert_eq!(round_price(98.125), Some(dec("98.13")));
    }

    #[test]
    fn test_round_price_half_cent_boundary() {
        assert_eq!(round_price(0.005), Some(dec("0.01")));
        assert_eq!(round_price(0.0049), None);
        assert_eq!(round_price(2.675), Some(dec("2.68")));
    }

    #[test]
    fn test_round_price_keeps_two_digit_scale() {
        assert_eq!(round_price(100.0).unwrap().to_string(), "100.00");
    }

    #[test]
    fn test_round_price_rejects_non_positive() {
        assert_eq!(round_price(0.0), None);
        assert_eq!(round_price(-12.5), None);
        assert_eq!(round_price(0.001), None);
        assert_eq!(round_price(f64::NAN), None);
        assert_eq!(round_price(f64::INFINITY), None);
    }

    #[test]
    fn test_extract_valid_rows_in_order() {
        let range = sheet(&[
            (7, s("ゴーヤー"), Data::Float(150.0)),
            (8, s("島人参"), Data::Int(200)),
            (9, s("シークワーサー"), Data::Float(300.5)),
        ]);

        let extraction = extract(&range, &ExtractionLayout::default(), date());

        let names: Vec<&str> = extraction.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ゴーヤー", "島人参", "シークワーサー"]);
        assert_eq!(extraction.records[1].price, dec("200.00"));
        assert!(extraction.records.iter().all(|r| r.date == date()));
        assert_eq!(extraction.skipped, 32 - 3);
    }

    #[test]
    fn test_extract_skips_invalid_rows() {
        let range = sheet(&[
            (7, s("トマト"), Data::Float(0.0)),
            (8, s("ナス"), Data::Float(-5.0)),
            (9, s("キュウリ"), s("入荷なし")),
            (10, s(""), Data::Float(200.0)),
            (11, s("   "), Data::Float(200.0)),
            (12, Data::Empty, Data::Float(200.0)),
            (13, s("ピーマン"), Data::Empty),
            (14, s("オクラ"), s("  ")),
            (15, s("レタス"), Data::Bool(true)),
            (16, s("  ヘチマ  "), Data::Float(180.0)),
        ]);

        let extraction = extract(&range, &ExtractionLayout::default(), date());

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "ヘチマ");
        assert_eq!(extraction.records[0].price, dec("180.00"));
        assert_eq!(extraction.skipped, 31);
    }

    #[test]
    fn test_extract_accepts_numeric_text_and_numeric_names() {
        let range = sheet(&[
            (7, s("冬瓜"), s(" 123.456 ")),
            (8, Data::Int(42), Data::Float(10.0)),
        ]);

        let extraction = extract(&range, &ExtractionLayout::default(), date());

        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.records[0].price, dec("123.46"));
        assert_eq!(extraction.records[1].name, "42");
    }

    #[test]
    fn test_extract_ignores_rows_outside_window() {
        let range = sheet(&[
            (6, s("見出し"), Data::Float(1.0)),
            (39, s("合計"), Data::Float(9999.0)),
            (38, s("パパイヤ"), Data::Float(250.0)),
        ]);

        let extraction = extract(&range, &ExtractionLayout::default(), date());

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "パパイヤ");
    }

    #[test]
    fn test_extract_keeps_duplicate_names() {
        let range = sheet(&[
            (7, s("トマト"), Data::Float(150.0)),
            (8, s("トマト"), Data::Float(160.0)),
        ]);

        let extraction = extract(&range, &ExtractionLayout::default(), date());
        assert_eq!(extraction.records.len(), 2);
    }

    #[test]
    fn test_extract_from_empty_range() {
        let range: Range<Data> = Range::empty();
        let extraction = extract(&range, &ExtractionLayout::default(), date());

        assert!(extraction.records.is_empty());
        assert_eq!(extraction.skipped, 32);
    }
}
