use crate::extractor::Record;
use crate::reduce::errors::{CoercedField, CoercionError};

/// Number of leading rating characters that hold the score, e.g. `"4.5"`.
pub const RATING_PREFIX_LEN: usize = 3;

fn error(field: CoercedField, raw: &str, record: &Record) -> CoercionError {
    CoercionError {
        field,
        raw: raw.to_string(),
        description: record.description.clone(),
    }
}

/// `"4.5 out of 5 stars"` -> `4.5`, from the first three characters after
/// leading whitespace.
pub fn rating(record: &Record) -> Result<f64, CoercionError> {
    let prefix: String = record
        .rating
        .trim_start()
        .chars()
        .take(RATING_PREFIX_LEN)
        .collect();
    // "4 out of 5" leaves "4 o" in the prefix
    let numeric: String = prefix
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| error(CoercedField::Rating, &record.rating, record))
}

/// `"1,299.99"` -> `1299.99`.
pub fn price(record: &Record) -> Result<f64, CoercionError> {
    let cleaned: String = record
        .price
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '.')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| error(CoercedField::Price, &record.price, record))
}

/// `"12,408"` -> `12408`.
pub fn review_count(record: &Record) -> Result<u64, CoercionError> {
    let cleaned: String = record
        .review_count
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')') && !c.is_whitespace())
        .collect();
    cleaned
        .parse::<u64>()
        .map_err(|_| error(CoercedField::ReviewCount, &record.review_count, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(price: &str, rating: &str, reviews: &str) -> Record {
        Record {
            description: "Desk Lamp".to_string(),
            price: price.to_string(),
            rating: rating.to_string(),
            review_count: reviews.to_string(),
            scrape_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            url: "https://www.amazon.com/p/1".to_string(),
        }
    }

    #[test]
    fn rating_uses_three_character_prefix() {
        assert_eq!(rating(&record("1", "4.5 out of 5 stars", "1")).unwrap(), 4.5);
        assert_eq!(rating(&record("1", "5.0 out of 5 stars", "1")).unwrap(), 5.0);
        assert_eq!(rating(&record("1", "4 out of 5 stars", "1")).unwrap(), 4.0);
    }

    #[test]
    fn rating_ignores_leading_whitespace() {
        assert_eq!(rating(&record("1", " 4.5 out of 5 stars", "1")).unwrap(), 4.5);
        assert_eq!(rating(&record("1", "\n   3.9 out of 5 stars", "1")).unwrap(), 3.9);
    }

    #[test]
    fn rating_rejects_non_numeric_prefix() {
        let err = rating(&record("1", "New listing", "1")).unwrap_err();
        assert_eq!(err.field, CoercedField::Rating);
        assert_eq!(err.raw, "New listing");
        assert_eq!(err.description, "Desk Lamp");
    }

    #[test]
    fn price_strips_thousands_separator() {
        assert_eq!(price(&record("1,299.99", "4.0", "1")).unwrap(), 1299.99);
        assert_eq!(price(&record("$7.50", "4.0", "1")).unwrap(), 7.5);
        assert!(price(&record("see options", "4.0", "1")).is_err());
    }

    #[test]
    fn review_count_strips_separators() {
        assert_eq!(review_count(&record("1", "4.0", "12,408")).unwrap(), 12408);
        assert_eq!(review_count(&record("1", "4.0", "(87)")).unwrap(), 87);
        assert!(review_count(&record("1", "4.0", "1.2K")).is_err());
    }
}
