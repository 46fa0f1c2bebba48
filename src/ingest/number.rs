use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

/// 解析本地化数字文本
///
/// "1.234,56" -> 1234.56, "12,5" -> 12.5, "1,234.56" -> 1234.56。
/// 空白或无法识别的文本返回 None，调用方决定如何报告。
pub fn parse_decimal(text: &str) -> Option<BigDecimal> {
    let s: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return None;
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == ',' || c == '-')
    {
        return None;
    }

    let normalized = match (s.rfind('.'), s.rfind(',')) {
        // 两种分隔符都有: 靠后的是小数点
        (Some(dot), Some(comma)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (None, Some(_)) if s.matches(',').count() == 1 => s.replace(',', "."),
        (None, Some(_)) => s.replace(',', ""),
        (Some(_), None) if s.matches('.').count() > 1 => s.replace('.', ""),
        _ => s,
    };

    BigDecimal::from_str(&normalized).ok()
}

/// 报价日期: 2025-10-25 / 25.10.2025 / 25/10/2025
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn parses_comma_decimal_and_grouping() {
        assert_eq!(parse_decimal("12,5"), Some(dec("12.5")));
        assert_eq!(parse_decimal("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_decimal("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_decimal("1.234.567"), Some(dec("1234567")));
        assert_eq!(parse_decimal("1,234,567"), Some(dec("1234567")));
        assert_eq!(parse_decimal(" 12.5 "), Some(dec("12.5")));
        assert_eq!(parse_decimal("1 250,00"), Some(dec("1250")));
        assert_eq!(parse_decimal("-3"), Some(dec("-3")));
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("12 TL"), None);
        assert_eq!(parse_decimal(",,"), None);
    }

    #[test]
    fn parses_common_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 10, 25);
        assert_eq!(parse_date("2025-10-25"), expected);
        assert_eq!(parse_date("25.10.2025"), expected);
        assert_eq!(parse_date(" 25/10/2025 "), expected);
        assert_eq!(parse_date("yarın"), None);
    }
}
