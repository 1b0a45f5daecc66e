/// Converts scraped price text into a number
///
/// Every character other than ASCII digits and `.` is dropped before parsing,
/// so currency symbols, thousands separators and labels disappear. Text with
/// no digits left (or that still fails to parse) yields `0.0`, which callers
/// treat as "price not determined".
///
/// # Examples
///
/// ```
/// use sole_scout::clean_price;
///
/// assert_eq!(clean_price("$129.99"), 129.99);
/// assert_eq!(clean_price("Free"), 0.0);
/// assert_eq!(clean_price(""), 0.0);
/// ```
pub fn clean_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(price) if price.is_finite() => price,
        _ => {
            tracing::debug!("Could not parse price from '{}'", raw);
            0.0
        }
    }
}
