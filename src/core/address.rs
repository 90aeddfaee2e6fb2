use super::types::Address;

/// Format an address as display lines.
///
/// 1. street and number, then stairs, floor and door, comma separated
/// 2. zip code and city, then `, state`
/// 3. country
///
/// Absent or blank optional parts add neither a separator nor a line.
///
/// ```
/// use pdf_invoicer::core::{Address, format_address};
///
/// let address = Address {
///     street: "Main".into(),
///     street_number: "12".into(),
///     stairs: None,
///     floor: None,
///     door: None,
///     zip_code: "08001".into(),
///     city: "Barcelona".into(),
///     state: None,
///     country: "Spain".into(),
/// };
/// assert_eq!(format_address(&address), ["Main 12", "08001 Barcelona", "Spain"]);
/// ```
pub fn format_address(address: &Address) -> Vec<String> {
    let mut street = join_words(&[address.street.as_str(), address.street_number.as_str()]);
    for part in [&address.stairs, &address.floor, &address.door] {
        if let Some(part) = present(part) {
            street.push_str(", ");
            street.push_str(part);
        }
    }

    let mut locality = join_words(&[address.zip_code.as_str(), address.city.as_str()]);
    if let Some(state) = present(&address.state) {
        locality.push_str(", ");
        locality.push_str(state);
    }

    [street, locality, address.country.trim().to_string()]
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn join_words(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
