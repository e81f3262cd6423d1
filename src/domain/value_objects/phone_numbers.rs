/// Normalizes a phone number into the digits-only, country-code-prefixed
/// form the SMS gateway expects.
///
/// All non-digit characters are stripped (a leading `+` is tolerated but
/// dropped). A leading trunk `0` is replaced by the country calling code;
/// a number that already starts with the code is kept as-is; anything else
/// gets the code prepended. The function is idempotent.
pub fn normalize_phone(phone: &str, country_code: &str) -> String {
    let mut cleaned: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(rest) = cleaned.strip_prefix('0') {
        cleaned = format!("{}{}", country_code, rest);
    } else if !cleaned.starts_with(country_code) {
        cleaned = format!("{}{}", country_code, cleaned);
    }

    cleaned
}
