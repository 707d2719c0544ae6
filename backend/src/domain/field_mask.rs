//! Input masks for the student form.
//!
//! Birth dates are typed and shown as `DD/MM/YYYY` but stored as `YYYY-MM-DD`.
//! Case numbers follow `NNNN/NN`. These helpers only reshape text: calendar
//! correctness (e.g. `31/02/2020`) is never checked here.

const DATE_DISPLAY_LEN: usize = 10;
const CASE_DISPLAY_LEN: usize = 7;

fn digits_of(raw: &str) -> Vec<char> {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Constrain free text to `DD/MM/YYYY` as the user types.
pub fn apply_date_mask(raw: &str) -> String {
    let mut masked = String::with_capacity(DATE_DISPLAY_LEN);
    for (index, digit) in digits_of(raw).into_iter().enumerate() {
        if index == 2 || index == 4 {
            masked.push('/');
        }
        masked.push(digit);
    }
    masked.truncate(DATE_DISPLAY_LEN);
    masked
}

/// Constrain free text to `NNNN/NN` as the user types.
pub fn apply_case_mask(raw: &str) -> String {
    let mut masked = String::with_capacity(CASE_DISPLAY_LEN);
    for (index, digit) in digits_of(raw).into_iter().enumerate() {
        if index == 4 {
            masked.push('/');
        }
        masked.push(digit);
    }
    masked.truncate(CASE_DISPLAY_LEN);
    masked
}

/// Convert a display date (`DD/MM/YYYY`) to storage form (`YYYY-MM-DD`).
///
/// Anything that is not a complete masked date, including the empty string,
/// yields `None`, which callers treat as "no date set".
pub fn to_storage_date(display: &str) -> Option<String> {
    if display.chars().count() != DATE_DISPLAY_LEN {
        return None;
    }

    let parts: [&str; 3] = display.split('/').collect::<Vec<_>>().try_into().ok()?;
    let [day, month, year] = parts;
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if day.len() != 2 || month.len() != 2 || year.len() != 4 {
        return None;
    }
    if !(all_digits(day) && all_digits(month) && all_digits(year)) {
        return None;
    }

    Some(format!("{}-{}-{}", year, month, day))
}

/// Convert a storage date (`YYYY-MM-DD`) to display form (`DD/MM/YYYY`).
///
/// Absent or empty input gives an empty string. Input that does not split into
/// three parts is returned unchanged.
pub fn to_display_date(storage: Option<&str>) -> String {
    let storage = match storage {
        Some(s) if !s.is_empty() => s,
        _ => return String::new(),
    };

    match storage.split('-').collect::<Vec<_>>().try_into() {
        Ok(parts) => {
            let [year, month, day]: [&str; 3] = parts;
            format!("{}/{}/{}", day, month, year)
        }
        Err(_) => storage.to_string(),
    }
}
