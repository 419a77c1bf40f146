use once_cell::sync::Lazy;
use regex::Regex;

/// Phone numbers: digits, spaces and `+()-`, possibly empty
pub static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9+()\- ]*$").expect("Invalid phone regex pattern")
});
