//! Name helpers for member display

/// Most letters shown in an avatar fallback.
const MAX_INITIALS: usize = 2;

/// Upper-cased first letter of each name part, at most two: "Ama K. Mensah" -> "AK".
pub fn initials(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(MAX_INITIALS)
        .collect()
}

/// First name part, used for friendlier greetings.
pub fn first_name(full_name: &str) -> &str {
    full_name.split_whitespace().next().unwrap_or("")
}
