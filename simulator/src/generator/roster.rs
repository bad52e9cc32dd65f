/// Fixed display-name roster standing in for the resident registry the
/// production ingestion service syncs from tag mappings.
const ROSTER: &[&str] = &[
    "Margaret Ellison",
    "Harold Finch",
    "Dorothy Campos",
    "Walter Briggs",
    "Edith Lannon",
    "Raymond Okafor",
    "Pearl Whitfield",
    "Stanley Dubois",
];

/// Resolves a 1-based resident id to a display name. Unknown ids fall
/// back to a placeholder instead of failing the report.
pub fn resident_name(user_id: u64) -> String {
    user_id
        .checked_sub(1)
        .and_then(|index| ROSTER.get(index as usize))
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| "Unknown Resident".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_resolve_to_roster_names() {
        assert_eq!(resident_name(1), "Margaret Ellison");
        assert_eq!(resident_name(8), "Stanley Dubois");
    }

    #[test]
    fn unknown_ids_fall_back_to_placeholder() {
        assert_eq!(resident_name(0), "Unknown Resident");
        assert_eq!(resident_name(99), "Unknown Resident");
    }
}
