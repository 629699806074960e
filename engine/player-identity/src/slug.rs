use regex::Regex;

/// Extract the player slug from a profile href.
///
/// Hrefs look like `/players/c/curryst01.html`; the slug is the file stem.
/// Anything that does not match the pattern yields None.
pub fn slug_from_href(href: &str) -> Option<String> {
    let pattern = Regex::new(r"/players/[a-z]/([a-z0-9]+)\.html").unwrap();
    pattern
        .captures(href)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_slug_from_profile_href() {
        assert_eq!(
            slug_from_href("/players/c/curryst01.html"),
            Some("curryst01".to_string())
        );
        assert_eq!(
            slug_from_href("https://www.basketball-reference.com/players/j/jamesle01.html"),
            Some("jamesle01".to_string())
        );
    }

    #[test]
    fn rejects_non_profile_hrefs() {
        assert_eq!(slug_from_href("/teams/BOS/2025.html"), None);
        assert_eq!(slug_from_href(""), None);
        assert_eq!(slug_from_href("/players/c/"), None);
    }
}
