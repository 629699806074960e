use adler32::RollingAdler32;

/// Derive the stable numeric provider id for a player slug.
///
/// Adler-32 of the slug bytes. The same slug always maps to the same id
/// across runs and processes, which is what makes it usable as a join key;
/// collisions are tolerated in practice (a season has ~600 active players).
pub fn provider_player_id(slug: &str) -> i64 {
    i64::from(RollingAdler32::from_buffer(slug.as_bytes()).hash())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_slug_same_id() {
        let id1 = provider_player_id("curryst01");
        let id2 = provider_player_id("curryst01");
        assert_eq!(id1, id2);

        let id3 = provider_player_id("jamesle01");
        assert_ne!(id1, id3);
    }

    #[test]
    fn known_checksum_value() {
        // Pinned so a hasher swap cannot silently re-key every player row.
        assert_eq!(provider_player_id("curryst01"), 319_554_430);
    }

    #[test]
    fn empty_slug_is_stable() {
        assert_eq!(provider_player_id(""), 1);
    }
}
