/// Characters that can't appear in a file name on common filesystems.
pub const RESERVED: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Map arbitrary extracted text to a filesystem-safe token.
///
/// Reserved characters become `_`, surrounding whitespace is trimmed and
/// every inner whitespace run becomes a single `_`. Empty in, empty out.
pub fn sanitize(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if RESERVED.contains(&c) { '_' } else { c })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_collapses_multiline_title() {
        assert_eq!(sanitize("Floor   Plan\nLevel 2"), "Floor_Plan_Level_2");
    }

    #[test]
    fn test_replaces_reserved() {
        assert_eq!(sanitize("A/101: \"Rev\" <2>?"), "A_101___Rev___2__");
        assert_eq!(sanitize(r"C:\sheets|*"), "C__sheets__");
    }

    #[test]
    fn test_trims_before_collapsing() {
        assert_eq!(sanitize("  A-101  "), "A-101");
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize(" \t\n"), "");
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(s in "\\PC{0,40}") {
            let once = sanitize(&s);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn sanitize_output_has_no_reserved(s in "[<>:\"/\\\\|?* a-zA-Z0-9\\t\\n-]{0,40}") {
            let out = sanitize(&s);
            prop_assert!(!out.chars().any(|c| RESERVED.contains(&c)));
            prop_assert!(!out.chars().any(char::is_whitespace));
        }
    }
}
