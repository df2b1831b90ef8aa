//! Escape decoding for the string sub-machine: `\\ \" \/ \n \r \t \b \f` and
//! `\uXXXX`, including UTF-16 surrogate pair assembly.

/// A simple (non-`\u`) escape's decoded character, or `None` if `c` is not
/// one of the recognized simple escapes.
pub fn simple_escape(c: char) -> Option<char> {
    match c {
        '"' => Some('"'),
        '\\' => Some('\\'),
        '/' => Some('/'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'b' => Some('\u{0008}'),
        'f' => Some('\u{000C}'),
        _ => None,
    }
}

/// Combines a UTF-16 high surrogate and a following low surrogate into a
/// scalar value. Returns `None` if `low` is not a valid low surrogate.
pub fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    if !(0xDC00..=0xDFFF).contains(&low) {
        return None;
    }
    let c = 0x10000 + ((high as u32 - 0xD800) << 10) + (low as u32 - 0xDC00);
    char::from_u32(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_escapes() {
        assert_eq!(simple_escape('n'), Some('\n'));
        assert_eq!(simple_escape('x'), None);
    }

    #[test]
    fn combines_surrogate_pair() {
        // U+1F600 GRINNING FACE = D83D DE00
        assert_eq!(combine_surrogates(0xD83D, 0xDE00), Some('\u{1F600}'));
    }
}
