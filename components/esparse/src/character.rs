//! Character classification used by the scanner.
//!
//! Identifier start/part follow ECMAScript's `ID_Start` / `ID_Continue`
//! definitions. Letters are classified through the standard library's
//! Unicode tables; marks and connector punctuation that `char::is_alphanumeric`
//! does not cover come from the static [`COMBINING_MARKS`] table. All tables
//! are immutable and shared read-only between parses.

/// Inclusive code point ranges of combining marks (Mn/Mc) that may continue
/// an identifier. Sorted, non-overlapping.
const COMBINING_MARKS: &[(u32, u32)] = &[
    (0x0300, 0x036F),
    (0x0483, 0x0487),
    (0x0591, 0x05BD),
    (0x05BF, 0x05BF),
    (0x05C1, 0x05C2),
    (0x05C4, 0x05C5),
    (0x05C7, 0x05C7),
    (0x0610, 0x061A),
    (0x064B, 0x0669),
    (0x0670, 0x0670),
    (0x06D6, 0x06DC),
    (0x06DF, 0x06E4),
    (0x06E7, 0x06E8),
    (0x06EA, 0x06ED),
    (0x06F0, 0x06F9),
    (0x0711, 0x0711),
    (0x0730, 0x074A),
    (0x07A6, 0x07B0),
    (0x07C0, 0x07C9),
    (0x07EB, 0x07F3),
    (0x07FD, 0x07FD),
    (0x0816, 0x0819),
    (0x081B, 0x0823),
    (0x0825, 0x0827),
    (0x0829, 0x082D),
    (0x0859, 0x085B),
    (0x0898, 0x089F),
    (0x08CA, 0x08E1),
    (0x08E3, 0x0903),
    (0x093A, 0x093C),
    (0x093E, 0x094F),
    (0x0951, 0x0957),
    (0x0962, 0x0963),
    (0x0966, 0x096F),
    (0x0981, 0x0983),
    (0x09BC, 0x09BC),
    (0x09BE, 0x09C4),
    (0x09C7, 0x09C8),
    (0x09CB, 0x09CD),
    (0x09D7, 0x09D7),
    (0x09E2, 0x09E3),
    (0x09E6, 0x09EF),
    (0x09FE, 0x09FE),
    (0x0A01, 0x0A03),
    (0x0A3C, 0x0A3C),
    (0x0A3E, 0x0A42),
    (0x0A47, 0x0A48),
    (0x0A4B, 0x0A4D),
    (0x0A51, 0x0A51),
    (0x0A66, 0x0A71),
    (0x0A75, 0x0A75),
    (0x0A81, 0x0A83),
    (0x0ABC, 0x0ABC),
    (0x0ABE, 0x0AC5),
    (0x0AC7, 0x0AC9),
    (0x0ACB, 0x0ACD),
    (0x0AE2, 0x0AE3),
    (0x0AE6, 0x0AEF),
    (0x0AFA, 0x0AFF),
    (0x0B01, 0x0B03),
    (0x0B3C, 0x0B3C),
    (0x0B3E, 0x0B44),
    (0x0B47, 0x0B48),
    (0x0B4B, 0x0B4D),
    (0x0B55, 0x0B57),
    (0x0B62, 0x0B63),
    (0x0B66, 0x0B6F),
    (0x0B82, 0x0B82),
    (0x0BBE, 0x0BC2),
    (0x0BC6, 0x0BC8),
    (0x0BCA, 0x0BCD),
    (0x0BD7, 0x0BD7),
    (0x0BE6, 0x0BEF),
    (0x0C00, 0x0C04),
    (0x0C3C, 0x0C3C),
    (0x0C3E, 0x0C44),
    (0x0C46, 0x0C48),
    (0x0C4A, 0x0C4D),
    (0x0C55, 0x0C56),
    (0x0C62, 0x0C63),
    (0x0C66, 0x0C6F),
    (0x0C81, 0x0C83),
    (0x0CBC, 0x0CBC),
    (0x0CBE, 0x0CC4),
    (0x0CC6, 0x0CC8),
    (0x0CCA, 0x0CCD),
    (0x0CD5, 0x0CD6),
    (0x0CE2, 0x0CE3),
    (0x0CE6, 0x0CEF),
    (0x0CF3, 0x0CF3),
    (0x0D00, 0x0D03),
    (0x0D3B, 0x0D3C),
    (0x0D3E, 0x0D44),
    (0x0D46, 0x0D48),
    (0x0D4A, 0x0D4D),
    (0x0D57, 0x0D57),
    (0x0D62, 0x0D63),
    (0x0D66, 0x0D6F),
    (0x0D81, 0x0D83),
    (0x0DCA, 0x0DCA),
    (0x0DCF, 0x0DD4),
    (0x0DD6, 0x0DD6),
    (0x0DD8, 0x0DDF),
    (0x0DE6, 0x0DEF),
    (0x0DF2, 0x0DF3),
    (0x0E31, 0x0E31),
    (0x0E34, 0x0E3A),
    (0x0E47, 0x0E4E),
    (0x0E50, 0x0E59),
    (0x0EB1, 0x0EB1),
    (0x0EB4, 0x0EBC),
    (0x0EC8, 0x0ECE),
    (0x0ED0, 0x0ED9),
    (0x0F18, 0x0F19),
    (0x0F20, 0x0F29),
    (0x0F35, 0x0F35),
    (0x0F37, 0x0F37),
    (0x0F39, 0x0F39),
    (0x0F3E, 0x0F3F),
    (0x0F71, 0x0F84),
    (0x0F86, 0x0F87),
    (0x0F8D, 0x0FBC),
    (0x0FC6, 0x0FC6),
    (0x102B, 0x103E),
    (0x1040, 0x1049),
    (0x1056, 0x1059),
    (0x135D, 0x135F),
    (0x1369, 0x1371),
    (0x1712, 0x1715),
    (0x17B4, 0x17D3),
    (0x17DD, 0x17DD),
    (0x17E0, 0x17E9),
    (0x180B, 0x180D),
    (0x180F, 0x1819),
    (0x1920, 0x193B),
    (0x1946, 0x194F),
    (0x19D0, 0x19DA),
    (0x1A17, 0x1A1B),
    (0x1A55, 0x1A7F),
    (0x1AB0, 0x1ACE),
    (0x1B00, 0x1B04),
    (0x1B34, 0x1B44),
    (0x1B50, 0x1B59),
    (0x1B6B, 0x1B73),
    (0x1DC0, 0x1DFF),
    (0x200C, 0x200D),
    (0x203F, 0x2040),
    (0x2054, 0x2054),
    (0x20D0, 0x20DC),
    (0x20E1, 0x20E1),
    (0x20E5, 0x20F0),
    (0x2CEF, 0x2CF1),
    (0x2D7F, 0x2D7F),
    (0x2DE0, 0x2DFF),
    (0x302A, 0x302F),
    (0x3099, 0x309A),
    (0xA620, 0xA629),
    (0xA66F, 0xA66F),
    (0xA674, 0xA67D),
    (0xA69E, 0xA69F),
    (0xA6F0, 0xA6F1),
    (0xA802, 0xA802),
    (0xA806, 0xA806),
    (0xA80B, 0xA80B),
    (0xA823, 0xA827),
    (0xA880, 0xA881),
    (0xA8B4, 0xA8C5),
    (0xA8D0, 0xA8D9),
    (0xA8E0, 0xA8F1),
    (0xA900, 0xA909),
    (0xA926, 0xA92D),
    (0xA947, 0xA953),
    (0xFB1E, 0xFB1E),
    (0xFE00, 0xFE0F),
    (0xFE20, 0xFE2F),
    (0xFE33, 0xFE34),
    (0xFE4D, 0xFE4F),
    (0xFF10, 0xFF19),
    (0xFF3F, 0xFF3F),
    (0x101FD, 0x101FD),
    (0x102E0, 0x102E0),
    (0x10376, 0x1037A),
    (0x10A01, 0x10A0F),
    (0x11000, 0x11002),
    (0x11038, 0x11046),
    (0x1D165, 0x1D169),
    (0x1D16D, 0x1D172),
    (0x1D17B, 0x1D182),
    (0x1D185, 0x1D18B),
    (0x1D1AA, 0x1D1AD),
    (0x1D7CE, 0x1D7FF),
    (0x1E8D0, 0x1E8D6),
    (0x1E944, 0x1E94A),
    (0x1FBF0, 0x1FBF9),
    (0xE0100, 0xE01EF),
];

/// Alphabetic symbols that are not identifier characters (Pattern_Syntax).
const PATTERN_SYNTAX: &[(u32, u32)] = &[
    (0x2190, 0x245F),
    (0x2500, 0x2775),
    (0x2794, 0x2BFF),
    (0x2E00, 0x2E7F),
    (0x3001, 0x3003),
    (0x3008, 0x3020),
    (0x3030, 0x3030),
    (0xFD3E, 0xFD3F),
    (0xFE45, 0xFE46),
];

fn in_table(table: &[(u32, u32)], ch: char) -> bool {
    let code = ch as u32;
    table
        .binary_search_by(|&(lo, hi)| {
            if hi < code {
                std::cmp::Ordering::Less
            } else if lo > code {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Characters with the Other_ID_Start property.
fn is_other_id_start(ch: char) -> bool {
    matches!(ch, '\u{1885}' | '\u{1886}' | '\u{2118}' | '\u{212E}' | '\u{309B}' | '\u{309C}')
}

/// Characters with the Other_ID_Continue property.
fn is_other_id_continue(ch: char) -> bool {
    matches!(
        ch,
        '\u{00B7}' | '\u{0387}' | '\u{1369}'..='\u{1371}' | '\u{19DA}' | '\u{30FB}' | '\u{FF65}'
    )
}

/// ECMAScript LineTerminator.
pub fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// ECMAScript WhiteSpace (TAB, VT, FF, SP, NBSP, ZWNBSP and category Zs).
pub fn is_white_space(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{00A0}'
            | '\u{FEFF}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// True if `ch` may start an identifier.
pub fn is_identifier_start(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphabetic() || ch == '$' || ch == '_' || ch == '\\';
    }
    if in_table(PATTERN_SYNTAX, ch) {
        return false;
    }
    ch.is_alphabetic() || is_other_id_start(ch)
}

/// True if `ch` may continue an identifier.
pub fn is_identifier_part(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphanumeric() || ch == '$' || ch == '_' || ch == '\\';
    }
    if in_table(PATTERN_SYNTAX, ch) {
        return false;
    }
    ch.is_alphabetic()
        || is_other_id_start(ch)
        || is_other_id_continue(ch)
        || in_table(COMBINING_MARKS, ch)
}

/// Identifier start check that excludes the `\` escape introducer.
pub fn is_identifier_start_char(ch: char) -> bool {
    ch != '\\' && is_identifier_start(ch)
}

/// Identifier part check that excludes the `\` escape introducer.
pub fn is_identifier_part_char(ch: char) -> bool {
    ch != '\\' && is_identifier_part(ch)
}

/// ASCII `0`-`9`.
pub fn is_decimal_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// ASCII hexadecimal digit.
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// ASCII `0`-`7`.
pub fn is_octal_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

/// Numeric value of a hexadecimal digit.
pub fn hex_value(ch: char) -> u32 {
    ch.to_digit(16).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_identifier_chars() {
        assert!(is_identifier_start('a'));
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('_'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(!is_identifier_part('-'));
    }

    #[test]
    fn test_unicode_identifier_chars() {
        assert!(is_identifier_start('é'));
        assert!(is_identifier_start('π'));
        assert!(is_identifier_start('\u{2118}'));
        assert!(!is_identifier_start('\u{2190}'));
        assert!(is_identifier_part('\u{0301}'));
        assert!(is_identifier_part('\u{200C}'));
        assert!(!is_identifier_start('\u{0301}'));
    }

    #[test]
    fn test_whitespace_and_line_terminators() {
        assert!(is_white_space('\u{00A0}'));
        assert!(is_white_space('\u{3000}'));
        assert!(!is_white_space('\n'));
        assert!(is_line_terminator('\u{2028}'));
        assert!(is_line_terminator('\r'));
    }

    #[test]
    fn test_table_lookup_edges() {
        assert!(in_table(COMBINING_MARKS, '\u{0300}'));
        assert!(in_table(COMBINING_MARKS, '\u{036F}'));
        assert!(!in_table(COMBINING_MARKS, '\u{0370}'));
        assert!(in_table(COMBINING_MARKS, '\u{E01EF}'));
    }
}
