//! Emoji removal, applied to content before every page write.

use std::ops::RangeInclusive;

/// Code point ranges removed from page content.
const EMOJI_RANGES: [RangeInclusive<char>; 8] = [
    '\u{1F600}'..='\u{1F64F}', // emoticons
    '\u{1F300}'..='\u{1F5FF}', // symbols & pictographs
    '\u{1F680}'..='\u{1F6FF}', // transport & map
    '\u{1F1E0}'..='\u{1F1FF}', // flags
    '\u{1F900}'..='\u{1F9FF}', // supplemental symbols & pictographs
    '\u{1FA00}'..='\u{1FA6F}', // chess symbols
    '\u{1FA70}'..='\u{1FAFF}', // symbols & pictographs extended-A
    '\u{1F004}'..='\u{1F0CF}', // mahjong & playing cards
];

fn is_emoji(c: char) -> bool {
    EMOJI_RANGES.iter().any(|range| range.contains(&c))
}

/// Remove emoji code points, leaving everything else untouched.
#[must_use]
pub fn remove_emojis(text: &str) -> String {
    text.chars().filter(|&c| !is_emoji(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_removes_emojis() {
        assert_eq!(remove_emojis("Done \u{2705}\u{1F389} ok \u{1F680}"), "Done \u{2705} ok ");
        assert_eq!(remove_emojis("\u{1F1EF}\u{1F1F5} flag"), " flag");
        assert_eq!(remove_emojis("\u{1F004} tile \u{1FAE0}"), " tile ");
    }

    #[test]
    fn test_keeps_other_text() {
        let text = "# 画面設計\n\n- ✓ item → next ©\n```mermaid\nA-->B\n```";
        assert_eq!(remove_emojis(text), text);
    }

    #[test]
    fn test_range_boundaries() {
        assert_eq!(remove_emojis("\u{1F5FF}\u{1F600}\u{1F64F}\u{1F650}"), "\u{1F650}");
        assert_eq!(remove_emojis("\u{1F003}\u{1F0D0}"), "\u{1F003}\u{1F0D0}");
    }
}
