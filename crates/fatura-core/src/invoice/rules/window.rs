//! Bounded, keyword-delimited text windows.
//!
//! A section's numbers live on the same line as its label. Reading a fixed
//! number of characters after the label and stopping at the next section
//! keyword keeps numbers of the following line out of the window.

/// Slice at most `max_chars` characters of `text` starting at byte offset
/// `start`, cut at the first case-insensitive occurrence of any of
/// `terminators` at or after `start + skip`.
///
/// `skip` is usually the length of the section's own label, so the label
/// never terminates its own window. Offsets outside the text or off a char
/// boundary yield an empty window.
pub fn bounded_window<'a>(
    text: &'a str,
    start: usize,
    max_chars: usize,
    skip: usize,
    terminators: &[&str],
) -> &'a str {
    let Some(rest) = text.get(start..) else {
        return "";
    };

    let end = rest
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    let window = &rest[..end];

    match find_terminator(window, skip, terminators) {
        Some(cut) => &window[..cut],
        None => window,
    }
}

/// Byte offset of the earliest terminator keyword at or after `from`.
fn find_terminator(window: &str, from: usize, terminators: &[&str]) -> Option<usize> {
    window
        .char_indices()
        .map(|(i, _)| i)
        .filter(|&i| i >= from)
        .find(|&i| {
            let tail = &window[i..];
            terminators.iter().any(|keyword| {
                tail.get(..keyword.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::patterns::SECTION_KEYWORDS;

    #[test]
    fn test_window_is_bounded() {
        let text = "Contrib 12345678901234567890";
        assert_eq!(bounded_window(text, 0, 10, 7, SECTION_KEYWORDS), "Contrib 12");
        assert_eq!(bounded_window(text, 8, 5, 0, SECTION_KEYWORDS), "12345");
    }

    #[test]
    fn test_window_stops_at_next_section() {
        let text = "Energia Elétrica kWh 100 104,81\nEnergia SCEEE kWh 1.860 1.081,12";
        let window = bounded_window(text, 0, 120, "Energia Elétrica".len(), SECTION_KEYWORDS);
        assert_eq!(window, "Energia Elétrica kWh 100 104,81\n");
    }

    #[test]
    fn test_window_stops_on_same_line() {
        let text = "Energia compensada GD I kWh 1.860 -1.044,37 CONTRIB ILUM PUBLICA 47,57";
        let window = bounded_window(text, 0, 150, 7, SECTION_KEYWORDS);
        assert_eq!(window, "Energia compensada GD I kWh 1.860 -1.044,37 ");
    }

    #[test]
    fn test_window_counts_characters_not_bytes() {
        let text = "ÇÇÇÇÇ";
        assert_eq!(bounded_window(text, 0, 3, 0, &[]), "ÇÇÇ");
        assert_eq!(bounded_window(text, 2, 10, 0, &[]), "ÇÇÇÇ");
    }

    #[test]
    fn test_window_out_of_range() {
        assert_eq!(bounded_window("abc", 10, 5, 0, SECTION_KEYWORDS), "");
        // Inside a multi-byte char
        assert_eq!(bounded_window("Ç", 1, 5, 0, SECTION_KEYWORDS), "");
    }
}
