//! HTML extraction helpers
//!
//! Two flavors of HTML arrive from the remote library: Kindle notebook
//! exports (scraped for `div.noteText` passages) and child note bodies
//! (stripped to plain text, one note per non-empty line).

use scraper::{Html, Selector};

/// Pull highlighted passages out of a Kindle notebook export
pub(crate) fn notebook_highlights(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("div.noteText") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Strip a note body to plain text and split it into individual notes,
/// one per non-empty trimmed line
pub(crate) fn note_lines(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let text: String = document.root_element().text().collect();

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notebook_highlights_scrapes_note_text_divs() {
        let html = r#"
            <html><body>
                <div class="sectionHeading">Chapter 1</div>
                <div class="noteText">First <b>highlighted</b> passage</div>
                <div class="noteText">  Second passage  </div>
                <div class="noteText"></div>
                <div class="noteOther">not a highlight</div>
            </body></html>
        "#;

        let highlights = notebook_highlights(html);
        assert_eq!(
            highlights,
            vec![
                "First highlighted passage".to_string(),
                "Second passage".to_string(),
            ]
        );
    }

    #[test]
    fn test_notebook_highlights_empty_document() {
        assert!(notebook_highlights("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_note_lines_splits_on_lines() {
        let html = "<div data-schema-version=\"9\"><p>first thought</p>\n<p>second thought</p></div>";
        assert_eq!(
            note_lines(html),
            vec!["first thought".to_string(), "second thought".to_string()]
        );
    }

    #[test]
    fn test_note_lines_drops_blank_lines() {
        let html = "<p>kept</p>\n<p>   </p>\n\n<p>  also kept </p>";
        assert_eq!(
            note_lines(html),
            vec!["kept".to_string(), "also kept".to_string()]
        );
    }

    #[test]
    fn test_note_lines_plain_text_passthrough() {
        assert_eq!(note_lines("just text"), vec!["just text".to_string()]);
    }
}
