use scraper::{Html, Selector};

/// Pulls every result-card link out of a rendered search page, in document
/// order, duplicates included. Normalization happens downstream.
pub fn extract_channel_urls(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("div.gsc-thumbnail-inside").unwrap();
    let title_selector = Selector::parse("a.gs-title").unwrap();

    let mut urls = Vec::new();
    for card in document.select(&card_selector) {
        // Only the first title anchor counts; a card without one is skipped
        let href = card
            .select(&title_selector)
            .next()
            .and_then(|a| a.value().attr("href"));
        if let Some(href) = href {
            urls.push(href.to_string());
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <div class="gsc-results gsc-webResult">
          <div class="gsc-webResult gsc-result">
            <div class="gsc-thumbnail-inside">
              <div class="gs-title gsc-table-cell-thumbnail">
                <a class="gs-title" href="https://t.me/s/first_channel">First channel</a>
              </div>
            </div>
          </div>
          <div class="gsc-webResult gsc-result">
            <div class="gsc-thumbnail-inside">
              <div class="gs-title gsc-table-cell-thumbnail">
                <a class="gs-title" href="https://t.me/second">Second</a>
              </div>
            </div>
          </div>
          <div class="gsc-webResult gsc-result">
            <div class="gsc-thumbnail-inside">
              <div class="gs-title">Ad card without a link</div>
            </div>
          </div>
          <div class="gsc-webResult gsc-result">
            <div class="gsc-thumbnail-inside">
              <div class="gs-title gsc-table-cell-thumbnail">
                <a class="gs-title" href="https://t.me/s/first_channel">First again</a>
              </div>
            </div>
          </div>
        </div>
    "#;

    #[test]
    fn collects_card_links_in_document_order() {
        let urls = extract_channel_urls(RESULTS_PAGE);
        assert_eq!(
            urls,
            vec![
                "https://t.me/s/first_channel",
                "https://t.me/second",
                "https://t.me/s/first_channel",
            ]
        );
    }

    #[test]
    fn takes_only_the_first_title_link_per_card() {
        let html = r#"
            <div class="gsc-thumbnail-inside">
              <a class="gs-title" href="https://t.me/kept">kept</a>
              <a class="gs-title" href="https://t.me/ignored">ignored</a>
            </div>
        "#;
        assert_eq!(extract_channel_urls(html), vec!["https://t.me/kept"]);
    }

    #[test]
    fn anchor_without_a_target_is_skipped() {
        let html = r#"
            <div class="gsc-thumbnail-inside">
              <a class="gs-title">nowhere</a>
            </div>
        "#;
        assert!(extract_channel_urls(html).is_empty());
    }

    #[test]
    fn anchors_outside_result_cards_are_ignored() {
        let html = r#"
            <a class="gs-title" href="https://t.me/stray">stray</a>
            <div class="gsc-cursor-page">2</div>
        "#;
        assert!(extract_channel_urls(html).is_empty());
    }

    #[test]
    fn empty_page_yields_no_urls() {
        assert!(extract_channel_urls("<html><body></body></html>").is_empty());
    }
}
