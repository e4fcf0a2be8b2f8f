//! Link extraction from the rendered view.

use url::Url;

use crate::catalog::Item;
use crate::error::Result;
use crate::session::{ElementHandle, PageSession};

/// Extract the downloadable-item records currently visible in the view.
///
/// Records are resolved against the view's current address. Elements with no
/// resolvable reference are skipped and leave dedup state untouched; the
/// caller merges the result into the catalog, where first-seen wins.
pub async fn collect_items(session: &dyn PageSession, selector: &str) -> Result<Vec<Item>> {
    let base = Url::parse(&session.current_address().await?)?;
    let mut items = Vec::new();

    for element in session.find_elements(selector).await? {
        let Ok(Some(href)) = element.attribute("href").await else {
            continue;
        };
        if href.trim().is_empty() {
            continue;
        }

        let name_hint = offered_name(element.as_ref()).await;
        match Item::from_reference(&base, &href, name_hint.as_deref()) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::debug!("skipping unresolvable reference '{}': {}", href, e);
            }
        }
    }

    Ok(items)
}

/// Best name the element itself offers: visible text first, then the
/// accessibility label. `None` defers to the address's path segment.
async fn offered_name(element: &dyn ElementHandle) -> Option<String> {
    if let Ok(text) = element.text().await {
        let text = text.trim();
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }
    if let Ok(Some(label)) = element.attribute("aria-label").await {
        let label = label.trim();
        if !label.is_empty() {
            return Some(label.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::session::mock::{MockElement, MockSession};

    const SELECTOR: &str = "a[href*='/file/']";

    #[tokio::test]
    async fn test_collects_and_resolves_visible_links() {
        let session = MockSession::new("https://viewer.test/share/folder");
        session.push_view(
            SELECTOR,
            vec![
                MockElement::link("/file/1?sig=a", "report.pdf"),
                MockElement::link("https://viewer.test/file/2", "slides.key"),
            ],
        );

        let items = collect_items(&session, SELECTOR).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].canonical_key, "https://viewer.test/file/1");
        assert_eq!(items[0].display_name, "report.pdf");
        assert_eq!(items[1].canonical_key, "https://viewer.test/file/2");
    }

    #[tokio::test]
    async fn test_elements_without_reference_are_skipped() {
        let session = MockSession::new("https://viewer.test/share");
        let mut no_href = MockElement::link("/file/1", "kept.txt");
        no_href.href = None;
        session.push_view(
            SELECTOR,
            vec![no_href, MockElement::link("/file/2", "kept.txt")],
        );

        let items = collect_items(&session, SELECTOR).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].canonical_key, "https://viewer.test/file/2");
    }

    #[tokio::test]
    async fn test_aria_label_used_when_text_is_empty() {
        let session = MockSession::new("https://viewer.test/share");
        session.push_view(
            SELECTOR,
            vec![MockElement::link("/file/3", "").with_aria_label("budget.xlsx")],
        );

        let items = collect_items(&session, SELECTOR).await.unwrap();
        assert_eq!(items[0].display_name, "budget.xlsx");
    }

    #[tokio::test]
    async fn test_overlapping_passes_keep_one_item_per_key() {
        let session = MockSession::new("https://viewer.test/share");
        let view = vec![
            MockElement::link("/file/1?sig=a", "one.pdf"),
            MockElement::link("/file/1?sig=b", "one-again.pdf"),
            MockElement::link("/file/2", "two.pdf"),
        ];
        session.push_view(SELECTOR, view.clone());
        session.push_view(SELECTOR, view);

        let mut catalog = Catalog::new();
        catalog.merge(collect_items(&session, SELECTOR).await.unwrap());
        catalog.merge(collect_items(&session, SELECTOR).await.unwrap());

        assert_eq!(catalog.len(), 2);
        let first = catalog.iter().next().unwrap();
        assert_eq!(first.display_name, "one.pdf");
    }
}
