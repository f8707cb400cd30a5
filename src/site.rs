//! Page-shape adapter for the GIANTS Developer Network documentation.
//!
//! Every assumption about the site's markup (sidebar styling, family
//! headings, `li.selected`, the `#box5 .entry` content layout) lives here.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::formats::{CategoryRef, LeafRef, Version};

const SIDEBAR_STYLE_MARKERS: [&str; 2] = ["width:200px", "float:left"];

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow::anyhow!("parse selector {css:?}: {err:?}"))
}

fn family_heading(version: Version) -> &'static str {
    match version {
        Version::Script => "Script",
        Version::Engine => "Engine",
    }
}

fn find_sidebar(document: &Html) -> anyhow::Result<Option<ElementRef<'_>>> {
    let styled_divs = selector("div[style]")?;
    Ok(document.select(&styled_divs).find(|div| {
        div.value()
            .attr("style")
            .is_some_and(|style| SIDEBAR_STYLE_MARKERS.iter().all(|m| style.contains(m)))
    }))
}

/// The first `ul` following the family heading in document order.
fn family_list<'a>(
    sidebar: ElementRef<'a>,
    version: Version,
) -> anyhow::Result<Option<ElementRef<'a>>> {
    let headings_and_lists = selector("h3.version, ul")?;
    let label = family_heading(version);

    let mut heading_seen = false;
    for element in sidebar.select(&headings_and_lists) {
        if element.value().name() == "h3" {
            if !heading_seen && element.text().collect::<String>().contains(label) {
                heading_seen = true;
            }
            continue;
        }
        if heading_seen {
            return Ok(Some(element));
        }
    }
    Ok(None)
}

fn link_text(link: ElementRef<'_>) -> String {
    link.text().collect::<String>().trim().to_owned()
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Top-level categories of both families, in source order.
///
/// Returns an empty list when the sidebar is missing.
pub fn parse_categories(html: &str, base_url: &Url) -> anyhow::Result<Vec<CategoryRef>> {
    let document = Html::parse_document(html);
    let Some(sidebar) = find_sidebar(&document)? else {
        tracing::warn!("could not find sidebar on root page");
        return Ok(Vec::new());
    };

    let links = selector("a[href]")?;
    let mut categories = Vec::new();

    for version in Version::ALL {
        let Some(list) = family_list(sidebar, version)? else {
            tracing::debug!(%version, "no navigation list for family");
            continue;
        };

        let version_marker = format!("version={}", version.as_str());
        for link in list.select(&links) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            if !href.contains(&version_marker) || !href.contains("category=") {
                continue;
            }
            let Ok(url) = base_url.join(href) else {
                tracing::debug!(href, "skipping unparsable category link");
                continue;
            };
            let (Some(category), Some(class_or_function)) = (
                query_value(&url, "category"),
                query_value(&url, version.selector_param()),
            ) else {
                continue;
            };

            categories.push(CategoryRef {
                version,
                category,
                class_or_function,
                name: link_text(link),
            });
        }
    }

    Ok(categories)
}

/// Leaves listed under the expanded (selected) category of a category page.
///
/// Falls back to the category itself when the page lists no sub-links.
pub fn parse_leaves(
    html: &str,
    base_url: &Url,
    category: &CategoryRef,
) -> anyhow::Result<Vec<LeafRef>> {
    let document = Html::parse_document(html);
    let mut leaves = Vec::new();

    if let Some(sidebar) = find_sidebar(&document)? {
        let selected = selector("li.selected")?;
        let nested = selector("ul")?;
        let links = selector("a[href]")?;

        let nested_list = sidebar
            .select(&selected)
            .next()
            .and_then(|li| li.select(&nested).next());

        if let Some(list) = nested_list {
            for link in list.select(&links) {
                let Some(href) = link.value().attr("href") else {
                    continue;
                };
                let Ok(url) = base_url.join(href) else {
                    continue;
                };
                let Some(class_or_function) =
                    query_value(&url, category.version.selector_param())
                else {
                    continue;
                };

                leaves.push(LeafRef {
                    version: category.version,
                    category: category.category.clone(),
                    class_or_function,
                    name: link_text(link),
                    category_name: category.name.clone(),
                });
            }
        }
    }

    if leaves.is_empty() {
        leaves.push(LeafRef::from_category(category));
    }
    Ok(leaves)
}

/// Outer HTML of the documentation body: the second direct `div` child of
/// `#box5 .entry`. The first child repeats the navigation.
pub fn extract_content(html: &str) -> anyhow::Result<Option<String>> {
    let document = Html::parse_document(html);
    let container = selector("div#box5")?;
    let entry = selector("div.entry")?;

    let Some(container) = document.select(&container).next() else {
        return Ok(None);
    };
    let Some(entry) = container.select(&entry).next() else {
        return Ok(None);
    };

    let body = entry
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "div")
        .nth(1);

    Ok(body.map(|div| div.html()))
}
