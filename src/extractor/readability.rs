use std::collections::HashMap;

use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::app::{Result, StashError};
use crate::domain::{excerpt_of, ArticleRecord};
use crate::extractor::ExtractorConfig;

/// Paragraphs shorter than this do not contribute to a candidate's score.
const MIN_PARAGRAPH_LENGTH: usize = 25;

const TITLE_SEPARATORS: [&str; 4] = [" | ", " - ", " – ", " — "];

struct Selectors {
    title: Selector,
    heading: Selector,
    og_title: Selector,
    og_site_name: Selector,
    paragraph: Selector,
    links: Selector,
    media: Selector,
}

impl Selectors {
    fn new() -> Self {
        let parse = |s: &str| Selector::parse(s).expect("static selector");
        Self {
            title: parse("title"),
            heading: parse("h1"),
            og_title: parse(r#"meta[property="og:title"]"#),
            og_site_name: parse(r#"meta[property="og:site_name"]"#),
            paragraph: parse("p"),
            links: parse("a[href]"),
            media: parse("img[src], source[src], video[src], audio[src]"),
        }
    }
}

/// Readability-style reduction of an HTML document to its main article.
///
/// Boilerplate matching `remove_selectors` is dropped first. The body is the
/// first `content_selectors` match carrying enough text, otherwise the
/// element whose paragraphs score highest. Output is deterministic for a
/// given document and base URL.
pub struct ContentExtractor {
    config: ExtractorConfig,
    content_selectors: Vec<Selector>,
    remove_selectors: Vec<Selector>,
    selectors: Selectors,
}

impl ContentExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let content_selectors = parse_selectors(&config.content_selectors);
        let remove_selectors = parse_selectors(&config.remove_selectors);
        Self {
            config,
            content_selectors,
            remove_selectors,
            selectors: Selectors::new(),
        }
    }

    /// Extract the article from `html`, resolving relative links against `base`.
    pub fn extract(&self, html: &str, base: &Url) -> Result<ArticleRecord> {
        let mut document = Html::parse_document(html);

        let title = self.title(&document);
        let site_name = meta_content(&document, &self.selectors.og_site_name);

        self.strip_boilerplate(&mut document);

        let body = self.find_content(&document).ok_or_else(|| {
            StashError::Extraction(format!("could not identify article content in {}", base))
        })?;
        let body_id = body.id();

        let rewrites: Vec<_> = self
            .link_rewrites(body, base)
            .into_iter()
            .map(|(el, attr, absolute)| (el.id(), attr, absolute))
            .collect();
        for (id, attr, absolute) in rewrites {
            if let Some(mut node) = document.tree.get_mut(id) {
                set_attr(node.value(), attr, absolute.as_str());
            }
        }

        let body = document
            .tree
            .get(body_id)
            .and_then(ElementRef::wrap)
            .ok_or_else(|| {
                StashError::Extraction(format!("could not identify article content in {}", base))
            })?;

        let text_content = normalize_whitespace(&body.text().collect::<String>());
        let content = body.inner_html().trim().to_string();
        let excerpt = excerpt_of(&text_content, self.config.excerpt_length);

        Ok(ArticleRecord {
            url: base.to_string(),
            title,
            excerpt,
            text_content,
            content,
            site_name,
        })
    }

    fn title(&self, document: &Html) -> String {
        if let Some(title) = meta_content(document, &self.selectors.og_title) {
            return title;
        }

        if let Some(title) = first_text(document, &self.selectors.title) {
            return strip_site_suffix(&title);
        }

        first_text(document, &self.selectors.heading).unwrap_or_default()
    }

    fn strip_boilerplate(&self, document: &mut Html) {
        let mut doomed: Vec<_> = document
            .root_element()
            .descendants()
            .filter(|node| node.value().is_comment())
            .map(|node| node.id())
            .collect();

        for selector in &self.remove_selectors {
            doomed.extend(document.select(selector).map(|el| el.id()));
        }

        debug!("Stripping {} boilerplate nodes", doomed.len());
        for id in doomed {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    fn find_content<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        for selector in &self.content_selectors {
            let hit = document
                .select(selector)
                .find(|el| self.text_length(el) >= self.config.min_content_length);
            if hit.is_some() {
                return hit;
            }
        }

        let best = self.best_scored(document)?;
        (self.text_length(&best) >= self.config.min_content_length).then_some(best)
    }

    /// Score paragraph containers: parents get the paragraph's score,
    /// grandparents half of it. Link-heavy containers are penalised.
    fn best_scored<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let mut scores: HashMap<_, f64> = HashMap::new();

        for paragraph in document.select(&self.selectors.paragraph) {
            let text = normalize_whitespace(&paragraph.text().collect::<String>());
            let length = text.chars().count();
            if length < MIN_PARAGRAPH_LENGTH {
                continue;
            }

            let score = 1.0 + text.matches(',').count() as f64 + (length as f64 / 100.0).min(3.0);

            if let Some(parent) = paragraph.parent().and_then(ElementRef::wrap) {
                *scores.entry(parent.id()).or_default() += score;
                if let Some(grandparent) = parent.parent().and_then(ElementRef::wrap) {
                    *scores.entry(grandparent.id()).or_default() += score / 2.0;
                }
            }
        }

        scores
            .into_iter()
            .filter_map(|(id, score)| {
                let element = document.tree.get(id).and_then(ElementRef::wrap)?;
                Some((element, score * (1.0 - self.link_density(&element))))
            })
            // Ties go to the element that appears first in the document.
            .max_by(|(a, a_score), (b, b_score)| {
                a_score.total_cmp(b_score).then_with(|| b.id().cmp(&a.id()))
            })
            .map(|(element, _)| element)
    }

    fn text_length(&self, element: &ElementRef<'_>) -> usize {
        normalize_whitespace(&element.text().collect::<String>())
            .chars()
            .count()
    }

    fn link_density(&self, element: &ElementRef<'_>) -> f64 {
        let total = self.text_length(element);
        if total == 0 {
            return 1.0;
        }
        let linked: usize = element
            .select(&self.selectors.links)
            .map(|a| self.text_length(&a))
            .sum();
        (linked as f64 / total as f64).min(1.0)
    }

    /// Links and media under `element` whose `href`/`src` resolves to a
    /// different absolute URL. Fragment-only links are left alone.
    fn link_rewrites<'a>(
        &self,
        element: ElementRef<'a>,
        base: &Url,
    ) -> Vec<(ElementRef<'a>, &'static str, Url)> {
        let mut rewrites = Vec::new();

        for (selector, attr) in [(&self.selectors.links, "href"), (&self.selectors.media, "src")] {
            for el in element.select(selector) {
                let Some(value) = el.value().attr(attr) else {
                    continue;
                };
                if value.starts_with('#') {
                    continue;
                }
                let Ok(absolute) = base.join(value) else {
                    continue;
                };
                if absolute.as_str() != value {
                    rewrites.push((el, attr, absolute));
                }
            }
        }

        rewrites
    }
}

fn set_attr(node: &mut Node, attr: &str, value: &str) {
    if let Node::Element(element) = node {
        for (name, current) in element.attrs.iter_mut() {
            if &*name.local == attr {
                *current = value.into();
            }
        }
    }
}

fn parse_selectors(sources: &[String]) -> Vec<Selector> {
    sources
        .iter()
        .filter_map(|source| match Selector::parse(source) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!("Ignoring invalid selector {:?}: {:?}", source, e);
                None
            }
        })
        .collect()
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|meta| meta.value().attr("content"))
        .map(normalize_whitespace)
        .find(|content| !content.is_empty())
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

/// "Article Title | Site" → "Article Title", unless that leaves fewer than three words.
fn strip_site_suffix(title: &str) -> String {
    let cut = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.rfind(sep))
        .max();

    if let Some(pos) = cut {
        let head = title[..pos].trim();
        if head.split_whitespace().count() >= 3 {
            return head.to_string();
        }
    }
    title.to_string()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
