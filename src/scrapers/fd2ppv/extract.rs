//! Field extractors for fd2ppv article pages.
//!
//! Each extractor reads one field from the parsed page and returns an empty
//! value when the structure it looks for is missing. Class attributes are
//! matched exactly, not as class lists.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::super::resolve_url;
use crate::models::ActorPhotos;

/// Greeting shown in the header only to signed-in users.
const LOGGED_IN_MARKER: &str = "您好";

const LABEL_RELEASE_DATE: &str = "發佈日期";
const LABEL_SELLER: &str = "賣家";
const LABEL_MOSAIC: &str = "馬賽克";

/// Marks an uncensored title in the mosaic cell.
const NO_MOSAIC_MARK: char = '無';

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static BRIEF: LazyLock<Selector> = LazyLock::new(|| selector(r#"div[class="work-brief"]"#));
static COVER: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class="work-image-large work-photos hidden"]"#));
static META_LABEL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class="work-meta-label"]"#));
static DURATION: LazyLock<Selector> = LazyLock::new(|| selector("#duration"));
static ARTIST_LINK: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"div[class="artist-details"] h3[class="artist-name"] > a"#)
});
static AVATAR: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"img[class="artist-avatar-medium"]"#));

/// Censorship classification shown in the mosaic row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mosaic {
    Censored,
    Uncensored,
}

impl Mosaic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mosaic::Censored => "有码",
            Mosaic::Uncensored => "无码",
        }
    }
}

/// Text nodes that are direct children of `el`.
fn direct_texts<'a>(el: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    el.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
}

/// First direct text of `el` with any content, trimmed.
fn first_text(el: ElementRef<'_>) -> Option<String> {
    direct_texts(el)
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

/// First direct text with content across every match, in document order.
fn first_text_of(html: &Html, selector: &Selector) -> String {
    html.select(selector).find_map(first_text).unwrap_or_default()
}

/// Value cell that follows the meta label with the given text.
fn meta_value<'a>(html: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    let label_el = html
        .select(&META_LABEL)
        .find(|el| direct_texts(*el).any(|t| t.trim() == label))?;

    label_el
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "div" && el.value().attr("class") == Some("work-meta-value"))
}

/// Whether the page was rendered for a signed-in session.
///
/// Any text on the page containing the greeting counts, error pages included.
pub fn is_logged_in(html: &Html) -> bool {
    html.root_element()
        .text()
        .any(|t| t.contains(LOGGED_IN_MARKER))
}

/// The brief doubles as the title, since the FC2 code itself says nothing.
pub fn get_title(html: &Html) -> String {
    first_text_of(html, &BRIEF)
}

/// Same node as the title.
pub fn get_outline(html: &Html) -> String {
    first_text_of(html, &BRIEF)
}

/// Cover URL, kept only when absolute.
pub fn get_cover(html: &Html) -> String {
    let url = first_text_of(html, &COVER);
    if url.starts_with("http") {
        url
    } else {
        String::new()
    }
}

pub fn get_release_date(html: &Html) -> String {
    meta_value(html, LABEL_RELEASE_DATE)
        .and_then(first_text)
        .unwrap_or_default()
}

/// First four characters of the release date.
pub fn get_year(release: &str) -> String {
    release.chars().take(4).collect()
}

pub fn get_runtime(html: &Html) -> String {
    first_text_of(html, &DURATION)
}

/// Each non-blank direct text of a cast link is its own name.
fn artist_names(link: ElementRef<'_>) -> Vec<String> {
    direct_texts(link)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cast names, comma-joined in page order.
pub fn get_actor(html: &Html) -> String {
    html.select(&ARTIST_LINK)
        .flat_map(artist_names)
        .collect::<Vec<_>>()
        .join(",")
}

fn is_artist_section(el: ElementRef<'_>) -> bool {
    el.value().name() == "div" && el.value().attr("class") == Some("artist-details")
}

/// Avatar inside the nearest ancestor that belongs to this artist alone.
///
/// The walk stops at the enclosing cast section.
fn own_avatar<'a>(link: ElementRef<'a>) -> Option<&'a str> {
    for container in link.ancestors().filter_map(ElementRef::wrap) {
        if container.select(&ARTIST_LINK).nth(1).is_some() {
            return None;
        }
        if let Some(img) = container.select(&AVATAR).next() {
            return Some(img.value().attr("src").unwrap_or(""));
        }
        if is_artist_section(container) {
            return None;
        }
    }
    None
}

/// Avatar URL per cast name.
///
/// Avatars are paired through the artist's own container. When the page
/// groups names and avatars in separate lists, pairing falls back to page
/// order, and only when both lists have the same length; otherwise the
/// name maps to an empty URL. A link carrying several names has no avatar
/// of its own.
pub fn get_actor_photo(html: &Html, base_url: &str) -> ActorPhotos {
    let cast: Vec<(ElementRef<'_>, Vec<String>)> = html
        .select(&ARTIST_LINK)
        .map(|link| (link, artist_names(link)))
        .collect();
    let avatars: Vec<&str> = html
        .select(&AVATAR)
        .map(|img| img.value().attr("src").unwrap_or(""))
        .collect();
    let total: usize = cast.iter().map(|(_, names)| names.len()).sum();
    let positional = total == avatars.len();

    let mut photos = ActorPhotos::new();
    let mut index = 0;
    for (link, names) in cast {
        let own = if names.len() == 1 { own_avatar(link) } else { None };
        for name in names {
            let src = own
                .or_else(|| positional.then(|| avatars[index]))
                .unwrap_or("");
            photos.insert(name, resolve_url(base_url, src.trim()));
            index += 1;
        }
    }
    photos
}

pub fn get_studio(html: &Html) -> String {
    meta_value(html, LABEL_SELLER)
        .and_then(|cell| {
            cell.children()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().name() == "a")
                .find_map(first_text)
        })
        .unwrap_or_default()
}

/// Missing row or any text without the mark means censored.
pub fn get_mosaic(html: &Html) -> Mosaic {
    match meta_value(html, LABEL_MOSAIC) {
        Some(cell) if cell.text().any(|t| t.contains(NO_MOSAIC_MARK)) => Mosaic::Uncensored,
        _ => Mosaic::Censored,
    }
}
