//! Generated heading ids.

use std::collections::HashMap;
use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use regex::Regex;

/// Turn heading text into an anchor id.
///
/// Lowercases, maps whitespace and underscores to `-`, drops other
/// punctuation, collapses repeated `-` and trims them from both ends.
pub fn slugify(text: &str) -> String {
    static DASHES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));

    let mapped: String = text
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() || c == '_' => Some('-'),
            c if c.is_alphanumeric() || c == '-' => Some(c),
            _ => None,
        })
        .collect();

    DASHES_RE
        .replace_all(&mapped, "-")
        .trim_matches('-')
        .to_string()
}

/// Give every heading without an explicit `{#id}` a unique slug id.
///
/// Explicit ids are reserved first so generated ids never collide with them.
pub(crate) fn assign_ids(events: &mut [Event<'_>]) {
    let mut used: HashMap<String, usize> = HashMap::new();
    for event in events.iter() {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            used.entry(id.to_string()).or_insert(0);
        }
    }

    for i in 0..events.len() {
        if !matches!(events[i], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }

        let base = slugify(&heading_text(&events[i + 1..]));
        if base.is_empty() {
            continue;
        }

        let unique = unique_id(&mut used, base);
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(unique));
        }
    }
}

/// Concatenated text of the heading whose content starts at `events[0]`.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

fn unique_id(used: &mut HashMap<String, usize>, base: String) -> String {
    let Some(&seen) = used.get(&base) else {
        used.insert(base.clone(), 0);
        return base;
    };

    let mut n = seen;
    loop {
        n += 1;
        let candidate = format!("{base}-{n}");
        if !used.contains_key(&candidate) {
            used.insert(base, n);
            used.insert(candidate.clone(), 0);
            return candidate;
        }
    }
}
