//! In-memory document model
//!
//! The global surface the appliers mutate: class lists and CSS custom
//! properties on the root and body elements, plus the head's title and link
//! elements. Body and head are optional so a partially constructed document
//! can be represented.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single element with a class list and inline CSS custom properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Ordered, duplicate-free
    classes: Vec<String>,
    properties: BTreeMap<String, String>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class token; does nothing if already present
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Make `wanted` the only token of the family matched by `pattern`.
    /// A token already present keeps its position.
    pub fn set_class_in_family(&mut self, pattern: &Regex, wanted: Option<&str>) {
        self.classes
            .retain(|c| Some(c.as_str()) == wanted || !pattern.is_match(c));
        if let Some(wanted) = wanted {
            self.add_class(wanted);
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Classes starting with `prefix`
    pub fn classes_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.classes
            .iter()
            .map(String::as_str)
            .filter(move |c| c.starts_with(prefix))
    }

    pub fn set_property(&mut self, name: &str, value: impl Into<String>) {
        self.properties.insert(name.to_string(), value.into());
    }

    pub fn remove_property(&mut self, name: &str) {
        self.properties.remove(name);
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// A `<link>` element in the document head
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkElement {
    pub rel: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

/// The document head
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Head {
    pub title: String,
    pub links: Vec<LinkElement>,
}

impl Head {
    /// Links whose rel attribute contains `marker`
    pub fn links_where_rel_contains<'a>(&'a self, marker: &'a str) -> impl Iterator<Item = &'a LinkElement> + 'a {
        self.links.iter().filter(move |l| l.rel.contains(marker))
    }

    /// Remove links whose rel attribute contains `marker`, returning how many went
    pub fn remove_links_where_rel_contains(&mut self, marker: &str) -> usize {
        let before = self.links.len();
        self.links.retain(|l| !l.rel.contains(marker));
        before - self.links.len()
    }

    pub fn push_link(&mut self, link: LinkElement) {
        self.links.push(link);
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}

/// Whole document: `<html>` root, optional `<body>` and `<head>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub root: Element,
    pub body: Option<Element>,
    pub head: Option<Head>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            root: Element::new(),
            body: Some(Element::new()),
            head: Some(Head::default()),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document with a root element only
    pub fn bare() -> Self {
        Self {
            root: Element::new(),
            body: None,
            head: None,
        }
    }
}
