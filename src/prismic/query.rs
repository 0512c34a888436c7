//! Query construction for the content repository search endpoint.
//!
//! Predicates and orderings are rendered into the bracketed string syntax
//! the search API expects, e.g. `[[at(document.type, "posts")]]` and
//! `[document.first_publication_date desc]`.

use std::fmt;

/// A single filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exact match of a field path against a value.
    At { path: String, value: String },
}

impl Predicate {
    #[must_use]
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::At {
            path: path.into(),
            value: value.into(),
        }
    }

    /// `document.type == doc_type`
    #[must_use]
    pub fn document_type(doc_type: &str) -> Self {
        Self::at("document.type", doc_type)
    }

    /// `document.id == id`
    #[must_use]
    pub fn document_id(id: &str) -> Self {
        Self::at("document.id", id)
    }

    /// `my.{doc_type}.uid == uid`
    #[must_use]
    pub fn uid(doc_type: &str, uid: &str) -> Self {
        Self::at(format!("my.{doc_type}.uid"), uid)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At { path, value } => {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "[at({path}, \"{escaped}\")]")
            }
        }
    }
}

/// Render a predicate list as the `q` parameter.
#[must_use]
pub fn predicates_param(predicates: &[Predicate]) -> String {
    let inner: String = predicates.iter().map(ToString::to_string).collect();
    format!("[{inner}]")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Sort directive on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub direction: Direction,
}

impl Ordering {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Asc => write!(f, "{}", self.field),
            Direction::Desc => write!(f, "{} desc", self.field),
        }
    }
}

/// Render an ordering list as the `orderings` parameter.
#[must_use]
pub fn orderings_param(orderings: &[Ordering]) -> String {
    let inner = orderings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("[{inner}]")
}

/// Options accompanying a predicate query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Field projection, e.g. `posts.title`. Empty means every field.
    pub fetch: Vec<String>,
    pub page_size: Option<u32>,
    /// Return documents positioned after this document id.
    pub after: Option<String>,
    pub orderings: Vec<Ordering>,
    /// Content snapshot; `None` selects the master (published) ref.
    pub reference: Option<String>,
}

impl QueryOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn after(mut self, id: impl Into<String>) -> Self {
        self.after = Some(id.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    #[must_use]
    pub fn reference(mut self, reference: Option<&str>) -> Self {
        self.reference = reference.map(String::from);
        self
    }

    /// Query-string pairs for every option that is set, excluding `ref`.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page_size) = self.page_size {
            params.push(("pageSize", page_size.to_string()));
        }
        if let Some(ref after) = self.after {
            params.push(("after", after.clone()));
        }
        if !self.orderings.is_empty() {
            params.push(("orderings", orderings_param(&self.orderings)));
        }
        if !self.fetch.is_empty() {
            params.push(("fetch", self.fetch.join(",")));
        }
        params
    }
}
