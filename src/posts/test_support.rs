//! In-memory content store for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use url::Url;

use crate::prismic::{
    ContentStore, Direction, Document, Predicate, QueryOptions, SearchResponse, StoreError,
};

const BASE: &str = "https://fake.cdn.prismic.io/api/v2/documents/search";
pub const MASTER_REF: &str = "fake-master";

pub struct FakeStore {
    docs: Vec<Document>,
    /// References seen by `query`, in call order.
    pub references: Mutex<Vec<Option<String>>>,
    pub fetched_pages: Mutex<Vec<String>>,
}

pub fn post_doc(id: &str, uid: &str, date: &str) -> Document {
    Document {
        id: id.to_string(),
        uid: Some(uid.to_string()),
        doc_type: "posts".to_string(),
        first_publication_date: Some(format!("{date}T12:00:00+0000")),
        last_publication_date: Some(format!("{date}T12:00:00+0000")),
        data: json!({
            "title": format!("Title of {uid}"),
            "subtitle": format!("Subtitle of {uid}"),
            "author": "Autor",
            "content": []
        }),
    }
}

impl FakeStore {
    pub fn new(docs: Vec<Document>) -> Self {
        Self {
            docs,
            references: Mutex::new(Vec::new()),
            fetched_pages: Mutex::new(Vec::new()),
        }
    }

    fn matching(&self, predicates: &[Predicate]) -> Vec<Document> {
        self.docs
            .iter()
            .filter(|doc| {
                predicates.iter().all(|p| match p {
                    Predicate::At { path, value } => match path.as_str() {
                        "document.type" => &doc.doc_type == value,
                        "document.id" => &doc.id == value,
                        other if other.ends_with(".uid") => {
                            doc.uid.as_deref() == Some(value.as_str())
                        }
                        _ => false,
                    },
                })
            })
            .cloned()
            .collect()
    }

    fn page(docs: &[Document], page: usize, page_size: usize) -> SearchResponse {
        let total_pages = docs.len().div_ceil(page_size).max(1);
        let results: Vec<Document> = docs
            .iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();
        let next_page =
            (page < total_pages).then(|| format!("{BASE}?page={}&pageSize={page_size}", page + 1));
        SearchResponse {
            page: page as u32,
            results_per_page: page_size as u32,
            results_size: results.len() as u32,
            total_results_size: docs.len() as u32,
            total_pages: total_pages as u32,
            next_page,
            prev_page: None,
            results,
        }
    }

    /// Posts newest first.
    fn ordered(&self, direction: Direction) -> Vec<Document> {
        let mut docs = self.matching(&[Predicate::document_type("posts")]);
        docs.sort_by(|a, b| a.first_publication_date.cmp(&b.first_publication_date));
        if direction == Direction::Desc {
            docs.reverse();
        }
        docs
    }
}

#[async_trait]
impl ContentStore for FakeStore {
    async fn master_ref(&self) -> Result<String, StoreError> {
        Ok(MASTER_REF.to_string())
    }

    async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<SearchResponse, StoreError> {
        self.references
            .lock()
            .unwrap()
            .push(options.reference.clone());

        let mut docs = match options.orderings.first() {
            Some(ordering) => {
                let ordered = self.ordered(ordering.direction);
                let matching = self.matching(predicates);
                ordered
                    .into_iter()
                    .filter(|d| matching.iter().any(|m| m.id == d.id))
                    .collect()
            }
            None => self.matching(predicates),
        };

        if let Some(ref after) = options.after {
            if let Some(pos) = docs.iter().position(|d| &d.id == after) {
                docs = docs.split_off(pos + 1);
            }
        }

        let page_size = options.page_size.unwrap_or(20) as usize;
        Ok(Self::page(&docs, 1, page_size))
    }

    async fn fetch_page(&self, url: &str) -> Result<SearchResponse, StoreError> {
        self.fetched_pages.lock().unwrap().push(url.to_string());
        let parsed = Url::parse(url)?;
        let param = |name: &str| {
            parsed
                .query_pairs()
                .find(|(k, _)| k == name)
                .and_then(|(_, v)| v.parse::<usize>().ok())
        };
        let page = param("page").unwrap_or(1);
        let page_size = param("pageSize").unwrap_or(20);
        Ok(Self::page(&self.ordered(Direction::Desc), page, page_size))
    }

    fn owns_url(&self, url: &str) -> bool {
        url.starts_with(BASE)
    }
}
