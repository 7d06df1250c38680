use std::marker::PhantomData;
use std::sync::Arc;

use crate::codec::Indexable;
use crate::error::Result;
use crate::types::{DocId, EncodedDocument, FacetCount, Hit, QueryOptions};

/// Lazy sequence of query results. Ends when the index has no more matches.
pub type Hits<'a> = Box<dyn Iterator<Item = Result<Hit>> + 'a>;

/// A named collection of documents serving queries over them.
pub trait SearchIndex: Send + Sync {
    fn name(&self) -> &str;

    /// Stores `doc` under `id`, or under a fresh id when `id` is empty.
    /// Returns the id the document was stored under.
    fn put(&self, id: &str, doc: &EncodedDocument) -> Result<DocId>;

    fn get(&self, id: &str) -> Result<EncodedDocument>;

    fn delete(&self, id: &str) -> Result<()>;

    /// An empty `query` matches every document.
    fn query(&self, query: &str, options: &QueryOptions) -> Result<Hits<'_>>;

    fn facet_counts(&self, query: &str, facet: &str) -> Result<Vec<FacetCount>>;
}

/// Hands out index handles by name.
pub trait IndexProvider: Send + Sync {
    fn open(&self, name: &str) -> Result<Arc<dyn SearchIndex>>;
}

/// Typed access on top of [`SearchIndex`], running the codec on the way in and out.
pub trait IndexExt: SearchIndex {
    fn put_document<D: Indexable>(&self, id: &str, doc: &D) -> Result<DocId> {
        self.put(id, &doc.encode())
    }

    fn get_document<D: Indexable>(&self, id: &str) -> Result<D> {
        D::decode(&self.get(id)?)
    }

    fn search<D: Indexable>(&self, query: &str, options: &QueryOptions) -> Result<Documents<'_, D>> {
        Ok(Documents { hits: self.query(query, options)?, _marker: PhantomData })
    }
}

impl<T: SearchIndex + ?Sized> IndexExt for T {}

/// Decodes each hit of a query as it is pulled.
pub struct Documents<'a, D> {
    hits: Hits<'a>,
    _marker: PhantomData<fn() -> D>,
}

impl<D: Indexable> Iterator for Documents<'_, D> {
    type Item = Result<(DocId, D)>;

    fn next(&mut self) -> Option<Self::Item> {
        let hit = match self.hits.next()? {
            Ok(hit) => hit,
            Err(e) => return Some(Err(e)),
        };
        Some(D::decode(&hit.document).map(|doc| (hit.id, doc)))
    }
}
