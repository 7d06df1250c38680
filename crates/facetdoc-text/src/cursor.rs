use std::collections::VecDeque;

use tantivy::collector::TopDocs;
use tantivy::query::Query;
use tantivy::{DocAddress, Order, Searcher, TantivyDocument};

use facetdoc_core::types::Hit;
use facetdoc_core::{Error, Result};

use crate::index::read_hit;
use crate::schema::{SchemaFields, SEQ};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
	/// Oldest write first.
	Insertion,
	/// Best match first.
	Score,
}

/// Lazy, paged walk over the matches of one query.
///
/// The cursor works on the searcher snapshot taken when the query was issued,
/// so writes made while iterating are not seen. Dropping it early is fine;
/// issuing the query again starts over.
pub struct Cursor {
	searcher: Searcher,
	query: Box<dyn Query>,
	ranking: Ranking,
	fields: SchemaFields,
	page_size: usize,
	remaining: Option<usize>,
	offset: usize,
	buffered: VecDeque<DocAddress>,
	exhausted: bool,
}

impl Cursor {
	pub(crate) fn new(
		searcher: Searcher,
		query: Box<dyn Query>,
		ranking: Ranking,
		fields: SchemaFields,
		page_size: usize,
		limit: Option<usize>,
	) -> Self {
		Self {
			searcher,
			query,
			ranking,
			fields,
			page_size,
			remaining: limit,
			offset: 0,
			buffered: VecDeque::new(),
			exhausted: false,
		}
	}

	fn fetch_page(&mut self) -> tantivy::Result<()> {
		let collector = TopDocs::with_limit(self.page_size).and_offset(self.offset);
		let page: Vec<DocAddress> = match self.ranking {
			Ranking::Insertion => self
				.searcher
				.search(self.query.as_ref(), &collector.order_by_u64_field(SEQ, Order::Asc))?
				.into_iter()
				.map(|(_, address)| address)
				.collect(),
			Ranking::Score => self
				.searcher
				.search(self.query.as_ref(), &collector)?
				.into_iter()
				.map(|(_, address)| address)
				.collect(),
		};
		if page.len() < self.page_size {
			self.exhausted = true;
		}
		self.offset += page.len();
		self.buffered.extend(page);
		Ok(())
	}

	fn read(&self, address: DocAddress) -> Result<Hit> {
		let stored: TantivyDocument = self.searcher.doc(address).map_err(|e| Error::IndexQuery(e.to_string()))?;
		read_hit(&self.fields, &stored)
	}
}

impl Iterator for Cursor {
	type Item = Result<Hit>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.remaining == Some(0) {
			return None;
		}
		if self.buffered.is_empty() && !self.exhausted {
			if let Err(e) = self.fetch_page() {
				self.exhausted = true;
				return Some(Err(Error::IndexQuery(e.to_string())));
			}
		}
		let address = self.buffered.pop_front()?;
		if let Some(remaining) = self.remaining.as_mut() {
			*remaining -= 1;
		}
		Some(self.read(address))
	}
}
