use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use tantivy::collector::{FacetCollector, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::{AllQuery, Query, QueryParser, TermQuery};
use tantivy::schema::{Facet, IndexRecordOption, Value};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, Term};
use tracing::{debug, info, warn};
use uuid::Uuid;

use facetdoc_core::config::IndexSettings;
use facetdoc_core::traits::{Hits, SearchIndex};
use facetdoc_core::types::{DocId, EncodedDocument, FacetCount, Hit, QueryOptions, WireValue};
use facetdoc_core::{Error, Result};

use crate::cursor::{Cursor, Ranking};
use crate::schema::{build_schema, register_tokenizer, SchemaFields, FACET};
use crate::validate;

#[derive(Debug, Clone, Copy)]
pub struct IndexOptions {
	pub writer_memory_bytes: usize,
	pub page_size: usize,
}

impl Default for IndexOptions {
	fn default() -> Self {
		Self { writer_memory_bytes: 50_000_000, page_size: 100 }
	}
}

impl From<&IndexSettings> for IndexOptions {
	fn from(settings: &IndexSettings) -> Self {
		Self { writer_memory_bytes: settings.writer_memory_bytes, page_size: settings.page_size }
	}
}

struct WriterState {
	writer: IndexWriter,
	last_seq: u64,
}

impl WriterState {
	/// Wall-clock nanos, bumped past the previous value so order survives clock ties.
	fn next_seq(&mut self) -> u64 {
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0, |d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX));
		self.last_seq = now.max(self.last_seq.saturating_add(1));
		self.last_seq
	}
}

pub struct TantivyIndex {
	name: String,
	index: Index,
	reader: IndexReader,
	writer: Mutex<WriterState>,
	fields: SchemaFields,
	page_size: usize,
}

impl TantivyIndex {
	pub fn create_in_ram(name: &str, options: IndexOptions) -> Result<Self> {
		Self::from_index(name, Index::create_in_ram(build_schema()), options)
	}

	/// Opens the index stored in `dir`, creating it when the directory is empty.
	pub fn open_in_dir(name: &str, dir: &Path, options: IndexOptions) -> Result<Self> {
		std::fs::create_dir_all(dir).map_err(|e| open_err(name, e))?;
		let directory = MmapDirectory::open(dir).map_err(|e| open_err(name, e))?;
		let index = Index::open_or_create(directory, build_schema()).map_err(|e| open_err(name, e))?;
		Self::from_index(name, index, options)
	}

	fn from_index(name: &str, index: Index, options: IndexOptions) -> Result<Self> {
		register_tokenizer(&index);
		let fields = SchemaFields::resolve(&index.schema()).map_err(|e| open_err(name, e))?;
		let reader: IndexReader = index
			.reader_builder()
			.reload_policy(ReloadPolicy::Manual)
			.try_into()
			.map_err(|e| open_err(name, e))?;
		let writer: IndexWriter = index.writer(options.writer_memory_bytes).map_err(|e| open_err(name, e))?;
		info!(index = name, "opened search index");
		Ok(Self {
			name: name.to_string(),
			index,
			reader,
			writer: Mutex::new(WriterState { writer, last_seq: 0 }),
			fields,
			page_size: options.page_size.max(1),
		})
	}

	fn searcher(&self) -> Searcher {
		self.reader.searcher()
	}

	/// Empty query strings match every document and list them in insertion order.
	fn parse_query(&self, query: &str) -> Result<(Box<dyn Query>, Ranking)> {
		if query.trim().is_empty() {
			return Ok((Box::new(AllQuery), Ranking::Insertion));
		}
		let parser = QueryParser::for_index(&self.index, vec![self.fields.text]);
		let parsed = parser.parse_query(query).map_err(|e| Error::IndexQuery(e.to_string()))?;
		Ok((parsed, Ranking::Score))
	}

	fn to_tantivy(&self, id: &str, seq: u64, doc: &EncodedDocument) -> Result<TantivyDocument> {
		let payload = serde_json::to_string(doc).map_err(|e| Error::IndexWrite(e.to_string()))?;
		let mut out = TantivyDocument::default();
		out.add_text(self.fields.doc_id, id);
		out.add_u64(self.fields.seq, seq);
		for field in &doc.fields {
			if let WireValue::Text(text) = &field.value {
				out.add_text(self.fields.text, text);
			}
		}
		for facet in &doc.facets {
			out.add_facet(self.fields.facet, Facet::from_path([facet.name.clone(), facet_label(&facet.value)]));
		}
		out.add_text(self.fields.payload, payload);
		Ok(out)
	}

	/// Runs `apply` against the writer, then commits and refreshes the reader.
	fn write<T>(&self, apply: impl FnOnce(&mut WriterState) -> Result<T>) -> Result<T> {
		let mut state = self
			.writer
			.lock()
			.map_err(|_| Error::IndexWrite(format!("writer for index {:?} is poisoned", self.name)))?;
		let out = match apply(&mut state) {
			Ok(out) => out,
			Err(e) => {
				let _ = state.writer.rollback();
				return Err(e);
			}
		};
		if let Err(e) = state.writer.commit() {
			warn!(index = %self.name, error = %e, "commit failed, rolling back");
			let _ = state.writer.rollback();
			return Err(Error::IndexWrite(e.to_string()));
		}
		Ok(committed(&self.name, out, self.reader.reload()))
	}

	fn id_term(&self, id: &str) -> Term {
		Term::from_field_text(self.fields.doc_id, id)
	}
}

impl SearchIndex for TantivyIndex {
	fn name(&self) -> &str {
		&self.name
	}

	fn put(&self, id: &str, doc: &EncodedDocument) -> Result<DocId> {
		let id = if id.is_empty() {
			Uuid::new_v4().to_string()
		} else {
			validate::document_id(id)?;
			id.to_string()
		};
		validate::document(doc)?;

		self.write(|state| {
			let seq = state.next_seq();
			let tantivy_doc = self.to_tantivy(&id, seq, doc)?;
			state.writer.delete_term(self.id_term(&id));
			state.writer.add_document(tantivy_doc).map_err(|e| Error::IndexWrite(e.to_string()))?;
			Ok(())
		})?;
		info!(index = %self.name, id = %id, "stored document");
		Ok(id)
	}

	fn get(&self, id: &str) -> Result<EncodedDocument> {
		let searcher = self.searcher();
		let query = TermQuery::new(self.id_term(id), IndexRecordOption::Basic);
		let top = searcher.search(&query, &TopDocs::with_limit(1)).map_err(|e| Error::IndexQuery(e.to_string()))?;
		let Some((_, address)) = top.into_iter().next() else {
			return Err(Error::NotFound(format!("document {id:?} in index {:?}", self.name)));
		};
		let stored: TantivyDocument = searcher.doc(address).map_err(|e| Error::IndexQuery(e.to_string()))?;
		read_hit(&self.fields, &stored).map(|hit| hit.document)
	}

	fn delete(&self, id: &str) -> Result<()> {
		self.write(|state| {
			state.writer.delete_term(self.id_term(id));
			Ok(())
		})?;
		info!(index = %self.name, id = %id, "deleted document");
		Ok(())
	}

	fn query(&self, query: &str, options: &QueryOptions) -> Result<Hits<'_>> {
		let (parsed, ranking) = self.parse_query(query)?;
		let page_size = options.page_size.unwrap_or(self.page_size).max(1);
		debug!(index = %self.name, query, page_size, "running query");
		Ok(Box::new(Cursor::new(self.searcher(), parsed, ranking, self.fields, page_size, options.limit)))
	}

	fn facet_counts(&self, query: &str, facet: &str) -> Result<Vec<FacetCount>> {
		let (parsed, _) = self.parse_query(query)?;
		let parent = Facet::from_path([facet]);
		let mut collector = FacetCollector::for_field(FACET);
		collector.add_facet(parent.clone());
		let counts = self
			.searcher()
			.search(parsed.as_ref(), &collector)
			.map_err(|e| Error::IndexQuery(e.to_string()))?;
		let mut out: Vec<FacetCount> = counts
			.get(parent)
			.map(|(child, count)| FacetCount {
				value: child.to_path().last().map(|s| (*s).to_string()).unwrap_or_default(),
				count,
			})
			.collect();
		out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
		Ok(out)
	}
}

/// Rebuilds a hit from the stored id and payload of a tantivy document.
pub(crate) fn read_hit(fields: &SchemaFields, stored: &TantivyDocument) -> Result<Hit> {
	let id = stored.get_first(fields.doc_id).and_then(|v| v.as_str()).unwrap_or_default().to_string();
	let payload = stored
		.get_first(fields.payload)
		.and_then(|v| v.as_str())
		.ok_or_else(|| Error::IndexQuery(format!("document {id:?} has no stored payload")))?;
	let document = serde_json::from_str(payload)
		.map_err(|e| Error::IndexQuery(format!("document {id:?} has an unreadable payload: {e}")))?;
	Ok(Hit { id, document })
}

fn facet_label(value: &WireValue) -> String {
	match value {
		WireValue::Number(n) => n.to_string(),
		WireValue::Text(s) => s.clone(),
		WireValue::Other(v) => v.to_string(),
	}
}

/// The write is durable once committed; a failed reload only delays its visibility.
fn committed<T>(index: &str, out: T, reload: tantivy::Result<()>) -> T {
	if let Err(e) = reload {
		warn!(index, error = %e, "reader reload failed after commit");
	}
	out
}

fn open_err(name: &str, e: impl std::fmt::Display) -> Error {
	Error::IndexOpen(format!("{name}: {e}"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use tantivy::TantivyError;

	#[test]
	fn reload_failure_after_commit_keeps_the_result() {
		let failed = Err(TantivyError::SystemError("reader gone".to_string()));
		assert_eq!(committed("test", "doc-1", failed), "doc-1");
		assert_eq!(committed("test", 7, Ok(())), 7);
	}

	#[test]
	fn facet_labels_use_shortest_number_text() {
		assert_eq!(facet_label(&WireValue::Number(1.0)), "1");
		assert_eq!(facet_label(&WireValue::Number(2.5)), "2.5");
		assert_eq!(facet_label(&WireValue::Text("x".into())), "x");
	}
}
