use tantivy::schema::{
    FacetOptions, Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, FAST, STORED,
    STRING,
};
use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

pub const DOC_ID: &str = "doc_id";
pub const SEQ: &str = "seq";
pub const TEXT: &str = "text";
pub const FACET: &str = "facet";
pub const PAYLOAD: &str = "payload";

const TOKENIZER: &str = "text_with_stopwords";

/// Layout shared by every index:
/// - `doc_id`: exact-match document identifier
/// - `seq`: insertion order, fast field used to list documents
/// - `text`: all text field values, tokenized for querying
/// - `facet`: one `/name/value` facet per document facet
/// - `payload`: the stored field/facet record as JSON
pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_text_field(DOC_ID, STRING | STORED);
	schema_builder.add_u64_field(SEQ, FAST | STORED);
	let text_field_indexing = TextFieldIndexing::default().set_tokenizer(TOKENIZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	schema_builder.add_text_field(TEXT, TextOptions::default().set_indexing_options(text_field_indexing));
	schema_builder.add_facet_field(FACET, FacetOptions::default());
	schema_builder.add_text_field(PAYLOAD, STORED);
	schema_builder.build()
}

pub fn register_tokenizer(index: &Index) {
	let stop_words = [
		"a","an","and","are","as","at","be","by","for","from","in","is","it","its","of","on","or","that","the","to","was","with",
	];
	let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(stop_words.into_iter().map(|s| s.to_string())))
		.build();
	index.tokenizers().register(TOKENIZER, tokenizer);
}

/// Field handles resolved once per index.
#[derive(Debug, Clone, Copy)]
pub struct SchemaFields {
	pub doc_id: Field,
	pub seq: Field,
	pub text: Field,
	pub facet: Field,
	pub payload: Field,
}

impl SchemaFields {
	pub fn resolve(schema: &Schema) -> tantivy::Result<Self> {
		Ok(Self {
			doc_id: schema.get_field(DOC_ID)?,
			seq: schema.get_field(SEQ)?,
			text: schema.get_field(TEXT)?,
			facet: schema.get_field(FACET)?,
			payload: schema.get_field(PAYLOAD)?,
		})
	}
}
