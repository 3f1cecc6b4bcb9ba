//! Fixed field-extraction prompt.
//!
//! The template is sent byte-for-byte on every request; only the document text
//! appended after the `Document:` marker varies.

use crate::llm::openai::{EXTRACTION_MAX_TOKENS, EXTRACTION_MODEL};
use crate::types::{LLMMessage, LLMRequest};

const INSTRUCTIONS: &str = "Extract the following fields from this document and return as JSON with the following structure: ";

const TARGET_SHAPE: &str = "{\n  'First Name': string,\n  'Last Name': string,\n  'SSN': string,\n  'Income': string,\n  'Deductions': string,\n  'Spouse': { 'First Name': string, 'Last Name': string, 'SSN': string },\n  'Dependents': [ { 'First Name': string, 'Last Name': string, 'SSN': string, 'Relationship': string, 'Age': string } ]\n}";

const DOCUMENT_MARKER: &str = "\nIf any field is missing, leave it blank. Document:\n";

/// Build the extraction prompt with `extracted_text` appended verbatim.
pub fn build_extraction_prompt(extracted_text: &str) -> String {
    let mut prompt = String::with_capacity(
        INSTRUCTIONS.len() + TARGET_SHAPE.len() + DOCUMENT_MARKER.len() + extracted_text.len(),
    );
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str(TARGET_SHAPE);
    prompt.push_str(DOCUMENT_MARKER);
    prompt.push_str(extracted_text);
    prompt
}

/// Wrap the prompt in the single-message chat request sent to the provider.
pub fn build_extraction_request(extracted_text: &str) -> LLMRequest {
    LLMRequest {
        model: EXTRACTION_MODEL.to_string(),
        messages: vec![LLMMessage::user(build_extraction_prompt(extracted_text))],
        max_tokens: EXTRACTION_MAX_TOKENS,
    }
}
