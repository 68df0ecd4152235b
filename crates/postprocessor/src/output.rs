//! Serializer - final tree → book XML text

use dom::{Document, DomSerializer, SerializerConfig};

use crate::config::PostprocessorConfig;
use crate::error::Result;

/// The book toolchain rejects an explicit `standalone="no"`
const STANDALONE_NO: &str = r#" standalone="no""#;

/// Render `doc` as indented UTF-8 XML without `standalone="no"`
pub fn serialize(doc: &Document, config: &PostprocessorConfig) -> Result<String> {
    let serializer = DomSerializer::with_config(SerializerConfig {
        indent: config.indent,
        xml_declaration: true,
    });
    let output = serializer.serialize(doc)?;
    Ok(output.replace(STANDALONE_NO, ""))
}
