//! Bulk record set: metadata/document line pairs and the bulk file

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use graphline_kinds::Document;
use graphline_rdf::local_name;
use serde_json::json;

/// Action line preceding each document in the bulk protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub index: String,
    pub type_name: String,
    pub id: String,
}

impl MetadataRecord {
    /// Metadata for `doc`, keyed by the local name of its domain identifier.
    ///
    /// `None` when the document has no identifier; such documents are not published.
    pub fn for_document(index: &str, type_name: &str, doc: &Document) -> Option<Self> {
        let id = local_name(doc.dco_id()?);
        Some(Self {
            index: index.to_string(),
            type_name: type_name.to_string(),
            id: id.to_string(),
        })
    }

    /// `{"index":{"_index":..,"_type":..,"_id":..}}`
    pub fn to_line(&self) -> String {
        json!({"index": {"_index": self.index, "_type": self.type_name, "_id": self.id}}).to_string()
    }
}

/// One published entity
#[derive(Debug, Clone, PartialEq)]
pub struct BulkPair {
    pub metadata: MetadataRecord,
    pub document: Document,
}

/// Ordered pairs of one harvest run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkRecordSet {
    pairs: Vec<BulkPair>,
}

impl BulkRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pair: BulkPair) {
        self.pairs.push(pair);
    }

    /// Number of pairs (two lines each)
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BulkPair> {
        self.pairs.iter()
    }

    /// Alternating metadata and document lines
    pub fn lines(&self) -> Vec<String> {
        self.pairs
            .iter()
            .flat_map(|p| [p.metadata.to_line(), p.document.to_string()])
            .collect()
    }

    /// Newline-delimited bulk body.
    ///
    /// Every line, the last included, ends in `\n`, so the body closes on an
    /// empty line. There is no second newline after it.
    pub fn payload(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Write the bulk body to `path`, creating parent directories
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        for line in self.lines() {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}

impl FromIterator<BulkPair> for BulkRecordSet {
    fn from_iter<I: IntoIterator<Item = BulkPair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Read an existing bulk file as a request body, adding the final newline if missing
pub fn read_payload(path: &Path) -> std::io::Result<String> {
    let mut body = fs::read_to_string(path)?;
    if !body.is_empty() && !body.ends_with('\n') {
        body.push('\n');
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(uri: &str, id: Option<&str>) -> Document {
        Document::new(uri, "title", "T".into(), id.map(String::from))
    }

    #[test]
    fn metadata_id_is_local_name() {
        let d = doc("http://x/1", Some("http://dx.deepcarbon.net/11121/6200-6954"));
        let meta = MetadataRecord::for_document("dco", "dataset", &d).unwrap();
        assert_eq!(meta.id, "6200-6954");
        assert_eq!(
            meta.to_line(),
            r#"{"index":{"_index":"dco","_type":"dataset","_id":"6200-6954"}}"#
        );
    }

    #[test]
    fn no_identifier_no_metadata() {
        assert!(MetadataRecord::for_document("dco", "dataset", &doc("http://x/1", None)).is_none());
    }

    #[test]
    fn payload_alternates_and_ends_with_newline() {
        let set: BulkRecordSet = ["a", "b"]
            .iter()
            .map(|id| {
                let d = doc(&format!("http://x/{id}"), Some(id));
                BulkPair {
                    metadata: MetadataRecord::for_document("dco", "person", &d).unwrap(),
                    document: d,
                }
            })
            .collect();
        let payload = set.payload();
        let lines: Vec<&str> = payload.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains(r#""_id":"a""#));
        assert!(lines[1].contains(r#""uri":"http://x/a""#));
        assert!(lines[2].contains(r#""_id":"b""#));
        assert!(payload.ends_with("}\n"));
        assert!(!payload.ends_with("\n\n"));
        // splitting on newlines leaves one empty trailing segment
        assert_eq!(payload.split('\n').last(), Some(""));
        assert_eq!(payload.split('\n').count(), 5);
        for line in lines {
            serde_json::from_str::<serde_json::Value>(line).unwrap();
        }
    }

    #[test]
    fn empty_set_has_empty_payload() {
        assert_eq!(BulkRecordSet::new().payload(), "");
    }

    #[test]
    fn file_matches_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/datasets.bulk");
        let d = doc("http://x/1", Some("id-1"));
        let set: BulkRecordSet = std::iter::once(BulkPair {
            metadata: MetadataRecord::for_document("dco", "dataset", &d).unwrap(),
            document: d,
        })
        .collect();
        set.write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), set.payload());
        assert_eq!(read_payload(&path).unwrap(), set.payload());
    }

    #[test]
    fn read_payload_adds_final_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.bulk");
        fs::write(&path, "{\"index\":{}}\n{}").unwrap();
        assert_eq!(read_payload(&path).unwrap(), "{\"index\":{}}\n{}\n");
    }
}
