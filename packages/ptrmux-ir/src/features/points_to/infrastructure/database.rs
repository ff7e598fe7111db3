//! Line-oriented fact database
//!
//! Reads the file the external analysis produces. A missing file is zero
//! facts, not an error; a malformed count field is a fatal contract
//! violation. Lines whose kind tag is unknown are skipped.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::errors::{PtrMuxError, Result};
use crate::features::points_to::domain::{FactKind, FactRecord};
use crate::features::points_to::ports::FactSource;

/// Parsed fact file, record order preserved
#[derive(Debug, Clone, Default)]
pub struct FactDatabase {
    records: Vec<FactRecord>,
}

impl FactDatabase {
    /// Load a fact file; a missing file yields an empty database
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "fact database missing; resolving with zero facts");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse fact lines
    pub fn parse(text: &str) -> Result<Self> {
        let mut records = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match Self::parse_line(line) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => debug!(lineno = lineno + 1, "skipping unrecognized fact kind"),
                Err(e) => {
                    return Err(PtrMuxError::parse_error(format!(
                        "fact database line {}: {}",
                        lineno + 1,
                        e
                    )))
                }
            }
        }
        Ok(Self { records })
    }

    fn parse_line(line: &str) -> std::result::Result<Option<FactRecord>, String> {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 2 {
            return Err("expected at least a function name and a kind tag".to_string());
        }
        let function = fields[0].to_string();
        let Some(kind) = FactKind::from_tag(fields[1]) else {
            return Ok(None);
        };

        let labels_end = 2 + kind.label_count();
        if fields.len() < labels_end + 1 {
            return Err(format!(
                "{} record needs {} label field(s) and a count",
                kind.tag(),
                kind.label_count()
            ));
        }
        let labels = fields[2..labels_end]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let count: usize = fields[labels_end]
            .parse()
            .map_err(|_| format!("malformed candidate count {:?}", fields[labels_end]))?;
        let targets = fields[labels_end + 1..]
            .iter()
            .map(|s| s.to_string())
            .collect();

        Ok(Some(FactRecord {
            function,
            kind,
            labels,
            count,
            targets,
        }))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl FactSource for FactDatabase {
    fn first_match(&self, function: &str, kind: FactKind, key: &[&str]) -> Option<&FactRecord> {
        self.records
            .iter()
            .find(|r| r.matches(function, kind, key))
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load_fact() {
        let db = FactDatabase::parse("main:load:%v:%p:2:@a:@b\n").unwrap();
        assert_eq!(db.len(), 1);
        let rec = db.first_match("main", FactKind::Load, &["%v", "%p"]).unwrap();
        assert_eq!(rec.count, 2);
        assert_eq!(rec.targets, vec!["@a", "@b"]);
    }

    #[test]
    fn test_parse_argument_fact() {
        let db = FactDatabase::parse("main:aargument:%arg:1:@a\n").unwrap();
        let rec = db
            .first_match("main", FactKind::Argument, &["%arg"])
            .unwrap();
        assert_eq!(rec.labels, vec!["%arg"]);
        assert_eq!(rec.targets, vec!["@a"]);
    }

    #[test]
    fn test_zero_count_has_no_targets() {
        let db = FactDatabase::parse("main:store:%x:%p:0\n").unwrap();
        let rec = db.first_match("main", FactKind::Store, &["%x", "%p"]).unwrap();
        assert_eq!(rec.count, 0);
        assert!(rec.targets.is_empty());
    }

    #[test]
    fn test_malformed_count_is_fatal() {
        let err = FactDatabase::parse("main:load:%v:%p:two:@a\n").unwrap_err();
        assert!(err.to_string().contains("malformed candidate count"));
    }

    #[test]
    fn test_truncated_line_is_fatal() {
        assert!(FactDatabase::parse("main:load:%v\n").is_err());
    }

    #[test]
    fn test_unknown_kind_is_skipped() {
        let db = FactDatabase::parse("main:alias:%v:%p:1:@a\nmain:load:%v:%p:1:@a\n").unwrap();
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_first_match_wins() {
        let db = FactDatabase::parse(
            "main:load:%v:%p:1:@a\n\
             main:load:%v:%p:1:@b\n",
        )
        .unwrap();
        let rec = db.first_match("main", FactKind::Load, &["%v", "%p"]).unwrap();
        assert_eq!(rec.targets, vec!["@a"]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let db = FactDatabase::load(Path::new("/nonexistent/facts")).unwrap();
        assert!(FactSource::is_empty(&db));
    }
}
