use crate::document::{Document, Entry, Section};

/// Key prefixes that are loader directives rather than options
const DIRECTIVE_PREFIXES: &[&str] = &["!includedir", "!include"];

/// Normalize every section of a parsed `my.cnf`.
///
/// The input is left untouched; the result holds a freshly built document
/// plus every change that was applied to get there.
pub fn normalize_document(doc: &Document) -> NormalizeResult {
    let mut document = Document::new();
    let mut changes = vec![];

    for section in doc.sections() {
        let (normalized, section_changes) = normalize_section(section);
        document.push_section(normalized);
        changes.extend(section_changes);
    }

    NormalizeResult { document, changes }
}

fn normalize_section(section: &Section) -> (Section, Vec<Change>) {
    let mut out = Section::new(section.name());
    let mut changes = vec![];
    let change = |kind: ChangeKind| Change {
        section: section.name().to_string(),
        kind,
    };

    for entry in section.entries() {
        let key = if entry.key.contains('-') {
            let candidate = entry.key.replace('-', "_");

            // The candidate may come from an original underscored key anywhere
            // in the section, or from an earlier rename.
            if section.has_key(&candidate) || out.has_key(&candidate) {
                changes.push(change(ChangeKind::DroppedShadowed {
                    key: entry.key.clone(),
                    kept: candidate,
                }));
                continue;
            }
            candidate
        } else {
            entry.key.clone()
        };

        if is_include_directive(&key) {
            changes.push(change(ChangeKind::RemovedDirective {
                key: entry.key.clone(),
            }));
            continue;
        }

        if key != entry.key {
            changes.push(change(ChangeKind::Renamed {
                from: entry.key.clone(),
                to: key.clone(),
            }));
        }

        out.push(Entry::new(key, entry.value.clone()));
    }

    (out, changes)
}

pub fn is_include_directive(key: &str) -> bool {
    DIRECTIVE_PREFIXES.iter().any(|p| key.starts_with(p))
}

#[derive(Debug, Clone)]
pub struct NormalizeResult {
    pub document: Document,
    pub changes: Vec<Change>,
}

impl NormalizeResult {
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn renamed_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c.kind, ChangeKind::Renamed { .. }))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub section: String,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChangeKind {
    /// Hyphenated key rewritten to its underscored form
    Renamed { from: String, to: String },
    /// Hyphenated key dropped because `kept` already exists in the section
    DroppedShadowed { key: String, kept: String },
    /// `!include` / `!includedir` line removed
    RemovedDirective { key: String },
}

impl ChangeKind {
    /// Returns true if the change discarded a value the user wrote
    pub fn is_warning(&self) -> bool {
        matches!(self, ChangeKind::DroppedShadowed { .. })
    }
}
