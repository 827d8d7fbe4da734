// OBO flat-file parser.
//
// Handles the subset of OBO 1.4 that ontology releases actually use for
// terms: header tag-value pairs, then `[Term]` stanzas. Other stanza types
// (`[Typedef]`, `[Instance]`) are skipped. Trailing `! comments` are
// stripped from identifier-valued tags; quoted values (`def`, `synonym`)
// understand backslash escapes.

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use super::model::{Ontology, Synonym, SynonymScope, Term, TermId};

/// Parse an OBO document.
pub fn parse(text: &str) -> Result<Ontology> {
    let mut header: Vec<(String, String)> = Vec::new();
    let mut terms: Vec<Term> = Vec::new();
    let mut skipped_stanzas = 0usize;

    let mut section = Section::Header;
    let mut current: Option<TermBuilder> = None;

    for (i, raw) in text.lines().enumerate() {
        let lineno = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('!') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if let Some(builder) = current.take() {
                terms.push(builder.finish()?);
            }
            section = if line == "[Term]" {
                current = Some(TermBuilder::new(lineno));
                Section::Term
            } else {
                skipped_stanzas += 1;
                Section::Other
            };
            continue;
        }

        let (tag, value) = line
            .split_once(':')
            .map(|(t, v)| (t.trim(), v.trim()))
            .ok_or_else(|| anyhow!("line {lineno}: expected `tag: value`, got {line:?}"))?;

        match section {
            Section::Header => header.push((tag.to_string(), value.to_string())),
            Section::Term => {
                if let Some(builder) = current.as_mut() {
                    builder
                        .apply(tag, value)
                        .with_context(|| format!("line {lineno}: bad `{tag}` value"))?;
                }
            }
            Section::Other => {}
        }
    }
    if let Some(builder) = current.take() {
        terms.push(builder.finish()?);
    }

    if skipped_stanzas > 0 {
        debug!(skipped_stanzas, "Skipped non-term stanzas");
    }
    info!(terms = terms.len(), "Parsed OBO ontology");
    Ok(Ontology::new(header, terms))
}

enum Section {
    Header,
    Term,
    Other,
}

/// Accumulates tags for one `[Term]` stanza.
struct TermBuilder {
    line: usize,
    term: Option<Term>,
    pending: Vec<(String, String)>,
}

impl TermBuilder {
    fn new(line: usize) -> Self {
        Self {
            line,
            term: None,
            pending: Vec::new(),
        }
    }

    fn apply(&mut self, tag: &str, value: &str) -> Result<()> {
        if tag == "id" {
            let id = strip_comment(value);
            if id.is_empty() {
                anyhow::bail!("empty id");
            }
            let mut term = Term::new(TermId::new(id));
            // Tags seen before the id line
            for (t, v) in std::mem::take(&mut self.pending) {
                apply_tag(&mut term, &t, &v)?;
            }
            self.term = Some(term);
            return Ok(());
        }

        match self.term.as_mut() {
            Some(term) => apply_tag(term, tag, value),
            None => {
                self.pending.push((tag.to_string(), value.to_string()));
                Ok(())
            }
        }
    }

    fn finish(self) -> Result<Term> {
        self.term
            .ok_or_else(|| anyhow!("line {}: [Term] stanza has no id", self.line))
    }
}

fn apply_tag(term: &mut Term, tag: &str, value: &str) -> Result<()> {
    match tag {
        "name" => term.name = Some(value.to_string()),
        "namespace" => term.namespace = Some(value.to_string()),
        "def" => {
            let (text, _) = parse_quoted(value)?;
            term.definition = Some(text);
        }
        "synonym" => {
            let (text, rest) = parse_quoted(value)?;
            let scope = rest
                .split_whitespace()
                .next()
                .and_then(SynonymScope::parse)
                .unwrap_or(SynonymScope::Related);
            term.synonyms.push(Synonym { text, scope });
        }
        "is_a" => term.is_a.push(TermId::new(first_token(value))),
        "alt_id" => term.alt_ids.push(TermId::new(first_token(value))),
        "xref" => term.xrefs.push(first_token(value).to_string()),
        "is_obsolete" => term.obsolete = strip_comment(value) == "true",
        _ => {}
    }
    Ok(())
}

/// Drop a trailing ` ! comment`.
fn strip_comment(value: &str) -> &str {
    match value.find(" !") {
        Some(pos) => value[..pos].trim(),
        None => value.trim(),
    }
}

fn first_token(value: &str) -> &str {
    strip_comment(value).split_whitespace().next().unwrap_or("")
}

/// Parse a leading `"quoted string"`, returning its unescaped text and the remainder.
fn parse_quoted(value: &str) -> Result<(String, &str)> {
    let body = value
        .strip_prefix('"')
        .ok_or_else(|| anyhow!("expected a quoted string"))?;

    let mut text = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, other)) => text.push(other),
                None => break,
            },
            '"' => return Ok((text, body[i + 1..].trim())),
            _ => text.push(c),
        }
    }
    anyhow::bail!("unterminated quoted string")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"format-version: 1.2
data-version: doid/releases/2024-01-01/doid.obo
ontology: doid

[Term]
id: DOID:4
name: disease
def: "A disease is a \"disposition\" to undergo pathological processes." [url:http://example.org]

[Term]
id: DOID:820
name: myocarditis
synonym: "inflammation of heart muscle" EXACT []
is_a: DOID:4 ! disease
alt_id: DOID:9999
xref: UMLS_CUI:C0027059

[Typedef]
id: part_of
name: part of

[Term]
id: DOID:1
name: obsolete thing
is_obsolete: true
"#;

    #[test]
    fn test_parse_sample() {
        let onto = parse(SAMPLE).unwrap();
        assert_eq!(onto.len(), 3);
        assert_eq!(onto.data_version(), Some("doid/releases/2024-01-01/doid.obo"));

        let disease = onto.get("DOID:4").unwrap();
        assert_eq!(
            disease.definition.as_deref(),
            Some("A disease is a \"disposition\" to undergo pathological processes.")
        );

        let myo = onto.get("DOID:820").unwrap();
        assert_eq!(myo.is_a, vec![TermId::new("DOID:4")]);
        assert_eq!(myo.synonyms[0].scope, SynonymScope::Exact);
        assert_eq!(myo.xrefs, vec!["UMLS_CUI:C0027059".to_string()]);

        assert!(onto.get("DOID:1").unwrap().obsolete);
        assert!(onto.get("part_of").is_none());
    }

    #[test]
    fn test_alt_id_resolves() {
        let onto = parse(SAMPLE).unwrap();
        assert_eq!(onto.get("DOID:9999").unwrap().id.as_str(), "DOID:820");
    }

    #[test]
    fn test_missing_id_is_error() {
        let err = parse("[Term]\nname: nameless\n").unwrap_err();
        assert!(err.to_string().contains("no id"));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = parse("format-version: 1.2\n\n[Term]\nid: X:1\nthis line has no colon\n").unwrap_err();
        assert!(err.to_string().contains("line 5"));
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(parse_quoted("\"never closes").is_err());
    }
}
