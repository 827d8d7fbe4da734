// Ontology data model — terms, identifiers, and subclass traversal.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Base for OBO Foundry permanent URLs.
pub const OBO_PURL_BASE: &str = "http://purl.obolibrary.org/obo/";

/// A prefixed term identifier such as `DOID:0050117`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(String);

impl TermId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Permanent URL for the term: `DOID:820` → `http://purl.obolibrary.org/obo/DOID_820`.
    pub fn iri(&self) -> String {
        format!("{}{}", OBO_PURL_BASE, self.0.replacen(':', "_", 1))
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Synonym scope as declared in OBO files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynonymScope {
    Exact,
    Broad,
    Narrow,
    Related,
}

impl SynonymScope {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EXACT" => Some(Self::Exact),
            "BROAD" => Some(Self::Broad),
            "NARROW" => Some(Self::Narrow),
            "RELATED" => Some(Self::Related),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub text: String,
    pub scope: SynonymScope,
}

/// A single ontology term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    /// Some terms (mostly obsolete stubs) carry no name
    pub name: Option<String>,
    pub definition: Option<String>,
    pub namespace: Option<String>,
    pub synonyms: Vec<Synonym>,
    /// Direct superclasses
    pub is_a: Vec<TermId>,
    pub alt_ids: Vec<TermId>,
    pub xrefs: Vec<String>,
    pub obsolete: bool,
}

impl Term {
    pub fn new(id: TermId) -> Self {
        Self {
            id,
            name: None,
            definition: None,
            namespace: None,
            synonyms: Vec::new(),
            is_a: Vec::new(),
            alt_ids: Vec::new(),
            xrefs: Vec::new(),
            obsolete: false,
        }
    }
}

/// A parsed ontology with lookup and hierarchy indexes.
#[derive(Debug, Clone)]
pub struct Ontology {
    header: Vec<(String, String)>,
    terms: Vec<Term>,
    /// Primary and alternative ids → position in `terms`
    index: HashMap<TermId, usize>,
    /// Direct subclasses per term, in file order
    children: Vec<Vec<usize>>,
    /// Direct superclasses per term that resolve to known terms
    parents: Vec<Vec<usize>>,
}

impl Ontology {
    /// Build the indexes over a list of terms.
    ///
    /// Duplicate ids keep the first occurrence. `is_a` references to
    /// unknown terms are kept on the term but left out of the hierarchy.
    pub fn new(header: Vec<(String, String)>, terms: Vec<Term>) -> Self {
        let mut kept: Vec<Term> = Vec::with_capacity(terms.len());
        let mut index = HashMap::new();

        for term in terms {
            if index.contains_key(&term.id) {
                warn!(id = %term.id, "Duplicate term id, keeping the first definition");
                continue;
            }
            index.insert(term.id.clone(), kept.len());
            kept.push(term);
        }
        for (i, term) in kept.iter().enumerate() {
            for alt in &term.alt_ids {
                index.entry(alt.clone()).or_insert(i);
            }
        }

        let mut children = vec![Vec::new(); kept.len()];
        let mut parents = vec![Vec::new(); kept.len()];
        let mut dangling = 0usize;
        for (i, term) in kept.iter().enumerate() {
            for parent in &term.is_a {
                match index.get(parent) {
                    Some(&p) => {
                        children[p].push(i);
                        parents[i].push(p);
                    }
                    None => dangling += 1,
                }
            }
        }
        if dangling > 0 {
            debug!(dangling, "Skipped is_a references to unknown terms");
        }

        Self {
            header,
            terms: kept,
            index,
            children,
            parents,
        }
    }

    /// Look up a term by primary or alternative id.
    pub fn get(&self, id: &str) -> Option<&Term> {
        self.index
            .get(&TermId::new(id))
            .map(|&i| &self.terms[i])
    }

    /// All terms in file order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value of a header tag such as `data-version`.
    pub fn header_value(&self, tag: &str) -> Option<&str> {
        self.header
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_str())
    }

    pub fn data_version(&self) -> Option<&str> {
        self.header_value("data-version")
    }

    /// Terms below `id` in the subclass hierarchy.
    ///
    /// `distance` limits how many levels to descend (`Some(1)` = direct
    /// children, `None` = everything). Results are breadth-first, each term
    /// once. Unknown ids are an error.
    pub fn subclasses(
        &self,
        id: &str,
        distance: Option<usize>,
        with_self: bool,
    ) -> Result<Vec<&Term>> {
        self.walk(id, distance, with_self, &self.children)
    }

    /// Terms above `id`, following `is_a` links.
    pub fn superclasses(
        &self,
        id: &str,
        distance: Option<usize>,
        with_self: bool,
    ) -> Result<Vec<&Term>> {
        self.walk(id, distance, with_self, &self.parents)
    }

    fn walk(
        &self,
        id: &str,
        distance: Option<usize>,
        with_self: bool,
        edges: &[Vec<usize>],
    ) -> Result<Vec<&Term>> {
        let Some(&start) = self.index.get(&TermId::new(id)) else {
            anyhow::bail!("Term {id} not found in ontology");
        };

        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        let mut out = Vec::new();
        if with_self {
            out.push(&self.terms[start]);
        }

        while let Some((node, depth)) = queue.pop_front() {
            if distance.is_some_and(|max| depth >= max) {
                continue;
            }
            for &next in &edges[node] {
                if seen.insert(next) {
                    out.push(&self.terms[next]);
                    queue.push_back((next, depth + 1));
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(id: &str, name: &str, parents: &[&str]) -> Term {
        let mut t = Term::new(TermId::new(id));
        t.name = Some(name.to_string());
        t.is_a = parents.iter().map(|p| TermId::new(*p)).collect();
        t
    }

    fn sample() -> Ontology {
        Ontology::new(
            vec![],
            vec![
                term("X:1", "root", &[]),
                term("X:2", "child a", &["X:1"]),
                term("X:3", "child b", &["X:1"]),
                term("X:4", "grandchild", &["X:2", "X:3"]),
            ],
        )
    }

    #[test]
    fn test_iri() {
        assert_eq!(
            TermId::new("DOID:0080600").iri(),
            "http://purl.obolibrary.org/obo/DOID_0080600"
        );
    }

    #[test]
    fn test_direct_children_only() {
        let onto = sample();
        let names: Vec<&str> = onto
            .subclasses("X:1", Some(1), false)
            .unwrap()
            .iter()
            .filter_map(|t| t.name.as_deref())
            .collect();
        assert_eq!(names, vec!["child a", "child b"]);
    }

    #[test]
    fn test_unbounded_descendants_deduplicated() {
        let onto = sample();
        let all = onto.subclasses("X:1", None, true).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].id.as_str(), "X:1");
    }

    #[test]
    fn test_superclasses() {
        let onto = sample();
        let ids: Vec<&str> = onto
            .superclasses("X:4", None, false)
            .unwrap()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["X:2", "X:3", "X:1"]);
    }

    #[test]
    fn test_unknown_id_is_error() {
        assert!(sample().subclasses("X:99", Some(1), false).is_err());
    }
}
