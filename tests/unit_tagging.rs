// Unit tests for ontology concept tagging.
//
// Uses a small hand-written OBO snapshot with the disease names that occur
// in the autopsy-report sample text.

use lexis::ontology::{Ontology, TermId};
use lexis::tagging::tokenizer::Tokenizer;
use lexis::tagging::{ConceptExtractor, TaggerOptions};

const OBO: &str = "\
[Term]
id: DOID:4
name: disease

[Term]
id: DOID:820
name: myocarditis

[Term]
id: DOID:0080600
name: COVID-19

[Term]
id: DOID:8469
name: influenza
synonym: \"flu\" EXACT []

[Term]
id: DOID:12205
name: dengue disease

[Term]
id: DOID:77777
name: Influenza
is_obsolete: true
";

const SAMPLE: &str = "
Whether this may represent an early manifestation of a viral myocarditis is not certain,
but there was no significant brisk lymphocytic inflammatory infiltrate consistent with the
typical pattern of viral myocarditis...
severe forms of Covid-19. In response to systemic and pulmonary viral infections of H1N1
influenza and dengue, megakaryocytes have been known to respond by overexpressing IFITM3,
";

fn extractor(options: &TaggerOptions) -> ConceptExtractor {
    let ontology = Ontology::parse(OBO).unwrap();
    ConceptExtractor::new(&ontology, options)
}

// ============================================================
// tokenizer
// ============================================================

#[test]
fn tokenizer_keeps_offsets() {
    let text = "Covid-19, (influenza) non-small";
    let tokens = Tokenizer::new().tokenize(text);
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Covid-19", ",", "(", "influenza", ")", "non", "-", "small"]
    );
    for token in &tokens {
        assert_eq!(&text[token.start..token.end], token.text);
    }
    assert!(tokens[1].whitespace_after);
    assert!(!tokens[0].whitespace_after);
}

// ============================================================
// tagging
// ============================================================

#[test]
fn tags_sample_text() {
    let doc = extractor(&TaggerOptions::default()).tag(SAMPLE);

    let found: Vec<(String, &str)> = doc
        .concepts()
        .iter()
        .map(|c| (c.term_id.iri(), c.text.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("http://purl.obolibrary.org/obo/DOID_820".to_string(), "myocarditis"),
            ("http://purl.obolibrary.org/obo/DOID_820".to_string(), "myocarditis"),
            ("http://purl.obolibrary.org/obo/DOID_0080600".to_string(), "Covid-19"),
            ("http://purl.obolibrary.org/obo/DOID_8469".to_string(), "influenza"),
        ]
    );
    for concept in doc.concepts() {
        assert_eq!(concept.label, "DOID");
        assert_eq!(&SAMPLE[concept.start..concept.end], concept.text);
    }
}

#[test]
fn tagging_is_deterministic() {
    let extractor = extractor(&TaggerOptions::default());
    let first = extractor.tag(SAMPLE);
    let second = extractor.tag(SAMPLE);
    assert_eq!(first.concepts(), second.concepts());
    assert_eq!(first.tokens(), second.tokens());

    let rebuilt = self::extractor(&TaggerOptions::default()).tag(SAMPLE);
    assert_eq!(first.concepts(), rebuilt.concepts());
}

#[test]
fn multi_word_match_becomes_one_token() {
    let doc = extractor(&TaggerOptions::default()).tag("Fever from Dengue  Disease today");
    assert_eq!(doc.concepts().len(), 1);

    let concept = &doc.concepts()[0];
    // Span text keeps the source's case and spacing; the id comes from the pattern
    assert_eq!(concept.text, "Dengue  Disease");
    assert_eq!(concept.term_id, TermId::new("DOID:12205"));

    let texts: Vec<&str> = doc.tokens().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Fever", "from", "Dengue  Disease", "today"]);
    assert!(doc.annotation(2).unwrap().merged_concept);
    assert!(!doc.annotation(3).unwrap().is_term);
}

#[test]
fn overlapping_loser_tokens_stay_annotated() {
    let obo = "[Term]\nid: X:1\nname: lung cancer\n\n[Term]\nid: X:2\nname: cancer pain\n";
    let ontology = Ontology::parse(obo).unwrap();
    let extractor = ConceptExtractor::new(&ontology, &TaggerOptions::default());
    let doc = extractor.tag("lung cancer pain");

    assert_eq!(doc.term_ids(), vec![&TermId::new("X:1")]);
    assert_eq!(doc.tokens().len(), 2);

    let pain = doc.annotation(1).unwrap();
    assert!(pain.is_term);
    assert!(!pain.merged_concept);
    assert_eq!(pain.term_id, Some(TermId::new("X:2")));

    let printed: Vec<(&str, &str)> = doc
        .term_tokens()
        .map(|(token, id)| (token.text.as_str(), id.as_str()))
        .collect();
    assert_eq!(printed, vec![("lung cancer", "X:1"), ("pain", "X:2")]);
}

#[test]
fn concept_predicates() {
    let doc = extractor(&TaggerOptions::default()).tag("Influenza and dengue");
    assert!(doc.has_concepts());
    assert!(doc.span_has_concepts(0..1));
    assert!(!doc.span_has_concepts(1..3));
    assert!(!doc.span_has_concepts(5..10));

    let empty = extractor(&TaggerOptions::default()).tag("Nothing to see here.");
    assert!(!empty.has_concepts());
    assert!(empty.concepts().is_empty());
}

#[test]
fn shared_names_keep_every_id() {
    let doc = extractor(&TaggerOptions::default()).tag("influenza");
    let concept = &doc.concepts()[0];
    assert_eq!(concept.term_id.as_str(), "DOID:8469");
    assert_eq!(concept.alternative_ids, vec![TermId::new("DOID:77777")]);

    let options = TaggerOptions {
        skip_obsolete: true,
        ..TaggerOptions::default()
    };
    let doc = extractor(&options).tag("influenza");
    assert!(doc.concepts()[0].alternative_ids.is_empty());
}

#[test]
fn synonyms_are_opt_in() {
    let text = "A mild flu.";
    assert!(!extractor(&TaggerOptions::default()).tag(text).has_concepts());

    let options = TaggerOptions {
        match_synonyms: true,
        ..TaggerOptions::default()
    };
    let doc = extractor(&options).tag(text);
    assert_eq!(doc.concepts()[0].term_id.as_str(), "DOID:8469");
}

#[test]
fn custom_label_is_attached() {
    let options = TaggerOptions {
        label: "DISEASE".to_string(),
        ..TaggerOptions::default()
    };
    let doc = extractor(&options).tag("influenza");
    assert_eq!(doc.concepts()[0].label, "DISEASE");
}
