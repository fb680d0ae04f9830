//! Round-trip suites: parse, format, parse again, compare trees.

mod common;

use common::{assert_round_trip, assert_round_trip_as, read_fixture};
use sparqlfmt::cli::discover_sparql_files;
use sparqlfmt::{
    format, parse_query, parse_update, round_trip, Dialect, DialectChoice, ErrorType,
};

// ============================================================================
// QUERY FORMS
// ============================================================================

#[test]
fn simple_select_has_canonical_layout() {
    let text = "SELECT ?title WHERE { <http://example.org/book/book1> <http://purl.org/dc/elements/1.1/title> ?title . }";
    assert_eq!(
        assert_round_trip(text),
        "SELECT ?title\nWHERE {\n  <http://example.org/book/book1> <http://purl.org/dc/elements/1.1/title> ?title .\n}\n"
    );
}

#[test]
fn select_with_prefixes_and_filters() {
    assert_round_trip(
        r#"PREFIX foaf: <http://xmlns.com/foaf/0.1/>
SELECT ?name ?mbox
WHERE { ?x foaf:name ?name . ?x foaf:mbox ?mbox
        FILTER regex(?name, "^Al", "i") }"#,
    );
    assert_round_trip(
        r#"PREFIX dc: <http://purl.org/dc/elements/1.1/>
PREFIX ns: <http://example.org/ns#>
SELECT ?title ?price
WHERE { ?x ns:price ?price . FILTER (?price < 30.5) ?x dc:title ?title . }"#,
    );
}

#[test]
fn optional_union_minus_and_exists() {
    assert_round_trip(
        r#"PREFIX foaf: <http://xmlns.com/foaf/0.1/>
SELECT ?name ?mbox
WHERE { ?x foaf:name ?name .
        OPTIONAL { ?x foaf:mbox ?mbox . FILTER (bound(?mbox)) }
        { ?x foaf:nick ?n } UNION { ?x foaf:givenName ?n } UNION { ?x foaf:surname ?n }
        MINUS { ?x foaf:age ?age }
        FILTER NOT EXISTS { ?x foaf:blocked true }
        FILTER EXISTS { ?x ?p ?o } }"#,
    );
}

#[test]
fn aggregates_and_solution_modifiers() {
    assert_round_trip(
        r#"PREFIX : <http://books.example/>
SELECT ?org (SUM(?lprice) AS ?totalPrice) (COUNT(DISTINCT *) AS ?n)
       (GROUP_CONCAT(DISTINCT ?auth ; separator=", ") AS ?authors)
WHERE { ?org :affiliates ?auth . ?auth :writesBook ?book . ?book :price ?lprice . }
GROUP BY ?org (LCASE(?auth) AS ?key) STR(?org)
HAVING (SUM(?lprice) > 10) (AVG(DISTINCT ?lprice) < 100)
ORDER BY DESC(?totalPrice) ASC(?org) ?n
LIMIT 5 OFFSET 10"#,
    );
    assert_round_trip("SELECT (MIN(?x) AS ?m) (SAMPLE(DISTINCT ?y) AS ?s) { } OFFSET 3 LIMIT 1");
}

#[test]
fn sub_selects_and_binds() {
    assert_round_trip(
        r#"PREFIX : <http://people.example/>
SELECT ?y ?minName
WHERE {
  :alice :knows ?y .
  { SELECT ?y (MIN(?name) AS ?minName) WHERE { ?y :name ?name . } GROUP BY ?y }
  BIND (CONCAT(?G, " ", ?S) AS ?name)
  BIND (IF(?x > 2, "big", "small") AS ?size)
}"#,
    );
}

#[test]
fn construct_ask_describe() {
    assert_round_trip(
        r#"PREFIX vcard: <http://www.w3.org/2001/vcard-rdf/3.0#>
PREFIX foaf: <http://xmlns.com/foaf/0.1/>
CONSTRUCT { ?x vcard:N _:v . _:v vcard:givenName ?gname ; vcard:familyName ?fname }
FROM <http://example.org/foaf/aliceFoaf>
WHERE { { ?x foaf:firstname ?gname } UNION { ?x foaf:givenname ?gname } }"#,
    );
    assert_round_trip("CONSTRUCT WHERE { ?s ?p ?o }");
    assert_round_trip("CONSTRUCT { } WHERE { }");
    assert_round_trip(r#"PREFIX foaf: <http://xmlns.com/foaf/0.1/> ASK { ?x foaf:name "Alice" }"#);
    assert_round_trip("ASK FROM <http://g> FROM NAMED <http://h> { GRAPH ?g { ?s ?p ?o } }");
    assert_round_trip("DESCRIBE ?x WHERE { ?x <http://xmlns.com/foaf/0.1/mbox> <mailto:alice@org> }");
    assert_round_trip("DESCRIBE *");
    assert_round_trip("BASE <http://example.org/> DESCRIBE <book1> <book2>");
}

#[test]
fn service_and_named_graphs() {
    assert_round_trip(
        r#"SELECT ?name FROM NAMED <http://a> FROM NAMED <http://b>
WHERE { GRAPH <http://a> { ?x <http://p> ?y }
        SERVICE SILENT <http://people.example.org/sparql> { ?y <http://q> ?name } }"#,
    );
}

// ============================================================================
// VALUES
// ============================================================================

#[test]
fn values_keeps_every_row() {
    let formatted = assert_round_trip("SELECT ?x { } VALUES (?x ?y) { (1 2) () (UNDEF <a>) }");
    assert_eq!(
        formatted,
        "SELECT ?x\n{}\nVALUES (?x ?y) {\n  (1 2)\n  ()\n  (UNDEF <a>)\n}\n"
    );
}

#[test]
fn values_shapes() {
    assert_round_trip("SELECT * { VALUES ?x { } }");
    assert_round_trip("SELECT * { VALUES ?x { 1 \"a\"@en <b> UNDEF true -2.5 } }");
    assert_round_trip("SELECT * { VALUES () { } }");
    assert_round_trip("SELECT * { VALUES () { () () () } }");
    assert_round_trip("SELECT * { VALUES (?a) { (1) ( ) } } VALUES ?b { 2 }");
    assert_round_trip(&read_fixture("values.rq"));
}

#[test]
fn values_rows_survive_as_tree_children() {
    let tree = parse_query("ASK { VALUES () { () () } }").unwrap();
    let nils = tree
        .tokens()
        .filter(|t| t.rule == sparqlfmt::Rule::NIL)
        .count();
    assert_eq!(nils, 3);
    let formatted = format("ASK { VALUES () { () () } }", DialectChoice::Query).unwrap();
    assert_eq!(formatted.matches("()").count(), 3);
}

// ============================================================================
// LITERALS AND TERMS
// ============================================================================

#[test]
fn literals_are_preserved_verbatim() {
    assert_round_trip(
        r#"SELECT * WHERE {
  ?s ?p "chat"@fr , "xyz"^^<http://example.org/datatype#specialDatatype> , "abc"^^<http://www.w3.org/2001/XMLSchema#string> .
  ?s ?q 'single' , "esc\"aped\n\t\\" , "ét\U0001F600" .
  ?s ?r '''long
string with "quotes"''' , """another
one""" .
  ?s ?n 1 , 1.5 , .5 , 1.0e3 , 2E-7 , -7 , +3 , -.25 , true , false .
  ?s ?b _:b0 , [] , [ ] , ( ) , () .
}"#,
    );
}

#[test]
fn prefixed_names_and_variables() {
    assert_round_trip(
        r#"PREFIX : <http://e/> PREFIX ex.a: <http://x/>
SELECT $v ?w { :a ex.a:b\.c :d%20e . ?v a :C . $w :p:q ?v }"#,
    );
}

#[test]
fn collections_and_blank_node_property_lists() {
    assert_round_trip("SELECT * { (1 ?x (2 [ <p> 3 ])) <q> ?o . [ <r> ?s ; <t> ( ) ] }");
    assert_round_trip(
        "INSERT DATA { [ <http://p> 1 ; <http://q> [ <http://r> 2 ] ] <http://s> ( 1 2 3 ) }",
    );
}

// ============================================================================
// PATHS
// ============================================================================

#[test]
fn property_paths() {
    assert_round_trip(&read_fixture("paths.sparql"));
    assert_round_trip("SELECT * { ?s <a>|<b>/^<c>* ?o . ?s !<d> ?o . ?s !^<e> ?o . ?s !() ?o }");
    assert_round_trip("SELECT * { ?s (a/(<p>|<q>)+)? ?o ; ?v ?w }");
}

#[test]
fn path_modifier_before_variable() {
    let formatted = assert_round_trip("SELECT * { ?s <p>? ?o . ?s <q> ?o }");
    assert!(formatted.contains("<p>? ?o"));
    assert!(formatted.contains("<q> ?o"));
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[test]
fn arithmetic_and_signs() {
    assert_round_trip("SELECT (?a -5 AS ?x) (?a - 5 AS ?y) (- 5 AS ?z) (-5 AS ?w) { }");
    assert_round_trip("SELECT (?a+1 AS ?x) (?a + +1 AS ?y) (?a * -2 / +3 AS ?z) (-?a AS ?n) (!?b AS ?m) { }");
    assert_round_trip("SELECT (?a -5 * 2 + 3 AS ?x) (1 - -1 AS ?y) { }");
}

#[test]
fn comparisons_and_logic() {
    assert_round_trip(
        "ASK { FILTER(?a<?b&&?b<=3||?c!=?d&&!(?e>=?f)) FILTER(?x IN (1, 2)) FILTER(?y NOT IN ()) FILTER(?z = <http://x>) }",
    );
}

#[test]
fn function_calls() {
    assert_round_trip(
        r#"SELECT * { FILTER(STRSTARTS(STR(?x), "a") && langMatches(lang(?l), "en"))
FILTER(REGEX(?s, "^x", "i") || REPLACE(?s, "a", "b", "i") = SUBSTR(?s, 1, 2))
FILTER(<http://f>(DISTINCT ?a, ?b) && <http://g>() && isIRI(?x))
BIND(NOW() AS ?t) BIND(BNODE() AS ?b1) BIND(BNODE("x") AS ?b2) BIND(COALESCE() AS ?c)
BIND(CONCAT(?a, ?b, "c") AS ?d) BIND(STRUUID( ) AS ?u) BIND(SHA256(?x) AS ?h) }"#,
    );
}

// ============================================================================
// UPDATES
// ============================================================================

#[test]
fn updates_across_two_graphs() {
    let formatted = assert_round_trip(
        r#"PREFIX dc: <http://purl.org/dc/elements/1.1/>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
INSERT { GRAPH <http://example/bookStore2> { ?book ?p ?v } }
WHERE { GRAPH <http://example/bookStore> { ?book dc:date ?date .
          FILTER ( ?date > "1970-01-01T00:00:00-02:00"^^xsd:dateTime )
          ?book ?p ?v } } ;
WITH <http://example/bookStore>
DELETE { ?book ?p ?v }
WHERE { ?book dc:date ?date ; dc:type dc:PhysicalObject .
        FILTER ( ?date < "2000-01-01T00:00:00-02:00"^^xsd:dateTime )
        ?book ?p ?v }"#,
    );
    assert!(formatted.contains("} ;\nWITH <http://example/bookStore>\n"));
}

#[test]
fn data_operations() {
    assert_round_trip(
        r#"PREFIX dc: <http://purl.org/dc/elements/1.1/>
INSERT DATA { <http://example/book1> dc:title "A new book" ; dc:creator "A.N.Other" . }"#,
    );
    assert_round_trip(
        r#"PREFIX ns: <http://example.org/ns#>
INSERT DATA { GRAPH <http://example/bookStore> { <http://example/book1> ns:price 42 } }"#,
    );
    assert_round_trip(
        "DELETE DATA { <http://a> <http://b> 'c' . GRAPH <http://g> { } <http://d> <http://e> 1 }",
    );
    assert_round_trip(
        "PREFIX foaf: <http://xmlns.com/foaf/0.1/> DELETE WHERE { ?person foaf:givenName 'Fred'; ?property ?value }",
    );
    assert_round_trip(&read_fixture("addresses.ru"));
}

#[test]
fn graph_management_operations() {
    let formatted = assert_round_trip(
        "LOAD SILENT <http://example.org/faraway> ; CLEAR DEFAULT ; DROP NAMED ; CREATE SILENT GRAPH <http://g> ; \
         ADD <http://a> TO DEFAULT ; MOVE GRAPH <http://a> TO <http://b> ; COPY DEFAULT TO GRAPH <http://c> ;",
    );
    assert_eq!(formatted.lines().count(), 7);
    assert!(formatted.ends_with("COPY DEFAULT TO GRAPH <http://c> ;\n"));
}

#[test]
fn empty_update_formats_to_nothing() {
    assert_eq!(assert_round_trip_as("", Dialect::Update), "");
    assert_eq!(assert_round_trip_as("# only a comment\n", Dialect::Update), "");
    assert_eq!(
        assert_round_trip_as("PREFIX x: <http://x/>", Dialect::Update),
        "PREFIX x: <http://x/>\n"
    );
}

#[test]
fn using_clauses() {
    assert_round_trip(
        "DELETE { ?s ?p ?o } INSERT { ?s ?p 1 } USING <http://u> USING NAMED <http://n> WHERE { GRAPH ?g { ?s ?p ?o } }",
    );
    assert_round_trip("INSERT { ?s <http://p> 2 } WHERE { ?s <http://p> 1 }");
}

// ============================================================================
// DIALECTS
// ============================================================================

#[test]
fn update_text_is_not_a_query() {
    let text = "LOAD <http://example.org/x> INTO GRAPH <http://example.org/y>";
    let err = parse_query(text).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Syntax);
    assert!(parse_update(text).is_ok());
    let formatted = format(text, DialectChoice::TryBoth).unwrap();
    assert_eq!(formatted, format!("{text}\n"));
}

#[test]
fn output_does_not_depend_on_the_selection_strategy() {
    let cases = [
        ("SELECT*{?s ?p ?o}", Dialect::Query),
        ("DELETE WHERE{?s ?p ?o}", Dialect::Update),
        ("ASK{?s <http://drop> ?o}", Dialect::Query),
    ];
    for (text, dialect) in cases {
        let explicit = format(text, dialect.into()).unwrap();
        assert_eq!(format(text, DialectChoice::Guess).unwrap(), explicit);
        assert_eq!(format(text, DialectChoice::TryBoth).unwrap(), explicit);
    }
}

#[test]
fn formatting_is_deterministic() {
    let text = read_fixture("books.rq");
    let first = format(&text, DialectChoice::Guess).unwrap();
    for _ in 0..5 {
        assert_eq!(format(&text, DialectChoice::Guess).unwrap(), first);
    }
    assert_eq!(first, read_fixture("books.expected"));
}

#[test]
fn round_trip_report() {
    let trip = round_trip("CLEAR ALL", DialectChoice::Guess).unwrap();
    assert_eq!(trip.dialect, Dialect::Update);
    assert!(trip.is_equal());
    assert_eq!(trip.formatted, "CLEAR ALL\n");
}

#[test]
fn every_fixture_round_trips() {
    let files = discover_sparql_files(common::fixture(""));
    assert!(files.len() >= 4, "found {files:?}");
    for file in files {
        let text = std::fs::read_to_string(&file).unwrap();
        assert_round_trip(&text);
    }
}
