use serde_json::json;

use crate::{CompileOptions, Compiler, Error, Language, ParseNode, Request, Root};

const TITLE_TREE: &str = "(start (expr (constraint (field title) (operator =) (value Baum))))";

fn tree(notation: &str) -> ParseNode {
    ParseNode::parse(notation).unwrap()
}

#[test]
fn language_tags() {
    for language in Language::ALL {
        assert_eq!(language.tag().parse::<Language>().unwrap(), language);
        assert_eq!(language.to_string(), language.tag());
    }
    assert_eq!("AQL".parse::<Language>().unwrap(), Language::Annis);
    assert_eq!("PoliqarpPlus".parse::<Language>().unwrap(), Language::Poliqarp);
    assert_eq!("cosmas2".parse::<Language>().unwrap(), Language::Collection);
}

#[test]
fn unknown_language() {
    let error = "sparql".parse::<Language>().unwrap_err();
    assert!(matches!(&error, Error::UnknownLanguage(tag) if tag == "sparql"));

    let request = Request::from_result(&Err(error));
    assert_eq!(
        request.to_json(),
        json!({ "errors": [[303, "'sparql' is not a supported query language."]] })
    );
}

#[test]
fn compiler_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Compiler>();
}

#[test]
fn options_from_json() {
    let options: CompileOptions = serde_json::from_value(json!({})).unwrap();
    assert_eq!(options, CompileOptions::default());

    let options: CompileOptions =
        serde_json::from_value(json!({ "version": "1.1", "caseSensitive": false })).unwrap();
    assert_eq!(options.version.as_deref(), Some("1.1"));
    assert!(!options.case_sensitive);

    let compiler = Compiler::new(Language::Cql).with_options(options);
    assert!(!compiler.options().case_sensitive);
    assert_eq!(compiler.language(), Language::Cql);
}

#[test]
fn empty_query_is_rejected_before_walking() {
    let output = Compiler::new(Language::Poliqarp).expect_syntax_error("   ", "(query)");
    insta::assert_snapshot!(output, @"error[301]: SRU diagnostic 27: An empty query is unsupported.");
}

#[test]
fn unbalanced_brackets() {
    let poliqarp = Compiler::new(Language::Poliqarp);
    insta::assert_snapshot!(
        poliqarp.expect_syntax_error("[orth=Mann", "(query)"),
        @"error[302]: The query could not be parsed: unbalanced `[`."
    );
    insta::assert_snapshot!(
        poliqarp.expect_syntax_error("[orth=Mann])", "(query)"),
        @"error[302]: The query could not be parsed: unexpected `)`."
    );
    insta::assert_snapshot!(
        poliqarp.expect_syntax_error("{1:[orth=Mann]]", "(query)"),
        @"error[302]: The query could not be parsed: unexpected `]`."
    );
}

#[test]
fn brackets_inside_strings_and_regexes_are_ignored() {
    assert!(super::balance::check(r#"[orth="(" & lemma=/[a-z/]"#, true).is_ok());
    assert!(super::balance::check(r#"#1 > #2 & cat="NP" & /(/"#, true).is_ok());
    assert!(super::balance::check("[tt/p=NN]", true).is_ok());
}

#[test]
fn slashes_are_plain_without_slash_regexes() {
    assert!(super::balance::check("(title =/stem cat)", false).is_ok());
    assert!(super::balance::check("(title =/stem cat)", true).is_err());
    assert!(super::balance::check("(Sonne and/distance<3 Mond", false).is_err());

    assert!(Language::Poliqarp.has_slash_regexes());
    assert!(!Language::Cql.has_slash_regexes());
    assert!(!Language::Fcsql.has_slash_regexes());
}

#[test]
fn supplier_failure_is_a_syntax_error() {
    let fail = |_: &str| Err::<ParseNode, String>("no viable alternative at input ']'".into());

    let error = Compiler::new(Language::Poliqarp)
        .compile("[orth=Mann]", fail)
        .unwrap_err();
    assert!(matches!(error, Error::Syntax(_)));
    insta::assert_snapshot!(
        error.diagnostics().render(),
        @"error[302]: The query could not be parsed: no viable alternative at input ']'"
    );

    let error = Compiler::new(Language::Fcsql)
        .with_version("2.0")
        .compile("[pos=\"NN\"]", fail)
        .unwrap_err();
    insta::assert_snapshot!(
        error.diagnostics().render(),
        @"error[399]: FCS diagnostic 10: no viable alternative at input ']'"
    );
}

#[test]
fn supplier_tree_is_walked() {
    let compiled = Compiler::new(Language::Collection)
        .compile("title = Baum", |_: &str| Ok::<_, String>(tree(TITLE_TREE)))
        .unwrap();
    assert_eq!(compiled.dump(), "doc title=Baum");
}

#[test]
fn semantic_errors_discard_the_result() {
    let error = Compiler::new(Language::Poliqarp)
        .compile_tree(
            "{200:[]}",
            &tree("(query (segment (class { (classId 200) : (segment (token [ ])) })))"),
        )
        .unwrap_err();
    assert!(matches!(error, Error::Semantic(_)));
    assert_eq!(error.diagnostics().codes(), vec![305]);
}

#[test]
fn tree_without_content_is_empty() {
    let error = Compiler::new(Language::Poliqarp)
        .compile_tree("[orth=Mann]", &tree("(query)"))
        .unwrap_err();
    insta::assert_snapshot!(
        error.diagnostics().render(),
        @"error[301]: SRU diagnostic 27: An empty query is unsupported."
    );
}

#[test]
fn request_for_query_languages() {
    let result = Compiler::new(Language::Poliqarp).compile_tree(
        "[base=Haus]",
        &tree("(query (segment (token [ (term (layer base) (termOp =) (key Haus)) ])))"),
    );
    assert!(matches!(result.as_ref().map(|c| c.root()), Ok(Root::Query(_))));

    let request = Request::from_result(&result);
    assert!(request.is_ok());
    assert_eq!(
        request.to_json(),
        json!({
            "query": {
                "@type": "token",
                "wrap": { "@type": "term", "layer": "lemma", "key": "Haus", "match": "eq" }
            }
        })
    );
}

#[test]
fn request_for_filters() {
    let result = Compiler::new(Language::Collection).compile_tree("title = Baum", &tree(TITLE_TREE));
    let request = Request::from_result(&result);
    assert_eq!(
        request.to_json(),
        json!({
            "collection": { "@type": "doc", "key": "title", "value": "Baum", "match": "eq" }
        })
    );
}

#[test]
fn request_carries_warnings() {
    let result = Compiler::new(Language::Collection).compile_tree(
        "pubDate = 2014",
        &tree("(start (expr (constraint (field pubDate) (operator =) (value 2014))))"),
    );
    let request = Request::from_result(&result);
    assert!(request.is_ok());
    assert!(request.query.is_none());
    assert_eq!(request.warnings.len(), 1);
    assert_eq!(request.warnings[0].0, 312);
}

#[test]
fn request_for_errors() {
    let result = Compiler::new(Language::Cql).compile_tree(
        "title = Haus",
        &tree("(cqlQuery (searchClause (index title) (relation (comparitor =)) (term Haus)))"),
    );
    let request = Request::from_result(&result);
    assert!(!request.is_ok());
    assert_eq!(
        request.to_json(),
        json!({ "errors": [[105, "SRU diagnostic 16: Index title is not supported."]] })
    );
}
