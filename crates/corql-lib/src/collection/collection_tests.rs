use crate::{Compiler, Language, ParseNode, Root, shot_error, shot_ir};

fn collection() -> Compiler {
    Compiler::new(Language::Collection)
}

#[test]
fn single_constraint() {
    shot_ir!(collection(), "title = Baum", r#"
        (start (expr (constraint (field title) (operator =) (value Baum))))
    "#, @"doc title=Baum");
}

#[test]
fn result_is_installed_as_collection() {
    let tree =
        ParseNode::parse("(start (expr (constraint (field title) (operator !=) (value Baum))))")
            .unwrap();
    let compiled = collection().compile_tree("title != Baum", &tree).unwrap();

    assert!(matches!(compiled.root(), Root::Collection(_)));
    assert_eq!(compiled.dump(), "doc title!=Baum");
}

#[test]
fn nested_relations() {
    shot_ir!(collection(), "title = Baum & (author = Goethe | author = Schiller)", r#"
        (start (expr (relation
          (expr (constraint (field title) (operator =) (value Baum)))
          (relOp &)
          (expr (relation
            (expr (constraint (field author) (operator =) (value Goethe)))
            (relOp |)
            (expr (constraint (field author) (operator =) (value Schiller))))))))
    "#, @r"
    docGroup and
      doc title=Baum
      docGroup or
        doc author=Goethe
        doc author=Schiller
    ");
}

#[test]
fn value_forms() {
    shot_ir!(collection(), "author = /Goe.*/", r#"
        (start (expr (constraint (field author) (operator =) (value (regex /Goe.*/)))))
    "#, @"doc author=/Goe.*/");

    shot_ir!(collection(), r#"author = "Johann Wolfgang""#, r#"
        (start (expr (constraint (field author) (operator =)
          (value (multiword "\"" Johann Wolfgang "\"")))))
    "#, @"doc author=Johann Wolfgang");

    shot_ir!(collection(), r#"title ~ "Baum""#, r#"
        (start (expr (constraint (field title) (operator ~) (value "\"Baum\""))))
    "#, @"doc title~Baum");
}

#[test]
fn date_operators() {
    shot_ir!(collection(), "pubDate since 1820", r#"
        (start (expr (dateconstraint (field pubDate) (dateOp since) (date 1820))))
    "#, @"doc pubDate>=1820 date");

    shot_ir!(collection(), "pubDate until 1832-03-22", r#"
        (start (expr (dateconstraint (field pubDate) (dateOp until) (date 1832-03-22))))
    "#, @"doc pubDate<=1832-03-22 date");

    shot_ir!(collection(), "pubDate in 1820-05", r#"
        (start (expr (dateconstraint (field pubDate) (dateOp in) (date 1820-05))))
    "#, @"doc pubDate=1820-05 date");
}

#[test]
fn date_like_string_warns() {
    shot_ir!(collection(), "pubDate = 2014-04", r#"
        (start (expr (constraint (field pubDate) (operator =) (value 2014-04))))
    "#, @r"
    doc pubDate=2014-04
    ---
    warning[312]: The collection query contains a value that looks like a date ('2014-04') and an operator that is only defined for strings ('='). The value is interpreted as a string, use a date operator to ensure the value is treated as a date
    ");
}

#[test]
fn out_of_range_month_is_not_date_like() {
    shot_ir!(collection(), "pubDate = 2014-13", r#"
        (start (expr (constraint (field pubDate) (operator =) (value 2014-13))))
    "#, @"doc pubDate=2014-13");
}

#[test]
fn inequation_on_string_value() {
    shot_error!(collection(), "title < Baum", r#"
        (start (expr (constraint (field title) (operator <) (value Baum))))
    "#, @"error[307]: You used an inequation operator with a string value.");

    shot_error!(collection(), "author >= /Goe.*/", r#"
        (start (expr (constraint (field author) (operator >=) (value (regex /Goe.*/)))))
    "#, @"error[307]: You used an inequation operator with a string value.");
}

#[test]
fn one_bad_constraint_discards_the_result() {
    shot_error!(collection(), "title = Baum & title < Baum", r#"
        (start (expr (relation
          (expr (constraint (field title) (operator =) (value Baum)))
          (relOp &)
          (expr (constraint (field title) (operator <) (value Baum))))))
    "#, @"error[307]: You used an inequation operator with a string value.");
}

#[test]
fn invalid_date() {
    shot_error!(collection(), "pubDate since 2014-04-32", r#"
        (start (expr (dateconstraint (field pubDate) (dateOp since) (date 2014-04-32))))
    "#, @"error[307]: '2014-04-32' is not a valid date.");
}

#[test]
fn unknown_operator() {
    shot_error!(collection(), "title == Baum", r#"
        (start (expr (constraint (field title) (operator ==) (value Baum))))
    "#, @"error[308]: Unknown operator '=='.");
}

#[test]
fn date_pattern() {
    assert!(super::is_date("1999"));
    assert!(super::is_date("1999-12"));
    assert!(super::is_date("1999-12-31"));
    assert!(!super::is_date("1999-00-32"));
    assert!(!super::is_date("1999-1"));
    assert!(!super::is_date("Goethe 1999"));
}
