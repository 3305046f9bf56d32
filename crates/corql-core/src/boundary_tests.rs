use serde_json::json;

use crate::{Boundary, Distance};

#[test]
fn range_rejects_inverted_bounds() {
    assert!(Boundary::range(3, 2).is_none());
    assert_eq!(Boundary::range(2, 2), Some(Boundary::exact(2)));
}

#[test]
fn unbounded_max_is_omitted() {
    let boundary = Boundary::at_least(0);
    assert!(boundary.is_unbounded());
    assert_eq!(
        serde_json::to_value(boundary).unwrap(),
        json!({"@type": "boundary", "min": 0})
    );
}

#[test]
fn distance_shape() {
    let distance = Distance::words(Boundary::range(2, 3).unwrap());
    assert_eq!(
        serde_json::to_value(&distance).unwrap(),
        json!({
            "@type": "distance",
            "key": "w",
            "boundary": {"@type": "boundary", "min": 2, "max": 3}
        })
    );
}

#[test]
fn display() {
    insta::assert_snapshot!(Boundary::exact(1).to_string(), @"1..1");
    insta::assert_snapshot!(Boundary::at_least(0).to_string(), @"0..");
    insta::assert_snapshot!(Distance::new("s", Boundary::exact(0)).to_string(), @"s:0..0");
}
