//! Request-parameter integration tests.

use djq_compiler::RequestFilters;
use djq_tests::prelude::*;
use pretty_assertions::assert_eq;

mod query_string {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("query_string")
            .root("Post")
            .step(
                "filter_order_and_ignore_pagination",
                Action::params([
                    ("blog__name__icontains", "ENG"),
                    ("order_by", "-views"),
                    ("limit", "1"),
                    ("offset", "1"),
                ]),
                |a| a.joins(1).sort_keys(1).ordered_ids([1, 2]),
            )
            .step("reset_bool", Action::Reset, |a| a.rows(5))
            .step(
                "capitalized_false",
                Action::params([("published", "False")]),
                |a| a.ids([3]),
            )
            .step("reset_in", Action::Reset, |a| a.rows(5))
            .step("comma_in", Action::params([("id__in", "1,4")]), |a| {
                a.ids([1, 4])
            })
            .step("reset_range", Action::Reset, |a| a.rows(5))
            .step(
                "comma_range",
                Action::params([("views__range", "5,45")]),
                |a| a.ids([2, 4]),
            )
            .step("reset_none", Action::Reset, |a| a.rows(5))
            .step("none_is_null", Action::params([("body", "None")]), |a| {
                a.ids([3, 5])
            })
            .step("reset_order_list", Action::Reset, |a| a.rows(5))
            .step(
                "order_list",
                Action::params([("order_by", "blog__name, -views")]),
                |a| a.sort_keys(2).ordered_ids([3, 4, 5, 1, 2]),
            )
    }

    #[test]
    fn test_query_string_filters() {
        scenario().run().unwrap();
    }
}

mod literal_text {
    use super::*;

    /// Comments: 1 "great", 2 "nice", 3 "meh", 4 "True", 5 "none of it".
    pub fn scenario() -> Scenario {
        Scenario::new("literal_text")
            .root("Comment")
            .step("true_on_text_column", Action::params([("text", "True")]), |a| {
                a.ids([4])
            })
            .step("reset_contains", Action::Reset, |a| a.rows(5))
            .step(
                "contains_keeps_spelling",
                Action::params([("text__contains", "True")]),
                |a| a.ids([4]),
            )
            .step("reset_icontains", Action::Reset, |a| a.rows(5))
            .step(
                "icontains_none_is_text",
                Action::params([("text__icontains", "none")]),
                |a| a.ids([5]),
            )
            .step("reset_null", Action::Reset, |a| a.rows(5))
            .step("equality_none_is_null", Action::params([("text", "None")]), |a| {
                a.empty()
            })
    }

    #[test]
    fn test_text_parameters_keep_their_spelling() {
        scenario().run().unwrap();
    }
}

mod allow_list {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("allow_list")
            .root("Post")
            .step(
                "allowed_field_with_operator",
                Action::params([("title__icontains", "on")]).allowing(["title"]),
                |a| a.ids([3]),
            )
            .step(
                "forbidden_field",
                Action::params([("author__name", "bob")]).allowing(["title"]),
                |a| a.error("Filtering on 'author__name' is not allowed").status(400),
            )
            .step(
                "ordering_is_not_filtered",
                Action::params([("order_by", "-id")]).allowing(["title"]),
                |a| a.ordered_ids([3]),
            )
    }

    #[test]
    fn test_allow_list() {
        scenario().run().unwrap();
    }
}

mod bad_params {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("bad_params")
            .root("Post")
            .step(
                "single_range_bound",
                Action::params([("views__range", "5")]),
                |a| a.error("two comma-separated bounds").status(400),
            )
            .step(
                "non_numeric_in",
                Action::params([("id__in", "1,two")]),
                |a| a.error("type Int").status(400),
            )
            .step("unknown_field", Action::params([("colour", "red")]), |a| {
                a.error("no field named 'colour' on Post").status(400)
            })
    }

    #[test]
    fn test_bad_params_are_client_errors() {
        scenario().run().unwrap();
    }
}

// ========== TEST: parsed filters feed the compiler ==========
#[test]
fn test_parse_then_apply() {
    // GIVEN parsed request parameters
    let fixture = BlogFixture::load().unwrap();
    let compiler = fixture.compiler();
    let filters = RequestFilters::parse(
        [("author__name", "alice"), ("order_by", "-pub_date")],
        None,
    )
    .unwrap();

    // WHEN applying them to a Post query
    let query = compiler
        .apply(&fixture.query("Post").unwrap(), &filters)
        .unwrap();
    let rows = fixture.backend().fetch(&query).unwrap();

    // THEN alice's posts come back newest first
    assert_eq!(ids(&rows), vec![4, 1]);
}
