//! Single-row fetch and eager-load integration tests.

use djq_query::QueryError;
use djq_tests::prelude::*;
use pretty_assertions::assert_eq;

mod get_or_404 {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("get_or_404")
            .root("Post")
            .step(
                "by_primary_key",
                Action::get(lookups! { "id" => 3i64 }),
                |a| a.ids([3]),
            )
            .step(
                "missing",
                Action::get(lookups! { "id" => 99i64 }),
                |a| a.error("not found").status(404),
            )
            .step(
                "ambiguous",
                Action::get(lookups! { "blog__name" => "engineering" }),
                |a| a.error("Multiple rows").status(500),
            )
            .step(
                "malformed",
                Action::get(lookups! { "pk" => 1i64 }),
                |a| a.status(400),
            )
    }

    pub fn scoped() -> Scenario {
        Scenario::new("get_or_404_scoped")
            .root("Post")
            .step(
                "scope_to_blog",
                Action::filter(lookups! { "blog__name" => "Essays" }),
                |a| a.ids([3, 4]),
            )
            .step(
                "outside_scope",
                Action::get(lookups! { "id" => 1i64 }),
                |a| a.status(404),
            )
            .step("inside_scope", Action::get(lookups! { "id" => 4i64 }), |a| {
                a.ids([4])
            })
    }

    #[test]
    fn test_get_or_404() {
        scenario().run().unwrap();
        scoped().run().unwrap();
    }
}

mod select_related {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("select_related")
            .root("Post")
            .step(
                "single_hop",
                Action::select_related(["blog"], Some(1)),
                |a| a.eager_loads(1).joins(0).rows(5),
            )
            .step(
                "repeat_is_noop",
                Action::select_related(["blog"], Some(1)),
                |a| a.eager_loads(1),
            )
            .step(
                "multi_hop",
                Action::select_related(["blog__owner", "author"], None),
                |a| a.eager_loads(3).rows(5),
            )
            .step(
                "attribute_path",
                Action::select_related(["title"], None),
                |a| a.error("relationship expected").status(400),
            )
            .step(
                "bad_depth",
                Action::select_related(["blog"], Some(2)),
                |a| a.error("depth can only be 1").status(400),
            )
    }

    #[test]
    fn test_select_related() {
        scenario().run().unwrap();
    }
}

// ========== TEST: backend helpers ==========
#[test]
fn test_backend_first_one_count() {
    // GIVEN a filtered and ordered query
    let fixture = BlogFixture::load().unwrap();
    let compiler = fixture.compiler();
    let backend = fixture.backend();
    let query = compiler
        .filter_by(
            &fixture.query("Post").unwrap(),
            &lookups! { "published" => true },
        )
        .unwrap();
    let query = compiler.order_by(&query, &["-views"]).unwrap();

    // WHEN using the single-row helpers
    let first = backend.first(&query).unwrap().unwrap();
    let count = backend.count(&query.clone().with_limit(1)).unwrap();
    let one = backend.one(&query);

    // THEN first is the most viewed, count ignores the slice, one refuses many rows
    assert_eq!(first.get_attr("id"), Some(&Value::Int(1)));
    assert_eq!(count, 4);
    assert!(matches!(
        one,
        Err(QueryError::MultipleResults { count: 4 })
    ));
}
