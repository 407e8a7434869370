//! The blog fixture shared by every scenario.
//!
//! Schema:
//!
//! ```text
//! Author(id, name, email?)
//! Blog(id, name, owner_id?)        Blog.owner    -> Author   (Author.blogs)
//! Post(id, blog_id, author_id?,    Post.blog     -> Blog     (Blog.posts)
//!      title, body?, views,        Post.author   -> Author   (Author.posts)
//!      rating?, published,
//!      pub_date, created_at)
//! Comment(id, post_id, text)       Comment.post  -> Post     (Post.comments)
//! ```

use chrono::NaiveDate;
use djq_compiler::Compiler;
use djq_core::{attrs, EntityTypeId, Value, ValueType};
use djq_query::{MemoryBackend, Query};
use djq_registry::{AttrDef, Registry, RegistryBuilder, RegistryError};
use djq_store::Store;

use crate::error::{ExampleError, ExampleResult};

/// Build the fixture schema.
pub fn blog_schema() -> Result<Registry, RegistryError> {
    let mut builder = RegistryBuilder::new();

    builder
        .add_entity("Author")
        .attr(AttrDef::new("id", ValueType::Int).primary_key())
        .attr(AttrDef::new("name", ValueType::String))
        .attr(AttrDef::new("email", ValueType::String).nullable())
        .done()?;

    builder
        .add_entity("Blog")
        .attr(AttrDef::new("id", ValueType::Int).primary_key())
        .attr(AttrDef::new("name", ValueType::String))
        .attr(AttrDef::new("owner_id", ValueType::Int).nullable())
        .done()?;

    builder
        .add_entity("Post")
        .attr(AttrDef::new("id", ValueType::Int).primary_key())
        .attr(AttrDef::new("blog_id", ValueType::Int))
        .attr(AttrDef::new("author_id", ValueType::Int).nullable())
        .attr(AttrDef::new("title", ValueType::String))
        .attr(AttrDef::new("body", ValueType::String).nullable())
        .attr(AttrDef::new("views", ValueType::Int))
        .attr(AttrDef::new("rating", ValueType::Float).nullable())
        .attr(AttrDef::new("published", ValueType::Bool))
        .attr(AttrDef::new("pub_date", ValueType::Date))
        .attr(AttrDef::new("created_at", ValueType::Timestamp))
        .done()?;

    builder
        .add_entity("Comment")
        .attr(AttrDef::new("id", ValueType::Int).primary_key())
        .attr(AttrDef::new("post_id", ValueType::Int))
        .attr(AttrDef::new("text", ValueType::String))
        .done()?;

    builder
        .add_relation("Blog", "owner", "Author")
        .to_one("owner_id", "id")
        .backref("blogs")
        .done()?;
    builder
        .add_relation("Post", "blog", "Blog")
        .to_one("blog_id", "id")
        .backref("posts")
        .done()?;
    builder
        .add_relation("Post", "author", "Author")
        .to_one("author_id", "id")
        .backref("posts")
        .done()?;
    builder
        .add_relation("Comment", "post", "Post")
        .to_one("post_id", "id")
        .backref("comments")
        .done()?;

    builder.build()
}

fn date(y: i32, m: u32, d: u32) -> Value {
    NaiveDate::from_ymd_opt(y, m, d).map_or(Value::Null, Value::Date)
}

/// Schema plus seeded rows.
pub struct BlogFixture {
    pub registry: Registry,
    pub store: Store,
}

impl BlogFixture {
    /// Build the schema and seed the store.
    ///
    /// | post | blog          | author | title                     | views | published | pub_date   |
    /// |------|---------------|--------|---------------------------|-------|-----------|------------|
    /// | 1    | engineering   | alice  | Rust 2008 retrospective   | 120   | true      | 2008-03-14 |
    /// | 2    | engineering   | bob    | 100% uptime               | 45    | true      | 2010-07-01 |
    /// | 3    | Essays        | bob    | On writing                | 300   | false     | 2008-11-30 |
    /// | 4    | Essays        | alice  | 1000 users                | 5     | true      | 2012-01-05 |
    /// | 5    | cooking       | -      | Brisket_basics            | 0     | true      | 2011-07-04 |
    ///
    /// Comments: 1 "great" and 2 "nice" on post 1, 3 "meh" on post 3,
    /// 4 "True" and 5 "none of it" on post 4.
    pub fn load() -> ExampleResult<Self> {
        let registry = blog_schema()?;
        let id = |name: &str| {
            registry
                .get_entity_id(name)
                .ok_or_else(|| ExampleError::unknown_entity(name))
        };
        let (author, blog, post, comment) = (id("Author")?, id("Blog")?, id("Post")?, id("Comment")?);

        let mut store = Store::new();

        store.insert(author, attrs! { "id" => 1i64, "name" => "alice", "email" => "alice@example.com" });
        store.insert(author, attrs! { "id" => 2i64, "name" => "bob", "email" => Value::Null });

        store.insert(blog, attrs! { "id" => 1i64, "name" => "engineering", "owner_id" => 1i64 });
        store.insert(blog, attrs! { "id" => 2i64, "name" => "Essays", "owner_id" => 2i64 });
        store.insert(blog, attrs! { "id" => 3i64, "name" => "cooking", "owner_id" => Value::Null });

        let posts = [
            (1i64, 1i64, Value::Int(1), "Rust 2008 retrospective", Value::from("Looking back"), 120i64, Value::Float(4.5), true, date(2008, 3, 14), 1_205_452_800_000i64),
            (2, 1, Value::Int(2), "100% uptime", Value::from("Mostly"), 45, Value::Float(3.0), true, date(2010, 7, 1), 1_277_942_400_000),
            (3, 2, Value::Int(2), "On writing", Value::Null, 300, Value::Null, false, date(2008, 11, 30), 1_228_003_200_000),
            (4, 2, Value::Int(1), "1000 users", Value::from("A milestone"), 5, Value::Float(4.0), true, date(2012, 1, 5), 1_325_721_600_000),
            (5, 3, Value::Null, "Brisket_basics", Value::Null, 0, Value::Null, true, date(2011, 7, 4), 1_309_737_600_000),
        ];
        for (pid, blog_id, author_id, title, body, views, rating, published, pub_date, created_at) in posts {
            store.insert(
                post,
                attrs! {
                    "id" => pid,
                    "blog_id" => blog_id,
                    "author_id" => author_id,
                    "title" => title,
                    "body" => body,
                    "views" => views,
                    "rating" => rating,
                    "published" => published,
                    "pub_date" => pub_date,
                    "created_at" => Value::Timestamp(created_at),
                },
            );
        }

        store.insert(comment, attrs! { "id" => 1i64, "post_id" => 1i64, "text" => "great" });
        store.insert(comment, attrs! { "id" => 2i64, "post_id" => 1i64, "text" => "nice" });
        store.insert(comment, attrs! { "id" => 3i64, "post_id" => 3i64, "text" => "meh" });
        store.insert(comment, attrs! { "id" => 4i64, "post_id" => 4i64, "text" => "True" });
        store.insert(comment, attrs! { "id" => 5i64, "post_id" => 4i64, "text" => "none of it" });

        Ok(Self { registry, store })
    }

    pub fn entity(&self, name: &str) -> ExampleResult<EntityTypeId> {
        self.registry
            .get_entity_id(name)
            .ok_or_else(|| ExampleError::unknown_entity(name))
    }

    /// A query selecting every row of `entity`.
    pub fn query(&self, entity: &str) -> ExampleResult<Query> {
        Ok(Query::new(self.entity(entity)?))
    }

    pub fn compiler(&self) -> Compiler<&Registry> {
        Compiler::new(&self.registry)
    }

    pub fn backend(&self) -> MemoryBackend<'_, '_> {
        MemoryBackend::new(&self.registry, &self.store)
    }
}

/// The integer primary keys of `rows`, in order.
pub fn ids(rows: &[djq_core::Row]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| row.get_attr("id").and_then(Value::as_int))
        .collect()
}
