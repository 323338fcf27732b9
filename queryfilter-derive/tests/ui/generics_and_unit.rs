use std::marker::PhantomData;

use queryfilter::{Reflect, Reflected};

#[derive(Reflect)]
struct Page<T, C> {
    #[tag(filter = "score,op=gte")]
    min_score: Option<T>,
    #[tag(filter = "tags,op=in")]
    tags: Vec<T>,
    cursor: PhantomData<C>,
}

#[derive(Reflect)]
struct NoFilters;

struct NotReflect;

fn main() {
    let page: Page<i32, NotReflect> = Page {
        min_score: Some(3),
        tags: vec![1, 2],
        cursor: PhantomData,
    };
    assert!(matches!(page.reflect(), Reflected::Record(fields) if fields.len() == 3));

    let q = queryfilter::to_sql(&page).unwrap();
    assert_eq!(q.sql, "score >= ? AND tags IN(?,?)");

    assert_eq!(NoFilters.reflect(), Reflected::Record(Vec::new()));
    assert!(queryfilter::to_sql(&NoFilters).unwrap().is_empty());
}
