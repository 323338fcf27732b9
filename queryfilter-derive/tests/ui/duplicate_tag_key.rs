#![allow(dead_code)]

use queryfilter::Reflect;

#[derive(Reflect)]
struct Filters {
    #[tag(filter = "age,op=gte", filter = "age,op=gt")]
    min_age: Option<i32>,
}

fn main() {}
