#![allow(dead_code)]

use queryfilter::Reflect;

#[derive(Reflect)]
struct Filters {
    #[tag(filter = 42)]
    min_age: Option<i32>,
}

fn main() {}
