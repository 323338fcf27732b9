#![allow(dead_code)]

use queryfilter::Reflect;

#[derive(Reflect)]
struct Pair(i32, i32);

fn main() {}
