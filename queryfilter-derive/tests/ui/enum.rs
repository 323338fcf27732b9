#![allow(dead_code)]

use queryfilter::Reflect;

#[derive(Reflect)]
enum Mode {
    Fast,
    Slow,
}

fn main() {}
