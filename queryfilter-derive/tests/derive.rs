//! Compile-time checks for `#[derive(Reflect)]`.

#[test]
fn ui() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/ui/enum.rs");
    t.compile_fail("tests/ui/tuple_struct.rs");
    t.compile_fail("tests/ui/duplicate_tag_key.rs");
    t.compile_fail("tests/ui/non_string_tag.rs");
    t.pass("tests/ui/generics_and_unit.rs");
}
