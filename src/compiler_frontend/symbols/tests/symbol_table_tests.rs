use crate::compiler_frontend::ast::ast_nodes::{Parameter, VariableDeclaration};
use crate::compiler_frontend::compiler_errors::{ErrorMetaDataKey, ErrorType};
use crate::compiler_frontend::symbols::symbol_table::SymbolTable;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;

fn scalar(name: &str) -> VariableDeclaration {
    VariableDeclaration {
        name: name.to_string(),
        array_size: None,
        location: TextLocation::new_just_line(1),
    }
}

fn array(name: &str, size: &str) -> VariableDeclaration {
    VariableDeclaration {
        name: name.to_string(),
        array_size: Some(size.to_string()),
        location: TextLocation::new_just_line(1),
    }
}

fn table_with_scope() -> SymbolTable {
    let mut table = SymbolTable::new();
    table.enter_scope();
    table
}

#[test]
fn declared_names_are_mangled_with_a_counter() {
    let mut table = table_with_scope();

    let a = table.declare(&scalar("a")).expect("declare a");
    let b = table.declare(&scalar("b")).expect("declare b");

    assert_eq!(a.mangled_name, "a_0");
    assert_eq!(b.mangled_name, "b_1");
    assert!(!a.is_array);
    assert_eq!(a.stack_offset, None);
}

#[test]
fn mangling_separator_avoids_collisions() {
    let mut table = table_with_scope();

    // Without a separator "a1" + 0 and "a" + 10 would both be "a10"
    let a1 = table.declare(&scalar("a1")).expect("declare a1");
    for i in 1..10 {
        table.declare(&scalar(&format!("filler{i}"))).expect("declare filler");
    }
    let a = table.declare(&scalar("a")).expect("declare a");

    assert_eq!(a1.mangled_name, "a1_0");
    assert_eq!(a.mangled_name, "a_10");
}

#[test]
fn redeclaring_in_the_same_scope_fails() {
    let mut table = table_with_scope();
    table.declare(&scalar("x")).expect("first declaration");

    let error = table.declare(&scalar("x")).expect_err("second declaration should fail");
    assert_eq!(error.error_type, ErrorType::Redeclaration);
    assert_eq!(
        error.metadata.get(&ErrorMetaDataKey::VariableName),
        Some(&String::from("x"))
    );
}

#[test]
fn inner_scopes_shadow_outer_ones() {
    let mut table = table_with_scope();
    let outer = table.declare(&scalar("x")).expect("outer x");

    table.enter_scope();
    let inner = table.declare(&scalar("x")).expect("inner x");
    assert_ne!(outer.mangled_name, inner.mangled_name);

    let location = TextLocation::default();
    assert_eq!(table.lookup("x", &location).expect("lookup"), &inner);

    table.exit_scope().expect("exit inner scope");
    assert_eq!(table.lookup("x", &location).expect("lookup"), &outer);
}

#[test]
fn inner_declarations_are_gone_after_their_scope() {
    let mut table = table_with_scope();

    table.enter_scope();
    table.declare(&scalar("y")).expect("declare y");
    table.exit_scope().expect("exit scope");

    let error = table
        .lookup("y", &TextLocation::new_just_line(7))
        .expect_err("y should be out of scope");
    assert_eq!(error.error_type, ErrorType::UndeclaredName);
    assert_eq!(error.location.line(), 7);
}

#[test]
fn lookup_finds_outer_names_from_inner_scopes() {
    let mut table = table_with_scope();
    let outer = table.declare(&scalar("x")).expect("outer x");

    table.enter_scope();
    table.enter_scope();
    assert_eq!(table.depth(), 3);
    assert_eq!(
        table.lookup("x", &TextLocation::default()).expect("lookup"),
        &outer
    );
}

#[test]
fn arrays_advance_the_stack_counter_by_their_size() {
    let mut table = table_with_scope();

    let w = table.declare(&array("w", "16")).expect("declare w");
    let v = table.declare(&array("v", "4")).expect("declare v");

    assert!(w.is_array);
    assert_eq!(w.stack_offset, Some(16));
    assert_eq!(v.stack_offset, Some(20));
    assert_eq!(table.stack_counter(), 20);
    assert_eq!(table.frame_cells(), 20);
}

#[test]
fn scope_exit_gives_array_cells_back() {
    let mut table = table_with_scope();
    table.declare(&array("a", "2")).expect("declare a");

    table.enter_scope();
    table.declare(&array("b", "10")).expect("declare b");
    assert_eq!(table.stack_counter(), 12);
    table.exit_scope().expect("exit scope");

    assert_eq!(table.stack_counter(), 2);

    // A sibling scope reuses the same cells, the frame only grows to the deepest use
    table.enter_scope();
    let c = table.declare(&array("c", "3")).expect("declare c");
    assert_eq!(c.stack_offset, Some(5));
    table.exit_scope().expect("exit scope");

    assert_eq!(table.frame_cells(), 12);
}

#[test]
fn reset_for_function_starts_over() {
    let mut table = table_with_scope();
    table.declare(&array("w", "8")).expect("declare w");

    table.reset_for_function();
    assert_eq!(table.depth(), 0);
    assert_eq!(table.stack_counter(), 0);
    assert_eq!(table.frame_cells(), 0);

    table.enter_scope();
    let w = table.declare(&scalar("w")).expect("declare w again");
    assert_eq!(w.mangled_name, "w_0");
}

#[test]
fn oversized_arrays_are_rejected() {
    let mut table = table_with_scope();

    let error = table
        .declare(&array("huge", "99999999999"))
        .expect_err("size does not fit in 32 bits");
    assert_eq!(error.error_type, ErrorType::Rule);

    let error = table
        .declare(&array("big", "600000000"))
        .expect_err("frame would not be addressable");
    assert_eq!(error.error_type, ErrorType::Rule);
}

#[test]
fn parameters_are_declared_without_storage() {
    let mut table = table_with_scope();

    let parameter = Parameter {
        name: String::from("values"),
        is_array: true,
        location: TextLocation::default(),
    };
    let symbol = table.declare_parameter(&parameter).expect("declare parameter");

    assert!(symbol.is_array);
    assert_eq!(symbol.stack_offset, None);
    assert_eq!(table.stack_counter(), 0);
}

#[test]
fn exiting_with_no_scope_is_a_compiler_error() {
    let mut table = SymbolTable::new();
    let error = table.exit_scope().expect_err("no scope to exit");
    assert_eq!(error.error_type, ErrorType::Compiler);
}

#[test]
fn declaring_with_no_scope_is_a_compiler_error() {
    let mut table = SymbolTable::new();
    let error = table.declare(&scalar("x")).expect_err("no scope to declare in");
    assert_eq!(error.error_type, ErrorType::Compiler);
}
