// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The literal end-to-end I/O scenarios (§8), run against a captured
//! output buffer instead of real stdout.

use std::cell::RefCell;
use std::rc::Rc;

use smg::builtins;
use smg::interpreter::Interpreter;
use smg::parser::parse_program;
use smg::value::Value;

/// Runs `source` with `print`/`println` bound to append into a shared
/// buffer, and returns the buffer's final contents.
fn run_captured(source: &str) -> String {
    let program = parse_program(source).expect("source should parse");

    let output = Rc::new(RefCell::new(String::new()));

    let mut interpreter = Interpreter::new();

    let print_buf = output.clone();
    interpreter.define_global(
        "print",
        Value::host_fn(move |args| {
            print_buf.borrow_mut().push_str(&builtins::join_print_args(args));
            Ok(Value::Null)
        }),
    );

    let println_buf = output.clone();
    interpreter.define_global(
        "println",
        Value::host_fn(move |args| {
            let mut buf = println_buf.borrow_mut();
            buf.push_str(&builtins::join_print_args(args));
            buf.push('\n');
            Ok(Value::Null)
        }),
    );

    interpreter.run(&program).expect("source should run to completion");
    drop(interpreter);

    Rc::try_unwrap(output)
        .unwrap_or_else(|_| panic!("host callables still hold a reference"))
        .into_inner()
}

#[test]
fn scenario_1_arithmetic_and_println() {
    let out = run_captured("let x = 1; let y = x + 2; println(y)");
    assert_eq!(out, "3\n");
}

#[test]
fn scenario_2_recursive_fibonacci() {
    let out = run_captured(
        "function fib(n){ if (n < 2) return n; return fib(n-1) + fib(n-2) } println(fib(10))",
    );
    assert_eq!(out, "55\n");
}

#[test]
fn scenario_3_for_each_over_a_list() {
    let out = run_captured(r#"let a = [10,20,30]; for (v in a) { print(v, "") }"#);
    assert_eq!(out, "10 20 30 ");
}

#[test]
fn scenario_4_map_property_assignment() {
    let out = run_captured(r#"let m = { name: "smg" }; m.name = "SMG"; println(m.name)"#);
    assert_eq!(out, "SMG\n");
}

#[test]
fn scenario_5_try_catch_finally() {
    let out = run_captured(
        r#"try { let x = null[0] } catch (e) { println("caught") } finally { println("done") }"#,
    );
    assert_eq!(out, "caught\ndone\n");
}

#[test]
fn scenario_6_curried_lambda() {
    let out = run_captured("let adder = function (x) function (y) x + y; println(adder(3)(4))");
    assert_eq!(out, "7\n");
}
