//! Alonso interpreter: evaluates AST nodes with a tree-walking interpreter.
//!
//! This crate provides the runtime for the Alonso programming language. It
//! implements a tree-walking evaluator that directly executes the AST
//! produced by the parser, against a chain of lexically nested environments
//! with first-class closures, and wires the full pipeline together in
//! [`Interpreter::execute`].

pub mod builtins;
pub mod env;
pub mod flow;
pub mod interpreter;
pub mod value;

pub use env::{Env, EnvRef};
pub use interpreter::Interpreter;
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use alonso_lexer::Lexer;
    use alonso_parser::Parser;

    fn run_program(input: &str) -> Result<Option<Value>, String> {
        let tokens = Lexer::new(input).tokenize();
        let mut parser = Parser::new(tokens);
        let program = parser.parse_program();
        if let Some(e) = parser.errors().first() {
            return Err(format!("Parse error: {}", e.message()));
        }
        let mut interpreter = Interpreter::new();
        interpreter
            .run_program(&program)
            .map_err(|e| format!("Runtime error: {}", e.message()))
    }

    fn expect_value(input: &str, expected: Value) {
        match run_program(input) {
            Ok(Some(actual)) => assert_eq!(actual, expected, "program: {}", input),
            Ok(None) => panic!("expected value but got none for: {}", input),
            Err(e) => panic!("program failed: {}\ninput: {}", e, input),
        }
    }

    fn expect_number(input: &str, expected: f64) {
        expect_value(input, Value::Number(expected));
    }

    fn expect_error(input: &str, fragment: &str) {
        match run_program(input) {
            Ok(v) => panic!("expected error but got {:?} for: {}", v, input),
            Err(e) => assert!(
                e.contains(fragment),
                "error {:?} does not mention {:?} for: {}",
                e,
                fragment,
                input
            ),
        }
    }

    #[test]
    fn test_literal_values() {
        expect_number("42", 42.0);
        expect_number("2.5", 2.5);
        expect_value("\"podium\"", Value::Str("podium".to_string()));
        expect_value("true", Value::Bool(true));
        expect_value("false", Value::Bool(false));
    }

    #[test]
    fn test_arithmetic() {
        expect_number("1 + 2", 3.0);
        expect_number("5 - 3", 2.0);
        expect_number("4 * 6", 24.0);
        expect_number("8 / 2", 4.0);
        expect_number("7 / 2", 3.5);
        expect_number("2 + 3 * 4", 14.0);
        expect_number("(2 + 3) * 4", 20.0);
        expect_number("-5 + 10", 5.0);
    }

    #[test]
    fn test_division_by_zero() {
        expect_error("1 / 0", "division by zero");
        expect_error("1 % 0", "division by zero");
    }

    #[test]
    fn test_modulo_sign_follows_dividend() {
        expect_number("7 % 3", 1.0);
        expect_number("-7 % 3", -1.0);
        expect_number("7 % -3", 1.0);
        expect_number("7.9 % 3", 1.0); // operands truncate to integers
    }

    #[test]
    fn test_string_operations() {
        expect_value(
            "\"box\" + \" \" + \"box\"",
            Value::Str("box box".to_string()),
        );
        expect_value("\"a\" == \"a\"", Value::Bool(true));
        expect_value("\"a\" != \"b\"", Value::Bool(true));
        expect_error("\"a\" - \"b\"", "unknown operator: STRING - STRING");
    }

    #[test]
    fn test_comparisons() {
        expect_value("1 < 2", Value::Bool(true));
        expect_value("2 <= 2", Value::Bool(true));
        expect_value("3 > 4", Value::Bool(false));
        expect_value("4 >= 4", Value::Bool(true));
        expect_value("5 == 5", Value::Bool(true));
        expect_value("5 != 5", Value::Bool(false));
    }

    #[test]
    fn test_prefix_operators() {
        expect_value("!true", Value::Bool(false));
        expect_value("!false", Value::Bool(true));
        expect_value("!!5", Value::Bool(true));
        expect_value("![1][9]", Value::Bool(true)); // !null
        expect_value("!0", Value::Bool(false)); // zero is truthy
        expect_number("-(3 + 4)", -7.0);
        expect_error("-\"fast\"", "unknown operator: -STRING");
    }

    #[test]
    fn test_logical_operators_combine_truthiness() {
        expect_value("true && false", Value::Bool(false));
        expect_value("true || false", Value::Bool(true));
        // number or string operands hit their own dispatch first
        expect_error("1 && 2", "unknown operator: &&");
        expect_error("\"a\" || \"b\"", "unknown operator: STRING || STRING");
        // mixed operands combine truthiness
        expect_value("true && 1", Value::Bool(true));
        expect_value("[1][9] || true", Value::Bool(true));
    }

    #[test]
    fn test_no_short_circuit() {
        // both sides of && and || always run
        expect_number("grid y = 0\ntrue && (y = 2)\ny", 2.0);
        expect_number("grid y = 0\ntrue || (y = 2)\ny", 2.0);
    }

    #[test]
    fn test_equality_falls_back_to_identity() {
        expect_value("[1, 2] == [1, 2]", Value::Bool(false));
        expect_value("grid a = [1, 2]\na == a", Value::Bool(true));
        expect_value("grid a = [1]\ngrid b = a\na == b", Value::Bool(true));
        expect_value("5 == \"5\"", Value::Bool(false));
        expect_value("[1][9] == [2][9]", Value::Bool(true)); // null == null
        expect_value("true == true", Value::Bool(true));
        expect_value("true != false", Value::Bool(true));
    }

    #[test]
    fn test_type_mismatch_and_unknown_operator() {
        expect_error("5 + \"x\"", "type mismatch: NUMBER + STRING");
        expect_error("true + false", "unknown operator: BOOLEAN + BOOLEAN");
    }

    #[test]
    fn test_truthiness_in_conditions() {
        expect_number("circuit (0) { 1 } else_circuit { 2 }", 1.0);
        expect_number("circuit (\"\") { 1 } else_circuit { 2 }", 1.0);
        expect_number("circuit ([1][9]) { 1 } else_circuit { 2 }", 2.0);
        expect_number("circuit (false) { 1 } else_circuit { 2 }", 2.0);
        // no else branch produces null
        expect_value("circuit (false) { 1 }", Value::Null);
    }

    #[test]
    fn test_variables() {
        expect_number("grid lap = 42\nlap", 42.0);
        expect_number("grid a = 10\ngrid b = 20\na + b", 30.0);
        // declarations and assignments evaluate to the bound value
        expect_number("grid x = 9", 9.0);
        expect_number("grid x = 5\nx = x + 1", 6.0);
        expect_error("ghost", "identifier not found: ghost");
    }

    #[test]
    fn test_arrays() {
        expect_number("[10, 20, 30][1]", 20.0);
        expect_number("[10, 20, 30][1.9]", 20.0); // index truncates
        expect_value("[10, 20, 30][99]", Value::Null);
        expect_value("[10, 20, 30][-1]", Value::Null);
        expect_error("5[0]", "index operator not supported: NUMBER");
        expect_error("\"abc\"[0]", "index operator not supported: STRING");
        expect_error("[1, 2][\"x\"]", "index operator not supported: ARRAY");
    }

    #[test]
    fn test_while_loops() {
        expect_number("grid i = 0\nwhile_racing (i < 3) { i = i + 1 }\ni", 3.0);
        // the body shares the enclosing scope, so declarations leak
        expect_number(
            "grid i = 0\nwhile_racing (i < 1) { grid j = 42\ni = i + 1 }\nj",
            42.0,
        );
    }

    #[test]
    fn test_for_loops_have_their_own_scope() {
        expect_error(
            "loop (grid i = 0; i < 3; i = i + 1) {}\ni",
            "identifier not found: i",
        );
        // assignments inside the body write the loop scope, shadowing the
        // outer binding
        expect_number(
            "grid total = 0\nloop (grid i = 0; i < 4; i = i + 1) { total = total + i }\ntotal",
            0.0,
        );
    }

    #[test]
    fn test_break_and_continue() {
        expect_number(
            "grid i = 0\nwhile_racing (true) { i = i + 1\ncircuit (i == 3) { break_flag } }\ni",
            3.0,
        );
        expect_number(
            "grid i = 0\ngrid n = 0\nwhile_racing (i < 5) { i = i + 1\ncircuit (i % 2 == 0) { continue_race }\nn = n + 1 }\nn",
            3.0,
        );
        expect_error("break_flag", "'break_flag' outside of loop");
        expect_error("continue_race", "'continue_race' outside of loop");
    }

    #[test]
    fn test_functions() {
        expect_number("pace add(a, b) { return_pit a + b }\nadd(2, 3)", 5.0);
        // a function body without return_pit evaluates to its last value
        expect_number("pace quick() { 42 }\nquick()", 42.0);
        expect_number(
            "pace fact(n) { circuit (n < 2) { return_pit 1 }\nreturn_pit n * fact(n - 1) }\nfact(5)",
            120.0,
        );
        expect_value("pace nothing() { return_pit\n}\nnothing()", Value::Null);
    }

    #[test]
    fn test_function_arguments() {
        // extra arguments are dropped
        expect_number("pace first(a) { return_pit a }\nfirst(1, 2, 3)", 1.0);
        // missing parameters stay unbound
        expect_error(
            "pace both(a, b) { return_pit b }\nboth(1)",
            "identifier not found: b",
        );
        // an erroring argument aborts the call
        expect_error(
            "pace id(a) { return_pit a }\nid(ghost)",
            "identifier not found: ghost",
        );
    }

    #[test]
    fn test_not_a_function() {
        expect_error("5(1)", "not a function: NUMBER");
        expect_error("grid x = 1\nx()", "not a function: NUMBER");
    }

    #[test]
    fn test_closures_capture_definition_environment() {
        expect_number(
            "pace make_adder(x) { pace add(y) { return_pit x + y }\nreturn_pit add }\ngrid add2 = make_adder(2)\nadd2(40)",
            42.0,
        );
        // the captured environment is shared by reference, but in-closure
        // reassignment shadows rather than mutates, so a counter always
        // reads the captured value
        expect_number(
            "pace make_counter() { grid n = 0\npace inc() { n = n + 1\nreturn_pit n }\nreturn_pit inc }\ngrid c = make_counter()\nc()\nc()",
            1.0,
        );
    }

    #[test]
    fn test_return_propagates_through_nesting() {
        expect_number(
            "pace find(limit) { grid i = 0\nwhile_racing (true) { circuit (i >= limit) { return_pit i }\ni = i + 1 } }\nfind(7)",
            7.0,
        );
    }

    #[test]
    fn test_top_level_return_unwraps() {
        expect_number("return_pit 7\n42", 7.0);
        match run_program("return_pit;") {
            Ok(Some(Value::Null)) => {}
            other => panic!("expected null result, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_blocks_share_scope() {
        expect_number("{ grid x = 1\nx = x + 1 }\nx", 2.0);
    }

    #[test]
    fn test_builtin_length() {
        expect_number("length(\"hello\")", 5.0);
        expect_number("length([1, 2, 3])", 3.0);
        expect_number("length([])", 0.0);
        expect_error("length(5)", "argument to `length` not supported, got NUMBER");
        expect_error("length()", "wrong number of arguments. got=0, want=1");
        expect_error("length([1], [2])", "wrong number of arguments. got=2, want=1");
    }

    #[test]
    fn test_builtin_push_is_pure() {
        expect_number("grid a = [1]\npush(a, 2)\nlength(a)", 1.0);
        expect_number("grid a = [1]\ngrid b = push(a, 2)\nlength(b)", 2.0);
        expect_number("grid a = [1]\npush(a, 2)[1]", 2.0);
        expect_error("push(5, 1)", "argument to `push` must be ARRAY, got NUMBER");
        expect_error("push([1])", "wrong number of arguments. got=1, want=2");
    }

    #[test]
    fn test_builtin_telemetry_returns_null() {
        expect_value("telemetry(1)", Value::Null);
    }

    #[test]
    fn test_inspection_forms() {
        let result = run_program("[1, \"two\", true, [1][9]]").unwrap().unwrap();
        assert_eq!(result.to_string(), "[1, two, true, null]");
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_state_persists_across_execute_calls() {
        let mut interpreter = Interpreter::new();
        interpreter.execute("grid x = 1").unwrap();
        let result = interpreter.execute("x + 1").unwrap();
        assert_eq!(result, Some(Value::Number(2.0)));
    }

    #[test]
    fn test_execute_reports_parse_failure() {
        let mut interpreter = Interpreter::new();
        let err = interpreter.execute("grid = 5").unwrap_err();
        assert_eq!(err.message(), "parsing failed");
    }
}
