mod cases;

test_case!(
    two_argument_function,
    input: "my f = do(a, b) { return a & b; }; f(true, true)",
    value: "true",
);

test_case!(
    arity_mismatch,
    input: "my f = do(a, b) { return a & b; }; f(true)",
    error: "R003",
    message: "f expects 2 argument(s), got 1",
);

test_case!(
    immediate_call_closes_over_definition_scope,
    input: "my x = true; do() { return x; }()",
    value: "true",
);

test_case!(
    closure_is_lexical_not_dynamic,
    input: "
        my x = true
        my read = do() { return x }
        my shadow = do(x) { return read() }
        print(shadow(false))
    ",
    output: "true\n",
);

test_case!(
    closure_outlives_call,
    input: "
        my constant = do(v) { return do() { return v } }
        my yes = constant(true)
        my no = constant(false)
        print(yes()); print(no()); print(yes())
    ",
    output: "true\nfalse\ntrue\n",
);

test_case!(
    closure_mutates_captured_state,
    input: "
        my flipper = do() {
            my state = false
            return do() { state = !state; return state }
        }
        my flip = flipper()
        print(flip()); print(flip())
    ",
    output: "true\nfalse\n",
);

test_case!(
    body_without_return_yields_last_value,
    input: "my f = do() { true; false }; f()",
    value: "false",
);

test_case!(
    empty_body_yields_true,
    input: "do() {}()",
    value: "true",
);

test_case!(
    recursion,
    input: "my f = do(n) { return n ? f(false) : true }; f(true)",
    value: "true",
);

test_case!(
    higher_order_function,
    input: "
        my twice = do(g, v) { return g(g(v)) }
        my not = do(v) { return !v }
        print(twice(not, true))
        print(twice(print, false))
    ",
    output: "true\nfalse\ntrue\ntrue\n",
);

test_case!(
    calling_a_boolean,
    input: "my x = true; x()",
    error: "R004",
);

test_case!(
    print_returns_true,
    input: "print(false)",
    output: "false\n",
    value: "true",
);

test_case!(
    print_shows_functions,
    input: "print(do(a, b) { return a ^ b }); print(print)",
    output: "do(a, b) { return a ^ b; }\n<native print>\n",
);
