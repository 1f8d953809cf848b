mod cases;

test_case!(
    loop_terminates,
    input: "my i = true; while i { i = false; }",
    value: "true",
);

test_case!(
    break_leaves_loop,
    input: "while true { print(true); break; print(false) }; print(false)",
    output: "true\nfalse\n",
);

test_case!(
    continue_rechecks_condition,
    input: "
        my first = true
        my go = true
        while go {
            my was = first
            first = false
            was ? continue : false
            print(was)
            go = false
        }
    ",
    output: "false\n",
);

test_case!(
    nested_loops_break_innermost,
    input: "
        my outer = true
        while outer {
            while true { print(true); break }
            outer = false
        }
        print(outer)
    ",
    output: "true\nfalse\n",
);

test_case!(
    return_leaves_loop_and_function,
    input: "
        my f = do() {
            while true { return false }
        }
        print(f())
    ",
    output: "false\n",
);

test_case!(
    control_tag_on_left_of_logic_short_circuits,
    input: "while true { break & print(true) }",
    output: "",
    value: "true",
);

test_case!(
    control_tag_on_right_of_logic_is_forwarded,
    input: "while true { print(true) ^ break }",
    output: "true\n",
);

test_case!(
    control_tag_in_comparison,
    input: "while true { break == true }",
    error: "R006",
);

test_case!(
    control_tag_in_condition,
    input: "while true { (continue) ? true : false }",
    error: "R007",
);

test_case!(
    control_tag_in_declaration,
    input: "while true { my x = break }",
    error: "R008",
);

test_case!(
    control_tag_in_argument,
    input: "while true { print(continue) }",
    error: "R009",
);

test_case!(
    break_at_top_level,
    input: "break",
    error: "R005",
    message: "control word `break` not allowed here",
);

test_case!(
    return_at_top_level,
    input: "return true",
    error: "R005",
);

test_case!(
    break_escaping_function,
    input: "my f = do() { continue }; while true { f() }",
    error: "R005",
);
