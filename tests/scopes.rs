mod cases;

test_case!(
    declaration_binds_value,
    input: "my x = false; print(x)",
    output: "false\n",
);

test_case!(
    redeclaration_in_same_scope,
    input: "my x = true; my x = false;",
    error: "R002",
    message: "x is already defined",
);

test_case!(
    shadowing_in_nested_block,
    input: "
        my x = true
        {
            my x = false
            print(x)
        }
        print(x)
    ",
    output: "false\ntrue\n",
);

test_case!(
    reassignment_without_declaration,
    input: "x = true;",
    error: "R001",
    message: "x is undefined",
);

test_case!(
    reassignment_reaches_outer_scope,
    input: "
        my x = true
        { { x = false } }
        print(x)
    ",
    output: "false\n",
);

test_case!(
    chained_assignment,
    input: "my a = true; my b = true; a = b = false; print(a); print(b)",
    output: "false\nfalse\n",
);

test_case!(
    block_locals_are_dropped,
    input: "{ my hidden = true }; hidden",
    error: "R001",
);

test_case!(
    print_can_be_shadowed,
    input: "{ my print = false; print }",
    value: "false",
);

test_case!(
    print_can_be_reassigned,
    input: "print = true; print(true)",
    error: "R004",
);
