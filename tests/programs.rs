//! Whole programs exercising several features together.

mod cases;

test_case!(
    half_adder,
    input: "
        # sum and carry of two bits
        my half = do(a, b) {
            print(a ^ b)
            print(a & b)
        }
        half(true, true)
        half(true, false)
    ",
    output: "false\ntrue\ntrue\nfalse\n",
);

test_case!(
    toggling_loop,
    input: "
        my on = true
        my rounds = true
        my second = false
        while rounds {
            on = !on
            print(on)
            rounds = !second
            second = true
        }
    ",
    output: "false\ntrue\n",
);

test_case!(
    counter_from_closures,
    input: "
        # A two-bit counter built from closures.
        my counter = do() {
            my low = false
            my high = false
            return do() {
                high = high ^ low
                low = !low
                return high & low
            }
        }
        my tick = counter()
        while true {
            my full = tick()
            print(full)
            full ? break : false
        }
    ",
    output: "false\nfalse\ntrue\n",
);

test_case!(
    loop_until_function_says_stop,
    input: "
        my make = do() {
            my calls = false
            return do() {
                my before = calls
                calls = true
                return before
            }
        }
        my done = make()
        while !done() {
            print(true)
        }
        print(false)
    ",
    output: "true\nfalse\n",
);

test_case!(
    semicolons_are_optional,
    input: "my a = true my b = !a print(a) print(b)",
    output: "true\nfalse\n",
);
