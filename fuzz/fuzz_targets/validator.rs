#![no_main]

use libfuzzer_sys::fuzz_target;

// Raw text must never panic the syntax checker, whatever it contains.
fuzz_target!(|input: &str| {
    let _ = calclet::validate(input);
});
