#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Anything that parses must print to a fixed point
        if let Ok(file) = scaffold::parse_file(content) {
            let printed = scaffold::print_file(&file);
            let reparsed = scaffold::parse_file(&printed).expect("printed output parses");
            assert_eq!(scaffold::print_file(&reparsed), printed);
        }
    }
});
