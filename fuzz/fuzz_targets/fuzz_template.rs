#![no_main]
#[macro_use] extern crate libfuzzer_sys;

use lit_template::{Context, Engine};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = String::from_utf8(data.to_vec()) {
        let mut context = Context::new();
        context.insert("items", vec!["a", "b"]);
        context.insert("count", 3);
        let _ = Engine::one_off(&s, context);
    }
});
