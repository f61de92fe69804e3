#![no_main]

use kernel_sweep::bundle::ParameterBundle;
use kernel_sweep::identifier::{parse_kernel_token, resolve_key, ResolveContext};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Score and directory names come from the filesystem; any of them must
    // resolve or fail cleanly
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = parse_kernel_token(input);

        let (run_group, score_file) = input.split_once('/').unwrap_or((input, input));
        let params = ParameterBundle::default();
        let ctx = ResolveContext {
            run_group,
            score_file,
            params: &params,
        };
        let _ = resolve_key(&ctx);
    }
});
