use std::env;

/// Sanitizers whose runtime exposes `__lsan_do_leak_check`.
const LEAK_CAPABLE_SANITIZERS: &[&str] = &["leak", "address"];

fn main() {
    println!("cargo:rerun-if-env-changed=CARGO_ENCODED_RUSTFLAGS");

    if env::var_os("CARGO_FEATURE_LSAN").is_none() {
        return;
    }

    let rustflags = env::var("CARGO_ENCODED_RUSTFLAGS").unwrap_or_default();
    assert!(
        sanitizer_enabled(&rustflags),
        "Leak sanitizer is not correctly configured: the `lsan` feature requires RUSTFLAGS to \
         contain `-Zsanitizer=leak` or `-Zsanitizer=address`"
    );
}

/// Returns true if one of the flags enables a sanitizer that performs leak checking.
///
/// Flags are separated by `0x1f` and the sanitizer name may be given either in the same flag
/// (`-Zsanitizer=leak`) or in the flag following `-Z`.
fn sanitizer_enabled(encoded_rustflags: &str) -> bool {
    let flags: Vec<&str> = encoded_rustflags.split('\x1f').collect();
    flags
        .iter()
        .enumerate()
        .filter_map(|(idx, flag)| match flag.strip_prefix("-Z") {
            Some("") => flags.get(idx + 1).copied(),
            Some(option) => Some(option),
            None => None,
        })
        .filter_map(|option| option.strip_prefix("sanitizer="))
        .any(|sanitizers| {
            sanitizers
                .split(',')
                .any(|name| LEAK_CAPABLE_SANITIZERS.contains(&name))
        })
}
