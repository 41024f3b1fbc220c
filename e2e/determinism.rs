//! Determinism and thread-invariance properties (§8, properties 6 and 7).

fn serialized(input: &[u8], threads: usize) -> Vec<u8> {
    let grammar = lc_gram::compress(input, b'\n', threads, 1).unwrap();
    let mut buf = Vec::new();
    grammar.serialize(&mut buf).unwrap();
    buf
}

#[test]
fn repeated_runs_with_same_thread_count_are_byte_identical() {
    let input = b"the quick brown fox jumps over the lazy dog the quick brown fox";
    let a = serialized(input, 3);
    let b = serialized(input, 3);
    assert_eq!(a, b);
}

#[test]
fn different_thread_counts_produce_identical_grammars() {
    let input = b"to be or not to be that is the question to be or not to be";
    let single = serialized(input, 1);
    for threads in [2, 3, 5, 8] {
        let multi = serialized(input, threads);
        assert_eq!(single, multi, "thread count {threads} diverged from single-threaded run");
    }
}

#[test]
fn empty_input_is_thread_invariant() {
    let single = serialized(b"", 1);
    let multi = serialized(b"", 6);
    assert_eq!(single, multi);
}
