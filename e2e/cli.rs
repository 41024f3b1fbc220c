//! End-to-end tests driving the `lcgram` binary as a subprocess (§6 CLI
//! contract: `gram`, `decomp`, `bwt`, and exit codes).

use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lcgram"))
}

#[test]
fn gram_then_decomp_round_trips_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.txt");
    let gram_path = dir.path().join("input.txt.gram");
    let output_path = dir.path().join("output.txt");
    std::fs::write(&input_path, b"abcabcabcabc").unwrap();

    let status = bin()
        .args(["gram", input_path.to_str().unwrap(), "-o", gram_path.to_str().unwrap(), "-t", "1"])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(gram_path.exists());

    let status = bin()
        .args(["decomp", gram_path.to_str().unwrap(), "-o", output_path.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(status.success());

    let round_tripped = std::fs::read(&output_path).unwrap();
    assert_eq!(round_tripped, b"abcabcabcabc");
}

#[test]
fn gram_rejects_unsupported_compression_level() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.txt");
    std::fs::write(&input_path, b"abc").unwrap();

    let status = bin().args(["gram", input_path.to_str().unwrap(), "-L", "9"]).status().unwrap();
    assert!(!status.success());
}

#[test]
fn gram_missing_input_file_exits_nonzero() {
    let status = bin().args(["gram", "/nonexistent/path/does/not/exist.txt"]).status().unwrap();
    assert!(!status.success());
}

#[test]
fn bwt_round_trips_via_invert() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.txt");
    let gram_path = dir.path().join("input.txt.gram");
    let bwt_path = dir.path().join("input.bwt");
    std::fs::write(&input_path, b"banana banana banana").unwrap();

    assert!(bin()
        .args(["gram", input_path.to_str().unwrap(), "-o", gram_path.to_str().unwrap()])
        .status()
        .unwrap()
        .success());
    assert!(bin()
        .args(["bwt", gram_path.to_str().unwrap(), "-o", bwt_path.to_str().unwrap()])
        .status()
        .unwrap()
        .success());

    let raw = std::fs::read(&bwt_path).unwrap();
    assert!(raw.len() >= 8);
    let mut idx_bytes = [0u8; 8];
    idx_bytes.copy_from_slice(&raw[..8]);
    let primary_index = u64::from_le_bytes(idx_bytes) as usize;
    let bwt = lc_gram::bwt::Bwt { bytes: raw[8..].to_vec(), primary_index };
    assert_eq!(lc_gram::bwt::invert(&bwt), b"banana banana banana");
}
