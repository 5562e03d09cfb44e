use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(p) = stack.pop() {
        let entries = match fs::read_dir(&p) {
            Ok(e) => e,
            Err(_) => continue,
        };
        for ent in entries.flatten() {
            let path = ent.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

#[test]
fn core_crate_stays_offline() {
    // Chunking and ingestion must be usable without any network stack.
    let core_src = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../docqa_core/src");
    let files = collect_rs_files(&core_src);
    assert!(!files.is_empty());

    for f in files {
        let text = fs::read_to_string(&f).unwrap_or_default();
        assert!(!text.contains("ureq::"), "network client used in {}", f.display());
    }
}

#[test]
fn libraries_hold_no_mutable_globals() {
    // Session state belongs to the caller's Session, never to statics.
    let roots = [
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src"),
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../docqa_core/src"),
    ];
    for root in roots {
        for f in collect_rs_files(&root) {
            let text = fs::read_to_string(&f).unwrap_or_default();
            for forbidden in ["static mut", "thread_local!", "Mutex<", "RwLock<"] {
                assert!(
                    !text.contains(forbidden),
                    "`{forbidden}` found in {}",
                    f.display()
                );
            }
        }
    }
}
