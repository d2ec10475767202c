//! Link materializer against real temp trees.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use hcpmirror_core::{LinkConfig, Stage, SubjectId};
use hcpmirror_engine::{CowCopier, EngineError, FsRemover, LinkMaterializer, ScriptedConfirm};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Source mirror with every stage subdirectory populated for `subject`.
fn mirror_subject(root: &Path, subject: &str) {
    let s = root.join(subject);
    let files = [
        "release-notes/ReleaseNotes.txt",
        "unprocessed/3T/T1w_MPR1/100307_3T_T1w_MPR1.nii.gz",
        "unprocessed/3T/Diffusion/bvals",
        "T1w/T1w_acpc_dc_restore.nii.gz",
        "MNINonLinear/T1w.nii.gz",
        "MNINonLinear/Results/rfMRI_REST1_LR/rfMRI_REST1_LR.nii.gz",
    ];
    for rel in files {
        let path = s.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("{subject}:{rel}")).unwrap();
    }
}

fn config(src: &Path, dst: &Path, subjects: &[&str], stage: Stage) -> LinkConfig {
    LinkConfig {
        source: src.to_path_buf(),
        dest: dst.to_path_buf(),
        subjects: subjects.iter().copied().map(SubjectId::from).collect(),
        stage,
        quiet: false,
        dry_run: false,
    }
}

fn top_level(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn relative_files(root: &Path) -> BTreeSet<PathBuf> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Stage scoping
// ---------------------------------------------------------------------------

#[test]
fn unproc_produces_exactly_release_notes_and_unprocessed() {
    init_logging();
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    mirror_subject(src.path(), "100307");

    let mut gate = ScriptedConfirm::default();
    let reports = LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate)
        .run(&config(src.path(), dst.path(), &["100307"], Stage::Unproc))
        .expect("link");
    assert_eq!(reports.len(), 1);

    let subject = dst.path().join("100307");
    assert_eq!(
        top_level(&subject),
        BTreeSet::from(["release-notes".to_string(), "unprocessed".to_string()])
    );
    for dir in ["release-notes", "unprocessed"] {
        let want = relative_files(&src.path().join("100307").join(dir));
        let got = relative_files(&subject.join(dir));
        assert_eq!(got, want, "{dir} entries differ");
        for rel in &got {
            assert_eq!(
                fs::read(subject.join(dir).join(rel)).unwrap(),
                fs::read(src.path().join("100307").join(dir).join(rel)).unwrap()
            );
        }
    }
}

#[test]
fn struct_materializes_mni_but_prunes_results() {
    init_logging();
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    mirror_subject(src.path(), "100307");

    let mut gate = ScriptedConfirm::default();
    let reports = LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate)
        .run(&config(src.path(), dst.path(), &["100307"], Stage::Struct))
        .expect("link");
    assert_eq!(reports[0].pruned(), 1);

    let mni = dst.path().join("100307").join("MNINonLinear");
    assert!(mni.join("T1w.nii.gz").is_file());
    assert!(!mni.join("Results").exists());
    assert!(dst.path().join("100307").join("T1w").is_dir());
    // The mirror keeps its Results tree.
    assert!(src.path().join("100307/MNINonLinear/Results").is_dir());
}

#[test]
fn proc_keeps_results() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    mirror_subject(src.path(), "100307");

    let mut gate = ScriptedConfirm::default();
    LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate)
        .run(&config(src.path(), dst.path(), &["100307"], Stage::Proc))
        .expect("link");
    assert!(dst
        .path()
        .join("100307/MNINonLinear/Results/rfMRI_REST1_LR/rfMRI_REST1_LR.nii.gz")
        .is_file());
}

#[test]
fn editing_the_destination_does_not_touch_the_mirror() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    mirror_subject(src.path(), "100307");

    let mut gate = ScriptedConfirm::default();
    LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate)
        .run(&config(src.path(), dst.path(), &["100307"], Stage::Unproc))
        .expect("link");

    let rel = "release-notes/ReleaseNotes.txt";
    fs::write(dst.path().join("100307").join(rel), "scribbled").unwrap();
    assert_eq!(
        fs::read_to_string(src.path().join("100307").join(rel)).unwrap(),
        format!("100307:{rel}")
    );
}

// ---------------------------------------------------------------------------
// 2. Overwrite confirmation
// ---------------------------------------------------------------------------

#[test]
fn decline_aborts_run_and_leaves_everything_in_place() {
    init_logging();
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    for s in ["A", "B", "C"] {
        mirror_subject(src.path(), s);
    }
    let stale = dst.path().join("B").join("unprocessed").join("stale.txt");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "keep me").unwrap();

    let mut gate = ScriptedConfirm::new(["n"]);
    let err = LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate)
        .run(&config(src.path(), dst.path(), &["A", "B", "C"], Stage::Unproc))
        .unwrap_err();

    assert!(matches!(err, EngineError::Declined { ref path } if path.ends_with("B")));
    assert!(err.is_declined());
    assert_eq!(gate.prompts().len(), 1);
    assert!(gate.prompts()[0].contains("B"));
    // Earlier subject finished, declined subject intact, later subject untouched.
    assert!(dst.path().join("A").join("unprocessed").is_dir());
    assert_eq!(fs::read_to_string(&stale).unwrap(), "keep me");
    assert_eq!(
        top_level(&dst.path().join("B")),
        BTreeSet::from(["unprocessed".to_string()])
    );
    assert!(!dst.path().join("C").exists());
}

#[test]
fn empty_answer_declines() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    mirror_subject(src.path(), "A");
    fs::create_dir_all(dst.path().join("A")).unwrap();

    let mut gate = ScriptedConfirm::new([""]);
    let err = LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate)
        .run(&config(src.path(), dst.path(), &["A"], Stage::Unproc))
        .unwrap_err();
    assert!(err.is_declined());
}

#[test]
fn affirmative_answers_delete_and_rebuild() {
    for answer in ["y", "Y", "yes", "YES"] {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        mirror_subject(src.path(), "100307");
        let stale = dst.path().join("100307").join("T1w").join("old.nii.gz");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        let mut gate = ScriptedConfirm::new([answer]);
        let reports = LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate)
            .run(&config(src.path(), dst.path(), &["100307"], Stage::Unproc))
            .unwrap_or_else(|e| panic!("answer {answer:?}: {e}"));

        assert!(reports[0].cleaned());
        assert!(!stale.exists(), "answer {answer:?} left stale tree");
        assert_eq!(
            top_level(&dst.path().join("100307")),
            BTreeSet::from(["release-notes".to_string(), "unprocessed".to_string()])
        );
    }
}

#[test]
#[cfg(unix)]
fn read_only_copies_are_made_writable() {
    use std::os::unix::fs::PermissionsExt;

    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    mirror_subject(src.path(), "100307");
    let notes = src.path().join("100307/release-notes/ReleaseNotes.txt");
    fs::set_permissions(&notes, fs::Permissions::from_mode(0o444)).unwrap();

    let mut gate = ScriptedConfirm::default();
    LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate)
        .run(&config(src.path(), dst.path(), &["100307"], Stage::Unproc))
        .expect("link");

    let copied = dst.path().join("100307/release-notes/ReleaseNotes.txt");
    let mode = fs::metadata(&copied).unwrap().permissions().mode();
    assert_ne!(mode & 0o200, 0, "copy should be owner-writable");
    // The mirror is left as it was.
    let mode = fs::metadata(&notes).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o444);
}

// ---------------------------------------------------------------------------
// 3. Subject paths never leave the destination root
// ---------------------------------------------------------------------------

#[test]
fn empty_subject_never_offers_to_delete_the_root() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let other = dst.path().join("OTHER").join("keep.txt");
    fs::create_dir_all(other.parent().unwrap()).unwrap();
    fs::write(&other, "keep").unwrap();

    let mut gate = ScriptedConfirm::new(["y"]);
    let err = LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate)
        .run(&config(src.path(), dst.path(), &[""], Stage::Unproc))
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidSubject { .. }), "got: {err}");
    assert!(gate.prompts().is_empty());
    assert_eq!(fs::read_to_string(&other).unwrap(), "keep");
}

#[test]
fn absolute_subject_never_touches_the_named_directory() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let victim = TempDir::new().unwrap();
    let precious = victim.path().join("precious.txt");
    fs::write(&precious, "data").unwrap();
    let subject = victim.path().to_str().unwrap().to_string();

    let mut gate = ScriptedConfirm::new(["y"]);
    let err = LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate)
        .run(&config(src.path(), dst.path(), &[subject.as_str()], Stage::Unproc))
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidSubject { .. }), "got: {err}");
    assert!(gate.prompts().is_empty());
    assert!(precious.is_file());
}

#[test]
fn dot_dot_subject_is_refused() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let inner = dst.path().join("inner");
    fs::create_dir_all(&inner).unwrap();

    let mut gate = ScriptedConfirm::new(["y"]);
    let err = LinkMaterializer::new(&CowCopier, &FsRemover, &mut gate)
        .run(&config(src.path(), &inner, &[".."], Stage::Unproc))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidSubject { .. }), "got: {err}");
    assert!(inner.is_dir());
}
