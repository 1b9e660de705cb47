//! End-to-end runs of the copy pipeline against temporary trees.

use anyhow::Result;
use randcopy_config::CopySettings;
use randcopy_fsops::{
    FixedSpaceProbe, RandomCopyService, StopReason, TransferEvent, selection_rng,
};
use randcopy_test_support::fixtures::{LibraryTree, MIB, entry_count, relative_files};

fn service(available: u64) -> RandomCopyService {
    RandomCopyService::new(Box::new(FixedSpaceProbe::new(available)))
}

fn music_library() -> Result<LibraryTree> {
    let tree = LibraryTree::new()?;
    tree.add_file("Rock/Band/01 intro.mp3", MIB)?;
    tree.add_file("Rock/Band/02 song.mp3", 2 * MIB)?;
    tree.add_file("Rock/Band/cover.jpg", MIB)?;
    tree.add_file("Jazz/Live at Club/set.mp3", MIB)?;
    tree.add_file("Jazz/Studio/take.MP3", MIB)?;
    tree.add_file("Audiobooks/chapter.mp3", 5 * MIB)?;
    Ok(tree)
}

#[test]
fn same_seed_copies_the_same_files_in_the_same_order() -> Result<()> {
    let source = music_library()?;
    let first = LibraryTree::new()?;
    let second = LibraryTree::new()?;
    let mut settings = CopySettings::new(source.path(), first.path());
    settings.size_mb = Some(4);

    let one = service(64 * MIB).run(&settings, &mut Vec::new(), &mut selection_rng(Some(11)))?;
    settings.dest_dir = second.path().to_path_buf();
    let two = service(64 * MIB).run(&settings, &mut Vec::new(), &mut selection_rng(Some(11)))?;

    let sources = |report: &randcopy_fsops::TransferReport| {
        report
            .files
            .iter()
            .map(|file| file.source.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(sources(&one), sources(&two));
    assert_eq!(relative_files(first.path())?, relative_files(second.path())?);
    assert!(one.state.bytes_copied <= 4 * MIB);
    Ok(())
}

#[test]
fn excludes_and_extension_filter_what_gets_copied() -> Result<()> {
    let source = music_library()?;
    let dest = LibraryTree::new()?;
    let mut settings = CopySettings::new(source.path(), dest.path());
    settings.excludes = vec!["live".into(), "audiobooks".into()];

    let report = service(64 * MIB).run(&settings, &mut Vec::new(), &mut selection_rng(Some(5)))?;
    assert_eq!(report.candidates, 3);
    assert_eq!(report.stop_reason, StopReason::SelectionExhausted);
    assert_eq!(report.state.bytes_copied, 4 * MIB);
    assert_eq!(report.megabytes_copied(), 4);
    for file in &report.files {
        let source = file.source.to_string_lossy().to_lowercase();
        assert!(!source.contains("live"));
        assert!(!source.contains("audiobooks"));
    }
    Ok(())
}

#[test]
fn folder_mode_batches_and_file_limit_stops() -> Result<()> {
    let source = music_library()?;
    let dest = LibraryTree::new()?;
    let mut settings = CopySettings::new(source.path(), dest.path());
    settings.use_folders = true;
    settings.folder_file_limit = 2;
    settings.max_files = Some(3);

    let report = service(64 * MIB).run(&settings, &mut Vec::new(), &mut selection_rng(Some(8)))?;
    assert_eq!(report.stop_reason, StopReason::FileLimitReached);
    assert_eq!(report.state.files_copied, 3);
    assert_eq!(report.state.folder_index, 1);

    let copied = relative_files(dest.path())?;
    assert_eq!(copied.len(), 3);
    assert!(copied[0].starts_with("0000/0000 - "));
    assert!(copied[1].starts_with("0000/0001 - "));
    assert!(copied[2].starts_with("0001/0002 - "));
    Ok(())
}

#[test]
fn dry_run_plans_without_writing() -> Result<()> {
    let source = music_library()?;
    let dest = LibraryTree::new()?;
    let mut settings = CopySettings::new(source.path(), dest.path());
    settings.dry_run = true;
    settings.use_folders = true;
    let mut events = Vec::new();

    let report = service(64 * MIB).run(&settings, &mut events, &mut selection_rng(Some(4)))?;
    let planned = events
        .iter()
        .filter(|event| matches!(event, TransferEvent::FileCopied(_)))
        .count();
    assert_eq!(planned, report.files.len());
    assert_eq!(report.files.len(), 5);
    assert_eq!(entry_count(dest.path())?, 0);
    Ok(())
}
