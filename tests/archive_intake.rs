mod common;

use std::io::{Cursor, Write};

use cogtask_analyzer::config::PipelineConfig;
use cogtask_analyzer::pipeline::Pipeline;
use cogtask_analyzer::types::{BatchInput, Cell, Severity, SourceFile, TaskKind};
use rust_xlsxwriter::Workbook;
use zip::write::FileOptions;
use zip::ZipWriter;

use common::{file, stroop_csv, visual_search_csv};

fn build_zip(entries: Vec<(&str, Vec<u8>)>) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        if name.ends_with('/') {
            writer.add_directory(name, FileOptions::default()).unwrap();
        } else {
            writer.start_file(name, FileOptions::default()).unwrap();
            writer.write_all(&bytes).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Visual-search workbook with one data row, written the way the
/// instrument exports it (preamble, header, data).
fn visual_search_xlsx() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Task Export").unwrap();
    for col in 0..20u16 {
        sheet.write_string(3, col, format!("col{col}")).unwrap();
    }
    sheet.write_string(4, 3, "Present").unwrap();
    sheet.write_string(4, 4, "Conjunction").unwrap();
    sheet.write_number(4, 5, 8).unwrap();
    sheet.write_number(4, 18, 812.5).unwrap();
    sheet.write_number(4, 19, 1).unwrap();
    workbook.save_to_buffer().unwrap()
}

#[test]
fn test_loose_files_and_archive_entries_combine() {
    let archive = build_zip(vec![
        ("site_a/", Vec::new()),
        (
            "site_a/P2_VisualSearch_CRL_PRE.csv",
            visual_search_csv(&[("absent", "feature", "04", "480", "1")]),
        ),
        ("site_a/nested/P3_VisualSearch_EXP_POST2.xlsx", visual_search_xlsx()),
        ("site_a/notes.txt", b"ignored".to_vec()),
    ]);
    let batch = BatchInput {
        files: vec![file(
            "P1_VisualSearch_CRL_PRE.csv",
            visual_search_csv(&[("present", "feature", "04", "500", "1")]),
        )],
        archive: Some(SourceFile::new("batch.zip", archive)),
    };

    let outcome = Pipeline::new(&PipelineConfig::default()).run(TaskKind::VisualSearch, batch);
    assert_eq!(outcome.files_seen, 3);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);

    let report = outcome.report.expect("report");
    let keys: Vec<&str> = report.groups.iter().map(|g| g.group_key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "P1_CRL_PRE_Feature_P_04",
            "P2_CRL_PRE_Feature_A_04",
            "P3_EXP_POST30_Conj_P_8"
        ]
    );
    // Raw rows follow discovery order: loose first, then archive order
    let participants = report.raw.column_values("Participant");
    assert_eq!(participants, vec![&Cell::text("1"), &Cell::text("2"), &Cell::text("3")]);
    assert_eq!(report.group("P3_EXP_POST30_Conj_P_8").unwrap().stats.mean_rt, Some(812.5));
}

#[test]
fn test_corrupt_archive_does_not_affect_loose_files() {
    let batch = BatchInput {
        files: vec![file(
            "P1_VisualSearch_CRL_PRE.csv",
            visual_search_csv(&[("present", "feature", "04", "500", "1")]),
        )],
        archive: Some(SourceFile::new("broken.zip", b"this is not an archive".to_vec())),
    };
    let outcome = Pipeline::new(&PipelineConfig::default()).run(TaskKind::VisualSearch, batch);
    let errors: Vec<_> = outcome
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].subject.as_deref(), Some("broken.zip"));
    assert_eq!(outcome.report.expect("report").groups.len(), 1);
}

#[test]
fn test_stroop_twins_pair_inside_archive() {
    let archive = build_zip(vec![
        (
            "P5/P5_Stroop_CRL_PRE.1.csv",
            stroop_csv(&[("Congruent", "hit", "700", "1")]),
        ),
        (
            "P5/P5_Stroop_CRL_PRE.2.csv",
            stroop_csv(&[("Congruent", "hit", "650", "1")]),
        ),
    ]);
    let batch = BatchInput {
        files: Vec::new(),
        archive: Some(SourceFile::new("stroop.zip", archive)),
    };
    let outcome = Pipeline::new(&PipelineConfig::default()).run(TaskKind::Stroop, batch);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    let report = outcome.report.expect("report");
    let group = report.group("P5_CRL_PRE_Congruent").expect("group");
    assert_eq!(group.stats.total, 2);
    assert_eq!(group.stats.sd_rt, Some(35.36));
}

#[test]
fn test_stroop_twins_pair_across_archive_folders() {
    let archive = build_zip(vec![
        (
            "block_1/P6_Stroop_EXP_POST1.1.csv",
            stroop_csv(&[("Incongruent", "hit", "700", "1")]),
        ),
        (
            "block_2/P6_Stroop_EXP_POST1.2.csv",
            stroop_csv(&[("Incongruent", "hit", "650.25", "1")]),
        ),
    ]);
    let batch = BatchInput {
        files: Vec::new(),
        archive: Some(SourceFile::new("stroop.zip", archive)),
    };
    let outcome = Pipeline::new(&PipelineConfig::default()).run(TaskKind::Stroop, batch);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    let group = outcome
        .report
        .expect("report")
        .group("P6_EXP_POST15_Incongruent")
        .cloned()
        .expect("group");
    assert_eq!(group.stats.total, 2);
    // 675.125 rounds half to even
    assert_eq!(group.stats.mean_rt, Some(675.12));
}
