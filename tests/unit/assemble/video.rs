use super::*;
use crate::encode::sink::InMemorySink;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "thermaframe_video_{tag}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn small_opts() -> AssembleOpts {
    AssembleOpts {
        expected_cols: 3,
        width: 6,
        height: 4,
        ..Default::default()
    }
}

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, body).unwrap();
    p
}

const GOOD: &str = "Device;X\nImage Data\n1;2;3\n4;5;6\n7;8;9\n";

#[test]
fn one_good_one_bad_writes_one_frame() {
    let dir = scratch_dir("one_good");
    let sources = vec![
        write(&dir, "b_bad.csv", "no marker here\n1;2;3\n"),
        write(&dir, "a_good.csv", GOOD),
    ];
    let mut sink = InMemorySink::new();
    let report = assemble_video(&sources, &small_opts(), &mut sink).unwrap();

    assert_eq!(report.frames_written, 1);
    assert_eq!(report.frames_skipped, 1);
    assert_eq!(sink.frames().len(), 1);
    assert!(sink.is_finished());

    // Sorted by name: a_good first, then b_bad.
    assert_eq!(report.files[0].path, dir.join("a_good.csv"));
    assert_eq!(
        report.files[0].outcome,
        FileOutcome::Written { frame_index: 0 }
    );
    assert!(matches!(
        &report.files[1].outcome,
        FileOutcome::Skipped { reason } if reason.contains("no data")
    ));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn frames_follow_file_name_order() {
    let dir = scratch_dir("order");
    // The top-left cell differs per file, so the first pixel identifies the source.
    let sources = vec![
        write(&dir, "03.csv", "Image Data\n9;0;0\n"),
        write(&dir, "01.csv", "Image Data\n0;9;9\n"),
        write(&dir, "02.csv", "Image Data\n5;0;9\n"),
    ];
    let mut sink = InMemorySink::new();
    let opts = AssembleOpts {
        filter: ResizeFilter::Nearest,
        ..small_opts()
    };
    let report = assemble_video(&sources, &opts, &mut sink).unwrap();
    assert_eq!(report.frames_written, 3);

    let names: Vec<_> = report
        .files
        .iter()
        .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["01.csv", "02.csv", "03.csv"]);

    let first_px: Vec<[u8; 3]> = sink
        .frames()
        .iter()
        .map(|(_, f)| [f.data[0], f.data[1], f.data[2]])
        .collect();
    let pipeline = FramePipeline::new(&opts).unwrap();
    let expect = |text: &str| {
        let f = pipeline.prepare_text(text).unwrap();
        [f.data[0], f.data[1], f.data[2]]
    };
    assert_eq!(
        first_px,
        vec![
            expect("Image Data\n0;9;9\n"),
            expect("Image Data\n5;0;9\n"),
            expect("Image Data\n9;0;0\n"),
        ]
    );
    let indices: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn n_files_with_k_bad_gives_n_minus_k_frames() {
    let dir = scratch_dir("n_minus_k");
    let mut sources = Vec::new();
    for i in 0..7u32 {
        let body = if i.is_multiple_of(3) { "Image Data\nx;y;z\n" } else { GOOD };
        sources.push(write(&dir, &format!("f{i}.csv"), body));
    }
    sources.push(dir.join("missing.csv"));

    let mut sink = InMemorySink::new();
    let report = assemble_video(&sources, &small_opts(), &mut sink).unwrap();
    assert_eq!(report.frames_skipped, 4);
    assert_eq!(report.frames_written, 4);
    assert_eq!(report.files.len(), sources.len());
    assert_eq!(report.skipped().count(), 4);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn all_bad_is_empty_sequence_and_sink_never_starts() {
    let dir = scratch_dir("all_bad");
    let sources = vec![
        write(&dir, "a.csv", "nothing"),
        write(&dir, "b.csv", "Image Data\n\n"),
    ];
    let mut sink = InMemorySink::new();
    let err = assemble_video(&sources, &small_opts(), &mut sink).unwrap_err();
    assert!(matches!(err, ThermaError::EmptySequence { sources: 2 }));
    assert!(sink.config().is_none());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn no_sources_is_empty_sequence() {
    let mut sink = InMemorySink::new();
    let err = assemble_video(&[], &small_opts(), &mut sink).unwrap_err();
    assert!(matches!(err, ThermaError::EmptySequence { sources: 0 }));
}

#[test]
fn frames_match_configured_resolution() {
    let dir = scratch_dir("resolution");
    let sources = vec![write(&dir, "a.csv", GOOD)];
    let mut sink = InMemorySink::new();
    let opts = AssembleOpts {
        expected_cols: 3,
        ..Default::default()
    };
    assemble_video(&sources, &opts, &mut sink).unwrap();
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (400, 400));
    assert_eq!(cfg.fps.num, 10);
    let (_, frame) = &sink.frames()[0];
    assert_eq!(frame.data.len(), 400 * 400 * 3);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn parallel_matches_sequential() {
    let dir = scratch_dir("parallel");
    let mut sources = Vec::new();
    for i in 0..9 {
        let body = if i == 4 {
            "garbage".to_owned()
        } else {
            format!("Image Data\n{i};1;2\n3;{};5\n", i * 2)
        };
        sources.push(write(&dir, &format!("s{i:02}.csv"), &body));
    }

    let mut seq = InMemorySink::new();
    let seq_report = assemble_video(&sources, &small_opts(), &mut seq).unwrap();

    let par_opts = AssembleOpts {
        parallel: true,
        threads: Some(3),
        chunk_size: 2,
        ..small_opts()
    };
    let mut par = InMemorySink::new();
    let par_report = assemble_video(&sources, &par_opts, &mut par).unwrap();

    assert_eq!(seq_report, par_report);
    assert_eq!(seq.frames(), par.frames());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_options_fail_before_touching_files() {
    let mut sink = InMemorySink::new();
    let opts = AssembleOpts {
        fps: 0,
        ..small_opts()
    };
    assert!(matches!(
        assemble_video(&[PathBuf::from("x.csv")], &opts, &mut sink),
        Err(ThermaError::Validation(_))
    ));
}
