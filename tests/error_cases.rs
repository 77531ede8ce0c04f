mod common;

use std::{
    fs,
    io::{self, ErrorKind},
    sync::Arc,
};

use anyhow::Result;
use csvclean::{
    CleanError,
    config::ConfigBuilder,
    core::{
        cancel::CancellationToken,
        counter::LineCounter,
        job::CleanJob,
        step::StepBuilder,
    },
    item::{
        csv::{csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder},
        encapsulate::EncapsulateProcessor,
    },
};
use tempfile::tempdir;

use common::{MockFile, leftover_temp_files, random_name, write_input};

#[test]
fn quote_swallowing_later_records_breaks_the_field_count() -> Result<()> {
    let dir = tempdir()?;
    let input = write_input(dir.path(), "data.csv", "a,b,c\nd,\"e,f\ng,h,i\n");
    let counter = Arc::new(LineCounter::new());

    let config = ConfigBuilder::new(&input).build()?;
    let result = CleanJob::new(config, CancellationToken::new(), Arc::clone(&counter)).run();

    match result {
        Err(CleanError::ItemReader { path, source }) => {
            assert_eq!(path, input);
            assert!(source.position().is_some());
        }
        other => panic!("expected a parse error, got {:?}", other.map(|_| ())),
    }

    // the record before the broken one was flushed
    assert_eq!(counter.get(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("data_clean.csv"))?,
        "\"a\",\"b\",\"c\"\n"
    );
    Ok(())
}

#[test]
fn quote_open_at_end_of_input_fails_the_run() -> Result<()> {
    let dir = tempdir()?;
    let input = write_input(dir.path(), "data.csv", "a,b\nc,\"d\n");
    let counter = Arc::new(LineCounter::new());

    let config = ConfigBuilder::new(&input).build()?;
    let result = CleanJob::new(config, CancellationToken::new(), Arc::clone(&counter)).run();

    match result {
        Err(CleanError::ItemReader { path, source }) => {
            assert_eq!(path, input);
            assert!(source.to_string().contains("line 2"));
        }
        other => panic!("expected a parse error, got {:?}", other.map(|_| ())),
    }

    assert_eq!(counter.get(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("data_clean.csv"))?,
        "\"a\",\"b\"\n"
    );
    Ok(())
}

#[test]
fn lone_record_with_open_quote_writes_nothing() -> Result<()> {
    let dir = tempdir()?;
    let input = write_input(dir.path(), "data.csv", "a,\"b,c\n");
    let counter = Arc::new(LineCounter::new());

    let config = ConfigBuilder::new(&input).build()?;
    let result = CleanJob::new(config, CancellationToken::new(), Arc::clone(&counter)).run();

    assert!(matches!(result, Err(CleanError::ItemReader { .. })));
    assert_eq!(counter.get(), 0);
    assert_eq!(fs::read_to_string(dir.path().join("data_clean.csv"))?, "");
    Ok(())
}

#[test]
fn in_place_open_quote_leaves_the_original_untouched() -> Result<()> {
    let dir = tempdir()?;
    let name = random_name("csv");
    let content = "a,b\nc,\"d\n";
    let input = write_input(dir.path(), &name, content);

    let config = ConfigBuilder::new(&input).in_place(true).build()?;
    let result = CleanJob::new(config, CancellationToken::new(), Arc::new(LineCounter::new())).run();

    assert!(matches!(result, Err(CleanError::ItemReader { .. })));
    assert_eq!(fs::read_to_string(&input)?, content);
    assert!(leftover_temp_files(&name).is_empty());
    Ok(())
}

#[test]
fn in_place_parse_error_leaves_the_original_untouched() -> Result<()> {
    let dir = tempdir()?;
    let name = random_name("csv");
    let content = "a,b\nc\n";
    let input = write_input(dir.path(), &name, content);

    let config = ConfigBuilder::new(&input).in_place(true).build()?;
    let result = CleanJob::new(config, CancellationToken::new(), Arc::new(LineCounter::new())).run();

    assert!(matches!(result, Err(CleanError::ItemReader { .. })));
    assert_eq!(fs::read_to_string(&input)?, content);
    assert!(leftover_temp_files(&name).is_empty());
    Ok(())
}

#[test]
fn missing_input_fails_before_creating_output() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("missing.csv");

    let config = ConfigBuilder::new(&input).build()?;
    let result = CleanJob::new(config, CancellationToken::new(), Arc::new(LineCounter::new())).run();

    match result {
        Err(CleanError::Io { path, source, .. }) => {
            assert_eq!(path, input);
            assert_eq!(source.kind(), ErrorKind::NotFound);
        }
        other => panic!("expected an I/O error, got {:?}", other.map(|_| ())),
    }
    assert!(!dir.path().join("missing_clean.csv").exists());
    Ok(())
}

#[test]
fn unwritable_output_directory_is_reported() -> Result<()> {
    let dir = tempdir()?;
    let input = write_input(dir.path(), "data.csv", "a\n");
    let output = dir.path().join("no/such/dir/out.csv");

    let config = ConfigBuilder::new(&input).output(Some(&output)).build()?;
    let result = CleanJob::new(config, CancellationToken::new(), Arc::new(LineCounter::new())).run();

    let error = result.err().ok_or_else(|| anyhow::anyhow!("expected a failure"))?;
    assert!(error.to_string().contains("opening output file"));
    assert!(error.to_string().contains("out.csv"));
    Ok(())
}

#[test]
fn bad_delimiter_is_rejected_before_any_io() -> Result<()> {
    let dir = tempdir()?;
    let input = write_input(dir.path(), "data.csv", "a\n");

    let result = ConfigBuilder::new(&input).delimiter("::").build();

    assert!(matches!(result, Err(CleanError::Configuration(_))));
    assert!(!dir.path().join("data_clean.csv").exists());
    Ok(())
}

#[test]
fn write_failure_surfaces_with_destination() -> Result<()> {
    let mut file = MockFile::default();
    file.expect_write()
        .returning(|_| Err(io::Error::other("disk full")));
    file.expect_flush().returning(|| Ok(()));

    let reader = CsvItemReaderBuilder::new().from_reader("a,b\nc,d\n".as_bytes());
    let processor = EncapsulateProcessor::new("\"", false);
    let writer = CsvItemWriterBuilder::new()
        .target_path("full-disk.csv")
        .from_writer(file);

    let step = StepBuilder::new("write-failure")
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .build()?;
    let result = step.execute();

    match result {
        Err(CleanError::Io { action, path, source }) => {
            assert_eq!(action, "flushing output file");
            assert_eq!(path.to_str(), Some("full-disk.csv"));
            assert_eq!(source.to_string(), "disk full");
        }
        other => panic!("expected a flush error, got {:?}", other.map(|_| ())),
    }
    Ok(())
}
