mod common;

use common::{CLUSTER_DATA, SyntheticEngine, init_test_logging, scratch_entries};
use gamv_core::domain::{
    DataSource, DataTable, Direction, GamvErrorCategory, OutputTarget, VariogramDefinition,
    VariogramType,
};
use gamv_core::modules::output::RowKey;
use gamv_core::{EngineExecutor, EngineOutput, Gamv, GamvConfig, GamvResult};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn working_dir_with_cluster() -> TempDir {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(temp.path().join("cluster.dat"), CLUSTER_DATA).expect("data file should be written");
    temp
}

fn single_semivariogram() -> GamvConfig {
    GamvConfig::builder()
        .with_data_source(DataSource::File("cluster.dat".into()))
        .with_variable_columns(vec![4, 5])
        .with_lags(5, 5.0, 2.5)
        .with_direction(Direction::omnidirectional(50.0))
        .with_variogram(VariogramDefinition::new(1, 1, 1, None))
        .build()
        .expect("config should validate")
}

#[test]
fn single_semivariogram_yields_one_row_per_lag_class() {
    init_test_logging();
    let temp = working_dir_with_cluster();
    let engine = SyntheticEngine::new();

    let run = Gamv::new(&engine)
        .with_working_dir(temp.path())
        .run(&single_semivariogram())
        .expect("run should succeed");

    let table = &run.table;
    assert_eq!(table.len(), 7);
    assert_eq!(
        table.rows().iter().map(|row| row.lag).collect::<Vec<_>>(),
        (0..7).collect::<Vec<_>>()
    );
    for row in table.rows() {
        assert_eq!((row.tail, row.head), (1, 1));
        assert_eq!(row.variogram_type, VariogramType::Semivariogram);
        assert_eq!(row.cutoff, None);
        assert_eq!(row.tail_variance, None);
    }
    assert!(!table.reports_variances());
    assert_eq!(table.get(RowKey::new(0, 0, 2)).and_then(|row| row.value), Some(0.3));
    assert!(run.engine_stdout.contains("GAMV Finished"));
    assert_eq!(run.output_path, None);
}

#[test]
fn covariance_request_adds_variance_columns_everywhere() {
    init_test_logging();
    let temp = working_dir_with_cluster();
    let engine = SyntheticEngine::new();
    let config = GamvConfig::builder()
        .with_data_source(DataSource::File("cluster.dat".into()))
        .with_coordinate_columns(1, 2, 0)
        .with_variable_columns(vec![4, 5])
        .with_lags(3, 5.0, 2.5)
        .with_direction(Direction::new(0.0, 22.5, 10.0, 0.0, 90.0, 10.0))
        .with_direction(Direction::new(90.0, 22.5, 10.0, 0.0, 90.0, 10.0))
        .with_variogram(VariogramDefinition::new(1, 1, 1, None))
        .with_variogram(VariogramDefinition::new(1, 2, 3, None))
        .with_variogram(VariogramDefinition::new(2, 2, 9, Some(17.0)))
        .build()
        .expect("config should validate");

    let run = Gamv::new(&engine)
        .with_working_dir(temp.path())
        .run(&config)
        .expect("run should succeed");

    let table = &run.table;
    assert_eq!(table.len(), 3 * 2 * 5);
    assert!(table.reports_variances());
    assert_eq!(table.column_names().len(), 8);
    assert!(table.rows().iter().all(|row| row.tail_variance == Some(0.25)));
    assert!(table.rows().iter().all(|row| row.head_variance == Some(0.5)));

    let indicator = table.series(2, 1).expect("indicator series should exist");
    assert_eq!(indicator.len(), 5);
    assert!(indicator.iter().all(|row| row.cutoff == Some(17.0) && row.tail == 2));
    assert_eq!(indicator[1].value, Some(2.2));
    assert_eq!(table.directions_of(1).count(), 2);

    let parameters = engine.last_call().parameters;
    assert_eq!(parameters.coordinate_columns, [1, 2, 0]);
    assert_eq!(parameters.directions.len(), 2);
    assert_eq!(parameters.variograms[2].cutoff, Some(17.0));
}

#[test]
fn indicator_without_cutoff_fails_before_anything_is_written() {
    let temp = working_dir_with_cluster();
    let error = GamvConfig::builder()
        .with_data_source(DataSource::File("cluster.dat".into()))
        .with_variable_columns(vec![4])
        .with_lags(5, 5.0, 2.5)
        .with_direction(Direction::omnidirectional(50.0))
        .with_variogram(VariogramDefinition::new(1, 1, 9, None))
        .build()
        .expect_err("indicator needs a cutoff");

    assert_eq!(error.category(), GamvErrorCategory::ConfigurationError);
    assert_eq!(error.placeholder(), "CONFIG.MISSING_CUTOFF");
    assert_eq!(
        fs::read_dir(temp.path()).expect("dir readable").count(),
        1,
        "only the data file should exist"
    );
}

#[test]
fn missing_data_file_stops_the_run_before_the_engine() {
    let temp = TempDir::new().expect("tempdir should be created");
    let engine = SyntheticEngine::new();

    let error = Gamv::new(&engine)
        .with_working_dir(temp.path())
        .run(&single_semivariogram())
        .expect_err("data file is absent");

    assert_eq!(error.category(), GamvErrorCategory::ConfigurationError);
    assert_eq!(error.placeholder(), "CONFIG.DATA_FILE_MISSING");
    assert!(engine.calls.borrow().is_empty());
    assert_eq!(fs::read_dir(temp.path()).expect("dir readable").count(), 0);
}

#[test]
fn pairless_lags_lose_value_and_means() {
    init_test_logging();
    let temp = working_dir_with_cluster();
    let engine = SyntheticEngine::with_pairless_lags([3_usize, 6]);

    let run = Gamv::new(&engine)
        .with_working_dir(temp.path())
        .run(&single_semivariogram())
        .expect("run should succeed");

    let rows = run.table.series(0, 0).expect("series should exist");
    for lag in [3, 6] {
        assert_eq!(rows[lag].pair_count, 0.0);
        assert_eq!(rows[lag].value, None);
        assert_eq!(rows[lag].tail_mean, None);
        assert_eq!(rows[lag].head_mean, None);
    }
    assert_eq!(rows[0].value, None, "zero separation has no statistic");
    assert_eq!(rows[0].tail_mean, Some(1.0));
    assert_eq!(rows[2].value, Some(0.3));
}

#[test]
fn in_memory_table_is_materialized_inside_scratch() {
    init_test_logging();
    let temp = TempDir::new().expect("tempdir should be created");
    let engine = SyntheticEngine::new();
    let table = DataTable::from_rows([
        [0.0, 0.0, 0.0, 0.12, 15.0],
        [5.0, 0.0, 0.0, 0.15, 18.0],
        [10.0, 0.0, 0.0, 0.11, 12.0],
    ])
    .expect("table should build");
    let config = GamvConfig::builder()
        .with_data_source(DataSource::Table(table))
        .with_coordinate_columns(4, 4, 4)
        .with_variable_columns(vec![1])
        .with_lags(2, 5.0, 2.5)
        .with_direction(Direction::omnidirectional(20.0))
        .with_variogram(VariogramDefinition::new(2, 2, 1, None))
        .build()
        .expect("config should validate");
    assert_eq!(config.variable_columns(), &[4, 5]);

    let run = Gamv::new(&engine)
        .with_working_dir(temp.path())
        .run(&config)
        .expect("run should succeed");
    assert_eq!(run.table.len(), 4);

    let call = engine.last_call();
    assert_eq!(call.parameters.coordinate_columns, [1, 2, 3]);
    assert_eq!(call.parameters.variable_columns, vec![4, 5]);
    assert!(call.parameters.data_file.ends_with("gamv_table.dat"));
    assert!(
        call.parameters
            .data_file
            .starts_with(gamv_core::pipeline::SCRATCH_PREFIX)
    );
    let data_text = call.data_text.expect("materialized table should exist during the run");
    assert!(data_text.starts_with("gamv in-memory sample table\n5\nx\ny\nz\nv1\nv2\n"));
    assert!(data_text.ends_with("10 0 0 0.11 12\n"));
    assert!(scratch_entries(temp.path()).is_empty());
}

#[test]
fn caller_output_target_is_kept_after_the_run() {
    let temp = working_dir_with_cluster();
    let engine = SyntheticEngine::new();
    let config = GamvConfig::builder()
        .with_data_source(DataSource::File("cluster.dat".into()))
        .with_variable_columns(vec![4])
        .with_output_target(OutputTarget::File("results.out".into()))
        .with_lags(1, 5.0, 2.5)
        .with_direction(Direction::omnidirectional(50.0))
        .with_variogram(VariogramDefinition::new(1, 1, 1, None))
        .build()
        .expect("config should validate");

    let run = Gamv::new(&engine)
        .with_working_dir(temp.path())
        .run(&config)
        .expect("run should succeed");

    let expected: PathBuf = temp.path().join("results.out");
    assert_eq!(run.output_path.as_deref(), Some(expected.as_path()));
    let kept = fs::read_to_string(&expected).expect("kept output should be readable");
    assert!(kept.starts_with("Variogram type 1"));
    assert_eq!(kept.lines().count(), 4);
    assert!(
        engine
            .last_call()
            .parameters
            .output_file
            .starts_with(gamv_core::pipeline::SCRATCH_PREFIX)
    );
    assert!(scratch_entries(temp.path()).is_empty());
}

#[test]
fn stale_caller_output_is_not_read_when_the_engine_writes_nothing() {
    let temp = working_dir_with_cluster();
    let config = GamvConfig::builder()
        .with_data_source(DataSource::File("cluster.dat".into()))
        .with_variable_columns(vec![4])
        .with_output_target(OutputTarget::File("results.out".into()))
        .with_lags(1, 5.0, 2.5)
        .with_direction(Direction::omnidirectional(50.0))
        .with_variogram(VariogramDefinition::new(1, 1, 1, None))
        .build()
        .expect("config should validate");
    let stale = "Semivariogram  tail:por  head:por  direction  1
   1   0.000   0.00000   0   0.00000   0.00000
   2   4.812   9.99000  38   0.13000   0.13100
   3  10.221   8.88000  52   0.12900   0.13200
";
    fs::write(temp.path().join("results.out"), stale).expect("stale output should be written");

    struct SilentEngine;

    impl EngineExecutor for SilentEngine {
        fn execute(&self, _: &Path, _: &Path) -> GamvResult<EngineOutput> {
            Ok(EngineOutput {
                stdout: "ERROR in parameter file!\n".to_string(),
                stderr: String::new(),
            })
        }
    }

    let error = Gamv::new(SilentEngine)
        .with_working_dir(temp.path())
        .run(&config)
        .expect_err("stale output must not be returned");

    assert_eq!(error.category(), GamvErrorCategory::IoSystemError);
    assert_eq!(error.placeholder(), "IO.OUTPUT_READ");
    assert_eq!(
        fs::read_to_string(temp.path().join("results.out")).expect("stale file readable"),
        stale
    );
    assert!(scratch_entries(temp.path()).is_empty());
}

#[test]
fn scratch_files_are_removed_after_success() {
    let temp = working_dir_with_cluster();
    let engine = SyntheticEngine::new();

    Gamv::new(&engine)
        .with_working_dir(temp.path())
        .run(&single_semivariogram())
        .expect("run should succeed");

    let call = engine.last_call();
    assert!(call.parameter_file.ends_with("gamv.par"));
    assert!(call.parameter_file.is_relative());
    assert!(call.parameter_text.contains("START OF PARAMETERS:"));
    assert!(!temp.path().join(&call.parameter_file).exists());
    assert!(scratch_entries(temp.path()).is_empty());
    assert!(!temp.path().join("gamv.par").exists());
}

#[test]
fn scratch_files_are_removed_when_the_output_does_not_parse() {
    let temp = working_dir_with_cluster();
    let engine = SyntheticEngine::new();
    let config = single_semivariogram();

    struct TruncatingEngine<'a>(&'a SyntheticEngine);

    impl EngineExecutor for TruncatingEngine<'_> {
        fn execute(&self, parameter_file: &Path, working_dir: &Path) -> GamvResult<EngineOutput> {
            let output = self.0.execute(parameter_file, working_dir)?;
            let written = working_dir.join(&self.0.last_call().parameters.output_file);
            let text = fs::read_to_string(&written).expect("output should exist");
            let truncated = text.lines().take(3).collect::<Vec<_>>().join("\n");
            fs::write(&written, truncated).expect("output should be rewritten");
            Ok(output)
        }
    }

    let error = Gamv::new(TruncatingEngine(&engine))
        .with_working_dir(temp.path())
        .run(&config)
        .expect_err("truncated output should fail");

    assert_eq!(error.category(), GamvErrorCategory::ParseFailure);
    assert_eq!(error.placeholder(), "PARSE.OUTPUT_LINE_COUNT");
    assert!(scratch_entries(temp.path()).is_empty());
}
