use chrono::{Duration, NaiveDate, NaiveDateTime};
use nestedcv::{DataSplitter, FoldSplit, MonthYear, NestedCvError, NestedCvSplitter};
use polars::df;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn daily(start: NaiveDate, days: i64) -> Vec<NaiveDate> {
    (0..days).map(|d| start + Duration::days(d)).collect()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn daily_frame(start: NaiveDate, days: i64) -> DataFrame {
    let dates = daily(start, days);
    let ids: Vec<i32> = (0..days as i32).collect();
    df! {
        "date" => dates,
        "id" => ids,
    }
    .unwrap()
}

fn collect_folds(k: usize, df: &DataFrame) -> Vec<FoldSplit> {
    NestedCvSplitter::new(k)
        .unwrap()
        .split(df, "date")
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// Days since the epoch for every row of the date column
fn day_numbers(df: &DataFrame) -> Vec<i32> {
    let days = df
        .column("date")
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Int32)
        .unwrap();
    days.i32().unwrap().into_iter().flatten().collect()
}

fn ids(df: &DataFrame) -> Vec<i32> {
    df.column("id")
        .unwrap()
        .as_materialized_series()
        .i32()
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}

fn months_2022(range: std::ops::Range<u32>) -> Vec<MonthYear> {
    range.map(|m| MonthYear::new(2022, m)).collect()
}

fn assert_time_ordered(folds: &[FoldSplit]) {
    for fold in folds {
        let train_max = day_numbers(&fold.training).into_iter().max();
        let val_min = day_numbers(&fold.validation).into_iter().min();
        if let (Some(train_max), Some(val_min)) = (train_max, val_min) {
            assert!(train_max <= val_min, "fold {} leaks validation dates", fold.fold);
        }
        if let (Some(last_train), Some(first_val)) =
            (fold.training_months.last(), fold.validation_months.first())
        {
            assert!(last_train < first_val);
        }
    }
}

#[test]
fn test_k_equals_1() {
    // Jan, Feb, Mar and the first 10 days of Apr 2022
    let df = daily_frame(ymd(2022, 1, 1), 100);
    let folds = collect_folds(1, &df);

    assert_eq!(folds.len(), 1);
    let fold = &folds[0];
    assert_eq!(fold.fold, 1);
    assert_eq!(fold.training_months, months_2022(1..3));
    assert_eq!(fold.validation_months, months_2022(3..5));
    assert_eq!(fold.training_rows(), 31 + 28);
    assert_eq!(fold.validation_rows(), 31 + 10);
    assert_time_ordered(&folds);
}

#[test]
fn test_twelve_months_three_folds() {
    let df = daily_frame(ymd(2022, 1, 1), 365);
    let folds = collect_folds(3, &df);

    assert_eq!(folds.len(), 3);
    assert_eq!(folds[0].training_months, months_2022(1..4));
    assert_eq!(folds[0].validation_months, months_2022(4..7));
    assert_eq!(folds[1].training_months, months_2022(1..7));
    assert_eq!(folds[1].validation_months, months_2022(7..10));
    assert_eq!(folds[2].training_months, months_2022(1..10));
    assert_eq!(folds[2].validation_months, months_2022(10..13));

    assert_eq!(folds[0].training_rows(), 31 + 28 + 31);
    assert_eq!(folds[2].validation_rows(), 31 + 30 + 31);
    assert_time_ordered(&folds);
}

#[test]
fn test_last_fold_absorbs_trailing_months() {
    // 14 months with 3 folds: window = 14 / 4 = 3, two months left over
    let dates: Vec<NaiveDate> = (0..14u32)
        .map(|m| ymd(2022 + (m / 12) as i32, m % 12 + 1, 15))
        .collect();
    let df = df! { "date" => dates }.unwrap();
    let folds = collect_folds(3, &df);

    assert_eq!(folds[0].validation_months.len(), 3);
    assert_eq!(folds[1].validation_months.len(), 3);
    assert_eq!(folds[2].training_months.len(), 9);
    assert_eq!(folds[2].validation_months.len(), 5);
    assert_eq!(folds[2].validation_months.last(), Some(&MonthYear::new(2023, 2)));
    assert_eq!(folds[2].training_rows() + folds[2].validation_rows(), 14);
}

#[test]
fn test_large_dataset() {
    let df = daily_frame(ymd(2021, 1, 1), 20_000);
    let folds = collect_folds(5, &df);

    assert_eq!(folds.len(), 5, "Incorrect number of splits");
    assert_time_ordered(&folds);

    for pair in folds.windows(2) {
        assert!(pair[0].training_rows() <= pair[1].training_rows());
        assert!(pair[1]
            .training_months
            .starts_with(&pair[0].training_months));
    }
    for (idx, fold) in folds.iter().enumerate() {
        assert_eq!(fold.fold, idx + 1);
        assert!(fold.training_rows() > 0);
        assert!(fold.validation_rows() > 0);
    }
}

#[test]
fn test_output_columns_match_input() {
    let df = daily_frame(ymd(2022, 1, 1), 200);
    let folds = collect_folds(2, &df);

    for fold in folds {
        assert_eq!(fold.training.get_column_names(), df.get_column_names());
        assert_eq!(fold.validation.get_column_names(), df.get_column_names());
        assert_eq!(fold.training.width(), fold.validation.width());
    }
}

#[test]
fn test_input_is_not_mutated() {
    let df = daily_frame(ymd(2022, 1, 1), 120);
    let reversed = df.reverse();
    let original = reversed.clone();

    let _ = collect_folds(2, &reversed);

    assert!(reversed.equals(&original));
    assert_eq!(reversed.width(), 2);
}

#[test]
fn test_split_is_idempotent() {
    let df = daily_frame(ymd(2022, 1, 1), 400);

    let first = collect_folds(3, &df);
    let second = collect_folds(3, &df);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert!(a.training.equals(&b.training));
        assert!(a.validation.equals(&b.validation));
        assert_eq!(a.training_months, b.training_months);
        assert_eq!(a.validation_months, b.validation_months);
    }
}

#[test]
fn test_ties_keep_input_order() {
    let df = df! {
        "date" => &[ymd(2022, 1, 5), ymd(2022, 1, 5), ymd(2022, 1, 1), ymd(2022, 2, 1)],
        "id" => &[0i32, 1, 2, 3],
    }
    .unwrap();

    let folds = collect_folds(1, &df);
    assert_eq!(ids(&folds[0].training), vec![2, 0, 1]);
    assert_eq!(ids(&folds[0].validation), vec![3]);
}

#[test]
fn test_shuffled_input_gives_same_folds() {
    let ordered = daily(ymd(2022, 1, 1), 365);
    let mut shuffled = ordered.clone();
    shuffled.shuffle(&mut StdRng::seed_from_u64(7));

    let ordered_folds = collect_folds(3, &df! { "date" => ordered }.unwrap());
    let shuffled_folds = collect_folds(3, &df! { "date" => shuffled }.unwrap());

    for (a, b) in ordered_folds.iter().zip(shuffled_folds.iter()) {
        assert_eq!(day_numbers(&a.training), day_numbers(&b.training));
        assert_eq!(day_numbers(&a.validation), day_numbers(&b.validation));
    }
}

#[test]
fn test_datetime_column() {
    let start = ymd(2022, 1, 1).and_hms_opt(0, 0, 0).unwrap();
    let stamps: Vec<NaiveDateTime> = (0..24 * 120).map(|h| start + Duration::hours(h)).collect();
    let df = df! { "date" => stamps }.unwrap();

    let folds: Vec<FoldSplit> = NestedCvSplitter::new(1)
        .unwrap()
        .split(&df, "date")
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(folds.len(), 1);
    assert_eq!(folds[0].training_months, months_2022(1..3));
    assert_eq!(folds[0].validation_months, months_2022(3..5));
    assert_eq!(folds[0].training_rows(), 24 * (31 + 28));
}

#[test]
fn test_empty_input() {
    let df = df! { "date" => Vec::<NaiveDate>::new() }.unwrap();

    let result = NestedCvSplitter::new(3).unwrap().split(&df, "date");
    assert!(matches!(result, Err(NestedCvError::EmptyInput)));
}

#[test]
fn test_missing_date_column() {
    let df = daily_frame(ymd(2022, 1, 1), 10);

    let result = NestedCvSplitter::new(1).unwrap().split(&df, "timestamp");
    assert!(matches!(result, Err(NestedCvError::DateProcessing(_))));
}

#[test]
fn test_unparseable_date_column() {
    let df = df! { "date" => &["2022-01-01", "2022-02-01"] }.unwrap();

    let result = NestedCvSplitter::new(1).unwrap().split(&df, "date");
    assert!(matches!(result, Err(NestedCvError::DateProcessing(_))));
}

#[test]
fn test_early_stop() {
    let df = daily_frame(ymd(2022, 1, 1), 365);
    let mut folds = NestedCvSplitter::new(3).unwrap().split(&df, "date").unwrap();

    let first = folds.next().unwrap().unwrap();
    assert_eq!(first.fold, 1);
    assert_eq!(folds.len(), 2);
    drop(folds);

    let (training, validation) = first.into_pair();
    assert_eq!(training.height(), 31 + 28 + 31);
    assert_eq!(validation.height(), 30 + 31 + 30);
}

#[test]
fn test_splitter_config() {
    let splitter = NestedCvSplitter::new(4).unwrap();
    assert_eq!(splitter.config().n_folds, 4);
    assert!(NestedCvSplitter::new(0).is_err());
}

#[test]
fn test_time_zone_aware_column_buckets_by_local_month() {
    // 23:30 UTC on the last day of a month is already the next month in Tokyo.
    let start = ymd(2022, 1, 31).and_hms_opt(23, 30, 0).unwrap();
    let stamps: Vec<NaiveDateTime> = (0..3).map(|i| start + Duration::days(30 * i)).collect();
    let mut df = df! { "date" => stamps }.unwrap();

    let tz = TimeZone::opt_try_new(Some("Asia/Tokyo")).unwrap();
    let local = df
        .column("date")
        .unwrap()
        .cast(&DataType::Datetime(TimeUnit::Microseconds, tz))
        .unwrap();
    df.with_column(local).unwrap();

    let folds = collect_folds(1, &df);
    assert_eq!(folds.len(), 1);
    assert_eq!(folds[0].training_months, months_2022(2..3));
    assert_eq!(folds[0].validation_months, months_2022(3..5));
    assert_eq!(folds[0].training_rows(), 1);
    assert_eq!(folds[0].validation_rows(), 2);
}
