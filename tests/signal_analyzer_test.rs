mod common_test_utils;
use common_test_utils::*;

use stock_signal::analyzer::SignalAnalyzer;
use stock_signal::config::AnalyzerConfig;
use stock_signal::config_loader::{ConfigFormat, ConfigLoader};
use stock_signal::indicator::columns::*;
use stock_signal::model::{ScoreRow, Signal};

#[test]
fn test_columns_align_with_input() {
    let analyzer = SignalAnalyzer::default();
    let series = analyzer.analyze(create_wave_series(70, 12.0, 8.0));

    for name in series.value_columns() {
        assert_eq!(series.column(name).unwrap().len(), 70, "{}", name);
    }
    for name in series.flag_columns() {
        assert_eq!(series.flag_column(name).unwrap().len(), 70, "{}", name);
    }

    let ma_long = series.column(MA_LONG).unwrap();
    assert!(ma_long[..59].iter().all(Option::is_none));
    assert!(ma_long[59..].iter().all(Option::is_some));
    let rsi = series.column(RSI).unwrap();
    assert!(rsi[..13].iter().all(Option::is_none));
}

#[test]
fn test_cross_pairs_are_mutually_exclusive() {
    let series = SignalAnalyzer::default().analyze(create_wave_series(200, 15.0, 10.0));
    for (golden, death) in [
        (MA_GOLDEN_CROSS, MA_DEATH_CROSS),
        (MACD_GOLDEN_CROSS, MACD_DEATH_CROSS),
        (KDJ_KD_GOLDEN_CROSS, KDJ_KD_DEATH_CROSS),
    ] {
        let golden_at = true_indices(&series, golden);
        let death_at = true_indices(&series, death);
        assert!(!golden_at.is_empty(), "{}", golden);
        assert!(!death_at.is_empty(), "{}", death);
        assert!(golden_at.iter().all(|i| !death_at.contains(i)));
    }
}

#[test]
fn test_flat_series() {
    let series = SignalAnalyzer::default().analyze(create_flat_series(30, 50.0));

    let rsi = series.column(RSI).unwrap();
    assert!(rsi[13..].iter().all(|value| *value == Some(100.0)));
    for column in [
        MA_GOLDEN_CROSS,
        MA_DEATH_CROSS,
        MACD_GOLDEN_CROSS,
        MACD_DEATH_CROSS,
        KDJ_KD_GOLDEN_CROSS,
        KDJ_KD_DEATH_CROSS,
    ] {
        assert!(true_indices(&series, column).is_empty(), "{}", column);
    }
}

#[test]
fn test_step_up_single_golden_cross() {
    let series = SignalAnalyzer::default().analyze(create_step_up_series());
    assert_eq!(true_indices(&series, MA_GOLDEN_CROSS), vec![20]);
    assert!(series.value(MA_SHORT, 20).unwrap() > series.value(MA_MEDIUM, 20).unwrap());
    assert!(series.value(MA_SHORT, 19).unwrap() <= series.value(MA_MEDIUM, 19).unwrap());
}

#[test]
fn test_declining_series_oversold_is_level_triggered() {
    let series = SignalAnalyzer::default().analyze(create_downtrend_series(20, 100.0, 2.0));
    let oversold = true_indices(&series, RSI_OVERSOLD);
    assert_eq!(oversold, (13..20).collect::<Vec<_>>());
    assert!(oversold.iter().all(|i| series.value(RSI, *i).unwrap() < 35.0));
}

#[test]
fn test_kdj_j_is_not_clamped() {
    let mut closes: Vec<f64> = (0..15).map(|i| 100.0 - i as f64 * 2.0).collect();
    closes.extend((1..=10).map(|i| 72.0 + i as f64 * 4.0));
    let series = SignalAnalyzer::default().analyze(create_series(&closes));

    let j = series.column(KDJ_J).unwrap();
    assert!(j.iter().flatten().any(|value| *value > 100.0));
    for value in series.column(KDJ_K).unwrap().iter().flatten() {
        assert!((0.0..=100.0).contains(value));
    }
}

#[test]
fn test_trends_classify_latest_bar() {
    let analyzer = SignalAnalyzer::default();

    let up = analyzer.analyze(create_uptrend_series(40, 100.0, 1.0));
    let latest = up.score(39).unwrap();
    assert_eq!(latest.signal, Signal::Sell);
    assert_eq!(latest.sell_score, 6);

    let down = analyzer.analyze(create_downtrend_series(40, 140.0, 1.0));
    let latest = down.score(39).unwrap();
    assert_eq!(latest.signal, Signal::Buy);
    assert_eq!(latest.buy_score, 6);

    let wave = analyzer.analyze(create_wave_series(43, 8.0, 10.0));
    assert_eq!(wave.score(42), Some(ScoreRow::default()));
}

#[test]
fn test_analyze_twice_keeps_columns() {
    let analyzer = SignalAnalyzer::default();
    let first = analyzer.analyze(create_wave_series(80, 10.0, 5.0));
    let second = analyzer.analyze(first.clone());

    assert_eq!(first.value_columns(), second.value_columns());
    for name in first.value_columns() {
        assert_eq!(first.column(name), second.column(name));
    }
    assert_eq!(first.scores(), second.scores());
}

#[test]
fn test_recent_signals() {
    let mut scores = vec![ScoreRow::default(); 10];
    scores[2] = ScoreRow {
        buy_score: 3,
        sell_score: 0,
        signal: Signal::Buy,
    };
    scores[7] = ScoreRow {
        buy_score: 0,
        sell_score: 6,
        signal: Signal::Sell,
    };
    scores[9] = ScoreRow {
        buy_score: 6,
        sell_score: 6,
        signal: Signal::Buy,
    };
    let series = create_uptrend_series(10, 10.0, 1.0)
        .with_scores(scores)
        .unwrap();

    let signals = SignalAnalyzer::default().get_recent_signals(&series, 5);
    assert_eq!(signals.len(), 2);
    assert_eq!(signals[0].date, trade_date(7));
    assert_eq!(signals[0].signal, Signal::Sell);
    assert_eq!(signals[0].price, 17.0);
    assert_eq!(signals[1].date, trade_date(9));
    assert_eq!(signals[1].signal, Signal::Buy);
    assert_eq!(
        signals[1].to_string(),
        "[매수] | 날짜: 2024-01-10 | 가격: 19.00 | 매수 점수: 6 | 매도 점수: 6"
    );
}

#[test]
fn test_config_changes_classification() {
    let toml_str = r#"
        [signal]
        sell_threshold = 4
    "#;
    let config: AnalyzerConfig =
        ConfigLoader::load_from_string(toml_str, ConfigFormat::Toml).unwrap();
    assert_eq!(config.signal.buy_threshold, 3);

    let series = SignalAnalyzer::new(config).analyze(create_flat_series(30, 50.0));
    let score = series.score(29).unwrap();
    assert_eq!(score.sell_score, 3);
    assert_eq!(score.signal, Signal::Hold);

    let series = SignalAnalyzer::default().analyze(create_flat_series(30, 50.0));
    assert_eq!(series.signal(29), Signal::Sell);
}

#[test]
fn test_report_for_last_bar() {
    let analyzer = SignalAnalyzer::default();
    let series = analyzer.analyze(create_downtrend_series(40, 140.0, 1.0));
    let report = analyzer.get_analysis_report(&series, None).unwrap();

    assert!(report.contains("거래일: 20240209"));
    assert!(report.contains("[RSI 과매도]"));
    assert!(report.contains("매수 신호 점수: 6 / 3"));
    assert!(report.contains("[매수 추천]"));
}
