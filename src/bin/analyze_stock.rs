use log::{debug, error, info, warn};
use std::env;
use std::path::PathBuf;
use std::process;
use stock_signal::analyzer::SignalAnalyzer;
use stock_signal::config::AnalyzerConfig;
use stock_signal::config_loader::{ConfigFormat, ConfigLoader};
use stock_signal::price_series::PriceSeries;

/// 최근 신호 조회 기본 일수
const DEFAULT_DAYS: usize = 10;

#[derive(Debug)]
struct CliArgs {
    csv_path: PathBuf,
    config_path: Option<PathBuf>,
    days: usize,
    output_path: Option<PathBuf>,
}

fn print_usage(program: &str) {
    println!(
        "사용법: {} <CSV_경로> [--config <설정_파일>] [--days <일수>] [--output <CSV_경로>]",
        program
    );
    println!("  CSV 헤더: trade_date(또는 date), open, high, low, close, volume(또는 vol, 선택)");
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut csv_path = None;
    let mut config_path = None;
    let mut days = DEFAULT_DAYS;
    let mut output_path = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("--config 값이 필요합니다")?;
                config_path = Some(PathBuf::from(value));
            }
            "--days" => {
                let value = iter.next().ok_or("--days 값이 필요합니다")?;
                days = value
                    .parse()
                    .map_err(|_| format!("잘못된 일수: {}", value))?;
            }
            "--output" => {
                let value = iter.next().ok_or("--output 값이 필요합니다")?;
                output_path = Some(PathBuf::from(value));
            }
            other if other.starts_with("--") => {
                return Err(format!("알 수 없는 옵션: {}", other));
            }
            other => {
                if csv_path.is_some() {
                    return Err(format!("CSV 경로가 두 번 지정되었습니다: {}", other));
                }
                csv_path = Some(PathBuf::from(other));
            }
        }
    }

    Ok(CliArgs {
        csv_path: csv_path.ok_or("CSV 경로가 필요합니다")?,
        config_path,
        days,
        output_path,
    })
}

fn load_config(path: Option<&PathBuf>) -> AnalyzerConfig {
    match path {
        Some(path) => match ConfigLoader::load_from_file(path, ConfigFormat::Auto) {
            Ok(config) => config,
            Err(err) => {
                error!("설정 로드 실패: {}", err);
                println!("설정 로드 실패: {}", err);
                process::exit(1);
            }
        },
        None => {
            debug!("설정 파일이 지정되지 않아 기본 설정 사용");
            AnalyzerConfig::default()
        }
    }
}

fn main() {
    // 로그 초기화
    env_logger::init();

    info!("주식 신호 분석기 시작");

    let args: Vec<String> = env::args().collect();
    debug!("커맨드 라인 인수: {:?}", args);
    let program = args.first().map(String::as_str).unwrap_or("analyze_stock");

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            error!("{}", msg);
            println!("{}", msg);
            print_usage(program);
            process::exit(2);
        }
    };

    let config = load_config(cli.config_path.as_ref());

    let series = match PriceSeries::from_csv_path(&cli.csv_path) {
        Ok(series) => series,
        Err(err) => {
            error!("데이터 로드 실패: {}", err);
            println!("데이터 로드 실패: {}", err);
            process::exit(1);
        }
    };

    if series.is_empty() {
        warn!("데이터가 비어 있습니다: {}", cli.csv_path.display());
        println!("분석할 데이터가 없습니다: {}", cli.csv_path.display());
        return;
    }

    let analyzer = SignalAnalyzer::new(config);
    let series = analyzer.analyze(series);

    match analyzer.get_analysis_report(&series, None) {
        Ok(report) => println!("{}", report),
        Err(err) => {
            error!("보고서 생성 실패: {}", err);
            println!("보고서 생성 실패: {}", err);
        }
    }

    println!("\n최근 {}일 매매 신호:", cli.days);
    let signals = analyzer.get_recent_signals(&series, cli.days);
    if signals.is_empty() {
        println!("  신호 없음");
    }
    for signal in &signals {
        println!("  {}", signal);
    }

    if let Some(output_path) = &cli.output_path {
        match series.to_csv_path(output_path) {
            Ok(()) => println!("\n분석 결과 저장: {}", output_path.display()),
            Err(err) => {
                error!("분석 결과 저장 실패: {}", err);
                println!("분석 결과 저장 실패: {}", err);
                process::exit(1);
            }
        }
    }

    info!("주식 신호 분석기 종료");
}
