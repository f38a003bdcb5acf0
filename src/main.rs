use clap::Parser;
use small_randomizer::adapters::catalog::catalog_from_source;
use small_randomizer::core::summary::{recent_history, render_history};
use small_randomizer::domain::ports::{ConfigProvider, Storage};
use small_randomizer::utils::error::RandomizerError;
use small_randomizer::utils::logger;
use small_randomizer::{
    AnySource, AppConfig, CliConfig, Command, DrawEvent, DrawScheduler, LocalStorage,
    MemoryStorage, Session, SystemClock, Timing,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

type CliSession<S> = Session<S, AnySource, SystemClock>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 創建存儲並運行子命令
    let code = if cli.ephemeral {
        tracing::info!("Ephemeral mode: nothing will be persisted");
        let storage = MemoryStorage::new().with_quota(config.storage_quota());
        run(&cli, &config, storage).await?
    } else {
        let storage = LocalStorage::new(config.store_dir()).with_quota(config.storage_quota());
        run(&cli, &config, storage).await?
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn report(e: &RandomizerError) -> i32 {
    tracing::warn!("{}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    // 配置錯誤退出碼為 1，其餘為 2
    if e.is_recoverable() {
        2
    } else {
        1
    }
}

async fn run<S: Storage + 'static>(
    cli: &CliConfig,
    config: &AppConfig,
    storage: S,
) -> Result<i32, Box<dyn std::error::Error>> {
    let catalog = match catalog_from_source(config.catalog_source(), config.catalog_timeout()) {
        Ok(catalog) => catalog,
        Err(e) => return Ok(report(&e)),
    };

    // 預設範圍以目錄為準，歷史與統計以持久化資料為準
    let mut session = Session::open(
        config,
        catalog.as_ref(),
        storage,
        AnySource::from_seed(cli.seed),
        SystemClock,
    )
    .await;

    match &cli.command {
        Command::Roll {
            min,
            max,
            preset,
            count,
        } => {
            let selected = match preset {
                Some(name) => session.select_preset(name).map(|_| ()),
                None if min.is_some() || max.is_some() => {
                    let (default_min, default_max) = config.default_bounds();
                    session
                        .set_range(min.unwrap_or(default_min), max.unwrap_or(default_max))
                        .map(|_| ())
                        .map_err(RandomizerError::from)
                }
                None => Ok(()),
            };
            if let Err(e) = selected {
                return Ok(report(&e));
            }

            for _ in 0..*count {
                match session.draw().await {
                    Ok(outcome) => {
                        println!("🎲 {}", outcome.record.number);
                        tracing::info!("{}", outcome.message());
                        if !outcome.persisted {
                            eprintln!("⚠️  The draw could not be saved");
                        }
                    }
                    Err(e) => return Ok(report(&e)),
                }
            }
        }
        Command::Play { min, max } => {
            if min.is_some() || max.is_some() {
                let (default_min, default_max) = config.default_bounds();
                if let Err(e) =
                    session.set_range(min.unwrap_or(default_min), max.unwrap_or(default_max))
                {
                    eprintln!("❌ {}", e);
                }
            }
            play(session, Timing::from_config(config), config.history_limit()).await?;
        }
        Command::Presets => {
            if session.presets().is_empty() {
                println!("No presets available");
            }
            for preset in session.presets() {
                println!("{:<20} {}", preset.label(), preset.description);
            }
        }
        Command::History { limit } => {
            let limit = limit.unwrap_or(config.history_limit());
            println!("{}", render_history(recent_history(session.store(), limit)));
        }
        Command::Stats => {
            println!("{}", session.summary());
            for entry in &session.store().statistics.most_frequent_numbers {
                println!("  {:>8} × {}", entry.number, entry.count);
            }
        }
        Command::Reset => {
            if let Err(e) = session.reset().await {
                return Ok(report(&e));
            }
            println!("History and statistics cleared");
        }
    }

    Ok(0)
}

const PLAY_HELP: &str = "Commands: <enter> or `go` to draw, `range MIN MAX`, `preset NAME`, `presets`, `stats`, `history`, `quit`";

async fn play<S: Storage + 'static>(
    session: CliSession<S>,
    timing: Timing,
    history_limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let shared = Arc::new(Mutex::new(session));
    let (mut scheduler, mut events) = DrawScheduler::new(Arc::clone(&shared), timing);

    // 事件輸出任務
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                DrawEvent::Pending { range } => println!("… drawing in {}", range),
                DrawEvent::Revealed(outcome) => {
                    println!("🎲 {}", outcome.record.number);
                    println!("{}", outcome.message());
                }
                DrawEvent::Failed { message } => eprintln!("❌ {}", message),
                DrawEvent::MessageCleared => tracing::debug!("Result message cleared"),
                DrawEvent::Cancelled => println!("(previous draw superseded)"),
            }
        }
    });

    {
        let session = shared.lock().await;
        match session.active_range() {
            Some(range) => println!("Active range: {}", range),
            None => println!("No valid range yet"),
        }
    }
    println!("{}", PLAY_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["quit"] | ["exit"] => break,
            [] | ["go"] => {
                if let Err(e) = scheduler.trigger().await {
                    eprintln!("❌ {}", e.user_friendly_message());
                }
            }
            ["range", min, max] => {
                let mut session = shared.lock().await;
                match session.set_range_from_input(min, max) {
                    Ok(range) => println!("Range set to {}", range),
                    Err(e) => eprintln!("❌ {}", e),
                }
            }
            ["preset", name @ ..] if !name.is_empty() => {
                let mut session = shared.lock().await;
                match session.select_preset(&name.join(" ")) {
                    Ok(range) => println!("Range set to {}", range),
                    Err(e) => eprintln!("❌ {}", e.user_friendly_message()),
                }
            }
            ["presets"] => {
                let session = shared.lock().await;
                for preset in session.presets() {
                    println!("{:<20} {}", preset.label(), preset.description);
                }
            }
            ["stats"] => println!("{}", shared.lock().await.summary()),
            ["history"] => {
                let session = shared.lock().await;
                println!(
                    "{}",
                    render_history(recent_history(session.store(), history_limit))
                );
            }
            _ => println!("{}", PLAY_HELP),
        }
    }

    scheduler.settle().await;
    drop(scheduler);
    let _ = printer.await;
    Ok(())
}
