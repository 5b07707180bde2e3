use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use koco::config::Config;
use koco::detector::add_support_for_the_konami_code;
use koco::dom::Document;
use koco::services::{create_keyboard_listener, KonamiNotifier};
use koco::utils;

#[derive(Parser, Debug)]
#[command(name = "koco")]
#[command(about = "Распознаёт Konami Code (↑ ↑ ↓ ↓ ← → ← → B A), набранный на клавиатуре")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "koco.toml")]
    config: String,

    /// Режим сухого запуска: клавиши читаются из stdin
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,

    /// Требовать Enter после последовательности
    #[arg(long)]
    require_confirm_key: bool,

    /// Максимальная пауза между клавишами, мс (0 - без ограничений)
    #[arg(long)]
    max_interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let mut config = Config::load(&args.config)?;
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
        config.validate()?;
    }
    if args.require_confirm_key {
        config.detection.require_confirm_key = true;
    }
    if let Some(max_interval_ms) = args.max_interval_ms {
        config.detection.max_interval_ms = max_interval_ms;
    }
    let config = Arc::new(config);

    // Инициализация системы логирования
    init_tracing(&config)?;

    info!("Запуск koco v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - клавиши читаются из stdin");
    } else {
        utils::permissions::check_permissions()?;
    }

    // Документ - общая шина событий для источников нажатий и детектора
    let document = Arc::new(Document::new());
    let notifier = KonamiNotifier::attach(&config, &document)?;
    let support = add_support_for_the_konami_code(&document, config.detection.clone());
    let keyboard_listener = create_keyboard_listener(config.clone(), document.clone(), args.dry_run)?;

    info!("Все компоненты инициализированы");

    let mut keyboard_handle = tokio::spawn(async move {
        if let Err(e) = keyboard_listener.run().await {
            error!("Ошибка в KeyboardListener: {}", e);
        }
    });

    // Ожидание сигнала завершения или окончания ввода
    let listener_finished = tokio::select! {
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
            false
        }
        _ = &mut keyboard_handle => {
            info!("Источник нажатий завершил работу");
            true
        }
    };

    info!("Завершение работы...");

    support.remove();
    notifier.detach();

    if !listener_finished {
        keyboard_handle.abort();

        let shutdown_timeout = tokio::time::Duration::from_secs(5);
        match tokio::time::timeout(shutdown_timeout, keyboard_handle).await {
            Ok(_) => info!("Все сервисы завершили работу корректно"),
            Err(_) => warn!("Таймаут при завершении сервисов"),
        }
    }

    info!(
        "koco завершил работу, распознано последовательностей: {}",
        notifier.detections()
    );

    // Блокирующее чтение stdin не даёт рантайму завершиться, пока не придёт строка
    if args.dry_run && !listener_finished {
        std::process::exit(0);
    }

    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let directives = format!("{},{}", config.logging.level, config.logging.filter);
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(directives))?;

    let registry = tracing_subscriber::registry().with(filter);

    match config.logging.format.as_str() {
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    Ok(())
}
