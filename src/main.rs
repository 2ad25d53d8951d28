use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, warn};

// 从 lib.rs 导入模块
use rust_evalsystem::config::AppConfig;
use rust_evalsystem::models::AppStartTime;
use rust_evalsystem::routes;
use rust_evalsystem::runtime::lifetime;
use rust_evalsystem::services::{
    AssignmentService, AuthService, ComparisonService, EvaluationService, SurveyService,
    UserService,
};
use rust_evalsystem::utils::{json_error_handler, path_error_handler, query_error_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // 记录程序启动时间
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    // 初始化配置
    setup_panic!();
    AppConfig::init().map_err(std::io::Error::other)?;
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    warn!(
        "Starting pre-startup processing...
        Project: {}
        Version: {}
        System: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.system_name
    );

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| std::io::Error::other(e.format_simple()))?;
    let storage = startup.storage;

    // 服务在各工作线程间共享
    let auth_service = web::Data::new(AuthService::new(storage.clone()));
    let user_service = web::Data::new(UserService::new(storage.clone()));
    let survey_service = web::Data::new(SurveyService::new(storage.clone()));
    let assignment_service = web::Data::new(AssignmentService::new(storage.clone()));
    let evaluation_service = web::Data::new(EvaluationService::new(storage.clone()));
    let comparison_service = web::Data::new(ComparisonService::new(storage.clone()));

    debug!(
        "Pre-startup processing completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(app_start_time.start_datetime)
            .num_milliseconds()
    );

    warn!("Using {} CPU cores for the server", config.server.workers);

    let server = HttpServer::new(move || {
        let cors = config
            .cors
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| {
                if origin == "*" {
                    cors.allow_any_origin()
                } else {
                    cors.allowed_origin(origin)
                }
            })
            .allowed_methods(config.cors.allowed_methods.iter().map(String::as_str))
            .allowed_headers(config.cors.allowed_headers.iter().map(String::as_str))
            .max_age(config.cors.max_age);

        App::new()
            .wrap(cors)
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler)) // 查询参数错误处理
            .app_data(web::JsonConfig::default().error_handler(json_error_handler)) // JSON错误处理
            .app_data(web::PathConfig::default().error_handler(path_error_handler)) // 路径参数错误处理
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(auth_service.clone())
            .app_data(user_service.clone())
            .app_data(survey_service.clone())
            .app_data(assignment_service.clone())
            .app_data(evaluation_service.clone())
            .app_data(comparison_service.clone())
            .configure(routes::configure_auth_routes)
            .configure(routes::configure_user_routes)
            .configure(routes::configure_survey_routes)
            .configure(routes::configure_assignment_routes)
            .configure(routes::configure_evaluation_routes)
    })
    .keep_alive(std::time::Duration::from_secs(
        config.server.timeouts.keep_alive,
    )) // 启用长连接
    .client_request_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_request,
    )) // 客户端超时
    .client_disconnect_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_disconnect,
    )) // 断连超时
    .workers(config.server.workers);

    let bind_address = config.server_bind_address();
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(bind_address)?.run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
