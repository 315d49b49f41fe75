use eclis_druid::{
    commands::registration::ReviewSettings,
    config::Config,
    connection, handler,
    platform::{ChatPlatform, TelegramPlatform},
    scheduler::{Scheduler, TokioScheduler},
    services::Services,
    types::RegistrationState,
    webhook,
};
use std::error::Error;
use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::*};
use tera::Tera;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    log::info!("Starting...");
    let config = Config::init()?;
    log::info!("Initialized config...");

    let _sentry = config.sentry_url.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let connection = Arc::new(connection::init(&config.db_url).await?);
    let tera = Arc::new(Tera::new("templates/**/*")?);
    log::info!("Loaded templates...");

    let bot = Bot::new(&config.bot_token);
    let me = bot.get_me().await?;
    log::info!("Logged in as @{}", me.username());

    let platform: Arc<dyn ChatPlatform> = Arc::new(TelegramPlatform::new(bot.clone(), me.user.id));
    let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler::new(platform.clone()));
    let services = Services::new(connection, platform, scheduler, &config);
    let review = ReviewSettings {
        review_group_id: config.review_group_id.map(ChatId),
        accepted_group_id: config.accepted_group_id.map(ChatId),
    };
    if review.review_group_id.is_none() {
        log::warn!("REVIEW_GROUP_ID is not set, registration is closed");
    }

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler::schema())
        .dependencies(dptree::deps![
            services,
            review,
            tera,
            InMemStorage::<RegistrationState>::new()
        ])
        .distribution_function(|_| Some(()))
        .default_handler(|update| async move {
            log::debug!("Unhandled update: {:?}", update.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build();

    log::info!("Started listening...");
    match config.webhook_url.as_deref() {
        Some(url) => {
            let listener = webhook::listener(bot, url, config.port).await?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
        None => dispatcher.dispatch().await,
    }

    Ok(())
}
