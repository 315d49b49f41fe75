use std::convert::Infallible;
use std::error::Error;
use std::net::SocketAddr;

use axum::routing::get;
use teloxide::{
    prelude::*,
    update_listeners::{webhooks, UpdateListener},
};

/// Webhook listener on `0.0.0.0:port`, with a health check on `GET /`.
pub async fn listener(
    bot: Bot,
    url: &str,
    port: u16,
) -> Result<impl UpdateListener<Err = Infallible>, Box<dyn Error>> {
    let address = SocketAddr::from(([0, 0, 0, 0], port));
    let options = webhooks::Options::new(address, url.parse()?);
    if options.url.path() == "/" {
        return Err("WEBHOOK_URL needs a path, the root is taken by the health check".into());
    }

    let (listener, stop_flag, router) = webhooks::axum_to_router(bot, options).await?;
    let app = router.route("/", get(|| async { "ok" }));

    tokio::spawn(async move {
        if let Err(err) = axum::Server::bind(&address)
            .serve(app.into_make_service())
            .with_graceful_shutdown(stop_flag)
            .await
        {
            log::error!("Webhook server failed: {}", err);
        }
    });
    log::info!("Listening for webhook updates on {}", address);

    Ok(listener)
}
