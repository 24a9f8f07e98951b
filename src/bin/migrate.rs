use storefront::{
    config::database_url,
    db::{create_pool, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let database_url = database_url()?;
    let pool = create_pool(&database_url, 1).await?;
    run_migrations(&pool).await?;
    tracing::info!("migrations applied");
    Ok(())
}
