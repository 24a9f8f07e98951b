use storefront::{
    config::database_url,
    db::{DbPool, create_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

/// Demo catalogue: name, price in minor units, image file under `static/images/`.
const PRODUCTS: [(&str, i64, &str); 20] = [
    ("Brake Pads", 120000, "brake.jpg"),
    ("Engine Oil", 90000, "oil.jpg"),
    ("Car Tyre", 450000, "tyre.jpg"),
    ("Spark Plug", 35000, "sparkplug.jpg"),
    ("Battery", 520000, "battery.jpg"),
    ("Clutch Plate", 220000, "clutch.jpg"),
    ("Bike Chain", 80000, "chain.jpg"),
    ("Air Filter", 60000, "airfilter.jpg"),
    ("Mirror", 50000, "mirror.jpg"),
    ("Horn", 30000, "horn.jpg"),
    ("Indicator", 25000, "indicator.jpg"),
    ("Shock", 200000, "shock.jpg"),
    ("Disc", 180000, "disc.jpg"),
    ("Cable", 15000, "cable.jpg"),
    ("Piston", 120000, "piston.jpg"),
    ("Gasket", 30000, "gasket.jpg"),
    ("Carburetor", 220000, "carburetor.jpg"),
    ("Silencer", 350000, "silencer.jpg"),
    ("Radiator", 400000, "radiator.jpg"),
    ("Fuel Pump", 320000, "fuelpump.jpg"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let database_url = database_url()?;
    let pool = create_pool(&database_url, 2).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin", "admin@example.com", "admin123", true).await?;
    let user_id = ensure_user(&pool, "customer", "user@example.com", "user123", false).await?;
    let inserted = seed_products(&pool).await?;

    tracing::info!(%admin_id, %user_id, products = inserted, "seed completed");
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    username: &str,
    email: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, is_admin)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET is_admin = EXCLUDED.is_admin
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(pool)
    .await?;

    tracing::info!(email, is_admin, "ensured user");
    Ok(user_id)
}

async fn seed_products(pool: &DbPool) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for (name, price, image) in PRODUCTS {
        let result = sqlx::query(
            r#"
            INSERT INTO products (id, name, price, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(price)
        .bind(image)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}
