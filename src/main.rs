use chrono::{Datelike, Utc};
use dotenvy::dotenv;
use resale_tracker::{
    config::{app, database, users},
    core::{Session, item, item_type, totals::YearSelection},
    errors::Result,
    pipeline::InventoryPipeline,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = app::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    let view = app_config.default_view()?;

    // 4. Connect and make sure the tables exist
    let db = database::create_connection(&database::get_database_url(&app_config))
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Identify the user and seed their type vocabulary
    let session = Session::new(db, users::get_current_user_id()?);
    item_type::seed_item_types(&session, &app_config.item_types).await?;

    // 6. One pass of the pipeline
    let today = Utc::now().date_naive();
    let earliest = item::earliest_purchase_date(&session).await?;
    let pipeline = InventoryPipeline::new(session);

    pipeline.refresh_table(&view).await?;
    pipeline
        .refresh_totals(YearSelection::Year(today.year()), today.month())
        .await?;

    if let Some(table) = pipeline.table().latest() {
        info!("Items table: {} rows", table.value.len());
    }
    if let Some(totals) = pipeline.totals().latest() {
        let totals = totals.value;
        info!(
            "{}: spent {:.2}€, sold {:.2}€, profit {:.2}€",
            today.year(),
            totals.year_total_spent,
            totals.year_total_sold,
            totals.year_profit
        );
        info!(
            "{}-{:02}: spent {:.2}€, sold {:.2}€, profit {:.2}€",
            today.year(),
            today.month(),
            totals.month_total_spent,
            totals.month_total_sold,
            totals.month_profit
        );
    }
    if let Some(earliest) = earliest {
        info!("Tracking purchases since {}", earliest);
    }

    Ok(())
}
