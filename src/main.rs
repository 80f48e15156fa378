use dotenvy::dotenv;

use sudstack::logging::init_tracing;
use sudstack::router::init_router;
use sudstack::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    // Check if this is a CLI command
    if args.len() > 1 && args[1] == "create-superadmin" {
        handle_create_superadmin(args).await;
        return;
    }

    // Normal server startup
    init_tracing();

    let state = init_app_state().await;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .expect("Failed to run database migrations");

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📖 OpenAPI document at http://localhost:3000/api-docs/openapi.json");
    axum::serve(listener, app).await.unwrap();
}

async fn handle_create_superadmin(args: Vec<String>) {
    if args.len() != 6 {
        eprintln!(
            "Usage: {} create-superadmin <name> <email> <phone> <password>",
            args[0]
        );
        std::process::exit(1);
    }

    let name = &args[2];
    let email = &args[3];
    let phone = &args[4];
    let password = &args[5];

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    match sudstack::cli::create_super_admin(&pool, name, email, phone, password).await {
        Ok(account) => {
            println!("✅ Super admin created successfully!");
            println!("   Email: {}", account.email);
            println!("   Name: {}", account.name);
        }
        Err(e) => {
            eprintln!("❌ Error creating super admin: {}", e);
            std::process::exit(1);
        }
    }
}
