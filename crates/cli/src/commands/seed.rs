//! Seed the database with the sample menu and a default admin account.
//!
//! Idempotent: an existing admin or a non-empty catalog is left untouched.

use rust_decimal::Decimal;
use sqlx::PgPool;

use tavola_core::{Category, Email};
use tavola_server::auth::hash_password;
use tavola_server::db::admins::AdminRepository;
use tavola_server::db::menu_items::MenuItemRepository;
use tavola_server::validation::NewMenuItem;

use super::{CommandError, database_url};

struct SeedItem {
    name: &'static str,
    description: &'static str,
    price: &'static str,
    category: Category,
    image: &'static str,
}

const SAMPLE_MENU: &[SeedItem] = &[
    SeedItem {
        name: "Truffle Mushroom Soup",
        description: "Creamy wild mushroom soup with truffle oil and fresh herbs",
        price: "12.99",
        category: Category::Appetizer,
        image: "https://images.unsplash.com/photo-1547592166-23acbe3a624b?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Crispy Calamari",
        description: "Tender calamari rings, lightly fried with garlic aioli",
        price: "14.99",
        category: Category::Appetizer,
        image: "https://images.unsplash.com/photo-1599084993091-1cb5c0721cc6?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Grilled Ribeye Steak",
        description: "Prime ribeye with herb butter, roasted vegetables, and mashed potatoes",
        price: "42.99",
        category: Category::MainCourse,
        image: "https://images.unsplash.com/photo-1600891964092-4316c288032e?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Pan-Seared Salmon",
        description: "Atlantic salmon with lemon butter sauce and seasonal greens",
        price: "32.99",
        category: Category::MainCourse,
        image: "https://images.unsplash.com/photo-1467003909585-2f8a72700288?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Chicken Parmesan",
        description: "Breaded chicken breast with marinara, mozzarella, and spaghetti",
        price: "24.99",
        category: Category::MainCourse,
        image: "https://images.unsplash.com/photo-1632778149955-e80f8ceca2e8?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Lobster Thermidor",
        description: "Whole lobster with creamy cognac sauce and gruyere cheese",
        price: "58.99",
        category: Category::Special,
        image: "https://images.unsplash.com/photo-1551248429-40975aa4de74?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Chocolate Lava Cake",
        description: "Warm chocolate cake with molten center and vanilla ice cream",
        price: "10.99",
        category: Category::Dessert,
        image: "https://images.unsplash.com/photo-1606313564200-e75d5e30476c?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Creme Brulee",
        description: "Classic vanilla custard with caramelized sugar crust",
        price: "9.99",
        category: Category::Dessert,
        image: "https://images.unsplash.com/photo-1470324161839-ce2bb6fa6bc3?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "Artisan Lemonade",
        description: "Freshly squeezed lemons with mint and sparkling water",
        price: "5.99",
        category: Category::Beverage,
        image: "https://images.unsplash.com/photo-1513558161293-cdaf765ed2fd?w=400&h=300&fit=crop",
    },
    SeedItem {
        name: "House Red Wine",
        description: "Premium Cabernet Sauvignon from Napa Valley",
        price: "12.99",
        category: Category::Beverage,
        image: "https://images.unsplash.com/photo-1510812431401-41d2bd2722f3?w=400&h=300&fit=crop",
    },
];

/// Seed the catalog and default admin account.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert fails.
pub async fn run(admin_email: &str, admin_password: &str) -> Result<(), CommandError> {
    let email =
        Email::parse(admin_email).map_err(|e| CommandError::InvalidEmail(e.to_string()))?;

    let database_url = database_url()?;
    let pool = PgPool::connect(&database_url).await?;

    seed_admin(&pool, &email, admin_password).await?;
    seed_menu(&pool).await?;

    tracing::info!("Database seed complete");
    pool.close().await;
    Ok(())
}

async fn seed_admin(pool: &PgPool, email: &Email, password: &str) -> Result<(), CommandError> {
    let existing: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM admin)")
        .fetch_one(pool)
        .await?;
    if existing {
        tracing::info!("Admin account already exists, skipping");
        return Ok(());
    }

    let password_hash = hash_password(password)?;
    let admin = AdminRepository::new(pool)
        .create(email, "Administrator", &password_hash)
        .await?;

    tracing::info!(admin_id = %admin.id, email = %admin.email, "default admin created");
    Ok(())
}

async fn seed_menu(pool: &PgPool) -> Result<(), CommandError> {
    let existing: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM menu_item)")
        .fetch_one(pool)
        .await?;
    if existing {
        tracing::info!("Menu items already exist, skipping");
        return Ok(());
    }

    let repository = MenuItemRepository::new(pool);
    for item in SAMPLE_MENU {
        let price: Decimal = item
            .price
            .parse()
            .map_err(|_| CommandError::InvalidSeed(format!("bad price for {}", item.name)))?;
        repository
            .create(NewMenuItem {
                name: item.name.to_owned(),
                description: item.description.to_owned(),
                price,
                image: Some(item.image.to_owned()),
                category: item.category,
                is_available: true,
            })
            .await?;
    }

    tracing::info!("Created {} menu items", SAMPLE_MENU.len());
    Ok(())
}
