//! Database seeder for Vola development and testing.
//!
//! Seeds a handful of movements across currencies and one partially-paid
//! trosa for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use vola_core::currency::{RateTable, normalize_to_base, resolve_rate};
use vola_core::movement::MovementType;
use vola_db::entities::{movements, trosa, trosa_payments};
use vola_shared::types::Currency;

/// Test user ID (consistent for all seeds)
const TEST_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Seeded trosa ID (consistent for all seeds)
const TEST_TROSA_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = vola_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding movements...");
    seed_movements(&db).await;

    println!("Seeding trosa with a partial payment...");
    seed_trosa(&db).await;

    println!("Seeding complete!");
}

fn test_user_id() -> Uuid {
    Uuid::parse_str(TEST_USER_ID).unwrap()
}

fn test_trosa_id() -> Uuid {
    Uuid::parse_str(TEST_TROSA_ID).unwrap()
}

/// Seeds sample movements in several currencies.
async fn seed_movements(db: &DatabaseConnection) {
    let existing = movements::Entity::find()
        .one(db)
        .await
        .expect("Failed to query movements");
    if existing.is_some() {
        println!("  Movements already exist, skipping...");
        return;
    }

    let rates = RateTable::default();
    let now = Utc::now();

    let samples = [
        (MovementType::Entry, Currency::Mga, Decimal::from(250_000), "Opening cash"),
        (MovementType::Entry, Currency::Usd, Decimal::from(100), "Wholesale sale"),
        (MovementType::Exit, Currency::Rmb, Decimal::from(450), "Supplier order"),
        (MovementType::Exit, Currency::Eur, Decimal::from(20), "Shipping fees"),
    ];

    for (movement_type, currency, amount, description) in samples {
        let row = movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(test_user_id()),
            movement_type: Set(movement_type.to_string()),
            currency: Set(currency.to_string()),
            amount: Set(amount),
            exchange_rate: Set(resolve_rate(currency, None, &rates)),
            amount_mga: Set(normalize_to_base(amount, currency, None, &rates)),
            description: Set(description.to_string()),
            date: Set(now.into()),
            author: Set("Test User".to_string()),
            responsible: Set("Test User".to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        row.insert(db).await.expect("Failed to insert movement");
    }

    println!("  Inserted {} movements", samples.len());
}

/// Seeds one trosa of 1000 MGA with a 600 MGA payment against it.
async fn seed_trosa(db: &DatabaseConnection) {
    if trosa::Entity::find_by_id(test_trosa_id())
        .one(db)
        .await
        .expect("Failed to query trosa")
        .is_some()
    {
        println!("  Test trosa already exists, skipping...");
        return;
    }

    let now = Utc::now();

    let debt = trosa::ActiveModel {
        id: Set(test_trosa_id()),
        user_id: Set(test_user_id()),
        debtor_name: Set("Rasoa".to_string()),
        description: Set(Some("Market stall advance".to_string())),
        montant_total: Set(Decimal::from(1000)),
        is_paid: Set(false),
        date_paiement: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    debt.insert(db).await.expect("Failed to insert trosa");

    let payment = trosa_payments::ActiveModel {
        id: Set(Uuid::new_v4()),
        trosa_id: Set(test_trosa_id()),
        montant: Set(Decimal::from(600)),
        date_paiement: Set(now.into()),
        description: Set(Some("First installment".to_string())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    payment
        .insert(db)
        .await
        .expect("Failed to insert trosa payment");

    println!("  Inserted trosa with 600/1000 paid");
}
