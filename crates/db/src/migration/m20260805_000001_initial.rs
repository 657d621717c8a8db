//! Initial database migration.
//!
//! Creates the movements, trosa, and trosa_payments tables with their
//! indexes. Enumerated fields are plain text validated at the application
//! boundary.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(MOVEMENTS_SQL).await?;
        db.execute_unprepared(TROSA_SQL).await?;
        db.execute_unprepared(TROSA_PAYMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const MOVEMENTS_SQL: &str = r"
CREATE TABLE movements (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    -- 'entry' or 'exit', validated at the application layer
    movement_type TEXT NOT NULL,
    -- 'MGA', 'RMB', 'AED', 'EUR' or 'USD', validated at the application layer
    currency TEXT NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    exchange_rate NUMERIC(14, 2) NOT NULL,
    amount_mga NUMERIC(14, 2) NOT NULL,
    description TEXT NOT NULL,
    date TIMESTAMPTZ NOT NULL,
    author TEXT NOT NULL,
    responsible TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_movements_user ON movements(user_id);
CREATE INDEX idx_movements_date ON movements(date);
";

const TROSA_SQL: &str = r"
CREATE TABLE trosa (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    debtor_name TEXT NOT NULL,
    description TEXT,
    montant_total NUMERIC(14, 2) NOT NULL,
    is_paid BOOLEAN NOT NULL DEFAULT FALSE,
    date_paiement TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_trosa_user ON trosa(user_id);
CREATE INDEX idx_trosa_debtor ON trosa(debtor_name);
CREATE INDEX idx_trosa_is_paid ON trosa(is_paid);
";

const TROSA_PAYMENTS_SQL: &str = r"
CREATE TABLE trosa_payments (
    id UUID PRIMARY KEY,
    trosa_id UUID NOT NULL REFERENCES trosa(id) ON DELETE CASCADE,
    montant NUMERIC(14, 2) NOT NULL,
    date_paiement TIMESTAMPTZ NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_trosa_payments_trosa ON trosa_payments(trosa_id);
CREATE INDEX idx_trosa_payments_date ON trosa_payments(date_paiement);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS trosa_payments;
DROP TABLE IF EXISTS trosa;
DROP TABLE IF EXISTS movements;
";
