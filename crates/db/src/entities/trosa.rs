//! `SeaORM` Entity for the trosa table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "trosa")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub debtor_name: String,
    pub description: Option<String>,
    pub montant_total: Decimal,
    pub is_paid: bool,
    pub date_paiement: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trosa_payments::Entity")]
    TrosaPayments,
}

impl Related<super::trosa_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrosaPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
