//! `SeaORM` Entity for the trosa_payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "trosa_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trosa_id: Uuid,
    pub montant: Decimal,
    pub date_paiement: DateTimeWithTimeZone,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trosa::Entity",
        from = "Column::TrosaId",
        to = "super::trosa::Column::Id"
    )]
    Trosa,
}

impl Related<super::trosa::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trosa.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
