use super::sea_orm_active_enums::PaymentStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub id_tagihan: String,
    pub id_siswa: String,
    pub jumlah: i64,
    pub metode: String,
    pub tanggal_bayar: DateTimeUtc,
    pub tanggal_konfirmasi: Option<DateTimeUtc>,
    pub status: PaymentStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bills::Entity",
        from = "Column::IdTagihan",
        to = "super::bills::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Bills,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::IdSiswa",
        to = "super::students::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Students,
}

impl Related<super::bills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
