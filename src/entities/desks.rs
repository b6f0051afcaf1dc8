use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "desks")]
pub struct Model {
    /// Explicitly assigned, never autoincremented: `add_desk` computes
    /// (max existing id) + 1 so ids stay dense and stable.
    #[sea_orm(primary_key, auto_increment = false)]
    pub desk_id: i32,

    pub occupant: Option<String>,

    /// ISO `YYYY-MM-DD`; set together with `leaving` and `occupant`.
    pub arrival: Option<String>,

    /// ISO `YYYY-MM-DD`; `arrival <= leaving` when both present.
    pub leaving: Option<String>,

    pub location: String,

    pub supervisor: Option<String>,

    /// Free-text status note, distinct from the derived Vacant/Occupied/Overdue.
    pub status: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
