use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoSimpleExpr,
    Order, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use crate::entities::{desks, prelude::*};

/// Allow-listed sort keys for desk listings. Caller input is parsed into
/// this enum and mapped to fixed column references, never interpolated
/// into query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    DeskId,
    Occupant,
    Arrival,
    Leaving,
    Location,
    Supervisor,
    Status,
}

impl SortColumn {
    /// Parse a caller-supplied sort key; unknown values fall back to `desk_id`.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        match key {
            "occupant" => Self::Occupant,
            "arrival" => Self::Arrival,
            "leaving" => Self::Leaving,
            "location" => Self::Location,
            "supervisor" => Self::Supervisor,
            "status" => Self::Status,
            _ => Self::DeskId,
        }
    }

    const fn column(self) -> desks::Column {
        match self {
            Self::DeskId => desks::Column::DeskId,
            Self::Occupant => desks::Column::Occupant,
            Self::Arrival => desks::Column::Arrival,
            Self::Leaving => desks::Column::Leaving,
            Self::Location => desks::Column::Location,
            Self::Supervisor => desks::Column::Supervisor,
            Self::Status => desks::Column::Status,
        }
    }

    /// Nullable text columns sort with NULL coalesced to the empty string,
    /// keeping NULL and blank values in one group in either direction.
    fn sort_expr(self) -> SimpleExpr {
        match self {
            Self::DeskId | Self::Location => self.column().into_simple_expr(),
            Self::Occupant | Self::Arrival | Self::Leaving | Self::Supervisor | Self::Status => {
                Func::coalesce([self.column().into_simple_expr(), Expr::val("").into()]).into()
            }
        }
    }
}

/// Parse a caller-supplied sort direction; anything but `desc` is ascending.
#[must_use]
pub fn parse_order(order: &str) -> Order {
    if order == "desc" { Order::Desc } else { Order::Asc }
}

/// A desk that is free to book: unoccupied, or past its leaving date.
#[derive(Debug, Clone)]
pub struct VacantDesk {
    pub desk_id: i32,
    pub location: String,
}

/// Occupancy fields applied by an assignment, already validated.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub occupant: String,
    pub arrival: String,
    pub leaving: String,
    pub location: String,
    pub supervisor: Option<String>,
    pub status: Option<String>,
}

pub struct DeskRepository {
    conn: DatabaseConnection,
}

impl DeskRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, desk_id: i32) -> Result<Option<desks::Model>> {
        Desks::find_by_id(desk_id)
            .one(&self.conn)
            .await
            .context("Failed to query desk by id")
    }

    pub async fn list(&self, sort: SortColumn, order: Order) -> Result<Vec<desks::Model>> {
        Desks::find()
            .order_by(sort.sort_expr(), order)
            .order_by_asc(desks::Column::DeskId)
            .all(&self.conn)
            .await
            .context("Failed to list desks")
    }

    /// Desks with no occupant, plus occupied desks whose leaving date has
    /// passed. Stored dates are ISO `YYYY-MM-DD`, so string comparison
    /// matches date order.
    pub async fn vacant(&self, today: &str) -> Result<Vec<VacantDesk>> {
        let rows = Desks::find()
            .filter(
                Condition::any()
                    .add(desks::Column::Occupant.is_null())
                    .add(desks::Column::Leaving.lte(today)),
            )
            .order_by_asc(desks::Column::DeskId)
            .all(&self.conn)
            .await
            .context("Failed to query vacant desks")?;

        Ok(rows
            .into_iter()
            .map(|d| VacantDesk {
                desk_id: d.desk_id,
                location: d.location,
            })
            .collect())
    }

    /// Overwrite all occupancy fields of an existing desk.
    /// The caller has already checked existence and vacancy; the
    /// read-then-write pair is not isolated from concurrent writers,
    /// an accepted hazard for the single-admin usage model.
    pub async fn assign(&self, desk: desks::Model, assignment: Assignment) -> Result<()> {
        let desk_id = desk.desk_id;
        let mut active: desks::ActiveModel = desk.into();
        active.occupant = Set(Some(assignment.occupant));
        active.arrival = Set(Some(assignment.arrival));
        active.leaving = Set(Some(assignment.leaving));
        active.location = Set(assignment.location);
        active.supervisor = Set(assignment.supervisor);
        active.status = Set(assignment.status);
        active
            .update(&self.conn)
            .await
            .context("Failed to assign occupant")?;

        info!("Assigned occupant to desk {}", desk_id);
        Ok(())
    }

    /// Clear occupancy fields; the desk row and its location survive.
    pub async fn clear_occupant(&self, desk: desks::Model) -> Result<()> {
        let desk_id = desk.desk_id;
        let mut active: desks::ActiveModel = desk.into();
        active.occupant = Set(None);
        active.arrival = Set(None);
        active.leaving = Set(None);
        active.supervisor = Set(None);
        active.status = Set(None);
        active
            .update(&self.conn)
            .await
            .context("Failed to clear occupant")?;

        info!("Cleared occupant from desk {}", desk_id);
        Ok(())
    }

    /// Overwrite location/supervisor/status regardless of occupancy and
    /// return the stored row.
    pub async fn set_details(
        &self,
        desk: desks::Model,
        location: String,
        supervisor: Option<String>,
        status: Option<String>,
    ) -> Result<desks::Model> {
        let mut active: desks::ActiveModel = desk.into();
        active.location = Set(location);
        active.supervisor = Set(supervisor);
        active.status = Set(status);
        active
            .update(&self.conn)
            .await
            .context("Failed to update desk details")
    }

    /// Insert a vacant desk with id (max existing id, or 0) + 1.
    pub async fn add(&self, location: String) -> Result<i32> {
        let max_id = Desks::find()
            .select_only()
            .column_as(desks::Column::DeskId.max(), "max_id")
            .into_tuple::<Option<i32>>()
            .one(&self.conn)
            .await
            .context("Failed to query max desk id")?
            .flatten();

        let new_desk_id = max_id.unwrap_or(0) + 1;

        let active = desks::ActiveModel {
            desk_id: Set(new_desk_id),
            location: Set(location),
            ..Default::default()
        };
        Desks::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert desk")?;

        info!("Added desk {}", new_desk_id);
        Ok(new_desk_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_key_falls_back_to_desk_id() {
        assert_eq!(SortColumn::parse("occupant"), SortColumn::Occupant);
        assert_eq!(SortColumn::parse("leaving"), SortColumn::Leaving);
        assert_eq!(SortColumn::parse("desk_id"), SortColumn::DeskId);
        assert_eq!(SortColumn::parse("DROP TABLE desks"), SortColumn::DeskId);
        assert_eq!(SortColumn::parse(""), SortColumn::DeskId);
    }

    #[test]
    fn invalid_order_falls_back_to_ascending() {
        assert_eq!(parse_order("desc"), Order::Desc);
        assert_eq!(parse_order("asc"), Order::Asc);
        assert_eq!(parse_order("sideways"), Order::Asc);
        assert_eq!(parse_order(""), Order::Asc);
    }
}
