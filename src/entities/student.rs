//! Student entity - One graded student record.
//!
//! A row only ever exists fully formed: the five marks together with the derived
//! `total`, `average`, and `grade`, plus the assigned `student_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Internal autoincrement key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Public student ID such as `"JD001"`, unique across live records
    #[sea_orm(unique)]
    pub student_id: String,
    /// Free-text student name
    pub name: String,
    /// Subject mark 1, in `[0, 100]`
    pub mark1: i32,
    /// Subject mark 2, in `[0, 100]`
    pub mark2: i32,
    /// Subject mark 3, in `[0, 100]`
    pub mark3: i32,
    /// Subject mark 4, in `[0, 100]`
    pub mark4: i32,
    /// Subject mark 5, in `[0, 100]`
    pub mark5: i32,
    /// Sum of the five marks
    pub total: i32,
    /// `total / 5`, truncated
    pub average: i32,
    /// Letter grade derived from `average`: `"A"`..`"F"`
    pub grade: String,
    /// When the record was inserted; default list ordering key
    pub created_at: DateTimeUtc,
}

/// Students have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The five marks in subject order.
    #[must_use]
    pub const fn marks(&self) -> [i32; 5] {
        [self.mark1, self.mark2, self.mark3, self.mark4, self.mark5]
    }
}
