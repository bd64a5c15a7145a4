//! The `users` table as a sea-orm entity.

use sea_orm::entity::prelude::*;

use crate::model::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub age: i64,
    pub city: String,
    pub state: String,
    pub zip: i64,
    pub email: String,
    pub web: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// DDL for the table. `AUTOINCREMENT` keeps SQLite from handing out the id
/// of a deleted row again.
pub const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    company_name VARCHAR(255) NOT NULL,
    age INTEGER NOT NULL,
    city VARCHAR(100) NOT NULL,
    state VARCHAR(100) NOT NULL,
    zip INTEGER NOT NULL,
    email TEXT NOT NULL,
    web TEXT NOT NULL
)";

impl From<Model> for User {
    fn from(row: Model) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            company_name: row.company_name,
            age: row.age,
            city: row.city,
            state: row.state,
            zip: row.zip,
            email: row.email,
            web: row.web,
        }
    }
}
