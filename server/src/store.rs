//! Record store for users, backed by SQLite through sea-orm.
//!
//! # Design
//! `UserStore` is a cloneable handle over a sea-orm connection pool, so
//! handlers share it through router state without further locking. Each
//! operation is a single statement, except `update`, which reads and writes
//! inside one transaction. Ids come from an `AUTOINCREMENT` key: they start
//! at 1 and are never reused.
//!
//! Reads go through `UserQuery`, a small composable query object (a filter
//! predicate, an optional sort key and an offset/limit window) that is
//! compiled into a sea-orm `Select`.

use sea_orm::sea_query::{Expr, LikeExpr, Order};
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, Condition, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
};
use thiserror::Error;

use crate::entity::{self, Column, Entity};
use crate::model::{NewUser, User, UserField, UserId, UserPatch};

pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// The database rejected or failed a store operation.
#[derive(Debug, Error)]
#[error("record store failure: {0}")]
pub struct StoreError(#[from] DbErr);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn order(self) -> Order {
        match self {
            Direction::Ascending => Order::Asc,
            Direction::Descending => Order::Desc,
        }
    }
}

/// A row predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match on one field, with SQLite `LIKE`
    /// semantics (ASCII case folding).
    IContains { field: UserField, needle: String },
    Or(Vec<Predicate>),
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn icontains(field: UserField, needle: &str) -> Self {
        Predicate::IContains {
            field,
            needle: needle.to_string(),
        }
    }

    pub fn or(self, other: Predicate) -> Self {
        match self {
            Predicate::Or(mut any) => {
                any.push(other);
                Predicate::Or(any)
            }
            first => Predicate::Or(vec![first, other]),
        }
    }

    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::And(mut all) => {
                all.push(other);
                Predicate::And(all)
            }
            first => Predicate::And(vec![first, other]),
        }
    }

    fn condition(&self) -> Condition {
        match self {
            Predicate::IContains { field, needle } => {
                let pattern = LikeExpr::new(format!("%{}%", like_escape(needle))).escape('\\');
                Condition::all().add(Expr::col(column(*field)).like(pattern))
            }
            Predicate::Or(any) => any
                .iter()
                .fold(Condition::any(), |cond, p| cond.add(p.condition())),
            Predicate::And(all) => all
                .iter()
                .fold(Condition::all(), |cond, p| cond.add(p.condition())),
        }
    }
}

/// Wildcards in the needle match literally.
fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn column(field: UserField) -> Column {
    match field {
        UserField::Id => Column::Id,
        UserField::FirstName => Column::FirstName,
        UserField::LastName => Column::LastName,
        UserField::CompanyName => Column::CompanyName,
        UserField::Age => Column::Age,
        UserField::City => Column::City,
        UserField::State => Column::State,
        UserField::Zip => Column::Zip,
        UserField::Email => Column::Email,
        UserField::Web => Column::Web,
    }
}

/// A read query over the user table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserQuery {
    predicate: Option<Predicate>,
    order: Option<(UserField, Direction)>,
    window: Option<(u64, u64)>,
}

impl UserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrow the result set. Repeated filters are combined with AND.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// Replace the sort key. Equal keys keep ascending id order.
    pub fn order_by(mut self, field: UserField, direction: Direction) -> Self {
        self.order = Some((field, direction));
        self
    }

    /// Keep at most `length` rows starting at `offset` of the filtered,
    /// ordered result.
    pub fn slice(mut self, offset: u64, length: u64) -> Self {
        self.window = Some((offset, length));
        self
    }

    fn select(&self) -> Select<Entity> {
        let mut select = Entity::find();
        if let Some(predicate) = &self.predicate {
            select = select.filter(predicate.condition());
        }
        if let Some((field, direction)) = self.order {
            select = select.order_by(column(field), direction.order());
        }
        select = select.order_by_asc(Column::Id);
        if let Some((offset, length)) = self.window {
            select = select.offset(offset).limit(length);
        }
        select
    }
}

/// Shared handle to the user table.
#[derive(Clone, Debug)]
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Open the database at `url` and create the table if it is missing.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let mut options = ConnectOptions::new(url);
        options.sqlx_logging(false);
        // Every connection to `:memory:` opens its own database.
        if is_memory(url) {
            options.max_connections(1).min_connections(1);
        }
        let db = Database::connect(options).await?;
        db.execute_unprepared(entity::CREATE_TABLE).await?;
        tracing::debug!(memory = is_memory(url), "user table ready");
        Ok(Self { db })
    }

    /// A fresh, empty store that lives as long as the handle.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect(IN_MEMORY_URL).await
    }

    pub async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        let row = entity::ActiveModel {
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            company_name: Set(new.company_name),
            age: Set(new.age),
            city: Set(new.city),
            state: Set(new.state),
            zip: Set(new.zip),
            email: Set(new.email),
            web: Set(new.web),
            ..Default::default()
        };
        Ok(row.insert(&self.db).await?.into())
    }

    pub async fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(User::from))
    }

    /// Apply `patch` to the row with `id`. `None` if there is no such row.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let txn = self.db.begin().await?;
        let Some(row) = Entity::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };
        let before = User::from(row);
        let mut user = before.clone();
        patch.apply_to(&mut user);
        if user == before {
            txn.commit().await?;
            return Ok(Some(user));
        }
        let updated = changed_row(user).update(&txn).await?;
        txn.commit().await?;
        Ok(Some(updated.into()))
    }

    /// `false` if there was no row with `id`.
    pub async fn remove(&self, id: UserId) -> Result<bool, StoreError> {
        let result = Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn query(&self, query: &UserQuery) -> Result<Vec<User>, StoreError> {
        let rows = query.select().all(&self.db).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}

fn changed_row(user: User) -> entity::ActiveModel {
    entity::ActiveModel {
        id: Unchanged(user.id),
        first_name: Set(user.first_name),
        last_name: Set(user.last_name),
        company_name: Set(user.company_name),
        age: Set(user.age),
        city: Set(user.city),
        state: Set(user.state),
        zip: Set(user.zip),
        email: Set(user.email),
        web: Set(user.web),
    }
}

fn is_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
