//! The user record and its field catalogue.
//!
//! `User` is a stored row in its wire representation: serde emits the
//! fields in declaration order, `id` first. `NewUser` and
//! `UserPatch` are the validated inputs produced by the serializer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// A stored user record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
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

/// A fully validated creation payload: every writable field is present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
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

/// A validated partial update. `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<i64>,
    pub email: Option<String>,
    pub web: Option<String>,
}

impl UserPatch {
    pub fn apply_to(self, user: &mut User) {
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(company_name) = self.company_name {
            user.company_name = company_name;
        }
        if let Some(age) = self.age {
            user.age = age;
        }
        if let Some(city) = self.city {
            user.city = city;
        }
        if let Some(state) = self.state {
            user.state = state;
        }
        if let Some(zip) = self.zip {
            user.zip = zip;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(web) = self.web {
            user.web = web;
        }
    }

    /// Writable fields this patch leaves unset.
    pub fn missing_fields(&self) -> Vec<UserField> {
        let present = [
            (UserField::FirstName, self.first_name.is_some()),
            (UserField::LastName, self.last_name.is_some()),
            (UserField::CompanyName, self.company_name.is_some()),
            (UserField::Age, self.age.is_some()),
            (UserField::City, self.city.is_some()),
            (UserField::State, self.state.is_some()),
            (UserField::Zip, self.zip.is_some()),
            (UserField::Email, self.email.is_some()),
            (UserField::Web, self.web.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(field, set)| (!set).then_some(field))
            .collect()
    }
}

impl TryFrom<UserPatch> for NewUser {
    type Error = Vec<UserField>;

    fn try_from(patch: UserPatch) -> Result<Self, Self::Error> {
        let missing = patch.missing_fields();
        let UserPatch {
            first_name: Some(first_name),
            last_name: Some(last_name),
            company_name: Some(company_name),
            age: Some(age),
            city: Some(city),
            state: Some(state),
            zip: Some(zip),
            email: Some(email),
            web: Some(web),
        } = patch
        else {
            return Err(missing);
        };
        Ok(Self {
            first_name,
            last_name,
            company_name,
            age,
            city,
            state,
            zip,
            email,
            web,
        })
    }
}

/// Every field of a user record, by wire name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserField {
    Id,
    FirstName,
    LastName,
    CompanyName,
    Age,
    City,
    State,
    Zip,
    Email,
    Web,
}

/// How a field is stored and coerced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text { max_length: Option<usize> },
    Integer,
}

impl UserField {
    /// Fields a client may write, in wire order.
    pub const WRITABLE: [UserField; 9] = [
        UserField::FirstName,
        UserField::LastName,
        UserField::CompanyName,
        UserField::Age,
        UserField::City,
        UserField::State,
        UserField::Zip,
        UserField::Email,
        UserField::Web,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::FirstName => "first_name",
            UserField::LastName => "last_name",
            UserField::CompanyName => "company_name",
            UserField::Age => "age",
            UserField::City => "city",
            UserField::State => "state",
            UserField::Zip => "zip",
            UserField::Email => "email",
            UserField::Web => "web",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            UserField::Id | UserField::Age | UserField::Zip => FieldKind::Integer,
            UserField::FirstName
            | UserField::LastName
            | UserField::City
            | UserField::State => FieldKind::Text {
                max_length: Some(100),
            },
            UserField::CompanyName => FieldKind::Text {
                max_length: Some(255),
            },
            UserField::Email | UserField::Web => FieldKind::Text { max_length: None },
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl FromStr for UserField {
    type Err = UnknownField;

    /// Accepts the wire names plus `pk` as an alias for `id`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" | "pk" => Ok(UserField::Id),
            "first_name" => Ok(UserField::FirstName),
            "last_name" => Ok(UserField::LastName),
            "company_name" => Ok(UserField::CompanyName),
            "age" => Ok(UserField::Age),
            "city" => Ok(UserField::City),
            "state" => Ok(UserField::State),
            "zip" => Ok(UserField::Zip),
            "email" => Ok(UserField::Email),
            "web" => Ok(UserField::Web),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{NewUser, User, UserId};

    pub fn user(id: UserId, first_name: &str, last_name: &str, age: i64) -> User {
        let new = new_user(first_name, last_name, age);
        User {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            company_name: new.company_name,
            age: new.age,
            city: new.city,
            state: new.state,
            zip: new.zip,
            email: new.email,
            web: new.web,
        }
    }

    pub fn new_user(first_name: &str, last_name: &str, age: i64) -> NewUser {
        NewUser {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            company_name: "ABC Corp".to_string(),
            age,
            city: "NYC".to_string(),
            state: "NY".to_string(),
            zip: 10001,
            email: format!("{}@example.com", first_name.to_lowercase()),
            web: "http://abc.com".to_string(),
        }
    }
}
