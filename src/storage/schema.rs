//! Relational schema for the passengers table
//!
//! Column names are the internal field names, identical to the CSV header.

/// Columns in record order
pub const PASSENGER_COLUMNS: &str =
    "PassengerId, Survived, Pclass, Name, Sex, Age, SibSp, Parch, Ticket, Fare, Cabin, Embarked";

/// SQL to create the passengers table
pub const CREATE_PASSENGERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS passengers (
    PassengerId INTEGER PRIMARY KEY,
    Survived INTEGER NOT NULL DEFAULT 0,
    Pclass INTEGER NOT NULL DEFAULT 0,
    Name TEXT,
    Sex TEXT,
    Age TEXT,
    SibSp INTEGER NOT NULL DEFAULT 0,
    Parch INTEGER NOT NULL DEFAULT 0,
    Ticket TEXT,
    Fare REAL NOT NULL DEFAULT 0,
    Cabin TEXT,
    Embarked TEXT
)
"#;

pub fn select_all() -> String {
    format!("SELECT {} FROM passengers", PASSENGER_COLUMNS)
}

pub fn select_by_id() -> String {
    format!("SELECT {} FROM passengers WHERE PassengerId = ?1", PASSENGER_COLUMNS)
}
