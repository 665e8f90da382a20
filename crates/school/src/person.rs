//! Fields shared by students and instructors.
//!
//! Students and instructors are not a class hierarchy: each one *holds* a
//! [`Person`], and every path that produces a `Person` goes through the same
//! validation.

use roster_core::{DomainError, DomainResult, ValueObject};

use crate::validation::{require_text, validate_age, validate_email};

/// A validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if !validate_email(trimmed) {
            return Err(DomainError::validation(format!(
                "invalid email format: {value:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for Email {}

/// Age in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Age(u32);

impl Age {
    pub fn new(value: i64) -> DomainResult<Self> {
        if !validate_age(value) {
            return Err(DomainError::validation(
                "age must be a non-negative integer",
            ));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| DomainError::validation(format!("age is out of range: {value}")))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl ValueObject for Age {}

/// Name, age and email of a student or instructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    name: String,
    age: Age,
    email: Email,
}

impl Person {
    /// Validate raw fields into a `Person`.
    ///
    /// Fails with `DomainError::Validation` on an empty name, a negative age
    /// or a malformed email.
    pub fn new(name: impl Into<String>, age: i64, email: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        require_text("name", &name)?;
        Ok(Self {
            name: name.trim().to_string(),
            age: Age::new(age)?,
            email: Email::parse(email)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age.get()
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Produce the person that results from applying `changes`.
    ///
    /// `self` is never touched; the caller commits the returned value only
    /// if every changed field validated.
    pub fn with_changes(&self, changes: &PersonChanges) -> DomainResult<Self> {
        let mut next = self.clone();
        if let Some(name) = &changes.name {
            require_text("name", name)?;
            next.name = name.trim().to_string();
        }
        if let Some(age) = changes.age {
            next.age = Age::new(age)?;
        }
        if let Some(email) = &changes.email {
            next.email = Email::parse(email.as_str())?;
        }
        Ok(next)
    }

    /// Short greeting shown by `student show` / `instructor show`.
    pub fn introduce(&self) -> String {
        format!(
            "Hi, I'm {}, {} years old. You can reach me at {}.",
            self.name, self.age.0, self.email
        )
    }
}

/// Field changes for `update_student` / `update_instructor`.
///
/// `None` keeps the current value. Identifiers are not part of this set;
/// renames go through `rename_student` / `rename_instructor`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonChanges {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
}

impl PersonChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.email.is_none()
    }
}
