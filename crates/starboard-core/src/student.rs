//! Student ledger rows, inventory and tenants

use crate::{CardId, ItemCard, ItemId, StudentId, TenantId};
use serde::{Deserialize, Serialize};

/// A student on a tenant's roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub owner_id: TenantId,
    pub name: String,
    pub dorm_number: Option<String>,
    /// Floored at 0 unless `is_cursed`
    pub stars: i64,
    pub is_cursed: bool,
    /// Remaining turns of protection from random targeting
    pub immunity: u32,
    pub pick_count: u32,
}

impl Student {
    pub fn new(id: StudentId, owner_id: TenantId, name: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
            dorm_number: None,
            stars: 0,
            is_cursed: false,
            immunity: 0,
            pick_count: 0,
        }
    }

    pub fn with_dorm(mut self, dorm: impl Into<String>) -> Self {
        self.dorm_number = Some(dorm.into());
        self
    }

    pub fn with_stars(mut self, stars: i64) -> Self {
        self.stars = stars;
        self
    }

    pub fn is_immune(&self) -> bool {
        self.immunity > 0
    }

    /// Same non-empty dorm number
    pub fn shares_dorm_with(&self, other: &Student) -> bool {
        match (&self.dorm_number, &other.dorm_number) {
            (Some(a), Some(b)) => !a.is_empty() && a == b,
            _ => false,
        }
    }

    /// Add `delta` stars, clamping at zero unless cursed
    pub fn adjust_stars(&mut self, delta: i64) {
        let stars = self.stars.saturating_add(delta);
        self.stars = if self.is_cursed { stars } else { stars.max(0) };
    }

    /// Copy the editable fields of an update onto this row
    pub fn apply_update(&mut self, update: StudentUpdate) {
        self.name = update.name;
        self.dorm_number = update.dorm_number;
        self.stars = update.stars;
        self.pick_count = update.pick_count;
        self.immunity = update.immunity;
        self.is_cursed = update.is_cursed;
    }
}

/// A roster row waiting for an ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub dorm_number: Option<String>,
}

impl NewStudent {
    pub fn into_student(self, id: StudentId, owner_id: TenantId) -> Student {
        Student {
            dorm_number: self.dorm_number,
            ..Student::new(id, owner_id, self.name)
        }
    }
}

/// Whole-row edit of a student from the request layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub name: String,
    #[serde(default)]
    pub dorm_number: Option<String>,
    #[serde(default)]
    pub stars: i64,
    #[serde(default)]
    pub pick_count: u32,
    #[serde(default)]
    pub immunity: u32,
    #[serde(default)]
    pub is_cursed: bool,
}

impl From<&Student> for StudentUpdate {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            dorm_number: student.dorm_number.clone(),
            stars: student.stars,
            pick_count: student.pick_count,
            immunity: student.immunity,
            is_cursed: student.is_cursed,
        }
    }
}

/// An inventory row: one drawn card owned by one student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentItem {
    pub id: ItemId,
    pub student_id: StudentId,
    pub item_card_id: CardId,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    /// The drawn card, when the caller joined it in
    #[serde(default)]
    pub item_card: Option<ItemCard>,
}

/// A teacher account; owns a disjoint set of students
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub username: String,
    pub is_admin: bool,
}

/// Progress and leaderboards for one roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterStats {
    pub total: usize,
    pub picked: usize,
    pub unpicked: usize,
    /// Percentage of students picked at least once
    pub progress: f64,
    /// Most picked first, ties broken by stars
    pub by_pick_count: Vec<StudentId>,
    /// Most stars first, ties broken by pick count
    pub by_stars: Vec<StudentId>,
}

impl RosterStats {
    pub fn from_students(students: &[Student]) -> Self {
        let total = students.len();
        let picked = students.iter().filter(|s| s.pick_count > 0).count();
        let progress = if total == 0 {
            0.0
        } else {
            picked as f64 * 100.0 / total as f64
        };

        let mut by_pick: Vec<&Student> = students.iter().collect();
        by_pick.sort_by(|a, b| {
            b.pick_count
                .cmp(&a.pick_count)
                .then(b.stars.cmp(&a.stars))
        });
        let mut by_stars: Vec<&Student> = students.iter().collect();
        by_stars.sort_by(|a, b| {
            b.stars
                .cmp(&a.stars)
                .then(b.pick_count.cmp(&a.pick_count))
        });

        Self {
            total,
            picked,
            unpicked: total - picked,
            progress,
            by_pick_count: by_pick.into_iter().map(|s| s.id).collect(),
            by_stars: by_stars.into_iter().map(|s| s.id).collect(),
        }
    }
}
