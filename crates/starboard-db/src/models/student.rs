//! Student and inventory models for database storage.

use super::v1;
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use starboard_core::{CardId, ItemId, Student, StudentId, StudentItem, TenantId};

/// Stored student row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 2, from = v1::StoredStudent)]
#[native_db]
pub struct StoredStudent {
    /// Primary key - student ID.
    #[primary_key]
    pub id: u64,
    /// Owning tenant.
    #[secondary_key]
    pub owner_id: u64,
    pub name: String,
    pub dorm_number: Option<String>,
    pub stars: i64,
    pub pick_count: u32,
    pub is_cursed: bool,
    pub immunity: u32,
}

impl From<v1::StoredStudent> for StoredStudent {
    fn from(old: v1::StoredStudent) -> Self {
        Self {
            id: old.id,
            owner_id: old.owner_id,
            name: old.name,
            dorm_number: old.dorm_number,
            stars: old.stars,
            pick_count: old.pick_count,
            is_cursed: false,
            immunity: 0,
        }
    }
}

impl From<StoredStudent> for v1::StoredStudent {
    fn from(new: StoredStudent) -> Self {
        Self {
            id: new.id,
            owner_id: new.owner_id,
            name: new.name,
            dorm_number: new.dorm_number,
            stars: new.stars,
            pick_count: new.pick_count,
        }
    }
}

impl StoredStudent {
    pub fn from_student(student: &Student) -> Self {
        Self {
            id: student.id.raw(),
            owner_id: student.owner_id.raw(),
            name: student.name.clone(),
            dorm_number: student.dorm_number.clone(),
            stars: student.stars,
            pick_count: student.pick_count,
            is_cursed: student.is_cursed,
            immunity: student.immunity,
        }
    }

    pub fn to_student(&self) -> Student {
        Student {
            id: StudentId::new(self.id),
            owner_id: TenantId::new(self.owner_id),
            name: self.name.clone(),
            dorm_number: self.dorm_number.clone(),
            stars: self.stars,
            is_cursed: self.is_cursed,
            immunity: self.immunity,
            pick_count: self.pick_count,
        }
    }
}

/// Stored inventory row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 4, version = 1)]
#[native_db]
pub struct StoredStudentItem {
    #[primary_key]
    pub id: u64,
    /// Owning student; scanned for inventory listing and cascades.
    #[secondary_key]
    pub student_id: u64,
    pub item_card_id: u64,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl StoredStudentItem {
    pub fn to_item(&self) -> StudentItem {
        StudentItem {
            id: ItemId::new(self.id),
            student_id: StudentId::new(self.student_id),
            item_card_id: CardId::new(self.item_card_id),
            created_at: self.created_at,
            item_card: None,
        }
    }
}
