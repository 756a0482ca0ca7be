//! Storage contract for the service layer
//!
//! Each method is one logical storage operation; multi-row methods such as
//! [`Repository::replace_roster`] are expected to commit atomically.

use crate::{
    CardId, ItemCard, ItemId, NewCard, NewStudent, Result, Student, StudentId, StudentItem,
    Tenant, TenantId,
};

/// Persistence for tenants, students, the card catalog and inventory
pub trait Repository: Send + Sync {
    /// Bring stored rows up to the current schema.
    ///
    /// Returns `true` when an upgrade ran.
    fn upgrade_schema(&self) -> Result<bool> {
        Ok(false)
    }

    // Tenants

    fn tenant(&self, id: TenantId) -> Result<Option<Tenant>>;

    fn tenant_by_name(&self, username: &str) -> Result<Option<Tenant>>;

    fn tenants(&self) -> Result<Vec<Tenant>>;

    /// Create a tenant; fails with `Conflict` when the username is taken
    fn insert_tenant(&self, username: &str, is_admin: bool) -> Result<Tenant>;

    /// Delete a tenant together with its students and their inventory.
    ///
    /// Returns `false` when no such tenant exists.
    fn delete_tenant(&self, id: TenantId) -> Result<bool>;

    // Students

    fn student(&self, id: StudentId) -> Result<Option<Student>>;

    /// Every student owned by a tenant, in ID order
    fn students(&self, owner: TenantId) -> Result<Vec<Student>>;

    fn save_student(&self, student: &Student) -> Result<()>;

    /// Write several rows in one transaction
    fn save_students(&self, students: &[Student]) -> Result<()> {
        for student in students {
            self.save_student(student)?;
        }
        Ok(())
    }

    /// Delete a student and its inventory
    fn delete_student(&self, id: StudentId) -> Result<bool>;

    /// Replace a tenant's whole roster, inventory included
    fn replace_roster(&self, owner: TenantId, roster: &[NewStudent]) -> Result<Vec<Student>>;

    // Card catalog

    fn cards(&self) -> Result<Vec<ItemCard>>;

    fn insert_card(&self, card: NewCard) -> Result<ItemCard>;

    fn save_card(&self, card: &ItemCard) -> Result<()>;

    // Inventory

    fn insert_student_item(&self, student: StudentId, card: CardId) -> Result<StudentItem>;

    /// Record a drawn card together with the rows its effect changed.
    ///
    /// Either both writes land or neither does. The default removes the
    /// inventory row again when saving the students fails; stores with
    /// transactions should write both in one.
    fn record_draw(
        &self,
        student: StudentId,
        card: CardId,
        changed: &[Student],
    ) -> Result<StudentItem> {
        let item = self.insert_student_item(student, card)?;
        if let Err(err) = self.save_students(changed) {
            self.delete_student_item(item.id)?;
            return Err(err);
        }
        Ok(item)
    }

    /// A student's inventory, oldest first
    fn student_items(&self, student: StudentId) -> Result<Vec<StudentItem>>;

    fn student_item(&self, id: ItemId) -> Result<Option<StudentItem>>;

    fn delete_student_item(&self, id: ItemId) -> Result<bool>;
}
