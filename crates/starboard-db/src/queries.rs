//! Common query patterns for the database.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::Store;
use starboard_core::{ItemCard, ItemId, Student, StudentId, StudentItem, Tenant, TenantId};

impl Store {
    /// Load a tenant by ID.
    pub fn load_tenant(&self, id: TenantId) -> Result<Option<Tenant>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredTenant> = r.get().primary(id.raw())?;
        Ok(stored.map(|t| t.to_tenant()))
    }

    /// Load a tenant by its unique username.
    pub fn load_tenant_by_name(&self, username: &str) -> Result<Option<Tenant>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredTenant> = r
            .get()
            .secondary(StoredTenantKey::username, username.to_string())?;
        Ok(stored.map(|t| t.to_tenant()))
    }

    /// Load all tenants.
    pub fn load_tenants(&self) -> Result<Vec<Tenant>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredTenant>()?;
        let iter = scan.all()?;
        let tenants: std::result::Result<Vec<StoredTenant>, _> = iter.collect();
        let tenants = tenants.map_err(|e| Error::Database(e.to_string()))?;
        Ok(tenants.iter().map(StoredTenant::to_tenant).collect())
    }

    /// Load a student by ID.
    pub fn load_student(&self, id: StudentId) -> Result<Option<Student>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredStudent> = r.get().primary(id.raw())?;
        Ok(stored.map(|s| s.to_student()))
    }

    /// Get all students owned by a tenant, in ID order.
    pub fn load_students(&self, owner: TenantId) -> Result<Vec<Student>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredStudent>(StoredStudentKey::owner_id)?;
        let iter = scan.start_with(owner.raw())?;
        let students: std::result::Result<Vec<StoredStudent>, _> = iter.collect();
        let students = students.map_err(|e| Error::Database(e.to_string()))?;
        let mut students: Vec<Student> = students.iter().map(StoredStudent::to_student).collect();
        students.sort_by_key(|s| s.id);
        Ok(students)
    }

    /// Load the whole card catalog, in ID order.
    pub fn load_cards(&self) -> Result<Vec<ItemCard>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredItemCard>()?;
        let iter = scan.all()?;
        let cards: std::result::Result<Vec<StoredItemCard>, _> = iter.collect();
        let cards = cards.map_err(|e| Error::Database(e.to_string()))?;
        Ok(cards.iter().map(StoredItemCard::to_card).collect())
    }

    /// Load an inventory row by ID.
    pub fn load_student_item(&self, id: ItemId) -> Result<Option<StudentItem>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredStudentItem> = r.get().primary(id.raw())?;
        Ok(stored.map(|i| i.to_item()))
    }

    /// Get a student's inventory, oldest first.
    pub fn load_student_items(&self, student: StudentId) -> Result<Vec<StudentItem>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredStudentItem>(StoredStudentItemKey::student_id)?;
        let iter = scan.start_with(student.raw())?;
        let items: std::result::Result<Vec<StoredStudentItem>, _> = iter.collect();
        let items = items.map_err(|e| Error::Database(e.to_string()))?;
        let mut items: Vec<StudentItem> = items.iter().map(StoredStudentItem::to_item).collect();
        items.sort_by_key(|i| (i.created_at, i.id));
        Ok(items)
    }

    /// Stored schema version, if one was recorded.
    pub fn schema_version(&self) -> Result<Option<u32>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredSchemaVersion> =
            r.get().primary(StoredSchemaVersion::KEY.to_string())?;
        Ok(stored.map(|s| s.version))
    }
}
